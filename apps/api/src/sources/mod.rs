//! External data sources: census statistics, the census geocoder, and the
//! IRS Business Master File extract.
//!
//! Every source is fail-soft. Internally each one builds a
//! `Result<T, SourceError>` with `?`; at its public boundary the error is
//! logged and folded into [`Lookup::Absent`], so nothing above a source ever
//! sees an error.
//!
//! The traits below are carried by the profile builder as `Arc<dyn ...>` so
//! tests can swap in in-memory stubs.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::area::AreaCode;
use crate::models::profile::{CensusStats, LocationRef, NonprofitRecord};

pub mod census;
pub mod geocode;
pub mod nonprofits;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("CENSUS_API_KEY is not set")]
    MissingCredential,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {status}")]
    Status { status: u16 },

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("no data rows for this area")]
    NoData,

    #[error("dataset file not found at {}", .0.display())]
    MissingDataset(PathBuf),

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of one source call. Absence carries the reason it happened.
#[derive(Debug)]
pub enum Lookup<T> {
    Found(T),
    Absent(SourceError),
}

impl<T> Lookup<T> {
    /// Converts a source's internal result, logging the failure reason.
    pub fn from_result(source: &str, area: &AreaCode, result: Result<T, SourceError>) -> Self {
        match result {
            Ok(value) => Lookup::Found(value),
            Err(reason) => {
                tracing::warn!(source, zip = %area, "lookup degraded: {reason}");
                Lookup::Absent(reason)
            }
        }
    }

    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Absent(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

#[async_trait]
pub trait CensusSource: Send + Sync {
    async fn fetch(&self, area: &AreaCode) -> Lookup<CensusStats>;
}

#[async_trait]
pub trait GeocodeSource: Send + Sync {
    async fn resolve(&self, area: &AreaCode) -> Lookup<LocationRef>;
}

#[async_trait]
pub trait NonprofitSource: Send + Sync {
    async fn find_by_zip(&self, area: &AreaCode) -> Lookup<Vec<NonprofitRecord>>;
}

/// Builds the shared HTTP client used by the network-facing sources.
pub(crate) fn http_client(timeout: std::time::Duration) -> Result<reqwest::Client, SourceError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Serves `router` on an ephemeral local port and returns its base URL.
#[cfg(test)]
pub(crate) async fn serve_locally(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_unwraps_value() {
        let area = AreaCode::parse("92008").unwrap();
        let lookup = Lookup::from_result("test", &area, Ok::<_, SourceError>(7));
        assert!(lookup.is_found());
        assert_eq!(lookup.found(), Some(7));
    }

    #[test]
    fn test_error_becomes_absent() {
        let area = AreaCode::parse("92008").unwrap();
        let lookup: Lookup<u32> = Lookup::from_result("test", &area, Err(SourceError::NoData));
        assert!(!lookup.is_found());
        assert!(matches!(lookup, Lookup::Absent(SourceError::NoData)));
    }
}
