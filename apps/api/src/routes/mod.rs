pub mod health;

use axum::{routing::get, Router};

use crate::profile::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/tax-breaks", get(handlers::handle_tax_breaks))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::models::area::AreaCode;
    use crate::models::profile::{CensusStats, LocationRef, NonprofitRecord};
    use crate::profile::builder::ProfileBuilder;
    use crate::profile::handlers::INVALID_ZIP_MESSAGE;
    use crate::sources::{CensusSource, GeocodeSource, Lookup, NonprofitSource, SourceError};

    /// Serves census rows only for 92008.
    struct CarlsbadCensus;

    #[async_trait]
    impl CensusSource for CarlsbadCensus {
        async fn fetch(&self, area: &AreaCode) -> Lookup<CensusStats> {
            if area.as_str() != "92008" {
                return Lookup::Absent(SourceError::NoData);
            }
            Lookup::Found(
                CensusStats {
                    median_household_income: Some(101_897),
                    population: Some(27_373),
                    median_age: Some(41),
                    owner_units: Some(5727),
                    renter_units: Some(6026),
                    below_poverty: Some(2319),
                    ..Default::default()
                }
                .with_derived_ratios(),
            )
        }
    }

    struct NoGeocoder;

    #[async_trait]
    impl GeocodeSource for NoGeocoder {
        async fn resolve(&self, _area: &AreaCode) -> Lookup<LocationRef> {
            Lookup::Absent(SourceError::NoData)
        }
    }

    struct FixedRegistry;

    #[async_trait]
    impl NonprofitSource for FixedRegistry {
        async fn find_by_zip(&self, _area: &AreaCode) -> Lookup<Vec<NonprofitRecord>> {
            Lookup::Found(vec![NonprofitRecord {
                name: "Carlsbad Unified Booster Club".to_string(),
                city: "Carlsbad".to_string(),
                state: "CA".to_string(),
                ein: "330011111".to_string(),
                ..Default::default()
            }])
        }
    }

    /// Panics mid-lookup, as a corrupted source would.
    struct PanickingRegistry;

    #[async_trait]
    impl NonprofitSource for PanickingRegistry {
        async fn find_by_zip(&self, _area: &AreaCode) -> Lookup<Vec<NonprofitRecord>> {
            panic!("registry index corrupted");
        }
    }

    fn app_with(nonprofits: Arc<dyn NonprofitSource>) -> Router {
        build_router(AppState {
            builder: ProfileBuilder::new(Arc::new(CarlsbadCensus), Arc::new(NoGeocoder), nonprofits),
        })
    }

    fn app() -> Router {
        app_with(Arc::new(FixedRegistry))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        request_json(app(), uri).await
    }

    async fn request_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "ziplens-api");
    }

    #[tokio::test]
    async fn test_tax_breaks_for_covered_zip() {
        let (status, body) = get_json("/api/tax-breaks?zip=92008").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["zip"], "92008");
        assert_eq!(body["city"], "Carlsbad");
        assert_eq!(body["state"], "CA");
        assert_eq!(body["area_label"], "Carlsbad, CA");
        assert_eq!(body["nonprofit_count"], 1);
        assert_eq!(body["census"]["median_household_income"], 101_897);
        assert_eq!(
            body["psychographics"],
            serde_json::json!(["upper_middle_income"])
        );
        let recs = body["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0]["title"], "Support Local Education in 92008");
    }

    #[tokio::test]
    async fn test_malformed_zip_rejected() {
        for uri in [
            "/api/tax-breaks",
            "/api/tax-breaks?zip=",
            "/api/tax-breaks?zip=9200",
            "/api/tax-breaks?zip=abcde",
            "/api/tax-breaks?zip=92008-1234",
        ] {
            let (status, body) = get_json(uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
            assert_eq!(body["error"]["message"], INVALID_ZIP_MESSAGE);
        }
    }

    #[tokio::test]
    async fn test_zip_without_census_rejected() {
        let (status, body) = get_json("/api/tax-breaks?zip=00000").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_panicking_source_is_internal_error() {
        let (status, body) =
            request_json(app_with(Arc::new(PanickingRegistry)), "/api/tax-breaks?zip=92008").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"]["message"], "An internal server error occurred");
    }
}
