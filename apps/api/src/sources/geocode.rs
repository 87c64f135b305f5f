use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::models::area::AreaCode;
use crate::models::profile::LocationRef;
use crate::sources::{http_client, GeocodeSource, Lookup, SourceError};

const GEOCODER_URL: &str = "https://geocoding.geo.census.gov/geocoder/geographies/address";
const BENCHMARK: &str = "Public_AR_Current";

#[derive(Debug, Deserialize)]
struct GeocoderResponse {
    result: GeocoderResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeocoderResult {
    address_matches: Vec<AddressMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressMatch {
    #[serde(default)]
    address_components: AddressComponents,
}

#[derive(Debug, Default, Deserialize)]
struct AddressComponents {
    city: Option<String>,
    state: Option<String>,
}

/// Census geocoder, queried with only a ZIP to get an approximate city/state.
#[derive(Clone)]
pub struct GeocoderClient {
    client: Client,
    base_url: String,
}

impl GeocoderClient {
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: GEOCODER_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn try_resolve(&self, area: &AreaCode) -> Result<LocationRef, SourceError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("street", ""),
                ("city", ""),
                ("state", ""),
                ("zip", area.as_str()),
                ("benchmark", BENCHMARK),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_geocoder_payload(&body)
    }
}

#[async_trait]
impl GeocodeSource for GeocoderClient {
    async fn resolve(&self, area: &AreaCode) -> Lookup<LocationRef> {
        Lookup::from_result("geocoder", area, self.try_resolve(area).await)
    }
}

/// Takes the first address match; blank components count as absent.
fn parse_geocoder_payload(body: &str) -> Result<LocationRef, SourceError> {
    let response: GeocoderResponse =
        serde_json::from_str(body).map_err(|e| SourceError::MalformedPayload(e.to_string()))?;

    let first = response
        .result
        .address_matches
        .into_iter()
        .next()
        .ok_or(SourceError::NoData)?;

    let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    Ok(LocationRef {
        city: non_blank(first.address_components.city),
        state: non_blank(first.address_components.state),
    })
}
