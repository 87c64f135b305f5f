//! ACS 5-year statistics for a ZIP code tabulation area.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::models::area::AreaCode;
use crate::models::profile::CensusStats;
use crate::sources::{http_client, CensusSource, Lookup, SourceError};

const CENSUS_API_URL: &str = "https://api.census.gov/data/2022/acs/acs5";

const VAR_MEDIAN_INCOME: &str = "B19013_001E";
const VAR_POPULATION: &str = "B01003_001E";
const VAR_MEDIAN_AGE: &str = "B01002_001E";
const VAR_OWNER_UNITS: &str = "B25003_002E";
const VAR_RENTER_UNITS: &str = "B25003_003E";
const VAR_BELOW_POVERTY: &str = "B17001_002E";

/// Display name plus the six statistics, in request order.
const GET_FIELDS: &str = "NAME,B19013_001E,B01003_001E,B01002_001E,B25003_002E,B25003_003E,B17001_002E";

#[derive(Clone)]
pub struct CensusClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl CensusClient {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key,
            base_url: CENSUS_API_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn try_fetch(&self, area: &AreaCode) -> Result<CensusStats, SourceError> {
        // Checked before any request is built.
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SourceError::MissingCredential)?;

        let for_clause = format!("zip code tabulation area:{area}");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("get", GET_FIELDS), ("for", &for_clause), ("key", api_key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!(zip = %area, bytes = body.len(), "census response received");
        parse_census_payload(&body)
    }
}

#[async_trait]
impl CensusSource for CensusClient {
    async fn fetch(&self, area: &AreaCode) -> Lookup<CensusStats> {
        Lookup::from_result("census", area, self.try_fetch(area).await)
    }
}

/// Parses the array-of-arrays payload: row 0 is the header, row 1 the values.
fn parse_census_payload(body: &str) -> Result<CensusStats, SourceError> {
    // The API answers 204 with an empty body for areas it has no rows for.
    if body.trim().is_empty() {
        return Err(SourceError::NoData);
    }

    let payload: Value = serde_json::from_str(body)
        .map_err(|e| SourceError::MalformedPayload(e.to_string()))?;
    let rows = payload
        .as_array()
        .ok_or_else(|| SourceError::MalformedPayload("expected a JSON array".to_string()))?;

    if rows.len() < 2 {
        return Err(SourceError::NoData);
    }

    let header = rows[0]
        .as_array()
        .ok_or_else(|| SourceError::MalformedPayload("header row is not an array".to_string()))?;
    let values = rows[1]
        .as_array()
        .ok_or_else(|| SourceError::MalformedPayload("data row is not an array".to_string()))?;

    let row: HashMap<&str, String> = header
        .iter()
        .zip(values)
        .filter_map(|(key, value)| Some((key.as_str()?, cell_text(value)?)))
        .collect();

    let field = |key: &str| row.get(key).map(String::as_str);

    Ok(CensusStats {
        name: field("NAME").map(str::to_string),
        median_household_income: parse_count(field(VAR_MEDIAN_INCOME)),
        population: parse_count(field(VAR_POPULATION)),
        median_age: parse_age(field(VAR_MEDIAN_AGE)),
        owner_units: parse_count(field(VAR_OWNER_UNITS)),
        renter_units: parse_count(field(VAR_RENTER_UNITS)),
        below_poverty: parse_count(field(VAR_BELOW_POVERTY)),
        ..Default::default()
    }
    .with_derived_ratios())
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Integer counts. Negative values are census annotation sentinels
/// (e.g. `-666666666`) and count as absent.
fn parse_count(raw: Option<&str>) -> Option<u64> {
    let n = raw?.trim().parse::<i64>().ok()?;
    u64::try_from(n).ok()
}

/// Median age is published with one decimal; rounded to whole years.
fn parse_age(raw: Option<&str>) -> Option<u32> {
    let age = raw?.trim().parse::<f64>().ok()?;
    if !age.is_finite() || age < 0.0 {
        return None;
    }
    Some(age.round() as u32)
}
