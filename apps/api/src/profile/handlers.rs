//! Axum route handlers for the tax-breaks API.

use axum::{
    extract::{Query, State},
    Json,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::area::AreaCode;
use crate::models::profile::{CensusStats, NonprofitRecord, PsychographicTag, Recommendation};
use crate::profile::report::generate_tax_breaks;
use crate::state::AppState;

/// Shown for every rejected ZIP, whatever the reason.
pub const INVALID_ZIP_MESSAGE: &str = "Enter a valid California ZIP.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TaxBreaksQuery {
    #[serde(default)]
    pub zip: String,
}

#[derive(Debug, Serialize)]
pub struct TaxBreaksResponse {
    pub zip: AreaCode,
    pub city: Option<String>,
    pub state: Option<String>,
    pub area_label: String,
    pub psychographics: Vec<PsychographicTag>,
    pub census: CensusStats,
    pub recommendations: Vec<Recommendation>,
    pub nonprofit_count: usize,
    pub nonprofits: Vec<NonprofitRecord>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/tax-breaks?zip=NNNNN
///
/// Builds the ZIP profile and up to three recommendations.
/// ZIPs without census rows are rejected the same way as malformed input.
/// A panic while building the report is answered with a 500.
pub async fn handle_tax_breaks(
    State(state): State<AppState>,
    Query(query): Query<TaxBreaksQuery>,
) -> Result<Json<TaxBreaksResponse>, AppError> {
    let area = AreaCode::parse(&query.zip).map_err(|e| {
        info!(zip = %query.zip, "rejecting ZIP: {e}");
        AppError::Validation(INVALID_ZIP_MESSAGE.to_string())
    })?;

    let builder = state.builder.clone();
    let task_area = area.clone();
    let report = tokio::spawn(async move { generate_tax_breaks(&builder, &task_area).await })
        .await
        .with_context(|| format!("building the profile for {area} failed"))?;
    let profile = report.profile;

    let census = profile.census.ok_or_else(|| {
        info!(zip = %area, "no census rows; treating ZIP as outside coverage");
        AppError::Validation(INVALID_ZIP_MESSAGE.to_string())
    })?;

    Ok(Json(TaxBreaksResponse {
        zip: report.zip,
        city: profile.location.city,
        state: profile.location.state,
        area_label: profile.area_label,
        psychographics: profile.psychographics,
        census,
        recommendations: report.recommendations,
        nonprofit_count: profile.nonprofits.len(),
        nonprofits: profile.nonprofits,
    }))
}
