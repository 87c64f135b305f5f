use std::fmt::{self, Write};

use serde::Serialize;

use crate::models::area::AreaCode;
use crate::models::profile::{CensusStats, Profile, Recommendation};
use crate::profile::builder::ProfileBuilder;
use crate::profile::recommendations::recommend;

/// How many nonprofits the text report lists before eliding the rest.
const LISTED_NONPROFITS: usize = 10;

const DISCLAIMER: &str =
    "(General info only, not tax advice. Talk to a tax pro for your specific situation.)";

/// Profile plus recommendations. Both the CLI and the HTTP endpoint format this.
#[derive(Debug, Clone, Serialize)]
pub struct TaxBreakReport {
    pub zip: AreaCode,
    pub profile: Profile,
    pub recommendations: Vec<Recommendation>,
}

pub async fn generate_tax_breaks(builder: &ProfileBuilder, area: &AreaCode) -> TaxBreakReport {
    let profile = builder.build(area).await;
    let recommendations = recommend(&profile);

    TaxBreakReport {
        zip: area.clone(),
        profile,
        recommendations,
    }
}

/// Plain-text rendering used by the interactive CLI.
pub fn render_text(report: &TaxBreakReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_report(&mut out, report)?;
    Ok(out)
}

fn write_report(out: &mut String, report: &TaxBreakReport) -> fmt::Result {
    let profile = &report.profile;
    let zip = &report.zip;

    writeln!(out, "\n=== ZIP {zip} PROFILE ===")?;
    writeln!(out, "Area: {}", profile.area_label)?;
    writeln!(
        out,
        "City/state: {} {}",
        profile.location.city.as_deref().unwrap_or("Unknown"),
        profile.location.state.as_deref().unwrap_or("Unknown")
    )?;
    let tags: Vec<&str> = profile.psychographics.iter().map(|t| t.as_str()).collect();
    writeln!(out, "Psychographics: [{}]", tags.join(", "))?;

    writeln!(out, "\nCensus snapshot:")?;
    match &profile.census {
        Some(census) => write_census(out, census)?,
        None => writeln!(out, "  No census data available for this ZIP.")?,
    }

    let nonprofits = &profile.nonprofits;
    writeln!(
        out,
        "\n=== Local Nonprofits from IRS BMF for {zip} ({} found) ===",
        nonprofits.len()
    )?;
    if nonprofits.is_empty() {
        writeln!(out, "No IRS-listed nonprofits found for this ZIP in the dataset.")?;
    } else {
        for org in nonprofits.iter().take(LISTED_NONPROFITS) {
            writeln!(
                out,
                " - {} ({}, {}) | EIN: {}",
                org.name, org.city, org.state, org.ein
            )?;
        }
    }

    writeln!(out, "\n=== Tax Breaks Near You (3 ideas) ===")?;
    if report.recommendations.is_empty() {
        writeln!(
            out,
            "No recommendations generated (no nonprofits or tags to work with)."
        )?;
    } else {
        for (i, rec) in report.recommendations.iter().enumerate() {
            writeln!(out, "\n{}. {}", i + 1, rec.title)?;
            writeln!(out, "    {}", rec.description)?;
            writeln!(out, "   Tax angle: {}", rec.tax_angle)?;
        }
    }

    writeln!(out, "\n{DISCLAIMER}")
}

fn write_census(out: &mut String, census: &CensusStats) -> fmt::Result {
    let count = |v: Option<u64>| v.map(|n| n.to_string()).unwrap_or_else(|| "n/a".to_string());
    let ratio = |v: Option<f64>| {
        v.map(|r| format!("{:.1}%", r * 100.0))
            .unwrap_or_else(|| "n/a".to_string())
    };

    if let Some(name) = &census.name {
        writeln!(out, "  Area: {name}")?;
    }
    writeln!(
        out,
        "  Median household income: {}",
        census
            .median_household_income
            .map(|n| format!("${n}"))
            .unwrap_or_else(|| "n/a".to_string())
    )?;
    writeln!(out, "  Population: {}", count(census.population))?;
    writeln!(
        out,
        "  Median age: {}",
        census
            .median_age
            .map(|a| a.to_string())
            .unwrap_or_else(|| "n/a".to_string())
    )?;
    writeln!(
        out,
        "  Housing: {} owner / {} renter ({} owner-occupied)",
        count(census.owner_units),
        count(census.renter_units),
        ratio(census.owner_ratio)
    )?;
    writeln!(
        out,
        "  Below poverty line: {} ({})",
        count(census.below_poverty),
        ratio(census.poverty_rate)
    )
}
