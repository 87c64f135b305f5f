use serde::Serialize;

use crate::models::area::AreaCode;

/// ACS snapshot for one ZCTA. Every count is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CensusStats {
    pub name: Option<String>,
    pub median_household_income: Option<u64>,
    pub population: Option<u64>,
    pub median_age: Option<u32>,
    pub owner_units: Option<u64>,
    pub renter_units: Option<u64>,
    pub owner_ratio: Option<f64>,
    pub below_poverty: Option<u64>,
    pub poverty_rate: Option<f64>,
}

impl CensusStats {
    /// Fills `owner_ratio` and `poverty_rate` from the raw counts.
    /// A ratio stays `None` unless both operands exist and the denominator is positive.
    pub fn with_derived_ratios(mut self) -> Self {
        self.owner_ratio = match (self.owner_units, self.renter_units) {
            (Some(owner), Some(renter)) if owner + renter > 0 => {
                Some(owner as f64 / (owner + renter) as f64)
            }
            _ => None,
        };
        self.poverty_rate = match (self.below_poverty, self.population) {
            (Some(below), Some(population)) if population > 0 => {
                Some(below as f64 / population as f64)
            }
            _ => None,
        };
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocationRef {
    pub city: Option<String>,
    pub state: Option<String>,
}

impl LocationRef {
    /// `"City, ST"`, `"City"`, or `"Unknown area"`.
    pub fn area_label(&self) -> String {
        match (&self.city, &self.state) {
            (Some(city), Some(state)) => format!("{city}, {state}"),
            (Some(city), None) => city.clone(),
            _ => "Unknown area".to_string(),
        }
    }
}

/// One row of the IRS Business Master File extract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NonprofitRecord {
    pub name: String,
    pub city: String,
    pub state: String,
    pub ein: String,
    pub subsection_code: String,
    pub classification: String,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PsychographicTag {
    VeryAffluent,
    UpperMiddleIncome,
    MiddleIncome,
    LowerIncome,
    YoungerArea,
    OlderArea,
    HomeownerHeavy,
    RenterHeavy,
    HighPoverty,
    LowPoverty,
    FaithCommunityPresent,
    PhilanthropyCulture,
    EducationPresent,
    AnimalWelfarePresent,
}

impl PsychographicTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            PsychographicTag::VeryAffluent => "very_affluent",
            PsychographicTag::UpperMiddleIncome => "upper_middle_income",
            PsychographicTag::MiddleIncome => "middle_income",
            PsychographicTag::LowerIncome => "lower_income",
            PsychographicTag::YoungerArea => "younger_area",
            PsychographicTag::OlderArea => "older_area",
            PsychographicTag::HomeownerHeavy => "homeowner_heavy",
            PsychographicTag::RenterHeavy => "renter_heavy",
            PsychographicTag::HighPoverty => "high_poverty",
            PsychographicTag::LowPoverty => "low_poverty",
            PsychographicTag::FaithCommunityPresent => "faith_community_present",
            PsychographicTag::PhilanthropyCulture => "philanthropy_culture",
            PsychographicTag::EducationPresent => "education_present",
            PsychographicTag::AnimalWelfarePresent => "animal_welfare_present",
        }
    }
}

/// The assembled, read-only view of one ZIP.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub zip: AreaCode,
    pub census: Option<CensusStats>,
    pub location: LocationRef,
    pub nonprofits: Vec<NonprofitRecord>,
    pub psychographics: Vec<PsychographicTag>,
    pub area_label: String,
}

impl Profile {
    pub fn has_tag(&self, tag: PsychographicTag) -> bool {
        self.psychographics.contains(&tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub tax_angle: String,
}
