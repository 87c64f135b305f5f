//! Psychographic tagging: fixed census thresholds plus keyword hits over
//! nonprofit names. Pure and deterministic: no I/O, and the output order is
//! the rule evaluation order below.

use crate::models::profile::{CensusStats, NonprofitRecord, PsychographicTag};

const FAITH_TERMS: &[&str] = &[
    "church",
    "temple",
    "synagogue",
    "ministries",
    "mosque",
    "catholic",
    "lutheran",
    "baptist",
];

const PHILANTHROPY_TERMS: &[&str] = &["foundation"];

const EDUCATION_TERMS: &[&str] = &["school", "academy", "education", "pta"];

const ANIMAL_TERMS: &[&str] = &["animal", "humane", "rescue", "spca"];

pub fn classify(
    census: Option<&CensusStats>,
    nonprofits: &[NonprofitRecord],
) -> Vec<PsychographicTag> {
    let mut tags = Vec::new();

    if let Some(census) = census {
        tags.extend(census.median_household_income.map(income_tag));
        tags.extend(census.median_age.and_then(age_tag));
        tags.extend(census.owner_ratio.and_then(housing_tag));
        tags.extend(census.poverty_rate.and_then(poverty_tag));
    }

    let names = nonprofits
        .iter()
        .map(|n| n.name.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let keyword_rules = [
        (FAITH_TERMS, PsychographicTag::FaithCommunityPresent),
        (PHILANTHROPY_TERMS, PsychographicTag::PhilanthropyCulture),
        (EDUCATION_TERMS, PsychographicTag::EducationPresent),
        (ANIMAL_TERMS, PsychographicTag::AnimalWelfarePresent),
    ];
    for (terms, tag) in keyword_rules {
        if terms.iter().any(|t| names.contains(t)) {
            tags.push(tag);
        }
    }

    tags
}

fn income_tag(income: u64) -> PsychographicTag {
    if income >= 150_000 {
        PsychographicTag::VeryAffluent
    } else if income >= 90_000 {
        PsychographicTag::UpperMiddleIncome
    } else if income >= 55_000 {
        PsychographicTag::MiddleIncome
    } else {
        PsychographicTag::LowerIncome
    }
}

fn age_tag(median_age: u32) -> Option<PsychographicTag> {
    if median_age < 32 {
        Some(PsychographicTag::YoungerArea)
    } else if median_age > 50 {
        Some(PsychographicTag::OlderArea)
    } else {
        None
    }
}

fn housing_tag(owner_ratio: f64) -> Option<PsychographicTag> {
    if owner_ratio >= 0.65 {
        Some(PsychographicTag::HomeownerHeavy)
    } else if owner_ratio <= 0.40 {
        Some(PsychographicTag::RenterHeavy)
    } else {
        None
    }
}

fn poverty_tag(poverty_rate: f64) -> Option<PsychographicTag> {
    if poverty_rate >= 0.20 {
        Some(PsychographicTag::HighPoverty)
    } else if poverty_rate <= 0.08 {
        Some(PsychographicTag::LowPoverty)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::PsychographicTag::*;

    fn org(name: &str) -> NonprofitRecord {
        NonprofitRecord {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn stats(income: Option<u64>, age: Option<u32>, owner: Option<f64>, poverty: Option<f64>) -> CensusStats {
        CensusStats {
            median_household_income: income,
            median_age: age,
            owner_ratio: owner,
            poverty_rate: poverty,
            ..Default::default()
        }
    }

    #[test]
    fn test_affluent_homeowner_area() {
        let census = stats(Some(160_000), Some(45), Some(0.7), Some(0.05));
        let tags = classify(Some(&census), &[]);
        assert_eq!(tags, vec![VeryAffluent, HomeownerHeavy, LowPoverty]);
    }

    #[test]
    fn test_income_bands() {
        let tag_for = |income| classify(Some(&stats(Some(income), None, None, None)), &[]);
        assert_eq!(tag_for(150_000), vec![VeryAffluent]);
        assert_eq!(tag_for(149_999), vec![UpperMiddleIncome]);
        assert_eq!(tag_for(90_000), vec![UpperMiddleIncome]);
        assert_eq!(tag_for(55_000), vec![MiddleIncome]);
        assert_eq!(tag_for(54_999), vec![LowerIncome]);
        assert_eq!(tag_for(0), vec![LowerIncome]);
    }

    #[test]
    fn test_age_band_edges() {
        let tag_for = |age| classify(Some(&stats(None, Some(age), None, None)), &[]);
        assert_eq!(tag_for(31), vec![YoungerArea]);
        assert!(tag_for(32).is_empty());
        assert!(tag_for(50).is_empty());
        assert_eq!(tag_for(51), vec![OlderArea]);
    }

    #[test]
    fn test_housing_and_poverty_edges() {
        let tag_for = |owner, poverty| classify(Some(&stats(None, None, owner, poverty)), &[]);
        assert_eq!(tag_for(Some(0.65), None), vec![HomeownerHeavy]);
        assert_eq!(tag_for(Some(0.40), None), vec![RenterHeavy]);
        assert!(tag_for(Some(0.5), None).is_empty());
        assert_eq!(tag_for(None, Some(0.20)), vec![HighPoverty]);
        assert_eq!(tag_for(None, Some(0.08)), vec![LowPoverty]);
        assert!(tag_for(None, Some(0.12)).is_empty());
    }

    #[test]
    fn test_absent_inputs_are_not_zero() {
        // Zero income would tag lower_income; absent must not.
        assert!(classify(Some(&CensusStats::default()), &[]).is_empty());
        assert!(classify(None, &[]).is_empty());
    }

    #[test]
    fn test_keyword_rules() {
        let orgs = vec![
            org("Carlsbad Unified Booster Club"),
            org("Saint Mary Catholic Church"),
            org("Carlsbad Educational Foundation"),
            org("Rancho Coastal Humane Society"),
        ];
        let tags = classify(None, &orgs);
        assert_eq!(
            tags,
            vec![
                FaithCommunityPresent,
                PhilanthropyCulture,
                EducationPresent,
                AnimalWelfarePresent
            ]
        );
    }

    #[test]
    fn test_booster_club_alone_is_not_education() {
        // "booster" only feeds the recommendation slot, not the tag.
        let tags = classify(None, &[org("Carlsbad Unified Booster Club")]);
        assert!(tags.is_empty());
    }

    #[test]
    fn test_keyword_rule_counts_once() {
        let orgs = vec![org("First Baptist Church"), org("Grace Lutheran Church")];
        assert_eq!(classify(None, &orgs), vec![FaithCommunityPresent]);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let census = stats(Some(60_000), Some(29), Some(0.3), Some(0.25));
        let orgs = vec![org("Valley Animal Rescue"), org("Hillside Academy")];
        let first = classify(Some(&census), &orgs);
        let second = classify(Some(&census), &orgs);
        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                MiddleIncome,
                YoungerArea,
                RenterHeavy,
                HighPoverty,
                EducationPresent,
                AnimalWelfarePresent
            ]
        );
    }
}
