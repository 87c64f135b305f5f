//! Templated tax-deduction ideas built from the profile's nonprofits and tags.
//!
//! Slots, in order:
//! 1. education (always attempted)
//! 2. faith (only when `faith_community_present`)
//! 3. animal welfare when tagged, otherwise environment
//! 4. a generic fallback naming the first nonprofit, while fewer than 3
//!
//! The fallback may repeat an organization already used by an earlier slot.

use crate::models::profile::{NonprofitRecord, Profile, PsychographicTag, Recommendation};

pub const MAX_RECOMMENDATIONS: usize = 3;

const EDUCATION_KEYWORDS: &[&str] = &[
    "school",
    "academy",
    "education",
    "pta",
    "band",
    "booster",
    "lancer",
];

const FAITH_KEYWORDS: &[&str] = &[
    "church",
    "catholic",
    "temple",
    "synagogue",
    "mosque",
    "ministries",
];

const ANIMAL_KEYWORDS: &[&str] = &["animal", "rescue", "humane", "spca"];

const ENVIRONMENT_KEYWORDS: &[&str] = &[
    "conservation",
    "ecolife",
    "habitat",
    "environment",
    "lagoon",
];

pub fn recommend(profile: &Profile) -> Vec<Recommendation> {
    let nonprofits = &profile.nonprofits;
    let zip = profile.zip.as_str();
    // Prose refers to the city when known, else the ZIP itself.
    let place = profile.location.city.as_deref().unwrap_or(zip);

    let mut recs = Vec::new();

    if let Some(org) = find_org(nonprofits, EDUCATION_KEYWORDS) {
        recs.push(education(org, zip, place));
    }

    if profile.has_tag(PsychographicTag::FaithCommunityPresent) {
        if let Some(org) = find_org(nonprofits, FAITH_KEYWORDS) {
            recs.push(faith(org));
        }
    }

    let animal_org = if profile.has_tag(PsychographicTag::AnimalWelfarePresent) {
        find_org(nonprofits, ANIMAL_KEYWORDS)
    } else {
        None
    };
    if let Some(org) = animal_org.or_else(|| find_org(nonprofits, ENVIRONMENT_KEYWORDS)) {
        recs.push(environment(org, place));
    }

    if recs.len() < MAX_RECOMMENDATIONS {
        if let Some(first) = nonprofits.first() {
            recs.push(fallback(first, nonprofits.len(), zip));
        }
    }

    recs.truncate(MAX_RECOMMENDATIONS);
    recs
}

/// First nonprofit whose lower-cased name contains any keyword.
fn find_org<'a>(nonprofits: &'a [NonprofitRecord], keywords: &[&str]) -> Option<&'a NonprofitRecord> {
    nonprofits.iter().find(|org| {
        let name = org.name.to_lowercase();
        keywords.iter().any(|k| name.contains(k))
    })
}

fn education(org: &NonprofitRecord, zip: &str, place: &str) -> Recommendation {
    Recommendation {
        title: format!("Support Local Education in {zip}"),
        description: format!(
            "Consider supporting **{}** in {}, {}. They support students, school programs, \
             or youth enrichment—big priorities in communities like {place}.",
            org.name, org.city, org.state
        ),
        tax_angle: "Most school-focused 501(c)(3) organizations qualify for tax-deductible \
                    donations if you itemize deductions."
            .to_string(),
    }
}

fn faith(org: &NonprofitRecord) -> Recommendation {
    Recommendation {
        title: "Give Through a Local Faith or Community Organization".to_string(),
        description: format!(
            "**{}** in {}, {} appears in your area's nonprofit list. Faith-based orgs often \
             run food drives, youth programs, and aid funds.",
            org.name, org.city, org.state
        ),
        tax_angle: "Most qualifying faith-based organizations are automatically treated as \
                    501(c)(3)s, making tithes and general donations tax-deductible when itemizing."
            .to_string(),
    }
}

fn environment(org: &NonprofitRecord, place: &str) -> Recommendation {
    Recommendation {
        title: "Support Local Environmental or Animal Efforts".to_string(),
        description: format!(
            "In areas like {place}, nature and animal groups make a big impact. **{}** in {}, {} \
             is one local organization working in this space.",
            org.name, org.city, org.state
        ),
        tax_angle: "Donations to recognized environmental and animal 501(c)(3) groups are \
                    typically eligible for itemized charitable deductions."
            .to_string(),
    }
}

fn fallback(org: &NonprofitRecord, total: usize, zip: &str) -> Recommendation {
    Recommendation {
        title: "Support a Local Nonprofit in Your ZIP".to_string(),
        description: format!(
            "There are {total} IRS-registered nonprofits in {zip}. One example is **{}** in {}, {}.",
            org.name, org.city, org.state
        ),
        tax_angle: "Most donations to registered 501(c)(3) nonprofits qualify for tax deductions \
                    if you itemize and keep proper documentation."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::area::AreaCode;
    use crate::models::profile::LocationRef;
    use crate::profile::classifier::classify;

    fn org(name: &str) -> NonprofitRecord {
        NonprofitRecord {
            name: name.to_string(),
            city: "Carlsbad".to_string(),
            state: "CA".to_string(),
            ..Default::default()
        }
    }

    fn profile_with(names: &[&str], city: Option<&str>) -> Profile {
        let nonprofits: Vec<NonprofitRecord> = names.iter().map(|n| org(n)).collect();
        let psychographics = classify(None, &nonprofits);
        let location = LocationRef {
            city: city.map(str::to_string),
            state: city.map(|_| "CA".to_string()),
        };
        Profile {
            zip: AreaCode::parse("92008").unwrap(),
            census: None,
            area_label: location.area_label(),
            location,
            nonprofits,
            psychographics,
        }
    }

    #[test]
    fn test_booster_club_then_church() {
        let profile = profile_with(
            &["Carlsbad Unified Booster Club", "Saint Mary Catholic Church"],
            Some("Carlsbad"),
        );
        let recs = recommend(&profile);

        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].title, "Support Local Education in 92008");
        assert!(recs[0].description.contains("**Carlsbad Unified Booster Club**"));
        assert!(recs[0].description.contains("communities like Carlsbad."));
        assert_eq!(
            recs[1].title,
            "Give Through a Local Faith or Community Organization"
        );
        assert!(recs[1].description.contains("**Saint Mary Catholic Church**"));
        // Fallback repeats the first organization.
        assert_eq!(recs[2].title, "Support a Local Nonprofit in Your ZIP");
        assert!(recs[2]
            .description
            .starts_with("There are 2 IRS-registered nonprofits in 92008."));
        assert!(recs[2].description.contains("**Carlsbad Unified Booster Club**"));
    }

    #[test]
    fn test_empty_nonprofits_yield_nothing() {
        let profile = profile_with(&[], None);
        assert!(recommend(&profile).is_empty());
    }

    #[test]
    fn test_faith_slot_requires_tag() {
        let mut profile = profile_with(&["Saint Mary Catholic Church"], None);
        profile.psychographics.clear();
        let recs = recommend(&profile);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].title, "Support a Local Nonprofit in Your ZIP");
    }

    #[test]
    fn test_animal_preferred_over_environment_when_tagged() {
        let profile = profile_with(&["Batiquitos Lagoon Foundation", "Coastal Animal Rescue"], None);
        let recs = recommend(&profile);
        assert_eq!(recs[0].title, "Support Local Environmental or Animal Efforts");
        assert!(recs[0].description.contains("**Coastal Animal Rescue**"));
        assert!(recs[0].description.starts_with("In areas like 92008,"));
    }

    #[test]
    fn test_environment_used_without_animal_tag() {
        let mut profile = profile_with(&["Coastal Animal Rescue", "Batiquitos Lagoon Foundation"], None);
        profile
            .psychographics
            .retain(|t| *t != PsychographicTag::AnimalWelfarePresent);
        let recs = recommend(&profile);
        assert!(recs[0].description.contains("**Batiquitos Lagoon Foundation**"));
    }

    #[test]
    fn test_never_more_than_three() {
        let profile = profile_with(
            &[
                "La Costa Canyon Lancer Band",
                "St Elizabeth Seton Catholic Church",
                "Rancho Coastal Humane Society",
                "Agua Hedionda Lagoon Foundation",
            ],
            Some("Carlsbad"),
        );
        let recs = recommend(&profile);
        assert_eq!(recs.len(), MAX_RECOMMENDATIONS);
        assert!(recs
            .iter()
            .all(|r| r.title != "Support a Local Nonprofit in Your ZIP"));
    }
}
