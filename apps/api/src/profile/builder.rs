use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Config;
use crate::models::area::AreaCode;
use crate::models::profile::{LocationRef, NonprofitRecord, Profile};
use crate::profile::classifier::classify;
use crate::sources::census::CensusClient;
use crate::sources::geocode::GeocoderClient;
use crate::sources::nonprofits::NonprofitRegistry;
use crate::sources::{CensusSource, GeocodeSource, Lookup, NonprofitSource, SourceError};

/// Assembles a [`Profile`] from the three sources. Cheap to clone; every
/// source is shared behind an `Arc`.
#[derive(Clone)]
pub struct ProfileBuilder {
    census: Arc<dyn CensusSource>,
    geocoder: Arc<dyn GeocodeSource>,
    nonprofits: Arc<dyn NonprofitSource>,
}

impl ProfileBuilder {
    pub fn new(
        census: Arc<dyn CensusSource>,
        geocoder: Arc<dyn GeocodeSource>,
        nonprofits: Arc<dyn NonprofitSource>,
    ) -> Self {
        Self {
            census,
            geocoder,
            nonprofits,
        }
    }

    /// Wires the real census, geocoder and BMF sources from configuration.
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        if config.census_api_key.is_none() {
            tracing::warn!("CENSUS_API_KEY is not set; census statistics will be unavailable");
        }

        Ok(Self::new(
            Arc::new(CensusClient::new(
                config.census_api_key.clone(),
                config.lookup_timeout,
            )?),
            Arc::new(GeocoderClient::new(config.lookup_timeout)?),
            Arc::new(NonprofitRegistry::new(config.bmf_path.clone())),
        ))
    }

    /// Never fails: an absent lookup degrades to `None` or an empty list.
    pub async fn build(&self, area: &AreaCode) -> Profile {
        // Independent lookups; join! waits for all three before anything is merged.
        let (census, location, nonprofits) = tokio::join!(
            self.census.fetch(area),
            self.geocoder.resolve(area),
            self.nonprofits.find_by_zip(area),
        );

        let census = census.found();
        let location = unwrap_or_absent("geocoder", area, location);
        let nonprofits = unwrap_or_absent("irs_bmf", area, nonprofits);

        let location = fill_location_from_nonprofits(location, &nonprofits);
        let area_label = location.area_label();
        let psychographics = classify(census.as_ref(), &nonprofits);

        info!(
            zip = %area,
            has_census = census.is_some(),
            nonprofits = nonprofits.len(),
            tags = psychographics.len(),
            "profile assembled for {area_label}"
        );

        Profile {
            zip: area.clone(),
            census,
            location,
            nonprofits,
            psychographics,
            area_label,
        }
    }
}

fn unwrap_or_absent<T: Default>(source: &str, area: &AreaCode, lookup: Lookup<T>) -> T {
    match lookup {
        Lookup::Found(value) => value,
        Lookup::Absent(reason) => {
            debug!(source, zip = %area, "using empty value: {reason}");
            T::default()
        }
    }
}

/// Fills only the missing city/state from the first non-empty values among
/// the nonprofits. Present fields are never replaced.
fn fill_location_from_nonprofits(
    mut location: LocationRef,
    nonprofits: &[NonprofitRecord],
) -> LocationRef {
    if location.city.is_none() {
        location.city = first_non_empty(nonprofits.iter().map(|n| n.city.as_str()));
    }
    if location.state.is_none() {
        location.state = first_non_empty(nonprofits.iter().map(|n| n.state.as_str()));
    }
    location
}

fn first_non_empty<'a>(mut values: impl Iterator<Item = &'a str>) -> Option<String> {
    values.find(|v| !v.trim().is_empty()).map(str::to_string)
}
