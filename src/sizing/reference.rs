//! Read-only reference data store built from a validated configuration.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use super::types::{ApplianceKind, ApplianceProfile, CityProfile, PanelHeightBand};
use crate::config::{ConfigError, ReferenceConfig, SizingParameters};

/// Key of the city profile used when a lookup misses.
pub const DEFAULT_CITY: &str = "default";

/// Ordered, non-empty list of roof-height bands.
///
/// Only constructible through [`PanelBands::new`], so resolvers can rely on at
/// least one band being present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PanelBands(Vec<PanelHeightBand>);

impl PanelBands {
    /// Wraps an ordered band list.
    ///
    /// Returns `None` if `bands` is empty. Ordering and contiguity are checked
    /// by [`ReferenceConfig::validate`], not here.
    pub fn new(bands: Vec<PanelHeightBand>) -> Option<Self> {
        if bands.is_empty() {
            None
        } else {
            Some(Self(bands))
        }
    }

    pub fn first(&self) -> &PanelHeightBand {
        &self.0[0]
    }

    pub fn last(&self) -> &PanelHeightBand {
        &self.0[self.0.len() - 1]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PanelHeightBand> {
        self.0.iter()
    }
}

/// Immutable tariff, appliance, panel and cost tables.
///
/// Constructed once from a [`ReferenceConfig`] and then only read. Share it
/// by reference or inside an `Arc`; nothing mutates it after construction.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    cities: BTreeMap<String, CityProfile>,
    default_city: CityProfile,
    /// Indexed by [`ApplianceKind::index`]; complete by construction.
    appliances: Vec<ApplianceProfile>,
    panel_bands: PanelBands,
    parameters: SizingParameters,
}

impl ReferenceData {
    /// Validates `config` and builds the store from it.
    ///
    /// City keys are lowercased.
    ///
    /// # Errors
    ///
    /// Returns every validation error found in `config`.
    pub fn from_config(config: &ReferenceConfig) -> Result<Self, Vec<ConfigError>> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        let cities = config
            .cities
            .iter()
            .map(|(name, c)| {
                (
                    name.to_lowercase(),
                    CityProfile {
                        grid_tariff: c.grid_tariff,
                        export_rate: c.export_rate,
                        irradiance: c.irradiance,
                    },
                )
            })
            .collect::<BTreeMap<_, _>>();
        let Some(default_city) = cities.get(DEFAULT_CITY).copied() else {
            return Err(vec![ConfigError {
                field: format!("cities.{DEFAULT_CITY}"),
                message: "missing fallback profile".into(),
            }]);
        };

        let mut appliances = Vec::with_capacity(ApplianceKind::ALL.len());
        for kind in ApplianceKind::ALL {
            let Some(a) = config.appliances.get(&kind) else {
                return Err(vec![ConfigError {
                    field: format!("appliances.\"{kind}\""),
                    message: "missing profile".into(),
                }]);
            };
            appliances.push(ApplianceProfile {
                rated_power_w: a.rated_power_w,
                duty_hours_per_day: a.duty_hours_per_day,
            });
        }

        let bands = config
            .panel_bands
            .iter()
            .map(|b| PanelHeightBand {
                min_height_m: b.min_height_m,
                max_height_m: b.max_height_m,
                panel_type: b.panel_type.clone(),
                brands: b.brands.clone(),
                wattage_w: b.wattage_w,
                dimensions_mm: b.dimensions_mm.clone(),
            })
            .collect();
        let panel_bands = PanelBands::new(bands).ok_or_else(|| {
            vec![ConfigError {
                field: "panel_bands".into(),
                message: "at least one band is required".into(),
            }]
        })?;

        Ok(Self {
            cities,
            default_city,
            appliances,
            panel_bands,
            parameters: config.sizing.clone(),
        })
    }

    /// Built-in reference data.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in tables themselves are inconsistent.
    pub fn reference() -> Result<Self, Vec<ConfigError>> {
        Self::from_config(&ReferenceConfig::reference())
    }

    /// Profile for `key`, or the `default` profile when the city is unknown.
    pub fn city_profile(&self, key: &str) -> CityProfile {
        self.resolve_city(key).1
    }

    /// Like [`city_profile`](Self::city_profile), also returning the key that
    /// was actually used.
    pub fn resolve_city(&self, key: &str) -> (&str, CityProfile) {
        let normalized = key.trim().to_lowercase();
        if let Some((name, profile)) = self.cities.get_key_value(&normalized) {
            return (name.as_str(), *profile);
        }
        warn!(city = key, "unknown city, using default profile");
        (DEFAULT_CITY, self.default_city)
    }

    /// City keys offered to callers, excluding `default`.
    pub fn city_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.cities
            .keys()
            .map(String::as_str)
            .filter(|name| *name != DEFAULT_CITY)
    }

    pub fn appliance_profile(&self, kind: ApplianceKind) -> ApplianceProfile {
        self.appliances[kind.index()]
    }

    /// Profile table indexed by kind, for the load aggregator.
    pub fn appliance_profiles(&self) -> &[ApplianceProfile] {
        &self.appliances
    }

    pub fn panel_bands(&self) -> &PanelBands {
        &self.panel_bands
    }

    pub fn parameters(&self) -> &SizingParameters {
        &self.parameters
    }
}
