//! TOML-based reference data configuration and the built-in preset.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sizing::types::{ApplianceKind, InverterType};

/// Reference data: cost constants, city tariffs, appliance profiles and
/// roof-height panel bands.
///
/// Sections left out of a TOML file keep the built-in reference values. Load
/// with [`ReferenceConfig::from_toml_file`] or use
/// [`ReferenceConfig::reference`] for the built-in data.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceConfig {
    /// Cost and technology constants.
    pub sizing: SizingParameters,
    /// City name → tariff and irradiance. Must contain `default`.
    pub cities: BTreeMap<String, CityConfig>,
    /// Appliance label → rated power and duty hours. Must cover every kind.
    pub appliances: BTreeMap<ApplianceKind, ApplianceConfig>,
    /// Roof-height bands in ascending order.
    pub panel_bands: Vec<PanelBandConfig>,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self::reference()
    }
}

/// Cost and technology constants used by the sizing calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizingParameters {
    /// Fraction of nameplate output delivered after system losses (0.0–1.0].
    pub derate_factor: f64,
    /// PV array cost per kWp.
    pub panel_cost_per_kw: f64,
    /// Inverter cost per kW, by inverter type.
    pub inverter_cost_per_kw: InverterCosts,
    /// Battery cost per kWh.
    pub battery_cost_per_kwh: f64,
    /// Array size (kW) up to which the subsidy scales linearly.
    pub subsidy_flat_kw: f64,
    /// Subsidy paid for the first `subsidy_flat_kw` of array.
    pub subsidy_first_tier: f64,
    /// Roof area needed per kWp (m²).
    pub roof_area_per_kw_m2: f64,
}

impl Default for SizingParameters {
    fn default() -> Self {
        Self {
            derate_factor: 0.80,
            panel_cost_per_kw: 45_000.0,
            inverter_cost_per_kw: InverterCosts::default(),
            battery_cost_per_kwh: 13_000.0,
            subsidy_flat_kw: 3.0,
            subsidy_first_tier: 26_000.0,
            roof_area_per_kw_m2: 7.0,
        }
    }
}

/// Per-kW inverter cost for each inverter type.
///
/// Every type must be listed; a missing entry is a TOML parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InverterCosts {
    pub grid: f64,
    pub hybrid: f64,
    pub offgrid: f64,
}

impl InverterCosts {
    /// Unit cost for `inverter_type`.
    pub fn per_kw(&self, inverter_type: InverterType) -> f64 {
        match inverter_type {
            InverterType::Grid => self.grid,
            InverterType::Hybrid => self.hybrid,
            InverterType::Offgrid => self.offgrid,
        }
    }
}

impl Default for InverterCosts {
    fn default() -> Self {
        Self {
            grid: 12_000.0,
            hybrid: 20_000.0,
            offgrid: 18_000.0,
        }
    }
}

/// Tariff and irradiance entry for one city.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CityConfig {
    /// Grid import tariff per kWh (> 0).
    pub grid_tariff: f64,
    /// Net-metering export rate per kWh (>= 0).
    pub export_rate: f64,
    /// Daily irradiance (kWh/m²/day, > 0).
    pub irradiance: f64,
}

/// Rated power and default duty hours for one appliance kind.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplianceConfig {
    /// Rated power (W, > 0).
    pub rated_power_w: f64,
    /// Default daily operating hours (0–24).
    pub duty_hours_per_day: f64,
}

/// One roof-height band and its recommended module.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelBandConfig {
    /// Inclusive lower bound (m).
    pub min_height_m: f64,
    /// Inclusive upper bound (m).
    pub max_height_m: f64,
    pub panel_type: String,
    pub brands: Vec<String>,
    pub wattage_w: u32,
    pub dimensions_mm: String,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"cities.pune.irradiance"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

fn city(grid_tariff: f64, export_rate: f64, irradiance: f64) -> CityConfig {
    CityConfig {
        grid_tariff,
        export_rate,
        irradiance,
    }
}

fn appliance(rated_power_w: f64, duty_hours_per_day: f64) -> ApplianceConfig {
    ApplianceConfig {
        rated_power_w,
        duty_hours_per_day,
    }
}

fn band(
    (min_height_m, max_height_m): (f64, f64),
    panel_type: &str,
    brands: &[&str],
    wattage_w: u32,
    dimensions_mm: &str,
) -> PanelBandConfig {
    PanelBandConfig {
        min_height_m,
        max_height_m,
        panel_type: panel_type.to_string(),
        brands: brands.iter().map(|b| (*b).to_string()).collect(),
        wattage_w,
        dimensions_mm: dimensions_mm.to_string(),
    }
}

impl ReferenceConfig {
    /// Built-in reference data for Indian residential rooftop systems (2025).
    pub fn reference() -> Self {
        let cities = [
            ("pune", city(6.85, 3.90, 5.5)),
            ("mumbai", city(6.85, 3.90, 5.0)),
            ("delhi", city(5.50, 5.50, 5.3)),
            ("bangalore", city(7.00, 3.82, 5.1)),
            ("hyderabad", city(6.65, 3.15, 5.4)),
            ("chennai", city(5.80, 3.15, 5.3)),
            ("kolkata", city(6.10, 3.15, 4.5)),
            ("jaipur", city(6.50, 3.10, 5.7)),
            ("ahmedabad", city(6.10, 2.25, 5.8)),
            ("surat", city(6.10, 2.25, 5.6)),
            ("coimbatore", city(5.80, 3.15, 5.2)),
            ("lucknow", city(7.10, 3.82, 5.2)),
            ("gurgaon", city(6.00, 5.50, 5.3)),
            ("vadodara", city(6.10, 2.25, 5.7)),
            ("nagpur", city(6.85, 3.90, 5.6)),
            ("visakhapatnam", city(5.80, 3.15, 5.1)),
            ("indore", city(7.00, 3.90, 5.5)),
            ("bhubaneswar", city(6.10, 3.90, 5.2)),
            ("varanasi", city(7.10, 3.82, 5.1)),
            ("default", city(6.85, 3.90, 5.0)),
        ]
        .into_iter()
        .map(|(name, c)| (name.to_string(), c))
        .collect();

        let appliances = [
            (ApplianceKind::AirConditioner, appliance(1600.0, 6.0)),
            (ApplianceKind::Fridge, appliance(150.0, 24.0)),
            (ApplianceKind::Television, appliance(120.0, 4.0)),
            (ApplianceKind::Fan, appliance(60.0, 8.0)),
            (ApplianceKind::LedLight, appliance(15.0, 6.0)),
            (ApplianceKind::WashingMachine, appliance(500.0, 0.5)),
            (ApplianceKind::Laptop, appliance(60.0, 4.0)),
            (ApplianceKind::Monitor, appliance(30.0, 4.0)),
            (ApplianceKind::Other, appliance(100.0, 4.0)),
        ]
        .into_iter()
        .collect();

        // Adjacent bands share their boundary; the lower band wins on ties.
        let panel_bands = vec![
            band(
                (3.0, 15.0),
                "Mono PERC / Bifacial",
                &["LONGi", "JA Solar", "Jinko"],
                490,
                "2000 x 1134 x 32",
            ),
            band(
                (15.0, 30.0),
                "Half-cut Mono PERC / TOPCon",
                &["Trina", "Jinko", "Canadian Solar"],
                535,
                "2278 x 1134 x 35",
            ),
            band(
                (30.0, 45.0),
                "TOPCon / HJT",
                &["LONGi", "JA Solar", "Trina"],
                575,
                "2384 x 1096 x 35",
            ),
            band(
                (45.0, 60.0),
                "HJT / Bifacial (reinforced)",
                &["LONGi", "JA Solar", "Canadian Solar"],
                600,
                "2384 x 1134 x 35",
            ),
            band(
                (60.0, 75.0),
                "HJT / CdTe Thin-film",
                &["First Solar", "Trina"],
                565,
                "2200 x 1190 x 35",
            ),
            band(
                (75.0, 90.0),
                "CdTe Thin-film / Reinforced HJT",
                &["First Solar", "LONGi"],
                565,
                "2200 x 1190 x 38",
            ),
        ];

        Self {
            sizing: SizingParameters::default(),
            cities,
            appliances,
            panel_bands,
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["reference"];

    /// Loads reference data from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "reference" => Ok(Self::reference()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses reference data from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses reference data from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid, contains unknown fields
    /// or names an unknown appliance.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut push = |field: String, message: &str| {
            errors.push(ConfigError {
                field,
                message: message.to_string(),
            });
        };

        let s = &self.sizing;
        if !positive(s.derate_factor) || s.derate_factor > 1.0 {
            push("sizing.derate_factor".into(), "must be in (0.0, 1.0]");
        }
        if !non_negative(s.panel_cost_per_kw) {
            push("sizing.panel_cost_per_kw".into(), "must be finite and >= 0");
        }
        for t in InverterType::ALL {
            if !non_negative(s.inverter_cost_per_kw.per_kw(t)) {
                push(format!("sizing.inverter_cost_per_kw.{t}"), "must be finite and >= 0");
            }
        }
        if !non_negative(s.battery_cost_per_kwh) {
            push("sizing.battery_cost_per_kwh".into(), "must be finite and >= 0");
        }
        if !positive(s.subsidy_flat_kw) {
            push("sizing.subsidy_flat_kw".into(), "must be finite and > 0");
        }
        if !non_negative(s.subsidy_first_tier) {
            push("sizing.subsidy_first_tier".into(), "must be finite and >= 0");
        } else if s.subsidy_first_tier > s.subsidy_flat_kw * s.panel_cost_per_kw {
            push(
                "sizing.subsidy_first_tier".into(),
                "must not exceed the panel cost of sizing.subsidy_flat_kw",
            );
        }
        if !non_negative(s.roof_area_per_kw_m2) {
            push("sizing.roof_area_per_kw_m2".into(), "must be finite and >= 0");
        }

        if !self.cities.keys().any(|k| k.to_lowercase() == "default") {
            push("cities.default".into(), "a default profile is required");
        }
        let mut seen = BTreeMap::new();
        for (name, c) in &self.cities {
            if let Some(other) = seen.insert(name.to_lowercase(), name) {
                push(
                    format!("cities.{name}"),
                    &format!("duplicates \"{other}\" ignoring case"),
                );
            }
            if !positive(c.grid_tariff) {
                push(format!("cities.{name}.grid_tariff"), "must be finite and > 0");
            }
            if !non_negative(c.export_rate) {
                push(format!("cities.{name}.export_rate"), "must be finite and >= 0");
            }
            if !positive(c.irradiance) {
                push(format!("cities.{name}.irradiance"), "must be finite and > 0");
            }
        }

        for kind in ApplianceKind::ALL {
            let Some(a) = self.appliances.get(&kind) else {
                push(format!("appliances.\"{kind}\""), "missing profile");
                continue;
            };
            if !positive(a.rated_power_w) {
                push(format!("appliances.\"{kind}\".rated_power_w"), "must be finite and > 0");
            }
            if !(0.0..=24.0).contains(&a.duty_hours_per_day) {
                push(
                    format!("appliances.\"{kind}\".duty_hours_per_day"),
                    "must be in [0, 24]",
                );
            }
        }

        if self.panel_bands.is_empty() {
            push("panel_bands".into(), "at least one band is required");
        }
        for (i, b) in self.panel_bands.iter().enumerate() {
            if !non_negative(b.min_height_m) {
                push(format!("panel_bands[{i}].min_height_m"), "must be finite and >= 0");
            }
            if !non_negative(b.max_height_m) {
                push(format!("panel_bands[{i}].max_height_m"), "must be finite and >= 0");
            } else if b.min_height_m > b.max_height_m {
                push(
                    format!("panel_bands[{i}].min_height_m"),
                    "must be <= max_height_m",
                );
            }
            if b.brands.is_empty() {
                push(format!("panel_bands[{i}].brands"), "must not be empty");
            }
            if b.wattage_w == 0 {
                push(format!("panel_bands[{i}].wattage_w"), "must be finite and > 0");
            }
        }
        for (i, pair) in self.panel_bands.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.min_height_m > prev.max_height_m {
                push(
                    format!("panel_bands[{}].min_height_m", i + 1),
                    "leaves a gap after the previous band",
                );
            } else if next.min_height_m < prev.max_height_m {
                push(
                    format!("panel_bands[{}].min_height_m", i + 1),
                    "overlaps the previous band",
                );
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_preset_valid() {
        let cfg = ReferenceConfig::reference();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "reference should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_reference() {
        let cfg = ReferenceConfig::from_preset("reference");
        assert!(cfg.is_ok());
    }

    #[test]
    fn from_preset_unknown() {
        let err = ReferenceConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[sizing]
derate_factor = 0.75
panel_cost_per_kw = 50000.0
battery_cost_per_kwh = 12000.0
subsidy_flat_kw = 2.0
subsidy_first_tier = 30000.0
roof_area_per_kw_m2 = 6.5

[sizing.inverter_cost_per_kw]
grid = 10000.0
hybrid = 21000.0
offgrid = 19000.0

[cities.default]
grid_tariff = 8.0
export_rate = 4.0
irradiance = 4.8

[cities.Pune]
grid_tariff = 7.0
export_rate = 3.5
irradiance = 5.6

[appliances."AC 1.5 ton"]
rated_power_w = 1500.0
duty_hours_per_day = 5.0

[[panel_bands]]
min_height_m = 0.0
max_height_m = 20.0
panel_type = "Mono PERC"
brands = ["LONGi"]
wattage_w = 500
dimensions_mm = "2000 x 1134 x 32"

[[panel_bands]]
min_height_m = 20.0
max_height_m = 100.0
panel_type = "TOPCon"
brands = ["Trina", "Jinko"]
wattage_w = 580
dimensions_mm = "2384 x 1096 x 35"
"#;
        let cfg = ReferenceConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.sizing.derate_factor), Some(0.75));
        assert_eq!(
            cfg.as_ref().map(|c| c.sizing.inverter_cost_per_kw.hybrid),
            Some(21000.0)
        );
        assert_eq!(cfg.as_ref().map(|c| c.cities.len()), Some(2));
        assert_eq!(cfg.as_ref().map(|c| c.panel_bands.len()), Some(2));
        // only one appliance listed, so the table is incomplete
        let errors = cfg.map(|c| c.validate()).unwrap_or_default();
        assert!(errors.iter().any(|e| e.field == "appliances.\"Fridge\""));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[sizing]
derate_factor = 0.8
bogus_field = true
"#;
        let result = ReferenceConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_appliance_label_is_rejected() {
        let toml = r#"
[appliances.Toaster]
rated_power_w = 800.0
duty_hours_per_day = 0.2
"#;
        assert!(ReferenceConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn missing_inverter_cost_is_rejected() {
        let toml = r#"
[sizing.inverter_cost_per_kw]
grid = 10000.0
hybrid = 21000.0
"#;
        assert!(ReferenceConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[sizing]
panel_cost_per_kw = 40000.0
"#;
        let cfg = ReferenceConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        // cost overridden
        assert_eq!(
            cfg.as_ref().map(|c| c.sizing.panel_cost_per_kw),
            Some(40000.0)
        );
        // other constants kept
        assert_eq!(cfg.as_ref().map(|c| c.sizing.derate_factor), Some(0.80));
        // reference tables kept
        assert_eq!(cfg.as_ref().map(|c| c.cities.len()), Some(20));
        assert_eq!(cfg.as_ref().map(|c| c.panel_bands.len()), Some(6));
    }

    #[test]
    fn validation_catches_missing_default_city() {
        let mut cfg = ReferenceConfig::reference();
        cfg.cities.remove("default");
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "cities.default"));
    }

    #[test]
    fn validation_catches_case_duplicate_cities() {
        let mut cfg = ReferenceConfig::reference();
        cfg.cities.insert("Pune".into(), city(7.0, 3.0, 5.0));
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.message.contains("ignoring case")));
    }

    #[test]
    fn validation_catches_non_positive_irradiance() {
        let mut cfg = ReferenceConfig::reference();
        if let Some(c) = cfg.cities.get_mut("kolkata") {
            c.irradiance = 0.0;
        }
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "cities.kolkata.irradiance"));
    }

    #[test]
    fn validation_catches_non_finite_values() {
        let toml = r#"
[cities.default]
grid_tariff = 6.85
export_rate = 3.9
irradiance = inf
"#;
        let mut cfg = ReferenceConfig::from_toml_str(toml).unwrap();
        cfg.sizing.battery_cost_per_kwh = f64::INFINITY;
        cfg.cities.insert("pune".into(), city(f64::INFINITY, 3.9, 5.5));
        let last = cfg.panel_bands.len() - 1;
        cfg.panel_bands[last].max_height_m = f64::INFINITY;

        let errors = cfg.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"cities.default.irradiance"), "{fields:?}");
        assert!(fields.contains(&"sizing.battery_cost_per_kwh"), "{fields:?}");
        assert!(fields.contains(&"cities.pune.grid_tariff"), "{fields:?}");
        assert!(
            fields.contains(&format!("panel_bands[{last}].max_height_m").as_str()),
            "{fields:?}"
        );
    }

    #[test]
    fn validation_catches_duty_hours_over_a_day() {
        let mut cfg = ReferenceConfig::reference();
        cfg.appliances
            .insert(ApplianceKind::Fan, appliance(60.0, 25.0));
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "appliances.\"Fan\".duty_hours_per_day")
        );
    }

    #[test]
    fn validation_catches_band_gap() {
        let mut cfg = ReferenceConfig::reference();
        cfg.panel_bands[1].min_height_m = 16.0;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "panel_bands[1].min_height_m" && e.message.contains("gap"))
        );
    }

    #[test]
    fn validation_catches_band_overlap() {
        let mut cfg = ReferenceConfig::reference();
        cfg.panel_bands[2].min_height_m = 25.0;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "panel_bands[2].min_height_m" && e.message.contains("overlap"))
        );
    }

    #[test]
    fn validation_catches_empty_brands() {
        let mut cfg = ReferenceConfig::reference();
        cfg.panel_bands[0].brands.clear();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "panel_bands[0].brands"));
    }

    #[test]
    fn validation_catches_subsidy_above_panel_cost() {
        let mut cfg = ReferenceConfig::reference();
        cfg.sizing.subsidy_first_tier = 1_000_000.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "sizing.subsidy_first_tier"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ReferenceConfig::PRESETS {
            let cfg = ReferenceConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }
}
