//! Core sizing types: reference records, caller inputs, and computed results.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Hours in one week; outage hours are expressed as a fraction of this.
pub const HOURS_PER_WEEK: f64 = 168.0;

/// Inverter topology, each with its own per-kW cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InverterType {
    /// Grid-tied, no backup.
    Grid,
    /// Grid-tied with battery backup.
    Hybrid,
    /// Standalone, no grid connection.
    Offgrid,
}

impl InverterType {
    /// All inverter types, in display order.
    pub const ALL: [InverterType; 3] = [Self::Grid, Self::Hybrid, Self::Offgrid];

    /// Lowercase label used in configuration and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Hybrid => "hybrid",
            Self::Offgrid => "offgrid",
        }
    }

    /// Parses a lowercase label.
    ///
    /// # Errors
    ///
    /// Returns a message listing the accepted labels if `s` is not one of them.
    pub fn parse(s: &str) -> Result<Self, String> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                format!("unknown inverter type \"{s}\", expected grid, hybrid or offgrid")
            })
    }
}

impl fmt::Display for InverterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of appliance kinds the load aggregator knows about.
///
/// Serialized by the human-readable label (e.g. `"AC 1.5 ton"`), which is
/// also the key used in the `[appliances]` configuration table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ApplianceKind {
    #[serde(rename = "AC 1.5 ton")]
    AirConditioner,
    #[serde(rename = "Fridge")]
    Fridge,
    #[serde(rename = "TV")]
    Television,
    #[serde(rename = "Fan")]
    Fan,
    #[serde(rename = "Light (LED)")]
    LedLight,
    #[serde(rename = "Washing Machine")]
    WashingMachine,
    #[serde(rename = "Laptop")]
    Laptop,
    #[serde(rename = "Monitor")]
    Monitor,
    #[serde(rename = "Other")]
    Other,
}

impl ApplianceKind {
    /// Every appliance kind, in form order. `index()` is the position here.
    pub const ALL: [ApplianceKind; 9] = [
        Self::AirConditioner,
        Self::Fridge,
        Self::Television,
        Self::Fan,
        Self::LedLight,
        Self::WashingMachine,
        Self::Laptop,
        Self::Monitor,
        Self::Other,
    ];

    /// Human-readable label, identical to the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            Self::AirConditioner => "AC 1.5 ton",
            Self::Fridge => "Fridge",
            Self::Television => "TV",
            Self::Fan => "Fan",
            Self::LedLight => "Light (LED)",
            Self::WashingMachine => "Washing Machine",
            Self::Laptop => "Laptop",
            Self::Monitor => "Monitor",
            Self::Other => "Other",
        }
    }

    /// Position of this kind in [`ApplianceKind::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Looks up a kind by its label, ignoring ASCII case.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for ApplianceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tariff and solar resource data for one city.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CityProfile {
    /// Grid import tariff (currency/kWh, > 0).
    pub grid_tariff: f64,
    /// Net-metering export rate (currency/kWh, >= 0).
    pub export_rate: f64,
    /// Average daily global horizontal irradiance (kWh/m²/day, > 0).
    pub irradiance: f64,
}

/// Rated power and typical daily use of one appliance kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ApplianceProfile {
    /// Rated power draw (W, > 0).
    pub rated_power_w: f64,
    /// Default operating hours per day (0 to 24).
    pub duty_hours_per_day: f64,
}

/// A roof-height band and the panel product recommended for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelHeightBand {
    /// Inclusive lower bound (m).
    pub min_height_m: f64,
    /// Inclusive upper bound (m).
    pub max_height_m: f64,
    pub panel_type: String,
    /// Recommended manufacturers, in preference order (non-empty).
    pub brands: Vec<String>,
    /// Typical module power class (W).
    pub wattage_w: u32,
    /// Module dimensions, opaque to the engine.
    pub dimensions_mm: String,
}

impl PanelHeightBand {
    /// Returns `true` if `height_m` lies within the inclusive range.
    pub fn contains(&self, height_m: f64) -> bool {
        self.min_height_m <= height_m && height_m <= self.max_height_m
    }

    /// Copies the descriptive fields into a recommendation.
    pub fn recommendation(&self) -> PanelRecommendation {
        PanelRecommendation {
            panel_type: self.panel_type.clone(),
            brands: self.brands.clone(),
            wattage_w: self.wattage_w,
            dimensions_mm: self.dimensions_mm.clone(),
        }
    }
}

/// Panel product recommendation for a roof height.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelRecommendation {
    pub panel_type: String,
    pub brands: Vec<String>,
    pub wattage_w: u32,
    pub dimensions_mm: String,
}

/// Quantity of each appliance kind in the household.
///
/// Kinds not present count as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadInput {
    quantities: BTreeMap<ApplianceKind, u32>,
}

impl LoadInput {
    /// Creates an empty load (all quantities zero).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the quantity for `kind`, replacing any previous value.
    pub fn with(mut self, kind: ApplianceKind, quantity: u32) -> Self {
        self.set(kind, quantity);
        self
    }

    pub fn set(&mut self, kind: ApplianceKind, quantity: u32) {
        self.quantities.insert(kind, quantity);
    }

    pub fn quantity(&self, kind: ApplianceKind) -> u32 {
        self.quantities.get(&kind).copied().unwrap_or(0)
    }

    /// Iterates over kinds with a non-zero quantity.
    pub fn iter(&self) -> impl Iterator<Item = (ApplianceKind, u32)> + '_ {
        self.quantities
            .iter()
            .filter(|(_, qty)| **qty > 0)
            .map(|(kind, qty)| (*kind, *qty))
    }
}

impl FromIterator<(ApplianceKind, u32)> for LoadInput {
    fn from_iter<I: IntoIterator<Item = (ApplianceKind, u32)>>(iter: I) -> Self {
        let mut load = Self::new();
        for (kind, qty) in iter {
            load.set(kind, qty);
        }
        load
    }
}

/// Site and system choices for one estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteInput {
    /// City key; unknown keys fall back to the `default` profile.
    pub city: String,
    /// Expected grid outage per week (hours, 0 to 168).
    pub outage_hours_per_week: f64,
    pub inverter_type: InverterType,
    /// Roof height above ground (m, >= 0).
    pub roof_height_m: f64,
}

impl SiteInput {
    /// Checks the ranges the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field as a `SizingError`.
    pub fn validate(&self) -> Result<(), SizingError> {
        check_outage_hours(self.outage_hours_per_week)?;
        if !self.roof_height_m.is_finite() || self.roof_height_m < 0.0 {
            return Err(SizingError::InvalidRoofHeight(self.roof_height_m));
        }
        Ok(())
    }
}

/// A complete system design for one set of inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizingResult {
    /// PV array capacity (kWp).
    pub pv_kw: f64,
    /// Subsidy deducted from the PV cost.
    pub subsidy: f64,
    /// PV array cost net of subsidy.
    pub pv_cost: f64,
    /// Rough roof area needed (m²).
    pub roof_area_m2: f64,
    pub inverter_type: InverterType,
    /// Inverter capacity (kW), sized 1:1 with the array.
    pub inverter_kw: f64,
    pub inverter_cost: f64,
    /// Backup battery capacity (kWh).
    pub battery_kwh: f64,
    pub battery_cost: f64,
    /// Yearly avoided grid cost.
    pub annual_savings: f64,
    /// Simple payback in years; `None` when there are no savings to pay it back.
    pub payback_years: Option<f64>,
}

impl SizingResult {
    /// Total capital cost: PV (net of subsidy) + inverter + battery.
    pub fn total_cost(&self) -> f64 {
        self.pv_cost + self.inverter_cost + self.battery_cost
    }
}

/// Input validation failure for a single calculation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizingError {
    /// Weekly outage hours outside `[0, 168]`.
    OutageHoursOutOfRange(f64),
    /// Irradiance must be strictly positive.
    NonPositiveIrradiance(f64),
    /// Grid tariff must be non-negative.
    NegativeTariff(f64),
    /// Daily energy must be finite and non-negative.
    InvalidDailyEnergy(f64),
    /// Roof height must be finite and non-negative.
    InvalidRoofHeight(f64),
}

impl fmt::Display for SizingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutageHoursOutOfRange(h) => {
                write!(f, "outage hours per week must be in [0, 168], got {h}")
            }
            Self::NonPositiveIrradiance(v) => write!(f, "irradiance must be > 0, got {v}"),
            Self::NegativeTariff(v) => write!(f, "grid tariff must be >= 0, got {v}"),
            Self::InvalidDailyEnergy(v) => {
                write!(f, "daily energy must be a finite value >= 0, got {v}")
            }
            Self::InvalidRoofHeight(v) => {
                write!(f, "roof height must be a finite value >= 0, got {v}")
            }
        }
    }
}

impl std::error::Error for SizingError {}

pub(crate) fn check_outage_hours(hours: f64) -> Result<(), SizingError> {
    if (0.0..=HOURS_PER_WEEK).contains(&hours) {
        Ok(())
    } else {
        Err(SizingError::OutageHoursOutOfRange(hours))
    }
}

pub(crate) fn check_daily_energy(kwh: f64) -> Result<(), SizingError> {
    if kwh.is_finite() && kwh >= 0.0 {
        Ok(())
    } else {
        Err(SizingError::InvalidDailyEnergy(kwh))
    }
}

/// Rounds to one decimal place, halves away from zero.
///
/// Scales before rounding, so a product that prints as `0.15` rounds to
/// `0.2` even when its nearest binary value sits just below the half.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
