//! End-to-end estimate: load aggregation, city lookup, sizing and panel choice.

use std::fmt;

use serde::Serialize;
use tracing::info;

use super::calculator::SizingCalculator;
use super::load::daily_energy_kwh;
use super::panel::recommend_panel;
use super::reference::ReferenceData;
use super::types::{
    CityProfile, LoadInput, PanelRecommendation, SiteInput, SizingError, SizingResult,
};

/// Currency units per lakh, for the report.
const LAKH: f64 = 1e5;

/// Runs the full estimation pipeline against injected reference data.
#[derive(Debug, Clone)]
pub struct Estimator {
    reference: ReferenceData,
    calculator: SizingCalculator,
}

/// Result of one estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    /// Household consumption (kWh/day).
    pub daily_energy_kwh: f64,
    /// City key actually used (`"default"` when the requested city is unknown).
    pub city: String,
    pub city_profile: CityProfile,
    pub design: SizingResult,
    pub panel: PanelRecommendation,
}

impl Estimator {
    pub fn new(reference: ReferenceData) -> Self {
        let calculator = SizingCalculator::new(reference.parameters().clone());
        Self {
            reference,
            calculator,
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Estimates a system for `load` at `site`.
    ///
    /// # Errors
    ///
    /// Returns a `SizingError` if the site input is out of range.
    pub fn estimate(&self, load: &LoadInput, site: &SiteInput) -> Result<Estimate, SizingError> {
        site.validate()?;

        let daily = daily_energy_kwh(load, self.reference.appliance_profiles());
        let (city, profile) = self.reference.resolve_city(&site.city);
        let design = self.calculator.compute_design(
            daily,
            profile.irradiance,
            site.outage_hours_per_week,
            profile.grid_tariff,
            site.inverter_type,
        )?;
        let panel = recommend_panel(site.roof_height_m, self.reference.panel_bands());

        info!(
            city,
            daily_energy_kwh = daily,
            pv_kw = design.pv_kw,
            battery_kwh = design.battery_kwh,
            panel = %panel.panel_type,
            "estimate complete"
        );

        Ok(Estimate {
            daily_energy_kwh: daily,
            city: city.to_string(),
            city_profile: profile,
            design,
            panel,
        })
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.design;
        let c = &self.city_profile;
        writeln!(f, "--- Results ({}) ---", self.city)?;
        writeln!(f, "Daily energy need:     {:.1} kWh/day", self.daily_energy_kwh)?;
        writeln!(
            f,
            "PV array size:         {:.1} kWp (~{:.0} m² roof)",
            d.pv_kw, d.roof_area_m2
        )?;
        writeln!(f, "Inverter:              {:.1} kW {}", d.inverter_kw, d.inverter_type)?;
        writeln!(f, "Battery size:          {:.1} kWh", d.battery_kwh)?;
        match d.payback_years {
            Some(years) => writeln!(f, "Simple payback:        {years:.1} years")?,
            None => writeln!(f, "Simple payback:        n/a (no grid savings)")?,
        }
        writeln!(f, "CapEx (approx.):       {:.2} lakh", d.total_cost() / LAKH)?;
        writeln!(f, "Irradiance:            {} kWh/m²/day", c.irradiance)?;
        writeln!(f, "Grid tariff:           {}/kWh", c.grid_tariff)?;
        writeln!(f, "Net-meter export rate: {}/kWh", c.export_rate)?;
        writeln!(f)?;
        writeln!(f, "--- Cost Breakdown (lakh) ---")?;
        writeln!(
            f,
            "PV array:              {:.2} (after {:.2} subsidy)",
            d.pv_cost / LAKH,
            d.subsidy / LAKH
        )?;
        writeln!(f, "Inverter:              {:.2}", d.inverter_cost / LAKH)?;
        writeln!(f, "Battery:               {:.2}", d.battery_cost / LAKH)?;
        writeln!(f)?;
        writeln!(f, "--- Recommended Module ---")?;
        writeln!(f, "Type:                  {}", self.panel.panel_type)?;
        writeln!(f, "Brands:                {}", self.panel.brands.join(", "))?;
        writeln!(f, "Power class:           ~{} W", self.panel.wattage_w)?;
        write!(f, "Size:                  {} mm", self.panel.dimensions_mm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing::types::{ApplianceKind, InverterType};

    fn estimator() -> Estimator {
        match ReferenceData::reference() {
            Ok(data) => Estimator::new(data),
            Err(e) => panic!("reference data invalid: {e:?}"),
        }
    }

    fn site(city: &str) -> SiteInput {
        SiteInput {
            city: city.into(),
            outage_hours_per_week: 4.0,
            inverter_type: InverterType::Hybrid,
            roof_height_m: 20.0,
        }
    }

    fn ac_and_fridge() -> LoadInput {
        LoadInput::new()
            .with(ApplianceKind::AirConditioner, 1)
            .with(ApplianceKind::Fridge, 1)
    }

    #[test]
    fn pune_estimate_matches_reference_numbers() {
        let est = estimator().estimate(&ac_and_fridge(), &site("pune")).unwrap();
        assert!((est.daily_energy_kwh - 13.2).abs() < 1e-9);
        assert_eq!(est.city, "pune");
        assert_eq!(est.design.pv_kw, 3.0);
        assert!((est.design.pv_cost - 109_000.0).abs() < 1e-6);
        assert_eq!(est.panel.wattage_w, 535);
    }

    #[test]
    fn unknown_city_uses_default_profile() {
        let est = estimator()
            .estimate(&ac_and_fridge(), &site("Timbuktu"))
            .unwrap();
        assert_eq!(est.city, "default");
        assert_eq!(est.city_profile.irradiance, 5.0);
    }

    #[test]
    fn invalid_site_is_rejected_before_sizing() {
        let mut s = site("pune");
        s.roof_height_m = f64::NAN;
        assert!(matches!(
            estimator().estimate(&ac_and_fridge(), &s),
            Err(SizingError::InvalidRoofHeight(_))
        ));
    }

    #[test]
    fn report_shows_undefined_payback_as_na() {
        let est = estimator().estimate(&LoadInput::new(), &site("pune")).unwrap();
        let report = est.to_string();
        assert!(report.contains("n/a"), "{report}");
        assert!(report.contains("Half-cut Mono PERC / TOPCon"));
    }
}
