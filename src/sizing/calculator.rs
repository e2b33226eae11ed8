//! PV, inverter and battery sizing with cost and payback.

use tracing::debug;

use super::battery::battery_capacity_kwh;
use super::types::{InverterType, SizingError, SizingResult, check_daily_energy, round1};
use crate::config::SizingParameters;

const DAYS_PER_YEAR: f64 = 365.0;

/// Turns a daily energy need into a priced system design.
///
/// Holds only the cost constants it was built with; every call to
/// [`compute_design`](Self::compute_design) is independent.
#[derive(Debug, Clone)]
pub struct SizingCalculator {
    params: SizingParameters,
}

impl SizingCalculator {
    pub fn new(params: SizingParameters) -> Self {
        Self { params }
    }

    pub fn parameters(&self) -> &SizingParameters {
        &self.params
    }

    /// Subsidy for an array of `pv_kw`: linear up to `subsidy_flat_kw`, flat beyond.
    pub fn subsidy(&self, pv_kw: f64) -> f64 {
        let p = &self.params;
        pv_kw.min(p.subsidy_flat_kw) * p.subsidy_first_tier / p.subsidy_flat_kw
    }

    /// Sizes and prices a system.
    ///
    /// # Arguments
    ///
    /// * `daily_energy_kwh` - Household consumption (kWh/day, >= 0)
    /// * `irradiance` - Site irradiance (kWh/m²/day, > 0)
    /// * `outage_hours_per_week` - Hours without grid per week (0 to 168)
    /// * `grid_tariff` - Import tariff per kWh (>= 0)
    /// * `inverter_type` - Inverter topology, selects the unit cost
    ///
    /// # Errors
    ///
    /// Returns a `SizingError` for any input outside its range.
    pub fn compute_design(
        &self,
        daily_energy_kwh: f64,
        irradiance: f64,
        outage_hours_per_week: f64,
        grid_tariff: f64,
        inverter_type: InverterType,
    ) -> Result<SizingResult, SizingError> {
        check_daily_energy(daily_energy_kwh)?;
        if !(irradiance > 0.0 && irradiance.is_finite()) {
            return Err(SizingError::NonPositiveIrradiance(irradiance));
        }
        if !(grid_tariff >= 0.0 && grid_tariff.is_finite()) {
            return Err(SizingError::NegativeTariff(grid_tariff));
        }
        let p = &self.params;

        let pv_kw = round1(daily_energy_kwh / irradiance / p.derate_factor);
        let subsidy = self.subsidy(pv_kw);
        let pv_cost = pv_kw * p.panel_cost_per_kw - subsidy;

        // inverter matches the array 1:1
        let inverter_kw = pv_kw;
        let inverter_cost = inverter_kw * p.inverter_cost_per_kw.per_kw(inverter_type);

        let battery_kwh = battery_capacity_kwh(outage_hours_per_week, daily_energy_kwh)?;
        let battery_cost = battery_kwh * p.battery_cost_per_kwh;

        let annual_savings = daily_energy_kwh * DAYS_PER_YEAR * grid_tariff;
        let total_cost = pv_cost + inverter_cost + battery_cost;
        let payback_years = if annual_savings > 0.0 {
            Some(round1(total_cost / annual_savings))
        } else {
            None
        };

        let result = SizingResult {
            pv_kw,
            subsidy,
            pv_cost,
            roof_area_m2: pv_kw * p.roof_area_per_kw_m2,
            inverter_type,
            inverter_kw,
            inverter_cost,
            battery_kwh,
            battery_cost,
            annual_savings,
            payback_years,
        };
        debug!(
            daily_energy_kwh,
            irradiance,
            pv_kw,
            battery_kwh,
            total_cost,
            ?payback_years,
            "computed design"
        );
        Ok(result)
    }
}

impl Default for SizingCalculator {
    fn default() -> Self {
        Self::new(SizingParameters::default())
    }
}
