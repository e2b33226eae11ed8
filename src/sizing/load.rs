//! Household load aggregation.

use super::types::{ApplianceProfile, LoadInput};

/// Total daily energy use (kWh/day) of the appliances in `load`.
///
/// Each kind contributes `quantity * rated_power_w * duty_hours_per_day / 1000`.
/// `profiles` is indexed by [`ApplianceKind::index`], as returned by
/// [`ReferenceData::appliance_profiles`]. Kinds with no profile contribute nothing.
///
/// [`ApplianceKind::index`]: super::types::ApplianceKind::index
/// [`ReferenceData::appliance_profiles`]: super::reference::ReferenceData::appliance_profiles
pub fn daily_energy_kwh(load: &LoadInput, profiles: &[ApplianceProfile]) -> f64 {
    load.iter()
        .filter_map(|(kind, qty)| {
            profiles
                .get(kind.index())
                .map(|p| f64::from(qty) * p.rated_power_w * p.duty_hours_per_day / 1000.0)
        })
        .sum()
}
