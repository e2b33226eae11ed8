//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use solar_sizer::sizing::{
    ApplianceKind, Estimator, InverterType, LoadInput, ReferenceData, SiteInput,
};

/// Built-in reference data.
pub fn reference() -> ReferenceData {
    ReferenceData::reference().unwrap_or_else(|e| panic!("reference data invalid: {e:?}"))
}

/// Estimator over the built-in reference data.
pub fn reference_estimator() -> Estimator {
    Estimator::new(reference())
}

/// One 1.5 ton AC and one fridge: 13.2 kWh/day with reference duty hours.
pub fn ac_and_fridge() -> LoadInput {
    LoadInput::new()
        .with(ApplianceKind::AirConditioner, 1)
        .with(ApplianceKind::Fridge, 1)
}

/// Site with the form defaults (4 h/week outage, hybrid inverter).
pub fn site(city: &str, roof_height_m: f64) -> SiteInput {
    SiteInput {
        city: city.to_string(),
        outage_hours_per_week: 4.0,
        inverter_type: InverterType::Hybrid,
        roof_height_m,
    }
}
