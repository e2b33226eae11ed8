//! API request, query and response types.

use serde::{Deserialize, Serialize};

use crate::sizing::{CityProfile, InverterType, LoadInput, SiteInput};

/// One configured city.
#[derive(Debug, Serialize)]
pub struct CityEntry {
    pub name: String,
    #[serde(flatten)]
    pub profile: CityProfile,
}

/// Query parameters for `GET /panel`.
#[derive(Debug, Deserialize)]
pub struct PanelQuery {
    /// Roof height (m).
    pub height_m: f64,
    /// When `true`, heights outside every band yield 404 instead of the
    /// closest band.
    #[serde(default)]
    pub strict: bool,
}

/// Body of `POST /estimate`.
#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    /// Appliance label → quantity. Missing kinds count as zero.
    #[serde(default)]
    pub loads: LoadInput,
    pub city: String,
    #[serde(default)]
    pub outage_hours_per_week: f64,
    pub inverter_type: InverterType,
    pub roof_height_m: f64,
}

impl EstimateRequest {
    /// Splits the request into engine inputs.
    pub fn into_inputs(self) -> (LoadInput, SiteInput) {
        let site = SiteInput {
            city: self.city,
            outage_hours_per_week: self.outage_hours_per_week,
            inverter_type: self.inverter_type,
            roof_height_m: self.roof_height_m,
        };
        (self.loads, site)
    }
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
