//! Sizing and recommendation engine.

/// Backup battery sizing.
pub mod battery;
pub mod calculator;
pub mod estimate;
/// Household load aggregation.
pub mod load;
/// Roof-height panel recommendation.
pub mod panel;
pub mod reference;
pub mod types;

// Re-export the main types for convenience
pub use battery::battery_capacity_kwh;
pub use calculator::SizingCalculator;
pub use estimate::{Estimate, Estimator};
pub use load::daily_energy_kwh;
pub use panel::{find_panel, recommend_panel};
pub use reference::{PanelBands, ReferenceData};
pub use types::{
    ApplianceKind, ApplianceProfile, CityProfile, InverterType, LoadInput, PanelHeightBand,
    PanelRecommendation, SiteInput, SizingError, SizingResult,
};
