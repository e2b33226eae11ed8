//! Residential rooftop solar sizing: PV, inverter and battery design with cost,
//! payback and a roof-height based panel recommendation.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
/// File export of estimate results.
pub mod io;
pub mod sizing;
