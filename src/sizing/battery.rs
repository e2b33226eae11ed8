//! Backup battery sizing.

use super::types::{HOURS_PER_WEEK, SizingError, check_daily_energy, check_outage_hours, round1};

/// Margin over the outage energy for depth-of-discharge and conversion losses.
pub const BATTERY_SAFETY_MARGIN: f64 = 1.2;

/// Battery capacity (kWh) to ride through the weekly outage share of a day.
///
/// `daily_energy_kwh * (outage_hours_per_week / 168) * 1.2`, rounded to one
/// decimal place.
///
/// # Errors
///
/// Returns a `SizingError` if `outage_hours_per_week` is outside `[0, 168]` or
/// `daily_energy_kwh` is negative or not finite.
pub fn battery_capacity_kwh(
    outage_hours_per_week: f64,
    daily_energy_kwh: f64,
) -> Result<f64, SizingError> {
    check_outage_hours(outage_hours_per_week)?;
    check_daily_energy(daily_energy_kwh)?;
    Ok(round1(
        daily_energy_kwh * (outage_hours_per_week / HOURS_PER_WEEK) * BATTERY_SAFETY_MARGIN,
    ))
}
