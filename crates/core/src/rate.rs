//! Surveillance rate arithmetic.
//!
//! Every function here is total: a zero denominator gives a rate of 0 rather than an error,
//! NaN or infinity.

use crate::module::SurveillanceModule;
use crate::records::SurveillanceEntry;

/// Computes the standardised rate for one month of counts.
///
/// VAE, CLABSI and CAUTI are expressed per 1000 device-days; SSI and DE per 100.
pub fn calculate_rate(numerator: u32, denominator: u32, module: SurveillanceModule) -> f64 {
    ratio(numerator, denominator) * module.rate_scale().multiplier()
}

/// Arithmetic mean of the per-entry rates. Returns 0 for no entries.
///
/// This averages the already-computed monthly rates; it does not pool numerators and
/// denominators across months.
pub fn average_rate<'a, I>(entries: I) -> f64
where
    I: IntoIterator<Item = &'a SurveillanceEntry>,
{
    let (sum, count) = entries
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), e| (sum + e.rate(), count + 1));

    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}

/// Percentage of `events` over `exposures`, 0 when there is no exposure.
pub fn percentage(events: u64, exposures: u64) -> f64 {
    if exposures == 0 {
        return 0.0;
    }
    events as f64 / exposures as f64 * 100.0
}

/// Formats a rate with two decimal places.
pub fn format_rate(rate: f64) -> String {
    format!("{:.2}", rate)
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    f64::from(numerator) / f64::from(denominator)
}
