//! Synthetic daily price path generation.
//!
//! Produces one [`Sample`] per calendar day, inclusive of both endpoints. The
//! price follows a multiplicative random walk; the indicator value is drawn
//! independently per day. All randomness comes from the caller's [`Rng`].

use chrono::NaiveDate;
use rand::Rng;

use super::error::SimtraderError;
use super::sample::Sample;

pub const DEFAULT_MAX_SPAN_DAYS: i64 = 3650;

#[derive(Debug, Clone, PartialEq)]
pub struct PricePathConfig {
    pub initial_price_min: f64,
    pub initial_price_max: f64,
    /// Width of the per-day return band: a step is `(u - 0.5 + drift) * volatility`.
    pub volatility: f64,
    /// Shift of the uniform draw's centre; 0 gives a symmetric walk.
    pub drift: f64,
    pub indicator_min: f64,
    pub indicator_max: f64,
    pub max_span_days: i64,
}

impl Default for PricePathConfig {
    fn default() -> Self {
        PricePathConfig {
            initial_price_min: 2000.0,
            initial_price_max: 3000.0,
            volatility: 0.03,
            drift: 0.0,
            indicator_min: 30.0,
            indicator_max: 70.0,
            max_span_days: DEFAULT_MAX_SPAN_DAYS,
        }
    }
}

/// Check `start..=end` and return the span in days (`end - start`).
pub fn validate_range(
    start: NaiveDate,
    end: NaiveDate,
    max_span_days: i64,
) -> Result<i64, SimtraderError> {
    let span = (end - start).num_days();
    if span < 0 {
        return Err(SimtraderError::InvalidRange {
            start,
            end,
            reason: "end date is before start date".into(),
        });
    }
    if span > max_span_days {
        return Err(SimtraderError::InvalidRange {
            start,
            end,
            reason: format!("span of {span} days exceeds maximum of {max_span_days}"),
        });
    }
    Ok(span)
}

pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    start: NaiveDate,
    end: NaiveDate,
    config: &PricePathConfig,
) -> Result<Vec<Sample>, SimtraderError> {
    let span = validate_range(start, end, config.max_span_days)?;

    let mut price = draw(rng, config.initial_price_min, config.initial_price_max);
    let mut samples = Vec::with_capacity(span as usize + 1);

    for (offset, date) in start.iter_days().take(span as usize + 1).enumerate() {
        let step = (rng.r#gen::<f64>() - 0.5 + config.drift) * config.volatility;
        price *= 1.0 + step;
        let indicator_value = draw(rng, config.indicator_min, config.indicator_max);

        log::trace!("day {offset}: {date} price={price:.2} indicator={indicator_value:.2}");
        samples.push(Sample {
            date,
            price,
            indicator_value,
        });
    }

    Ok(samples)
}

fn draw<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}
