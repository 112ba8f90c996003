//! Synthetic prediction series for demos, benchmarks and tests.
//!
//! Returns are drawn from a seeded `StdRng`, so the same parameters always
//! produce the same series. `skill` controls how much the probability knows
//! about the day's return: at 0.0 probabilities are pure noise around 0.5, at
//! 1.0 they lean fully toward the sign of the return.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::DailyObservation;

/// Parameters for a reproducible synthetic series.
#[derive(Debug, Clone)]
pub struct SyntheticSeries {
    pub days: usize,
    pub seed: u64,
    /// Information content of the probability, in `[0, 1]`.
    pub skill: f64,
    /// Half-width of the uniform daily return distribution.
    pub volatility: f64,
    /// Constant added to every daily return.
    pub drift: f64,
    pub start_date: NaiveDate,
}

impl Default for SyntheticSeries {
    fn default() -> Self {
        Self {
            days: 252,
            seed: 42,
            skill: 0.3,
            volatility: 0.02,
            drift: 0.0003,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap_or_default(),
        }
    }
}

impl SyntheticSeries {
    pub fn new(days: usize, seed: u64) -> Self {
        Self {
            days,
            seed,
            ..Self::default()
        }
    }

    pub fn with_skill(mut self, skill: f64) -> Self {
        self.skill = skill.clamp(0.0, 1.0);
        self
    }

    pub fn generate(&self) -> Vec<DailyObservation> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut date = next_business_day(self.start_date);
        let mut series = Vec::with_capacity(self.days);

        for _ in 0..self.days {
            let market_return = self.drift + rng.gen_range(-self.volatility..=self.volatility);
            let noise: f64 = rng.gen_range(-0.5..=0.5);
            let informed = if market_return > 0.0 { 0.5 } else { -0.5 };
            let probability =
                (0.5 + self.skill * informed * 0.8 + (1.0 - self.skill) * noise * 0.8)
                    .clamp(0.0, 1.0);

            series.push(DailyObservation::new(
                date.format("%Y-%m-%d").to_string(),
                probability,
                market_return,
            ));
            date = next_business_day(date + Duration::days(1));
        }
        series
    }
}

fn next_business_day(mut date: NaiveDate) -> NaiveDate {
    while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        date += Duration::days(1);
    }
    date
}
