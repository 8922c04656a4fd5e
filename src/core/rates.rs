use super::types::{LocalMarket, ResolvedRates};

const BASELINE_RENT_GROWTH_RATE: f64 = 3.5;

/// Holding-period bucket that drives every horizon-dependent assumption.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum HorizonBucket {
    Short,
    Medium,
    Long,
}

impl HorizonBucket {
    pub fn from_years(time_horizon_years: u32) -> Self {
        match time_horizon_years {
            0..=3 => HorizonBucket::Short,
            4..=7 => HorizonBucket::Medium,
            _ => HorizonBucket::Long,
        }
    }

    fn baseline_appreciation_rate(self) -> f64 {
        match self {
            HorizonBucket::Short => 0.5,
            HorizonBucket::Medium => 1.5,
            HorizonBucket::Long => 2.5,
        }
    }

    fn investment_return_rate(self) -> f64 {
        match self {
            HorizonBucket::Short => 4.0,
            HorizonBucket::Medium => 6.0,
            HorizonBucket::Long => 7.0,
        }
    }

    /// Share of a local market trend trusted over this holding period.
    fn local_trend_weight(self) -> f64 {
        match self {
            HorizonBucket::Short => 0.1,
            HorizonBucket::Medium => 0.5,
            HorizonBucket::Long => 1.0,
        }
    }
}

/// Rates a simulation over `time_horizon_years` will apply.
///
/// Local statistics replace the baseline appreciation and rent growth after being
/// scaled by the horizon weight. Investment return never depends on location.
pub fn resolve_rates(time_horizon_years: u32, local_market: &LocalMarket) -> ResolvedRates {
    let bucket = HorizonBucket::from_years(time_horizon_years);
    let investment_return_rate = bucket.investment_return_rate();

    match *local_market {
        LocalMarket::Known {
            home_appreciation_rate,
            rent_growth_rate,
        } => {
            let weight = bucket.local_trend_weight();
            ResolvedRates {
                home_appreciation_rate: home_appreciation_rate * weight,
                rent_growth_rate: (rent_growth_rate * weight).max(0.0),
                investment_return_rate,
            }
        }
        LocalMarket::Unknown => ResolvedRates {
            home_appreciation_rate: bucket.baseline_appreciation_rate(),
            rent_growth_rate: BASELINE_RENT_GROWTH_RATE,
            investment_return_rate,
        },
    }
}
