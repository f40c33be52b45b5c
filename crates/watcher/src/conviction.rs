//! Value-based conviction banding.
//!
//! Webhook ingestion and the simulator share the band edges but size positions
//! differently, so each gets its own [`ConvictionPolicy`] parameterization.

use common::types::Conviction;
use rand::Rng;

/// How a band turns into a position-size percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sizing {
    Fixed(u32),
    /// Whole percentages, both ends inclusive.
    Range(u32, u32),
}

impl Sizing {
    pub fn pick<R: Rng + ?Sized>(self, rng: &mut R) -> f64 {
        match self {
            Self::Fixed(pct) => f64::from(pct),
            Self::Range(lo, hi) => f64::from(rng.gen_range(lo..=hi)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvictionPolicy {
    /// Strictly above this is `High`.
    pub high_above_usd: f64,
    /// Strictly above this (and not `High`) is `Medium`; everything else is `Low`.
    pub medium_above_usd: f64,
    pub high: Sizing,
    pub medium: Sizing,
    pub low: Sizing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub conviction: Conviction,
    pub position_pct: f64,
}

/// Live webhook transfers.
pub const WEBHOOK_POLICY: ConvictionPolicy = ConvictionPolicy {
    high_above_usd: 12_000.0,
    medium_above_usd: 7_000.0,
    high: Sizing::Fixed(12),
    medium: Sizing::Fixed(8),
    low: Sizing::Fixed(4),
};

/// Synthetic demo trades.
pub const SIMULATOR_POLICY: ConvictionPolicy = ConvictionPolicy {
    high_above_usd: 12_000.0,
    medium_above_usd: 7_000.0,
    high: Sizing::Range(10, 17),
    medium: Sizing::Range(5, 9),
    low: Sizing::Range(2, 5),
};

impl ConvictionPolicy {
    pub fn classify(&self, value_usd: f64) -> Conviction {
        if value_usd > self.high_above_usd {
            Conviction::High
        } else if value_usd > self.medium_above_usd {
            Conviction::Medium
        } else {
            Conviction::Low
        }
    }

    pub fn sizing(&self, conviction: Conviction) -> Sizing {
        match conviction {
            Conviction::High => self.high,
            Conviction::Medium => self.medium,
            Conviction::Low => self.low,
        }
    }

    pub fn assess<R: Rng + ?Sized>(&self, value_usd: f64, rng: &mut R) -> Assessment {
        let conviction = self.classify(value_usd);
        Assessment {
            conviction,
            position_pct: self.sizing(conviction).pick(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_webhook_bands() {
        let mut rng = StdRng::seed_from_u64(1);
        let high = WEBHOOK_POLICY.assess(12_500.0, &mut rng);
        assert_eq!(high.conviction, Conviction::High);
        assert!((high.position_pct - 12.0).abs() < f64::EPSILON);

        let medium = WEBHOOK_POLICY.assess(12_000.0, &mut rng);
        assert_eq!(medium.conviction, Conviction::Medium);
        assert!((medium.position_pct - 8.0).abs() < f64::EPSILON);

        let low = WEBHOOK_POLICY.assess(7_000.0, &mut rng);
        assert_eq!(low.conviction, Conviction::Low);
        assert!((low.position_pct - 4.0).abs() < f64::EPSILON);

        assert_eq!(WEBHOOK_POLICY.classify(7_000.01), Conviction::Medium);
        assert_eq!(WEBHOOK_POLICY.classify(0.0), Conviction::Low);
    }

    #[test]
    fn test_simulator_boundaries() {
        assert_eq!(SIMULATOR_POLICY.classify(12_000.0), Conviction::Medium);
        assert_eq!(SIMULATOR_POLICY.classify(12_001.0), Conviction::High);
        assert_eq!(SIMULATOR_POLICY.classify(7_000.0), Conviction::Low);
        assert_eq!(SIMULATOR_POLICY.classify(7_001.0), Conviction::Medium);
    }

    #[test]
    fn test_simulator_position_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let high = SIMULATOR_POLICY.assess(19_999.0, &mut rng).position_pct;
            assert!((10.0..=17.0).contains(&high), "high {high}");
            let medium = SIMULATOR_POLICY.assess(9_000.0, &mut rng).position_pct;
            assert!((5.0..=9.0).contains(&medium), "medium {medium}");
            let low = SIMULATOR_POLICY.assess(3_000.0, &mut rng).position_pct;
            assert!((2.0..=5.0).contains(&low), "low {low}");
            assert_eq!(low.fract(), 0.0);
        }
    }
}
