use crate::domain::load::Load;
use serde::Serialize;

/// Upper bounds of the rate histogram bands, ascending. The last band also takes every
/// rate above its bound.
pub const RATE_THRESHOLDS: [u32; 7] = [500, 1000, 1500, 2000, 2500, 3000, 3500];

pub type RateHistogram = [RateBucket; RATE_THRESHOLDS.len()];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateBucket {
    pub bucket: String,
    pub count: u64,
}

/// Index of the first band whose bound is >= `rate`, or the last band.
pub fn bucket_index(rate: f64) -> usize {
    RATE_THRESHOLDS
        .iter()
        .position(|&bound| rate <= f64::from(bound))
        .unwrap_or(RATE_THRESHOLDS.len() - 1)
}

/// Counts loads per rate band. All bands are always present, empty ones with count `0`.
pub fn bucketize_rates(loads: &[Load]) -> RateHistogram {
    let mut counts = [0u64; RATE_THRESHOLDS.len()];
    for load in loads {
        counts[bucket_index(load.loadboard_rate.or_zero())] += 1;
    }

    std::array::from_fn(|i| RateBucket {
        bucket: format!("≤{}", RATE_THRESHOLDS[i]),
        count: counts[i],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::numeric::LooseNumber;

    fn loads_with_rates(rates: &[LooseNumber]) -> Vec<Load> {
        rates
            .iter()
            .map(|&rate| Load {
                loadboard_rate: rate,
                ..Load::default()
            })
            .collect()
    }

    fn counts(h: &RateHistogram) -> Vec<u64> {
        h.iter().map(|b| b.count).collect()
    }

    #[test]
    fn labels_follow_thresholds() {
        let h = bucketize_rates(&[]);
        let labels: Vec<_> = h.iter().map(|b| b.bucket.as_str()).collect();
        assert_eq!(
            labels,
            ["≤500", "≤1000", "≤1500", "≤2000", "≤2500", "≤3000", "≤3500"]
        );
    }

    #[test]
    fn empty_input_has_seven_zero_buckets() {
        let h = bucketize_rates(&[]);
        assert_eq!(h.len(), 7);
        assert_eq!(counts(&h), vec![0; 7]);
    }

    #[test]
    fn rate_1200_lands_in_the_1500_band() {
        let h = bucketize_rates(&loads_with_rates(&[LooseNumber::new(1200.0)]));
        assert_eq!(counts(&h), vec![0, 0, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(bucket_index(500.0), 0);
        assert_eq!(bucket_index(500.5), 1);
        assert_eq!(bucket_index(3500.0), 6);
    }

    #[test]
    fn rates_above_the_top_bound_use_the_last_band() {
        let h = bucketize_rates(&loads_with_rates(&[
            LooseNumber::new(3200.0),
            LooseNumber::new(9999.0),
        ]));
        assert_eq!(counts(&h), vec![0, 0, 0, 0, 0, 0, 2]);
        assert_eq!(h[6].bucket, "≤3500");
    }

    #[test]
    fn missing_rates_count_as_zero() {
        let h = bucketize_rates(&loads_with_rates(&[LooseNumber::absent(), LooseNumber::new(-5.0)]));
        assert_eq!(counts(&h), vec![2, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn counts_sum_to_number_of_loads() {
        let rates: Vec<_> = (0..50).map(|i| LooseNumber::new(f64::from(i) * 97.0)).collect();
        let h = bucketize_rates(&loads_with_rates(&rates));
        assert_eq!(h.iter().map(|b| b.count).sum::<u64>(), 50);
    }
}
