use proptest::prelude::*;

use crate::common::seeded_rng;
use daggen::sampling::{
    distribute_workload, drs, uunifast_discard, UtilizationSplit, WorkloadOptions,
};

fn assert_split(sets: &[Vec<f64>], split: &UtilizationSplit) -> Result<(), TestCaseError> {
    prop_assert_eq!(sets.len(), split.sets);
    for set in sets {
        prop_assert_eq!(set.len(), split.tasks);
        let sum: f64 = set.iter().sum();
        prop_assert!((sum - split.total).abs() <= 1e-9 * split.total, "sum {}", sum);
        for &u in set {
            prop_assert!((0.0..=split.ulimit).contains(&u), "u = {}", u);
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn drs_sums_and_bounds(
        n in 1usize..=16,
        fill in 0.01f64..=1.0,
        ulimit in 0.25f64..=8.0,
        sets in 1usize..=4,
        seed in any::<u64>(),
    ) {
        let split = UtilizationSplit::new(n, n as f64 * ulimit * fill)
            .with_sets(sets)
            .with_ulimit(ulimit);
        let result = drs(&mut seeded_rng(seed), &split).unwrap();
        assert_split(&result, &split)?;
    }

    #[test]
    fn discard_sums_and_bounds_below_one_ceiling(
        n in 1usize..=16,
        fill in 0.01f64..=1.0,
        ulimit in 0.25f64..=8.0,
        seed in any::<u64>(),
    ) {
        // A total at or below the ceiling can never be rejected.
        let split = UtilizationSplit::new(n, ulimit * fill).with_ulimit(ulimit);
        let result = uunifast_discard(&mut seeded_rng(seed), &split, 1).unwrap();
        assert_split(&result, &split)?;
    }

    #[test]
    fn rounded_workload_is_whole_and_positive(
        n in 1usize..=64,
        w in 1.0f64..50_000.0,
        seed in any::<u64>(),
    ) {
        let options = WorkloadOptions { round: true, dummy: false };
        let times = distribute_workload(&mut seeded_rng(seed), n, w, options).unwrap();
        prop_assert_eq!(times.len(), n);
        for (_, c) in times.iter() {
            prop_assert!(c >= 1.0 && c.fract() == 0.0);
        }
        // Each node drifts by at most one half, or up to 1 when clamped.
        prop_assert!(times.drift().abs() <= n as f64);
    }
}
