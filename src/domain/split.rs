//! Chunk split generator
//!
//! Turns a total amount into randomized positive shares that sum back
//! exactly to the total. Pure function over a caller-supplied RNG so the
//! distribution is reproducible in tests.

use rand::Rng;

/// Split `amount` into `size` positive shares summing exactly to `amount`.
///
/// Stick-breaking with a minimum-one guarantee: every share gets 1 up front,
/// and the remaining `amount - size` is divided by cutting the interval
/// `[0, free]` at `size - 1` random points. The resulting distribution is
/// biased by the order statistics of the cut points; it is intentionally not
/// uniform over the set of valid partitions.
///
/// # Preconditions
/// `amount >= size >= 1`. The creation flow validates this before calling;
/// violating it here is a caller bug.
pub fn split_amount<R: Rng + ?Sized>(amount: i64, size: u32, rng: &mut R) -> Vec<i64> {
    debug_assert!(size >= 1);
    debug_assert!(amount >= i64::from(size));

    let size = size as usize;
    if size == 1 {
        return vec![amount];
    }

    let free = amount - size as i64;
    if free == 0 {
        // Nothing left to distribute beyond the minimum.
        return vec![1; size];
    }

    let mut cuts: Vec<i64> = (0..size - 1).map(|_| rng.gen_range(1..=free)).collect();
    cuts.push(free);
    cuts.sort_unstable();

    // Successive differences give `size` segments >= 0 summing to `free`;
    // the +1 restores the per-share minimum.
    let mut shares = Vec::with_capacity(size);
    let mut prev = 0;
    for cut in cuts {
        shares.push(cut - prev + 1);
        prev = cut;
    }
    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_valid_split(amount: i64, size: u32, shares: &[i64]) {
        assert_eq!(shares.len(), size as usize, "share count for {amount}/{size}");
        assert_eq!(
            shares.iter().sum::<i64>(),
            amount,
            "shares {shares:?} must sum to {amount}"
        );
        assert!(
            shares.iter().all(|&s| s >= 1),
            "every share must be positive: {shares:?}"
        );
    }

    #[test]
    fn test_split_sums_exactly() {
        let mut rng = StdRng::seed_from_u64(42);
        let shares = split_amount(2000, 3, &mut rng);
        assert_valid_split(2000, 3, &shares);
    }

    #[test]
    fn test_split_single_share_takes_everything() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(split_amount(12345, 1, &mut rng), vec![12345]);
    }

    #[test]
    fn test_split_amount_equals_size() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(split_amount(5, 5, &mut rng), vec![1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_split_minimum_free_budget() {
        // free == 1: one share gets 2, the rest get 1.
        let mut rng = StdRng::seed_from_u64(99);
        let shares = split_amount(4, 3, &mut rng);
        assert_valid_split(4, 3, &shares);
        assert_eq!(shares.iter().filter(|&&s| s == 2).count(), 1);
    }

    #[test]
    fn test_split_holds_across_many_inputs() {
        let mut rng = StdRng::seed_from_u64(123);
        for seed in 0..200u64 {
            let mut case_rng = StdRng::seed_from_u64(seed);
            let size = case_rng.gen_range(1..=20u32);
            let amount = case_rng.gen_range(i64::from(size)..=100_000);
            let shares = split_amount(amount, size, &mut rng);
            assert_valid_split(amount, size, &shares);
        }
    }

    #[test]
    fn test_split_is_deterministic_for_a_seeded_rng() {
        let a = split_amount(10_000, 8, &mut StdRng::seed_from_u64(1));
        let b = split_amount(10_000, 8, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }
}
