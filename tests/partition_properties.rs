//! Property-based tests for the team partitioner
//!
//! Checks the structural guarantees of `find_best_split` against randomly
//! generated pools: the result is always a true partition, and the rating
//! diff is never worse than a brute-force minimum computed independently.

mod fixtures;

use arena_queue::matchmaking::{find_best_split, SplitRules};
use arena_queue::types::{Candidate, Role};
use proptest::prelude::*;

use fixtures::{candidate, candidate_with_class};

/// Brute-force minimal rating diff over all splits via bitmask enumeration.
/// Ignores every constraint filter, so it is a lower bound for the
/// unconstrained partitioner.
fn brute_force_min_diff(ratings: &[u32], team_size: usize) -> u64 {
    let n = ratings.len();
    let total: u64 = ratings.iter().map(|&r| r as u64).sum();
    let mut best = u64::MAX;

    for mask in 0u32..(1 << n) {
        if mask.count_ones() as usize != team_size {
            continue;
        }
        let sum1: u64 = (0..n)
            .filter(|&i| mask & (1 << i) != 0)
            .map(|i| ratings[i] as u64)
            .sum();
        let diff = sum1.abs_diff(total - sum1);
        best = best.min(diff);
    }
    best
}

fn pool_from_ratings(ratings: &[u32]) -> Vec<Candidate> {
    ratings
        .iter()
        .enumerate()
        .map(|(i, &r)| candidate(&format!("p{i}"), Role::Melee, r))
        .collect()
}

proptest! {
    #[test]
    fn split_is_always_a_partition(ratings in prop::collection::vec(0u32..3000, 6)) {
        let pool = pool_from_ratings(&ratings);
        let rules = SplitRules::new(3, false, false);
        let split = find_best_split(&pool, &rules, None).unwrap();

        let mut all: Vec<usize> = split.team1.iter().chain(&split.team2).copied().collect();
        all.sort_unstable();
        prop_assert_eq!(all, vec![0, 1, 2, 3, 4, 5]);
        prop_assert_eq!(split.team1.len(), 3);
        prop_assert_eq!(split.team2.len(), 3);
    }

    #[test]
    fn unconstrained_split_matches_brute_force(ratings in prop::collection::vec(0u32..3000, 6)) {
        let pool = pool_from_ratings(&ratings);
        let rules = SplitRules::new(3, false, false);
        let split = find_best_split(&pool, &rules, None).unwrap();

        prop_assert_eq!(split.rating_diff, brute_force_min_diff(&ratings, 3));
    }

    #[test]
    fn reported_diff_matches_team_sums(ratings in prop::collection::vec(0u32..3000, 6)) {
        let pool = pool_from_ratings(&ratings);
        let rules = SplitRules::new(3, false, false);
        let split = find_best_split(&pool, &rules, None).unwrap();

        let sum1: u64 = split.team1.iter().map(|&i| pool[i].rating as u64).sum();
        let sum2: u64 = split.team2.iter().map(|&i| pool[i].rating as u64).sum();
        prop_assert_eq!(split.rating_diff, sum1.abs_diff(sum2));
    }

    #[test]
    fn role_enforced_split_places_one_healer_per_team(
        healer_ratings in prop::collection::vec(0u32..3000, 2),
        dps_ratings in prop::collection::vec(0u32..3000, 4),
    ) {
        let mut pool: Vec<Candidate> = healer_ratings
            .iter()
            .enumerate()
            .map(|(i, &r)| candidate(&format!("h{i}"), Role::Healer, r))
            .collect();
        pool.extend(
            dps_ratings
                .iter()
                .enumerate()
                .map(|(i, &r)| candidate(&format!("d{i}"), Role::Ranged, r)),
        );

        let rules = SplitRules::new(3, true, false);
        let split = find_best_split(&pool, &rules, None).unwrap();

        let healers1 = split.team1.iter().filter(|&&i| pool[i].role == Role::Healer).count();
        let healers2 = split.team2.iter().filter(|&&i| pool[i].role == Role::Healer).count();
        prop_assert_eq!(healers1, 1);
        prop_assert_eq!(healers2, 1);

        // Optimal among all splits that separate the two healers
        let ratings: Vec<u32> = pool.iter().map(|c| c.rating).collect();
        let total: u64 = ratings.iter().map(|&r| r as u64).sum();
        let mut best = u64::MAX;
        for mask in 0u32..(1 << 6) {
            if mask.count_ones() != 3 || (mask & 0b11).count_ones() != 1 {
                continue;
            }
            let sum1: u64 = (0..6)
                .filter(|&i| mask & (1 << i) != 0)
                .map(|i| ratings[i] as u64)
                .sum();
            best = best.min(sum1.abs_diff(total - sum1));
        }
        prop_assert_eq!(split.rating_diff, best);
    }

    #[test]
    fn class_stacked_winner_never_holds_a_blocked_pair(
        classes in prop::collection::vec(1u8..4, 6),
        ratings in prop::collection::vec(0u32..3000, 6),
    ) {
        let pool: Vec<Candidate> = classes
            .iter()
            .zip(&ratings)
            .enumerate()
            .map(|(i, (&class, &rating))| {
                candidate_with_class(&format!("p{i}"), Role::Melee, rating, class)
            })
            .collect();

        let rules = SplitRules::new(3, false, false).with_class_stacking(1, 0);
        if let Ok(split) = find_best_split(&pool, &rules, None) {
            for team in [&split.team1, &split.team2] {
                for (pos, &i) in team.iter().enumerate() {
                    for &j in &team[pos + 1..] {
                        prop_assert_ne!(pool[i].class_tag, pool[j].class_tag);
                    }
                }
            }
        }
    }
}
