//! Exhaustive search for the best rating-balanced team split
//!
//! Enumerates all `C(n, team_size)` ways to pick team 1 from the selected
//! candidates (team 2 is the complement), filters out splits that violate
//! the healer-balance or class-stacking constraints, and keeps the split
//! with the smallest absolute rating-sum difference. Ties are broken by the
//! number of same-team social-conflict pairs. For the normal 3v3 case this
//! is 20 combinations, so no pruning is needed.

use crate::matchmaking::class_mask::class_mask_bit;
use crate::queue::social::SocialConflicts;
use crate::types::{Candidate, TeamSplit};
use crate::NoMatchReason;

/// Composition rules applied to every enumerated split
#[derive(Debug, Clone)]
pub struct SplitRules {
    /// Players per team.
    pub team_size: usize,
    /// Enforce healer-balance composition constraints.
    pub enforce_roles: bool,
    /// When true, no healers are allowed on either team.
    pub all_dps_match: bool,
    /// Class-stacking prevention level; 0 disables the filter.
    pub class_stack_level: u8,
    /// Bitmask of affected classes; 0 means all classes are checked.
    pub class_stack_mask: u32,
}

impl SplitRules {
    /// Rules for a role-enforced match produced by the selector.
    pub fn new(team_size: usize, enforce_roles: bool, all_dps_match: bool) -> Self {
        Self {
            team_size,
            enforce_roles,
            all_dps_match,
            class_stack_level: 0,
            class_stack_mask: 0,
        }
    }

    pub fn with_class_stacking(mut self, level: u8, mask: u32) -> Self {
        self.class_stack_level = level;
        self.class_stack_mask = mask;
        self
    }
}

/// Running best-split state threaded through the enumeration.
struct SearchState {
    best_team1: Vec<usize>,
    best_diff: u64,
    best_conflicts: usize,
    have_best: bool,
}

/// Find the optimal split of `selected` into two teams of `rules.team_size`.
///
/// Enumeration follows increasing-index combination order and only a
/// strictly better (diff, conflict-count) pair replaces the current best,
/// so the result is deterministic for a given input order. The returned
/// index sets are disjoint and partition `[0, len)`.
///
/// Returns [`NoMatchReason::NoValidPartition`] when every split fails a
/// constraint filter.
pub fn find_best_split(
    selected: &[Candidate],
    rules: &SplitRules,
    social: Option<&dyn SocialConflicts>,
) -> Result<TeamSplit, NoMatchReason> {
    let n = selected.len();
    if rules.team_size == 0 || n < rules.team_size * 2 {
        return Err(NoMatchReason::NoValidPartition);
    }

    let mut combo = vec![0usize; rules.team_size];
    let mut state = SearchState {
        best_team1: Vec::new(),
        best_diff: 0,
        best_conflicts: 0,
        have_best: false,
    };

    enumerate(0, 0, &mut combo, selected, rules, social, &mut state);

    if !state.have_best {
        return Err(NoMatchReason::NoValidPartition);
    }

    let team2 = complement(&state.best_team1, n);
    Ok(TeamSplit {
        team1: state.best_team1,
        team2,
        rating_diff: state.best_diff,
    })
}

/// Build the complement of a sorted index combination within `[0, n)`.
fn complement(team1: &[usize], n: usize) -> Vec<usize> {
    let mut team2 = Vec::with_capacity(n - team1.len());
    let mut ci = 0;
    for i in 0..n {
        if ci < team1.len() && team1[ci] == i {
            ci += 1;
            continue;
        }
        team2.push(i);
    }
    team2
}

/// Recursive index-combination generator over team 1.
fn enumerate(
    start: usize,
    depth: usize,
    combo: &mut Vec<usize>,
    selected: &[Candidate],
    rules: &SplitRules,
    social: Option<&dyn SocialConflicts>,
    state: &mut SearchState,
) {
    let n = selected.len();
    let team_size = rules.team_size;

    if depth == team_size {
        let team2 = complement(combo, n);

        if rules.enforce_roles {
            let h1 = combo
                .iter()
                .filter(|&&i| selected[i].role.is_healer())
                .count();
            let h2 = team2
                .iter()
                .filter(|&&i| selected[i].role.is_healer())
                .count();

            if rules.all_dps_match && (h1 != 0 || h2 != 0) {
                return;
            }
            if !rules.all_dps_match && (h1 != 1 || h2 != 1) {
                return;
            }
        }

        if rules.class_stack_level > 0
            && (has_class_stacking_conflict(combo, selected, rules)
                || has_class_stacking_conflict(&team2, selected, rules))
        {
            return;
        }

        let sum1: u64 = combo.iter().map(|&i| selected[i].rating as u64).sum();
        let sum2: u64 = team2.iter().map(|&i| selected[i].rating as u64).sum();
        let diff = sum1.abs_diff(sum2);

        let conflicts =
            count_conflict_pairs(combo, selected, social) + count_conflict_pairs(&team2, selected, social);

        if !state.have_best
            || diff < state.best_diff
            || (diff == state.best_diff && conflicts < state.best_conflicts)
        {
            state.have_best = true;
            state.best_diff = diff;
            state.best_conflicts = conflicts;
            state.best_team1.clear();
            state.best_team1.extend_from_slice(combo);
        }
        return;
    }

    for i in start..=(n - (team_size - depth)) {
        combo[depth] = i;
        enumerate(i + 1, depth + 1, combo, selected, rules, social, state);
    }
}

/// True when the given team contains two candidates of the same class that
/// conflict under the configured stacking level and class mask.
fn has_class_stacking_conflict(indices: &[usize], pool: &[Candidate], rules: &SplitRules) -> bool {
    for (pos, &i) in indices.iter().enumerate() {
        for &j in &indices[pos + 1..] {
            let a = &pool[i];
            let b = &pool[j];

            if a.class_tag == 0 || a.class_tag != b.class_tag {
                continue;
            }

            // Optional class filter; 0 means all classes are checked
            if rules.class_stack_mask != 0
                && rules.class_stack_mask & class_mask_bit(a.class_tag) == 0
            {
                continue;
            }

            // Levels 2-4 all scope to DPS pairs since melee and ranged
            // collapse to DPS for composition purposes; levels 5-6 block
            // any same-class pair involving a healer.
            let conflicting = match rules.class_stack_level {
                1 => true,
                2..=4 => a.role.is_dps() && b.role.is_dps(),
                5 | 6 => a.role.is_healer() || b.role.is_healer(),
                _ => false,
            };
            if conflicting {
                return true;
            }
        }
    }
    false
}

/// Count same-team pairs flagged as mutually incompatible.
fn count_conflict_pairs(
    indices: &[usize],
    pool: &[Candidate],
    social: Option<&dyn SocialConflicts>,
) -> usize {
    let Some(social) = social else {
        return 0;
    };

    let mut pairs = 0;
    for (pos, &i) in indices.iter().enumerate() {
        for &j in &indices[pos + 1..] {
            if social.is_conflict(&pool[i].id, &pool[j].id) {
                pairs += 1;
            }
        }
    }
    pairs
}
