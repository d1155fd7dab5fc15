//! Candidate selection for a single arena match
//!
//! Consumes the full FIFO-ordered waiting pool and decides whether a valid
//! set of `2 * team_size` candidates exists right now. Role composition is
//! enforced when configured: the standard path takes the two oldest healers
//! plus the oldest DPS, and two fallback paths allow an all-DPS match once
//! the relevant wait timer has elapsed.

use crate::error::NoMatchReason;
use crate::types::{Candidate, Selection};
use tracing::debug;

/// Configuration thresholds for candidate selection
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Players per team (normally 3).
    pub team_size: usize,
    /// Enforce role-based composition rules.
    pub enforce_roles: bool,
    /// Wait time in ms before the all-DPS fallback when no healer is queued.
    pub no_healer_timer_ms: u64,
    /// Wait time in ms before the all-DPS fallback when exactly one healer
    /// is queued.
    pub one_healer_timer_ms: u64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            team_size: 3,
            enforce_roles: true,
            no_healer_timer_ms: 60_000,
            one_healer_timer_ms: 120_000,
        }
    }
}

/// Select a valid set of candidates for a single match.
///
/// `candidates` must reflect true arrival order (earliest first); the
/// selector buckets by role itself and preserves that order within each
/// bucket, so no candidate is ever skipped over by a same-role candidate
/// that joined later.
///
/// Pure function of its inputs; failure is a structured [`NoMatchReason`],
/// never an exceptional control path.
pub fn select_candidates(
    candidates: &[Candidate],
    config: &SelectorConfig,
    now_ms: u64,
) -> Result<Selection, NoMatchReason> {
    let needed = config.team_size * 2;

    if candidates.len() < needed {
        return Err(NoMatchReason::InsufficientPool);
    }

    if !config.enforce_roles {
        // No role filtering: take the first 2 * team_size players (FIFO)
        return Ok(Selection {
            candidates: candidates[..needed].to_vec(),
            all_dps_match: false,
        });
    }

    // Bucket by role, preserving FIFO order within each bucket
    let (healers, dps): (Vec<&Candidate>, Vec<&Candidate>) =
        candidates.iter().partition(|c| c.role.is_healer());

    // One healer per team, except in single-player diagnostic mode
    let healers_needed = if config.team_size > 1 { 2 } else { 0 };
    let dps_needed = needed - healers_needed;

    if healers.len() >= healers_needed && dps.len() >= dps_needed {
        // Standard path: oldest healers + oldest DPS
        let selected = healers
            .iter()
            .take(healers_needed)
            .chain(dps.iter().take(dps_needed))
            .map(|c| (*c).clone())
            .collect();

        return Ok(Selection {
            candidates: selected,
            all_dps_match: false,
        });
    }

    if healers.is_empty() {
        // All-DPS fallback: only DPS players whose wait timer has elapsed
        return select_timed_dps(&dps, needed, config.no_healer_timer_ms, now_ms);
    }

    if healers.len() == 1 {
        // A 1-healer pool can never split evenly; the lone healer stays
        // queued and an all-DPS match forms once enough DPS have waited.
        return select_timed_dps(&dps, needed, config.one_healer_timer_ms, now_ms);
    }

    Err(NoMatchReason::UnbalancedComposition)
}

/// Shared body of the two all-DPS fallback paths.
fn select_timed_dps(
    dps: &[&Candidate],
    needed: usize,
    timer_ms: u64,
    now_ms: u64,
) -> Result<Selection, NoMatchReason> {
    let timed: Vec<&Candidate> = dps
        .iter()
        .copied()
        .filter(|c| c.joined_at_ms + timer_ms <= now_ms)
        .collect();

    if timed.len() < needed {
        debug!(
            eligible = timed.len(),
            needed, "all-DPS fallback timer not yet satisfied"
        );
        return Err(NoMatchReason::UnbalancedComposition);
    }

    Ok(Selection {
        candidates: timed.into_iter().take(needed).cloned().collect(),
        all_dps_match: true,
    })
}
