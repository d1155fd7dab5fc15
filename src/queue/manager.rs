//! Queue manager driving the matchmaking core
//!
//! Owns the FIFO waiting pool, feeds snapshots of it to the selector and
//! partitioner once per tick, and applies successful results back to the
//! pool atomically. Everything the core treats as a collaborator (role
//! classification, the social graph, event publishing, metrics) is injected
//! here.

use crate::amqp::publisher::EventPublisher;
use crate::config::MatchmakingSettings;
use crate::error::{MatchmakingError, NoMatchReason, Result};
use crate::matchmaking::{find_best_split, select_candidates, SelectorConfig, SplitRules};
use crate::metrics::MetricsCollector;
use crate::queue::classify::RoleClassifier;
use crate::queue::social::SocialConflicts;
use crate::queue::statistics::WaitStatisticsTracker;
use crate::types::{Candidate, LeaveReason, MatchFound, PlayerLeftQueue, PlayerQueued, QueueRequest};
use crate::utils::{current_timestamp, generate_match_id, now_millis};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Statistics about queue manager operations
#[derive(Debug, Clone, Default)]
pub struct QueueManagerStats {
    /// Total number of players queued
    pub players_queued: u64,
    /// Total number of players that left without a match
    pub players_left: u64,
    /// Total number of matches formed
    pub matches_formed: u64,
    /// Matches formed through a no-healer fallback path
    pub fallback_matches: u64,
    /// Ticks that produced no match
    pub empty_ticks: u64,
    /// Current number of players waiting
    pub players_waiting: usize,
}

/// The main queue manager
#[derive(Clone)]
pub struct QueueManager {
    /// Waiting pool in arrival order
    pool: Arc<RwLock<Vec<Candidate>>>,
    /// Matchmaking thresholds and composition rules
    settings: MatchmakingSettings,
    /// Role classification collaborator
    classifier: Arc<dyn RoleClassifier>,
    /// Social-ignore collaborator for the partition tie-breaker
    social: Arc<dyn SocialConflicts>,
    /// Event publisher for queue and match events
    event_publisher: Arc<dyn EventPublisher>,
    /// Manager statistics
    stats: Arc<RwLock<QueueManagerStats>>,
    /// Per-role wait-time statistics
    wait_stats: Arc<WaitStatisticsTracker>,
    /// Metrics collector for recording performance data
    metrics_collector: Arc<MetricsCollector>,
}

impl QueueManager {
    /// Create a new queue manager
    pub fn new(
        settings: MatchmakingSettings,
        classifier: Arc<dyn RoleClassifier>,
        social: Arc<dyn SocialConflicts>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        let metrics_collector = Arc::new(MetricsCollector::new().unwrap_or_else(|_| {
            warn!("Failed to create metrics collector, using default");
            MetricsCollector::default()
        }));

        Self::with_metrics(settings, classifier, social, event_publisher, metrics_collector)
    }

    /// Create a new queue manager with a metrics collector
    pub fn with_metrics(
        settings: MatchmakingSettings,
        classifier: Arc<dyn RoleClassifier>,
        social: Arc<dyn SocialConflicts>,
        event_publisher: Arc<dyn EventPublisher>,
        metrics_collector: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            pool: Arc::new(RwLock::new(Vec::new())),
            settings,
            classifier,
            social,
            event_publisher,
            stats: Arc::new(RwLock::new(QueueManagerStats::default())),
            wait_stats: Arc::new(WaitStatisticsTracker::new()),
            metrics_collector,
        }
    }

    /// Handle a queue request from a player
    pub async fn handle_queue_request(&self, request: QueueRequest) -> Result<()> {
        let role = self.classifier.classify(&request);
        let candidate = Candidate {
            id: request.player_id.clone(),
            role,
            rating: request.rating,
            joined_at_ms: now_millis(),
            class_tag: request.class_tag,
        };

        let queue_depth = {
            let mut pool = self.pool.write().map_err(|_| MatchmakingError::InternalError {
                message: "Failed to acquire pool lock".to_string(),
            })?;

            if pool.iter().any(|c| c.id == candidate.id) {
                return Err(MatchmakingError::PlayerAlreadyQueued {
                    player_id: candidate.id,
                }
                .into());
            }

            pool.push(candidate.clone());
            pool.len()
        };

        {
            let mut stats = self.stats.write().map_err(|_| MatchmakingError::InternalError {
                message: "Failed to acquire stats lock".to_string(),
            })?;
            stats.players_queued += 1;
            stats.players_waiting = queue_depth;
        }

        self.metrics_collector.record_queue_request(role);
        self.metrics_collector.set_queue_depth(queue_depth);

        info!(
            "Player queued - player_id: '{}', role: {}, rating: {}, queue_depth: {}",
            candidate.id, role, candidate.rating, queue_depth
        );

        self.event_publisher
            .publish_player_queued(PlayerQueued {
                player_id: candidate.id,
                role,
                rating: candidate.rating,
                queue_depth,
                timestamp: current_timestamp(),
            })
            .await?;

        Ok(())
    }

    /// Remove a player that left the queue before a match was formed
    pub async fn remove_player(&self, player_id: &str, reason: LeaveReason) -> Result<()> {
        let queue_depth = {
            let mut pool = self.pool.write().map_err(|_| MatchmakingError::InternalError {
                message: "Failed to acquire pool lock".to_string(),
            })?;

            let before = pool.len();
            pool.retain(|c| c.id != player_id);
            if pool.len() == before {
                return Err(MatchmakingError::PlayerNotFound {
                    player_id: player_id.to_string(),
                }
                .into());
            }
            pool.len()
        };

        {
            let mut stats = self.stats.write().map_err(|_| MatchmakingError::InternalError {
                message: "Failed to acquire stats lock".to_string(),
            })?;
            stats.players_left += 1;
            stats.players_waiting = queue_depth;
        }

        self.metrics_collector.record_player_left();
        self.metrics_collector.set_queue_depth(queue_depth);

        info!("Player left queue - player_id: '{}', reason: {:?}", player_id, reason);

        self.event_publisher
            .publish_player_left(PlayerLeftQueue {
                player_id: player_id.to_string(),
                reason,
                timestamp: current_timestamp(),
            })
            .await?;

        Ok(())
    }

    /// Run one matchmaking tick against the current pool.
    ///
    /// Returns the formed match, or `None` when no match is possible this
    /// tick; all `NoMatchReason`s are expected states, not errors.
    pub async fn tick(&self, now_ms: u64) -> Result<Option<MatchFound>> {
        let tick_start = std::time::Instant::now();

        // Consistent snapshot for the whole selection/partition run
        let snapshot = {
            let pool = self.pool.read().map_err(|_| MatchmakingError::InternalError {
                message: "Failed to acquire pool lock".to_string(),
            })?;
            pool.clone()
        };

        let selector_config = self.selector_config();
        let selection = match select_candidates(&snapshot, &selector_config, now_ms) {
            Ok(selection) => selection,
            Err(reason) => {
                self.record_empty_tick(reason)?;
                return Ok(None);
            }
        };

        let rules = SplitRules::new(
            self.settings.team_size,
            self.settings.enforce_roles,
            selection.all_dps_match,
        )
        .with_class_stacking(self.settings.class_stack_level, self.settings.class_stack_mask);

        let social = self
            .settings
            .avoid_ignored_pairs
            .then(|| self.social.as_ref());

        let split = match find_best_split(&selection.candidates, &rules, social) {
            Ok(split) => split,
            Err(reason) => {
                self.record_empty_tick(reason)?;
                return Ok(None);
            }
        };

        // Apply the result back to the live pool. A player may have left
        // between snapshot and now; in that case the whole match is void
        // and everyone stays queued for the next tick.
        let applied = {
            let mut pool = self.pool.write().map_err(|_| MatchmakingError::InternalError {
                message: "Failed to acquire pool lock".to_string(),
            })?;

            let all_present = selection
                .candidates
                .iter()
                .all(|sel| pool.iter().any(|c| c.id == sel.id));

            if all_present {
                pool.retain(|c| !selection.candidates.iter().any(|sel| sel.id == c.id));
                Some(pool.len())
            } else {
                None
            }
        };

        let Some(queue_depth) = applied else {
            debug!("Selected player left between snapshot and assignment, retrying next tick");
            self.record_empty_tick(NoMatchReason::InsufficientPool)?;
            return Ok(None);
        };

        for candidate in &selection.candidates {
            let waited = Duration::from_millis(now_ms.saturating_sub(candidate.joined_at_ms));
            self.wait_stats.record_wait(candidate.role, waited);
            self.metrics_collector.record_wait_time(candidate.role, waited);
        }

        let match_found = MatchFound {
            match_id: generate_match_id(),
            team1: split.team1.iter().map(|&i| selection.candidates[i].clone()).collect(),
            team2: split.team2.iter().map(|&i| selection.candidates[i].clone()).collect(),
            rating_diff: split.rating_diff,
            all_dps_match: selection.all_dps_match,
            timestamp: current_timestamp(),
        };

        {
            let mut stats = self.stats.write().map_err(|_| MatchmakingError::InternalError {
                message: "Failed to acquire stats lock".to_string(),
            })?;
            stats.matches_formed += 1;
            if selection.all_dps_match {
                stats.fallback_matches += 1;
            }
            stats.players_waiting = queue_depth;
        }

        self.metrics_collector.record_match_formed(
            split.rating_diff,
            selection.all_dps_match,
            tick_start.elapsed(),
        );
        self.metrics_collector.set_queue_depth(queue_depth);

        info!(
            "Match formed - match_id: {}, rating_diff: {}, all_dps: {}, queue_depth: {}",
            match_found.match_id, match_found.rating_diff, match_found.all_dps_match, queue_depth
        );

        self.event_publisher.publish_match_found(match_found.clone()).await?;

        Ok(Some(match_found))
    }

    /// Current number of players waiting
    pub fn waiting_count(&self) -> usize {
        self.pool.read().map(|p| p.len()).unwrap_or(0)
    }

    /// Get a snapshot of the manager statistics
    pub fn get_stats(&self) -> Result<QueueManagerStats> {
        self.stats
            .read()
            .map(|s| s.clone())
            .map_err(|_| {
                MatchmakingError::InternalError {
                    message: "Failed to acquire stats lock".to_string(),
                }
                .into()
            })
    }

    /// Per-role wait-time statistics tracker
    pub fn wait_statistics(&self) -> Arc<WaitStatisticsTracker> {
        self.wait_stats.clone()
    }

    fn selector_config(&self) -> SelectorConfig {
        SelectorConfig {
            team_size: self.settings.team_size,
            enforce_roles: self.settings.enforce_roles,
            no_healer_timer_ms: self.settings.no_healer_timer_secs * 1000,
            one_healer_timer_ms: self.settings.one_healer_timer_secs * 1000,
        }
    }

    fn record_empty_tick(&self, reason: NoMatchReason) -> Result<()> {
        debug!("No match this tick: {}", reason);

        {
            let mut stats = self.stats.write().map_err(|_| MatchmakingError::InternalError {
                message: "Failed to acquire stats lock".to_string(),
            })?;
            stats.empty_ticks += 1;
        }

        self.metrics_collector.record_no_match(reason);
        Ok(())
    }
}
