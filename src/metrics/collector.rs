//! Metrics collection using Prometheus
//!
//! This module provides comprehensive metrics collection for the arena-queue
//! matchmaking service using Prometheus metrics.

use crate::error::NoMatchReason;
use crate::queue::manager::QueueManagerStats;
use crate::types::Role;
use anyhow::Result;
use prometheus::{
    Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, IntGaugeVec,
    Opts, Registry,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the matchmaking service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Service-level metrics
    service_metrics: ServiceMetrics,

    /// Queue-related metrics
    queue_metrics: QueueMetrics,

    /// Match-related metrics
    match_metrics: MatchMetrics,

    /// Performance metrics
    performance_metrics: PerformanceMetrics,
}

/// Service-level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// Service uptime in seconds
    pub uptime_seconds: IntGauge,

    /// Total AMQP messages processed
    pub amqp_messages_total: IntCounterVec,

    /// AMQP message processing errors
    pub amqp_errors_total: IntCounterVec,

    /// Health check status (0=unhealthy, 1=degraded, 2=healthy)
    pub health_status: IntGauge,

    /// Component health status
    pub component_health: IntGaugeVec,
}

/// Queue-related metrics
#[derive(Clone)]
pub struct QueueMetrics {
    /// Total players queued by role
    pub players_queued_total: IntCounterVec,

    /// Players currently waiting in queue
    pub players_waiting: IntGauge,

    /// Total players that left the queue without a match
    pub players_left_total: IntCounter,

    /// Player queue wait time
    pub queue_wait_time_seconds: HistogramVec,
}

/// Match-related metrics
#[derive(Clone)]
pub struct MatchMetrics {
    /// Total matches formed, labelled standard or all_dps
    pub matches_formed_total: IntCounterVec,

    /// Ticks that produced no match, by reason
    pub no_match_total: IntCounterVec,

    /// Rating imbalance between the two teams of a formed match
    pub rating_diff: Histogram,
}

/// Performance metrics
#[derive(Clone)]
pub struct PerformanceMetrics {
    /// Queue request processing time
    pub queue_processing_duration: Histogram,

    /// Matchmaking tick duration (selection + partition + assignment)
    pub tick_duration: Histogram,

    /// AMQP operation durations
    pub amqp_operation_duration: HistogramVec,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let service_metrics = ServiceMetrics::new(&registry)?;
        let queue_metrics = QueueMetrics::new(&registry)?;
        let match_metrics = MatchMetrics::new(&registry)?;
        let performance_metrics = PerformanceMetrics::new(&registry)?;

        Ok(Self {
            registry,
            service_metrics,
            queue_metrics,
            match_metrics,
            performance_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Get service metrics
    pub fn service(&self) -> &ServiceMetrics {
        &self.service_metrics
    }

    /// Get queue metrics
    pub fn queue(&self) -> &QueueMetrics {
        &self.queue_metrics
    }

    /// Get match metrics
    pub fn matches(&self) -> &MatchMetrics {
        &self.match_metrics
    }

    /// Get performance metrics
    pub fn performance(&self) -> &PerformanceMetrics {
        &self.performance_metrics
    }

    /// Record a queue request being accepted
    pub fn record_queue_request(&self, role: Role) {
        self.queue_metrics
            .players_queued_total
            .with_label_values(&[role_label(role)])
            .inc();
    }

    /// Set the current queue depth
    pub fn set_queue_depth(&self, depth: usize) {
        self.queue_metrics.players_waiting.set(depth as i64);
    }

    /// Record a player leaving the queue unmatched
    pub fn record_player_left(&self) {
        self.queue_metrics.players_left_total.inc();
    }

    /// Record the wait time of a matched player
    pub fn record_wait_time(&self, role: Role, wait: Duration) {
        self.queue_metrics
            .queue_wait_time_seconds
            .with_label_values(&[role_label(role)])
            .observe(wait.as_secs_f64());
    }

    /// Record a formed match
    pub fn record_match_formed(&self, rating_diff: u64, all_dps: bool, tick_duration: Duration) {
        let kind = if all_dps { "all_dps" } else { "standard" };

        self.match_metrics
            .matches_formed_total
            .with_label_values(&[kind])
            .inc();
        self.match_metrics.rating_diff.observe(rating_diff as f64);
        self.performance_metrics
            .tick_duration
            .observe(tick_duration.as_secs_f64());
    }

    /// Record a tick that produced no match
    pub fn record_no_match(&self, reason: NoMatchReason) {
        self.match_metrics
            .no_match_total
            .with_label_values(&[no_match_label(reason)])
            .inc();
    }

    /// Record queue request processing duration
    pub fn record_queue_processing(&self, duration: Duration) {
        self.performance_metrics
            .queue_processing_duration
            .observe(duration.as_secs_f64());
    }

    /// Record AMQP operation
    pub fn record_amqp_operation(&self, operation: &str, success: bool, duration: Duration) {
        let status = if success { "success" } else { "error" };

        self.service_metrics
            .amqp_messages_total
            .with_label_values(&[operation, status])
            .inc();

        if !success {
            self.service_metrics
                .amqp_errors_total
                .with_label_values(&[operation])
                .inc();
        }

        self.performance_metrics
            .amqp_operation_duration
            .with_label_values(&[operation, status])
            .observe(duration.as_secs_f64());
    }

    /// Update gauges from queue manager stats
    pub fn update_from_queue_stats(&self, stats: &QueueManagerStats) {
        self.queue_metrics
            .players_waiting
            .set(stats.players_waiting as i64);
    }

    /// Update health status
    pub fn update_health_status(&self, status: u8) {
        self.service_metrics.health_status.set(status as i64);
    }

    /// Update component health
    pub fn update_component_health(&self, component: &str, healthy: bool) {
        let status = if healthy { 1 } else { 0 };
        self.service_metrics
            .component_health
            .with_label_values(&[component])
            .set(status);
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Melee => "melee",
        Role::Ranged => "ranged",
        Role::Healer => "healer",
    }
}

fn no_match_label(reason: NoMatchReason) -> &'static str {
    match reason {
        NoMatchReason::InsufficientPool => "insufficient_pool",
        NoMatchReason::UnbalancedComposition => "unbalanced_composition",
        NoMatchReason::NoValidPartition => "no_valid_partition",
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let uptime_seconds =
            IntGauge::new("arena_queue_uptime_seconds", "Service uptime in seconds")?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        let amqp_messages_total = IntCounterVec::new(
            Opts::new(
                "arena_queue_amqp_messages_total",
                "Total AMQP messages processed",
            ),
            &["operation", "status"],
        )?;
        registry.register(Box::new(amqp_messages_total.clone()))?;

        let amqp_errors_total = IntCounterVec::new(
            Opts::new("arena_queue_amqp_errors_total", "Total AMQP errors"),
            &["operation"],
        )?;
        registry.register(Box::new(amqp_errors_total.clone()))?;

        let health_status = IntGauge::new(
            "arena_queue_health_status",
            "Health status (0=unhealthy, 1=degraded, 2=healthy)",
        )?;
        registry.register(Box::new(health_status.clone()))?;

        let component_health = IntGaugeVec::new(
            Opts::new("arena_queue_component_health", "Component health status"),
            &["component"],
        )?;
        registry.register(Box::new(component_health.clone()))?;

        Ok(Self {
            uptime_seconds,
            amqp_messages_total,
            amqp_errors_total,
            health_status,
            component_health,
        })
    }
}

impl QueueMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let players_queued_total = IntCounterVec::new(
            Opts::new("arena_queue_players_queued_total", "Total players queued"),
            &["role"],
        )?;
        registry.register(Box::new(players_queued_total.clone()))?;

        let players_waiting = IntGauge::new(
            "arena_queue_players_waiting",
            "Players currently waiting in queue",
        )?;
        registry.register(Box::new(players_waiting.clone()))?;

        let players_left_total = IntCounter::new(
            "arena_queue_players_left_total",
            "Players that left the queue without a match",
        )?;
        registry.register(Box::new(players_left_total.clone()))?;

        let queue_wait_time_seconds = HistogramVec::new(
            HistogramOpts::new(
                "arena_queue_wait_time_seconds",
                "Player queue wait time before a match",
            )
            .buckets(vec![5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0]),
            &["role"],
        )?;
        registry.register(Box::new(queue_wait_time_seconds.clone()))?;

        Ok(Self {
            players_queued_total,
            players_waiting,
            players_left_total,
            queue_wait_time_seconds,
        })
    }
}

impl MatchMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let matches_formed_total = IntCounterVec::new(
            Opts::new("arena_queue_matches_formed_total", "Total matches formed"),
            &["kind"],
        )?;
        registry.register(Box::new(matches_formed_total.clone()))?;

        let no_match_total = IntCounterVec::new(
            Opts::new(
                "arena_queue_no_match_total",
                "Matchmaking ticks that produced no match",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(no_match_total.clone()))?;

        let rating_diff = Histogram::with_opts(
            HistogramOpts::new(
                "arena_queue_rating_diff",
                "Rating imbalance between the teams of a formed match",
            )
            .buckets(vec![0.0, 25.0, 50.0, 100.0, 200.0, 400.0, 800.0]),
        )?;
        registry.register(Box::new(rating_diff.clone()))?;

        Ok(Self {
            matches_formed_total,
            no_match_total,
            rating_diff,
        })
    }
}

impl PerformanceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let queue_processing_duration = Histogram::with_opts(
            HistogramOpts::new(
                "arena_queue_processing_duration_seconds",
                "Queue request processing time",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        )?;
        registry.register(Box::new(queue_processing_duration.clone()))?;

        let tick_duration = Histogram::with_opts(
            HistogramOpts::new(
                "arena_queue_tick_duration_seconds",
                "Matchmaking tick duration",
            )
            .buckets(vec![0.0001, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        )?;
        registry.register(Box::new(tick_duration.clone()))?;

        let amqp_operation_duration = HistogramVec::new(
            HistogramOpts::new(
                "arena_queue_amqp_operation_duration_seconds",
                "AMQP operation duration",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["operation", "status"],
        )?;
        registry.register(Box::new(amqp_operation_duration.clone()))?;

        Ok(Self {
            queue_processing_duration,
            tick_duration,
            amqp_operation_duration,
        })
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new().expect("Failed to create default metrics collector")
    }
}
