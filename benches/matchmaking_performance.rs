//! Performance benchmarks for the matchmaking core

use arena_queue::config::MatchmakingSettings;
use arena_queue::matchmaking::{find_best_split, select_candidates, SelectorConfig, SplitRules};
use arena_queue::queue::classify::DeclaredRoleClassifier;
use arena_queue::queue::manager::QueueManager;
use arena_queue::queue::social::InMemoryIgnoreList;
use arena_queue::types::{Candidate, QueueRequest, Role};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

// No-op event publisher for benchmarks
#[derive(Debug, Clone)]
struct BenchEventPublisher;

#[async_trait::async_trait]
impl arena_queue::amqp::publisher::EventPublisher for BenchEventPublisher {
    async fn publish_player_queued(
        &self,
        _event: arena_queue::types::PlayerQueued,
    ) -> arena_queue::error::Result<()> {
        Ok(())
    }

    async fn publish_player_left(
        &self,
        _event: arena_queue::types::PlayerLeftQueue,
    ) -> arena_queue::error::Result<()> {
        Ok(())
    }

    async fn publish_match_found(
        &self,
        _event: arena_queue::types::MatchFound,
    ) -> arena_queue::error::Result<()> {
        Ok(())
    }
}

fn create_bench_manager() -> QueueManager {
    QueueManager::new(
        MatchmakingSettings::default(),
        Arc::new(DeclaredRoleClassifier::new()),
        Arc::new(InMemoryIgnoreList::new()),
        Arc::new(BenchEventPublisher),
    )
}

fn make_pool(healers: usize, dps: usize) -> Vec<Candidate> {
    let mut pool = Vec::with_capacity(healers + dps);
    for i in 0..healers {
        pool.push(Candidate {
            id: format!("h{i}"),
            role: Role::Healer,
            rating: 1400 + (i as u32 * 37) % 300,
            joined_at_ms: i as u64,
            class_tag: (i % 11) as u8 + 1,
        });
    }
    for i in 0..dps {
        pool.push(Candidate {
            id: format!("d{i}"),
            role: if i % 2 == 0 { Role::Melee } else { Role::Ranged },
            rating: 1300 + (i as u32 * 53) % 500,
            joined_at_ms: i as u64,
            class_tag: (i % 11) as u8 + 1,
        });
    }
    pool
}

fn bench_candidate_selection(c: &mut Criterion) {
    let config = SelectorConfig::default();

    // Deep queue: two healers buried in a hundred DPS
    let pool = make_pool(2, 100);

    c.bench_function("select_candidates_100_players", |b| {
        b.iter(|| black_box(select_candidates(black_box(&pool), &config, 0)))
    });
}

fn bench_team_partitioning(c: &mut Criterion) {
    let rules = SplitRules::new(3, true, false);
    let pool = make_pool(2, 4);

    c.bench_function("find_best_split_3v3", |b| {
        b.iter(|| black_box(find_best_split(black_box(&pool), &rules, None)))
    });

    // Larger teams grow the combination count from 20 to 252
    let rules_5v5 = SplitRules::new(5, true, false);
    let pool_5v5 = make_pool(2, 8);

    c.bench_function("find_best_split_5v5", |b| {
        b.iter(|| black_box(find_best_split(black_box(&pool_5v5), &rules_5v5, None)))
    });
}

fn bench_partitioning_with_class_filter(c: &mut Criterion) {
    let rules = SplitRules::new(3, true, false).with_class_stacking(1, 0);
    let pool = make_pool(2, 4);

    c.bench_function("find_best_split_class_filtered", |b| {
        b.iter(|| black_box(find_best_split(black_box(&pool), &rules, None)))
    });
}

fn bench_full_tick(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("queue_and_tick_6_players", |b| {
        b.iter(|| {
            rt.block_on(async {
                let manager = create_bench_manager();

                for (i, role) in [Role::Healer, Role::Healer, Role::Melee, Role::Melee, Role::Ranged, Role::Ranged]
                    .iter()
                    .enumerate()
                {
                    let request = QueueRequest {
                        player_id: format!("bench_{i}"),
                        role: *role,
                        rating: 1500 + i as u32 * 10,
                        class_tag: 0,
                        timestamp: arena_queue::utils::current_timestamp(),
                    };
                    let _ = manager.handle_queue_request(request).await;
                }

                black_box(manager.tick(arena_queue::utils::now_millis()).await)
            })
        })
    });
}

criterion_group!(
    benches,
    bench_candidate_selection,
    bench_team_partitioning,
    bench_partitioning_with_class_filter,
    bench_full_tick
);
criterion_main!(benches);
