//! Integration tests for the arena-queue matchmaking service
//!
//! These tests drive the queue manager end to end: queue requests in,
//! ticks against the pool, and match events out through the publisher.

mod fixtures;

use arena_queue::config::MatchmakingSettings;
use arena_queue::queue::classify::DeclaredRoleClassifier;
use arena_queue::queue::manager::QueueManager;
use arena_queue::queue::social::InMemoryIgnoreList;
use arena_queue::types::{LeaveReason, Role};
use arena_queue::utils::now_millis;
use std::sync::Arc;

use fixtures::{queue_request, queue_request_with_class, RecordingEventPublisher};

/// Build a manager wired to a recording publisher and an optional ignore list
fn create_test_system(
    settings: MatchmakingSettings,
    ignores: InMemoryIgnoreList,
) -> (QueueManager, Arc<RecordingEventPublisher>) {
    let publisher = Arc::new(RecordingEventPublisher::new());
    let manager = QueueManager::new(
        settings,
        Arc::new(DeclaredRoleClassifier::new()),
        Arc::new(ignores),
        publisher.clone(),
    );
    (manager, publisher)
}

fn default_system() -> (QueueManager, Arc<RecordingEventPublisher>) {
    create_test_system(MatchmakingSettings::default(), InMemoryIgnoreList::new())
}

fn team_ids(team: &[arena_queue::types::Candidate]) -> Vec<&str> {
    team.iter().map(|c| c.id.as_str()).collect()
}

#[tokio::test]
async fn test_standard_match_splits_healers_across_teams() {
    let (manager, publisher) = default_system();

    manager.handle_queue_request(queue_request("h1", Role::Healer, 1520)).await.unwrap();
    manager.handle_queue_request(queue_request("h2", Role::Healer, 1480)).await.unwrap();
    manager.handle_queue_request(queue_request("d1", Role::Melee, 1500)).await.unwrap();
    manager.handle_queue_request(queue_request("d2", Role::Melee, 1510)).await.unwrap();
    manager.handle_queue_request(queue_request("d3", Role::Ranged, 1490)).await.unwrap();
    manager.handle_queue_request(queue_request("d4", Role::Ranged, 1505)).await.unwrap();

    assert_eq!(publisher.queued_players().len(), 6);

    let match_found = manager.tick(now_millis()).await.unwrap().expect("expected a match");

    assert!(!match_found.all_dps_match);
    assert_eq!(match_found.team1.len(), 3);
    assert_eq!(match_found.team2.len(), 3);

    // Exactly one healer per team
    let healers1 = match_found.team1.iter().filter(|c| c.role == Role::Healer).count();
    let healers2 = match_found.team2.iter().filter(|c| c.role == Role::Healer).count();
    assert_eq!(healers1, 1);
    assert_eq!(healers2, 1);

    // The match event went out and the pool is drained
    assert_eq!(publisher.match_events().len(), 1);
    assert_eq!(manager.waiting_count(), 0);
}

#[tokio::test]
async fn test_insufficient_pool_produces_no_match() {
    let (manager, publisher) = default_system();

    for i in 0..5 {
        manager
            .handle_queue_request(queue_request(&format!("p{i}"), Role::Melee, 1500))
            .await
            .unwrap();
    }

    let result = manager.tick(now_millis()).await.unwrap();
    assert!(result.is_none());
    assert!(publisher.match_events().is_empty());
    assert_eq!(manager.waiting_count(), 5);
}

#[tokio::test]
async fn test_no_healer_fallback_waits_for_timer() {
    let settings = MatchmakingSettings {
        no_healer_timer_secs: 60,
        ..MatchmakingSettings::default()
    };
    let (manager, publisher) = create_test_system(settings, InMemoryIgnoreList::new());

    for i in 0..6 {
        manager
            .handle_queue_request(queue_request(&format!("d{i}"), Role::Melee, 1500))
            .await
            .unwrap();
    }

    // Before the timer expires the all-DPS pool forms nothing
    let result = manager.tick(now_millis()).await.unwrap();
    assert!(result.is_none());
    assert_eq!(manager.waiting_count(), 6);

    // Past the timer the fallback match is allowed
    let match_found = manager
        .tick(now_millis() + 61_000)
        .await
        .unwrap()
        .expect("expected a fallback match");
    assert!(match_found.all_dps_match);
    assert_eq!(publisher.match_events().len(), 1);
    assert_eq!(manager.waiting_count(), 0);

    let stats = manager.get_stats().unwrap();
    assert_eq!(stats.fallback_matches, 1);
}

#[tokio::test]
async fn test_lone_healer_stays_queued_through_fallback() {
    let settings = MatchmakingSettings {
        one_healer_timer_secs: 120,
        ..MatchmakingSettings::default()
    };
    let (manager, _publisher) = create_test_system(settings, InMemoryIgnoreList::new());

    manager.handle_queue_request(queue_request("lonely", Role::Healer, 1500)).await.unwrap();
    for i in 0..6 {
        manager
            .handle_queue_request(queue_request(&format!("d{i}"), Role::Ranged, 1500))
            .await
            .unwrap();
    }

    // One healer present: composition is unbalanced until the longer timer
    let result = manager.tick(now_millis()).await.unwrap();
    assert!(result.is_none());

    let match_found = manager
        .tick(now_millis() + 121_000)
        .await
        .unwrap()
        .expect("expected a fallback match");
    assert!(match_found.all_dps_match);

    // The healer never rides along on an all-DPS match
    assert!(!team_ids(&match_found.team1).contains(&"lonely"));
    assert!(!team_ids(&match_found.team2).contains(&"lonely"));
    assert_eq!(manager.waiting_count(), 1);
}

#[tokio::test]
async fn test_class_stacking_can_block_every_partition() {
    let settings = MatchmakingSettings {
        class_stack_level: 1,
        ..MatchmakingSettings::default()
    };
    let (manager, publisher) = create_test_system(settings, InMemoryIgnoreList::new());

    // Two healers and four DPS all on the same class: any team of three
    // holds a same-class pair, so no valid split exists.
    manager
        .handle_queue_request(queue_request_with_class("h1", Role::Healer, 1500, 4))
        .await
        .unwrap();
    manager
        .handle_queue_request(queue_request_with_class("h2", Role::Healer, 1500, 4))
        .await
        .unwrap();
    for i in 0..4 {
        manager
            .handle_queue_request(queue_request_with_class(&format!("d{i}"), Role::Melee, 1500, 4))
            .await
            .unwrap();
    }

    let result = manager.tick(now_millis()).await.unwrap();
    assert!(result.is_none());
    assert!(publisher.match_events().is_empty());
    assert_eq!(manager.waiting_count(), 6);

    let stats = manager.get_stats().unwrap();
    assert_eq!(stats.empty_ticks, 1);
}

#[tokio::test]
async fn test_rating_split_is_minimized() {
    let (manager, _publisher) = default_system();

    // Healers at 2000 and 1000 must split; DPS are all equal, so the best
    // achievable diff is exactly the healer gap.
    manager.handle_queue_request(queue_request("rich", Role::Healer, 2000)).await.unwrap();
    manager.handle_queue_request(queue_request("poor", Role::Healer, 1000)).await.unwrap();
    for i in 0..4 {
        manager
            .handle_queue_request(queue_request(&format!("d{i}"), Role::Melee, 1500))
            .await
            .unwrap();
    }

    let match_found = manager.tick(now_millis()).await.unwrap().expect("expected a match");
    assert_eq!(match_found.rating_diff, 1000);

    let rich_on_team1 = team_ids(&match_found.team1).contains(&"rich");
    let poor_on_team1 = team_ids(&match_found.team1).contains(&"poor");
    assert_ne!(rich_on_team1, poor_on_team1);
}

#[tokio::test]
async fn test_ignored_pair_separated_when_balance_allows() {
    let mut ignores = InMemoryIgnoreList::new();
    ignores.add_ignore("d1", "d2");
    let (manager, _publisher) = create_test_system(MatchmakingSettings::default(), ignores);

    manager.handle_queue_request(queue_request("h1", Role::Healer, 1500)).await.unwrap();
    manager.handle_queue_request(queue_request("h2", Role::Healer, 1500)).await.unwrap();
    for i in 1..=4 {
        manager
            .handle_queue_request(queue_request(&format!("d{i}"), Role::Melee, 1500))
            .await
            .unwrap();
    }

    let match_found = manager.tick(now_millis()).await.unwrap().expect("expected a match");
    assert_eq!(match_found.rating_diff, 0);

    // Equal ratings leave many zero-diff splits; the tie-breaker must
    // keep the ignoring pair on opposite teams.
    let d1_on_team1 = team_ids(&match_found.team1).contains(&"d1");
    let d2_on_team1 = team_ids(&match_found.team1).contains(&"d2");
    assert_ne!(d1_on_team1, d2_on_team1);
}

#[tokio::test]
async fn test_oldest_players_matched_first() {
    let (manager, _publisher) = default_system();

    // Eight DPS and two healers; the four oldest DPS should be picked.
    manager.handle_queue_request(queue_request("h1", Role::Healer, 1500)).await.unwrap();
    manager.handle_queue_request(queue_request("h2", Role::Healer, 1500)).await.unwrap();
    for i in 0..8 {
        manager
            .handle_queue_request(queue_request(&format!("d{i}"), Role::Melee, 1500))
            .await
            .unwrap();
    }

    let match_found = manager.tick(now_millis() + 1).await.unwrap().expect("expected a match");

    let mut matched: Vec<String> = match_found
        .team1
        .iter()
        .chain(&match_found.team2)
        .map(|c| c.id.clone())
        .collect();
    matched.sort();
    assert_eq!(matched, vec!["d0", "d1", "d2", "d3", "h1", "h2"]);
    assert_eq!(manager.waiting_count(), 4);
}

#[tokio::test]
async fn test_leave_then_tick_uses_remaining_pool() {
    let (manager, publisher) = default_system();

    manager.handle_queue_request(queue_request("h1", Role::Healer, 1500)).await.unwrap();
    manager.handle_queue_request(queue_request("h2", Role::Healer, 1500)).await.unwrap();
    for i in 0..4 {
        manager
            .handle_queue_request(queue_request(&format!("d{i}"), Role::Melee, 1500))
            .await
            .unwrap();
    }

    // A healer disconnects before the tick; five players cannot match
    manager.remove_player("h2", LeaveReason::Disconnect).await.unwrap();

    let result = manager.tick(now_millis()).await.unwrap();
    assert!(result.is_none());
    assert_eq!(manager.waiting_count(), 5);

    let left = publisher.left.lock().unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].player_id, "h2");
    assert_eq!(left[0].reason, LeaveReason::Disconnect);
}

#[tokio::test]
async fn test_role_enforcement_disabled_is_pure_fifo() {
    let settings = MatchmakingSettings {
        enforce_roles: false,
        ..MatchmakingSettings::default()
    };
    let (manager, _publisher) = create_test_system(settings, InMemoryIgnoreList::new());

    // No healers at all, no timers involved: FIFO head matches immediately
    for i in 0..6 {
        manager
            .handle_queue_request(queue_request(&format!("d{i}"), Role::Ranged, 1500))
            .await
            .unwrap();
    }

    let match_found = manager.tick(now_millis()).await.unwrap().expect("expected a match");
    assert!(!match_found.all_dps_match);
    assert_eq!(manager.waiting_count(), 0);
}

#[tokio::test]
async fn test_consecutive_matches_from_one_queue() {
    let (manager, publisher) = default_system();

    for wave in 0..2 {
        manager
            .handle_queue_request(queue_request(&format!("h{wave}a"), Role::Healer, 1500))
            .await
            .unwrap();
        manager
            .handle_queue_request(queue_request(&format!("h{wave}b"), Role::Healer, 1500))
            .await
            .unwrap();
        for i in 0..4 {
            manager
                .handle_queue_request(queue_request(&format!("d{wave}{i}"), Role::Melee, 1500))
                .await
                .unwrap();
        }
    }

    assert_eq!(manager.waiting_count(), 12);

    let first = manager.tick(now_millis()).await.unwrap();
    assert!(first.is_some());
    let second = manager.tick(now_millis()).await.unwrap();
    assert!(second.is_some());
    let third = manager.tick(now_millis()).await.unwrap();
    assert!(third.is_none());

    assert_eq!(publisher.match_events().len(), 2);
    assert_eq!(manager.waiting_count(), 0);

    let stats = manager.get_stats().unwrap();
    assert_eq!(stats.matches_formed, 2);
    assert_eq!(stats.players_queued, 12);
}
