// Copyright 2024 The Halcyon Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use halcyon_rs::auth;
use halcyon_rs::config::SdkConfig;
use halcyon_rs::mock_platform::{MockCall, MockFailure, MockPlatform};
use halcyon_rs::platform::Platform;
use halcyon_rs::sequencer::{Phase, Sequencer, PERMANENTLY_LOCKED_ACHIEVEMENT};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type CallLog = Arc<Mutex<Vec<MockCall>>>;

fn sequencer_with(mock: MockPlatform) -> (Sequencer<MockPlatform>, CallLog, Arc<AtomicUsize>) {
    let calls = mock.call_log();
    let live = mock.live_records();
    let config = SdkConfig::default();
    let platform = Platform::new(mock, &config).expect("Failed to initialize platform");
    let session = auth::login(&platform, &config).expect("Failed to log in");
    let sequencer = Sequencer::new(&platform, session);
    (sequencer, calls, live)
}

fn position<F: Fn(&MockCall) -> bool>(calls: &[MockCall], predicate: F) -> usize {
    calls
        .iter()
        .position(predicate)
        .expect("Expected call is missing from the log")
}

#[test]
fn test_full_workflow() {
    let (mut sequencer, calls, live) = sequencer_with(MockPlatform::new().with_latency(3));
    sequencer.run().expect("Sequencer failed");

    assert_eq!(sequencer.phase(), Phase::Done);
    let progress = sequencer.progress();
    assert!(progress.subscription_active);
    assert!(progress.notification_received);
    assert!(progress.stat_ingested);
    assert!(progress.manual_achievement_unlocked);
    assert!(progress.query_succeeded);

    // Every successfully copied record was handed back.
    assert_eq!(live.load(Ordering::SeqCst), 0);

    let calls = calls.lock().unwrap();
    let copied_ok = calls
        .iter()
        .filter(|call| matches!(call, MockCall::CopyOk(_)))
        .count();
    let copy_failed: Vec<String> = calls
        .iter()
        .filter_map(|call| match call {
            MockCall::CopyFailed(id) => Some(id.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(copied_ok, 3);
    assert_eq!(copy_failed, vec![PERMANENTLY_LOCKED_ACHIEVEMENT.to_owned()]);

    // Teardown removes the notification subscription last.
    assert_eq!(calls.last(), Some(&MockCall::RemoveNotify));
}

#[test]
fn test_phase_ordering() {
    let (mut sequencer, calls, _) = sequencer_with(MockPlatform::new().with_latency(2));
    sequencer.run().expect("Sequencer failed");

    let calls = calls.lock().unwrap();
    let subscribe = position(&calls, |call| matches!(call, MockCall::AddNotify));
    let first_ingest = position(&calls, |call| matches!(call, MockCall::IngestStat(_)));
    let unlock = position(&calls, |call| matches!(call, MockCall::UnlockAchievements(_)));
    let query = position(&calls, |call| {
        matches!(call, MockCall::QueryPlayerAchievements)
    });
    let first_copy = position(&calls, |call| {
        matches!(call, MockCall::CopyOk(_) | MockCall::CopyFailed(_))
    });

    assert!(subscribe < first_ingest);
    assert!(subscribe < unlock);
    assert!(first_ingest < query);
    assert!(unlock < query);
    assert!(query < first_copy);
}

#[test]
fn test_query_issued_exactly_once() {
    let (mut sequencer, calls, _) = sequencer_with(MockPlatform::new().with_latency(5));
    sequencer.run().expect("Sequencer failed");

    let calls = calls.lock().unwrap();
    let queries = calls
        .iter()
        .filter(|call| matches!(call, MockCall::QueryPlayerAchievements))
        .count();
    assert_eq!(queries, 1);
}

#[test]
fn test_jittered_latency_preserves_ordering() {
    let (mut sequencer, calls, _) =
        sequencer_with(MockPlatform::new().with_latency(1).with_jitter(7, 42));
    sequencer.run().expect("Sequencer failed");

    let calls = calls.lock().unwrap();
    let first_ingest = position(&calls, |call| matches!(call, MockCall::IngestStat(_)));
    let query = position(&calls, |call| {
        matches!(call, MockCall::QueryPlayerAchievements)
    });
    assert!(first_ingest < query);
}

#[test]
fn test_failed_query_stalls_before_report() {
    let mut mock = MockPlatform::new().with_latency(1);
    mock.fail(MockFailure::QueryPlayerAchievements);
    let (mut sequencer, calls, _) = sequencer_with(mock);

    for _ in 0..200 {
        sequencer.tick().expect("Tick failed");
    }

    assert!(!sequencer.is_finished());
    assert_eq!(sequencer.phase(), Phase::AwaitQuery);
    assert!(!sequencer.progress().query_succeeded);

    let calls = calls.lock().unwrap();
    assert!(calls
        .iter()
        .all(|call| !matches!(call, MockCall::CopyOk(_) | MockCall::CopyFailed(_))));
}

#[test]
fn test_failed_ingest_blocks_query() {
    let mut mock = MockPlatform::new().with_latency(1);
    mock.fail(MockFailure::IngestStat);
    let (mut sequencer, calls, _) = sequencer_with(mock);

    for _ in 0..200 {
        sequencer.tick().expect("Tick failed");
    }

    assert_eq!(sequencer.phase(), Phase::Query);
    let progress = sequencer.progress();
    assert!(!progress.stat_ingested);
    assert!(progress.manual_achievement_unlocked);

    let calls = calls.lock().unwrap();
    assert!(calls
        .iter()
        .all(|call| !matches!(call, MockCall::QueryPlayerAchievements)));
}

#[test]
fn test_failed_unlock_blocks_query() {
    let mut mock = MockPlatform::new().with_latency(1);
    mock.fail(MockFailure::UnlockAchievements);
    let (mut sequencer, calls, _) = sequencer_with(mock);

    for _ in 0..200 {
        sequencer.tick().expect("Tick failed");
    }

    assert_eq!(sequencer.phase(), Phase::Query);
    let progress = sequencer.progress();
    assert!(progress.stat_ingested);
    assert!(!progress.manual_achievement_unlocked);

    let calls = calls.lock().unwrap();
    assert!(calls
        .iter()
        .all(|call| !matches!(call, MockCall::QueryPlayerAchievements)));
}

#[test]
fn test_failed_subscription_blocks_issue() {
    let mut mock = MockPlatform::new().with_latency(1);
    mock.fail(MockFailure::Subscription);
    let (mut sequencer, calls, _) = sequencer_with(mock);

    for _ in 0..200 {
        sequencer.tick().expect("Tick failed");
    }

    // The ordering guarantee: nothing is issued before the subscription is
    // confirmed active.
    assert_eq!(sequencer.phase(), Phase::AwaitSubscription);
    assert!(!sequencer.progress().subscription_active);

    let calls = calls.lock().unwrap();
    assert!(calls.iter().all(|call| !matches!(
        call,
        MockCall::IngestStat(_) | MockCall::UnlockAchievements(_)
    )));
}

#[test]
fn test_shutdown_is_idempotent() {
    let (mut sequencer, calls, _) = sequencer_with(MockPlatform::new().with_latency(1));
    sequencer.run().expect("Sequencer failed");
    sequencer.shutdown();

    let calls = calls.lock().unwrap();
    let removals = calls
        .iter()
        .filter(|call| matches!(call, MockCall::RemoveNotify))
        .count();
    assert_eq!(removals, 1);
}
