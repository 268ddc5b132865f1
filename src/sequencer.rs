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

use crate::achievements::Achievements;
use crate::platform::Platform;
use crate::platform_adapter::{NotificationId, PlatformAdapter};
use crate::session::Session;
use crate::stats::Stats;
use crate::types::{
    IngestData, IngestStatResult, QueryPlayerAchievementsResult, ResultCode, UnlockNotification,
    UNLOCK_TIME_UNDEFINED,
};
use chrono::{LocalResult, TimeZone, Utc};
use log::{error, trace};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};

pub const MANUAL_ACHIEVEMENT: &str = "Manual";
pub const STAT_ACHIEVEMENT: &str = "Stat";
pub const STAT_PARTIAL_ACHIEVEMENT: &str = "StatPartial";
pub const PERMANENTLY_LOCKED_ACHIEVEMENT: &str = "PermanentlyLocked";

pub const STAT_ONE: &str = "Stat1";
pub const STAT_TWO: &str = "Stat2";

/// Workflow phases, entered strictly in declaration order. Each phase runs
/// its side effects at most once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Register for unlock notifications.
    Subscribe,
    /// Wait for the subscription-active confirmation. Ingest and unlock
    /// calls must not go out before it.
    AwaitSubscription,
    /// Fire both stat ingests and the manual unlock.
    Issue,
    /// Wait until ingest and unlock have observably completed, then issue
    /// the progress query.
    Query,
    /// Wait for the query to succeed.
    AwaitQuery,
    /// Copy and print the four records, releasing each retrieved one.
    Report,
    Done,
}

/// Completion flags set by callbacks. Each starts false and is set true at
/// most once; nothing ever resets one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Progress {
    pub subscription_active: bool,
    pub notification_received: bool,
    pub stat_ingested: bool,
    pub manual_achievement_unlocked: bool,
    pub query_succeeded: bool,
}

#[derive(Debug)]
pub enum SequencerError {
    SubscriptionRejected,
}

impl Display for SequencerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl Error for SequencerError {}

/// Drives one run-to-completion achievement workflow over the cooperative
/// vendor runtime. Every `tick()` pumps the platform first - that is the
/// only way queued completion callbacks are ever delivered - and then
/// advances the phase machine.
pub struct Sequencer<A: PlatformAdapter> {
    platform: Platform<A>,
    achievements: Achievements<A>,
    stats: Stats<A>,
    session: Session,
    phase: Phase,
    progress: Arc<Mutex<Progress>>,
    subscription: Option<NotificationId>,
    ticks: u64,
}

impl<A: PlatformAdapter> Sequencer<A> {
    pub fn new(platform: &Platform<A>, session: Session) -> Sequencer<A> {
        Sequencer {
            platform: platform.clone(),
            achievements: platform.achievements(),
            stats: platform.stats(),
            session,
            phase: Phase::Subscribe,
            progress: Arc::new(Mutex::new(Progress::default())),
            subscription: None,
            ticks: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn progress(&self) -> Progress {
        *self.progress.lock().unwrap()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Runs one loop iteration. Errors only in the subscribe phase, when the
    /// runtime hands back an invalid subscription id.
    pub fn tick(&mut self) -> Result<(), SequencerError> {
        self.platform.tick();
        self.ticks += 1;

        match self.phase {
            Phase::Subscribe => {
                self.subscribe()?;
                self.advance(Phase::AwaitSubscription);
            }
            Phase::AwaitSubscription => {
                if self.progress.lock().unwrap().subscription_active {
                    self.advance(Phase::Issue);
                }
            }
            Phase::Issue => {
                self.issue_calls();
                self.advance(Phase::Query);
            }
            Phase::Query => {
                let ready = {
                    let progress = self.progress.lock().unwrap();
                    progress.stat_ingested && progress.manual_achievement_unlocked
                };
                if ready {
                    self.issue_query();
                    self.advance(Phase::AwaitQuery);
                }
            }
            Phase::AwaitQuery => {
                if self.progress.lock().unwrap().query_succeeded {
                    self.advance(Phase::Report);
                }
            }
            Phase::Report => {
                self.report();
                self.advance(Phase::Done);
            }
            Phase::Done => {}
        }

        Ok(())
    }

    /// Ticks until the workflow has completed, then tears the notification
    /// subscription down. There are no timeouts; an operation that never
    /// completes keeps this looping.
    pub fn run(&mut self) -> Result<(), SequencerError> {
        while !self.is_finished() {
            self.tick()?;
        }
        self.shutdown();
        Ok(())
    }

    /// Unregisters the unlock notification subscription, symmetric to the
    /// subscribe phase. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.achievements.remove_notify_unlocked(id);
            trace!("unlock notification subscription {} removed", id);
        }
    }

    fn advance(&mut self, next: Phase) {
        trace!("tick {}: phase {:?} -> {:?}", self.ticks, self.phase, next);
        self.phase = next;
    }

    fn subscribe(&mut self) -> Result<(), SequencerError> {
        let progress = self.progress.clone();
        let on_active = move |result_code: ResultCode| {
            if result_code.is_success() {
                progress.lock().unwrap().subscription_active = true;
            } else {
                error!("unlock notification subscription failed: {}", result_code);
            }
        };

        let progress = self.progress.clone();
        let on_unlocked = move |notification: UnlockNotification| {
            println!();
            println!("Received a notification that an achievement was unlocked. Verify that the following info is correct:");
            println!("User ID: {}", notification.user_id);
            println!("Achievement ID: {}", notification.achievement_id);
            println!("Unlock Time: {}", notification.unlock_time);
            println!();
            progress.lock().unwrap().notification_received = true;
        };

        let id = self.achievements.add_notify_unlocked(on_active, on_unlocked);
        if id == 0 {
            return Err(SequencerError::SubscriptionRejected);
        }
        self.subscription = Some(id);
        Ok(())
    }

    fn issue_calls(&mut self) {
        let user_id = self.session.user_id().to_owned();

        // Both ingests report through the same flag, exactly like the
        // notification-driven original.
        for stat_name in [STAT_ONE, STAT_TWO].iter() {
            let name = (*stat_name).to_owned();
            let progress = self.progress.clone();
            self.stats.ingest(
                &user_id,
                &user_id,
                &[IngestData {
                    stat_name: name.clone(),
                    ingest_amount: 1,
                }],
                move |result: IngestStatResult| {
                    if result.result_code.is_success() {
                        println!();
                        println!("Stat ingested successfully! Verify that the following data is correct:");
                        println!("User ID: {}", result.target_user_id);
                        println!("Stat Name: {}", name);
                        println!();
                        progress.lock().unwrap().stat_ingested = true;
                    } else {
                        println!();
                        println!("Stat ingestion failed.");
                        println!();
                    }
                },
            );
        }

        let progress = self.progress.clone();
        self.achievements
            .unlock(&user_id, &[MANUAL_ACHIEVEMENT], move |result| {
                if result.result_code.is_success() {
                    println!();
                    println!("Achievement unlocked! Verify that the following data is correct:");
                    println!("User ID: {}", result.user_id);
                    println!("Achievement Count: {}", result.achievements_count);
                    println!("Achievement ID: {}", MANUAL_ACHIEVEMENT);
                    println!();
                    progress.lock().unwrap().manual_achievement_unlocked = true;
                } else {
                    println!();
                    println!("Achievement failed to unlock.");
                    println!();
                }
            });
    }

    fn issue_query(&mut self) {
        let progress = self.progress.clone();
        self.achievements.query_progress(
            self.session.user_id(),
            self.session.user_id(),
            move |result: QueryPlayerAchievementsResult| {
                if result.result_code.is_success() {
                    println!();
                    println!("Successfully queried achievement progress!");
                    progress.lock().unwrap().query_succeeded = true;
                } else {
                    println!();
                    println!("Failed to query achievement progress");
                    println!();
                }
            },
        );
    }

    fn report(&mut self) {
        let targets = [
            (MANUAL_ACHIEVEMENT, "manual unlock achievement"),
            (STAT_ACHIEVEMENT, "stat unlock achievement"),
            (STAT_PARTIAL_ACHIEVEMENT, "stat partial unlock achievement"),
            (PERMANENTLY_LOCKED_ACHIEVEMENT, "permanently locked achievement"),
        ];

        // Every copy is attempted regardless of earlier failures.
        for (achievement_id, label) in targets.iter() {
            let result = self.achievements.copy_by_id(
                self.session.user_id(),
                self.session.user_id(),
                achievement_id,
            );
            match result {
                Ok(record) => {
                    println!();
                    println!("Got results for {}!", label);
                    println!("Achievement ID: {}", record.achievement_id);
                    println!("Achievement Progress: {}", record.progress);
                    println!("Unlock Time: {}", format_unlock_time(record.unlock_time));
                    record.release();
                }
                Err(err) => {
                    println!();
                    println!("Failed to copy results for {}", label);
                    println!();
                    error!("copy failed for {}: {}", achievement_id, err);
                }
            }
        }
    }
}

fn format_unlock_time(unlock_time: i64) -> String {
    if unlock_time == UNLOCK_TIME_UNDEFINED {
        return "never unlocked".to_owned();
    }
    match Utc.timestamp_opt(unlock_time, 0) {
        LocalResult::Single(time) => format!("{} ({})", time, unlock_time),
        _ => unlock_time.to_string(),
    }
}
