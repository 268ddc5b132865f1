use crate::platform_adapter::{NotificationId, PlatformAdapter};
use crate::types::{
    AuthenticateOptions, AuthenticateResult, CopyPlayerAchievementOptions, IngestStatOptions,
    IngestStatResult, PlayerAchievementRecord, QueryPlayerAchievementsOptions,
    QueryPlayerAchievementsResult, RecordLease, ResultCode, UnlockAchievementsOptions,
    UnlockAchievementsResult, UnlockNotification, UNLOCK_TIME_UNDEFINED,
};
use chrono::Utc;
use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
pub enum MockPlatformError {
    NotFound(String),
    QueryRequired,
}

impl Display for MockPlatformError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl Error for MockPlatformError {}

/// Operations that can be forced to report failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockFailure {
    Authenticate,
    Subscription,
    IngestStat,
    UnlockAchievements,
    QueryPlayerAchievements,
}

/// One entry of the adapter call log, recorded when the call is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Authenticate,
    AddNotify,
    RemoveNotify,
    IngestStat(String),
    UnlockAchievements(String),
    QueryPlayerAchievements,
    CopyOk(String),
    CopyFailed(String),
}

struct AchievementDef {
    id: &'static str,
    /// Source stat and unlock threshold; `None` means manual unlock only.
    stat: Option<(&'static str, i64)>,
}

struct AchievementState {
    def: AchievementDef,
    progress: f64,
    unlock_time: i64,
}

// "PermanentlyLocked" is deliberately absent from the catalog, so copying
// it always reports not-found.
fn default_catalog() -> Vec<AchievementState> {
    let defs = vec![
        AchievementDef {
            id: "Manual",
            stat: None,
        },
        AchievementDef {
            id: "Stat",
            stat: Some(("Stat1", 1)),
        },
        AchievementDef {
            id: "StatPartial",
            stat: Some(("Stat2", 2)),
        },
    ];
    defs.into_iter()
        .map(|def| AchievementState {
            def,
            progress: 0.0,
            unlock_time: UNLOCK_TIME_UNDEFINED,
        })
        .collect()
}

enum Job {
    Authenticate {
        options: AuthenticateOptions,
        callback: Box<dyn FnOnce(AuthenticateResult) + Send + 'static>,
    },
    SubscriptionActive {
        callback: Box<dyn FnOnce(ResultCode) + Send + 'static>,
    },
    IngestStat {
        options: IngestStatOptions,
        callback: Box<dyn FnOnce(IngestStatResult) + Send + 'static>,
    },
    UnlockAchievements {
        options: UnlockAchievementsOptions,
        callback: Box<dyn FnOnce(UnlockAchievementsResult) + Send + 'static>,
    },
    QueryPlayerAchievements {
        options: QueryPlayerAchievementsOptions,
        callback: Box<dyn FnOnce(QueryPlayerAchievementsResult) + Send + 'static>,
    },
}

struct Pending {
    due: u64,
    job: Job,
}

/// Self-contained stand-in for the vendor runtime. Queued calls complete a
/// configurable number of ticks after they were issued, achievements unlock
/// from stat thresholds or manual requests, and everything observable (call
/// order, outstanding record copies) is exposed for tests.
pub struct MockPlatform {
    now: u64,
    latency: u64,
    jitter: u64,
    rng: StdRng,
    pending: Vec<Pending>,
    subscription: Option<(NotificationId, Box<dyn Fn(UnlockNotification) + Send + 'static>)>,
    next_notification_id: NotificationId,
    achievements: Vec<AchievementState>,
    stats: HashMap<String, i64>,
    query_cache: Option<HashMap<String, (f64, i64)>>,
    failures: HashSet<MockFailure>,
    calls: Arc<Mutex<Vec<MockCall>>>,
    live_records: Arc<AtomicUsize>,
}

impl MockPlatform {
    pub fn new() -> MockPlatform {
        MockPlatform {
            now: 0,
            latency: 2,
            jitter: 0,
            rng: StdRng::seed_from_u64(0),
            pending: Vec::new(),
            subscription: None,
            next_notification_id: 1,
            achievements: default_catalog(),
            stats: HashMap::new(),
            query_cache: None,
            failures: HashSet::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            live_records: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Ticks between issuing a call and delivering its completion.
    pub fn with_latency(mut self, ticks: u64) -> MockPlatform {
        self.latency = ticks;
        self
    }

    /// Adds up to `max_ticks` of random extra completion latency.
    pub fn with_jitter(mut self, max_ticks: u64, seed: u64) -> MockPlatform {
        self.jitter = max_ticks;
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Forces every later completion of `op` to report failure.
    pub fn fail(&mut self, op: MockFailure) {
        self.failures.insert(op);
    }

    pub fn call_log(&self) -> Arc<Mutex<Vec<MockCall>>> {
        self.calls.clone()
    }

    /// Count of copied records not yet released.
    pub fn live_records(&self) -> Arc<AtomicUsize> {
        self.live_records.clone()
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn schedule(&mut self, job: Job) {
        let jitter = if self.jitter > 0 {
            self.rng.gen_range(0..self.jitter)
        } else {
            0
        };
        let due = self.now + 1 + self.latency + jitter;
        self.pending.push(Pending { due, job });
    }

    fn apply_ingest(&mut self, options: &IngestStatOptions) -> Vec<UnlockNotification> {
        for data in &options.stats {
            *self.stats.entry(data.stat_name.clone()).or_insert(0) += data.ingest_amount;
        }

        let mut unlocked = Vec::new();
        for achievement in self.achievements.iter_mut() {
            if let Some((stat_name, threshold)) = achievement.def.stat {
                let count = *self.stats.get(stat_name).unwrap_or(&0);
                achievement.progress = (count as f64 / threshold as f64).min(1.0);
                if achievement.progress >= 1.0
                    && achievement.unlock_time == UNLOCK_TIME_UNDEFINED
                {
                    achievement.unlock_time = Utc::now().timestamp();
                    unlocked.push(UnlockNotification {
                        user_id: options.target_user_id.clone(),
                        achievement_id: achievement.def.id.to_owned(),
                        unlock_time: achievement.unlock_time,
                    });
                }
            }
        }
        unlocked
    }

    fn apply_unlock(
        &mut self,
        options: &UnlockAchievementsOptions,
    ) -> (ResultCode, Vec<UnlockNotification>) {
        let mut unlocked = Vec::new();
        for id in &options.achievement_ids {
            match self
                .achievements
                .iter_mut()
                .find(|a| a.def.id == id.as_str())
            {
                Some(achievement) => {
                    if achievement.unlock_time == UNLOCK_TIME_UNDEFINED {
                        achievement.progress = 1.0;
                        achievement.unlock_time = Utc::now().timestamp();
                        unlocked.push(UnlockNotification {
                            user_id: options.user_id.clone(),
                            achievement_id: id.clone(),
                            unlock_time: achievement.unlock_time,
                        });
                    }
                }
                None => return (ResultCode::NotFound, unlocked),
            }
        }
        (ResultCode::Success, unlocked)
    }

    fn notify(&self, unlocked: Vec<UnlockNotification>) {
        if let Some((_, ref callback)) = self.subscription {
            for notification in unlocked {
                callback(notification);
            }
        }
    }

    fn run_job(&mut self, job: Job) {
        match job {
            Job::Authenticate { options, callback } => {
                let result = if self.failures.contains(&MockFailure::Authenticate) {
                    AuthenticateResult {
                        result_code: ResultCode::ServiceFailure,
                        user_id: String::new(),
                    }
                } else if options.credential_name.is_empty() || options.dev_auth_host.is_empty() {
                    AuthenticateResult {
                        result_code: ResultCode::InvalidCredentials,
                        user_id: String::new(),
                    }
                } else {
                    AuthenticateResult {
                        result_code: ResultCode::Success,
                        user_id: product_user_id(&options.credential_name),
                    }
                };
                callback(result);
            }
            Job::SubscriptionActive { callback } => {
                if self.failures.contains(&MockFailure::Subscription) {
                    callback(ResultCode::ServiceFailure);
                } else {
                    trace!("unlock notification subscription is live");
                    callback(ResultCode::Success);
                }
            }
            Job::IngestStat { options, callback } => {
                if self.failures.contains(&MockFailure::IngestStat) {
                    callback(IngestStatResult {
                        result_code: ResultCode::ServiceFailure,
                        target_user_id: options.target_user_id,
                    });
                    return;
                }
                let unlocked = self.apply_ingest(&options);
                callback(IngestStatResult {
                    result_code: ResultCode::Success,
                    target_user_id: options.target_user_id,
                });
                self.notify(unlocked);
            }
            Job::UnlockAchievements { options, callback } => {
                if self.failures.contains(&MockFailure::UnlockAchievements) {
                    callback(UnlockAchievementsResult {
                        result_code: ResultCode::ServiceFailure,
                        user_id: options.user_id,
                        achievements_count: 0,
                    });
                    return;
                }
                let count = options.achievement_ids.len();
                let (result_code, unlocked) = self.apply_unlock(&options);
                callback(UnlockAchievementsResult {
                    result_code,
                    user_id: options.user_id,
                    achievements_count: count,
                });
                self.notify(unlocked);
            }
            Job::QueryPlayerAchievements { options, callback } => {
                if self.failures.contains(&MockFailure::QueryPlayerAchievements) {
                    callback(QueryPlayerAchievementsResult {
                        result_code: ResultCode::ServiceFailure,
                        user_id: options.local_user_id,
                    });
                    return;
                }
                let snapshot = self
                    .achievements
                    .iter()
                    .map(|a| (a.def.id.to_owned(), (a.progress, a.unlock_time)))
                    .collect();
                self.query_cache = Some(snapshot);
                callback(QueryPlayerAchievementsResult {
                    result_code: ResultCode::Success,
                    user_id: options.local_user_id,
                });
            }
        }
    }
}

// Stable fake product user id derived from the credential name.
fn product_user_id(credential_name: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    credential_name.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

impl PlatformAdapter for MockPlatform {
    type Error = MockPlatformError;

    fn authenticate(
        &mut self,
        options: AuthenticateOptions,
        callback: Box<dyn FnOnce(AuthenticateResult) + Send + 'static>,
    ) {
        self.record(MockCall::Authenticate);
        self.schedule(Job::Authenticate { options, callback });
    }

    fn add_notify_achievements_unlocked(
        &mut self,
        on_active: Box<dyn FnOnce(ResultCode) + Send + 'static>,
        on_unlocked: Box<dyn Fn(UnlockNotification) + Send + 'static>,
    ) -> NotificationId {
        self.record(MockCall::AddNotify);
        let id = self.next_notification_id;
        self.next_notification_id += 1;
        self.subscription = Some((id, on_unlocked));
        self.schedule(Job::SubscriptionActive { callback: on_active });
        id
    }

    fn remove_notify_achievements_unlocked(&mut self, id: NotificationId) {
        self.record(MockCall::RemoveNotify);
        let matches = self
            .subscription
            .as_ref()
            .map_or(false, |(current, _)| *current == id);
        if matches {
            self.subscription = None;
        }
    }

    fn ingest_stat(
        &mut self,
        options: IngestStatOptions,
        callback: Box<dyn FnOnce(IngestStatResult) + Send + 'static>,
    ) {
        let name = options
            .stats
            .get(0)
            .map(|data| data.stat_name.clone())
            .unwrap_or_default();
        self.record(MockCall::IngestStat(name));
        self.schedule(Job::IngestStat { options, callback });
    }

    fn unlock_achievements(
        &mut self,
        options: UnlockAchievementsOptions,
        callback: Box<dyn FnOnce(UnlockAchievementsResult) + Send + 'static>,
    ) {
        self.record(MockCall::UnlockAchievements(options.achievement_ids.join(",")));
        self.schedule(Job::UnlockAchievements { options, callback });
    }

    fn query_player_achievements(
        &mut self,
        options: QueryPlayerAchievementsOptions,
        callback: Box<dyn FnOnce(QueryPlayerAchievementsResult) + Send + 'static>,
    ) {
        self.record(MockCall::QueryPlayerAchievements);
        self.schedule(Job::QueryPlayerAchievements { options, callback });
    }

    fn copy_player_achievement_by_id(
        &mut self,
        options: CopyPlayerAchievementOptions,
    ) -> Result<PlayerAchievementRecord, MockPlatformError> {
        let cached = match &self.query_cache {
            Some(cache) => cache.get(&options.achievement_id).cloned(),
            None => {
                self.record(MockCall::CopyFailed(options.achievement_id.clone()));
                return Err(MockPlatformError::QueryRequired);
            }
        };
        match cached {
            Some((progress, unlock_time)) => {
                self.record(MockCall::CopyOk(options.achievement_id.clone()));
                let lease = RecordLease::acquire(&self.live_records);
                Ok(PlayerAchievementRecord::new(
                    &options.achievement_id,
                    progress,
                    unlock_time,
                    lease,
                ))
            }
            None => {
                self.record(MockCall::CopyFailed(options.achievement_id.clone()));
                Err(MockPlatformError::NotFound(options.achievement_id))
            }
        }
    }

    fn tick(&mut self) {
        self.now += 1;

        let mut due_jobs = Vec::new();
        let mut index = 0;
        while index < self.pending.len() {
            if self.pending[index].due <= self.now {
                due_jobs.push(self.pending.remove(index).job);
            } else {
                index += 1;
            }
        }

        for job in due_jobs {
            self.run_job(job);
        }
    }
}
