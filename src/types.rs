use std::fmt::{Debug, Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Sentinel unlock time for an achievement that has never been unlocked.
pub const UNLOCK_TIME_UNDEFINED: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Success,
    InvalidCredentials,
    InvalidParameters,
    NotFound,
    ServiceFailure,
}

impl ResultCode {
    pub fn is_success(self) -> bool {
        self == ResultCode::Success
    }
}

impl Display for ResultCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultCode::Success => f.write_str("success"),
            ResultCode::InvalidCredentials => f.write_str("invalid credentials"),
            ResultCode::InvalidParameters => f.write_str("invalid parameters"),
            ResultCode::NotFound => f.write_str("not found"),
            ResultCode::ServiceFailure => f.write_str("service failure"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthenticateOptions {
    pub credential_name: String,
    pub dev_auth_host: String,
}

#[derive(Debug, Clone)]
pub struct AuthenticateResult {
    pub result_code: ResultCode,
    pub user_id: String,
}

/// One stat update carried by an ingest call.
#[derive(Debug, Clone)]
pub struct IngestData {
    pub stat_name: String,
    pub ingest_amount: i64,
}

#[derive(Debug, Clone)]
pub struct IngestStatOptions {
    pub local_user_id: String,
    pub target_user_id: String,
    pub stats: Vec<IngestData>,
}

#[derive(Debug, Clone)]
pub struct IngestStatResult {
    pub result_code: ResultCode,
    pub target_user_id: String,
}

#[derive(Debug, Clone)]
pub struct UnlockAchievementsOptions {
    pub user_id: String,
    pub achievement_ids: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UnlockAchievementsResult {
    pub result_code: ResultCode,
    pub user_id: String,
    pub achievements_count: usize,
}

#[derive(Debug, Clone)]
pub struct QueryPlayerAchievementsOptions {
    pub local_user_id: String,
    pub target_user_id: String,
}

#[derive(Debug, Clone)]
pub struct QueryPlayerAchievementsResult {
    pub result_code: ResultCode,
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct CopyPlayerAchievementOptions {
    pub local_user_id: String,
    pub target_user_id: String,
    pub achievement_id: String,
}

/// Payload delivered to the unlock notification callback.
#[derive(Debug, Clone)]
pub struct UnlockNotification {
    pub user_id: String,
    pub achievement_id: String,
    pub unlock_time: i64,
}

/// Accounting token for one copied achievement record. The platform that
/// produced the record counts live leases; dropping the lease hands the
/// record back.
pub struct RecordLease {
    live: Arc<AtomicUsize>,
}

impl RecordLease {
    pub fn acquire(live: &Arc<AtomicUsize>) -> RecordLease {
        live.fetch_add(1, Ordering::SeqCst);
        RecordLease { live: live.clone() }
    }
}

impl Drop for RecordLease {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A copied snapshot of one achievement's progress for one user. Each copy is
/// owned exclusively by the caller until it is released.
pub struct PlayerAchievementRecord {
    pub achievement_id: String,
    pub progress: f64,
    pub unlock_time: i64,
    _lease: RecordLease,
}

impl PlayerAchievementRecord {
    pub fn new(
        achievement_id: &str,
        progress: f64,
        unlock_time: i64,
        lease: RecordLease,
    ) -> PlayerAchievementRecord {
        PlayerAchievementRecord {
            achievement_id: achievement_id.to_owned(),
            progress,
            unlock_time,
            _lease: lease,
        }
    }

    /// Hands the record back to the platform. Dropping has the same effect;
    /// this exists so call sites can make the hand-back explicit.
    pub fn release(self) {}
}

impl Debug for PlayerAchievementRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerAchievementRecord")
            .field("achievement_id", &self.achievement_id)
            .field("progress", &self.progress)
            .field("unlock_time", &self.unlock_time)
            .finish()
    }
}
