use crate::types::{
    AuthenticateOptions, AuthenticateResult, CopyPlayerAchievementOptions, IngestStatOptions,
    IngestStatResult, PlayerAchievementRecord, QueryPlayerAchievementsOptions,
    QueryPlayerAchievementsResult, ResultCode, UnlockAchievementsOptions,
    UnlockAchievementsResult, UnlockNotification,
};
use std::error::Error;

/// Identifies one unlock notification registration. Zero is never a valid id.
pub type NotificationId = u64;

/// Boundary to the vendor runtime. Async calls are queued and their
/// completion callbacks fire only during `tick()`; the runtime is
/// cooperative and does nothing between ticks.
pub trait PlatformAdapter {
    type Error: Error;

    fn authenticate(
        &mut self,
        options: AuthenticateOptions,
        callback: Box<dyn FnOnce(AuthenticateResult) + Send + 'static>,
    );

    /// Registers for unlock notifications. The returned id is valid
    /// immediately; `on_active` fires on a later tick once the registration
    /// is live on the service side. No unlock or ingest call should be
    /// issued before that confirmation.
    fn add_notify_achievements_unlocked(
        &mut self,
        on_active: Box<dyn FnOnce(ResultCode) + Send + 'static>,
        on_unlocked: Box<dyn Fn(UnlockNotification) + Send + 'static>,
    ) -> NotificationId;

    fn remove_notify_achievements_unlocked(&mut self, id: NotificationId);

    fn ingest_stat(
        &mut self,
        options: IngestStatOptions,
        callback: Box<dyn FnOnce(IngestStatResult) + Send + 'static>,
    );

    fn unlock_achievements(
        &mut self,
        options: UnlockAchievementsOptions,
        callback: Box<dyn FnOnce(UnlockAchievementsResult) + Send + 'static>,
    );

    fn query_player_achievements(
        &mut self,
        options: QueryPlayerAchievementsOptions,
        callback: Box<dyn FnOnce(QueryPlayerAchievementsResult) + Send + 'static>,
    );

    /// Copies one record out of the cache built by the last successful query.
    /// The returned record is owned by the caller until released.
    fn copy_player_achievement_by_id(
        &mut self,
        options: CopyPlayerAchievementOptions,
    ) -> Result<PlayerAchievementRecord, Self::Error>;

    fn tick(&mut self);
}
