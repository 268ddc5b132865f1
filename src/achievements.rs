use crate::platform::str_slice_to_owned;
use crate::platform_adapter::{NotificationId, PlatformAdapter};
use crate::types::{
    CopyPlayerAchievementOptions, PlayerAchievementRecord, QueryPlayerAchievementsOptions,
    QueryPlayerAchievementsResult, ResultCode, UnlockAchievementsOptions,
    UnlockAchievementsResult, UnlockNotification,
};
use std::sync::{Arc, Mutex};

/// Achievements interface handle, obtained from [`crate::platform::Platform`].
pub struct Achievements<A: PlatformAdapter> {
    adapter: Arc<Mutex<A>>,
}

impl<A: PlatformAdapter> Clone for Achievements<A> {
    fn clone(&self) -> Self {
        Achievements {
            adapter: self.adapter.clone(),
        }
    }
}

impl<A: PlatformAdapter> Achievements<A> {
    pub(crate) fn new(adapter: Arc<Mutex<A>>) -> Achievements<A> {
        Achievements { adapter }
    }

    /// Registers for unlock notifications. `on_active` fires once the
    /// registration is confirmed live; `on_unlocked` fires for every unlock
    /// from then on.
    pub fn add_notify_unlocked<C, N>(&self, on_active: C, on_unlocked: N) -> NotificationId
    where
        C: FnOnce(ResultCode) + Send + 'static,
        N: Fn(UnlockNotification) + Send + 'static,
    {
        self.adapter
            .lock()
            .unwrap()
            .add_notify_achievements_unlocked(Box::new(on_active), Box::new(on_unlocked))
    }

    pub fn remove_notify_unlocked(&self, id: NotificationId) {
        self.adapter
            .lock()
            .unwrap()
            .remove_notify_achievements_unlocked(id);
    }

    pub fn unlock<F>(&self, user_id: &str, achievement_ids: &[&str], callback: F)
    where
        F: FnOnce(UnlockAchievementsResult) + Send + 'static,
    {
        let options = UnlockAchievementsOptions {
            user_id: user_id.to_owned(),
            achievement_ids: str_slice_to_owned(achievement_ids),
        };
        self.adapter
            .lock()
            .unwrap()
            .unlock_achievements(options, Box::new(callback));
    }

    pub fn query_progress<F>(&self, local_user_id: &str, target_user_id: &str, callback: F)
    where
        F: FnOnce(QueryPlayerAchievementsResult) + Send + 'static,
    {
        let options = QueryPlayerAchievementsOptions {
            local_user_id: local_user_id.to_owned(),
            target_user_id: target_user_id.to_owned(),
        };
        self.adapter
            .lock()
            .unwrap()
            .query_player_achievements(options, Box::new(callback));
    }

    /// Copies one achievement record out of the last query's cache. The
    /// record must be released once the caller is done with it.
    pub fn copy_by_id(
        &self,
        local_user_id: &str,
        target_user_id: &str,
        achievement_id: &str,
    ) -> Result<PlayerAchievementRecord, A::Error> {
        let options = CopyPlayerAchievementOptions {
            local_user_id: local_user_id.to_owned(),
            target_user_id: target_user_id.to_owned(),
            achievement_id: achievement_id.to_owned(),
        };
        self.adapter
            .lock()
            .unwrap()
            .copy_player_achievement_by_id(options)
    }
}
