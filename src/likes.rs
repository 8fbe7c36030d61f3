//! The likes counter: store, reducer, action creator and streak wiring.

use crate::config::{LikesConfig, StreakConfig};
use crate::error::StoreError;
use crate::store::{Action, StateHub, Store};
use crate::streak::{StreakEngine, StreakHandle};

pub const APP_STATE: &str = "app";
pub const APP_STATE_LIKES: &str = "likes";

pub const ACTION_CHANGE_LIKES: &str = "CHANGE_LIKES";

/// `CHANGE_LIKES` carrying `amount`.
pub fn change_likes(amount: i64) -> Action {
    Action::with_payload(ACTION_CHANGE_LIKES, amount)
}

/// Store at `app.likes` with the `CHANGE_LIKES` reducer.
///
/// The counter is capped at `max_likes`; it has no lower bound. A missing
/// payload counts as zero. Build it once per hub and share it between
/// posts: every call registers another reducer, and each one applies every
/// `CHANGE_LIKES`.
pub fn likes_store(hub: &StateHub, config: &LikesConfig) -> Result<Store<i64>, StoreError> {
    let max_likes = config.max_likes;
    let store = Store::with_hub(hub, [APP_STATE, APP_STATE_LIKES], config.initial_likes)?
        .add_reducer(ACTION_CHANGE_LIKES, move |likes, action| {
            let amount = action.payload_as::<i64>().unwrap_or(0);
            likes.saturating_add(amount).min(max_likes)
        });
    Ok(store)
}

/// A streak engine over a shared likes store. Its flush dispatches
/// `CHANGE_LIKES` on the store's hub.
pub struct LikesPost {
    pub likes: Store<i64>,
    pub streak: StreakHandle,
}

impl LikesPost {
    /// Must be called inside a tokio runtime.
    pub fn mount(likes: &Store<i64>, config: &StreakConfig) -> Self {
        let flush = likes.hub().actions().dispatcher(change_likes);
        let streak = StreakEngine::spawn(config, likes.clone(), flush);
        Self {
            likes: likes.clone(),
            streak,
        }
    }
}
