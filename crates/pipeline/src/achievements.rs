//! Achievement persistence: statistics aggregation and unlock application.
//!
//! The rule engine itself lives in `curio_core::achievements` and is pure;
//! this module loads the statistics it needs, diffs its verdict against
//! the user's persisted set, and writes new unlocks back in one atomic
//! store call.

use curio_core::achievements::{self, UserStats};
use curio_core::error::CoreError;
use curio_core::types::DbId;
use curio_db::store::Store;

/// Aggregate a user's statistics from the store.
pub async fn load_user_stats<S: Store + ?Sized>(
    store: &S,
    user_id: DbId,
) -> Result<UserStats, CoreError> {
    let counts = store.item_counts_by_collection(user_id).await?;
    let items_total = counts.iter().map(|c| c.items).sum();
    let items_owned = counts.iter().map(|c| c.owned).sum();
    let completed_collections = counts
        .iter()
        .filter(|c| c.items > 0 && c.owned == c.items)
        .count() as u64;

    Ok(UserStats {
        items_total,
        items_owned,
        collections_created: store.count_collections_for_user(user_id).await?,
        completed_collections,
        community_shares: store.count_community_collections_for_user(user_id).await?,
        folders_created: store.count_folders_for_user(user_id).await?,
        wishlist_entries: store.count_wishlist_entries_for_user(user_id).await?,
    })
}

/// Apply any newly earned unlocks for `user_id`.
///
/// Evaluates the rule catalog against fresh statistics, diffs against the
/// persisted set, and persists the union in one atomic write only when
/// something new unlocked. Returns the newly unlocked ids in canonical
/// catalog order.
///
/// Idempotent: a second call with no intervening state change returns an
/// empty list. Monotonic: ids already persisted are never removed, even
/// when the statistics have regressed since they were earned.
pub async fn apply_unlocks<S: Store + ?Sized>(
    store: &S,
    user_id: DbId,
) -> Result<Vec<String>, CoreError> {
    let user = store
        .find_user(user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })?;

    let stats = load_user_stats(store, user_id).await?;
    let should = achievements::evaluate(&stats);
    let newly = achievements::newly_unlocked(&should, &user.achievements);
    if newly.is_empty() {
        return Ok(Vec::new());
    }

    let merged = achievements::merge_unlocked(&user.achievements, &newly);
    store.set_user_achievements(user_id, merged).await?;

    tracing::info!(user_id, unlocked = ?newly, "achievements unlocked");
    Ok(newly.into_iter().map(str::to_string).collect())
}

/// Best-effort wrapper around [`apply_unlocks`].
///
/// Achievement checking is a side effect of whatever action triggered it;
/// a failure here is logged and converted to an empty list so the primary
/// operation never fails or rolls back because of it.
pub async fn check_achievements<S: Store + ?Sized>(store: &S, user_id: DbId) -> Vec<String> {
    match apply_unlocks(store, user_id).await {
        Ok(newly) => newly,
        Err(err) => {
            tracing::warn!(user_id, error = %err, "achievement check failed");
            Vec::new()
        }
    }
}
