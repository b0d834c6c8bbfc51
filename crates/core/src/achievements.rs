//! Achievement rule engine.
//!
//! A pure evaluator: given a user's aggregated collection statistics,
//! compute the set of achievement ids that should be unlocked. The engine
//! performs no I/O and is deterministic; loading statistics, diffing
//! against the persisted set, and writing unlocks back all live in
//! `curio-pipeline`. Unlocks are monotonic ratchets: an id is never removed
//! once persisted, even when the statistics later regress.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Aggregated per-user statistics the rule catalog is evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    /// Total items across the user's collections, owned or not.
    pub items_total: u64,
    /// Items marked as owned.
    pub items_owned: u64,
    /// Collections the user has created.
    pub collections_created: u64,
    /// Collections with at least one item where every item is owned.
    pub completed_collections: u64,
    /// Community shares the user has made.
    pub community_shares: u64,
    /// Folders the user has created.
    pub folders_created: u64,
    /// Entries on the user's wishlist.
    pub wishlist_entries: u64,
}

/// The statistic a rule thresholds on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatMetric {
    ItemsTotal,
    ItemsOwned,
    CollectionsCreated,
    CompletedCollections,
    CommunityShares,
    FoldersCreated,
    WishlistEntries,
}

impl UserStats {
    /// Read the value of a single metric.
    pub fn metric(&self, metric: StatMetric) -> u64 {
        match metric {
            StatMetric::ItemsTotal => self.items_total,
            StatMetric::ItemsOwned => self.items_owned,
            StatMetric::CollectionsCreated => self.collections_created,
            StatMetric::CompletedCollections => self.completed_collections,
            StatMetric::CommunityShares => self.community_shares,
            StatMetric::FoldersCreated => self.folders_created,
            StatMetric::WishlistEntries => self.wishlist_entries,
        }
    }
}

// ---------------------------------------------------------------------------
// Rule catalog
// ---------------------------------------------------------------------------

/// A single achievement rule, unlocked once `metric >= threshold`.
#[derive(Debug, Clone, Copy)]
pub struct AchievementRule {
    /// Stable id persisted in the user's unlocked set. Never rename or
    /// reuse one.
    pub id: &'static str,
    /// Display title.
    pub title: &'static str,
    /// The statistic this rule thresholds on.
    pub metric: StatMetric,
    /// Minimum metric value required to unlock.
    pub threshold: u64,
}

/// The full rule catalog.
///
/// The order of this table is the canonical achievement ordering:
/// [`evaluate`] and [`newly_unlocked`] return ids in this order, never in
/// arrival order.
pub const ACHIEVEMENT_CATALOG: &[AchievementRule] = &[
    AchievementRule {
        id: "first_item",
        title: "First Item",
        metric: StatMetric::ItemsTotal,
        threshold: 1,
    },
    AchievementRule {
        id: "collector_10",
        title: "Collector",
        metric: StatMetric::ItemsOwned,
        threshold: 10,
    },
    AchievementRule {
        id: "collector_100",
        title: "Serious Collector",
        metric: StatMetric::ItemsOwned,
        threshold: 100,
    },
    AchievementRule {
        id: "collector_500",
        title: "Archivist",
        metric: StatMetric::ItemsOwned,
        threshold: 500,
    },
    AchievementRule {
        id: "first_collection",
        title: "First Collection",
        metric: StatMetric::CollectionsCreated,
        threshold: 1,
    },
    AchievementRule {
        id: "curator_5",
        title: "Curator",
        metric: StatMetric::CollectionsCreated,
        threshold: 5,
    },
    AchievementRule {
        id: "curator_25",
        title: "Master Curator",
        metric: StatMetric::CollectionsCreated,
        threshold: 25,
    },
    AchievementRule {
        id: "completionist",
        title: "Completionist",
        metric: StatMetric::CompletedCollections,
        threshold: 1,
    },
    AchievementRule {
        id: "completionist_10",
        title: "Perfectionist",
        metric: StatMetric::CompletedCollections,
        threshold: 10,
    },
    AchievementRule {
        id: "first_share",
        title: "Sharing Is Caring",
        metric: StatMetric::CommunityShares,
        threshold: 1,
    },
    AchievementRule {
        id: "community_pillar_5",
        title: "Community Pillar",
        metric: StatMetric::CommunityShares,
        threshold: 5,
    },
    AchievementRule {
        id: "organizer",
        title: "Organizer",
        metric: StatMetric::FoldersCreated,
        threshold: 1,
    },
    AchievementRule {
        id: "wishful_thinker",
        title: "Wishful Thinker",
        metric: StatMetric::WishlistEntries,
        threshold: 1,
    },
];

/// Look up a rule by its stable id.
pub fn find_rule(id: &str) -> Option<&'static AchievementRule> {
    ACHIEVEMENT_CATALOG.iter().find(|rule| rule.id == id)
}

/// Whether an id belongs to the current catalog.
///
/// Persisted sets may legitimately contain ids this returns `false` for:
/// retired rules stay unlocked forever.
pub fn is_known_id(id: &str) -> bool {
    find_rule(id).is_some()
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate the catalog against a statistics snapshot.
///
/// Returns the ids of every rule whose threshold the snapshot meets, in
/// canonical catalog order. Deterministic: same stats, same output, on
/// every call.
pub fn evaluate(stats: &UserStats) -> Vec<&'static str> {
    ACHIEVEMENT_CATALOG
        .iter()
        .filter(|rule| stats.metric(rule.metric) >= rule.threshold)
        .map(|rule| rule.id)
        .collect()
}

/// Ids in `should` that are not yet in `already`.
///
/// `should` is expected in canonical order (the output of [`evaluate`]);
/// the result preserves that order.
pub fn newly_unlocked(should: &[&'static str], already: &[String]) -> Vec<&'static str> {
    should
        .iter()
        .filter(|id| !already.iter().any(|a| a == *id))
        .copied()
        .collect()
}

/// The persisted set extended with `newly`, preserving append-only order.
///
/// Ids already present are kept in place (including ids no longer in the
/// catalog); new ids are appended in the order given.
pub fn merge_unlocked(already: &[String], newly: &[&'static str]) -> Vec<String> {
    let mut merged: Vec<String> = already.to_vec();
    for id in newly {
        if !merged.iter().any(|a| a == id) {
            merged.push((*id).to_string());
        }
    }
    merged
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_with_items(total: u64, owned: u64) -> UserStats {
        UserStats {
            items_total: total,
            items_owned: owned,
            ..UserStats::default()
        }
    }

    // -- evaluate -------------------------------------------------------------

    #[test]
    fn empty_stats_unlock_nothing() {
        assert!(evaluate(&UserStats::default()).is_empty());
    }

    #[test]
    fn evaluate_is_deterministic() {
        let stats = UserStats {
            items_total: 120,
            items_owned: 100,
            collections_created: 5,
            completed_collections: 1,
            community_shares: 2,
            folders_created: 3,
            wishlist_entries: 0,
        };
        assert_eq!(evaluate(&stats), evaluate(&stats));
    }

    #[test]
    fn threshold_is_inclusive() {
        let below = stats_with_items(0, 9);
        let at = stats_with_items(10, 10);

        assert!(!evaluate(&below).contains(&"collector_10"));
        assert!(evaluate(&at).contains(&"collector_10"));
    }

    #[test]
    fn single_item_unlocks_first_item_only_from_item_rules() {
        let ids = evaluate(&stats_with_items(1, 0));
        assert_eq!(ids, vec!["first_item"]);
    }

    #[test]
    fn evaluate_returns_catalog_order() {
        // Stats chosen so rules from several metrics fire; the output must
        // follow the catalog, not the metric grouping.
        let stats = UserStats {
            items_total: 1,
            items_owned: 10,
            collections_created: 1,
            completed_collections: 0,
            community_shares: 1,
            folders_created: 1,
            wishlist_entries: 1,
        };
        assert_eq!(
            evaluate(&stats),
            vec![
                "first_item",
                "collector_10",
                "first_collection",
                "first_share",
                "organizer",
                "wishful_thinker",
            ]
        );
    }

    // -- newly_unlocked -------------------------------------------------------

    #[test]
    fn newly_unlocked_diffs_against_persisted_set() {
        let should = vec!["first_item", "collector_10", "first_collection"];
        let already = vec!["first_item".to_string()];

        assert_eq!(
            newly_unlocked(&should, &already),
            vec!["collector_10", "first_collection"]
        );
    }

    #[test]
    fn newly_unlocked_is_empty_when_all_persisted() {
        let should = vec!["first_item"];
        let already = vec!["first_item".to_string()];

        assert!(newly_unlocked(&should, &already).is_empty());
    }

    // -- merge_unlocked -------------------------------------------------------

    #[test]
    fn merge_appends_new_ids() {
        let already = vec!["first_item".to_string()];
        let merged = merge_unlocked(&already, &["collector_10"]);

        assert_eq!(merged, vec!["first_item", "collector_10"]);
    }

    #[test]
    fn merge_keeps_retired_ids() {
        // A previously persisted id that no longer exists in the catalog
        // must survive the merge: achievements are never removed.
        let already = vec!["legacy_badge_2019".to_string()];
        let merged = merge_unlocked(&already, &["first_item"]);

        assert_eq!(merged, vec!["legacy_badge_2019", "first_item"]);
        assert!(!is_known_id("legacy_badge_2019"));
    }

    #[test]
    fn merge_never_duplicates() {
        let already = vec!["first_item".to_string()];
        let merged = merge_unlocked(&already, &["first_item", "collector_10"]);

        assert_eq!(merged, vec!["first_item", "collector_10"]);
    }

    // -- catalog sanity -------------------------------------------------------

    #[test]
    fn catalog_ids_are_unique() {
        for (i, rule) in ACHIEVEMENT_CATALOG.iter().enumerate() {
            assert!(
                !ACHIEVEMENT_CATALOG[i + 1..].iter().any(|r| r.id == rule.id),
                "duplicate achievement id {}",
                rule.id
            );
        }
    }

    #[test]
    fn find_rule_resolves_every_catalog_id() {
        for rule in ACHIEVEMENT_CATALOG {
            assert!(find_rule(rule.id).is_some());
        }
        assert!(find_rule("no_such_rule").is_none());
    }
}
