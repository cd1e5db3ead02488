//! The workout ledger core: the calendar rule deciding which days count,
//! status predicates over a fetched [snapshot::Snapshot], the reconciliation
//! pass that settles yesterday's attendance, and the two save actions.
//! Everything here is driven by an injected [LedgerStore] and an explicit
//! reference date; nothing keeps hidden mutable state.

use chrono::{DateTime, Utc};
use tracing::error;

use crate::store::ledger_store::LedgerStore;

pub mod actions;
pub mod calendar;
pub mod reconcile;
pub mod snapshot;

use snapshot::Snapshot;

/// Fetches a fresh [Snapshot] and runs the reconciliation pass. A failed
/// collection fetch is logged and falls back to the previous snapshot's
/// collection (or empty when there is none), so a snapshot always comes
/// back and the caller keeps operating on stale data until the next pass.
pub async fn refresh<S: LedgerStore>(
    store: &S,
    now: DateTime<Utc>,
    previous: Option<&Snapshot>,
) -> Snapshot {
    let today = now.date_naive();
    let yesterday = calendar::previous_day(today);

    let users = match store.users().await {
        Ok(users) => users,
        Err(e) => {
            error!("Failed to fetch users {e:?}");
            previous.map(|s| s.users.clone()).unwrap_or_default()
        }
    };

    let logs = match store.logs_for(vec![today, yesterday]).await {
        Ok(logs) => logs,
        Err(e) => {
            error!("Failed to fetch workout logs {e:?}");
            previous.map(|s| s.logs.clone()).unwrap_or_default()
        }
    };

    // Settle yesterday before reading misses so a fresh miss shows up in
    // this snapshot, not the next one.
    reconcile::reconcile_missed(store, today, &users, &logs, now).await;

    let plans = match store.recent_plans().await {
        Ok(plans) => plans,
        Err(e) => {
            error!("Failed to fetch workout plans {e:?}");
            previous.map(|s| s.plans.clone()).unwrap_or_default()
        }
    };

    let missed = match store.unacknowledged_missed().await {
        Ok(missed) => missed,
        Err(e) => {
            error!("Failed to fetch missed workouts {e:?}");
            previous.map(|s| s.missed.clone()).unwrap_or_default()
        }
    };

    Snapshot::new(today, users, logs, plans, missed)
}

#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Result};
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::tempdir;

    use crate::store::{json_store::JsonStore, ledger_store::MockLedgerStore};

    use super::refresh;

    fn wednesday_morning() -> chrono::DateTime<Utc> {
        // 2025-04-16, so yesterday was a Tuesday workout day.
        Utc.with_ymd_and_hms(2025, 4, 16, 8, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_refresh_surfaces_fresh_misses() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonStore::new(dir.path().to_owned())?;
        store.add_user("Cherry", None).await?;
        store.add_user("Peus", None).await?;

        let snapshot = refresh(&store, wednesday_morning(), None).await;

        let yesterday = snapshot.yesterday();
        assert_eq!(snapshot.users.len(), 2);
        assert_eq!(snapshot.missed.len(), 2);
        assert!(snapshot.missed.iter().all(|m| m.workout_date == yesterday));
        assert!(snapshot.has_missed_workout(snapshot.users[0].id));
        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_keeps_previous_collections_on_fetch_failure() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonStore::new(dir.path().to_owned())?;
        store.add_user("Cherry", None).await?;

        let previous = refresh(&store, wednesday_morning(), None).await;
        assert_eq!(previous.users.len(), 1);

        let mut broken = MockLedgerStore::new();
        broken.expect_users().returning(|| Err(anyhow!("offline")));
        broken
            .expect_logs_for()
            .returning(|_| Err(anyhow!("offline")));
        broken
            .expect_recent_plans()
            .returning(|| Err(anyhow!("offline")));
        broken
            .expect_unacknowledged_missed()
            .returning(|| Err(anyhow!("offline")));

        let next_day = wednesday_morning() + Duration::days(1);
        let snapshot = refresh(&broken, next_day, Some(&previous)).await;

        assert_eq!(snapshot.users, previous.users);
        assert_eq!(snapshot.missed, previous.missed);
        assert_eq!(snapshot.today, next_day.date_naive());
        Ok(())
    }
}
