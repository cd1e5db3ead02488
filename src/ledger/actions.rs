use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use crate::store::{
    entities::{
        NewWorkoutLog, NewWorkoutPlan, User, WorkoutLogPatch, WorkoutPlanPatch,
    },
    ledger_store::LedgerStore,
};

use super::{calendar::next_workout_day, snapshot::Snapshot};

/// Upserts the completion log for (user, today): marks it completed, stamps
/// the completion time and stores the description. The snapshot decides
/// between insert and update, so two calls for the same day land on one row.
pub async fn mark_workout_done<S: LedgerStore>(
    store: &S,
    snapshot: &Snapshot,
    user: &User,
    description: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    let description = non_blank(description);

    match snapshot.log_for(user.id, snapshot.today) {
        Some(log) => {
            store
                .update_log(
                    log.id,
                    WorkoutLogPatch {
                        completed: true,
                        completed_at: now,
                        workout_description: description,
                    },
                )
                .await?;
        }
        None => {
            store
                .insert_log(NewWorkoutLog {
                    user_id: user.id,
                    workout_date: snapshot.today,
                    completed: true,
                    completed_at: Some(now),
                    workout_description: description,
                    created_at: now,
                })
                .await?;
        }
    }

    info!("Marked workout done for {} on {}", user.name, snapshot.today);
    Ok(())
}

/// Upserts the plan for the next workout day strictly after today. Blank
/// text is ignored. Returns the target date when a plan was written.
pub async fn save_plan<S: LedgerStore>(
    store: &S,
    snapshot: &Snapshot,
    user: &User,
    text: &str,
    now: DateTime<Utc>,
) -> Result<Option<NaiveDate>> {
    let Some(text) = non_blank(text) else {
        debug!("Ignoring blank plan for {}", user.name);
        return Ok(None);
    };

    let target = next_workout_day(snapshot.today);

    match snapshot.plan_for(user.id, target) {
        Some(plan) => {
            store
                .update_plan(
                    plan.id,
                    WorkoutPlanPatch {
                        plan_text: text,
                        created_at: now,
                    },
                )
                .await?;
        }
        None => {
            store
                .insert_plan(NewWorkoutPlan {
                    user_id: user.id,
                    plan_text: text,
                    for_date: target,
                    created_at: now,
                })
                .await?;
        }
    }

    info!("Saved plan for {} targeting {target}", user.name);
    Ok(Some(target))
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use tempfile::tempdir;

    use crate::{
        ledger::snapshot::Snapshot,
        store::{entities::User, json_store::JsonStore, ledger_store::LedgerStore},
    };

    use super::{mark_workout_done, save_plan};

    // A Tuesday; the next workout day is Thursday the 17th.
    const TODAY: NaiveDate = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();

    fn cherry() -> User {
        User {
            id: 1,
            name: "Cherry".into(),
            avatar_url: None,
        }
    }

    fn at(minute: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 15, 18, minute, 0).unwrap()
    }

    async fn snapshot_of(store: &JsonStore) -> Result<Snapshot> {
        Ok(Snapshot::new(
            TODAY,
            vec![cherry()],
            store.logs_for(vec![TODAY]).await?,
            store.recent_plans().await?,
            vec![],
        ))
    }

    #[tokio::test]
    async fn test_mark_done_twice_updates_one_row() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonStore::new(dir.path().to_owned())?;

        let snapshot = snapshot_of(&store).await?;
        mark_workout_done(&store, &snapshot, &cherry(), "push day", at(0)).await?;

        let snapshot = snapshot_of(&store).await?;
        assert!(snapshot.has_completed_workout(1));
        mark_workout_done(&store, &snapshot, &cherry(), "push day, extended", at(30)).await?;

        let logs = store.logs_for(vec![TODAY]).await?;
        assert_eq!(logs.len(), 1);
        assert_eq!(
            logs[0].workout_description.as_deref(),
            Some("push day, extended")
        );
        assert_eq!(logs[0].completed_at, Some(at(30)));
        Ok(())
    }

    #[tokio::test]
    async fn test_mark_done_empty_description_stored_as_none() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonStore::new(dir.path().to_owned())?;

        let snapshot = snapshot_of(&store).await?;
        mark_workout_done(&store, &snapshot, &cherry(), "  ", at(0)).await?;

        let logs = store.logs_for(vec![TODAY]).await?;
        assert_eq!(logs[0].workout_description, None);
        assert!(logs[0].completed);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_plan_targets_next_workout_day() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonStore::new(dir.path().to_owned())?;

        let snapshot = snapshot_of(&store).await?;
        let target = save_plan(&store, &snapshot, &cherry(), "intervals", at(0)).await?;

        assert_eq!(target, Some(TODAY + Duration::days(2)));
        let snapshot = snapshot_of(&store).await?;
        assert!(snapshot.has_planned_workout(1));
        Ok(())
    }

    #[tokio::test]
    async fn test_save_plan_twice_updates_in_place() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonStore::new(dir.path().to_owned())?;

        let snapshot = snapshot_of(&store).await?;
        save_plan(&store, &snapshot, &cherry(), "intervals", at(0)).await?;

        let snapshot = snapshot_of(&store).await?;
        save_plan(&store, &snapshot, &cherry(), "hills instead", at(30)).await?;

        let plans = store.recent_plans().await?;
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].plan_text, "hills instead");
        assert_eq!(plans[0].created_at, at(30));
        Ok(())
    }

    #[tokio::test]
    async fn test_blank_plan_is_a_no_op() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonStore::new(dir.path().to_owned())?;

        let snapshot = snapshot_of(&store).await?;
        let target = save_plan(&store, &snapshot, &cherry(), "   \n", at(0)).await?;

        assert_eq!(target, None);
        assert_eq!(store.recent_plans().await?, vec![]);
        Ok(())
    }
}
