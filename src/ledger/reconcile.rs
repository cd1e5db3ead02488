use chrono::{DateTime, NaiveDate, Utc};
use futures::future::join_all;
use tracing::{debug, error, info};

use crate::store::{
    entities::{NewMissedWorkout, User, WorkoutLog},
    ledger_store::LedgerStore,
};

use super::calendar::{is_workout_day, previous_day};

/// Settles yesterday's attendance: records a miss for every user without a
/// completed log on the most recent elapsed workout day, and acknowledges
/// misses older than that so shame only ever points at the latest one.
///
/// Best effort throughout. Each write is independent, errors are logged and
/// the rest of the pass continues. Running the pass twice over the same
/// state changes nothing: creation is guarded by an existence check and
/// acknowledgement converges.
pub async fn reconcile_missed<S: LedgerStore>(
    store: &S,
    today: NaiveDate,
    users: &[User],
    logs: &[WorkoutLog],
    now: DateTime<Utc>,
) {
    let yesterday = previous_day(today);

    let open = match store.unacknowledged_missed().await {
        Ok(open) => open,
        Err(e) => {
            error!("Failed to fetch missed workouts, skipping reconcile pass {e:?}");
            return;
        }
    };

    // Anything not dated yesterday is old news.
    let expiries = open
        .iter()
        .filter(|miss| miss.workout_date != yesterday)
        .map(|miss| async move {
            match store.acknowledge_missed(miss.id).await {
                Ok(()) => debug!("Acknowledged stale miss {} for user {}", miss.id, miss.user_id),
                Err(e) => error!("Failed to acknowledge miss {}: {e:?}", miss.id),
            }
        });
    join_all(expiries).await;

    if !is_workout_day(yesterday) {
        return;
    }

    let candidates = users.iter().filter(|user| {
        let completed = logs
            .iter()
            .any(|log| log.user_id == user.id && log.workout_date == yesterday && log.completed);
        let already_recorded = open
            .iter()
            .any(|miss| miss.user_id == user.id && miss.workout_date == yesterday);
        !completed && !already_recorded
    });

    let insertions = candidates.map(|user| async move {
        let row = NewMissedWorkout {
            user_id: user.id,
            workout_date: yesterday,
            created_at: now,
        };
        match store.insert_missed(row).await {
            Ok(_) => info!("Recorded missed workout for {} on {yesterday}", user.name),
            Err(e) => error!("Failed to record missed workout for {}: {e:?}", user.name),
        }
    });
    join_all(insertions).await;
}
