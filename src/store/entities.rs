use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub type RecordId = i64;
pub type UserId = i64;

/// A roster member. Seeded through the `add` command and treated as
/// immutable by everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Attendance record for one (user, date). At most one row exists per pair;
/// repeat mark-done calls update the row in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub id: RecordId,
    pub user_id: UserId,
    pub workout_date: NaiveDate,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub workout_description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// What a user intends to do on `for_date`. One row per (user, for_date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub id: RecordId,
    pub user_id: UserId,
    pub plan_text: String,
    pub for_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Recorded by the reconciliation pass when a scheduled day went by without
/// a completed log. Acknowledgement is the only mutation after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissedWorkout {
    pub id: RecordId,
    pub user_id: UserId,
    pub workout_date: NaiveDate,
    pub acknowledged: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkoutLog {
    pub user_id: UserId,
    pub workout_date: NaiveDate,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub workout_description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutLogPatch {
    pub completed: bool,
    pub completed_at: DateTime<Utc>,
    pub workout_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkoutPlan {
    pub user_id: UserId,
    pub plan_text: String,
    pub for_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutPlanPatch {
    pub plan_text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMissedWorkout {
    pub user_id: UserId,
    pub workout_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}
