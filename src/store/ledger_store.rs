use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use super::entities::{
    MissedWorkout, NewMissedWorkout, NewWorkoutLog, NewWorkoutPlan, RecordId, User, WorkoutLog,
    WorkoutLogPatch, WorkoutPlan, WorkoutPlanPatch,
};

/// Interface for abstracting persistence of ledger rows. Reads return whole
/// filtered collections; the core derives everything else from a fetched
/// snapshot. Writes are row-level inserts and patches, with no transaction
/// spanning a read-modify-write pair.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn users(&self) -> Result<Vec<User>>;

    /// Logs whose workout_date is one of `dates`. The refresh pass only ever
    /// needs today and yesterday.
    async fn logs_for(&self, dates: Vec<NaiveDate>) -> Result<Vec<WorkoutLog>>;

    /// All plans, most recently created first.
    async fn recent_plans(&self) -> Result<Vec<WorkoutPlan>>;

    async fn unacknowledged_missed(&self) -> Result<Vec<MissedWorkout>>;

    async fn insert_log(&self, row: NewWorkoutLog) -> Result<WorkoutLog>;

    async fn update_log(&self, id: RecordId, patch: WorkoutLogPatch) -> Result<()>;

    async fn insert_plan(&self, row: NewWorkoutPlan) -> Result<WorkoutPlan>;

    async fn update_plan(&self, id: RecordId, patch: WorkoutPlanPatch) -> Result<()>;

    async fn insert_missed(&self, row: NewMissedWorkout) -> Result<MissedWorkout>;

    async fn acknowledge_missed(&self, id: RecordId) -> Result<()>;
}
