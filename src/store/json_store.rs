use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{bail, Result};
use fs4::tokio::AsyncFileExt;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
};
use tracing::{debug, warn};

use super::{
    entities::{
        MissedWorkout, NewMissedWorkout, NewWorkoutLog, NewWorkoutPlan, RecordId, User, WorkoutLog,
        WorkoutLogPatch, WorkoutPlan, WorkoutPlanPatch,
    },
    ledger_store::LedgerStore,
};

const USERS_TABLE: &str = "users";
const LOGS_TABLE: &str = "workout_logs";
const PLANS_TABLE: &str = "workout_plans";
const MISSED_TABLE: &str = "missed_workouts";

/// File-backed [LedgerStore]. Each table is a JSON-lines file in the state
/// directory. Reads take a shared lock, writes an exclusive one. Inserts
/// append a single line; updates rewrite the whole table, which stays cheap
/// at this population size.
pub struct JsonStore {
    table_dir: PathBuf,
}

impl JsonStore {
    pub fn new(table_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&table_dir)?;

        Ok(Self { table_dir })
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.table_dir.join(format!("{table}.jsonl"))
    }

    async fn read_table<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        async fn extract<T: DeserializeOwned>(
            path: &Path,
        ) -> std::result::Result<Vec<T>, std::io::Error> {
            debug!("Reading table {path:?}");
            let file = File::open(path).await?;
            file.lock_shared()?;
            let buffer = BufReader::new(file);
            let mut lines = buffer.lines();
            let mut rows = vec![];
            while let Ok(Some(line)) = lines.next_line().await {
                match serde_json::from_str::<T>(&line) {
                    Ok(row) => rows.push(row),
                    Err(e) => {
                        // ignore illegal values. Might happen after shutdowns
                        warn!(
                            "During parsing in table {:?} found illegal json string {}: {e}",
                            path, &line
                        )
                    }
                }
            }

            lines.into_inner().into_inner().unlock_async().await?;

            Ok(rows)
        }

        let path = self.table_path(table);
        match extract(&path).await {
            Ok(rows) => Ok(rows),
            Err(e) => {
                if e.kind() == ErrorKind::NotFound {
                    Ok(vec![])
                } else {
                    Err(e)?
                }
            }
        }
    }

    async fn append_row<T: Serialize>(&self, table: &str, row: &T) -> Result<()> {
        let file = File::options()
            .write(true)
            .create(true)
            .append(true)
            .open(self.table_path(table))
            .await?;

        file.lock_exclusive()?;
        Self::write_lines(file, std::slice::from_ref(row)).await
    }

    async fn rewrite_table<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<()> {
        let file = File::options()
            .write(true)
            .create(true)
            .open(self.table_path(table))
            .await?;

        // Truncation must happen under the lock: a reader holding the shared
        // lock would otherwise observe an empty table, and a crash in that
        // window would lose it entirely.
        file.lock_exclusive()?;
        file.set_len(0).await?;
        Self::write_lines(file, rows).await
    }

    async fn write_lines<T: Serialize>(mut file: File, rows: &[T]) -> Result<()> {
        let mut buffer = Vec::<u8>::new();
        for row in rows {
            serde_json::to_writer(&mut buffer, row)?;
            buffer.push(b'\n');
        }

        file.write_all(&buffer).await?;
        file.flush().await?;
        file.unlock_async().await?;
        Ok(())
    }

    /// Seeds a roster member. Not part of [LedgerStore]: the core treats the
    /// roster as immutable, so seeding stays an inherent operation.
    pub async fn add_user(&self, name: &str, avatar_url: Option<String>) -> Result<User> {
        let mut users: Vec<User> = self.read_table(USERS_TABLE).await?;
        if users
            .iter()
            .any(|u| u.name.eq_ignore_ascii_case(name))
        {
            bail!("user {name} is already on the roster");
        }

        let user = User {
            id: next_id(users.iter().map(|u| u.id)),
            name: name.to_owned(),
            avatar_url,
        };
        self.append_row(USERS_TABLE, &user).await?;
        users.push(user.clone());
        if users.len() > 2 {
            warn!("Roster has {} members, shame works best with 2", users.len());
        }
        Ok(user)
    }
}

fn next_id(ids: impl Iterator<Item = RecordId>) -> RecordId {
    ids.max().unwrap_or(0) + 1
}

#[async_trait::async_trait]
impl LedgerStore for JsonStore {
    async fn users(&self) -> Result<Vec<User>> {
        self.read_table(USERS_TABLE).await
    }

    async fn logs_for(&self, dates: Vec<chrono::NaiveDate>) -> Result<Vec<WorkoutLog>> {
        let logs: Vec<WorkoutLog> = self.read_table(LOGS_TABLE).await?;
        Ok(logs
            .into_iter()
            .filter(|log| dates.contains(&log.workout_date))
            .collect())
    }

    async fn recent_plans(&self) -> Result<Vec<WorkoutPlan>> {
        let mut plans: Vec<WorkoutPlan> = self.read_table(PLANS_TABLE).await?;
        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(plans)
    }

    async fn unacknowledged_missed(&self) -> Result<Vec<MissedWorkout>> {
        let missed: Vec<MissedWorkout> = self.read_table(MISSED_TABLE).await?;
        Ok(missed.into_iter().filter(|m| !m.acknowledged).collect())
    }

    async fn insert_log(&self, row: NewWorkoutLog) -> Result<WorkoutLog> {
        let logs: Vec<WorkoutLog> = self.read_table(LOGS_TABLE).await?;
        let log = WorkoutLog {
            id: next_id(logs.iter().map(|l| l.id)),
            user_id: row.user_id,
            workout_date: row.workout_date,
            completed: row.completed,
            completed_at: row.completed_at,
            workout_description: row.workout_description,
            created_at: row.created_at,
        };
        self.append_row(LOGS_TABLE, &log).await?;
        Ok(log)
    }

    async fn update_log(&self, id: RecordId, patch: WorkoutLogPatch) -> Result<()> {
        let mut logs: Vec<WorkoutLog> = self.read_table(LOGS_TABLE).await?;
        let Some(log) = logs.iter_mut().find(|l| l.id == id) else {
            bail!("no workout log with id {id}");
        };
        log.completed = patch.completed;
        log.completed_at = Some(patch.completed_at);
        log.workout_description = patch.workout_description;
        self.rewrite_table(LOGS_TABLE, &logs).await
    }

    async fn insert_plan(&self, row: NewWorkoutPlan) -> Result<WorkoutPlan> {
        let plans: Vec<WorkoutPlan> = self.read_table(PLANS_TABLE).await?;
        let plan = WorkoutPlan {
            id: next_id(plans.iter().map(|p| p.id)),
            user_id: row.user_id,
            plan_text: row.plan_text,
            for_date: row.for_date,
            created_at: row.created_at,
        };
        self.append_row(PLANS_TABLE, &plan).await?;
        Ok(plan)
    }

    async fn update_plan(&self, id: RecordId, patch: WorkoutPlanPatch) -> Result<()> {
        let mut plans: Vec<WorkoutPlan> = self.read_table(PLANS_TABLE).await?;
        let Some(plan) = plans.iter_mut().find(|p| p.id == id) else {
            bail!("no workout plan with id {id}");
        };
        plan.plan_text = patch.plan_text;
        plan.created_at = patch.created_at;
        self.rewrite_table(PLANS_TABLE, &plans).await
    }

    async fn insert_missed(&self, row: NewMissedWorkout) -> Result<MissedWorkout> {
        let missed: Vec<MissedWorkout> = self.read_table(MISSED_TABLE).await?;
        let miss = MissedWorkout {
            id: next_id(missed.iter().map(|m| m.id)),
            user_id: row.user_id,
            workout_date: row.workout_date,
            acknowledged: false,
            created_at: row.created_at,
        };
        self.append_row(MISSED_TABLE, &miss).await?;
        Ok(miss)
    }

    async fn acknowledge_missed(&self, id: RecordId) -> Result<()> {
        let mut missed: Vec<MissedWorkout> = self.read_table(MISSED_TABLE).await?;
        let Some(miss) = missed.iter_mut().find(|m| m.id == id) else {
            bail!("no missed workout with id {id}");
        };
        miss.acknowledged = true;
        self.rewrite_table(MISSED_TABLE, &missed).await
    }
}
