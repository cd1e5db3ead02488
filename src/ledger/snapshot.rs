use chrono::NaiveDate;

use crate::store::entities::{MissedWorkout, User, UserId, WorkoutLog, WorkoutPlan};

use super::calendar::{is_workout_day, next_workout_day, previous_day};

/// One fetched view of the ledger. Everything the presentation layer asks is
/// derived from this value on demand; nothing is cached between refreshes.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub today: NaiveDate,
    pub users: Vec<User>,
    pub logs: Vec<WorkoutLog>,
    pub plans: Vec<WorkoutPlan>,
    pub missed: Vec<MissedWorkout>,
}

impl Snapshot {
    /// Normalizes ordering so predicates don't depend on what the store
    /// returned: users by name, plans newest first.
    pub fn new(
        today: NaiveDate,
        mut users: Vec<User>,
        logs: Vec<WorkoutLog>,
        mut plans: Vec<WorkoutPlan>,
        missed: Vec<MissedWorkout>,
    ) -> Self {
        users.sort_by(|a, b| a.name.cmp(&b.name));
        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Self {
            today,
            users,
            logs,
            plans,
            missed,
        }
    }

    pub fn is_workout_day(&self) -> bool {
        is_workout_day(self.today)
    }

    pub fn yesterday(&self) -> NaiveDate {
        previous_day(self.today)
    }

    pub fn user_named(&self, name: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.name.eq_ignore_ascii_case(name))
    }

    pub fn log_for(&self, user_id: UserId, date: NaiveDate) -> Option<&WorkoutLog> {
        self.logs
            .iter()
            .find(|log| log.user_id == user_id && log.workout_date == date)
    }

    pub fn plan_for(&self, user_id: UserId, date: NaiveDate) -> Option<&WorkoutPlan> {
        self.plans
            .iter()
            .find(|plan| plan.user_id == user_id && plan.for_date == date)
    }

    /// True when the user logged a completed workout for today.
    pub fn has_completed_workout(&self, user_id: UserId) -> bool {
        self.log_for(user_id, self.today)
            .is_some_and(|log| log.completed)
    }

    /// True when the user has a plan targeting the next workout day strictly
    /// after today. Saving a plan always targets that date, so plan status is
    /// keyed to it as well.
    pub fn has_planned_workout(&self, user_id: UserId) -> bool {
        self.plan_for(user_id, next_workout_day(self.today)).is_some()
    }

    /// Plan text to show for a user: today's plan if one exists, otherwise
    /// the most recently created plan of any date, otherwise empty.
    pub fn workout_plan_text(&self, user_id: UserId) -> &str {
        if let Some(plan) = self.plan_for(user_id, self.today) {
            return &plan.plan_text;
        }

        // Plans are kept newest first, so the first match is the most recent.
        self.plans
            .iter()
            .find(|plan| plan.user_id == user_id)
            .map(|plan| plan.plan_text.as_str())
            .unwrap_or("")
    }

    /// True when an unacknowledged miss is recorded for yesterday. Older
    /// misses are auto-acknowledged by the reconciliation pass.
    pub fn has_missed_workout(&self, user_id: UserId) -> bool {
        let yesterday = self.yesterday();
        self.missed
            .iter()
            .any(|m| m.user_id == user_id && m.workout_date == yesterday && !m.acknowledged)
    }
}
