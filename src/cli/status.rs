use ansi_term::Colour::{Green, Red, Yellow};
use chrono::NaiveDate;

use crate::ledger::snapshot::Snapshot;

/// Renders the status block: a shame banner for every user with an
/// unacknowledged miss, a date header, and a line per roster member echoing
/// the original app's voice.
pub fn render_status(snapshot: &Snapshot) -> String {
    let mut lines = vec![];

    for user in &snapshot.users {
        if snapshot.has_missed_workout(user.id) {
            lines.push(
                Red.bold()
                    .paint(format!(
                        "{} didn't work out yesterday. Shame time!!",
                        user.name
                    ))
                    .to_string(),
            );
        }
    }

    let day_kind = if snapshot.is_workout_day() {
        "workout day"
    } else {
        "off day"
    };
    lines.push(format!("{} ({day_kind})", format_date(snapshot.today)));

    if snapshot.users.is_empty() {
        lines.push("Nobody on the roster yet. Add someone with `spotter add NAME`.".into());
    }

    for user in &snapshot.users {
        lines.push(format!("  {}\t{}", user.name, user_line(snapshot, user.id)));
    }

    lines.join("\n")
}

fn user_line(snapshot: &Snapshot, user_id: i64) -> String {
    if snapshot.is_workout_day() {
        if snapshot.has_completed_workout(user_id) {
            return Green.paint("workout completed for today, go flex!").to_string();
        }
        let plan = snapshot.workout_plan_text(user_id);
        let plan = if plan.is_empty() {
            "no workout planned"
        } else {
            plan
        };
        return Yellow
            .paint(format!("still hasn't worked out... mock them! ({plan})"))
            .to_string();
    }

    if snapshot.has_planned_workout(user_id) {
        Green
            .paint(format!(
                "already planned the next move: {}",
                snapshot.workout_plan_text(user_id)
            ))
            .to_string()
    } else {
        Yellow
            .paint("still needs to plan. Go ahead, shame them.")
            .to_string()
    }
}

/// "Wed, 16 Apr" style header, same shape the original UI used.
fn format_date(date: NaiveDate) -> String {
    date.format("%a, %-d %b").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    use crate::{
        ledger::snapshot::Snapshot,
        store::entities::{MissedWorkout, User, WorkoutLog},
    };

    use super::{format_date, render_status};

    const WEDNESDAY: NaiveDate = NaiveDate::from_ymd_opt(2025, 4, 16).unwrap();

    fn users() -> Vec<User> {
        vec![
            User {
                id: 1,
                name: "Cherry".into(),
                avatar_url: None,
            },
            User {
                id: 2,
                name: "Peus".into(),
                avatar_url: None,
            },
        ]
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(WEDNESDAY), "Wed, 16 Apr");
    }

    #[test]
    fn test_shame_banner_only_for_missed_users() {
        let created = Utc.with_ymd_and_hms(2025, 4, 16, 0, 1, 0).unwrap();
        let snapshot = Snapshot::new(
            WEDNESDAY,
            users(),
            vec![],
            vec![],
            vec![MissedWorkout {
                id: 1,
                user_id: 2,
                workout_date: WEDNESDAY - Duration::days(1),
                acknowledged: false,
                created_at: created,
            }],
        );

        let status = render_status(&snapshot);
        assert!(status.contains("Peus didn't work out yesterday"));
        assert!(!status.contains("Cherry didn't work out yesterday"));
        assert!(status.contains("off day"));
    }

    #[test]
    fn test_workout_day_lines() {
        // A Tuesday with one completed log.
        let tuesday = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();
        let stamp = Utc.with_ymd_and_hms(2025, 4, 15, 9, 0, 0).unwrap();
        let snapshot = Snapshot::new(
            tuesday,
            users(),
            vec![WorkoutLog {
                id: 1,
                user_id: 1,
                workout_date: tuesday,
                completed: true,
                completed_at: Some(stamp),
                workout_description: Some("pull day".into()),
                created_at: stamp,
            }],
            vec![],
            vec![],
        );

        let status = render_status(&snapshot);
        assert!(status.contains("workout day"));
        assert!(status.contains("go flex"));
        assert!(status.contains("mock them"));
    }

    #[test]
    fn test_empty_roster_hint() {
        let snapshot = Snapshot::new(WEDNESDAY, vec![], vec![], vec![], vec![]);
        assert!(render_status(&snapshot).contains("Nobody on the roster yet"));
    }
}
