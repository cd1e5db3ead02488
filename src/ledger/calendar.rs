use chrono::{Datelike, NaiveDate, Weekday};

/// Workout days are Tuesday, Thursday and Saturday. Pure and total over all
/// representable dates.
pub fn is_workout_day(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Tue | Weekday::Thu | Weekday::Sat)
}

/// Earliest workout day strictly after `date`. Never returns `date` itself
/// and advances at most 6 days before the weekday pattern repeats.
pub fn next_workout_day(date: NaiveDate) -> NaiveDate {
    let mut next = date.succ_opt().expect("End of time should never happen");
    while !is_workout_day(next) {
        next = next.succ_opt().expect("End of time should never happen");
    }
    next
}

/// The day before `date`, used as the reference for reconciling misses.
pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date.pred_opt().expect("Beginning of time should never happen")
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Duration, NaiveDate, Weekday};

    use super::{is_workout_day, next_workout_day, previous_day};

    // 2025-04-15 is a Tuesday.
    const TUESDAY: NaiveDate = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();

    #[test]
    fn test_workout_days_match_pattern() {
        assert!(is_workout_day(TUESDAY));
        assert!(is_workout_day(TUESDAY + Duration::days(2))); // Thursday
        assert!(is_workout_day(TUESDAY + Duration::days(4))); // Saturday
        assert!(!is_workout_day(TUESDAY + Duration::days(1))); // Wednesday
        assert!(!is_workout_day(TUESDAY + Duration::days(5))); // Sunday
        assert!(!is_workout_day(TUESDAY + Duration::days(6))); // Monday
    }

    #[test]
    fn test_next_workout_day_advances() {
        assert_eq!(next_workout_day(TUESDAY), TUESDAY + Duration::days(2));
        // From a Saturday the next one is Tuesday, the longest gap.
        let saturday = TUESDAY + Duration::days(4);
        assert_eq!(next_workout_day(saturday).weekday(), Weekday::Tue);
        assert_eq!(next_workout_day(saturday), saturday + Duration::days(3));
    }

    #[test]
    fn test_next_workout_day_is_strictly_later() {
        let mut date = TUESDAY;
        for _ in 0..14 {
            let next = next_workout_day(date);
            assert!(next > date);
            assert!(next - date <= Duration::days(6));
            assert!(is_workout_day(next));
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_previous_day() {
        assert_eq!(previous_day(TUESDAY), TUESDAY - Duration::days(1));
    }
}
