use crate::models::{date_key, CalendarDay, DayMark, Habit, ReportSummary};
use chrono::{Datelike, Duration, Local, NaiveDate};

const STRIP_DAYS: i64 = 7;

pub fn build_report(habit: &Habit) -> ReportSummary {
    build_report_at(Local::now().date_naive(), habit)
}

/// Monthly report for `habit` as of `today`. Counts only cover days from the
/// later of month start and creation day up to and including `today`; the
/// grid always spans the whole month.
pub fn build_report_at(today: NaiveDate, habit: &Habit) -> ReportSummary {
    let month_start = first_of_month(today);
    let month_days = days_in_month(today);
    let range_start = habit
        .created_on()
        .map_or(month_start, |created| month_start.max(created));

    let mut calendar_days = Vec::with_capacity(month_days as usize);
    let mut in_range = 0u32;
    let mut completed_count = 0u32;

    for offset in 0..month_days {
        let date = month_start + Duration::days(i64::from(offset));
        let completed = habit.is_completed_on(date);

        if date >= range_start && date <= today {
            in_range += 1;
            if completed {
                completed_count += 1;
            }
        }

        calendar_days.push(CalendarDay {
            date: date_key(date),
            day: date.day(),
            completed,
            is_today: date == today,
        });
    }

    let percentage = if in_range == 0 {
        0.0
    } else {
        f64::from(completed_count) / f64::from(in_range) * 100.0
    };

    ReportSummary {
        year: today.year(),
        month: today.month(),
        month_label: today.format("%B %Y").to_string(),
        completed_count,
        missed_count: in_range - completed_count,
        percentage,
        leading_blanks: month_start.weekday().num_days_from_sunday(),
        calendar_days,
    }
}

/// The seven days ending at `today`, oldest first.
pub fn recent_days(habit: &Habit, today: NaiveDate) -> Vec<DayMark> {
    (0..STRIP_DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            DayMark {
                date: date_key(date),
                weekday: date.format("%a").to_string(),
                day: date.day(),
                completed: habit.is_completed_on(date),
                is_today: offset == 0,
            }
        })
        .collect()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn days_in_month(date: NaiveDate) -> u32 {
    let start = first_of_month(date);
    // Day 32 counted from the 1st always falls in the following month.
    let next = first_of_month(start + Duration::days(31));
    (next - start).num_days() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HabitId;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn habit_created(created: NaiveDate, done: &[NaiveDate]) -> Habit {
        let local_morning = Local
            .from_local_datetime(&created.and_hms_opt(9, 0, 0).unwrap())
            .earliest()
            .unwrap();
        Habit {
            id: HabitId(1),
            name: "Read".to_string(),
            completed: done.iter().map(|d| (date_key(*d), true)).collect::<BTreeMap<_, _>>(),
            created_at: Some(local_morning.with_timezone(&Utc)),
        }
    }

    #[test]
    fn mid_month_habit_counts_from_creation_day() {
        let habit = habit_created(day(2024, 3, 10), &[day(2024, 3, 10), day(2024, 3, 11)]);
        let report = build_report_at(day(2024, 3, 15), &habit);

        assert_eq!(report.completed_count, 2);
        assert_eq!(report.missed_count, 4);
        assert!((report.percentage - 33.333).abs() < 0.01);
    }

    #[test]
    fn habit_from_earlier_month_counts_from_first_of_month() {
        let habit = habit_created(
            day(2024, 1, 20),
            &[day(2024, 1, 31), day(2024, 2, 1), day(2024, 2, 3)],
        );
        let report = build_report_at(day(2024, 2, 4), &habit);

        assert_eq!(report.completed_count, 2);
        assert_eq!(report.missed_count, 2);
        assert!((report.percentage - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn habit_without_creation_time_counts_from_first_of_month() {
        let mut habit = habit_created(day(2024, 3, 10), &[day(2024, 3, 1), day(2024, 3, 12)]);
        habit.created_at = None;
        let report = build_report_at(day(2024, 3, 15), &habit);

        assert_eq!(report.completed_count, 2);
        assert_eq!(report.missed_count, 13);
    }

    #[test]
    fn completions_after_today_do_not_count() {
        let habit = habit_created(day(2024, 3, 1), &[day(2024, 3, 2), day(2024, 3, 20)]);
        let report = build_report_at(day(2024, 3, 2), &habit);

        assert_eq!(report.completed_count, 1);
        assert_eq!(report.missed_count, 1);
        let future = report
            .calendar_days
            .iter()
            .find(|cell| cell.date == "2024-03-20")
            .expect("missing day");
        assert!(future.completed);
    }

    #[test]
    fn habit_created_after_reference_date_reports_zero() {
        let habit = habit_created(day(2024, 3, 20), &[]);
        let report = build_report_at(day(2024, 3, 15), &habit);

        assert_eq!(report.completed_count, 0);
        assert_eq!(report.missed_count, 0);
        assert_eq!(report.percentage, 0.0);
        assert!(!report.percentage.is_nan());
    }

    #[test]
    fn grid_covers_whole_month_with_leading_blanks() {
        let habit = habit_created(day(2024, 1, 1), &[]);
        // 2024-02-01 is a Thursday, 2024-09-01 a Sunday, 2023-02-01 a Wednesday.
        let cases = [
            (day(2024, 2, 14), 29, 4),
            (day(2023, 2, 14), 28, 3),
            (day(2024, 9, 30), 30, 0),
            (day(2024, 12, 31), 31, 0),
        ];

        for (today, len, blanks) in cases {
            let report = build_report_at(today, &habit);
            assert_eq!(report.calendar_days.len(), len, "{today}");
            assert_eq!(report.leading_blanks, blanks, "{today}");
            assert_eq!(report.calendar_days[0].day, 1);
            assert_eq!(report.calendar_days.iter().filter(|c| c.is_today).count(), 1);
        }
    }

    #[test]
    fn report_labels_month() {
        let habit = habit_created(day(2024, 3, 1), &[]);
        let report = build_report_at(day(2024, 3, 15), &habit);
        assert_eq!(report.month_label, "March 2024");
        assert_eq!((report.year, report.month), (2024, 3));
    }

    #[test]
    fn recent_days_ends_today() {
        let habit = habit_created(day(2024, 2, 1), &[day(2024, 2, 28), day(2024, 3, 1)]);
        let strip = recent_days(&habit, day(2024, 3, 2));

        assert_eq!(strip.len(), 7);
        assert_eq!(strip[0].date, "2024-02-25");
        assert_eq!(strip[6].date, "2024-03-02");
        assert!(strip[6].is_today);
        assert_eq!(strip[6].weekday, "Sat");
        let done: Vec<u32> = strip.iter().filter(|d| d.completed).map(|d| d.day).collect();
        assert_eq!(done, vec![28, 1]);
    }
}
