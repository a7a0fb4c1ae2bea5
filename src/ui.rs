use crate::errors::HabitError;
use crate::models::{date_key, Habit, ReportSummary};
use crate::report::recent_days;
use chrono::NaiveDate;

const EMPTY_STATE: &str = "Build a better YOU, one brick at a time";
const DELETE_PROMPT: &str = "Are you sure you want to delete this progress?";
const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn render_dashboard(today: NaiveDate, habits: &[Habit], warning: Option<&HabitError>) -> String {
    let banner = match warning {
        Some(err) => format!(
            r#"<p class="warning">Saved habits could not be read and were reset. ({})</p>"#,
            escape_html(&err.to_string())
        ),
        None => String::new(),
    };

    let body = if habits.is_empty() {
        format!(r#"<p class="empty">{EMPTY_STATE}</p>"#)
    } else {
        let cards: String = habits.iter().map(|habit| render_card(habit, today)).collect();
        format!(r#"<div class="habits">{cards}</div>"#)
    };

    page(
        "Habits",
        &DASHBOARD_HTML
            .replace("{{DATE}}", &today.format("%b %-d, %Y").to_string())
            .replace("{{WARNING}}", &banner)
            .replace("{{BODY}}", &body),
    )
}

fn render_card(habit: &Habit, today: NaiveDate) -> String {
    let strip: String = recent_days(habit, today)
        .iter()
        .map(|mark| {
            format!(
                r#"<div class="day"><span class="label">{}</span><span class="circle{}{}">{}</span></div>"#,
                mark.weekday,
                if mark.completed { " done" } else { "" },
                if mark.is_today { " today" } else { "" },
                mark.day,
            )
        })
        .collect();

    let done_today = habit.is_completed_on(today);
    CARD_HTML
        .replace("{{ID}}", &habit.id.to_string())
        .replace("{{PROMPT}}", DELETE_PROMPT)
        .replace("{{STRIP}}", &strip)
        .replace("{{TODAY}}", &date_key(today))
        .replace("{{CHECKED}}", if done_today { " checked" } else { "" })
        .replace("{{NAME}}", &escape_html(&habit.name))
}

pub fn render_report(habit: &Habit, report: &ReportSummary) -> String {
    let labels: String = WEEKDAY_LABELS
        .iter()
        .map(|label| format!(r#"<div class="weekday">{label}</div>"#))
        .collect();
    let blanks = r#"<div></div>"#.repeat(report.leading_blanks as usize);
    let cells: String = report
        .calendar_days
        .iter()
        .map(|cell| {
            format!(
                r#"<div class="cell{}{}">{}</div>"#,
                if cell.completed { " done" } else { "" },
                if cell.is_today { " today" } else { "" },
                cell.day,
            )
        })
        .collect();

    let percentage = report.percentage.clamp(0.0, 100.0);
    // Circle radius 50 in the donut's viewBox.
    let circumference = 2.0 * std::f64::consts::PI * 50.0;
    let offset = circumference - percentage / 100.0 * circumference;

    page(
        &escape_html(&habit.name),
        &REPORT_HTML
            .replace("{{COMPLETED}}", &report.completed_count.to_string())
            .replace("{{MISSED}}", &report.missed_count.to_string())
            .replace("{{PERCENT}}", &format!("{}", percentage.round() as u32))
            .replace("{{CIRCUMFERENCE}}", &format!("{circumference:.2}"))
            .replace("{{OFFSET}}", &format!("{offset:.2}"))
            .replace("{{MONTH}}", &report.month_label)
            .replace("{{GRID}}", &format!("{labels}{blanks}{cells}"))
            .replace("{{NAME}}", &escape_html(&habit.name)),
    )
}

pub fn render_not_found() -> String {
    page(
        "Habit not found",
        r#"<header class="bar"><a class="back" href="/">&larr; Back</a></header>
<h1>Habit not found</h1>"#,
    )
}

fn page(title: &str, content: &str) -> String {
    PAGE_HTML
        .replace("{{TITLE}}", title)
        .replace("{{CONTENT}}", content)
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(ch),
        }
    }
    out
}

const DASHBOARD_HTML: &str = r#"<header class="bar">
  <h1>{{DATE}}</h1>
</header>
{{WARNING}}
<form class="add" method="post" action="/habits">
  <input type="text" name="name" placeholder="Type in your new habit" required />
  <button type="submit" class="primary">Save</button>
</form>
{{BODY}}"#;

const CARD_HTML: &str = r#"<section class="card">
  <div class="card-head">
    <h2>{{NAME}}</h2>
    <form method="post" action="/habits/{{ID}}/delete" onsubmit="return confirm('{{PROMPT}}');">
      <button type="submit" class="ghost" aria-label="Delete">&#128465;</button>
    </form>
  </div>
  <div class="strip">{{STRIP}}</div>
  <div class="card-foot">
    <form method="post" action="/habits/{{ID}}/toggle">
      <input type="hidden" name="date" value="{{TODAY}}" />
      <label class="done">
        <input type="checkbox" onchange="this.form.submit()"{{CHECKED}} /> Done
      </label>
    </form>
    <a class="outline" href="/report/{{ID}}">Reports</a>
  </div>
</section>"#;

const REPORT_HTML: &str = r##"<header class="bar">
  <a class="back" href="/">&larr;</a>
  <h1>{{NAME}}</h1>
</header>
<section class="progress">
  <h2>Total Progress</h2>
  <div class="stats">
    <div class="stat"><span class="ok">&#10003;</span> {{COMPLETED}}</div>
    <div class="donut">
      <svg width="150" height="150" viewBox="0 0 120 120">
        <circle cx="60" cy="60" r="50" fill="none" stroke="#E6E6E6" stroke-width="10" />
        <circle cx="60" cy="60" r="50" fill="none" stroke="currentColor" stroke-width="10"
          stroke-dasharray="{{CIRCUMFERENCE}}" stroke-dashoffset="{{OFFSET}}"
          stroke-linecap="round" transform="rotate(-90 60 60)" />
      </svg>
      <span class="percent">{{PERCENT}}%</span>
    </div>
    <div class="stat"><span class="miss">&#10007;</span> {{MISSED}}</div>
  </div>
</section>
<h2 class="month">{{MONTH}}</h2>
<div class="calendar">{{GRID}}</div>"##;

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --background: #fefdf8;
      --primary: #4a775e;
      --light-text: #6a8a79;
      --border: #6a8a79;
      --accent: #9bb2a3;
      --white: #ffffff;
    }

    body {
      background: var(--background);
      color: var(--primary);
      font-family: sans-serif;
      margin: 0;
      padding: 2rem;
      display: flex;
      justify-content: center;
    }

    main {
      width: 100%;
      max-width: 400px;
      display: flex;
      flex-direction: column;
      gap: 1.5rem;
    }

    .bar {
      display: flex;
      align-items: center;
      justify-content: center;
      position: relative;
    }

    .bar h1 {
      font-size: 1.5rem;
      font-weight: 500;
      margin: 0;
    }

    .back {
      position: absolute;
      left: 0;
      font-size: 2rem;
      text-decoration: none;
      color: var(--primary);
    }

    .warning {
      background: #fbe9e7;
      color: #b23c2a;
      padding: 0.75rem;
      border-radius: 8px;
    }

    .empty {
      text-align: center;
      font-size: 1.2rem;
      margin-top: 5rem;
      color: var(--light-text);
    }

    form.add,
    .card {
      background: var(--primary);
      color: var(--white);
      padding: 1rem;
      border-radius: 12px;
    }

    form.add {
      display: flex;
      gap: 0.5rem;
    }

    form.add input {
      flex-grow: 1;
      border: 1px solid var(--border);
      padding: 0.75rem;
      border-radius: 8px;
      font-size: 1rem;
    }

    button,
    .outline {
      border: 1px solid var(--accent);
      border-radius: 8px;
      padding: 0.5rem 1rem;
      cursor: pointer;
      font-weight: bold;
      text-decoration: none;
    }

    button.primary {
      background: var(--white);
      color: var(--primary);
    }

    button.ghost {
      background: none;
      border: none;
      color: var(--accent);
    }

    .outline {
      background: none;
      color: var(--accent);
    }

    .habits,
    .card {
      display: flex;
      flex-direction: column;
      gap: 1rem;
    }

    .card-head,
    .card-foot {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    .card-head h2 {
      font-size: 1.2rem;
      font-weight: 500;
      margin: 0;
    }

    .strip {
      display: flex;
      justify-content: space-around;
    }

    .day {
      display: flex;
      flex-direction: column;
      align-items: center;
      gap: 0.5rem;
    }

    .day .label {
      font-size: 0.8rem;
      color: var(--accent);
    }

    .circle,
    .cell {
      width: 30px;
      height: 30px;
      border-radius: 50%;
      display: flex;
      justify-content: center;
      align-items: center;
      border: 1px solid transparent;
      font-weight: bold;
      margin: 0 auto;
    }

    .circle.done {
      background: var(--border);
    }

    .circle.today,
    .cell.today {
      border-color: var(--white);
    }

    .progress {
      text-align: center;
    }

    .progress h2,
    .month {
      font-weight: 500;
      text-align: center;
      color: var(--light-text);
    }

    .stats {
      display: flex;
      justify-content: space-around;
      align-items: center;
    }

    .stat {
      font-size: 1.5rem;
      font-weight: bold;
    }

    .ok {
      color: #4a775e;
    }

    .miss {
      color: #d9534f;
    }

    .donut {
      position: relative;
      width: 150px;
      height: 150px;
      color: var(--primary);
    }

    .percent {
      position: absolute;
      top: 50%;
      left: 50%;
      transform: translate(-50%, -50%);
      font-size: 2rem;
      font-weight: bold;
    }

    .calendar {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 10px;
      text-align: center;
      background: var(--primary);
      color: var(--white);
      padding: 1rem;
      border-radius: 12px;
    }

    .weekday {
      font-weight: bold;
      color: var(--accent);
    }

    .cell.done {
      background: var(--accent);
    }
  </style>
</head>
<body>
  <main>
{{CONTENT}}
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HabitId;
    use crate::report::build_report_at;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn habit(name: &str) -> Habit {
        Habit {
            id: HabitId(1_710_000_000_000),
            name: name.to_string(),
            completed: BTreeMap::from([("2024-03-15".to_string(), true)]),
            created_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
        }
    }

    #[test]
    fn dashboard_shows_empty_state() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let html = render_dashboard(today, &[], None);
        assert!(html.contains(EMPTY_STATE));
        assert!(html.contains("Mar 15, 2024"));
    }

    #[test]
    fn dashboard_escapes_names_and_links_reports() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let html = render_dashboard(today, &[habit("<b>Read</b>")], None);

        assert!(html.contains("&lt;b&gt;Read&lt;/b&gt;"));
        assert!(!html.contains("<b>Read</b>"));
        assert!(html.contains(r#"href="/report/1710000000000""#));
        assert!(html.contains(r#"value="2024-03-15""#));
        assert!(html.contains(" checked"));
    }

    #[test]
    fn dashboard_surfaces_load_warning() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let warning = HabitError::Persistence("expected value".into());
        let html = render_dashboard(today, &[], Some(&warning));
        assert!(html.contains(r#"class="warning""#));
    }

    #[test]
    fn placeholder_text_in_names_stays_literal() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let html = render_dashboard(today, &[habit("{{TODAY}}"), habit("{{STRIP}}")], None);

        assert!(html.contains("<h2>&#123;&#123;TODAY&#125;&#125;</h2>"));
        assert!(html.contains("<h2>&#123;&#123;STRIP&#125;&#125;</h2>"));
        assert!(!html.contains("<h2>2024-03-15</h2>"));

        let habit = habit("{{CONTENT}} {{GRID}}");
        let report = build_report_at(today, &habit);
        let html = render_report(&habit, &report);
        assert_eq!(html.matches(r#"class="weekday""#).count(), 7);
        assert!(html.contains("&#123;&#123;CONTENT&#125;&#125; &#123;&#123;GRID&#125;&#125;"));
    }

    #[test]
    fn report_page_draws_donut_for_percentage() {
        let habit = habit("Read");
        let report = build_report_at(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), &habit);
        let html = render_report(&habit, &report);

        assert!(html.contains(r##"stroke="#E6E6E6""##));
        assert!(html.contains(r#"stroke-dasharray="314.16""#));
        assert!(html.contains(r#"<span class="percent">"#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn report_page_renders_counts_and_grid() {
        let habit = habit("Read");
        let report = build_report_at(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), &habit);
        let html = render_report(&habit, &report);

        assert!(html.contains("March 2024"));
        assert_eq!(html.matches(r#"class="weekday""#).count(), 7);
        assert_eq!(html.matches(r#"<div class="cell"#).count(), 31);
        // 2024-03-01 is a Friday.
        assert_eq!(html.matches("<div></div>").count(), 5);
    }
}
