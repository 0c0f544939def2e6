//! Stats command for productivity metrics.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use dd_core::{AnalyticsReport, Clock, LogRepository, LogStore};

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W, S, C>(writer: &mut W, repo: &LogRepository<S, C>, args: &StatsArgs) -> Result<()>
where
    W: Write,
    S: LogStore,
    C: Clock,
{
    let report = repo.analytics().context("failed to compute analytics")?;

    if args.json {
        serde_json::to_writer_pretty(&mut *writer, &report).context("failed to serialize report")?;
        writeln!(writer)?;
        return Ok(());
    }

    if report.total_tasks == 0 {
        writeln!(writer, "No tasks recorded yet.")?;
        return Ok(());
    }
    write_report(writer, &report)?;
    Ok(())
}

fn write_report<W: Write>(writer: &mut W, report: &AnalyticsReport) -> std::io::Result<()> {
    writeln!(
        writer,
        "Tasks: {} total, {} completed",
        report.total_tasks, report.completed_tasks
    )?;
    writeln!(
        writer,
        "Last 30 days: {} ({:.2} per day)",
        report.recent_activity, report.average_tasks_per_day
    )?;

    writeln!(writer)?;
    writeln!(writer, "By category:")?;
    for (category, count) in &report.category_distribution {
        writeln!(writer, "  {:<14}{count:>4}", category.as_str())?;
    }

    writeln!(writer)?;
    writeln!(writer, "By priority:")?;
    for (priority, count) in &report.priority_distribution {
        writeln!(writer, "  {:<14}{count:>4}", priority.as_str())?;
    }

    writeln!(writer)?;
    writeln!(writer, "Daily activity:")?;
    for day in &report.daily_activity {
        writeln!(writer, "  {}    {:>4}", day.date, day.tasks)?;
    }

    if !report.insights.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Insights:")?;
        for insight in &report.insights {
            writeln!(
                writer,
                "  [{}/{}] {}: {}",
                insight.kind.as_str(),
                insight.priority,
                insight.title,
                insight.content
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use dd_core::{FixedClock, MemoryStore};
    use insta::assert_snapshot;

    const SEED: &str = r#"{"logs":[
        {"id":"log-3","task":"Ship release","category":"deployment","priority":"high",
         "timestamp":"2025-06-30T08:00:00Z","completed":true},
        {"id":"log-2","task":"Write API tests","category":"testing","priority":"high",
         "timestamp":"2025-06-30T07:00:00Z","completed":false},
        {"id":"log-1","task":"Fix login bug","category":"debugging","priority":"low",
         "timestamp":"2025-05-01T09:15:00Z","completed":true}
    ]}"#;

    fn repo(raw: &str) -> LogRepository<MemoryStore, FixedClock> {
        LogRepository::with_clock(
            MemoryStore::with_raw(raw),
            FixedClock {
                now: Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap(),
                hour: 14,
            },
        )
    }

    fn render(raw: &str, json: bool) -> String {
        let mut output = Vec::new();
        run(&mut output, &repo(raw), &StatsArgs { json }).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn stats_text_report() {
        assert_snapshot!(render(SEED, false), @r"
        Tasks: 3 total, 2 completed
        Last 30 days: 2 (0.07 per day)

        By category:
          debugging        1
          testing          1
          deployment       1

        By priority:
          low              1
          high             2

        Daily activity:
          2025-05-01       1
          2025-06-30       2

        Insights:
          [warning/high] High Priority Completion: You've completed 50.0% of high-priority tasks.
        ");
    }

    #[test]
    fn stats_json_report() {
        let output = render(SEED, true);
        let report: AnalyticsReport = serde_json::from_str(&output).unwrap();
        assert_eq!(report.total_tasks, 3);
        assert_eq!(report.recent_activity, 2);
        assert_eq!(report.daily_activity.len(), 2);

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["categoryDistribution"]["testing"], 1);
        assert_eq!(value["insights"][0]["type"], "warning");
    }

    #[test]
    fn stats_on_empty_log() {
        assert_eq!(render(r#"{"logs":[]}"#, false), "No tasks recorded yet.\n");
    }
}
