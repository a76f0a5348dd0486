use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    application::usecases::{PeriodOutcome, RunSummary},
    domain::{
        catalog::TemplateCatalog,
        models::{DispatchStats, InvoiceRow},
    },
    presentation::cli::OutputFormat,
};

#[derive(Debug, Serialize)]
struct PeriodEntry {
    code: String,
    description: &'static str,
    date_rule: String,
}

#[derive(Debug, Serialize)]
struct OverdueEntry<'a> {
    #[serde(flatten)]
    invoice: &'a InvoiceRow,
    days_late: i64,
}

fn stats_line(stats: &DispatchStats) -> String {
    format!(
        "sent {}, errors {}, skipped {}, processed {}",
        stats.sent(),
        stats.errors(),
        stats.skipped(),
        stats.total_processed()
    )
}

pub fn render_summary(summary: &RunSummary, format: OutputFormat) -> serde_json::Result<String> {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(summary);
    }

    let mut out = String::from("Dunning run\n");
    for outcome in &summary.periods {
        let _ = match outcome {
            PeriodOutcome::Completed(run) => writeln!(
                out,
                "  {:<5} {:<38} {}  {}",
                run.period.to_string(),
                run.description,
                run.target_date,
                stats_line(&run.stats)
            ),
            PeriodOutcome::Failed { period, error } => {
                writeln!(out, "  {:<5} FAILED: {error}", period.to_string())
            }
        };
    }
    let _ = write!(out, "Totals: {}", stats_line(&summary.totals));
    if summary.failed_periods() > 0 {
        let _ = write!(out, " ({} period(s) failed)", summary.failed_periods());
    }
    Ok(out)
}

pub fn render_periods(catalog: &TemplateCatalog, format: OutputFormat) -> serde_json::Result<String> {
    let entries: Vec<PeriodEntry> = catalog
        .templates()
        .iter()
        .map(|t| PeriodEntry {
            code: t.period.to_string(),
            description: t.description,
            date_rule: t.period.date_rule(),
        })
        .collect();

    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(&entries);
    }

    let lines: Vec<String> = entries
        .iter()
        .map(|e| format!("{:<5} {:<38} {}", e.code, e.description, e.date_rule))
        .collect();
    Ok(lines.join("\n"))
}

pub fn render_overdue(
    rows: &[InvoiceRow],
    min_days_late: u32,
    today: NaiveDate,
    format: OutputFormat,
) -> serde_json::Result<String> {
    let entries: Vec<OverdueEntry<'_>> = rows
        .iter()
        .map(|invoice| OverdueEntry {
            invoice,
            days_late: (today - invoice.due_date).num_days(),
        })
        .collect();

    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(&entries);
    }

    let mut out = format!(
        "{} invoice(s) overdue by at least {min_days_late} day(s)",
        entries.len()
    );
    for entry in &entries {
        let invoice = entry.invoice;
        let _ = write!(
            out,
            "\n  {}  {:>4}d  R$ {:>10}  {}  {}",
            invoice.due_date,
            entry.days_late,
            format!("{:.2}", invoice.unpaid.round_dp(2)),
            invoice.customer_name,
            invoice.phone.as_deref().unwrap_or("-")
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{
        application::handlers::PeriodRun,
        domain::models::{PeriodCode, RowOutcome},
    };

    fn summary() -> RunSummary {
        let stats = DispatchStats::from_outcomes(&[RowOutcome::Sent, RowOutcome::Skipped]);
        RunSummary {
            periods: vec![
                PeriodOutcome::Completed(PeriodRun {
                    period: PeriodCode::DueToday,
                    description: "Notice on the due date",
                    target_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                    stats,
                }),
                PeriodOutcome::Failed {
                    period: PeriodCode::Overdue(7),
                    error: "boom".to_string(),
                },
            ],
            totals: stats,
        }
    }

    #[test]
    fn text_summary_lists_periods_and_totals() {
        let text = render_summary(&summary(), OutputFormat::Text).unwrap();
        assert!(text.contains("D+0"));
        assert!(text.contains("2024-03-01"));
        assert!(text.contains("D+7   FAILED: boom"));
        assert!(text.ends_with("Totals: sent 1, errors 0, skipped 1, processed 2 (1 period(s) failed)"));
    }

    #[test]
    fn json_summary_tags_each_outcome() {
        let json = render_summary(&summary(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["periods"][0]["status"], "completed");
        assert_eq!(value["periods"][0]["period"], "D+0");
        assert_eq!(value["periods"][0]["target_date"], "2024-03-01");
        assert_eq!(value["periods"][1]["status"], "failed");
        assert_eq!(value["periods"][1]["error"], "boom");
        assert_eq!(value["totals"]["sent"], 1);
        assert_eq!(value["totals"]["total_processed"], 2);
    }

    #[test]
    fn periods_render_in_schedule_order() {
        let text = render_periods(&TemplateCatalog::new(), OutputFormat::Text).unwrap();
        let codes: Vec<&str> = text
            .lines()
            .filter_map(|l| l.split_whitespace().next())
            .collect();
        assert_eq!(codes, ["D-3", "D+0", "D+1", "D+7", "D+14", "D+21"]);

        let json = render_periods(&TemplateCatalog::new(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[3]["code"], "D+7");
        assert_eq!(value[3]["date_rule"], "7 day(s) overdue");
    }

    #[test]
    fn overdue_report_counts_days_late() {
        let row = InvoiceRow {
            id: "42".to_string(),
            customer_name: "Padaria Central".to_string(),
            phone: Some("11999998888".to_string()),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            total: dec!(250),
            payment_link: None,
            status: None,
            unpaid: dec!(199.5),
            paid: false,
        };
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let text = render_overdue(std::slice::from_ref(&row), 7, today, OutputFormat::Text).unwrap();
        assert!(text.starts_with("1 invoice(s) overdue by at least 7 day(s)"));
        assert!(text.contains("14d"));
        assert!(text.contains("199.50"));
        assert!(text.contains("Padaria Central"));

        let json = render_overdue(&[row], 7, today, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["id"], "42");
        assert_eq!(value[0]["days_late"], 14);
    }

    #[test]
    fn empty_overdue_report_is_a_single_line() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let text = render_overdue(&[], 3, today, OutputFormat::Text).unwrap();
        assert_eq!(text, "0 invoice(s) overdue by at least 3 day(s)");
    }
}
