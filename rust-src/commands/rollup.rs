//! Rollup command - print visits per day, ISO week or month.

use std::path::Path;

use anyhow::{bail, Result};

use crate::aggregation::{rollup, summarize, Bucket, Granularity};
use crate::models::validate_date;
use crate::storage::Database;


const CYAN: &str = "\x1b[36m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const BAR_WIDTH: usize = 30;


/// Run the rollup command.
pub fn run(db_path: &Path, granularity: Granularity, from: Option<&str>, to: Option<&str>) -> Result<()> {
    for date in [from, to].into_iter().flatten() {
        validate_date(date)?;
    }
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            bail!("--from {from} is after --to {to}");
        }
    }

    if !db_path.exists() {
        println!("No database found at {}. Run 'trafficd seed' first.", db_path.display());
        return Ok(());
    }

    let db = Database::open(db_path)?;
    let records = db.traffic_in_range(from, to)?;

    if records.is_empty() {
        println!("No traffic records in range.");
        return Ok(());
    }

    let buckets = rollup(&records, granularity);
    let summary = summarize(&records);

    println!("\n{}", "=".repeat(60));
    println!("{:^60}", format!("Visits by {}", period_name(granularity)));
    println!("{}\n", "=".repeat(60));

    let max_visits = buckets.iter().map(|b| b.visits).max().unwrap_or(0);
    for bucket in &buckets {
        println!("{}", format_bucket_line(bucket, max_visits));
    }

    println!("\nSUMMARY");
    println!("{}", "-".repeat(40));
    println!("  Total Visits:        {:>15}", format_number(summary.total_visits));
    println!("  Days Tracked:        {:>15}", format_number(summary.days as i64));
    println!("  Average per Day:     {:>15.1}", summary.average);
    if let Some(peak) = &summary.peak {
        println!("  Peak Day:            {} ({})", peak.date, format_number(peak.visits));
    }

    Ok(())
}


fn period_name(granularity: Granularity) -> &'static str {
    match granularity {
        Granularity::Daily => "Day",
        Granularity::Weekly => "ISO Week",
        Granularity::Monthly => "Month",
    }
}


fn format_bucket_line(bucket: &Bucket, max_visits: i64) -> String {
    format!(
        "  {:10} {} {:>10}  {DIM}({} day{}){RESET}",
        bucket.key,
        create_bar(bucket.visits, max_visits, BAR_WIDTH),
        format_number(bucket.visits),
        bucket.days,
        if bucket.days == 1 { "" } else { "s" },
    )
}


/// Create a simple text bar for visualization.
fn create_bar(value: i64, max_value: i64, width: usize) -> String {
    if max_value <= 0 {
        return "░".repeat(width);
    }

    let filled = ((value as f64 / max_value as f64) * width as f64) as usize;
    let filled = filled.min(width);

    format!(
        "{CYAN}{}{RESET}{DIM}{}{RESET}",
        "█".repeat(filled),
        "░".repeat(width - filled),
    )
}


/// Format a number with commas.
fn format_number(n: i64) -> String {
    let s = n.unsigned_abs().to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    if n < 0 {
        format!("-{result}")
    } else {
        result
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(7_742), "7,742");
        assert_eq!(format_number(1_234_567), "1,234,567");
        assert_eq!(format_number(-1_000), "-1,000");
    }

    #[test]
    fn test_create_bar_widths() {
        let full = create_bar(10, 10, 4);
        assert_eq!(full.matches('█').count(), 4);
        assert_eq!(full.matches('░').count(), 0);

        let half = create_bar(5, 10, 4);
        assert_eq!(half.matches('█').count(), 2);
        assert_eq!(half.matches('░').count(), 2);

        assert_eq!(create_bar(3, 0, 4), "░░░░");
    }

    #[test]
    fn test_rejects_bad_range() {
        let path = Path::new("/nonexistent/traffic.db");
        assert!(run(path, Granularity::Daily, Some("2025-3-1"), None).is_err());
        assert!(run(path, Granularity::Daily, None, Some("2025-02-30")).is_err());
        assert!(run(path, Granularity::Daily, None, Some("03/31/2025")).is_err());
        assert!(run(path, Granularity::Daily, Some("2025-04-01"), Some("2025-03-01")).is_err());
        assert!(run(path, Granularity::Daily, Some("2025-03-01"), Some("2025-03-31")).is_ok());
    }

    #[test]
    fn test_report_handles_huge_counts() {
        let tmp_dir = tempfile::TempDir::new().unwrap();
        let db_path = tmp_dir.path().join("traffic.db");
        let db = Database::open(&db_path).unwrap();
        db.upsert_traffic("2025-03-01", 5_000_000_000_000_000_000).unwrap();
        db.upsert_traffic("2025-03-02", 5_000_000_000_000_000_000).unwrap();
        drop(db);

        assert!(run(&db_path, Granularity::Monthly, None, None).is_ok());
        assert_eq!(format_number(i64::MAX), "9,223,372,036,854,775,807");
    }
}
