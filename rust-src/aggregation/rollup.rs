//! Daily, ISO-weekly and monthly visit rollups.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::TrafficRecord;


/// Bucket width for a rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}


impl Granularity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Some(Self::Daily),
            "weekly" | "week" => Some(Self::Weekly),
            "monthly" | "month" => Some(Self::Monthly),
            _ => None,
        }
    }
}


/// Visits summed over one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub key: String,
    /// First contributing date.
    pub start: String,
    /// Last contributing date.
    pub end: String,
    pub visits: i64,
    pub days: usize,
}


/// Headline numbers over a set of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_visits: i64,
    pub days: usize,
    pub average: f64,
    pub peak: Option<PeakDay>,
}


/// Busiest day in a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeakDay {
    pub date: String,
    pub visits: i64,
}


/// ISO-8601 week-numbering year and week of `date`.
///
/// Weeks start on Monday and week 1 holds the year's first Thursday, so the
/// ISO year can differ from the calendar year around New Year.
pub fn iso_week(date: NaiveDate) -> (i32, u32) {
    let week = date.iso_week();
    (week.year(), week.week())
}


/// Sortable bucket key: `YYYY-MM-DD`, `YYYY-Www` or `YYYY-MM`.
pub fn bucket_key(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Daily => date.format("%Y-%m-%d").to_string(),
        Granularity::Weekly => {
            let (year, week) = iso_week(date);
            format!("{year:04}-W{week:02}")
        }
        Granularity::Monthly => format!("{:04}-{:02}", date.year(), date.month()),
    }
}


/// Sum visits per bucket, oldest bucket first.
///
/// Records whose date cannot be parsed are skipped.
pub fn rollup(records: &[TrafficRecord], granularity: Granularity) -> Vec<Bucket> {
    let mut grouped: BTreeMap<String, Vec<(NaiveDate, i64)>> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.naive_date() {
            grouped
                .entry(bucket_key(date, granularity))
                .or_default()
                .push((date, record.visits));
        }
    }

    grouped
        .into_iter()
        .filter_map(|(key, days)| {
            let start = days.iter().map(|(d, _)| *d).min()?;
            let end = days.iter().map(|(d, _)| *d).max()?;
            Some(Bucket {
                key,
                start: start.format("%Y-%m-%d").to_string(),
                end: end.format("%Y-%m-%d").to_string(),
                visits: saturating_total(days.iter().map(|(_, v)| *v)),
                days: days.len(),
            })
        })
        .collect()
}


/// Sum of visit counts, pinned at `i64::MAX` instead of wrapping.
fn saturating_total(visits: impl Iterator<Item = i64>) -> i64 {
    visits.fold(0i64, |total, v| total.saturating_add(v))
}


/// Totals, average per day and the busiest day.
pub fn summarize(records: &[TrafficRecord]) -> Summary {
    let total_visits = saturating_total(records.iter().map(|r| r.visits));
    let days = records.len();
    let average = if days > 0 {
        total_visits as f64 / days as f64
    } else {
        0.0
    };

    // Earliest date wins ties
    let peak = records
        .iter()
        .max_by(|a, b| a.visits.cmp(&b.visits).then_with(|| b.date.cmp(&a.date)))
        .map(|r| PeakDay {
            date: r.date.clone(),
            visits: r.visits,
        });

    Summary {
        total_visits,
        days,
        average,
        peak,
    }
}
