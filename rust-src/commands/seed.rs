//! Seed command - load the sample traffic series and default editors.

use std::path::Path;

use anyhow::Result;

use crate::storage::Database;


/// Daily visits for March and April 2025.
pub const SEED_TRAFFIC: &[(&str, i64)] = &[
    ("2025-03-01", 120), ("2025-03-02", 140), ("2025-03-03", 98), ("2025-03-04", 132),
    ("2025-03-05", 101), ("2025-03-06", 87), ("2025-03-07", 94), ("2025-03-08", 178),
    ("2025-03-09", 164), ("2025-03-10", 112), ("2025-03-11", 106), ("2025-03-12", 133),
    ("2025-03-13", 90), ("2025-03-14", 124), ("2025-03-15", 110), ("2025-03-16", 175),
    ("2025-03-17", 188), ("2025-03-18", 147), ("2025-03-19", 133), ("2025-03-20", 119),
    ("2025-03-21", 102), ("2025-03-22", 111), ("2025-03-23", 154), ("2025-03-24", 162),
    ("2025-03-25", 120), ("2025-03-26", 108), ("2025-03-27", 113), ("2025-03-28", 95),
    ("2025-03-29", 142), ("2025-03-30", 170), ("2025-03-31", 128), ("2025-04-01", 105),
    ("2025-04-02", 87), ("2025-04-03", 156), ("2025-04-04", 131), ("2025-04-05", 122),
    ("2025-04-06", 149), ("2025-04-07", 95), ("2025-04-08", 143), ("2025-04-09", 137),
    ("2025-04-10", 128), ("2025-04-11", 109), ("2025-04-12", 117), ("2025-04-13", 138),
    ("2025-04-14", 160), ("2025-04-15", 151), ("2025-04-16", 100), ("2025-04-17", 134),
    ("2025-04-18", 141), ("2025-04-19", 108), ("2025-04-20", 157), ("2025-04-21", 120),
    ("2025-04-22", 99), ("2025-04-23", 126), ("2025-04-24", 153), ("2025-04-25", 115),
    ("2025-04-26", 130), ("2025-04-27", 98), ("2025-04-28", 118), ("2025-04-29", 167),
    ("2025-04-30", 148),
];


/// Emails granted the editor role by seeding.
pub const SEED_EDITORS: &[&str] = &["admin@example.com", "example@mail.com"];


/// Run the seed command. Safe to repeat: records are upserted by date.
pub fn run(db_path: &Path) -> Result<()> {
    println!("Seeding traffic records and editors into {}...", db_path.display());

    let db = Database::open(db_path)?;
    let (records, editors_added) = db.seed(SEED_TRAFFIC, SEED_EDITORS)?;

    println!("Seeded {records} traffic records.");
    println!("Seeded {editors_added} new editors ({} configured).", SEED_EDITORS.len());

    Ok(())
}
