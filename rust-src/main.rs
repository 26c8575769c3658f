//! trafficd - traffic analytics REST service.
//!
//! Paginated listing and upsert-by-date of daily visit counts, gated by
//! bearer tokens and an editor allow-list, plus daily/weekly/monthly rollups.

mod aggregation;
mod api;
mod auth;
mod cli;
mod commands;
mod config;
mod models;
mod storage;


fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
