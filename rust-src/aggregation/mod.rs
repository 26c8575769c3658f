//! Aggregation layer for chart rollups.

mod rollup;

#[allow(unused_imports)]
pub use rollup::{bucket_key, iso_week, rollup, summarize, Bucket, Granularity, PeakDay, Summary};
