//! Traffic record queries: paginated listing, upsert-by-date and edits.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql, TransactionBehavior};

use super::database::{now_timestamp, Database};
use crate::auth::normalize_email;
use crate::models::{TrafficRecord, UpsertOutcome};


/// Direction of the date ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}


/// One page request. `cursor` is the last date of the previous page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub limit: u32,
    pub cursor: Option<String>,
    pub order: SortOrder,
}


/// One page of results.
#[derive(Debug, Clone)]
pub struct Page {
    pub items: Vec<TrafficRecord>,
    /// Date to pass as the next cursor, `None` once the listing is exhausted.
    pub next_cursor: Option<String>,
}


const SELECT_COLUMNS: &str = "SELECT date, visits, created_at, updated_at FROM traffic_stats";


fn row_to_record(row: &Row<'_>) -> rusqlite::Result<TrafficRecord> {
    Ok(TrafficRecord {
        date: row.get(0)?,
        visits: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}


/// Insert `date` or overwrite its visits, keeping the original `created_at`.
fn upsert_in(conn: &Connection, date: &str, visits: i64, now: &str) -> Result<UpsertOutcome> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM traffic_stats WHERE date = ?1)",
        params![date],
        |row| row.get(0),
    )?;

    if exists {
        conn.execute(
            "UPDATE traffic_stats SET visits = ?2, updated_at = ?3 WHERE date = ?1",
            params![date, visits, now],
        )?;
        Ok(UpsertOutcome::Updated)
    } else {
        conn.execute(
            "INSERT INTO traffic_stats (date, visits, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)",
            params![date, visits, now],
        )?;
        Ok(UpsertOutcome::Created)
    }
}


impl Database {
    /// List records ordered by date, starting strictly after the cursor.
    ///
    /// One extra row is fetched to decide whether another page exists.
    pub fn list_traffic(&self, query: &PageQuery) -> Result<Page> {
        let limit = query.limit.max(1) as usize;

        let mut sql = SELECT_COLUMNS.to_string();
        let mut params_vec: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(cursor) = &query.cursor {
            sql.push_str(match query.order {
                SortOrder::Asc => " WHERE date > ?",
                SortOrder::Desc => " WHERE date < ?",
            });
            params_vec.push(Box::new(cursor.clone()));
        }
        sql.push_str(match query.order {
            SortOrder::Asc => " ORDER BY date ASC",
            SortOrder::Desc => " ORDER BY date DESC",
        });
        sql.push_str(" LIMIT ?");
        params_vec.push(Box::new(limit as i64 + 1));

        let conn = self.conn()?;
        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let mut items = stmt
            .query_map(params_refs.as_slice(), row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let next_cursor = if items.len() > limit {
            items.truncate(limit);
            items.last().map(|r| r.date.clone())
        } else {
            None
        };

        Ok(Page { items, next_cursor })
    }

    /// Fetch a single record by date.
    pub fn get_traffic(&self, date: &str) -> Result<Option<TrafficRecord>> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE date = ?1"),
                params![date],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// All records within an inclusive date range, oldest first.
    pub fn traffic_in_range(&self, from: Option<&str>, to: Option<&str>) -> Result<Vec<TrafficRecord>> {
        let mut sql = format!("{SELECT_COLUMNS} WHERE 1=1");
        let mut params_vec: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(start) = from {
            sql.push_str(" AND date >= ?");
            params_vec.push(Box::new(start.to_string()));
        }
        if let Some(end) = to {
            sql.push_str(" AND date <= ?");
            params_vec.push(Box::new(end.to_string()));
        }
        sql.push_str(" ORDER BY date");

        let conn = self.conn()?;
        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params_refs.as_slice(), row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    /// Create or update the record for `date` in a single transaction.
    pub fn upsert_traffic(&self, date: &str, visits: i64) -> Result<UpsertOutcome> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let outcome = upsert_in(&tx, date, visits, &now_timestamp())?;
        tx.commit()?;
        Ok(outcome)
    }

    /// Overwrite the visits of an existing record.
    ///
    /// Returns `false` when no record exists for `date`.
    pub fn update_visits(&self, date: &str, visits: i64) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE traffic_stats SET visits = ?2, updated_at = ?3 WHERE date = ?1",
            params![date, visits, now_timestamp()],
        )?;
        Ok(changed > 0)
    }

    /// Delete the record for `date`. Returns `false` when it did not exist.
    pub fn delete_traffic(&self, date: &str) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM traffic_stats WHERE date = ?1", params![date])?;
        Ok(changed > 0)
    }

    /// Load a batch of records and editors atomically.
    ///
    /// Records are upserted and editors inserted if missing, so seeding twice
    /// is harmless. Returns `(records_written, editors_added)`.
    pub fn seed(&self, records: &[(&str, i64)], editors: &[&str]) -> Result<(usize, usize)> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let now = now_timestamp();

        for (date, visits) in records {
            upsert_in(&tx, date, *visits, &now)?;
        }

        let mut editors_added = 0;
        for email in editors {
            editors_added += tx.execute(
                "INSERT OR IGNORE INTO editors (email, added_at, source) VALUES (?1, ?2, 'seed')",
                params![normalize_email(email), now],
            )?;
        }

        tx.commit()?;
        Ok((records.len(), editors_added))
    }
}
