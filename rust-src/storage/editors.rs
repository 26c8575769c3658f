//! Editor allow-list. Membership grants write access.

use anyhow::{bail, Result};
use rusqlite::params;

use super::database::{now_timestamp, Database};
use crate::auth::normalize_email;
use crate::models::Editor;


impl Database {
    /// Whether `email` (normalized) is on the editor list.
    pub fn is_editor(&self, email: &str) -> Result<bool> {
        let conn = self.conn()?;
        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM editors WHERE email = ?1)",
            params![normalize_email(email)],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    /// Add an editor. Returns `false` if the email was already present.
    pub fn add_editor(&self, email: &str, source: &str) -> Result<bool> {
        let email = normalize_email(email);
        if email.is_empty() {
            bail!("editor email cannot be empty");
        }

        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO editors (email, added_at, source) VALUES (?1, ?2, ?3)",
            params![email, now_timestamp(), source],
        )?;
        Ok(inserted > 0)
    }

    /// Remove an editor. Returns `false` if the email was not present.
    pub fn remove_editor(&self, email: &str) -> Result<bool> {
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM editors WHERE email = ?1",
            params![normalize_email(email)],
        )?;
        Ok(removed > 0)
    }

    pub fn list_editors(&self) -> Result<Vec<Editor>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT email, added_at, source FROM editors ORDER BY email")?;
        let editors = stmt
            .query_map([], |row| {
                Ok(Editor {
                    email: row.get(0)?,
                    added_at: row.get(1)?,
                    source: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(editors)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_uses_normalized_email() {
        let db = Database::open_in_memory().unwrap();

        assert!(db.add_editor("  Alice@Example.COM ", "cli").unwrap());
        assert!(db.is_editor("alice@example.com").unwrap());
        assert!(db.is_editor("ALICE@example.com").unwrap());
        assert!(!db.is_editor("bob@example.com").unwrap());
    }

    #[test]
    fn test_add_twice_and_remove() {
        let db = Database::open_in_memory().unwrap();

        assert!(db.add_editor("alice@example.com", "cli").unwrap());
        assert!(!db.add_editor("ALICE@example.com", "cli").unwrap());
        assert_eq!(db.list_editors().unwrap().len(), 1);

        assert!(db.remove_editor("Alice@Example.com").unwrap());
        assert!(!db.remove_editor("alice@example.com").unwrap());
        assert!(db.list_editors().unwrap().is_empty());
    }

    #[test]
    fn test_empty_email_rejected() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.add_editor("   ", "cli").is_err());
    }
}
