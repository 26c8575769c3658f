//! Editors subcommands.

use std::path::Path;

use anyhow::Result;

use crate::auth::normalize_email;
use crate::storage::Database;


/// Grant write access to `email`.
pub fn add(db_path: &Path, email: &str) -> Result<()> {
    let db = Database::open(db_path)?;

    if db.add_editor(email, "cli")? {
        println!("\x1b[32m+ Added editor {}\x1b[0m", normalize_email(email));
    } else {
        println!("\x1b[33m{} is already an editor\x1b[0m", normalize_email(email));
    }

    Ok(())
}


/// Revoke write access from `email`.
pub fn remove(db_path: &Path, email: &str) -> Result<()> {
    let db = Database::open(db_path)?;

    if db.remove_editor(email)? {
        println!("\x1b[32m- Removed editor {}\x1b[0m", normalize_email(email));
    } else {
        println!("\x1b[33m{} is not an editor\x1b[0m", normalize_email(email));
    }

    Ok(())
}


/// Print every editor.
pub fn list(db_path: &Path) -> Result<()> {
    let db = Database::open(db_path)?;
    let editors = db.list_editors()?;

    if editors.is_empty() {
        println!("No editors. Add one with 'trafficd editors add <EMAIL>'.");
        return Ok(());
    }

    println!("{:40} {:8} {}", "EMAIL", "SOURCE", "ADDED");
    for editor in editors {
        println!("{:40} {:8} {}", editor.email, editor.source, editor.added_at);
    }

    Ok(())
}
