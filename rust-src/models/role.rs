//! Permission roles and the editor allow-list entry.

use serde::{Deserialize, Serialize};


/// Access level of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Editor,
    Viewer,
}


impl Role {
    pub fn can_write(self) -> bool {
        matches!(self, Role::Editor)
    }
}


/// A user allowed to write traffic records, keyed by normalized email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Editor {
    pub email: String,
    pub added_at: String,
    pub source: String,
}
