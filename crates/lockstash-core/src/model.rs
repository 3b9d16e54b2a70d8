//! The in-memory vault: named groups of login records

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single login entry.
///
/// Records are plain values: equality is field-wise and the engine never
/// interprets the contents. `updated_at` is set by the caller whenever the
/// record changes; the engine only carries it through.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginInfo {
    pub name: String,
    pub url: String,
    pub username: String,
    pub password: String,
    pub description: String,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for LoginInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginInfo")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("description", &self.description)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// The whole vault: group name → ordered records.
///
/// Record order within a group is preserved by every save/load round-trip.
/// Group iteration order is not part of the contract.
pub type State = BTreeMap<String, Vec<LoginInfo>>;
