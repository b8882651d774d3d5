use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// One locally recorded access grant. `password_set` is false while the
/// account still carries the unset-password sentinel on the remote side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEntry {
    pub username: String,
    pub password_set: bool,
    pub granted_at: DateTime<Utc>,
}

/// The link between a project and its repository. Users can only exist on a
/// bound repository, so the unbound variant carries none.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RepoBinding {
    #[default]
    Unbound,
    Bound {
        repo_id: String,
        /// Keyed by external user directory id.
        users: HashMap<String, AccessEntry>,
    },
}

impl RepoBinding {
    #[must_use]
    pub fn repo_id(&self) -> Option<&str> {
        match self {
            RepoBinding::Unbound => None,
            RepoBinding::Bound { repo_id, .. } => Some(repo_id),
        }
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        matches!(self, RepoBinding::Bound { .. })
    }
}

/// A project as seen through the project store. Only the binding is owned by
/// this crate; everything else about a project lives elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: String,
    pub binding: RepoBinding,
}

impl Project {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            binding: RepoBinding::Unbound,
        }
    }
}
