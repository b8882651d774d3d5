use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Repository state as reported by the remote service. The order of `access`
/// is server-defined and not guaranteed stable across fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoDescriptor {
    pub repo_id: String,
    pub access: Vec<String>,
}

/// A repository creation request. `repo_id` is a proposal; the server may
/// reject it with a conflict or accept a different value. Callers must use
/// the id from the response, never the one they proposed.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRepo {
    pub repo_id: String,
    pub project_id: String,
    pub creator: String,
}

/// A user as reported by the external user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub user_id: String,
    pub username: String,
    pub capabilities: HashSet<String>,
}
