mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::{AccessEntry, Project, UserInfo};

/// Storage interface for project repository bindings.
///
/// The mutation methods return the number of records they matched; callers
/// verify it is exactly one before trusting the outcome. Implementations must
/// provide single-document atomic update semantics, which is what the
/// conditional `WHERE` clauses in the sqlite implementation rely on.
pub trait ProjectStore: Send + Sync {
    fn get_project(&self, project_id: &str) -> Result<Option<Project>>;

    fn create_project(&self, project: &Project) -> Result<()>;

    /// Binds a repository to a project that has none yet. Matches zero rows
    /// if the project is missing or already bound.
    fn bind_repo(&self, project_id: &str, repo_id: &str) -> Result<usize>;

    /// Clears the binding and all access entries, provided the project is
    /// still bound to `repo_id`. Matches zero rows otherwise.
    fn clear_binding(&self, project_id: &str, repo_id: &str) -> Result<usize>;

    /// Adds or replaces one access entry, provided the project is still
    /// bound to `repo_id`. Matches zero rows otherwise.
    fn upsert_access(
        &self,
        project_id: &str,
        repo_id: &str,
        user_id: &str,
        entry: &AccessEntry,
    ) -> Result<usize>;

    /// Removes one access entry, matching zero rows if none was recorded.
    fn remove_access(&self, project_id: &str, user_id: &str) -> Result<usize>;
}

/// Lookup interface to the external user directory.
pub trait UserDirectory: Send + Sync {
    fn lookup_user(&self, user_id: &str) -> Result<Option<UserInfo>>;
}
