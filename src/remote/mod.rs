mod http;

pub use http::HttpRemote;

use crate::error::Result;
use crate::types::{CreateRepo, RepoDescriptor};

/// Client interface to the remote repository-management API.
///
/// Implementations translate every non-2xx response into a taxonomy error
/// from [`crate::error::Error`]; absence of an error means the operation was
/// accepted by the remote.
pub trait RemoteRepos: Send + Sync {
    /// Fetches repository information from the remote.
    fn fetch_repo(&self, repo_id: &str) -> Result<RepoDescriptor>;

    /// Proposes a new repository. Returns the id the server actually
    /// assigned, which may differ from `info.repo_id`.
    fn create_repo(&self, info: &CreateRepo) -> Result<String>;

    /// Deletes a repository. This cannot be undone via the API.
    fn delete_repo(&self, repo_id: &str) -> Result<()>;

    /// Grants and revokes access in a single call. Grant entries carry
    /// bcrypt password hashes; revoke entries carry bare usernames.
    fn modify_access(
        &self,
        repo_id: &str,
        grant: &[(String, String)],
        revoke: &[String],
    ) -> Result<()>;
}
