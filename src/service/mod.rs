mod access;
mod provision;

pub use access::{AccessChange, UNSET_PASSWORD_HASH, VCS_USE_CAP};
pub use provision::MAX_ID_ATTEMPTS;

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::remote::RemoteRepos;
use crate::store::{ProjectStore, UserDirectory};
use crate::types::Project;

/// Service object tying the remote client to the local collaborators.
///
/// Construct one per application and hand it to callers explicitly; there is
/// no process-wide instance. All state lives in the collaborators, so a
/// single manager is safe to share between threads. Callers that mutate the
/// same project concurrently must serialize those mutations themselves; the
/// manager re-reads the binding before every mutation but relies on the
/// store's atomic conditional updates for the final word.
pub struct RepoManager {
    remote: Arc<dyn RemoteRepos>,
    projects: Arc<dyn ProjectStore>,
    directory: Arc<dyn UserDirectory>,
}

impl RepoManager {
    pub fn new(
        remote: Arc<dyn RemoteRepos>,
        projects: Arc<dyn ProjectStore>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            remote,
            projects,
            directory,
        }
    }

    /// Whether the project has a provisioned repository.
    pub fn is_managed_project(&self, project_id: &str) -> Result<bool> {
        let project = self.require_project(project_id)?;
        Ok(project.binding.is_bound())
    }

    fn require_project(&self, project_id: &str) -> Result<Project> {
        self.projects
            .get_project(project_id)?
            .ok_or_else(|| Error::Validation(format!("unknown project {project_id}")))
    }
}
