use chrono::Utc;

use super::RepoManager;
use crate::error::{Error, Result};
use crate::types::{AccessEntry, RepoBinding};

/// Capability a user must hold in the external directory before they can be
/// granted repository access.
pub const VCS_USE_CAP: &str = "vcs-use";

/// Never-valid bcrypt string sent for accounts whose password has not been
/// chosen yet. The remote authentication module stores it verbatim and can
/// never verify a login against it. Kept as a sentinel on the wire for
/// compatibility; locally the state is recorded as an explicit bool.
pub const UNSET_PASSWORD_HASH: &str = "$2y$04$no.password.chosen.yet/for.this.account";

/// One access mutation. A single call either grants one user or revokes one
/// user; the enum keeps "both" and "neither" unrepresentable.
#[derive(Debug, Clone)]
pub enum AccessChange {
    Grant {
        user_id: String,
        /// Plaintext password, hashed before it goes anywhere. `None` or
        /// empty creates the account with the unset-password sentinel.
        password: Option<String>,
    },
    Revoke {
        user_id: String,
    },
}

impl RepoManager {
    /// Applies one grant or revoke to the project's repository and brings
    /// the local access record in line with the outcome.
    ///
    /// `repo_id` must match the currently bound repository; a mismatch is
    /// refused before any remote call, the same fail-closed rule as
    /// [`RepoManager::delete_repo`].
    pub fn modify_access(
        &self,
        project_id: &str,
        repo_id: &str,
        change: AccessChange,
    ) -> Result<()> {
        let project = self.require_project(project_id)?;
        let users = match project.binding {
            RepoBinding::Bound {
                repo_id: bound,
                users,
            } if bound == repo_id => users,
            RepoBinding::Bound { repo_id: bound, .. } => {
                return Err(Error::Validation(format!(
                    "project {project_id} is bound to repository {bound:?}, not {repo_id:?}"
                )));
            }
            RepoBinding::Unbound => {
                return Err(Error::Validation(format!(
                    "project {project_id} has no repository"
                )));
            }
        };

        match change {
            AccessChange::Grant { user_id, password } => {
                self.grant(project_id, repo_id, &user_id, password.as_deref())
            }
            AccessChange::Revoke { user_id } => {
                let Some(entry) = users.get(&user_id) else {
                    // Revoking access that was never granted is harmless.
                    tracing::info!(
                        "user {user_id} has no recorded access to repository {repo_id:?}, \
                         nothing to revoke"
                    );
                    return Ok(());
                };
                self.revoke(project_id, repo_id, &user_id, &entry.username)
            }
        }
    }

    fn grant(
        &self,
        project_id: &str,
        repo_id: &str,
        user_id: &str,
        password: Option<&str>,
    ) -> Result<()> {
        let user = self
            .directory
            .lookup_user(user_id)?
            .ok_or_else(|| Error::Validation(format!("unknown user {user_id}")))?;
        if !user.capabilities.contains(VCS_USE_CAP) {
            return Err(Error::Policy(format!(
                "user {user_id} is not allowed to use the version control service"
            )));
        }

        let hash = match password {
            Some(p) if !p.is_empty() => bcrypt::hash(p, bcrypt::DEFAULT_COST)?,
            _ => UNSET_PASSWORD_HASH.to_string(),
        };
        let password_set = hash != UNSET_PASSWORD_HASH;

        self.remote
            .modify_access(repo_id, &[(user.username.clone(), hash)], &[])?;

        let entry = AccessEntry {
            username: user.username,
            password_set,
            granted_at: Utc::now(),
        };
        let matched = self
            .projects
            .upsert_access(project_id, repo_id, user_id, &entry)?;
        if matched != 1 {
            return Err(Error::StoreMismatch {
                project_id: project_id.to_string(),
                matched,
            });
        }

        tracing::info!("granted user {user_id} access to repository {repo_id:?}");
        Ok(())
    }

    fn revoke(
        &self,
        project_id: &str,
        repo_id: &str,
        user_id: &str,
        username: &str,
    ) -> Result<()> {
        let revoke = [username.to_string()];
        self.remote.modify_access(repo_id, &[], &revoke)?;

        let matched = self.projects.remove_access(project_id, user_id)?;
        if matched != 1 {
            return Err(Error::StoreMismatch {
                project_id: project_id.to_string(),
                matched,
            });
        }

        tracing::info!("revoked access of user {user_id} from repository {repo_id:?}");
        Ok(())
    }
}
