use rand::Rng;
use rand::distributions::Alphanumeric;

use super::RepoManager;
use crate::error::{Error, Result};
use crate::types::{CreateRepo, RepoBinding};

/// How many candidate identifiers are tried before provisioning gives up.
pub const MAX_ID_ATTEMPTS: usize = 100;

/// Generates a candidate repository identifier: a two-letter lowercase
/// prefix followed by 22 alphanumeric characters. The prefix bounds the set
/// of values any prefix-based sharding on the remote side can observe; it
/// carries no meaning and must not be parsed.
fn generate_repo_id(rng: &mut impl Rng) -> String {
    let mut id = String::with_capacity(24);
    for _ in 0..2 {
        id.push(rng.gen_range(b'a'..=b'z') as char);
    }
    for _ in 0..22 {
        id.push(rng.sample(Alphanumeric) as char);
    }
    id
}

/// Runs `op` until it returns anything other than `AlreadyExists`, up to
/// `attempts` times. Exhausting the budget is an error of its own.
fn retry_conflicts<T>(attempts: usize, mut op: impl FnMut() -> Result<T>) -> Result<T> {
    for _ in 0..attempts {
        match op() {
            Err(Error::AlreadyExists(repo_id)) => {
                tracing::info!("repo_id={repo_id:?} already exists, trying random other one");
            }
            other => return other,
        }
    }
    Err(Error::IdSpaceExhausted(attempts))
}

impl RepoManager {
    /// Provisions a repository for the project and stores the id the server
    /// assigned. A no-op returning the existing id if the project already
    /// has one; no remote call is made in that case.
    pub fn create_repo(&self, project_id: &str, creator: &str) -> Result<String> {
        let project = self.require_project(project_id)?;
        if let RepoBinding::Bound { repo_id, .. } = &project.binding {
            tracing::warn!("project {project_id} already has repository {repo_id:?}");
            return Ok(repo_id.clone());
        }

        let mut rng = rand::thread_rng();
        let result = retry_conflicts(MAX_ID_ATTEMPTS, || {
            let info = CreateRepo {
                repo_id: generate_repo_id(&mut rng),
                project_id: project_id.to_string(),
                creator: creator.to_string(),
            };
            tracing::info!("creating new repository, trying out {:?}", info.repo_id);
            self.remote.create_repo(&info)
        });

        // The server may have accepted a different id than the proposal;
        // whatever came back is authoritative.
        let repo_id = match result {
            Ok(repo_id) => repo_id,
            Err(e @ Error::IdSpaceExhausted(_)) => {
                tracing::error!("unable to find unique random repository ID, giving up");
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let matched = self.projects.bind_repo(project_id, &repo_id)?;
        if matched != 1 {
            return Err(Error::StoreMismatch {
                project_id: project_id.to_string(),
                matched,
            });
        }

        tracing::info!("created new repository {repo_id:?} for project {project_id}");
        Ok(repo_id)
    }

    /// Deletes the project's repository. `repo_id` must match the currently
    /// bound id exactly; on a mismatch the operation is refused before any
    /// remote call, so a stale caller can never delete the wrong repository.
    pub fn delete_repo(&self, project_id: &str, repo_id: &str) -> Result<()> {
        let project = self.require_project(project_id)?;
        match &project.binding {
            RepoBinding::Bound { repo_id: bound, .. } if bound == repo_id => {}
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
        }

        self.remote.delete_repo(repo_id)?;

        let matched = self.projects.clear_binding(project_id, repo_id)?;
        if matched != 1 {
            return Err(Error::StoreMismatch {
                project_id: project_id.to_string(),
                matched,
            });
        }

        tracing::info!("deleted repository {repo_id:?} of project {project_id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::testing::MockRemote;
    use super::*;
    use crate::store::{ProjectStore, SqliteStore};
    use crate::types::Project;

    fn store_with_project() -> Arc<SqliteStore> {
        let store = SqliteStore::in_memory().unwrap();
        store.initialize().unwrap();
        store.create_project(&Project::new("proj-1")).unwrap();
        Arc::new(store)
    }

    fn manager(remote: Arc<MockRemote>, store: Arc<SqliteStore>) -> RepoManager {
        RepoManager::new(remote, store.clone(), store)
    }

    #[test]
    fn test_generated_id_shape() {
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let id = generate_repo_id(&mut rng);
            assert_eq!(id.len(), 24);
            let bytes = id.as_bytes();
            assert!(bytes[..2].iter().all(u8::is_ascii_lowercase));
            assert!(bytes[2..].iter().all(u8::is_ascii_alphanumeric));
        }
    }

    #[test]
    fn test_create_repo_is_idempotent() {
        let store = store_with_project();
        store.bind_repo("proj-1", "existing-id").unwrap();
        let remote = Arc::new(MockRemote::accepting(None));
        let manager = manager(remote.clone(), store);

        let repo_id = manager.create_repo("proj-1", "me <me@here>").unwrap();
        assert_eq!(repo_id, "existing-id");
        assert_eq!(remote.create_call_count(), 0);
    }

    #[test]
    fn test_create_repo_stores_server_assigned_id() {
        let store = store_with_project();
        let remote = Arc::new(MockRemote::accepting(Some("something-completely-different")));
        let manager = manager(remote.clone(), store.clone());

        let repo_id = manager.create_repo("proj-1", "me <me@here>").unwrap();
        assert_eq!(repo_id, "something-completely-different");
        assert_eq!(remote.create_call_count(), 1);

        let project = store.get_project("proj-1").unwrap().unwrap();
        assert_eq!(
            project.binding.repo_id(),
            Some("something-completely-different")
        );
    }

    #[test]
    fn test_create_repo_retries_conflicts() {
        let store = store_with_project();
        let remote = Arc::new(MockRemote::conflicting(5, Some("accepted-id")));
        let manager = manager(remote.clone(), store.clone());

        let repo_id = manager.create_repo("proj-1", "me <me@here>").unwrap();
        assert_eq!(repo_id, "accepted-id");
        assert_eq!(remote.create_call_count(), 6);

        // Every attempt proposed a fresh candidate.
        let calls = remote.create_calls.lock().unwrap();
        let mut proposed: Vec<&str> = calls.iter().map(|c| c.repo_id.as_str()).collect();
        proposed.sort_unstable();
        proposed.dedup();
        assert_eq!(proposed.len(), 6);
    }

    #[test]
    fn test_create_repo_gives_up_after_budget() {
        let store = store_with_project();
        let remote = Arc::new(MockRemote::conflicting(usize::MAX, None));
        let manager = manager(remote.clone(), store.clone());

        let err = manager.create_repo("proj-1", "me <me@here>").unwrap_err();
        assert!(matches!(err, Error::IdSpaceExhausted(MAX_ID_ATTEMPTS)));
        assert_eq!(remote.create_call_count(), MAX_ID_ATTEMPTS);

        // The binding was never touched.
        let project = store.get_project("proj-1").unwrap().unwrap();
        assert!(!project.binding.is_bound());
    }

    #[test]
    fn test_delete_repo_refuses_mismatched_id() {
        let store = store_with_project();
        store.bind_repo("proj-1", "right-id").unwrap();
        let remote = Arc::new(MockRemote::accepting(None));
        let manager = manager(remote.clone(), store.clone());

        let err = manager.delete_repo("proj-1", "wrong-id").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(remote.delete_calls.lock().unwrap().is_empty());

        let project = store.get_project("proj-1").unwrap().unwrap();
        assert_eq!(project.binding.repo_id(), Some("right-id"));
    }

    #[test]
    fn test_delete_repo_refuses_unbound_project() {
        let store = store_with_project();
        let remote = Arc::new(MockRemote::accepting(None));
        let manager = manager(remote.clone(), store);

        let err = manager.delete_repo("proj-1", "any-id").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(remote.delete_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_delete_repo_clears_binding() {
        let store = store_with_project();
        store.bind_repo("proj-1", "right-id").unwrap();
        let remote = Arc::new(MockRemote::accepting(None));
        let manager = manager(remote.clone(), store.clone());

        manager.delete_repo("proj-1", "right-id").unwrap();
        assert_eq!(remote.delete_calls.lock().unwrap().as_slice(), ["right-id"]);

        let project = store.get_project("proj-1").unwrap().unwrap();
        assert!(!project.binding.is_bound());
    }
}
