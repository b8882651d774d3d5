use std::sync::Arc;

use crate::service::{AccessChange, RepoManager};
use crate::store::SqliteStore;
use crate::types::{Project, UserInfo};

use super::remote::confirm;

pub fn run_project_init(data_dir: &str) -> anyhow::Result<()> {
    let data_path: std::path::PathBuf = data_dir.into();
    std::fs::create_dir_all(&data_path)?;
    let store = SqliteStore::new(data_path.join("repoman.db"))?;
    store.initialize()?;
    println!("Initialized binding database in {data_dir}");
    Ok(())
}

pub fn run_project_add(store: &SqliteStore, project_id: String) -> anyhow::Result<()> {
    use crate::store::ProjectStore;

    store.create_project(&Project::new(project_id.clone()))?;
    println!("Registered project: {project_id}");
    Ok(())
}

pub fn run_user_add(
    store: &SqliteStore,
    user_id: String,
    username: String,
    capabilities: Vec<String>,
) -> anyhow::Result<()> {
    store.add_user(&UserInfo {
        user_id: user_id.clone(),
        username,
        capabilities: capabilities.into_iter().collect(),
    })?;
    println!("Registered user: {user_id}");
    Ok(())
}

pub fn run_provision(
    manager: &RepoManager,
    project_id: &str,
    creator: &str,
) -> anyhow::Result<()> {
    let repo_id = manager.create_repo(project_id, creator)?;
    println!("Repository for {project_id}: {repo_id}");
    Ok(())
}

pub fn run_project_grant(
    manager: &RepoManager,
    project_id: &str,
    repo_id: &str,
    user_id: String,
    password: Option<String>,
) -> anyhow::Result<()> {
    manager.modify_access(project_id, repo_id, AccessChange::Grant { user_id, password })?;
    println!("Granted access on {repo_id}");
    Ok(())
}

pub fn run_project_revoke(
    manager: &RepoManager,
    project_id: &str,
    repo_id: &str,
    user_id: String,
) -> anyhow::Result<()> {
    manager.modify_access(project_id, repo_id, AccessChange::Revoke { user_id })?;
    println!("Revoked access on {repo_id}");
    Ok(())
}

pub fn run_project_delete(
    manager: &RepoManager,
    project_id: &str,
    repo_id: &str,
    yes: bool,
) -> anyhow::Result<()> {
    if !yes && !confirm(&format!("Really delete repository {repo_id}?"))? {
        println!("Aborted.");
        return Ok(());
    }
    manager.delete_repo(project_id, repo_id)?;
    println!("Deleted repository {repo_id} and cleared the binding of {project_id}");
    Ok(())
}

/// Builds a manager whose project store and user directory both live in the
/// local sqlite database.
pub fn manager_for(client: crate::remote::HttpRemote, store: Arc<SqliteStore>) -> RepoManager {
    RepoManager::new(Arc::new(client), store.clone(), store)
}
