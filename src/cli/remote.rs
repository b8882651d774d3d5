use std::io::{self, Write};

use crate::remote::{HttpRemote, RemoteRepos};
use crate::types::CreateRepo;

pub fn run_info(client: &HttpRemote, repo_id: &str) -> anyhow::Result<()> {
    let info = client.fetch_repo(repo_id)?;
    let mut access = info.access;
    access.sort_unstable();

    println!("Repo ID: {}", info.repo_id);
    if access.is_empty() {
        println!("Access : (nobody)");
    } else {
        println!("Access : {}", access.join(", "));
    }
    Ok(())
}

pub fn run_create(
    client: &HttpRemote,
    repo_id: String,
    project_id: String,
    creator: String,
) -> anyhow::Result<()> {
    let info = CreateRepo {
        repo_id,
        project_id,
        creator,
    };
    let assigned = client.create_repo(&info)?;
    println!("Created repository: {assigned}");
    Ok(())
}

pub fn run_delete(client: &HttpRemote, repo_id: &str, yes: bool) -> anyhow::Result<()> {
    if !yes && !confirm(&format!("Really delete repository {repo_id}?"))? {
        println!("Aborted.");
        return Ok(());
    }
    client.delete_repo(repo_id)?;
    println!("Deleted repository: {repo_id}");
    Ok(())
}

pub fn run_grant(
    client: &HttpRemote,
    repo_id: &str,
    username: String,
    password: &str,
) -> anyhow::Result<()> {
    let hashed = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
    client.modify_access(repo_id, &[(username.clone(), hashed)], &[])?;
    println!("Granted {username} access to {repo_id}");
    Ok(())
}

pub fn run_revoke(client: &HttpRemote, repo_id: &str, username: String) -> anyhow::Result<()> {
    client.modify_access(repo_id, &[], &[username.clone()])?;
    println!("Revoked access of {username} from {repo_id}");
    Ok(())
}

/// Asks a y/N question on stdin. Deletion is irreversible, so the default
/// answer is no.
pub(super) fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} This cannot be undone [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
