mod auth;
mod commands;
pub mod credentials;
mod project;
mod remote;

pub use auth::{run_auth_login, run_auth_logout};
pub use commands::{AuthCommands, Commands, ProjectCommands};
pub use project::{
    manager_for, run_project_add, run_project_delete, run_project_grant, run_project_init,
    run_project_revoke, run_provision, run_user_add,
};
pub use remote::{run_create, run_delete, run_grant, run_info, run_revoke};

use crate::remote::HttpRemote;
use crate::store::SqliteStore;

/// Builds a remote client from the stored credentials.
pub fn remote_client() -> anyhow::Result<HttpRemote> {
    let config = credentials::load_credentials()?;
    HttpRemote::new(config).map_err(Into::into)
}

/// Opens the binding database, checking it exists.
pub fn open_store(data_dir: &str) -> anyhow::Result<SqliteStore> {
    let data_path: std::path::PathBuf = data_dir.into();
    let db_path = data_path.join("repoman.db");

    if !db_path.exists() {
        anyhow::bail!(
            "Database not found at {}. Run 'repoman project init' first.",
            db_path.display()
        );
    }

    SqliteStore::new(&db_path).map_err(Into::into)
}
