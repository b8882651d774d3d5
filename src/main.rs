use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use repoman::cli::{
    AuthCommands, Commands, ProjectCommands, manager_for, open_store, remote_client,
    run_auth_login, run_auth_logout, run_create, run_delete, run_grant, run_info,
    run_project_add, run_project_delete, run_project_grant, run_project_init,
    run_project_revoke, run_provision, run_revoke, run_user_add,
};

#[derive(Parser)]
#[command(name = "repoman")]
#[command(about = "Remote repository provisioning and access management", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("repoman=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Auth { command } => match command {
            AuthCommands::Login {
                api_url,
                username,
                password,
            } => run_auth_login(api_url, username, password)?,
            AuthCommands::Logout => run_auth_logout()?,
        },
        Commands::Info { repo_id } => {
            run_info(&remote_client()?, &repo_id)?;
        }
        Commands::Create {
            repo_id,
            project_id,
            creator,
        } => {
            run_create(&remote_client()?, repo_id, project_id, creator)?;
        }
        Commands::Delete { repo_id, yes } => {
            run_delete(&remote_client()?, &repo_id, yes)?;
        }
        Commands::Grant {
            repo_id,
            username,
            password,
        } => {
            run_grant(&remote_client()?, &repo_id, username, &password)?;
        }
        Commands::Revoke { repo_id, username } => {
            run_revoke(&remote_client()?, &repo_id, username)?;
        }
        Commands::Project { command } => match command {
            ProjectCommands::Init { data_dir } => run_project_init(&data_dir)?,
            ProjectCommands::Add {
                data_dir,
                project_id,
            } => run_project_add(&open_store(&data_dir)?, project_id)?,
            ProjectCommands::UserAdd {
                data_dir,
                user_id,
                username,
                capabilities,
            } => run_user_add(&open_store(&data_dir)?, user_id, username, capabilities)?,
            ProjectCommands::Provision {
                data_dir,
                project_id,
                creator,
            } => {
                let manager = manager_for(remote_client()?, Arc::new(open_store(&data_dir)?));
                run_provision(&manager, &project_id, &creator)?;
            }
            ProjectCommands::Grant {
                data_dir,
                project_id,
                repo_id,
                user_id,
                password,
            } => {
                let manager = manager_for(remote_client()?, Arc::new(open_store(&data_dir)?));
                run_project_grant(&manager, &project_id, &repo_id, user_id, password)?;
            }
            ProjectCommands::Revoke {
                data_dir,
                project_id,
                repo_id,
                user_id,
            } => {
                let manager = manager_for(remote_client()?, Arc::new(open_store(&data_dir)?));
                run_project_revoke(&manager, &project_id, &repo_id, user_id)?;
            }
            ProjectCommands::Delete {
                data_dir,
                project_id,
                repo_id,
                yes,
            } => {
                let manager = manager_for(remote_client()?, Arc::new(open_store(&data_dir)?));
                run_project_delete(&manager, &project_id, &repo_id, yes)?;
            }
        },
    }

    Ok(())
}
