use super::credentials::{credentials_path, save_credentials};
use crate::config::RemoteConfig;

pub fn run_auth_login(api_url: String, username: String, password: String) -> anyhow::Result<()> {
    let config = RemoteConfig {
        api_url,
        username,
        password,
    };
    save_credentials(&config)?;
    println!("Stored credentials for {}", config.api_url);
    Ok(())
}

pub fn run_auth_logout() -> anyhow::Result<()> {
    let path = credentials_path()?;
    if path.exists() {
        std::fs::remove_file(&path)?;
        println!("Removed stored credentials");
    } else {
        println!("No stored credentials");
    }
    Ok(())
}
