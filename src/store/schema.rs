pub const SCHEMA: &str = r#"
-- Projects and their repository bindings. repo_id is NULL until a
-- repository has been provisioned for the project.
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    repo_id TEXT
);

-- Locally recorded access grants. Rows only exist while the project is
-- bound to a repository; clearing a binding removes them.
CREATE TABLE IF NOT EXISTS repo_access (
    project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL,
    username TEXT NOT NULL,
    password_set INTEGER NOT NULL DEFAULT 0,
    granted_at TEXT NOT NULL,
    PRIMARY KEY (project_id, user_id)
);

-- Minimal mirror of the external user directory, used by the CLI and by
-- tests. Capabilities are stored space-separated.
CREATE TABLE IF NOT EXISTS directory_users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    capabilities TEXT NOT NULL DEFAULT ''
);
"#;
