use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use super::schema::SCHEMA;
use super::{ProjectStore, UserDirectory};
use crate::error::Result;
use crate::types::{AccessEntry, Project, RepoBinding, UserInfo};

/// Sqlite-backed reference implementation of both collaborator seams.
///
/// The real deployment may keep projects in any document store with atomic
/// single-document updates; this implementation exists for the CLI and for
/// tests, and shows the conditional-update contract the service relies on.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Seeds a directory user. The directory is external in production; the
    /// CLI and tests populate this mirror instead.
    pub fn add_user(&self, user: &UserInfo) -> Result<()> {
        let mut caps: Vec<&str> = user.capabilities.iter().map(String::as_str).collect();
        caps.sort_unstable();
        self.conn().execute(
            "INSERT INTO directory_users (id, username, capabilities) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET username = excluded.username,
                                           capabilities = excluded.capabilities",
            params![user.user_id, user.username, caps.join(" ")],
        )?;
        Ok(())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

impl ProjectStore for SqliteStore {
    fn get_project(&self, project_id: &str) -> Result<Option<Project>> {
        let conn = self.conn();
        let row: Option<(String, Option<String>)> = conn
            .query_row(
                "SELECT id, repo_id FROM projects WHERE id = ?1",
                params![project_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((id, repo_id)) = row else {
            return Ok(None);
        };
        let Some(repo_id) = repo_id else {
            return Ok(Some(Project {
                id,
                binding: RepoBinding::Unbound,
            }));
        };

        let mut stmt = conn.prepare(
            "SELECT user_id, username, password_set, granted_at
             FROM repo_access WHERE project_id = ?1",
        )?;
        let rows = stmt.query_map(params![id], |row| {
            let user_id: String = row.get(0)?;
            let username: String = row.get(1)?;
            let password_set: bool = row.get(2)?;
            let granted_at: String = row.get(3)?;
            Ok((user_id, username, password_set, granted_at))
        })?;

        let mut users = HashMap::new();
        for row in rows {
            let (user_id, username, password_set, granted_at) = row?;
            users.insert(
                user_id,
                AccessEntry {
                    username,
                    password_set,
                    granted_at: parse_datetime(&granted_at),
                },
            );
        }

        Ok(Some(Project {
            id,
            binding: RepoBinding::Bound { repo_id, users },
        }))
    }

    fn create_project(&self, project: &Project) -> Result<()> {
        self.conn().execute(
            "INSERT INTO projects (id, repo_id) VALUES (?1, ?2)",
            params![project.id, project.binding.repo_id()],
        )?;
        Ok(())
    }

    fn bind_repo(&self, project_id: &str, repo_id: &str) -> Result<usize> {
        let matched = self.conn().execute(
            "UPDATE projects SET repo_id = ?2 WHERE id = ?1 AND repo_id IS NULL",
            params![project_id, repo_id],
        )?;
        Ok(matched)
    }

    fn clear_binding(&self, project_id: &str, repo_id: &str) -> Result<usize> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let matched = tx.execute(
            "UPDATE projects SET repo_id = NULL WHERE id = ?1 AND repo_id = ?2",
            params![project_id, repo_id],
        )?;
        if matched == 1 {
            tx.execute(
                "DELETE FROM repo_access WHERE project_id = ?1",
                params![project_id],
            )?;
        }
        tx.commit()?;
        Ok(matched)
    }

    fn upsert_access(
        &self,
        project_id: &str,
        repo_id: &str,
        user_id: &str,
        entry: &AccessEntry,
    ) -> Result<usize> {
        // The SELECT source keeps this a no-op when the project is unbound
        // or bound to some other repository; the caller detects both
        // through the matched count.
        let matched = self.conn().execute(
            "INSERT INTO repo_access (project_id, user_id, username, password_set, granted_at)
             SELECT id, ?3, ?4, ?5, ?6 FROM projects
             WHERE id = ?1 AND repo_id = ?2
             ON CONFLICT(project_id, user_id) DO UPDATE SET
                 username = excluded.username,
                 password_set = excluded.password_set,
                 granted_at = excluded.granted_at",
            params![
                project_id,
                repo_id,
                user_id,
                entry.username,
                entry.password_set,
                format_datetime(&entry.granted_at),
            ],
        )?;
        Ok(matched)
    }

    fn remove_access(&self, project_id: &str, user_id: &str) -> Result<usize> {
        let matched = self.conn().execute(
            "DELETE FROM repo_access WHERE project_id = ?1 AND user_id = ?2",
            params![project_id, user_id],
        )?;
        Ok(matched)
    }
}

impl UserDirectory for SqliteStore {
    fn lookup_user(&self, user_id: &str) -> Result<Option<UserInfo>> {
        let row: Option<(String, String, String)> = self
            .conn()
            .query_row(
                "SELECT id, username, capabilities FROM directory_users WHERE id = ?1",
                params![user_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        Ok(row.map(|(user_id, username, capabilities)| UserInfo {
            user_id,
            username,
            capabilities: capabilities
                .split_whitespace()
                .map(str::to_string)
                .collect::<HashSet<_>>(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        let store = SqliteStore::in_memory().unwrap();
        store.initialize().unwrap();
        store
    }

    fn entry(username: &str, password_set: bool) -> AccessEntry {
        AccessEntry {
            username: username.to_string(),
            password_set,
            granted_at: Utc::now(),
        }
    }

    #[test]
    fn test_get_missing_project() {
        let store = store();
        assert!(store.get_project("nope").unwrap().is_none());
    }

    #[test]
    fn test_bind_repo_only_once() {
        let store = store();
        store.create_project(&Project::new("proj-1")).unwrap();

        assert_eq!(store.bind_repo("proj-1", "ab12345").unwrap(), 1);
        // Second bind must not match: the project already has a repository.
        assert_eq!(store.bind_repo("proj-1", "cd67890").unwrap(), 0);

        let project = store.get_project("proj-1").unwrap().unwrap();
        assert_eq!(project.binding.repo_id(), Some("ab12345"));
    }

    #[test]
    fn test_bind_repo_missing_project_matches_nothing() {
        let store = store();
        assert_eq!(store.bind_repo("ghost", "ab12345").unwrap(), 0);
    }

    #[test]
    fn test_clear_binding_requires_matching_repo_id() {
        let store = store();
        store.create_project(&Project::new("proj-1")).unwrap();
        store.bind_repo("proj-1", "ab12345").unwrap();
        store
            .upsert_access("proj-1", "ab12345", "user-1", &entry("alice", true))
            .unwrap();

        assert_eq!(store.clear_binding("proj-1", "wrong-id").unwrap(), 0);
        let project = store.get_project("proj-1").unwrap().unwrap();
        assert!(project.binding.is_bound());

        assert_eq!(store.clear_binding("proj-1", "ab12345").unwrap(), 1);
        let project = store.get_project("proj-1").unwrap().unwrap();
        assert_eq!(project.binding, RepoBinding::Unbound);
    }

    #[test]
    fn test_upsert_access_on_unbound_project_matches_nothing() {
        let store = store();
        store.create_project(&Project::new("proj-1")).unwrap();

        let matched = store
            .upsert_access("proj-1", "ab12345", "user-1", &entry("alice", true))
            .unwrap();
        assert_eq!(matched, 0);
    }

    #[test]
    fn test_upsert_access_on_stale_repo_id_matches_nothing() {
        let store = store();
        store.create_project(&Project::new("proj-1")).unwrap();
        store.bind_repo("proj-1", "ab12345").unwrap();

        // A caller holding an outdated binding must not get its grant in.
        let matched = store
            .upsert_access("proj-1", "stale-id", "user-1", &entry("alice", true))
            .unwrap();
        assert_eq!(matched, 0);

        let project = store.get_project("proj-1").unwrap().unwrap();
        let RepoBinding::Bound { users, .. } = project.binding else {
            panic!("expected bound project");
        };
        assert!(users.is_empty());
    }

    #[test]
    fn test_upsert_and_remove_access() {
        let store = store();
        store.create_project(&Project::new("proj-1")).unwrap();
        store.bind_repo("proj-1", "ab12345").unwrap();

        assert_eq!(
            store
                .upsert_access("proj-1", "ab12345", "user-1", &entry("alice", false))
                .unwrap(),
            1
        );
        // Replacing the same user is still one matched record.
        assert_eq!(
            store
                .upsert_access("proj-1", "ab12345", "user-1", &entry("alice", true))
                .unwrap(),
            1
        );

        let project = store.get_project("proj-1").unwrap().unwrap();
        let RepoBinding::Bound { users, .. } = project.binding else {
            panic!("expected bound project");
        };
        assert_eq!(users.len(), 1);
        assert!(users["user-1"].password_set);

        assert_eq!(store.remove_access("proj-1", "user-1").unwrap(), 1);
        assert_eq!(store.remove_access("proj-1", "user-1").unwrap(), 0);
    }

    #[test]
    fn test_user_directory_lookup() {
        let store = store();
        let user = UserInfo {
            user_id: "user-1".to_string(),
            username: "alice".to_string(),
            capabilities: ["vcs-use".to_string()].into_iter().collect(),
        };
        store.add_user(&user).unwrap();

        let found = store.lookup_user("user-1").unwrap().unwrap();
        assert_eq!(found, user);
        assert!(store.lookup_user("user-2").unwrap().is_none());
    }
}
