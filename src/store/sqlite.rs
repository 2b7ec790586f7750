use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::schema::SCHEMA;
use super::{Store, format_datetime, parse_datetime};
use crate::error::{Error, Result};
use crate::types::*;

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

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Guard to the raw connection, for callers that need SQL the [`Store`]
    /// trait does not cover (ad-hoc queries, schema introspection).
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

const USER_COLUMNS: &str = "user_id, username, email, password, realname, comment, deleted, \
                            sysadmin_flag, reset_uuid, creation_time, update_time";

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        user_id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        realname: row.get(4)?,
        comment: row.get(5)?,
        deleted: row.get(6)?,
        sysadmin: row.get(7)?,
        reset_uuid: row.get(8)?,
        creation_time: parse_datetime(&row.get::<_, String>(9)?),
        update_time: parse_datetime(&row.get::<_, String>(10)?),
    })
}

const PROJECT_COLUMNS: &str =
    "project_id, owner_id, name, deleted, public, creation_time, update_time";

fn project_from_row(row: &Row) -> rusqlite::Result<Project> {
    Ok(Project {
        project_id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        deleted: row.get(3)?,
        public: row.get(4)?,
        creation_time: parse_datetime(&row.get::<_, String>(5)?),
        update_time: parse_datetime(&row.get::<_, String>(6)?),
    })
}

fn role_from_row(row: &Row) -> rusqlite::Result<Role> {
    Ok(Role {
        role_id: row.get(0)?,
        role_code: row.get(1)?,
        name: row.get(2)?,
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Reference data

    fn insert_access_level(&self, access: &AccessLevel) -> Result<()> {
        self.conn().execute(
            "INSERT INTO access (access_code, comment) VALUES (?1, ?2)",
            params![access.access_code, access.comment],
        )?;
        Ok(())
    }

    fn list_access_levels(&self) -> Result<Vec<AccessLevel>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT access_code, comment FROM access ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok(AccessLevel {
                access_code: row.get(0)?,
                comment: row.get(1)?,
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn insert_role(&self, role: &Role) -> Result<()> {
        self.conn().execute(
            "INSERT INTO role (role_id, role_code, name) VALUES (?1, ?2, ?3)",
            params![role.role_id, role.role_code, role.name],
        )?;
        Ok(())
    }

    fn list_roles(&self) -> Result<Vec<Role>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT role_id, role_code, name FROM role ORDER BY role_id")?;
        let rows = stmt.query_map([], role_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn role_by_id(&self, role_id: i64) -> Result<Option<Role>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT role_id, role_code, name FROM role WHERE role_id = ?1",
            params![role_id],
            role_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    // User operations

    fn create_user(&self, user: &NewUser) -> Result<i64> {
        let now = format_datetime(&Utc::now());
        let conn = self.conn();
        conn.execute(
            "INSERT INTO user (username, email, password, realname, comment, deleted, \
             sysadmin_flag, creation_time, update_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                user.username,
                user.email,
                user.password,
                user.realname,
                user.comment,
                user.deleted,
                user.sysadmin,
                now,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn user_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM user WHERE user_id = ?1"),
            params![user_id],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM user WHERE username = ?1"),
            params![username],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM user WHERE email = ?1"),
            params![email],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn user_by_reset_uuid(&self, reset_uuid: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM user WHERE reset_uuid = ?1"),
            params![reset_uuid],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn login_candidate(&self, principal: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!(
                "SELECT {USER_COLUMNS} FROM user
                 WHERE deleted = 0 AND (username = ?1 OR email = ?1)"
            ),
            params![principal],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_users(&self, username_filter: Option<&str>) -> Result<Vec<User>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM user
             WHERE deleted = 0 AND username != 'admin'
               AND (?1 IS NULL OR username LIKE '%' || ?1 || '%')
             ORDER BY user_id DESC"
        ))?;
        let rows = stmt.query_map(params![username_filter], user_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn is_admin(&self, username: &str) -> Result<bool> {
        Ok(self
            .user_by_username(username)?
            .is_some_and(|user| user.sysadmin))
    }

    fn toggle_admin(&self, user_id: i64, grant: bool) -> Result<()> {
        let now = format_datetime(&Utc::now());
        let rows = self.conn().execute(
            "UPDATE user SET sysadmin_flag = ?1, update_time = ?2 WHERE user_id = ?3",
            params![grant, now, user_id],
        )?;
        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn update_password(&self, user_id: i64, password: &str) -> Result<()> {
        let now = format_datetime(&Utc::now());
        let rows = self.conn().execute(
            "UPDATE user SET password = ?1, update_time = ?2 WHERE user_id = ?3",
            params![password, now, user_id],
        )?;
        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn set_reset_uuid(&self, email: &str, reset_uuid: &str) -> Result<()> {
        let now = format_datetime(&Utc::now());
        let rows = self.conn().execute(
            "UPDATE user SET reset_uuid = ?1, update_time = ?2 WHERE email = ?3 AND deleted = 0",
            params![reset_uuid, now, email],
        )?;
        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn reset_password(&self, user_id: i64, password: &str) -> Result<()> {
        let now = format_datetime(&Utc::now());
        let rows = self.conn().execute(
            "UPDATE user SET password = ?1, reset_uuid = NULL, update_time = ?2 \
             WHERE user_id = ?3",
            params![password, now, user_id],
        )?;
        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // Project operations

    fn create_project(&self, project: &NewProject) -> Result<i64> {
        let now = format_datetime(&Utc::now());
        let conn = self.conn();
        conn.execute(
            "INSERT INTO project (owner_id, name, deleted, public, creation_time, update_time)
             VALUES (?1, ?2, 0, ?3, ?4, ?4)",
            params![project.owner_id, project.name, project.public, now],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn project_by_id(&self, project_id: i64) -> Result<Option<Project>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {PROJECT_COLUMNS} FROM project WHERE project_id = ?1"),
            params![project_id],
            project_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn project_by_name(&self, name: &str) -> Result<Option<Project>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {PROJECT_COLUMNS} FROM project WHERE name = ?1"),
            params![name],
            project_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn add_project_member(&self, project_id: i64, user_id: i64, role_id: i64) -> Result<()> {
        let now = format_datetime(&Utc::now());
        self.conn().execute(
            "INSERT INTO project_member (project_id, user_id, role, creation_time, update_time)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT (project_id, user_id) DO UPDATE SET role = ?3, update_time = ?4",
            params![project_id, user_id, role_id, now],
        )?;
        Ok(())
    }

    fn member_role(&self, project_id: i64, user_id: i64) -> Result<Option<Role>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT r.role_id, r.role_code, r.name
             FROM role r
             JOIN project_member pm ON pm.role = r.role_id
             WHERE pm.project_id = ?1 AND pm.user_id = ?2",
            params![project_id, user_id],
            role_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn project_members(&self, project_id: i64) -> Result<Vec<ProjectMember>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT pm.project_id, pm.user_id, u.username, r.role_id, r.name
             FROM project_member pm
             JOIN user u ON u.user_id = pm.user_id
             JOIN role r ON r.role_id = pm.role
             WHERE pm.project_id = ?1 AND u.deleted = 0
             ORDER BY pm.user_id",
        )?;
        let rows = stmt.query_map(params![project_id], |row| {
            Ok(ProjectMember {
                project_id: row.get(0)?,
                user_id: row.get(1)?,
                username: row.get(2)?,
                role_id: row.get(3)?,
                role_name: row.get(4)?,
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Rows written by the registry frontend

    fn add_access_log(&self, entry: &NewAccessLog) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO access_log (project_id, user_id, repo_name, operation, op_time)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.project_id,
                entry.user_id,
                entry.repo_name,
                entry.operation,
                format_datetime(&entry.op_time),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn access_logs(&self, project_id: i64) -> Result<Vec<AccessLog>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT log_id, project_id, user_id, repo_name, operation, op_time
             FROM access_log WHERE project_id = ?1
             ORDER BY op_time DESC",
        )?;
        let rows = stmt.query_map(params![project_id], |row| {
            Ok(AccessLog {
                log_id: row.get(0)?,
                project_id: row.get(1)?,
                user_id: row.get(2)?,
                repo_name: row.get(3)?,
                operation: row.get(4)?,
                op_time: parse_datetime(&row.get::<_, String>(5)?),
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn count_access_logs(&self, project_id: i64) -> Result<i64> {
        let conn = self.conn();
        conn.query_row(
            "SELECT COUNT(*) FROM access_log WHERE project_id = ?1",
            params![project_id],
            |row| row.get(0),
        )
        .map_err(Error::from)
    }

    fn add_repository(&self, repo: &NewRepository) -> Result<i64> {
        let owner = self
            .user_by_username(&repo.owner_name)?
            .ok_or(Error::NotFound)?;
        let project = self
            .project_by_name(&repo.project_name)?
            .ok_or(Error::NotFound)?;

        let now = format_datetime(&Utc::now());
        let conn = self.conn();
        conn.execute(
            "INSERT INTO repository (name, owner_id, project_id, description, pull_count, \
             star_count, creation_time, update_time)
             VALUES (?1, ?2, ?3, ?4, 0, 0, ?5, ?5)",
            params![
                repo.name,
                owner.user_id,
                project.project_id,
                repo.description,
                now,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn repository_by_name(&self, name: &str) -> Result<Option<Repository>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT repository_id, name, owner_id, project_id, description, pull_count, \
             star_count, creation_time, update_time
             FROM repository WHERE name = ?1",
            params![name],
            |row| {
                Ok(Repository {
                    repository_id: row.get(0)?,
                    name: row.get(1)?,
                    owner_id: row.get(2)?,
                    project_id: row.get(3)?,
                    description: row.get(4)?,
                    pull_count: row.get(5)?,
                    star_count: row.get(6)?,
                    creation_time: parse_datetime(&row.get::<_, String>(7)?),
                    update_time: parse_datetime(&row.get::<_, String>(8)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn set_property(&self, key: &str, value: &str) -> Result<()> {
        self.conn().execute(
            "INSERT INTO properties (k, v) VALUES (?1, ?2)
             ON CONFLICT (k) DO UPDATE SET v = excluded.v",
            params![key, value],
        )?;
        Ok(())
    }

    fn get_property(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT v FROM properties WHERE k = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
    }

    // Version marker

    fn write_schema_version(&self, version: &str) -> Result<()> {
        self.conn().execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![version],
        )?;
        Ok(())
    }

    fn schema_version(&self) -> Result<Option<String>> {
        let conn = self.conn();
        conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()
        .map_err(Error::from)
    }

    fn counts(&self) -> Result<StoreCounts> {
        let conn = self.conn();
        let count = |table: &str| -> Result<i64> {
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .map_err(Error::from)
        };
        Ok(StoreCounts {
            access_levels: count("access")?,
            roles: count("role")?,
            users: count("user")?,
            projects: count("project")?,
            project_members: count("project_member")?,
            access_logs: count("access_log")?,
            repositories: count("repository")?,
            replication_jobs: count("replication_job")?,
            properties: count("properties")?,
            schema_versions: count("schema_version")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, SqliteStore) {
        let temp = TempDir::new().unwrap();
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();
        (temp, store)
    }

    fn sample_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: String::new(),
            realname: username.to_string(),
            comment: None,
            deleted: false,
            sysadmin: false,
        }
    }

    #[test]
    fn test_initialize_creates_tables() {
        let (_temp, store) = open_store();

        let conn = store.connection();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"access".to_string()));
        assert!(tables.contains(&"role".to_string()));
        assert!(tables.contains(&"user".to_string()));
        assert!(tables.contains(&"project".to_string()));
        assert!(tables.contains(&"project_member".to_string()));
        assert!(tables.contains(&"access_log".to_string()));
        assert!(tables.contains(&"repository".to_string()));
        assert!(tables.contains(&"replication_job".to_string()));
        assert!(tables.contains(&"properties".to_string()));
        assert!(tables.contains(&"schema_version".to_string()));
    }

    #[test]
    fn test_initialize_is_repeatable() {
        let (_temp, store) = open_store();
        // IF NOT EXISTS everywhere, so a second batch is a no-op
        store.initialize().unwrap();
    }

    #[test]
    fn test_user_unique_username_and_email() {
        let (_temp, store) = open_store();

        store.create_user(&sample_user("bob", "bob@example.com")).unwrap();

        let dup_name = store.create_user(&sample_user("bob", "other@example.com"));
        assert!(matches!(dup_name, Err(Error::Database(_))));

        let dup_email = store.create_user(&sample_user("robert", "bob@example.com"));
        assert!(matches!(dup_email, Err(Error::Database(_))));

        assert_eq!(store.counts().unwrap().users, 1);
    }

    #[test]
    fn test_user_lookup_roundtrip() {
        let (_temp, store) = open_store();

        let id = store.create_user(&sample_user("carol", "carol@example.com")).unwrap();

        let by_id = store.user_by_id(id).unwrap().unwrap();
        assert_eq!(by_id.username, "carol");
        assert!(!by_id.deleted);
        assert!(!by_id.sysadmin);

        let by_name = store.user_by_username("carol").unwrap().unwrap();
        assert_eq!(by_name.user_id, id);

        let by_email = store.user_by_email("carol@example.com").unwrap().unwrap();
        assert_eq!(by_email.user_id, id);

        assert!(store.user_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn test_login_candidate_skips_deleted() {
        let (_temp, store) = open_store();

        let mut ghost = sample_user("ghost", "ghost@example.com");
        ghost.deleted = true;
        store.create_user(&ghost).unwrap();
        store.create_user(&sample_user("dana", "dana@example.com")).unwrap();

        assert!(store.login_candidate("ghost").unwrap().is_none());
        assert!(store.login_candidate("ghost@example.com").unwrap().is_none());
        assert!(store.login_candidate("dana").unwrap().is_some());
        assert!(store.login_candidate("dana@example.com").unwrap().is_some());
    }

    #[test]
    fn test_list_users_excludes_admin_and_deleted() {
        let (_temp, store) = open_store();

        let mut admin = sample_user("admin", "admin@example.com");
        admin.sysadmin = true;
        store.create_user(&admin).unwrap();
        let mut gone = sample_user("gone", "gone@example.com");
        gone.deleted = true;
        store.create_user(&gone).unwrap();
        store.create_user(&sample_user("erin", "erin@example.com")).unwrap();
        store.create_user(&sample_user("frank", "frank@example.com")).unwrap();

        let all = store.list_users(None).unwrap();
        let names: Vec<&str> = all.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, ["frank", "erin"]);

        let filtered = store.list_users(Some("ri")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].username, "erin");
    }

    #[test]
    fn test_toggle_admin() {
        let (_temp, store) = open_store();

        let id = store.create_user(&sample_user("gil", "gil@example.com")).unwrap();
        store.toggle_admin(id, true).unwrap();
        assert!(store.user_by_id(id).unwrap().unwrap().sysadmin);

        store.toggle_admin(id, false).unwrap();
        assert!(!store.user_by_id(id).unwrap().unwrap().sysadmin);

        assert!(matches!(store.toggle_admin(9999, true), Err(Error::NotFound)));
    }

    #[test]
    fn test_is_admin_resolves_username() {
        let (_temp, store) = open_store();

        let mut root = sample_user("root", "root@example.com");
        root.sysadmin = true;
        store.create_user(&root).unwrap();
        store.create_user(&sample_user("guest", "guest@example.com")).unwrap();

        assert!(store.is_admin("root").unwrap());
        assert!(!store.is_admin("guest").unwrap());
        assert!(!store.is_admin("nobody").unwrap());
    }

    #[test]
    fn test_project_member_role() {
        let (_temp, store) = open_store();

        store
            .insert_role(&Role {
                role_id: 1,
                role_code: "MDRWS".to_string(),
                name: "projectAdmin".to_string(),
            })
            .unwrap();
        store
            .insert_role(&Role {
                role_id: 2,
                role_code: "RWS".to_string(),
                name: "developer".to_string(),
            })
            .unwrap();

        let owner = store.create_user(&sample_user("hana", "hana@example.com")).unwrap();
        let project = store
            .create_project(&NewProject {
                owner_id: owner,
                name: "tools".to_string(),
                public: false,
            })
            .unwrap();

        assert!(store.member_role(project, owner).unwrap().is_none());

        store.add_project_member(project, owner, 2).unwrap();
        assert_eq!(store.member_role(project, owner).unwrap().unwrap().name, "developer");

        // Upsert on the (project, user) pair replaces the role
        store.add_project_member(project, owner, 1).unwrap();
        assert_eq!(store.member_role(project, owner).unwrap().unwrap().role_id, 1);
        assert_eq!(store.counts().unwrap().project_members, 1);

        let members = store.project_members(project).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].username, "hana");
        assert_eq!(members[0].role_name, "projectAdmin");
    }

    #[test]
    fn test_access_log_unique_per_project_and_time() {
        let (_temp, store) = open_store();

        let owner = store.create_user(&sample_user("ivy", "ivy@example.com")).unwrap();
        let project = store
            .create_project(&NewProject {
                owner_id: owner,
                name: "logsink".to_string(),
                public: true,
            })
            .unwrap();

        let t = Utc::now();
        let entry = NewAccessLog {
            project_id: project,
            user_id: owner,
            repo_name: "logsink/app".to_string(),
            operation: "push".to_string(),
            op_time: t,
        };
        store.add_access_log(&entry).unwrap();

        let same_instant = store.add_access_log(&entry);
        assert!(matches!(same_instant, Err(Error::Database(_))));

        let later = NewAccessLog {
            op_time: t + Duration::seconds(1),
            ..entry
        };
        store.add_access_log(&later).unwrap();
        assert_eq!(store.count_access_logs(project).unwrap(), 2);

        let logs = store.access_logs(project).unwrap();
        assert_eq!(logs.len(), 2);
        // Newest first
        assert_eq!(logs[0].op_time, t + Duration::seconds(1));
        assert_eq!(logs[1].repo_name, "logsink/app");
        assert_eq!(logs[1].operation, "push");

        assert!(store.access_logs(project + 1).unwrap().is_empty());
    }

    #[test]
    fn test_add_repository_resolves_names() {
        let (_temp, store) = open_store();

        let owner = store.create_user(&sample_user("jude", "jude@example.com")).unwrap();
        let project = store
            .create_project(&NewProject {
                owner_id: owner,
                name: "library".to_string(),
                public: true,
            })
            .unwrap();

        let repo = NewRepository {
            name: "library/ubuntu".to_string(),
            owner_name: "jude".to_string(),
            project_name: "library".to_string(),
            description: Some("base image".to_string()),
        };
        store.add_repository(&repo).unwrap();

        let stored = store.repository_by_name("library/ubuntu").unwrap().unwrap();
        assert_eq!(stored.owner_id, owner);
        assert_eq!(stored.project_id, project);
        assert_eq!(stored.pull_count, 0);

        // Repository names are unique
        assert!(matches!(store.add_repository(&repo), Err(Error::Database(_))));

        let unknown_owner = NewRepository {
            owner_name: "nobody".to_string(),
            name: "library/alpine".to_string(),
            ..repo
        };
        assert!(matches!(store.add_repository(&unknown_owner), Err(Error::NotFound)));
    }

    #[test]
    fn test_properties_upsert() {
        let (_temp, store) = open_store();

        assert!(store.get_property("auth_mode").unwrap().is_none());
        store.set_property("auth_mode", "db_auth").unwrap();
        store.set_property("auth_mode", "ldap_auth").unwrap();
        assert_eq!(store.get_property("auth_mode").unwrap().unwrap(), "ldap_auth");
        assert_eq!(store.counts().unwrap().properties, 1);
    }

    #[test]
    fn test_schema_version_roundtrip() {
        let (_temp, store) = open_store();

        assert!(store.schema_version().unwrap().is_none());
        store.write_schema_version("0.4.0").unwrap();
        assert_eq!(store.schema_version().unwrap().unwrap(), "0.4.0");
    }
}
