mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
pub trait Store: Send + Sync {
    /// Applies the schema batch: tables plus every uniqueness constraint.
    fn initialize(&self) -> Result<()>;

    // Reference data
    fn insert_access_level(&self, access: &AccessLevel) -> Result<()>;
    fn list_access_levels(&self) -> Result<Vec<AccessLevel>>;
    fn insert_role(&self, role: &Role) -> Result<()>;
    fn list_roles(&self) -> Result<Vec<Role>>;
    fn role_by_id(&self, role_id: i64) -> Result<Option<Role>>;

    // User operations
    fn create_user(&self, user: &NewUser) -> Result<i64>;
    fn user_by_id(&self, user_id: i64) -> Result<Option<User>>;
    fn user_by_username(&self, username: &str) -> Result<Option<User>>;
    fn user_by_email(&self, email: &str) -> Result<Option<User>>;
    fn user_by_reset_uuid(&self, reset_uuid: &str) -> Result<Option<User>>;
    /// Non-deleted user matching the principal by username OR email.
    fn login_candidate(&self, principal: &str) -> Result<Option<User>>;
    /// Non-deleted users, always excluding `admin`, optionally filtered by
    /// an ASCII case-insensitive username substring.
    fn list_users(&self, username_filter: Option<&str>) -> Result<Vec<User>>;
    /// Whether the named user carries the sysadmin flag. Unknown users are
    /// not admins.
    fn is_admin(&self, username: &str) -> Result<bool>;
    fn toggle_admin(&self, user_id: i64, grant: bool) -> Result<()>;
    fn update_password(&self, user_id: i64, password: &str) -> Result<()>;
    fn set_reset_uuid(&self, email: &str, reset_uuid: &str) -> Result<()>;
    /// Sets the password and clears any pending reset uuid.
    fn reset_password(&self, user_id: i64, password: &str) -> Result<()>;

    // Project operations
    fn create_project(&self, project: &NewProject) -> Result<i64>;
    fn project_by_id(&self, project_id: i64) -> Result<Option<Project>>;
    fn project_by_name(&self, name: &str) -> Result<Option<Project>>;
    fn add_project_member(&self, project_id: i64, user_id: i64, role_id: i64) -> Result<()>;
    fn member_role(&self, project_id: i64, user_id: i64) -> Result<Option<Role>>;
    fn project_members(&self, project_id: i64) -> Result<Vec<ProjectMember>>;

    // Rows written by the registry frontend
    fn add_access_log(&self, entry: &NewAccessLog) -> Result<i64>;
    fn access_logs(&self, project_id: i64) -> Result<Vec<AccessLog>>;
    fn count_access_logs(&self, project_id: i64) -> Result<i64>;
    fn add_repository(&self, repo: &NewRepository) -> Result<i64>;
    fn repository_by_name(&self, name: &str) -> Result<Option<Repository>>;
    fn set_property(&self, key: &str, value: &str) -> Result<()>;
    fn get_property(&self, key: &str) -> Result<Option<String>>;

    // Version marker
    fn write_schema_version(&self, version: &str) -> Result<()>;
    fn schema_version(&self) -> Result<Option<String>>;

    fn counts(&self) -> Result<StoreCounts>;
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}
