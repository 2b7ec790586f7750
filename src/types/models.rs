use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Single-letter capability flag composable into a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessLevel {
    pub access_code: String,
    pub comment: String,
}

/// Named bundle of access levels assignable to a project membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub role_id: i64,
    pub role_code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    /// PHC-format password hash; empty for system-reserved identities.
    #[serde(skip)]
    pub password: String,
    pub realname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Soft delete: the row stays, normal lookups skip it.
    pub deleted: bool,
    pub sysadmin: bool,
    #[serde(skip)]
    pub reset_uuid: Option<String>,
    pub creation_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

/// User fields supplied by the caller; id and timestamps are store-assigned.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    /// Already-hashed password, or empty for reserved identities.
    pub password: String,
    pub realname: String,
    pub comment: Option<String>,
    pub deleted: bool,
    pub sysadmin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub project_id: i64,
    pub owner_id: i64,
    pub name: String,
    pub deleted: bool,
    pub public: bool,
    pub creation_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub owner_id: i64,
    pub name: String,
    pub public: bool,
}

/// Membership of a user in a project, carrying the role and its name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMember {
    pub project_id: i64,
    pub user_id: i64,
    pub username: String,
    pub role_id: i64,
    pub role_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessLog {
    pub log_id: i64,
    pub project_id: i64,
    pub user_id: i64,
    pub repo_name: String,
    pub operation: String,
    pub op_time: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAccessLog {
    pub project_id: i64,
    pub user_id: i64,
    pub repo_name: String,
    pub operation: String,
    pub op_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub repository_id: i64,
    pub name: String,
    pub owner_id: i64,
    pub project_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub pull_count: i64,
    pub star_count: i64,
    pub creation_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

/// Repository as reported by the registry: owner and project arrive as names
/// and are resolved to ids at insert time.
#[derive(Debug, Clone)]
pub struct NewRepository {
    pub name: String,
    pub owner_name: String,
    pub project_name: String,
    pub description: Option<String>,
}

/// Row counts across the store, used by `status` and by tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCounts {
    pub access_levels: i64,
    pub roles: i64,
    pub users: i64,
    pub projects: i64,
    pub project_members: i64,
    pub access_logs: i64,
    pub repositories: i64,
    pub replication_jobs: i64,
    pub properties: i64,
    pub schema_versions: i64,
}
