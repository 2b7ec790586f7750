//! Bootstrap seeder.
//!
//! Runs once against an empty store: applies the schema (all uniqueness
//! constraints) and inserts the default reference data, the reserved
//! identities, the default project and its admin membership, and the schema
//! version marker. The sequence is strictly linear; each insert after the
//! reserved identities depends on a generated id captured from an earlier
//! insert. Any store error aborts the run and propagates untouched — there is
//! no rollback and no partial-success reporting.

use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{AccessLevel, NewProject, NewUser, Role, StoreCounts};

/// Seed level written as the version marker.
pub const SCHEMA_VERSION: &str = "0.4.0";

/// Capability flags, in the order role codes concatenate them.
pub const ACCESS_LEVELS: [(&str, &str); 5] = [
    ("M", "Management access for project"),
    ("R", "Read access for project"),
    ("W", "Write access for project"),
    ("D", "Delete access for project"),
    ("S", "Search access for project"),
];

/// (role_id, role_code, name). Role 1 grants every access level.
pub const ROLES: [(i64, &str, &str); 3] = [
    (1, "MDRWS", "projectAdmin"),
    (2, "RWS", "developer"),
    (3, "RS", "guest"),
];

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ANONYMOUS_USERNAME: &str = "anonymous";
pub const ANONYMOUS_EMAIL: &str = "anonymous@example.com";
pub const DEFAULT_PROJECT: &str = "library";
pub const PROJECT_ADMIN_ROLE: i64 = 1;

/// What a successful run produced, for the CLI and for callers embedding the
/// seeder.
#[derive(Debug, Clone, Serialize)]
pub struct SeedSummary {
    pub schema_version: String,
    pub admin_user_id: i64,
    pub anonymous_user_id: i64,
    pub project_id: i64,
    pub counts: StoreCounts,
}

/// Seeds an empty store.
///
/// A store that already carries a schema version marker fails fast with
/// [`Error::AlreadySeeded`] before any row is written. The uniqueness
/// constraints remain as a backstop: a run racing this check still dies on
/// the first duplicate key instead of silently duplicating rows.
pub fn run(store: &dyn Store) -> Result<SeedSummary> {
    store.initialize()?;

    if let Some(version) = store.schema_version()? {
        return Err(Error::AlreadySeeded(version));
    }

    for (access_code, comment) in ACCESS_LEVELS {
        store.insert_access_level(&AccessLevel {
            access_code: access_code.to_string(),
            comment: comment.to_string(),
        })?;
    }

    for (role_id, role_code, name) in ROLES {
        store.insert_role(&Role {
            role_id,
            role_code: role_code.to_string(),
            name: name.to_string(),
        })?;
    }

    let admin_user_id = store.create_user(&NewUser {
        username: ADMIN_USERNAME.to_string(),
        email: ADMIN_EMAIL.to_string(),
        password: String::new(),
        realname: "system admin".to_string(),
        comment: Some("admin user".to_string()),
        deleted: false,
        sysadmin: true,
    })?;

    // Reserved identity for unauthenticated pulls; soft-deleted so normal
    // lookups never surface it.
    let anonymous_user_id = store.create_user(&NewUser {
        username: ANONYMOUS_USERNAME.to_string(),
        email: ANONYMOUS_EMAIL.to_string(),
        password: String::new(),
        realname: "anonymous user".to_string(),
        comment: Some("anonymous user".to_string()),
        deleted: true,
        sysadmin: false,
    })?;

    let project_id = store.create_project(&NewProject {
        owner_id: admin_user_id,
        name: DEFAULT_PROJECT.to_string(),
        public: true,
    })?;

    store.add_project_member(project_id, admin_user_id, PROJECT_ADMIN_ROLE)?;

    store.write_schema_version(SCHEMA_VERSION)?;

    info!(
        admin_user_id,
        project_id,
        schema_version = SCHEMA_VERSION,
        "store seeded"
    );

    Ok(SeedSummary {
        schema_version: SCHEMA_VERSION.to_string(),
        admin_user_id,
        anonymous_user_id,
        project_id,
        counts: store.counts()?,
    })
}
