pub const SCHEMA: &str = r#"
-- Access levels composable into roles
CREATE TABLE IF NOT EXISTS access (
    access_code TEXT NOT NULL UNIQUE,
    comment TEXT NOT NULL DEFAULT ''
);

-- Roles bundle access levels; role_code concatenates the granted codes
CREATE TABLE IF NOT EXISTS role (
    role_id INTEGER PRIMARY KEY,
    role_code TEXT NOT NULL,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS user (
    user_id INTEGER PRIMARY KEY,
    username TEXT NOT NULL,
    email TEXT NOT NULL,
    password TEXT NOT NULL DEFAULT '',   -- PHC hash, empty for reserved identities
    realname TEXT NOT NULL DEFAULT '',
    comment TEXT,
    deleted INTEGER NOT NULL DEFAULT 0,  -- soft delete, row is kept
    sysadmin_flag INTEGER NOT NULL DEFAULT 0,
    reset_uuid TEXT,
    creation_time TEXT DEFAULT (datetime('now')),
    update_time TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS project (
    project_id INTEGER PRIMARY KEY,
    owner_id INTEGER NOT NULL REFERENCES user(user_id),
    name TEXT NOT NULL,
    deleted INTEGER NOT NULL DEFAULT 0,
    public INTEGER NOT NULL DEFAULT 0,   -- if 1, anonymous read access allowed
    creation_time TEXT DEFAULT (datetime('now')),
    update_time TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS project_member (
    project_id INTEGER NOT NULL REFERENCES project(project_id) ON DELETE CASCADE,
    user_id INTEGER NOT NULL REFERENCES user(user_id) ON DELETE CASCADE,
    role INTEGER NOT NULL REFERENCES role(role_id),
    creation_time TEXT DEFAULT (datetime('now')),
    update_time TEXT DEFAULT (datetime('now')),
    PRIMARY KEY (project_id, user_id)
);

-- Append-only operation log written by the registry frontend
CREATE TABLE IF NOT EXISTS access_log (
    log_id INTEGER PRIMARY KEY,
    project_id INTEGER NOT NULL REFERENCES project(project_id),
    user_id INTEGER NOT NULL,
    repo_name TEXT NOT NULL DEFAULT '',
    operation TEXT NOT NULL DEFAULT '',
    op_time TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS repository (
    repository_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    owner_id INTEGER NOT NULL REFERENCES user(user_id),
    project_id INTEGER NOT NULL REFERENCES project(project_id),
    description TEXT,
    pull_count INTEGER NOT NULL DEFAULT 0,
    star_count INTEGER NOT NULL DEFAULT 0,
    creation_time TEXT DEFAULT (datetime('now')),
    update_time TEXT DEFAULT (datetime('now'))
);

-- One job row per replication policy
CREATE TABLE IF NOT EXISTS replication_job (
    job_id INTEGER PRIMARY KEY,
    policy_id INTEGER NOT NULL,
    status TEXT NOT NULL DEFAULT '',
    update_time TEXT DEFAULT (datetime('now'))
);

-- Key/value configuration store
CREATE TABLE IF NOT EXISTS properties (
    k TEXT NOT NULL,
    v TEXT NOT NULL DEFAULT ''
);

-- Single row recording which seed level has been applied
CREATE TABLE IF NOT EXISTS schema_version (
    version TEXT NOT NULL
);

-- Uniqueness constraints; these also guard against accidental re-seeding
CREATE UNIQUE INDEX IF NOT EXISTS idx_user_username ON user(username);
CREATE UNIQUE INDEX IF NOT EXISTS idx_user_email ON user(email);
CREATE UNIQUE INDEX IF NOT EXISTS idx_project_name ON project(name);
CREATE UNIQUE INDEX IF NOT EXISTS idx_access_log_project_op_time ON access_log(project_id, op_time);
CREATE UNIQUE INDEX IF NOT EXISTS idx_repository_name ON repository(name);
CREATE UNIQUE INDEX IF NOT EXISTS idx_replication_job_policy ON replication_job(policy_id);
CREATE UNIQUE INDEX IF NOT EXISTS idx_properties_k ON properties(k);
"#;
