//! Schema definitions, migration runner and role seeding for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity. UUIDs
//! are stored as strings (the record id carries the canonical value).

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;
use wishgroup_core::error::WishgroupResult;
use wishgroup_core::models::role::CreateRole;
use wishgroup_core::repository::RoleRepository;

use crate::error::DbError;
use crate::repository::SurrealRoleRepository;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Roles (process-wide seed data, read-only after startup)
-- =======================================================================
DEFINE TABLE role SCHEMAFULL;
DEFINE FIELD name ON TABLE role TYPE string;
DEFINE FIELD permissions ON TABLE role TYPE array;
DEFINE FIELD permissions.* ON TABLE role TYPE string;
DEFINE FIELD created_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_role_name ON TABLE role COLUMNS name UNIQUE;

-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD first_name ON TABLE user TYPE string;
DEFINE FIELD last_name ON TABLE user TYPE string;
DEFINE FIELD display_name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD role_id ON TABLE user TYPE string;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Groups
-- =======================================================================
DEFINE TABLE group SCHEMAFULL;
DEFINE FIELD name ON TABLE group TYPE string;
DEFINE FIELD icon ON TABLE group TYPE string;
DEFINE FIELD creator_id ON TABLE group TYPE string;
DEFINE FIELD admin_id ON TABLE group TYPE string;
DEFINE FIELD created_at ON TABLE group TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE group TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Invitations
-- =======================================================================
DEFINE TABLE invitation SCHEMAFULL;
DEFINE FIELD group_id ON TABLE invitation TYPE string;
DEFINE FIELD creator_id ON TABLE invitation TYPE string;
DEFINE FIELD email ON TABLE invitation TYPE string;
DEFINE FIELD token ON TABLE invitation TYPE string;
DEFINE FIELD times_sent ON TABLE invitation TYPE int;
DEFINE FIELD sent_at ON TABLE invitation TYPE datetime;
DEFINE FIELD expires_at ON TABLE invitation TYPE datetime;
DEFINE FIELD created_at ON TABLE invitation TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE invitation TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_invitation_email_group ON TABLE invitation \
    COLUMNS email, group_id UNIQUE;

-- =======================================================================
-- Wishlist items
-- =======================================================================
DEFINE TABLE wish_list SCHEMAFULL;
DEFINE FIELD group_id ON TABLE wish_list TYPE string;
DEFINE FIELD creator_id ON TABLE wish_list TYPE string;
DEFINE FIELD description ON TABLE wish_list TYPE string;
DEFINE FIELD rank ON TABLE wish_list TYPE int;
DEFINE FIELD created_at ON TABLE wish_list TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE wish_list TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Graph Edge Tables (relations)
-- =======================================================================

-- User -> Group membership
DEFINE TABLE member_of TYPE RELATION SCHEMAFULL;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies each
/// migration whose version exceeds the current maximum. All DEFINE
/// statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Seed the three fixed roles (`admin`, `user`, `guest`) if absent.
///
/// Runs once at startup; request handling never mutates roles. Safe to
/// re-run — existing roles are left untouched, so a redeploy does not
/// reset role ids embedded in outstanding tokens.
pub async fn seed_roles<C: Connection>(db: &Surreal<C>) -> WishgroupResult<()> {
    let roles = SurrealRoleRepository::new(db.clone());

    for input in [CreateRole::admin(), CreateRole::user(), CreateRole::guest()] {
        if roles.get_by_name(&input.name).await?.is_none() {
            info!(role = %input.name, "Seeding role");
            roles.create(input).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
