//! Database migrations
//!
//! Versioned schema changes recorded in `schema_migrations`; each version is
//! applied inside its own transaction.

use crate::core::error::{AdminError, Result};
use rusqlite::Connection;
use tracing::{info, warn};

/// Migration version tracking table
const MIGRATION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at DATETIME DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Initial schema (version 1)
const MIGRATION_V1: &str = r#"
-- Users: passengers, pilots, flight attendants and admins
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    nombre TEXT NOT NULL,
    apellido TEXT NOT NULL,
    email TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    telefono TEXT NOT NULL,
    direccion TEXT NOT NULL,
    pasaporte TEXT NOT NULL DEFAULT '',
    rol TEXT NOT NULL DEFAULT 'Pasajero',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Flights; crew columns hold user ids without a foreign key
CREATE TABLE IF NOT EXISTS flights (
    id TEXT PRIMARY KEY,
    origen TEXT NOT NULL,
    destino TEXT NOT NULL,
    fecha_salida TEXT NOT NULL,
    fecha_llegada TEXT NOT NULL,
    hora TEXT NOT NULL,
    costo REAL NOT NULL,
    asientos_disponibles INTEGER NOT NULL,
    avion TEXT NOT NULL,
    aerolinea TEXT NOT NULL,
    estado TEXT NOT NULL,
    piloto TEXT,
    copiloto TEXT,
    azafata1 TEXT,
    azafata2 TEXT,
    azafata3 TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_rol ON users(rol);
CREATE INDEX IF NOT EXISTS idx_flights_fecha_salida ON flights(fecha_salida);
"#;

/// Case-insensitive unique emails (version 2)
const MIGRATION_V2: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users(email COLLATE NOCASE);
"#;

const MIGRATIONS: &[(i64, &str)] = &[(1, MIGRATION_V1), (2, MIGRATION_V2)];

/// Bring the schema up to the latest version
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(MIGRATION_TABLE)
        .map_err(AdminError::DatabaseError)?;

    let current = current_version(conn)?;
    info!(current_version = current, "Checking database migrations");

    for (version, sql) in MIGRATIONS {
        if *version > current {
            info!("Applying migration v{}", version);
            apply_migration(conn, *version, sql)?;
        }
    }

    info!("Database migrations completed successfully");
    Ok(())
}

/// Highest applied version, 0 for a fresh database
pub fn current_version(conn: &Connection) -> Result<i64> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )
    .map_err(AdminError::DatabaseError)
}

fn apply_migration(conn: &mut Connection, version: i64, sql: &str) -> Result<()> {
    let tx = conn.transaction().map_err(AdminError::DatabaseError)?;

    tx.execute_batch(sql).map_err(|e| {
        warn!("Migration v{} failed: {}", version, e);
        AdminError::DatabaseError(e)
    })?;

    tx.execute("INSERT INTO schema_migrations (version) VALUES (?)", [version])
        .map_err(AdminError::DatabaseError)?;

    tx.commit().map_err(AdminError::DatabaseError)?;

    info!("Migration v{} applied successfully", version);
    Ok(())
}
