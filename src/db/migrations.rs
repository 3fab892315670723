use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

use super::schema::{CREATE_TABLES, KEY_GROUPS, SCHEMA_VERSION};

/// Kör alla nödvändiga migrationer
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version = get_current_version(conn)?;

    if current_version == 0 {
        // Ny databas - skapa allt
        info!("Skapar ny databas med schema version {}", SCHEMA_VERSION);
        initial_setup(conn)?;
    } else if current_version < SCHEMA_VERSION {
        // Uppdatera befintlig databas
        info!(
            "Migrerar databas från version {} till {}",
            current_version, SCHEMA_VERSION
        );
        migrate_from(conn, current_version)?;
    } else {
        info!("Databas är uppdaterad (version {})", current_version);
    }

    Ok(())
}

fn get_current_version(conn: &Connection) -> Result<i32> {
    // Kontrollera om schema_migrations-tabellen finns
    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_migrations')",
        [],
        |row| row.get(0),
    )?;

    if !table_exists {
        return Ok(0);
    }

    // Hämta senaste version
    let version: Option<i32> = conn
        .query_row(
            "SELECT MAX(version) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .ok();

    Ok(version.unwrap_or(0))
}

fn initial_setup(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;

    // Markera alla versioner som klara
    for version in 1..=SCHEMA_VERSION {
        conn.execute(
            "INSERT OR IGNORE INTO schema_migrations (version) VALUES (?)",
            [version],
        )?;
    }

    info!("Initial setup klar");
    Ok(())
}

fn migrate_from(conn: &Connection, from_version: i32) -> Result<()> {
    // Kör migrationer stegvis
    for version in (from_version + 1)..=SCHEMA_VERSION {
        match version {
            2 => migrate_v1_to_v2(conn)?,
            _ => {}
        }

        // Markera version som migrerad
        conn.execute(
            "INSERT INTO schema_migrations (version) VALUES (?)",
            [version],
        )?;

        info!("Migrerade till version {}", version);
    }

    Ok(())
}

/// Migration v1 -> v2: Patruller
///
/// Patrullindelningen infördes efter första releasen. Äldre databaser
/// saknar sektionen helt; här skapas den som en tom lista så att alla
/// läsare kan räkna med att nyckeln finns.
fn migrate_v1_to_v2(conn: &Connection) -> Result<()> {
    info!("Migration v2: Lägger till patrullsektion");

    conn.execute(
        "INSERT OR IGNORE INTO app_data (key, value) VALUES (?, '[]')",
        [KEY_GROUPS],
    )?;

    Ok(())
}
