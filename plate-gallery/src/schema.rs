use rusqlite::{Connection, Result};

/// Initialize the plate gallery schema. Safe to call on every start.
pub fn init_plate_schema(conn: &Connection) -> Result<()> {
    // Schema version table for plate gallery
    conn.execute(
        "CREATE TABLE IF NOT EXISTS plate_schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    let current_version: i32 = conn
        .query_row(
            "SELECT version FROM plate_schema_version ORDER BY version DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current_version < 1 {
        create_plate_schema_v1(conn)?;
        conn.execute("INSERT INTO plate_schema_version (version) VALUES (1)", [])?;
        log::info!("Plate gallery schema created at version 1");
    }

    Ok(())
}

/// Create plate gallery schema version 1
fn create_plate_schema_v1(conn: &Connection) -> Result<()> {
    // Table: images - one row per photo, detectedText doubles as folder key.
    // May already exist in databases written by the first mobile release.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS images (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            imageUri TEXT NOT NULL,
            assetId TEXT,
            category TEXT NOT NULL,
            detectedText TEXT,
            date TEXT NOT NULL
        )",
        [],
    )?;

    // Index for folder lookups
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_images_detected_text ON images(detectedText)",
        [],
    )?;

    Ok(())
}
