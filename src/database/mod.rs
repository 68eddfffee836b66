use crate::error::AppError;
use crate::models::AppConfig;
use plate_gallery::PhotoStore;

/// Opens the configured photo store, creating file and schema when missing
pub fn init_database(config: &AppConfig) -> Result<PhotoStore, AppError> {
    let store = PhotoStore::open(&config.database_path)?;

    log::info!(
        "Photo store ready at {:?} ({} photos)",
        config.database_path,
        store.count()?
    );

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_database_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            database_path: dir.path().join("data").join("plates.db"),
            ..AppConfig::default()
        };

        let store = init_database(&config).unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert!(config.database_path.exists());

        // second start on the same file
        init_database(&config).unwrap();
    }
}
