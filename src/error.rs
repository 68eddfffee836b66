use std::fmt;

/// Central error types for the plate organizer
#[derive(Debug)]
pub enum AppError {
    /// Database error (rusqlite), the store is unreachable or corrupt
    Database(rusqlite::Error),
    /// Filesystem error
    Filesystem(std::io::Error),
    /// Validation error (e.g. empty uri, plate too short)
    Validation(String),
    /// Text recognition failed for an image
    Recognition(String),
    /// The external asset library rejected a call
    ExternalAsset(String),
    /// Configuration file could not be read or parsed
    Config(String),
    /// Resource not found
    NotFound(String),
    /// General error
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Database(e) => write!(f, "Database error: {}", e),
            AppError::Filesystem(e) => write!(f, "Filesystem error: {}", e),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Recognition(msg) => write!(f, "Text recognition error: {}", msg),
            AppError::ExternalAsset(msg) => write!(f, "Asset library error: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

// Conversions from other error types
impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Database(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Filesystem(e)
    }
}

impl From<plate_gallery::PhotoStoreError> for AppError {
    fn from(e: plate_gallery::PhotoStoreError) -> Self {
        match e {
            plate_gallery::PhotoStoreError::Validation(msg) => AppError::Validation(msg),
            plate_gallery::PhotoStoreError::DatabaseError(e) => AppError::Database(e),
            plate_gallery::PhotoStoreError::IoError(e) => AppError::Filesystem(e),
            plate_gallery::PhotoStoreError::LockPoisoned => {
                AppError::Other("Photo store lock poisoned".to_string())
            }
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

/// User-friendly error messages for the host
impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::Database(_) => "A database error occurred. Please try again.".to_string(),
            AppError::Filesystem(_) => {
                "Error accessing files. Please check app permissions.".to_string()
            }
            AppError::Validation(msg) => msg.clone(),
            AppError::Recognition(_) => "No plate could be read from the photo.".to_string(),
            AppError::ExternalAsset(_) => {
                "The photo library could not be updated. Nothing was deleted.".to_string()
            }
            AppError::Config(msg) => format!("Invalid configuration: {}", msg),
            AppError::NotFound(msg) => format!("{} was not found.", msg),
            AppError::Other(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_validation_maps_to_validation() {
        let err: AppError =
            plate_gallery::PhotoStoreError::Validation("Image uri must not be empty".into()).into();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.user_message(), "Image uri must not be empty");
    }

    #[test]
    fn test_store_database_error_maps_to_database() {
        let err: AppError =
            plate_gallery::PhotoStoreError::DatabaseError(rusqlite::Error::QueryReturnedNoRows)
                .into();
        assert!(matches!(err, AppError::Database(_)));
    }
}
