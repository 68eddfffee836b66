use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// Plate text stored when no plate could be determined for a photo
pub const UNKNOWN_PLATE: &str = "Unknown";

/// Role of a photo inside its plate folder
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PhotoCategory {
    /// Best view of the plate itself
    PrimaryPlate,
    /// Supplementary vehicle detail
    DetailShot,
}

impl PhotoCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoCategory::PrimaryPlate => "PrimaryPlate",
            PhotoCategory::DetailShot => "DetailShot",
        }
    }

    /// Parses a stored category. Labels written by the first mobile release are
    /// accepted as well; anything unrecognized is treated as a detail shot.
    pub fn from_str(s: &str) -> Self {
        match s {
            "PrimaryPlate" | "Patente Principal" => PhotoCategory::PrimaryPlate,
            _ => PhotoCategory::DetailShot,
        }
    }
}

impl std::fmt::Display for PhotoCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One captured or imported photograph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhotoRecord {
    pub id: i64,
    pub image_uri: String,
    /// Id in the external asset library, empty when not linked
    pub asset_id: String,
    pub category: PhotoCategory,
    pub plate_text: String,
    pub created_at: DateTime<Utc>,
}

impl PhotoRecord {
    pub fn has_external_asset(&self) -> bool {
        !self.asset_id.is_empty()
    }
}

/// Formats a timestamp the way it is persisted in the `date` column
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Column order expected by `TryFrom<&Row>`
pub(crate) const RECORD_COLUMNS: &str = "id, imageUri, assetId, category, detectedText, date";

impl<'r> TryFrom<&Row<'r>> for PhotoRecord {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'r>) -> Result<Self, Self::Error> {
        let id: i64 = row.get(0)?;
        let image_uri: String = row.get(1)?;
        let asset_id: Option<String> = row.get(2)?;
        let category: String = row.get(3)?;
        let plate_text: Option<String> = row.get(4)?;
        let date: String = row.get(5)?;

        let created_at = match DateTime::parse_from_rfc3339(&date) {
            Ok(d) => d.with_timezone(&Utc),
            Err(e) => {
                log::warn!("Photo {} has unreadable date {:?}: {}", id, date, e);
                DateTime::<Utc>::UNIX_EPOCH
            }
        };

        Ok(PhotoRecord {
            id,
            image_uri,
            asset_id: asset_id.unwrap_or_default(),
            category: PhotoCategory::from_str(&category),
            plate_text: plate_text.unwrap_or_default(),
            created_at,
        })
    }
}

/// Virtual folder entry: one per plate, covered by its newest photo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FolderPreview {
    pub plate: String,
    pub cover_image_uri: String,
}
