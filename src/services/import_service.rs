use crate::error::AppError;
use crate::services::asset_service::{AssetHandle, AssetRegistry};
use crate::services::ocr_service::{recognize_plate, TextRecognizer};
use plate_gallery::{PhotoCategory, PhotoStore};
use std::path::{Path, PathBuf};

/// Trims and upper-cases a user-confirmed plate
pub fn normalize_plate(plate: &str, min_len: usize) -> Result<String, AppError> {
    let clean = plate.trim().to_uppercase();

    if clean.chars().count() < min_len {
        return Err(AppError::Validation(format!(
            "The plate must have at least {} characters",
            min_len
        )));
    }

    Ok(clean)
}

/// Suggests a plate for a single photo before it is saved
pub fn suggest_plate(recognizer: &dyn TextRecognizer, image: &Path) -> Option<String> {
    recognize_plate(recognizer, image).filter(|plate| !plate.is_empty())
}

/// Puts the asset into the album named after the plate. Failures are only logged.
fn file_into_album(registry: &dyn AssetRegistry, plate: &str, asset: &AssetHandle) {
    let result = registry.get_album(plate).and_then(|album| match album {
        None => registry.create_album(plate, asset).map(|_| ()),
        Some(album) => registry.add_assets_to_album(std::slice::from_ref(asset), &album),
    });

    if let Err(e) = result {
        log::warn!("Could not create/update album {}: {}", plate, e);
    }
}

/// Saves a batch of photos under one plate.
///
/// Each file is moved into the asset library, filed into the plate's album
/// and recorded in the store. A file the library rejects is skipped; a store
/// failure removes the asset it just created and aborts the batch. Returns
/// how many photos were recorded.
pub fn save_photos(
    store: &PhotoStore,
    registry: &dyn AssetRegistry,
    files: &[PathBuf],
    plate: &str,
    is_main_plate: bool,
    min_plate_len: usize,
) -> Result<usize, AppError> {
    let plate = normalize_plate(plate, min_plate_len)?;

    // only a photo saved on its own can be the primary one
    let category = if files.len() == 1 && is_main_plate {
        PhotoCategory::PrimaryPlate
    } else {
        PhotoCategory::DetailShot
    };

    let mut saved_count = 0;
    for file in files {
        let asset = match registry.create_asset(file) {
            Ok(asset) => asset,
            Err(e) => {
                log::warn!("Skipping {:?}: {}", file, e);
                continue;
            }
        };

        file_into_album(registry, &plate, &asset);

        if let Err(e) = store.insert(&asset.uri, &asset.id, category, &plate) {
            log::error!(
                "Saving {:?} failed after {} photos were saved: {}",
                file,
                saved_count,
                e
            );
            if let Err(cleanup) = registry.delete_assets(std::slice::from_ref(&asset.id)) {
                log::warn!("Could not remove unrecorded asset {}: {}", asset.id, cleanup);
            }
            return Err(e.into());
        }
        saved_count += 1;
    }

    log::info!("Saved {} of {} photos in {}", saved_count, files.len(), plate);

    Ok(saved_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::FakeRegistry;

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate("  ab123cd ", 3).unwrap(), "AB123CD");
        assert!(matches!(normalize_plate(" ab ", 3), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_single_main_photo_is_primary() {
        let store = PhotoStore::open_in_memory().unwrap();
        let registry = FakeRegistry::default();

        let saved = save_photos(
            &store,
            &registry,
            &[PathBuf::from("/camera/1.jpg")],
            "ab123cd",
            true,
            3,
        )
        .unwrap();

        assert_eq!(saved, 1);
        let photos = store.list_by_plate("AB123CD").unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].category, PhotoCategory::PrimaryPlate);
        assert_eq!(photos[0].asset_id, "asset-1");
        assert_eq!(photos[0].image_uri, "library://asset-1");
        assert_eq!(registry.album("AB123CD"), vec!["asset-1".to_string()]);
    }

    #[test]
    fn test_batch_photos_are_details_and_share_album() {
        let store = PhotoStore::open_in_memory().unwrap();
        let registry = FakeRegistry::default();
        let files = vec![PathBuf::from("/camera/1.jpg"), PathBuf::from("/camera/2.jpg")];

        let saved = save_photos(&store, &registry, &files, "AB123CD", true, 3).unwrap();

        assert_eq!(saved, 2);
        let photos = store.list_by_plate("AB123CD").unwrap();
        assert!(photos.iter().all(|p| p.category == PhotoCategory::DetailShot));
        assert_eq!(
            registry.album("AB123CD"),
            vec!["asset-1".to_string(), "asset-2".to_string()]
        );
    }

    #[test]
    fn test_failed_asset_is_skipped_and_batch_continues() {
        let store = PhotoStore::open_in_memory().unwrap();
        let registry = FakeRegistry::default();
        registry.fail_create_for("/camera/bad.jpg");
        let files = vec![
            PathBuf::from("/camera/1.jpg"),
            PathBuf::from("/camera/bad.jpg"),
            PathBuf::from("/camera/3.jpg"),
        ];

        let saved = save_photos(&store, &registry, &files, "AB123CD", false, 3).unwrap();

        assert_eq!(saved, 2);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_store_failure_stops_batch_and_removes_unrecorded_asset() {
        let store = PhotoStore::open_in_memory().unwrap();
        let registry = FakeRegistry::default();
        registry.blank_uri_for("/camera/2.jpg");
        let files = vec![
            PathBuf::from("/camera/1.jpg"),
            PathBuf::from("/camera/2.jpg"),
            PathBuf::from("/camera/3.jpg"),
        ];

        let result = save_photos(&store, &registry, &files, "AB123CD", false, 3);

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(registry.deleted(), vec!["asset-2".to_string()]);
        assert_eq!(registry.list_asset_ids().unwrap(), vec!["asset-1".to_string()]);
    }

    #[test]
    fn test_album_failure_does_not_block_insert() {
        let store = PhotoStore::open_in_memory().unwrap();
        let registry = FakeRegistry::default();
        registry.fail_albums();

        let saved = save_photos(
            &store,
            &registry,
            &[PathBuf::from("/camera/1.jpg")],
            "AB123CD",
            true,
            3,
        )
        .unwrap();

        assert_eq!(saved, 1);
        assert_eq!(store.list_by_plate("AB123CD").unwrap().len(), 1);
    }

    #[test]
    fn test_short_plate_saves_nothing() {
        let store = PhotoStore::open_in_memory().unwrap();
        let registry = FakeRegistry::default();

        let result = save_photos(
            &store,
            &registry,
            &[PathBuf::from("/camera/1.jpg")],
            "a ",
            true,
            3,
        );

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.count().unwrap(), 0);
        assert!(registry.list_asset_ids().unwrap().is_empty());
    }

    #[test]
    fn test_suggest_plate_ignores_empty_fallback() {
        struct Noise;
        impl TextRecognizer for Noise {
            fn recognize(
                &self,
                _image: &Path,
            ) -> Result<crate::models::RecognizedText, AppError> {
                Ok(crate::models::RecognizedText {
                    text: "...".to_string(),
                    blocks: vec![crate::models::recognized_text::TextBlock {
                        text: "...".to_string(),
                    }],
                })
            }
        }

        assert_eq!(suggest_plate(&Noise, Path::new("/camera/1.jpg")), None);
    }
}
