use crate::error::AppError;
use crate::services::asset_service::AssetRegistry;
use plate_gallery::PhotoStore;

// The library asset is always removed before the record. If the second step
// never happens the leftover is a record whose image is gone, never a library
// asset that nothing points to.

/// Deletes one photo from the asset library and then from the store.
///
/// Unknown ids are a no-op. If the library refuses the delete the record is kept.
pub fn delete_photo(
    store: &PhotoStore,
    registry: &dyn AssetRegistry,
    id: i64,
) -> Result<(), AppError> {
    let Some(photo) = store.get(id)? else {
        log::debug!("Photo {} not found, nothing to delete", id);
        return Ok(());
    };

    if photo.has_external_asset() {
        registry.delete_assets(std::slice::from_ref(&photo.asset_id))?;
    }

    store.delete_record(id)?;
    log::info!("Deleted photo {} of {}", id, photo.plate_text);

    Ok(())
}

/// Deletes a whole plate folder, library assets first.
///
/// Only the records read at the start are removed. Returns how many.
pub fn delete_folder(
    store: &PhotoStore,
    registry: &dyn AssetRegistry,
    plate: &str,
) -> Result<usize, AppError> {
    let photos = store.list_by_plate(plate)?;
    let record_ids: Vec<i64> = photos.iter().map(|p| p.id).collect();
    let asset_ids: Vec<String> = photos
        .into_iter()
        .filter(|p| p.has_external_asset())
        .map(|p| p.asset_id)
        .collect();

    if !asset_ids.is_empty() {
        registry.delete_assets(&asset_ids)?;
    }

    // only the records whose assets are gone; later inserts keep theirs
    let removed = store.delete_records(&record_ids)?;
    log::info!("Deleted folder {} ({} photos)", plate, removed);

    Ok(removed)
}
