use crate::error::AppError;
use crate::services::asset_service::AssetRegistry;
use plate_gallery::{PhotoRecord, PhotoStore};
use serde::Serialize;
use std::collections::HashSet;

/// Drift between the store and the asset library
#[derive(Debug, Default, Clone, Serialize, PartialEq)]
pub struct ReconcileReport {
    /// Records whose library asset no longer exists
    pub dangling_records: Vec<PhotoRecord>,
    /// Library assets no record refers to
    pub orphaned_assets: Vec<String>,
}

impl ReconcileReport {
    pub fn is_consistent(&self) -> bool {
        self.dangling_records.is_empty() && self.orphaned_assets.is_empty()
    }
}

/// Compares store records with library assets. Only reports, never deletes.
pub fn reconcile(
    store: &PhotoStore,
    registry: &dyn AssetRegistry,
) -> Result<ReconcileReport, AppError> {
    let asset_ids: HashSet<String> = registry.list_asset_ids()?.into_iter().collect();
    let records = store.list_all()?;

    let referenced: HashSet<&str> = records
        .iter()
        .filter(|r| r.has_external_asset())
        .map(|r| r.asset_id.as_str())
        .collect();

    let mut orphaned_assets: Vec<String> = asset_ids
        .iter()
        .filter(|id| !referenced.contains(id.as_str()))
        .cloned()
        .collect();
    orphaned_assets.sort();

    let dangling_records: Vec<PhotoRecord> = records
        .into_iter()
        .filter(|r| r.has_external_asset() && !asset_ids.contains(&r.asset_id))
        .collect();

    let report = ReconcileReport {
        dangling_records,
        orphaned_assets,
    };

    if report.is_consistent() {
        log::info!("Store and asset library are consistent");
    } else {
        log::warn!(
            "Found {} records without asset and {} assets without record",
            report.dangling_records.len(),
            report.orphaned_assets.len()
        );
    }

    Ok(report)
}
