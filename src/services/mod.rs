pub mod asset_service;
pub mod delete_service;
pub mod import_service;
pub mod ocr_service;
pub mod reconcile_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use asset_service::FsAssetRegistry;
pub use ocr_service::SidecarRecognizer;
