//! # Plate Gallery
//!
//! Photo metadata store that groups vehicle photographs into virtual folders
//! keyed by license plate.
//!
//! This crate provides:
//! - Durable photo records in a SQLite `images` table
//! - Folder previews derived from the records (one per plate, newest cover)
//! - Plate, id and free-text queries
//!
//! ## Platform Separation
//!
//! The image bytes live in an external asset library owned by the host. This
//! crate only stores the asset id and uri; coordinating deletes with the
//! external library is the application's job.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use plate_gallery::{PhotoCategory, PhotoStore};
//!
//! let store = PhotoStore::open("/path/to/plates.db")?;
//! store.insert("file:///library/1.jpg", "asset-1", PhotoCategory::PrimaryPlate, "AA123BB")?;
//!
//! for folder in store.list_folders()? {
//!     println!("{} -> {}", folder.plate, folder.cover_image_uri);
//! }
//! ```

pub mod models;
pub mod schema;
pub mod service;

pub use models::{FolderPreview, PhotoCategory, PhotoRecord, UNKNOWN_PLATE};
pub use schema::init_plate_schema;
pub use service::{PhotoStore, PhotoStoreError};
