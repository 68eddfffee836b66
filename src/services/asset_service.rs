use crate::error::AppError;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Handle of an asset in the external library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetHandle {
    pub id: String,
    pub uri: String,
}

/// Named album in the external library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub name: String,
}

/// Device-level media library that owns the image bytes
pub trait AssetRegistry {
    /// Moves `file` into the library and returns its handle
    fn create_asset(&self, file: &Path) -> Result<AssetHandle, AppError>;
    /// Deletes the given assets. Unknown ids are ignored.
    fn delete_assets(&self, ids: &[String]) -> Result<(), AppError>;
    fn get_album(&self, name: &str) -> Result<Option<Album>, AppError>;
    /// Creates an album containing `asset`
    fn create_album(&self, name: &str, asset: &AssetHandle) -> Result<Album, AppError>;
    fn add_assets_to_album(&self, assets: &[AssetHandle], album: &Album) -> Result<(), AppError>;
    fn list_asset_ids(&self) -> Result<Vec<String>, AppError>;
}

fn asset_error(context: &str, e: std::io::Error) -> AppError {
    AppError::ExternalAsset(format!("{}: {}", context, e))
}

/// Asset library kept in a plain directory.
///
/// Assets live in `<root>/assets/<uuid>.<ext>`, albums are manifest files
/// `<root>/albums/<name>.album` with one asset id per line.
#[derive(Debug, Clone)]
pub struct FsAssetRegistry {
    root: PathBuf,
}

impl FsAssetRegistry {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }

    fn albums_dir(&self) -> PathBuf {
        self.root.join("albums")
    }

    fn album_path(&self, name: &str) -> Result<PathBuf, AppError> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(AppError::ExternalAsset(format!(
                "Invalid album name: {:?}",
                name
            )));
        }
        Ok(self.albums_dir().join(format!("{}.album", name)))
    }

    fn read_album(&self, path: &Path) -> Result<Vec<String>, AppError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| asset_error("Cannot read album", e))?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    fn write_album(&self, path: &Path, ids: &[String]) -> Result<(), AppError> {
        std::fs::create_dir_all(self.albums_dir())
            .map_err(|e| asset_error("Cannot create albums directory", e))?;
        let mut content = ids.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        std::fs::write(path, content).map_err(|e| asset_error("Cannot write album", e))
    }

    /// Files in the assets directory as (id, path)
    fn asset_files(&self) -> Result<Vec<(String, PathBuf)>, AppError> {
        let dir = self.assets_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&dir)
            .map_err(|e| asset_error("Cannot list assets", e))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .map(|id| (id.to_string(), path.clone()))
            })
            .collect();

        Ok(entries)
    }
}

impl AssetRegistry for FsAssetRegistry {
    fn create_asset(&self, file: &Path) -> Result<AssetHandle, AppError> {
        if !file.is_file() {
            return Err(AppError::ExternalAsset(format!(
                "Original file not found: {}",
                file.display()
            )));
        }

        let id = Uuid::new_v4().to_string();
        let ext = file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_else(|| "jpg".to_string());

        let assets_dir = self.assets_dir();
        std::fs::create_dir_all(&assets_dir)
            .map_err(|e| asset_error("Cannot create assets directory", e))?;
        let new_path = assets_dir.join(format!("{}.{}", id, ext));

        log::debug!("Moving {:?} to {:?}", file, new_path);

        // rename fails across filesystems, fall back to copy + remove
        if std::fs::rename(file, &new_path).is_err() {
            std::fs::copy(file, &new_path).map_err(|e| asset_error("Cannot copy photo", e))?;
            if let Err(e) = std::fs::remove_file(file) {
                log::warn!("Could not remove original {:?}: {}", file, e);
            }
        }

        Ok(AssetHandle {
            id,
            uri: new_path.to_string_lossy().to_string(),
        })
    }

    fn delete_assets(&self, ids: &[String]) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }

        for (id, path) in self.asset_files()? {
            if ids.contains(&id) {
                std::fs::remove_file(&path).map_err(|e| asset_error("Cannot delete asset", e))?;
                log::debug!("Deleted asset {}", id);
            }
        }

        let albums_dir = self.albums_dir();
        if albums_dir.exists() {
            let manifests: Vec<PathBuf> = std::fs::read_dir(&albums_dir)
                .map_err(|e| asset_error("Cannot list albums", e))?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|e| e == "album"))
                .collect();

            for manifest in manifests {
                let members = self.read_album(&manifest)?;
                let kept: Vec<String> = members
                    .iter()
                    .filter(|id| !ids.contains(id))
                    .cloned()
                    .collect();
                if kept.len() != members.len() {
                    self.write_album(&manifest, &kept)?;
                }
            }
        }

        Ok(())
    }

    fn get_album(&self, name: &str) -> Result<Option<Album>, AppError> {
        let path = self.album_path(name)?;
        Ok(path.is_file().then(|| Album {
            name: name.to_string(),
        }))
    }

    fn create_album(&self, name: &str, asset: &AssetHandle) -> Result<Album, AppError> {
        let path = self.album_path(name)?;
        self.write_album(&path, std::slice::from_ref(&asset.id))?;
        log::info!("Created album {}", name);

        Ok(Album {
            name: name.to_string(),
        })
    }

    fn add_assets_to_album(&self, assets: &[AssetHandle], album: &Album) -> Result<(), AppError> {
        let path = self.album_path(&album.name)?;
        let mut members = self.read_album(&path)?;
        for asset in assets {
            if !members.contains(&asset.id) {
                members.push(asset.id.clone());
            }
        }
        self.write_album(&path, &members)
    }

    fn list_asset_ids(&self) -> Result<Vec<String>, AppError> {
        Ok(self.asset_files()?.into_iter().map(|(id, _)| id).collect())
    }
}

#[cfg(test)]
impl FsAssetRegistry {
    pub fn album_members(&self, name: &str) -> Vec<String> {
        let path = self.album_path(name).unwrap();
        self.read_album(&path).unwrap()
    }
}
