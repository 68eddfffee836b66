//! In-memory asset library for service tests

use crate::error::AppError;
use crate::services::asset_service::{Album, AssetHandle, AssetRegistry};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Default)]
struct FakeState {
    next_id: usize,
    assets: Vec<String>,
    albums: HashMap<String, Vec<String>>,
    deleted: Vec<String>,
    fail_create: Vec<PathBuf>,
    blank_uri: Vec<PathBuf>,
    fail_albums: bool,
    fail_deletes: bool,
}

#[derive(Default)]
pub struct FakeRegistry {
    state: Mutex<FakeState>,
}

impl FakeRegistry {
    pub fn fail_create_for(&self, file: &str) {
        self.state.lock().unwrap().fail_create.push(PathBuf::from(file));
    }

    /// Hands out an empty uri for `file`, which the store refuses
    pub fn blank_uri_for(&self, file: &str) {
        self.state.lock().unwrap().blank_uri.push(PathBuf::from(file));
    }

    pub fn fail_albums(&self) {
        self.state.lock().unwrap().fail_albums = true;
    }

    pub fn fail_deletes(&self) {
        self.state.lock().unwrap().fail_deletes = true;
    }

    pub fn album(&self, name: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .albums
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted.clone()
    }

    /// Registers an asset that no record points to
    pub fn add_untracked_asset(&self, id: &str) {
        self.state.lock().unwrap().assets.push(id.to_string());
    }
}

impl AssetRegistry for FakeRegistry {
    fn create_asset(&self, file: &Path) -> Result<AssetHandle, AppError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_create.iter().any(|f| f == file) {
            return Err(AppError::ExternalAsset(format!("cannot import {:?}", file)));
        }

        state.next_id += 1;
        let id = format!("asset-{}", state.next_id);
        state.assets.push(id.clone());

        let uri = if state.blank_uri.iter().any(|f| f == file) {
            String::new()
        } else {
            format!("library://{}", id)
        };

        Ok(AssetHandle { uri, id })
    }

    fn delete_assets(&self, ids: &[String]) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_deletes {
            return Err(AppError::ExternalAsset("delete refused".to_string()));
        }

        state.assets.retain(|id| !ids.contains(id));
        state.deleted.extend(ids.iter().cloned());
        Ok(())
    }

    fn get_album(&self, name: &str) -> Result<Option<Album>, AppError> {
        let state = self.state.lock().unwrap();
        if state.fail_albums {
            return Err(AppError::ExternalAsset("albums unavailable".to_string()));
        }

        Ok(state.albums.contains_key(name).then(|| Album {
            name: name.to_string(),
        }))
    }

    fn create_album(&self, name: &str, asset: &AssetHandle) -> Result<Album, AppError> {
        let mut state = self.state.lock().unwrap();
        state.albums.insert(name.to_string(), vec![asset.id.clone()]);
        Ok(Album {
            name: name.to_string(),
        })
    }

    fn add_assets_to_album(&self, assets: &[AssetHandle], album: &Album) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        let members = state.albums.entry(album.name.clone()).or_default();
        members.extend(assets.iter().map(|a| a.id.clone()));
        Ok(())
    }

    fn list_asset_ids(&self) -> Result<Vec<String>, AppError> {
        Ok(self.state.lock().unwrap().assets.clone())
    }
}
