//! File-backed asset store for imported images and audio.
//!
//! Pages and audio tracks reference bytes by asset id; the store owns the
//! files under an app-data directory. Display URLs for the webview come
//! from [`AssetStore::asset_url`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::utils::get_local_file_url;

/// Extensions the import dialogs accept.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "m4a", "aac"];

/// Stores asset bytes as `<uuid>.<ext>` files under a root directory.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Store rooted in the platform app-data directory.
    pub fn default_location() -> io::Result<Self> {
        Self::new(app_data_root().join("assets"))
    }

    /// The cache root for derived data (waveform peaks).
    pub fn cache_root(&self) -> PathBuf {
        self.root.join(".cache")
    }

    /// Commit bytes to the store. The extension comes from `hint_name`;
    /// unknown extensions are rejected before anything touches disk.
    pub fn save_asset(&self, bytes: &[u8], hint_name: &str) -> Result<Uuid, String> {
        if bytes.is_empty() {
            return Err("Cannot store an empty asset".to_string());
        }
        let extension = Path::new(hint_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !IMAGE_EXTENSIONS.contains(&extension.as_str())
            && !AUDIO_EXTENSIONS.contains(&extension.as_str())
        {
            return Err(format!("Unsupported file type: {:?}", hint_name));
        }

        let id = Uuid::new_v4();
        let path = self.root.join(format!("{}.{}", id, extension));
        fs::write(&path, bytes).map_err(|err| err.to_string())?;
        log::info!("Stored asset {} ({} bytes)", path.display(), bytes.len());
        Ok(id)
    }

    /// Copy an already-on-disk file into the store (import dialogs).
    pub fn import_file(&self, source: &Path) -> Result<Uuid, String> {
        let bytes = fs::read(source).map_err(|err| err.to_string())?;
        let name = source
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("import");
        self.save_asset(&bytes, name)
    }

    /// Resolve an asset id to its file path, if the asset exists.
    pub fn asset_path(&self, id: Uuid) -> Option<PathBuf> {
        let prefix = id.to_string();
        let entries = fs::read_dir(&self.root).ok()?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(|stem| stem == prefix)
                .unwrap_or(false)
            {
                return Some(path);
            }
        }
        None
    }

    /// Display URL the webview can load.
    pub fn asset_url(&self, id: Uuid) -> Option<String> {
        self.asset_path(id).map(|path| get_local_file_url(&path))
    }

    /// Pixel dimensions of a stored image asset.
    pub fn image_dimensions(&self, id: Uuid) -> Option<(u32, u32)> {
        let path = self.asset_path(id)?;
        image::image_dimensions(&path).ok()
    }

    /// Delete a single asset's file.
    pub fn remove_asset(&self, id: Uuid) {
        if let Some(path) = self.asset_path(id) {
            if let Err(err) = fs::remove_file(&path) {
                log::warn!("Failed to delete asset {}: {}", path.display(), err);
            }
        }
    }

    /// Delete every stored asset not in `referenced` (project reset / cleanup).
    pub fn remove_unreferenced(&self, referenced: &[Uuid]) -> usize {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return 0;
        };
        let mut deleted = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let keep = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|stem| Uuid::parse_str(stem).ok())
                .map(|id| referenced.contains(&id))
                .unwrap_or(true);
            if !keep {
                if fs::remove_file(&path).is_ok() {
                    deleted += 1;
                }
            }
        }
        if deleted > 0 {
            log::info!("Cleanup removed {} orphaned assets", deleted);
        }
        deleted
    }
}

/// Platform app-data root for this application.
pub fn app_data_root() -> PathBuf {
    let base = std::env::var("LOCALAPPDATA")
        .or_else(|_| std::env::var("APPDATA"))
        .or_else(|_| std::env::var("XDG_DATA_HOME"))
        .map(PathBuf::from)
        .or_else(|_| {
            std::env::var("HOME").map(|home| PathBuf::from(home).join(".local").join("share"))
        })
        .unwrap_or_else(|_| std::env::temp_dir());
    base.join("SegiTelep")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (AssetStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("segitelep-assets-{}", Uuid::new_v4()));
        (AssetStore::new(&dir).unwrap(), dir)
    }

    #[test]
    fn test_save_and_resolve() {
        let (store, dir) = temp_store();
        let id = store.save_asset(b"fake image bytes", "slide.png").unwrap();
        let path = store.asset_path(id).unwrap();
        assert_eq!(path.extension().unwrap(), "png");
        assert_eq!(fs::read(&path).unwrap(), b"fake image bytes");
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let (store, dir) = temp_store();
        assert!(store.save_asset(b"bytes", "script.exe").is_err());
        assert!(store.save_asset(b"", "slide.png").is_err());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_remove_unreferenced_keeps_live_assets() {
        let (store, dir) = temp_store();
        let live = store.save_asset(b"live", "a.png").unwrap();
        let orphan = store.save_asset(b"orphan", "b.png").unwrap();
        let deleted = store.remove_unreferenced(&[live]);
        assert_eq!(deleted, 1);
        assert!(store.asset_path(live).is_some());
        assert!(store.asset_path(orphan).is_none());
        fs::remove_dir_all(&dir).ok();
    }
}
