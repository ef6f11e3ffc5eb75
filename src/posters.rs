//! Disk-backed poster storage.
//!
//! Posters are plain files under a single root directory, keyed by file
//! name. Creation uses `create_new` so a name collision is detected
//! atomically instead of silently overwriting someone else's poster.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tokio::{fs, io::AsyncWriteExt};

use crate::error::{CatalogError, CatalogResult};

#[derive(Clone, Debug)]
pub struct PosterStore {
    root: PathBuf,
}

impl PosterStore {
    pub async fn open(root: impl Into<PathBuf>) -> CatalogResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub async fn exists(&self, name: &str) -> bool {
        fs::try_exists(self.root.join(name)).await.unwrap_or(false)
    }

    /// Stores `bytes` under exactly `name`. Fails with `ArtifactCollision`
    /// if the name is already taken.
    pub async fn store(&self, name: &str, bytes: &[u8]) -> CatalogResult<String> {
        let name = safe_name(name)?;
        if !self.write_new(name, bytes).await? {
            return Err(CatalogError::ArtifactCollision(name.to_string()));
        }
        Ok(name.to_string())
    }

    /// Stores `bytes` under a fresh name derived from `desired`, appending
    /// a numeric suffix until a free name is found. The record's previous
    /// poster name is never reused, even after its file is gone, so the
    /// derived URL always changes when the bytes do.
    pub async fn store_replacement(
        &self,
        desired: &str,
        previous: &str,
        bytes: &[u8],
    ) -> CatalogResult<String> {
        let desired = safe_name(desired)?;
        let (stem, ext) = match desired.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
            _ => (desired, None),
        };

        let mut candidate = desired.to_string();
        let mut n = 2;
        loop {
            if candidate != previous && self.write_new(&candidate, bytes).await? {
                return Ok(candidate);
            }
            candidate = match ext {
                Some(ext) => format!("{stem}_{n}.{ext}"),
                None => format!("{stem}_{n}"),
            };
            n += 1;
        }
    }

    /// Removes `name`. An already-absent file is not an error; the point is
    /// that the file is gone afterwards.
    pub async fn delete(&self, name: &str) -> CatalogResult<()> {
        match fs::remove_file(self.root.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn read(&self, name: &str) -> CatalogResult<Option<Vec<u8>>> {
        let name = safe_name(name)?;
        match fs::read(self.root.join(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Creates the file only if it does not exist yet. Returns false on a
    /// name collision.
    async fn write_new(&self, name: &str, bytes: &[u8]) -> CatalogResult<bool> {
        let open = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.root.join(name))
            .await;
        match open {
            Ok(mut file) => {
                file.write_all(bytes).await?;
                file.flush().await?;
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Poster names must stay inside the root directory: a single path
/// component, no traversal.
fn safe_name(name: &str) -> CatalogResult<&str> {
    let ok = !name.is_empty()
        && !name.contains(['/', '\\'])
        && name != "."
        && name != ".."
        && Path::new(name).components().count() == 1;
    if !ok {
        return Err(CatalogError::UnsafeName(name.to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    async fn open_store() -> (PosterStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = PosterStore::open(dir.path()).await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn store_then_exists_then_read() {
        let (store, _dir) = open_store().await;
        let name = store.store("inception.jpg", b"jpeg bytes").await.unwrap();
        assert_eq!(name, "inception.jpg");
        assert!(store.exists("inception.jpg").await);
        assert_eq!(store.read("inception.jpg").await.unwrap().unwrap(), b"jpeg bytes");
    }

    #[tokio::test]
    async fn duplicate_name_collides() {
        let (store, _dir) = open_store().await;
        store.store("a.jpg", b"one").await.unwrap();
        let err = store.store("a.jpg", b"two").await.unwrap_err();
        assert!(matches!(err, CatalogError::ArtifactCollision(name) if name == "a.jpg"));
        // the original bytes are untouched
        assert_eq!(store.read("a.jpg").await.unwrap().unwrap(), b"one");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (store, _dir) = open_store().await;
        store.store("a.jpg", b"one").await.unwrap();
        store.delete("a.jpg").await.unwrap();
        assert!(!store.exists("a.jpg").await);
        store.delete("a.jpg").await.unwrap();
    }

    #[tokio::test]
    async fn replacement_never_reuses_the_previous_name() {
        let (store, _dir) = open_store().await;
        store.store("inception.jpg", b"v1").await.unwrap();
        store.delete("inception.jpg").await.unwrap();

        // the name is free on disk but still belongs to the old poster
        let name = store.store_replacement("inception.jpg", "inception.jpg", b"v2").await.unwrap();
        assert_eq!(name, "inception_2.jpg");
    }

    #[tokio::test]
    async fn replacement_skips_taken_names() {
        let (store, _dir) = open_store().await;
        store.store("b.jpg", b"other movie").await.unwrap();
        let name = store.store_replacement("b.jpg", "old.png", b"new").await.unwrap();
        assert_eq!(name, "b_2.jpg");
        assert_eq!(store.read("b.jpg").await.unwrap().unwrap(), b"other movie");
    }

    #[tokio::test]
    async fn replacement_without_extension_suffixes_the_whole_name() {
        let (store, _dir) = open_store().await;
        let name = store.store_replacement("poster", "poster", b"new").await.unwrap();
        assert_eq!(name, "poster_2");
    }

    #[tokio::test]
    async fn traversal_names_are_rejected() {
        let (store, _dir) = open_store().await;
        for bad in ["", "..", "../a.jpg", "a/b.jpg", "a\\b.jpg"] {
            let err = store.store(bad, b"x").await.unwrap_err();
            assert!(matches!(err, CatalogError::UnsafeName(_)), "{bad:?} was accepted");
        }
    }
}
