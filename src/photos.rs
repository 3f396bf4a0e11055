//! Where photo bytes come from before they are archived.

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

/// A source of uploaded photos, addressed by a path relative to the public root.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    async fn fetch(&self, relative_path: &str) -> io::Result<Vec<u8>>;
}

/// Photos stored on the local file system under a public directory.
#[derive(Debug, Clone)]
pub struct FsPhotoStore {
    root: PathBuf,
}

impl FsPhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl PhotoStore for FsPhotoStore {
    async fn fetch(&self, relative_path: &str) -> io::Result<Vec<u8>> {
        let path = self.root.join(relative_path);
        tracing::debug!(path = %path.display(), "reading photo");
        tokio::fs::read(path).await
    }
}

/// Photos held in memory, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct MemoryPhotoStore {
    photos: HashMap<String, Vec<u8>>,
}

impl MemoryPhotoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, relative_path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.photos.insert(relative_path.into(), data.into());
    }

    pub fn with_photo(
        mut self,
        relative_path: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        self.insert(relative_path, data);
        self
    }
}

#[async_trait]
impl PhotoStore for MemoryPhotoStore {
    async fn fetch(&self, relative_path: &str) -> io::Result<Vec<u8>> {
        self.photos.get(relative_path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no photo at '{}'", relative_path),
            )
        })
    }
}

/// The store path of a photo URL, or `None` when the URL may not be downloaded.
///
/// Leading slashes are dropped, the remainder must start with `upload_prefix` and must not climb
/// out of it with `..`.
///
/// ```
/// use checkin_archive::photos::downloadable_path;
///
/// assert_eq!(
///     downloadable_path("/temp-photos/a.jpg", "temp-photos/"),
///     Some("temp-photos/a.jpg")
/// );
/// assert_eq!(downloadable_path("/etc/passwd", "temp-photos/"), None);
/// ```
pub fn downloadable_path<'a>(url: &'a str, upload_prefix: &str) -> Option<&'a str> {
    let relative_path = url.trim_start_matches('/');

    if !relative_path.starts_with(upload_prefix) {
        return None;
    }

    let climbs = Path::new(relative_path)
        .components()
        .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));
    if climbs {
        return None;
    }

    Some(relative_path)
}
