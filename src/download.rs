//! Bulk download of a check-in's photos as one Zip archive.
//!
//! A request names photos by their public URL. Each URL under the upload prefix is fetched from
//! a [`PhotoStore`] and stored as `"<installer>-<position><ext>"`, where `<position>` is the one
//! based index of the URL in the request.

use std::io;

use serde::Deserialize;
use thiserror::Error;

use crate::compress::{ZipArchiveBuilder, ZipEntry};
use crate::config::DownloadConfig;
use crate::error::ArchiveError;
use crate::naming::{archive_file_name, entry_name, photo_extension_or, sanitize_installer_or};
use crate::photos::{downloadable_path, PhotoStore};

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("No photo URLs provided")]
    NoPhotoUrls,

    #[error("No downloadable files found")]
    NoDownloadableFiles,

    #[error("Failed to read photo '{path}': {source}")]
    Storage {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create download: {0}")]
    Archive(#[from] ArchiveError),
}

impl DownloadError {
    /// The HTTP status answered for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            DownloadError::MalformedPayload(_) | DownloadError::NoPhotoUrls => 400,
            DownloadError::NoDownloadableFiles => 404,
            DownloadError::Storage { .. } | DownloadError::Archive(_) => 500,
        }
    }

    /// JSON body: `{"error": "<message>"}`.
    pub fn body(&self) -> String {
        serde_json::json!({ "error": self.to_string() }).to_string()
    }
}

/// The wire form of a request, before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDownloadRequest {
    #[serde(default)]
    photo_urls: Option<serde_json::Value>,
    #[serde(default)]
    installer: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

/// A validated download request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Photo URLs by position. Items that were not strings are kept as `None` so that the
    /// following photos keep their position.
    pub photo_urls: Vec<Option<String>>,
    pub installer: Option<String>,
    pub timestamp: Option<String>,
}

impl DownloadRequest {
    pub fn new<I, S>(photo_urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            photo_urls: photo_urls.into_iter().map(|url| Some(url.into())).collect(),
            ..Default::default()
        }
    }

    pub fn installer(mut self, installer: impl Into<String>) -> Self {
        self.installer = Some(installer.into());
        self
    }

    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Validate a JSON body of the form
    /// `{"photoUrls": [..], "installer": "..", "timestamp": ".."}`.
    pub fn from_json(body: &[u8]) -> Result<Self, DownloadError> {
        let raw: RawDownloadRequest = serde_json::from_slice(body)?;

        let photo_urls = match raw.photo_urls {
            Some(serde_json::Value::Array(urls)) if !urls.is_empty() => urls
                .into_iter()
                .map(|url| match url {
                    serde_json::Value::String(url) => Some(url),
                    _ => None,
                })
                .collect(),
            _ => return Err(DownloadError::NoPhotoUrls),
        };

        Ok(Self {
            photo_urls,
            installer: raw.installer,
            timestamp: raw.timestamp,
        })
    }
}

/// A ready to send archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoArchive {
    pub file_name: String,
    pub entries: usize,
    pub bytes: Vec<u8>,
}

impl PhotoArchive {
    pub fn content_type(&self) -> &'static str {
        "application/zip"
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }
}

/// Collect the requested photos and archive them.
#[tracing::instrument(skip_all, fields(photos = request.photo_urls.len()))]
pub async fn prepare_download<S>(
    request: &DownloadRequest,
    store: &S,
    config: &DownloadConfig,
) -> Result<PhotoArchive, DownloadError>
where
    S: PhotoStore + ?Sized,
{
    let installer =
        sanitize_installer_or(request.installer.as_deref(), &config.default_installer);

    let entries = collect_entries(request, store, config, &installer).await?;
    if entries.is_empty() {
        return Err(DownloadError::NoDownloadableFiles);
    }

    let bytes = ZipArchiveBuilder::with_options(config.archive_options).build(&entries)?;
    let file_name = archive_file_name(
        &installer,
        request.timestamp.as_deref(),
        chrono::Utc::now().timestamp_millis(),
    );

    tracing::info!(
        file_name = %file_name,
        entries = entries.len(),
        size = bytes.len(),
        "download ready"
    );

    Ok(PhotoArchive {
        file_name,
        entries: entries.len(),
        bytes,
    })
}

/// Parse a JSON body and archive the photos it names.
pub async fn handle_download<S>(
    body: &[u8],
    store: &S,
    config: &DownloadConfig,
) -> Result<PhotoArchive, DownloadError>
where
    S: PhotoStore + ?Sized,
{
    let request = DownloadRequest::from_json(body)?;
    prepare_download(&request, store, config).await
}

async fn collect_entries<S>(
    request: &DownloadRequest,
    store: &S,
    config: &DownloadConfig,
    installer: &str,
) -> Result<Vec<ZipEntry>, DownloadError>
where
    S: PhotoStore + ?Sized,
{
    let mut entries = Vec::with_capacity(request.photo_urls.len());

    for (index, url) in request.photo_urls.iter().enumerate() {
        let Some(url) = url else {
            continue;
        };

        let Some(path) = downloadable_path(url, &config.upload_prefix) else {
            tracing::debug!(url = %url, "skipping photo outside of the upload directory");
            continue;
        };

        let data = store
            .fetch(path)
            .await
            .map_err(|source| DownloadError::Storage {
                path: path.to_owned(),
                source,
            })?;

        let extension = photo_extension_or(path, &config.default_extension);
        entries.push(ZipEntry::new(entry_name(installer, index, &extension), data));
    }

    Ok(entries)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::photos::MemoryPhotoStore;

    #[test]
    fn parse_request() {
        let body = br#"{"photoUrls": ["/temp-photos/a.jpg", 3, "b.png"], "installer": "Crew 1"}"#;

        let request = DownloadRequest::from_json(body).unwrap();

        assert_eq!(
            request.photo_urls,
            vec![Some("/temp-photos/a.jpg".to_owned()), None, Some("b.png".to_owned())]
        );
        assert_eq!(request.installer.as_deref(), Some("Crew 1"));
        assert_eq!(request.timestamp, None);
    }

    #[test]
    fn missing_or_empty_urls() {
        for body in [
            &br#"{}"#[..],
            br#"{"photoUrls": []}"#,
            br#"{"photoUrls": "a.jpg"}"#,
            br#"{"photoUrls": null}"#,
        ] {
            let error = DownloadRequest::from_json(body).unwrap_err();
            assert!(matches!(error, DownloadError::NoPhotoUrls));
            assert_eq!(error.status_code(), 400);
        }
    }

    #[test]
    fn malformed_payloads() {
        for body in [
            &b"not json"[..],
            br#"{"photoUrls": ["a.jpg"], "timestamp": {}}"#,
            br#"{"photoUrls": ["a.jpg"], "installer": 7}"#,
        ] {
            let error = DownloadRequest::from_json(body).unwrap_err();
            assert!(matches!(error, DownloadError::MalformedPayload(_)));
            assert_eq!(error.status_code(), 400);
        }
    }

    #[test]
    fn error_body_is_json() {
        let body = DownloadError::NoDownloadableFiles.body();
        assert_eq!(body, r#"{"error":"No downloadable files found"}"#);
    }

    #[tokio::test]
    async fn names_keep_request_positions() {
        let store = MemoryPhotoStore::new()
            .with_photo("temp-photos/a.jpg", b"a".to_vec())
            .with_photo("temp-photos/c", b"c".to_vec());
        let request = DownloadRequest {
            photo_urls: vec![
                Some("/temp-photos/a.jpg".to_owned()),
                Some("/elsewhere/b.jpg".to_owned()),
                Some("temp-photos/c".to_owned()),
            ],
            installer: Some("Jo Smith".to_owned()),
            timestamp: Some("2024-01-02 03:04".to_owned()),
        };

        let entries = collect_entries(&request, &store, &DownloadConfig::default(), "Jo_Smith")
            .await
            .unwrap();

        assert_eq!(
            entries,
            vec![
                ZipEntry::new("Jo_Smith-1.jpg", b"a".to_vec()),
                ZipEntry::new("Jo_Smith-3.jpg", b"c".to_vec()),
            ]
        );

        let archive = prepare_download(&request, &store, &DownloadConfig::default())
            .await
            .unwrap();
        assert_eq!(archive.file_name, "Jo_Smith-202401020304.zip");
        assert_eq!(archive.entries, 2);
        assert_eq!(
            archive.content_disposition(),
            "attachment; filename=\"Jo_Smith-202401020304.zip\""
        );
        assert_eq!(archive.content_type(), "application/zip");
    }

    #[tokio::test]
    async fn nothing_downloadable() {
        let store = MemoryPhotoStore::new();
        let request = DownloadRequest::new(["/public/a.jpg", "../temp-photos/b.jpg"]);

        let error = prepare_download(&request, &store, &DownloadConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(error, DownloadError::NoDownloadableFiles));
        assert_eq!(error.status_code(), 404);
    }

    #[tokio::test]
    async fn storage_failure() {
        let store = MemoryPhotoStore::new();
        let request = DownloadRequest::new(["/temp-photos/gone.jpg"]);

        let error = prepare_download(&request, &store, &DownloadConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(error, DownloadError::Storage { .. }));
        assert_eq!(error.status_code(), 500);
    }
}
