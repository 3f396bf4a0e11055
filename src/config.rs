use std::{env, path::PathBuf};

use tracing::info;

use crate::compress::ArchiveOptions;
use crate::naming::{DEFAULT_EXTENSION, DEFAULT_INSTALLER};

pub const PUBLIC_ROOT_VAR: &str = "CHECKIN_PUBLIC_ROOT";
pub const UPLOAD_PREFIX_VAR: &str = "CHECKIN_UPLOAD_PREFIX";

/// Where uploaded photos live and how downloaded ones are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadConfig {
    /// Directory photo URLs are resolved against.
    pub public_root: PathBuf,
    /// Only photo URLs under this prefix can be downloaded.
    pub upload_prefix: String,
    pub default_installer: String,
    pub default_extension: String,
    /// Options of the archives built for downloads.
    pub archive_options: ArchiveOptions,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            public_root: PathBuf::from("public"),
            upload_prefix: "temp-photos/".to_owned(),
            default_installer: DEFAULT_INSTALLER.to_owned(),
            default_extension: DEFAULT_EXTENSION.to_owned(),
            archive_options: ArchiveOptions::default(),
        }
    }
}

impl DownloadConfig {
    /// Defaults overridden by `CHECKIN_PUBLIC_ROOT` and `CHECKIN_UPLOAD_PREFIX`.
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            public_root: load(PUBLIC_ROOT_VAR)
                .map(PathBuf::from)
                .unwrap_or(default.public_root),
            upload_prefix: load(UPLOAD_PREFIX_VAR).unwrap_or(default.upload_prefix),
            ..default
        }
    }

    pub fn public_root(mut self, public_root: impl Into<PathBuf>) -> Self {
        self.public_root = public_root.into();
        self
    }

    pub fn upload_prefix(mut self, upload_prefix: impl Into<String>) -> Self {
        self.upload_prefix = upload_prefix.into();
        self
    }

    pub fn default_installer(mut self, installer: impl Into<String>) -> Self {
        self.default_installer = installer.into();
        self
    }

    pub fn default_extension(mut self, extension: impl Into<String>) -> Self {
        self.default_extension = extension.into();
        self
    }

    pub fn archive_options(mut self, options: ArchiveOptions) -> Self {
        self.archive_options = options;
        self
    }
}

fn load(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_owned()),
        _ => {
            info!("{key} not set, using default");
            None
        }
    }
}
