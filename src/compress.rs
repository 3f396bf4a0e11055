//! Writing store-only (uncompressed) Zip archives.
//!
//! The archive layout is always:
//!
//! | Part | Count |
//! |------|-------|
//! | Local file header + file name + file data | one per entry |
//! | Central directory file header + file name | one per entry |
//! | End of central directory record | one |
//!
//! Every entry of an archive shares the same date and time, resolved once when the archive is
//! created from [`ArchiveOptions::last_modified_time`].
//!
//! Three writers produce byte-identical output for the same entries and date:
//! * [`ZipArchiveBuilder`] assembles a whole archive in memory,
//! * [`std::archive::ZipArchive`] writes into a [`::std::io::Write`],
//! * [`tokio::archive::ZipArchive`] writes into a [`::tokio::io::AsyncWrite`].

pub mod std;
pub mod tokio;

mod common;

use crate::archive_common::ArchiveDescriptor;
use crate::constants::{
    CENTRAL_DIRECTORY_ENTRY_BASE_SIZE, END_OF_CENTRAL_DIRECTORY_SIZE, FILE_HEADER_BASE_SIZE,
};
use crate::error::ArchiveError;
use crate::types::FileDateTime;
use common::SubZipArchiveData;

/// A named payload to be stored in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipEntry {
    /// Archive-internal file name, written verbatim.
    pub name: Vec<u8>,
    pub data: Vec<u8>,
}

impl ZipEntry {
    pub fn new(name: impl Into<Vec<u8>>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// Archive wide options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// The date and time written for every entry. Defaults to [`FileDateTime::Now`].
    pub last_modified_time: FileDateTime,
}

impl ArchiveOptions {
    /// Set the last modified time shared by all the entries
    pub fn last_modified_time(mut self, mod_time: FileDateTime) -> ArchiveOptions {
        self.last_modified_time = mod_time;
        self
    }
}

/// Assembles a complete archive in memory.
///
/// ```
/// use checkin_archive::compress::{ArchiveOptions, ZipArchiveBuilder, ZipEntry};
/// use checkin_archive::types::FileDateTime;
///
/// let entries = vec![
///     ZipEntry::new("a.jpg", b"AAAAA".to_vec()),
///     ZipEntry::new("b.jpg", Vec::<u8>::new()),
/// ];
///
/// let builder = ZipArchiveBuilder::with_options(
///     ArchiveOptions::default().last_modified_time(FileDateTime::Zero),
/// );
/// let archive = builder.build(&entries).unwrap();
///
/// assert_eq!(&archive[0..4], b"PK\x03\x04");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiveBuilder {
    options: ArchiveOptions,
}

impl ZipArchiveBuilder {
    /// A builder stamping entries with the current local time.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ArchiveOptions) -> Self {
        Self { options }
    }

    /// Build the archive. The build date is read once and shared by every entry.
    ///
    /// The only failures are the limits of the classic (non Zip64) format.
    #[tracing::instrument(skip_all, fields(entries = entries.len()))]
    pub fn build(&self, entries: &[ZipEntry]) -> Result<Vec<u8>, ArchiveError> {
        let capacity = archive_size(entries.iter().map(|e| (&e.name, e.data.len())));
        let mut data = SubZipArchiveData::new(self.options.last_modified_time.resolve());
        let mut archive = ArchiveDescriptor::new(capacity);

        for entry in entries {
            let local_header = data.add_entry(&entry.name, &entry.data)?;
            archive.write_bytes(local_header.buffer());
            archive.write_bytes(&entry.data);
        }

        let trailer = data.build_central_directory()?;
        archive.write_bytes(trailer.buffer());

        tracing::debug!(size = archive.len(), "archive built");

        Ok(archive.finish())
    }
}

/// Build an archive stamped with the current local time.
pub fn build_archive(entries: &[ZipEntry]) -> Result<Vec<u8>, ArchiveError> {
    ZipArchiveBuilder::new().build(entries)
}

/// Calculate the exact size of an archive based on the names and sizes of files.
///
/// ## Example
///
/// ```
/// use checkin_archive::compress::archive_size;
///
/// assert_eq!(
///     archive_size([
///         ("file1.txt", b"hello\n".len()),
///         ("file2.txt", b"world\n".len()),
///     ]),
///     222,
/// );
/// ```
pub fn archive_size<N, I>(files: I) -> u64
where
    N: AsRef<[u8]>,
    I: IntoIterator<Item = (N, usize)>,
{
    files
        .into_iter()
        .map(|(name, size)| {
            let name_len = name.as_ref().len() as u64;
            FILE_HEADER_BASE_SIZE
                + name_len
                + size as u64
                + CENTRAL_DIRECTORY_ENTRY_BASE_SIZE
                + name_len
        })
        .sum::<u64>()
        + END_OF_CENTRAL_DIRECTORY_SIZE
}
