use super::async_wrapper::AsyncWriteWrapper;

use crate::compress::common::SubZipArchiveData;
use crate::compress::ArchiveOptions;
use crate::error::ArchiveError;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// A zip archive written into an [`AsyncWrite`] sink.
///
/// Create a zip archive using [`new`](Self::new()) or [`with_options`](Self::with_options()),
/// append files one by one using the [`append`](Self::append()) function, then write the central
/// directory with the [`finalize`](Self::finalize()) function.
///
/// Pairs well with [`tokio::io::duplex`] to stream an archive as an HTTP response body while it
/// is being assembled.
pub struct ZipArchive<W: AsyncWrite + Unpin> {
    sink: AsyncWriteWrapper<W>,
    data: SubZipArchiveData,
}

impl<W: AsyncWrite + Unpin> ZipArchive<W> {
    /// Create a new zip archive stamped with the current local time.
    pub fn new(sink: W) -> Self {
        Self::with_options(sink, ArchiveOptions::default())
    }

    pub fn with_options(sink: W, options: ArchiveOptions) -> Self {
        Self {
            sink: AsyncWriteWrapper::new(sink),
            data: SubZipArchiveData::new(options.last_modified_time.resolve()),
        }
    }

    /// Get archive current total bytes written.
    pub fn get_archive_size(&self) -> u64 {
        self.sink.get_written_bytes_count()
    }

    /// Append a new entry using the provided name and payload as [`AsyncRead`] object.
    ///
    /// # Arguments
    /// * `file_name` - The name of the archive entry
    /// * `payload` -  The entry's content
    pub async fn append<R>(&mut self, file_name: &str, payload: &mut R) -> Result<(), ArchiveError>
    where
        R: AsyncRead + Unpin,
    {
        let mut data = Vec::new();
        payload.read_to_end(&mut data).await?;
        self.append_bytes(file_name.as_bytes(), &data).await
    }

    /// Append a new entry from an in-memory payload.
    pub async fn append_bytes(
        &mut self,
        file_name: &[u8],
        data: &[u8],
    ) -> Result<(), ArchiveError> {
        let file_header = self.data.add_entry(file_name, data)?;

        self.sink.write_all(file_header.buffer()).await?;
        self.sink.write_all(data).await?;

        Ok(())
    }

    /// Finalize the archive by writing the necessary metadata to the end of the archive.
    ///
    /// Returns the archive size (bytes) and the [`AsyncWrite`] object passed at creation. The sink
    /// is flushed but not shut down.
    pub async fn finalize(mut self) -> Result<(u64, W), ArchiveError> {
        let central_directory = self.data.build_central_directory()?;

        self.sink.write_all(central_directory.buffer()).await?;
        self.sink.flush().await?;

        let archive_size = self.sink.get_written_bytes_count();
        debug_assert_eq!(archive_size, self.data.archive_size());

        Ok((archive_size, self.sink.retrieve_writer()))
    }
}
