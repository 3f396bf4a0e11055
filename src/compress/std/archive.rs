use super::write_wrapper::WriteWrapper;

use crate::compress::common::SubZipArchiveData;
use crate::compress::ArchiveOptions;
use crate::error::ArchiveError;
use std::io::{Read, Write};

/// A zip archive written into a [`Write`] sink.
///
/// Create a zip archive using [`new`](Self::new()) or [`with_options`](Self::with_options()),
/// append files one by one using the [`append`](Self::append()) function, then write the central
/// directory with the [`finalize`](Self::finalize()) function.
///
/// Each payload is read entirely before its header is written: the sink never needs to seek
/// and no data descriptor is emitted.
pub struct ZipArchive<W: Write> {
    sink: WriteWrapper<W>,
    data: SubZipArchiveData,
}

impl<W: Write> ZipArchive<W> {
    /// Create a new zip archive stamped with the current local time.
    pub fn new(sink: W) -> Self {
        Self::with_options(sink, ArchiveOptions::default())
    }

    pub fn with_options(sink: W, options: ArchiveOptions) -> Self {
        Self {
            sink: WriteWrapper::new(sink),
            data: SubZipArchiveData::new(options.last_modified_time.resolve()),
        }
    }

    /// Get archive current total bytes written.
    pub fn get_archive_size(&self) -> u64 {
        self.sink.get_written_bytes_count()
    }

    /// Append a new entry using the provided name and payload as [`Read`] object.
    ///
    /// # Arguments
    /// * `file_name` - The name of the archive entry
    /// * `payload` -  The entry's content
    pub fn append<R>(&mut self, file_name: &str, payload: &mut R) -> Result<(), ArchiveError>
    where
        R: Read,
    {
        let mut data = Vec::new();
        payload.read_to_end(&mut data)?;
        self.append_bytes(file_name.as_bytes(), &data)
    }

    /// Append a new entry from an in-memory payload.
    pub fn append_bytes(&mut self, file_name: &[u8], data: &[u8]) -> Result<(), ArchiveError> {
        let file_header = self.data.add_entry(file_name, data)?;

        self.sink.write_all(file_header.buffer())?;
        self.sink.write_all(data)?;

        Ok(())
    }

    /// Finalize the archive by writing the necessary metadata to the end of the archive.
    ///
    /// Returns the archive size (bytes) and the [Write] object passed at creation.
    pub fn finalize(mut self) -> Result<(u64, W), ArchiveError> {
        let central_directory = self.data.build_central_directory()?;

        self.sink.write_all(central_directory.buffer())?;
        self.sink.flush()?;

        let archive_size = self.sink.get_written_bytes_count();
        debug_assert_eq!(archive_size, self.data.archive_size());

        Ok((archive_size, self.sink.retrieve_writer()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compress::{ZipArchiveBuilder, ZipEntry};
    use crate::types::FileDateTime;

    #[test]
    fn same_bytes_as_builder() {
        let options = ArchiveOptions::default().last_modified_time(FileDateTime::Zero);

        let mut archive = ZipArchive::with_options(Vec::new(), options);
        archive.append("file1.txt", &mut b"hello\n".as_ref()).unwrap();
        archive.append("file2.txt", &mut b"world\n".as_ref()).unwrap();
        assert_eq!(archive.get_archive_size(), 2 * (30 + 9 + 6));

        let (size, written) = archive.finalize().unwrap();

        let built = ZipArchiveBuilder::with_options(options)
            .build(&[
                ZipEntry::new("file1.txt", b"hello\n".to_vec()),
                ZipEntry::new("file2.txt", b"world\n".to_vec()),
            ])
            .unwrap();

        assert_eq!(size, 222);
        assert_eq!(written, built);
    }
}
