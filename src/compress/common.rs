use crate::archive_common::{
    write_central_directory_file_header, write_local_file_header, ArchiveDescriptor,
    CentralDirectoryEnd,
};
use crate::constants::{
    CENTRAL_DIRECTORY_ENTRY_BASE_SIZE, END_OF_CENTRAL_DIRECTORY_SIZE, FILE_HEADER_BASE_SIZE,
    MAX_ENTRY_COUNT,
};
use crate::crc;
use crate::error::ArchiveError;
use crate::types::{ArchiveFileEntry, DosDateTime};

/// Book-keeping shared by every archive writer: the entries written so far and the current
/// offset in the output.
#[derive(Debug)]
pub(crate) struct SubZipArchiveData {
    date_time: DosDateTime,
    files_info: Vec<ArchiveFileEntry>,
    archive_size: u64,
}

impl SubZipArchiveData {
    pub fn new(date_time: DosDateTime) -> Self {
        Self {
            date_time,
            files_info: Vec::new(),
            archive_size: 0,
        }
    }

    pub fn archive_size(&self) -> u64 {
        self.archive_size
    }

    /// Register an entry and return its local file header. The caller writes the header then
    /// `data`, in that order, at the current archive offset.
    pub fn add_entry(
        &mut self,
        file_name: &[u8],
        data: &[u8],
    ) -> Result<ArchiveDescriptor, ArchiveError> {
        if self.files_info.len() >= MAX_ENTRY_COUNT {
            return Err(ArchiveError::TooManyEntries(self.files_info.len() + 1));
        }

        if file_name.len() > u16::MAX as usize {
            return Err(ArchiveError::NameTooLong(file_name.len()));
        }

        let size = u32::try_from(data.len()).map_err(|_| ArchiveError::EntryTooLarge {
            name: String::from_utf8_lossy(file_name).into_owned(),
            size: data.len() as u64,
        })?;

        let offset = u32::try_from(self.archive_size)
            .map_err(|_| ArchiveError::ArchiveTooLarge(self.archive_size))?;

        let entry =
            ArchiveFileEntry::stored(file_name, self.date_time, crc::checksum(data), size, offset);

        let mut file_header =
            ArchiveDescriptor::new(FILE_HEADER_BASE_SIZE + file_name.len() as u64);
        write_local_file_header(&mut file_header, &entry);

        tracing::debug!(
            name = %entry.file_name(),
            offset,
            size,
            crc32 = entry.crc32,
            "entry added"
        );

        self.archive_size += file_header.len() as u64 + data.len() as u64;
        self.files_info.push(entry);

        Ok(file_header)
    }

    /// The central directory followed by the end of central directory record.
    pub fn build_central_directory(&mut self) -> Result<ArchiveDescriptor, ArchiveError> {
        let central_directory_offset = u32::try_from(self.archive_size)
            .map_err(|_| ArchiveError::ArchiveTooLarge(self.archive_size))?;

        let capacity = self
            .files_info
            .iter()
            .map(|entry| CENTRAL_DIRECTORY_ENTRY_BASE_SIZE + entry.file_name_len() as u64)
            .sum::<u64>()
            + END_OF_CENTRAL_DIRECTORY_SIZE;
        let mut central_directory = ArchiveDescriptor::new(capacity);

        for file_info in &self.files_info {
            write_central_directory_file_header(&mut central_directory, file_info);
        }

        let central_directory_size = central_directory.len() as u64;
        let end_offset = self.archive_size + central_directory_size;
        let central_directory_size = u32::try_from(central_directory_size)
            .map_err(|_| ArchiveError::ArchiveTooLarge(end_offset))?;

        // MAX_ENTRY_COUNT keeps the count inside 16 bits
        let entries = self.files_info.len() as u16;
        let end =
            CentralDirectoryEnd::new(entries, central_directory_size, central_directory_offset);
        end.create_end_of_central_directory(&mut central_directory);

        tracing::debug!(
            entries,
            central_directory_offset,
            central_directory_size,
            "central directory written"
        );

        self.archive_size += central_directory.len() as u64;

        Ok(central_directory)
    }
}
