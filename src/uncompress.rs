//! Reading back store-only Zip archives.
//!
//! The reader trusts the central directory: entries are listed from it and each payload is
//! located through the local header offset it records.

use crate::archive_common::ArchiveDescriptorReader;
pub use crate::archive_common::CentralDirectoryEnd;
use crate::constants::{
    CENTRAL_DIRECTORY_END_SIGNATURE, CENTRAL_DIRECTORY_ENTRY_SIGNATURE,
    END_OF_CENTRAL_DIRECTORY_SIZE, LOCAL_FILE_HEADER_SIGNATURE, STORE_COMPRESSION_METHOD,
};
use crate::crc;
use crate::error::ArchiveError;
use crate::types::ArchiveFileEntry;
use byteorder::{LittleEndian, ReadBytesExt};
use std::fmt::{Debug, Display};
use std::io::{Read, Seek, SeekFrom};

pub struct ArchiveReader<R>
where
    R: Read + Seek,
{
    reader: R,
    archive_length: u64,
    file_entries: Vec<ArchiveFileEntry>,
    central_directory_end: CentralDirectoryEnd,
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Locate the end of central directory record and parse the central directory.
    #[tracing::instrument(skip_all)]
    pub fn new(mut reader: R) -> Result<ArchiveReader<R>, ArchiveError> {
        let archive_length = reader.seek(SeekFrom::End(0))?;
        let central_directory_end =
            Self::find_central_directory_end(&mut reader, archive_length)?;
        let file_entries =
            Self::read_central_directory(&central_directory_end, &mut reader, archive_length)?;

        Ok(ArchiveReader {
            reader,
            archive_length,
            file_entries,
            central_directory_end,
        })
    }

    pub fn entries(&self) -> &[ArchiveFileEntry] {
        &self.file_entries
    }

    pub fn len(&self) -> usize {
        self.file_entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_entries.is_empty()
    }

    pub fn central_directory_end(&self) -> &CentralDirectoryEnd {
        &self.central_directory_end
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Read the payload of the entry at `index` and verify its CRC-32.
    pub fn read_entry(&mut self, index: usize) -> Result<Vec<u8>, ArchiveError> {
        let entry = self
            .file_entries
            .get(index)
            .ok_or(ArchiveError::EntryIndexOutOfBounds(index))?;

        if entry.compression_method != STORE_COMPRESSION_METHOD {
            return Err(ArchiveError::UnsupportedCompressionMethod(
                entry.compression_method,
            ));
        }

        let offset = entry.offset as u64;
        self.reader.seek(SeekFrom::Start(offset))?;

        let signature = self.reader.read_u32::<LittleEndian>()?;
        if signature != LOCAL_FILE_HEADER_SIGNATURE {
            return Err(ArchiveError::UnexpectedSignature {
                offset,
                actual: signature,
                expected: LOCAL_FILE_HEADER_SIGNATURE,
            });
        }

        // version, flags, method, time, date, crc and both sizes
        self.reader.seek(SeekFrom::Current(22))?;
        let file_name_len = self.reader.read_u16::<LittleEndian>()?;
        let extra_field_length = self.reader.read_u16::<LittleEndian>()?;
        self.reader.seek(SeekFrom::Current(
            file_name_len as i64 + extra_field_length as i64,
        ))?;

        let data_offset = self.reader.stream_position()?;
        let size = entry.compressed_size as u64;
        check_within(data_offset, size, self.archive_length, "entry data")?;

        let mut data = vec![0; size as usize];
        self.reader.read_exact(&mut data)?;

        let computed = crc::checksum(&data);
        if computed != entry.crc32 {
            return Err(ArchiveError::Crc32Mismatch {
                name: entry.file_name(),
                stored: entry.crc32,
                computed,
            });
        }

        Ok(data)
    }

    /// Read every entry as `(name, payload)`, in central directory order.
    pub fn read_all(&mut self) -> Result<Vec<(String, Vec<u8>)>, ArchiveError> {
        (0..self.file_entries.len())
            .map(|index| {
                let data = self.read_entry(index)?;
                Ok((self.file_entries[index].file_name(), data))
            })
            .collect()
    }

    fn find_central_directory_end(
        reader: &mut R,
        file_length: u64,
    ) -> Result<CentralDirectoryEnd, ArchiveError> {
        if file_length < END_OF_CENTRAL_DIRECTORY_SIZE {
            return Err(ArchiveError::BadArchiveStructure(
                "Archive too small".to_owned(),
            ));
        }

        // the record is followed by a comment of at most u16::MAX bytes
        let tail_length = file_length.min(END_OF_CENTRAL_DIRECTORY_SIZE + u16::MAX as u64);
        let tail_start = file_length - tail_length;
        reader.seek(SeekFrom::Start(tail_start))?;

        let mut tail = vec![0; tail_length as usize];
        reader.read_exact(&mut tail)?;

        let signature = CENTRAL_DIRECTORY_END_SIGNATURE.to_le_bytes();
        let last_candidate = tail.len() - END_OF_CENTRAL_DIRECTORY_SIZE as usize;
        let position = (0..=last_candidate)
            .rev()
            .find(|&p| tail[p..p + 4] == signature)
            .ok_or_else(|| {
                ArchiveError::BadArchiveStructure(
                    "end of central directory signature not found".to_owned(),
                )
            })?;

        tracing::debug!(offset = tail_start + position as u64, "end of central directory found");

        let mut indexer = ArchiveDescriptorReader::new(&tail[position + 4..]);
        let number_of_this_disk = indexer.read_u16()?;
        let number_of_the_disk_with_central_directory = indexer.read_u16()?;
        let total_number_of_entries_on_this_disk = indexer.read_u16()?;
        let total_number_of_entries_in_the_central_directory = indexer.read_u16()?;
        let central_directory_size = indexer.read_u32()?;
        let offset_of_start_of_central_directory = indexer.read_u32()?;
        let zip_file_comment_length = indexer.read_u16()?;
        let archive_comment = indexer.read_bytes(zip_file_comment_length as usize)?;

        Ok(CentralDirectoryEnd {
            number_of_this_disk,
            number_of_the_disk_with_central_directory,
            total_number_of_entries_on_this_disk,
            total_number_of_entries_in_the_central_directory,
            central_directory_size,
            offset_of_start_of_central_directory,
            archive_comment,
        })
    }

    fn read_central_directory(
        central_directory_end: &CentralDirectoryEnd,
        reader: &mut R,
        archive_length: u64,
    ) -> Result<Vec<ArchiveFileEntry>, ArchiveError> {
        let central_directory_offset =
            central_directory_end.offset_of_start_of_central_directory as u64;
        let central_directory_size = central_directory_end.central_directory_size as u64;
        check_within(
            central_directory_offset,
            central_directory_size,
            archive_length,
            "central directory",
        )?;
        reader.seek(SeekFrom::Start(central_directory_offset))?;

        let mut central_directory_buffer: Vec<u8> = vec![0; central_directory_size as usize];
        reader.read_exact(&mut central_directory_buffer)?;

        let entry_count = central_directory_end.total_number_of_entries_in_the_central_directory;
        let mut indexer = ArchiveDescriptorReader::new(&central_directory_buffer);
        let mut entries = Vec::with_capacity(entry_count as usize);

        for _ in 0..entry_count {
            let record_offset = central_directory_offset + indexer.get_index() as u64;
            let signature = indexer.read_u32()?;

            if signature != CENTRAL_DIRECTORY_ENTRY_SIGNATURE {
                return Err(ArchiveError::UnexpectedSignature {
                    offset: record_offset,
                    actual: signature,
                    expected: CENTRAL_DIRECTORY_ENTRY_SIGNATURE,
                });
            }

            let version_made_by = indexer.read_u16()?;
            let version_needed = indexer.read_u16()?;
            let general_purpose_flags = indexer.read_u16()?;
            let compression_method = indexer.read_u16()?;
            let last_mod_file_time = indexer.read_u16()?;
            let last_mod_file_date = indexer.read_u16()?;
            let crc32 = indexer.read_u32()?;
            let compressed_size = indexer.read_u32()?;
            let uncompressed_size = indexer.read_u32()?;
            let file_name_len = indexer.read_u16()?;
            let extra_field_length = indexer.read_u16()?;
            let file_comment_length = indexer.read_u16()?;
            let _file_disk_number = indexer.read_u16()?;
            let _internal_file_attributes = indexer.read_u16()?;
            let _external_file_attributes = indexer.read_u32()?;
            let offset = indexer.read_u32()?;
            let file_name_as_bytes = indexer.read_bytes(file_name_len as usize)?;

            // neither is written by this crate, other writers may add them
            indexer.read_bytes(extra_field_length as usize)?;
            indexer.read_bytes(file_comment_length as usize)?;

            entries.push(ArchiveFileEntry {
                version_made_by,
                version_needed,
                general_purpose_flags,
                compression_method,
                last_mod_file_time,
                last_mod_file_date,
                crc32,
                compressed_size,
                uncompressed_size,
                file_name_as_bytes,
                offset,
            });
        }

        Ok(entries)
    }
}

/// Fails unless `size` bytes at `offset` fit in the archive.
fn check_within(
    offset: u64,
    size: u64,
    archive_length: u64,
    what: &str,
) -> Result<(), ArchiveError> {
    match offset.checked_add(size) {
        Some(end) if end <= archive_length => Ok(()),
        _ => Err(ArchiveError::BadArchiveStructure(format!(
            "{} of {} bytes at offset {} runs past the end of a {} bytes archive",
            what, size, offset, archive_length
        ))),
    }
}

impl<R: Read + Seek> Debug for ArchiveReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveReader")
            .field("file_entries", &self.file_entries)
            .field("central_directory_end", &self.central_directory_end)
            .finish()
    }
}

impl<R: Read + Seek> Display for ArchiveReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let end = &self.central_directory_end;

        if end.archive_comment.is_empty() {
            writeln!(f, "There is no zipfile comment.")?;
        } else {
            writeln!(
                f,
                "The zipfile comment is {} bytes long and contains the following text:",
                end.archive_comment.len()
            )?;
            writeln!(f, "{}", String::from_utf8_lossy(&end.archive_comment))?;
        }
        writeln!(f)?;
        writeln!(f, "End-of-central-directory record:")?;
        writeln!(f, "-------------------------------")?;
        writeln!(
            f,
            "The central directory is {} bytes long, and its offset is {}.",
            end.central_directory_size, end.offset_of_start_of_central_directory
        )?;
        writeln!(
            f,
            "There are {} entries in the central directory.",
            end.total_number_of_entries_in_the_central_directory
        )?;

        for (i, entry) in self.file_entries.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "Central directory entry #{}", i + 1)?;
            writeln!(f, "---------------------------")?;
            write!(f, "{}", entry)?;
        }

        Ok(())
    }
}
