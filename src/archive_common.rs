use crate::constants::{
    CENTRAL_DIRECTORY_END_SIGNATURE, CENTRAL_DIRECTORY_ENTRY_SIGNATURE,
    LOCAL_FILE_HEADER_SIGNATURE,
};
use crate::error::ArchiveError;
use crate::types::ArchiveFileEntry;

/// A little-endian record buffer.
#[derive(Debug, Default)]
pub struct ArchiveDescriptor {
    buffer: Vec<u8>,
}

impl ArchiveDescriptor {
    pub fn new(capacity: u64) -> ArchiveDescriptor {
        ArchiveDescriptor {
            buffer: Vec::with_capacity(capacity as usize),
        }
    }

    pub fn write_u16(&mut self, val: u16) {
        self.buffer.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_u32(&mut self, val: u32) {
        self.buffer.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_bytes(&mut self, val: &[u8]) {
        self.buffer.extend_from_slice(val);
    }

    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }
}

/// Local file header, immediately followed by the file name.
pub fn write_local_file_header(descriptor: &mut ArchiveDescriptor, entry: &ArchiveFileEntry) {
    descriptor.write_u32(LOCAL_FILE_HEADER_SIGNATURE);
    descriptor.write_u16(entry.version_needed);
    descriptor.write_u16(entry.general_purpose_flags);
    descriptor.write_u16(entry.compression_method);
    descriptor.write_u16(entry.last_mod_file_time);
    descriptor.write_u16(entry.last_mod_file_date);
    descriptor.write_u32(entry.crc32);
    descriptor.write_u32(entry.compressed_size);
    descriptor.write_u32(entry.uncompressed_size);
    descriptor.write_u16(entry.file_name_len());
    descriptor.write_u16(0); // extra field length
    descriptor.write_bytes(&entry.file_name_as_bytes);
}

/// Central directory file header, immediately followed by the file name.
pub fn write_central_directory_file_header(
    descriptor: &mut ArchiveDescriptor,
    entry: &ArchiveFileEntry,
) {
    descriptor.write_u32(CENTRAL_DIRECTORY_ENTRY_SIGNATURE);
    descriptor.write_u16(entry.version_made_by);
    descriptor.write_u16(entry.version_needed);
    descriptor.write_u16(entry.general_purpose_flags);
    descriptor.write_u16(entry.compression_method);
    descriptor.write_u16(entry.last_mod_file_time);
    descriptor.write_u16(entry.last_mod_file_date);
    descriptor.write_u32(entry.crc32);
    descriptor.write_u32(entry.compressed_size);
    descriptor.write_u32(entry.uncompressed_size);
    descriptor.write_u16(entry.file_name_len());
    descriptor.write_u16(0); // extra field length
    descriptor.write_u16(0); // file comment length
    descriptor.write_u16(0); // disk number start
    descriptor.write_u16(0); // internal file attributes
    descriptor.write_u32(0); // external file attributes
    descriptor.write_u32(entry.offset);
    descriptor.write_bytes(&entry.file_name_as_bytes);
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CentralDirectoryEnd {
    pub number_of_this_disk: u16,
    pub number_of_the_disk_with_central_directory: u16,
    pub total_number_of_entries_on_this_disk: u16,
    pub total_number_of_entries_in_the_central_directory: u16,
    pub central_directory_size: u32,
    pub offset_of_start_of_central_directory: u32,
    pub archive_comment: Vec<u8>,
}

impl CentralDirectoryEnd {
    pub fn new(entries: u16, central_directory_size: u32, central_directory_offset: u32) -> Self {
        Self {
            total_number_of_entries_on_this_disk: entries,
            total_number_of_entries_in_the_central_directory: entries,
            central_directory_size,
            offset_of_start_of_central_directory: central_directory_offset,
            ..Default::default()
        }
    }

    pub fn create_end_of_central_directory(&self, descriptor: &mut ArchiveDescriptor) {
        descriptor.write_u32(CENTRAL_DIRECTORY_END_SIGNATURE);
        descriptor.write_u16(self.number_of_this_disk);
        descriptor.write_u16(self.number_of_the_disk_with_central_directory);
        descriptor.write_u16(self.total_number_of_entries_on_this_disk);
        descriptor.write_u16(self.total_number_of_entries_in_the_central_directory);
        descriptor.write_u32(self.central_directory_size);
        descriptor.write_u32(self.offset_of_start_of_central_directory);
        descriptor.write_u16(self.archive_comment.len() as u16);
        descriptor.write_bytes(&self.archive_comment);
    }
}

/// Bounds-checked little-endian cursor over an in-memory record.
#[derive(Debug)]
pub struct ArchiveDescriptorReader<'a> {
    stream: &'a [u8],
    index: usize,
}

macro_rules! read_type {
    ($self:expr, $typ:ty) => {{
        let bytes = $self.take(::std::mem::size_of::<$typ>())?;
        let mut read = [0u8; ::std::mem::size_of::<$typ>()];
        read.copy_from_slice(bytes);
        Ok(<$typ>::from_le_bytes(read))
    }};
}

impl<'a> ArchiveDescriptorReader<'a> {
    pub fn new(stream: &'a [u8]) -> Self {
        Self { stream, index: 0 }
    }

    pub fn get_index(&self) -> usize {
        self.index
    }

    pub fn read_u16(&mut self) -> Result<u16, ArchiveError> {
        read_type!(self, u16)
    }

    pub fn read_u32(&mut self) -> Result<u32, ArchiveError> {
        read_type!(self, u32)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, ArchiveError> {
        self.take(len).map(<[u8]>::to_vec)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ArchiveError> {
        let upper_bound = self.index + len;
        let stream = self.stream;
        let bytes = stream.get(self.index..upper_bound).ok_or_else(|| {
            ArchiveError::BadArchiveStructure(format!(
                "record truncated: {} bytes wanted at {} in a {} bytes record",
                len,
                self.index,
                stream.len()
            ))
        })?;
        self.index = upper_bound;
        Ok(bytes)
    }
}
