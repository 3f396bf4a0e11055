use thiserror::Error;

/// Errors raised while writing or reading an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("bad archive structure: {0}")]
    BadArchiveStructure(String),

    #[error("unexpected signature {actual:#x} at offset {offset}, expected {expected:#x}")]
    UnexpectedSignature {
        offset: u64,
        actual: u32,
        expected: u32,
    },

    #[error("the compression method code '{0}' is not supported")]
    UnsupportedCompressionMethod(u16),

    #[error("CRC-32 mismatch for '{name}' (stored: {stored:#010x}, computed: {computed:#010x})")]
    Crc32Mismatch {
        name: String,
        stored: u32,
        computed: u32,
    },

    #[error("entry index {0} is out of bounds")]
    EntryIndexOutOfBounds(usize),

    #[error("entry '{name}' is {size} bytes, over the 4 GiB limit of a classic archive")]
    EntryTooLarge { name: String, size: u64 },

    #[error("entry name is {0} bytes, over the 65535 bytes limit")]
    NameTooLong(usize),

    #[error("{0} entries exceed the limit of a classic archive")]
    TooManyEntries(usize),

    #[error("archive offset {0} exceeds the 4 GiB limit of a classic archive")]
    ArchiveTooLarge(u64),
}
