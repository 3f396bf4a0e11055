use std::mem::size_of;

pub const FILE_HEADER_BASE_SIZE: u64 = (7 * size_of::<u16>() + 4 * size_of::<u32>()) as u64;
pub const CENTRAL_DIRECTORY_ENTRY_BASE_SIZE: u64 =
    (11 * size_of::<u16>() + 6 * size_of::<u32>()) as u64;
pub const END_OF_CENTRAL_DIRECTORY_SIZE: u64 = (5 * size_of::<u16>() + 3 * size_of::<u32>()) as u64;

pub const LOCAL_FILE_HEADER_SIGNATURE: u32 = 0x04034b50;
pub const CENTRAL_DIRECTORY_ENTRY_SIGNATURE: u32 = 0x02014b50;
pub const CENTRAL_DIRECTORY_END_SIGNATURE: u32 = 0x06054b50;

/// Version 2.0, MS-DOS host: the lowest version that knows about stored entries and directories.
pub const VERSION_MADE_BY: u16 = 20;
pub const VERSION_NEEDED_TO_EXTRACT: u16 = 20;

pub const STORE_COMPRESSION_METHOD: u16 = 0;

/// The classic records hold entry counts on 16 bits; `0xFFFF` is reserved for Zip64.
pub const MAX_ENTRY_COUNT: usize = u16::MAX as usize - 1;
