#![allow(dead_code)]
pub mod std;
pub mod tokio;

use ::std::io::{Cursor, Read};

use checkin_archive::compress::ArchiveOptions;
use checkin_archive::types::{DosDateTime, FileDateTime};

pub const PACKAGE_NAME: &str = "checkin-archive";

/// Options with a fixed date, so that two builds are byte identical.
pub fn fixed_options() -> ArchiveOptions {
    ArchiveOptions::default()
        .last_modified_time(FileDateTime::Custom(DosDateTime::new(2024, 1, 2, 3, 4, 6)))
}

/// Extract every entry with the `zip` crate, in archive order.
pub fn extract_with_zip(archive: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut zip =
        zip::ZipArchive::new(Cursor::new(archive)).expect("the zip crate rejected the archive");

    (0..zip.len())
        .map(|i| {
            let mut file = zip.by_index(i).unwrap();
            assert_eq!(file.compression(), zip::CompressionMethod::Stored);

            let mut data = Vec::new();
            file.read_to_end(&mut data).unwrap();
            (file.name().to_owned(), data)
        })
        .collect()
}

/// Every offset at which `signature` occurs in `archive`.
pub fn find_signatures(archive: &[u8], signature: u32) -> Vec<usize> {
    let signature = signature.to_le_bytes();
    archive
        .windows(4)
        .enumerate()
        .filter(|(_, window)| *window == signature)
        .map(|(offset, _)| offset)
        .collect()
}

pub fn read_u16(archive: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([archive[offset], archive[offset + 1]])
}

pub fn read_u32(archive: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        archive[offset],
        archive[offset + 1],
        archive[offset + 2],
        archive[offset + 3],
    ])
}
