use std::fs::File;

use checkin_archive::compress::std::archive::ZipArchive;
use checkin_archive::compress::tokio::archive::ZipArchive as AsyncZipArchive;
use checkin_archive::compress::{ZipArchiveBuilder, ZipEntry};
use checkin_archive::error::ArchiveError;
use checkin_archive::uncompress::ArchiveReader;

mod common;
use common::fixed_options;
use common::std::{create_new_clean_file, out_path, MockReader};
use common::tokio::MockAsyncReader;

#[test]
fn std_archive_to_file() -> Result<(), ArchiveError> {
    let out_file = create_new_clean_file("std_archive_to_file.zip");
    let mut archive = ZipArchive::with_options(out_file, fixed_options());

    archive.append("crew-1.jpg", &mut b"first photo".as_ref())?;
    archive.append("crew-2.jpg", &mut MockReader::new(100_000))?;
    archive.append_bytes(b"crew-3.jpg", b"")?;

    let (archive_size, _out_file) = archive.finalize()?;

    let in_file = File::open(out_path("std_archive_to_file.zip"))?;
    assert_eq!(in_file.metadata()?.len(), archive_size);

    let mut archive_read = ArchiveReader::new(in_file)?;
    println!("{}", archive_read);

    assert_eq!(
        archive_read
            .central_directory_end()
            .total_number_of_entries_in_the_central_directory,
        3
    );

    let files = archive_read.read_all()?;
    assert_eq!(files[0], ("crew-1.jpg".to_owned(), b"first photo".to_vec()));
    assert_eq!(files[1].1, vec![b'0'; 100_000]);
    assert_eq!(files[2], ("crew-3.jpg".to_owned(), Vec::new()));

    Ok(())
}

#[tokio::test]
async fn tokio_archive_matches_builder() -> Result<(), ArchiveError> {
    let mut archive = AsyncZipArchive::with_options(Vec::new(), fixed_options());

    archive
        .append("crew-1.jpg", &mut MockAsyncReader::new(20_000))
        .await?;
    archive.append_bytes(b"crew-2.jpg", b"second").await?;

    let (archive_size, written) = archive.finalize().await?;

    let built = ZipArchiveBuilder::with_options(fixed_options()).build(&[
        ZipEntry::new("crew-1.jpg", vec![b'0'; 20_000]),
        ZipEntry::new("crew-2.jpg", b"second".to_vec()),
    ])?;

    assert_eq!(archive_size, built.len() as u64);
    assert_eq!(written, built);

    Ok(())
}

#[tokio::test]
async fn tokio_archive_over_duplex() -> Result<(), ArchiveError> {
    use tokio::io::AsyncReadExt;

    let (w, mut r) = tokio::io::duplex(64);

    let writer = tokio::spawn(async move {
        let mut archive = AsyncZipArchive::with_options(w, fixed_options());
        archive.append_bytes(b"a.jpg", b"AAAAA").await?;
        archive.append_bytes(b"b.jpg", b"").await?;
        archive.finalize().await.map(|(size, _)| size)
    });

    let mut streamed = Vec::new();
    r.read_to_end(&mut streamed).await?;
    let archive_size = writer.await.unwrap()?;

    assert_eq!(streamed.len() as u64, archive_size);
    assert_eq!(
        common::extract_with_zip(&streamed),
        vec![
            ("a.jpg".to_owned(), b"AAAAA".to_vec()),
            ("b.jpg".to_owned(), Vec::new())
        ]
    );

    Ok(())
}
