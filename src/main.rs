//! Command line front end: pack photos the way the download endpoint does, list archives, and
//! read photo geotags.

mod cli;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use checkin_archive::config::DownloadConfig;
use checkin_archive::download::{prepare_download, DownloadRequest};
use checkin_archive::exif::read_gps;
use checkin_archive::photos::FsPhotoStore;
use checkin_archive::uncompress::ArchiveReader;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Pack {
            urls,
            installer,
            timestamp,
            root,
            output,
        } => pack(urls, installer, timestamp, root, output).await,
        Command::List { archive, verbose } => list(&archive, verbose),
        Command::Gps { photos } => gps(&photos).await,
    }
}

async fn pack(
    urls: Vec<String>,
    installer: Option<String>,
    timestamp: Option<String>,
    root: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut config = DownloadConfig::from_env();
    if let Some(root) = root {
        config = config.public_root(root);
    }

    let mut request = DownloadRequest::new(urls);
    request.installer = installer;
    request.timestamp = timestamp;

    let store = FsPhotoStore::new(&config.public_root);
    let archive = prepare_download(&request, &store, &config).await?;

    let output = output.unwrap_or_else(|| PathBuf::from(&archive.file_name));
    tokio::fs::write(&output, &archive.bytes)
        .await
        .with_context(|| format!("cannot write {}", output.display()))?;

    println!(
        "{}: {} photos, {} bytes",
        output.display(),
        archive.entries,
        archive.bytes.len()
    );

    Ok(())
}

fn list(path: &Path, verbose: bool) -> Result<()> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let reader = ArchiveReader::new(BufReader::new(file))?;

    if verbose {
        print!("{}", reader);
        return Ok(());
    }

    println!("{:>10}  {:>8}  {:>19}  Name", "Length", "CRC-32", "Modified");
    println!("{}", "-".repeat(70));

    let mut total = 0u64;
    for entry in reader.entries() {
        total += u64::from(entry.uncompressed_size);
        println!(
            "{:>10}  {:08x}  {}  {}",
            entry.uncompressed_size,
            entry.crc32,
            entry.last_modified(),
            entry.file_name()
        );
    }

    println!("{}", "-".repeat(70));
    println!("{:>10}  {:>8}  {:>19}  {} files", total, "", "", reader.len());

    Ok(())
}

async fn gps(photos: &[PathBuf]) -> Result<()> {
    for path in photos {
        let jpeg = tokio::fs::read(path)
            .await
            .with_context(|| format!("cannot read {}", path.display()))?;

        match read_gps(&jpeg) {
            Some(position) => println!(
                "{}: {:.6}, {:.6}",
                path.display(),
                position.latitude,
                position.longitude
            ),
            None => println!("{}: no GPS data", path.display()),
        }
    }

    Ok(())
}
