use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "checkin-archive")]
#[command(version)]
#[command(about = "Bundle check-in photos into Zip archives", long_about = None)]
#[command(after_help = "Examples:\n  \
  checkin-archive pack --installer 'Jo Smith' /temp-photos/a.jpg /temp-photos/b.jpg\n  \
  checkin-archive list Jo_Smith-202401020304.zip\n  \
  checkin-archive gps public/temp-photos/a.jpg")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Archive uploaded photos, as the download endpoint does
    Pack {
        /// Photo URLs, resolved against the public root
        #[arg(value_name = "URL", required = true)]
        urls: Vec<String>,

        /// Installer name used for the entry and archive names
        #[arg(long)]
        installer: Option<String>,

        /// Check-in timestamp used for the archive name
        #[arg(long)]
        timestamp: Option<String>,

        /// Public root (default: $CHECKIN_PUBLIC_ROOT or ./public)
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,

        /// Output file (default: the download file name, in the current directory)
        #[arg(short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print the central directory of an archive
    List {
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,

        /// Print every record field
        #[arg(short = 'v')]
        verbose: bool,
    },

    /// Print the EXIF GPS position of photos
    Gps {
        #[arg(value_name = "PHOTO", required = true)]
        photos: Vec<PathBuf>,
    },
}
