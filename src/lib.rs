//! Bulk photo download for jobsite check-ins.
//!
//! Installers attach photos to their check-ins. Office staff download all the photos of a
//! check-in at once, as a single ZIP archive. This crate covers that path:
//!
//! * [`compress`]: a store-only (no compression) ZIP writer. Photos are already compressed, so
//!   entries are written verbatim, each with its CRC-32.
//! * [`uncompress`]: a reader for the archives the writer produces.
//! * [`download`]: validation of a download request, collection of the photos from a
//!   [`photos::PhotoStore`], naming of the entries and of the archive.
//! * [`exif`]: the GPS position embedded in a JPEG, used to geotag a check-in from its first
//!   photo.
//! * [`naming`]: file name sanitization and URL slugs.
//!
//! The ZIP format implemented is the classic one, without Zip64 extensions, as described in
//! [PKWARE's APPNOTE.TXT v6.3.10](https://pkware.cachefly.net/webdocs/casestudies/APPNOTE.TXT)
//!
//! ## Examples
//!
//! ### In memory
//!
//!```rust
//! use checkin_archive::compress::{ZipArchiveBuilder, ZipEntry};
//! use checkin_archive::uncompress::ArchiveReader;
//! use std::io::Cursor;
//!
//! let entries = vec![
//!     ZipEntry::new("crew-1.jpg", b"first photo".to_vec()),
//!     ZipEntry::new("crew-2.jpg", b"second photo".to_vec()),
//! ];
//!
//! let archive = ZipArchiveBuilder::new().build(&entries).unwrap();
//!
//! let mut reader = ArchiveReader::new(Cursor::new(archive)).unwrap();
//! assert_eq!(reader.read_entry(1).unwrap(), b"second photo");
//!```
//!
//! ### [Actix](demos/actix.rs)
//!
//! Serve a check-in's photos as an attachment:
//!
//!```rust,no_run
//! use actix_web::{post, web, App, HttpResponse, HttpServer};
//! use checkin_archive::config::DownloadConfig;
//! use checkin_archive::download::handle_download;
//! use checkin_archive::photos::FsPhotoStore;
//!
//! #[post("/api/download-photos")]
//! async fn download_photos(body: web::Bytes) -> HttpResponse {
//!     let config = DownloadConfig::from_env();
//!     let store = FsPhotoStore::new(&config.public_root);
//!
//!     match handle_download(&body, &store, &config).await {
//!         Ok(archive) => HttpResponse::Ok()
//!             .insert_header(("Content-Type", archive.content_type()))
//!             .insert_header(("Content-Disposition", archive.content_disposition()))
//!             .body(archive.bytes),
//!         Err(e) => HttpResponse::build(
//!             actix_web::http::StatusCode::from_u16(e.status_code()).unwrap(),
//!         )
//!         .content_type("application/json")
//!         .body(e.body()),
//!     }
//! }
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     HttpServer::new(|| App::new().service(download_photos))
//!         .bind(("127.0.0.1", 8081))?
//!         .run()
//!         .await
//! }
//! ```

mod constants;

mod archive_common;
pub mod compress;
pub mod config;
pub mod crc;
pub mod download;
pub mod error;
pub mod exif;
pub mod naming;
pub mod photos;
pub mod types;
pub mod uncompress;

pub use compress::{build_archive, ZipArchiveBuilder, ZipEntry};
pub use error::ArchiveError;
