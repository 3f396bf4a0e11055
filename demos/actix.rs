use actix_web::http::header::ContentDisposition;
use actix_web::http::StatusCode;
use actix_web::{get, post, web, App, HttpResponse, HttpServer};
use checkin_archive::compress::tokio::archive::ZipArchive;
use checkin_archive::config::DownloadConfig;
use checkin_archive::download::handle_download;
use checkin_archive::error::ArchiveError;
use checkin_archive::photos::{downloadable_path, FsPhotoStore, PhotoStore};
use tokio::io::{duplex, DuplexStream};

use tokio_util::io::ReaderStream;

struct AppState {
    config: DownloadConfig,
    store: FsPhotoStore,
}

/// Same body as the check-in page sends:
/// `{"photoUrls": [..], "installer": "..", "timestamp": ".."}`
#[post("/api/download-photos")]
async fn download_photos(state: web::Data<AppState>, body: web::Bytes) -> HttpResponse {
    match handle_download(&body, &state.store, &state.config).await {
        Ok(archive) => HttpResponse::Ok()
            .insert_header(("Content-Type", archive.content_type()))
            .insert_header(("Content-Disposition", archive.content_disposition()))
            .body(archive.bytes),
        Err(e) => {
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            HttpResponse::build(status)
                .content_type("application/json")
                .body(e.body())
        }
    }
}

/// Streams every photo of a directory under the upload prefix while the archive is being built.
#[get("/api/download-folder/{folder}")]
async fn download_folder(state: web::Data<AppState>, folder: web::Path<String>) -> HttpResponse {
    let requested = format!("{}{}", state.config.upload_prefix, folder.into_inner());
    let relative_dir = match downloadable_path(&requested, &state.config.upload_prefix) {
        Some(relative_dir) => relative_dir.to_owned(),
        None => return HttpResponse::NotFound().finish(),
    };

    let (w, r) = duplex(4096);
    let store = state.store.clone();
    let options = state.config.archive_options;

    tokio::spawn(async move {
        let archive = ZipArchive::with_options(w, options);
        if let Err(e) = write_folder(archive, &store, &relative_dir).await {
            tracing::error!(folder = %relative_dir, error = %e, "folder download aborted");
        }
    });

    HttpResponse::Ok()
        .insert_header(("Content-Type", "application/zip"))
        .insert_header(ContentDisposition::attachment("photos.zip"))
        .streaming(ReaderStream::new(r))
}

async fn write_folder(
    mut archive: ZipArchive<DuplexStream>,
    store: &FsPhotoStore,
    relative_dir: &str,
) -> Result<(), ArchiveError> {
    let mut dir = tokio::fs::read_dir(store.root().join(relative_dir)).await?;
    while let Some(item) = dir.next_entry().await? {
        if !item.file_type().await?.is_file() {
            continue;
        }

        let name = item.file_name().to_string_lossy().into_owned();
        let data = store.fetch(&format!("{}/{}", relative_dir, name)).await?;
        archive.append_bytes(name.as_bytes(), &data).await?;
    }

    archive.finalize().await?;
    Ok(())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let address = "127.0.0.1";
    let port = 8081;

    println!(
        "Test url is http://{}:{}/api/download-photos (POST)",
        address, port
    );

    HttpServer::new(|| {
        let config = DownloadConfig::from_env();
        let store = FsPhotoStore::new(&config.public_root);
        App::new()
            .app_data(web::Data::new(AppState { config, store }))
            .service(download_photos)
            .service(download_folder)
    })
    .bind((address, port))?
    .run()
    .await
}
