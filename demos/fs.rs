use checkin_archive::compress::tokio::archive::ZipArchive;
use tokio::fs::File;

#[tokio::main]
async fn main() {
    let file = File::create("photos.zip").await.unwrap();
    let mut archive = ZipArchive::new(file);

    archive
        .append("crew-1.jpg", &mut b"first photo\n".as_ref())
        .await
        .unwrap();
    archive
        .append_bytes(b"crew-2.jpg", b"second photo\n")
        .await
        .unwrap();

    let (size, _file) = archive.finalize().await.unwrap();
    println!("photos.zip: {} bytes", size);
}
