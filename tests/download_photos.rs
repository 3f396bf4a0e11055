use checkin_archive::config::DownloadConfig;
use checkin_archive::download::{handle_download, DownloadError};
use checkin_archive::photos::FsPhotoStore;
use std::path::PathBuf;

mod common;
use common::{extract_with_zip, fixed_options};

async fn public_root(test_name: &str) -> PathBuf {
    let root = common::tokio::out_dir().join(test_name);
    let photos = root.join("temp-photos");
    tokio::fs::create_dir_all(&photos).await.unwrap();

    tokio::fs::write(photos.join("front.jpg"), b"front door").await.unwrap();
    tokio::fs::write(photos.join("roof.PNG"), b"roof").await.unwrap();
    tokio::fs::write(photos.join("meter"), b"meter").await.unwrap();
    tokio::fs::write(root.join("private.jpg"), b"private").await.unwrap();

    root
}

#[tokio::test]
async fn download_from_public_directory() {
    let root = public_root("download_from_public_directory").await;
    let config = DownloadConfig::default()
        .public_root(&root)
        .archive_options(fixed_options());
    let store = FsPhotoStore::new(&config.public_root);

    let body = br#"{
        "photoUrls": [
            "/temp-photos/front.jpg",
            "/private.jpg",
            42,
            "/temp-photos/roof.PNG",
            "/temp-photos/meter"
        ],
        "installer": "Jo Smith / Crew #2",
        "timestamp": "2024-05-06T07:08:09Z"
    }"#;

    let archive = handle_download(body, &store, &config).await.unwrap();

    assert_eq!(archive.file_name, "Jo_Smith___Crew__2-20240506070809.zip");
    assert_eq!(archive.entries, 3);
    assert_eq!(
        extract_with_zip(&archive.bytes),
        vec![
            ("Jo_Smith___Crew__2-1.jpg".to_owned(), b"front door".to_vec()),
            ("Jo_Smith___Crew__2-4.PNG".to_owned(), b"roof".to_vec()),
            ("Jo_Smith___Crew__2-5.jpg".to_owned(), b"meter".to_vec()),
        ]
    );
}

#[tokio::test]
async fn download_errors_map_to_statuses() {
    let root = public_root("download_errors_map_to_statuses").await;
    let config = DownloadConfig::default().public_root(&root);
    let store = FsPhotoStore::new(&config.public_root);

    let cases: [(&[u8], u16); 5] = [
        (b"{", 400),
        (br#"{"installer": "crew"}"#, 400),
        (br#"{"photoUrls": ["/private.jpg"]}"#, 404),
        (br#"{"photoUrls": ["/temp-photos/../private.jpg"]}"#, 404),
        (br#"{"photoUrls": ["/temp-photos/missing.jpg"]}"#, 500),
    ];

    for (body, status) in cases {
        let error = handle_download(body, &store, &config).await.unwrap_err();
        assert_eq!(error.status_code(), status, "{}", error);

        let json: serde_json::Value = serde_json::from_str(&error.body()).unwrap();
        assert_eq!(json["error"], error.to_string());
    }

    let error = handle_download(br#"{"photoUrls": []}"#, &store, &config)
        .await
        .unwrap_err();
    assert!(matches!(error, DownloadError::NoPhotoUrls));
}
