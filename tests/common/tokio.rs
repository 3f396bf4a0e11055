#![allow(dead_code)]
use ::std::path::{Path, PathBuf};
use std::task::Poll;
use tokio::{fs::File, io::AsyncRead};

use super::PACKAGE_NAME;
const ENGINE: &str = "tokio";
const TEMP: &str = "/tmp";

pub fn out_dir() -> PathBuf {
    Path::new(TEMP).join(PACKAGE_NAME).join(ENGINE)
}

pub async fn create_new_clean_file(file_name: &str) -> File {
    let out_dir = out_dir();
    if !out_dir.exists() {
        tokio::fs::create_dir_all(&out_dir)
            .await
            .unwrap_or_else(|error| {
                panic!("creating dir {:?} failed, because {:?}", out_dir, error);
            })
    }

    let out_path = out_dir.join(file_name);

    if out_path.exists() {
        tokio::fs::remove_file(&out_path)
            .await
            .unwrap_or_else(|error| {
                panic!("deleting file {:?} failed, because {:?}", &out_path, error);
            });
    }
    tokio::fs::File::create(&out_path)
        .await
        .unwrap_or_else(|error| {
            panic!("creating file {:?} failed, because {:?}", &out_path, error);
        })
}

/// Produces `size` bytes of `b'0'`, at most one read buffer at a time.
pub struct MockAsyncReader {
    mock_size: usize,
}

impl MockAsyncReader {
    pub fn new(size: usize) -> Self {
        Self { mock_size: size }
    }
}

impl AsyncRead for MockAsyncReader {
    fn poll_read(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        let size = buf.remaining().min(self.mock_size);
        buf.initialize_unfilled_to(size).fill(b'0');
        buf.advance(size);

        self.get_mut().mock_size -= size;
        Poll::Ready(Ok(()))
    }
}
