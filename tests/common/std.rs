#![allow(dead_code)]
use std::{
    fs::{create_dir_all, remove_file, File},
    io::Read,
    path::{Path, PathBuf},
};

use super::PACKAGE_NAME;
const ENGINE: &str = "std";
const TEMP: &str = "/tmp";

pub fn out_path(file_name: &str) -> PathBuf {
    Path::new(TEMP).join(PACKAGE_NAME).join(ENGINE).join(file_name)
}

pub fn create_new_clean_file(file_name: &str) -> File {
    let out_path = out_path(file_name);
    if let Some(out_dir) = out_path.parent() {
        create_dir_all(out_dir).unwrap_or_else(|error| {
            panic!("creating dir {:?} failed, because {:?}", out_dir, error);
        })
    }

    if out_path.exists() {
        remove_file(&out_path).unwrap_or_else(|error| {
            panic!("deleting file {:?} failed, because {:?}", &out_path, error);
        });
    }
    File::create(&out_path).unwrap_or_else(|error| {
        panic!("creating file {:?} failed, because {:?}", &out_path, error);
    })
}

/// Produces `size` bytes of `b'0'`.
pub struct MockReader {
    mock_size: usize,
}

impl MockReader {
    pub fn new(size: usize) -> Self {
        Self { mock_size: size }
    }
}

impl Read for MockReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let size = buf.len().min(self.mock_size);
        buf[..size].fill(b'0');
        self.mock_size -= size;
        Ok(size)
    }
}
