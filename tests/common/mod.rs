#![allow(dead_code)]

pub mod catalog;
pub mod mocks;
pub mod server;

use std::{env::temp_dir, fs, path::PathBuf};

use rand::distr::{Alphanumeric, SampleString};

pub use catalog::FakeCatalog;
pub use mocks::MockNotifier;

/// Writes `content` to a fresh file in the temp directory.
pub fn write_upload(content: &[u8]) -> PathBuf {
    let file_name = Alphanumeric.sample_string(&mut rand::rng(), 16);
    let path = temp_dir().join(format!("{file_name}.csv"));
    fs::write(&path, content).expect("Failed to write upload");
    path
}
