use super::{FileMetadata, FileSystem, FileType};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn metadata(&self, path: &Path) -> Result<FileMetadata> {
        let meta = fs::metadata(path).context(format!("Failed to get metadata for {:?}", path))?;

        Ok(FileMetadata {
            size: meta.len(),
            file_type: classify(&meta.file_type()),
        })
    }
}

#[cfg(unix)]
fn classify(file_type: &fs::FileType) -> FileType {
    use std::os::unix::fs::FileTypeExt;

    if file_type.is_socket() {
        FileType::Socket
    } else if file_type.is_file() {
        FileType::File
    } else if file_type.is_dir() {
        FileType::Directory
    } else {
        FileType::Other
    }
}

#[cfg(not(unix))]
fn classify(file_type: &fs::FileType) -> FileType {
    if file_type.is_file() {
        FileType::File
    } else if file_type.is_dir() {
        FileType::Directory
    } else {
        FileType::Other
    }
}
