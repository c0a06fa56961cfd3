//! FileSystem trait definition

use anyhow::Result;
use std::path::Path;

/// Metadata about a filesystem entry, as seen by a stat call that follows symlinks
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub size: u64,
    pub file_type: FileType,
}

/// Type of file system entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    File,
    Directory,
    Socket,
    Other,
}

impl FileMetadata {
    pub fn is_file(&self) -> bool {
        self.file_type == FileType::File
    }

    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }

    pub fn is_socket(&self) -> bool {
        self.file_type == FileType::Socket
    }

    pub fn len(&self) -> u64 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// Abstraction over the read-only file system queries the socket locator needs
pub trait FileSystem: Send + Sync {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Stat a path, following symlinks
    fn metadata(&self, path: &Path) -> Result<FileMetadata>;
}
