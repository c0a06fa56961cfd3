use super::{FileMetadata, FileSystem, FileType};
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug, Clone)]
pub enum MockEntry {
    Present { file_type: FileType, size: u64 },
    /// Visible to `exists` but every stat fails with this message
    Unreadable(String),
}

/// In-memory file system used to drive the socket locator in tests
pub struct MockFileSystem {
    entries: RwLock<HashMap<PathBuf, MockEntry>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        self.insert(
            path.as_ref(),
            MockEntry::Present {
                file_type: FileType::File,
                size: content.len() as u64,
            },
        );
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.insert(
            path.as_ref(),
            MockEntry::Present {
                file_type: FileType::Directory,
                size: 0,
            },
        );
    }

    pub fn add_socket(&self, path: impl AsRef<Path>) {
        self.insert(
            path.as_ref(),
            MockEntry::Present {
                file_type: FileType::Socket,
                size: 0,
            },
        );
    }

    pub fn add_unreadable(&self, path: impl AsRef<Path>, reason: &str) {
        self.insert(path.as_ref(), MockEntry::Unreadable(reason.to_string()));
    }

    fn insert(&self, path: &Path, entry: MockEntry) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());

        if let Some(parent) = path.parent() {
            let mut current = PathBuf::new();
            for component in parent.components() {
                current.push(component);
                entries
                    .entry(current.clone())
                    .or_insert(MockEntry::Present {
                        file_type: FileType::Directory,
                        size: 0,
                    });
            }
        }

        entries.insert(path.to_path_buf(), entry);
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(path)
    }

    fn metadata(&self, path: &Path) -> Result<FileMetadata> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        match entries.get(path) {
            Some(MockEntry::Present { file_type, size }) => Ok(FileMetadata {
                size: *size,
                file_type: *file_type,
            }),
            Some(MockEntry::Unreadable(reason)) => {
                Err(anyhow!("Failed to get metadata for {:?}: {}", path, reason))
            }
            None => Err(anyhow!("Path not found: {:?}", path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_socket() {
        let fs = MockFileSystem::new();
        fs.add_socket("/var/run/docker.sock");

        assert!(fs.exists(Path::new("/var/run/docker.sock")));
        assert!(fs
            .metadata(Path::new("/var/run/docker.sock"))
            .unwrap()
            .is_socket());
    }

    #[test]
    fn test_parent_directories_created() {
        let fs = MockFileSystem::new();
        fs.add_socket("/home/dev/.docker/run/docker.sock");

        assert!(fs.metadata(Path::new("/home/dev/.docker")).unwrap().is_dir());
        assert!(fs
            .metadata(Path::new("/home/dev/.docker/run"))
            .unwrap()
            .is_dir());
    }

    #[test]
    fn test_file_is_not_socket() {
        let fs = MockFileSystem::new();
        fs.add_file("/var/run/docker.sock", "not a socket");

        let meta = fs.metadata(Path::new("/var/run/docker.sock")).unwrap();
        assert!(meta.is_file());
        assert_eq!(meta.len(), 12);
    }

    #[test]
    fn test_unreadable_entry_exists_but_stat_fails() {
        let fs = MockFileSystem::new();
        fs.add_unreadable("/run/user/1000/docker.sock", "permission denied");

        assert!(fs.exists(Path::new("/run/user/1000/docker.sock")));
        let err = fs
            .metadata(Path::new("/run/user/1000/docker.sock"))
            .unwrap_err();
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_missing_path() {
        let fs = MockFileSystem::new();
        assert!(!fs.exists(Path::new("/nope")));
        assert!(fs.metadata(Path::new("/nope")).is_err());
    }
}
