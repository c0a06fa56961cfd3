//! FileSystem abstraction for testable socket discovery

mod mock;
mod real;
mod r#trait;

pub use mock::{MockEntry, MockFileSystem};
pub use r#trait::{FileMetadata, FileSystem, FileType};
pub use real::RealFileSystem;
