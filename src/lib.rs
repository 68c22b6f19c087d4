pub mod cli;
pub mod downloader;
pub mod error;
pub mod file_manager;
pub mod formats;
pub mod report;
pub mod resource;
pub mod rewriter;
pub mod scanner;

// Re-export main types for convenience
pub use cli::MirrorCommand;
pub use downloader::{MirrorOptions, SiteMirror};
pub use error::{Error, Result};
pub use file_manager::FileManager;
pub use report::MirrorReport;
pub use resource::ResourceUrl;
pub use scanner::{LinkContainer, LinkItem, LinkScanner, UrlKind};
