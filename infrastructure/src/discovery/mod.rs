//! Filesystem adapters for finding and loading log files.

mod reader;
mod scanner;

pub use reader::JsonFileReader;
pub use scanner::{FsSourceScanner, SourceRoot, discover_tasks};
