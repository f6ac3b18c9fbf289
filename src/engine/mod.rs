//! Engine module for core store and chunking operations

pub mod arg_parser;
pub mod chunker;
pub mod cli;
pub mod hashing;
pub mod store;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use chunker::{store_content, store_range};
pub use cli::handle_run;
pub use hashing::{ContentHash, hash_bytes};
pub use store::ChunkStore;
pub use tools::{glob_match, path_to_db_string, should_include_in_walk};
