//! Scan pipeline: directory walk + per-path ingestion.

pub mod scan;

pub use scan::{ingest_path, scan_dir, scan_dir_with};
