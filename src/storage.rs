pub mod directory;
/// Link extraction from markdown documents.
pub mod markdown;
/// The distribution manifest.
pub mod manifest;

pub use directory::{Crawl, CrawlError, Directory, ErrorRecord, Requirements, calculate_requirements};
pub use manifest::{Manifest, ManifestError, Metadata, SubmoduleManifest, write_sorted_json};
pub use markdown::{UPWARD_MARKER, upward_references};
