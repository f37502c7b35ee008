//! Cross-module link analysis for markdown modules
//!
//! A module is a directory of markdown documents. Links that climb out of the
//! module (`../`) reveal which neighbouring modules it depends on. This crate
//! crawls a module, classifies those links, and summarises them as a
//! [`RequirementTrie`] per module, ready to be merged into a distribution
//! [`Manifest`].

pub mod domain;
pub use domain::{Config, ROOT_MODULE, Relationship, RequirementTrie, Submodule};

/// Filesystem crawling and manifest output.
pub mod storage;
pub use storage::{
    Crawl, CrawlError, Directory, ErrorRecord, Manifest, Metadata, Requirements,
    calculate_requirements,
};
