//! Domain models for cross-module link analysis.
//!
//! These types are filesystem agnostic: they classify and summarise paths
//! that have already been resolved by the [`storage`](crate::storage) layer.

mod config;
pub use config::{Config, ConfigError};

/// Classification of resolved link targets.
pub mod relationship;
pub use relationship::Relationship;

/// Submodule declarations and document attribution.
pub mod submodule;
pub use submodule::{ROOT_MODULE, Submodule, attribute};

pub mod trie;
pub use trie::{RequirementTrie, TrieError};
