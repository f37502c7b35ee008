//! The requirement trie.
//!
//! A [`RequirementTrie`] records which neighbouring folders a module links
//! into. It is keyed by path segment rather than by character: a link to
//! `/repo/moduleB/docs/readme.md`, relative to `/repo`, becomes
//! `{"moduleB": {"docs": {}}}`.

use std::{
    borrow::Cow,
    collections::BTreeMap,
    path::{Component, Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// A nested mapping of folder names referenced by a module.
///
/// Leaves are empty mappings. Keys are kept sorted, so the serialized form is
/// stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementTrie(BTreeMap<String, RequirementTrie>);

impl RequirementTrie {
    /// Create an empty trie.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Build a trie from a set of file paths.
    ///
    /// Each path is made relative to `root`, its file name is dropped, and
    /// the remaining folders are inserted in order. Files sitting directly in
    /// `root` have no folders and so contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TrieError::OutsideRoot`] if a path is not inside `root`.
    pub fn from_paths<I, P>(paths: I, root: &Path) -> Result<Self, TrieError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut trie = Self::new();
        for path in paths {
            trie.insert_file(path.as_ref(), root)?;
        }
        Ok(trie)
    }

    /// Insert the folders leading to `file`, relative to `root`.
    ///
    /// # Errors
    ///
    /// Returns [`TrieError::OutsideRoot`] if `file` is not inside `root`.
    pub fn insert_file(&mut self, file: &Path, root: &Path) -> Result<(), TrieError> {
        let relative = file
            .strip_prefix(root)
            .map_err(|_| TrieError::OutsideRoot {
                path: file.to_path_buf(),
                root: root.to_path_buf(),
            })?;

        let mut segments: Vec<_> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy()),
                _ => None,
            })
            .collect();
        segments.pop();

        self.insert(segments.iter().map(|s| decode(s)));
        Ok(())
    }

    /// Insert a chain of segments, creating nested entries as needed.
    pub fn insert<I, S>(&mut self, segments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut current = self;
        for segment in segments {
            current = current.0.entry(segment.into()).or_default();
        }
    }

    /// The child trie under `segment`, if referenced.
    #[must_use]
    pub fn get(&self, segment: &str) -> Option<&Self> {
        self.0.get(segment)
    }

    /// The top-level segments, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The number of top-level segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing has been referenced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Percent-decode a path segment so that `my%20module` and `my module` are
/// the same key.
fn decode(segment: &str) -> String {
    match urlencoding::decode_binary(segment.as_bytes()) {
        Cow::Borrowed(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        Cow::Owned(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
    }
}

/// Errors raised while building a [`RequirementTrie`].
#[derive(Debug, thiserror::Error)]
pub enum TrieError {
    /// A path could not be made relative to the trie root.
    #[error("{} is not inside {}", path.display(), root.display())]
    OutsideRoot {
        /// The offending path.
        path: PathBuf,
        /// The root paths are made relative to.
        root: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;

    fn trie(paths: &[&str]) -> RequirementTrie {
        RequirementTrie::from_paths(paths.iter().map(PathBuf::from), Path::new("/repo")).unwrap()
    }

    #[test]
    fn folders_become_nested_keys() {
        let trie = trie(&["/repo/moduleB/docs/readme.md"]);

        assert_eq!(trie.keys().collect::<Vec<_>>(), vec!["moduleB"]);
        let module_b = trie.get("moduleB").unwrap();
        assert_eq!(module_b.keys().collect::<Vec<_>>(), vec!["docs"]);
        assert!(module_b.get("docs").unwrap().is_empty());
    }

    #[test]
    fn file_names_are_never_keys() {
        let trie = trie(&["/repo/moduleB/readme.md"]);
        assert!(trie.get("moduleB").unwrap().get("readme.md").is_none());
    }

    #[test]
    fn direct_children_of_root_contribute_nothing() {
        let trie = trie(&["/repo/readme.md"]);
        assert!(trie.is_empty());
    }

    #[test]
    fn shared_prefixes_are_merged() {
        let trie = trie(&[
            "/repo/moduleB/a.md",
            "/repo/moduleB/b.md",
            "/repo/moduleB/docs/c.md",
            "/repo/moduleC/d.md",
        ]);

        assert_eq!(trie.len(), 2);
        assert_eq!(
            trie.get("moduleB").unwrap().keys().collect::<Vec<_>>(),
            vec!["docs"]
        );
    }

    #[test]
    fn encoded_segments_collapse_to_one_key() {
        let trie = trie(&["/repo/my%20module/a.md", "/repo/my module/b.md"]);
        assert_eq!(trie.keys().collect::<Vec<_>>(), vec!["my module"]);
    }

    #[test]
    fn path_outside_root_is_an_error() {
        let result = RequirementTrie::from_paths(["/elsewhere/x/y.md"], Path::new("/repo"));
        assert!(matches!(result, Err(TrieError::OutsideRoot { .. })));
    }

    #[test]
    fn serializes_as_sorted_nested_objects() {
        let trie = trie(&["/repo/zeta/a.md", "/repo/alpha/inner/b.md"]);
        let json = serde_json::to_string(&trie).unwrap();
        assert_eq!(json, r#"{"alpha":{"inner":{}},"zeta":{}}"#);
    }

    #[test]
    fn deserializes_from_nested_objects() {
        let trie: RequirementTrie = serde_json::from_str(r#"{"moduleB":{}}"#).unwrap();
        let mut expected = RequirementTrie::new();
        expected.insert(["moduleB"]);
        assert_eq!(trie, expected);
    }
}
