//! A filesystem backed crawl of a module's documents
//!
//! The [`Directory`] walks every document under a module root, follows each
//! upward link one hop, and buckets the targets by the submodule that owns
//! the linking document. [`calculate_requirements`] turns those buckets into
//! one [`RequirementTrie`] per module.

use std::{
    collections::{BTreeMap, BTreeSet},
    ffi::OsStr,
    fmt, fs, io,
    path::{Component, Path, PathBuf},
};

use nonempty::NonEmpty;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use walkdir::WalkDir;

use crate::{
    domain::{Config, ROOT_MODULE, Relationship, RequirementTrie, Submodule, TrieError, attribute},
    storage::markdown::upward_references,
};

/// A module root prepared for crawling.
#[derive(Debug, Clone)]
pub struct Directory {
    /// The canonical root of the module.
    root: PathBuf,
    config: Config,
}

impl Directory {
    /// Opens the module rooted at `root`, using the `vnm.toml` found there (if
    /// any).
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::MissingRoot`] if `root` is not an existing
    /// directory, or [`CrawlError::Root`] if it cannot be canonicalised.
    pub fn new(root: &Path) -> Result<Self, CrawlError> {
        if !root.is_dir() {
            return Err(CrawlError::MissingRoot(root.to_path_buf()));
        }
        let root = root.canonicalize().map_err(|source| CrawlError::Root {
            path: root.to_path_buf(),
            source,
        })?;
        let config = Config::load_or_default(&root);
        Ok(Self { root, config })
    }

    /// Replace the crawl configuration.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// The canonical module root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The crawl configuration in use.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Scan every document under the root for upward links.
    ///
    /// Documents inside submodule folders are scanned too; the declarations
    /// only decide which bucket a document's links land in.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Read`] if any document cannot be read. This
    /// aborts the whole crawl. Links that point outside the root's parent do
    /// *not* fail the crawl; they are collected in [`Crawl::errors`].
    pub fn crawl(&self, submodules: &[Submodule]) -> Result<Crawl, CrawlError> {
        let documents = self.collect_document_paths();
        tracing::debug!(
            "Found {} documents under {}",
            documents.len(),
            self.root.display()
        );

        let scans = documents
            .par_iter()
            .map(|path| self.scan_document(path, submodules))
            .collect::<Result<Vec<_>, _>>()?;

        let mut crawl = Crawl::default();
        for scan in scans {
            crawl
                .siblings
                .entry(scan.module.to_string())
                .or_default()
                .extend(scan.siblings);
            crawl.errors.extend(scan.errors);
        }
        crawl.errors.sort();

        tracing::info!(
            "Crawled {} documents: {} sibling links, {} errors",
            documents.len(),
            crawl.sibling_count(),
            crawl.errors.len()
        );

        Ok(crawl)
    }

    fn collect_document_paths(&self) -> Vec<PathBuf> {
        let extension = OsStr::new(self.config.extension());
        WalkDir::new(&self.root)
            .follow_links(self.config.follow_links)
            .into_iter()
            .filter_map(|entry| {
                entry
                    .inspect_err(|e| tracing::warn!("Skipping unreadable entry: {e}"))
                    .ok()
            })
            // `DirEntry::file_type` does not follow symlinks, so ask the
            // filesystem whether a symlinked entry ends in a file.
            .filter(|entry| entry.path().is_file())
            .filter(|entry| entry.path().extension() == Some(extension))
            .map(walkdir::DirEntry::into_path)
            .collect()
    }

    fn scan_document<'a>(
        &self,
        path: &Path,
        submodules: &'a [Submodule],
    ) -> Result<DocumentScan<'a>, CrawlError> {
        let content = fs::read_to_string(path).map_err(|source| CrawlError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let module = attribute(submodules, relative);
        let folder = path.parent().unwrap_or(&self.root);

        let mut scan = DocumentScan {
            module,
            siblings: BTreeSet::new(),
            errors: Vec::new(),
        };

        for reference in upward_references(&content) {
            let resolved = match resolve(&folder.join(reference)) {
                Ok(resolved) => resolved,
                Err(e) => {
                    scan.errors.push(ErrorRecord::unexpected(path, reference, &e));
                    continue;
                }
            };

            let relationship = Relationship::classify(&self.root, &resolved);
            tracing::debug!(
                "{}: {reference} -> {} ({relationship})",
                path.display(),
                resolved.display()
            );

            match relationship {
                Relationship::Internal => {}
                Relationship::Sibling => {
                    scan.siblings.insert(resolved);
                }
                Relationship::External => scan.errors.push(ErrorRecord::new(path, reference)),
            }
        }

        Ok(scan)
    }
}

/// The links found in a single document.
struct DocumentScan<'a> {
    module: &'a str,
    siblings: BTreeSet<PathBuf>,
    errors: Vec<ErrorRecord>,
}

/// Resolve `path` to an absolute location.
///
/// `.` and `..` are normalised and symlinks are followed. Components that do
/// not exist are normalised lexically, so links to missing files still
/// resolve.
fn resolve(path: &Path) -> io::Result<PathBuf> {
    let mut resolved = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(segment) => {
                resolved.push(segment);
                let is_symlink = fs::symlink_metadata(&resolved)
                    .is_ok_and(|metadata| metadata.file_type().is_symlink());
                if is_symlink {
                    resolved = fs::canonicalize(&resolved)?;
                }
            }
        }
    }
    Ok(resolved)
}

/// The outcome of crawling a module.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Crawl {
    /// Sibling link targets, keyed by the module that owns the linking
    /// document.
    pub siblings: BTreeMap<String, BTreeSet<PathBuf>>,

    /// Links that could not be accepted, sorted by document.
    pub errors: Vec<ErrorRecord>,
}

impl Crawl {
    /// The sibling link targets of a module, if it linked to any.
    #[must_use]
    pub fn siblings_of(&self, module: &str) -> Option<&BTreeSet<PathBuf>> {
        self.siblings.get(module)
    }

    /// The total number of distinct sibling targets across all modules.
    #[must_use]
    pub fn sibling_count(&self) -> usize {
        self.siblings.values().map(BTreeSet::len).sum()
    }
}

/// A link that points outside the module root's parent, or that could not be
/// resolved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ErrorRecord {
    /// The document containing the link.
    pub document: PathBuf,
    /// The link target, as written.
    pub reference: String,
    /// Details of an unexpected failure while resolving the link.
    pub detail: Option<String>,
}

impl ErrorRecord {
    fn new(document: &Path, reference: &str) -> Self {
        Self {
            document: document.to_path_buf(),
            reference: reference.to_string(),
            detail: None,
        }
    }

    fn unexpected(document: &Path, reference: &str, error: &io::Error) -> Self {
        Self {
            detail: Some(error.to_string()),
            ..Self::new(document, reference)
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.document.display(), self.reference)?;
        if let Some(detail) = &self.detail {
            write!(f, " (Unexpected error: {detail})")?;
        }
        Ok(())
    }
}

/// The requirement trie of every module, keyed by module name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Requirements {
    modules: BTreeMap<String, RequirementTrie>,
    sibling_count: usize,
}

impl Requirements {
    /// The trie of the implicit root module.
    #[must_use]
    pub fn root(&self) -> Option<&RequirementTrie> {
        self.get(ROOT_MODULE)
    }

    /// The trie of a named module.
    #[must_use]
    pub fn get(&self, module: &str) -> Option<&RequirementTrie> {
        self.modules.get(module)
    }

    /// Iterate over modules and their tries, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RequirementTrie)> {
        self.modules.iter().map(|(name, trie)| (name.as_str(), trie))
    }

    /// The number of distinct sibling link targets the tries were built from.
    #[must_use]
    pub const fn sibling_count(&self) -> usize {
        self.sibling_count
    }
}

/// Calculate which neighbouring folders the module at `root`, and each of its
/// declared submodules, link into.
///
/// The returned [`Requirements`] hold a trie for [`ROOT_MODULE`] and for every
/// declared submodule, even those that link nowhere. Trie keys are relative to
/// the parent of `root`.
///
/// # Errors
///
/// - [`CrawlError::MissingRoot`] if `root` does not exist
/// - [`CrawlError::ReservedSubmoduleName`] if a submodule is named
///   [`ROOT_MODULE`]
/// - [`CrawlError::Read`] if a document cannot be read
/// - [`CrawlError::InvalidReferences`] carrying every rejected link, if any
///   link points outside the parent of `root`
pub fn calculate_requirements(
    root: &Path,
    submodules: &[Submodule],
) -> Result<Requirements, CrawlError> {
    Directory::new(root)?.calculate_requirements(submodules)
}

impl Directory {
    /// Crawl this module and build a trie for the root module and each
    /// declared submodule.
    ///
    /// # Errors
    ///
    /// See [`calculate_requirements`].
    pub fn calculate_requirements(
        &self,
        submodules: &[Submodule],
    ) -> Result<Requirements, CrawlError> {
        if submodules.iter().any(|s| s.name == ROOT_MODULE) {
            return Err(CrawlError::ReservedSubmoduleName);
        }

        let crawl = self.crawl(submodules)?;
        let sibling_count = crawl.sibling_count();
        let Crawl { siblings, errors } = crawl;
        if let Some(errors) = NonEmpty::from_vec(errors) {
            return Err(CrawlError::InvalidReferences(errors));
        }

        let parent = self.root.parent().unwrap_or(&self.root);
        let names = std::iter::once(ROOT_MODULE).chain(submodules.iter().map(|s| s.name.as_str()));

        let mut modules = BTreeMap::new();
        for name in names {
            let trie = match siblings.get(name) {
                Some(paths) => RequirementTrie::from_paths(paths, parent)?,
                None => RequirementTrie::new(),
            };
            modules.insert(name.to_string(), trie);
        }

        Ok(Requirements {
            modules,
            sibling_count,
        })
    }
}

/// Errors raised while crawling a module.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// The module root does not exist.
    #[error("Directory '{}' does not exist", .0.display())]
    MissingRoot(PathBuf),

    /// The module root exists but could not be canonicalised.
    #[error("Failed to resolve directory '{}'", path.display())]
    Root {
        /// The root as given.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// A document could not be read.
    #[error("Error reading {}", path.display())]
    Read {
        /// The document.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// A submodule was declared with the reserved root module name.
    #[error("a submodule may not be named 'root'")]
    ReservedSubmoduleName,

    /// One or more links point outside the parent of the module root.
    #[error("{} invalid link(s) found", .0.len())]
    InvalidReferences(NonEmpty<ErrorRecord>),

    /// A sibling path could not be placed in a trie.
    #[error(transparent)]
    Trie(#[from] TrieError),
}
