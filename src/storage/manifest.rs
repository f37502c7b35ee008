//! The module manifest (`manifest.vnm`).
//!
//! A manifest combines hand-authored [`Metadata`] with the calculated
//! [`Requirements`] of a module and its submodules.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    domain::{ROOT_MODULE, RequirementTrie, Submodule},
    storage::directory::Requirements,
};

/// The shortest release version accepted in a manifest.
const MIN_VERSION_LEN: usize = 5;

/// Hand-authored module metadata, usually `metadata.yaml` in the module root.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Metadata {
    /// The folder name the module installs into.
    pub folder: String,

    /// A short description of the module.
    #[serde(default)]
    pub description: Option<String>,

    /// A link to more information about the module.
    #[serde(default)]
    pub more_info: Option<String>,

    /// Named subtrees tracked separately from the module root.
    #[serde(default)]
    pub submodules: Option<Vec<Submodule>>,
}

impl Metadata {
    /// Loads metadata from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid metadata.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ManifestError::Metadata {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The declared submodules, or an empty slice if there are none.
    #[must_use]
    pub fn submodules(&self) -> &[Submodule] {
        self.submodules.as_deref().unwrap_or_default()
    }
}

/// A submodule entry in a [`Manifest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmoduleManifest {
    /// The submodule declaration, including any extra authored keys.
    #[serde(flatten)]
    pub declaration: Submodule,

    /// The neighbouring folders this submodule links into.
    pub requires: RequirementTrie,
}

/// The distribution manifest of a module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    /// The folder name the module installs into.
    pub folder: String,
    /// A short description of the module.
    pub description: Option<String>,
    /// A link to more information about the module.
    pub more_info: String,
    /// The released version, without a leading `v`.
    pub version: String,
    /// The neighbouring folders the root module links into.
    pub requires: RequirementTrie,
    /// Where the released content can be downloaded from.
    pub zip: String,
    /// The submodules, if any were declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submodules: Option<Vec<SubmoduleManifest>>,
}

impl Manifest {
    /// Assemble a manifest.
    ///
    /// `repo` is the `owner/name` of the GitHub repository the module is
    /// released from, and `version` the released version (without the `v`).
    ///
    /// # Errors
    ///
    /// - [`ManifestError::ShortVersion`] if `version` is implausibly short
    /// - [`ManifestError::MissingRequirements`] if `requirements` lacks the
    ///   root module or a declared submodule
    pub fn new(
        metadata: Metadata,
        requirements: &Requirements,
        repo: &str,
        version: &str,
    ) -> Result<Self, ManifestError> {
        if version.len() < MIN_VERSION_LEN {
            return Err(ManifestError::ShortVersion(version.to_string()));
        }

        let requires = requirements
            .root()
            .cloned()
            .ok_or_else(|| ManifestError::MissingRequirements(ROOT_MODULE.to_string()))?;

        let more_info = metadata
            .more_info
            .filter(|url| url.starts_with("http"))
            .unwrap_or_else(|| format!("https://github.com/{repo}"));

        let submodules = metadata
            .submodules
            .map(|declarations| {
                declarations
                    .into_iter()
                    .map(|declaration| {
                        let requires = requirements
                            .get(&declaration.name)
                            .cloned()
                            .ok_or_else(|| {
                                ManifestError::MissingRequirements(declaration.name.clone())
                            })?;
                        Ok(SubmoduleManifest {
                            declaration,
                            requires,
                        })
                    })
                    .collect::<Result<Vec<_>, ManifestError>>()
            })
            .transpose()?;

        Ok(Self {
            folder: metadata.folder,
            description: metadata.description,
            more_info,
            version: version.to_string(),
            requires,
            zip: format!("https://github.com/{repo}/releases/download/v{version}/content.zip"),
            submodules,
        })
    }

    /// Write the manifest as pretty-printed JSON with sorted keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be serialized or written.
    pub fn write<W: Write>(&self, writer: W) -> Result<(), ManifestError> {
        write_sorted_json(writer, self)
    }

    /// Write the manifest to a file, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        let file = File::create(path).map_err(|source| ManifestError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)?;
        writer.flush().map_err(|source| ManifestError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Write `value` as two-space indented JSON with every object's keys sorted.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized or written.
pub fn write_sorted_json<W: Write, T: Serialize>(
    mut writer: W,
    value: &T,
) -> Result<(), ManifestError> {
    // `serde_json::Value` objects are ordered maps, so converting first sorts
    // struct fields and flattened keys alike.
    let value = serde_json::to_value(value)?;
    serde_json::to_writer_pretty(&mut writer, &value)?;
    writer.write_all(b"\n").map_err(ManifestError::Io)
}

/// Errors raised while building or writing a [`Manifest`].
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The release version is too short to be a full version.
    #[error("Got short version \"{0}\"")]
    ShortVersion(String),

    /// No requirements were calculated for a module named in the metadata.
    #[error("no requirements calculated for module '{0}'")]
    MissingRequirements(String),

    /// The metadata file could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        /// The metadata file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The metadata file is not valid.
    #[error("invalid metadata in {}", path.display())]
    Metadata {
        /// The metadata file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The manifest file could not be written.
    #[error("failed to write {}", path.display())]
    Write {
        /// The manifest file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The output could not be serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The output could not be written.
    #[error(transparent)]
    Io(io::Error),
}
