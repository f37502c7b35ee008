use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::instrument;
use vnm::{Metadata, storage::Manifest as ModuleManifest};

use super::terminal::{Colorize, report_invalid_references};

#[derive(Debug, Parser)]
pub struct Manifest {
    /// Path to the metadata YAML file. Defaults to `<root>/metadata.yaml`
    #[arg(long)]
    metadata: Option<PathBuf>,

    /// The owner/name of the GitHub repository the module is released from
    #[arg(long)]
    repo: String,

    /// The released version (without the v)
    #[arg(long)]
    version: String,

    /// Where to write the manifest
    #[arg(short, long, default_value = "manifest.vnm")]
    output: PathBuf,
}

impl Manifest {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let metadata_path = self
            .metadata
            .unwrap_or_else(|| root.join("metadata.yaml"));
        let metadata = Metadata::load(&metadata_path)?;
        tracing::debug!(
            "Loaded metadata for '{}' with {} submodule(s)",
            metadata.folder,
            metadata.submodules().len()
        );

        let requirements = vnm::calculate_requirements(root, metadata.submodules())
            .inspect_err(report_invalid_references)?;
        for (module, trie) in requirements.iter() {
            tracing::info!("Module '{module}' requires {} neighbouring folder(s)", trie.len());
        }

        let manifest = ModuleManifest::new(metadata, &requirements, &self.repo, &self.version)?;
        manifest
            .save(&self.output)
            .with_context(|| format!("failed to create {}", self.output.display()))?;

        println!(
            "{}",
            format!("Wrote {}", self.output.display()).success()
        );
        Ok(())
    }
}
