use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use tracing::instrument;
use vnm::{RequirementTrie, storage::write_sorted_json};

use super::terminal::{Colorize, report_invalid_references};

#[derive(Debug, Parser)]
pub struct Requirements {
    /// Output filename for the JSON requirement trie
    output: PathBuf,
}

impl Requirements {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let requirements =
            vnm::calculate_requirements(root, &[]).inspect_err(report_invalid_references)?;
        let trie = requirements.root().cloned().unwrap_or_else(RequirementTrie::new);

        let file = File::create(&self.output)
            .with_context(|| format!("Error writing to {}", self.output.display()))?;
        write_sorted_json(BufWriter::new(file), &trie)
            .with_context(|| format!("Error writing to {}", self.output.display()))?;

        println!(
            "{}",
            format!(
                "Found {} sibling links pointing to {} unique module(s).",
                requirements.sibling_count(),
                trie.len()
            )
            .success()
        );
        Ok(())
    }
}
