//! This bench test crawls a large module whose documents link into many
//! neighbouring modules.

#![allow(missing_docs)]

use std::{fs, path::Path};

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use tempfile::TempDir;
use vnm::{Submodule, calculate_requirements};

/// Generates a module of interlinked documents next to its neighbours
fn preseed_module(root: &Path) {
    for i in 0..50 {
        let folder = root.join(format!("module/section-{i}"));
        fs::create_dir_all(&folder).unwrap();
        for j in 0..20 {
            let content = format!(
                "# Document {j}\n\nSee [neighbour](../../neighbour-{}/docs/{j}.md), \
                 [local](../section-{}/doc-0.md) and [web](https://example.com).\n",
                j % 7,
                (i + 1) % 50,
            );
            fs::write(folder.join(format!("doc-{j}.md")), content).unwrap();
        }
    }
}

fn crawl(c: &mut Criterion) {
    let submodules = vec![Submodule::new("first-sections", ["section-0", "section-1"])];

    c.bench_function("calculate requirements", |b| {
        b.iter_batched(
            || {
                let tmp_dir = TempDir::new().unwrap();
                preseed_module(tmp_dir.path());
                tmp_dir
            },
            |tmp_dir| {
                calculate_requirements(&tmp_dir.path().join("module"), &submodules).unwrap();
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, crawl);
criterion_main!(benches);
