//! Document pipeline: external markdown-to-PDF compilation and merging.
//!
//! The core hands this module rendered markdown per group; from here on the
//! work is I/O. One compiler process runs per group/variant, concurrently
//! under a semaphore bound, and each variant's PDFs are merged in generation
//! order regardless of completion order. Any nonzero exit anywhere is fatal
//! for the run; on a failed merge the per-group files are kept on disk so
//! the wreckage can be inspected.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::variant_engine::groups::file_safe_name;
use crate::variant_engine::models::GroupVariants;

/// Which of the two run outputs a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Assignments,
    AnswerKey,
}

impl Variant {
    pub fn name(self) -> &'static str {
        match self {
            Variant::Assignments => "assignments",
            Variant::AnswerKey => "answer key",
        }
    }

    pub fn file_stem(self) -> &'static str {
        match self {
            Variant::Assignments => "assignments",
            Variant::AnswerKey => "answer_key",
        }
    }

    fn markdown_of(self, group: &GroupVariants) -> &str {
        match self {
            Variant::Assignments => &group.assignment,
            Variant::AnswerKey => &group.answer_key,
        }
    }
}

/// Paths of the two merged documents of a successful run.
#[derive(Debug, Clone)]
pub struct RunOutputs {
    pub assignments: PathBuf,
    pub answer_key: PathBuf,
}

/// One staged group of one variant: its markdown file and target PDF.
#[derive(Debug, Clone)]
struct StagedGroup {
    label: String,
    markdown: PathBuf,
    pdf: PathBuf,
}

/// Compile and merge a whole run into `assignments.pdf` and `answer_key.pdf`.
///
/// Temporary staging directories are removed only when the entire run
/// succeeds.
pub async fn compile_run(run: &[GroupVariants], config: &RunConfig) -> Result<RunOutputs> {
    let md_dir = staging_dir("exam_md_")?;
    let pdf_dir = staging_dir("exam_pdf_")?;

    let assignments = compile_variant(run, Variant::Assignments, config, &md_dir, &pdf_dir).await?;
    let answer_keys = compile_variant(run, Variant::AnswerKey, config, &md_dir, &pdf_dir).await?;

    let merged = async {
        let assignments = merge_variant(&assignments, Variant::Assignments, config, pdf_dir.path()).await?;
        let answer_key = merge_variant(&answer_keys, Variant::AnswerKey, config, pdf_dir.path()).await?;
        Ok(RunOutputs {
            assignments,
            answer_key,
        })
    }
    .await;

    match merged {
        Ok(outputs) => {
            info!(
                assignments = %outputs.assignments.display(),
                answer_key = %outputs.answer_key.display(),
                "run compiled"
            );
            Ok(outputs)
        }
        Err(err) => {
            // Keep the per-group files for manual inspection.
            let kept = pdf_dir.into_path();
            let _ = md_dir.into_path();
            error!(dir = %kept.display(), "merge failed; per-group files kept");
            Err(err)
        }
    }
}

/// Compile every group of one variant, bounded-concurrently. Returns the
/// per-group PDF paths in generation order.
async fn compile_variant(
    run: &[GroupVariants],
    variant: Variant,
    config: &RunConfig,
    md_dir: &TempDir,
    pdf_dir: &TempDir,
) -> Result<Vec<PathBuf>> {
    let staged = stage_markdown(run, variant, md_dir.path(), pdf_dir.path())?;
    let semaphore = Arc::new(Semaphore::new(config.max_concurrent_renders));

    let mut handles: Vec<JoinHandle<Result<()>>> = Vec::with_capacity(staged.len());
    for group in &staged {
        // Closed only if the semaphore is dropped, which it is not while
        // permits are being handed out here.
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore closed");
        let group = group.clone();
        let compiler = config.compiler.clone();
        let pdf_engine = config.pdf_engine.clone();
        let geometry = config.geometry.clone();

        handles.push(tokio::spawn(async move {
            let _permit = permit;
            compile_one(&compiler, &pdf_engine, &geometry, &group, variant).await
        }));
    }

    for handle in handles {
        handle
            .await
            .map_err(|source| Error::CompileJoin { source })??;
    }

    info!(variant = variant.name(), groups = staged.len(), "variant compiled");
    Ok(staged.into_iter().map(|g| g.pdf).collect())
}

/// Write one markdown file per group. Merge order comes from the returned
/// vector; the zero-padded index prefix only keeps the staging directory
/// listing readable when a failed merge leaves it behind.
fn stage_markdown(
    run: &[GroupVariants],
    variant: Variant,
    md_dir: &Path,
    pdf_dir: &Path,
) -> Result<Vec<StagedGroup>> {
    run.iter()
        .enumerate()
        .map(|(index, group)| {
            let stem = format!(
                "{index:03}_{}_{}",
                variant.file_stem(),
                file_safe_name(&group.group.label)
            );
            let markdown = md_dir.join(format!("{stem}.md"));
            std::fs::write(&markdown, variant.markdown_of(group)).map_err(|source| {
                Error::Staging {
                    path: markdown.clone(),
                    source,
                }
            })?;
            Ok(StagedGroup {
                label: group.group.label.clone(),
                markdown,
                pdf: pdf_dir.join(format!("{stem}.pdf")),
            })
        })
        .collect()
}

async fn compile_one(
    compiler: &str,
    pdf_engine: &str,
    geometry: &str,
    group: &StagedGroup,
    variant: Variant,
) -> Result<()> {
    let status = Command::new(compiler)
        .arg(format!("--pdf-engine={pdf_engine}"))
        .arg("-V")
        .arg(format!("geometry:{geometry}"))
        .arg(&group.markdown)
        .arg("-o")
        .arg(&group.pdf)
        .status()
        .await
        .map_err(|source| Error::CommandSpawn {
            program: compiler.to_string(),
            source,
        })?;

    if !status.success() {
        return Err(Error::CompileFailed {
            label: group.label.clone(),
            variant: variant.name(),
            status,
        });
    }
    Ok(())
}

/// Merge one variant's PDFs, in the order given, into the output directory.
async fn merge_variant(
    pdfs: &[PathBuf],
    variant: Variant,
    config: &RunConfig,
    kept_dir: &Path,
) -> Result<PathBuf> {
    let output = config.output_dir.join(format!("{}.pdf", variant.file_stem()));

    let mut command = Command::new(&config.merger);
    command.args(pdfs).arg("cat").arg("output").arg(&output);
    let status = command.status().await.map_err(|source| Error::CommandSpawn {
        program: config.merger.clone(),
        source,
    })?;

    if !status.success() {
        return Err(Error::MergeFailed {
            variant: variant.name(),
            status,
            kept_dir: kept_dir.to_path_buf(),
        });
    }
    Ok(output)
}

fn staging_dir(prefix: &str) -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .map_err(|source| Error::Staging {
            path: std::env::temp_dir(),
            source,
        })
}
