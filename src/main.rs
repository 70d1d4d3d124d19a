use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use exam_sheet_gen::{bank, compile_run, generate_run, GroupSequencer, RunConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = env::args().skip(1);
    let (test_path, count) = match (args.next(), args.next()) {
        (Some(path), Some(count)) => (
            PathBuf::from(path),
            count
                .parse::<usize>()
                .context("group count must be a positive integer")?,
        ),
        _ => bail!("usage: exam_sheet_gen <test.yaml> <group-count>"),
    };
    if count == 0 {
        bail!("group count must be a positive integer");
    }

    let config = RunConfig::from_env();
    let test = bank::load_test(&test_path)
        .with_context(|| format!("loading {}", test_path.display()))?;

    let sequencer = GroupSequencer::for_school_year(chrono::Local::now().date_naive());
    let run = generate_run(&test, &sequencer, count)?;
    let outputs = compile_run(&run, &config).await?;

    info!(
        assignments = %outputs.assignments.display(),
        answer_key = %outputs.answer_key.display(),
        groups = count,
        "done"
    );
    Ok(())
}
