//! Watch command - poll the incoming directory and store new invoices.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use invex_core::models::config::WatchConfig;
use invex_core::{FileOutcome, InvoicePipeline};

use super::{build_pipeline, load_config};

/// Arguments for the watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Process the files already waiting and exit
    #[arg(long)]
    once: bool,

    /// Poll interval in milliseconds (overrides config)
    #[arg(long)]
    interval: Option<u64>,
}

#[derive(Debug, Default)]
struct Tally {
    stored: usize,
    duplicates: usize,
    failed: Vec<(String, String)>,
}

impl Tally {
    fn record(&mut self, name: String, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Stored(_) => self.stored += 1,
            FileOutcome::Duplicate => self.duplicates += 1,
            FileOutcome::Failed(reason) => self.failed.push((name, reason.clone())),
        }
    }

    fn total(&self) -> usize {
        self.stored + self.duplicates + self.failed.len()
    }

    fn print(&self) {
        println!();
        println!(
            "{} Handled {} files",
            style("✓").green(),
            self.total()
        );
        println!(
            "   {} stored, {} duplicates, {} failed",
            style(self.stored).green(),
            style(self.duplicates).yellow(),
            style(self.failed.len()).red()
        );

        if !self.failed.is_empty() {
            println!();
            println!("{}", style("Failed files:").red());
            for (name, reason) in &self.failed {
                println!("  - {}: {}", name, reason);
            }
        }
    }
}

pub async fn run(args: WatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let pipeline = build_pipeline(&config);
    pipeline.ensure_dirs()?;

    let incoming = pipeline.directories().incoming.clone();
    let mut tally = Tally::default();

    if args.once {
        let files = pipeline.pending_files()?;
        if files.is_empty() {
            println!("No files waiting in {}", incoming.display());
            return Ok(());
        }

        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );

        for path in files {
            let name = file_label(&path);
            pb.set_message(name.clone());
            let outcome = pipeline.handle_file(&path);
            tally.record(name, &outcome);
            pb.inc(1);
        }

        pb.finish_with_message("Complete");
        tally.print();
        return Ok(());
    }

    let poll = Duration::from_millis(args.interval.unwrap_or(config.watch.poll_interval_ms));
    println!(
        "{} Watching {} (Ctrl-C to stop)",
        style("→").cyan(),
        incoming.display()
    );
    info!("Polling every {:?}", poll);

    let mut ticker = tokio::time::interval(poll);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        let files = match pipeline.pending_files() {
            Ok(files) => files,
            Err(e) => {
                warn!("Failed to scan {}: {}", incoming.display(), e);
                continue;
            }
        };

        let drained = drain(&pipeline, files, &config.watch, &mut shutdown, &mut tally).await;
        if drained == Drain::Stopped {
            break;
        }
    }

    info!("Shutdown requested");
    if tally.total() > 0 {
        tally.print();
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Drain {
    Finished,
    Stopped,
}

/// Handle `files` one at a time, checking `shutdown` before each file.
///
/// Once `shutdown` resolves it must not be polled again, so the caller
/// stops on [`Drain::Stopped`].
async fn drain<F>(
    pipeline: &InvoicePipeline,
    files: Vec<PathBuf>,
    watch: &WatchConfig,
    shutdown: &mut F,
    tally: &mut Tally,
) -> Drain
where
    F: Future + Unpin,
{
    for path in files {
        let settled = tokio::select! {
            biased;
            _ = &mut *shutdown => return Drain::Stopped,
            settled = wait_until_settled(&path, watch) => settled,
        };
        if !settled {
            debug!("{} disappeared before it settled", path.display());
            continue;
        }

        let name = file_label(&path);
        let outcome = tokio::task::block_in_place(|| pipeline.handle_file(&path));
        print_outcome(&name, &outcome);
        tally.record(name, &outcome);
    }
    Drain::Finished
}

/// Wait until the file size stops changing.
///
/// Returns `false` if the file vanished while waiting. A file still growing
/// after `max_settle_ms` is handed over anyway.
async fn wait_until_settled(path: &Path, watch: &WatchConfig) -> bool {
    let deadline = Instant::now() + Duration::from_millis(watch.max_settle_ms);
    let interval = Duration::from_millis(watch.settle_interval_ms);
    let required = watch.stable_checks.max(1);

    let mut last_len = None;
    let mut stable = 0u32;

    loop {
        let len = match tokio::fs::metadata(path).await {
            Ok(meta) => meta.len(),
            Err(_) => return false,
        };

        if last_len == Some(len) {
            stable += 1;
        } else {
            last_len = Some(len);
            stable = 1;
        }

        if stable >= required {
            return true;
        }

        if Instant::now() >= deadline {
            warn!("{} still changing after {}ms", path.display(), watch.max_settle_ms);
            return true;
        }

        tokio::time::sleep(interval).await;
    }
}

fn print_outcome(name: &str, outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Stored(record) => println!(
            "{} {} -> {} ({}, {})",
            style("✓").green(),
            name,
            record.invoice_no,
            record.vendor,
            record.total_amount
        ),
        FileOutcome::Duplicate => println!("{} {} already stored", style("=").yellow(), name),
        FileOutcome::Failed(reason) => println!("{} {}: {}", style("✗").red(), name, reason),
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use invex_core::InvexConfig;
    use tempfile::TempDir;

    fn setup(names: &[&str]) -> (TempDir, InvexConfig, InvoicePipeline, Vec<PathBuf>) {
        let root = tempfile::tempdir().unwrap();
        let mut config = InvexConfig::default();
        config.directories.incoming = root.path().join("incoming");
        config.directories.processed = root.path().join("processed");
        config.directories.failed = root.path().join("failed");
        config.store.path = root.path().join("invoices_db.json");
        config.ocr.model_dir = root.path().join("models");
        config.notify.enabled = false;
        config.watch.settle_interval_ms = 1;
        config.watch.stable_checks = 1;

        let pipeline = build_pipeline(&config);
        pipeline.ensure_dirs().unwrap();
        for name in names {
            std::fs::write(config.directories.incoming.join(name), b"not a pdf").unwrap();
        }
        let files = pipeline.pending_files().unwrap();
        (root, config, pipeline, files)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_shutdown_stops_before_next_file() {
        let (_root, config, pipeline, files) = setup(&["a.pdf", "b.pdf"]);
        let mut shutdown = std::future::ready(());
        let mut tally = Tally::default();

        let drained = drain(&pipeline, files.clone(), &config.watch, &mut shutdown, &mut tally).await;

        assert_eq!(drained, Drain::Stopped);
        assert_eq!(tally.total(), 0);
        assert!(files.iter().all(|path| path.exists()));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_drain_handles_every_file_without_shutdown() {
        let (_root, config, pipeline, files) = setup(&["a.pdf", "b.pdf"]);
        let mut shutdown = std::future::pending::<()>();
        let mut tally = Tally::default();

        let drained = drain(&pipeline, files, &config.watch, &mut shutdown, &mut tally).await;

        assert_eq!(drained, Drain::Finished);
        assert_eq!(tally.failed.len(), 2);
        assert!(config.directories.failed.join("a.pdf").exists());
        assert!(config.directories.failed.join("b.pdf").exists());
    }
}
