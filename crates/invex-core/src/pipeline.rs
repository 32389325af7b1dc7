//! Per-file processing: acquire, extract, store, route, notify.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::acquire::TextSource;
use crate::error::Result;
use crate::invoice::{ExtractedFields, InvoiceAssembler, InvoiceParser, LayoutParser};
use crate::models::config::DirectoryConfig;
use crate::models::invoice::{InvoiceRecord, RawDocument};
use crate::notify::Notifier;
use crate::store::InvoiceStore;

/// What happened to one incoming file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// A new record was stored; the file was moved to `processed`.
    Stored(InvoiceRecord),
    /// The document was already stored; the file was moved to `processed`.
    Duplicate,
    /// Processing failed; the file was moved to `failed` when possible.
    Failed(String),
}

/// Drives documents from the incoming directory into the store.
pub struct InvoicePipeline {
    source: Box<dyn TextSource>,
    store: Box<dyn InvoiceStore>,
    notifier: Option<Box<dyn Notifier>>,
    assembler: InvoiceAssembler,
    dirs: DirectoryConfig,
}

impl InvoicePipeline {
    pub fn new(
        source: Box<dyn TextSource>,
        store: Box<dyn InvoiceStore>,
        assembler: InvoiceAssembler,
        dirs: DirectoryConfig,
    ) -> Self {
        Self {
            source,
            store,
            notifier: None,
            assembler,
            dirs,
        }
    }

    /// Send a notification for every stored record.
    pub fn with_notifier(mut self, notifier: Option<Box<dyn Notifier>>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn directories(&self) -> &DirectoryConfig {
        &self.dirs
    }

    pub fn store(&self) -> &dyn InvoiceStore {
        self.store.as_ref()
    }

    /// Create the incoming, processed and failed directories.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.dirs.incoming, &self.dirs.processed, &self.dirs.failed] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Acquire and parse a file without touching the store.
    pub fn extract(&self, path: &Path) -> Result<(RawDocument, ExtractedFields)> {
        let doc = RawDocument::read(path)?;
        let text = self.source.acquire(&doc)?;
        let parser = LayoutParser::for_document(doc.kind, &text)?;
        let fields = parser.parse(&text);
        Ok((doc, fields))
    }

    /// Extract a file and append it to the store.
    ///
    /// Returns `Ok(None)` when the document is already stored.
    pub fn process(&self, path: &Path) -> Result<Option<InvoiceRecord>> {
        let (doc, fields) = self.extract(path)?;

        let Some(record) = self.assembler.assemble(&doc, fields, self.store.as_ref())? else {
            return Ok(None);
        };
        self.store.append(&record)?;
        Ok(Some(record))
    }

    /// Process one file and move it to its terminal directory.
    ///
    /// Never returns an error: failures are logged and reported in the
    /// outcome.
    pub fn handle_file(&self, path: &Path) -> FileOutcome {
        let start = Instant::now();
        let name = path.display().to_string();

        let outcome = match self.process(path) {
            Ok(Some(record)) => FileOutcome::Stored(record),
            Ok(None) => FileOutcome::Duplicate,
            Err(e) => {
                error!("Failed to process {}: {}", name, e);
                FileOutcome::Failed(e.to_string())
            }
        };

        let target = match outcome {
            FileOutcome::Failed(_) => &self.dirs.failed,
            _ => &self.dirs.processed,
        };
        match move_into(path, target) {
            Ok(dest) => debug!("Moved {} to {}", name, dest.display()),
            Err(e) => error!("Failed to move {} to {}: {}", name, target.display(), e),
        }

        if let FileOutcome::Stored(record) = &outcome {
            info!(
                "Stored invoice {} from {} in {}ms",
                record.invoice_no,
                name,
                start.elapsed().as_millis()
            );
            if let Some(notifier) = &self.notifier {
                if let Err(e) = notifier.notify(record) {
                    warn!("Notification for {} failed: {}", record.invoice_no, e);
                }
            }
        }

        outcome
    }

    /// Files currently waiting in the incoming directory, sorted by name.
    pub fn pending_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dirs.incoming)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Handle every file currently in the incoming directory.
    pub fn scan_incoming(&self) -> Result<Vec<(PathBuf, FileOutcome)>> {
        Ok(self
            .pending_files()?
            .into_iter()
            .map(|path| {
                let outcome = self.handle_file(&path);
                (path, outcome)
            })
            .collect())
    }
}

/// Move `path` into `dir`, suffixing the name on collision.
///
/// Falls back to copy and remove when a rename is not possible.
pub fn move_into(path: &Path, dir: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let dest = unique_destination(path, dir)?;

    match fs::rename(path, &dest) {
        Ok(()) => Ok(dest),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(e),
        Err(e) => {
            debug!("rename failed ({}), copying {}", e, path.display());
            fs::copy(path, &dest)?;
            fs::remove_file(path)?;
            Ok(dest)
        }
    }
}

fn unique_destination(path: &Path, dir: &Path) -> std::io::Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| std::io::Error::new(ErrorKind::InvalidInput, "path has no file name"))?;

    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return Ok(candidate);
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());

    let mut n = 1u32;
    loop {
        let name = match &extension {
            Some(ext) => format!("{}_{}.{}", stem, n, ext),
            None => format!("{}_{}", stem, n),
        };
        let candidate = dir.join(name);
        if !candidate.exists() {
            return Ok(candidate);
        }
        n += 1;
    }
}
