//! Configuration structures for the intake pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::invoice::UNCATEGORIZED;

/// Main configuration for invex.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvexConfig {
    /// Watched and terminal directories.
    pub directories: DirectoryConfig,

    /// Invoice store configuration.
    pub store: StoreConfig,

    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Item categorization rules.
    pub categories: CategoryConfig,

    /// Watch loop timings.
    pub watch: WatchConfig,

    /// Notification settings.
    pub notify: NotifyConfig,
}

/// Directory layout for file intake.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Directory scanned for new invoices.
    pub incoming: PathBuf,

    /// Files that were stored (or recognized as duplicates) end up here.
    pub processed: PathBuf,

    /// Files that could not be processed end up here.
    pub failed: PathBuf,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            incoming: PathBuf::from("invoices/incoming"),
            processed: PathBuf::from("invoices/processed"),
            failed: PathBuf::from("invoices/failed"),
        }
    }
}

/// Backend used to persist invoice records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Single JSON document, rewritten on every insert.
    #[default]
    Json,
    /// `invoices.csv` and `items.csv` in a directory, append-only.
    Csv,
}

/// Invoice store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store backend.
    pub backend: StoreBackend,

    /// JSON file path, or the directory holding the CSV tables.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Json,
            path: PathBuf::from("output/invoices_db.json"),
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` markers for unrecognized glyphs instead of blanking them.
    pub keep_unk: bool,

    /// Vertical distance (pixels) under which boxes count as the same row.
    pub row_tolerance: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
            row_tolerance: 20.0,
        }
    }
}

impl OcrConfig {
    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.model_dir.join(model_name)
    }

    /// Whether the detection and recognition models are present.
    pub fn models_present(&self) -> bool {
        self.model_path(&self.detection_model).exists()
            && self.model_path(&self.recognition_model).exists()
    }
}

/// A category and the keywords that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Ordered category rules; the first rule with a matching keyword wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub rules: Vec<CategoryRule>,

    /// Category used when nothing matches.
    pub fallback: String,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                CategoryRule::new(
                    "technology",
                    &[
                        "computer", "pc", "desktop", "laptop", "intel", "nvidia", "ssd", "ram",
                        "monitor", "wii", "nintendo", "gameboy", "controller", "console",
                        "gaming", "keyboard", "mouse", "vr-ready", "graphics",
                    ],
                ),
                CategoryRule::new(
                    "fashion",
                    &[
                        "shoes", "sneakers", "boots", "sandals", "heels", "flats", "dress",
                        "shirt", "blouse", "pants", "jeans", "jacket", "coat", "hoodie",
                        "t-shirt", "skirt", "sweater", "tunics", "leggings", "accessories",
                        "belt", "scarf", "hat", "cap", "gloves", "mask", "fashion", "maxmara",
                        "boden", "michael kors", "xhiliration", "psychedelic", "hawaiian",
                        "striped", "knitted", "wrap",
                    ],
                ),
                CategoryRule::new(
                    "home essentials",
                    &[
                        "chair", "table", "sofa", "couch", "cabinet", "shelf", "lamp", "rug",
                        "bedding", "mattress", "pan", "plate", "cup", "knife", "fork", "spoon",
                        "blender", "kettle", "towel", "tissue", "mask", "detergent", "soap",
                        "cleaning", "bath", "books",
                    ],
                ),
            ],
            fallback: UNCATEGORIZED.to_string(),
        }
    }
}

/// Timings for the polling watcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Delay between scans of the incoming directory.
    pub poll_interval_ms: u64,

    /// Delay between file size probes.
    pub settle_interval_ms: u64,

    /// Consecutive equal size probes required before a file is read.
    pub stable_checks: u32,

    /// Give up waiting for a file to settle after this long and read it anyway.
    pub max_settle_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            settle_interval_ms: 250,
            stable_checks: 2,
            max_settle_ms: 10_000,
        }
    }
}

/// Notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Send a notification for every new record.
    pub enabled: bool,

    /// Write messages to this directory instead of the log.
    pub outbox: Option<PathBuf>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            outbox: None,
        }
    }
}

impl InvexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: InvexConfig =
            serde_json::from_str(r#"{"store": {"backend": "csv", "path": "out"}}"#).unwrap();

        assert_eq!(config.store.backend, StoreBackend::Csv);
        assert_eq!(config.store.path, PathBuf::from("out"));
        assert_eq!(config.directories.incoming, PathBuf::from("invoices/incoming"));
        assert_eq!(config.watch.stable_checks, 2);
    }

    #[test]
    fn test_default_category_order() {
        let names: Vec<_> = CategoryConfig::default()
            .rules
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["technology", "fashion", "home essentials"]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = InvexConfig::default();
        config.notify.outbox = Some(PathBuf::from("outbox"));
        config.save(&path).unwrap();

        let loaded = InvexConfig::from_file(&path).unwrap();
        assert_eq!(loaded.notify.outbox, Some(PathBuf::from("outbox")));
    }
}
