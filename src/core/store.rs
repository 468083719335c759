//! # Bank Persistence
//!
//! Loads and saves the question bank to a single JSON file
//! (`~/.quizdeck/bank.json` by default) and implements the import/export
//! payload contract.
//!
//! Writes use atomic rename (write `.tmp`, then `rename()`), so a failed save
//! leaves the previous file in place.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::bank::{QuestionBank, QuestionDefect};

/// How strictly imported questions are checked.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImportPolicy {
    /// Reject the whole import on the first malformed question.
    #[default]
    Strict,
    /// Accept malformed questions; the quiz screen refuses them when shown.
    Permissive,
}

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "bank I/O error: {e}"),
            StoreError::Serialize(e) => write!(f, "bank serialization error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

/// Why an import payload was rejected.
#[derive(Debug)]
pub enum ImportError {
    /// Nothing but whitespace was pasted.
    Empty,
    /// Not valid JSON after extraction.
    Parse(serde_json::Error),
    /// Valid JSON, but not an object of category → question list.
    Shape(serde_json::Error),
    /// Rejected under `ImportPolicy::Strict`.
    InvalidQuestion {
        category: String,
        index: usize,
        defect: QuestionDefect,
    },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Empty => write!(f, "nothing to import"),
            ImportError::Parse(e) => write!(f, "not valid JSON: {e}"),
            ImportError::Shape(e) => write!(f, "not a question bank: {e}"),
            ImportError::InvalidQuestion {
                category,
                index,
                defect,
            } => write!(f, "question {} in \"{category}\" {defect}", index + 1),
        }
    }
}

impl std::error::Error for ImportError {}

/// Returns the default bank path `~/.quizdeck/bank.json`.
pub fn default_bank_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".quizdeck").join("bank.json"))
}

/// Cuts the text down to the span from the first `{` to the last `}`, if both
/// exist in that order. Tolerates commentary around pasted JSON.
pub fn extract_json_object(raw: &str) -> &str {
    let trimmed = raw.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(first), Some(last)) if first < last => &trimmed[first..=last],
        _ => trimmed,
    }
}

/// Parses user-pasted text into a bank.
pub fn parse_import_payload(raw: &str, policy: ImportPolicy) -> Result<QuestionBank, ImportError> {
    let candidate = extract_json_object(raw);
    if candidate.is_empty() {
        return Err(ImportError::Empty);
    }

    let value: serde_json::Value = serde_json::from_str(candidate).map_err(ImportError::Parse)?;
    let bank: QuestionBank = serde_json::from_value(value).map_err(ImportError::Shape)?;

    if policy == ImportPolicy::Strict
        && let Some((category, index, defect)) = bank.first_defect()
    {
        return Err(ImportError::InvalidQuestion {
            category: category.to_string(),
            index,
            defect,
        });
    }

    debug!(
        "Parsed import payload: {} categories, {} questions",
        bank.category_count(),
        bank.question_count()
    );
    Ok(bank)
}

/// Pretty-printed JSON of the bank, as shown on the export screen.
pub fn export_payload(bank: &QuestionBank) -> String {
    // A map of plain strings/ints always serializes.
    serde_json::to_string_pretty(bank).unwrap_or_else(|_| "{}".to_string())
}

/// Atomically write `contents` to `path` (via `.tmp` + rename).
fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    Ok(())
}

/// Owns the canonical bank and the file it lives in.
#[derive(Debug)]
pub struct BankStore {
    path: PathBuf,
    bank: QuestionBank,
}

impl BankStore {
    /// Opens the store at `path` and loads whatever is there.
    pub fn open(path: PathBuf) -> Self {
        let bank = Self::read_bank(&path);
        Self { path, bank }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory canonical bank.
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Re-reads the file. Missing, empty or unparseable content falls back to
    /// the built-in bank without surfacing an error. Malformed questions in an
    /// otherwise well-shaped bank are kept.
    pub fn load(&mut self) -> QuestionBank {
        self.bank = Self::read_bank(&self.path);
        self.bank.clone()
    }

    fn read_bank(path: &Path) -> QuestionBank {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No saved bank at {}, using built-in bank", path.display());
                return QuestionBank::builtin();
            }
            Err(e) => {
                warn!("Failed to read bank {}: {}", path.display(), e);
                return QuestionBank::builtin();
            }
        };

        if contents.trim().is_empty() {
            return QuestionBank::builtin();
        }

        let bank: QuestionBank = match serde_json::from_str(&contents) {
            Ok(bank) => bank,
            Err(e) => {
                warn!("Saved bank {} is unreadable: {}", path.display(), e);
                return QuestionBank::builtin();
            }
        };

        if bank.is_empty() {
            return QuestionBank::builtin();
        }
        // The quiz refuses malformed questions when it shows them.
        if let Some((category, index, defect)) = bank.first_defect() {
            warn!(
                "Saved bank has a malformed question ({} #{}: {}), keeping it",
                category,
                index + 1,
                defect
            );
        }

        info!(
            "Loaded bank from {} ({} categories)",
            path.display(),
            bank.category_count()
        );
        bank
    }

    /// Persists the full bank, replacing prior content, then adopts it as the
    /// canonical copy. On error nothing changes.
    pub fn save(&mut self, bank: QuestionBank) -> Result<(), StoreError> {
        let json = serde_json::to_string(&bank).map_err(StoreError::Serialize)?;
        atomic_write(&self.path, &json)?;
        debug!("Bank saved to {}", self.path.display());
        self.bank = bank;
        Ok(())
    }

    /// Deletes the saved bank and returns to the built-in one.
    pub fn reset(&mut self) -> Result<QuestionBank, StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => info!("Removed saved bank {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::Io(e)),
        }
        self.bank = QuestionBank::builtin();
        Ok(self.bank.clone())
    }

    /// Writes the export payload to a timestamped file in `dir`.
    pub fn export_to_file(&self, dir: &Path) -> Result<PathBuf, StoreError> {
        let name = format!("quizdeck-export-{}.json", Utc::now().format("%Y%m%dT%H%M%SZ"));
        let path = dir.join(name);
        atomic_write(&path, &export_payload(&self.bank))?;
        info!("Exported bank to {}", path.display());
        Ok(path)
    }
}
