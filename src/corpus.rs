//! Corpus snapshot loading.
//!
//! The corpus is a JSONL file, one object per line with a `text` key and an
//! optional `id`. Document order in the file defines corpus indices, which
//! the lexical ranker uses as its join key.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// An ordered, immutable snapshot of document texts.
#[derive(Debug, Clone)]
pub struct Corpus {
    texts: Vec<String>,
}

impl Corpus {
    /// Load the corpus from a JSONL file.
    ///
    /// Blank lines are skipped; a malformed line fails the load. Only
    /// documents whose text is non-empty after trimming are kept.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open corpus file {}", path.display()))?;
        let reader = BufReader::new(file);

        let mut texts = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("failed to read {}", path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            let record: RawRecord = serde_json::from_str(&line)
                .with_context(|| format!("invalid JSON on line {} of {}", line_no + 1, path.display()))?;
            if let Some(text) = record.text {
                if !text.trim().is_empty() {
                    texts.push(text);
                }
            }
        }

        Ok(Self { texts })
    }

    /// Build a corpus directly from texts.
    pub fn from_texts(texts: Vec<String>) -> Self {
        Self { texts }
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.texts.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// A corpus record destined for the external store.
#[derive(Debug, Clone)]
pub struct CorpusRecord {
    pub id: Option<String>,
    /// Trimmed document text
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

/// Read ingestable records from a JSONL file, skipping malformed lines and
/// records without usable text.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<CorpusRecord>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("failed to open corpus file {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        let Ok(raw) = serde_json::from_str::<RawRecord>(&line) else {
            continue;
        };
        let text = raw.text.as_deref().unwrap_or("").trim();
        if text.is_empty() {
            continue;
        }
        records.push(CorpusRecord {
            id: raw.id,
            text: text.to_string(),
        });
    }
    Ok(records)
}
