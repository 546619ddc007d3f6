use std::fmt;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use log::{debug, warn};

use crate::errors::SubtitleError;

// @module: Caption parsing and batching

// @const: One or more blank (or whitespace-only) lines
static BLOCK_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n[ \t]*\n\s*").expect("Invalid block separator regex")
});

// @const: Time range delimiter
const RANGE_DELIMITER: &str = "-->";

// @struct: Single caption entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionEntry {
    // @field: 0-based position in source order, dense across the file
    pub index: usize,

    // @field: Start timestamp as written in the source
    pub start_raw: String,

    // @field: End timestamp as written in the source
    pub end_raw: String,

    // @field: Caption body, lines joined with a single space
    pub text: String,
}

impl CaptionEntry {
    /// Creates a new caption entry
    pub fn new(index: usize, start_raw: impl Into<String>, end_raw: impl Into<String>, text: impl Into<String>) -> Self {
        CaptionEntry {
            index,
            start_raw: start_raw.into(),
            end_raw: end_raw.into(),
            text: text.into(),
        }
    }

    // @parses: One blank-line separated block
    // @returns: None when the block has no range line or no text
    fn from_block(index: usize, block: &str) -> Option<Self> {
        let lines: Vec<&str> = block.lines().collect();
        let range_pos = lines.iter().position(|line| line.contains(RANGE_DELIMITER))?;

        let (start_raw, end_raw) = lines[range_pos].split_once(RANGE_DELIMITER)?;

        let text = lines[range_pos + 1..]
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if text.is_empty() {
            return None;
        }

        Some(Self::new(index, start_raw.trim(), end_raw.trim(), text))
    }
}

impl fmt::Display for CaptionEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index + 1)?;
        writeln!(f, "{} --> {}", self.start_raw, self.end_raw)?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Ordered, contiguous group of entries sent to the translator together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Position of this batch in dispatch order
    pub index: usize,

    /// Entries of this batch; slot `s` is `entries[s]`
    pub entries: Vec<CaptionEntry>,
}

impl Batch {
    /// Number of slots in this batch
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the batch has no slots
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collection of caption entries with metadata
#[derive(Debug)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// List of caption entries
    pub entries: Vec<CaptionEntry>,
}

impl SubtitleCollection {
    /// Create a new, empty subtitle collection
    pub fn new(source_file: PathBuf) -> Self {
        SubtitleCollection {
            source_file,
            entries: Vec::new(),
        }
    }

    /// Parse SRT content read from `source_file`
    pub fn from_srt_string<P: AsRef<Path>>(source_file: P, content: &str) -> Result<Self, SubtitleError> {
        Ok(SubtitleCollection {
            source_file: source_file.as_ref().to_path_buf(),
            entries: Self::parse_srt_string(content)?,
        })
    }

    /// Parse SRT format string into caption entries
    ///
    /// Blocks are separated by one or more blank lines. Each block needs a line
    /// containing `-->`; everything after that line is the caption text. Blocks
    /// without a range line or without text are skipped.
    pub fn parse_srt_string(content: &str) -> Result<Vec<CaptionEntry>, SubtitleError> {
        let normalized = content
            .trim_start_matches('\u{feff}')
            .replace("\r\n", "\n")
            .replace('\r', "\n");

        let mut entries = Vec::new();
        let mut block_count = 0;

        for block in BLOCK_SEPARATOR_REGEX.split(normalized.trim()) {
            if block.trim().is_empty() {
                continue;
            }
            block_count += 1;

            match CaptionEntry::from_block(entries.len(), block) {
                Some(entry) => entries.push(entry),
                None => debug!("Skipping block {} without a time range or text", block_count),
            }
        }

        if entries.is_empty() {
            warn!("No captions found in {} blocks", block_count);
            return Err(SubtitleError::NoCaptions { blocks: block_count });
        }

        if entries.len() < block_count {
            debug!("Kept {} of {} blocks", entries.len(), block_count);
        }

        Ok(entries)
    }

    /// Split the entries into batches of at most `batch_size` entries
    pub fn split_into_batches(&self, batch_size: usize) -> Vec<Batch> {
        split_into_batches(&self.entries, batch_size)
    }
}

/// Partition entries into ordered batches of at most `batch_size` entries.
///
/// A `batch_size` of 0 is treated as 1.
pub fn split_into_batches(entries: &[CaptionEntry], batch_size: usize) -> Vec<Batch> {
    entries
        .chunks(batch_size.max(1))
        .enumerate()
        .map(|(index, chunk)| Batch {
            index,
            entries: chunk.to_vec(),
        })
        .collect()
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
