use anyhow::{Result, Context, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Extension of the subtitle files accepted as input
pub const INPUT_EXTENSION: &str = "srt";

/// Extension of the generated bilingual subtitle files
pub const OUTPUT_EXTENSION: &str = "ass";

// @pattern: A timing line anywhere in the file
static TIMING_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*\d{1,2}:\d{2}:\d{2}[,.]\d{1,3}\s*-->\s*\d{1,2}:\d{2}:\d{2}[,.]\d{1,3}")
        .expect("Invalid timing line regex")
});

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output path for a bilingual subtitle, next to the input
    pub fn ass_output_path<P: AsRef<Path>>(input_file: P) -> PathBuf {
        input_file.as_ref().with_extension(OUTPUT_EXTENSION)
    }

    /// Find files with a specific extension in a directory, sorted by path
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let wanted = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            let matches = path.is_file()
                && path.extension().is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(wanted));
            if matches {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Find every subtitle input file under a directory
    pub fn find_subtitle_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        Self::find_files(dir, INPUT_EXTENSION)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        let bytes = fs::read(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))?;

        // Subtitle files in the wild are not always valid UTF-8
        Ok(match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Detect whether a path holds a subtitle file
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow!("File does not exist: {:?}", path));
        }

        if path.is_dir() {
            return Ok(FileType::Directory);
        }

        if path.extension().is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(INPUT_EXTENSION)) {
            return Ok(FileType::Subtitle);
        }

        // Fall back to examining file contents
        if let Ok(content) = Self::read_to_string(path) {
            if TIMING_LINE_REGEX.is_match(&content) {
                return Ok(FileType::Subtitle);
            }
        }

        Ok(FileType::Unknown)
    }
}

/// Enum representing different input kinds
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// Subtitle file (SRT)
    Subtitle,
    /// Directory to scan for subtitle files
    Directory,
    /// Unknown file type
    Unknown,
}
