use anyhow::{Result, Context, anyhow};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::app_config::Config;
use crate::assembler;
use crate::file_utils::{FileManager, FileType};
use crate::providers::Provider;
use crate::subtitle_processor::SubtitleCollection;
use crate::translation::{
    BatchTranslator, TokenUsageStats, TranslationOptions, TranslationService,
};

// @module: Application controller for subtitle processing

/// Outcome of converting one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// The bilingual subtitle was written to this path
    Written(PathBuf),
    /// The output already existed and was kept
    Skipped(PathBuf),
}

/// Counts of a folder run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Result of translating one subtitle document in memory
#[derive(Debug)]
pub struct TranslationReport {
    // @field: Rendered ASS document
    pub document: String,
    // @field: Number of captions found in the input
    pub caption_count: usize,
    // @field: Captions written with the placeholder
    pub unavailable_count: usize,
    pub token_usage: TokenUsageStats,
    pub duration: Duration,
}

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Backend used instead of the configured one
    provider_override: Option<Arc<dyn Provider>>,
    // @field: Shared with every dispatch started by this controller
    cancellation: CancellationToken,
    // @field: Draw progress bars on stderr
    show_progress: bool,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        Ok(Self {
            config,
            provider_override: None,
            cancellation: CancellationToken::new(),
            show_progress: true,
        })
    }

    /// Create a controller that sends every batch to `provider`
    pub fn with_provider(config: Config, provider: Arc<dyn Provider>) -> Self {
        Self {
            config,
            provider_override: Some(provider),
            cancellation: CancellationToken::new(),
            show_progress: false,
        }
    }

    /// Enable or disable progress bars
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Token that cancels the translation in progress
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn translation_service(&self) -> Result<TranslationService> {
        let source = &self.config.source_language;
        let target = &self.config.target_language;

        match &self.provider_override {
            Some(provider) => Ok(TranslationService::with_provider(Arc::clone(provider), source, target)
                .with_options(TranslationOptions::from_config(&self.config.translation))),
            None => TranslationService::new(&self.config.translation, source, target),
        }
    }

    fn progress_bar(&self, multi_progress: &MultiProgress, len: u64, unit: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = multi_progress.add(ProgressBar::new(len));
        let template_result = ProgressStyle::default_bar()
            .template(&format!("{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}} {{eta}}", unit))
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar
    }

    /// Translate SRT `content` into a bilingual ASS document
    ///
    /// Fails only when no caption is found, when the backend cannot be used,
    /// or when the run is cancelled. Translation failures degrade to
    /// placeholder lines.
    pub async fn translate_content(&self, source_file: &Path, content: &str) -> Result<TranslationReport> {
        self.translate_content_with_progress(source_file, content, &MultiProgress::new()).await
    }

    async fn translate_content_with_progress(
        &self,
        source_file: &Path,
        content: &str,
        multi_progress: &MultiProgress,
    ) -> Result<TranslationReport> {
        let start_time = Instant::now();

        let subtitles = SubtitleCollection::from_srt_string(source_file, content)
            .with_context(|| format!("Failed to parse subtitle file: {:?}", source_file))?;

        let batch_size = self.config.translation.get_batch_size();
        let batches = subtitles.split_into_batches(batch_size);

        let service = self.translation_service()?;
        let batch_translator = BatchTranslator::new(
            service,
            self.config.translation.get_dispatch_mode(),
            self.config.translation.get_concurrent_requests(),
        )
        .with_cancellation(self.cancellation.clone());

        info!(
            "{}: {} captions in {} batches ({} dispatch)",
            self.config.translation.provider.display_name(),
            subtitles.entries.len(),
            batches.len(),
            batch_translator.mode()
        );

        let progress_bar = self.progress_bar(multi_progress, batches.len() as u64, "batches");
        progress_bar.set_message("Translating");
        let pb = progress_bar.clone();

        let dispatched = batch_translator
            .translate_batches(&batches, move |completed, _total| {
                pb.set_position(completed as u64);
            })
            .await;

        // Clear the bar so only the folder bar stays visible in folder mode
        progress_bar.finish_and_clear();
        let outcome = dispatched?;

        let events = assembler::assemble(&subtitles.entries, &outcome.results, batch_size);
        let unavailable_count = outcome.results.iter().map(|r| r.failed_count()).sum();

        Ok(TranslationReport {
            document: assembler::render_document(&events),
            caption_count: subtitles.entries.len(),
            unavailable_count,
            token_usage: outcome.token_usage,
            duration: start_time.elapsed(),
        })
    }

    /// Convert one SRT file into a bilingual ASS file
    ///
    /// The output defaults to the input path with an `.ass` extension. An
    /// existing output is kept unless `force_overwrite` is set.
    pub async fn run(&self, input_file: PathBuf, output_file: Option<PathBuf>, force_overwrite: bool) -> Result<RunStatus> {
        let multi_progress = MultiProgress::new();
        self.run_with_progress(&input_file, output_file, &multi_progress, force_overwrite).await
    }

    async fn run_with_progress(
        &self,
        input_file: &Path,
        output_file: Option<PathBuf>,
        multi_progress: &MultiProgress,
        force_overwrite: bool,
    ) -> Result<RunStatus> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_path = output_file.unwrap_or_else(|| FileManager::ass_output_path(input_file));
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {}, output already exists (use -f to force overwrite)", output_path.display());
            return Ok(RunStatus::Skipped(output_path));
        }

        let content = FileManager::read_to_string(input_file)?;
        let report = self.translate_content_with_progress(input_file, &content, multi_progress).await?;

        FileManager::write_to_file(&output_path, &report.document)?;

        if report.unavailable_count > 0 {
            warn!(
                "{} of {} captions have no translation and use a placeholder",
                report.unavailable_count, report.caption_count
            );
        }
        info!(
            "Success: {} ({} captions in {})",
            output_path.display(),
            report.caption_count,
            Self::format_duration(report.duration)
        );

        // Only log the token usage information at the end of the translation process
        if report.token_usage.total_tokens > 0 {
            info!("{}", report.token_usage.summary());
        }

        Ok(RunStatus::Written(output_path))
    }

    /// Convert every SRT file under `input_dir`, writing each output next to its input
    ///
    /// A file that fails is logged and counted; the others still run.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let subtitle_files = FileManager::find_subtitle_files(&input_dir)?;
        if subtitle_files.is_empty() {
            return Err(anyhow!("No subtitle files found in directory: {:?}", input_dir));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = self.progress_bar(&multi_progress, subtitle_files.len() as u64, "files");
        folder_pb.set_message("Processing files");

        let mut summary = FolderSummary::default();

        for subtitle_file in &subtitle_files {
            if self.cancellation.is_cancelled() {
                warn!("Folder processing cancelled");
                break;
            }

            let file_name = subtitle_file.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            match self.run_with_progress(subtitle_file, None, &multi_progress, force_overwrite).await {
                Ok(RunStatus::Written(_)) => summary.processed += 1,
                Ok(RunStatus::Skipped(_)) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed in {}: {} processed, {} skipped, {} errors",
            Self::format_duration(start_time.elapsed()),
            summary.processed, summary.skipped, summary.failed
        );

        Ok(summary)
    }

    /// Convert a file or every SRT file of a folder, depending on what `input_path` is
    pub async fn run_path(&self, input_path: PathBuf, output_file: Option<PathBuf>, force_overwrite: bool) -> Result<()> {
        match FileManager::detect_file_type(&input_path)? {
            FileType::Directory => {
                if output_file.is_some() {
                    warn!("--output is ignored in folder mode");
                }
                self.run_folder(input_path, force_overwrite).await.map(|_| ())
            }
            FileType::Subtitle => self.run(input_path, output_file, force_overwrite).await.map(|_| ()),
            FileType::Unknown => Err(anyhow!("Not a subtitle file: {:?}", input_path)),
        }
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
