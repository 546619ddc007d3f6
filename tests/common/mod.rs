/*!
 * Common test utilities for the dualsub test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use std::sync::Arc;
use anyhow::Result;
use tempfile::TempDir;

use dualsub::app_config::{Config, TranslationProvider};
use dualsub::app_controller::Controller;
use dualsub::providers::mock::MockProvider;

/// Three captions, the second one spread over two lines
pub const SAMPLE_SRT: &str = "1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,500
It contains
multiple lines.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
";

/// Install a test logger once; repeated calls are ignored
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_SRT)
}

/// Configuration for the key-less backend with a given batch size
pub fn test_config(batch_size: usize) -> Config {
    let mut config = Config::default();
    config.target_language = "fr".to_string();
    config.translation.provider = TranslationProvider::Google;
    config.translation.common.retry_count = 0;
    config.translation.common.retry_backoff_ms = 1;

    let provider_config = config.translation.active_provider_config_mut();
    provider_config.batch_size = Some(batch_size);
    provider_config.timeout_secs = 1;
    config
}

/// Controller wired to a mock backend, without progress bars
pub fn mock_controller(provider: MockProvider, batch_size: usize) -> Controller {
    Controller::with_provider(test_config(batch_size), Arc::new(provider))
}
