/*!
 * Integration tests for file and folder runs through the controller
 */

use anyhow::Result;
use std::fs;

use dualsub::app_controller::{FolderSummary, RunStatus};
use dualsub::file_utils::FileManager;
use dualsub::providers::mock::MockProvider;
use crate::common;

/// Test that a file run writes the ASS file next to the input
#[tokio::test]
async fn test_run_withSubtitleFile_shouldWriteAssNextToInput() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "episode.srt")?;

    let status = common::mock_controller(MockProvider::working(), 2).run(input, None, false).await?;

    let expected = temp_dir.path().join("episode.ass");
    assert_eq!(status, RunStatus::Written(expected.clone()));
    let document = FileManager::read_to_string(&expected)?;
    assert!(document.starts_with("[Script Info]"));
    assert_eq!(document.lines().filter(|l| l.starts_with("Dialogue:")).count(), 6);
    Ok(())
}

/// Test that an existing output is kept unless overwriting is forced
#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let output = common::create_test_file(temp_dir.path(), "movie.ass", "keep me")?;
    let controller = common::mock_controller(MockProvider::working(), 2);

    let status = controller.run(input.clone(), None, false).await?;
    assert_eq!(status, RunStatus::Skipped(output.clone()));
    assert_eq!(fs::read_to_string(&output)?, "keep me");

    let status = controller.run(input, None, true).await?;
    assert_eq!(status, RunStatus::Written(output.clone()));
    assert_ne!(fs::read_to_string(&output)?, "keep me");
    Ok(())
}

/// Test an explicit output path
#[tokio::test]
async fn test_run_withOutputPath_shouldWriteThere() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let output = temp_dir.path().join("out/bilingual.ass");

    common::mock_controller(MockProvider::working(), 2)
        .run(input, Some(output.clone()), false)
        .await?;

    assert!(output.is_file());
    assert!(!temp_dir.path().join("movie.ass").exists());
    Ok(())
}

/// Test that a missing input file is an error
#[tokio::test]
async fn test_run_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let result = common::mock_controller(MockProvider::working(), 2)
        .run(temp_dir.path().join("missing.srt"), None, false)
        .await;
    assert!(result.is_err());
    Ok(())
}

/// Test a folder run with a good file, a broken file and an existing output
#[tokio::test]
async fn test_run_folder_withMixedFiles_shouldContinuePastFailures() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    common::create_test_subtitle(temp_dir.path(), "s01/e01.srt")?;
    common::create_test_file(temp_dir.path(), "s01/e02.srt", "no captions in here")?;
    common::create_test_subtitle(temp_dir.path(), "s01/e03.srt")?;
    common::create_test_file(temp_dir.path(), "s01/e03.ass", "done already")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "ignored")?;

    let summary = common::mock_controller(MockProvider::working(), 2)
        .run_folder(temp_dir.path().to_path_buf(), false)
        .await?;

    assert_eq!(summary, FolderSummary { processed: 1, skipped: 1, failed: 1 });
    assert!(temp_dir.path().join("s01/e01.ass").is_file());
    assert!(!temp_dir.path().join("s01/e02.ass").exists());
    Ok(())
}

/// Test that a folder without subtitles is an error
#[tokio::test]
async fn test_run_folder_withoutSubtitleFiles_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "readme.md", "nothing")?;

    let result = common::mock_controller(MockProvider::working(), 2)
        .run_folder(temp_dir.path().to_path_buf(), false)
        .await;
    assert!(result.is_err());
    Ok(())
}

/// Test that run_path dispatches on the kind of input
#[tokio::test]
async fn test_run_path_withDirectoryAndFile_shouldHandleBoth() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let single = common::create_test_subtitle(temp_dir.path(), "single.srt")?;
    let controller = common::mock_controller(MockProvider::working(), 2);

    controller.run_path(single, None, false).await?;
    assert!(temp_dir.path().join("single.ass").is_file());

    common::create_test_subtitle(temp_dir.path(), "nested/other.srt")?;
    controller.run_path(temp_dir.path().to_path_buf(), None, false).await?;
    assert!(temp_dir.path().join("nested/other.ass").is_file());

    let unknown = common::create_test_file(temp_dir.path(), "notes.txt", "plain text")?;
    assert!(controller.run_path(unknown, None, false).await.is_err());
    Ok(())
}

/// Test that cancelling while a request is in flight stops the run without writing output
#[tokio::test]
async fn test_run_whenCancelledInFlight_shouldNotWriteOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "late.srt")?;
    let controller = common::mock_controller(MockProvider::slow(5_000), 2);

    let trigger = controller.cancellation_token();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let start = std::time::Instant::now();
    let result = controller.run(input, None, false).await;

    assert!(result.is_err());
    assert!(start.elapsed() < std::time::Duration::from_millis(900));
    assert!(!temp_dir.path().join("late.ass").exists());
    Ok(())
}
