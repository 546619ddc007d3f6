/*!
 * Tests for the error taxonomy
 */

use dualsub::errors::{AppError, BackendError, ProviderError, SubtitleError, TranslationError};

#[test]
fn test_error_messages_shouldNameTheProblem() {
    let parse = SubtitleError::NoCaptions { blocks: 4 };
    assert!(parse.to_string().contains("4 blocks"));

    let backend = BackendError::MissingCredential { provider: "DeepSeek".to_string() };
    assert!(backend.to_string().contains("DUALSUB_API_KEY"));

    let cancelled = TranslationError::Cancelled { completed: 2, total: 5 };
    assert_eq!(cancelled.to_string(), "Translation cancelled after 2 of 5 batches");
}

#[test]
fn test_app_error_conversions_shouldWrapSources() {
    let app: AppError = SubtitleError::NoCaptions { blocks: 0 }.into();
    assert!(matches!(app, AppError::Subtitle(_)));

    let app: AppError = ProviderError::Timeout(30).into();
    assert!(app.to_string().contains("30 seconds"));

    let app: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(app, AppError::File(_)));
}

#[test]
fn test_translation_error_fromProviderError_shouldKeepMessage() {
    let err: TranslationError = ProviderError::from_status(503, "busy".to_string()).into();
    assert!(err.to_string().contains("503"));
}
