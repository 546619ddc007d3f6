/*!
 * Tests for configuration loading, defaults and validation
 */

use anyhow::Result;
use dualsub::app_config::{Config, TranslationProvider};
use dualsub::errors::BackendError;
use dualsub::translation::DispatchMode;

/// Test that the default config serializes and reads back unchanged
#[test]
fn test_default_config_throughJson_shouldKeepEveryProvider() -> Result<()> {
    let json = serde_json::to_string_pretty(&Config::default())?;
    let config: Config = serde_json::from_str(&json)?;

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "zh");
    assert_eq!(config.translation.provider, TranslationProvider::DeepSeek);
    assert!(config.translation.get_provider_config(&TranslationProvider::Google).is_some());
    assert!((config.translation.common.temperature - 0.1).abs() < f32::EPSILON);
    Ok(())
}

/// Test a minimal hand-written config file falls back to backend defaults
#[test]
fn test_minimal_config_withoutProviderEntries_shouldUseProfileDefaults() -> Result<()> {
    let json = r#"{
        "source_language": "en",
        "target_language": "ja",
        "translation": { "provider": "google" }
    }"#;
    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.translation.get_batch_size(), 20);
    assert_eq!(config.translation.get_concurrent_requests(), 1);
    assert_eq!(config.translation.get_dispatch_mode(), DispatchMode::Sequential);
    assert_eq!(config.translation.get_endpoint(), "https://translate.googleapis.com");
    assert_eq!(config.translation.common.retry_count, 1);
    config.validate()?;
    Ok(())
}

/// Test that the key requirement is reported as a backend error
#[test]
fn test_check_credentials_withDeepSeekWithoutKey_shouldReportMissingCredential() {
    let config = Config::default();
    assert_eq!(
        config.translation.check_credentials(),
        Err(BackendError::MissingCredential { provider: "DeepSeek".to_string() })
    );

    let err = config.validate().unwrap_err();
    assert!(err.downcast_ref::<BackendError>().is_some());
}

/// Test that a key set through the mutable accessor satisfies validation
#[test]
fn test_active_provider_config_mut_withKey_shouldValidate() {
    let mut config = Config::default();
    config.translation.active_provider_config_mut().api_key = "sk-test".to_string();
    assert!(config.validate().is_ok());
    assert_eq!(config.translation.get_api_key(), "sk-test");
}

/// Test per-provider overrides of the dispatch settings
#[test]
fn test_dispatch_settings_withOverrides_shouldPreferProviderConfig() {
    let mut config = Config::default();
    {
        let provider_config = config.translation.active_provider_config_mut();
        provider_config.batch_size = Some(10);
        provider_config.concurrent_requests = 2;
        provider_config.dispatch_mode = Some(DispatchMode::Sequential);
    }

    assert_eq!(config.translation.get_batch_size(), 10);
    assert_eq!(config.translation.get_concurrent_requests(), 2);
    assert_eq!(config.translation.get_dispatch_mode(), DispatchMode::Sequential);
}

/// Test validation of languages and endpoints
#[test]
fn test_validate_withInvalidValues_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Google;
    assert!(config.validate().is_ok());

    config.target_language = "klingon".to_string();
    assert!(config.validate().is_err());

    config.target_language = "fr".to_string();
    config.translation.active_provider_config_mut().endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
}
