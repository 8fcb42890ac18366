/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use datxlate::app_config::{Config, TranslationProvider};
use datxlate::translation::BatchOptions;
use std::time::Duration;
use crate::common;

#[test]
fn test_fromFile_withPartialConfig_shouldKeepDefaultsElsewhere() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"target_language": "de", "files": {"extensions": ["cfg"]}}"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.target_language, "de");
    assert_eq!(config.files.extensions, vec!["cfg"]);
    assert_eq!(config.files.output_marker, "_translated");
    assert_eq!(config.translation.provider, TranslationProvider::Google);
    config.validate()?;
    Ok(())
}

#[test]
fn test_fromFile_withMalformedJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;
    assert!(Config::from_file(&path).is_err());
    Ok(())
}

#[test]
fn test_validate_withBadSourceLanguage_shouldFail() {
    let mut config = Config::default();
    config.source_language = "zz".to_string();
    assert!(config.validate().is_err());

    config.source_language = "en".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withBadEndpoint_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.translation.ollama.endpoint = "localhost without scheme".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_batchOptions_fromConfig_shouldCarryBatchSettings() {
    let options = BatchOptions::from_config(&Config::default());
    assert_eq!(options.max_block_chars, 3000);
    assert_eq!(options.max_attempts, 3);
    assert_eq!(options.retry_backoff, Duration::from_secs(2));
    assert_eq!(options.source_language, "auto");
    assert_eq!(options.target_language, "zh-CN");
}
