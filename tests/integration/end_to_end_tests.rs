/*!
 * End-to-end scenarios over single files
 */

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use datxlate::errors::BackendError;
use datxlate::fields::{extract_translatable_content, ItemKind};
use datxlate::progress::{CollectingSink, LogSink, ProgressEvent};
use datxlate::providers::mock::MockTranslator;
use datxlate::translation::{BatchOptions, BatchTranslator};
use crate::common;

/// `name=Hello World` is extracted as a key/value item and rewritten in place
#[tokio::test]
async fn test_keyValueLine_withStubTranslation_shouldRewriteValue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "strings.dat", "name=Hello World\n")?;
    let mock = MockTranslator::working().with_custom_response(|_| "你好世界".to_string());
    let (controller, _) = common::mock_controller(mock);

    let extraction = extract_translatable_content(&input, &LogSink)?;
    assert_eq!(extraction.items.len(), 1);
    assert_eq!(extraction.items[0].kind, ItemKind::KeyValue { key: "name".to_string() });
    assert_eq!(extraction.items[0].value, "Hello World");

    let output = controller.process_file(&extraction).await?;
    assert_eq!(fs::read_to_string(output)?, "name=你好世界\n");
    Ok(())
}

/// Only the text column of a delimited record is a candidate
#[tokio::test]
async fn test_delimitedRecord_shouldTranslateOnlyTextColumn() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "table.dat", "A;12.5;Temperature;N\n")?;
    let (controller, _) = common::mock_controller(MockTranslator::working());

    let extraction = extract_translatable_content(&input, &LogSink)?;
    assert_eq!(extraction.items.len(), 1);
    assert_eq!(extraction.items[0].value, "Temperature");
    assert_eq!(extraction.items[0].kind, ItemKind::CsvCell { column_index: 2 });

    let output = controller.process_file(&extraction).await?;
    assert_eq!(fs::read_to_string(output)?, "A;12.5;TEMPERATURE;N\n");
    Ok(())
}

/// A drive path on the key side keeps the whole line out of translation
#[test]
fn test_drivePathKey_shouldProduceNoItem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "paths.dat", "C:\\path\\to\\file=something\n")?;

    let extraction = extract_translatable_content(&input, &LogSink)?;
    assert!(extraction.items.is_empty());
    Ok(())
}

/// Two timeouts then success: the block is translated after two backoff delays
#[tokio::test]
async fn test_transientTimeouts_shouldRetryThenTranslate() {
    common::init_logging();
    let mock = Arc::new(MockTranslator::fail_times(
        2,
        BackendError::Timeout("request timed out".to_string()),
    ));
    let sink = Arc::new(CollectingSink::new());
    let options = BatchOptions {
        retry_backoff: Duration::from_millis(5),
        ..BatchOptions::default()
    };
    let batch = BatchTranslator::new(mock.clone(), options, sink.clone());

    let texts = vec!["Hello".to_string(), "World".to_string()];
    let translated = batch.translate_texts(&texts).await;

    assert_eq!(translated, vec!["HELLO", "WORLD"]);
    assert_eq!(mock.request_count(), 3);
    assert_eq!(
        sink.retry_delays(),
        vec![Duration::from_millis(5), Duration::from_millis(10)]
    );
}

/// Every block failing still yields one text per input
#[tokio::test]
async fn test_failingBackend_shouldReturnSameLengthOutput() {
    common::init_logging();
    let mock = Arc::new(MockTranslator::failing(BackendError::ParseError("garbage".to_string())));
    let options = BatchOptions {
        max_block_chars: 12,
        ..BatchOptions::default()
    };
    let batch = BatchTranslator::new(mock.clone(), options, Arc::new(CollectingSink::new()));

    let texts: Vec<String> = (0..25).map(|i| format!("Item number {}", i)).collect();
    let translated = batch.translate_texts(&texts).await;

    assert_eq!(translated, texts);
    assert_eq!(mock.request_count(), 25);
}

/// A mixed file keeps comments, numbers and line endings of untouched lines
#[tokio::test]
async fn test_mixedFile_shouldOnlyAlterTranslatableSpans() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = "[General]\r\n\
                   # generated file\r\n\
                   title=Pump station\r\n\
                   count=12\r\n\
                   7;Inlet valve;Outlet valve;3,5\r\n\
                   Status: Running\r\n\
                   Free text line\r\n\
                   ref=[TAG_01]\r\n\
                   \r\n\
                   42\r\n";
    let input = common::create_test_file(temp_dir.path(), "station.dat", content)?;
    let (controller, _) = common::mock_controller(MockTranslator::working());

    let extraction = extract_translatable_content(&input, &LogSink)?;
    let values: Vec<&str> = extraction.items.iter().map(|i| i.value.as_str()).collect();
    assert_eq!(
        values,
        vec!["Pump station", "Inlet valve", "Outlet valve", "Running", "Free text line"]
    );

    let output = controller.process_file(&extraction).await?;
    assert_eq!(
        fs::read_to_string(output)?,
        "[General]\r\n\
         # generated file\r\n\
         title=PUMP STATION\n\
         count=12\r\n\
         7;INLET VALVE;OUTLET VALVE;3,5\n\
         Status: RUNNING\n\
         FREE TEXT LINE\n\
         ref=[TAG_01]\r\n\
         \r\n\
         42\r\n"
    );
    Ok(())
}

/// Windows-1252 input is written back as UTF-8
#[tokio::test]
async fn test_latin1File_shouldBeWrittenAsUtf8() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_bytes(temp_dir.path(), "legacy.dat", b"label=Caf\xE9 menu\n")?;
    let (controller, _) = common::mock_controller(MockTranslator::working());

    let extraction = extract_translatable_content(&input, &LogSink)?;
    assert_eq!(extraction.items[0].value, "Café menu");

    let output = controller.process_file(&extraction).await?;
    assert_eq!(fs::read_to_string(output)?, "label=CAFÉ MENU\n");
    Ok(())
}

/// Classic-Mac `\r` endings keep every line separate through the rewrite
#[tokio::test]
async fn test_carriageReturnOnlyFile_shouldKeepEveryLine() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "mac.dat", "name=Hello\rcount=3\rtitle=World\r")?;
    let (controller, _) = common::mock_controller(MockTranslator::working());

    let extraction = extract_translatable_content(&input, &LogSink)?;
    assert_eq!(extraction.file.lines.len(), 3);
    let values: Vec<(usize, &str)> = extraction
        .items
        .iter()
        .map(|item| (item.line_num, item.value.as_str()))
        .collect();
    assert_eq!(values, vec![(0, "Hello"), (2, "World")]);

    let output = controller.process_file(&extraction).await?;
    assert_eq!(fs::read_to_string(output)?, "name=HELLO\ncount=3\rtitle=WORLD\n");
    Ok(())
}

/// A file that cannot be read is reported and yields no items
#[test]
fn test_missingFile_shouldReportUnreadable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let missing = temp_dir.path().join("gone.dat");
    let sink = CollectingSink::new();

    let result = extract_translatable_content(&missing, &sink);

    assert!(result.is_err());
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        ProgressEvent::FileUnreadable { path, .. } if *path == missing
    ));
    Ok(())
}
