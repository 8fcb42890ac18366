/*!
 * Directory-level driver tests
 */

use std::fs;

use anyhow::Result;
use datxlate::errors::AppError;
use datxlate::app_controller::RunOptions;
use datxlate::progress::ProgressEvent;
use datxlate::providers::mock::MockTranslator;
use crate::common;

#[tokio::test]
async fn test_run_shouldWriteOutputsOnlyForFilesWithContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "a.dat", "name=Hello\nvalue=3.5\n")?;
    common::create_test_file(dir, "b.dat", "# only numbers\nx=1\ny=2E\n")?;
    common::create_test_file(dir, "c.txt", "Some notes here\n")?;
    let (controller, sink) = common::mock_controller(MockTranslator::working());

    let summary = controller.run(&common::run_options(dir)).await?;

    assert_eq!(summary.files.len(), 3);
    assert_eq!(summary.total_items(), 2);
    assert_eq!(summary.written, vec![dir.join("a_translated.dat"), dir.join("c_translated.txt")]);
    assert!(summary.failed.is_empty());
    assert!(!dir.join("b_translated.dat").exists());
    assert_eq!(fs::read_to_string(dir.join("a_translated.dat"))?, "name=HELLO\nvalue=3.5\n");
    assert_eq!(fs::read_to_string(dir.join("c_translated.txt"))?, "SOME NOTES HERE\n");

    let written = sink
        .events()
        .iter()
        .filter(|e| matches!(e, ProgressEvent::FileWritten { .. }))
        .count();
    assert_eq!(written, 2);
    Ok(())
}

#[tokio::test]
async fn test_run_withAnalyzeOnly_shouldWriteNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "a.dat", "name=Hello\nNote: Check this\n")?;
    common::create_test_file(dir, "b.dat", "x=1\n")?;
    let mock = MockTranslator::working();
    let (controller, _) = common::mock_controller(mock.clone());

    let summary = controller
        .run(&RunOptions {
            analyze_only: true,
            ..common::run_options(dir)
        })
        .await?;

    assert_eq!(summary.total_items(), 2);
    let without: Vec<_> = summary.files_without_content().map(|f| f.path.clone()).collect();
    assert_eq!(without, vec![dir.join("b.dat")]);
    assert_eq!(mock.request_count(), 0);
    assert_eq!(fs::read_dir(dir)?.count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_run_withPatternAndSlicing_shouldProcessSelectedFilesOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    for name in ["unit_1.dat", "unit_2.dat", "unit_3.dat", "other.dat"] {
        common::create_test_file(dir, name, "label=Hello\n")?;
    }
    let (controller, _) = common::mock_controller(MockTranslator::working());

    let summary = controller
        .run(&RunOptions {
            pattern: Some("unit".to_string()),
            start_index: 1,
            max_files: Some(1),
            ..common::run_options(dir)
        })
        .await?;

    assert_eq!(summary.written, vec![dir.join("unit_2_translated.dat")]);
    Ok(())
}

#[tokio::test]
async fn test_run_withPreviousOutputs_shouldIgnoreThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "a.dat", "name=Hello\n")?;
    let (controller, _) = common::mock_controller(MockTranslator::working());

    controller.run(&common::run_options(dir)).await?;
    let second = controller.run(&common::run_options(dir)).await?;

    assert_eq!(second.files.len(), 1);
    assert!(!dir.join("a_translated_translated.dat").exists());
    Ok(())
}

#[tokio::test]
async fn test_run_withNoInputFiles_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "readme.md", "Hello\n")?;
    let (controller, _) = common::mock_controller(MockTranslator::working());

    let result = controller.run(&common::run_options(temp_dir.path())).await;
    assert!(matches!(result, Err(AppError::NoInputFiles(_))));

    let missing = controller
        .run(&common::run_options(&temp_dir.path().join("missing")))
        .await;
    assert!(matches!(missing, Err(AppError::NoInputFiles(_))));
    Ok(())
}

#[tokio::test]
async fn test_run_withFailingBackend_shouldStillWriteOriginalText() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "a.dat", "name=Hello\r\nx=1\r\n")?;
    let mock = MockTranslator::failing(datxlate::BackendError::ApiError {
        status_code: 500,
        message: "boom".to_string(),
    });
    let (controller, sink) = common::mock_controller(mock);

    let summary = controller.run(&common::run_options(dir)).await?;

    assert_eq!(summary.written.len(), 1);
    assert_eq!(fs::read_to_string(dir.join("a_translated.dat"))?, "name=Hello\nx=1\r\n");
    assert!(sink
        .events()
        .iter()
        .any(|e| matches!(e, ProgressEvent::BlockFallback { .. })));
    Ok(())
}

#[tokio::test]
async fn test_run_withUnwritableOutput_shouldReportAndContinue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "a.dat", "name=Hello\n")?;
    common::create_test_file(dir, "b.dat", "name=World\n")?;
    // A directory in place of the output file makes the write fail
    fs::create_dir(dir.join("a_translated.dat"))?;
    let (controller, sink) = common::mock_controller(MockTranslator::working());

    let summary = controller.run(&common::run_options(dir)).await?;

    assert_eq!(summary.failed, vec![dir.join("a.dat")]);
    assert_eq!(summary.written, vec![dir.join("b_translated.dat")]);
    assert_eq!(fs::read_to_string(dir.join("b_translated.dat"))?, "name=WORLD\n");
    assert!(sink.events().iter().any(|e| matches!(
        e,
        ProgressEvent::FileFailed { path, .. } if *path == dir.join("a.dat")
    )));
    Ok(())
}

#[tokio::test]
async fn test_run_withSymlinkedInput_shouldIncludeIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    let target = common::create_test_file(source_dir.path(), "shared.dat", "name=Hello\n")?;
    #[cfg(unix)]
    std::os::unix::fs::symlink(&target, dir.join("linked.dat"))?;
    #[cfg(not(unix))]
    fs::copy(&target, dir.join("linked.dat"))?;
    let (controller, _) = common::mock_controller(MockTranslator::working());

    let files = controller.discover_files(&common::run_options(dir))?;

    assert_eq!(files, vec![dir.join("linked.dat")]);
    Ok(())
}
