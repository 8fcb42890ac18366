/*!
 * Tests for file utility functions
 */

use std::path::Path;

use anyhow::Result;
use datxlate::file_utils::{FileManager, TextEncoding};
use crate::common;

/// Discovery groups by extension order, sorts by name, and skips outputs
#[test]
fn test_findInputFiles_shouldOrderByExtensionThenName() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    for name in ["b.txt", "z.dat", "a.txt", "m.dat", "m_translated.dat", ".hidden.dat", "notes.csv"] {
        common::create_test_file(dir, name, "x=Hello\n")?;
    }
    std::fs::create_dir(dir.join("nested.dat"))?;

    let extensions = vec!["dat".to_string(), "txt".to_string()];
    let files = FileManager::find_input_files(dir, &extensions, None, "_translated")?;
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(names, vec!["m.dat", "z.dat", "a.txt", "b.txt"]);
    Ok(())
}

/// The pattern filters on the file stem
#[test]
fn test_findInputFiles_withPattern_shouldFilterByStem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    for name in ["units_a.dat", "labels.dat", "units_b.txt"] {
        common::create_test_file(dir, name, "x=Hello\n")?;
    }

    let extensions = vec!["dat".to_string(), "txt".to_string()];
    let files = FileManager::find_input_files(dir, &extensions, Some("units"), "_translated")?;

    assert_eq!(files, vec![dir.join("units_a.dat"), dir.join("units_b.txt")]);
    Ok(())
}

/// UTF-16 input is read and written back as UTF-8
#[test]
fn test_readLines_withUtf16File_shouldDecodeAndKeepLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut bytes = vec![0xFF, 0xFE];
    for unit in "name=Bonjour\r\n# c\r\n".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let path = common::create_test_bytes(temp_dir.path(), "utf16.dat", &bytes)?;

    let decoded = FileManager::read_lines(&path)?;
    assert_eq!(decoded.encoding, TextEncoding::Utf16Le);
    assert_eq!(decoded.lines, vec!["name=Bonjour\r\n", "# c\r\n"]);

    let output = temp_dir.path().join("out.dat");
    FileManager::write_lines(&output, &decoded.lines)?;
    assert_eq!(std::fs::read(&output)?, b"name=Bonjour\r\n# c\r\n");
    Ok(())
}

/// A missing file surfaces as an I/O error
#[test]
fn test_readLines_withMissingFile_shouldFail() {
    assert!(FileManager::read_lines(Path::new("./definitely_missing_12345.dat")).is_err());
}

/// Test that dir_exists returns false for non-existent directories
#[test]
fn test_dirExists_withNonExistentDir_shouldReturnFalse() {
    assert!(!FileManager::dir_exists("./non_existent_directory_12345"));
    assert!(FileManager::dir_exists("."));
}
