use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};
use log::debug;
use walkdir::WalkDir;

use crate::errors::FileError;

// @module: File discovery, encoding-tolerant reading and UTF-8 output

/// Text encodings tried when reading a data file, in preference order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8, with or without a byte order mark
    Utf8,
    /// UTF-16 little endian, detected by its byte order mark
    Utf16Le,
    /// UTF-16 big endian, detected by its byte order mark
    Utf16Be,
    /// Latin-1 superset; decodes any byte sequence
    Windows1252,
}

impl TextEncoding {
    /// All encodings in the order they are attempted
    pub const PREFERENCE: [TextEncoding; 4] = [
        TextEncoding::Utf8,
        TextEncoding::Utf16Le,
        TextEncoding::Utf16Be,
        TextEncoding::Windows1252,
    ];

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf16Le => "utf-16le",
            Self::Utf16Be => "utf-16be",
            Self::Windows1252 => "windows-1252",
        }
    }

    // BOM required before this encoding is even attempted
    fn required_bom(&self) -> Option<&'static [u8]> {
        match self {
            Self::Utf16Le => Some(&[0xFF, 0xFE]),
            Self::Utf16Be => Some(&[0xFE, 0xFF]),
            _ => None,
        }
    }

    fn encoding(&self) -> &'static Encoding {
        match self {
            Self::Utf8 => UTF_8,
            Self::Utf16Le => UTF_16LE,
            Self::Utf16Be => UTF_16BE,
            Self::Windows1252 => WINDOWS_1252,
        }
    }

    /// Strictly decode bytes, returning None on any malformed sequence
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        let body = match self.required_bom() {
            Some(bom) => bytes.strip_prefix(bom)?,
            None if *self == Self::Utf8 => bytes.strip_prefix(&[0xEF_u8, 0xBB, 0xBF]).unwrap_or(bytes),
            None => bytes,
        };
        self.encoding()
            .decode_without_bom_handling_and_without_replacement(body)
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A file decoded into lines, terminators kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFile {
    /// Source path
    pub path: PathBuf,
    /// Lines in order, each with its original terminator
    pub lines: Vec<String>,
    /// Encoding that succeeded
    pub encoding: TextEncoding,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    /// Decode raw bytes with the first encoding that accepts them
    pub fn decode_bytes(bytes: &[u8]) -> Option<(String, TextEncoding)> {
        TextEncoding::PREFERENCE.iter().find_map(|encoding| {
            encoding
                .decode(bytes)
                .map(|text| (text.into_owned(), *encoding))
        })
    }

    /// Split text into lines on `\n`, `\r\n` or a lone `\r`, keeping each
    /// terminator with its line
    pub fn split_lines(text: &str) -> Vec<String> {
        let bytes = text.as_bytes();
        let mut lines = Vec::new();
        let mut start = 0;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    lines.push(text[start..=i].to_string());
                    start = i + 1;
                }
                b'\r' => {
                    let end = if bytes.get(i + 1) == Some(&b'\n') { i + 1 } else { i };
                    lines.push(text[start..=end].to_string());
                    start = end + 1;
                    i = end;
                }
                _ => {}
            }
            i += 1;
        }

        if start < text.len() {
            lines.push(text[start..].to_string());
        }
        lines
    }

    /// Read a file trying each supported encoding in turn
    pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<DecodedFile, FileError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| FileError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let (text, encoding) = Self::decode_bytes(&bytes).ok_or_else(|| FileError::Unreadable {
            path: path.to_path_buf(),
            tried: TextEncoding::PREFERENCE
                .iter()
                .map(TextEncoding::label)
                .collect::<Vec<_>>()
                .join(", "),
        })?;

        debug!("Decoded {:?} as {}", path, encoding);

        Ok(DecodedFile {
            path: path.to_path_buf(),
            lines: Self::split_lines(&text),
            encoding,
        })
    }

    /// Write lines to a file as UTF-8
    pub fn write_lines<P: AsRef<Path>>(path: P, lines: &[String]) -> Result<(), FileError> {
        let path = path.as_ref();
        fs::write(path, lines.concat()).map_err(|source| FileError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    // @generates: Output path with the marker inserted before the extension
    pub fn generate_output_path<P: AsRef<Path>>(input_file: P, marker: &str) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();

        let mut output_filename = format!("{}{}", stem, marker);
        if let Some(ext) = input_file.extension() {
            output_filename.push('.');
            output_filename.push_str(&ext.to_string_lossy());
        }

        input_file.with_file_name(output_filename)
    }

    /// True when the file already carries the output marker
    pub fn is_output_file<P: AsRef<Path>>(path: P, marker: &str) -> bool {
        path.as_ref()
            .file_stem()
            .is_some_and(|stem| stem.to_string_lossy().ends_with(marker))
    }

    /// Find candidate input files directly inside a directory.
    ///
    /// Files are grouped by extension in the given order and sorted by name
    /// within each group. Hidden files and previously generated outputs are
    /// left out; `pattern` must occur in the file stem when given.
    pub fn find_input_files<P: AsRef<Path>>(
        dir: P,
        extensions: &[String],
        pattern: Option<&str>,
        marker: &str,
    ) -> Result<Vec<PathBuf>, FileError> {
        let dir = dir.as_ref();
        let mut candidates = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                // Dangling symlink inside the directory
                Err(e) if e.depth() > 0 => {
                    debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
                Err(e) => {
                    return Err(FileError::Io {
                        path: dir.to_path_buf(),
                        source: e.into(),
                    });
                }
            };
            let path = entry.path();

            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if name.starts_with('.') || Self::is_output_file(path, marker) {
                continue;
            }

            if let Some(pattern) = pattern {
                let stem = path.file_stem().unwrap_or_default().to_string_lossy();
                if !stem.contains(pattern) {
                    continue;
                }
            }

            candidates.push(path.to_path_buf());
        }

        let mut result = Vec::new();
        for extension in extensions {
            let mut group: Vec<PathBuf> = candidates
                .iter()
                .filter(|path| {
                    path.extension()
                        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
                })
                .cloned()
                .collect();
            group.sort();
            result.extend(group);
        }

        Ok(result)
    }
}
