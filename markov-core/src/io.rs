use std::path::{Path, PathBuf};
use std::{env, fs, io};

use crate::error::{MarkovError, Result};

/// File written by `save_to("")`.
pub const DEFAULT_OUTPUT: &str = "output.json";

/// Reads a text file and returns its content as a single line.
///
/// - Reads the entire file into memory
/// - Joins lines (`\n` / `\r\n`) with a single space so words on adjacent
///   lines never fuse together
pub fn read_text<P: AsRef<Path>>(filename: P) -> Result<String> {
	let path = filename.as_ref();
	let contents = fs::read_to_string(path).map_err(|e| MarkovError::io(path, e))?;
	Ok(contents.lines().collect::<Vec<_>>().join(" "))
}

/// Resolves the destination of a save.
///
/// - An empty path resolves to `output.json` in the current working directory
/// - An existing directory, a path without a file name, or a path whose
///   parent directory does not exist is rejected with `InvalidPath`
pub fn resolve_save_path<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
	let path = path.as_ref();
	if path.as_os_str().is_empty() {
		let wd = env::current_dir().map_err(|e| MarkovError::io(".", e))?;
		return Ok(wd.join(DEFAULT_OUTPUT));
	}

	if path.is_dir() || path.file_name().is_none() {
		return Err(MarkovError::InvalidPath(path.to_path_buf()));
	}

	match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
			Err(MarkovError::InvalidPath(path.to_path_buf()))
		}
		_ => Ok(path.to_path_buf()),
	}
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/guild.json"` → `"guild"`
/// - `"guild.json"` → `"guild"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists all files with a given extension in a directory.
///
/// Returns full paths, sorted so callers see a stable order.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<PathBuf>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			files.push(path);
		}
	}

	files.sort();
	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn read_text_joins_lines_with_spaces() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("corpus.txt");
		fs::write(&path, "first line\r\nsecond line\nthird").unwrap();

		assert_eq!(read_text(&path).unwrap(), "first line second line third");
	}

	#[test]
	fn read_text_reports_missing_file() {
		let err = read_text("definitely/not/here.txt").unwrap_err();
		assert!(matches!(err, MarkovError::Io { .. }));
	}

	#[test]
	fn empty_save_path_defaults_to_output_json() {
		let path = resolve_save_path("").unwrap();
		assert_eq!(path.file_name().unwrap(), DEFAULT_OUTPUT);
	}

	#[test]
	fn save_path_rejects_directories_and_missing_parents() {
		let dir = tempfile::tempdir().unwrap();
		assert!(matches!(resolve_save_path(dir.path()), Err(MarkovError::InvalidPath(_))));

		let orphan = dir.path().join("missing").join("model.json");
		assert!(matches!(resolve_save_path(&orphan), Err(MarkovError::InvalidPath(_))));

		let ok = dir.path().join("model.json");
		assert_eq!(resolve_save_path(&ok).unwrap(), ok);
	}

	#[test]
	fn list_files_filters_by_extension() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("b.json"), "{}").unwrap();
		fs::write(dir.path().join("a.json"), "{}").unwrap();
		fs::write(dir.path().join("notes.txt"), "").unwrap();
		fs::create_dir(dir.path().join("nested.json")).unwrap();

		let names: Vec<String> = list_files(dir.path(), "json")
			.unwrap()
			.iter()
			.map(|p| get_filename(p).unwrap())
			.collect();
		assert_eq!(names, vec!["a", "b"]);
	}
}
