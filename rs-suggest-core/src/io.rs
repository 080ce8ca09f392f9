use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./datasets/fa.csv"` → `"fa"`
/// - `"fa.csv"` → `"fa"`
pub(crate) fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
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
pub(crate) fn normalize_folder(input: &Path) -> PathBuf {
	if input == Path::new(".") || input == Path::new("./") {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_path_buf()
	}
}

/// Lists all regular files in a directory, sorted by name.
///
/// Returns full paths. Sub-directories are skipped and logged.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P) -> io::Result<Vec<PathBuf>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() {
			files.push(path);
		} else {
			log::warn!("Skipping non-file corpus entry {}", path.display());
		}
	}

	files.sort();
	Ok(files)
}
