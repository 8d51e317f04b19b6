//! Directory scan for passthrough module candidates.

use std::path::Path;

/// Returns the names of entries in `path` that start with `prefix` and end
/// with `suffix`, in directory order.
///
/// An unreadable directory yields no candidates. No file type check is made;
/// the loader rejects anything that is not a library.
pub fn search(path: &Path, prefix: &str, suffix: &str) -> Vec<String> {
	let Ok(entries) = std::fs::read_dir(path) else {
		return Vec::new();
	};

	entries
		.flatten()
		.filter_map(|entry| entry.file_name().into_string().ok())
		.filter(|name| name.starts_with(prefix) && name.ends_with(suffix))
		.collect()
}

#[cfg(test)]
mod tests {
	use std::fs;

	use super::*;

	fn sorted(mut names: Vec<String>) -> Vec<String> {
		names.sort();
		names
	}

	#[test]
	fn test_search_filters_prefix_and_suffix() {
		let dir = tempfile::tempdir().unwrap();
		for name in [
			"android.hardware.nfc@1.0-impl.so",
			"android.hardware.nfc@1.0-impl-nxp.so",
			"android.hardware.nfc@1.0-impl.so.bak",
			"android.hardware.nfc@1.1-impl.so",
			"libnfc.so",
		] {
			fs::write(dir.path().join(name), b"").unwrap();
		}

		let found = sorted(search(dir.path(), "android.hardware.nfc@1.0-impl", ".so"));
		assert_eq!(found, vec!["android.hardware.nfc@1.0-impl-nxp.so", "android.hardware.nfc@1.0-impl.so"]);
	}

	#[test]
	fn test_search_includes_matching_directories() {
		let dir = tempfile::tempdir().unwrap();
		fs::create_dir(dir.path().join("pkg@1.0-impl.so")).unwrap();

		assert_eq!(search(dir.path(), "pkg@1.0-impl", ".so"), vec!["pkg@1.0-impl.so"]);
	}

	#[test]
	fn test_search_missing_directory_is_empty() {
		let dir = tempfile::tempdir().unwrap();
		assert!(search(&dir.path().join("absent"), "pkg@1.0-impl", ".so").is_empty());
	}
}
