//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start_dir`
///
/// Walks up parent directories until finding `config_name`.
/// An absolute `config_name` is only checked as-is.
///
/// # Example
/// ```text
/// /home/user/app/dist/pages/     ← start_dir
/// /home/user/app/linkhint.toml   ← found!
/// ```
pub fn find_config_file(config_name: &Path, start_dir: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.is_file().then(|| config_name.to_path_buf());
    }

    let mut current = start_dir;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_in_start_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("linkhint.toml"), "").unwrap();
        assert_eq!(
            find_config_file(Path::new("linkhint.toml"), dir.path()),
            Some(dir.path().join("linkhint.toml"))
        );
    }

    #[test]
    fn test_directory_with_config_name_is_skipped() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a");
        fs::create_dir_all(nested.join("linkhint.toml")).unwrap();
        fs::write(dir.path().join("linkhint.toml"), "").unwrap();
        assert_eq!(
            find_config_file(Path::new("linkhint.toml"), &nested),
            Some(dir.path().join("linkhint.toml"))
        );
    }

    #[test]
    fn test_absolute_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        assert_eq!(find_config_file(&path, Path::new("/")), None);
        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(&path, Path::new("/")), Some(path));
    }
}
