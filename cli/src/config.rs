use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub struct Config {
    pub db_path: PathBuf,
    pub data_dir: PathBuf,
}

impl Config {
    /// Resolve the data directory (the platform default unless overridden)
    /// and make sure it exists.
    pub fn load(data_dir_override: Option<&Path>) -> Result<Self> {
        let data_dir = if let Some(dir) = data_dir_override {
            dir.to_path_buf()
        } else {
            let proj_dirs = ProjectDirs::from("", "", "mealprefs")
                .context("Could not determine home directory")?;
            proj_dirs.data_dir().to_path_buf()
        };

        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let db_path = data_dir.join("mealprefs.db");

        Ok(Config { db_path, data_dir })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("data");

        let config = Config::load(Some(&dir)).unwrap();

        assert!(dir.is_dir());
        assert_eq!(config.data_dir, dir);
        assert_eq!(config.db_path, dir.join("mealprefs.db"));
    }
}
