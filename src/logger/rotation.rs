//! Size-based rotation of the active log file

use std::fs;
use std::path::{Path, PathBuf};

use jiff::Zoned;

use crate::logger::compression::CompressionHandler;
use crate::logger::config::RotationConfig;
use crate::logger::error::LoggerError;

pub struct RotationManager {
    config: RotationConfig,
    compression_handler: CompressionHandler,
}

impl RotationManager {
    pub fn new(config: RotationConfig) -> Self {
        let compression_handler = CompressionHandler::new(config.compress);

        Self {
            config,
            compression_handler,
        }
    }

    pub fn should_rotate(&self, current_file_size: u64) -> bool {
        current_file_size >= self.config.max_size
    }

    /// Moves the active file aside, compresses it if configured, and prunes
    /// rotated files beyond `max_files`.
    pub fn rotate(&self, current_path: &Path) -> Result<(), LoggerError> {
        if current_path.exists() {
            let rotated_path = Self::rotated_path(current_path);
            fs::rename(current_path, &rotated_path)?;
            self.compression_handler.compress_file(&rotated_path)?;
        }

        self.cleanup_old_files(current_path)
    }

    /// `app.log` becomes `app.20240601_120000.log`, with a counter appended
    /// to the timestamp when several rotations land in the same second.
    fn rotated_path(base_path: &Path) -> PathBuf {
        let timestamp = Zoned::now().strftime("%Y%m%d_%H%M%S").to_string();
        let stem = base_path.file_stem().unwrap_or_default().to_string_lossy();
        let ext = base_path.extension().map(|e| e.to_string_lossy());

        let name_for = |tag: &str| match ext {
            Some(ref ext) => format!("{}.{}.{}", stem, tag, ext),
            None => format!("{}.{}", stem, tag),
        };

        let mut candidate = base_path.with_file_name(name_for(&timestamp));
        let mut counter = 1;
        while candidate.exists() || Self::gz_sibling(&candidate).exists() {
            candidate = base_path.with_file_name(name_for(&format!("{}-{}", timestamp, counter)));
            counter += 1;
        }
        candidate
    }

    fn gz_sibling(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(".gz");
        PathBuf::from(name)
    }

    fn cleanup_old_files(&self, base_path: &Path) -> Result<(), LoggerError> {
        let parent = match base_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let prefix = format!(
            "{}.",
            base_path.file_stem().unwrap_or_default().to_string_lossy()
        );

        let mut rotated_files: Vec<(Option<std::time::SystemTime>, PathBuf)> =
            fs::read_dir(parent)?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| {
                    path.as_path() != base_path
                        && path
                            .file_name()
                            .map(|name| name.to_string_lossy().starts_with(&prefix))
                            .unwrap_or(false)
                })
                .map(|path| {
                    let modified = fs::metadata(&path).and_then(|m| m.modified()).ok();
                    (modified, path)
                })
                .collect();

        // Oldest first; names carry the timestamp so they break ties
        rotated_files.sort();

        let excess = rotated_files.len().saturating_sub(self.config.max_files);
        for (_, path) in rotated_files.into_iter().take(excess) {
            fs::remove_file(path)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn config(max_size: u64, max_files: usize, compress: bool) -> RotationConfig {
        RotationConfig {
            max_size,
            max_files,
            compress,
        }
    }

    fn rotated_count(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                let name = e.file_name().to_string_lossy().to_string();
                name.starts_with("app.") && name != "app.log"
            })
            .count()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn property_rotation_triggers_at_max_size(
            current_size in 0u64..10_000_000u64,
            max_size in 1u64..10_000_000u64
        ) {
            let manager = RotationManager::new(config(max_size, 5, false));
            prop_assert_eq!(manager.should_rotate(current_size), current_size >= max_size);
        }
    }

    #[test]
    fn test_rotate_moves_active_file_aside() {
        let dir = tempdir().unwrap();
        let base_path = dir.path().join("app.log");
        fs::write(&base_path, "first").unwrap();

        RotationManager::new(config(10, 5, false)).rotate(&base_path).unwrap();

        assert!(!base_path.exists());
        assert_eq!(rotated_count(dir.path()), 1);
    }

    #[test]
    fn test_rotations_in_same_second_do_not_collide() {
        let dir = tempdir().unwrap();
        let base_path = dir.path().join("app.log");
        let manager = RotationManager::new(config(10, 5, false));

        for i in 0..3 {
            fs::write(&base_path, format!("generation {}", i)).unwrap();
            manager.rotate(&base_path).unwrap();
        }

        assert_eq!(rotated_count(dir.path()), 3);
    }

    #[test]
    fn test_rotate_keeps_at_most_max_files() {
        let dir = tempdir().unwrap();
        let base_path = dir.path().join("app.log");
        let manager = RotationManager::new(config(10, 2, false));

        for i in 0..5 {
            fs::write(&base_path, format!("generation {}", i)).unwrap();
            manager.rotate(&base_path).unwrap();
        }

        assert_eq!(rotated_count(dir.path()), 2);
    }

    #[test]
    fn test_rotate_compresses_when_enabled() {
        let dir = tempdir().unwrap();
        let base_path = dir.path().join("app.log");
        fs::write(&base_path, "to be compressed").unwrap();

        RotationManager::new(config(10, 5, true)).rotate(&base_path).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].ends_with(".log.gz"));
    }

    #[test]
    fn test_unrelated_files_are_left_alone() {
        let dir = tempdir().unwrap();
        let base_path = dir.path().join("app.log");
        let other = dir.path().join("audit.log");
        fs::write(&other, "keep me").unwrap();
        let manager = RotationManager::new(config(10, 1, false));

        for _ in 0..3 {
            fs::write(&base_path, "data").unwrap();
            manager.rotate(&base_path).unwrap();
        }

        assert!(other.exists());
    }
}
