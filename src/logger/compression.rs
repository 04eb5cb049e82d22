//! Gzip compression of rotated log files

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::logger::error::LoggerError;

pub struct CompressionHandler {
    enabled: bool,
}

impl CompressionHandler {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Replaces `file_path` with `file_path.gz`; a no-op when disabled.
    ///
    /// Returns the path of the file that remains on disk.
    pub fn compress_file(&self, file_path: &Path) -> Result<PathBuf, LoggerError> {
        if !self.enabled {
            return Ok(file_path.to_path_buf());
        }

        let mut compressed_name = file_path.as_os_str().to_owned();
        compressed_name.push(".gz");
        let compressed_path = PathBuf::from(compressed_name);

        let compress = || -> io::Result<()> {
            let mut input = BufReader::new(File::open(file_path)?);
            let mut encoder =
                GzEncoder::new(File::create(&compressed_path)?, Compression::default());
            io::copy(&mut input, &mut encoder)?;
            encoder.finish()?;
            Ok(())
        };
        compress().map_err(|e| {
            LoggerError::compression(format!("{}: {}", file_path.display(), e))
        })?;

        fs::remove_file(file_path)?;

        Ok(compressed_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use proptest::prelude::*;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn test_compression_disabled_keeps_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("app.20240101_000000.log");
        fs::write(&file_path, "request handled").unwrap();

        let kept = CompressionHandler::new(false).compress_file(&file_path).unwrap();

        assert_eq!(kept, file_path);
        assert!(file_path.exists());
    }

    #[test]
    fn test_compression_missing_file_fails() {
        let dir = tempdir().unwrap();
        let result = CompressionHandler::new(true).compress_file(&dir.path().join("gone.log"));
        assert!(matches!(result, Err(LoggerError::Compression { .. })));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn property_compressed_file_decodes_to_original(content in "[a-zA-Z0-9 \n]{1,1000}") {
            let dir = tempdir().unwrap();
            let file_path = dir.path().join("app.log");
            fs::write(&file_path, &content).unwrap();

            let compressed = CompressionHandler::new(true).compress_file(&file_path).unwrap();

            prop_assert!(!file_path.exists());
            prop_assert_eq!(&compressed, &dir.path().join("app.log.gz"));

            let mut decoded = String::new();
            GzDecoder::new(File::open(&compressed).unwrap())
                .read_to_string(&mut decoded)
                .unwrap();
            prop_assert_eq!(decoded, content);
        }
    }
}
