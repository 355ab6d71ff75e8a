//! Content checksums for recycle entry naming.
//!
//! A recycled file's destination name embeds a checksum of its byte
//! content, so two files sharing a base name but holding different data
//! land on different entries, while identical content deduplicates onto
//! one. The checksum streams through a fixed buffer; memory use is
//! independent of the file size.

use std::io::Read;
use std::path::Path;

use replcm_fs::FileSystem;
use replcm_types::{status_code::CmCode, Result, Status};
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::Xxh3;

const READ_BUF_SIZE: usize = 64 * 1024;

/// Checksum algorithm selector.
///
/// Both options are deterministic and stream in bounded memory; xxh3-128
/// is the default for its negligible collision probability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumKind {
    /// 128-bit XXH3, rendered as 32 hex chars.
    #[default]
    Xxh3,
    /// CRC-32, rendered as 8 hex chars.
    Crc32,
}

impl ChecksumKind {
    /// Compute the checksum of a file's content as fixed-width lowercase hex.
    ///
    /// Read failures surface as [`CmCode::READ_ERROR`]; a file whose
    /// checksum cannot be computed must not be recycled.
    pub fn checksum(&self, fs: &dyn FileSystem, path: &Path) -> Result<String> {
        let mut reader = fs
            .open_read(path)
            .map_err(|status| read_error(path, &status.describe()))?;
        match self {
            ChecksumKind::Xxh3 => {
                let mut hasher = Xxh3::new();
                stream(&mut reader, path, |chunk| hasher.update(chunk))?;
                Ok(format!("{:032x}", hasher.digest128()))
            }
            ChecksumKind::Crc32 => {
                let mut hasher = crc32fast::Hasher::new();
                stream(&mut reader, path, |chunk| hasher.update(chunk))?;
                Ok(format!("{:08x}", hasher.finalize()))
            }
        }
    }
}

/// Feed the whole stream through `update` in fixed-size chunks.
fn stream(
    reader: &mut Box<dyn Read + Send>,
    path: &Path,
    mut update: impl FnMut(&[u8]),
) -> Result<()> {
    let mut buf = vec![0u8; READ_BUF_SIZE];
    loop {
        let n = reader
            .read(&mut buf)
            .map_err(|e| read_error(path, &e.to_string()))?;
        if n == 0 {
            return Ok(());
        }
        update(&buf[..n]);
    }
}

fn read_error(path: &Path, detail: &str) -> Status {
    Status::with_message(
        CmCode::READ_ERROR,
        format!("checksum {}: {}", path.display(), detail),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use replcm_fs::LocalFileSystem;
    use std::fs;
    use std::path::PathBuf;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("replcm-checksum-{}", name));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_deterministic() {
        let dir = test_dir("deterministic");
        let fs_impl = LocalFileSystem::new();

        fs::write(dir.join("a"), b"same bytes").unwrap();
        fs::write(dir.join("b"), b"same bytes").unwrap();

        let sum_a = ChecksumKind::Xxh3.checksum(&fs_impl, &dir.join("a")).unwrap();
        let sum_b = ChecksumKind::Xxh3.checksum(&fs_impl, &dir.join("b")).unwrap();
        assert_eq!(sum_a, sum_b);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_different_content_differs() {
        let dir = test_dir("differs");
        let fs_impl = LocalFileSystem::new();

        fs::write(dir.join("a"), b"p1").unwrap();
        fs::write(dir.join("b"), b"p2").unwrap();

        for kind in [ChecksumKind::Xxh3, ChecksumKind::Crc32] {
            let sum_a = kind.checksum(&fs_impl, &dir.join("a")).unwrap();
            let sum_b = kind.checksum(&fs_impl, &dir.join("b")).unwrap();
            assert_ne!(sum_a, sum_b);
        }

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_hex_widths() {
        let dir = test_dir("widths");
        let fs_impl = LocalFileSystem::new();

        fs::write(dir.join("f"), b"content").unwrap();

        let xxh3 = ChecksumKind::Xxh3.checksum(&fs_impl, &dir.join("f")).unwrap();
        assert_eq!(xxh3.len(), 32);
        assert!(xxh3.chars().all(|c| c.is_ascii_hexdigit()));

        let crc = ChecksumKind::Crc32.checksum(&fs_impl, &dir.join("f")).unwrap();
        assert_eq!(crc.len(), 8);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_zero_length_file_is_stable() {
        let dir = test_dir("empty");
        let fs_impl = LocalFileSystem::new();

        fs::write(dir.join("empty1"), b"").unwrap();
        fs::write(dir.join("empty2"), b"").unwrap();

        let sum1 = ChecksumKind::Xxh3
            .checksum(&fs_impl, &dir.join("empty1"))
            .unwrap();
        let sum2 = ChecksumKind::Xxh3
            .checksum(&fs_impl, &dir.join("empty2"))
            .unwrap();
        assert_eq!(sum1, sum2);
        assert_eq!(sum1.len(), 32);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = test_dir("missing");
        let fs_impl = LocalFileSystem::new();

        let err = ChecksumKind::Xxh3
            .checksum(&fs_impl, &dir.join("gone"))
            .unwrap_err();
        assert_eq!(err.code(), CmCode::READ_ERROR);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_serde_names() {
        let xxh3: ChecksumKind = toml::from_str::<ChecksumWrapper>("kind = \"xxh3\"")
            .unwrap()
            .kind;
        assert_eq!(xxh3, ChecksumKind::Xxh3);
        let crc: ChecksumKind = toml::from_str::<ChecksumWrapper>("kind = \"crc32\"")
            .unwrap()
            .kind;
        assert_eq!(crc, ChecksumKind::Crc32);
    }

    #[derive(serde::Deserialize)]
    struct ChecksumWrapper {
        kind: ChecksumKind,
    }
}
