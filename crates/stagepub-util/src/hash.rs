//! One-pass SHA-1 + MD5 digests for Maven checksum sidecars.

use md5::Md5;
use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::fs::sibling_with_suffix;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Extension of the SHA-1 sidecar file.
pub const SHA1_EXT: &str = "sha1";
/// Extension of the MD5 sidecar file.
pub const MD5_EXT: &str = "md5";

/// Lowercase hex digests of a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigests {
    pub sha1: String,
    pub md5: String,
}

/// Render bytes as lowercase hex, one nibble at a time.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push(HEX_DIGITS[(b >> 4) as usize] as char);
        out.push(HEX_DIGITS[(b & 0x0f) as usize] as char);
    }
    out
}

/// Feed everything from `reader` into both accumulators in a single pass.
pub fn digest_reader(mut reader: impl Read) -> std::io::Result<FileDigests> {
    let mut sha1 = Sha1::new();
    let mut md5 = Md5::new();
    let mut buffer = [0u8; 8192];
    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        sha1.update(&buffer[..n]);
        md5.update(&buffer[..n]);
    }
    Ok(FileDigests {
        sha1: to_hex(&sha1.finalize()),
        md5: to_hex(&md5.finalize()),
    })
}

/// Compute SHA-1 and MD5 of a file, reading it exactly once.
pub fn digest_file(path: &Path) -> std::io::Result<FileDigests> {
    let file = File::open(path)?;
    digest_reader(file)
}

/// Compute both digests of `path` and write them to `<name>.sha1` and `<name>.md5`.
///
/// Returns the two sidecar paths in that order.
pub fn write_checksum_files(path: &Path) -> std::io::Result<[PathBuf; 2]> {
    let digests = digest_file(path)?;
    let sha1_path = sibling_with_suffix(path, &format!(".{SHA1_EXT}"));
    let md5_path = sibling_with_suffix(path, &format!(".{MD5_EXT}"));
    std::fs::write(&sha1_path, &digests.sha1)?;
    std::fs::write(&md5_path, &digests.md5)?;
    tracing::debug!("sha1 {} md5 {} for {}", digests.sha1, digests.md5, path.display());
    Ok([sha1_path, md5_path])
}
