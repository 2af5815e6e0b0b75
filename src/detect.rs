//! PDF header sniffing.
//!
//! Readers are expected to tolerate junk before the `%PDF-` marker as long
//! as the marker appears within the first kilobyte, so the check scans a
//! window instead of requiring the marker at offset zero.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

const PDF_MAGIC: &[u8] = b"%PDF-";
const HEADER_WINDOW: usize = 1024;

/// Version found in a PDF header, e.g. `1.7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfVersion {
    pub major: u8,
    pub minor: u8,
}

impl std::fmt::Display for PdfVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Read the start of a file and check it carries a PDF header.
pub fn sniff_path<P: AsRef<Path>>(path: P) -> Result<PdfVersion> {
    let file = File::open(path)?;
    let mut head = Vec::with_capacity(HEADER_WINDOW);
    file.take(HEADER_WINDOW as u64).read_to_end(&mut head)?;
    sniff_bytes(&head)
}

/// Check that `data` carries a PDF header within its first kilobyte.
pub fn sniff_bytes(data: &[u8]) -> Result<PdfVersion> {
    let window = &data[..data.len().min(HEADER_WINDOW)];
    let start = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let version = window
        .get(start + PDF_MAGIC.len()..start + PDF_MAGIC.len() + 3)
        .ok_or(Error::UnknownFormat)?;

    match version {
        [major @ b'1'..=b'2', b'.', minor] if minor.is_ascii_digit() => Ok(PdfVersion {
            major: major - b'0',
            minor: minor - b'0',
        }),
        other => Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(other).into_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_plain_header() {
        let version = sniff_bytes(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap();
        assert_eq!(version, PdfVersion { major: 1, minor: 7 });
        assert_eq!(version.to_string(), "1.7");
    }

    #[test]
    fn test_sniff_header_after_junk() {
        let mut data = vec![b' '; 100];
        data.extend_from_slice(b"%PDF-2.0\n");
        assert_eq!(sniff_bytes(&data).unwrap().major, 2);
    }

    #[test]
    fn test_sniff_rejects_other_formats() {
        assert!(matches!(
            sniff_bytes(b"<!DOCTYPE html>"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(sniff_bytes(b"%PDF"), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_sniff_rejects_bad_version() {
        assert!(matches!(
            sniff_bytes(b"%PDF-9.9\n"),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_sniff_missing_file() {
        let result = sniff_path("/definitely/not/here.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
