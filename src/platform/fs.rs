// LogExc - platform/fs.rs
//
// Filesystem access: decoding the source log under a chosen encoding and
// creating output artifacts next to it.

use crate::util::error::{ConfigError, ExportError, InputError};
use encoding_rs::Encoding;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

/// Look up an encoding by WHATWG label (`utf-8`, `latin1`, `windows-1252`,
/// `utf-16le`, `shift_jis`, ...). Case and surrounding whitespace are ignored.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding, ConfigError> {
    Encoding::for_label(label.as_bytes()).ok_or_else(|| ConfigError::UnknownEncoding {
        label: label.to_string(),
    })
}

/// Read and decode the whole source log.
///
/// Malformed byte sequences are an error rather than being replaced, so a
/// wrong `--encoding` is reported instead of silently mangling signatures.
pub fn read_source(path: &Path, encoding: &'static Encoding) -> Result<String, InputError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(InputError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(InputError::Unreadable {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    tracing::debug!(
        path = %path.display(),
        bytes = bytes.len(),
        encoding = encoding.name(),
        "Source read"
    );

    decode(&bytes, encoding).ok_or_else(|| InputError::Undecodable {
        path: path.to_path_buf(),
        encoding: encoding.name().to_string(),
    })
}

/// Decode `bytes`, honouring a leading byte-order mark over `encoding`.
/// `None` when the bytes are malformed for the chosen encoding.
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((encoding, 0));
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .map(|text| text.into_owned())
}

/// `<source>.<suffix>`: the suffix is appended to the full file name, so
/// `server.log` becomes `server.log.yml`.
pub fn output_path(source: &Path, suffix: &str) -> PathBuf {
    let mut name = source.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Create (or truncate) an output artifact.
pub fn create_output(path: &Path) -> Result<BufWriter<File>, ExportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| ExportError::Io {
            path: path.to_path_buf(),
            source: e,
        })
}
