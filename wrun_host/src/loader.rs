use std::fs;
use std::path::Path;

type Result<T> = std::result::Result<T, Error>;

/// Size of the wasm binary header (magic + version)
const MIN_FILE_SIZE: u64 = 8;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a file: {0}")]
    NotAFile(String),
    #[error("file at {0} too small (expected at least: {1}, actual: {2})")]
    FileTooSmall(String, u64, u64),
}

/// Raw bytecode held in memory. The byte source is read in full before the
/// buffer is handed to compilation; there are no partial or streaming loads.
#[derive(Debug)]
pub struct Buffer {
    bytes: Vec<u8>,
}

impl Buffer {
    /// Read an entire bytecode file into memory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Buffer> {
        let path = path.as_ref();
        let meta = path.metadata()?;
        if !meta.is_file() {
            return Err(Error::NotAFile(path.display().to_string()));
        }
        if meta.len() < MIN_FILE_SIZE {
            return Err(Error::FileTooSmall(
                path.display().to_string(),
                MIN_FILE_SIZE,
                meta.len(),
            ));
        }

        let bytes = fs::read(path)?;
        log::debug!(target: "loader", "read {} bytes from {}", bytes.len(), path.display());
        Ok(Buffer { bytes })
    }

    /// Wrap an already materialized byte sequence, e.g. bytecode received
    /// over the network or embedded into the host binary.
    pub fn from_bytes(bytes: Vec<u8>) -> Buffer {
        Buffer { bytes }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
