//! Loading a file into a buffer and writing it back.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use super::buffer::TextBuffer;
use super::error::BufferError;

impl TextBuffer {
    /// Load `path` into a new buffer, one line per line-feed-terminated
    /// segment.
    ///
    /// A missing file is created empty and yields a single empty line.
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Open`] if the file can be neither opened nor
    /// created, [`BufferError::Read`] if reading fails part way, and
    /// [`BufferError::Allocation`] if the node arenas are exhausted.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BufferError> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(_) => {
                // Create without truncating, in case the read failure was transient.
                OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .truncate(false)
                    .open(path)
                    .map_err(|source| BufferError::Open {
                        path: path.to_path_buf(),
                        source,
                    })?
            }
        };

        let mut buf = Self::empty();
        let mut reader = BufReader::new(file);
        let mut bytes = Vec::new();
        let mut loaded = 0;
        loop {
            bytes.clear();
            let n = reader
                .read_until(b'\n', &mut bytes)
                .map_err(|source| BufferError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
            if n == 0 {
                break;
            }
            buf.push_segment(&mut loaded, &String::from_utf8_lossy(&bytes))?;
        }
        buf.path = Some(path.to_path_buf());
        debug!(path = %path.display(), lines = buf.line_count(), read = loaded, "buffer loaded");
        Ok(buf)
    }

    /// Write the buffer back to the file it was loaded from and mark it clean.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::NoPath`] for a buffer without a file, or any
    /// error from [`TextBuffer::save_as`].
    pub fn save(&mut self) -> Result<usize, BufferError> {
        let path = self.path.clone().ok_or(BufferError::NoPath)?;
        let written = self.save_as(&path)?;
        self.dirty = false;
        Ok(written)
    }

    /// Truncate `path` and write every line followed by one line feed.
    ///
    /// Returns the number of bytes written. The recorded path and dirty
    /// flag are left as they are.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Open`] if the destination cannot be opened
    /// for writing and [`BufferError::Write`] if a write fails afterwards.
    /// A failed write is not rolled back.
    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<usize, BufferError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| BufferError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let write_err = |source| BufferError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut out = BufWriter::new(file);
        let mut written = 0;
        let mut encoded = [0u8; 4];
        for line in self.lines() {
            for ch in line.chars() {
                let bytes = ch.encode_utf8(&mut encoded).as_bytes();
                out.write_all(bytes).map_err(write_err)?;
                written += bytes.len();
            }
            out.write_all(b"\n").map_err(write_err)?;
            written += 1;
        }
        out.flush().map_err(write_err)?;
        debug!(path = %path.display(), lines = self.line_count(), bytes = written, "buffer saved");
        Ok(written)
    }
}
