//! Log output for a terminal in raw mode
//!
//! Raw mode turns off the terminal's newline translation, so a bare `\n`
//! only moves the cursor down a row. Log lines go through [`CrlfWriter`]
//! to keep starting at column zero.

use std::io::{self, Write};

/// Wraps a writer and turns every bare `\n` into `\r\n`
#[derive(Debug)]
pub struct CrlfWriter<W> {
    inner: W,
}

impl<W> CrlfWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl CrlfWriter<io::Stderr> {
    /// Writer for the subscriber; pass as `with_writer(CrlfWriter::stderr)`
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> Write for CrlfWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut start = 0;
        for (i, &byte) in buf.iter().enumerate() {
            if byte == b'\n' && (i == 0 || buf[i - 1] != b'\r') {
                self.inner.write_all(&buf[start..i])?;
                self.inner.write_all(b"\r\n")?;
                start = i + 1;
            }
        }
        self.inner.write_all(&buf[start..])?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
