use crate::error::Result;
use std::io::Write;

/// Append-only sink receiving rendered chunks in document order
pub trait Output {
    fn append(&mut self, chunk: &str) -> Result<()>;
}

impl Output for String {
    fn append(&mut self, chunk: &str) -> Result<()> {
        self.push_str(chunk);
        Ok(())
    }
}

/// Adapter writing chunks to any [`std::io::Write`]
pub struct WriteOutput<W: Write> {
    writer: W,
}

impl<W: Write> WriteOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Flush and return the inner writer
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> Output for WriteOutput<W> {
    fn append(&mut self, chunk: &str) -> Result<()> {
        self.writer.write_all(chunk.as_bytes())?;
        Ok(())
    }
}

/// Sink that keeps every chunk separately
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Chunks(pub Vec<String>);

impl Output for Chunks {
    fn append(&mut self, chunk: &str) -> Result<()> {
        self.0.push(chunk.to_string());
        Ok(())
    }
}
