use std::{
    fs::File,
    io::{LineWriter, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use super::LogSink;
use crate::error::{LogError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Console,
    File,
}

/// Closed set of destinations a logger can write to.
#[derive(Debug)]
pub enum Sink {
    Console(ConsoleSink),
    File(FileSink),
}

impl Sink {
    pub fn stderr() -> Self {
        Sink::Console(ConsoleSink::stderr())
    }

    pub fn file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Sink::File(FileSink::open(path)?))
    }

    pub fn kind(&self) -> SinkKind {
        match self {
            Sink::Console(_) => SinkKind::Console,
            Sink::File(_) => SinkKind::File,
        }
    }
}

impl LogSink for Sink {
    fn write_line(&self, line: &str) -> Result<()> {
        match self {
            Sink::Console(s) => s.write_line(line),
            Sink::File(s) => s.write_line(line),
        }
    }

    fn flush(&self) -> Result<()> {
        match self {
            Sink::Console(s) => s.flush(),
            Sink::File(s) => s.flush(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    Stderr,
    Stdout,
}

#[derive(Debug)]
pub struct ConsoleSink {
    stream: ConsoleStream,
}

impl ConsoleSink {
    pub fn stderr() -> Self {
        Self {
            stream: ConsoleStream::Stderr,
        }
    }

    pub fn stdout() -> Self {
        Self {
            stream: ConsoleStream::Stdout,
        }
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }

    fn write_to(writer: &mut impl Write, line: &str) -> std::io::Result<()> {
        writeln!(writer, "{}", line)?;
        writer.flush()
    }
}

impl LogSink for ConsoleSink {
    fn write_line(&self, line: &str) -> Result<()> {
        let result = match self.stream {
            ConsoleStream::Stderr => Self::write_to(&mut std::io::stderr().lock(), line),
            ConsoleStream::Stdout => Self::write_to(&mut std::io::stdout().lock(), line),
        };

        result.map_err(|e| LogError::write("console", e))
    }

    fn flush(&self) -> Result<()> {
        let result = match self.stream {
            ConsoleStream::Stderr => std::io::stderr().lock().flush(),
            ConsoleStream::Stdout => std::io::stdout().lock().flush(),
        };

        result.map_err(|e| LogError::write("console", e))
    }
}

/// Append-only file destination. The handle is opened once and each write
/// holds the lock for the whole line.
#[derive(Debug)]
pub struct FileSink {
    file: Mutex<LineWriter<File>>,
    file_path: PathBuf,
}

impl FileSink {
    /// Creates missing parent directories, then opens `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_path = std::path::absolute(path).map_err(|e| LogError::io(path, e))?;

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LogError::io(parent, e))?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .map_err(|e| LogError::io(&file_path, e))?;

        Ok(Self {
            file: Mutex::new(LineWriter::new(file)),
            file_path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn sink_name(&self) -> String {
        format!("file {}", self.file_path.display())
    }

    fn poisoned(&self) -> LogError {
        LogError::write(
            self.sink_name(),
            std::io::Error::other("file sink lock poisoned"),
        )
    }
}

impl LogSink for FileSink {
    fn write_line(&self, line: &str) -> Result<()> {
        let mut file = self.file.lock().map_err(|_| self.poisoned())?;

        writeln!(file, "{}", line)
            .and_then(|_| file.flush())
            .map_err(|e| LogError::write(self.sink_name(), e))
    }

    fn flush(&self) -> Result<()> {
        let mut file = self.file.lock().map_err(|_| self.poisoned())?;
        file.flush().map_err(|e| LogError::write(self.sink_name(), e))
    }
}
