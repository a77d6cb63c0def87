//! Landmark sources
//!
//! The camera and the hand-landmark model live in an external tracker
//! process. It prints one JSON [`LandmarkFrame`] per captured frame on its
//! standard output; end of stream means the camera is gone.

use std::io::{BufRead, BufReader};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use super::landmarks::LandmarkFrame;

/// Errors produced while pulling frames
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("tracker command is empty")]
    EmptyCommand,

    #[error("failed to start tracker `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("tracker has no stdout")]
    NoStdout,

    #[error("failed to read frame: {0}")]
    Read(#[from] std::io::Error),
}

/// Anything that can hand out landmark frames on demand
pub trait LandmarkSource: Send {
    /// Block until the next frame is available.
    ///
    /// `Ok(None)` means the stream has ended and no more frames will come.
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, SourceError>;
}

/// Reads newline-delimited JSON frames from any buffered reader
pub struct JsonLinesSource<R> {
    reader: R,
    line: String,
    skipped: u64,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            skipped: 0,
        }
    }

    /// Lines that could not be parsed so far
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl<R: BufRead + Send> LandmarkSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, SourceError> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }

            let line = self.line.trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<LandmarkFrame>(line) {
                Ok(frame) => return Ok(Some(frame)),
                Err(e) => {
                    self.skipped += 1;
                    warn!(error = %e, skipped = self.skipped, "malformed tracker line, skipping");
                }
            }
        }
    }
}

/// A running hand-tracker child process
///
/// The child owns the camera. Killing it (through a [`TrackerHandle`] or by
/// dropping the source) releases the device and ends the frame stream.
pub struct TrackerProcess {
    child: Arc<Mutex<Child>>,
    frames: JsonLinesSource<BufReader<ChildStdout>>,
}

impl TrackerProcess {
    /// Spawn `command[0]` with the remaining elements as arguments
    pub fn spawn(command: &[String]) -> Result<Self, SourceError> {
        let (program, args) = command.split_first().ok_or(SourceError::EmptyCommand)?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| SourceError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or(SourceError::NoStdout)?;
        info!(%program, pid = child.id(), "hand tracker started");

        Ok(Self {
            child: Arc::new(Mutex::new(child)),
            frames: JsonLinesSource::new(BufReader::new(stdout)),
        })
    }

    /// A handle that can stop the tracker from another thread
    pub fn handle(&self) -> TrackerHandle {
        TrackerHandle {
            child: Arc::clone(&self.child),
        }
    }
}

impl LandmarkSource for TrackerProcess {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, SourceError> {
        self.frames.next_frame()
    }
}

impl Drop for TrackerProcess {
    fn drop(&mut self) {
        self.handle().kill();
    }
}

/// Remote control for a [`TrackerProcess`]
#[derive(Clone)]
pub struct TrackerHandle {
    child: Arc<Mutex<Child>>,
}

impl TrackerHandle {
    /// Kill the tracker and reap it. Safe to call more than once.
    pub fn kill(&self) {
        let Ok(mut child) = self.child.lock() else {
            warn!("tracker handle poisoned");
            return;
        };

        if let Ok(Some(status)) = child.try_wait() {
            debug!(%status, "tracker already exited");
            return;
        }

        if let Err(e) = child.kill() {
            debug!(?e, "failed to kill tracker");
        }
        let _ = child.wait();
        info!("hand tracker stopped");
    }
}
