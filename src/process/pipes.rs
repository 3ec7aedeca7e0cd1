//! Background draining of a child's output pipes.
//!
//! Each redirected stream gets its own thread that blocks in `read` and
//! appends decoded lines to a shared buffer. Draining both streams
//! concurrently with the caller's wait keeps a chatty child from blocking on a
//! full pipe while the parent blocks on its exit.

use std::{
    io::{self, BufRead, BufReader, Read},
    sync::{
        Arc, Mutex, PoisonError,
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
    },
    thread,
    time::{Duration, Instant},
};

use super::encoding::LineDecoder;

/// Which child stream a reader drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum OutputStream {
    Stdout,
    Stderr,
}

impl OutputStream {
    pub(super) const fn describe(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// Append-only text shared between a reader thread and the caller.
#[derive(Debug, Clone, Default)]
pub(super) struct OutputBuffer(Arc<Mutex<String>>);

impl OutputBuffer {
    fn append(&self, text: &str) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(text);
    }

    pub(super) fn snapshot(&self) -> String {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

type ReaderHandle = thread::JoinHandle<io::Result<usize>>;

/// The reader threads of one child.
#[derive(Debug)]
pub(super) struct PipeReaders {
    handles: Vec<(OutputStream, ReaderHandle)>,
    finished: Receiver<OutputStream>,
    pending: usize,
}

impl PipeReaders {
    pub(super) const fn new(finished: Receiver<OutputStream>) -> Self {
        Self {
            handles: Vec::new(),
            finished,
            pending: 0,
        }
    }

    /// Start draining `pipe` into `buffer` on a new thread.
    ///
    /// A missing pipe (stream not redirected) spawns nothing.
    pub(super) fn spawn<R>(
        &mut self,
        pipe: Option<R>,
        stream: OutputStream,
        buffer: OutputBuffer,
        decoder: LineDecoder,
        finished: Sender<OutputStream>,
    ) -> io::Result<()>
    where
        R: Read + Send + 'static,
    {
        let Some(reader) = pipe else {
            return Ok(());
        };
        let handle = thread::Builder::new()
            .name(format!("cmdproc-{}", stream.describe()))
            .spawn(move || {
                let result = drain(reader, &buffer, decoder);
                finished.send(stream).ok();
                result
            })?;
        self.handles.push((stream, handle));
        self.pending += 1;
        Ok(())
    }

    /// Block until every reader reached end-of-stream or `deadline` passed.
    ///
    /// Returns `true` once all readers have finished.
    pub(super) fn wait_until(&mut self, deadline: Option<Instant>) -> bool {
        while self.pending > 0 {
            let received = match deadline {
                None => self.finished.recv().map_err(|_| RecvTimeoutError::Disconnected),
                Some(limit) => self
                    .finished
                    .recv_timeout(limit.saturating_duration_since(Instant::now())),
            };
            match received {
                Ok(stream) => {
                    tracing::trace!(stream = stream.describe(), "pipe reader reached end of stream");
                    self.pending -= 1;
                }
                Err(RecvTimeoutError::Timeout) => return false,
                // Every sender is gone, so no reader is still running.
                Err(RecvTimeoutError::Disconnected) => self.pending = 0,
            }
        }
        self.join_finished();
        true
    }

    /// Give the readers `grace` to finish, then join or detach them.
    pub(super) fn release(mut self, grace: Duration) {
        let deadline = Instant::now().checked_add(grace);
        if deadline.is_some() && !self.wait_until(deadline) {
            for (stream, _detached) in self.handles.drain(..) {
                tracing::debug!(
                    stream = stream.describe(),
                    "pipe still open after teardown; detaching reader"
                );
            }
        }
    }

    fn join_finished(&mut self) {
        for (stream, handle) in self.handles.drain(..) {
            match handle.join() {
                Ok(Ok(bytes)) => {
                    tracing::debug!(stream = stream.describe(), bytes, "pipe drained");
                }
                Ok(Err(err)) => {
                    tracing::warn!(stream = stream.describe(), ?err, "pipe reader failed");
                }
                Err(join_err) => {
                    tracing::warn!(stream = stream.describe(), ?join_err, "pipe reader panicked");
                }
            }
        }
    }
}

fn drain<R>(pipe: R, buffer: &OutputBuffer, decoder: LineDecoder) -> io::Result<usize>
where
    R: Read,
{
    let mut reader = BufReader::new(pipe);
    let mut line = Vec::new();
    let mut total = 0_usize;
    loop {
        line.clear();
        let read = reader.read_until(b'\n', &mut line)?;
        if read == 0 {
            break;
        }
        total = total.saturating_add(read);
        buffer.append(&decoder.decode(&line));
    }
    Ok(total)
}

/// Create the completion channel shared by a child's readers.
pub(super) fn completion_channel() -> (Sender<OutputStream>, Receiver<OutputStream>) {
    mpsc::channel()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::encoding::{LineEndings, OutputEncoding};
    use std::io::Cursor;

    #[test]
    fn drain_collects_lines_with_terminators() {
        let buffer = OutputBuffer::default();
        let bytes = drain(
            Cursor::new(b"one\r\ntwo\nthree".to_vec()),
            &buffer,
            LineDecoder::default(),
        )
        .expect("drain in-memory pipe");
        assert_eq!(bytes, 14);
        assert_eq!(buffer.snapshot(), "one\r\ntwo\nthree");
    }

    #[test]
    fn drain_can_concatenate_bare_lines() {
        let buffer = OutputBuffer::default();
        drain(
            Cursor::new(b"one\r\ntwo\nthree".to_vec()),
            &buffer,
            LineDecoder::new(OutputEncoding::Utf8, LineEndings::Strip),
        )
        .expect("drain in-memory pipe");
        assert_eq!(buffer.snapshot(), "onetwothree");
    }

    #[test]
    fn readers_report_completion() {
        let (tx, rx) = completion_channel();
        let mut readers = PipeReaders::new(rx);
        let out = OutputBuffer::default();
        let err = OutputBuffer::default();
        readers
            .spawn(
                Some(Cursor::new(b"out\n".to_vec())),
                OutputStream::Stdout,
                out.clone(),
                LineDecoder::default(),
                tx.clone(),
            )
            .expect("spawn stdout reader");
        readers
            .spawn(
                Some(Cursor::new(b"err\n".to_vec())),
                OutputStream::Stderr,
                err.clone(),
                LineDecoder::default(),
                tx,
            )
            .expect("spawn stderr reader");
        assert!(readers.wait_until(None));
        assert_eq!(out.snapshot(), "out\n");
        assert_eq!(err.snapshot(), "err\n");
    }

    #[test]
    fn missing_pipe_spawns_nothing() {
        let (tx, rx) = completion_channel();
        let mut readers = PipeReaders::new(rx);
        readers
            .spawn(
                None::<Cursor<Vec<u8>>>,
                OutputStream::Stdout,
                OutputBuffer::default(),
                LineDecoder::default(),
                tx,
            )
            .expect("no-op spawn");
        assert!(readers.wait_until(Some(Instant::now())));
    }
}
