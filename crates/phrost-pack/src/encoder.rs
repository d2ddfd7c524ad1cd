use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, warn};

use crate::codec::encode_event;
use crate::error::EncodeError;
use crate::kind::EventKind;
use crate::value::Value;

const INITIAL_BUFFER_CAPACITY: usize = 4 * 1024;

type ChunkCallback = Box<dyn FnMut(usize, usize) + Send>;

/// Accumulates one tick's commands into a count-prefixed blob.
///
/// With a chunk size of 0 (the default) every command is encoded as soon as
/// it is added. With a chunk size `n > 0`, commands wait in a pending
/// buffer; once `n` are pending they are all moved into the blob and the
/// chunk callback (if any) receives `(just flushed, total encoded)`.
///
/// Arguments are validated when a command is added in both modes, so a
/// pending command can never fail later.
pub struct CommandEncoder {
    encoded: BytesMut,
    encoded_count: usize,
    pending: BytesMut,
    pending_count: usize,
    scratch: BytesMut,
    dropped: usize,
    chunk_size: usize,
    on_chunk: Option<ChunkCallback>,
}

impl CommandEncoder {
    /// Immediate-mode encoder.
    pub fn new() -> Self {
        Self::with_chunk_size(0)
    }

    /// Buffered encoder flushing every `chunk_size` commands (0 = immediate).
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            encoded: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            encoded_count: 0,
            pending: BytesMut::new(),
            pending_count: 0,
            scratch: BytesMut::new(),
            dropped: 0,
            chunk_size,
            on_chunk: None,
        }
    }

    /// Install the chunk callback: `(flushed, total_encoded)`.
    pub fn on_chunk(mut self, callback: impl FnMut(usize, usize) + Send + 'static) -> Self {
        self.on_chunk = Some(Box::new(callback));
        self
    }

    /// Add one command.
    ///
    /// A malformed command is logged, counted in
    /// [`dropped_count`](Self::dropped_count) and returned as an error; the
    /// encoder carries on with the next call.
    pub fn add(&mut self, kind: EventKind, args: Vec<Value>) -> Result<(), EncodeError> {
        self.push(kind, &args)
    }

    /// Add one command by raw wire code.
    pub fn add_code(&mut self, code: u32, args: Vec<Value>) -> Result<(), EncodeError> {
        match EventKind::from_code(code) {
            Some(kind) => self.push(kind, &args),
            None => {
                let err = EncodeError::UnknownKind(code);
                warn!(%err, "dropping command");
                self.dropped += 1;
                Err(err)
            }
        }
    }

    /// Add one command from borrowed arguments.
    pub fn push(&mut self, kind: EventKind, args: &[Value]) -> Result<(), EncodeError> {
        self.scratch.clear();
        if let Err(err) = encode_event(kind, args, &mut self.scratch) {
            warn!(%err, kind = kind.name(), "dropping command");
            self.dropped += 1;
            return Err(err);
        }

        if self.chunk_size == 0 {
            self.encoded.extend_from_slice(&self.scratch);
            self.encoded_count += 1;
            return Ok(());
        }

        self.pending.extend_from_slice(&self.scratch);
        self.pending_count += 1;
        if self.pending_count >= self.chunk_size {
            self.flush();
        }
        Ok(())
    }

    /// Move every pending command into the blob.
    pub fn flush(&mut self) {
        if self.pending_count == 0 {
            return;
        }
        let flushed = self.pending_count;
        self.encoded.extend_from_slice(&self.pending);
        self.encoded_count += flushed;
        self.pending.clear();
        self.pending_count = 0;

        debug!(flushed, total = self.encoded_count, "command chunk flushed");
        if let Some(callback) = self.on_chunk.as_mut() {
            callback(flushed, self.encoded_count);
        }
    }

    /// Flush, then take the blob and reset for the next tick.
    ///
    /// Returns zero bytes when no command was encoded, otherwise
    /// `u32 count` followed by the encoded commands.
    pub fn finalize(&mut self) -> Bytes {
        self.flush();
        let count = self.encoded_count;
        self.encoded_count = 0;
        self.dropped = 0;
        if count == 0 {
            self.encoded.clear();
            return Bytes::new();
        }

        let body = self.encoded.split();
        let mut blob = BytesMut::with_capacity(4 + body.len());
        blob.put_u32_le(count as u32);
        blob.extend_from_slice(&body);
        blob.freeze()
    }

    /// Commands waiting in the pending buffer.
    pub fn buffered_count(&self) -> usize {
        self.pending_count
    }

    /// Encoded plus pending commands.
    pub fn total_event_count(&self) -> usize {
        self.encoded_count + self.pending_count
    }

    /// Commands rejected since the last finalize.
    pub fn dropped_count(&self) -> usize {
        self.dropped
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn is_empty(&self) -> bool {
        self.total_event_count() == 0
    }
}

impl Default for CommandEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CommandEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandEncoder")
            .field("encoded_count", &self.encoded_count)
            .field("pending_count", &self.pending_count)
            .field("dropped", &self.dropped)
            .field("chunk_size", &self.chunk_size)
            .finish_non_exhaustive()
    }
}
