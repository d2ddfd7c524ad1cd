use std::io::{Cursor, Read};

use crate::duplex::{read_exact_or_closed, Duplex};
use crate::error::{Result, TransportError};

/// In-memory channel: reads come from a fixed byte script, writes are
/// captured.
///
/// Used to replay recorded engine traffic and to drive the frame and client
/// layers without a socket. Reading past the script observes closure, like a
/// peer that hung up.
#[derive(Debug, Default)]
pub struct MemoryDuplex {
    input: Cursor<Vec<u8>>,
    output: Vec<u8>,
    // Max bytes handed out per read, 0 = unlimited.
    chunk: usize,
    closed: bool,
}

impl MemoryDuplex {
    pub fn new(input: impl Into<Vec<u8>>) -> Self {
        Self {
            input: Cursor::new(input.into()),
            ..Self::default()
        }
    }

    /// Deliver at most `chunk` bytes per underlying read.
    pub fn with_chunk_size(mut self, chunk: usize) -> Self {
        self.chunk = chunk;
        self
    }

    /// Everything written so far.
    pub fn written(&self) -> &[u8] {
        &self.output
    }

    /// Bytes of the input script not yet consumed.
    pub fn remaining(&self) -> usize {
        let pos = usize::try_from(self.input.position()).unwrap_or(usize::MAX);
        self.input.get_ref().len().saturating_sub(pos)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Duplex for MemoryDuplex {
    fn recv_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.closed {
            return Err(TransportError::Closed {
                transferred: 0,
                expected: buf.len(),
            });
        }
        if self.chunk == 0 {
            return read_exact_or_closed(&mut self.input, buf);
        }
        let mut limited = Chunked {
            inner: &mut self.input,
            chunk: self.chunk,
        };
        read_exact_or_closed(&mut limited, buf)
    }

    fn send_all(&mut self, buf: &[u8]) -> Result<()> {
        if self.closed {
            return Err(TransportError::Closed {
                transferred: 0,
                expected: buf.len(),
            });
        }
        self.output.extend_from_slice(buf);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

struct Chunked<'a> {
    inner: &'a mut Cursor<Vec<u8>>,
    chunk: usize,
}

impl Read for Chunked<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = buf.len().min(self.chunk);
        self.inner.read(&mut buf[..n])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunked_reads_reassemble() {
        let mut duplex = MemoryDuplex::new(vec![1u8, 2, 3, 4, 5, 6]).with_chunk_size(1);
        let mut buf = [0u8; 6];
        duplex.recv_exact(&mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4, 5, 6]);
        assert_eq!(duplex.remaining(), 0);
    }

    #[test]
    fn script_exhaustion_is_closure() {
        let mut duplex = MemoryDuplex::new(vec![1u8, 2]);
        let mut buf = [0u8; 4];
        let err = duplex.recv_exact(&mut buf).unwrap_err();
        assert!(matches!(
            err,
            TransportError::Closed {
                transferred: 2,
                expected: 4
            }
        ));
    }

    #[test]
    fn close_stops_both_directions() {
        let mut duplex = MemoryDuplex::new(vec![0u8; 8]);
        duplex.send_all(b"out").unwrap();
        duplex.close().unwrap();

        assert!(duplex.is_closed());
        assert!(duplex.send_all(b"more").unwrap_err().is_closed());
        let mut buf = [0u8; 1];
        assert!(duplex.recv_exact(&mut buf).unwrap_err().is_closed());
        assert_eq!(duplex.written(), b"out");
    }
}
