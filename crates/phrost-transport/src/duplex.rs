use std::io::{ErrorKind, Read, Write};

use crate::error::{Result, TransportError};
use crate::traits::IpcStream;

/// The blocking capability the frame layer needs from a channel.
///
/// Every platform transport and every in-memory test double implements this
/// through the blanket `Read + Write` helpers below.
pub trait Duplex {
    /// Fill `buf` completely, or fail with [`TransportError::Closed`] if the
    /// peer goes away first.
    fn recv_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Send all of `buf` and flush.
    fn send_all(&mut self, buf: &[u8]) -> Result<()>;

    /// Close the channel. Further operations observe closure.
    fn close(&mut self) -> Result<()>;
}

/// Read exactly `buf.len()` bytes, retrying on `Interrupted`.
///
/// A zero-length read before the buffer is full yields
/// [`TransportError::Closed`] with the number of bytes already received.
pub fn read_exact_or_closed<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    let expected = buf.len();
    let mut filled = 0usize;
    while filled < expected {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(TransportError::Closed {
                    transferred: filled,
                    expected,
                })
            }
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err)),
        }
    }
    Ok(())
}

/// Write all of `buf`, retrying on `Interrupted`, then flush.
///
/// A write that accepts zero bytes yields [`TransportError::Closed`]. Any
/// other error, `WouldBlock` included, surfaces as [`TransportError::Io`].
pub fn write_all_or_closed<W: Write + ?Sized>(writer: &mut W, buf: &[u8]) -> Result<()> {
    let expected = buf.len();
    let mut offset = 0usize;
    while offset < expected {
        match writer.write(&buf[offset..]) {
            Ok(0) => {
                return Err(TransportError::Closed {
                    transferred: offset,
                    expected,
                })
            }
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err)),
        }
    }

    loop {
        match writer.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err)),
        }
    }
}

impl Duplex for IpcStream {
    fn recv_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        read_exact_or_closed(self, buf)
    }

    fn send_all(&mut self, buf: &[u8]) -> Result<()> {
        write_all_or_closed(self, buf)
    }

    fn close(&mut self) -> Result<()> {
        self.shutdown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct ByteByByteReader {
        data: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.data.len() {
                return Ok(0);
            }
            buf[0] = self.data[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct InterruptedOnce<R> {
        inner: R,
        fired: bool,
    }

    impl<R: Read> Read for InterruptedOnce<R> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.fired {
                self.fired = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    /// Accepts at most `limit` bytes per call and refuses everything after
    /// `capacity` total. `fail_once` is returned from the first call.
    struct ChokedWriter {
        written: Vec<u8>,
        limit: usize,
        capacity: usize,
        fail_once: Option<ErrorKind>,
    }

    impl Write for ChokedWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if let Some(kind) = self.fail_once.take() {
                return Err(std::io::Error::from(kind));
            }
            let room = self.capacity - self.written.len();
            let n = buf.len().min(self.limit).min(room);
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn read_exact_reassembles_partial_reads() {
        let mut reader = ByteByByteReader {
            data: vec![1, 2, 3, 4, 5],
            pos: 0,
        };
        let mut buf = [0u8; 5];
        read_exact_or_closed(&mut reader, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn read_exact_retries_interrupted() {
        let mut reader = InterruptedOnce {
            inner: Cursor::new(vec![9u8, 8]),
            fired: false,
        };
        let mut buf = [0u8; 2];
        read_exact_or_closed(&mut reader, &mut buf).unwrap();
        assert_eq!(buf, [9, 8]);
    }

    #[test]
    fn read_exact_reports_closure_mid_buffer() {
        let mut reader = Cursor::new(vec![0xAAu8, 0xBB]);
        let mut buf = [0u8; 4];
        let err = read_exact_or_closed(&mut reader, &mut buf).unwrap_err();
        assert!(matches!(
            err,
            TransportError::Closed {
                transferred: 2,
                expected: 4
            }
        ));
    }

    #[test]
    fn write_all_loops_over_short_writes() {
        let mut writer = ChokedWriter {
            written: Vec::new(),
            limit: 3,
            capacity: usize::MAX,
            fail_once: Some(ErrorKind::Interrupted),
        };
        write_all_or_closed(&mut writer, b"abcdefgh").unwrap();
        assert_eq!(writer.written, b"abcdefgh");
    }

    #[test]
    fn write_all_surfaces_would_block() {
        let mut writer = ChokedWriter {
            written: Vec::new(),
            limit: 8,
            capacity: usize::MAX,
            fail_once: Some(ErrorKind::WouldBlock),
        };
        let err = write_all_or_closed(&mut writer, b"abcdefgh").unwrap_err();
        assert!(matches!(
            err,
            TransportError::Io(ref io) if io.kind() == ErrorKind::WouldBlock
        ));
        assert!(writer.written.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn write_to_full_nonblocking_socket_returns_error() {
        let (a, _b) = std::os::unix::net::UnixStream::pair().unwrap();
        a.set_nonblocking(true).unwrap();
        let mut stream = IpcStream::from(a);

        let chunk = vec![0u8; 64 * 1024];
        let err = loop {
            if let Err(err) = stream.send_all(&chunk) {
                break err;
            }
        };
        assert!(matches!(
            err,
            TransportError::Io(ref io) if io.kind() == ErrorKind::WouldBlock
        ));
    }

    #[test]
    fn write_all_reports_zero_write_as_closed() {
        let mut writer = ChokedWriter {
            written: Vec::new(),
            limit: 4,
            capacity: 6,
            fail_once: None,
        };
        let err = write_all_or_closed(&mut writer, b"abcdefgh").unwrap_err();
        assert!(matches!(
            err,
            TransportError::Closed {
                transferred: 6,
                expected: 8
            }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn duplex_round_trip_over_socket_pair() {
        let (a, b) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut left = IpcStream::from(a);
        let mut right = IpcStream::from(b);

        left.send_all(b"ping").unwrap();
        let mut buf = [0u8; 4];
        right.recv_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ping");

        right.close().unwrap();
        let err = left.recv_exact(&mut buf).unwrap_err();
        assert!(err.is_closed());
    }
}
