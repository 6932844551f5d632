//! Serial source
//!
//! Opens the controller's serial device and turns its line protocol into
//! direction signals. Reads only what the driver already has buffered, so a
//! poll never blocks.

use std::io::{self, Read};
use std::time::Duration;

use reflex_protocol::LineParser;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, info, trace};

use crate::error::InputError;
use crate::input::{EventSource, Signal, Source};

/// Read chunk size
const READ_BUF_SIZE: usize = 64;

/// Read timeout; reads are only issued when bytes are already waiting
const READ_TIMEOUT: Duration = Duration::from_millis(1);

/// Controller link over a serial device
pub struct SerialSource {
    port: Box<dyn SerialPort>,
    parser: LineParser,
    buf: [u8; READ_BUF_SIZE],
}

impl SerialSource {
    /// Open `path` at `baud_rate`, 8N1, no flow control
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, InputError> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|source| InputError::SerialOpen {
                port: path.to_string(),
                source,
            })?;

        info!("Opened serial port {} at {} baud", path, baud_rate);
        Ok(Self::from_port(port))
    }

    /// Wrap an already opened port
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        Self {
            port,
            parser: LineParser::new(),
            buf: [0u8; READ_BUF_SIZE],
        }
    }

    fn read_available(&mut self) -> Result<usize, InputError> {
        let available = self.port.bytes_to_read().map_err(|e| match e.kind() {
            serialport::ErrorKind::NoDevice => InputError::SerialDisconnected,
            _ => InputError::SerialRead(e.into()),
        })? as usize;

        if available == 0 {
            return Ok(0);
        }

        let want = available.min(self.buf.len());
        match self.port.read(&mut self.buf[..want]) {
            // Driver said bytes were waiting, EOF means the device went away
            Ok(0) => Err(InputError::SerialDisconnected),
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Err(InputError::SerialDisconnected),
            Err(e) => Err(InputError::SerialRead(e)),
        }
    }
}

/// Feed a chunk into the parser, pushing one signal per recognized token
///
/// Returns the number of lines dropped as noise.
pub fn decode_chunk(parser: &mut LineParser, bytes: &[u8], out: &mut Vec<Signal>) -> usize {
    parser.feed_bytes(bytes, |direction| out.push(Signal::Direction(direction)))
}

impl EventSource for SerialSource {
    fn source(&self) -> Source {
        Source::Serial
    }

    fn poll(&mut self, out: &mut Vec<Signal>) -> Result<(), InputError> {
        loop {
            let n = self.read_available()?;
            if n == 0 {
                return Ok(());
            }

            trace!("Serial RX: {} bytes", n);
            let dropped = decode_chunk(&mut self.parser, &self.buf[..n], out);
            if dropped > 0 {
                debug!("Discarded {} unrecognized serial line(s)", dropped);
            }

            if n < self.buf.len() {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reflex_protocol::Direction;

    #[test]
    fn test_decode_chunk_tokens() {
        let mut parser = LineParser::new();
        let mut out = Vec::new();
        let dropped = decode_chunk(&mut parser, b"UP\nDOWN\r\n", &mut out);
        assert_eq!(dropped, 0);
        assert_eq!(
            out,
            vec![
                Signal::Direction(Direction::Up),
                Signal::Direction(Direction::Down)
            ]
        );
    }

    #[test]
    fn test_decode_chunk_buffers_partial_line() {
        let mut parser = LineParser::new();
        let mut out = Vec::new();
        decode_chunk(&mut parser, b"RIG", &mut out);
        assert!(out.is_empty());
        decode_chunk(&mut parser, b"HT\n", &mut out);
        assert_eq!(out, vec![Signal::Direction(Direction::Right)]);
    }

    #[test]
    fn test_decode_chunk_drops_noise_silently() {
        let mut parser = LineParser::new();
        let mut out = Vec::new();
        let dropped = decode_chunk(&mut parser, b"booting...\nleft\n\xff\xfe\n", &mut out);
        assert_eq!(dropped, 2);
        assert_eq!(out, vec![Signal::Direction(Direction::Left)]);
    }

    #[test]
    fn test_open_missing_device() {
        let err = match SerialSource::open("/dev/reflex-does-not-exist", 115_200) {
            Ok(_) => panic!("opening a missing device should fail"),
            Err(e) => e,
        };
        assert!(matches!(err, InputError::SerialOpen { .. }));
        assert!(err.is_recoverable());
    }
}
