// Framing for newline-delimited JSON-RPC input

use bytes::BytesMut;
use std::io;
use tokio_util::codec::{Decoder, LinesCodec, LinesCodecError};

/// Longest accepted message, in bytes.
pub const MAX_MESSAGE_LENGTH: usize = 8 * 1024 * 1024;

/// One line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Message(String),
    /// A line that could not be decoded (invalid UTF-8 or over the length
    /// limit). The bytes are already consumed.
    Malformed(String),
}

/// Line decoder that reports undecodable lines as frames instead of errors,
/// so one bad line does not end the stream. Only read errors are errors.
#[derive(Debug)]
pub struct MessageCodec {
    lines: LinesCodec,
}

impl MessageCodec {
    pub fn new() -> Self {
        Self::with_max_length(MAX_MESSAGE_LENGTH)
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            lines: LinesCodec::new_with_max_length(max_length),
        }
    }
}

impl Default for MessageCodec {
    fn default() -> Self {
        Self::new()
    }
}

// Errors out of the inner codec come from the data itself; read errors never
// pass through `decode`.
fn frame(decoded: Result<Option<String>, LinesCodecError>) -> Option<Frame> {
    match decoded {
        Ok(line) => line.map(Frame::Message),
        Err(e) => Some(Frame::Malformed(e.to_string())),
    }
}

impl Decoder for MessageCodec {
    type Item = Frame;
    type Error = io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Frame>, io::Error> {
        Ok(frame(self.lines.decode(buf)))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Frame>, io::Error> {
        Ok(frame(self.lines.decode_eof(buf)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_lines() {
        let mut codec = MessageCodec::new();
        let mut buf = BytesMut::from(&b"{\"a\":1}\r\n{\"b\":2}\n{\"c\""[..]);

        assert_eq!(codec.decode(&mut buf).unwrap(), Some(Frame::Message("{\"a\":1}".into())));
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(Frame::Message("{\"b\":2}".into())));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert_eq!(
            codec.decode_eof(&mut buf).unwrap(),
            Some(Frame::Message("{\"c\"".into()))
        );
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let mut codec = MessageCodec::new();
        let mut buf = BytesMut::from(&b"\xff\xfe\n{\"ok\":true}\n"[..]);

        assert!(matches!(codec.decode(&mut buf).unwrap(), Some(Frame::Malformed(_))));
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(Frame::Message("{\"ok\":true}".into()))
        );
    }

    #[test]
    fn test_overlong_line_is_discarded() {
        let mut codec = MessageCodec::with_max_length(8);
        let mut buf = BytesMut::from(&b"0123456789abcdef\nshort\n"[..]);

        assert!(matches!(codec.decode(&mut buf).unwrap(), Some(Frame::Malformed(_))));

        let mut next = None;
        while next.is_none() {
            next = codec.decode(&mut buf).unwrap();
        }
        assert_eq!(next, Some(Frame::Message("short".into())));
    }
}
