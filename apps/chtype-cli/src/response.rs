//! Query responses: the column list a result was described with, the format
//! its payload is encoded in, and the raw payload stream.
//!
//! Decoding rows is left to callers; a response only hands out its bytes.

use crate::column::ColumnDescriptor;
use crate::errors::TypeParseError;
use crate::format::Format;
use std::io::{Read, Result as IoResult, Write};
use tracing::debug;

/// Write buffer size used when `pipe` is called with 0.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Upper bound for the `pipe` buffer.
pub const MAX_BUFFER_SIZE: usize = 128 * 1024;

/// Resolves a requested buffer size: 0 selects the default, anything larger
/// than [`MAX_BUFFER_SIZE`] is capped.
pub fn resolve_buffer_size(requested: usize) -> usize {
    match requested {
        0 => DEFAULT_BUFFER_SIZE,
        size => size.min(MAX_BUFFER_SIZE),
    }
}

pub trait Response {
    /// Columns of the result, in order.
    fn columns(&self) -> &[ColumnDescriptor];

    fn format(&self) -> Format;

    /// Raw payload, `None` once closed or when there is none.
    fn input(&mut self) -> Option<&mut dyn Read>;

    /// Releases the payload stream.
    fn close(&mut self);

    fn is_closed(&self) -> bool;

    /// Copies the remaining payload to `output` and returns the byte count.
    ///
    /// Flushing `output` is left to the caller.
    fn pipe(&mut self, output: &mut dyn Write, buffer_size: usize) -> IoResult<u64> {
        let Some(input) = self.input() else {
            return Ok(0);
        };

        let mut buffer = vec![0u8; resolve_buffer_size(buffer_size)];
        let mut total = 0u64;
        loop {
            let read = match input.read(&mut buffer) {
                Ok(0) => break,
                Ok(read) => read,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            output.write_all(&buffer[..read])?;
            total += read as u64;
        }
        debug!("Piped {} byte(s) with a {} byte buffer", total, buffer.len());
        Ok(total)
    }
}

/// A response without columns or payload. It holds no resources, so closing
/// it has no effect and it never reports being closed.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyResponse;

impl Response for EmptyResponse {
    fn columns(&self) -> &[ColumnDescriptor] {
        &[]
    }

    fn format(&self) -> Format {
        Format::default()
    }

    fn input(&mut self) -> Option<&mut dyn Read> {
        None
    }

    fn close(&mut self) {}

    fn is_closed(&self) -> bool {
        false
    }
}

/// A response over any reader, described by a column declaration string.
pub struct StreamResponse<R: Read> {
    columns: Vec<ColumnDescriptor>,
    format: Format,
    reader: Option<R>,
}

impl<R: Read> StreamResponse<R> {
    /// Parses `declaration` (e.g. the result of `DESCRIBE TABLE`) into the
    /// column list.
    pub fn new(declaration: &str, format: Format, reader: R) -> Result<Self, TypeParseError> {
        let columns = ColumnDescriptor::parse(declaration)?;
        Ok(Self::with_columns(columns, format, reader))
    }

    pub fn with_columns(columns: Vec<ColumnDescriptor>, format: Format, reader: R) -> Self {
        Self {
            columns,
            format,
            reader: Some(reader),
        }
    }

    /// Closes the response and returns the reader, if still open.
    pub fn into_inner(mut self) -> Option<R> {
        self.reader.take()
    }
}

impl<R: Read> Response for StreamResponse<R> {
    fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    fn format(&self) -> Format {
        self.format
    }

    fn input(&mut self) -> Option<&mut dyn Read> {
        self.reader.as_mut().map(|reader| reader as &mut dyn Read)
    }

    fn close(&mut self) {
        if self.reader.take().is_some() {
            debug!("Closed response with {} column(s)", self.columns.len());
        }
    }

    fn is_closed(&self) -> bool {
        self.reader.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::DataType;
    use std::io::Cursor;

    #[test]
    fn test_buffer_size() {
        assert_eq!(resolve_buffer_size(0), DEFAULT_BUFFER_SIZE);
        assert_eq!(resolve_buffer_size(3), 3);
        assert_eq!(resolve_buffer_size(usize::MAX), MAX_BUFFER_SIZE);
    }

    #[test]
    fn test_empty_response() {
        let mut response = EmptyResponse;
        assert!(response.columns().is_empty());
        assert_eq!(response.format(), Format::RowBinary);
        let mut output = Vec::new();
        assert_eq!(response.pipe(&mut output, 0).unwrap(), 0);
        response.close();
        assert!(!response.is_closed());
    }

    #[test]
    fn test_stream_response_pipes_payload() {
        let payload: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        let mut response = StreamResponse::new(
            "a UInt8, b Nullable(String)",
            Format::RowBinaryWithNamesAndTypes,
            Cursor::new(payload.clone()),
        )
        .unwrap();
        assert_eq!(response.columns().len(), 2);
        assert_eq!(response.columns()[1].data_type(), DataType::Nullable);

        let mut output = Vec::new();
        // a tiny buffer still moves everything
        assert_eq!(response.pipe(&mut output, 7).unwrap(), 10_000);
        assert_eq!(output, payload);
        assert_eq!(response.pipe(&mut output, 0).unwrap(), 0);
    }

    #[test]
    fn test_closed_stream_response() {
        let reader = Cursor::new(vec![1u8, 2, 3]);
        let mut response = StreamResponse::new("a UInt8", Format::RowBinary, reader).unwrap();
        assert!(!response.is_closed());
        response.close();
        assert!(response.is_closed());
        assert!(response.input().is_none());
        let mut output = Vec::new();
        assert_eq!(response.pipe(&mut output, 0).unwrap(), 0);
        assert!(response.into_inner().is_none());
    }

    #[test]
    fn test_invalid_declaration() {
        let result = StreamResponse::new("a UInt8)", Format::RowBinary, Cursor::new(Vec::new()));
        assert!(result.is_err());
    }
}
