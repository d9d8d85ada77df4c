//! Транспорт ответов прибора.
//!
//! Сам ввод/вывод VISA сюда не входит: декодеру нужен только источник сырых
//! ответов. [`IoTransport`] читает ответы из любого [`Read`] (сокет, файл с
//! захваченным ответом), [`LoopbackTransport`] отдаёт заранее заготовленные.

use std::{
    collections::VecDeque,
    io::{self, BufRead, BufReader, Read},
};

use log::{debug, trace};
use spectra_types::{RawResponse, TraceError, TraceResult};

use crate::{
    parse_header, BLOCK_MARKER, MESSAGE_TERMINATOR, VARIABLE_LENGTH_CLOSE, VARIABLE_LENGTH_OPEN,
};

/// Размер порции при чтении до конца сообщения.
pub const UNKNOWN_LENGTH_CHUNK: usize = 64 * 1024;

/// Возврат каретки перед терминатором (`\r\n`)
const CARRIAGE_RETURN: u8 = b'\r';

/// Резервирует место под `additional` байт в буфере ответа.
pub fn reserve_bytes(
    buf: &mut Vec<u8>,
    additional: usize,
) -> TraceResult<()> {
    buf.try_reserve(additional)
        .map_err(|_| TraceError::AllocationFailure {
            requested: buf.len().saturating_add(additional),
        })
}

/// Источник сырых ответов прибора.
pub trait Transport {
    /// Читает один ответ целиком.
    fn read_raw_response(&mut self) -> TraceResult<RawResponse>;

    /// Читает до конца сообщения, длина заранее не объявлена.
    fn read_raw_response_unknown_length(&mut self) -> TraceResult<RawResponse>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn read_raw_response(&mut self) -> TraceResult<RawResponse> {
        (**self).read_raw_response()
    }

    fn read_raw_response_unknown_length(&mut self) -> TraceResult<RawResponse> {
        (**self).read_raw_response_unknown_length()
    }
}

/// Транспорт поверх потока байт.
///
/// Двоичный блок читается по заголовку: ровно объявленное число байт, затем
/// терминатор, если он есть. Для `#0` возвращается только заголовок, остальное
/// забирает [`Transport::read_raw_response_unknown_length`] (до EOF).
pub struct IoTransport<R: Read> {
    reader: BufReader<R>,
}

/// Транспорт с очередью заготовленных ответов.
///
/// Оба метода чтения забирают следующий ответ из очереди.
#[derive(Debug, Default)]
pub struct LoopbackTransport {
    responses: VecDeque<Vec<u8>>,
}

////////////////////////////////////////////////////////////////////////////////
// IoTransport
////////////////////////////////////////////////////////////////////////////////

impl<R: Read> IoTransport<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
        }
    }

    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    fn read_header_byte(
        &mut self,
        what: &str,
    ) -> TraceResult<u8> {
        let mut byte = [0u8; 1];

        match self.reader.read_exact(&mut byte) {
            Ok(()) => Ok(byte[0]),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(
                TraceError::malformed_header(format!("stream ended before {what}")),
            ),
            Err(e) => Err(TraceError::Io(e)),
        }
    }

    /// Дочитывает заголовок двоичного блока после `#`.
    fn read_block_header(
        &mut self,
        buf: &mut Vec<u8>,
    ) -> TraceResult<()> {
        let count_byte = self.read_header_byte("length digit count")?;
        buf.push(count_byte);

        if count_byte == VARIABLE_LENGTH_OPEN {
            self.reader.read_until(VARIABLE_LENGTH_CLOSE, buf)?;

            if buf.last() != Some(&VARIABLE_LENGTH_CLOSE) {
                return Err(TraceError::malformed_header(
                    "stream ended before ')' in variable length header",
                ));
            }

            return Ok(());
        }

        if count_byte.is_ascii_digit() {
            for _ in 0..(count_byte - b'0') {
                let digit = self.read_header_byte("all length digits")?;
                buf.push(digit);
            }
        }

        // Нецифровой счётчик отклонит parse_header
        Ok(())
    }

    fn peek(&mut self) -> TraceResult<Option<u8>> {
        Ok(self.reader.fill_buf()?.first().copied())
    }

    /// Съедает терминатор после нагрузки (`\n` или `\r\n`), если он уже пришёл.
    fn skip_terminator(&mut self) -> TraceResult<()> {
        if self.peek()? == Some(CARRIAGE_RETURN) {
            self.reader.consume(1);
        }

        if self.peek()? == Some(MESSAGE_TERMINATOR) {
            self.reader.consume(1);
        }

        Ok(())
    }
}

impl<R: Read> Transport for IoTransport<R> {
    fn read_raw_response(&mut self) -> TraceResult<RawResponse> {
        let mut first = [0u8; 1];

        if self.reader.read(&mut first)? == 0 {
            debug!("stream is exhausted, returning empty response");
            return Ok(RawResponse::default());
        }

        let mut buf = vec![first[0]];

        if first[0] != BLOCK_MARKER {
            self.reader.read_until(MESSAGE_TERMINATOR, &mut buf)?;
            trace!("read ASCII response of {} bytes", buf.len());
            return Ok(RawResponse::new(buf));
        }

        self.read_block_header(&mut buf)?;

        let header = parse_header(&buf)?;

        if header.is_unknown_length() {
            debug!("block declares unknown length, payload left in stream");
            return Ok(RawResponse::new(buf));
        }

        let declared = header.declared_len;

        // Длина пришла из потока: буфер растёт по мере чтения
        reserve_bytes(&mut buf, declared.min(UNKNOWN_LENGTH_CHUNK))?;

        let received = (&mut self.reader)
            .take(declared as u64)
            .read_to_end(&mut buf)?;

        if received < declared {
            return Err(TraceError::truncated(declared, received));
        }

        self.skip_terminator()?;

        trace!(
            "read binary block: header {} bytes, payload {declared} bytes",
            header.header_len
        );

        Ok(RawResponse::new(buf))
    }

    fn read_raw_response_unknown_length(&mut self) -> TraceResult<RawResponse> {
        let mut buf = Vec::new();
        let mut chunk = vec![0u8; UNKNOWN_LENGTH_CHUNK];

        loop {
            let n = match self.reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(TraceError::Io(e)),
            };

            reserve_bytes(&mut buf, n)?;
            buf.extend_from_slice(&chunk[..n]);
        }

        debug!("unknown length read finished: {} bytes", buf.len());

        Ok(RawResponse::new(buf))
    }
}

////////////////////////////////////////////////////////////////////////////////
// LoopbackTransport
////////////////////////////////////////////////////////////////////////////////

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавляет ответ в конец очереди.
    pub fn push_response<B: Into<Vec<u8>>>(
        &mut self,
        response: B,
    ) {
        self.responses.push_back(response.into());
    }

    /// Сколько ответов ещё в очереди.
    pub fn pending(&self) -> usize {
        self.responses.len()
    }

    fn pop(&mut self) -> TraceResult<RawResponse> {
        self.responses
            .pop_front()
            .map(RawResponse::new)
            .ok_or_else(|| {
                TraceError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "no more queued responses",
                ))
            })
    }
}

impl Transport for LoopbackTransport {
    fn read_raw_response(&mut self) -> TraceResult<RawResponse> {
        self.pop()
    }

    fn read_raw_response_unknown_length(&mut self) -> TraceResult<RawResponse> {
        self.pop()
    }
}

impl<B: Into<Vec<u8>>> FromIterator<B> for LoopbackTransport {
    fn from_iter<I: IntoIterator<Item = B>>(iter: I) -> Self {
        Self {
            responses: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use spectra_types::ByteOrder;

    use super::*;
    use crate::{encode_real32_block, HeaderStyle};

    #[test]
    fn test_io_transport_reads_consecutive_blocks() {
        let mut stream =
            encode_real32_block(&[1.0, 2.0], ByteOrder::Swapped, HeaderStyle::Definite);
        stream.extend_from_slice(b"-1.5,2.5\n");
        stream.extend(encode_real32_block(&[3.0], ByteOrder::Swapped, HeaderStyle::Variable));

        let mut t = IoTransport::new(Cursor::new(stream));

        let first = t.read_raw_response().unwrap();
        assert_eq!(&first.as_bytes()[..3], b"#18");
        assert_eq!(first.len(), 3 + 8);

        let second = t.read_raw_response().unwrap();
        assert_eq!(second.as_bytes(), b"-1.5,2.5\n");

        let third = t.read_raw_response().unwrap();
        assert_eq!(&third.as_bytes()[..4], b"#(4)");
        assert_eq!(third.len(), 8);

        assert!(t.read_raw_response().unwrap().is_empty());
    }

    #[test]
    fn test_io_transport_payload_may_contain_terminator() {
        // 0x0A внутри нагрузки не должен обрывать чтение
        let payload = [0x0Au8, 0x0A, 0x0A, 0x0A];
        let mut stream = b"#14".to_vec();
        stream.extend_from_slice(&payload);
        stream.push(b'\n');

        let mut t = IoTransport::new(Cursor::new(stream));
        let raw = t.read_raw_response().unwrap();

        assert_eq!(&raw.as_bytes()[3..], &payload);
    }

    #[test]
    fn test_io_transport_short_read() {
        let mut t = IoTransport::new(Cursor::new(b"#216abcd".to_vec()));

        match t.read_raw_response().unwrap_err() {
            TraceError::TruncatedTransfer { declared, received } => {
                assert_eq!(declared, 16);
                assert_eq!(received, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_io_transport_huge_declared_length_is_truncation() {
        let mut t = IoTransport::new(Cursor::new(b"#(100000000000000)abcd".to_vec()));

        match t.read_raw_response().unwrap_err() {
            TraceError::TruncatedTransfer { declared, received } => {
                assert_eq!(declared, 100_000_000_000_000);
                assert_eq!(received, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_io_transport_crlf_terminator() {
        let mut stream = encode_real32_block(&[1.0], ByteOrder::Swapped, HeaderStyle::Definite);
        stream.pop();
        stream.extend_from_slice(b"\r\n1.5,2.5\r\n");

        let mut t = IoTransport::new(Cursor::new(stream));

        assert_eq!(t.read_raw_response().unwrap().len(), 3 + 4);
        assert_eq!(t.read_raw_response().unwrap().as_bytes(), b"1.5,2.5\r\n");
        assert!(t.read_raw_response().unwrap().is_empty());
    }

    #[test]
    fn test_reserve_bytes_reports_allocation_failure() {
        let mut buf = vec![0u8; 16];

        match reserve_bytes(&mut buf, usize::MAX).unwrap_err() {
            TraceError::AllocationFailure { requested } => assert_eq!(requested, usize::MAX),
            other => panic!("unexpected error: {other}"),
        }

        reserve_bytes(&mut buf, 1_024).unwrap();
        assert!(buf.capacity() >= 16 + 1_024);
    }

    #[test]
    fn test_io_transport_malformed_header() {
        let mut t = IoTransport::new(Cursor::new(b"#X123".to_vec()));
        assert!(matches!(
            t.read_raw_response(),
            Err(TraceError::MalformedBlockHeader(_))
        ));

        let mut t = IoTransport::new(Cursor::new(b"#5".to_vec()));
        assert!(matches!(
            t.read_raw_response(),
            Err(TraceError::MalformedBlockHeader(_))
        ));
    }

    #[test]
    fn test_io_transport_unknown_length() {
        let stream = encode_real32_block(&[7.0, 8.0], ByteOrder::Swapped, HeaderStyle::Indefinite);
        let mut t = IoTransport::new(Cursor::new(stream));

        let head = t.read_raw_response().unwrap();
        assert_eq!(head.as_bytes(), b"#0");

        let tail = t.read_raw_response_unknown_length().unwrap();
        assert_eq!(tail.len(), 8 + 1);
    }

    #[test]
    fn test_loopback_order_and_exhaustion() {
        let mut t: LoopbackTransport = ["1,2", "3"].into_iter().collect();
        assert_eq!(t.pending(), 2);

        assert_eq!(t.read_raw_response().unwrap().as_bytes(), b"1,2");
        assert_eq!(t.read_raw_response_unknown_length().unwrap().as_bytes(), b"3");
        assert!(matches!(t.read_raw_response(), Err(TraceError::Io(_))));
    }
}
