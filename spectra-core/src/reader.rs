use log::debug;
use spectra_types::{ByteOrder, DecodedIq, DecodedTrace, RawResponse, TraceResult};

use crate::{parse_header, reserve_bytes, TraceDecoder, Transport};

/// Читатель трасс поверх транспорта.
///
/// Забирает ответ, при `#0` дочитывает нагрузку неизвестной длины и передаёт
/// готовый буфер декодеру.
pub struct TraceReader<T: Transport> {
    transport: T,
    decoder: TraceDecoder,
    stats: ReadStats,
}

/// Статистика, накопленная [`TraceReader`] в процессе чтения.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReadStats {
    /// Успешно декодированных ответов.
    pub blocks_ok: u64,
    /// Ответов с ошибкой транспорта или формата.
    pub blocks_failed: u64,
    /// Возвращено выборок (для I/Q — пар).
    pub samples_decoded: u64,
    /// Отброшено выборок сверх ёмкости.
    pub samples_discarded: u64,
    /// Всего получено байт ответов.
    pub bytes_processed: u64,
}

impl<T: Transport> TraceReader<T> {
    pub fn new(
        transport: T,
        byte_order: ByteOrder,
    ) -> Self {
        Self {
            transport,
            decoder: TraceDecoder::new(byte_order),
            stats: ReadStats::default(),
        }
    }

    /// Читает и декодирует одну трассу.
    pub fn read_trace(
        &mut self,
        capacity: usize,
    ) -> TraceResult<DecodedTrace> {
        let result = self
            .fetch()
            .and_then(|raw| self.decoder.decode_block(raw, capacity));

        match result {
            Ok(trace) => {
                self.record_ok(trace.len(), trace.discarded());
                Ok(trace)
            }
            Err(e) => {
                self.stats.blocks_failed += 1;
                Err(e)
            }
        }
    }

    /// Читает и декодирует один блок I/Q данных.
    pub fn read_iq(
        &mut self,
        capacity: usize,
    ) -> TraceResult<DecodedIq> {
        let result = self
            .fetch()
            .and_then(|raw| self.decoder.decode_interleaved_iq(raw, capacity));

        match result {
            Ok(iq) => {
                self.record_ok(iq.len(), iq.discarded());
                Ok(iq)
            }
            Err(e) => {
                self.stats.blocks_failed += 1;
                Err(e)
            }
        }
    }

    /// Забирает полный ответ.
    ///
    /// Если транспорт вернул только заголовок `#0`, нагрузка дочитывается
    /// через [`Transport::read_raw_response_unknown_length`]. Ответ `#0`,
    /// уже содержащий данные, считается полным.
    fn fetch(&mut self) -> TraceResult<RawResponse> {
        let raw = self.transport.read_raw_response()?;
        self.stats.bytes_processed += raw.len() as u64;

        let header = parse_header(raw.as_bytes())?;

        if !header.is_unknown_length() || raw.len() > header.header_len {
            return Ok(raw);
        }

        let tail = self.transport.read_raw_response_unknown_length()?;
        self.stats.bytes_processed += tail.len() as u64;

        let mut data = raw.into_bytes();

        reserve_bytes(&mut data, tail.len())?;
        data.extend_from_slice(tail.as_bytes());

        debug!("assembled unknown length block of {} bytes", data.len());

        Ok(RawResponse::new(data))
    }

    fn record_ok(
        &mut self,
        returned: usize,
        discarded: usize,
    ) {
        self.stats.blocks_ok += 1;
        self.stats.samples_decoded += returned as u64;
        self.stats.samples_discarded += discarded as u64;
    }

    /// Порядок байт, с которым декодируются двоичные блоки.
    pub fn byte_order(&self) -> ByteOrder {
        self.decoder.byte_order
    }

    /// Меняет порядок байт (после `FORMat:BORDer` на приборе).
    pub fn set_byte_order(
        &mut self,
        byte_order: ByteOrder,
    ) {
        self.decoder.byte_order = byte_order;
    }

    /// Накопленная статистика чтения.
    pub fn stats(&self) -> &ReadStats {
        &self.stats
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }
}

#[cfg(test)]
mod tests {
    use spectra_types::TraceError;

    use super::*;
    use crate::{encode_real32_block, HeaderStyle, LoopbackTransport};

    #[test]
    fn test_reader_decodes_queue() {
        let mut t = LoopbackTransport::new();
        t.push_response(encode_real32_block(
            &[1.0, 2.0, 3.0],
            ByteOrder::Swapped,
            HeaderStyle::Definite,
        ));
        t.push_response("4.5,5.5\n");

        let mut reader = TraceReader::new(t, ByteOrder::Swapped);

        let first = reader.read_trace(2).unwrap();
        assert_eq!(first.samples, vec![1.0, 2.0]);
        assert_eq!(first.actual_count, 3);

        let second = reader.read_trace(8).unwrap();
        assert_eq!(second.samples, vec![4.5, 5.5]);

        let stats = reader.stats();
        assert_eq!(stats.blocks_ok, 2);
        assert_eq!(stats.samples_decoded, 4);
        assert_eq!(stats.samples_discarded, 1);
        assert_eq!(stats.blocks_failed, 0);
    }

    #[test]
    fn test_reader_appends_unknown_length_tail() {
        let mut t = LoopbackTransport::new();
        t.push_response("#0");
        t.push_response(
            [1.0f32, 2.0]
                .iter()
                .flat_map(|v| v.to_le_bytes())
                .chain([b'\n'])
                .collect::<Vec<u8>>(),
        );

        let mut reader = TraceReader::new(t, ByteOrder::Swapped);
        let trace = reader.read_trace(8).unwrap();

        assert_eq!(trace.samples, vec![1.0, 2.0]);
        assert_eq!(reader.stats().bytes_processed, 2 + 9);
        assert_eq!(reader.transport_mut().pending(), 0);
    }

    #[test]
    fn test_reader_self_contained_indefinite_block() {
        let mut t = LoopbackTransport::new();
        t.push_response(encode_real32_block(&[9.0], ByteOrder::Swapped, HeaderStyle::Indefinite));
        t.push_response("1");

        let mut reader = TraceReader::new(t, ByteOrder::Swapped);

        assert_eq!(reader.read_trace(4).unwrap().samples, vec![9.0]);
        // Следующий ответ не тронут
        assert_eq!(reader.transport_mut().pending(), 1);
    }

    #[test]
    fn test_reader_counts_failures() {
        let mut t = LoopbackTransport::new();
        t.push_response("#X12");

        let mut reader = TraceReader::new(t, ByteOrder::Swapped);

        assert!(matches!(
            reader.read_trace(4),
            Err(TraceError::MalformedBlockHeader(_))
        ));
        // Очередь пуста: ошибка транспорта
        assert!(matches!(reader.read_trace(4), Err(TraceError::Io(_))));
        assert_eq!(reader.stats().blocks_failed, 2);
    }

    #[test]
    fn test_reader_iq_and_byte_order_switch() {
        let mut t = LoopbackTransport::new();
        t.push_response(encode_real32_block(
            &[1.0, 2.0, -1.0, -2.0],
            ByteOrder::Normal,
            HeaderStyle::Definite,
        ));

        let mut reader = TraceReader::new(t, ByteOrder::Swapped);
        reader.set_byte_order(ByteOrder::Normal);
        assert_eq!(reader.byte_order(), ByteOrder::Normal);

        let iq = reader.read_iq(8).unwrap();
        assert_eq!(iq.i, vec![1.0, 2.0]);
        assert_eq!(iq.q, vec![-1.0, -2.0]);
        assert_eq!(reader.stats().samples_decoded, 2);
    }
}
