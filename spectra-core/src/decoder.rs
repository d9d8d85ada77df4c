//! Декодирование ответа прибора в выборки трассы или I/Q пары.

use std::ops::Range;

use log::{debug, warn};
use spectra_types::{
    BlockFormat, BlockHeader, ByteOrder, DecodedIq, DecodedTrace, RawResponse, TraceError,
    TraceResult,
};

use crate::{
    binary::read_real32_samples, parse_ascii_list, parse_header, IQ_TRANSFER_BLOCK_SAMPLES,
    MESSAGE_TERMINATOR,
};

/// Декодер блоков с фиксированным порядком байт прибора.
///
/// Не хранит состояния между вызовами и может разделяться между потоками.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceDecoder {
    /// Порядок байт двоичных данных прибора
    pub byte_order: ByteOrder,
}

impl TraceDecoder {
    pub fn new(byte_order: ByteOrder) -> Self {
        Self { byte_order }
    }

    /// Декодирует ответ в трассу, не больше `capacity` выборок.
    pub fn decode_block(
        &self,
        raw: RawResponse,
        capacity: usize,
    ) -> TraceResult<DecodedTrace> {
        let (samples, actual_count) = self.decode_flat(raw, capacity)?;

        if actual_count > samples.len() {
            warn!(
                "trace truncated to {} of {actual_count} samples",
                samples.len()
            );
        }

        Ok(DecodedTrace {
            samples,
            actual_count,
        })
    }

    /// Декодирует ответ с I/Q данными, не больше `capacity` пар.
    pub fn decode_interleaved_iq(
        &self,
        raw: RawResponse,
        capacity: usize,
    ) -> TraceResult<DecodedIq> {
        // Q лежит во второй половине блока, нужен весь поток
        let (flat, _) = self.decode_flat(raw, usize::MAX)?;
        let iq = deinterleave_iq(&flat, capacity);

        if iq.is_truncated() {
            warn!(
                "I/Q data truncated to {} of {} pairs",
                iq.len(),
                iq.actual_pair_count
            );
        }

        Ok(iq)
    }

    fn decode_flat(
        &self,
        raw: RawResponse,
        capacity: usize,
    ) -> TraceResult<(Vec<f64>, usize)> {
        let mut data = raw.into_bytes();
        let header = parse_header(&data)?;
        let range = payload_range(&header, &data)?;

        debug!(
            "decoding {:?} block: header {} bytes, payload {} bytes",
            header.format,
            header.header_len,
            range.len()
        );

        match header.format {
            BlockFormat::Binary => Ok(read_real32_samples(
                &mut data[range],
                self.byte_order,
                capacity,
            )),
            BlockFormat::Ascii => parse_ascii_list(&data[range], capacity),
        }
    }
}

/// Декодирует трассу с порядком байт по умолчанию (`SWAPped`).
pub fn decode_block(
    raw: RawResponse,
    capacity: usize,
) -> TraceResult<DecodedTrace> {
    TraceDecoder::default().decode_block(raw, capacity)
}

/// Декодирует I/Q данные с порядком байт по умолчанию (`SWAPped`).
pub fn decode_interleaved_iq(
    raw: RawResponse,
    capacity: usize,
) -> TraceResult<DecodedIq> {
    TraceDecoder::default().decode_interleaved_iq(raw, capacity)
}

/// Диапазон байт нагрузки внутри ответа.
///
/// Для определённой длины байты после нагрузки (терминатор) игнорируются.
/// Для `#0` нагрузка идёт до конца ответа без одного завершающего `\n`.
pub fn payload_range(
    header: &BlockHeader,
    data: &[u8],
) -> TraceResult<Range<usize>> {
    let start = header.header_len.min(data.len());

    match header.format {
        BlockFormat::Ascii => Ok(0..data.len()),
        BlockFormat::Binary if header.declared_len > 0 => {
            let received = data.len() - start;

            if received < header.declared_len {
                return Err(TraceError::truncated(header.declared_len, received));
            }

            Ok(start..start + header.declared_len)
        }
        BlockFormat::Binary => {
            let end = if data.last() == Some(&MESSAGE_TERMINATOR) && data.len() > start {
                data.len() - 1
            } else {
                data.len()
            };

            Ok(start..end)
        }
    }
}

/// Разделяет плоский поток на I и Q.
///
/// Если пар не больше одного блока передачи, первая половина — I, вторая — Q.
/// Иначе поток состоит из блоков по [`IQ_TRANSFER_BLOCK_SAMPLES`] значений I,
/// за которыми идёт столько же значений Q; последний неполный блок делится
/// пополам по своей длине. Нечётное последнее значение игнорируется.
pub fn deinterleave_iq(
    flat: &[f64],
    capacity: usize,
) -> DecodedIq {
    let pairs = flat.len() / 2;
    let keep = pairs.min(capacity);

    let mut i = Vec::with_capacity(keep);
    let mut q = Vec::with_capacity(keep);

    if pairs <= IQ_TRANSFER_BLOCK_SAMPLES {
        i.extend_from_slice(&flat[..keep]);
        q.extend_from_slice(&flat[pairs..pairs + keep]);
    } else {
        let mut offset = 0;

        while i.len() < keep {
            let chunk = ((flat.len() - offset) / 2).min(IQ_TRANSFER_BLOCK_SAMPLES);

            if chunk == 0 {
                break;
            }

            let take = chunk.min(keep - i.len());

            i.extend_from_slice(&flat[offset..offset + take]);
            q.extend_from_slice(&flat[offset + chunk..offset + chunk + take]);
            offset += 2 * chunk;
        }
    }

    DecodedIq {
        i,
        q,
        actual_pair_count: pairs,
    }
}
