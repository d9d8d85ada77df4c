//! Формирование ответов в формате прибора: обратная операция к декодеру.
//!
//! Используется симулятором, тестами и бенчмарками.

use spectra_types::ByteOrder;

use crate::{
    binary::write_real32_payload, definite_header, variable_header, write_ascii_list,
    BLOCK_MARKER, IQ_TRANSFER_BLOCK_SAMPLES, MESSAGE_TERMINATOR,
};

/// Вид заголовка двоичного блока
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderStyle {
    /// `#<n><len>`
    #[default]
    Definite,
    /// `#(<len>)`
    Variable,
    /// `#0`, длина не объявляется
    Indefinite,
}

/// Кодирует выборки в двоичный блок `REAL,32` с терминатором.
pub fn encode_real32_block(
    samples: &[f32],
    order: ByteOrder,
    style: HeaderStyle,
) -> Vec<u8> {
    let payload = write_real32_payload(samples, order);

    let mut buf = match style {
        HeaderStyle::Definite => definite_header(payload.len()),
        HeaderStyle::Variable => variable_header(payload.len()),
        HeaderStyle::Indefinite => vec![BLOCK_MARKER, b'0'],
    };

    buf.reserve(payload.len() + 1);
    buf.extend_from_slice(&payload);
    buf.push(MESSAGE_TERMINATOR);
    buf
}

/// Кодирует выборки ASCII списком через запятую.
pub fn encode_ascii_list(samples: &[f64]) -> Vec<u8> {
    write_ascii_list(samples)
}

/// Раскладывает I/Q в плоский поток по правилам блоков передачи прибора.
///
/// Лишние значения более длинного канала отбрасываются.
pub fn interleave_iq_blocks(
    i: &[f32],
    q: &[f32],
) -> Vec<f32> {
    let pairs = i.len().min(q.len());
    let mut flat = Vec::with_capacity(2 * pairs);

    if pairs <= IQ_TRANSFER_BLOCK_SAMPLES {
        flat.extend_from_slice(&i[..pairs]);
        flat.extend_from_slice(&q[..pairs]);
        return flat;
    }

    for start in (0..pairs).step_by(IQ_TRANSFER_BLOCK_SAMPLES) {
        let end = (start + IQ_TRANSFER_BLOCK_SAMPLES).min(pairs);

        flat.extend_from_slice(&i[start..end]);
        flat.extend_from_slice(&q[start..end]);
    }

    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deinterleave_iq;

    #[test]
    fn test_definite_block_layout() {
        let raw = encode_real32_block(&[1.0], ByteOrder::Normal, HeaderStyle::Definite);

        assert_eq!(raw, b"#14\x3f\x80\x00\x00\n".to_vec());
    }

    #[test]
    fn test_indefinite_block_layout() {
        let raw = encode_real32_block(&[1.0], ByteOrder::Swapped, HeaderStyle::Indefinite);

        assert_eq!(raw, b"#0\x00\x00\x80\x3f\n".to_vec());
    }

    #[test]
    fn test_interleave_small_is_concatenation() {
        let flat = interleave_iq_blocks(&[1.0, 2.0], &[-1.0, -2.0, -3.0]);
        assert_eq!(flat, vec![1.0, 2.0, -1.0, -2.0]);
    }

    #[test]
    fn test_interleave_then_deinterleave_large() {
        let pairs = IQ_TRANSFER_BLOCK_SAMPLES * 2 + 7;
        let i: Vec<f32> = (0..pairs).map(|k| k as f32).collect();
        let q: Vec<f32> = (0..pairs).map(|k| -(k as f32)).collect();

        let flat: Vec<f64> = interleave_iq_blocks(&i, &q)
            .into_iter()
            .map(f64::from)
            .collect();

        // Второй блок начинается с I значений
        assert_eq!(flat[2 * IQ_TRANSFER_BLOCK_SAMPLES], IQ_TRANSFER_BLOCK_SAMPLES as f64);

        let iq = deinterleave_iq(&flat, usize::MAX);
        assert_eq!(iq.len(), pairs);
        assert_eq!(iq.i[pairs - 1], (pairs - 1) as f64);
        assert_eq!(iq.q[pairs - 1], -((pairs - 1) as f64));
    }
}
