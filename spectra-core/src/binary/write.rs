use byteorder::{BigEndian, ByteOrder as _, LittleEndian};
use spectra_types::ByteOrder;

use crate::REAL32_SIZE;

/// Записывает выборки `REAL,32` в порядке байт прибора.
pub fn write_real32_payload(
    samples: &[f32],
    order: ByteOrder,
) -> Vec<u8> {
    let mut buf = vec![0u8; samples.len() * REAL32_SIZE];

    match order {
        ByteOrder::Normal => BigEndian::write_f32_into(samples, &mut buf),
        ByteOrder::Swapped => LittleEndian::write_f32_into(samples, &mut buf),
    }

    buf
}
