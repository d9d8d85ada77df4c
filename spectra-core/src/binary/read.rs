use std::sync::OnceLock;

use byteorder::{ByteOrder as _, NativeEndian};
use log::{trace, warn};
use spectra_types::ByteOrder;

use crate::REAL32_SIZE;

/// Порядок байт хоста, определяется один раз за процесс.
static HOST_BYTE_ORDER: OnceLock<ByteOrder> = OnceLock::new();

/// Возвращает порядок байт хоста.
pub fn host_byte_order() -> ByteOrder {
    *HOST_BYTE_ORDER.get_or_init(|| {
        let probe = 1u16.to_ne_bytes();
        let order = if probe[0] == 1 {
            ByteOrder::Swapped
        } else {
            ByteOrder::Normal
        };

        trace!("host byte order probed: {order}");
        order
    })
}

/// `true`, если порядок байт прибора не совпадает с порядком хоста.
pub fn needs_swap(instrument: ByteOrder) -> bool {
    instrument != host_byte_order()
}

/// Переворачивает каждую группу из `width` байт на месте.
///
/// Неполная последняя группа не трогается.
pub fn swap_groups_in_place(
    buf: &mut [u8],
    width: usize,
) {
    if width < 2 {
        return;
    }

    for group in buf.chunks_exact_mut(width) {
        group.reverse();
    }
}

/// Декодирует нагрузку `REAL,32` в `f64`.
///
/// Возвращает не больше `capacity` выборок и количество выборок в нагрузке.
/// Байты сохранённых выборок переставляются на месте, если порядок прибора
/// отличается от порядка хоста.
pub fn read_real32_samples(
    payload: &mut [u8],
    order: ByteOrder,
    capacity: usize,
) -> (Vec<f64>, usize) {
    let count = payload.len() / REAL32_SIZE;
    let remainder = payload.len() % REAL32_SIZE;

    if remainder != 0 {
        warn!(
            "binary payload of {} bytes is not a multiple of {REAL32_SIZE}, \
             ignoring {remainder} trailing bytes",
            payload.len()
        );
    }

    let keep = count.min(capacity);
    let region = &mut payload[..keep * REAL32_SIZE];

    if needs_swap(order) {
        trace!("swapping {keep} samples from {order} to host order");
        swap_groups_in_place(region, REAL32_SIZE);
    }

    let mut narrow = vec![0f32; keep];
    NativeEndian::read_f32_into(region, &mut narrow);

    (narrow.into_iter().map(f64::from).collect(), count)
}
