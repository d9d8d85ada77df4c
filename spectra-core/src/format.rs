//! Формат блоков данных IEEE-488.2, которыми анализатор отвечает на запросы
//! трасс.
//!
//! ```text
//! #<n><len><payload>   определённая длина: n цифр длины, затем len байт
//! #(<len>)<payload>    длина переменной ширины в скобках
//! #0<payload>\n        длина неизвестна, читается до конца сообщения
//! v1,v2,...,vN\n       ASCII список (первый байт не '#')
//! ```

use spectra_types::{BlockHeader, TraceError, TraceResult};

/// Маркер двоичного блока
pub const BLOCK_MARKER: u8 = b'#';

/// Открывающая скобка длины переменной ширины
pub const VARIABLE_LENGTH_OPEN: u8 = b'(';

/// Закрывающая скобка длины переменной ширины
pub const VARIABLE_LENGTH_CLOSE: u8 = b')';

/// Терминатор сообщения
pub const MESSAGE_TERMINATOR: u8 = b'\n';

/// Размер одной выборки `REAL,32` в байтах
pub const REAL32_SIZE: usize = 4;

/// Максимум цифр длины в определённом заголовке (`#9...`)
pub const MAX_LENGTH_DIGITS: usize = 9;

/// Выборок на канал в одном блоке передачи I/Q.
///
/// Значение задано прибором (разбиение передачи у одного семейства
/// анализаторов) и не является общим свойством формата.
pub const IQ_TRANSFER_BLOCK_SAMPLES: usize = 524_288;

/// Разбирает заголовок ответа.
///
/// Ответ, не начинающийся с `#`, считается ASCII списком. Для двоичного
/// блока возвращается объявленная длина и размер заголовка.
pub fn parse_header(raw: &[u8]) -> TraceResult<BlockHeader> {
    if raw.first() != Some(&BLOCK_MARKER) {
        return Ok(BlockHeader::ascii());
    }

    let count_byte = *raw
        .get(1)
        .ok_or_else(|| TraceError::malformed_header("missing length digit count after '#'"))?;

    if count_byte == VARIABLE_LENGTH_OPEN {
        let close = raw[2..]
            .iter()
            .position(|&b| b == VARIABLE_LENGTH_CLOSE)
            .ok_or_else(|| TraceError::malformed_header("missing ')' in variable length header"))?;

        let declared_len = parse_length_digits(&raw[2..2 + close])?;

        return Ok(BlockHeader::binary(declared_len, 2 + close + 1));
    }

    if !count_byte.is_ascii_digit() {
        return Err(TraceError::malformed_header(format!(
            "expected length digit count, found {:?}",
            count_byte as char
        )));
    }

    let n = (count_byte - b'0') as usize;

    // #0: длина неизвестна
    if n == 0 {
        return Ok(BlockHeader::binary(0, 2));
    }

    let digits = raw.get(2..2 + n).ok_or_else(|| {
        TraceError::malformed_header(format!(
            "header declares {n} length digits, only {} present",
            raw.len() - 2
        ))
    })?;

    let declared_len = parse_length_digits(digits)?;

    Ok(BlockHeader::binary(declared_len, 2 + n))
}

/// Формирует заголовок определённой длины `#<n><len>`.
///
/// Длины, не помещающиеся в 9 цифр, записываются в форме `#(<len>)`.
pub fn definite_header(payload_len: usize) -> Vec<u8> {
    let digits = payload_len.to_string();

    if digits.len() > MAX_LENGTH_DIGITS {
        return variable_header(payload_len);
    }

    let mut buf = Vec::with_capacity(2 + digits.len());

    buf.push(BLOCK_MARKER);
    buf.push(b'0' + digits.len() as u8);
    buf.extend_from_slice(digits.as_bytes());
    buf
}

/// Формирует заголовок переменной ширины `#(<len>)`.
pub fn variable_header(payload_len: usize) -> Vec<u8> {
    let mut buf = vec![BLOCK_MARKER, VARIABLE_LENGTH_OPEN];

    buf.extend_from_slice(payload_len.to_string().as_bytes());
    buf.push(VARIABLE_LENGTH_CLOSE);
    buf
}

fn parse_length_digits(digits: &[u8]) -> TraceResult<usize> {
    if digits.is_empty() {
        return Err(TraceError::malformed_header("empty length field"));
    }

    digits.iter().try_fold(0usize, |acc, &b| {
        if !b.is_ascii_digit() {
            return Err(TraceError::malformed_header(format!(
                "expected length digit, found {:?}",
                b as char
            )));
        }

        acc.checked_mul(10)
            .and_then(|v| v.checked_add((b - b'0') as usize))
            .ok_or_else(|| TraceError::malformed_header("declared length overflows usize"))
    })
}
