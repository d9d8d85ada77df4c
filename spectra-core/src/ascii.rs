use spectra_types::{TraceError, TraceResult};

/// Разбирает ASCII ответ `v1,v2,...,vN`.
///
/// Возвращает не больше `capacity` значений и общее количество значений в
/// ответе. Значения за пределами ёмкости считаются, но не разбираются.
pub fn parse_ascii_list(
    payload: &[u8],
    capacity: usize,
) -> TraceResult<(Vec<f64>, usize)> {
    let text = String::from_utf8_lossy(payload);
    let text = text.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\0');

    if text.is_empty() {
        return Ok((Vec::new(), 0));
    }

    let mut samples = Vec::with_capacity(capacity.min(text.len() / 2 + 1));
    let mut count = 0;

    for (index, token) in text.split(',').enumerate() {
        count += 1;

        if index >= capacity {
            continue;
        }

        let token = token.trim();
        let value = token
            .parse::<f64>()
            .map_err(|_| TraceError::invalid_ascii(index, token))?;

        samples.push(value);
    }

    Ok((samples, count))
}

/// Записывает значения в ASCII форме прибора, с терминатором.
pub fn write_ascii_list(samples: &[f64]) -> Vec<u8> {
    let mut text = samples
        .iter()
        .map(|v| format!("{v:E}"))
        .collect::<Vec<_>>()
        .join(",");

    text.push('\n');
    text.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ascii_list() {
        let (samples, count) = parse_ascii_list(b"-8.234E+01,1.5,  3 ,-0.25\n", 16).unwrap();

        assert_eq!(count, 4);
        assert_eq!(samples, vec![-82.34, 1.5, 3.0, -0.25]);
    }

    #[test]
    fn test_empty_ascii_is_not_error() {
        let (samples, count) = parse_ascii_list(b"", 16).unwrap();
        assert!(samples.is_empty());
        assert_eq!(count, 0);

        let (samples, count) = parse_ascii_list(b"\r\n", 16).unwrap();
        assert!(samples.is_empty());
        assert_eq!(count, 0);
    }

    #[test]
    fn test_ascii_truncation_counts_all_tokens() {
        let (samples, count) = parse_ascii_list(b"1,2,3,4,5", 2).unwrap();

        assert_eq!(samples, vec![1.0, 2.0]);
        assert_eq!(count, 5);
    }

    #[test]
    fn test_ascii_invalid_token() {
        let err = parse_ascii_list(b"1.0,abc,3.0", 8).unwrap_err();

        match err {
            TraceError::InvalidAsciiValue { index, token } => {
                assert_eq!(index, 1);
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_token_beyond_capacity_not_parsed() {
        let (samples, count) = parse_ascii_list(b"1.0,garbage", 1).unwrap();

        assert_eq!(samples, vec![1.0]);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_write_then_parse_is_exact() {
        let values = [-81.234_567_891_234, 0.0, 1e-12, 42.0];
        let text = write_ascii_list(&values);

        assert_eq!(*text.last().unwrap(), b'\n');

        let (parsed, count) = parse_ascii_list(&text, values.len()).unwrap();
        assert_eq!(count, values.len());
        assert_eq!(parsed, values);
    }
}
