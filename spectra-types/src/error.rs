use thiserror::Error;

/// Результат для операций декодирования трасс
pub type TraceResult<T> = std::result::Result<T, TraceError>;

/// Ошибки чтения и декодирования блоков данных прибора.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Некорректный заголовок блока (не цифра там, где ожидается цифра)
    #[error("Malformed block header: {0}")]
    MalformedBlockHeader(String),

    /// Транспорт вернул меньше байт, чем объявлено в заголовке
    #[error("Truncated transfer: declared {declared} bytes, received {received}")]
    TruncatedTransfer { declared: usize, received: usize },

    /// Не удалось нарастить буфер ответа при чтении блока
    #[error("Allocation failure: cannot reserve {requested} bytes")]
    AllocationFailure { requested: usize },

    /// Токен ASCII списка не является числом
    #[error("Invalid ASCII value at index {index}: '{token}'")]
    InvalidAsciiValue { index: usize, token: String },

    /// Ошибки ввода/вывода транспорта (автоконвертируются из std::io::Error)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TraceError {
    /// Удобные конструкторы
    pub fn malformed_header<S: Into<String>>(s: S) -> Self {
        Self::MalformedBlockHeader(s.into())
    }

    pub fn truncated(
        declared: usize,
        received: usize,
    ) -> Self {
        Self::TruncatedTransfer { declared, received }
    }

    pub fn invalid_ascii<S: Into<String>>(
        index: usize,
        token: S,
    ) -> Self {
        Self::InvalidAsciiValue {
            index,
            token: token.into(),
        }
    }

    /// `true` для ошибок, связанных с формой блока, а не с транспортом.
    pub fn is_decode_error(&self) -> bool {
        !matches!(self, TraceError::Io(_))
    }
}
