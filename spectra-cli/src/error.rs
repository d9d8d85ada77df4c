use thiserror::Error;

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Ошибка чтения/записи файлов
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка декодирования ответа прибора
    #[error("Trace error: {0}")]
    Trace(#[from] spectra_types::TraceError),

    /// Некорректные параметры командной строки
    #[error("Config error: {0}")]
    Config(String),
}
