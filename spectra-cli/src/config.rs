use std::path::PathBuf;

use spectra_core::HeaderStyle;
use spectra_types::ByteOrder;

/// Что содержит ответ прибора.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceKind {
    /// Трасса (`TRACe:DATA?`)
    #[default]
    Trace,
    /// I/Q данные (`TRACe:IQ:DATA?`)
    Iq,
}

/// Формат вывода выборок.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Выровненная таблица для терминала
    #[default]
    Table,
    /// CSV с заголовком
    Csv,
}

/// Кодировка ответа, который пишет симулятор.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimEncoding {
    /// `REAL,32` с заголовком `#<n><len>`
    #[default]
    Real,
    /// `REAL,32` с заголовком `#(<len>)`
    RealVariable,
    /// `REAL,32` с заголовком `#0`
    RealIndefinite,
    /// `ASCii`
    Ascii,
}

/// Конфигурация команды `decode`.
#[derive(Debug, Clone)]
pub struct DecodeConfig {
    /// Файл с захваченным ответом прибора
    pub input_path: PathBuf,
    /// Куда писать выборки (None = stdout)
    pub output_path: Option<PathBuf>,
    /// Трасса или I/Q
    pub kind: TraceKind,
    /// Ёмкость выходного буфера (выборок или пар)
    pub capacity: usize,
    /// Порядок байт прибора
    pub byte_order: ByteOrder,
    /// Формат вывода
    pub format: OutputFormat,
}

/// Конфигурация команды `simulate`.
#[derive(Debug, Clone)]
pub struct SimulateConfig {
    /// Путь к выходному файлу
    pub output_path: PathBuf,
    /// Трасса или I/Q
    pub kind: TraceKind,
    /// Точек трассы или I/Q пар
    pub points: usize,
    /// Кодировка ответа
    pub encoding: SimEncoding,
    /// Порядок байт двоичных блоков
    pub byte_order: ByteOrder,
    /// Зерно генератора шума
    pub seed: u64,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl SimEncoding {
    /// Вид заголовка для двоичных кодировок.
    pub fn header_style(&self) -> Option<HeaderStyle> {
        match self {
            SimEncoding::Real => Some(HeaderStyle::Definite),
            SimEncoding::RealVariable => Some(HeaderStyle::Variable),
            SimEncoding::RealIndefinite => Some(HeaderStyle::Indefinite),
            SimEncoding::Ascii => None,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов
////////////////////////////////////////////////////////////////////////////////

impl std::fmt::Display for TraceKind {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            TraceKind::Trace => write!(f, "trace"),
            TraceKind::Iq => write!(f, "iq"),
        }
    }
}

impl std::str::FromStr for TraceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" | "trac" => Ok(TraceKind::Trace),
            "iq" | "i/q" => Ok(TraceKind::Iq),
            _ => Err(format!("Unknown data kind '{s}'. Use: trace, iq")),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown output format '{s}'. Use: table, csv")),
        }
    }
}

impl std::fmt::Display for SimEncoding {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            SimEncoding::Real => write!(f, "real"),
            SimEncoding::RealVariable => write!(f, "real-var"),
            SimEncoding::RealIndefinite => write!(f, "real-indef"),
            SimEncoding::Ascii => write!(f, "ascii"),
        }
    }
}

impl std::str::FromStr for SimEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "real" | "real32" => Ok(SimEncoding::Real),
            "real-var" | "variable" => Ok(SimEncoding::RealVariable),
            "real-indef" | "indefinite" => Ok(SimEncoding::RealIndefinite),
            "ascii" | "asc" => Ok(SimEncoding::Ascii),
            _ => Err(format!(
                "Unknown encoding '{s}'. Use: real, real-var, real-indef, ascii"
            )),
        }
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("response.bin"),
            output_path: None,
            kind: TraceKind::Trace,
            capacity: 1 << 20,
            byte_order: ByteOrder::Swapped,
            format: OutputFormat::Table,
        }
    }
}

impl Default for SimulateConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("response.bin"),
            kind: TraceKind::Trace,
            points: 1_001,
            encoding: SimEncoding::Real,
            byte_order: ByteOrder::Swapped,
            seed: 0,
        }
    }
}

/// Парсит количество выборок.
///
/// Поддерживает десятичные суффиксы `k`, `M` и двоичные `Ki`, `Mi`.
///
/// # Примеры
/// ```
/// use spectra_cli::config::parse_count;
/// assert_eq!(parse_count("1001").unwrap(), 1_001);
/// assert_eq!(parse_count("32k").unwrap(), 32_000);
/// assert_eq!(parse_count("512Ki").unwrap(), 524_288);
/// ```
pub fn parse_count(s: &str) -> Result<usize, String> {
    let s = s.trim();

    let (num_str, mult) = if let Some(v) = s.strip_suffix("Ki") {
        (v, 1_024)
    } else if let Some(v) = s.strip_suffix("Mi") {
        (v, 1_024 * 1_024)
    } else if let Some(v) = s.strip_suffix('k') {
        (v, 1_000)
    } else if let Some(v) = s.strip_suffix('M') {
        (v, 1_000_000)
    } else {
        (s, 1)
    };

    let n: usize = num_str
        .trim()
        .parse()
        .map_err(|e| format!("Invalid count '{s}': {e}"))?;

    n.checked_mul(mult)
        .ok_or_else(|| format!("Count '{s}' overflows usize"))
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
