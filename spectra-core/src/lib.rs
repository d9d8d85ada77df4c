//! Декодер блоков трасс анализатора спектра
//!
//! Преобразует ответы прибора на запросы трасс (двоичные блоки IEEE-488.2
//! `REAL,32` или ASCII списки) в выборки `f64` и I/Q пары.
//!
//! # Быстрый старт
//!
//! ```
//! use spectra_core::{decode_block, encode_real32_block, HeaderStyle};
//! use spectra_types::ByteOrder;
//!
//! let raw = encode_real32_block(&[-80.0, -75.5], ByteOrder::Swapped, HeaderStyle::Definite);
//! let trace = decode_block(raw.into(), 1024)?;
//!
//! assert_eq!(trace.samples, vec![-80.0, -75.5]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod ascii;
pub mod binary;
pub mod decoder;
pub mod encoder;
pub mod format;
pub mod reader;
pub mod sim;
pub mod transport;

pub use ascii::*;
pub use decoder::*;
pub use encoder::*;
pub use format::*;
pub use reader::*;
pub use sim::*;
pub use transport::*;

/// Версия библиотеки.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
