//! Преобразование двоичной нагрузки `REAL,32` с учётом порядка байт прибора.

pub mod read;
pub mod write;

pub use read::*;
pub use write::*;
