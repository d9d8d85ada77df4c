/// Вид ответа прибора
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFormat {
    /// IEEE-488.2 двоичный блок, начинается с `#`
    Binary,
    /// Список десятичных чисел через запятую
    Ascii,
}

/// Разобранный заголовок блока данных
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Формат блока
    pub format: BlockFormat,
    /// Объявленная длина полезной нагрузки в байтах (0 = неизвестна)
    pub declared_len: usize,
    /// Сколько байт занимает сам заголовок (`#`, счётчик цифр, цифры)
    pub header_len: usize,
}

impl BlockHeader {
    /// Заголовок ASCII ответа: нагрузка начинается с нулевого байта.
    pub fn ascii() -> Self {
        Self {
            format: BlockFormat::Ascii,
            declared_len: 0,
            header_len: 0,
        }
    }

    pub fn binary(
        declared_len: usize,
        header_len: usize,
    ) -> Self {
        Self {
            format: BlockFormat::Binary,
            declared_len,
            header_len,
        }
    }

    pub fn is_binary(&self) -> bool {
        self.format == BlockFormat::Binary
    }

    /// Двоичный блок без объявленной длины (`#0`): читается до конца сообщения.
    pub fn is_unknown_length(&self) -> bool {
        self.is_binary() && self.declared_len == 0
    }

    /// Полный размер блока в байтах, если длина известна.
    pub fn total_len(&self) -> Option<usize> {
        if self.is_binary() && self.declared_len > 0 {
            Some(self.header_len + self.declared_len)
        } else {
            None
        }
    }
}
