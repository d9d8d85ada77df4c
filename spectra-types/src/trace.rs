/// Декодированная трасса
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedTrace {
    /// Выборки, не больше запрошенной ёмкости
    pub samples: Vec<f64>,
    /// Сколько выборок было в ответе прибора (может быть больше `samples.len()`)
    pub actual_count: usize,
}

/// Декодированные I/Q данные
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedIq {
    /// Синфазная составляющая
    pub i: Vec<f64>,
    /// Квадратурная составляющая
    pub q: Vec<f64>,
    /// Сколько I/Q пар было в ответе прибора
    pub actual_pair_count: usize,
}

impl DecodedTrace {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `true`, если часть выборок отброшена из-за ёмкости.
    pub fn is_truncated(&self) -> bool {
        self.actual_count > self.samples.len()
    }

    /// Количество отброшенных выборок.
    pub fn discarded(&self) -> usize {
        self.actual_count.saturating_sub(self.samples.len())
    }
}

impl DecodedIq {
    /// Количество возвращённых пар.
    pub fn len(&self) -> usize {
        self.i.len()
    }

    pub fn is_empty(&self) -> bool {
        self.i.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.actual_pair_count > self.i.len()
    }

    pub fn discarded(&self) -> usize {
        self.actual_pair_count.saturating_sub(self.i.len())
    }

    /// Итератор по парам `(i, q)`.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.i.iter().copied().zip(self.q.iter().copied())
    }
}
