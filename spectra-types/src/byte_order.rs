/// Порядок байт двоичных данных прибора (`FORMat:BORDer`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// `NORMal` — big-endian, старший байт первым
    Normal,
    /// `SWAPped` — little-endian, младший байт первым (заводская установка)
    #[default]
    Swapped,
}

impl ByteOrder {
    /// Короткая SCPI форма параметра.
    pub fn scpi_name(&self) -> &'static str {
        match self {
            ByteOrder::Normal => "NORM",
            ByteOrder::Swapped => "SWAP",
        }
    }

    pub fn is_big_endian(&self) -> bool {
        *self == ByteOrder::Normal
    }

    /// Порядок, обратный текущему
    pub fn reversed(&self) -> Self {
        match self {
            ByteOrder::Normal => ByteOrder::Swapped,
            ByteOrder::Swapped => ByteOrder::Normal,
        }
    }
}

impl std::fmt::Display for ByteOrder {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            ByteOrder::Normal => write!(f, "normal"),
            ByteOrder::Swapped => write!(f, "swapped"),
        }
    }
}

impl std::str::FromStr for ByteOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "norm" | "normal" | "be" | "big" => Ok(ByteOrder::Normal),
            "swap" | "swapped" | "le" | "little" => Ok(ByteOrder::Swapped),
            _ => Err(format!(
                "Unknown byte order '{s}'. Use: normal, swapped"
            )),
        }
    }
}
