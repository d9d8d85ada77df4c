use std::{io::Write, time::Instant};

use spectra_core::ReadStats;
use spectra_types::{DecodedIq, DecodedTrace};

use crate::{OutputFormat, TraceKind};

/// Итог декодирования для вывода в конце команды.
#[derive(Debug, Clone)]
pub struct DecodeSummary {
    pub kind: TraceKind,
    pub duration_secs: f64,
    /// Выборок (или пар) записано
    pub returned: usize,
    /// Выборок (или пар) было в ответе
    pub actual: usize,
    pub bytes_processed: u64,
}

impl DecodeSummary {
    pub fn new(
        kind: TraceKind,
        returned: usize,
        actual: usize,
        stats: &ReadStats,
        started: &Instant,
    ) -> Self {
        Self {
            kind,
            duration_secs: started.elapsed().as_secs_f64(),
            returned,
            actual,
            bytes_processed: stats.bytes_processed,
        }
    }

    pub fn discarded(&self) -> usize {
        self.actual.saturating_sub(self.returned)
    }
}

impl std::fmt::Display for DecodeSummary {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let unit = match self.kind {
            TraceKind::Trace => "samples",
            TraceKind::Iq => "pairs",
        };

        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(f, "  Data          : {}", self.kind)?;
        writeln!(f, "  Returned      : {} {unit}", self.returned)?;
        writeln!(f, "  In response   : {} {unit}", self.actual)?;
        writeln!(f, "  Discarded     : {} {unit}", self.discarded())?;
        writeln!(f, "  Bytes read    : {}", self.bytes_processed)?;
        writeln!(f, "  Duration      : {:.3}s", self.duration_secs)?;
        write!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")
    }
}

/// Пишет выборки трассы.
pub fn write_trace<W: Write + ?Sized>(
    out: &mut W,
    trace: &DecodedTrace,
    format: OutputFormat,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Table => {
            for (k, v) in trace.samples.iter().enumerate() {
                writeln!(out, "{k:>8}  {v:>14.6}")?;
            }
        }
        OutputFormat::Csv => {
            writeln!(out, "index,value")?;
            for (k, v) in trace.samples.iter().enumerate() {
                writeln!(out, "{k},{v}")?;
            }
        }
    }

    out.flush()
}

/// Пишет I/Q пары.
pub fn write_iq<W: Write + ?Sized>(
    out: &mut W,
    iq: &DecodedIq,
    format: OutputFormat,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Table => {
            for (k, (i, q)) in iq.pairs().enumerate() {
                writeln!(out, "{k:>8}  {i:>14.6}  {q:>14.6}")?;
            }
        }
        OutputFormat::Csv => {
            writeln!(out, "index,i,q")?;
            for (k, (i, q)) in iq.pairs().enumerate() {
                writeln!(out, "{k},{i},{q}")?;
            }
        }
    }

    out.flush()
}
