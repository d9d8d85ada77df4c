use std::{
    fs::File,
    io::{BufWriter, Write},
    time::Instant,
};

use log::{debug, info, warn};
use spectra_core::{IoTransport, SimulatedAnalyzer, TraceReader};

use crate::{
    output::{write_iq, write_trace},
    CliError, CliResult, DecodeConfig, DecodeSummary, SimulateConfig, TraceKind,
};

/// Декодирует захваченный ответ прибора и пишет выборки в `out`.
pub fn run_decode<W: Write + ?Sized>(
    config: &DecodeConfig,
    out: &mut W,
) -> CliResult<DecodeSummary> {
    let started = Instant::now();
    let file = File::open(&config.input_path)?;
    let mut reader = TraceReader::new(IoTransport::new(file), config.byte_order);

    debug!(
        "decoding {:?} as {} (byte order {}, capacity {})",
        config.input_path, config.kind, config.byte_order, config.capacity
    );

    let (returned, actual) = match config.kind {
        TraceKind::Trace => {
            let trace = reader.read_trace(config.capacity)?;
            write_trace(out, &trace, config.format)?;
            (trace.len(), trace.actual_count)
        }
        TraceKind::Iq => {
            let iq = reader.read_iq(config.capacity)?;
            write_iq(out, &iq, config.format)?;
            (iq.len(), iq.actual_pair_count)
        }
    };

    if returned < actual {
        warn!(
            "{} of {actual} values discarded, raise --capacity to keep them",
            actual - returned
        );
    }

    Ok(DecodeSummary::new(
        config.kind,
        returned,
        actual,
        reader.stats(),
        &started,
    ))
}

/// Пишет синтетический ответ анализатора в файл. Возвращает число байт.
pub fn run_simulate(config: &SimulateConfig) -> CliResult<usize> {
    if config.points == 0 {
        return Err(CliError::Config("--points must be greater than 0".to_string()));
    }

    let mut sim = SimulatedAnalyzer::new(config.points, config.seed);
    sim.byte_order = config.byte_order;

    let response = match (config.kind, config.encoding.header_style()) {
        (TraceKind::Trace, Some(style)) => sim.trace_response(style),
        (TraceKind::Trace, None) => sim.trace_ascii_response(),
        (TraceKind::Iq, Some(style)) => sim.iq_response(config.points, style),
        (TraceKind::Iq, None) => {
            return Err(CliError::Config(
                "I/Q data is only transferred as REAL,32 blocks".to_string(),
            ))
        }
    };

    let mut writer = BufWriter::new(File::create(&config.output_path)?);
    writer.write_all(&response)?;
    writer.flush()?;

    info!(
        "wrote {} {} response ({} bytes) to {:?}",
        config.encoding,
        config.kind,
        response.len(),
        config.output_path
    );

    Ok(response.len())
}
