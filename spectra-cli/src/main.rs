use std::{fs::File, io::BufWriter, path::PathBuf};

use clap::{Parser, Subcommand};
use log::{error, info, LevelFilter};
use spectra_cli::{
    parse_count, run_decode, run_simulate, CliResult, DecodeConfig, DecodeSummary, OutputFormat,
    SimEncoding, SimulateConfig, TraceKind,
};
use spectra_types::ByteOrder;

#[derive(Parser, Debug)]
#[command(
    name = "spectra",
    version = env!("CARGO_PKG_VERSION"),
    about = "Decode spectrum analyzer trace responses (IEEE-488.2 blocks or ASCII lists)",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Тихий режим (только ошибки)
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Подробный лог (заголовки блоков, перестановка байт)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Декодировать захваченный ответ прибора
    Decode {
        /// Файл с сырым ответом
        input: PathBuf,
        /// Ответ содержит I/Q данные
        #[arg(long)]
        iq: bool,
        /// Ёмкость выходного буфера (1001, 32k, 512Ki)
        #[arg(short, long, default_value = "1Mi")]
        capacity: String,
        /// Порядок байт прибора: normal, swapped
        #[arg(short, long, default_value = "swapped")]
        byte_order: String,
        /// Формат вывода: table, csv
        #[arg(short, long, default_value = "table")]
        format: String,
        /// Файл для выборок (по умолчанию stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Записать синтетический ответ анализатора
    Simulate {
        /// Путь к выходному файлу
        #[arg(short, long, default_value = "response.bin")]
        output: PathBuf,
        /// Точек трассы или I/Q пар (1001, 32k, 512Ki)
        #[arg(short, long, default_value = "1001")]
        points: String,
        /// Сгенерировать I/Q данные вместо трассы
        #[arg(long)]
        iq: bool,
        /// Кодировка: real, real-var, real-indef, ascii
        #[arg(short, long, default_value = "real")]
        encoding: String,
        /// Порядок байт: normal, swapped
        #[arg(short, long, default_value = "swapped")]
        byte_order: String,
        /// Зерно генератора шума
        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

fn kind_from_flag(iq: bool) -> TraceKind {
    if iq {
        TraceKind::Iq
    } else {
        TraceKind::Trace
    }
}

fn or_exit<T>(
    flag: &str,
    value: Result<T, String>,
) -> T {
    match value {
        Ok(v) => v,
        Err(e) => {
            error!("{flag}: {e}");
            std::process::exit(1);
        }
    }
}

fn decode(config: DecodeConfig) -> CliResult<DecodeSummary> {
    match &config.output_path {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            run_decode(&config, &mut out)
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            run_decode(&config, &mut out)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp_secs()
        .init();

    match cli.command {
        Command::Decode {
            input,
            iq,
            capacity,
            byte_order,
            format,
            output,
        } => {
            let config = DecodeConfig {
                input_path: input,
                output_path: output,
                kind: kind_from_flag(iq),
                capacity: or_exit("--capacity", parse_count(&capacity)),
                byte_order: or_exit("--byte-order", byte_order.parse::<ByteOrder>()),
                format: or_exit("--format", format.parse::<OutputFormat>()),
            };

            match decode(config) {
                Ok(summary) => info!("\n{summary}"),
                Err(e) => {
                    error!("Decoding failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Command::Simulate {
            output,
            points,
            iq,
            encoding,
            byte_order,
            seed,
        } => {
            let config = SimulateConfig {
                output_path: output,
                kind: kind_from_flag(iq),
                points: or_exit("--points", parse_count(&points)),
                encoding: or_exit("--encoding", encoding.parse::<SimEncoding>()),
                byte_order: or_exit("--byte-order", byte_order.parse::<ByteOrder>()),
                seed,
            };

            if let Err(e) = run_simulate(&config) {
                error!("Simulation failed: {e}");
                std::process::exit(1);
            }

            info!("✓ Response written: {:?}", config.output_path);
        }
    }
}
