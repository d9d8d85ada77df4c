// Симулятор анализатора: отдаёт ответы в том же виде, что и прибор, чтобы
// декодер, CLI и бенчмарки работали без железа.
// Трасса: шумовая полка плюс лоренцев пик в центре полосы.
// I/Q: комплексная синусоида, разложенная по блокам передачи.

use std::f32::consts::PI;

use rand::{rngs::StdRng, Rng, SeedableRng};
use spectra_types::ByteOrder;

use crate::{encode_ascii_list, encode_real32_block, interleave_iq_blocks, HeaderStyle};

/// Генерирует синтетические ответы анализатора спектра.
pub struct SimulatedAnalyzer {
    pub byte_order: ByteOrder,
    /// Точек трассы (`SWEep:POINts`)
    pub sweep_points: usize,
    /// Уровень шумовой полки, дБм
    pub noise_floor_dbm: f32,
    /// Размах шума, дБ
    pub noise_span_db: f32,
    /// Уровень пика, дБм
    pub peak_dbm: f32,
    /// Частота дискретизации I/Q, Гц
    pub sample_rate_hz: f32,
    /// Частота тона I/Q относительно центра, Гц
    pub tone_freq_hz: f32,
    rng: StdRng,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl SimulatedAnalyzer {
    pub fn new(
        sweep_points: usize,
        seed: u64,
    ) -> Self {
        Self {
            byte_order: ByteOrder::default(),
            sweep_points,
            noise_floor_dbm: -90.0,
            noise_span_db: 3.0,
            peak_dbm: -20.0,
            sample_rate_hz: 1_000_000.0,
            tone_freq_hz: 10_000.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Уровни трассы в дБм.
    pub fn trace_levels(&mut self) -> Vec<f32> {
        let n = self.sweep_points;
        let center = n as f32 / 2.0;
        let width = (n as f32 / 100.0).max(1.0);
        let half_span = self.noise_span_db / 2.0;

        (0..n)
            .map(|k| {
                let noise = if half_span > 0.0 {
                    self.rng.gen_range(-half_span..half_span)
                } else {
                    0.0
                };
                let x = (k as f32 - center) / width;
                let peak = (self.peak_dbm - self.noise_floor_dbm) / (1.0 + x * x);

                self.noise_floor_dbm + peak + noise
            })
            .collect()
    }

    /// Ответ на `TRACe:DATA?` в двоичном виде.
    pub fn trace_response(
        &mut self,
        style: HeaderStyle,
    ) -> Vec<u8> {
        let levels = self.trace_levels();
        encode_real32_block(&levels, self.byte_order, style)
    }

    /// Ответ на `TRACe:DATA?` после `FORMat ASCii`.
    pub fn trace_ascii_response(&mut self) -> Vec<u8> {
        let levels: Vec<f64> = self.trace_levels().into_iter().map(f64::from).collect();
        encode_ascii_list(&levels)
    }

    /// Комплексный тон: `(I, Q)` длиной `count`.
    pub fn iq_samples(
        &self,
        count: usize,
    ) -> (Vec<f32>, Vec<f32>) {
        let step = 2.0 * PI * self.tone_freq_hz / self.sample_rate_hz;

        (0..count)
            .map(|k| {
                let phase = step * k as f32;
                (phase.cos(), phase.sin())
            })
            .unzip()
    }

    /// Ответ на `TRACe:IQ:DATA?` с раскладкой по блокам передачи.
    pub fn iq_response(
        &self,
        count: usize,
        style: HeaderStyle,
    ) -> Vec<u8> {
        let (i, q) = self.iq_samples(count);
        let flat = interleave_iq_blocks(&i, &q);

        encode_real32_block(&flat, self.byte_order, style)
    }
}

impl Default for SimulatedAnalyzer {
    fn default() -> Self {
        Self::new(1_001, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_block, decode_interleaved_iq};

    #[test]
    fn test_trace_has_peak_in_center() {
        let mut sim = SimulatedAnalyzer::new(1_001, 7);
        let levels = sim.trace_levels();

        assert_eq!(levels.len(), 1_001);

        let (argmax, max) = levels
            .iter()
            .enumerate()
            .fold((0, f32::MIN), |acc, (k, &v)| if v > acc.1 { (k, v) } else { acc });

        assert!((argmax as i64 - 500).abs() <= 2, "peak at {argmax}");
        assert!(max > -25.0, "peak level {max}");
        assert!(levels[0] < -85.0, "noise floor {}", levels[0]);
    }

    #[test]
    fn test_same_seed_same_trace() {
        let a = SimulatedAnalyzer::new(64, 42).trace_levels();
        let b = SimulatedAnalyzer::new(64, 42).trace_levels();

        assert_eq!(a, b);
    }

    #[test]
    fn test_trace_response_decodes() {
        let mut sim = SimulatedAnalyzer::new(101, 1);
        let trace = decode_block(sim.trace_response(HeaderStyle::Definite).into(), 1_000).unwrap();

        assert_eq!(trace.actual_count, 101);

        let ascii = decode_block(sim.trace_ascii_response().into(), 1_000).unwrap();
        assert_eq!(ascii.actual_count, 101);
    }

    #[test]
    fn test_iq_response_decodes_to_unit_circle() {
        let sim = SimulatedAnalyzer::default();
        let raw = sim.iq_response(256, HeaderStyle::Definite);
        let iq = decode_interleaved_iq(raw.into(), 256).unwrap();

        assert_eq!(iq.len(), 256);
        assert_eq!(iq.i[0], 1.0);
        assert_eq!(iq.q[0], 0.0);

        for (i, q) in iq.pairs() {
            assert!((i * i + q * q - 1.0).abs() < 1e-5);
        }
    }
}
