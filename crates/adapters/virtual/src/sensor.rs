//! Deterministic simulated sensor readings.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use growhub_app::ports::SensorReader;
use growhub_domain::device::Device;
use growhub_domain::error::GrowHubError;
use growhub_domain::snapshot::SensorSnapshot;

/// Period of the triangle wave driving the drift, in read calls.
const DRIFT_PERIOD: u64 = 24;

/// Sensor reader that synthesizes plausible readings without hardware.
///
/// Values follow a triangle wave around a fixed baseline so consecutive
/// ticks drift smoothly instead of jumping. Each device gets a phase offset
/// derived from its external id, so zones never move in lockstep. The
/// sequence is fully deterministic: two readers built the same way produce
/// identical series.
#[derive(Debug, Default)]
pub struct SimulatedSensorReader {
    reads: AtomicU64,
}

impl SimulatedSensorReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Triangle wave in `[-1, 1]`.
    fn drift(step: u64) -> f64 {
        let pos = step % DRIFT_PERIOD;
        let half = DRIFT_PERIOD / 2;
        if pos < half {
            (pos as f64) / (half as f64) * 2.0 - 1.0
        } else {
            1.0 - ((pos - half) as f64) / (half as f64) * 2.0
        }
    }

    fn phase_offset(device: &Device) -> u64 {
        device
            .external_id
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_add(u64::from(b)))
    }

    fn synthesize(&self, device: &Device) -> SensorSnapshot {
        let step = self.reads.fetch_add(1, Ordering::Relaxed) + Self::phase_offset(device);
        let drift = Self::drift(step);
        SensorSnapshot {
            temperature: Some(23.0 + drift * 4.0),
            humidity: Some(55.0 + drift * 10.0),
            light: Some(450.0 + drift * 250.0),
            moisture: Some(45.0 + drift * 20.0),
            water_level: Some(60.0 + drift * 25.0),
            ec: Some(1.8 + drift * 0.4),
            ppm: Some(1100.0 + drift * 200.0),
            ..SensorSnapshot::empty(device.id)
        }
    }
}

impl SensorReader for SimulatedSensorReader {
    fn read(
        &self,
        device: &Device,
    ) -> impl Future<Output = Result<SensorSnapshot, GrowHubError>> + Send {
        let snapshot = self.synthesize(device);
        tracing::debug!(
            device_id = %snapshot.device_id,
            moisture = snapshot.moisture,
            water_level = snapshot.water_level,
            "simulated reading"
        );
        async { Ok(snapshot) }
    }
}
