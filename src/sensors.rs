//! Measurement sources for sensors running on a host.

use std::{
    io,
    path::{
        Path,
        PathBuf,
    },
};

use async_trait::async_trait;
use rand::{
    rngs::StdRng,
    Rng,
    SeedableRng,
};

use message::{
    Battery,
    Current,
    Temperature,
};
use runtime::{
    HardwareFault,
    Readings,
    SensorSource,
};

/// Reads a sysfs thermal zone (millidegrees Celsius) and a power-supply
/// capacity file (percent).
#[derive(Debug, Clone)]
pub struct SysfsSensors {
    thermal_zone: PathBuf,
    capacity:     PathBuf,
}

impl SysfsSensors {
    pub fn new(thermal_zone: PathBuf, capacity: PathBuf) -> Self {
        Self {
            thermal_zone,
            capacity,
        }
    }
}

async fn read_int(path: &Path) -> Result<i64, HardwareFault> {
    let raw = tokio::fs::read_to_string(path).await.map_err(HardwareFault::Bus)?;

    raw.trim().parse::<i64>().map_err(|e| {
        HardwareFault::Bus(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{}: {}", path.display(), e),
        ))
    })
}

#[async_trait]
impl SensorSource for SysfsSensors {
    #[tracing::instrument(skip(self), err)]
    async fn sample(&mut self) -> Result<Readings, HardwareFault> {
        let millidegrees = read_int(&self.thermal_zone).await?;
        let percent = read_int(&self.capacity).await?;

        let centi = (millidegrees / 10).clamp(i16::MIN as i64, i16::MAX as i64) as i16;

        Ok(Readings {
            temperature: Temperature::from_centi_celsius(centi),
            battery:     Battery::Percent(percent.clamp(0, 100) as u8),
            current:     None,
        })
    }
}

/// Bounded random walk around room temperature and a slowly draining cell.
#[derive(Debug)]
pub struct SimulatedSensors {
    rng:        StdRng,
    celsius:    f32,
    millivolts: u16,
    milliamps:  i16,
}

impl SimulatedSensors {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            celsius: 21.5,
            millivolts: 4100,
            milliamps: 45,
        }
    }
}

impl Default for SimulatedSensors {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SensorSource for SimulatedSensors {
    async fn sample(&mut self) -> Result<Readings, HardwareFault> {
        self.celsius = (self.celsius + self.rng.gen_range(-0.5..=0.5)).clamp(-20.0, 45.0);
        self.millivolts = self.millivolts.saturating_sub(self.rng.gen_range(0..=2)).max(3300);
        self.milliamps = (self.milliamps + self.rng.gen_range(-3..=3)).clamp(20, 80);

        Ok(Readings {
            temperature: Temperature::from_celsius(self.celsius),
            battery:     Battery::Millivolts(self.millivolts),
            current:     Some(Current::from_milliamps(self.milliamps)),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn reads_sysfs() {
        let dir = std::env::temp_dir().join(format!("loratel-sysfs-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();

        let zone = dir.join("temp");
        let capacity = dir.join("capacity");
        tokio::fs::write(&zone, "21537\n").await.unwrap();
        tokio::fs::write(&capacity, "104\n").await.unwrap();

        let readings = SysfsSensors::new(zone, capacity.clone()).sample().await.unwrap();
        assert_eq!(readings.temperature, Temperature::from_centi_celsius(2153));
        assert_eq!(readings.battery, Battery::Percent(100));

        tokio::fs::write(&capacity, "full\n").await.unwrap();
        let mut broken = SysfsSensors::new(dir.join("temp"), capacity);
        assert!(matches!(broken.sample().await, Err(HardwareFault::Bus(_))));

        let mut missing = SysfsSensors::new(dir.join("nope"), dir.join("nope"));
        assert!(matches!(missing.sample().await, Err(HardwareFault::Bus(_))));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn simulation_stays_in_bounds() {
        let mut sim = SimulatedSensors::from_rng(StdRng::seed_from_u64(7));

        for _ in 0..500 {
            let readings = sim.sample().await.unwrap();
            let celsius = readings.temperature.celsius();

            assert!((-20.0..=45.0).contains(&celsius));
            assert!(readings.battery.millivolts() >= 3300);
        }
    }
}
