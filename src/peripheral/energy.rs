//! Energy storage peripheral.

use std::time::Duration;

use super::PeripheralError;

/// A snapshot of one energy store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnergyReading {
    /// Stored energy in FE.
    pub stored: u64,
    /// Capacity in FE.
    pub capacity: u64,
    /// Net flow in FE per tick; positive is charging.
    pub flow: i64,
}

impl EnergyReading {
    /// Fill fraction in 0..=1.
    pub fn fill(&self) -> f32 {
        if self.capacity == 0 {
            return 0.0;
        }
        (self.stored as f32 / self.capacity as f32).clamp(0.0, 1.0)
    }

    /// Time until full (charging) or empty (draining) at the current
    /// flow, `None` when the flow is zero. Assumes 20 ticks a second.
    pub fn time_to_limit(&self) -> Option<Duration> {
        if self.flow > 0 {
            let remaining = self.capacity.saturating_sub(self.stored);
            Some(Duration::from_secs_f64(
                remaining as f64 / (self.flow as f64 * 20.0),
            ))
        } else if self.flow < 0 {
            Some(Duration::from_secs_f64(
                self.stored as f64 / (self.flow.unsigned_abs() as f64 * 20.0),
            ))
        } else {
            None
        }
    }
}

/// An energy store on the bus (cell bank, cube, accumulator).
pub trait EnergyStorage {
    fn id(&self) -> &str;

    fn reading(&self) -> Result<EnergyReading, PeripheralError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill() {
        let r = EnergyReading {
            stored: 250,
            capacity: 1000,
            flow: 0,
        };
        assert!((r.fill() - 0.25).abs() < f32::EPSILON);

        let empty = EnergyReading::default();
        assert_eq!(empty.fill(), 0.0);
    }

    #[test]
    fn test_time_to_limit_charging() {
        // 1000 FE short, +10 FE/t = 200 FE/s -> 5s.
        let r = EnergyReading {
            stored: 1000,
            capacity: 2000,
            flow: 10,
        };
        let t = r.time_to_limit().unwrap();
        assert_eq!(t.as_secs(), 5);
    }

    #[test]
    fn test_time_to_limit_draining() {
        // 400 FE stored, -20 FE/t = 400 FE/s -> 1s.
        let r = EnergyReading {
            stored: 400,
            capacity: 2000,
            flow: -20,
        };
        assert_eq!(r.time_to_limit().unwrap().as_secs(), 1);
    }

    #[test]
    fn test_time_to_limit_idle() {
        let r = EnergyReading {
            stored: 400,
            capacity: 2000,
            flow: 0,
        };
        assert!(r.time_to_limit().is_none());
    }
}
