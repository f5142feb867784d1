//! Simulation clock abstraction for clock-driven accounting.

/// Source of the current simulated time, in seconds since simulation start
pub trait SimulationClock {
    fn now_seconds(&self) -> f64;
}

/// Manually advanced clock, standing in for a discrete-event simulator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualClock {
    now_seconds: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now_seconds: f64) -> Self {
        Self { now_seconds }
    }

    /// Move the clock forward (or backward, for out-of-order tests)
    pub fn advance(&mut self, seconds: f64) {
        self.now_seconds += seconds;
    }

    pub fn set(&mut self, now_seconds: f64) {
        self.now_seconds = now_seconds;
    }
}

impl SimulationClock for ManualClock {
    fn now_seconds(&self) -> f64 {
        self.now_seconds
    }
}

impl<C: SimulationClock + ?Sized> SimulationClock for &C {
    fn now_seconds(&self) -> f64 {
        (**self).now_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let mut clock = ManualClock::new();
        clock.advance(60.0);
        clock.advance(30.0);
        assert_eq!(clock.now_seconds(), 90.0);
        clock.set(10.0);
        assert_eq!(clock.now_seconds(), 10.0);
    }
}
