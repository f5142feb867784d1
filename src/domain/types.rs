use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Joules per kilowatt-hour.
pub const JOULES_PER_KWH: f64 = 3_600_000.0;

// ============================================================================
// Physical Unit Newtypes
// ============================================================================

/// Power in Watts (W)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Power(pub f64);

impl Power {
    pub const ZERO: Self = Self(0.0);

    pub fn watts(w: f64) -> Self {
        Self(w)
    }

    pub fn kilowatts(kw: f64) -> Self {
        Self(kw * 1000.0)
    }

    pub fn as_watts(&self) -> f64 {
        self.0
    }

    pub fn as_kilowatts(&self) -> f64 {
        self.0 / 1000.0
    }

    /// Energy delivered by this power held constant for `elapsed_seconds`.
    ///
    /// `W · s = J`, and `1 kWh = 3.6e6 J`.
    pub fn energy_over(&self, elapsed_seconds: f64) -> Energy {
        Energy::kilowatt_hours(self.0 * elapsed_seconds / JOULES_PER_KWH)
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.abs() >= 1000.0 {
            write!(f, "{:.2} kW", self.as_kilowatts())
        } else {
            write!(f, "{:.1} W", self.0)
        }
    }
}

/// Energy in kilowatt-hours (kWh)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Energy(pub f64);

impl Energy {
    pub const ZERO: Self = Self(0.0);

    pub fn kilowatt_hours(kwh: f64) -> Self {
        Self(kwh)
    }

    pub fn watt_hours(wh: f64) -> Self {
        Self(wh / 1000.0)
    }

    pub fn as_kilowatt_hours(&self) -> f64 {
        self.0
    }

    pub fn as_watt_hours(&self) -> f64 {
        self.0 * 1000.0
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.abs() >= 1.0 {
            write!(f, "{:.3} kWh", self.0)
        } else {
            write!(f, "{:.1} Wh", self.as_watt_hours())
        }
    }
}

impl Add for Energy {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Energy {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Solar irradiance on the panel plane in W/m²
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Irradiance(pub f64);

impl Irradiance {
    pub const ZERO: Self = Self(0.0);

    pub fn watts_per_m2(w: f64) -> Self {
        Self(w)
    }

    pub fn as_watts_per_m2(&self) -> f64 {
        self.0
    }

    /// Scale by a dimensionless factor.
    pub fn scaled(&self, factor: f64) -> Self {
        Self(self.0 * factor)
    }
}

impl fmt::Display for Irradiance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} W/m²", self.0)
    }
}

/// Mass of emitted CO2 in grams
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct CarbonMass(pub f64);

impl CarbonMass {
    pub fn grams(g: f64) -> Self {
        Self(g)
    }

    pub fn as_grams(&self) -> f64 {
        self.0
    }

    pub fn as_kilograms(&self) -> f64 {
        self.0 / 1000.0
    }
}

impl fmt::Display for CarbonMass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.abs() >= 1000.0 {
            write!(f, "{:.2} kgCO2", self.as_kilograms())
        } else {
            write!(f, "{:.1} gCO2", self.0)
        }
    }
}

/// Volume of consumed water in liters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct WaterVolume(pub f64);

impl WaterVolume {
    pub fn liters(l: f64) -> Self {
        Self(l)
    }

    pub fn as_liters(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for WaterVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} L", self.0)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_conversions() {
        let power = Power::kilowatts(5.0);
        assert_eq!(power.as_watts(), 5000.0);
        assert_eq!(power.as_kilowatts(), 5.0);

        let power2 = Power::watts(2500.0);
        assert_eq!(power2.as_kilowatts(), 2.5);
    }

    #[test]
    fn test_power_display() {
        assert_eq!(format!("{}", Power::watts(500.0)), "500.0 W");
        assert_eq!(format!("{}", Power::kilowatts(5.5)), "5.50 kW");
    }

    #[test]
    fn test_energy_over_one_hour() {
        // 1296 W for an hour is 1.296 kWh
        let energy = Power::watts(1296.0).energy_over(3600.0);
        assert!((energy.as_kilowatt_hours() - 1.296).abs() < 1e-12);
    }

    #[test]
    fn test_energy_over_zero_seconds() {
        assert_eq!(Power::kilowatts(2.0).energy_over(0.0), Energy::ZERO);
    }

    #[test]
    fn test_energy_conversions() {
        let energy = Energy::kilowatt_hours(10.0);
        assert_eq!(energy.as_watt_hours(), 10000.0);

        let energy2 = Energy::watt_hours(5000.0);
        assert_eq!(energy2.as_kilowatt_hours(), 5.0);
    }

    #[test]
    fn test_energy_arithmetic() {
        let e = Energy::kilowatt_hours(10.0) + Energy::kilowatt_hours(3.0);
        assert_eq!(e.as_kilowatt_hours(), 13.0);
        assert_eq!((e - Energy::kilowatt_hours(6.0)).as_kilowatt_hours(), 7.0);
    }

    #[test]
    fn test_carbon_display() {
        assert_eq!(format!("{}", CarbonMass::grams(100.0)), "100.0 gCO2");
        assert_eq!(format!("{}", CarbonMass::grams(2500.0)), "2.50 kgCO2");
    }

    #[test]
    fn test_serialization() {
        let energy = Energy::kilowatt_hours(10.0);
        let json = serde_json::to_string(&energy).unwrap();
        let deserialized: Energy = serde_json::from_str(&json).unwrap();
        assert_eq!(energy, deserialized);
    }
}
