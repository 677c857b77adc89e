//! Sensor Channels, Measurement Vectors and the Filter Bank
//!
//! Four calibrated scalar channels describe the converter's electrical
//! state: array (input) voltage and current, battery (output) voltage and
//! current. Calibration happens upstream; everything in this crate works in
//! physical units.
//!
//! The [`FilterBank`] owns one filter per channel and is the single point
//! where raw readings become the filtered measurement vector consumed by
//! the redline monitor and the MPPT strategies.

use crate::filter::{Filter, SampleFilter};

/// Identity of one measured quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SensorChannel {
    /// Photovoltaic array (input) voltage
    ArrayVoltage = 0,
    /// Photovoltaic array (input) current
    ArrayCurrent = 1,
    /// Battery (output) voltage
    BatteryVoltage = 2,
    /// Battery (output) current
    BatteryCurrent = 3,
}

impl SensorChannel {
    /// All channels, in wire/reporting order
    pub const ALL: [Self; 4] = [
        Self::ArrayVoltage,
        Self::ArrayCurrent,
        Self::BatteryVoltage,
        Self::BatteryCurrent,
    ];

    /// Human-readable name for logs and telemetry
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ArrayVoltage => "array_voltage",
            Self::ArrayCurrent => "array_current",
            Self::BatteryVoltage => "battery_voltage",
            Self::BatteryCurrent => "battery_current",
        }
    }

    /// Physical unit of the channel
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::ArrayVoltage | Self::BatteryVoltage => "V",
            Self::ArrayCurrent | Self::BatteryCurrent => "A",
        }
    }
}

/// One snapshot of all four channels, in physical units
///
/// Produced either raw (straight from the calibrated sensors) or filtered
/// (read back out of the [`FilterBank`]). The struct replaces the legacy
/// convention of passing the channels as an anonymous float array.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measurements {
    /// Photovoltaic array voltage, V
    pub array_voltage: f32,
    /// Photovoltaic array current, A
    pub array_current: f32,
    /// Battery voltage, V
    pub battery_voltage: f32,
    /// Battery current, A
    pub battery_current: f32,
}

impl Measurements {
    /// Snapshot from explicit channel values, in physical units
    pub const fn new(
        array_voltage: f32,
        array_current: f32,
        battery_voltage: f32,
        battery_current: f32,
    ) -> Self {
        Self {
            array_voltage,
            array_current,
            battery_voltage,
            battery_current,
        }
    }

    /// Value of a single channel
    pub fn get(&self, channel: SensorChannel) -> f32 {
        match channel {
            SensorChannel::ArrayVoltage => self.array_voltage,
            SensorChannel::ArrayCurrent => self.array_current,
            SensorChannel::BatteryVoltage => self.battery_voltage,
            SensorChannel::BatteryCurrent => self.battery_current,
        }
    }

    /// Instantaneous array power, W
    pub fn array_power(&self) -> f32 {
        self.array_voltage * self.array_current
    }
}

/// One filter per sensor channel
///
/// `N` is the window capacity shared by the windowed variants; each channel
/// may still use a different filter kind.
#[derive(Debug, Clone)]
pub struct FilterBank<const N: usize> {
    array_voltage: Filter<N>,
    array_current: Filter<N>,
    battery_voltage: Filter<N>,
    battery_current: Filter<N>,
}

impl<const N: usize> FilterBank<N> {
    /// Bank with an explicit filter per channel
    pub const fn new(
        array_voltage: Filter<N>,
        array_current: Filter<N>,
        battery_voltage: Filter<N>,
        battery_current: Filter<N>,
    ) -> Self {
        Self {
            array_voltage,
            array_current,
            battery_voltage,
            battery_current,
        }
    }

    /// Bank with four median filters, the stock configuration
    pub const fn medians() -> Self {
        Self::new(
            Filter::median(),
            Filter::median(),
            Filter::median(),
            Filter::median(),
        )
    }

    /// Push one raw snapshot through all four filters
    pub fn ingest(&mut self, raw: &Measurements) {
        self.array_voltage.add_sample(raw.array_voltage);
        self.array_current.add_sample(raw.array_current);
        self.battery_voltage.add_sample(raw.battery_voltage);
        self.battery_current.add_sample(raw.battery_current);
    }

    /// Read the filtered measurement vector
    pub fn snapshot(&self) -> Measurements {
        Measurements {
            array_voltage: self.array_voltage.value(),
            array_current: self.array_current.value(),
            battery_voltage: self.battery_voltage.value(),
            battery_current: self.battery_current.value(),
        }
    }

    /// Reset every filter to its construction-time state
    pub fn clear(&mut self) {
        self.array_voltage.clear();
        self.array_current.clear();
        self.battery_voltage.clear();
        self.battery_current.clear();
    }
}

impl<const N: usize> Default for FilterBank<N> {
    fn default() -> Self {
        Self::medians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_metadata() {
        assert_eq!(SensorChannel::ArrayVoltage.name(), "array_voltage");
        assert_eq!(SensorChannel::ArrayVoltage.unit(), "V");
        assert_eq!(SensorChannel::BatteryCurrent.unit(), "A");
        assert_eq!(SensorChannel::ALL.len(), 4);
    }

    #[test]
    fn measurements_by_channel() {
        let m = Measurements::new(61.0, 5.5, 96.0, 3.2);
        assert_eq!(m.get(SensorChannel::ArrayVoltage), 61.0);
        assert_eq!(m.get(SensorChannel::ArrayCurrent), 5.5);
        assert_eq!(m.get(SensorChannel::BatteryVoltage), 96.0);
        assert_eq!(m.get(SensorChannel::BatteryCurrent), 3.2);
        assert_eq!(m.array_power(), 61.0 * 5.5);
    }

    #[test]
    fn bank_snapshot_defined_before_any_ingest() {
        let bank = FilterBank::<10>::medians();
        let snap = bank.snapshot();
        assert_eq!(snap, Measurements::default());
    }

    #[test]
    fn bank_routes_channels_independently() {
        let mut bank = FilterBank::<10>::medians();
        for _ in 0..5 {
            bank.ingest(&Measurements::new(61.0, 5.5, 96.0, 3.2));
        }

        let snap = bank.snapshot();
        assert_eq!(snap.array_voltage, 61.0);
        assert_eq!(snap.array_current, 5.5);
        assert_eq!(snap.battery_voltage, 96.0);
        assert_eq!(snap.battery_current, 3.2);
    }

    #[test]
    fn clear_resets_all_channels() {
        let mut bank = FilterBank::<10>::medians();
        bank.ingest(&Measurements::new(61.0, 5.5, 96.0, 3.2));
        bank.clear();
        assert_eq!(bank.snapshot(), Measurements::default());
    }
}
