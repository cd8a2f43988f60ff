//! Counter settings.

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// Where the counting line sits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DividerPosition {
    /// Fraction of the frame height, measured from the top.
    Fraction(f32),
    /// Absolute row in frame coordinates.
    Row(f32),
}

impl Default for DividerPosition {
    fn default() -> Self {
        Self::Fraction(2.0 / 3.0)
    }
}

impl DividerPosition {
    /// Resolve to a row for a frame `frame_height` pixels tall.
    pub fn resolve(&self, frame_height: u32) -> f32 {
        match *self {
            Self::Fraction(fraction) => frame_height as f32 * fraction,
            Self::Row(row) => row,
        }
    }
}

/// Frame dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Configuration for the VehicleCounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Frames a vehicle may go unmatched before it is dropped
    pub staleness_limit: u32,
    pub divider: DividerPosition,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            staleness_limit: 7,
            divider: DividerPosition::default(),
        }
    }
}

impl CounterConfig {
    /// Derive the staleness limit from a wall-clock timeout.
    pub fn from_timeout(timeout_secs: f32, frame_rate: f32) -> Self {
        let staleness_limit = (timeout_secs * frame_rate).round().max(1.0) as u32;
        Self {
            staleness_limit,
            ..Self::default()
        }
    }

    /// Parse a TOML document; missing keys keep their defaults.
    ///
    /// ```toml
    /// staleness_limit = 7
    /// divider = { fraction = 0.5 }
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self, TrackerError> {
        let config: Self =
            toml::from_str(contents).map_err(|err| TrackerError::ConfigParse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_staleness_limit(mut self, staleness_limit: u32) -> Self {
        self.staleness_limit = staleness_limit;
        self
    }

    pub fn with_divider(mut self, divider: DividerPosition) -> Self {
        self.divider = divider;
        self
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.staleness_limit == 0 {
            return Err(TrackerError::InvalidConfig(
                "staleness_limit must be at least 1".to_string(),
            ));
        }
        match self.divider {
            DividerPosition::Fraction(fraction) if !(0.0..=1.0).contains(&fraction) => {
                Err(TrackerError::InvalidConfig(format!(
                    "divider fraction {} is outside [0, 1]",
                    fraction
                )))
            }
            DividerPosition::Row(row) if !row.is_finite() => Err(TrackerError::InvalidConfig(
                format!("divider row {} is not finite", row),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CounterConfig::default();
        assert_eq!(config.staleness_limit, 7);
        assert!((config.divider.resolve(300) - 200.0).abs() < 1e-3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_timeout() {
        assert_eq!(CounterConfig::from_timeout(1.2, 30.0).staleness_limit, 36);
        assert_eq!(CounterConfig::from_timeout(0.0, 30.0).staleness_limit, 1);
    }

    #[test]
    fn test_from_toml() {
        let config = CounterConfig::from_toml_str("staleness_limit = 12\ndivider = { row = 90.0 }\n")
            .unwrap();
        assert_eq!(config.staleness_limit, 12);
        assert_eq!(config.divider, DividerPosition::Row(90.0));
        assert_eq!(config.divider.resolve(480), 90.0);

        let config = CounterConfig::from_toml_str("").unwrap();
        assert_eq!(config, CounterConfig::default());

        let config = CounterConfig::from_toml_str("divider = { fraction = 0.5 }").unwrap();
        assert_eq!(config.divider.resolve(480), 240.0);
    }

    #[test]
    fn test_toml_errors() {
        assert!(matches!(
            CounterConfig::from_toml_str("staleness_limit = \"soon\""),
            Err(TrackerError::ConfigParse(_))
        ));
        assert!(matches!(
            CounterConfig::from_toml_str("staleness_limit = 0"),
            Err(TrackerError::InvalidConfig(_))
        ));
        assert!(matches!(
            CounterConfig::from_toml_str("divider = { fraction = 1.5 }"),
            Err(TrackerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = CounterConfig::default()
            .with_staleness_limit(9)
            .with_divider(DividerPosition::Row(120.0));
        let text = toml::to_string(&config).unwrap();
        assert_eq!(CounterConfig::from_toml_str(&text).unwrap(), config);
    }
}
