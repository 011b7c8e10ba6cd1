//! Sensor observation: the validated 24-channel snapshot.
//!
//! The constructors are the sensor validator. An `Observation` can only be
//! built through them, so every instance downstream is already length-checked
//! and finite. Immutable once validated.

use serde::Serialize;

use crate::error::AnalysisError;

/// Number of sensor/operational readings in one snapshot.
///
/// 21 sensor channels plus 3 operational settings, matching the turbofan
/// telemetry frame this system was built around.
pub const SENSOR_CHANNELS: usize = 24;

/// A validated, immutable snapshot of 24 finite readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation([f64; SENSOR_CHANNELS]);

impl Observation {
    /// Validate a numeric sequence into an observation.
    ///
    /// Fails with `InvalidInput` if the length is not exactly 24 or any
    /// value is NaN/Inf.
    pub fn from_slice(values: &[f64]) -> Result<Self, AnalysisError> {
        if values.len() != SENSOR_CHANNELS {
            return Err(AnalysisError::InvalidInput(format!(
                "expected {} readings, got {}",
                SENSOR_CHANNELS,
                values.len()
            )));
        }
        let mut readings = [0.0_f64; SENSOR_CHANNELS];
        for (i, &v) in values.iter().enumerate() {
            if !v.is_finite() {
                return Err(AnalysisError::InvalidInput(format!(
                    "reading {} is not finite ({})",
                    i, v
                )));
            }
            readings[i] = v;
        }
        Ok(Self(readings))
    }

    /// Parse a comma/whitespace-delimited string of 24 readings.
    ///
    /// Accepts the delimited form produced by sensor loggers; any
    /// non-numeric token fails validation.
    pub fn parse(raw: &str) -> Result<Self, AnalysisError> {
        let values: Vec<f64> = raw
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<f64>().map_err(|_| {
                    AnalysisError::InvalidInput(format!("non-numeric reading: '{}'", s))
                })
            })
            .collect::<Result<_, _>>()?;
        Self::from_slice(&values)
    }

    /// The validated readings.
    pub fn readings(&self) -> &[f64; SENSOR_CHANNELS] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_observation() {
        let values: Vec<f64> = (0..24).map(|i| i as f64 * 0.5).collect();
        let obs = Observation::from_slice(&values).expect("valid");
        assert_eq!(obs.readings().len(), 24);
        assert_eq!(obs.readings()[2], 1.0);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let short = vec![1.0; 23];
        let long = vec![1.0; 25];
        assert!(matches!(
            Observation::from_slice(&short),
            Err(AnalysisError::InvalidInput(_))
        ));
        assert!(matches!(
            Observation::from_slice(&long),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut values = vec![1.0; 24];
        values[7] = f64::NAN;
        assert!(Observation::from_slice(&values).is_err());
        values[7] = f64::INFINITY;
        assert!(Observation::from_slice(&values).is_err());
    }

    #[test]
    fn test_parse_delimited() {
        let raw = (0..24)
            .map(|i| format!("{:.1}", i as f64))
            .collect::<Vec<_>>()
            .join(",");
        let obs = Observation::parse(&raw).expect("parses");
        assert_eq!(obs.readings()[23], 23.0);

        assert!(Observation::parse("1.0, 2.0, bogus").is_err());
    }

    #[test]
    fn test_all_zero_is_valid() {
        let obs = Observation::from_slice(&[0.0; 24]).expect("zeros are finite");
        assert!(obs.readings().iter().all(|&v| v == 0.0));
    }
}
