//! Countdown duration settings and input validation

use std::time::Duration;

use serde_json::Value;

use super::error::CountdownError;

/// Largest accepted value for either field
pub const MAX_FIELD: u8 = 59;

/// A validated minutes/seconds pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownSettings {
    minutes: u8,
    seconds: u8,
}

impl CountdownSettings {
    /// Validate a minutes/seconds pair, both must be in `0..=59`
    pub fn new(minutes: u8, seconds: u8) -> Result<Self, CountdownError> {
        check_range("minutes", i64::from(minutes))?;
        check_range("seconds", i64::from(seconds))?;
        Ok(Self { minutes, seconds })
    }

    /// Validate raw form input, accepting integers or numeric text
    pub fn from_input(minutes: &Value, seconds: &Value) -> Result<Self, CountdownError> {
        Ok(Self {
            minutes: parse_field("minutes", minutes)?,
            seconds: parse_field("seconds", seconds)?,
        })
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.minutes) * 60 + u64::from(self.seconds))
    }
}

impl Default for CountdownSettings {
    fn default() -> Self {
        Self {
            minutes: 25,
            seconds: 0,
        }
    }
}

fn parse_field(field: &'static str, value: &Value) -> Result<u8, CountdownError> {
    let not_integer = |shown: String| CountdownError::invalid_configuration(field, format!("{} is not an integer", shown));

    let number = match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| not_integer(n.to_string()))?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(CountdownError::invalid_configuration(field, "is required"));
            }
            trimmed.parse::<f64>().map_err(|_| not_integer(format!("{:?}", s)))?
        }
        Value::Null => return Err(CountdownError::invalid_configuration(field, "is required")),
        other => return Err(not_integer(other.to_string())),
    };

    // Integral values written with a fraction ("2.0") count as integers
    if !number.is_finite() || number.fract() != 0.0 {
        return Err(not_integer(value.to_string()));
    }

    let number = number as i64;
    check_range(field, number)?;
    Ok(number as u8)
}

fn check_range(field: &'static str, value: i64) -> Result<(), CountdownError> {
    if (0..=i64::from(MAX_FIELD)).contains(&value) {
        Ok(())
    } else {
        Err(CountdownError::invalid_configuration(
            field,
            format!("{} is outside 0..={}", value, MAX_FIELD),
        ))
    }
}
