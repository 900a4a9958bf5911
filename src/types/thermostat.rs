// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat status decoding.

use std::str::FromStr;

use serde::Serialize;

use crate::error::ParseError;

use super::SwitchState;

/// One thermostat reading: heat status, target and current temperature.
///
/// The controller reports all three in a single `"<on|off>/<target>/<current>"`
/// value. Temperatures are kept as the decimal strings the controller sent so
/// they can be echoed back unchanged; they are validated as numbers when
/// parsed and converted to `f32` by the accessors.
///
/// # Examples
///
/// ```
/// use bestin_lib::types::{SwitchState, ThermostatReading};
///
/// let reading: ThermostatReading = "on/22.5/21.0".parse().unwrap();
/// assert_eq!(reading.heat_status(), SwitchState::On);
/// assert_eq!(reading.target_temperature(), 22.5);
/// assert_eq!(reading.current_temperature(), 21.0);
/// assert_eq!(reading.target_temperature_raw(), "22.5");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThermostatReading {
    heat_status: SwitchState,
    target: String,
    current: String,
    #[serde(skip)]
    target_value: f32,
    #[serde(skip)]
    current_value: f32,
}

impl ThermostatReading {
    /// Number of `/`-separated parts in a thermostat status.
    pub const ARITY: usize = 3;

    /// Returns whether heating is switched on.
    #[must_use]
    pub fn heat_status(&self) -> SwitchState {
        self.heat_status
    }

    /// Returns the target temperature in degrees Celsius.
    #[must_use]
    pub fn target_temperature(&self) -> f32 {
        self.target_value
    }

    /// Returns the target temperature exactly as the controller reported it.
    #[must_use]
    pub fn target_temperature_raw(&self) -> &str {
        &self.target
    }

    /// Returns the sensed temperature in degrees Celsius.
    #[must_use]
    pub fn current_temperature(&self) -> f32 {
        self.current_value
    }

    /// Returns the sensed temperature exactly as the controller reported it.
    #[must_use]
    pub fn current_temperature_raw(&self) -> &str {
        &self.current
    }

    fn parse_temperature(field: &str, value: &str) -> Result<f32, ParseError> {
        match value.trim().parse::<f32>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(ParseError::UnexpectedFormat(format!(
                "thermostat {field} {value:?} is not a number"
            ))),
        }
    }
}

impl FromStr for ThermostatReading {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        let [heat_status, target, current] = parts.as_slice() else {
            return Err(ParseError::UnexpectedFormat(format!(
                "thermostat status {s:?} has {} parts, expected {}",
                parts.len(),
                Self::ARITY
            )));
        };

        let heat_status = heat_status.parse::<SwitchState>().map_err(|_| {
            ParseError::UnexpectedFormat(format!("thermostat status {s:?} has invalid heat state"))
        })?;

        Ok(Self {
            heat_status,
            target_value: Self::parse_temperature("target", target)?,
            current_value: Self::parse_temperature("temperature", current)?,
            target: (*target).to_string(),
            current: (*current).to_string(),
        })
    }
}
