// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room state tracking.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::codec::StatusInfo;
use crate::error::ParseError;
use crate::types::{OutletStatus, SwitchState, ThermostatReading};

use super::StateChange;

/// Cached state of one room.
///
/// Light and outlet maps only ever grow: a unit appears once the controller
/// reports it and is updated by later reports, but never removed because a
/// later answer left it out. The thermostat reading is replaced as a whole,
/// so heat status, target and current temperature always come from the same
/// answer.
///
/// # Examples
///
/// ```
/// use bestin_lib::codec::StatusInfo;
/// use bestin_lib::state::{RoomState, StateChange};
///
/// let mut state = RoomState::new();
/// state.apply(&StateChange::Outlets(vec![StatusInfo::new("1", "eco/on")]));
///
/// assert!(state.is_outlet_on("1").unwrap());
/// assert!(state.heat_status().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoomState {
    lights: BTreeMap<String, String>,
    outlets: BTreeMap<String, String>,
    thermostat: Option<ThermostatReading>,
}

impl RoomState {
    /// Creates a new empty room state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Lights ==========

    /// Returns all known light statuses keyed by unit.
    #[must_use]
    pub fn lights(&self) -> &BTreeMap<String, String> {
        &self.lights
    }

    /// Returns the status reported for a light.
    #[must_use]
    pub fn light(&self, unit: &str) -> Option<&str> {
        self.lights.get(unit).map(String::as_str)
    }

    /// Returns `true` if the light is known and reported `on`.
    #[must_use]
    pub fn is_light_on(&self, unit: &str) -> bool {
        self.light(unit) == Some(SwitchState::On.as_str())
    }

    // ========== Outlets ==========

    /// Returns all known outlet statuses keyed by unit.
    #[must_use]
    pub fn outlets(&self) -> &BTreeMap<String, String> {
        &self.outlets
    }

    /// Returns the composite status reported for an outlet.
    #[must_use]
    pub fn outlet(&self, unit: &str) -> Option<&str> {
        self.outlets.get(unit).map(String::as_str)
    }

    /// Decodes whether an outlet is on.
    ///
    /// Returns `Ok(false)` for an unknown unit.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the stored status is not `<mode>/<on|off>`.
    pub fn is_outlet_on(&self, unit: &str) -> Result<bool, ParseError> {
        match self.outlet(unit) {
            Some(status) => status.parse::<OutletStatus>().map(|s| s.is_on()),
            None => Ok(false),
        }
    }

    // ========== Thermostat ==========

    /// Returns the last thermostat reading.
    #[must_use]
    pub fn thermostat(&self) -> Option<&ThermostatReading> {
        self.thermostat.as_ref()
    }

    /// Returns whether heating is on.
    #[must_use]
    pub fn heat_status(&self) -> Option<SwitchState> {
        self.thermostat.as_ref().map(ThermostatReading::heat_status)
    }

    /// Returns the target temperature in degrees Celsius.
    #[must_use]
    pub fn heat_target_temp(&self) -> Option<f32> {
        self.thermostat
            .as_ref()
            .map(ThermostatReading::target_temperature)
    }

    /// Returns the sensed temperature in degrees Celsius.
    #[must_use]
    pub fn temperature(&self) -> Option<f32> {
        self.thermostat
            .as_ref()
            .map(ThermostatReading::current_temperature)
    }

    // ========== State Changes ==========

    /// Applies a state change and returns whether the state actually changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match change {
            StateChange::Lights(infos) => merge_switches(&mut self.lights, infos),
            StateChange::Outlets(infos) => merge_switches(&mut self.outlets, infos),
            StateChange::Thermostat(reading) => {
                if self.thermostat.as_ref() == Some(reading) {
                    false
                } else {
                    self.thermostat = Some(reading.clone());
                    true
                }
            }
        }
    }
}

/// Merges reported unit statuses into `map`.
///
/// Reported units are inserted or overwritten; units missing from the report
/// are left alone. Returns whether any value changed.
fn merge_switches(map: &mut BTreeMap<String, String>, infos: &[StatusInfo]) -> bool {
    let mut changed = false;
    for info in infos {
        if map.get(info.unit_num()).map(String::as_str) != Some(info.unit_status()) {
            map.insert(info.unit_num().to_string(), info.unit_status().to_string());
            changed = true;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lights(pairs: &[(&str, &str)]) -> StateChange {
        StateChange::Lights(pairs.iter().map(|(u, s)| StatusInfo::new(*u, *s)).collect())
    }

    #[test]
    fn new_state_is_empty() {
        let state = RoomState::new();
        assert!(state.lights().is_empty());
        assert!(state.outlets().is_empty());
        assert!(state.thermostat().is_none());
        assert!(state.temperature().is_none());
    }

    #[test]
    fn partial_report_keeps_untouched_units() {
        let mut state = RoomState::new();
        state.apply(&lights(&[("1", "off"), ("2", "off")]));
        let changed = state.apply(&lights(&[("1", "on")]));

        assert!(changed);
        assert_eq!(state.light("1"), Some("on"));
        assert_eq!(state.light("2"), Some("off"));
        assert_eq!(state.lights().len(), 2);
    }

    #[test]
    fn new_units_are_added() {
        let mut state = RoomState::new();
        state.apply(&lights(&[("1", "off")]));
        state.apply(&lights(&[("3", "on")]));
        assert_eq!(state.lights().keys().collect::<Vec<_>>(), ["1", "3"]);
    }

    #[test]
    fn unchanged_report_is_not_a_change() {
        let mut state = RoomState::new();
        state.apply(&lights(&[("1", "off")]));
        assert!(!state.apply(&lights(&[("1", "off")])));
    }

    #[test]
    fn light_on_is_exact_match() {
        let mut state = RoomState::new();
        state.apply(&lights(&[("1", "on"), ("2", "off")]));
        assert!(state.is_light_on("1"));
        assert!(!state.is_light_on("2"));
        assert!(!state.is_light_on("9"));
    }

    #[test]
    fn outlet_decoding() {
        let mut state = RoomState::new();
        state.apply(&StateChange::Outlets(vec![
            StatusInfo::new("1", "eco/on"),
            StatusInfo::new("2", "eco/off"),
            StatusInfo::new("3", "garbage"),
        ]));
        assert!(state.is_outlet_on("1").unwrap());
        assert!(!state.is_outlet_on("2").unwrap());
        assert!(!state.is_outlet_on("missing").unwrap());
        assert!(state.is_outlet_on("3").is_err());
    }

    #[test]
    fn thermostat_is_replaced_whole() {
        let mut state = RoomState::new();
        let reading: ThermostatReading = "on/22.5/21.0".parse().unwrap();
        assert!(state.apply(&StateChange::Thermostat(reading.clone())));

        assert_eq!(state.heat_status(), Some(SwitchState::On));
        assert_eq!(state.heat_target_temp(), Some(22.5));
        assert_eq!(state.temperature(), Some(21.0));

        assert!(!state.apply(&StateChange::Thermostat(reading)));
    }
}
