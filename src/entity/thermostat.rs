// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room thermostat adapter.

use std::fmt;

use crate::error::{Error, ValueError};
use crate::protocol::{Protocol, TcpClient};
use crate::room::{MAX_TARGET_TEMPERATURE, MIN_TARGET_TEMPERATURE, Refresh, Room};
use crate::types::SwitchState;

use super::{entity_name, unique_id};

/// Operating mode of a floor heating thermostat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HvacMode {
    /// Heating off.
    Off,
    /// Heating on.
    Heat,
}

impl HvacMode {
    /// Returns the heat status this mode is sent as.
    #[must_use]
    pub const fn switch_state(&self) -> SwitchState {
        match self {
            Self::Off => SwitchState::Off,
            Self::Heat => SwitchState::On,
        }
    }
}

impl From<SwitchState> for HvacMode {
    fn from(state: SwitchState) -> Self {
        match state {
            SwitchState::Off => Self::Off,
            SwitchState::On => Self::Heat,
        }
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => f.write_str("off"),
            Self::Heat => f.write_str("heat"),
        }
    }
}

/// Unit of the temperatures a thermostat reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemperatureUnit {
    /// Degrees Celsius.
    Celsius,
}

/// The floor heating thermostat of a room.
#[derive(Debug, Clone)]
pub struct ThermostatEntity<P: Protocol = TcpClient> {
    room: Room<P>,
    name: String,
}

impl<P: Protocol> ThermostatEntity<P> {
    /// Lowest settable target temperature.
    pub const MIN_TEMPERATURE: f32 = MIN_TARGET_TEMPERATURE;
    /// Highest settable target temperature.
    pub const MAX_TEMPERATURE: f32 = MAX_TARGET_TEMPERATURE;
    /// Target temperature step.
    pub const TEMPERATURE_STEP: f32 = 0.5;
    /// Unit of every temperature this adapter reports.
    pub const TEMPERATURE_UNIT: TemperatureUnit = TemperatureUnit::Celsius;

    const HVAC_MODES: [HvacMode; 2] = [HvacMode::Off, HvacMode::Heat];

    /// Creates the thermostat adapter of `room`.
    #[must_use]
    pub fn new(room: Room<P>) -> Self {
        let name = entity_name(room.name(), "thermostat");
        Self { room, name }
    }

    /// Returns the adapter name, `bestin_r<room>_thermostat`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `<host>:<port>_<name>`.
    #[must_use]
    pub fn unique_id(&self) -> String {
        unique_id(self.room.client().endpoint(), &self.name)
    }

    /// Returns the room this thermostat belongs to.
    #[must_use]
    pub fn room(&self) -> &Room<P> {
        &self.room
    }

    /// Returns the sensed room temperature.
    #[must_use]
    pub fn current_temperature(&self) -> Option<f32> {
        self.room.temperature()
    }

    /// Returns the target temperature.
    #[must_use]
    pub fn target_temperature(&self) -> Option<f32> {
        self.room.heat_target_temp()
    }

    /// Returns the current mode, if a reading has been fetched.
    #[must_use]
    pub fn hvac_mode(&self) -> Option<HvacMode> {
        self.room.heat_status().map(HvacMode::from)
    }

    /// Returns the supported modes.
    #[must_use]
    pub fn hvac_modes(&self) -> &'static [HvacMode] {
        &Self::HVAC_MODES
    }

    /// Switches heating on or off, keeping the target temperature.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::MissingTargetTemperature` if no reading has been
    /// fetched yet.
    pub async fn set_hvac_mode(&self, mode: HvacMode) -> Result<Refresh, Error> {
        self.room.set_temper_status(mode.switch_state(), None).await
    }

    /// Sets the target temperature, keeping the heat status.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::MissingHeatStatus` if no reading has been fetched
    /// yet, and `ValueError::TemperatureOutOfRange` outside
    /// [`MIN_TEMPERATURE`](Self::MIN_TEMPERATURE) to
    /// [`MAX_TEMPERATURE`](Self::MAX_TEMPERATURE).
    pub async fn set_temperature(&self, temperature: f32) -> Result<Refresh, Error> {
        let heat_status = self
            .room
            .heat_status()
            .ok_or_else(|| ValueError::MissingHeatStatus {
                room: self.room.name().to_string(),
            })?;
        self.room
            .set_temper_status(heat_status, Some(temperature))
            .await
    }
}
