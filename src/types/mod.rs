// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Bestin room control.
//!
//! # Types
//!
//! - [`SwitchState`] - On/off state of lights, outlets and heating
//! - [`RoomName`] - Room identifier (`living` or a numeric id)
//! - [`OutletStatus`] - Decoded `<mode>/<state>` outlet value
//! - [`ThermostatReading`] - Decoded `<state>/<target>/<current>` thermostat value

mod outlet;
mod room_name;
mod switch;
mod thermostat;

pub use outlet::OutletStatus;
pub use room_name::RoomName;
pub use switch::SwitchState;
pub use thermostat::ThermostatReading;
