// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device adapters for home automation hosts.
//!
//! Each adapter wraps a shared [`Room`] handle and exposes one controllable
//! device: a light, an outlet or a room thermostat. Reads come from the
//! room's cache; writes forward to the room and refresh the cache from the
//! controller's answer.
//!
//! The discovery functions build one adapter per device known to a set of
//! rooms:
//!
//! ```no_run
//! use bestin_lib::{BestinClient, Room, entity};
//! use bestin_lib::types::RoomName;
//!
//! # async fn example() -> bestin_lib::Result<()> {
//! let client = BestinClient::new("192.168.50.200", 10000)?;
//! let rooms = vec![
//!     Room::new(RoomName::living(), client.clone()).await,
//!     Room::new(RoomName::from(1), client).await,
//! ];
//!
//! for light in entity::lights(&rooms) {
//!     println!("{}: {}", light.name(), light.is_on());
//! }
//! for thermostat in entity::thermostats(&rooms) {
//!     println!("{}: {:?}", thermostat.name(), thermostat.current_temperature());
//! }
//! # Ok(())
//! # }
//! ```

mod switch;
mod thermostat;

pub use switch::{LightEntity, OutletEntity};
pub use thermostat::{HvacMode, TemperatureUnit, ThermostatEntity};

use crate::protocol::{Endpoint, Protocol};
use crate::room::Room;

/// Builds the adapter name for a device of `room`.
fn entity_name(room: &crate::types::RoomName, suffix: &str) -> String {
    format!("bestin_r{room}_{suffix}")
}

/// Builds an identifier that is unique across controllers.
fn unique_id(endpoint: &Endpoint, name: &str) -> String {
    format!("{endpoint}_{name}")
}

/// Creates one light adapter per light known to `rooms`.
#[must_use]
pub fn lights<P: Protocol>(rooms: &[Room<P>]) -> Vec<LightEntity<P>> {
    rooms
        .iter()
        .flat_map(|room| {
            room.light_units()
                .into_iter()
                .map(|unit| LightEntity::new(room.clone(), unit))
        })
        .collect()
}

/// Creates one outlet adapter per outlet known to `rooms`.
#[must_use]
pub fn outlets<P: Protocol>(rooms: &[Room<P>]) -> Vec<OutletEntity<P>> {
    rooms
        .iter()
        .flat_map(|room| {
            room.outlet_units()
                .into_iter()
                .map(|unit| OutletEntity::new(room.clone(), unit))
        })
        .collect()
}

/// Creates a thermostat adapter for every room that reported a temperature.
#[must_use]
pub fn thermostats<P: Protocol>(rooms: &[Room<P>]) -> Vec<ThermostatEntity<P>> {
    rooms
        .iter()
        .filter(|room| room.temperature().is_some())
        .map(|room| ThermostatEntity::new(room.clone()))
        .collect()
}
