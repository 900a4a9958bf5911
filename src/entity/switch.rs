// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light and outlet adapters.

use crate::error::Error;
use crate::protocol::{Protocol, TcpClient};
use crate::room::{Refresh, Room};
use crate::types::SwitchState;

use super::{entity_name, unique_id};

/// A single light of a room.
#[derive(Debug, Clone)]
pub struct LightEntity<P: Protocol = TcpClient> {
    room: Room<P>,
    unit: String,
    name: String,
}

impl<P: Protocol> LightEntity<P> {
    /// Creates an adapter for light `unit` of `room`.
    #[must_use]
    pub fn new(room: Room<P>, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        let name = entity_name(room.name(), &unit);
        Self { room, unit, name }
    }

    /// Returns the adapter name, `bestin_r<room>_<unit>`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns an identifier unique across controllers.
    #[must_use]
    pub fn unique_id(&self) -> String {
        unique_id(self.room.client().endpoint(), &self.name)
    }

    /// Returns the unit within the room.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Returns the room this light belongs to.
    #[must_use]
    pub fn room(&self) -> &Room<P> {
        &self.room
    }

    /// Returns `true` if the light was last reported on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.room.is_light_on(&self.unit)
    }

    /// Switches the light on.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownUnit` if the room no longer lists the unit.
    pub async fn turn_on(&self) -> Result<Refresh, Error> {
        self.room.set_light_status(&self.unit, SwitchState::On).await
    }

    /// Switches the light off.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownUnit` if the room no longer lists the unit.
    pub async fn turn_off(&self) -> Result<Refresh, Error> {
        self.room.set_light_status(&self.unit, SwitchState::Off).await
    }
}

/// A single wall outlet of a room.
#[derive(Debug, Clone)]
pub struct OutletEntity<P: Protocol = TcpClient> {
    room: Room<P>,
    unit: String,
    name: String,
}

impl<P: Protocol> OutletEntity<P> {
    /// Creates an adapter for outlet `unit` of `room`.
    #[must_use]
    pub fn new(room: Room<P>, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        let name = entity_name(room.name(), &unit);
        Self { room, unit, name }
    }

    /// Returns the adapter name, `bestin_r<room>_<unit>`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns an identifier unique across controllers.
    #[must_use]
    pub fn unique_id(&self) -> String {
        unique_id(self.room.client().endpoint(), &self.name)
    }

    /// Returns the unit within the room.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Returns the room this outlet belongs to.
    #[must_use]
    pub fn room(&self) -> &Room<P> {
        &self.room
    }

    /// Returns `true` if the outlet was last reported on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.room.is_outlet_on(&self.unit)
    }

    /// Switches the outlet on.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownUnit` if the room no longer lists the unit.
    pub async fn turn_on(&self) -> Result<Refresh, Error> {
        self.room.set_outlet_status(&self.unit, SwitchState::On).await
    }

    /// Switches the outlet off.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownUnit` if the room no longer lists the unit.
    pub async fn turn_off(&self) -> Result<Refresh, Error> {
        self.room.set_outlet_status(&self.unit, SwitchState::Off).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::BestinClient;
    use crate::protocol::scripted::{ScriptedProtocol, switch_response};
    use crate::types::RoomName;

    async fn room(protocol: &ScriptedProtocol) -> Room<ScriptedProtocol> {
        protocol
            .reply(switch_response(&[("1", "off"), ("2", "on")]))
            .reply(switch_response(&[("1", "eco/off")]))
            .reply("");
        Room::new(RoomName::from(2), BestinClient::from_protocol(protocol.clone())).await
    }

    #[tokio::test]
    async fn light_turn_on_updates_the_room() {
        let protocol = ScriptedProtocol::new();
        let light = LightEntity::new(room(&protocol).await, "1");

        assert_eq!(light.name(), "bestin_r2_1");
        assert_eq!(light.unique_id(), "192.168.50.200:10000_bestin_r2_1");
        assert!(!light.is_on());

        protocol.reply(switch_response(&[("1", "on"), ("2", "on")]));
        assert_eq!(light.turn_on().await.unwrap(), Refresh::Updated);
        assert!(light.is_on());

        let sent = protocol.last_request().unwrap();
        assert!(sent.contains(r#"dev_num = "2" unit_num = "1" ctrl_action = "on""#));
    }

    #[tokio::test]
    async fn outlet_reads_state_from_composite_status() {
        let protocol = ScriptedProtocol::new();
        let outlet = OutletEntity::new(room(&protocol).await, "1");
        assert!(!outlet.is_on());

        protocol.reply(switch_response(&[("1", "eco/on")]));
        outlet.turn_on().await.unwrap();
        assert!(outlet.is_on());

        protocol.reply(switch_response(&[("1", "eco/off")]));
        outlet.turn_off().await.unwrap();
        assert!(!outlet.is_on());
        assert!(
            protocol
                .last_request()
                .unwrap()
                .contains(r#"name = "remote_access_electric""#)
        );
    }

    #[tokio::test]
    async fn unknown_unit_fails_without_request() {
        let protocol = ScriptedProtocol::new();
        let light = LightEntity::new(room(&protocol).await, "7");

        assert!(light.turn_off().await.is_err());
        assert_eq!(protocol.requests().len(), 3);
    }
}
