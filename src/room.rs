// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-room state aggregate.
//!
//! A [`Room`] owns the cached state of one room and the requests that keep it
//! current. Every fetch and every command updates the cache from the
//! controller's answer; control answers carry the status of the whole group,
//! so switching one light also refreshes every other light of the room.
//!
//! Exchange failures never reach the caller. They are logged and reported as
//! [`Refresh::Stale`], and the previously cached values stay in place. Only
//! precondition violations (unknown unit, missing target temperature) are
//! returned as errors, and those are checked before anything is sent.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::client::BestinClient;
use crate::codec::{Request, Service, StatusInfo};
use crate::error::{Error, ParseError, ValueError};
use crate::protocol::{Protocol, TcpClient};
use crate::state::{RoomState, StateChange};
use crate::types::{RoomName, SwitchState};

/// Lowest target temperature accepted by the thermostat, in Celsius.
pub const MIN_TARGET_TEMPERATURE: f32 = 5.0;
/// Highest target temperature accepted by the thermostat, in Celsius.
pub const MAX_TARGET_TEMPERATURE: f32 = 40.0;

/// Outcome of a fetch or command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Refresh {
    /// The controller answered and the cache was updated from the answer.
    Updated,
    /// The exchange failed; the cache still holds the previous values.
    Stale,
}

impl Refresh {
    /// Returns `true` for [`Refresh::Updated`].
    #[must_use]
    pub const fn is_updated(&self) -> bool {
        matches!(self, Self::Updated)
    }
}

/// A group of devices refreshed by one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    /// All lights of a room.
    Lights,
    /// All outlets of a room.
    Outlets,
    /// The room thermostat.
    Thermostat,
}

impl Group {
    /// Returns the group name, for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lights => "lights",
            Self::Outlets => "outlets",
            Self::Thermostat => "thermostat",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One room of a Bestin installation.
///
/// Cloning a room is cheap; clones share the cached state, so adapters and a
/// polling coordinator can hold the same room.
///
/// # Examples
///
/// ```no_run
/// use bestin_lib::{BestinClient, Room};
/// use bestin_lib::types::{RoomName, SwitchState};
///
/// # async fn example() -> bestin_lib::Result<()> {
/// let client = BestinClient::new("192.168.50.200", 10000)?;
/// let living = Room::new(RoomName::living(), client.clone()).await;
/// let bedroom = Room::new(RoomName::from(1), client).await;
///
/// for unit in living.light_units() {
///     living.set_light_status(&unit, SwitchState::Off).await?;
/// }
/// println!("{bedroom}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Room<P: Protocol = TcpClient> {
    name: RoomName,
    client: BestinClient<P>,
    state: Arc<RwLock<RoomState>>,
}

impl<P: Protocol> Clone for Room<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            client: self.client.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<P: Protocol> Room<P> {
    /// Creates a room and fetches its lights, outlets and thermostat.
    ///
    /// Groups whose fetch fails simply start out empty.
    pub async fn new(name: RoomName, client: BestinClient<P>) -> Self {
        let room = Self::without_fetch(name, client);
        room.fetch_lights_status().await;
        room.fetch_outlets_status().await;
        room.fetch_temper_status().await;
        room
    }

    /// Creates a room with an empty cache, without contacting the controller.
    #[must_use]
    pub fn without_fetch(name: RoomName, client: BestinClient<P>) -> Self {
        Self {
            name,
            client,
            state: Arc::new(RwLock::new(RoomState::new())),
        }
    }

    /// Returns the room name.
    #[must_use]
    pub fn name(&self) -> &RoomName {
        &self.name
    }

    /// Returns the client this room talks through.
    #[must_use]
    pub fn client(&self) -> &BestinClient<P> {
        &self.client
    }

    /// Returns a snapshot of the cached state.
    #[must_use]
    pub fn state(&self) -> RoomState {
        self.state.read().clone()
    }

    // ========== Refresh ==========

    /// Fetches one group.
    pub async fn fetch(&self, group: Group) -> Refresh {
        match group {
            Group::Lights => self.fetch_lights_status().await,
            Group::Outlets => self.fetch_outlets_status().await,
            Group::Thermostat => self.fetch_temper_status().await,
        }
    }

    async fn refresh(
        &self,
        request: Request,
        into_change: impl FnOnce(Vec<StatusInfo>) -> Result<StateChange, ParseError>,
    ) -> Refresh {
        let Ok(infos) = self.client.exchange(&request).await else {
            tracing::debug!(
                room = %self.name,
                service = %request.service(),
                "Keeping cached state"
            );
            return Refresh::Stale;
        };

        let change = match into_change(infos) {
            Ok(change) => change,
            Err(e) => {
                tracing::warn!(
                    room = %self.name,
                    kind = "parse",
                    error = %e,
                    "Keeping cached state"
                );
                return Refresh::Stale;
            }
        };

        let changed = self.state.write().apply(&change);
        tracing::debug!(room = %self.name, group = change.group(), changed, "State refreshed");
        Refresh::Updated
    }

    // ========== Lights ==========

    /// The living room's lights sit behind their own service, addressed as
    /// device 1; every other room uses its own name as device number.
    fn light_request(&self, request: fn(Service) -> Request) -> Request {
        if self.name.is_living() {
            request(Service::LivingLight).with_dev_num(1)
        } else {
            request(Service::Light).with_dev_num(&self.name)
        }
    }

    /// Fetches the status of every light in the room.
    pub async fn fetch_lights_status(&self) -> Refresh {
        let request = self.light_request(Request::status);
        self.refresh(request, |infos| Ok(StateChange::Lights(infos))).await
    }

    /// Switches a light and refreshes all lights of the room.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownUnit` if the controller has not reported
    /// `unit` for this room. Nothing is sent in that case.
    pub async fn set_light_status(
        &self,
        unit: &str,
        action: SwitchState,
    ) -> Result<Refresh, Error> {
        self.ensure_known(unit, RoomState::lights)?;

        let request = self
            .light_request(Request::control)
            .with_unit_num(unit)
            .with_ctrl_action(action);
        Ok(self
            .refresh(request, |infos| Ok(StateChange::Lights(infos)))
            .await)
    }

    /// Returns all known light statuses keyed by unit.
    #[must_use]
    pub fn lights(&self) -> BTreeMap<String, String> {
        self.state.read().lights().clone()
    }

    /// Returns the units of all known lights.
    #[must_use]
    pub fn light_units(&self) -> Vec<String> {
        self.state.read().lights().keys().cloned().collect()
    }

    /// Returns `true` if the light is on.
    ///
    /// An unknown unit is logged and reported as off.
    #[must_use]
    pub fn is_light_on(&self, unit: &str) -> bool {
        let state = self.state.read();
        if state.light(unit).is_none() {
            tracing::error!(room = %self.name, unit, "Light not in room");
            return false;
        }
        state.is_light_on(unit)
    }

    // ========== Outlets ==========

    /// Fetches the status of every outlet in the room.
    pub async fn fetch_outlets_status(&self) -> Refresh {
        let request = Request::status(Service::Electric).with_dev_num(&self.name);
        self.refresh(request, |infos| Ok(StateChange::Outlets(infos))).await
    }

    /// Switches an outlet and refreshes all outlets of the room.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownUnit` if the controller has not reported
    /// `unit` for this room. Nothing is sent in that case.
    pub async fn set_outlet_status(
        &self,
        unit: &str,
        action: SwitchState,
    ) -> Result<Refresh, Error> {
        self.ensure_known(unit, RoomState::outlets)?;

        let request = Request::control(Service::Electric)
            .with_dev_num(&self.name)
            .with_unit_num(unit)
            .with_ctrl_action(action);
        Ok(self
            .refresh(request, |infos| Ok(StateChange::Outlets(infos)))
            .await)
    }

    /// Returns all known outlet statuses keyed by unit.
    #[must_use]
    pub fn outlets(&self) -> BTreeMap<String, String> {
        self.state.read().outlets().clone()
    }

    /// Returns the units of all known outlets.
    #[must_use]
    pub fn outlet_units(&self) -> Vec<String> {
        self.state.read().outlets().keys().cloned().collect()
    }

    /// Returns `true` if the outlet is on.
    ///
    /// An unknown unit, or a status that is not `<mode>/<on|off>`, is logged
    /// and reported as off.
    #[must_use]
    pub fn is_outlet_on(&self, unit: &str) -> bool {
        let state = self.state.read();
        if state.outlet(unit).is_none() {
            tracing::error!(room = %self.name, unit, "Outlet not in room");
            return false;
        }
        match state.is_outlet_on(unit) {
            Ok(on) => on,
            Err(e) => {
                tracing::warn!(room = %self.name, unit, error = %e, "Unreadable outlet status");
                false
            }
        }
    }

    // ========== Thermostat ==========

    fn temper_request(&self, request: fn(Service) -> Request) -> Request {
        request(Service::Temper)
            .with_dev_num(1)
            .with_unit_num(self.name.thermostat_unit())
    }

    /// Fetches the thermostat reading.
    pub async fn fetch_temper_status(&self) -> Refresh {
        let request = self.temper_request(Request::status).with_ctrl_action("");
        self.refresh(request, |infos| StateChange::thermostat(&infos)).await
    }

    /// Switches heating and sets the target temperature.
    ///
    /// Without a `temperature` the current target is sent back unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::MissingTargetTemperature` if no temperature is
    /// given and none has been fetched yet, and
    /// `ValueError::TemperatureOutOfRange` for a temperature outside
    /// [`MIN_TARGET_TEMPERATURE`] to [`MAX_TARGET_TEMPERATURE`]. Nothing is
    /// sent in either case.
    pub async fn set_temper_status(
        &self,
        onoff: SwitchState,
        temperature: Option<f32>,
    ) -> Result<Refresh, Error> {
        let target = match temperature {
            Some(t) => format_temperature(t)?,
            None => self.current_target_raw()?,
        };

        let request = self
            .temper_request(Request::control)
            .with_ctrl_action(format!("{onoff}/{target}"));
        Ok(self
            .refresh(request, |infos| StateChange::thermostat(&infos))
            .await)
    }

    /// Returns whether heating is on.
    #[must_use]
    pub fn heat_status(&self) -> Option<SwitchState> {
        self.state.read().heat_status()
    }

    /// Returns `true` if heating is known to be on.
    #[must_use]
    pub fn is_temper_on(&self) -> bool {
        self.heat_status() == Some(SwitchState::On)
    }

    /// Returns the target temperature in Celsius.
    #[must_use]
    pub fn heat_target_temp(&self) -> Option<f32> {
        self.state.read().heat_target_temp()
    }

    /// Returns the sensed temperature in Celsius.
    #[must_use]
    pub fn temperature(&self) -> Option<f32> {
        self.state.read().temperature()
    }

    fn current_target_raw(&self) -> Result<String, ValueError> {
        self.state
            .read()
            .thermostat()
            .map(|reading| reading.target_temperature_raw().to_string())
            .ok_or_else(|| ValueError::MissingTargetTemperature {
                room: self.name.to_string(),
            })
    }

    fn ensure_known(
        &self,
        unit: &str,
        units: fn(&RoomState) -> &BTreeMap<String, String>,
    ) -> Result<(), ValueError> {
        if units(&self.state.read()).contains_key(unit) {
            Ok(())
        } else {
            Err(ValueError::UnknownUnit {
                room: self.name.to_string(),
                unit: unit.to_string(),
            })
        }
    }
}

/// Formats a target temperature with one decimal, as the thermostat's
/// half-degree steps need.
fn format_temperature(temperature: f32) -> Result<String, ValueError> {
    if !(MIN_TARGET_TEMPERATURE..=MAX_TARGET_TEMPERATURE).contains(&temperature) {
        return Err(ValueError::TemperatureOutOfRange {
            min: MIN_TARGET_TEMPERATURE,
            max: MAX_TARGET_TEMPERATURE,
            actual: temperature,
        });
    }
    Ok(format!("{temperature:.1}"))
}

impl<P: Protocol> fmt::Display for Room<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        write!(
            f,
            "Room(name=\"{}\", lights={:?}, outlets={:?}, temperature={:?})",
            self.name,
            state.lights(),
            state.outlets(),
            state.thermostat().map(|r| r.current_temperature_raw())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolError;
    use crate::protocol::scripted::{
        ScriptedProtocol, rejected_response, switch_response, thermostat_response,
    };

    /// Builds a room whose three initial fetches return the given answers.
    async fn room_with(
        name: RoomName,
        lights: &[(&str, &str)],
        outlets: &[(&str, &str)],
        thermostat: &str,
    ) -> (Room<ScriptedProtocol>, ScriptedProtocol) {
        let protocol = ScriptedProtocol::new();
        protocol
            .reply(switch_response(lights))
            .reply(switch_response(outlets))
            .reply(thermostat_response("room", thermostat));
        let room = Room::new(name, BestinClient::from_protocol(protocol.clone())).await;
        (room, protocol)
    }

    /// Builds a room with one light and one outlet, both off.
    async fn idle_room(
        name: RoomName,
        thermostat: &str,
    ) -> (Room<ScriptedProtocol>, ScriptedProtocol) {
        room_with(name, &[("1", "off")], &[("1", "eco/off")], thermostat).await
    }

    #[tokio::test]
    async fn construction_fetches_all_groups() {
        let (room, protocol) = room_with(
            RoomName::from(1),
            &[("1", "on"), ("2", "off")],
            &[("1", "unset/on")],
            "off/20.0/19.5",
        )
        .await;

        let requests = protocol.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].contains(r#"name = "remote_access_light""#));
        assert!(requests[0].contains(r#"<action>"status"</action>"#));
        assert!(requests[1].contains(r#"name = "remote_access_electric""#));
        assert!(requests[2].contains(r#"name = "remote_access_temper""#));
        assert!(requests[2].contains(r#"dev_num = "1" unit_num = "room1" ctrl_action = """#));

        assert!(room.is_light_on("1"));
        assert!(!room.is_light_on("2"));
        assert!(room.is_outlet_on("1"));
        assert_eq!(room.heat_status(), Some(SwitchState::Off));
        assert_eq!(room.temperature(), Some(19.5));
    }

    #[tokio::test]
    async fn living_room_lights_use_their_own_service() {
        let (room, protocol) = idle_room(RoomName::living(), "on/22/21").await;

        let first = &protocol.requests()[0];
        assert!(first.contains(r#"name = "remote_access_livinglight""#));
        assert!(first.contains(r#"dev_num = "1" unit_num = "null" ctrl_action = "null""#));

        protocol.reply(switch_response(&[("1", "on")]));
        room.set_light_status("1", SwitchState::On).await.unwrap();
        let sent = protocol.last_request().unwrap();
        assert!(sent.contains(r#"name = "remote_access_livinglight""#));
        assert!(sent.contains(r#"dev_num = "1" unit_num = "1" ctrl_action = "on""#));
    }

    #[tokio::test]
    async fn other_rooms_use_their_name_as_device() {
        let (room, protocol) = idle_room(RoomName::from(3), "on/22/21").await;

        protocol.reply(switch_response(&[("1", "off")]));
        room.fetch_lights_status().await;
        let sent = protocol.last_request().unwrap();
        assert!(sent.contains(r#"name = "remote_access_light""#));
        assert!(sent.contains(r#"dev_num = "3""#));
    }

    #[tokio::test]
    async fn control_answer_merges_into_group() {
        let (room, protocol) = room_with(
            RoomName::from(1),
            &[("1", "off"), ("2", "off")],
            &[("1", "eco/off")],
            "on/22/21",
        )
        .await;

        protocol.reply(switch_response(&[("1", "on")]));
        let refresh = room.set_light_status("1", SwitchState::On).await.unwrap();

        assert_eq!(refresh, Refresh::Updated);
        let lights = room.lights();
        assert_eq!(lights.get("1").map(String::as_str), Some("on"));
        assert_eq!(lights.get("2").map(String::as_str), Some("off"));
    }

    #[tokio::test]
    async fn unknown_unit_is_rejected_before_sending() {
        let (room, protocol) = idle_room(RoomName::from(1), "on/22/21").await;

        let err = room.set_light_status("9", SwitchState::On).await.unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::UnknownUnit { .. })));

        let err = room.set_outlet_status("9", SwitchState::Off).await.unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::UnknownUnit { .. })));

        assert_eq!(protocol.requests().len(), 3);
    }

    #[tokio::test]
    async fn outlet_command_uses_room_as_device() {
        let (room, protocol) = room_with(
            RoomName::living(),
            &[("1", "off")],
            &[("1", "eco/on"), ("2", "eco/on")],
            "on/22/21",
        )
        .await;

        protocol.reply(switch_response(&[("1", "eco/off"), ("2", "eco/on")]));
        room.set_outlet_status("1", SwitchState::Off).await.unwrap();

        let sent = protocol.last_request().unwrap();
        assert!(sent.contains(r#"name = "remote_access_electric""#));
        assert!(sent.contains(r#"dev_num = "living" unit_num = "1" ctrl_action = "off""#));
        assert!(!room.is_outlet_on("1"));
        assert!(room.is_outlet_on("2"));
        assert!(!room.is_outlet_on("missing"));
    }

    #[tokio::test]
    async fn thermostat_update_is_atomic() {
        let (room, protocol) = idle_room(RoomName::from(2), "on/22.5/21.0").await;

        assert_eq!(room.heat_status(), Some(SwitchState::On));
        assert_eq!(room.heat_target_temp(), Some(22.5));
        assert_eq!(room.temperature(), Some(21.0));

        protocol.reply(rejected_response());
        assert_eq!(room.fetch_temper_status().await, Refresh::Stale);

        protocol.reply(thermostat_response("room2", "off/18"));
        assert_eq!(room.fetch_temper_status().await, Refresh::Stale);

        protocol.reply(thermostat_response("room2", "off/NaN/21.0"));
        assert_eq!(room.fetch_temper_status().await, Refresh::Stale);

        assert_eq!(room.heat_status(), Some(SwitchState::On));
        assert_eq!(room.heat_target_temp(), Some(22.5));
        assert_eq!(room.temperature(), Some(21.0));
    }

    #[tokio::test]
    async fn failed_initial_fetch_leaves_fields_empty() {
        let protocol = ScriptedProtocol::new();
        protocol
            .fail(ProtocolError::ConnectionFailed("refused".to_string()))
            .reply("")
            .reply("<imap><service result=");
        let room = Room::new(RoomName::from(1), BestinClient::from_protocol(protocol)).await;

        assert!(room.lights().is_empty());
        assert!(room.outlets().is_empty());
        assert!(room.heat_status().is_none());
        assert!(room.heat_target_temp().is_none());
        assert!(room.temperature().is_none());
        assert!(!room.is_light_on("1"));
    }

    #[tokio::test]
    async fn set_temper_defaults_to_current_target() {
        let (room, protocol) = idle_room(RoomName::from(1), "off/23.5/21.0").await;

        protocol.reply(thermostat_response("room1", "on/23.5/21.0"));
        let refresh = room.set_temper_status(SwitchState::On, None).await.unwrap();

        assert!(refresh.is_updated());
        let sent = protocol.last_request().unwrap();
        assert!(sent.contains(r#"<action>"control"</action>"#));
        assert!(sent.contains(r#"dev_num = "1" unit_num = "room1" ctrl_action = "on/23.5""#));
        assert!(room.is_temper_on());
    }

    #[tokio::test]
    async fn set_temper_formats_explicit_target() {
        let (room, protocol) = idle_room(RoomName::from(1), "off/23.5/21.0").await;

        protocol.reply(thermostat_response("room1", "off/25.0/21.0"));
        room.set_temper_status(SwitchState::Off, Some(25.0)).await.unwrap();

        let sent = protocol.last_request().unwrap();
        assert!(sent.contains(r#"ctrl_action = "off/25.0""#));
        assert_eq!(room.heat_target_temp(), Some(25.0));
    }

    #[tokio::test]
    async fn set_temper_without_known_target_is_rejected() {
        let protocol = ScriptedProtocol::new();
        let client = BestinClient::from_protocol(protocol.clone());
        let room = Room::without_fetch(RoomName::from(1), client);

        let err = room.set_temper_status(SwitchState::On, None).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Value(ValueError::MissingTargetTemperature { .. })
        ));

        let err = room
            .set_temper_status(SwitchState::On, Some(80.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Value(ValueError::TemperatureOutOfRange { .. })
        ));
        assert!(protocol.requests().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_keeps_state() {
        let (room, protocol) =
            room_with(RoomName::from(1), &[("1", "on")], &[("1", "eco/on")], "on/22/21").await;

        protocol.fail(ProtocolError::Timeout(5000));
        let refresh = room.set_light_status("1", SwitchState::Off).await.unwrap();

        assert_eq!(refresh, Refresh::Stale);
        assert!(room.is_light_on("1"));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let (room, protocol) = idle_room(RoomName::from(1), "on/22/21").await;
        let other = room.clone();

        protocol.reply(switch_response(&[("1", "on")]));
        room.fetch(Group::Lights).await;
        assert!(other.is_light_on("1"));
    }

    #[tokio::test]
    async fn display_lists_cached_state() {
        let (room, _) = idle_room(RoomName::from(1), "on/22/21.5").await;
        assert_eq!(
            room.to_string(),
            r#"Room(name="1", lights={"1": "off"}, outlets={"1": "eco/off"}, temperature=Some("21.5"))"#
        );
    }

    #[test]
    fn temperature_formatting() {
        assert_eq!(format_temperature(22.0).unwrap(), "22.0");
        assert_eq!(format_temperature(22.5).unwrap(), "22.5");
        assert!(format_temperature(f32::NAN).is_err());
        assert!(format_temperature(4.5).is_err());
    }
}
