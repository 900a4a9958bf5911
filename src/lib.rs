// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `Bestin` Lib - A Rust library to control Bestin home automation controllers.
//!
//! This library provides async APIs to read and switch the lights, wall
//! outlets and floor heating thermostats of a Bestin installation over the
//! controller's TCP/XML protocol.
//!
//! # Supported Features
//!
//! - **Lights**: Status and on/off per unit, including the living room's
//!   dedicated light service
//! - **Outlets**: Status and on/off per unit
//! - **Thermostats**: Heat status, target and sensed temperature, heating
//!   on/off and target temperature
//! - **Adapters**: Light, outlet and thermostat entities for automation hosts
//! - **Polling**: Periodic refresh of one device group across rooms
//!
//! # Quick Start
//!
//! ```no_run
//! use bestin_lib::{BestinClient, Room};
//! use bestin_lib::types::{RoomName, SwitchState};
//!
//! #[tokio::main]
//! async fn main() -> bestin_lib::Result<()> {
//!     let client = BestinClient::new("192.168.50.200", 10000)?;
//!
//!     // Fetches lights, outlets and thermostat of the room
//!     let room = Room::new(RoomName::from(1), client).await;
//!
//!     if !room.is_light_on("1") {
//!         room.set_light_status("1", SwitchState::On).await?;
//!     }
//!     room.set_temper_status(SwitchState::On, Some(22.5)).await?;
//!
//!     println!("{room}");
//!     Ok(())
//! }
//! ```
//!
//! ## Custom Timeouts
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use bestin_lib::TcpConfig;
//!
//! # fn example() -> bestin_lib::Result<()> {
//! let client = TcpConfig::new("192.168.50.200")
//!     .with_connect_timeout(Duration::from_secs(3))
//!     .with_idle_timeout(Duration::from_secs(2))
//!     .into_client()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Failure Handling
//!
//! Room operations never fail because of the network. A failed exchange is
//! logged with its kind and the operation reports [`Refresh::Stale`], leaving
//! the cached state untouched. Errors are only returned for requests that
//! cannot be sent, such as switching a unit the room does not have.

mod client;
pub mod codec;
mod coordinator;
pub mod entity;
pub mod error;
pub mod protocol;
mod room;
pub mod state;
pub mod types;

pub use client::BestinClient;
pub use coordinator::Coordinator;
pub use entity::{HvacMode, LightEntity, OutletEntity, ThermostatEntity};
pub use error::{Error, ExchangeError, ParseError, ProtocolError, Result, ValueError};
pub use protocol::{Endpoint, Protocol, RawResponse, ResponseBody, TcpClient, TcpConfig};
pub use room::{Group, MAX_TARGET_TEMPERATURE, MIN_TARGET_TEMPERATURE, Refresh, Room};
pub use types::{OutletStatus, RoomName, SwitchState, ThermostatReading};
