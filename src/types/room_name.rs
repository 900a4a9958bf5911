// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room identifiers.

use std::fmt;

use serde::Serialize;

use crate::error::ValueError;

/// Name of a room as the controller addresses it.
///
/// The living room is addressed by the name `living`; every other room by its
/// numeric id (`1`, `2`, ...). The name doubles as the device number for
/// light and outlet requests.
///
/// # Examples
///
/// ```
/// use bestin_lib::types::RoomName;
///
/// let living = RoomName::living();
/// assert!(living.is_living());
///
/// let bedroom = RoomName::from(2);
/// assert_eq!(bedroom.as_str(), "2");
/// assert_eq!(bedroom.thermostat_unit(), "room2");
///
/// assert!(RoomName::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoomName(String);

impl RoomName {
    /// Name the controller uses for the living room.
    pub const LIVING: &'static str = "living";

    /// Creates a room name.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::EmptyRoomName` if `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, ValueError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValueError::EmptyRoomName);
        }
        Ok(Self(name))
    }

    /// The living room.
    #[must_use]
    pub fn living() -> Self {
        Self(Self::LIVING.to_string())
    }

    /// Returns `true` if this is the living room.
    #[must_use]
    pub fn is_living(&self) -> bool {
        self.0 == Self::LIVING
    }

    /// Returns the name as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the unit id of this room's thermostat (`room<name>`).
    #[must_use]
    pub fn thermostat_unit(&self) -> String {
        format!("room{}", self.0)
    }
}

impl From<u8> for RoomName {
    fn from(id: u8) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
