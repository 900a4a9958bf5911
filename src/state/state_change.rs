// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! Status and control requests get the same answer from the controller: the
//! full status of the addressed group. A [`StateChange`] is that answer,
//! parsed and tagged with the group it belongs to.

use crate::codec::StatusInfo;
use crate::error::ParseError;
use crate::types::ThermostatReading;

/// A parsed controller answer for one group of a room.
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
    /// Light statuses (`on`/`off`) keyed by unit.
    Lights(Vec<StatusInfo>),
    /// Outlet statuses (`<mode>/<on|off>`) keyed by unit.
    Outlets(Vec<StatusInfo>),
    /// A complete thermostat reading.
    Thermostat(ThermostatReading),
}

impl StateChange {
    /// Builds a thermostat change from the entries of a thermostat answer.
    ///
    /// The controller sends a single entry; any further entries are ignored.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if there is no entry or its status is not a
    /// valid `<state>/<target>/<current>` triple.
    pub fn thermostat(infos: &[StatusInfo]) -> Result<Self, ParseError> {
        let info = infos
            .first()
            .ok_or_else(|| ParseError::MissingField("status_info".to_string()))?;
        if infos.len() > 1 {
            tracing::debug!(count = infos.len(), "Ignoring extra thermostat entries");
        }
        info.unit_status().parse().map(Self::Thermostat)
    }

    /// Returns the group name, for logs.
    #[must_use]
    pub const fn group(&self) -> &'static str {
        match self {
            Self::Lights(_) => "lights",
            Self::Outlets(_) => "outlets",
            Self::Thermostat(_) => "thermostat",
        }
    }
}
