// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outlet status decoding.

use std::str::FromStr;

use crate::error::ParseError;

use super::SwitchState;

/// Decoded outlet status.
///
/// Outlets report a composite `"<mode>/<on|off>"` value, for example
/// `"unset/on"` or `"eco/off"`. The mode is kept verbatim.
///
/// # Examples
///
/// ```
/// use bestin_lib::types::{OutletStatus, SwitchState};
///
/// let status: OutletStatus = "eco/on".parse().unwrap();
/// assert_eq!(status.mode(), "eco");
/// assert_eq!(status.state(), SwitchState::On);
///
/// assert!("eco".parse::<OutletStatus>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutletStatus {
    mode: String,
    state: SwitchState,
}

impl OutletStatus {
    /// Returns the mode component.
    #[must_use]
    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Returns the on/off component.
    #[must_use]
    pub fn state(&self) -> SwitchState {
        self.state
    }

    /// Returns `true` if the outlet is switched on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.state.is_on()
    }
}

impl FromStr for OutletStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((mode, state)) = s.split_once('/') else {
            return Err(ParseError::UnexpectedFormat(format!(
                "outlet status {s:?} is not <mode>/<state>"
            )));
        };
        if state.contains('/') {
            return Err(ParseError::UnexpectedFormat(format!(
                "outlet status {s:?} has more than two parts"
            )));
        }
        let state = state.parse::<SwitchState>().map_err(|_| {
            ParseError::UnexpectedFormat(format!("outlet status {s:?} has invalid state"))
        })?;

        Ok(Self {
            mode: mode.to_string(),
            state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mode_and_state() {
        let status: OutletStatus = "unset/off".parse().unwrap();
        assert_eq!(status.mode(), "unset");
        assert!(!status.is_on());
    }

    #[test]
    fn rejects_wrong_arity() {
        assert!("on".parse::<OutletStatus>().is_err());
        assert!("eco/on/1".parse::<OutletStatus>().is_err());
    }

    #[test]
    fn rejects_unknown_state() {
        let err = "eco/maybe".parse::<OutletStatus>().unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedFormat(_)));
    }
}
