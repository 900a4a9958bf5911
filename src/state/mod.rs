// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room state management types.
//!
//! [`RoomState`] caches what the controller last reported for one room, and
//! [`StateChange`] is a parsed response ready to be applied to it.
//!
//! # Examples
//!
//! ```
//! use bestin_lib::codec::StatusInfo;
//! use bestin_lib::state::{RoomState, StateChange};
//!
//! let mut state = RoomState::new();
//! state.apply(&StateChange::Lights(vec![
//!     StatusInfo::new("1", "off"),
//!     StatusInfo::new("2", "off"),
//! ]));
//! state.apply(&StateChange::Lights(vec![StatusInfo::new("1", "on")]));
//!
//! assert!(state.is_light_on("1"));
//! assert_eq!(state.light("2"), Some("off"));
//! ```

mod room_state;
mod state_change;

pub use room_state::RoomState;
pub use state_change::StateChange;
