// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic polling of one device group across rooms.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;

use crate::protocol::{Protocol, TcpClient};
use crate::room::{Group, Room};

/// Keeps one [`Group`] of a set of rooms fresh.
///
/// Rooms are fetched one after the other. A refresh that is started while
/// another one is still running is skipped and reports the last outcome.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// use bestin_lib::{BestinClient, Coordinator, Group, Room};
/// use bestin_lib::types::RoomName;
///
/// # async fn example() -> bestin_lib::Result<()> {
/// let client = BestinClient::new("192.168.50.200", 10000)?;
/// let rooms = vec![Room::new(RoomName::living(), client).await];
///
/// let coordinator = Coordinator::new(Group::Lights, rooms);
/// let shutdown = tokio::time::sleep(Duration::from_secs(3600));
/// coordinator.run(shutdown).await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Coordinator<P: Protocol = TcpClient> {
    group: Group,
    rooms: Vec<Room<P>>,
    interval: Duration,
    timeout: Duration,
    in_flight: Mutex<()>,
    last_update_success: AtomicBool,
}

impl<P: Protocol> Coordinator<P> {
    /// Default time between two refreshes.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);
    /// Default time limit for one refresh of all rooms.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a coordinator for `group` over `rooms`.
    #[must_use]
    pub fn new(group: Group, rooms: Vec<Room<P>>) -> Self {
        Self {
            group,
            rooms,
            interval: Self::DEFAULT_INTERVAL,
            timeout: Self::DEFAULT_TIMEOUT,
            in_flight: Mutex::new(()),
            last_update_success: AtomicBool::new(false),
        }
    }

    /// Sets the time between two refreshes.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the time limit for one refresh.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the polled group.
    #[must_use]
    pub fn group(&self) -> Group {
        self.group
    }

    /// Returns the polled rooms.
    #[must_use]
    pub fn rooms(&self) -> &[Room<P>] {
        &self.rooms
    }

    /// Returns the time between two refreshes.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the time limit for one refresh.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns `true` if the last refresh updated every room in time.
    #[must_use]
    pub fn last_update_success(&self) -> bool {
        self.last_update_success.load(Ordering::Acquire)
    }

    /// Fetches the group for every room.
    ///
    /// Returns `true` if every room was updated within the timeout.
    pub async fn refresh(&self) -> bool {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::debug!(group = %self.group, "Refresh already running, skipping");
            return self.last_update_success();
        };

        let fetch_all = async {
            let mut updated = true;
            for room in &self.rooms {
                updated &= room.fetch(self.group).await.is_updated();
            }
            updated
        };

        let success = match tokio::time::timeout(self.timeout, fetch_all).await {
            Ok(updated) => updated,
            Err(_) => {
                tracing::warn!(
                    group = %self.group,
                    timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    "Refresh timed out"
                );
                false
            }
        };

        self.last_update_success.store(success, Ordering::Release);
        tracing::debug!(group = %self.group, rooms = self.rooms.len(), success, "Refresh finished");
        success
    }

    /// Refreshes on every interval tick until `shutdown` completes.
    ///
    /// The first refresh runs immediately. Ticks missed while a refresh was
    /// running are not made up.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::debug!(group = %self.group, "Coordinator stopped");
                    break;
                }
                _ = ticker.tick() => {
                    self.refresh().await;
                }
            }
        }
    }
}
