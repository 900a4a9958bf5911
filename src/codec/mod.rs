// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request and response documents of the Bestin XML protocol.
//!
//! Requests are small `imap` envelopes naming a service, an action and three
//! parameters. The controller is picky about the exact byte layout of the
//! envelope, including the spacing around `=` and the quote characters
//! around the action text, so [`Request::to_xml`] reproduces it literally.
//!
//! # Examples
//!
//! ```
//! use bestin_lib::codec::{Request, Service};
//!
//! let request = Request::status(Service::Light).with_dev_num(3);
//! let xml = request.to_xml("192.168.50.200");
//! assert!(xml.contains(r#"name = "remote_access_light""#));
//! assert!(xml.contains(r#"<action>"status"</action>"#));
//! assert!(xml.contains(r#"dev_num = "3" unit_num = "null" ctrl_action = "null""#));
//! ```

mod response;

pub use response::{StatusInfo, parse_body, parse_response};

use std::fmt;

use quick_xml::escape::escape;

/// Controller service a request is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Lights of every room except the living room.
    Light,
    /// Lights of the living room.
    LivingLight,
    /// Wall outlets.
    Electric,
    /// Floor heating thermostats.
    Temper,
}

impl Service {
    /// Returns the service name used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "remote_access_light",
            Self::LivingLight => "remote_access_livinglight",
            Self::Electric => "remote_access_electric",
            Self::Temper => "remote_access_temper",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a request asks the service to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Report the current status.
    Status,
    /// Change state, then report the resulting status.
    Control,
}

impl Action {
    /// Returns the action name used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Control => "control",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single protocol request.
///
/// Parameters that are not set are sent as the literal string `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    service: Service,
    action: Action,
    dev_num: String,
    unit_num: String,
    ctrl_action: String,
}

impl Request {
    /// Placeholder sent for parameters that are not set.
    pub const NULL: &'static str = "null";

    /// Creates a request for `service` with all parameters unset.
    #[must_use]
    pub fn new(service: Service, action: Action) -> Self {
        Self {
            service,
            action,
            dev_num: Self::NULL.to_string(),
            unit_num: Self::NULL.to_string(),
            ctrl_action: Self::NULL.to_string(),
        }
    }

    /// Creates a status request.
    #[must_use]
    pub fn status(service: Service) -> Self {
        Self::new(service, Action::Status)
    }

    /// Creates a control request.
    #[must_use]
    pub fn control(service: Service) -> Self {
        Self::new(service, Action::Control)
    }

    /// Sets the device number.
    #[must_use]
    pub fn with_dev_num(mut self, dev_num: impl fmt::Display) -> Self {
        self.dev_num = dev_num.to_string();
        self
    }

    /// Sets the unit number.
    #[must_use]
    pub fn with_unit_num(mut self, unit_num: impl fmt::Display) -> Self {
        self.unit_num = unit_num.to_string();
        self
    }

    /// Sets the control action.
    #[must_use]
    pub fn with_ctrl_action(mut self, ctrl_action: impl fmt::Display) -> Self {
        self.ctrl_action = ctrl_action.to_string();
        self
    }

    /// Returns the target service.
    #[must_use]
    pub fn service(&self) -> Service {
        self.service
    }

    /// Returns the action.
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// Returns the device number.
    #[must_use]
    pub fn dev_num(&self) -> &str {
        &self.dev_num
    }

    /// Returns the unit number.
    #[must_use]
    pub fn unit_num(&self) -> &str {
        &self.unit_num
    }

    /// Returns the control action.
    #[must_use]
    pub fn ctrl_action(&self) -> &str {
        &self.ctrl_action
    }

    /// Serializes the request as sent to the controller at `host`.
    #[must_use]
    pub fn to_xml(&self, host: &str) -> String {
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="utf-8"?>"#,
                r#"<imap ver = "1.0" address ="{host}" sender = "mobile">"#,
                "\t",
                r#"<service type = "request" name = "{service}">"#,
                "\t\t",
                r#"<target name = "internet" id = "1" msg_no = "11"/>"#,
                "\t\t",
                r#"<action>"{action}"</action>"#,
                "\t\t",
                r#"<params dev_num = "{dev_num}" unit_num = "{unit_num}" ctrl_action = "{ctrl_action}"/>"#,
                "\t",
                "</service>",
                "</imap>",
            ),
            host = escape(host),
            service = self.service,
            action = self.action,
            dev_num = escape(self.dev_num.as_str()),
            unit_num = escape(self.unit_num.as_str()),
            ctrl_action = escape(self.ctrl_action.as_str()),
        )
    }
}
