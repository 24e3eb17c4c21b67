use serde::{Deserialize, Serialize};

use crate::macros::record;

/// The default field used to look up a single device.
pub const SYSTEM_IP: &str = "system-ip";

/// The default field used to key a collection of devices.
pub const HOST_NAME: &str = "host-name";

/// Device inventory categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceCategory {
    /// Edge routers.
    Vedges,
    /// Controllers, such as vSmart and vBond.
    Controllers,
}

impl DeviceCategory {
    /// Returns the [`DeviceCategory`] name, as used in request paths.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vedges => "vedges",
            Self::Controllers => "controllers",
        }
    }
}

impl std::fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.name().fmt(f)
    }
}

/// Device types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// An edge router.
    Vedge,
    /// A controller.
    Controller,
}

impl DeviceType {
    /// Returns the [`DeviceType`] name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vedge => "vedge",
            Self::Controller => "controller",
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.name().fmt(f)
    }
}

record! {
    /// A device row, describing either the status or the configuration
    /// of a device.
    pub struct Device;
}

impl Device {
    /// Returns the device host name.
    #[must_use]
    #[inline]
    pub fn host_name(&self) -> Option<&str> {
        self.get_str(HOST_NAME)
    }

    /// Returns the device system IP.
    #[must_use]
    #[inline]
    pub fn system_ip(&self) -> Option<&str> {
        self.get_str(SYSTEM_IP)
    }

    /// Returns the device identifier.
    #[must_use]
    #[inline]
    pub fn device_id(&self) -> Option<&str> {
        self.get_str("deviceId")
    }
}

record! {
    /// A generic data row produced by a device, such as an interface or
    /// a routing table entry.
    pub struct DataRecord;
}

/// A device to switch to CLI mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliModeDevice {
    /// Device identifier.
    #[serde(rename = "deviceId")]
    pub device_id: String,
    /// Device system IP.
    #[serde(rename = "deviceIP")]
    pub device_ip: String,
}

/// A request to switch devices to CLI mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliModeRequest {
    /// Type of all the devices in the request.
    pub device_type: DeviceType,
    /// Devices to switch.
    pub devices: Vec<CliModeDevice>,
}

impl CliModeRequest {
    /// Creates a [`CliModeRequest`] for a single device.
    #[must_use]
    pub fn single(
        device_id: impl Into<String>,
        device_ip: impl Into<String>,
        device_type: DeviceType,
    ) -> Self {
        Self {
            device_type,
            devices: vec![CliModeDevice {
                device_id: device_id.into(),
                device_ip: device_ip.into(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{deserialize, serialize};

    use super::{CliModeRequest, Device, DeviceCategory, DeviceType};

    #[test]
    fn cli_mode_request() {
        assert_eq!(
            serialize(CliModeRequest::single(
                "uuid-1",
                "10.0.0.1",
                DeviceType::Vedge
            )),
            json!({
                "deviceType": "vedge",
                "devices": [{ "deviceId": "uuid-1", "deviceIP": "10.0.0.1" }],
            })
        );
    }

    #[test]
    fn device_names() {
        assert_eq!(DeviceCategory::Vedges.to_string(), "vedges");
        assert_eq!(DeviceCategory::Controllers.name(), "controllers");
        assert_eq!(DeviceType::Controller.to_string(), "controller");
        assert_eq!(serialize(DeviceType::Vedge), json!("vedge"));
    }

    #[test]
    fn device_accessors() {
        let device: Device = deserialize(json!({
            "host-name": "edge-1",
            "system-ip": "1.1.1.1",
            "deviceId": "1.1.1.1",
            "reachability": "reachable",
        }));

        assert_eq!(device.host_name(), Some("edge-1"));
        assert_eq!(device.system_ip(), Some("1.1.1.1"));
        assert_eq!(device.device_id(), Some("1.1.1.1"));
        assert_eq!(device.get_str("reachability"), Some("reachable"));
        assert_eq!(device.len(), 4);
    }
}
