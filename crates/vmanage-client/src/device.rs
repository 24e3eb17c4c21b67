use tracing::debug;

use vmanage::device::{CliModeRequest, DataRecord, Device, DeviceCategory, DeviceType};

use crate::client::Client;
use crate::collection::{Dict, list_to_dict};
use crate::error::Result;
use crate::response::{parse_list, parse_status};
use crate::transport::{Method, Transport};

const CLI_MODE_API: &str = "template/config/device/mode/cli";

/// The device inventory API of a controller.
#[derive(Debug)]
pub struct DeviceInventory<'client, T: Transport> {
    client: &'client Client<T>,
}

impl<'client, T: Transport> DeviceInventory<'client, T> {
    pub(crate) const fn new(client: &'client Client<T>) -> Self {
        Self { client }
    }

    /// Retrieves the devices of a [`DeviceCategory`].
    ///
    /// # Errors
    ///
    /// An error is returned when the response is not a list of devices.
    /// Network failures and non-successful statuses are returned unchanged.
    pub async fn list(&self, category: DeviceCategory) -> Result<Vec<Device>> {
        self.config_list(category).await
    }

    /// Switches a device to CLI mode and returns the HTTP status code.
    ///
    /// # Errors
    ///
    /// An error is returned when the request cannot be encoded.
    /// Network failures and non-successful statuses are returned unchanged.
    pub async fn set_cli_mode(
        &self,
        device_id: &str,
        device_ip: &str,
        device_type: DeviceType,
    ) -> Result<u16> {
        let payload =
            serde_json::to_string(&CliModeRequest::single(device_id, device_ip, device_type))?;
        let response = self
            .client
            .send(Method::POST, CLI_MODE_API, Some(payload))
            .await?;
        Ok(parse_status(&response))
    }

    /// Retrieves the status of all devices.
    ///
    /// # Errors
    ///
    /// An error is returned when the response is not a list of devices.
    /// Network failures and non-successful statuses are returned unchanged.
    pub async fn status_list(&self) -> Result<Vec<Device>> {
        parse_list(self.client.get("device/").await?)
    }

    /// Retrieves the status of all devices as a [`Dict`] keyed by the
    /// value of the `key_name` field, usually
    /// [`HOST_NAME`](vmanage::device::HOST_NAME).
    ///
    /// # Errors
    ///
    /// The same errors of [`Self::status_list`].
    pub async fn status_dict(&self, key_name: &str, remove_key: bool) -> Result<Dict<Device>> {
        let devices = self.status_list().await?;
        Ok(list_to_dict(devices, key_name, remove_key))
    }

    /// Retrieves the status of the device whose `key` field, usually
    /// [`SYSTEM_IP`](vmanage::device::SYSTEM_IP), has the given value.
    ///
    /// Returns `None` when no device matches.
    ///
    /// # Errors
    ///
    /// An error is returned when the response is not a list of devices.
    /// Network failures and non-successful statuses are returned unchanged.
    pub async fn status(&self, value: &str, key: &str) -> Result<Option<Device>> {
        let devices = parse_list(self.client.get_query("device", &[(key, value)]).await?)?;
        Ok(first_device(devices, key, value))
    }

    /// Retrieves the configuration of the device of a [`DeviceCategory`]
    /// whose `key` field has the given value.
    ///
    /// Returns `None` when no device matches.
    ///
    /// # Errors
    ///
    /// An error is returned when the response is not a list of devices.
    /// Network failures and non-successful statuses are returned unchanged.
    pub async fn config(
        &self,
        category: DeviceCategory,
        value: &str,
        key: &str,
    ) -> Result<Option<Device>> {
        let devices = parse_list(
            self.client
                .get_query(&format!("system/device/{category}"), &[(key, value)])
                .await?,
        )?;
        Ok(first_device(devices, key, value))
    }

    /// Retrieves the configuration of all devices of a [`DeviceCategory`].
    ///
    /// # Errors
    ///
    /// An error is returned when the response is not a list of devices.
    /// Network failures and non-successful statuses are returned unchanged.
    pub async fn config_list(&self, category: DeviceCategory) -> Result<Vec<Device>> {
        parse_list(
            self.client
                .get(&format!("system/device/{category}"))
                .await?,
        )
    }

    /// Retrieves the configuration of all devices of a [`DeviceCategory`]
    /// as a [`Dict`] keyed by the value of the `key_name` field.
    ///
    /// # Errors
    ///
    /// The same errors of [`Self::config_list`].
    pub async fn config_dict(
        &self,
        category: DeviceCategory,
        key_name: &str,
        remove_key: bool,
    ) -> Result<Dict<Device>> {
        let devices = self.config_list(category).await?;
        Ok(list_to_dict(devices, key_name, remove_key))
    }

    /// Retrieves the data found at `path` on the device with the given IP,
    /// e.g. `interface` or `ip/routetable`.
    ///
    /// # Errors
    ///
    /// An error is returned when the response is not a list of records.
    /// Network failures and non-successful statuses are returned unchanged.
    pub async fn data(&self, path: &str, device_ip: &str) -> Result<Vec<DataRecord>> {
        let path = path.trim_matches('/');
        parse_list(
            self.client
                .get_query(&format!("device/{path}"), &[("deviceId", device_ip)])
                .await?,
        )
    }
}

fn first_device(devices: Vec<Device>, key: &str, value: &str) -> Option<Device> {
    let device = devices.into_iter().next();
    if device.is_none() {
        debug!("No device with `{key}` equal to `{value}`");
    }
    device
}
