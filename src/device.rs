use std::fmt;

/// State of a connected ADB device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceState {
    /// Fully operational device.
    Device,
    /// Device is offline.
    Offline,
    /// Device requires USB debugging authorization.
    Unauthorized,
    /// Device is in the process of being authorized.
    Authorizing,
    /// Insufficient permissions to communicate with device.
    NoPermissions,
    /// Unknown state from the ADB server.
    Unknown(String),
}

impl DeviceState {
    pub fn parse(s: &str) -> Self {
        match s {
            "device" => DeviceState::Device,
            "offline" => DeviceState::Offline,
            "unauthorized" => DeviceState::Unauthorized,
            "authorizing" => DeviceState::Authorizing,
            "no permissions" => DeviceState::NoPermissions,
            other => DeviceState::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceState::Device => write!(f, "device"),
            DeviceState::Offline => write!(f, "offline"),
            DeviceState::Unauthorized => write!(f, "unauthorized"),
            DeviceState::Authorizing => write!(f, "authorizing"),
            DeviceState::NoPermissions => write!(f, "no permissions"),
            DeviceState::Unknown(s) => write!(f, "{}", s),
        }
    }
}

/// One row of the ADB device registry.
///
/// The short listing fills only `serial` and `state`; the long listing
/// (`host:devices-l`) adds the descriptive fields when the server supplies
/// them. `device` is the product code name, keyed `device:` on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub serial: String,
    pub state: DeviceState,
    pub product: String,
    pub model: String,
    pub device: String,
    /// Numeric transport handle; 0 when absent or unparsable.
    pub transport_id: u32,
}

impl Device {
    fn new(serial: &str, state: &str) -> Self {
        Self {
            serial: serial.to_string(),
            state: DeviceState::parse(state),
            product: String::new(),
            model: String::new(),
            device: String::new(),
            transport_id: 0,
        }
    }

    /// Parse the `serial\tstate\n` table returned by `host:devices` and by
    /// each `host:track-devices` frame.
    ///
    /// Example input: `"emulator-5554\tdevice\nR5CT200XXXX\tunauthorized\n"`
    ///
    /// Lines with fewer than two tab-separated tokens are dropped.
    pub fn parse_device_list(data: &str) -> Vec<Device> {
        data.lines()
            .filter(|line| !line.is_empty())
            .filter_map(|line| {
                let mut parts = line.split('\t');
                let serial = parts.next()?;
                let state = parts.next()?;
                Some(Device::new(serial, state))
            })
            .collect()
    }

    /// Parse the whitespace-delimited table returned by `host:devices-l`.
    ///
    /// Example line:
    /// `"emulator-5554  device product:sdk_gphone64 model:Pixel_6 device:emu64a transport_id:1"`
    ///
    /// The first two fields are serial and state; the rest are scanned for
    /// known `key:value` pairs and anything unrecognized is ignored.
    pub fn parse_device_list_long(data: &str) -> Vec<Device> {
        data.lines()
            .filter_map(|line| {
                let mut fields = line.trim().split_whitespace();
                let serial = fields.next()?;
                let state = fields.next()?;
                let mut dev = Device::new(serial, state);
                for field in fields {
                    if let Some(v) = field.strip_prefix("product:") {
                        dev.product = v.to_string();
                    } else if let Some(v) = field.strip_prefix("model:") {
                        dev.model = v.to_string();
                    } else if let Some(v) = field.strip_prefix("device:") {
                        dev.device = v.to_string();
                    } else if let Some(v) = field.strip_prefix("transport_id:") {
                        dev.transport_id = v.parse().unwrap_or(0);
                    }
                }
                Some(dev)
            })
            .collect()
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.serial, self.state)
    }
}
