use crate::device::Device;
use crate::error::{AdbError, AdbResult};
use crate::protocol::{self, HostCommand, HostOutcome, ResponseStatus};
use crate::track::{self, DeviceTracker};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// Client for the ADB server's host services over TCP.
///
/// Each command opens a fresh TCP connection to the ADB server, matching
/// the real ADB client behavior where host connections are one-shot. The
/// one exception is [`track_devices`](Self::track_devices), whose
/// connection stays open for the life of the returned tracker.
pub struct AdbClient {
    host: String,
    port: u16,
}

impl AdbClient {
    /// Create a client connecting to the default ADB server at `127.0.0.1:5037`.
    pub fn new() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5037,
        }
    }

    /// Create a client connecting to a specific address (useful for testing).
    pub fn with_address(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
        }
    }

    /// Open a new TCP connection to the ADB server.
    async fn open_stream(&self) -> AdbResult<TcpStream> {
        let addr = format!("{}:{}", self.host, self.port);
        debug!("Connecting to ADB server at {}", addr);
        TcpStream::connect(&addr).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::ConnectionRefused {
                AdbError::ConnectionRefused
            } else {
                AdbError::Io(e)
            }
        })
    }

    /// Send one host request and read the complete raw reply.
    ///
    /// The server closes the connection after answering a one-shot host
    /// service, so the reply is read to EOF and classified as a whole.
    async fn command(&self, request: &HostCommand) -> AdbResult<Vec<u8>> {
        let mut stream = self.open_stream().await?;
        debug!("Sending host request {:?}", request.to_wire());
        stream.write_all(&request.encode()).await?;
        let mut resp = Vec::new();
        stream.read_to_end(&mut resp).await?;
        debug!("Received {} response bytes", resp.len());
        Ok(resp)
    }

    /// Build the error for a FAIL status, decoding the message when possible.
    fn fail_error(resp: &[u8]) -> AdbError {
        AdbError::ServerFail(protocol::message_payload(resp).unwrap_or_default())
    }

    // --- Public API ---

    /// Get ADB server protocol version.
    pub async fn server_version(&self) -> AdbResult<u32> {
        let resp = self.command(&HostCommand::Version).await?;
        match protocol::parse_status(&resp)? {
            ResponseStatus::Okay => {
                let hex_str = protocol::message_payload(&resp)?;
                u32::from_str_radix(&hex_str, 16)
                    .map_err(|_| AdbError::Protocol(format!("Invalid version hex: {:?}", hex_str)))
            }
            ResponseStatus::Fail => Err(Self::fail_error(&resp)),
        }
    }

    /// List connected devices (serial and state only).
    pub async fn devices(&self) -> AdbResult<Vec<Device>> {
        let resp = self.command(&HostCommand::Devices).await?;
        match protocol::parse_status(&resp)? {
            ResponseStatus::Okay => Ok(Device::parse_device_list(&protocol::table_payload(&resp))),
            ResponseStatus::Fail => Err(Self::fail_error(&resp)),
        }
    }

    /// List connected devices with the extended fields of `host:devices-l`.
    pub async fn devices_long(&self) -> AdbResult<Vec<Device>> {
        let resp = self.command(&HostCommand::DevicesLong).await?;
        match protocol::parse_status(&resp)? {
            ResponseStatus::Okay => Ok(Device::parse_device_list_long(&protocol::table_payload(
                &resp,
            ))),
            ResponseStatus::Fail => Err(Self::fail_error(&resp)),
        }
    }

    /// Ask the server to connect to a networked device.
    ///
    /// The server answers OKAY with a prose message either way; the message
    /// decides between success, already-connected, and failure.
    pub async fn connect(&self, host: &str, port: u16) -> AdbResult<HostOutcome> {
        let resp = self
            .command(&HostCommand::Connect {
                host: host.to_string(),
                port,
            })
            .await?;
        match protocol::parse_status(&resp)? {
            ResponseStatus::Okay => {
                let msg = protocol::message_payload(&resp)?;
                match HostOutcome::classify(&msg) {
                    HostOutcome::Failed(m) => Err(AdbError::ConnectFailed(m)),
                    HostOutcome::NoSuchDevice(m) => Err(AdbError::NoSuchDevice(m)),
                    outcome => Ok(outcome),
                }
            }
            ResponseStatus::Fail => Err(Self::fail_error(&resp)),
        }
    }

    /// Ask the server to drop a networked device.
    pub async fn disconnect(&self, serial: &str) -> AdbResult<()> {
        let resp = self
            .command(&HostCommand::Disconnect {
                serial: serial.to_string(),
            })
            .await?;
        match protocol::parse_status(&resp)? {
            ResponseStatus::Okay => {
                let msg = protocol::message_payload(&resp)?;
                match HostOutcome::classify(&msg) {
                    HostOutcome::NoSuchDevice(m) => Err(AdbError::NoSuchDevice(m)),
                    _ => Ok(()),
                }
            }
            ResponseStatus::Fail => Err(Self::fail_error(&resp)),
        }
    }

    /// Terminate the ADB server process.
    pub async fn kill(&self) -> AdbResult<()> {
        let resp = self.command(&HostCommand::Kill).await?;
        match protocol::parse_status(&resp)? {
            ResponseStatus::Okay => Ok(()),
            ResponseStatus::Fail => Err(Self::fail_error(&resp)),
        }
    }

    /// Subscribe to device connect/disconnect events.
    ///
    /// Sends `host:track-devices` and consumes the initial OKAY ack; the
    /// returned tracker then yields one device-list snapshot per pushed
    /// frame. Dropping the tracker ends the subscription.
    pub async fn track_devices(&self) -> AdbResult<DeviceTracker> {
        let mut stream = self.open_stream().await?;
        debug!("Opening device tracker");
        stream.write_all(&HostCommand::TrackDevices.encode()).await?;
        let mut status = [0u8; 4];
        stream.read_exact(&mut status).await?;
        match protocol::parse_status(&status)? {
            ResponseStatus::Okay => Ok(DeviceTracker::new(stream)),
            ResponseStatus::Fail => {
                let msg = track::read_frame_payload(&mut stream)
                    .await
                    .unwrap_or_default();
                Err(AdbError::ServerFail(
                    String::from_utf8_lossy(&msg).to_string(),
                ))
            }
        }
    }
}

impl Default for AdbClient {
    fn default() -> Self {
        Self::new()
    }
}
