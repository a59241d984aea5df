use crate::error::{AdbError, AdbResult};

// ADB host protocol framing:
//
// Request:  {4-digit hex length}{payload}
// Response: OKAY[{4-digit length}{data}]
//       or: FAIL{4-digit length}{error_message}
//
// Device-table responses (host:devices, host:devices-l) put the table
// directly after the 8-byte header; message responses (host:connect,
// host:disconnect, host:version) declare the payload length.

/// Format a request for the ADB server.
///
/// Encodes as `"{:04X}{payload}"` where the hex length is the payload byte length.
pub fn encode_request(payload: &str) -> Vec<u8> {
    format!("{:04X}{}", payload.len(), payload).into_bytes()
}

/// The two response statuses the host protocol defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Okay,
    Fail,
}

/// Classify the 4-byte status prefix of a raw response buffer.
///
/// Anything other than `OKAY`/`FAIL` is reported with the full raw buffer
/// so the caller can see what the server actually sent.
pub fn parse_status(buf: &[u8]) -> AdbResult<ResponseStatus> {
    if buf.len() < 4 {
        return Err(AdbError::Protocol(format!(
            "Response too short: {} bytes, need 4",
            buf.len()
        )));
    }
    match &buf[..4] {
        b"OKAY" => Ok(ResponseStatus::Okay),
        b"FAIL" => Ok(ResponseStatus::Fail),
        _ => Err(AdbError::UnexpectedResponse {
            raw: String::from_utf8_lossy(buf).to_string(),
        }),
    }
}

/// Extract the declared-length message payload from a raw response buffer.
///
/// Bytes 4..8 hold the payload size, the payload follows, and surrounding
/// newlines are trimmed off.
///
/// TODO: the length is parsed as decimal here while the protocol docs
/// specify hex; confirm against a live server before relying on messages
/// longer than 9 bytes in any digit position.
pub fn message_payload(buf: &[u8]) -> AdbResult<String> {
    if buf.len() < 8 {
        return Err(AdbError::Protocol(format!(
            "Response header too short: {} bytes, need 8",
            buf.len()
        )));
    }
    let len_str = std::str::from_utf8(&buf[4..8])
        .map_err(|_| AdbError::Protocol(format!("Invalid UTF-8 in length: {:?}", &buf[4..8])))?;
    let len: usize = len_str
        .parse()
        .map_err(|_| AdbError::Protocol(format!("Invalid length: {:?}", len_str)))?;
    if buf.len() < 8 + len {
        return Err(AdbError::Protocol(format!(
            "Truncated response: declared {} payload bytes, have {}",
            len,
            buf.len() - 8
        )));
    }
    let payload = String::from_utf8_lossy(&buf[8..8 + len]);
    Ok(payload.trim_matches('\n').to_string())
}

/// Extract the device-table payload from a raw response buffer.
///
/// Tables are not length-declared; everything after the 8-byte header is
/// the table. Shorter buffers (a bare `OKAY`) yield an empty table.
pub fn table_payload(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf.get(8..).unwrap_or_default()).to_string()
}

/// Parse a 4-character hex length string into a `usize`.
pub fn parse_hex_length(buf: &[u8]) -> AdbResult<usize> {
    if buf.len() < 4 {
        return Err(AdbError::Protocol(format!(
            "Hex length too short: {} bytes, need 4",
            buf.len()
        )));
    }
    let hex_str = std::str::from_utf8(&buf[..4])
        .map_err(|_| AdbError::Protocol(format!("Invalid UTF-8 in hex length: {:?}", &buf[..4])))?;
    usize::from_str_radix(hex_str, 16)
        .map_err(|_| AdbError::Protocol(format!("Invalid hex length: {:?}", hex_str)))
}

/// Host services understood by the ADB server itself.
#[derive(Debug, Clone)]
pub enum HostCommand {
    /// Get ADB server protocol version.
    Version,
    /// List connected devices in short format.
    Devices,
    /// List connected devices with extended info.
    DevicesLong,
    /// Stream device connect/disconnect events.
    TrackDevices,
    /// Connect to a networked device.
    Connect { host: String, port: u16 },
    /// Drop a networked device.
    Disconnect { serial: String },
    /// Kill the ADB server.
    Kill,
}

impl HostCommand {
    /// Convert the command to its wire format string.
    pub fn to_wire(&self) -> String {
        match self {
            HostCommand::Version => "host:version".to_string(),
            HostCommand::Devices => "host:devices".to_string(),
            HostCommand::DevicesLong => "host:devices-l".to_string(),
            HostCommand::TrackDevices => "host:track-devices".to_string(),
            HostCommand::Connect { host, port } => format!("host:connect:{}:{}", host, port),
            HostCommand::Disconnect { serial } => format!("host:disconnect:{}", serial),
            HostCommand::Kill => "host:kill".to_string(),
        }
    }

    /// Encode the command as a full request (with length prefix).
    pub fn encode(&self) -> Vec<u8> {
        encode_request(&self.to_wire())
    }
}

/// Frame keywords of the sync (file-transfer) sub-protocol.
///
/// Recognized so the token set is closed, but never interpreted here; sync
/// transfers are handled by the device side of the bridge, not the host
/// services this client speaks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncToken {
    Data,
    Send,
    Done,
    Recv,
    Stat,
    List,
    Dent,
}

impl SyncToken {
    /// The 4-byte ASCII representation of this keyword.
    pub fn as_bytes(&self) -> &[u8; 4] {
        match self {
            SyncToken::Data => b"DATA",
            SyncToken::Send => b"SEND",
            SyncToken::Done => b"DONE",
            SyncToken::Recv => b"RECV",
            SyncToken::Stat => b"STAT",
            SyncToken::List => b"LIST",
            SyncToken::Dent => b"DENT",
        }
    }

    /// Parse a 4-byte ASCII slice into a `SyncToken`.
    pub fn from_bytes(bytes: &[u8]) -> AdbResult<SyncToken> {
        if bytes.len() < 4 {
            return Err(AdbError::Protocol(format!(
                "Sync token too short: {} bytes, need 4",
                bytes.len()
            )));
        }
        match &bytes[..4] {
            b"DATA" => Ok(SyncToken::Data),
            b"SEND" => Ok(SyncToken::Send),
            b"DONE" => Ok(SyncToken::Done),
            b"RECV" => Ok(SyncToken::Recv),
            b"STAT" => Ok(SyncToken::Stat),
            b"LIST" => Ok(SyncToken::List),
            b"DENT" => Ok(SyncToken::Dent),
            other => Err(AdbError::Protocol(format!(
                "Unknown sync token: {:?}",
                String::from_utf8_lossy(other)
            ))),
        }
    }
}

/// Semantic outcome of a `host:connect`/`host:disconnect` reply.
///
/// The server answers these with natural-language text on an OKAY status,
/// so success is detected by substring matching. Every phrase the client
/// depends on lives in this one table; ADB server versions have been known
/// to reword these messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOutcome {
    Success,
    AlreadyConnected,
    Failed(String),
    NoSuchDevice(String),
}

const FAILED_PHRASES: &[&str] = &["failed to connect", "unable to connect to"];
const NO_SUCH_DEVICE_PHRASE: &str = "No such device";
const ALREADY_CONNECTED_PHRASE: &str = "already connected to";

impl HostOutcome {
    /// Map a reply message onto an outcome. Unrecognized text is success.
    pub fn classify(message: &str) -> HostOutcome {
        if FAILED_PHRASES.iter().any(|p| message.contains(p)) {
            return HostOutcome::Failed(message.to_string());
        }
        if message.contains(NO_SUCH_DEVICE_PHRASE) {
            return HostOutcome::NoSuchDevice(message.to_string());
        }
        if message.contains(ALREADY_CONNECTED_PHRASE) {
            return HostOutcome::AlreadyConnected;
        }
        HostOutcome::Success
    }
}
