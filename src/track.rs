use crate::device::Device;
use crate::error::{AdbError, AdbResult};
use crate::protocol;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tracing::debug;

/// Read one hex-length-prefixed payload from a track connection.
pub(crate) async fn read_frame_payload(stream: &mut TcpStream) -> AdbResult<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    stream.read_exact(&mut len_buf).await?;
    let len = protocol::parse_hex_length(&len_buf)?;
    let mut data = vec![0u8; len];
    stream.read_exact(&mut data).await?;
    Ok(data)
}

/// A live `host:track-devices` subscription.
///
/// The server pushes a full device-list snapshot whenever the registry
/// changes; each [`next_event`](Self::next_event) call reads exactly one
/// pushed frame, so snapshots arrive in order and never overlap. Dropping
/// the tracker closes the connection and ends the subscription.
#[derive(Debug)]
pub struct DeviceTracker {
    stream: TcpStream,
}

impl DeviceTracker {
    pub(crate) fn new(stream: TcpStream) -> Self {
        Self { stream }
    }

    /// Wait for the next device-list snapshot.
    ///
    /// Returns `Ok(None)` when the server closes the stream. A `FAIL`
    /// frame yields one `Err` and the tracker stays usable; the next call
    /// resumes reading where the error left off.
    pub async fn next_event(&mut self) -> AdbResult<Option<Vec<Device>>> {
        let mut header = [0u8; 4];
        match self.stream.read_exact(&mut header).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                debug!("Device tracker stream closed");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        }
        if &header == b"FAIL" {
            let msg = read_frame_payload(&mut self.stream).await.unwrap_or_default();
            return Err(AdbError::ServerFail(
                String::from_utf8_lossy(&msg).to_string(),
            ));
        }
        let len = protocol::parse_hex_length(&header)?;
        let mut payload = vec![0u8; len];
        self.stream.read_exact(&mut payload).await?;
        debug!("Device tracker frame: {} bytes", len);
        let table = String::from_utf8_lossy(&payload);
        Ok(Some(Device::parse_device_list(&table)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AdbClient;
    use crate::device::DeviceState;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    /// Frame a device table the way the server does: 4-hex-digit length + payload.
    fn frame(payload: &str) -> Vec<u8> {
        let mut buf = format!("{:04X}", payload.len()).into_bytes();
        buf.extend_from_slice(payload.as_bytes());
        buf
    }

    /// Spawn a mock server that acks the track request and then writes the
    /// given byte sequence before closing.
    async fn mock_track_server(frames: Vec<u8>) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 256];
            let _ = socket.read(&mut buf).await;
            socket.write_all(b"OKAY").await.unwrap();
            socket.write_all(&frames).await.unwrap();
        });
        port
    }

    #[tokio::test]
    async fn test_track_single_snapshot() {
        let port = mock_track_server(frame("serA\tdevice\n")).await;

        let client = AdbClient::with_address("127.0.0.1", port);
        let mut tracker = client.track_devices().await.unwrap();

        let devices = tracker.next_event().await.unwrap().unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].serial, "serA");
        assert_eq!(devices[0].state, DeviceState::Device);

        assert!(tracker.next_event().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_track_fail_frame_keeps_stream_alive() {
        let mut frames = frame("serA\tdevice\n");
        frames.extend_from_slice(b"FAIL");
        frames.extend_from_slice(&frame("closed"));
        frames.extend_from_slice(&frame("serA\tdevice\nserB\toffline\n"));
        let port = mock_track_server(frames).await;

        let client = AdbClient::with_address("127.0.0.1", port);
        let mut tracker = client.track_devices().await.unwrap();

        assert_eq!(tracker.next_event().await.unwrap().unwrap().len(), 1);

        match tracker.next_event().await {
            Err(AdbError::ServerFail(msg)) => assert_eq!(msg, "closed"),
            other => panic!("Expected ServerFail, got {:?}", other),
        }

        // The FAIL frame must not tear the subscription down.
        let devices = tracker.next_event().await.unwrap().unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[1].serial, "serB");

        assert!(tracker.next_event().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_track_empty_snapshot() {
        let port = mock_track_server(frame("")).await;

        let client = AdbClient::with_address("127.0.0.1", port);
        let mut tracker = client.track_devices().await.unwrap();

        let devices = tracker.next_event().await.unwrap().unwrap();
        assert!(devices.is_empty());
    }

    #[tokio::test]
    async fn test_track_malformed_frame_degrades_one_call() {
        let mut frames = b"ZZZZ".to_vec();
        frames.extend_from_slice(&frame("serA\tdevice\n"));
        let port = mock_track_server(frames).await;

        let client = AdbClient::with_address("127.0.0.1", port);
        let mut tracker = client.track_devices().await.unwrap();

        assert!(matches!(
            tracker.next_event().await,
            Err(AdbError::Protocol(_))
        ));

        // The bad header was consumed; the stream carries on.
        let devices = tracker.next_event().await.unwrap().unwrap();
        assert_eq!(devices[0].serial, "serA");
    }

    #[tokio::test]
    async fn test_track_initial_fail() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 256];
            let _ = socket.read(&mut buf).await;
            socket.write_all(b"FAIL").await.unwrap();
            socket.write_all(&frame("cannot track")).await.unwrap();
        });

        let client = AdbClient::with_address("127.0.0.1", port);
        match client.track_devices().await {
            Err(AdbError::ServerFail(msg)) => assert_eq!(msg, "cannot track"),
            other => panic!("Expected ServerFail, got {:?}", other),
        }
    }
}
