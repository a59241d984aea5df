use adb_host_client::AdbClient;
use std::time::Duration;

#[tokio::test]
#[ignore] // Requires: adb start-server
async fn test_real_server_version() {
    let client = AdbClient::new();
    let version = client.server_version().await.unwrap();
    assert!(
        version > 0,
        "ADB version should be positive, got {}",
        version
    );
    println!("ADB server version: {}", version);
}

#[tokio::test]
#[ignore] // Requires: adb start-server
async fn test_real_devices() {
    let client = AdbClient::new();
    let devices = client.devices().await.unwrap();
    println!("Found {} device(s):", devices.len());
    for d in &devices {
        println!("  {} - {}", d.serial, d.state);
    }
}

#[tokio::test]
#[ignore] // Requires: adb start-server
async fn test_real_devices_long() {
    let client = AdbClient::new();
    let devices = client.devices_long().await.unwrap();
    for d in &devices {
        println!(
            "  {} - {} product:{} model:{} transport_id:{}",
            d.serial, d.state, d.product, d.model, d.transport_id
        );
    }
}

#[tokio::test]
#[ignore] // Requires: adb start-server
async fn test_real_track_initial_snapshot() {
    let client = AdbClient::new();
    let mut tracker = client.track_devices().await.unwrap();
    // The server pushes the current registry right after the ack.
    let event = tokio::time::timeout(Duration::from_secs(5), tracker.next_event())
        .await
        .expect("no initial snapshot within 5s")
        .unwrap();
    let devices = event.expect("stream closed before initial snapshot");
    println!("Initial snapshot: {} device(s)", devices.len());
}
