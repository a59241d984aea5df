mod client;
mod device;
mod error;
mod protocol;
mod track;

pub use client::AdbClient;
pub use device::{Device, DeviceState};
pub use error::{AdbError, AdbResult};
pub use protocol::{HostCommand, HostOutcome, ResponseStatus, SyncToken};
pub use track::DeviceTracker;
