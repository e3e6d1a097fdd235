/// CSV export of step results.
pub mod export;
/// JSON device payloads.
pub mod payload;

pub use export::{export_csv, write_csv};
pub use payload::{DevicePayload, PayloadContext};
