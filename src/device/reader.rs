use crate::device::snapshot::DeviceSnapshot;

// Device errors
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("No gamepad available: {0}")]
    Unavailable(String),

    #[error("Failed to read gamepad state: {0}")]
    ReadFailed(String),
}

/// Capability to read one snapshot of raw controller state
///
/// Implementations wrap different underlying APIs but all expose this single
/// synchronous snapshot operation. `poll` must stay within one frame budget
/// (~16 ms target) and never block waiting for hardware; the polling session
/// treats an overlong poll as a tick miss.
///
/// # Errors
///
/// * [`DeviceError::Unavailable`] - no controller detected or the active one
///   disconnected
/// * [`DeviceError::ReadFailed`] - transient failure reading driver state
pub trait DeviceReader: Send {
    fn poll(&mut self) -> Result<DeviceSnapshot, DeviceError>;
}
