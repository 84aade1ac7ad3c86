use crate::{DeviceKind, RestoreError};

/// Access to the audio server's device registry.
///
/// Implemented by the host; the PulseAudio daemon backs it with
/// `pulsectl` controllers.
pub trait DefaultDeviceLookup {
    /// True when the user configured a default for `kind` outside of this
    /// module. Restore never overwrites such a default.
    fn has_manual_default(&self, kind: DeviceKind) -> bool;

    /// True when a device called `name` exists and may become the default
    fn resolve(&self, name: &str, kind: DeviceKind) -> bool;

    /// Make `name` the live default. May emit change notifications.
    fn set_default(&self, name: &str, kind: DeviceKind);

    /// Name of the current default device, `Ok(None)` when the server has
    /// none. A server that cannot be asked is `Err(RestoreError::Query)`,
    /// never `Ok(None)`.
    fn current_default_name(&self, kind: DeviceKind) -> Result<Option<String>, RestoreError>;
}
