use std::fmt;

/// Which side of the audio graph a default device belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Output device
    Sink,
    /// Input device
    Source,
}

impl DeviceKind {
    /// Sink first, then source. Restore and save both walk this order.
    pub const ALL: [DeviceKind; 2] = [DeviceKind::Sink, DeviceKind::Source];

    /// File name of the state file holding the saved default
    pub fn state_file_name(self) -> &'static str {
        match self {
            DeviceKind::Sink => "default-sink",
            DeviceKind::Source => "default-source",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceKind::Sink => "sink",
            DeviceKind::Source => "source",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
