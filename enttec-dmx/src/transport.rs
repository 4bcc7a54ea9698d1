use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parity {
    None,
    Odd,
    Even,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

/// Line settings used when opening a port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortSettings {
    pub baud_rate: u32,
    pub parity: Parity,
    pub data_bits: u8,
    pub stop_bits: StopBits,
}

impl PortSettings {
    /// What the DMX USB Pro expects: 115200 baud, 8N1.
    pub const DMX_USB_PRO: Self = Self {
        baud_rate: 115_200,
        parity: Parity::None,
        data_bits: 8,
        stop_bits: StopBits::One,
    };
}

impl Default for PortSettings {
    fn default() -> Self {
        Self::DMX_USB_PRO
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("couldn't open port {port}: {reason}")]
    Open { port: String, reason: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("the port has not been opened")]
    NotOpen,
}

/// The byte pipe a [`crate::DmxWriter`] sends its packets through.
///
/// Implementations own the actual device handle. None of the methods are called
/// concurrently on the same transport; the writer takes `&mut self` for all of them.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Open `port_name` with the given line settings.
    async fn open(&mut self, port_name: &str, settings: PortSettings)
    -> Result<(), TransportError>;

    /// Write the whole buffer to the port.
    async fn write(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// Close the port. Closing a transport that isn't open is not an error.
    async fn close(&mut self) -> Result<(), TransportError>;

    /// Close the port if needed and release the handle.
    async fn dispose(&mut self) -> Result<(), TransportError>;

    fn is_open(&self) -> bool;

    /// The name of the port this transport was opened on, if any.
    fn port_name(&self) -> Option<&str>;
}
