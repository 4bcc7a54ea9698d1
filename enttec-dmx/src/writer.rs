use log::{debug, trace};
use thiserror::Error;

use crate::{
    MAX_PAYLOAD_SIZE, MIN_PAYLOAD_SIZE, packet::build_packet, payload_size_ok,
    transport::{PortSettings, Transport, TransportError},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriterState {
    Unopened,
    Open,
    Closed,
    /// The transport was released. Only a new writer can be opened again.
    Disposed,
}

#[derive(Debug, Error)]
pub enum DmxError {
    #[error(
        "DMX data must be at least {min} and no more than {max} bytes, got {len}",
        min = MIN_PAYLOAD_SIZE,
        max = MAX_PAYLOAD_SIZE
    )]
    PayloadSize { len: usize },
    #[error("the port has not been opened")]
    NotOpen,
    #[error("there is already a port open")]
    AlreadyOpen,
    #[error("the port name is empty")]
    InvalidPortName,
    #[error("the writer has been disposed")]
    Disposed,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Sends DMX frames to an Enttec DMX USB Pro through a [`Transport`].
///
/// Every call takes `&mut self`, so a writer can't be re-entered while an open,
/// write or close is in flight. Share it behind a mutex or a single owning task.
pub struct DmxWriter<T> {
    transport: T,
    state: WriterState,
}

impl<T: Transport> DmxWriter<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: WriterState::Unopened,
        }
    }

    /// Open the port with [`PortSettings::DMX_USB_PRO`].
    ///
    /// A closed writer may be opened again, possibly on another port.
    pub async fn open(&mut self, port_name: &str) -> Result<(), DmxError> {
        match self.state {
            WriterState::Open => return Err(DmxError::AlreadyOpen),
            WriterState::Disposed => return Err(DmxError::Disposed),
            WriterState::Unopened | WriterState::Closed => {}
        }
        if self.transport.is_open() {
            return Err(DmxError::AlreadyOpen);
        }
        if port_name.is_empty() {
            return Err(DmxError::InvalidPortName);
        }
        debug!("opening {port_name}");
        self.transport
            .open(port_name, PortSettings::DMX_USB_PRO)
            .await?;
        self.state = WriterState::Open;
        Ok(())
    }

    /// Frame `payload` and hand it to the transport in a single write.
    ///
    /// The payload size is checked before the port state, and both are checked
    /// before anything reaches the transport. Transport failures are returned as is;
    /// nothing is retried.
    pub async fn write(&mut self, payload: &[u8]) -> Result<(), DmxError> {
        if !payload_size_ok(payload.len()) {
            return Err(DmxError::PayloadSize {
                len: payload.len(),
            });
        }
        if !self.is_open() {
            return Err(DmxError::NotOpen);
        }
        let packet = build_packet(payload);
        trace!("sending {} channels: {:x?}", payload.len(), packet);
        self.transport.write(&packet).await?;
        Ok(())
    }

    /// Close the transport. This always reaches the transport, even if the writer
    /// was never opened.
    pub async fn close(&mut self) -> Result<(), DmxError> {
        debug!("closing {:?}", self.name());
        self.transport.close().await?;
        if self.state == WriterState::Open {
            self.state = WriterState::Closed;
        }
        Ok(())
    }

    /// Release the transport. Calling this more than once does nothing.
    pub async fn dispose(&mut self) -> Result<(), DmxError> {
        if self.state == WriterState::Disposed {
            return Ok(());
        }
        debug!("disposing {:?}", self.name());
        self.state = WriterState::Disposed;
        self.transport.dispose().await?;
        Ok(())
    }

    /// The port the transport is bound to, or `None` if it was never opened.
    pub fn name(&self) -> Option<&str> {
        self.transport.port_name()
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == WriterState::Open && self.transport.is_open()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
