use std::{io::Write, time::Duration};

use enttec_dmx::{Parity, PortSettings, StopBits, Transport, TransportError};
use log::debug;
use serialport::SerialPort;

const WRITE_TIMEOUT: Duration = Duration::from_millis(500);

/// A [`Transport`] over a native serial port.
///
/// The serialport calls block, so each one runs on tokio's blocking pool. The port is
/// moved into the blocking task and handed back when it's done.
#[derive(Default)]
pub struct SerialTransport {
    port: Option<Box<dyn SerialPort>>,
    name: Option<String>,
}

impl Transport for SerialTransport {
    async fn open(
        &mut self,
        port_name: &str,
        settings: PortSettings,
    ) -> Result<(), TransportError> {
        let open_error = |reason: String| TransportError::Open {
            port: port_name.to_owned(),
            reason,
        };
        if self.port.is_some() {
            return Err(open_error("there is already a port open".into()));
        }
        let builder = serialport::new(port_name, settings.baud_rate)
            .parity(parity(settings.parity))
            .data_bits(data_bits(settings.data_bits).ok_or_else(|| {
                open_error(format!("unsupported data bits: {}", settings.data_bits))
            })?)
            .stop_bits(stop_bits(settings.stop_bits))
            .timeout(WRITE_TIMEOUT);

        debug!("opening serial port {port_name} with {settings:?}");
        let port = tokio::task::spawn_blocking(move || builder.open())
            .await
            .map_err(join_error)?
            .map_err(|e| open_error(e.to_string()))?;
        self.port = Some(port);
        self.name = Some(port_name.to_owned());
        Ok(())
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let mut port = self.port.take().ok_or(TransportError::NotOpen)?;
        let data = data.to_vec();
        let (port, result) = tokio::task::spawn_blocking(move || {
            let result = port.write_all(&data).and_then(|_| port.flush());
            (port, result)
        })
        .await
        .map_err(join_error)?;
        self.port = Some(port);
        result?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        if let Some(port) = self.port.take() {
            debug!("closing serial port {:?}", self.name);
            // dropping the handle closes the port
            tokio::task::spawn_blocking(move || drop(port))
                .await
                .map_err(join_error)?;
        }
        Ok(())
    }

    async fn dispose(&mut self) -> Result<(), TransportError> {
        self.close().await?;
        self.name = None;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn port_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Serial ports the OS knows about, with a short description of each.
pub fn available_ports() -> anyhow::Result<Vec<(String, String)>> {
    Ok(serialport::available_ports()?
        .into_iter()
        .map(|info| {
            let kind = match info.port_type {
                serialport::SerialPortType::UsbPort(usb) => format!(
                    "USB {:04x}:{:04x} {}",
                    usb.vid,
                    usb.pid,
                    usb.product.unwrap_or_default()
                ),
                serialport::SerialPortType::PciPort => "PCI".to_owned(),
                serialport::SerialPortType::BluetoothPort => "Bluetooth".to_owned(),
                serialport::SerialPortType::Unknown => "unknown".to_owned(),
            };
            (info.port_name, kind)
        })
        .collect())
}

fn join_error(e: tokio::task::JoinError) -> TransportError {
    TransportError::Io(std::io::Error::other(e))
}

fn parity(parity: Parity) -> serialport::Parity {
    match parity {
        Parity::None => serialport::Parity::None,
        Parity::Odd => serialport::Parity::Odd,
        Parity::Even => serialport::Parity::Even,
    }
}

fn stop_bits(stop_bits: StopBits) -> serialport::StopBits {
    match stop_bits {
        StopBits::One => serialport::StopBits::One,
        StopBits::Two => serialport::StopBits::Two,
    }
}

fn data_bits(bits: u8) -> Option<serialport::DataBits> {
    Some(match bits {
        5 => serialport::DataBits::Five,
        6 => serialport::DataBits::Six,
        7 => serialport::DataBits::Seven,
        8 => serialport::DataBits::Eight,
        _ => return None,
    })
}
