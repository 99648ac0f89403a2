//! Serial port discovery and setup.
//!
//! Plotter controllers show up as USB CDC devices; enumeration filters the
//! system port list down to names that plausibly belong to one:
//! - Windows: COM*
//! - Linux: /dev/ttyUSB*, /dev/ttyACM*
//! - macOS: /dev/cu.usbserial-*, /dev/cu.usbmodem*

use std::io::Read;
use std::time::Duration;

use crate::sender::LineTransport;
use crate::{CommError, CommResult};

/// Information about an available serial port.
#[derive(Debug, Clone)]
pub struct SerialPortInfo {
    /// Port name (e.g. "/dev/ttyUSB0", "COM3").
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// USB manufacturer string if available.
    pub manufacturer: Option<String>,
}

/// List serial ports that look like plotter controllers.
pub fn list_ports() -> CommResult<Vec<SerialPortInfo>> {
    let ports = serialport::available_ports()
        .map_err(|e| CommError::Port(format!("failed to enumerate ports: {}", e)))?;

    Ok(ports
        .iter()
        .filter(|port| is_controller_port(&port.port_name))
        .map(|port| {
            let (description, manufacturer) = match &port.port_type {
                serialport::SerialPortType::UsbPort(usb) => (
                    format!(
                        "USB {} {}",
                        usb.manufacturer.as_deref().unwrap_or("Device"),
                        usb.product.as_deref().unwrap_or("Serial Port")
                    ),
                    usb.manufacturer.clone(),
                ),
                serialport::SerialPortType::BluetoothPort => {
                    ("Bluetooth Serial".to_string(), None)
                }
                serialport::SerialPortType::PciPort => ("PCI Serial".to_string(), None),
                _ => ("Serial Port".to_string(), None),
            };
            SerialPortInfo {
                name: port.port_name.clone(),
                description,
                manufacturer,
            }
        })
        .collect())
}

fn is_controller_port(name: &str) -> bool {
    if name.starts_with("COM") && name[3..].chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    if name.starts_with("/dev/ttyUSB") || name.starts_with("/dev/ttyACM") {
        return true;
    }
    if name.starts_with("/dev/cu.usbserial-") || name.starts_with("/dev/cu.usbmodem") {
        return true;
    }
    false
}

/// A [`LineTransport`] over a real serial port, 8N1.
pub struct SerialLineTransport {
    port: Box<dyn serialport::SerialPort>,
}

/// Open a serial connection to a controller.
///
/// The read timeout is generous (10s) because the controller acknowledges a
/// command only after executing it, and slow travel moves take a while.
pub fn open_port(name: &str, baud_rate: u32) -> CommResult<SerialLineTransport> {
    let port = serialport::new(name, baud_rate)
        .timeout(Duration::from_secs(10))
        .data_bits(serialport::DataBits::Eight)
        .stop_bits(serialport::StopBits::One)
        .parity(serialport::Parity::None)
        .flow_control(serialport::FlowControl::None)
        .open()
        .map_err(|e| {
            tracing::warn!(port = name, error = %e, "failed to open serial port");
            CommError::Port(format!("failed to open {}: {}", name, e))
        })?;
    Ok(SerialLineTransport { port })
}

impl LineTransport for SerialLineTransport {
    fn send_line(&mut self, line: &str) -> std::io::Result<()> {
        self.port.write_all(line.as_bytes())?;
        self.port.write_all(b"\n")?;
        self.port.flush()
    }

    fn read_line(&mut self) -> std::io::Result<String> {
        // Byte-at-a-time until newline; acknowledgments are short and the
        // port read timeout bounds the wait.
        let mut line = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            self.port.read_exact(&mut byte)?;
            if byte[0] == b'\n' {
                break;
            }
            if byte[0] != b'\r' {
                line.push(byte[0]);
            }
        }
        Ok(String::from_utf8_lossy(&line).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_port_patterns() {
        for name in ["COM3", "COM12", "/dev/ttyUSB0", "/dev/ttyACM1", "/dev/cu.usbmodem14101"] {
            assert!(is_controller_port(name), "should match: {name}");
        }
        for name in ["/dev/ttyS0", "COMX", "/dev/cu.Bluetooth-Incoming-Port", "lp0"] {
            assert!(!is_controller_port(name), "should not match: {name}");
        }
    }
}
