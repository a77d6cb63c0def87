//! Serial port implementation of the actuator link

use std::io::Write;
use std::thread;
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info};

use super::{encode, ActuatorLink, LinkError};
use crate::state::ActuatorState;

/// How to open the controller's serial port
#[derive(Debug, Clone)]
pub struct SerialSettings {
    pub path: String,
    pub baud: u32,
    /// Upper bound for a single write, so a stuck port cannot stall callers
    pub write_timeout: Duration,
    /// Opening the port resets most microcontroller boards; wait this long
    /// before the first command
    pub boot_delay: Duration,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            path: "/dev/ttyACM0".to_string(),
            baud: 9600,
            write_timeout: Duration::from_millis(100),
            boot_delay: Duration::from_secs(2),
        }
    }
}

/// Writes wire frames to any byte sink, normally a serial port
pub struct SerialLink<P> {
    port: P,
    name: String,
}

impl SerialLink<Box<dyn SerialPort>> {
    /// Open the port and wait for the controller to boot
    pub fn open(settings: &SerialSettings) -> Result<Self, LinkError> {
        let port = serialport::new(&settings.path, settings.baud)
            .timeout(settings.write_timeout)
            .open()
            .map_err(|source| LinkError::Open {
                path: settings.path.clone(),
                source,
            })?;

        info!(path = %settings.path, baud = settings.baud, "serial port opened");

        if !settings.boot_delay.is_zero() {
            debug!(delay_ms = settings.boot_delay.as_millis() as u64, "waiting for controller boot");
            thread::sleep(settings.boot_delay);
        }

        Ok(Self::from_port(port, settings.path.clone()))
    }
}

impl<P: Write + Send> SerialLink<P> {
    pub fn from_port(port: P, name: impl Into<String>) -> Self {
        Self {
            port,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_inner(self) -> P {
        self.port
    }
}

impl<P: Write + Send> ActuatorLink for SerialLink<P> {
    fn send(&mut self, state: ActuatorState) -> Result<(), LinkError> {
        let frame = encode(state);
        self.port
            .write_all(&frame)
            .and_then(|_| self.port.flush())
            .map_err(LinkError::Disconnected)?;

        debug!(port = %self.name, %state, byte = %(frame[0] as char), "command written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct UnpluggedPort;

    impl Write for UnpluggedPort {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writes_digit_and_newline() {
        let mut link = SerialLink::from_port(Vec::new(), "mem");
        link.send(ActuatorState::Bulb2).unwrap();
        link.send(ActuatorState::Off).unwrap();
        assert_eq!(link.into_inner(), b"2\n0\n");
    }

    #[test]
    fn test_write_failure_is_disconnected() {
        let mut link = SerialLink::from_port(UnpluggedPort, "unplugged");
        let err = link.send(ActuatorState::Both).unwrap_err();
        assert!(matches!(err, LinkError::Disconnected(_)));
        assert!(err.to_string().contains("device unplugged"));
    }

    #[test]
    fn test_open_missing_port() {
        let settings = SerialSettings {
            path: "/dev/handsignal-does-not-exist".into(),
            boot_delay: Duration::ZERO,
            ..SerialSettings::default()
        };
        assert!(matches!(SerialLink::open(&settings), Err(LinkError::Open { .. })));
    }
}
