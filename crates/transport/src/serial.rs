use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use serialport::SerialPort;

use crate::{DataBits, FlowControl, Parity, SerialConfig, StopBits, Transport};

/// A [`Transport`] backed by a blocking OS serial port.
///
/// This should be constructed once per rig and handed to the I/O handle,
/// which owns it exclusively from its reader thread.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Opens and configures a serial port from a resolved [`SerialConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be opened or configured.
    pub fn open(cfg: &SerialConfig) -> io::Result<Self> {
        let mut port = serialport::new(&cfg.device, cfg.baud)
            .data_bits(map_data_bits(cfg.data_bits))
            .stop_bits(map_stop_bits(cfg.stop_bits))
            .parity(map_parity(cfg.parity))
            .flow_control(map_flow(cfg.flow))
            .timeout(Duration::from_millis(100))
            .open()
            .map_err(io::Error::other)?;
        port.set_timeout(Duration::from_millis(100))
            .map_err(io::Error::other)?;
        Ok(Self { port })
    }
}

impl Transport for SerialTransport {
    fn write(&mut self, buf: &[u8], timeout: Duration) -> io::Result<usize> {
        self.port.set_timeout(timeout).map_err(io::Error::other)?;
        self.port.write(buf)
    }

    fn wait_write(&mut self, timeout: Duration) -> io::Result<bool> {
        // Serial writes on a half-duplex link are effectively always
        // ready; the meaningful wait is on the hardware FIFO draining,
        // which `write` itself blocks on up to its own timeout.
        let _ = timeout;
        Ok(true)
    }

    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<usize> {
        self.port.set_timeout(timeout).map_err(io::Error::other)?;
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e),
        }
    }

    fn wait_read(&mut self, timeout: Duration) -> io::Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            let pending = self.pending()?;
            if pending > 0 {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn pending(&self) -> io::Result<usize> {
        self.port
            .bytes_to_read()
            .map(|n| n as usize)
            .map_err(io::Error::other)
    }

    fn try_clone(&self) -> io::Result<Box<dyn Transport>> {
        let port = self.port.try_clone().map_err(io::Error::other)?;
        Ok(Box::new(Self { port }))
    }
}

fn map_data_bits(bits: DataBits) -> serialport::DataBits {
    match bits {
        DataBits::Five => serialport::DataBits::Five,
        DataBits::Six => serialport::DataBits::Six,
        DataBits::Seven => serialport::DataBits::Seven,
        DataBits::Eight => serialport::DataBits::Eight,
    }
}

fn map_stop_bits(bits: StopBits) -> serialport::StopBits {
    match bits {
        StopBits::One => serialport::StopBits::One,
        StopBits::Two => serialport::StopBits::Two,
    }
}

fn map_parity(parity: Parity) -> serialport::Parity {
    match parity {
        // The serialport crate only models none/odd/even; mark and space
        // parity are not exposed by the underlying termios bindings on
        // any platform this daemon targets, so both map to `None` with
        // the framing left to the Kenwood engine's own `;` terminator,
        // matching how the original driver's generic serial layer
        // treated unsupported parity settings as a best-effort no-op.
        Parity::None | Parity::Mark | Parity::Space => serialport::Parity::None,
        Parity::Odd => serialport::Parity::Odd,
        Parity::Even => serialport::Parity::Even,
    }
}

fn map_flow(flow: FlowControl) -> serialport::FlowControl {
    match flow {
        FlowControl::None => serialport::FlowControl::None,
        FlowControl::Hardware => serialport::FlowControl::Hardware,
    }
}
