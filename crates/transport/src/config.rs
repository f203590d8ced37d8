/// Word length, per configuration schema `databits` ∈ {5,6,7,8}.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    /// 5 data bits.
    Five,
    /// 6 data bits.
    Six,
    /// 7 data bits.
    Seven,
    /// 8 data bits.
    Eight,
}

/// Stop bit count, per configuration schema `stopbits` ∈ {1,2}.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    /// One stop bit.
    One,
    /// Two stop bits.
    Two,
}

/// Parity, per configuration schema `parity` ∈ {N,O,E,H,L} (none, odd,
/// even, mark, space).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    /// No parity bit.
    None,
    /// Odd parity.
    Odd,
    /// Even parity.
    Even,
    /// Parity bit fixed to mark (1).
    Mark,
    /// Parity bit fixed to space (0).
    Space,
}

/// Flow control, per configuration schema `flow` ∈ {N,C} (none, CTS/RTS).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
    /// No flow control.
    None,
    /// Hardware (RTS/CTS) flow control.
    Hardware,
}

/// A fully resolved serial-port configuration, ready to open a port with.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyUSB0`.
    pub device: String,
    /// Baud rate.
    pub baud: u32,
    /// Data bits.
    pub data_bits: DataBits,
    /// Stop bits.
    pub stop_bits: StopBits,
    /// Parity.
    pub parity: Parity,
    /// Flow control.
    pub flow: FlowControl,
}
