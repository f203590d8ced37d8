use rig_config::ConfigSource;
use rig_transport::{DataBits, FlowControl, Parity, SerialConfig, StopBits};

/// Resolves a rig section's transport keys into a [`SerialConfig`].
///
/// Reads `port`/`speed`/`databits`/`stopbits`/`parity`/`flow`, with this
/// loader's own defaults applying only to whatever a model's
/// `set_default` calls left unset.
///
/// This loader's default for `stopbits` is `8`, not `1` — a value the
/// `{1,2}` validation below doesn't accept and that a model initializer
/// must always pre-empt with its own `set_default`. Every model this
/// crate ships does, so this default is carried for fidelity but never
/// actually observed.
#[must_use]
pub fn resolve_serial_config(cfg: &dyn ConfigSource, section: &str) -> SerialConfig {
    let device = cfg.get_string(section, "port", "");
    let baud = u32::try_from(cfg.get_int(section, "speed", 9600)).unwrap_or(9600);

    let data_bits = match cfg.get_int(section, "databits", 8) {
        7 => DataBits::Seven,
        6 => DataBits::Six,
        5 => DataBits::Five,
        _ => DataBits::Eight,
    };

    let stop_bits = match cfg.get_int(section, "stopbits", 8) {
        1 => StopBits::One,
        _ => StopBits::Two,
    };

    let parity = match cfg
        .get_string(section, "parity", "N")
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
    {
        Some('O') => Parity::Odd,
        Some('E') => Parity::Even,
        Some('H') => Parity::Mark,
        Some('L') => Parity::Space,
        _ => Parity::None,
    };

    let flow = match cfg
        .get_string(section, "flow", "N")
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
    {
        Some('C') => FlowControl::Hardware,
        _ => FlowControl::None,
    };

    SerialConfig {
        device,
        baud,
        data_bits,
        stop_bits,
        parity,
        flow,
    }
}
