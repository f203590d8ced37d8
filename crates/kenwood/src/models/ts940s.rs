use std::sync::Arc;
use std::time::Duration;

use rig_config::ConfigSource;
use rig_core::{RigError, RigMode, Vfo};
use rig_io_handle::IoHandle;
use rig_transport::SerialTransport;
use rustc_hash::FxHashSet;

use crate::capability::Capabilities;
use crate::command::CommandId;
use crate::framer::KenwoodFramer;
use crate::rig::Rig;
use crate::param::ParamValue;
use crate::session::KenwoodHfSession;
use crate::sink::TracingSink;
use crate::transport_config::resolve_serial_config;

/// Commands the TS-940S accepts a *set* for.
///
/// Grounded in `ts940s_init`'s `kenwood_hf_setbits(khf->set_cmds, ...)`
/// call; `KW_HF_CMD_UP` from that call is omitted since the command
/// table this engine speaks has no row for it — that enum constant
/// existed with no matching mnemonic, so setting its bit had no
/// observable effect.
const MAY_SET: &[CommandId] = &[
    CommandId::Ai,
    CommandId::At1,
    CommandId::Dn,
    CommandId::Ds,
    CommandId::Fa,
    CommandId::Fb,
    CommandId::Fn,
    CommandId::Hd,
    CommandId::Lk,
    CommandId::Lo,
    CommandId::Mc,
    CommandId::Md,
    CommandId::Ms,
    CommandId::Mw,
    CommandId::Rc,
    CommandId::Rd,
    CommandId::Ru,
    CommandId::Rt,
    CommandId::Rx,
    CommandId::Tx,
    CommandId::Sc,
    CommandId::Sh,
    CommandId::Sl,
    CommandId::Sp,
    CommandId::Vb,
    CommandId::Vr,
    CommandId::Xt,
];

/// Commands the TS-940S accepts a *read* for.
///
/// Grounded in `ts940s_init`'s `kenwood_hf_setbits(khf->read_cmds, ...)`
/// call.
const MAY_READ: &[CommandId] = &[
    CommandId::Ds,
    CommandId::Fa,
    CommandId::Fb,
    CommandId::Hd,
    CommandId::Id,
    CommandId::If,
    CommandId::Lk,
    CommandId::Mr,
    CommandId::Ms,
    CommandId::Sh,
    CommandId::Sl,
    CommandId::Vb,
];

const SUPPORTED_MODES: u32 = RigMode::Cw.bits()
    | RigMode::Am.bits()
    | RigMode::Lsb.bits()
    | RigMode::Usb.bits()
    | RigMode::Fm.bits()
    | RigMode::Fsk.bits();

const SUPPORTED_VFOS: u32 = Vfo::A.bits() | Vfo::B.bits() | Vfo::Memory.bits();

/// Only `close`, `set/get_frequency`, and `set/get_mode` are wired up,
/// matching `ts940s_init` exactly: it never assigns `set_vfo`,
/// `set_ptt`, or any squelch/S-meter/split-frequency callback.
const CAPABILITIES: Capabilities = Capabilities::CLOSE
    .union(Capabilities::FREQUENCY)
    .union(Capabilities::MODE);

const RESPONSE_TIMEOUT: Duration = Duration::from_millis(2000);
const CHAR_TIMEOUT: Duration = Duration::from_millis(500);

/// Brings up a TS-940S from `section` of `cfg`.
///
/// Fills in serial-port defaults (4800/8/2/None/no-flow), opens the
/// transport, starts the I/O handle, and runs the `LK 1` / `AI 1` init
/// sequence — all grounded in `ts940s_init`.
///
/// # Errors
///
/// Returns [`RigError::Fatal`] if the transport cannot be opened or
/// started; this model should be dropped rather than retried.
pub fn init(cfg: &mut dyn ConfigSource, section: &str) -> Result<Rig, RigError> {
    cfg.set_default(section, "type", "serial");
    cfg.set_default(section, "speed", "4800");
    cfg.set_default(section, "databits", "8");
    cfg.set_default(section, "stopbits", "2");
    cfg.set_default(section, "parity", "None");

    let serial_cfg = resolve_serial_config(&*cfg, section);
    let transport = SerialTransport::open(&serial_cfg)
        .map_err(|e| RigError::Fatal(format!("{section}: failed to open transport: {e}")))?;

    let framer = KenwoodFramer::new(RESPONSE_TIMEOUT, CHAR_TIMEOUT);
    let handle = IoHandle::start(Box::new(transport), Box::new(framer), Arc::new(TracingSink))
        .map_err(|e| RigError::Fatal(format!("{section}: failed to start I/O handle: {e}")))?;

    let may_set: FxHashSet<CommandId> = MAY_SET.iter().copied().collect();
    let may_read: FxHashSet<CommandId> = MAY_READ.iter().copied().collect();
    let session = KenwoodHfSession::new(handle, may_set, may_read, CHAR_TIMEOUT);

    // Lock the front panel and enable AI (auto-information) mode.
    session.command_set(CommandId::Lk, &[ParamValue::U(1)])?;
    session.command_set(CommandId::Ai, &[ParamValue::U(1)])?;

    Ok(Rig::KenwoodHf {
        session,
        supported_modes: SUPPORTED_MODES,
        supported_vfos: SUPPORTED_VFOS,
        capabilities: CAPABILITIES,
    })
}
