use std::io;
use std::time::Duration;

use rig_core::{RigError, RigMode, Vfo};
use rig_io_handle::{IoHandle, IoResponse};
use rustc_hash::FxHashSet;

use crate::command::{CommandId, command};
use crate::param::{ParamValue, format_param, param, try_parse_param};

/// The Kenwood "function" field: which tunable register `FA`/`FB`
/// frequency writes currently apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Function {
    VfoA,
    VfoB,
    Memory,
    Com,
}

impl Function {
    const fn from_wire(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::VfoA),
            1 => Some(Self::VfoB),
            2 => Some(Self::Memory),
            3 => Some(Self::Com),
            _ => None,
        }
    }

    const fn to_wire(self) -> u32 {
        match self {
            Self::VfoA => 0,
            Self::VfoB => 1,
            Self::Memory => 2,
            Self::Com => 3,
        }
    }

    const fn to_vfo(self) -> Vfo {
        match self {
            Self::VfoA => Vfo::A,
            Self::VfoB => Vfo::B,
            Self::Memory => Vfo::Memory,
            Self::Com => Vfo::Com,
        }
    }

    const fn from_vfo(vfo: Vfo) -> Option<Self> {
        match vfo {
            Vfo::A => Some(Self::VfoA),
            Vfo::B => Some(Self::VfoB),
            Vfo::Memory => Some(Self::Memory),
            Vfo::Com => Some(Self::Com),
            Vfo::Unknown => None,
        }
    }
}

const fn mode_to_wire(mode: RigMode) -> Option<u32> {
    match mode {
        RigMode::Lsb => Some(1),
        RigMode::Usb => Some(2),
        RigMode::Cw => Some(3),
        RigMode::Fm => Some(4),
        RigMode::Am => Some(5),
        RigMode::Fsk => Some(6),
        RigMode::CwNarrow => Some(7),
        RigMode::CwReverse | RigMode::CwReverseNarrow | RigMode::Unknown => None,
    }
}

const fn wire_to_mode(code: u32) -> RigMode {
    match code {
        1 => RigMode::Lsb,
        2 => RigMode::Usb,
        3 => RigMode::Cw,
        4 => RigMode::Fm,
        5 => RigMode::Am,
        6 => RigMode::Fsk,
        7 => RigMode::CwNarrow,
        _ => RigMode::Unknown,
    }
}

/// The parsed `IF` information block: the rig's canonical, atomically
/// read state snapshot.
#[derive(Debug, Clone, Copy)]
struct KenwoodIf {
    freq: u64,
    function: Function,
    mode_code: u32,
    tx: bool,
}

impl KenwoodIf {
    /// Builds from the 15 fields of [`CommandId::If`]'s answer vector, in
    /// wire order: freq, step, rit, rit_on, xit_on, bank, channel, tx,
    /// mode, function, scan, split, tone_on, tone_freq, offset.
    fn from_fields(fields: &[ParamValue]) -> Option<Self> {
        let freq = match fields.first()? {
            ParamValue::Q(v) => *v,
            _ => return None,
        };
        let tx = match fields.get(7)? {
            ParamValue::U(v) => *v != 0,
            _ => return None,
        };
        let mode_code = match fields.get(8)? {
            ParamValue::U(v) => *v,
            _ => return None,
        };
        let function_code = match fields.get(9)? {
            ParamValue::U(v) => *v,
            _ => return None,
        };
        let function = Function::from_wire(function_code)?;
        Some(Self {
            freq,
            function,
            mode_code,
            tx,
        })
    }
}

/// A live session with a Kenwood-HF-family transceiver.
///
/// Holds the [`IoHandle`] plus the per-command `may_set`/`may_read`
/// capability bitmaps a model's initializer populates; every public
/// method here is the generic engine, not model-specific.
pub struct KenwoodHfSession {
    handle: IoHandle,
    may_set: FxHashSet<CommandId>,
    may_read: FxHashSet<CommandId>,
    char_timeout: Duration,
}

impl KenwoodHfSession {
    /// Wraps an already-started [`IoHandle`] with a model's capability
    /// bitmaps and write timeout.
    #[must_use]
    pub fn new(
        handle: IoHandle,
        may_set: FxHashSet<CommandId>,
        may_read: FxHashSet<CommandId>,
        char_timeout: Duration,
    ) -> Self {
        Self {
            handle,
            may_set,
            may_read,
            char_timeout,
        }
    }

    fn frame(id: CommandId, set: bool, args: &[ParamValue]) -> String {
        let c = command(id);
        let params = if set { c.set_params } else { c.get_params };
        debug_assert_eq!(
            params.len(),
            args.len(),
            "command table arity mismatch for {:?}",
            id
        );
        let mut out = String::from(c.mnemonic);
        for (pid, value) in params.iter().zip(args) {
            out.push_str(&format_param(*pid, value));
        }
        out.push(';');
        out
    }

    /// Emits a set (write-only) frame. No reply is awaited — this
    /// mirrors the original engine, which synthesizes a stub response
    /// carrying only the transmit byte count.
    ///
    /// Exposed at `pub(crate)` so model initializers can drive the
    /// init/close handshakes (`LK 1`, `AI 1`, ...) without each needing
    /// its own wrapper method here.
    pub(crate) fn command_set(&self, id: CommandId, args: &[ParamValue]) -> Result<(), RigError> {
        if !self.may_set.contains(&id) {
            return Err(RigError::Unsupported);
        }
        let frame = Self::frame(id, true, args);
        self.handle
            .write(frame.as_bytes(), self.char_timeout)
            .map_err(RigError::Transport)?;
        Ok(())
    }

    /// Emits a read frame and waits for the matching reply.
    fn command_read(&self, id: CommandId) -> Result<IoResponse, RigError> {
        if !self.may_read.contains(&id) {
            return Err(RigError::Unsupported);
        }
        let c = command(id);
        let frame = Self::frame(id, false, &[]);
        self.handle
            .write(frame.as_bytes(), self.char_timeout)
            .map_err(RigError::Transport)?;
        self.handle
            .get_response(c.read_prefix.as_bytes(), 0)
            .ok_or_else(|| RigError::Transport(io::Error::new(io::ErrorKind::TimedOut, "no reply")))
    }

    /// Parses `response` against `id`'s answer-parameter vector.
    ///
    /// Returns `None` if the mnemonic does not match or every sub-parse
    /// failed; a partially successful parse still returns `Some`, with
    /// the type's sentinel standing in for each failed field — this is
    /// `rscanf`.
    fn rscanf(id: CommandId, response: &IoResponse) -> Option<Vec<ParamValue>> {
        let c = command(id);
        let text = std::str::from_utf8(response.bytes()).ok()?;
        if !text.starts_with(c.mnemonic) {
            return None;
        }
        let mut pos = c.mnemonic.len();
        let mut out = Vec::with_capacity(c.answer_params.len());
        let mut successes = 0usize;
        for &pid in c.answer_params {
            let cols = param(pid).cols;
            let field = text.get(pos..pos + cols).unwrap_or("");
            match try_parse_param(pid, field) {
                Some(v) => {
                    successes += 1;
                    out.push(v);
                }
                None => out.push(ParamValue::sentinel(param(pid).ty)),
            }
            pos += cols;
        }
        if successes == 0 { None } else { Some(out) }
    }

    fn read_if(&self) -> Result<KenwoodIf, RigError> {
        let resp = self.command_read(CommandId::If)?;
        let fields = Self::rscanf(CommandId::If, &resp)
            .ok_or_else(|| RigError::Protocol("malformed IF reply".into()))?;
        KenwoodIf::from_fields(&fields)
            .ok_or_else(|| RigError::Protocol("IF reply missing required fields".into()))
    }

    /// Sets the frequency of the currently selected VFO.
    ///
    /// Reads `IF` first to determine which VFO is current; refuses with
    /// [`RigError::Permission`] if the rig is in MEMORY or COM function —
    /// a deliberate safety net, not a bug.
    ///
    /// # Errors
    ///
    /// See [`RigError`].
    pub fn set_frequency(&self, freq: u64) -> Result<(), RigError> {
        let info = self.read_if()?;
        let cmd = match info.function {
            Function::VfoA => CommandId::Fa,
            Function::VfoB => CommandId::Fb,
            Function::Memory | Function::Com => return Err(RigError::Permission),
        };
        self.command_set(cmd, &[ParamValue::Q(freq)])
    }

    /// Reads the frequency of the currently selected VFO via `IF`.
    ///
    /// # Errors
    ///
    /// See [`RigError`].
    pub fn get_frequency(&self) -> Result<u64, RigError> {
        Ok(self.read_if()?.freq)
    }

    /// Sets the operating mode via `MD`.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::Argument`] for a mode this wire protocol has
    /// no code for (the reverse-sideband CW variants).
    pub fn set_mode(&self, mode: RigMode) -> Result<(), RigError> {
        let code = mode_to_wire(mode)
            .ok_or_else(|| RigError::Argument(format!("{mode:?} has no Kenwood-HF wire code")))?;
        self.command_set(CommandId::Md, &[ParamValue::U(code)])
    }

    /// Reads the operating mode from `IF`.
    ///
    /// # Errors
    ///
    /// See [`RigError`].
    pub fn get_mode(&self) -> Result<RigMode, RigError> {
        Ok(wire_to_mode(self.read_if()?.mode_code))
    }

    /// Selects a VFO via `FN`.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::Argument`] for [`Vfo::Unknown`].
    pub fn set_vfo(&self, vfo: Vfo) -> Result<(), RigError> {
        let function = Function::from_vfo(vfo)
            .ok_or_else(|| RigError::Argument(format!("{vfo:?} is not selectable")))?;
        self.command_set(CommandId::Fn, &[ParamValue::U(function.to_wire())])
    }

    /// Reads the currently selected VFO from `IF`.
    ///
    /// # Errors
    ///
    /// See [`RigError`].
    pub fn get_vfo(&self) -> Result<Vfo, RigError> {
        Ok(self.read_if()?.function.to_vfo())
    }

    /// Sets PTT by issuing `TX` (key down) or `RX` (key up).
    ///
    /// # Errors
    ///
    /// See [`RigError`].
    pub fn set_ptt(&self, tx: bool) -> Result<(), RigError> {
        let id = if tx { CommandId::Tx } else { CommandId::Rx };
        self.command_set(id, &[])
    }

    /// Reads PTT state from `IF`'s TX/RX flag.
    ///
    /// # Errors
    ///
    /// See [`RigError`].
    pub fn get_ptt(&self) -> Result<bool, RigError> {
        Ok(self.read_if()?.tx)
    }

    /// Runs the close sequence (`LO`, `LK 0`, `AI 1`) and tears down the
    /// I/O handle.
    ///
    /// Each step's failure is logged and swallowed rather than aborting
    /// the sequence: `ts940s_close` frees each response as it goes and
    /// always proceeds to `io_end`.
    pub fn close(self) {
        if let Err(err) = self.command_set(CommandId::Lo, &[]) {
            tracing::debug!(%err, "LO failed during close");
        }
        if let Err(err) = self.command_set(CommandId::Lk, &[ParamValue::U(0)]) {
            tracing::debug!(%err, "LK 0 failed during close");
        }
        if let Err(err) = self.command_set(CommandId::Ai, &[ParamValue::U(1)]) {
            tracing::debug!(%err, "AI 1 failed during close");
        }
        self.handle.end();
    }
}
