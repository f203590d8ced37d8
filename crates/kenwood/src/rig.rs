use rig_core::{RigError, RigMode, Vfo};

use crate::capability::Capabilities;
use crate::session::KenwoodHfSession;

/// A live, capability-gated rig.
///
/// Currently a single-variant enum over [`KenwoodHfSession`]: a closed
/// `enum` in place of a function-pointer vtable, since this repository
/// implements exactly one protocol family. Adding a second family means
/// adding a variant here and a new match arm per method, not touching
/// any caller.
pub enum Rig {
    /// A Kenwood-HF-family transceiver.
    KenwoodHf {
        /// The underlying protocol session.
        session: KenwoodHfSession,
        /// Which modes this model's table declares, as a [`RigMode`] bitmask.
        supported_modes: u32,
        /// Which VFOs this model's table declares, as a [`Vfo`] bitmask.
        supported_vfos: u32,
        /// Which generic operations this model actually wires up.
        capabilities: Capabilities,
    },
}

impl Rig {
    /// The modes this rig's model declares support for.
    #[must_use]
    pub const fn supported_modes(&self) -> u32 {
        match self {
            Self::KenwoodHf { supported_modes, .. } => *supported_modes,
        }
    }

    /// The VFOs this rig's model declares support for.
    #[must_use]
    pub const fn supported_vfos(&self) -> u32 {
        match self {
            Self::KenwoodHf { supported_vfos, .. } => *supported_vfos,
        }
    }

    /// The generic operations this rig's model wires up.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        match self {
            Self::KenwoodHf { capabilities, .. } => *capabilities,
        }
    }

    fn require(&self, bit: Capabilities) -> Result<(), RigError> {
        if self.capabilities().contains(bit) {
            Ok(())
        } else {
            Err(RigError::Unsupported)
        }
    }

    /// Sets the frequency of the currently selected VFO.
    ///
    /// # Errors
    ///
    /// See [`RigError`].
    pub fn set_frequency(&self, freq: u64) -> Result<(), RigError> {
        self.require(Capabilities::FREQUENCY)?;
        match self {
            Self::KenwoodHf { session, .. } => session.set_frequency(freq),
        }
    }

    /// Reads the frequency of the currently selected VFO.
    ///
    /// # Errors
    ///
    /// See [`RigError`].
    pub fn get_frequency(&self) -> Result<u64, RigError> {
        self.require(Capabilities::FREQUENCY)?;
        match self {
            Self::KenwoodHf { session, .. } => session.get_frequency(),
        }
    }

    /// Sets the operating mode, rejecting a mode the model doesn't
    /// declare support for.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::Argument`] if `mode` is outside
    /// [`Self::supported_modes`].
    pub fn set_mode(&self, mode: RigMode) -> Result<(), RigError> {
        self.require(Capabilities::MODE)?;
        if !mode.supported_by(self.supported_modes()) {
            return Err(RigError::Argument(format!("{mode:?} not supported by this model")));
        }
        match self {
            Self::KenwoodHf { session, .. } => session.set_mode(mode),
        }
    }

    /// Reads the operating mode.
    ///
    /// # Errors
    ///
    /// See [`RigError`].
    pub fn get_mode(&self) -> Result<RigMode, RigError> {
        self.require(Capabilities::MODE)?;
        match self {
            Self::KenwoodHf { session, .. } => session.get_mode(),
        }
    }

    /// Selects a VFO, rejecting one the model doesn't declare support
    /// for.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::Argument`] if `vfo` is outside
    /// [`Self::supported_vfos`].
    pub fn set_vfo(&self, vfo: Vfo) -> Result<(), RigError> {
        self.require(Capabilities::VFO)?;
        if !vfo.supported_by(self.supported_vfos()) {
            return Err(RigError::Argument(format!("{vfo:?} not supported by this model")));
        }
        match self {
            Self::KenwoodHf { session, .. } => session.set_vfo(vfo),
        }
    }

    /// Reads the currently selected VFO.
    ///
    /// # Errors
    ///
    /// See [`RigError`].
    pub fn get_vfo(&self) -> Result<Vfo, RigError> {
        self.require(Capabilities::VFO)?;
        match self {
            Self::KenwoodHf { session, .. } => session.get_vfo(),
        }
    }

    /// Sets PTT.
    ///
    /// # Errors
    ///
    /// See [`RigError`].
    pub fn set_ptt(&self, tx: bool) -> Result<(), RigError> {
        self.require(Capabilities::PTT)?;
        match self {
            Self::KenwoodHf { session, .. } => session.set_ptt(tx),
        }
    }

    /// Reads PTT state.
    ///
    /// # Errors
    ///
    /// See [`RigError`].
    pub fn get_ptt(&self) -> Result<bool, RigError> {
        self.require(Capabilities::PTT)?;
        match self {
            Self::KenwoodHf { session, .. } => session.get_ptt(),
        }
    }

    /// Reads squelch status.
    ///
    /// No model this crate implements wires this up (the Kenwood-HF
    /// command table this engine speaks has no squelch-status mnemonic);
    /// always [`RigError::Unsupported`] until a model that supports it
    /// exists.
    ///
    /// # Errors
    ///
    /// Always returns [`RigError::Unsupported`].
    pub fn get_squelch(&self) -> Result<bool, RigError> {
        self.require(Capabilities::SQUELCH)?;
        Err(RigError::Unsupported)
    }

    /// Reads the S-meter.
    ///
    /// Same situation as [`Self::get_squelch`]: no command table entry
    /// backs it yet.
    ///
    /// # Errors
    ///
    /// Always returns [`RigError::Unsupported`].
    pub fn get_smeter(&self) -> Result<u32, RigError> {
        self.require(Capabilities::SMETER)?;
        Err(RigError::Unsupported)
    }

    /// Reads the split (RX, TX) frequency pair.
    ///
    /// Same situation as [`Self::get_squelch`]: no model this crate
    /// implements wires split frequency up.
    ///
    /// # Errors
    ///
    /// Always returns [`RigError::Unsupported`].
    pub fn get_split_frequency(&self) -> Result<(u64, u64), RigError> {
        self.require(Capabilities::SPLIT_FREQUENCY)?;
        Err(RigError::Unsupported)
    }

    /// Sets the split (RX, TX) frequency pair.
    ///
    /// # Errors
    ///
    /// Always returns [`RigError::Unsupported`].
    pub fn set_split_frequency(&self, _rx: u64, _tx: u64) -> Result<(), RigError> {
        self.require(Capabilities::SPLIT_FREQUENCY)?;
        Err(RigError::Unsupported)
    }

    /// Runs the model's close sequence and tears down its I/O handle.
    pub fn close(self) {
        match self {
            Self::KenwoodHf { session, .. } => session.close(),
        }
    }
}
