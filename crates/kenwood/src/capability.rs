use bitflags::bitflags;

bitflags! {
    /// Which of the generic rig operations a concrete model actually
    /// wires up.
    ///
    /// This is distinct from [`crate::session::KenwoodHfSession`]'s
    /// per-command `may_set`/`may_read` bitmaps: those gate individual
    /// Kenwood-HF wire commands, this gates the *generic* API surface
    /// the TCP front end calls through [`crate::Rig`]. A model can leave
    /// a bit unset even if the underlying command exists on the wire,
    /// simply because nothing wires it up (the historical TS-940S driver
    /// this model is grounded on never calls `set_vfo`/`set_ptt`/the
    /// squelch or S-meter reads at all).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u16 {
        /// `close` is implemented (true for every model; kept explicit
        /// since the data model names it as a capability in its own
        /// right).
        const CLOSE = 1 << 0;
        /// `set_frequency` / `get_frequency`.
        const FREQUENCY = 1 << 1;
        /// `set_split_frequency` / `get_split_frequency`.
        const SPLIT_FREQUENCY = 1 << 2;
        /// `set_mode` / `get_mode`.
        const MODE = 1 << 3;
        /// `set_vfo` / `get_vfo`.
        const VFO = 1 << 4;
        /// `set_ptt` / `get_ptt`.
        const PTT = 1 << 5;
        /// `get_squelch`.
        const SQUELCH = 1 << 6;
        /// `get_smeter`.
        const SMETER = 1 << 7;
    }
}
