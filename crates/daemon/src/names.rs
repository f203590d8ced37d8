//! Wire-level name mappings for the rigctl command language.
//!
//! Distinct from the Kenwood engine's own numeric mode codes
//! ([`rig_kenwood::session`]): these are the ASCII tokens clients send
//! and receive over the TCP control protocol.

use rig_core::{RigMode, Vfo};

/// Maps a wire mode name to the generic [`RigMode`].
///
/// `USB↔USB`, `LSB↔LSB`, `CW↔CW`, `CWR↔CW-reverse`, `RTTY↔FSK`,
/// `AM↔AM`, `FM↔FM`. Returns `None` for anything else, which the
/// dispatcher reports as a protocol error (`RPRT -1`).
#[must_use]
pub fn parse_mode(name: &str) -> Option<RigMode> {
    match name {
        "USB" => Some(RigMode::Usb),
        "LSB" => Some(RigMode::Lsb),
        "CW" => Some(RigMode::Cw),
        "CWR" => Some(RigMode::CwReverse),
        "RTTY" => Some(RigMode::Fsk),
        "AM" => Some(RigMode::Am),
        "FM" => Some(RigMode::Fm),
        _ => None,
    }
}

/// Maps a [`RigMode`] back to its wire name.
///
/// [`RigMode::Unknown`], [`RigMode::CwNarrow`], and
/// [`RigMode::CwReverseNarrow`] have no wire name in this protocol (the
/// rigctl mode vocabulary this daemon speaks has no narrow-filter
/// variants); callers treat `None` as "reads back unknown" for `m`.
#[must_use]
pub const fn mode_name(mode: RigMode) -> Option<&'static str> {
    match mode {
        RigMode::Usb => Some("USB"),
        RigMode::Lsb => Some("LSB"),
        RigMode::Cw => Some("CW"),
        RigMode::CwReverse => Some("CWR"),
        RigMode::Fsk => Some("RTTY"),
        RigMode::Am => Some("AM"),
        RigMode::Fm => Some("FM"),
        RigMode::Unknown | RigMode::CwNarrow | RigMode::CwReverseNarrow => None,
    }
}

/// Maps a wire VFO name to the generic [`Vfo`].
///
/// `VFOA|VFO↔A`, `VFOB↔B`, `MEM↔MEMORY`.
#[must_use]
pub fn parse_vfo(name: &str) -> Option<Vfo> {
    match name {
        "VFOA" | "VFO" => Some(Vfo::A),
        "VFOB" => Some(Vfo::B),
        "MEM" => Some(Vfo::Memory),
        _ => None,
    }
}

/// Maps a [`Vfo`] back to its wire name.
///
/// [`Vfo::Unknown`] and [`Vfo::Com`] have no wire name in this protocol;
/// callers treat `None` as "reads back unknown" for `v`.
#[must_use]
pub const fn vfo_name(vfo: Vfo) -> Option<&'static str> {
    match vfo {
        Vfo::A => Some("VFOA"),
        Vfo::B => Some("VFOB"),
        Vfo::Memory => Some("MEM"),
        Vfo::Unknown | Vfo::Com => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_names_round_trip() {
        for name in ["USB", "LSB", "CW", "CWR", "RTTY", "AM", "FM"] {
            let mode = parse_mode(name).expect("known name");
            assert_eq!(mode_name(mode), Some(name));
        }
    }

    #[test]
    fn unknown_mode_name_is_rejected() {
        assert_eq!(parse_mode("XYZ"), None);
    }

    #[test]
    fn vfo_names_round_trip_except_the_vfo_alias() {
        assert_eq!(parse_vfo("VFOA").and_then(vfo_name), Some("VFOA"));
        assert_eq!(parse_vfo("VFOB").and_then(vfo_name), Some("VFOB"));
        assert_eq!(parse_vfo("MEM").and_then(vfo_name), Some("MEM"));
        // "VFO" is an input-only alias for VFOA; it has no distinct
        // output form, so it does not round-trip to itself.
        assert_eq!(parse_vfo("VFO"), Some(Vfo::A));
    }

    #[test]
    fn unknown_vfo_name_is_rejected() {
        assert_eq!(parse_vfo("XYZ"), None);
    }
}
