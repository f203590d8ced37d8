//! The Kenwood-HF parameter table: column width, wire format, and type
//! tag for each value that can appear inside a command frame.

use std::fmt;

/// One of the sixteen typed values the wire protocol exchanges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum ParamId {
    /// Zero-width sentinel used by commands with no payload.
    Dummy,
    /// A single boolean-ish digit (0/1 and similar small codes).
    Sw,
    Mode,
    Function,
    Frequency,
    RitFrequency,
    StepFrequency,
    MemoryChannel,
    MemoryBank,
    MemoryChannelSplit,
    MemoryLockout,
    TxRx,
    Passband,
    Offset,
    ToneFrequency,
    CallSign,
    ModelNo,
}

/// The type tag governing a parameter's wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Unsigned, zero-padded decimal.
    U,
    /// Signed, zero-padded decimal with an explicit sign.
    I,
    /// 64-bit unsigned, zero-padded decimal.
    Q,
    /// Fixed-width, space-padded string.
    S,
}

/// A typed value read from or written to the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    U(u32),
    I(i32),
    Q(u64),
    S(String),
}

impl ParamValue {
    /// The type's sentinel used when a sub-parse fails.
    #[must_use]
    pub fn sentinel(ty: ParamType) -> Self {
        match ty {
            ParamType::U => Self::U(u32::MAX),
            ParamType::I => Self::I(i32::MAX),
            ParamType::Q => Self::Q(u64::MAX),
            ParamType::S => Self::S(String::new()),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U(v) => write!(f, "{v}"),
            Self::I(v) => write!(f, "{v}"),
            Self::Q(v) => write!(f, "{v}"),
            Self::S(v) => write!(f, "{v}"),
        }
    }
}

/// A row of the parameter table.
pub struct Param {
    pub id: ParamId,
    pub name: &'static str,
    pub cols: usize,
    pub ty: ParamType,
}

/// The complete, fixed parameter table (16 entries, `Dummy` included).
pub const PARAMS: &[Param] = &[
    Param { id: ParamId::Dummy, name: "Dummy", cols: 0, ty: ParamType::S },
    Param { id: ParamId::Sw, name: "Software switch", cols: 1, ty: ParamType::U },
    Param { id: ParamId::Mode, name: "Mode", cols: 1, ty: ParamType::U },
    Param { id: ParamId::Function, name: "Function", cols: 1, ty: ParamType::U },
    Param { id: ParamId::Frequency, name: "Frequency", cols: 11, ty: ParamType::Q },
    Param { id: ParamId::RitFrequency, name: "RIT/XIT offset", cols: 5, ty: ParamType::I },
    Param { id: ParamId::StepFrequency, name: "Tuning step", cols: 5, ty: ParamType::U },
    Param { id: ParamId::MemoryChannel, name: "Memory channel", cols: 2, ty: ParamType::U },
    Param { id: ParamId::MemoryBank, name: "Memory bank", cols: 1, ty: ParamType::U },
    Param { id: ParamId::MemoryChannelSplit, name: "Memory split spec", cols: 1, ty: ParamType::U },
    Param { id: ParamId::MemoryLockout, name: "Memory lockout", cols: 1, ty: ParamType::U },
    Param { id: ParamId::TxRx, name: "TX/RX flag", cols: 1, ty: ParamType::U },
    Param { id: ParamId::Passband, name: "IF passband", cols: 2, ty: ParamType::U },
    Param { id: ParamId::Offset, name: "Repeater offset direction", cols: 1, ty: ParamType::U },
    Param { id: ParamId::ToneFrequency, name: "CTCSS tone index", cols: 2, ty: ParamType::U },
    Param { id: ParamId::CallSign, name: "Call sign", cols: 6, ty: ParamType::S },
    Param { id: ParamId::ModelNo, name: "Model number", cols: 3, ty: ParamType::U },
];

/// Looks up a parameter's table row.
#[must_use]
pub fn param(id: ParamId) -> &'static Param {
    PARAMS
        .iter()
        .find(|p| p.id == id)
        .expect("every ParamId has a table row")
}

/// Formats `value` for the wire using `id`'s `print_format`.
///
/// Panics if `value`'s variant does not match the parameter's declared
/// type; that would be a programming error in the command table, not a
/// runtime condition.
#[must_use]
pub fn format_param(id: ParamId, value: &ParamValue) -> String {
    let p = param(id);
    match (p.ty, value) {
        (ParamType::U, ParamValue::U(v)) => format!("{v:0width$}", width = p.cols),
        (ParamType::Q, ParamValue::Q(v)) => format!("{v:0width$}", width = p.cols),
        (ParamType::I, ParamValue::I(v)) => {
            let sign = if *v < 0 { '-' } else { '+' };
            let digits = p.cols.saturating_sub(1);
            format!("{sign}{:0width$}", v.unsigned_abs(), width = digits)
        }
        (ParamType::S, ParamValue::S(v)) => {
            let mut s = v.clone();
            s.truncate(p.cols);
            format!("{s:<width$}", width = p.cols)
        }
        _ => panic!("parameter {:?} formatted with mismatched value type", p.name),
    }
}

/// Parses `cols` characters of `field` per `id`'s `scan_format`, reporting
/// whether the sub-parse actually succeeded.
///
/// Unlike [`parse_param`] this distinguishes a failed sub-parse from a
/// value that happens to equal the type's sentinel; `rscanf`'s count of
/// successful sub-parses is built on this, not on equality with
/// [`ParamValue::sentinel`].
#[must_use]
pub fn try_parse_param(id: ParamId, field: &str) -> Option<ParamValue> {
    let p = param(id);
    match p.ty {
        ParamType::U => field.trim().parse::<u32>().ok().map(ParamValue::U),
        ParamType::Q => field.trim().parse::<u64>().ok().map(ParamValue::Q),
        ParamType::I => field.trim().parse::<i32>().ok().map(ParamValue::I),
        ParamType::S => Some(ParamValue::S(field.trim_end().to_string())),
    }
}

/// Parses `cols` characters of `field` (already sliced to the parameter's
/// column width) per `id`'s `scan_format`.
///
/// Returns the type's sentinel, rather than an error, on a failed
/// sub-parse — this mirrors the original engine's `rscanf`, where one bad
/// field does not abort the whole reply.
#[must_use]
pub fn parse_param(id: ParamId, field: &str) -> ParamValue {
    let p = param(id);
    match p.ty {
        ParamType::U => field
            .trim()
            .parse::<u32>()
            .map_or_else(|_| ParamValue::sentinel(p.ty), ParamValue::U),
        ParamType::Q => field
            .trim()
            .parse::<u64>()
            .map_or_else(|_| ParamValue::sentinel(p.ty), ParamValue::Q),
        ParamType::I => field
            .trim()
            .parse::<i32>()
            .map_or_else(|_| ParamValue::sentinel(p.ty), ParamValue::I),
        ParamType::S => ParamValue::S(field.trim_end().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_round_trips() {
        let v = ParamValue::Q(14_250_000);
        let wire = format_param(ParamId::Frequency, &v);
        assert_eq!(wire, "00014250000");
        assert_eq!(parse_param(ParamId::Frequency, &wire), v);
    }

    #[test]
    fn rit_frequency_keeps_explicit_sign() {
        assert_eq!(format_param(ParamId::RitFrequency, &ParamValue::I(125)), "+0125");
        assert_eq!(format_param(ParamId::RitFrequency, &ParamValue::I(-125)), "-0125");
    }

    #[test]
    fn call_sign_is_space_padded_and_truncated() {
        assert_eq!(format_param(ParamId::CallSign, &ParamValue::S("K6BSD".into())), "K6BSD ");
        assert_eq!(
            format_param(ParamId::CallSign, &ParamValue::S("TOOLONGCALL".into())),
            "TOOLON"
        );
    }

    #[test]
    fn bad_field_yields_sentinel() {
        assert_eq!(parse_param(ParamId::StepFrequency, "xx"), ParamValue::sentinel(ParamType::U));
    }

    proptest::proptest! {
        /// `print_format ∘ scan_format = identity` for every value that fits
        /// within [`ParamId::Frequency`]'s 11-column width.
        #[test]
        fn frequency_format_then_parse_round_trips(freq in 0u64..100_000_000_000) {
            let wire = format_param(ParamId::Frequency, &ParamValue::Q(freq));
            proptest::prop_assert_eq!(parse_param(ParamId::Frequency, &wire), ParamValue::Q(freq));
        }

        /// Same law for [`ParamId::RitFrequency`], whose signed format keeps
        /// an explicit leading `+`/`-` rather than relying on width alone.
        #[test]
        fn rit_frequency_format_then_parse_round_trips(rit in -9999i32..=9999) {
            let wire = format_param(ParamId::RitFrequency, &ParamValue::I(rit));
            proptest::prop_assert_eq!(parse_param(ParamId::RitFrequency, &wire), ParamValue::I(rit));
        }

        /// Call signs up to the column width round-trip verbatim; the
        /// space-padding `format_param` adds is exactly what `parse_param`'s
        /// `trim_end` strips back off.
        #[test]
        fn call_sign_format_then_parse_round_trips(
            call in "[A-Z0-9]{1,6}"
        ) {
            let wire = format_param(ParamId::CallSign, &ParamValue::S(call.clone()));
            proptest::prop_assert_eq!(parse_param(ParamId::CallSign, &wire), ParamValue::S(call));
        }
    }
}
