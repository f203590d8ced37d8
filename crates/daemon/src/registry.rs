use rig_config::ConfigSource;
use rig_kenwood::Rig;

use crate::error::DaemonError;

/// One live rig plus the configuration section name it was brought up
/// from (used only for diagnostics — the wire protocol never names
/// rigs, since each listener is already scoped to exactly one).
pub struct RigEntry {
    /// The section name in the configuration file, e.g. `"rig1"`.
    pub section: String,
    /// The live driver handle.
    pub rig: Rig,
}

/// Selects a model initializer by the configuration's `rig` key.
///
/// Only `TS-940S` is wired in this repository: model files whose only
/// role is to populate the command-table bitmasks are an
/// external-collaborator concern, and this repository ships exactly one
/// as a worked example. Matching is case-insensitive since operators
/// routinely write `ts940s`/`TS940S` in configuration files.
///
/// # Errors
///
/// Returns [`DaemonError::UnknownModel`] if `model` names anything else,
/// or propagates the model initializer's own [`rig_core::RigError`]
/// (wrapped as [`DaemonError::UnknownModel`]'s sibling, fatal startup
/// failure) if bring-up itself fails.
pub fn bring_up(cfg: &mut dyn ConfigSource, section: &str) -> Result<Rig, DaemonError> {
    let model = cfg.get_string(section, "rig", "");
    match model.to_ascii_uppercase().as_str() {
        "TS-940S" => {
            rig_kenwood::models::ts940s::init(cfg, section).map_err(|source| DaemonError::RigInitFailed {
                section: section.to_string(),
                source,
            })
        }
        _ => Err(DaemonError::UnknownModel {
            section: section.to_string(),
            model,
        }),
    }
}

/// Brings up every rig named in `cfg`, logging and dropping any section
/// whose model is unknown or whose transport failed to open: failure to
/// initialize a rig at startup causes that rig to be silently dropped.
///
/// # Errors
///
/// Returns [`DaemonError::NoActiveRigs`] if every section failed.
pub fn bring_up_all(
    cfg: &mut dyn ConfigSource,
    sections: &[String],
) -> Result<Vec<RigEntry>, DaemonError> {
    let mut entries = Vec::new();
    for section in sections {
        match bring_up(cfg, section) {
            Ok(rig) => entries.push(RigEntry {
                section: section.clone(),
                rig,
            }),
            Err(err) => tracing::warn!(%section, %err, "dropping rig"),
        }
    }
    if entries.is_empty() {
        return Err(DaemonError::NoActiveRigs);
    }
    Ok(entries)
}
