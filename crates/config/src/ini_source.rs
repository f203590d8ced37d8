use std::path::Path;

use ini::Ini;

use crate::{ConfigError, ConfigSource};

/// A [`ConfigSource`] backed by a parsed `.ini` file.
///
/// Section names map directly to rig sections in the schema the daemon
/// expects; this adapter knows nothing about that schema, it just does
/// section/key lookups.
pub struct IniConfig {
    ini: Ini,
}

impl IniConfig {
    /// Parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the file cannot be read or does
    /// not parse as INI.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Load {
            path: path.display().to_string(),
            source: std::io::Error::other(e),
        })?;
        Ok(Self { ini })
    }

    /// The names of every named section (skipping the file's implicit
    /// top-level section, which this schema never uses).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Empty`] if the file has no named sections
    /// at all — there would be no rigs to bring up.
    pub fn section_names(&self) -> Result<Vec<String>, ConfigError> {
        let names: Vec<String> = self
            .ini
            .sections()
            .filter_map(|s| s.map(str::to_owned))
            .collect();
        if names.is_empty() {
            return Err(ConfigError::Empty);
        }
        Ok(names)
    }
}

impl ConfigSource for IniConfig {
    fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .map_or_else(|| default.to_string(), str::to_string)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn set_default(&mut self, section: &str, key: &str, default: &str) {
        if self.ini.get_from(Some(section), key).is_some() {
            return;
        }
        self.ini
            .with_section(Some(section))
            .set(key, default);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_ini(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[test]
    fn get_string_falls_back_to_default() {
        let file = write_ini("[rig1]\nrig = TS-940S\n");
        let cfg = IniConfig::load(file.path()).expect("load");
        assert_eq!(cfg.get_string("rig1", "rig", "none"), "TS-940S");
        assert_eq!(cfg.get_string("rig1", "missing", "fallback"), "fallback");
        assert_eq!(cfg.get_string("missing_section", "rig", "fallback"), "fallback");
    }

    #[test]
    fn get_int_parses_or_falls_back() {
        let file = write_ini("[rig1]\nrigctld_port = 4533\nspeed = notanumber\n");
        let cfg = IniConfig::load(file.path()).expect("load");
        assert_eq!(cfg.get_int("rig1", "rigctld_port", 4532), 4533);
        assert_eq!(cfg.get_int("rig1", "speed", 9600), 9600);
    }

    #[test]
    fn set_default_does_not_clobber_existing_value() {
        let file = write_ini("[rig1]\nstopbits = 1\n");
        let mut cfg = IniConfig::load(file.path()).expect("load");
        cfg.set_default("rig1", "stopbits", "2");
        assert_eq!(cfg.get_string("rig1", "stopbits", "?"), "1");
        cfg.set_default("rig1", "parity", "N");
        assert_eq!(cfg.get_string("rig1", "parity", "?"), "N");
    }

    #[test]
    fn section_names_lists_named_sections_only() {
        let file = write_ini("[rig1]\nrig = TS-940S\n\n[rig2]\nrig = TS-940S\n");
        let cfg = IniConfig::load(file.path()).expect("load");
        let mut names = cfg.section_names().expect("names");
        names.sort();
        assert_eq!(names, vec!["rig1".to_string(), "rig2".to_string()]);
    }

    #[test]
    fn empty_file_has_no_sections() {
        let file = write_ini("");
        let cfg = IniConfig::load(file.path()).expect("load");
        assert!(matches!(cfg.section_names(), Err(ConfigError::Empty)));
    }
}
