//! Snapshot, save, restore and verify device controls through a text configuration.
//!
//! The format is an INI-style UTF-8 file with two sections: `[device]` identifies the device
//! the snapshot was taken from (`driver`, `card`, `bus_info`, `version`), and `[controls]` maps
//! each control's canonical name to its value string. `#` and `;` start comment lines. Unknown
//! keys in `[device]` are ignored; unknown keys in `[controls]` fail validation.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::device::Device;
use crate::{Error, Result};

const DEVICE_SECTION: &str = "device";
const CONTROLS_SECTION: &str = "controls";

/// Number of apply cycles needed to settle controls whose legal range depends on other
/// controls (auto-exposure gating exposure, auto-white-balance gating temperature, ...).
const DEFAULT_APPLY_CYCLES: u32 = 2;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Manages the configuration snapshot of one device.
pub struct ConfigManager<'a> {
    device: &'a Device,
    sections: Vec<Section>,
    /// Path the configuration was last loaded from.
    loaded_from: Option<PathBuf>,
}

impl<'a> ConfigManager<'a> {
    pub fn new(device: &'a Device) -> Self {
        Self {
            device,
            sections: Vec::new(),
            loaded_from: None,
        }
    }

    /// Whether a snapshot or loaded configuration is present.
    pub fn has_config(&self) -> bool {
        !self.sections.is_empty()
    }

    /// Whether the current configuration came from [`ConfigManager::load`].
    pub fn config_loaded(&self) -> bool {
        self.loaded_from.is_some()
    }

    /// Discards any current configuration.
    pub fn reset(&mut self) {
        self.sections.clear();
        self.loaded_from = None;
    }

    fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    fn require_loaded(&self) -> Result<()> {
        if !self.config_loaded() {
            return Err(Error::Configuration("no configuration loaded".into()));
        }
        Ok(())
    }

    /// Populates the configuration from the device's current state.
    ///
    /// Requires the device to be open. Write-only controls cannot be snapshotted and are
    /// skipped.
    pub fn acquire(&mut self) -> Result<()> {
        log::debug!("acquiring configuration from {}", self.device.path().display());
        self.device.fd()?;
        self.reset();

        let info = self.device.info()?;
        let device_section = Section {
            name: DEVICE_SECTION.to_string(),
            entries: vec![
                ("driver".into(), info.driver.clone()),
                ("card".into(), info.card.clone()),
                ("bus_info".into(), info.bus_info.clone()),
                ("version".into(), info.version.to_string()),
            ],
        };

        let controls = self.device.controls()?;
        let mut entries = Vec::with_capacity(controls.len());
        for control in &controls {
            if !control.is_readable() {
                log::debug!("skipping write-only control {:?}", control.name());
                continue;
            }
            entries.push((control.canonical_name(), control.value()?.to_string()));
        }

        self.sections = vec![
            device_section,
            Section {
                name: CONTROLS_SECTION.to_string(),
                entries,
            },
        ];
        Ok(())
    }

    /// Writes the configuration to `path`, taking a snapshot first if none is present.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        if !self.has_config() {
            self.acquire()?;
        }

        let path = path.as_ref();
        fs::write(path, self.render())?;
        log::debug!("configuration written to {}", path.display());
        Ok(())
    }

    /// Reads the configuration from `path`, replacing any prior state.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        self.sections = parse(&text)?;
        self.loaded_from = Some(path.to_path_buf());
        log::debug!("configuration read from {}", path.display());
        Ok(())
    }

    /// Verifies that the loaded configuration fits this device.
    ///
    /// Every `[controls]` entry must name a known control. With `pedantic` set, the `[device]`
    /// section must also match the device's driver, card and version.
    pub fn validate(&self, pedantic: bool) -> Result<()> {
        self.require_loaded()?;

        let controls_section = self.section(CONTROLS_SECTION).ok_or_else(|| {
            Error::Configuration(format!("mandatory section {:?} is missing", CONTROLS_SECTION))
        })?;

        let controls = self.device.controls()?;
        for (name, _) in &controls_section.entries {
            if controls.get(name.as_str()).is_err() {
                return Err(Error::Compatibility(format!(
                    "{} has no control named {:?}",
                    self.device.path().display(),
                    name,
                )));
            }
        }

        if pedantic {
            let device_section = self.section(DEVICE_SECTION).ok_or_else(|| {
                Error::Configuration(format!("section {:?} is missing", DEVICE_SECTION))
            })?;

            let info = self.device.info()?;
            for (key, have) in [
                ("driver", info.driver.clone()),
                ("card", info.card.clone()),
                ("version", info.version.to_string()),
            ] {
                let want = device_section.get(key).unwrap_or_default();
                if want != have {
                    return Err(Error::Compatibility(format!(
                        "{} mismatch: want {:?}, have {:?}",
                        key, want, have,
                    )));
                }
            }
        }

        Ok(())
    }

    /// Applies the loaded configuration to the device.
    ///
    /// Runs [`ConfigManager::apply_cycles`] with the default cycle count.
    pub fn apply(&self) -> Result<()> {
        self.apply_cycles(DEFAULT_APPLY_CYCLES)
    }

    /// Sets every writable control to its configured value, `cycles` times over.
    ///
    /// Repeating the pass lets controls settle whose writability or legal range depends on
    /// other controls. Stops on the first error.
    pub fn apply_cycles(&self, cycles: u32) -> Result<()> {
        self.require_loaded()?;
        self.device.fd()?;

        let controls_section = self.section(CONTROLS_SECTION).ok_or_else(|| {
            Error::Configuration(format!("mandatory section {:?} is missing", CONTROLS_SECTION))
        })?;
        let controls = self.device.controls()?;

        for cycle in 1..=cycles {
            for (name, value) in &controls_section.entries {
                let control = controls.get(name.as_str())?;
                if !control.is_writable() {
                    log::debug!("#{}/{} {}: skipped (not writable)", cycle, cycles, name);
                    continue;
                }
                log::debug!("#{}/{} {} => {}", cycle, cycles, name, value);
                control.set_str(value)?;
            }
        }

        Ok(())
    }

    /// Reads every readable control back and compares it against the configuration.
    ///
    /// Comparison is case-insensitive on the value strings. Fails with
    /// [`Error::DeviceState`] on the first divergence.
    pub fn verify(&self) -> Result<()> {
        self.require_loaded()?;
        self.device.fd()?;

        let controls_section = self.section(CONTROLS_SECTION).ok_or_else(|| {
            Error::Configuration(format!("mandatory section {:?} is missing", CONTROLS_SECTION))
        })?;
        let controls = self.device.controls()?;

        for (name, want) in &controls_section.entries {
            let control = controls.get(name.as_str())?;
            if !control.is_readable() {
                log::debug!("{}: skipped (not readable)", name);
                continue;
            }
            let have = control.value()?.to_string();
            if !have.eq_ignore_ascii_case(want) {
                return Err(Error::DeviceState(format!(
                    "{} should be {:?}, but is {:?}",
                    name, want, have,
                )));
            }
        }

        Ok(())
    }

    fn render(&self) -> String {
        render(&self.sections)
    }
}

fn render(sections: &[Section]) -> String {
    let mut out = String::new();
    for section in sections {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "[{}]", section.name);
        for (key, value) in &section.entries {
            let _ = writeln!(out, "{} = {}", key, value);
        }
    }
    out
}

fn parse(text: &str) -> Result<Vec<Section>> {
    let mut sections: Vec<Section> = Vec::new();

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            sections.push(Section {
                name: name.trim().to_string(),
                entries: Vec::new(),
            });
            continue;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| {
            Error::Configuration(format!("line {}: expected `key = value`", number + 1))
        })?;
        let section = sections.last_mut().ok_or_else(|| {
            Error::Configuration(format!("line {}: entry outside of any section", number + 1))
        })?;
        section
            .entries
            .push((key.trim().to_string(), value.trim().to_string()));
    }

    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# snapshot of a mock camera
[device]
driver = mock
card = mock camera
bus_info = mock:usb
version = 5.4.12

[controls]
brightness = 0
white_balance_temperature,_auto = true
";

    #[test]
    fn parse_sections_and_entries() {
        let sections = parse(SAMPLE).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "device");
        assert_eq!(sections[0].get("driver"), Some("mock"));
        assert_eq!(sections[0].get("version"), Some("5.4.12"));
        assert_eq!(sections[1].name, "controls");
        assert_eq!(sections[1].get("brightness"), Some("0"));
        assert_eq!(
            sections[1].get("white_balance_temperature,_auto"),
            Some("true")
        );
    }

    #[test]
    fn render_parse_round_trip() {
        let sections = parse(SAMPLE).unwrap();
        let rendered = render(&sections);
        assert_eq!(parse(&rendered).unwrap(), sections);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(matches!(
            parse("[device]\nnonsense"),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            parse("key = before any section"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let text = "; comment\n\n# another\n[controls]\n# inside\ngain = 4\n";
        let sections = parse(text).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].get("gain"), Some("4"));
    }
}
