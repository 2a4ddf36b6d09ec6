//! Typed device controls and the control registry.
//!
//! [`Controls`] is built from the control descriptors cached in a device's
//! [`Info`][crate::Info] snapshot. It is keyed both by numeric control id and by the control's
//! *canonical name* (lower-case, parentheses stripped, runs of whitespace joined with `_`), and
//! iterates in enumeration order.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::mem;

use crate::device::Device;
use crate::raw;
use crate::shared::{ControlFlags, CtrlType};
use crate::{Error, Result};

pub use crate::raw::controls::{Cid, CtrlClass};

/// Describes a device control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlDesc {
    pub id: u32,
    /// The user-facing name of the control.
    pub name: String,
    pub control_type: CtrlType,
    pub class: CtrlClass,
    pub minimum: i64,
    pub maximum: i64,
    pub step: u64,
    pub default_value: i64,
    pub flags: ControlFlags,
    pub elems: u32,
    pub elem_size: u32,
}

impl ControlDesc {
    pub(crate) fn from_raw(raw: &raw::QueryExtCtrl) -> Self {
        Self {
            id: raw.id,
            name: crate::byte_array_to_str(&raw.name).to_string(),
            control_type: raw.type_,
            class: CtrlClass::from_cid(Cid(raw.id)),
            minimum: raw.minimum,
            maximum: raw.maximum,
            step: raw.step,
            default_value: raw.default_value,
            flags: raw.flags,
            elems: raw.elems,
            elem_size: raw.elem_size,
        }
    }

    /// The lower-case underscore-joined identifier this control is addressed by in
    /// configuration files.
    pub fn canonical_name(&self) -> String {
        canonical_name(&self.name)
    }

    /// Whether the flag set permits writing a value.
    pub fn is_writable(&self) -> bool {
        !self.flags.intersects(
            ControlFlags::READ_ONLY
                | ControlFlags::INACTIVE
                | ControlFlags::DISABLED
                | ControlFlags::GRABBED,
        )
    }

    /// Whether the flag set permits reading the value back.
    pub fn is_readable(&self) -> bool {
        !self.flags.contains(ControlFlags::WRITE_ONLY)
    }
}

pub(crate) fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for ch in name.chars() {
        if ch == '(' || ch == ')' {
            continue;
        }
        if ch.is_whitespace() {
            pending_sep = !out.is_empty();
            continue;
        }
        if pending_sep {
            out.push('_');
            pending_sep = false;
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// The current (or requested) value of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlValue {
    Boolean(bool),
    Integer(i64),
}

impl ControlValue {
    fn as_raw(self) -> i64 {
        match self {
            ControlValue::Boolean(b) => b as i64,
            ControlValue::Integer(i) => i,
        }
    }
}

impl fmt::Display for ControlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlValue::Boolean(b) => b.fmt(f),
            ControlValue::Integer(i) => i.fmt(f),
        }
    }
}

impl From<bool> for ControlValue {
    fn from(b: bool) -> Self {
        ControlValue::Boolean(b)
    }
}

macro_rules! control_value_from_int {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for ControlValue {
                fn from(v: $ty) -> Self {
                    ControlValue::Integer(v as i64)
                }
            }
        )+
    };
}

control_value_from_int!(i8, i16, i32, i64, u8, u16, u32);

/// The modelled kind of a control, with variant-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlKind {
    Boolean,
    Integer,
    Integer64,
    U8,
    U16,
    U32,
    /// Maps valid indices to their human-readable labels.
    Menu(BTreeMap<u32, String>),
    /// Maps valid indices to their numeric meanings.
    IntegerMenu(BTreeMap<u32, i64>),
    Button,
    /// Anything the registry does not model (strings, bitmasks, compound payloads).
    Generic,
}

impl ControlKind {
    fn classify(device: &Device, desc: &ControlDesc) -> Result<Self> {
        // Array-valued controls are not modelled as numerics.
        if desc.elems > 1 {
            return Ok(ControlKind::Generic);
        }

        Ok(match desc.control_type {
            CtrlType::BOOLEAN => ControlKind::Boolean,
            CtrlType::INTEGER => ControlKind::Integer,
            CtrlType::INTEGER64 => ControlKind::Integer64,
            CtrlType::U8 => ControlKind::U8,
            CtrlType::U16 => ControlKind::U16,
            CtrlType::U32 => ControlKind::U32,
            CtrlType::BUTTON => ControlKind::Button,
            CtrlType::MENU => ControlKind::Menu(enumerate_menu(device, desc, |raw| {
                // copy out of the packed struct before borrowing
                let name = unsafe { raw.name_or_value.name };
                crate::byte_array_to_str(&name).to_string()
            })?),
            CtrlType::INTEGER_MENU => {
                ControlKind::IntegerMenu(enumerate_menu(device, desc, |raw| unsafe {
                    raw.name_or_value.value
                })?)
            }
            _ => ControlKind::Generic,
        })
    }

    fn is_numeric(&self) -> bool {
        matches!(
            self,
            ControlKind::Integer
                | ControlKind::Integer64
                | ControlKind::U8
                | ControlKind::U16
                | ControlKind::U32
        )
    }

    /// The value range representable by this kind, where narrower than `i64`.
    fn representable_range(&self) -> Option<(i64, i64)> {
        match self {
            ControlKind::Integer => Some((i32::MIN as i64, i32::MAX as i64)),
            ControlKind::U8 => Some((0, u8::MAX as i64)),
            ControlKind::U16 => Some((0, u16::MAX as i64)),
            ControlKind::U32 => Some((0, u32::MAX as i64)),
            _ => None,
        }
    }
}

/// Walks `QUERYMENU` over `[minimum, maximum]` with the descriptor's step, skipping indices the
/// driver rejects.
fn enumerate_menu<T>(
    device: &Device,
    desc: &ControlDesc,
    read: impl Fn(&raw::QueryMenu) -> T,
) -> Result<BTreeMap<u32, T>> {
    let fd = device.fd()?;
    let step = desc.step.max(1) as u32;
    let mut items = BTreeMap::new();

    let mut index = desc.minimum.max(0) as u32;
    let max = desc.maximum.max(0) as u32;
    while index <= max {
        let mut raw = raw::QueryMenu {
            id: desc.id,
            index,
            ..unsafe { mem::zeroed() }
        };
        match unsafe { raw::querymenu(fd, &mut raw) } {
            Ok(_) => {
                items.insert(index, read(&raw));
            }
            Err(nix::errno::Errno::EINVAL) => {}
            Err(e) => return Err(e.into()),
        }
        index += step;
    }

    Ok(items)
}

/// A single device control.
///
/// Shared state (id, name, flags, bounds) lives in the [`ControlDesc`]; variant-specific
/// behaviour dispatches on the [`ControlKind`] tag. The control holds a non-owning reference to
/// its device and goes through an ioctl for every value access.
pub struct Control<'a> {
    device: &'a Device,
    desc: ControlDesc,
    kind: ControlKind,
    clipping: Cell<bool>,
}

impl<'a> Control<'a> {
    pub fn desc(&self) -> &ControlDesc {
        &self.desc
    }

    pub fn id(&self) -> u32 {
        self.desc.id
    }

    pub fn name(&self) -> &str {
        &self.desc.name
    }

    pub fn canonical_name(&self) -> String {
        self.desc.canonical_name()
    }

    pub fn class(&self) -> CtrlClass {
        self.desc.class
    }

    pub fn kind(&self) -> &ControlKind {
        &self.kind
    }

    pub fn is_writable(&self) -> bool {
        self.desc.is_writable()
    }

    pub fn is_readable(&self) -> bool {
        self.desc.is_readable()
    }

    /// Whether out-of-range writes are clamped instead of rejected.
    pub fn clipping(&self) -> bool {
        self.clipping.get()
    }

    pub fn set_clipping(&self, clipping: bool) {
        self.clipping.set(clipping);
    }

    /// The menu items of a [`ControlKind::Menu`] control.
    pub fn menu_items(&self) -> Option<&BTreeMap<u32, String>> {
        match &self.kind {
            ControlKind::Menu(items) => Some(items),
            _ => None,
        }
    }

    /// The menu items of a [`ControlKind::IntegerMenu`] control.
    pub fn integer_menu_items(&self) -> Option<&BTreeMap<u32, i64>> {
        match &self.kind {
            ControlKind::IntegerMenu(items) => Some(items),
            _ => None,
        }
    }

    /// Reads the control's current value.
    pub fn value(&self) -> Result<ControlValue> {
        let raw = self.get_raw()?;
        Ok(match self.kind {
            ControlKind::Boolean => ControlValue::Boolean(raw != 0),
            _ => ControlValue::Integer(raw),
        })
    }

    /// Writes a value to the control.
    ///
    /// Values are coerced to what the control expects; numeric controls clamp or reject
    /// out-of-range values depending on the clipping mode.
    pub fn set(&self, value: impl Into<ControlValue>) -> Result<()> {
        let value = value.into();
        if !self.desc.is_writable() {
            return Err(Error::NotWritable(self.desc.name.clone()));
        }

        let raw = match self.kind {
            ControlKind::Button => {
                return Err(Error::InvalidValue {
                    control: self.desc.name.clone(),
                    value: value.to_string(),
                })
            }
            ControlKind::Boolean => match value {
                ControlValue::Boolean(b) => b as i64,
                ControlValue::Integer(i) => (i != 0) as i64,
            },
            _ => value.as_raw(),
        };

        let raw = if self.kind.is_numeric() {
            check_range(
                raw,
                self.desc.minimum,
                self.desc.maximum,
                self.clipping.get(),
            )?
        } else {
            raw
        };

        self.set_raw(raw)
    }

    /// Parses and writes a textual value.
    ///
    /// Boolean controls accept `true/1/yes/on/enable` and `false/0/no/off/disable`
    /// (case-insensitive); numeric controls accept decimal and `0x`-prefixed hexadecimal
    /// integers.
    pub fn set_str(&self, value: &str) -> Result<()> {
        let parsed = match self.kind {
            ControlKind::Boolean => ControlValue::Boolean(
                parse_bool(value).ok_or_else(|| self.invalid_value(value))?,
            ),
            _ => ControlValue::Integer(
                parse_int(value).ok_or_else(|| self.invalid_value(value))?,
            ),
        };
        self.set(parsed)
    }

    /// Writes the control's default value.
    pub fn set_to_default(&self) -> Result<()> {
        if !self.desc.is_writable() {
            return Err(Error::NotWritable(self.desc.name.clone()));
        }
        self.set_raw(self.desc.default_value)
    }

    /// Steps a numeric control up by `n` increments of its step size.
    pub fn increase(&self, n: u32) -> Result<()> {
        self.step_by(i64::from(n))
    }

    /// Steps a numeric control down by `n` increments of its step size.
    pub fn decrease(&self, n: u32) -> Result<()> {
        self.step_by(-i64::from(n))
    }

    fn step_by(&self, n: i64) -> Result<()> {
        if !self.kind.is_numeric() {
            return Err(self.invalid_value("step"));
        }
        let current = self.get_raw()?;
        self.set(current + n * self.desc.step as i64)
    }

    /// Writes 1 to a button control, triggering its action.
    pub fn push(&self) -> Result<()> {
        match self.kind {
            ControlKind::Button => {
                if !self.desc.is_writable() {
                    return Err(Error::NotWritable(self.desc.name.clone()));
                }
                self.set_raw(1)
            }
            _ => Err(self.invalid_value("push")),
        }
    }

    fn invalid_value(&self, value: &str) -> Error {
        Error::InvalidValue {
            control: self.desc.name.clone(),
            value: value.to_string(),
        }
    }

    fn get_raw(&self) -> Result<i64> {
        let fd = self.device.fd()?;
        match self.desc.control_type {
            CtrlType::INTEGER64 | CtrlType::U8 | CtrlType::U16 | CtrlType::U32 => unsafe {
                ext_value_get(fd, &self.desc)
            },
            _ => unsafe {
                let mut ctrl = raw::controls::Control {
                    id: Cid(self.desc.id),
                    value: 0,
                };
                raw::g_ctrl(fd, &mut ctrl)?;
                Ok(ctrl.value as i64)
            },
        }
    }

    fn set_raw(&self, value: i64) -> Result<()> {
        let fd = self.device.fd()?;
        match self.desc.control_type {
            CtrlType::INTEGER64 | CtrlType::U8 | CtrlType::U16 | CtrlType::U32 => unsafe {
                ext_value_set(fd, &self.desc, value)
            },
            _ => unsafe {
                let mut ctrl = raw::controls::Control {
                    id: Cid(self.desc.id),
                    value: value as i32,
                };
                raw::s_ctrl(fd, &mut ctrl)?;
                Ok(())
            },
        }
    }
}

impl fmt::Debug for Control<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("id", &format_args!("{:#010x}", self.desc.id))
            .field("name", &self.desc.name)
            .field("kind", &self.kind)
            .field("range", &(self.desc.minimum, self.desc.maximum))
            .field("default", &self.desc.default_value)
            .field("flags", &self.desc.flags)
            .finish()
    }
}

/// Scalar value exchange through the extended-control interface.
unsafe fn ext_value_get(fd: std::os::unix::prelude::RawFd, desc: &ControlDesc) -> Result<i64> {
    let mut v_u8: u8 = 0;
    let mut v_u16: u16 = 0;
    let mut v_u32: u32 = 0;

    let mut ctrl: raw::ExtControl = mem::zeroed();
    ctrl.id = desc.id;
    match desc.control_type {
        CtrlType::U8 => {
            ctrl.size = desc.elem_size.max(1);
            ctrl.value.p_u8 = &mut v_u8;
        }
        CtrlType::U16 => {
            ctrl.size = desc.elem_size.max(2);
            ctrl.value.p_u16 = &mut v_u16;
        }
        CtrlType::U32 => {
            ctrl.size = desc.elem_size.max(4);
            ctrl.value.p_u32 = &mut v_u32;
        }
        _ => {}
    }

    let mut ctrls: raw::ExtControls = mem::zeroed();
    ctrls.which = raw::CTRL_WHICH_CUR_VAL;
    ctrls.count = 1;
    ctrls.controls = &mut ctrl;
    raw::g_ext_ctrls(fd, &mut ctrls)?;

    Ok(match desc.control_type {
        CtrlType::U8 => v_u8 as i64,
        CtrlType::U16 => v_u16 as i64,
        CtrlType::U32 => v_u32 as i64,
        _ => ctrl.value.value64,
    })
}

unsafe fn ext_value_set(
    fd: std::os::unix::prelude::RawFd,
    desc: &ControlDesc,
    value: i64,
) -> Result<()> {
    let mut v_u8 = value as u8;
    let mut v_u16 = value as u16;
    let mut v_u32 = value as u32;

    let mut ctrl: raw::ExtControl = mem::zeroed();
    ctrl.id = desc.id;
    match desc.control_type {
        CtrlType::U8 => {
            ctrl.size = desc.elem_size.max(1);
            ctrl.value.p_u8 = &mut v_u8;
        }
        CtrlType::U16 => {
            ctrl.size = desc.elem_size.max(2);
            ctrl.value.p_u16 = &mut v_u16;
        }
        CtrlType::U32 => {
            ctrl.size = desc.elem_size.max(4);
            ctrl.value.p_u32 = &mut v_u32;
        }
        _ => ctrl.value.value64 = value,
    }

    let mut ctrls: raw::ExtControls = mem::zeroed();
    ctrls.which = raw::CTRL_WHICH_CUR_VAL;
    ctrls.count = 1;
    ctrls.controls = &mut ctrl;
    raw::s_ext_ctrls(fd, &mut ctrls)?;
    Ok(())
}

/// Clamps or rejects `value` against `[min, max]`.
fn check_range(value: i64, min: i64, max: i64, clipping: bool) -> Result<i64> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else if clipping {
        Ok(value.clamp(min, max))
    } else {
        Err(Error::OutOfRange { value, min, max })
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enable" => Some(true),
        "false" | "0" | "no" | "off" | "disable" => Some(false),
        _ => None,
    }
}

fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let value = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i64>().ok()?,
    };
    Some(if negative { -value } else { value })
}

/// The keyed collection of a device's controls.
pub struct Controls<'a> {
    entries: Vec<Control<'a>>,
    by_id: HashMap<u32, usize>,
    by_name: HashMap<String, usize>,
}

/// A lookup key for [`Controls::get`]: either a numeric control id or a canonical name.
#[derive(Debug, Clone, Copy)]
pub enum ControlKey<'k> {
    Id(u32),
    Name(&'k str),
}

impl From<u32> for ControlKey<'_> {
    fn from(id: u32) -> Self {
        ControlKey::Id(id)
    }
}

impl From<Cid> for ControlKey<'_> {
    fn from(cid: Cid) -> Self {
        ControlKey::Id(cid.0)
    }
}

impl<'k> From<&'k str> for ControlKey<'k> {
    fn from(name: &'k str) -> Self {
        ControlKey::Name(name)
    }
}

impl<'a> Controls<'a> {
    pub(crate) fn new(device: &'a Device, descs: &[ControlDesc]) -> Result<Self> {
        let mut entries = Vec::with_capacity(descs.len());
        let mut by_id = HashMap::with_capacity(descs.len());
        let mut by_name = HashMap::with_capacity(descs.len());

        for desc in descs {
            let kind = ControlKind::classify(device, desc)?;
            if let Some((lo, hi)) = kind.representable_range() {
                if desc.minimum < lo || desc.maximum > hi {
                    log::warn!(
                        "control {:?} claims range [{}, {}] outside of its type's range [{}, {}]",
                        desc.name,
                        desc.minimum,
                        desc.maximum,
                        lo,
                        hi,
                    );
                }
            }

            by_id.insert(desc.id, entries.len());
            by_name.insert(desc.canonical_name(), entries.len());
            entries.push(Control {
                device,
                desc: desc.clone(),
                kind,
                clipping: Cell::new(false),
            });
        }

        Ok(Self {
            entries,
            by_id,
            by_name,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks a control up by id or canonical name.
    pub fn get<'k>(&self, key: impl Into<ControlKey<'k>>) -> Result<&Control<'a>> {
        let key = key.into();
        let index = match key {
            ControlKey::Id(id) => self.by_id.get(&id),
            ControlKey::Name(name) => self.by_name.get(name),
        };
        index
            .map(|&i| &self.entries[i])
            .ok_or_else(|| Error::NotFound(format!("{:?}", key)))
    }

    /// Iterates over all controls in enumeration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Control<'a>> {
        self.entries.iter()
    }

    /// Iterates over the controls belonging to `class`.
    pub fn with_class(&self, class: CtrlClass) -> impl Iterator<Item = &Control<'a>> + '_ {
        self.entries.iter().filter(move |c| c.desc.class == class)
    }

    /// The distinct control classes present, in enumeration order.
    pub fn used_classes(&self) -> Vec<CtrlClass> {
        let mut classes = Vec::new();
        for control in &self.entries {
            if !classes.contains(&control.desc.class) {
                classes.push(control.desc.class);
            }
        }
        classes
    }

    /// Resets every control to its default value, best-effort.
    ///
    /// Failures on individual controls are logged and swallowed.
    pub fn set_to_default(&self) {
        for control in &self.entries {
            if let Err(e) = control.set_to_default() {
                log::debug!("skipping reset of {:?}: {}", control.desc.name, e);
            }
        }
    }

    /// Toggles clipping on all numeric controls.
    pub fn set_clipping(&self, clipping: bool) {
        for control in &self.entries {
            if control.kind.is_numeric() {
                control.set_clipping(clipping);
            }
        }
    }
}

impl<'c, 'a> IntoIterator for &'c Controls<'a> {
    type Item = &'c Control<'a>;
    type IntoIter = std::slice::Iter<'c, Control<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names() {
        assert_eq!(canonical_name("Brightness"), "brightness");
        assert_eq!(canonical_name("Gain (dB)"), "gain_db");
        assert_eq!(
            canonical_name("White Balance Temperature, Auto"),
            "white_balance_temperature,_auto"
        );
        assert_eq!(canonical_name("Multi   Space"), "multi_space");
    }

    #[test]
    fn clipping_clamps_and_rejects() {
        // brightness-style range
        assert_eq!(check_range(200, -64, 64, true).unwrap(), 64);
        assert_eq!(check_range(-200, -64, 64, true).unwrap(), -64);
        assert_eq!(check_range(32, -64, 64, true).unwrap(), 32);

        assert_eq!(check_range(32, -64, 64, false).unwrap(), 32);
        assert!(matches!(
            check_range(65, -64, 64, false),
            Err(Error::OutOfRange {
                value: 65,
                min: -64,
                max: 64
            })
        ));
    }

    #[test]
    fn boolean_spellings() {
        for s in ["true", "TRUE", "1", "yes", "on", "enable"] {
            assert_eq!(parse_bool(s), Some(true), "{s:?}");
        }
        for s in ["false", "False", "0", "no", "off", "disable"] {
            assert_eq!(parse_bool(s), Some(false), "{s:?}");
        }
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool("2"), None);
    }

    #[test]
    fn integer_spellings() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("-64"), Some(-64));
        assert_eq!(parse_int("0x1f"), Some(31));
        assert_eq!(parse_int("0X1F"), Some(31));
        assert_eq!(parse_int("-0x10"), Some(-16));
        assert_eq!(parse_int("ten"), None);
        assert_eq!(parse_int(""), None);
    }

    #[test]
    fn representable_ranges() {
        assert_eq!(
            ControlKind::U8.representable_range(),
            Some((0, u8::MAX as i64))
        );
        assert_eq!(
            ControlKind::Integer.representable_range(),
            Some((i32::MIN as i64, i32::MAX as i64))
        );
        assert_eq!(ControlKind::Integer64.representable_range(), None);
        assert!(ControlKind::U16.is_numeric());
        assert!(!ControlKind::Button.is_numeric());
    }

    #[test]
    fn control_value_display() {
        assert_eq!(ControlValue::Boolean(true).to_string(), "true");
        assert_eq!(ControlValue::Boolean(false).to_string(), "false");
        assert_eq!(ControlValue::Integer(-5).to_string(), "-5");
    }

    fn desc(id: u32, name: &str, control_type: CtrlType) -> ControlDesc {
        ControlDesc {
            id,
            name: name.to_string(),
            control_type,
            class: CtrlClass::from_cid(Cid(id)),
            minimum: -64,
            maximum: 64,
            step: 1,
            default_value: 0,
            flags: ControlFlags::empty(),
            elems: 1,
            elem_size: 4,
        }
    }

    // Building a registry without menu controls never issues an ioctl, so a closed device
    // is enough to exercise the lookup and grouping logic.
    #[test]
    fn registry_lookup_and_classes() {
        let device = Device::new("/dev/null");
        let descs = [
            desc(Cid::BRIGHTNESS.0, "Brightness", CtrlType::INTEGER),
            desc(Cid::CONTRAST.0, "Contrast", CtrlType::INTEGER),
            desc(Cid::EXPOSURE_AUTO_PRIORITY.0, "Exposure, Auto Priority", CtrlType::BOOLEAN),
        ];
        let controls = Controls::new(&device, &descs).unwrap();

        assert_eq!(controls.len(), 3);
        assert_eq!(controls.get(Cid::BRIGHTNESS).unwrap().name(), "Brightness");
        assert_eq!(
            controls.get("exposure,_auto_priority").unwrap().id(),
            Cid::EXPOSURE_AUTO_PRIORITY.0,
        );
        assert!(matches!(
            controls.get("no_such_control"),
            Err(Error::NotFound(_))
        ));

        // grouping covers exactly the classes of the registered controls
        assert_eq!(controls.used_classes(), &[CtrlClass::USER, CtrlClass::CAMERA]);
        assert_eq!(controls.with_class(CtrlClass::USER).count(), 2);
        assert_eq!(controls.with_class(CtrlClass::CAMERA).count(), 1);
        assert_eq!(controls.with_class(CtrlClass::FLASH).count(), 0);

        // iteration preserves enumeration order
        let names: Vec<_> = controls.iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, ["Brightness", "Contrast", "Exposure, Auto Priority"]);

        controls.set_clipping(true);
        assert!(controls.get(Cid::BRIGHTNESS).unwrap().clipping());
        // booleans are not numeric, so clipping does not apply to them
        assert!(!controls.get(Cid::EXPOSURE_AUTO_PRIORITY).unwrap().clipping());
    }
}
