//! Logical button to physical control bindings.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::buttons::ButtonName;
use crate::device::PadButton;

/// Identifier of the keyboard pseudo-device.
pub const KEYBOARD_IDENTIFIER: &str = "Keyboard";

static DEFAULT_MAP: LazyLock<ButtonMap> = LazyLock::new(ButtonMap::default);

/// Bindings for one device. `None` leaves the logical button unmapped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ButtonMap {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(with = "binding", default = "defaults::lp")]
    pub lp: Option<PadButton>,
    #[serde(with = "binding", default = "defaults::mp")]
    pub mp: Option<PadButton>,
    #[serde(with = "binding", default = "defaults::hp")]
    pub hp: Option<PadButton>,
    #[serde(with = "binding", default = "defaults::pp")]
    pub pp: Option<PadButton>,
    #[serde(with = "binding", default = "defaults::lk")]
    pub lk: Option<PadButton>,
    #[serde(with = "binding", default = "defaults::mk")]
    pub mk: Option<PadButton>,
    #[serde(with = "binding", default = "defaults::hk")]
    pub hk: Option<PadButton>,
    #[serde(with = "binding", default = "defaults::kk")]
    pub kk: Option<PadButton>,
    #[serde(with = "binding", default = "defaults::ls")]
    pub ls: Option<PadButton>,
    #[serde(with = "binding", default = "defaults::rs")]
    pub rs: Option<PadButton>,
}

fn default_name() -> String {
    "Default".to_string()
}

mod defaults {
    use crate::device::PadButton;

    pub fn lp() -> Option<PadButton> {
        Some(PadButton::X)
    }
    pub fn mp() -> Option<PadButton> {
        Some(PadButton::Y)
    }
    pub fn hp() -> Option<PadButton> {
        Some(PadButton::RightShoulder)
    }
    pub fn pp() -> Option<PadButton> {
        Some(PadButton::LeftShoulder)
    }
    pub fn lk() -> Option<PadButton> {
        Some(PadButton::A)
    }
    pub fn mk() -> Option<PadButton> {
        Some(PadButton::B)
    }
    pub fn hk() -> Option<PadButton> {
        Some(PadButton::RightTrigger)
    }
    pub fn kk() -> Option<PadButton> {
        Some(PadButton::LeftTrigger)
    }
    pub fn ls() -> Option<PadButton> {
        Some(PadButton::LeftStick)
    }
    pub fn rs() -> Option<PadButton> {
        Some(PadButton::RightStick)
    }
}

/// Serializes a binding as its control name, or `"None"` when unmapped.
mod binding {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::device::PadButton;

    pub fn serialize<S: Serializer>(value: &Option<PadButton>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(button) => s.serialize_str(button.as_str()),
            None => s.serialize_str("None"),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<PadButton>, D::Error> {
        let name = String::deserialize(d)?;
        if name.trim().eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        name.parse().map(Some).map_err(serde::de::Error::custom)
    }
}

impl Default for ButtonMap {
    fn default() -> Self {
        Self::named(default_name())
    }
}

impl ButtonMap {
    /// Default bindings under a device name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lp: defaults::lp(),
            mp: defaults::mp(),
            hp: defaults::hp(),
            pp: defaults::pp(),
            lk: defaults::lk(),
            mk: defaults::mk(),
            hk: defaults::hk(),
            kk: defaults::kk(),
            ls: defaults::ls(),
            rs: defaults::rs(),
        }
    }

    fn slot(&self, name: ButtonName) -> Option<&Option<PadButton>> {
        Some(match name {
            ButtonName::LP => &self.lp,
            ButtonName::MP => &self.mp,
            ButtonName::HP => &self.hp,
            ButtonName::PP => &self.pp,
            ButtonName::LK => &self.lk,
            ButtonName::MK => &self.mk,
            ButtonName::HK => &self.hk,
            ButtonName::KK => &self.kk,
            ButtonName::LS => &self.ls,
            ButtonName::RS => &self.rs,
            _ => return None,
        })
    }

    fn slot_mut(&mut self, name: ButtonName) -> Option<&mut Option<PadButton>> {
        Some(match name {
            ButtonName::LP => &mut self.lp,
            ButtonName::MP => &mut self.mp,
            ButtonName::HP => &mut self.hp,
            ButtonName::PP => &mut self.pp,
            ButtonName::LK => &mut self.lk,
            ButtonName::MK => &mut self.mk,
            ButtonName::HK => &mut self.hk,
            ButtonName::KK => &mut self.kk,
            ButtonName::LS => &mut self.ls,
            ButtonName::RS => &mut self.rs,
            _ => return None,
        })
    }

    /// Physical control bound to a single logical button.
    /// Chords and the empty set are never mapped.
    #[inline]
    pub fn get(&self, name: ButtonName) -> Option<PadButton> {
        self.slot(name).copied().flatten()
    }

    /// Logical button bound to a physical control, if any.
    pub fn lookup(&self, pad: PadButton) -> Option<ButtonName> {
        ButtonName::ALL
            .into_iter()
            .find(|name| self.get(*name) == Some(pad))
    }

    /// Binds `pad` to `name`. A control already bound to another logical
    /// button is taken away from it, so no control drives two buttons.
    pub fn set(&mut self, name: ButtonName, pad: Option<PadButton>) {
        if self.slot(name).is_none() {
            log::warn!("Unmappable button {name}");
            return;
        }

        if let Some(pad) = pad
            && let Some(previous) = self.lookup(pad)
            && previous != name
        {
            log::debug!("{pad} moved from {previous} to {name}");
            if let Some(slot) = self.slot_mut(previous) {
                *slot = None;
            }
        }

        if let Some(slot) = self.slot_mut(name) {
            *slot = pad;
        }
    }

    /// Restores the default bindings, keeping the device name.
    pub fn reset(&mut self) {
        let name = std::mem::take(&mut self.name);
        *self = Self::named(name);
    }
}

/// Button maps keyed by device identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct InputMap {
    pub maps: BTreeMap<String, ButtonMap>,
}

impl InputMap {
    pub fn contains(&self, identifier: &str) -> bool {
        self.maps.contains_key(identifier)
    }

    /// Registers a device with default bindings. Existing maps are kept.
    pub fn add_device(&mut self, identifier: &str, display_name: &str) -> &mut ButtonMap {
        self.maps
            .entry(identifier.to_string())
            .or_insert_with(|| ButtonMap::named(display_name))
    }

    pub fn get_mapping(&self, identifier: &str) -> Option<&ButtonMap> {
        if identifier.trim().is_empty() {
            return None;
        }
        self.maps.get(identifier)
    }

    pub fn get_mapping_mut(&mut self, identifier: &str) -> Option<&mut ButtonMap> {
        self.maps.get_mut(identifier)
    }

    /// Map for a device, falling back to the default bindings.
    pub fn get_mapping_or_default(&self, identifier: &str) -> &ButtonMap {
        self.get_mapping(identifier).unwrap_or(&DEFAULT_MAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let map = ButtonMap::default();
        assert_eq!(map.get(ButtonName::LP), Some(PadButton::X));
        assert_eq!(map.get(ButtonName::KK), Some(PadButton::LeftTrigger));
        assert_eq!(map.get(ButtonName::LP | ButtonName::MP), None);
        assert_eq!(map.get(ButtonName::NONE), None);
        assert_eq!(map.lookup(PadButton::B), Some(ButtonName::MK));
        assert_eq!(map.lookup(PadButton::Start), None);
    }

    #[test]
    fn test_set_swaps_existing_binding() {
        let mut map = ButtonMap::default();
        map.set(ButtonName::LP, Some(PadButton::A));

        assert_eq!(map.get(ButtonName::LP), Some(PadButton::A));
        assert_eq!(map.get(ButtonName::LK), None);
        assert_eq!(map.lookup(PadButton::A), Some(ButtonName::LP));
    }

    #[test]
    fn test_set_same_binding_is_noop() {
        let mut map = ButtonMap::default();
        map.set(ButtonName::MP, Some(PadButton::Y));
        assert_eq!(map, ButtonMap::default());
    }

    #[test]
    fn test_set_ignores_chords() {
        let mut map = ButtonMap::default();
        map.set(ButtonName::LP | ButtonName::LK, Some(PadButton::Start));
        assert_eq!(map, ButtonMap::default());
    }

    #[test]
    fn test_unmap_and_reset() {
        let mut map = ButtonMap::named("Arcade Stick");
        map.set(ButtonName::HK, None);
        assert_eq!(map.get(ButtonName::HK), None);

        map.reset();
        assert_eq!(map.get(ButtonName::HK), Some(PadButton::RightTrigger));
        assert_eq!(map.name, "Arcade Stick");
    }

    #[test]
    fn test_input_map_fallback() {
        let mut input_map = InputMap::default();
        input_map
            .add_device("pad-1", "Arcade Stick")
            .set(ButtonName::LP, Some(PadButton::Start));

        assert!(input_map.contains("pad-1"));
        assert_eq!(
            input_map.get_mapping_or_default("pad-1").get(ButtonName::LP),
            Some(PadButton::Start)
        );
        assert_eq!(input_map.get_mapping_or_default("unknown").name, "Default");
        assert!(input_map.get_mapping("  ").is_none());
    }
}
