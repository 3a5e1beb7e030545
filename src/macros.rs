//! Macro expansion of logical buttons into display buttons.
//!
//! Many games bind a shortcut button to a chord (Street Fighter's PP is HP+HK
//! on a default layout). A theme ships a template of such expansions; the
//! player can override any entry. Lookup order is custom, then template,
//! then the button itself.

use std::collections::{BTreeMap, HashMap};

use smallvec::{SmallVec, smallvec};

use crate::buttons::ButtonName;
use crate::buttons::ButtonName as B;
use crate::state::State;

/// Expansion of one logical button.
pub type Macro = SmallVec<[ButtonName; 4]>;

/// Built-in button theme and its default macro template.
#[derive(Debug)]
pub struct ThemeTemplate {
    pub name: &'static str,
    pub macros: &'static [(ButtonName, &'static [ButtonName])],
}

impl ThemeTemplate {
    /// Finds a built-in theme by name, ignoring case.
    pub fn find(name: &str) -> Option<&'static ThemeTemplate> {
        THEMES.iter().find(|t| t.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn get(&self, name: ButtonName) -> Option<&'static [ButtonName]> {
        self.macros
            .iter()
            .find_map(|(key, value)| (*key == name).then_some(*value))
    }
}

const TRIPLE: &[(ButtonName, &[ButtonName])] = &[
    (B::PP, &[B::LP, B::MP, B::HP]),
    (B::KK, &[B::LK, B::MK, B::HK]),
];

pub const DEFAULT_THEME: &str = "Street Fighter 6";

pub static THEMES: &[ThemeTemplate] = &[
    ThemeTemplate {
        name: "Street Fighter 6",
        macros: &[(B::PP, &[B::HP, B::HK]), (B::KK, &[B::MP, B::MK])],
    },
    ThemeTemplate {
        name: "SF6 Modern",
        macros: &[(B::KK, &[B::LP, B::LK])],
    },
    ThemeTemplate {
        name: "SF5",
        macros: TRIPLE,
    },
    ThemeTemplate {
        name: "SF4",
        macros: TRIPLE,
    },
    ThemeTemplate {
        name: "SFxT",
        macros: TRIPLE,
    },
    ThemeTemplate {
        name: "MVC3",
        macros: &[
            (B::KK, &[B::PP, B::HP]),
            (B::HK, &[B::LP, B::MP, B::MK]),
        ],
    },
    ThemeTemplate {
        name: "MVCI",
        macros: &[(B::KK, &[B::LP, B::MP]), (B::HK, &[B::LK, B::MK])],
    },
    ThemeTemplate {
        name: "2XKO",
        macros: &[],
    },
    ThemeTemplate {
        name: "DBFZ",
        macros: &[(B::HP, &[B::LP, B::MP]), (B::HK, &[B::LK, B::MK])],
    },
    ThemeTemplate {
        name: "KOF",
        macros: &[
            (B::PP, &[B::LP, B::LK]),
            (B::HP, &[B::MP, B::LK]),
            (B::HK, &[B::LP, B::MP]),
            (B::KK, &[B::LK, B::MK]),
        ],
    },
    ThemeTemplate {
        name: "NeoGeo",
        macros: &[],
    },
    ThemeTemplate {
        name: "Tekken - XBox",
        macros: &[],
    },
    ThemeTemplate {
        name: "Tekken - PlayStation",
        macros: &[],
    },
    ThemeTemplate {
        name: "Guilty Gear",
        macros: &[(B::HK, &[])],
    },
    ThemeTemplate {
        name: "BlazBlue",
        macros: &[
            (B::HP, &[B::LP, B::MP]),
            (B::PP, &[B::LP, B::MP, B::MK]),
        ],
    },
    ThemeTemplate {
        name: "DNF Duel",
        macros: &[(B::PP, &[B::LP, B::MP]), (B::HP, &[B::MP, B::MK])],
    },
    ThemeTemplate {
        name: "GranBlue",
        macros: &[(B::PP, &[B::MP, B::MK]), (B::KK, &[B::LP, B::LK])],
    },
    ThemeTemplate {
        name: "Melty Blood",
        macros: &[
            (B::HP, &[B::MP, B::MK]),
            (B::HK, &[B::LP, B::MP]),
            (B::PP, &[B::LP, B::LK]),
            (B::KK, &[B::LP, B::MP, B::MK]),
        ],
    },
    ThemeTemplate {
        name: "SoulCalibur 6",
        macros: &[
            (B::KK, &[B::LP, B::LK]),
            (B::PP, &[B::LP, B::MP]),
            (B::HP, &[B::MP, B::LK]),
            (B::HK, &[B::LP, B::MP, B::MK]),
        ],
    },
    ThemeTemplate {
        name: "Virtua Fighter",
        macros: &[
            (B::LK, &[B::MP]),
            (B::PP, &[B::MP, B::LP]),
            (B::KK, &[B::MP, B::MK, B::LP]),
            (B::HP, &[B::MP, B::MK]),
            (B::HK, &[B::MK, B::LP]),
        ],
    },
    ThemeTemplate {
        name: "DOA6",
        macros: &[(B::PP, &[B::MP, B::MK]), (B::HK, &[B::LP, B::MK])],
    },
    ThemeTemplate {
        name: "PlayStation",
        macros: &[],
    },
    ThemeTemplate {
        name: "XBOX",
        macros: &[],
    },
    ThemeTemplate {
        name: "Switch",
        macros: &[],
    },
];

/// Player-defined expansions, overriding the theme template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroTable {
    entries: HashMap<ButtonName, Macro>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: ButtonName) -> Option<&[ButtonName]> {
        self.entries.get(&name).map(|m| m.as_slice())
    }

    pub fn insert(&mut self, name: ButtonName, expansion: impl IntoIterator<Item = ButtonName>) {
        self.entries.insert(name, expansion.into_iter().collect());
    }

    pub fn remove(&mut self, name: ButtonName) -> Option<Macro> {
        self.entries.remove(&name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a table from config names. Entries that do not parse, or whose
    /// key is not a single button, are skipped with a warning.
    pub fn from_names(names: &BTreeMap<String, Vec<String>>) -> Self {
        let mut table = Self::new();
        for (key, values) in names {
            let name = match key.parse::<ButtonName>() {
                Ok(name) if name.as_str().is_some() => name,
                _ => {
                    log::warn!("Ignoring macro for invalid button {key:?}");
                    continue;
                }
            };
            let expansion: Result<Macro, _> = values.iter().map(|v| v.parse()).collect();
            match expansion {
                Ok(expansion) => {
                    table.entries.insert(name, expansion);
                }
                Err(e) => log::warn!("Ignoring macro for {name}: {e}"),
            }
        }
        table
    }

    /// Inverse of [`MacroTable::from_names`].
    pub fn to_names(&self) -> BTreeMap<String, Vec<String>> {
        self.entries
            .iter()
            .map(|(name, expansion)| {
                (
                    name.to_string(),
                    expansion.iter().map(|b| b.to_string()).collect(),
                )
            })
            .collect()
    }
}

/// Expands one logical button. The result keeps the order of the macro and
/// drops repeated entries.
pub fn resolve(
    name: ButtonName,
    theme: Option<&ThemeTemplate>,
    custom: Option<&MacroTable>,
) -> Macro {
    let found = custom
        .and_then(|table| table.get(name))
        .or_else(|| theme.and_then(|t| t.get(name)));

    let Some(expansion) = found else {
        return smallvec![name];
    };

    let mut result = Macro::new();
    for &button in expansion {
        if !result.contains(&button) {
            result.push(button);
        }
    }
    result
}

/// One icon of an expanded chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordIcon {
    pub button: ButtonName,
    /// Contributed by a held button; drawn dimmed.
    pub holding: bool,
}

/// Expands every down button of a snapshot into the icons to draw, sorted by
/// button and without duplicates. When `shadow_holding` is off, held buttons
/// are left out entirely.
pub fn expand_chord(
    state: &State,
    theme: Option<&ThemeTemplate>,
    custom: Option<&MacroTable>,
    shadow_holding: bool,
) -> SmallVec<[ChordIcon; 8]> {
    let mut current = ButtonName::NONE;
    let mut holding = ButtonName::NONE;

    for (name, button) in state.buttons() {
        if !button.active() || (!shadow_holding && button.holding()) {
            continue;
        }
        for btn in resolve(name, theme, custom) {
            current |= btn;
            if button.holding() {
                holding |= btn;
            }
        }
    }

    ButtonName::ALL
        .into_iter()
        .filter(|b| current.contains(*b))
        .map(|button| ChordIcon {
            button,
            holding: holding.contains(button),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Button, ButtonStatus};

    #[test]
    fn test_identity_fallback() {
        let theme = ThemeTemplate::find("2XKO");
        assert_eq!(resolve(B::PP, theme, None).as_slice(), &[B::PP]);
        assert_eq!(resolve(B::LP, None, None).as_slice(), &[B::LP]);
    }

    #[test]
    fn test_theme_template() {
        let theme = ThemeTemplate::find("street fighter 6");
        assert!(theme.is_some());
        assert_eq!(resolve(B::PP, theme, None).as_slice(), &[B::HP, B::HK]);
        assert_eq!(resolve(B::LP, theme, None).as_slice(), &[B::LP]);
    }

    #[test]
    fn test_custom_overrides_template() {
        let theme = ThemeTemplate::find(DEFAULT_THEME);
        let mut custom = MacroTable::new();
        custom.insert(B::PP, [B::LP, B::MP, B::HP]);

        assert_eq!(
            resolve(B::PP, theme, Some(&custom)).as_slice(),
            &[B::LP, B::MP, B::HP]
        );
        assert_eq!(resolve(B::KK, theme, Some(&custom)).as_slice(), &[B::MP, B::MK]);
    }

    #[test]
    fn test_resolve_deduplicates() {
        let mut custom = MacroTable::new();
        custom.insert(B::KK, [B::LK, B::MK, B::LK]);
        assert_eq!(resolve(B::KK, None, Some(&custom)).as_slice(), &[B::LK, B::MK]);
    }

    #[test]
    fn test_empty_macro_hides_button() {
        let theme = ThemeTemplate::find("Guilty Gear");
        assert!(resolve(B::HK, theme, None).is_empty());
    }

    #[test]
    fn test_from_names_skips_invalid() {
        let mut names = BTreeMap::new();
        names.insert("PP".to_string(), vec!["LP".to_string(), "MP".to_string()]);
        names.insert("LP+MP".to_string(), vec!["HP".to_string()]);
        names.insert("KK".to_string(), vec!["Turbo".to_string()]);

        let table = MacroTable::from_names(&names);
        assert_eq!(table.get(B::PP), Some(&[B::LP, B::MP][..]));
        assert_eq!(table.get(B::KK), None);
        assert_eq!(table.get(B::LP | B::MP), None);
        assert_eq!(table.to_names().len(), 1);
    }

    #[test]
    fn test_expand_chord_sorted_and_marks_holding() {
        let theme = ThemeTemplate::find(DEFAULT_THEME);
        let mut state = State::default();
        state.pp = Button::new(ButtonStatus::Pressed); // HP + HK
        state.lp = Button::new(ButtonStatus::Holding);
        state.hk = Button::new(ButtonStatus::Holding);

        let icons = expand_chord(&state, theme, None, true);
        let buttons: Vec<_> = icons.iter().map(|i| i.button).collect();
        assert_eq!(buttons, vec![B::LP, B::HP, B::HK]);
        assert!(icons[0].holding);
        assert!(!icons[1].holding);
        assert!(icons[2].holding);
    }

    #[test]
    fn test_expand_chord_without_shadow_holding() {
        let mut state = State::default();
        state.mk = Button::new(ButtonStatus::Pressed);
        state.lp = Button::new(ButtonStatus::Holding);
        state.hp = Button::new(ButtonStatus::Released);

        let icons = expand_chord(&state, None, None, false);
        assert_eq!(
            icons.as_slice(),
            &[ChordIcon {
                button: B::MK,
                holding: false
            }]
        );
    }
}
