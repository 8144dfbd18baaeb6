//! Key and button bindings.
//!
//! Bindings are written as a run of `<Modifier>` tokens followed by a key
//! name or `ButtonN`, e.g. `<Control><Alt>Left` or `<Super>Button1`. An empty
//! binding is written as `Disabled`. Key names depend on the display's
//! keyboard mapping, so formatting and parsing key bindings go through a
//! [`KeyResolver`].

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

const DISABLED: &str = "Disabled";

bitflags! {
    /// Modifier mask of a binding. Bit positions follow the X11 core masks,
    /// virtual modifiers live above them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u32 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 2;
        const MOD1 = 1 << 3;
        const MOD2 = 1 << 4;
        const MOD3 = 1 << 5;
        const MOD4 = 1 << 6;
        const MOD5 = 1 << 7;
        const ALT = 1 << 8;
        const META = 1 << 9;
        const SUPER = 1 << 10;
        const HYPER = 1 << 11;
        const MODE_SWITCH = 1 << 12;
    }
}

const MODIFIER_NAMES: [(&str, Modifiers); 12] = [
    ("Shift", Modifiers::SHIFT),
    ("Control", Modifiers::CONTROL),
    ("Mod1", Modifiers::MOD1),
    ("Mod2", Modifiers::MOD2),
    ("Mod3", Modifiers::MOD3),
    ("Mod4", Modifiers::MOD4),
    ("Mod5", Modifiers::MOD5),
    ("Alt", Modifiers::ALT),
    ("Meta", Modifiers::META),
    ("Super", Modifiers::SUPER),
    ("Hyper", Modifiers::HYPER),
    ("ModeSwitch", Modifiers::MODE_SWITCH),
];

impl Modifiers {
    /// Formats the mask as `<Name>` tokens in canonical order.
    pub fn to_binding_prefix(self) -> String {
        MODIFIER_NAMES
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| format!("<{name}>"))
            .collect()
    }

    /// Consumes the leading `<Name>` tokens of a binding string.
    ///
    /// Unknown modifier names are skipped. Returns the mask and the remainder
    /// after the last consumed token.
    pub fn parse_binding_prefix(s: &str) -> (Modifiers, &str) {
        let mut mods = Modifiers::empty();
        let mut rest = s.trim_start();

        while let Some(inner) = rest.strip_prefix('<') {
            let Some(end) = inner.find('>') else {
                break;
            };
            let name = &inner[..end];
            if let Some((_, flag)) = MODIFIER_NAMES
                .iter()
                .find(|(known, _)| known.eq_ignore_ascii_case(name))
            {
                mods |= *flag;
            }
            rest = inner[end + 1..].trim_start();
        }

        (mods, rest)
    }
}

/// Maps key codes to key names for one display.
pub trait KeyResolver {
    /// Returns the key name for a key code, if the keymap has one.
    fn key_name(&self, keycode: u32) -> Option<String>;

    /// Returns the key code producing a named key, if any.
    fn keycode(&self, name: &str) -> Option<u32>;
}

/// A keyboard binding. `keycode == None` with modifiers set is a
/// modifier-only binding; both empty means disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct KeyBinding {
    pub modifiers: Modifiers,
    pub keycode: Option<u32>,
}

impl KeyBinding {
    #[must_use]
    pub const fn new(modifiers: Modifiers, keycode: u32) -> Self {
        Self {
            modifiers,
            keycode: Some(keycode),
        }
    }

    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            modifiers: Modifiers::empty(),
            keycode: None,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.modifiers.is_empty() && self.keycode.is_none()
    }

    /// Formats the binding, resolving the key code to its name.
    ///
    /// Key codes without a name are written as `0x` hex.
    pub fn format(&self, resolver: &dyn KeyResolver) -> String {
        let mut out = self.modifiers.to_binding_prefix();
        if let Some(code) = self.keycode {
            match resolver.key_name(code) {
                Some(name) => out.push_str(&name),
                None => out.push_str(&format!("0x{code:x}")),
            }
        }
        if out.is_empty() {
            out.push_str(DISABLED);
        }
        out
    }

    /// Parses a binding string. Anything that does not resolve to a key or a
    /// modifier-only binding yields a disabled binding.
    pub fn parse(s: &str, resolver: &dyn KeyResolver) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(DISABLED) {
            return Self::disabled();
        }

        let (modifiers, rest) = Modifiers::parse_binding_prefix(s);
        let rest = rest.trim();
        if rest.is_empty() {
            return Self {
                modifiers,
                keycode: None,
            };
        }

        if let Some(code) = resolver.keycode(rest) {
            return Self::new(modifiers, code);
        }
        if let Some(hex) = rest.strip_prefix("0x") {
            if let Ok(code) = u32::from_str_radix(hex, 16) {
                return Self::new(modifiers, code);
            }
        }

        Self::disabled()
    }
}

/// A pointer button binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ButtonBinding {
    pub modifiers: Modifiers,
    pub button: Option<u32>,
}

impl ButtonBinding {
    #[must_use]
    pub const fn new(modifiers: Modifiers, button: u32) -> Self {
        Self {
            modifiers,
            button: Some(button),
        }
    }

    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            modifiers: Modifiers::empty(),
            button: None,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.modifiers.is_empty() && self.button.is_none()
    }

    pub fn format(&self) -> String {
        let mut out = self.modifiers.to_binding_prefix();
        if let Some(button) = self.button {
            out.push_str(&format!("Button{button}"));
        }
        if out.is_empty() {
            out.push_str(DISABLED);
        }
        out
    }

    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(DISABLED) {
            return Self::disabled();
        }

        let (modifiers, rest) = Modifiers::parse_binding_prefix(s);
        let rest = rest.trim();
        if rest.is_empty() {
            return Self {
                modifiers,
                button: None,
            };
        }

        match rest
            .strip_prefix("Button")
            .and_then(|n| n.parse::<u32>().ok())
        {
            Some(button) => Self::new(modifiers, button),
            None => Self::disabled(),
        }
    }
}
