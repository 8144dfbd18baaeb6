use optsync_types::{ButtonBinding, EdgeMask, KeyBinding, KeyResolver, Modifiers};
use std::collections::HashMap;

struct Keymap(HashMap<&'static str, u32>);

impl Keymap {
    fn us() -> Self {
        Self(HashMap::from([("Left", 113), ("F1", 67), ("a", 38), ("Tab", 23)]))
    }
}

impl KeyResolver for Keymap {
    fn key_name(&self, keycode: u32) -> Option<String> {
        self.0
            .iter()
            .find(|(_, code)| **code == keycode)
            .map(|(name, _)| name.to_string())
    }

    fn keycode(&self, name: &str) -> Option<u32> {
        self.0.get(name).copied()
    }
}

// ── Modifiers ─────────────────────────────────────────────────────

#[test]
fn modifier_prefix_uses_canonical_order() {
    let mods = Modifiers::SUPER | Modifiers::CONTROL | Modifiers::SHIFT;
    assert_eq!(mods.to_binding_prefix(), "<Shift><Control><Super>");
}

#[test]
fn empty_modifiers_have_empty_prefix() {
    assert_eq!(Modifiers::empty().to_binding_prefix(), "");
}

#[test]
fn modifier_prefix_parse_is_case_insensitive() {
    let (mods, rest) = Modifiers::parse_binding_prefix("<ALT><super>Tab");
    assert_eq!(mods, Modifiers::ALT | Modifiers::SUPER);
    assert_eq!(rest, "Tab");
}

// ── KeyBinding ────────────────────────────────────────────────────

#[test]
fn key_binding_formats_modifiers_and_name() {
    let keymap = Keymap::us();
    let binding = KeyBinding::new(Modifiers::CONTROL | Modifiers::ALT, 113);
    assert_eq!(binding.format(&keymap), "<Control><Alt>Left");
}

#[test]
fn key_binding_without_name_uses_hex_keycode() {
    let keymap = Keymap::us();
    let binding = KeyBinding::new(Modifiers::empty(), 0x99);
    assert_eq!(binding.format(&keymap), "0x99");
    assert_eq!(KeyBinding::parse("0x99", &keymap), binding);
}

#[test]
fn disabled_key_binding_formats_as_disabled() {
    assert_eq!(KeyBinding::disabled().format(&Keymap::us()), "Disabled");
}

#[test]
fn key_binding_parse_resolves_key_name() {
    let keymap = Keymap::us();
    let binding = KeyBinding::parse("<Super>F1", &keymap);
    assert_eq!(binding, KeyBinding::new(Modifiers::SUPER, 67));
}

#[test]
fn key_binding_parse_modifier_only() {
    let binding = KeyBinding::parse("<Super>", &Keymap::us());
    assert_eq!(binding.modifiers, Modifiers::SUPER);
    assert_eq!(binding.keycode, None);
    assert!(!binding.is_disabled());
}

#[test]
fn key_binding_parse_unknown_key_is_disabled() {
    let binding = KeyBinding::parse("<Control>NoSuchKey", &Keymap::us());
    assert!(binding.is_disabled());
}

#[test]
fn key_binding_parse_disabled_and_empty() {
    let keymap = Keymap::us();
    assert!(KeyBinding::parse("Disabled", &keymap).is_disabled());
    assert!(KeyBinding::parse("", &keymap).is_disabled());
}

#[test]
fn key_binding_format_parse_roundtrip() {
    let keymap = Keymap::us();
    let binding = KeyBinding::new(Modifiers::SHIFT | Modifiers::MOD4, 38);
    assert_eq!(KeyBinding::parse(&binding.format(&keymap), &keymap), binding);
}

// ── ButtonBinding ─────────────────────────────────────────────────

#[test]
fn button_binding_formats_button_number() {
    let binding = ButtonBinding::new(Modifiers::SUPER, 1);
    assert_eq!(binding.format(), "<Super>Button1");
}

#[test]
fn button_binding_parse_roundtrip() {
    let binding = ButtonBinding::new(Modifiers::ALT | Modifiers::SHIFT, 3);
    assert_eq!(ButtonBinding::parse(&binding.format()), binding);
}

#[test]
fn button_binding_parse_garbage_is_disabled() {
    assert!(ButtonBinding::parse("<Alt>ButtonX").is_disabled());
    assert!(ButtonBinding::parse("Disabled").is_disabled());
}

// ── EdgeMask ──────────────────────────────────────────────────────

#[test]
fn edge_mask_formats_names_in_order() {
    let mask = EdgeMask::BOTTOM_RIGHT | EdgeMask::LEFT | EdgeMask::TOP;
    assert_eq!(mask.to_string(), "Left | Top | BottomRight");
}

#[test]
fn empty_edge_mask_formats_empty() {
    assert_eq!(EdgeMask::empty().to_string(), "");
}

#[test]
fn edge_mask_parse_distinguishes_corners() {
    let mask: EdgeMask = "TopLeft | Right".parse().unwrap();
    assert_eq!(mask, EdgeMask::TOP_LEFT | EdgeMask::RIGHT);
}

#[test]
fn edge_mask_parse_ignores_unknown_names() {
    let mask: EdgeMask = "Left|Middle| Bottom ".parse().unwrap();
    assert_eq!(mask, EdgeMask::LEFT | EdgeMask::BOTTOM);
}
