use optsync_types::{Color, Error};
use std::str::FromStr;

// ── Formatting ────────────────────────────────────────────────────

#[test]
fn black_formats_with_opaque_alpha() {
    assert_eq!(Color::BLACK.to_string(), "#000000ff");
}

#[test]
fn rgba8_formats_each_channel() {
    let color = Color::rgba8(0x12, 0x34, 0xab, 0x80);
    assert_eq!(color.to_string(), "#1234ab80");
}

// ── Parsing ───────────────────────────────────────────────────────

#[test]
fn parse_expands_bytes_to_16_bits() {
    let color = Color::from_str("#ff8000c0").unwrap();
    assert_eq!(color, Color::new(0xffff, 0x8080, 0x0000, 0xc0c0));
}

#[test]
fn parse_accepts_uppercase_hex() {
    let color: Color = "#FFAA00FF".parse().unwrap();
    assert_eq!(color, Color::rgba8(0xff, 0xaa, 0x00, 0xff));
}

#[test]
fn parse_then_format_is_stable() {
    let s = "#0a1b2c3d";
    assert_eq!(Color::from_str(s).unwrap().to_string(), s);
}

#[test]
fn parse_rejects_missing_hash() {
    assert_eq!(
        Color::from_str("ff8000c0"),
        Err(Error::InvalidColor("ff8000c0".to_string()))
    );
}

#[test]
fn parse_rejects_short_and_long_input() {
    assert!(Color::from_str("#ff8000").is_err());
    assert!(Color::from_str("#ff8000c0ff").is_err());
    assert!(Color::from_str("").is_err());
}

#[test]
fn parse_rejects_non_hex_digits() {
    assert!(Color::from_str("#gg8000c0").is_err());
    assert!(Color::from_str("#+f8000c0").is_err());
}

#[test]
fn to_rgba8_keeps_high_bytes() {
    let color = Color::new(0xab01, 0xcdff, 0x00ff, 0x1234);
    assert_eq!(color.to_rgba8(), [0xab, 0xcd, 0x00, 0x12]);
}

// ── Properties ────────────────────────────────────────────────────

mod properties {
    use optsync_types::Color;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn rgba8_survives_format_and_parse(rgba in any::<[u8; 4]>()) {
            let [r, g, b, a] = rgba;
            let color = Color::rgba8(r, g, b, a);
            prop_assert_eq!(color.to_string().parse::<Color>(), Ok(color));
        }

        #[test]
        fn formatting_quantizes_to_high_byte(channels in any::<[u16; 4]>()) {
            let [r, g, b, a] = channels;
            let parsed: Color = Color::new(r, g, b, a).to_string().parse().unwrap();
            prop_assert_eq!(parsed.to_rgba8(), Color::new(r, g, b, a).to_rgba8());
        }
    }
}
