//! Screen edge masks, written as edge names joined by ` | `.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct EdgeMask: u32 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const TOP = 1 << 2;
        const BOTTOM = 1 << 3;
        const TOP_LEFT = 1 << 4;
        const TOP_RIGHT = 1 << 5;
        const BOTTOM_LEFT = 1 << 6;
        const BOTTOM_RIGHT = 1 << 7;
    }
}

const EDGE_NAMES: [(&str, EdgeMask); 8] = [
    ("Left", EdgeMask::LEFT),
    ("Right", EdgeMask::RIGHT),
    ("Top", EdgeMask::TOP),
    ("Bottom", EdgeMask::BOTTOM),
    ("TopLeft", EdgeMask::TOP_LEFT),
    ("TopRight", EdgeMask::TOP_RIGHT),
    ("BottomLeft", EdgeMask::BOTTOM_LEFT),
    ("BottomRight", EdgeMask::BOTTOM_RIGHT),
];

impl fmt::Display for EdgeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, edge) in EDGE_NAMES {
            if self.contains(edge) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl FromStr for EdgeMask {
    type Err = std::convert::Infallible;

    /// Unknown edge names are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mask = s
            .split('|')
            .map(str::trim)
            .filter_map(|part| EDGE_NAMES.iter().find(|(name, _)| *name == part))
            .fold(EdgeMask::empty(), |mask, (_, edge)| mask | *edge);
        Ok(mask)
    }
}
