//! Edge style bitfield.
//!
//! Layout (32 bits): `00DD-DDDD TTTT-TTTT FFFF-FFFF WWWW-SSLH`
//!
//! - byte 0: `H` hidden, `L` line (no arc), `SS` stroke pattern, `WWWW` stroke width
//! - byte 1: from-terminator, `SSSS 000f` shape and fill
//! - byte 2: to-terminator, same layout
//! - byte 3: one "defined" bit per component so partial overrides can be merged

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const HIDDENDEF: u32 = 0x0100_0000;
pub const LINEDEF: u32 = 0x0200_0000;
pub const STROKEDEF: u32 = 0x0400_0000;
pub const STROKEWIDTHDEF: u32 = 0x0800_0000;
pub const FROMDEF: u32 = 0x1000_0000;
pub const TODEF: u32 = 0x2000_0000;

pub const HIDDEN: u32 = 0x1;
pub const LINE: u32 = 0x2;
pub const STROKEMASK: u32 = 0xc;
pub const SOLID: u32 = 0x0;
pub const DASH: u32 = 0x4;
pub const DOT: u32 = 0x8;
pub const STROKEWIDTHMASK: u32 = 0xf0;
pub const STROKEWIDTHSHIFT: u32 = 4;

pub const SHAPEMASK: u32 = 0xf0;
pub const TRIANGLE: u32 = 0x10;
pub const CIRCLE: u32 = 0x20;
pub const DIAMOND: u32 = 0x30;
pub const ARROW: u32 = 0x40;
pub const HOOK: u32 = 0x50;
pub const FILL: u32 = 0x01;

pub const FROMMASK: u32 = 0x0000_ff00;
pub const FROMSHIFT: u32 = 8;
pub const TOMASK: u32 = 0x00ff_0000;
pub const TOSHIFT: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    Solid,
    Dash,
    Dot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminatorShape {
    Triangle,
    Circle,
    Diamond,
    Arrow,
    Hook,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminator {
    pub shape: TerminatorShape,
    pub filled: bool,
}

impl Terminator {
    /// Decodes an 8-bit terminator field. Zero shape means no terminator.
    fn from_bits(bits: u32) -> Option<Self> {
        let shape = match bits & SHAPEMASK {
            TRIANGLE => TerminatorShape::Triangle,
            CIRCLE => TerminatorShape::Circle,
            DIAMOND => TerminatorShape::Diamond,
            ARROW => TerminatorShape::Arrow,
            HOOK => TerminatorShape::Hook,
            _ => return None,
        };
        Some(Self {
            shape,
            filled: bits & FILL != 0,
        })
    }

    fn to_bits(terminator: Option<Terminator>) -> u32 {
        let Some(t) = terminator else {
            return 0;
        };
        let shape = match t.shape {
            TerminatorShape::Triangle => TRIANGLE,
            TerminatorShape::Circle => CIRCLE,
            TerminatorShape::Diamond => DIAMOND,
            TerminatorShape::Arrow => ARROW,
            TerminatorShape::Hook => HOOK,
        };
        shape | if t.filled { FILL } else { 0 }
    }

    /// Parses terminator codes such as `t`, `tf`, `c`, `af`. `z` means none.
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let shape = match chars.next()? {
            'a' => TerminatorShape::Arrow,
            'h' => TerminatorShape::Hook,
            'c' => TerminatorShape::Circle,
            'd' => TerminatorShape::Diamond,
            't' => TerminatorShape::Triangle,
            _ => return None,
        };
        Some(Self {
            shape,
            filled: chars.next() == Some('f'),
        })
    }
}

impl FromStr for Stroke {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("solid") {
            Ok(Stroke::Solid)
        } else if s.starts_with("dash") {
            Ok(Stroke::Dash)
        } else if s.starts_with("dot") {
            Ok(Stroke::Dot)
        } else {
            Err(())
        }
    }
}

/// Packed edge style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeStyle(pub u32);

impl EdgeStyle {
    /// Overlay the components defined in `style` on top of `default`.
    pub fn merge(default: EdgeStyle, style: Option<EdgeStyle>) -> EdgeStyle {
        let Some(EdgeStyle(style)) = style else {
            return default;
        };
        let mut result = default.0;
        for (def, mask) in [
            (HIDDENDEF, HIDDEN),
            (LINEDEF, LINE),
            (STROKEDEF, STROKEMASK),
            (STROKEWIDTHDEF, STROKEWIDTHMASK),
            (FROMDEF, FROMMASK),
            (TODEF, TOMASK),
        ] {
            if style & def != 0 {
                result &= !mask;
                result |= style & mask;
            }
        }
        EdgeStyle(result)
    }

    /// Builds a style from its textual components, defining only those given.
    /// Returns `None` when nothing is defined.
    pub fn parse(
        stroke: Option<&str>,
        from_terminator: Option<&str>,
        to_terminator: Option<&str>,
        line: Option<bool>,
        hidden: Option<bool>,
    ) -> Option<EdgeStyle> {
        let mut style = EdgeStyle::default();
        let mut defined = false;
        if let Some(hidden) = hidden {
            style = style.with_hidden(hidden);
            defined = true;
        }
        if let Some(line) = line {
            style = style.with_line(line);
            defined = true;
        }
        if let Some(stroke) = stroke.filter(|s| !s.is_empty()) {
            style = style.with_stroke(stroke.parse().unwrap_or(Stroke::Solid));
            let width = stroke
                .rsplit_once(' ')
                .and_then(|(_, w)| w.parse::<u32>().ok())
                .unwrap_or(0);
            style = style.with_stroke_width(width);
            defined = true;
        }
        if let Some(from) = from_terminator.filter(|s| !s.is_empty()) {
            style = style.with_from_terminator(Terminator::parse(from));
            defined = true;
        }
        if let Some(to) = to_terminator.filter(|s| !s.is_empty()) {
            style = style.with_to_terminator(Terminator::parse(to));
            defined = true;
        }
        defined.then_some(style)
    }

    pub fn with_hidden(self, hidden: bool) -> Self {
        let bits = (self.0 & !(HIDDEN | HIDDENDEF)) | HIDDENDEF;
        EdgeStyle(if hidden { bits | HIDDEN } else { bits })
    }

    pub fn with_line(self, line: bool) -> Self {
        let bits = (self.0 & !(LINE | LINEDEF)) | LINEDEF;
        EdgeStyle(if line { bits | LINE } else { bits })
    }

    pub fn with_stroke(self, stroke: Stroke) -> Self {
        let value = match stroke {
            Stroke::Solid => SOLID,
            Stroke::Dash => DASH,
            Stroke::Dot => DOT,
        };
        EdgeStyle((self.0 & !STROKEMASK) | value | STROKEDEF)
    }

    pub fn with_stroke_width(self, width: u32) -> Self {
        let value = (width << STROKEWIDTHSHIFT) & STROKEWIDTHMASK;
        EdgeStyle((self.0 & !STROKEWIDTHMASK) | value | STROKEWIDTHDEF)
    }

    pub fn with_from_terminator(self, terminator: Option<Terminator>) -> Self {
        let value = Terminator::to_bits(terminator) << FROMSHIFT;
        EdgeStyle((self.0 & !FROMMASK) | value | FROMDEF)
    }

    pub fn with_to_terminator(self, terminator: Option<Terminator>) -> Self {
        let value = Terminator::to_bits(terminator) << TOSHIFT;
        EdgeStyle((self.0 & !TOMASK) | value | TODEF)
    }

    pub fn is_hidden(self) -> bool {
        self.0 & HIDDEN != 0
    }

    pub fn is_line(self) -> bool {
        self.0 & LINE != 0
    }

    pub fn stroke(self) -> Stroke {
        match self.0 & STROKEMASK {
            DASH => Stroke::Dash,
            DOT => Stroke::Dot,
            _ => Stroke::Solid,
        }
    }

    pub fn stroke_width(self) -> u32 {
        (self.0 & STROKEWIDTHMASK) >> STROKEWIDTHSHIFT
    }

    pub fn from_terminator(self) -> Option<Terminator> {
        Terminator::from_bits((self.0 & FROMMASK) >> FROMSHIFT)
    }

    pub fn to_terminator(self) -> Option<Terminator> {
        Terminator::from_bits((self.0 & TOMASK) >> TOSHIFT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_merge_none_keeps_default() {
        let default = EdgeStyle(DASH | LINE);
        assert_eq!(EdgeStyle::merge(default, None), default);
    }

    #[test]
    fn test_merge_overrides_defined_components_only() {
        let default = EdgeStyle::default()
            .with_stroke(Stroke::Dash)
            .with_to_terminator(Terminator::parse("tf"));
        let local = EdgeStyle::default().with_stroke(Stroke::Dot);
        let merged = EdgeStyle::merge(default, Some(local));
        assert_eq!(merged.stroke(), Stroke::Dot);
        assert_eq!(
            merged.to_terminator(),
            Some(Terminator {
                shape: TerminatorShape::Triangle,
                filled: true
            })
        );
    }

    #[test]
    fn test_parse_components() {
        let style = EdgeStyle::parse(Some("dash 3"), Some("a"), Some("cf"), Some(true), None).unwrap();
        assert_eq!(style.stroke(), Stroke::Dash);
        assert_eq!(style.stroke_width(), 3);
        assert!(style.is_line());
        assert!(!style.is_hidden());
        assert_eq!(style.from_terminator().map(|t| t.shape), Some(TerminatorShape::Arrow));
        assert_eq!(style.to_terminator().map(|t| t.filled), Some(true));
        assert!(EdgeStyle::parse(None, None, None, None, None).is_none());
    }

    #[test]
    fn test_hidden_override() {
        let merged = EdgeStyle::merge(EdgeStyle::default(), Some(EdgeStyle::default().with_hidden(true)));
        assert!(merged.is_hidden());
    }

    proptest! {
        #[test]
        fn prop_merge_with_self_is_identity(bits in any::<u32>()) {
            let style = EdgeStyle(bits);
            prop_assert_eq!(EdgeStyle::merge(style, Some(style)), style);
        }

        #[test]
        fn prop_merge_without_defined_bits_is_default(default in any::<u32>(), local in 0u32..0x0100_0000) {
            prop_assert_eq!(EdgeStyle::merge(EdgeStyle(default), Some(EdgeStyle(local))), EdgeStyle(default));
        }
    }
}
