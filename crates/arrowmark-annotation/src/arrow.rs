use arrowmark_base::{Vec3, ensure_positive, ensure_unit_interval};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::str::FromStr;

use crate::{Error, Result};

const MIN_DIRECTION_LENGTH: f64 = 1.0e-9;

/// Edge color name as the renderer understands it: a named color such as
/// `red` or a hex code such as `#ff8800`. Names are stored trimmed and
/// lowercased; which names a user may pick is configuration, not a property
/// of the arrow.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArrowColor(Cow<'static, str>);

impl ArrowColor {
    pub const RED: Self = Self(Cow::Borrowed("red"));
    pub const ORANGE: Self = Self(Cow::Borrowed("orange"));
    pub const YELLOW: Self = Self(Cow::Borrowed("yellow"));
    pub const GREEN: Self = Self(Cow::Borrowed("green"));
    pub const CYAN: Self = Self(Cow::Borrowed("cyan"));
    pub const BLUE: Self = Self(Cow::Borrowed("blue"));
    pub const MAGENTA: Self = Self(Cow::Borrowed("magenta"));
    pub const WHITE: Self = Self(Cow::Borrowed("white"));

    /// Colors offered when the config does not list its own.
    pub const PALETTE: [Self; 8] = [
        Self::RED,
        Self::ORANGE,
        Self::YELLOW,
        Self::GREEN,
        Self::CYAN,
        Self::BLUE,
        Self::MAGENTA,
        Self::WHITE,
    ];

    /// Returns `None` for a blank name.
    pub fn named(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self(Cow::Owned(name.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ArrowColor {
    fn default() -> Self {
        Self::RED
    }
}

impl std::fmt::Display for ArrowColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArrowColor {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Self::named(text).ok_or_else(|| Error::InvalidColor(text.to_string()))
    }
}

impl Serialize for ArrowColor {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ArrowColor {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::named(&name).unwrap_or_default())
    }
}

/// A styled directed segment. `end` is the anchored tip; the tail sits at
/// `end - direction`, so the direction's norm is the arrow length.
///
/// Points and directions are in volume axis order (z, y, x).
#[derive(Clone, Debug, PartialEq)]
pub struct Arrow {
    end: Vec3,
    direction: Vec3,
    color: ArrowColor,
    edge_width: f64,
    opacity: f64,
}

impl Arrow {
    pub fn new(
        end: Vec3,
        direction: Vec3,
        color: ArrowColor,
        edge_width: f64,
        opacity: f64,
    ) -> Result<Self> {
        let arrow = Self {
            end,
            direction,
            color,
            edge_width,
            opacity,
        };
        arrow.validate()?;
        Ok(arrow)
    }

    /// Arrow ending at `end`, pointing along `orientation` and `length` long.
    pub fn with_length(
        end: Vec3,
        orientation: Vec3,
        length: f64,
        color: ArrowColor,
        edge_width: f64,
        opacity: f64,
    ) -> Result<Self> {
        ensure_positive("length", length)?;
        let unit = unit_direction(orientation)?;
        Self::new(end, unit * length, color, edge_width, opacity)
    }

    pub fn end(&self) -> Vec3 {
        self.end
    }

    pub fn start(&self) -> Vec3 {
        self.end - self.direction
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn length(&self) -> f64 {
        self.direction.length()
    }

    pub fn color(&self) -> &ArrowColor {
        &self.color
    }

    pub fn edge_width(&self) -> f64 {
        self.edge_width
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Applies every field of `patch` or none of them.
    ///
    /// A new length rescales the direction about the fixed `end`, so only the
    /// tail moves. When the patch also carries a direction, the length applies
    /// to the patched direction.
    pub fn apply(&mut self, patch: &ArrowPatch) -> Result<()> {
        let mut next = self.clone();
        if let Some(end) = patch.end {
            next.end = end;
        }
        if let Some(direction) = patch.direction {
            next.direction = direction;
        }
        if let Some(length) = patch.length {
            ensure_positive("length", length)?;
            next.direction = unit_direction(next.direction)? * length;
        }
        if let Some(color) = &patch.color {
            next.color = color.clone();
        }
        if let Some(edge_width) = patch.edge_width {
            next.edge_width = edge_width;
        }
        if let Some(opacity) = patch.opacity {
            next.opacity = opacity;
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !is_finite(self.end) {
            return Err(invalid("end must be finite"));
        }
        unit_direction(self.direction)?;
        ensure_positive("edge_width", self.edge_width)?;
        ensure_unit_interval("opacity", self.opacity)?;
        Ok(())
    }
}

/// Partial update of an [`Arrow`]; unset fields are left alone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArrowPatch {
    pub end: Option<Vec3>,
    pub direction: Option<Vec3>,
    pub length: Option<f64>,
    pub color: Option<ArrowColor>,
    pub edge_width: Option<f64>,
    pub opacity: Option<f64>,
}

impl ArrowPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn end(mut self, end: Vec3) -> Self {
        self.end = Some(end);
        self
    }

    pub fn direction(mut self, direction: Vec3) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn color(mut self, color: ArrowColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn edge_width(mut self, edge_width: f64) -> Self {
        self.edge_width = Some(edge_width);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn unit_direction(direction: Vec3) -> Result<Vec3> {
    direction
        .try_normalized(MIN_DIRECTION_LENGTH)
        .ok_or_else(|| invalid("direction must be non-zero and finite"))
}

fn is_finite(v: Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

fn invalid(message: &str) -> Error {
    arrowmark_base::Error::InvalidParameter(message.to_string()).into()
}
