use arrowmark_geometry::Ray;
use std::str::FromStr;

/// Which buffer slot a click fills; the host asks the user per click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickSlot {
    First,
    Second,
}

impl FromStr for PickSlot {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "second" => Ok(Self::Second),
            other => Err(format!("unknown pick slot: {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickState {
    Idle,
    /// One slot is filled and the pair is waiting for the other.
    AwaitingSecond,
}

/// Two-slot buffer of picked rays. A pair is handed out as soon as both slots
/// are filled, in whatever order they arrived, and the buffer empties.
#[derive(Clone, Copy, Debug, Default)]
pub struct PickPair {
    first: Option<Ray>,
    second: Option<Ray>,
}

impl PickPair {
    pub fn state(&self) -> PickState {
        if self.first.is_none() && self.second.is_none() {
            PickState::Idle
        } else {
            PickState::AwaitingSecond
        }
    }

    /// Stores `ray` in `slot`, replacing what was there.
    pub fn offer(&mut self, slot: PickSlot, ray: Ray) -> Option<(Ray, Ray)> {
        match slot {
            PickSlot::First => self.first = Some(ray),
            PickSlot::Second => self.second = Some(ray),
        }
        match (self.first, self.second) {
            (Some(first), Some(second)) => {
                self.reset();
                Some((first, second))
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.first = None;
        self.second = None;
    }
}
