//! Body-part tags: the fixed vocabulary exercises are categorized by.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A muscle-group tag.
///
/// Declaration order is the canonical display order, and the order a
/// `BTreeSet<BodyPart>` serializes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BodyPart {
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Core,
}

impl BodyPart {
    pub fn as_str(self) -> &'static str {
        match self {
            BodyPart::Chest => "Chest",
            BodyPart::Back => "Back",
            BodyPart::Legs => "Legs",
            BodyPart::Shoulders => "Shoulders",
            BodyPart::Arms => "Arms",
            BodyPart::Core => "Core",
        }
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
