use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::SpaceId;

/// Closed taxonomy of space categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SpaceKind {
    Bedroom,
    Bathroom,
    Kitchen,
    Common,
    Exterior,
    Extra,
}

impl SpaceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bedroom => "bedroom",
            Self::Bathroom => "bathroom",
            Self::Kitchen => "kitchen",
            Self::Common => "common",
            Self::Exterior => "exterior",
            Self::Extra => "extra",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bedroom" => Some(Self::Bedroom),
            "bathroom" => Some(Self::Bathroom),
            "kitchen" => Some(Self::Kitchen),
            "common" => Some(Self::Common),
            "exterior" => Some(Self::Exterior),
            "extra" => Some(Self::Extra),
            _ => None,
        }
    }

    pub fn all() -> &'static [SpaceKind] {
        &[
            Self::Bedroom,
            Self::Bathroom,
            Self::Kitchen,
            Self::Common,
            Self::Exterior,
            Self::Extra,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BedKind {
    Single,
    Double,
    Queen,
    King,
    Bunk,
    Sofa,
}

impl BedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Queen => "queen",
            Self::King => "king",
            Self::Bunk => "bunk",
            Self::Sofa => "sofa",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single" => Some(Self::Single),
            "double" => Some(Self::Double),
            "queen" => Some(Self::Queen),
            "king" => Some(Self::King),
            "bunk" => Some(Self::Bunk),
            "sofa" => Some(Self::Sofa),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bed {
    pub kind: BedKind,
    pub count: u32,
}

/// Type-specific attributes of a space.
///
/// `equipment` holds codes from the equipment catalog. `private_bathroom`
/// is the index of another space of [`SpaceKind::Bathroom`] in the same
/// draft — a cross-reference, not ownership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceDetails {
    pub equipment: BTreeSet<String>,
    pub beds: Vec<Bed>,
    pub private_bathroom: Option<usize>,
}

/// A named sub-area of a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub id: Option<SpaceId>,
    pub kind: SpaceKind,
    pub name: String,
    pub details: SpaceDetails,
}

impl Space {
    pub fn new(
        kind: SpaceKind,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            kind,
            name: name.into(),
            details: SpaceDetails::default(),
        }
    }
}

/// One entry of the equipment reference catalog, scoped to a space kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub kind: SpaceKind,
    pub code: String,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn space_kind_codes_round_trip() {
        for kind in SpaceKind::all() {
            assert_eq!(SpaceKind::parse(kind.as_str()), Some(*kind));
        }
        assert_eq!(SpaceKind::parse("garage"), None);
    }

    #[test]
    fn new_space_has_empty_details() {
        let space = Space::new(SpaceKind::Bedroom, "Main bedroom");

        assert_eq!(space.id, None);
        assert_eq!(space.name, "Main bedroom");
        assert!(space.details.equipment.is_empty());
        assert!(space.details.beds.is_empty());
        assert_eq!(space.details.private_bathroom, None);
    }
}
