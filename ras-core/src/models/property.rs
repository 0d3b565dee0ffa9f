use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PropertyId, Service, Space};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum PropertyCategory {
    House,
    #[default]
    Apartment,
    Studio,
    Room,
    Commercial,
    Land,
}

impl PropertyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Apartment => "apartment",
            Self::Studio => "studio",
            Self::Room => "room",
            Self::Commercial => "commercial",
            Self::Land => "land",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "house" => Some(Self::House),
            "apartment" => Some(Self::Apartment),
            "studio" => Some(Self::Studio),
            "room" => Some(Self::Room),
            "commercial" => Some(Self::Commercial),
            "land" => Some(Self::Land),
            _ => None,
        }
    }

    pub fn all() -> &'static [PropertyCategory] {
        &[
            Self::House,
            Self::Apartment,
            Self::Studio,
            Self::Room,
            Self::Commercial,
            Self::Land,
        ]
    }
}

/// Non-exclusive lifecycle states a property can carry.
///
/// A property can be, for example, offered for long-term rent and for sale at
/// the same time. Each tag activates a conditional sub-record in
/// [`ConditionalData`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum LifecycleTag {
    LongTermRental,
    VacationRental,
    ForSale,
}

impl LifecycleTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LongTermRental => "long_term_rental",
            Self::VacationRental => "vacation_rental",
            Self::ForSale => "for_sale",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "long_term_rental" => Some(Self::LongTermRental),
            "vacation_rental" => Some(Self::VacationRental),
            "for_sale" => Some(Self::ForSale),
            _ => None,
        }
    }

    pub fn all() -> &'static [LifecycleTag] {
        &[Self::LongTermRental, Self::VacationRental, Self::ForSale]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Furnishing {
    #[default]
    Unfurnished,
    Partial,
    Furnished,
}

impl Furnishing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unfurnished => "unfurnished",
            Self::Partial => "partial",
            Self::Furnished => "furnished",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unfurnished" => Some(Self::Unfurnished),
            "partial" => Some(Self::Partial),
            "furnished" => Some(Self::Furnished),
            _ => None,
        }
    }
}

/// Address data. Every field is optional; the Location step has no hard
/// requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub region: Option<String>,
    pub cadastral_ref: Option<String>,
}

/// Terms for the long-term rental lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalTerms {
    pub monthly_rent: Decimal,
    pub deposit_months: u32,
    pub min_term_months: Option<u32>,
}

/// Terms for the vacation rental lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationTerms {
    pub nightly_rate: Decimal,
    pub max_guests: Option<u32>,
    pub amenities: BTreeSet<String>,
}

/// Terms for the for-sale lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleTerms {
    pub asking_price: Decimal,
    pub negotiable: bool,
}

/// Sub-records keyed by lifecycle state.
///
/// A sub-record is only meaningful while its tag is present in
/// [`PropertyDraft::states`]. Deselecting a tag does not purge the record;
/// validation and publication simply ignore it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalData {
    pub rental: Option<RentalTerms>,
    pub vacation: Option<VacationTerms>,
    pub sale: Option<SaleTerms>,
}

/// The record built up across the wizard steps.
///
/// `id` is absent until the first save; the storage backend assigns it.
/// Spaces and services are exclusively owned and persist with the property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDraft {
    pub id: Option<PropertyId>,
    pub name: String,
    pub category: PropertyCategory,
    pub states: BTreeSet<LifecycleTag>,
    pub furnishing: Furnishing,
    pub location: Location,
    pub size_m2: Option<Decimal>,
    pub capacity: Option<u32>,
    pub spaces: Vec<Space>,
    pub services: Vec<Service>,
    pub conditions: ConditionalData,
    pub published: bool,
}

impl PropertyDraft {
    pub fn new(name: impl Into<String>, category: PropertyCategory) -> Self {
        Self {
            name: name.into(),
            category,
            ..Default::default()
        }
    }

    pub fn has_state(&self, tag: LifecycleTag) -> bool {
        self.states.contains(&tag)
    }

    /// Append a new space and return its index.
    pub fn add_space(
        &mut self,
        kind: super::SpaceKind,
        name: impl Into<String>,
    ) -> usize {
        self.spaces.push(Space::new(kind, name));
        self.spaces.len() - 1
    }

    /// Duplicate the space at `index`, appending the copy and returning its
    /// index. The copy gets a " (copy)" name suffix, no storage id, and no
    /// private-bathroom link (a cross-reference cannot be meaningfully
    /// copied).
    pub fn duplicate_space(
        &mut self,
        index: usize,
    ) -> Option<usize> {
        let original = self.spaces.get(index)?;
        let mut copy = original.clone();
        copy.id = None;
        copy.name = format!("{} (copy)", copy.name);
        copy.details.private_bathroom = None;
        self.spaces.push(copy);
        Some(self.spaces.len() - 1)
    }

    /// Remove the space at `index`, repairing private-bathroom links so no
    /// index dangles: links to the removed space are cleared, links past it
    /// shift down by one.
    pub fn remove_space(
        &mut self,
        index: usize,
    ) -> bool {
        if index >= self.spaces.len() {
            return false;
        }
        self.spaces.remove(index);
        for space in &mut self.spaces {
            space.details.private_bathroom = match space.details.private_bathroom {
                Some(i) if i == index => None,
                Some(i) if i > index => Some(i - 1),
                other => other,
            };
        }
        true
    }
}

/// Listing-page projection of a stored property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySummary {
    pub id: PropertyId,
    pub name: String,
    pub category: PropertyCategory,
    pub states: BTreeSet<LifecycleTag>,
    pub published: bool,
    pub updated_at: DateTime<Utc>,
}
