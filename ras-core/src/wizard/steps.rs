use serde::{Deserialize, Serialize};

/// Number of wizard steps. Step ids are 1-based and contiguous.
pub const STEP_COUNT: usize = 5;

/// The fixed, ordered registry of wizard steps.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum StepKey {
    General,
    Location,
    Conditions,
    Spaces,
    Services,
}

impl StepKey {
    pub fn all() -> &'static [StepKey] {
        &[
            Self::General,
            Self::Location,
            Self::Conditions,
            Self::Spaces,
            Self::Services,
        ]
    }

    /// 1-based position in the wizard.
    pub fn id(&self) -> usize {
        match self {
            Self::General => 1,
            Self::Location => 2,
            Self::Conditions => 3,
            Self::Spaces => 4,
            Self::Services => 5,
        }
    }

    pub fn from_id(id: usize) -> Option<Self> {
        match id {
            1 => Some(Self::General),
            2 => Some(Self::Location),
            3 => Some(Self::Conditions),
            4 => Some(Self::Spaces),
            5 => Some(Self::Services),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Location => "location",
            Self::Conditions => "conditions",
            Self::Spaces => "spaces",
            Self::Services => "services",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "general" => Some(Self::General),
            "location" => Some(Self::Location),
            "conditions" => Some(Self::Conditions),
            "spaces" => Some(Self::Spaces),
            "services" => Some(Self::Services),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::General => "General data",
            Self::Location => "Location",
            Self::Conditions => "Details by state",
            Self::Spaces => "Spaces",
            Self::Services => "Services",
        }
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_id(self.id() + 1)
    }

    pub fn prev(&self) -> Option<Self> {
        self.id().checked_sub(1).and_then(Self::from_id)
    }
}
