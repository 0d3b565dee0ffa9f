use serde::{Deserialize, Serialize};

use super::{CollaboratorId, PropertyId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollaboratorRole {
    Viewer,
    Editor,
}

impl CollaboratorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Editor => "editor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "viewer" => Some(Self::Viewer),
            "editor" => Some(Self::Editor),
            _ => None,
        }
    }
}

/// Shared-access record granting another account visibility into a property.
///
/// Only the sharing record is modelled; authentication itself is handled
/// outside this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    pub id: CollaboratorId,
    pub property_id: PropertyId,
    pub email: String,
    pub role: CollaboratorRole,
}

/// For creating new collaborator records (no id yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCollaborator {
    pub property_id: PropertyId,
    pub email: String,
    pub role: CollaboratorRole,
}
