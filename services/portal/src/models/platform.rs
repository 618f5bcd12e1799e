//! Linkable gaming platform model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PortalError;

/// The fixed set of platforms an account can link to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    Xbox,
    Playstation,
    Nintendo,
    Steam,
    Epic,
}

impl PlatformId {
    /// Every platform, in display order
    pub const ALL: [PlatformId; 5] = [
        PlatformId::Xbox,
        PlatformId::Playstation,
        PlatformId::Nintendo,
        PlatformId::Steam,
        PlatformId::Epic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PlatformId::Xbox => "xbox",
            PlatformId::Playstation => "playstation",
            PlatformId::Nintendo => "nintendo",
            PlatformId::Steam => "steam",
            PlatformId::Epic => "epic",
        }
    }

    /// Human-readable platform name
    pub fn display_name(self) -> &'static str {
        match self {
            PlatformId::Xbox => "Xbox",
            PlatformId::Playstation => "PlayStation",
            PlatformId::Nintendo => "Nintendo",
            PlatformId::Steam => "Steam",
            PlatformId::Epic => "Epic Games",
        }
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformId {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlatformId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| PortalError::UnknownPlatform(s.to_string()))
    }
}

/// One platform record and the account's link to it
///
/// The link fields are private: `username` and `linked_at` are set exactly
/// when `is_linked` is true, and only [`PlatformLink::link`] and
/// [`PlatformLink::unlink`] change them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformLink {
    pub id: PlatformId,
    pub name: String,
    pub icon: String,
    is_linked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    linked_at: Option<DateTime<Utc>>,
}

impl PlatformLink {
    /// Template record for `id`, not linked
    pub fn unlinked(id: PlatformId) -> Self {
        Self {
            id,
            name: id.display_name().to_string(),
            icon: id.as_str().to_string(),
            is_linked: false,
            username: None,
            linked_at: None,
        }
    }

    /// The full platform set in its fixed order, nothing linked
    pub fn template() -> Vec<PlatformLink> {
        PlatformId::ALL.into_iter().map(Self::unlinked).collect()
    }

    pub fn is_linked(&self) -> bool {
        self.is_linked
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn linked_at(&self) -> Option<DateTime<Utc>> {
        self.linked_at
    }

    pub fn link(&mut self, username: impl Into<String>, at: DateTime<Utc>) {
        self.is_linked = true;
        self.username = Some(username.into());
        self.linked_at = Some(at);
    }

    pub fn unlink(&mut self) {
        self.is_linked = false;
        self.username = None;
        self.linked_at = None;
    }

    /// Check the link-field invariant on a decoded record
    pub fn check_consistency(&self) -> Result<(), String> {
        let has_fields = (self.username.is_some(), self.linked_at.is_some());
        match (self.is_linked, has_fields) {
            (true, (true, true)) | (false, (false, false)) => Ok(()),
            (true, _) => Err(format!(
                "platform '{}' is linked but missing its username or link time",
                self.id
            )),
            (false, _) => Err(format!(
                "platform '{}' is unlinked but still carries link details",
                self.id
            )),
        }
    }

    /// Copy the mutable link state of `other` onto this record
    pub(crate) fn adopt_link_state(&mut self, other: &PlatformLink) {
        self.is_linked = other.is_linked;
        self.username = other.username.clone();
        self.linked_at = other.linked_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_has_five_platforms_in_fixed_order() {
        let ids: Vec<&str> = PlatformLink::template()
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, ["xbox", "playstation", "nintendo", "steam", "epic"]);
        assert!(PlatformLink::template().iter().all(|p| !p.is_linked()));
        assert_eq!(PlatformLink::unlinked(PlatformId::Epic).name, "Epic Games");
        assert_eq!(PlatformLink::unlinked(PlatformId::Epic).icon, "epic");
    }

    #[test]
    fn test_platform_id_parsing() {
        assert_eq!("steam".parse::<PlatformId>().unwrap(), PlatformId::Steam);
        assert!(matches!(
            "Steam".parse::<PlatformId>(),
            Err(PortalError::UnknownPlatform(id)) if id == "Steam"
        ));
        assert!("dreamcast".parse::<PlatformId>().is_err());
    }

    #[test]
    fn test_link_and_unlink_keep_fields_in_step() {
        let mut link = PlatformLink::unlinked(PlatformId::Nintendo);
        let now = Utc::now();

        link.link("mario", now);
        assert!(link.is_linked());
        assert_eq!(link.username(), Some("mario"));
        assert_eq!(link.linked_at(), Some(now));
        assert!(link.check_consistency().is_ok());

        link.unlink();
        assert!(!link.is_linked());
        assert_eq!(link.username(), None);
        assert_eq!(link.linked_at(), None);
        assert!(link.check_consistency().is_ok());
    }

    #[test]
    fn test_unlinked_record_omits_link_fields() {
        let json = serde_json::to_value(PlatformLink::unlinked(PlatformId::Xbox)).unwrap();
        assert_eq!(json["id"], "xbox");
        assert_eq!(json["isLinked"], false);
        assert!(json.get("username").is_none());
        assert!(json.get("linkedAt").is_none());
    }

    #[test]
    fn test_inconsistent_record_is_detected() {
        let decoded: PlatformLink = serde_json::from_str(
            r#"{"id":"steam","name":"Steam","icon":"steam","isLinked":true}"#,
        )
        .unwrap();
        assert!(decoded.check_consistency().is_err());

        let decoded: PlatformLink = serde_json::from_str(
            r#"{"id":"steam","name":"Steam","icon":"steam","isLinked":false,"username":"gabe"}"#,
        )
        .unwrap();
        assert!(decoded.check_consistency().is_err());
    }
}
