//! Domain entities.
//!
//! The two entity variants kept in sync with the external relationship
//! tracker (organizations and members), the many-to-many [`Link`] between
//! them, and their enumerated attributes.
//!
//! `external_key` is the sole join key against the tracker's box keys. It
//! is `None` only for records that have never been through a sync run.
//! Coordinates are derived locally from the address by geocoding; the sync
//! engine never copies them from remote field values.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::ids::{MemberId, OrganizationId};

/// Geographic coordinates derived from an address.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates from a latitude/longitude pair.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Gender of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Any other self-description.
    Other,
}

impl Gender {
    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            _ => Err(format!("Unknown gender: {s}")),
        }
    }
}

/// Graduation class year of a member.
///
/// The tracker models this as a dropdown; the year set is fixed and
/// extended only when a new cohort is onboarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassYear {
    #[serde(rename = "2016")]
    Y2016,
    #[serde(rename = "2017")]
    Y2017,
    #[serde(rename = "2018")]
    Y2018,
    #[serde(rename = "2019")]
    Y2019,
    #[serde(rename = "2020")]
    Y2020,
    #[serde(rename = "2021")]
    Y2021,
    #[serde(rename = "2022")]
    Y2022,
    /// Already graduated.
    #[serde(rename = "graduated")]
    Graduated,
    /// A teacher rather than a student.
    #[serde(rename = "teacher")]
    Teacher,
    /// Year not known.
    #[serde(rename = "unknown")]
    Unknown,
}

impl ClassYear {
    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassYear::Y2016 => "2016",
            ClassYear::Y2017 => "2017",
            ClassYear::Y2018 => "2018",
            ClassYear::Y2019 => "2019",
            ClassYear::Y2020 => "2020",
            ClassYear::Y2021 => "2021",
            ClassYear::Y2022 => "2022",
            ClassYear::Graduated => "graduated",
            ClassYear::Teacher => "teacher",
            ClassYear::Unknown => "unknown",
        }
    }

    /// All known class years.
    #[must_use]
    pub fn all() -> &'static [ClassYear] {
        &[
            ClassYear::Y2016,
            ClassYear::Y2017,
            ClassYear::Y2018,
            ClassYear::Y2019,
            ClassYear::Y2020,
            ClassYear::Y2021,
            ClassYear::Y2022,
            ClassYear::Graduated,
            ClassYear::Teacher,
            ClassYear::Unknown,
        ]
    }
}

impl fmt::Display for ClassYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ClassYear {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClassYear::all()
            .iter()
            .find(|y| y.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown class year: {s}"))
    }
}

/// A local organization record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// Local identifier.
    pub id: OrganizationId,
    /// Key of the corresponding box in the tracker. `None` only before
    /// the first sync.
    pub external_key: Option<String>,
    /// Display name. Required.
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// Derived from `address` by geocoding. Never written from remote
    /// field values.
    pub coordinates: Option<Coordinates>,
    /// Public website.
    pub website: Option<String>,
    /// Name of the host school.
    pub school_name: Option<String>,
    /// Kind of the host school (public, private, charter, ...).
    pub school_kind: Option<String>,
}

impl Organization {
    /// Create a new organization with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: OrganizationId::new(),
            external_key: None,
            name: name.into(),
            address: None,
            coordinates: None,
            website: None,
            school_name: None,
            school_kind: None,
        }
    }

    /// Validate required fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::missing("name"));
        }
        Ok(())
    }
}

/// A local member record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Local identifier.
    pub id: MemberId,
    /// Key of the corresponding box in the tracker. `None` only before
    /// the first sync.
    pub external_key: Option<String>,
    /// Display name. Required.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Gender, if stated.
    pub gender: Option<Gender>,
    /// Graduation class year, if known.
    pub class_year: Option<ClassYear>,
    /// Phone number.
    pub phone: Option<String>,
    /// Slack handle.
    pub slack_username: Option<String>,
    /// GitHub handle.
    pub github_username: Option<String>,
    /// Twitter handle.
    pub twitter_username: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Derived from `address` by geocoding. Never written from remote
    /// field values.
    pub coordinates: Option<Coordinates>,
}

impl Member {
    /// Create a new member with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: MemberId::new(),
            external_key: None,
            name: name.into(),
            email: None,
            gender: None,
            class_year: None,
            phone: None,
            slack_username: None,
            github_username: None,
            twitter_username: None,
            address: None,
            coordinates: None,
        }
    }

    /// Validate required fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::missing("name"));
        }
        Ok(())
    }
}

/// A symmetric organization <-> member relationship.
///
/// Links carry no attributes of their own and are fully derived state:
/// each sync run recomputes the link set from fresh box data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    /// Organization side of the pair.
    pub organization: OrganizationId,
    /// Member side of the pair.
    pub member: MemberId,
}

impl Link {
    /// Create a link between an organization and a member.
    #[must_use]
    pub fn new(organization: OrganizationId, member: MemberId) -> Self {
        Self {
            organization,
            member,
        }
    }
}
