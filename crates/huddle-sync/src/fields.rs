//! Field codecs.
//!
//! Bidirectional translation between the typed entities and the tracker's
//! code-keyed box fields, one codec per entity variant, with explicit
//! mapping tables instead of stringly-typed lookups.
//!
//! Dropdown attributes (gender, class year) translate through exact
//! two-way option-code tables. An option code with no table entry decodes
//! to unset: that is an observable mapping ambiguity, logged at `warn!`,
//! never an error.
//!
//! The decoded patch types deliberately carry no coordinates. Latitude
//! and longitude are derived locally by geocoding whenever the address
//! changes; the remote values are unrepresentable in the update path, so
//! the synchronizer cannot apply them by accident. `to_fields` still
//! encodes stored coordinates because the signature it builds mirrors the
//! full remote field set.

use std::collections::BTreeMap;

use tracing::warn;

use huddle_core::{ClassYear, Gender, Member, Organization};
use huddle_tracker::{FieldCode, FieldValue};

/// Gender option-code table.
const GENDER_OPTIONS: &[(Gender, &str)] = &[
    (Gender::Male, "9001"),
    (Gender::Female, "9002"),
    (Gender::Other, "9003"),
];

/// Class-year option-code table.
///
/// The codes are not in year order; they reflect the order the options
/// were added to the tracker's dropdown.
const CLASS_YEAR_OPTIONS: &[(ClassYear, &str)] = &[
    (ClassYear::Y2016, "9010"),
    (ClassYear::Y2017, "9004"),
    (ClassYear::Y2018, "9003"),
    (ClassYear::Y2019, "9002"),
    (ClassYear::Y2020, "9001"),
    (ClassYear::Y2021, "9006"),
    (ClassYear::Y2022, "9009"),
    (ClassYear::Graduated, "9005"),
    (ClassYear::Teacher, "9008"),
    (ClassYear::Unknown, "9007"),
];

/// Option code for a gender value.
#[must_use]
pub fn gender_option_code(gender: Gender) -> &'static str {
    GENDER_OPTIONS
        .iter()
        .find(|(g, _)| *g == gender)
        .map(|(_, code)| *code)
        .expect("every gender has an option code")
}

/// Exact reverse lookup of a gender option code.
#[must_use]
pub fn gender_from_option_code(code: &str) -> Option<Gender> {
    GENDER_OPTIONS
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(g, _)| *g)
}

/// Option code for a class-year value.
#[must_use]
pub fn class_year_option_code(year: ClassYear) -> &'static str {
    CLASS_YEAR_OPTIONS
        .iter()
        .find(|(y, _)| *y == year)
        .map(|(_, code)| *code)
        .expect("every class year has an option code")
}

/// Exact reverse lookup of a class-year option code.
#[must_use]
pub fn class_year_from_option_code(code: &str) -> Option<ClassYear> {
    CLASS_YEAR_OPTIONS
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(y, _)| *y)
}

/// Decoded organization attributes from a box's fields.
///
/// Applied wholesale on update: an absent remote field clears the local
/// attribute. Coordinates are intentionally not part of this type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationPatch {
    pub address: Option<String>,
    pub website: Option<String>,
    pub school_name: Option<String>,
    pub school_kind: Option<String>,
}

impl OrganizationPatch {
    /// Overwrite the organization's simple mapped attributes.
    pub fn apply_to(&self, organization: &mut Organization) {
        organization.address = self.address.clone();
        organization.website = self.website.clone();
        organization.school_name = self.school_name.clone();
        organization.school_kind = self.school_kind.clone();
    }
}

/// Decoded member attributes from a box's fields.
///
/// Applied wholesale on update; coordinates are intentionally not part
/// of this type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberPatch {
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub class_year: Option<ClassYear>,
    pub phone: Option<String>,
    pub slack_username: Option<String>,
    pub github_username: Option<String>,
    pub twitter_username: Option<String>,
    pub address: Option<String>,
}

impl MemberPatch {
    /// Overwrite the member's simple mapped attributes.
    pub fn apply_to(&self, member: &mut Member) {
        member.email = self.email.clone();
        member.gender = self.gender;
        member.class_year = self.class_year;
        member.phone = self.phone.clone();
        member.slack_username = self.slack_username.clone();
        member.github_username = self.github_username.clone();
        member.twitter_username = self.twitter_username.clone();
        member.address = self.address.clone();
    }
}

fn text(fields: &BTreeMap<FieldCode, FieldValue>, code: &str) -> Option<String> {
    fields
        .get(&FieldCode::new(code))
        .and_then(FieldValue::as_text)
        .map(str::to_string)
}

fn put_text(fields: &mut BTreeMap<FieldCode, FieldValue>, code: &str, value: Option<&str>) {
    if let Some(v) = value {
        fields.insert(FieldCode::new(code), FieldValue::from(v));
    }
}

/// Codec for the organization pipeline.
pub mod organization_fields {
    use super::*;

    /// Field codes of the organization pipeline.
    pub mod codes {
        pub const ADDRESS: &str = "1102";
        pub const WEBSITE: &str = "1104";
        pub const SCHOOL_NAME: &str = "1105";
        pub const SCHOOL_KIND: &str = "1106";
        pub const LATITUDE: &str = "1118";
        pub const LONGITUDE: &str = "1119";
    }

    /// Encode an organization's attributes as box fields.
    ///
    /// Read-only use: the result is a signature to compare against
    /// remote data, never a payload written back to the tracker.
    #[must_use]
    pub fn to_fields(organization: &Organization) -> BTreeMap<FieldCode, FieldValue> {
        let mut fields = BTreeMap::new();
        put_text(&mut fields, codes::ADDRESS, organization.address.as_deref());
        put_text(&mut fields, codes::WEBSITE, organization.website.as_deref());
        put_text(
            &mut fields,
            codes::SCHOOL_NAME,
            organization.school_name.as_deref(),
        );
        put_text(
            &mut fields,
            codes::SCHOOL_KIND,
            organization.school_kind.as_deref(),
        );
        if let Some(coordinates) = organization.coordinates {
            fields.insert(
                FieldCode::new(codes::LATITUDE),
                FieldValue::from(coordinates.latitude),
            );
            fields.insert(
                FieldCode::new(codes::LONGITUDE),
                FieldValue::from(coordinates.longitude),
            );
        }
        fields
    }

    /// Decode box fields into a partial organization.
    #[must_use]
    pub fn from_fields(fields: &BTreeMap<FieldCode, FieldValue>) -> OrganizationPatch {
        OrganizationPatch {
            address: text(fields, codes::ADDRESS),
            website: text(fields, codes::WEBSITE),
            school_name: text(fields, codes::SCHOOL_NAME),
            school_kind: text(fields, codes::SCHOOL_KIND),
        }
    }
}

/// Codec for the member pipeline.
pub mod member_fields {
    use super::*;

    /// Field codes of the member pipeline.
    pub mod codes {
        pub const GENDER: &str = "1001";
        pub const CLASS_YEAR: &str = "1002";
        pub const EMAIL: &str = "1003";
        pub const SLACK_USERNAME: &str = "1006";
        pub const TWITTER_USERNAME: &str = "1008";
        pub const GITHUB_USERNAME: &str = "1009";
        pub const PHONE: &str = "1010";
        pub const ADDRESS: &str = "1011";
        pub const LATITUDE: &str = "1018";
        pub const LONGITUDE: &str = "1019";
    }

    /// Encode a member's attributes as box fields.
    ///
    /// Read-only use: the result is a signature to compare against
    /// remote data, never a payload written back to the tracker.
    #[must_use]
    pub fn to_fields(member: &Member) -> BTreeMap<FieldCode, FieldValue> {
        let mut fields = BTreeMap::new();
        put_text(&mut fields, codes::EMAIL, member.email.as_deref());
        if let Some(gender) = member.gender {
            fields.insert(
                FieldCode::new(codes::GENDER),
                FieldValue::from(gender_option_code(gender)),
            );
        }
        if let Some(year) = member.class_year {
            fields.insert(
                FieldCode::new(codes::CLASS_YEAR),
                FieldValue::from(class_year_option_code(year)),
            );
        }
        put_text(&mut fields, codes::PHONE, member.phone.as_deref());
        put_text(
            &mut fields,
            codes::SLACK_USERNAME,
            member.slack_username.as_deref(),
        );
        put_text(
            &mut fields,
            codes::GITHUB_USERNAME,
            member.github_username.as_deref(),
        );
        put_text(
            &mut fields,
            codes::TWITTER_USERNAME,
            member.twitter_username.as_deref(),
        );
        put_text(&mut fields, codes::ADDRESS, member.address.as_deref());
        if let Some(coordinates) = member.coordinates {
            fields.insert(
                FieldCode::new(codes::LATITUDE),
                FieldValue::from(coordinates.latitude),
            );
            fields.insert(
                FieldCode::new(codes::LONGITUDE),
                FieldValue::from(coordinates.longitude),
            );
        }
        fields
    }

    /// Decode box fields into a partial member.
    #[must_use]
    pub fn from_fields(fields: &BTreeMap<FieldCode, FieldValue>) -> MemberPatch {
        let gender = text(fields, codes::GENDER).and_then(|code| {
            let decoded = gender_from_option_code(&code);
            if decoded.is_none() {
                warn!(option_code = %code, attribute = "gender", "unknown option code, treating as unset");
            }
            decoded
        });
        let class_year = text(fields, codes::CLASS_YEAR).and_then(|code| {
            let decoded = class_year_from_option_code(&code);
            if decoded.is_none() {
                warn!(option_code = %code, attribute = "class_year", "unknown option code, treating as unset");
            }
            decoded
        });

        MemberPatch {
            email: text(fields, codes::EMAIL),
            gender,
            class_year,
            phone: text(fields, codes::PHONE),
            slack_username: text(fields, codes::SLACK_USERNAME),
            github_username: text(fields, codes::GITHUB_USERNAME),
            twitter_username: text(fields, codes::TWITTER_USERNAME),
            address: text(fields, codes::ADDRESS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_core::Coordinates;

    #[test]
    fn test_gender_table_is_exact_both_ways() {
        for (gender, code) in GENDER_OPTIONS {
            assert_eq!(gender_option_code(*gender), *code);
            assert_eq!(gender_from_option_code(code), Some(*gender));
        }
        assert_eq!(gender_from_option_code("9999"), None);
        // No fuzzy matching
        assert_eq!(gender_from_option_code("9001 "), None);
    }

    #[test]
    fn test_class_year_table_is_exact_both_ways() {
        for (year, code) in CLASS_YEAR_OPTIONS {
            assert_eq!(class_year_option_code(*year), *code);
            assert_eq!(class_year_from_option_code(code), Some(*year));
        }
        assert_eq!(class_year_from_option_code("42"), None);
    }

    #[test]
    fn test_option_codes_are_unique_per_table() {
        for (i, (_, a)) in CLASS_YEAR_OPTIONS.iter().enumerate() {
            for (_, b) in &CLASS_YEAR_OPTIONS[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_organization_roundtrip() {
        let mut org = huddle_core::Organization::new("Windy City Hackers");
        org.address = Some("123 Main St".to_string());
        org.website = Some("https://example.com".to_string());
        org.school_name = Some("Lane Tech".to_string());
        org.coordinates = Some(Coordinates::new(41.88, -87.63));

        let fields = organization_fields::to_fields(&org);
        let patch = organization_fields::from_fields(&fields);

        assert_eq!(patch.address.as_deref(), Some("123 Main St"));
        assert_eq!(patch.website.as_deref(), Some("https://example.com"));
        assert_eq!(patch.school_name.as_deref(), Some("Lane Tech"));
        assert_eq!(patch.school_kind, None);
    }

    #[test]
    fn test_member_roundtrip() {
        let mut member = huddle_core::Member::new("Jane Hacker");
        member.email = Some("jane@example.com".to_string());
        member.gender = Some(huddle_core::Gender::Female);
        member.class_year = Some(huddle_core::ClassYear::Y2019);
        member.slack_username = Some("jane".to_string());

        let fields = member_fields::to_fields(&member);
        assert_eq!(
            fields
                .get(&FieldCode::new(member_fields::codes::GENDER))
                .and_then(FieldValue::as_text),
            Some("9002")
        );

        let patch = member_fields::from_fields(&fields);
        assert_eq!(patch.email.as_deref(), Some("jane@example.com"));
        assert_eq!(patch.gender, Some(huddle_core::Gender::Female));
        assert_eq!(patch.class_year, Some(huddle_core::ClassYear::Y2019));
        assert_eq!(patch.slack_username.as_deref(), Some("jane"));
    }

    #[test]
    fn test_unknown_option_code_decodes_to_unset() {
        let mut fields = BTreeMap::new();
        fields.insert(
            FieldCode::new(member_fields::codes::GENDER),
            FieldValue::from("9999"),
        );
        let patch = member_fields::from_fields(&fields);
        assert_eq!(patch.gender, None);
    }

    #[test]
    fn test_patch_carries_no_coordinates() {
        // Remote coordinate fields are decodable in principle, but the
        // patch type cannot represent them: applying a patch must never
        // touch the locally derived coordinates.
        let mut member = huddle_core::Member::new("Jane Hacker");
        member.coordinates = Some(Coordinates::new(1.0, 2.0));

        let mut fields = member_fields::to_fields(&member);
        fields.insert(
            FieldCode::new(member_fields::codes::LATITUDE),
            FieldValue::from(13.37),
        );
        fields.insert(
            FieldCode::new(member_fields::codes::LONGITUDE),
            FieldValue::from(-13.37),
        );

        member_fields::from_fields(&fields).apply_to(&mut member);
        assert_eq!(member.coordinates, Some(Coordinates::new(1.0, 2.0)));
    }

    #[test]
    fn test_absent_remote_field_clears_attribute() {
        let mut member = huddle_core::Member::new("Jane Hacker");
        member.phone = Some("555-0100".to_string());

        let fields = BTreeMap::new();
        member_fields::from_fields(&fields).apply_to(&mut member);
        assert_eq!(member.phone, None);
    }
}
