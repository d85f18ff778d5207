//! Role, society-type, and unit vocabulary used across crates.

use serde::{Deserialize, Serialize};

/// User role within the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform operator: can create societies and set subscription expiry.
    SuperAdmin,
    /// Society administrator: manages buildings, plans, dues, and fines.
    Admin,
    /// Resident member: self-scoped views only.
    Member,
}

impl Role {
    /// Parses a role from its wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "super_admin" => Some(Self::SuperAdmin),
            "admin" => Some(Self::Admin),
            "member" => Some(Self::Member),
            _ => None,
        }
    }

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    /// Whether this role may perform management actions (anything but member).
    #[must_use]
    pub const fn is_management(self) -> bool {
        !matches!(self, Self::Member)
    }
}

/// Society flavor. Housing societies bill housing units directly; the other
/// two bill flats inside buildings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocietyType {
    /// Residential complex of buildings and flats.
    Residential,
    /// Commercial complex of buildings and shops.
    Commercial,
    /// Housing society of standalone units.
    Housing,
}

impl SocietyType {
    /// Parses a society type from its wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "residential" => Some(Self::Residential),
            "commercial" => Some(Self::Commercial),
            "housing" => Some(Self::Housing),
            _ => None,
        }
    }

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Commercial => "commercial",
            Self::Housing => "housing",
        }
    }

    /// The billable unit family for this society type.
    #[must_use]
    pub const fn unit_kind(self) -> UnitKind {
        match self {
            Self::Residential | Self::Commercial => UnitKind::Flat,
            Self::Housing => UnitKind::HousingUnit,
        }
    }
}

/// Polymorphic billable unit: a flat inside a building, or a standalone
/// housing unit. One abstraction at the domain layer, two tables underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Flat belonging to a building.
    Flat,
    /// Housing unit belonging directly to a society.
    HousingUnit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("super_admin", Some(Role::SuperAdmin))]
    #[case("admin", Some(Role::Admin))]
    #[case("member", Some(Role::Member))]
    #[case("owner", None)]
    #[case("", None)]
    fn test_role_parse(#[case] input: &str, #[case] expected: Option<Role>) {
        assert_eq!(Role::parse(input), expected);
    }

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::SuperAdmin, Role::Admin, Role::Member] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_member_is_not_management() {
        assert!(Role::SuperAdmin.is_management());
        assert!(Role::Admin.is_management());
        assert!(!Role::Member.is_management());
    }

    #[rstest]
    #[case(SocietyType::Residential, UnitKind::Flat)]
    #[case(SocietyType::Commercial, UnitKind::Flat)]
    #[case(SocietyType::Housing, UnitKind::HousingUnit)]
    fn test_unit_kind_per_society_type(
        #[case] society_type: SocietyType,
        #[case] expected: UnitKind,
    ) {
        assert_eq!(society_type.unit_kind(), expected);
    }
}
