use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Permission, PermissionSet};

/// A `"||"`-delimited disjunction of permission names.
///
/// Menu entries declare requirements in the form `"orders.index||orders.store"`;
/// the requirement is satisfied when the user holds *any one* of the listed
/// alternatives. Whitespace around alternatives is ignored and empty
/// alternatives are dropped, so `"a || b"` and `"a||b"` are the same
/// requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Requirement(Vec<Permission>);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequirementError {
    /// The requirement string contained no permission name at all.
    #[error("requirement contains no permission names")]
    Empty,
}

impl Requirement {
    /// Build a requirement from explicit alternatives.
    ///
    /// Alternatives that duplicate an earlier one are kept as written; the
    /// disjunction is evaluated left to right and duplicates are harmless.
    pub fn any<I, P>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Self(alternatives.into_iter().map(Into::into).collect())
    }

    pub fn single(permission: impl Into<Permission>) -> Self {
        Self(vec![permission.into()])
    }

    pub fn alternatives(&self) -> &[Permission] {
        &self.0
    }

    /// True iff the user holds at least one alternative.
    pub fn satisfied_by(&self, granted: &PermissionSet) -> bool {
        self.0.iter().any(|p| granted.has(p.as_str()))
    }
}

impl FromStr for Requirement {
    type Err = RequirementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let alternatives: Vec<Permission> = s
            .split("||")
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| Permission::new(name.to_string()))
            .collect();

        if alternatives.is_empty() {
            return Err(RequirementError::Empty);
        }
        Ok(Self(alternatives))
    }
}

impl TryFrom<String> for Requirement {
    type Error = RequirementError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Requirement> for String {
    fn from(value: Requirement) -> Self {
        value.to_string()
    }
}

impl core::fmt::Display for Requirement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, permission) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("||")?;
            }
            f.write_str(permission.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn parses_single_name() {
        let req: Requirement = "orders.index".parse().unwrap();
        assert_eq!(req.alternatives(), &[Permission::new("orders.index")]);
    }

    #[test]
    fn parses_disjunction_and_trims_whitespace() {
        let req: Requirement = "orders.index || orders.store||orders.show".parse().unwrap();
        assert_eq!(
            req.alternatives(),
            &[
                Permission::new("orders.index"),
                Permission::new("orders.store"),
                Permission::new("orders.show"),
            ]
        );
    }

    #[test]
    fn drops_empty_alternatives() {
        let req: Requirement = "||orders.index||".parse().unwrap();
        assert_eq!(req.alternatives(), &[Permission::new("orders.index")]);
    }

    #[test]
    fn rejects_blank_requirement() {
        assert_eq!("".parse::<Requirement>(), Err(RequirementError::Empty));
        assert_eq!("  ||  ".parse::<Requirement>(), Err(RequirementError::Empty));
    }

    #[test]
    fn satisfied_when_any_alternative_is_held() {
        let req: Requirement = "orders.index||orders.store".parse().unwrap();

        let first_only: PermissionSet = ["orders.index"].into_iter().collect();
        let second_only: PermissionSet = ["orders.store"].into_iter().collect();
        let unrelated: PermissionSet = ["roles.index"].into_iter().collect();

        assert!(req.satisfied_by(&first_only));
        assert!(req.satisfied_by(&second_only));
        assert!(!req.satisfied_by(&unrelated));
        assert!(!req.satisfied_by(&PermissionSet::new()));
    }

    #[test]
    fn serde_round_trips_through_the_delimited_form() {
        let req: Requirement = "roles.index||roles.store".parse().unwrap();
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#""roles.index||roles.store""#);

        let back: Requirement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, req);
    }

    proptest! {
        /// Property: for permission names free of the delimiter and edge
        /// whitespace, display-then-parse reproduces the requirement.
        #[test]
        fn display_parse_round_trip(
            names in prop::collection::vec("[a-z][a-z.-]{0,20}[a-z]", 1..6)
        ) {
            let req = Requirement::any(names.iter().cloned().map(Permission::from));
            let reparsed: Requirement = req.to_string().parse().unwrap();
            prop_assert_eq!(reparsed, req);
        }
    }
}
