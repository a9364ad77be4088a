//! Shape identifiers.
//!
//! A [`ShapeId`] names a shape or a shape member. Its canonical string form
//! is `namespace#name` for shapes and `namespace#name$member` for members,
//! where the namespace is one or more dot-separated identifier segments.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a shape id string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid shape id `{id}`: {reason}")]
pub struct ShapeIdError {
    id: String,
    reason: String,
}

impl ShapeIdError {
    fn new(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// The offending id string.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Identifies a shape or shape member in a model.
///
/// Two ids are equal iff namespace, name, and member all match exactly.
/// Ordering is equivalent to ordering by the canonical string form, which
/// gives models a deterministic iteration order.
///
/// # Examples
///
/// ```
/// use seam_model::ShapeId;
///
/// let id: ShapeId = "example.weather#GetForecast".parse().unwrap();
/// assert_eq!(id.namespace(), "example.weather");
/// assert_eq!(id.name(), "GetForecast");
/// assert!(id.member().is_none());
///
/// let member = id.with_member("city").unwrap();
/// assert_eq!(member.to_string(), "example.weather#GetForecast$city");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShapeId {
    namespace: String,
    name: String,
    member: Option<String>,
}

impl ShapeId {
    /// Create a shape id from a namespace and a name.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeIdError`] if the namespace or name is not valid.
    pub fn from_parts(namespace: &str, name: &str) -> Result<Self, ShapeIdError> {
        let display = format!("{namespace}#{name}");
        validate_namespace(&display, namespace)?;
        validate_token(&display, name, "shape name")?;
        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            member: None,
        })
    }

    /// The dotted namespace segments.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The shape name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The member name, if this id names a member.
    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }

    /// Returns `true` if this id names a member of a shape.
    pub fn is_member(&self) -> bool {
        self.member.is_some()
    }

    /// Create a member id rooted at this shape.
    ///
    /// Any existing member segment is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeIdError`] if `member` is not a valid identifier token.
    pub fn with_member(&self, member: &str) -> Result<Self, ShapeIdError> {
        let display = format!("{}#{}${member}", self.namespace, self.name);
        validate_token(&display, member, "member name")?;
        Ok(Self {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            member: Some(member.to_string()),
        })
    }

    /// The id of the containing shape, with any member segment dropped.
    pub fn without_member(&self) -> Self {
        Self {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            member: None,
        }
    }
}

/// Conversion into a borrowed [`ShapeId`].
///
/// Implemented by [`ShapeId`] itself and by shapes, so APIs that only need
/// an id can accept either.
pub trait ToShapeId {
    /// Borrow the shape id.
    fn to_shape_id(&self) -> &ShapeId;
}

impl ToShapeId for ShapeId {
    fn to_shape_id(&self) -> &ShapeId {
        self
    }
}

impl Ord for ShapeId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.namespace
            .cmp(&other.namespace)
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.member.cmp(&other.member))
    }
}

impl PartialOrd for ShapeId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.namespace, self.name)?;
        if let Some(member) = &self.member {
            write!(f, "${member}")?;
        }
        Ok(())
    }
}

impl FromStr for ShapeId {
    type Err = ShapeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, rest) = s
            .split_once('#')
            .ok_or_else(|| ShapeIdError::new(s, "missing `#` between namespace and name"))?;
        validate_namespace(s, namespace)?;

        let (name, member) = match rest.split_once('$') {
            Some((name, member)) => (name, Some(member)),
            None => (rest, None),
        };
        validate_token(s, name, "shape name")?;
        if let Some(member) = member {
            validate_token(s, member, "member name")?;
        }

        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            member: member.map(str::to_string),
        })
    }
}

impl TryFrom<String> for ShapeId {
    type Error = ShapeIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShapeId> for String {
    fn from(id: ShapeId) -> Self {
        id.to_string()
    }
}

fn validate_namespace(display: &str, namespace: &str) -> Result<(), ShapeIdError> {
    if namespace.is_empty() {
        return Err(ShapeIdError::new(display, "namespace must not be empty"));
    }
    for segment in namespace.split('.') {
        validate_token(display, segment, "namespace segment")?;
    }
    Ok(())
}

fn validate_token(display: &str, token: &str, what: &str) -> Result<(), ShapeIdError> {
    let mut chars = token.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ShapeIdError::new(
            display,
            format!("`{token}` is not a valid {what}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_parse_shape_id() {
        let id: ShapeId = "ns.foo#Bar".parse().unwrap();
        assert_eq!(id.namespace(), "ns.foo");
        assert_eq!(id.name(), "Bar");
        assert_eq!(id.member(), None);
        assert!(!id.is_member());
    }

    #[test]
    fn test_parse_member_id() {
        let id: ShapeId = "ns.foo#Bar$baz".parse().unwrap();
        assert_eq!(id.member(), Some("baz"));
        assert!(id.is_member());
        assert_eq!(id.without_member(), "ns.foo#Bar".parse().unwrap());
    }

    #[test]
    fn test_rejects_malformed_ids() {
        for bad in [
            "",
            "no_hash",
            "#Name",
            "ns.foo#",
            "ns..foo#Bar",
            "ns.foo#1Bar",
            "ns.foo#Bar$",
            "ns.foo#Bar$1a",
            "ns.foo#Bar$a$b",
            "ns foo#Bar",
        ] {
            assert!(bad.parse::<ShapeId>().is_err(), "expected error for {bad:?}");
        }
    }

    #[test]
    fn test_from_parts_rejects_bad_tokens() {
        assert!(ShapeId::from_parts("", "Bar").is_err());
        assert!(ShapeId::from_parts("ns.foo", "has space").is_err());
        assert!(ShapeId::from_parts("ns.foo", "Bar").is_ok());
    }

    #[test]
    fn test_with_member_replaces_segment() {
        let id: ShapeId = "ns.foo#Bar$old".parse().unwrap();
        let renamed = id.with_member("new").unwrap();
        assert_eq!(renamed.to_string(), "ns.foo#Bar$new");
    }

    #[test]
    fn test_ordering_matches_string_form() {
        let mut ids: Vec<ShapeId> = ["b.ns#A", "a.ns#B$member", "a.ns#B", "a.ns#A"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        ids.sort();
        let sorted: Vec<String> = ids.iter().map(ShapeId::to_string).collect();
        assert_eq!(sorted, ["a.ns#A", "a.ns#B", "a.ns#B$member", "b.ns#A"]);
    }

    proptest! {
        #[test]
        fn test_display_parse_round_trip(
            ns in "[a-z_][a-z0-9_]{0,8}(\\.[a-z_][a-z0-9_]{0,8}){0,2}",
            name in "[A-Za-z_][A-Za-z0-9_]{0,12}",
            member in proptest::option::of("[a-z_][a-z0-9_]{0,12}"),
        ) {
            let text = match &member {
                Some(member) => format!("{ns}#{name}${member}"),
                None => format!("{ns}#{name}"),
            };
            let id: ShapeId = text.parse().unwrap();
            prop_assert_eq!(id.to_string(), text);
        }
    }
}
