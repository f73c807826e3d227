//! Newtype IDs for type-safe entity references.
//!
//! The backend owns every identifier and hands them out as opaque strings
//! (UUIDs today). Use the `define_id!` macro to create wrappers that keep a
//! restaurant id from being passed where a unit id is expected.

/// Errors that can occur when parsing an id.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty or only whitespace.
    #[error("id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// Maximum accepted id length. Generous enough for any UUID or slug form.
pub const MAX_ID_LENGTH: usize = 128;

/// Validate an opaque id string.
///
/// # Errors
///
/// Returns an error if the value is blank or longer than [`MAX_ID_LENGTH`].
pub fn validate_id(value: &str) -> Result<(), IdError> {
    if value.trim().is_empty() {
        return Err(IdError::Empty);
    }
    if value.len() > MAX_ID_LENGTH {
        return Err(IdError::TooLong {
            max: MAX_ID_LENGTH,
        });
    }
    Ok(())
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` as a plain string (validated on the way in)
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `parse()`, `as_str()`, `Display`, `FromStr`
///
/// # Example
///
/// ```rust
/// # use seu_garcom_core::define_id;
/// define_id!(TableId);
///
/// let table = TableId::parse("t-12").unwrap();
/// assert_eq!(table.as_str(), "t-12");
/// assert!(TableId::parse("  ").is_err());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse an id from a string.
            ///
            /// # Errors
            ///
            /// Returns an error if the value is blank or too long.
            pub fn parse(value: &str) -> ::core::result::Result<Self, $crate::IdError> {
                $crate::validate_id(value)?;
                Ok(Self(value.to_owned()))
            }

            /// Get the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl ::core::convert::TryFrom<String> for $name {
            type Error = $crate::IdError;

            fn try_from(value: String) -> ::core::result::Result<Self, Self::Error> {
                $crate::validate_id(&value)?;
                Ok(Self(value))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(RestaurantId);
define_id!(UnitId);
define_id!(TableId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(UserId::parse(""), Err(IdError::Empty));
        assert_eq!(UserId::parse("   "), Err(IdError::Empty));
    }

    #[test]
    fn test_parse_rejects_too_long() {
        let long = "x".repeat(MAX_ID_LENGTH + 1);
        assert!(matches!(
            RestaurantId::parse(&long),
            Err(IdError::TooLong { .. })
        ));
    }

    #[test]
    fn test_serde_is_a_plain_string() {
        let id = UnitId::parse("unit-7").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"unit-7\"");
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<TableId>("\"\"").is_err());
        let id: TableId = serde_json::from_str("\"mesa-4\"").unwrap();
        assert_eq!(id.to_string(), "mesa-4");
    }
}
