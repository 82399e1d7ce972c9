//! Typed Ids

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier issued by the storefront service, tagged with the resource it names.
///
/// The service may hand out ids as JSON strings or numbers. Both compare by
/// their textual form, and an id is written back in the JSON kind it was read
/// in so rows stay comparable with other clients of the same service.
pub struct TypedId<T> {
    value: String,
    kind: IdKind,
    marker: PhantomData<fn() -> T>,
}

/// JSON representation an id travels in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdKind {
    /// JSON string.
    #[default]
    Text,

    /// JSON number.
    Number,
}

impl<T> TypedId<T> {
    /// Wrap a raw identifier that travels as a JSON string.
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_kind(id, IdKind::Text)
    }

    /// Wrap a numeric identifier that travels as a JSON number.
    #[must_use]
    pub fn numeric(id: u64) -> Self {
        Self::with_kind(id.to_string(), IdKind::Number)
    }

    fn with_kind(id: impl Into<String>, kind: IdKind) -> Self {
        Self {
            value: id.into(),
            kind,
            marker: PhantomData,
        }
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// JSON kind the id is serialized as.
    #[must_use]
    pub fn kind(&self) -> IdKind {
        self.kind
    }

    /// Unwrap into the raw identifier.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.value
    }
}

impl<T> Clone for TypedId<T> {
    fn clone(&self) -> Self {
        Self::with_kind(self.value.clone(), self.kind)
    }
}

impl<T> Debug for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Debug::fmt(&self.value, f)
    }
}

impl<T> Display for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.value, f)
    }
}

impl<T> PartialEq for TypedId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for TypedId<T> {}

impl<T> Hash for TypedId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> PartialOrd for TypedId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TypedId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> From<&str> for TypedId<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T> From<String> for TypedId<T> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T> Serialize for TypedId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.kind {
            IdKind::Number => {
                if let Ok(number) = self.value.parse::<u64>() {
                    serializer.serialize_u64(number)
                } else if let Ok(number) = self.value.parse::<i64>() {
                    serializer.serialize_i64(number)
                } else {
                    serializer.serialize_str(&self.value)
                }
            }
            IdKind::Text => serializer.serialize_str(&self.value),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl<'de, T> Deserialize<'de> for TypedId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self::with_kind(text, IdKind::Text),
            RawId::Unsigned(number) => Self::with_kind(number.to_string(), IdKind::Number),
            RawId::Signed(number) => Self::with_kind(number.to_string(), IdKind::Number),
        })
    }
}

/// Marker for identities issued by the identity provider.
#[derive(Debug)]
pub enum User {}

/// Id of the signed-in user.
pub type UserId = TypedId<User>;

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn numeric_ids_are_kept_as_text() -> TestResult {
        let id: UserId = serde_json::from_str("42")?;

        assert_eq!(id.as_str(), "42");

        Ok(())
    }

    #[test]
    fn numeric_ids_are_written_back_as_numbers() -> TestResult {
        let id: UserId = serde_json::from_str("42")?;

        assert_eq!(id.kind(), IdKind::Number);
        assert_eq!(serde_json::to_string(&id)?, "42");
        assert_eq!(id, UserId::new("42"));
        assert_eq!(serde_json::to_string(&UserId::numeric(7))?, "7");

        Ok(())
    }

    #[test]
    fn string_ids_serialize_as_strings() -> TestResult {
        let id: UserId = serde_json::from_str("\"user_2abc\"")?;

        assert_eq!(serde_json::to_string(&id)?, "\"user_2abc\"");

        Ok(())
    }
}
