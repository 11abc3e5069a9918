//! Sparse patch fields
//!
//! A request body field can be missing, explicitly `null`, or carry a value.
//! `Option<T>` cannot tell the first two apart, so update requests use
//! [`Patch<T>`] together with `#[serde(default)]`:
//!
//! ```ignore
//! #[derive(Deserialize)]
//! struct UpdateFlightRequest {
//!     #[serde(default, skip_serializing_if = "Patch::is_absent")]
//!     piloto: Patch<String>,
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One field of a sparse update
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// Field not present: leave the stored value alone
    #[default]
    Absent,
    /// Field present as `null`: clear the stored value
    Clear,
    /// Field present with a value
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Patch<U> {
        match self {
            Patch::Absent => Patch::Absent,
            Patch::Clear => Patch::Clear,
            Patch::Set(value) => Patch::Set(f(value)),
        }
    }

    /// The new value of an optional field, `None` when the field is absent
    pub fn into_change(self) -> Option<Option<T>> {
        match self {
            Patch::Absent => None,
            Patch::Clear => Some(None),
            Patch::Set(value) => Some(Some(value)),
        }
    }

    /// Apply to an optional stored value
    pub fn apply_to(self, target: &mut Option<T>) {
        if let Some(change) = self.into_change() {
            *target = change;
        }
    }
}

impl Patch<String> {
    /// Treat an explicit empty string like `null`
    ///
    /// HTML forms have no way to send `null` for a select, so an empty string
    /// is how a cleared crew picker arrives.
    pub fn empty_as_clear(self) -> Self {
        match self {
            Patch::Set(value) if value.trim().is_empty() => Patch::Clear,
            other => other,
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only reached when the key is present; missing keys use `Default`.
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

impl<T> Serialize for Patch<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Set(value) => value.serialize(serializer),
            Patch::Absent | Patch::Clear => serializer.serialize_none(),
        }
    }
}
