//! DriverId - Cheap-to-clone driver identifier
//!
//! Uses Arc<str> internally for O(1) clone operations.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Driver identifier (the timing-screen code, e.g. `VER`) with cheap cloning.
///
/// Codes are normalized on construction: surrounding whitespace is trimmed and
/// ASCII letters are upper-cased, so `" ver"` and `"VER"` name the same driver.
/// Cloning only bumps a reference count, which matters because every frame,
/// gap readout and standing entry carries the id.
///
/// # Examples
/// ```
/// use contracts::DriverId;
///
/// let id: DriverId = " ver ".into();
/// let id2 = id.clone();
/// assert_eq!(id, id2);
/// assert_eq!(id.as_str(), "VER");
/// ```
#[derive(Clone, Default)]
pub struct DriverId(Arc<str>);

impl DriverId {
    /// Create a new DriverId, normalizing the code.
    pub fn new(code: &str) -> Self {
        let trimmed = code.trim();
        if trimmed.bytes().any(|b| b.is_ascii_lowercase()) {
            Self(Arc::from(trimmed.to_ascii_uppercase()))
        } else {
            Self(Arc::from(trimmed))
        }
    }

    /// Get the underlying code.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the code is non-empty and purely alphanumeric.
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty() && self.0.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

impl Deref for DriverId {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for DriverId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DriverId {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DriverId {
    #[inline]
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DriverId {
    #[inline]
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<&String> for DriverId {
    #[inline]
    fn from(s: &String) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl fmt::Debug for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DriverId({:?})", self.0)
    }
}

impl PartialEq for DriverId {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for DriverId {}

impl PartialEq<str> for DriverId {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for DriverId {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl PartialOrd for DriverId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DriverId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

// Must agree with `str` hashing so `HashMap<DriverId, _>::get("VER")` works.
impl Hash for DriverId {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl Serialize for DriverId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DriverId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_clone_shares_storage() {
        let a: DriverId = "LEC".into();
        let b = a.clone();
        assert_eq!(a.as_str().as_ptr(), b.as_str().as_ptr());
    }

    #[test]
    fn test_code_is_normalized() {
        assert_eq!(DriverId::new(" ham\n"), "HAM");
        assert_eq!(DriverId::from(String::from("nor")), DriverId::from("NOR"));
    }

    #[test]
    fn test_well_formed() {
        assert!(DriverId::new("VER").is_well_formed());
        assert!(DriverId::new("44").is_well_formed());
        assert!(!DriverId::new("  ").is_well_formed());
        assert!(!DriverId::new("V-R").is_well_formed());
    }

    #[test]
    fn test_hashmap_lookup_by_str() {
        let mut map: HashMap<DriverId, u32> = HashMap::new();
        map.insert("NOR".into(), 4);
        map.insert("PIA".into(), 81);
        assert_eq!(map.get("NOR"), Some(&4));
        assert_eq!(map.get("PIA"), Some(&81));
    }

    #[test]
    fn test_ordering_is_lexical() {
        let mut ids: Vec<DriverId> = vec!["VER".into(), "ALO".into(), "HAM".into()];
        ids.sort();
        assert_eq!(ids, vec!["ALO", "HAM", "VER"]);
    }

    #[test]
    fn test_serde_normalizes() {
        let parsed: DriverId = serde_json::from_str("\"alo\"").unwrap();
        assert_eq!(parsed, "ALO");
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"ALO\"");
    }
}
