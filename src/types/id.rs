// ABOUTME: Platform GUIDs tagged with the kind of resource they name.
// ABOUTME: An application GUID and a job GUID are distinct types.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Kind of remote resource a GUID refers to.
pub trait GuidKind {
    /// Used in `Debug` output, e.g. `AppGuid("…")`.
    const LABEL: &'static str;
}

pub enum AppKind {}
pub enum JobKind {}

impl GuidKind for AppKind {
    const LABEL: &'static str = "AppGuid";
}

impl GuidKind for JobKind {
    const LABEL: &'static str = "JobGuid";
}

/// A GUID handed out by the control plane for one kind of resource.
#[must_use = "GUIDs name remote resources and should not be ignored"]
pub struct Id<K> {
    guid: String,
    kind: PhantomData<fn() -> K>,
}

pub type AppGuid = Id<AppKind>;
pub type JobGuid = Id<JobKind>;

impl<K> Id<K> {
    pub fn new(guid: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            kind: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.guid
    }

    pub fn into_inner(self) -> String {
        self.guid
    }
}

// Hand-written so that none of them require anything of `K`.

impl<K: GuidKind> fmt::Debug for Id<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", K::LABEL, self.guid)
    }
}

impl<K> fmt::Display for Id<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.guid)
    }
}

impl<K> Clone for Id<K> {
    fn clone(&self) -> Self {
        Self::new(self.guid.as_str())
    }
}

impl<K> PartialEq for Id<K> {
    fn eq(&self, other: &Self) -> bool {
        self.guid.eq_ignore_ascii_case(&other.guid)
    }
}

impl<K> Eq for Id<K> {}

impl<K> Hash for Id<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // GUIDs compare case-insensitively, so hash the folded form.
        for byte in self.guid.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
    }
}

impl<K> Serialize for Id<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.guid)
    }
}

impl<'de, K> Deserialize<'de> for Id<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}
