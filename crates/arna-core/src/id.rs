use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Process-wide interner for node identifiers.
///
/// Append-only: every identifier any compile has seen stays interned for the
/// life of the process. Lookups that must not grow it go through
/// [`NodeId::get`].
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Identifier of a graph node as written in the source (`N0`, `#hub`, ...).
///
/// Interned: 4 bytes, `Copy`, constant-time `Eq`/`Hash`. Not ordered; compare
/// [`NodeId::as_str`] for a lexical order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

impl NodeId {
    /// Intern `s`, returning the existing id if it was seen before.
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    /// Look up an already-interned identifier without interning it.
    pub fn get(s: &str) -> Option<Self> {
        INTERNER.get(s).map(NodeId)
    }

    pub fn as_str(&self) -> &'static str {
        INTERNER.resolve(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId::intern(s)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({:?})", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NodeId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_same_id() {
        let a = NodeId::intern("N0");
        let b = NodeId::from("N0");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "N0");
        assert_eq!(a.to_string(), "N0");
    }

    #[test]
    fn identifiers_are_case_sensitive() {
        assert_ne!(NodeId::intern("node"), NodeId::intern("Node"));
    }

    #[test]
    fn get_does_not_intern() {
        assert_eq!(NodeId::get("never_interned_identifier_xyz"), None);
        let id = NodeId::intern("interned_once");
        assert_eq!(NodeId::get("interned_once"), Some(id));
    }
}
