use std::fmt::{Debug, Display};

use smol_str::SmolStr;

/// The name of a mathvariant rendering class, e.g. "script" or "bold-fraktur".
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariantName(SmolStr);

impl VariantName {
    /// The pseudo-variant that classifies isolated forms; it names no transform.
    pub const ISOLATED: VariantName = VariantName(SmolStr::new_inline("isolated"));

    pub fn new(s: impl AsRef<str>) -> Self {
        Self(SmolStr::new(s))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_inner(self) -> SmolStr {
        self.0
    }
}

impl From<&str> for VariantName {
    fn from(value: &str) -> Self {
        VariantName(value.into())
    }
}

impl From<SmolStr> for VariantName {
    fn from(value: SmolStr) -> Self {
        VariantName(value)
    }
}

impl Debug for VariantName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for VariantName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for VariantName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

// this means a map keyed by VariantName can be probed with a &str
impl std::borrow::Borrow<str> for VariantName {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq<&str> for VariantName {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
