use serde::{Deserialize, Serialize};

/// How the builder treats descriptor content the rule tables do not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Unknown tags, properties and definition children are dropped without
    /// a signal. Historical behavior, forgiving to forward-compatible
    /// descriptors.
    #[default]
    Lenient,
    /// The first unknown tag/property/definition child or duplicate authored
    /// id fails compilation.
    Strict,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BuildOptions {
    pub policy: ValidationPolicy,
}

impl BuildOptions {
    pub fn lenient() -> Self {
        Self {
            policy: ValidationPolicy::Lenient,
        }
    }

    pub fn strict() -> Self {
        Self {
            policy: ValidationPolicy::Strict,
        }
    }

    #[inline]
    pub fn is_strict(&self) -> bool {
        self.policy == ValidationPolicy::Strict
    }
}
