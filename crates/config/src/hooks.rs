//! Lifecycle hook names
//!
//! The host build tool decides which hooks exist, so the set of names is open.
//! Names outside the well-known build lifecycle are still accepted, but they
//! are reported once at load time since they are usually typos.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Hook fired once when the host has resolved its build configuration
pub const CONFIG_RESOLVED: &str = "configResolved";

/// Lifecycle hooks commonly fired by front-end build tools
pub const WELL_KNOWN_HOOKS: &[&str] = &[
    "config",
    CONFIG_RESOLVED,
    "options",
    "buildStart",
    "resolveId",
    "load",
    "transform",
    "moduleParsed",
    "buildEnd",
    "renderStart",
    "renderChunk",
    "generateBundle",
    "writeBundle",
    "closeBundle",
    "configureServer",
    "handleHotUpdate",
    "watchChange",
    "closeWatcher",
];

/// Name of a lifecycle hook
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HookName(String);

impl HookName {
    /// Create a hook name, rejecting empty or whitespace-only names
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::config("Hook name cannot be empty"));
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the [`WELL_KNOWN_HOOKS`]
    #[must_use]
    pub fn is_well_known(&self) -> bool {
        WELL_KNOWN_HOOKS.contains(&self.0.as_str())
    }
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for HookName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HookName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<HookName> for String {
    fn from(name: HookName) -> Self {
        name.0
    }
}
