/*!
 * Host Primitives
 * Enumerated selector for the concrete OS operation an emulation invokes
 */

use super::types::SyscallId;
use crate::core::errors::PluginError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Concrete host OS primitive (`cname`) an emulation family dispatches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Open,
    Close,
    Unlink,
    Rmdir,
    Access,
    Mkdir,
    Chmod,
    Chown,
    Lchown,
    Link,
    Symlink,
    Stat,
    Lstat,
    Fstat,
    Statfs,
}

impl Primitive {
    const ALL: [Primitive; 15] = [
        Self::Open,
        Self::Close,
        Self::Unlink,
        Self::Rmdir,
        Self::Access,
        Self::Mkdir,
        Self::Chmod,
        Self::Chown,
        Self::Lchown,
        Self::Link,
        Self::Symlink,
        Self::Stat,
        Self::Lstat,
        Self::Fstat,
        Self::Statfs,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Unlink => "unlink",
            Self::Rmdir => "rmdir",
            Self::Access => "access",
            Self::Mkdir => "mkdir",
            Self::Chmod => "chmod",
            Self::Chown => "chown",
            Self::Lchown => "lchown",
            Self::Link => "link",
            Self::Symlink => "symlink",
            Self::Stat => "stat",
            Self::Lstat => "lstat",
            Self::Fstat => "fstat",
            Self::Statfs => "statfs",
        }
    }

    /// Resolve a primitive by name; a `64` suffix (`lstat64`, `statfs64`)
    /// names the same primitive as the base call.
    pub fn from_cname(cname: &str) -> Result<Self, PluginError> {
        let base = cname.strip_suffix("64").unwrap_or(cname);
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name() == base)
            .ok_or_else(|| PluginError::unsupported_selector("any", cname))
    }

    /// Default selector for a syscall identity, `None` for calls that have
    /// no emulation primitive (`read`, `write`)
    pub fn for_syscall(id: SyscallId) -> Option<Self> {
        Self::from_cname(id.name()).ok()
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
