/*!
 * Syscall Identity
 * Platform-independent tags naming the syscalls a plugin may handle
 */

use crate::core::errors::PluginError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Enumerated syscall identity, the key space of the dispatch table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyscallId {
    Open,
    Close,
    Read,
    Write,
    Access,
    Mkdir,
    Rmdir,
    Chmod,
    Chown,
    Lchown,
    Unlink,
    Link,
    Symlink,
    Stat,
    Lstat,
    Fstat,
    Stat64,
    Lstat64,
    Fstat64,
    Statfs,
    Statfs64,
}

impl SyscallId {
    pub const COUNT: usize = 21;

    pub const ALL: [SyscallId; Self::COUNT] = [
        Self::Open,
        Self::Close,
        Self::Read,
        Self::Write,
        Self::Access,
        Self::Mkdir,
        Self::Rmdir,
        Self::Chmod,
        Self::Chown,
        Self::Lchown,
        Self::Unlink,
        Self::Link,
        Self::Symlink,
        Self::Stat,
        Self::Lstat,
        Self::Fstat,
        Self::Stat64,
        Self::Lstat64,
        Self::Fstat64,
        Self::Statfs,
        Self::Statfs64,
    ];

    /// Syscall name, also the default primitive selector (`cname`)
    pub const fn name(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Read => "read",
            Self::Write => "write",
            Self::Access => "access",
            Self::Mkdir => "mkdir",
            Self::Rmdir => "rmdir",
            Self::Chmod => "chmod",
            Self::Chown => "chown",
            Self::Lchown => "lchown",
            Self::Unlink => "unlink",
            Self::Link => "link",
            Self::Symlink => "symlink",
            Self::Stat => "stat",
            Self::Lstat => "lstat",
            Self::Fstat => "fstat",
            Self::Stat64 => "stat64",
            Self::Lstat64 => "lstat64",
            Self::Fstat64 => "fstat64",
            Self::Statfs => "statfs",
            Self::Statfs64 => "statfs64",
        }
    }
}

impl fmt::Display for SyscallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SyscallId {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.name() == s)
            .ok_or_else(|| PluginError::UnknownSyscall(s.to_string()))
    }
}
