/*!
 * Syscall Arguments
 * Positional arguments the host passes to a claimed syscall
 */

use crate::core::types::Fd;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Positional arguments of a claimed call, one shape per emulation family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "shape")]
pub enum SyscallArgs {
    /// `open(path, flags, mode)`
    Open {
        path: PathBuf,
        flags: i32,
        mode: u32,
    },

    /// `close(fd)`
    Close { fd: Fd },

    /// Single path (`unlink`, `rmdir`)
    Path { path: PathBuf },

    /// Path and mode (`access`, `mkdir`, `chmod`)
    PathMode { path: PathBuf, mode: u32 },

    /// Path and ownership, `None` leaves the id unchanged (`chown`, `lchown`)
    PathOwner {
        path: PathBuf,
        uid: Option<u32>,
        gid: Option<u32>,
    },

    /// Two paths (`link`, `symlink`)
    PathPair { oldpath: PathBuf, newpath: PathBuf },

    /// `stat`/`lstat` by path
    StatPath { path: PathBuf },

    /// `fstat` by descriptor
    StatFd { fd: Fd },

    /// `statfs(path)`
    Statfs { path: PathBuf },
}

impl SyscallArgs {
    /// Primary path argument, if the shape has one
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Open { path, .. }
            | Self::Path { path }
            | Self::PathMode { path, .. }
            | Self::PathOwner { path, .. }
            | Self::StatPath { path }
            | Self::Statfs { path } => Some(path),
            Self::PathPair { oldpath, .. } => Some(oldpath),
            Self::Close { .. } | Self::StatFd { .. } => None,
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            Self::Open { .. } => "open",
            Self::Close { .. } => "close",
            Self::Path { .. } => "path",
            Self::PathMode { .. } => "path_mode",
            Self::PathOwner { .. } => "path_owner",
            Self::PathPair { .. } => "path_pair",
            Self::StatPath { .. } => "stat_path",
            Self::StatFd { .. } => "stat_fd",
            Self::Statfs { .. } => "statfs",
        }
    }
}
