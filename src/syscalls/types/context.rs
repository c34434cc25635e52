/*!
 * Call Context
 * Per-invocation attributes the host attaches to a syscall attempt
 */

use crate::core::types::SockFd;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::path::{Path, PathBuf};

/// Executable format request (interpreter lookup for `execve`)
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinfmtRequest {
    pub path: Option<PathBuf>,
    pub interp: Option<String>,
    pub flags: i32,
}

/// Read-only description of one syscall instance
///
/// Which attributes are present depends on the kind of check the host runs:
/// path-based calls carry `path`, socket calls `socket`, mounts `fstype`,
/// raw syscall checks `sc` and exec checks `binfmt`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub path: Option<PathBuf>,
    pub socket: Option<SockFd>,
    pub fstype: Option<String>,
    pub sc: Option<i64>,
    pub binfmt: Option<BinfmtRequest>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self::new().with_path(path)
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_socket(mut self, socket: SockFd) -> Self {
        self.socket = Some(socket);
        self
    }

    pub fn with_fstype(mut self, fstype: impl Into<String>) -> Self {
        self.fstype = Some(fstype.into());
        self
    }

    pub fn with_sc(mut self, sc: i64) -> Self {
        self.sc = Some(sc);
        self
    }

    pub fn with_binfmt(mut self, binfmt: BinfmtRequest) -> Self {
        self.binfmt = Some(binfmt);
        self
    }

    #[inline]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[inline]
    pub fn fstype(&self) -> Option<&str> {
        self.fstype.as_deref()
    }
}
