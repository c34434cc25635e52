/*!
 * Result Tuple
 * Host-independent outcome of an emulated syscall
 */

use crate::core::types::{ErrnoCode, ReturnValue};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::BTreeMap;

/// Attribute mapping returned alongside stat-like results (`st_*`, `f_*`)
pub type AttrMap = BTreeMap<String, i64>;

/// Additional data for syscalls whose contract returns more than a scalar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "fields")]
pub enum Extra {
    Stat(AttrMap),
    Statfs(AttrMap),
}

impl Extra {
    pub fn fields(&self) -> &AttrMap {
        match self {
            Self::Stat(fields) | Self::Statfs(fields) => fields,
        }
    }
}

/// `(return_value, errno, ...extra)`
///
/// `errno == 0` iff the call succeeded; `errno` is always in the host's
/// native error-number space.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTuple {
    pub value: ReturnValue,
    pub errno: ErrnoCode,
    pub extra: Option<Extra>,
}

impl ResultTuple {
    #[inline]
    #[must_use]
    pub const fn success(value: ReturnValue) -> Self {
        Self {
            value,
            errno: 0,
            extra: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn success_with(value: ReturnValue, extra: Extra) -> Self {
        Self {
            value,
            errno: 0,
            extra: Some(extra),
        }
    }

    /// Failure tuple `(-1, errno)`; a zero errno is not a failure and is
    /// replaced by EIO.
    #[inline]
    #[must_use]
    pub fn failure(errno: ErrnoCode) -> Self {
        Self {
            value: -1,
            errno: if errno == 0 { nix::errno::Errno::EIO as i32 } else { errno },
            extra: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.errno == 0
    }

    /// Number of tuple slots the host sees
    #[inline]
    #[must_use]
    pub const fn arity(&self) -> usize {
        if self.extra.is_some() {
            3
        } else {
            2
        }
    }

    #[inline]
    #[must_use]
    pub fn fields(&self) -> Option<&AttrMap> {
        self.extra.as_ref().map(Extra::fields)
    }

    /// `(value, errno)` pair
    #[inline]
    #[must_use]
    pub const fn pair(&self) -> (ReturnValue, ErrnoCode) {
        (self.value, self.errno)
    }
}
