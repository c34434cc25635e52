/*!
 * Capability Declaration
 * Static metadata the host reads once at load to prune invocations
 */

use crate::control::CtlClass;
use crate::syscalls::SyscallId;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::BTreeSet;

/// Which syscalls the host may ask about and which lifecycle classes the
/// plugin wants to hear
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    managed_syscalls: Option<BTreeSet<SyscallId>>,
    ctl_classes: BTreeSet<CtlClass>,
}

impl Capabilities {
    pub fn new(
        managed_syscalls: Option<BTreeSet<SyscallId>>,
        ctl_classes: BTreeSet<CtlClass>,
    ) -> Self {
        Self {
            managed_syscalls,
            ctl_classes,
        }
    }

    /// `None` means every syscall is a candidate
    pub fn managed_syscalls(&self) -> Option<&BTreeSet<SyscallId>> {
        self.managed_syscalls.as_ref()
    }

    pub fn ctl_classes(&self) -> &BTreeSet<CtlClass> {
        &self.ctl_classes
    }

    #[inline]
    pub fn is_managed(&self, id: SyscallId) -> bool {
        self.managed_syscalls
            .as_ref()
            .map_or(true, |managed| managed.contains(&id))
    }

    #[inline]
    pub fn observes(&self, class: CtlClass) -> bool {
        self.ctl_classes.contains(&class)
    }
}
