/*!
 * Plugin
 * Host-facing facade: capability declaration, claim decision, dispatch of
 * claimed calls and lifecycle notifications
 */

mod builder;
mod capabilities;

pub use builder::PluginBuilder;
pub use capabilities::Capabilities;

use crate::config::PluginConfig;
use crate::control::{ControlChannel, ControlState, CtlArg, CtlClass, LifecycleEvent};
use crate::core::types::{CtlStatus, PluginResult};
use crate::monitoring::SyscallSpan;
use crate::syscalls::normalizer::reject;
use crate::syscalls::{
    CallContext, DispatchTable, InterceptFilter, ResultTuple, SyscallArgs, SyscallId,
};
use nix::errno::Errno;
use std::sync::Arc;
use tracing::trace;

/// A loaded syscall virtualization plugin
///
/// Host protocol per guest syscall: `offers` (repertoire and managed set),
/// then `decide` (claim), then `syscall` (emulate). `intercept` runs all
/// three and returns `None` whenever the host must fall back to native
/// execution.
pub struct Plugin {
    capabilities: Capabilities,
    filter: Arc<dyn InterceptFilter>,
    table: DispatchTable,
    control: ControlChannel,
}

impl Plugin {
    pub fn builder() -> PluginBuilder {
        PluginBuilder::new()
    }

    pub fn from_config(config: &PluginConfig) -> PluginResult<Self> {
        PluginBuilder::from_config(config)?.build()
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    pub fn filter_name(&self) -> &'static str {
        self.filter.name()
    }

    /// Whether the host should ever consult the filter for `id`
    ///
    /// False for identities outside the managed set, absent from the table,
    /// or bound to native execution (`read`, `write`).
    #[inline]
    pub fn offers(&self, id: SyscallId) -> bool {
        self.capabilities.is_managed(id) && self.table.resolve(id).is_some()
    }

    /// Claim decision for one syscall attempt
    #[inline]
    pub fn decide(&self, context: &CallContext) -> bool {
        self.filter.decide(context)
    }

    /// Execute a claimed call
    ///
    /// An identity without an emulation answers `(-1, ENOSYS)`.
    pub fn syscall(&self, id: SyscallId, args: &SyscallArgs, context: &CallContext) -> ResultTuple {
        let Some(emulation) = self.table.resolve(id) else {
            return reject(id.name(), Errno::ENOSYS);
        };

        let span = SyscallSpan::new(id.name(), emulation.primitive().name());
        let _entered = span.enter();
        let result = emulation.invoke(args, context);
        span.record_outcome(result.value, result.errno);
        result
    }

    /// Full host flow for one syscall attempt; `None` means not claimed
    pub fn intercept(
        &self,
        id: SyscallId,
        args: &SyscallArgs,
        context: &CallContext,
    ) -> Option<ResultTuple> {
        if !self.offers(id) {
            trace!(syscall = id.name(), "not in repertoire");
            return None;
        }
        if !self.decide(context) {
            trace!(syscall = id.name(), "declined by filter");
            return None;
        }
        Some(self.syscall(id, args, context))
    }

    /// Host lifecycle entry point, `0` acknowledges
    pub fn on_control(&self, class: CtlClass, command: &str, args: &[CtlArg]) -> CtlStatus {
        self.control.on_control(class, command, args)
    }

    pub fn deliver(&self, event: &LifecycleEvent) -> CtlStatus {
        self.control.deliver(event)
    }

    pub fn control_state(&self) -> &ControlState {
        self.control.state()
    }
}
