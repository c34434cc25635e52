/*!
 * Plugin Builder
 * Assembles and validates a plugin instance at load time
 */

use super::capabilities::Capabilities;
use super::Plugin;
use crate::config::{FilterConfig, PluginConfig, DEFAULT_SENTINEL};
use crate::control::{ControlChannel, CtlClass};
use crate::core::errors::PluginError;
use crate::core::types::PluginResult;
use crate::syscalls::{
    DispatchTable, InterceptFilter, PathPrefixFilter, SentinelPathFilter, SyscallId,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

/// Builder for [`Plugin`]
pub struct PluginBuilder {
    filter: Option<Arc<dyn InterceptFilter>>,
    table: Option<DispatchTable>,
    managed_syscalls: Option<BTreeSet<SyscallId>>,
    ctl_classes: BTreeSet<CtlClass>,
}

impl PluginBuilder {
    pub fn new() -> Self {
        Self {
            filter: None,
            table: None,
            managed_syscalls: None,
            ctl_classes: [CtlClass::Process].into_iter().collect(),
        }
    }

    /// Builder preloaded from a configuration, with every name validated
    pub fn from_config(config: &PluginConfig) -> PluginResult<Self> {
        let filter: Arc<dyn InterceptFilter> = match &config.filter {
            FilterConfig::Sentinel { path } => Arc::new(SentinelPathFilter::new(path)),
            FilterConfig::Prefix { prefix } => Arc::new(PathPrefixFilter::new(prefix)),
        };

        let mut builder = Self::new()
            .with_filter(filter)
            .with_ctl_classes(
                config
                    .ctl_classes
                    .iter()
                    .map(|name| name.parse())
                    .collect::<PluginResult<Vec<CtlClass>>>()?,
            );

        if let Some(names) = &config.managed_syscalls {
            builder = builder.with_managed_syscalls(
                names
                    .iter()
                    .map(|name| name.parse())
                    .collect::<PluginResult<Vec<SyscallId>>>()?,
            );
        }

        Ok(builder)
    }

    pub fn with_filter(mut self, filter: Arc<dyn InterceptFilter>) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_table(mut self, table: DispatchTable) -> Self {
        self.table = Some(table);
        self
    }

    pub fn with_managed_syscalls(mut self, ids: impl IntoIterator<Item = SyscallId>) -> Self {
        self.managed_syscalls = Some(ids.into_iter().collect());
        self
    }

    pub fn with_ctl_classes(mut self, classes: impl IntoIterator<Item = CtlClass>) -> Self {
        self.ctl_classes = classes.into_iter().collect();
        self
    }

    pub fn build(self) -> PluginResult<Plugin> {
        let table = match self.table {
            Some(table) => table,
            None => DispatchTable::standard()?,
        };

        if let Some(managed) = &self.managed_syscalls {
            if let Some(unbound) = managed.iter().find(|id| !table.contains(**id)) {
                return Err(PluginError::UnboundSyscall(unbound.name().to_string()));
            }
        }

        let filter = self.filter.unwrap_or_else(|| {
            Arc::new(SentinelPathFilter::new(DEFAULT_SENTINEL)) as Arc<dyn InterceptFilter>
        });

        let capabilities = Capabilities::new(self.managed_syscalls, self.ctl_classes);
        let control = ControlChannel::new(capabilities.ctl_classes().clone());

        info!(
            filter = filter.name(),
            bindings = table.len(),
            managed = ?capabilities.managed_syscalls(),
            ctl_classes = ?capabilities.ctl_classes(),
            "syscall plugin loaded"
        );

        Ok(Plugin {
            capabilities,
            filter,
            table,
            control,
        })
    }
}

impl Default for PluginBuilder {
    fn default() -> Self {
        Self::new()
    }
}
