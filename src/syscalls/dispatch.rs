/*!
 * Dispatch Table
 * Maps syscall identities to emulation families and their host primitive
 *
 * Several identities may share a family (aliasing). Every binding is
 * checked when the table is built, so a family can never be handed a
 * primitive it does not implement at call time.
 */

use super::emulation::{
    sys_close, sys_open, sys_path, sys_path_mode, sys_path_owner, sys_path_pair, sys_statfs,
    sys_stats, EmulationFn,
};
use super::primitive::Primitive;
use super::types::{CallContext, ResultTuple, SyscallArgs, SyscallId};
use crate::core::errors::PluginError;
use crate::core::types::PluginResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Emulation family, one per calling convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Open,
    Close,
    SinglePath,
    PathMode,
    PathOwner,
    PathPair,
    Stats,
    Statfs,
}

impl Family {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::SinglePath => "single-path",
            Self::PathMode => "path+mode",
            Self::PathOwner => "ownership",
            Self::PathPair => "path-pair",
            Self::Stats => "stat",
            Self::Statfs => "statfs",
        }
    }

    /// Primitives this family knows how to invoke
    pub const fn primitives(self) -> &'static [Primitive] {
        match self {
            Self::Open => &[Primitive::Open],
            Self::Close => &[Primitive::Close],
            Self::SinglePath => &[Primitive::Unlink, Primitive::Rmdir],
            Self::PathMode => &[Primitive::Access, Primitive::Mkdir, Primitive::Chmod],
            Self::PathOwner => &[Primitive::Chown, Primitive::Lchown],
            Self::PathPair => &[Primitive::Link, Primitive::Symlink],
            Self::Stats => &[Primitive::Stat, Primitive::Lstat, Primitive::Fstat],
            Self::Statfs => &[Primitive::Statfs],
        }
    }

    #[inline]
    pub fn accepts(self, primitive: Primitive) -> bool {
        self.primitives().contains(&primitive)
    }

    pub fn function(self) -> EmulationFn {
        match self {
            Self::Open => sys_open,
            Self::Close => sys_close,
            Self::SinglePath => sys_path,
            Self::PathMode => sys_path_mode,
            Self::PathOwner => sys_path_owner,
            Self::PathPair => sys_path_pair,
            Self::Stats => sys_stats,
            Self::Statfs => sys_statfs,
        }
    }
}

/// A validated (family, primitive) pair bound to its function
#[derive(Clone, Copy)]
pub struct Emulation {
    family: Family,
    primitive: Primitive,
    function: EmulationFn,
}

impl Emulation {
    fn new(family: Family, primitive: Primitive) -> PluginResult<Self> {
        if !family.accepts(primitive) {
            return Err(PluginError::unsupported_selector(family.name(), primitive.name()));
        }
        Ok(Self {
            family,
            primitive,
            function: family.function(),
        })
    }

    #[inline]
    pub fn family(&self) -> Family {
        self.family
    }

    #[inline]
    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    #[inline]
    pub fn invoke(&self, args: &SyscallArgs, context: &CallContext) -> ResultTuple {
        (self.function)(self.primitive, args, context)
    }
}

impl fmt::Debug for Emulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emulation")
            .field("family", &self.family)
            .field("primitive", &self.primitive)
            .finish()
    }
}

impl PartialEq for Emulation {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family && self.primitive == other.primitive
    }
}

impl Eq for Emulation {}

/// How the plugin answers for one syscall identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Handled by the plugin
    Emulated(Emulation),
    /// Listed, but left to the host's native execution
    Native,
}

/// Immutable identity -> binding table
#[derive(Debug, Clone)]
pub struct DispatchTable {
    entries: [Option<Binding>; SyscallId::COUNT],
}

impl DispatchTable {
    pub fn builder() -> DispatchTableBuilder {
        DispatchTableBuilder::default()
    }

    /// Table covering every identity this crate knows about
    pub fn standard() -> PluginResult<Self> {
        Self::builder()
            .emulate(SyscallId::Open, Family::Open)
            .emulate(SyscallId::Close, Family::Close)
            .native(SyscallId::Read)
            .native(SyscallId::Write)
            .emulate(SyscallId::Unlink, Family::SinglePath)
            .emulate(SyscallId::Rmdir, Family::SinglePath)
            .emulate(SyscallId::Access, Family::PathMode)
            .emulate(SyscallId::Mkdir, Family::PathMode)
            .emulate(SyscallId::Chmod, Family::PathMode)
            .emulate(SyscallId::Chown, Family::PathOwner)
            .emulate(SyscallId::Lchown, Family::PathOwner)
            .emulate(SyscallId::Link, Family::PathPair)
            .emulate(SyscallId::Symlink, Family::PathPair)
            .emulate(SyscallId::Stat, Family::Stats)
            .emulate(SyscallId::Lstat, Family::Stats)
            .emulate(SyscallId::Fstat, Family::Stats)
            .emulate(SyscallId::Stat64, Family::Stats)
            .emulate(SyscallId::Lstat64, Family::Stats)
            .emulate(SyscallId::Fstat64, Family::Stats)
            .emulate(SyscallId::Statfs, Family::Statfs)
            .emulate(SyscallId::Statfs64, Family::Statfs)
            .build()
    }

    #[inline]
    pub fn binding(&self, id: SyscallId) -> Option<&Binding> {
        self.entries[id as usize].as_ref()
    }

    /// Emulation for `id`; `None` when the identity is absent or native
    #[inline]
    pub fn resolve(&self, id: SyscallId) -> Option<Emulation> {
        match self.entries[id as usize] {
            Some(Binding::Emulated(emulation)) => Some(emulation),
            _ => None,
        }
    }

    #[inline]
    pub fn contains(&self, id: SyscallId) -> bool {
        self.entries[id as usize].is_some()
    }

    /// Identities with any binding, native ones included
    pub fn identities(&self) -> impl Iterator<Item = SyscallId> + '_ {
        SyscallId::ALL.into_iter().filter(|id| self.contains(*id))
    }

    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

enum Request {
    Emulate { family: Family, cname: Option<String> },
    Native,
}

/// Collects bindings and validates them all in `build`
#[derive(Default)]
pub struct DispatchTableBuilder {
    requests: Vec<(SyscallId, Request)>,
}

impl DispatchTableBuilder {
    /// Bind `id` to `family`, selecting the primitive named like the syscall
    pub fn emulate(mut self, id: SyscallId, family: Family) -> Self {
        self.requests.push((id, Request::Emulate { family, cname: None }));
        self
    }

    /// Bind `id` to `family` with an explicit primitive name
    pub fn emulate_as(mut self, id: SyscallId, family: Family, cname: impl Into<String>) -> Self {
        self.requests.push((
            id,
            Request::Emulate {
                family,
                cname: Some(cname.into()),
            },
        ));
        self
    }

    /// List `id` but leave it to native execution
    pub fn native(mut self, id: SyscallId) -> Self {
        self.requests.push((id, Request::Native));
        self
    }

    pub fn build(self) -> PluginResult<DispatchTable> {
        let mut entries = [None; SyscallId::COUNT];

        for (id, request) in self.requests {
            let slot = &mut entries[id as usize];
            if slot.is_some() {
                return Err(PluginError::DuplicateBinding(id.name().to_string()));
            }

            *slot = Some(match request {
                Request::Native => Binding::Native,
                Request::Emulate { family, cname } => {
                    let cname = cname.as_deref().unwrap_or(id.name());
                    let primitive = Primitive::from_cname(cname)
                        .map_err(|_| PluginError::unsupported_selector(family.name(), cname))?;
                    Binding::Emulated(Emulation::new(family, primitive)?)
                }
            });
        }

        let table = DispatchTable { entries };
        debug!(entries = table.len(), "dispatch table built");
        Ok(table)
    }
}
