/*!
 * Lifecycle Events
 * Out-of-band notifications the host pushes outside the syscall path
 */

use crate::core::errors::PluginError;
use crate::core::types::{PluginResult, ProcId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Lifecycle event class a plugin may subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtlClass {
    #[serde(rename = "proc", alias = "process")]
    Process,
    Module,
    Mount,
}

impl CtlClass {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Process => "proc",
            Self::Module => "module",
            Self::Mount => "mount",
        }
    }
}

impl fmt::Display for CtlClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CtlClass {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proc" | "process" => Ok(Self::Process),
            "module" => Ok(Self::Module),
            "mount" => Ok(Self::Mount),
            other => Err(PluginError::UnknownCtlClass(other.to_string())),
        }
    }
}

/// Lifecycle command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtlCommand {
    Add,
    #[serde(rename = "rem", alias = "remove")]
    Remove,
}

impl FromStr for CtlCommand {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "rem" | "remove" => Ok(Self::Remove),
            other => Err(PluginError::invalid_event(format!("unknown command '{}'", other))),
        }
    }
}

/// One positional argument of a lifecycle event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CtlArg {
    Int(i64),
    Str(String),
}

impl From<i64> for CtlArg {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for CtlArg {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

/// Typed lifecycle event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum LifecycleEvent {
    /// A traced process appeared; `max` is the host's current table size
    ProcessAdd { id: ProcId, ppid: ProcId, max: u32 },
    ProcessRemove { id: ProcId },
    ModuleAdd { code: i64 },
    ModuleRemove { code: i64 },
    MountAdd { target: PathBuf, fstype: String },
    MountRemove { target: PathBuf },
}

impl LifecycleEvent {
    pub fn class(&self) -> CtlClass {
        match self {
            Self::ProcessAdd { .. } | Self::ProcessRemove { .. } => CtlClass::Process,
            Self::ModuleAdd { .. } | Self::ModuleRemove { .. } => CtlClass::Module,
            Self::MountAdd { .. } | Self::MountRemove { .. } => CtlClass::Mount,
        }
    }

    /// Build an event from the host's `(class, command, args)` triple
    ///
    /// Argument layouts:
    /// - `proc add (id, ppid, max)`, `proc rem (id)`
    /// - `module add (code)`, `module rem (code)`
    /// - `mount add (target, fstype)`, `mount rem (target)`
    pub fn parse(class: CtlClass, command: &str, args: &[CtlArg]) -> PluginResult<Self> {
        let command: CtlCommand = command.parse()?;
        let event = match (class, command) {
            (CtlClass::Process, CtlCommand::Add) => {
                expect_arity(class, command, args, 3)?;
                Self::ProcessAdd {
                    id: proc_id(&args[0])?,
                    ppid: proc_id(&args[1])?,
                    max: proc_id(&args[2])?,
                }
            }
            (CtlClass::Process, CtlCommand::Remove) => {
                expect_arity(class, command, args, 1)?;
                Self::ProcessRemove {
                    id: proc_id(&args[0])?,
                }
            }
            (CtlClass::Module, CtlCommand::Add) => {
                expect_arity(class, command, args, 1)?;
                Self::ModuleAdd {
                    code: int(&args[0])?,
                }
            }
            (CtlClass::Module, CtlCommand::Remove) => {
                expect_arity(class, command, args, 1)?;
                Self::ModuleRemove {
                    code: int(&args[0])?,
                }
            }
            (CtlClass::Mount, CtlCommand::Add) => {
                expect_arity(class, command, args, 2)?;
                Self::MountAdd {
                    target: PathBuf::from(string(&args[0])?),
                    fstype: string(&args[1])?.to_string(),
                }
            }
            (CtlClass::Mount, CtlCommand::Remove) => {
                expect_arity(class, command, args, 1)?;
                Self::MountRemove {
                    target: PathBuf::from(string(&args[0])?),
                }
            }
        };
        Ok(event)
    }
}

fn expect_arity(
    class: CtlClass,
    command: CtlCommand,
    args: &[CtlArg],
    expected: usize,
) -> PluginResult<()> {
    if args.len() != expected {
        return Err(PluginError::invalid_event(format!(
            "{} {:?} takes {} argument(s), got {}",
            class,
            command,
            expected,
            args.len()
        )));
    }
    Ok(())
}

fn int(arg: &CtlArg) -> PluginResult<i64> {
    match arg {
        CtlArg::Int(v) => Ok(*v),
        CtlArg::Str(s) => Err(PluginError::invalid_event(format!(
            "expected integer, got '{}'",
            s
        ))),
    }
}

fn proc_id(arg: &CtlArg) -> PluginResult<ProcId> {
    let v = int(arg)?;
    ProcId::try_from(v)
        .map_err(|_| PluginError::invalid_event(format!("process id {} out of range", v)))
}

fn string(arg: &CtlArg) -> PluginResult<&str> {
    match arg {
        CtlArg::Str(s) => Ok(s),
        CtlArg::Int(v) => Err(PluginError::invalid_event(format!(
            "expected string, got {}",
            v
        ))),
    }
}
