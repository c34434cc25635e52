/*!
 * scvirt-host - Demo Host
 *
 * Loads the plugin the way a virtualization host would and replays `stat`
 * attempts for every path given on the command line:
 *
 *   SCVIRT_SENTINEL=/tmp/passwd scvirt-host /tmp/passwd /etc/passwd
 */

use miette::{IntoDiagnostic, Result};
use syscall_virt::{
    init_tracing, CallContext, CtlArg, CtlClass, Plugin, PluginConfig, SyscallArgs, SyscallId,
};
use tracing::{info, warn};

fn main() -> Result<()> {
    init_tracing();

    let config = PluginConfig::from_env()?;
    let plugin = Plugin::from_config(&config)?;

    info!(
        capabilities = %serde_json::to_string(plugin.capabilities()).into_diagnostic()?,
        "capability declaration"
    );

    let pid = i64::from(std::process::id());
    let status = plugin.on_control(
        CtlClass::Process,
        "add",
        &[CtlArg::Int(pid), CtlArg::Int(0), CtlArg::Int(1)],
    );
    if status != 0 {
        warn!(status, "host process announcement rejected");
    }

    if !plugin.offers(SyscallId::Stat) {
        warn!("stat is outside the plugin repertoire, every call falls through");
    }

    for path in std::env::args().skip(1) {
        let context = CallContext::for_path(&path);
        let args = SyscallArgs::StatPath {
            path: path.clone().into(),
        };

        match plugin.intercept(SyscallId::Stat, &args, &context) {
            Some(result) => {
                println!("{} {}", path, serde_json::to_string(&result).into_diagnostic()?);
            }
            None => println!("{} native", path),
        }
    }

    Ok(())
}
