//! Host description and installed-package inventory.
//!
//! The host description is a short plain-text block written once per run so
//! the benchmark numbers stay interpretable after the machine is gone. The
//! package inventories come from `pip` as child processes; machines without
//! a Python toolchain simply lose those two artifacts, nothing else.

use sysinfo::{CpuExt, System, SystemExt};

use crate::exec::Invocation;

const UNKNOWN: &str = "Unknown";

/// Collects a plain-text description of this machine.
///
/// One fact per line: the collecting binary, OS and kernel, CPU and core
/// count, memory, and hostname. Fields the platform does not expose come
/// back as `Unknown` rather than failing the run.
#[must_use]
pub fn collect() -> String {
    let mut sys = System::new();
    sys.refresh_cpu();
    sys.refresh_memory();

    let os = sys
        .long_os_version()
        .or_else(|| sys.name())
        .unwrap_or_else(|| UNKNOWN.to_string());
    let kernel = sys.kernel_version().unwrap_or_else(|| UNKNOWN.to_string());
    let cpu = sys
        .cpus()
        .first()
        .map_or_else(|| UNKNOWN.to_string(), |cpu| cpu.brand().to_string());
    let hostname = sys.host_name().unwrap_or_else(|| UNKNOWN.to_string());

    let mut out = format!(
        "{} {}\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    out.push_str(&format!("{os}\n"));
    out.push_str(&format!("kernel {kernel}\n"));
    out.push_str(&format!(
        "{} {cpu} x {} cores\n",
        std::env::consts::ARCH,
        sys.cpus().len()
    ));
    out.push_str(&format!(
        "memory: {:.1} GiB\n",
        sys.total_memory() as f64 / f64::from(1024 * 1024 * 1024)
    ));
    out.push_str(&format!("hostname: {hostname}\n"));
    out
}

/// Which installed packages an inventory covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackageScope {
    /// Everything visible to the interpreter.
    All,
    /// Only packages local to the active environment.
    Local,
}

/// The `pip list` invocation for one inventory scope.
///
/// Output is columnar text, captured as-is into the artifact.
#[must_use]
pub fn package_inventory(scope: PackageScope) -> Invocation {
    let mut args = vec!["list".to_string(), "--format=columns".to_string()];
    if scope == PackageScope::Local {
        args.push("--local".to_string());
    }
    Invocation::new("pip", args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_describes_this_machine() {
        let info = collect();

        assert!(info.contains(env!("CARGO_PKG_NAME")));
        assert!(info.contains(std::env::consts::ARCH));
        assert!(info.contains("cores"));
        assert!(info.contains("hostname:"));
        assert!(info.ends_with('\n'));
    }

    #[test]
    fn package_inventory_scopes_differ_by_one_flag() {
        let all = package_inventory(PackageScope::All);
        assert_eq!(all.args(), ["list", "--format=columns"]);

        let local = package_inventory(PackageScope::Local);
        assert_eq!(local.args(), ["list", "--format=columns", "--local"]);
    }
}
