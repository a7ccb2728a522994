//! `objrt check`: Fail if any class cannot be linked.

use crate::manifest::load_runtime;
use crate::output::StyledOutput;
use std::path::Path;

pub fn execute(manifest: &Path, out: &mut StyledOutput) -> anyhow::Result<()> {
    let (runtime, report) = load_runtime(manifest)?;
    let unresolved = runtime.unresolved_classes();

    if unresolved.is_empty() {
        out.success("ok");
        out.plain(&format!(" {} classes linked", report.classes));
        out.newline();
        return Ok(());
    }

    for name in &unresolved {
        out.warning("unresolved");
        out.plain(&format!(" {}", name));
        if report.pending.contains(name) {
            out.dim(" (load hook pending)");
        }
        out.newline();
    }
    anyhow::bail!("{} classes cannot be linked", unresolved.len())
}
