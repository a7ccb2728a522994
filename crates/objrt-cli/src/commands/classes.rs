//! `objrt classes`: List registered classes.

use crate::manifest::load_runtime;
use crate::output::StyledOutput;
use rustc_hash::FxHashSet;
use std::path::Path;

pub fn execute(manifest: &Path, out: &mut StyledOutput) -> anyhow::Result<()> {
    let (runtime, report) = load_runtime(manifest)?;
    // Links everything that can be linked
    let unresolved = runtime.unresolved_classes();

    let list = runtime.class_list(usize::MAX);
    let mut seen = FxHashSet::default();
    for class in list.classes {
        if !seen.insert(class.clone()) {
            continue;
        }
        out.plain(&format!("{:<24}", class.name()));
        if class.is_linked() {
            out.success("linked");
        } else {
            out.warning("unresolved");
        }
        if class.is_initialized() {
            out.plain("  ");
            out.info("initialized");
        }
        out.newline();
    }

    out.newline();
    out.dim(&format!(
        "{} classes, {} categories, {} load hooks run, {} unresolved",
        report.classes,
        report.categories,
        report.loads_run,
        unresolved.len()
    ));
    out.newline();
    Ok(())
}
