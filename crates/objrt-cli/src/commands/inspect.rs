//! `objrt inspect`: Show one class in detail.

use crate::manifest::load_runtime;
use crate::output::StyledOutput;
use anyhow::Context;
use objrt_core::{Class, Runtime, SelectorId};
use std::path::Path;

pub fn execute(manifest: &Path, name: &str, meta: bool, out: &mut StyledOutput) -> anyhow::Result<()> {
    let (runtime, _) = load_runtime(manifest)?;
    let mut class = runtime.require_class(name)?;
    if meta {
        class = runtime
            .metaclass_of(&class)
            .with_context(|| format!("{} has no metaclass", name))?;
    }
    runtime.initialize_class(&class);

    out.field("Class", &describe(&class));
    let superclass = runtime
        .superclass(&class)
        .map(|superclass| describe(&superclass))
        .unwrap_or_else(|| "(root)".to_string());
    out.field("Superclass", &superclass);
    let size = runtime
        .instance_size(&class)
        .map(|size| format!("{} bytes", size))
        .unwrap_or_else(|| "unresolved".to_string());
    out.field("Instance size", &size);

    let ivars = runtime.ivar_list(&class);
    if !ivars.is_empty() {
        out.newline();
        out.bold("Ivars");
        out.newline();
        for ivar in &ivars {
            out.plain(&format!("  {:<20} {:<12} ", ivar.name(), ivar.type_encoding()));
            out.info(&format!("@{}", objrt_core::ivar_offset(ivar)));
            out.newline();
        }
    }

    let methods = runtime.copy_method_list(&class);
    if !methods.is_empty() {
        out.newline();
        out.bold("Methods");
        out.newline();
        for method in methods {
            let selector = runtime
                .method_name(method)
                .map(|sel| selector_name(&runtime, sel))
                .unwrap_or_default();
            out.plain(&format!("  {:<24} ", selector));
            match (runtime.method_return_type(method), runtime.method_argument_count(method)) {
                (Ok(ret), Ok(args)) => out.dim(&format!("returns {}, {} args", ret, args)),
                (Err(e), _) | (_, Err(e)) => out.warning(&e.to_string()),
            }
            out.newline();
        }
    }

    if let Some(table) = runtime.dispatch_table(&class) {
        out.newline();
        out.bold(&format!("Dispatch table ({} entries)", table.len()));
        out.newline();
        for (sel, imp) in table.entries() {
            out.plain(&format!("  {:<24} ", selector_name(&runtime, sel)));
            out.info(imp.symbol().unwrap_or("<anonymous>"));
            out.newline();
        }
    }
    Ok(())
}

fn describe(class: &Class) -> String {
    let kind = if class.is_metaclass() { "metaclass" } else { "class" };
    format!("{} ({})", class.name(), kind)
}

fn selector_name(runtime: &Runtime, sel: SelectorId) -> String {
    runtime
        .selector_name(sel)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("#{}", sel.as_u32()))
}
