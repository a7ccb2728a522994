//! JSON class manifests
//!
//! A manifest is the symbol table a compiler would emit, written as JSON.
//! Method bodies are named by symbol; every distinct symbol becomes one
//! [`Imp`] so two methods naming the same symbol share an implementation.
//!
//! ```json
//! {
//!   "classes": [
//!     { "name": "Root", "instance_size": -8,
//!       "methods": [{ "selector": "foo", "types": "v16@0:8", "imp": "Root_foo" }] },
//!     { "name": "Leaf", "superclass": "Root", "instance_size": -4, "aliases": ["Twig"] }
//!   ],
//!   "categories": [
//!     { "name": "Extras", "class": "Leaf",
//!       "methods": [{ "selector": "bar", "types": "v16@0:8", "imp": "Leaf_Extras_bar" }] }
//!   ]
//! }
//! ```

use anyhow::Context;
use objrt_core::{CategoryDef, ClassDef, Imp, IvarDef, LoadReport, Runtime, SymbolTable};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::path::Path;
use tracing::trace;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub classes: Vec<ClassEntry>,
    #[serde(default)]
    pub categories: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassEntry {
    pub name: String,
    #[serde(default)]
    pub superclass: Option<String>,
    /// Raw size as emitted: negative for a declared size
    #[serde(default)]
    pub instance_size: i64,
    #[serde(default)]
    pub ivars: Vec<IvarEntry>,
    #[serde(default)]
    pub methods: Vec<MethodEntry>,
    #[serde(default)]
    pub class_methods: Vec<MethodEntry>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IvarEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub type_encoding: String,
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodEntry {
    pub selector: String,
    pub types: String,
    pub imp: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryEntry {
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    #[serde(default)]
    pub methods: Vec<MethodEntry>,
    #[serde(default)]
    pub class_methods: Vec<MethodEntry>,
}

/// Interns implementation symbols
#[derive(Default)]
struct Symbols {
    imps: FxHashMap<String, Imp>,
}

impl Symbols {
    fn imp(&mut self, symbol: &str) -> Imp {
        self.imps
            .entry(symbol.to_string())
            .or_insert_with(|| {
                Imp::named(symbol, |_, class, sel| {
                    trace!(class = %class.name(), sel = sel.as_u32(), "called manifest implementation");
                })
            })
            .clone()
    }
}

impl Manifest {
    /// Read and parse a manifest file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid manifest {}", path.display()))
    }

    /// Parse manifest JSON
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Convert to a symbol table, along with the aliases to bind afterwards
    pub fn into_symbol_table(self) -> (SymbolTable, Vec<(String, String)>) {
        let mut symbols = Symbols::default();
        let mut aliases = Vec::new();
        let mut table = SymbolTable::new();

        for entry in self.classes {
            let mut def = ClassDef::new(entry.name.as_str(), 0).with_raw_instance_size(entry.instance_size);
            if let Some(superclass) = entry.superclass {
                def = def.with_superclass(superclass);
            }
            for ivar in entry.ivars {
                def = def.with_ivar(IvarDef::new(ivar.name, ivar.type_encoding, ivar.offset));
            }
            for method in entry.methods {
                let imp = symbols.imp(&method.imp);
                def = def.with_method(method.selector, method.types, imp);
            }
            for method in entry.class_methods {
                let imp = symbols.imp(&method.imp);
                def = def.with_class_method(method.selector, method.types, imp);
            }
            aliases.extend(entry.aliases.into_iter().map(|alias| (entry.name.clone(), alias)));
            table = table.with_class(def);
        }

        for entry in self.categories {
            let mut def = CategoryDef::new(entry.name, entry.class_name);
            for method in entry.methods {
                let imp = symbols.imp(&method.imp);
                def = def.with_method(method.selector, method.types, imp);
            }
            for method in entry.class_methods {
                let imp = symbols.imp(&method.imp);
                def = def.with_class_method(method.selector, method.types, imp);
            }
            table = table.with_category(def);
        }

        (table, aliases)
    }

    /// Register the manifest with a runtime and bind its aliases
    pub fn register(self, runtime: &Runtime) -> anyhow::Result<LoadReport> {
        let (table, aliases) = self.into_symbol_table();
        let report = runtime.register_symbol_table(table);
        for (class_name, alias) in aliases {
            let class = runtime
                .class_named(&class_name)
                .with_context(|| format!("alias {} names unknown class {}", alias, class_name))?;
            runtime.register_alias(&class, &alias)?;
        }
        Ok(report)
    }
}

/// Load a manifest into a fresh runtime
pub fn load_runtime(path: &Path) -> anyhow::Result<(Runtime, LoadReport)> {
    let runtime = Runtime::default();
    let report = Manifest::from_file(path)?.register(&runtime)?;
    Ok((runtime, report))
}
