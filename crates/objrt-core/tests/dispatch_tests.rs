//! Integration tests for dispatch table construction

use objrt_core::{CategoryDef, ClassDef, Imp, Runtime, SymbolTable};

fn hierarchy(rt: &Runtime) -> (Imp, Imp) {
    let root_foo = Imp::stub("Root.foo");
    let leaf_bar = Imp::stub("Leaf.bar");
    rt.register_symbol_table(
        SymbolTable::new()
            .with_class(ClassDef::new("Root", 8).with_method("foo", "v16@0:8", root_foo.clone()))
            .with_class(ClassDef::new("Mid", 4).with_superclass("Root"))
            .with_class(
                ClassDef::new("Leaf", 4)
                    .with_superclass("Mid")
                    .with_method("bar", "v16@0:8", leaf_bar.clone()),
            ),
    );
    (root_foo, leaf_bar)
}

// ============================================================================
// Inheritance
// ============================================================================

mod inheritance {
    use super::*;

    #[test]
    fn test_leaf_resolves_root_implementation() {
        let rt = Runtime::default();
        let (root_foo, leaf_bar) = hierarchy(&rt);
        let foo = rt.register_selector("foo");
        let bar = rt.register_selector("bar");

        let leaf = rt.require_class("Leaf").unwrap();
        let root = rt.require_class("Root").unwrap();
        assert_eq!(rt.lookup_implementation(&leaf, foo), Some(root_foo.clone()));
        assert_eq!(rt.lookup_implementation(&leaf, foo), rt.lookup_implementation(&root, foo));
        assert_eq!(rt.lookup_implementation(&leaf, bar), Some(leaf_bar));
        assert_eq!(rt.lookup_implementation(&root, bar), None);
    }

    #[test]
    fn test_override_hides_ancestor() {
        let rt = Runtime::default();
        let leaf_foo = Imp::stub("Leaf.foo");
        rt.register_class(ClassDef::new("Root", 0).with_method("foo", "v16@0:8", Imp::stub("Root.foo")));
        let leaf = rt.register_class(
            ClassDef::new("Leaf", 0)
                .with_superclass("Root")
                .with_method("foo", "v16@0:8", leaf_foo.clone()),
        );

        assert_eq!(
            rt.lookup_implementation(&leaf, rt.register_selector("foo")),
            Some(leaf_foo)
        );
    }

    #[test]
    fn test_class_methods_inherit_through_metaclasses() {
        let rt = Runtime::default();
        let make = Imp::stub("Root+make");
        let root = rt.register_class(ClassDef::new("Root", 0).with_class_method("make", "@16@0:8", make.clone()));
        let leaf = rt.register_class(ClassDef::new("Leaf", 0).with_superclass("Root"));
        let sel = rt.register_selector("make");

        let leaf_meta = rt.metaclass_of(&leaf).unwrap();
        assert_eq!(rt.lookup_implementation(&leaf_meta, sel), Some(make));
        assert_eq!(rt.lookup_implementation(&leaf, sel), None);
        assert!(rt.responds_to(&rt.metaclass_of(&root).unwrap(), sel));
    }

    #[test]
    fn test_root_instance_methods_reach_class_side() {
        let rt = Runtime::default();
        let describe = Imp::stub("Root.describe");
        rt.register_class(ClassDef::new("Root", 0).with_method("describe", "@16@0:8", describe.clone()));
        let leaf = rt.register_class(ClassDef::new("Leaf", 0).with_superclass("Root"));

        let leaf_meta = rt.metaclass_of(&leaf).unwrap();
        assert_eq!(
            rt.lookup_implementation(&leaf_meta, rt.register_selector("describe")),
            Some(describe)
        );
    }

    #[test]
    fn test_uninitialized_class_has_no_entries() {
        let rt = Runtime::default();
        let orphan = rt.register_class(
            ClassDef::new("Orphan", 0)
                .with_superclass("Missing")
                .with_method("foo", "v16@0:8", Imp::stub("Orphan.foo")),
        );

        assert_eq!(rt.lookup_implementation(&orphan, rt.register_selector("foo")), None);
        assert!(rt.dispatch_table(&orphan).unwrap().is_empty());
    }
}

// ============================================================================
// Categories
// ============================================================================

mod categories {
    use super::*;

    #[test]
    fn test_second_category_method_present() {
        let rt = Runtime::default();
        let extra = Imp::stub("Widget(Second).extra");
        rt.register_symbol_table(
            SymbolTable::new()
                .with_class(ClassDef::new("Widget", 0).with_method("draw", "v16@0:8", Imp::stub("Widget.draw")))
                .with_category(CategoryDef::new("First", "Widget").with_method(
                    "draw",
                    "v16@0:8",
                    Imp::stub("Widget(First).draw"),
                ))
                .with_category(CategoryDef::new("Second", "Widget").with_method("extra", "v16@0:8", extra.clone())),
        );

        let widget = rt.require_class("Widget").unwrap();
        let table = rt.dispatch_table(&widget).unwrap();
        assert_eq!(table.get(rt.register_selector("extra")), Some(&extra));
        assert_eq!(
            table.get(rt.register_selector("draw")).and_then(Imp::symbol),
            Some("Widget(First).draw")
        );
    }

    #[test]
    fn test_later_category_wins() {
        let rt = Runtime::default();
        let later = Imp::stub("Widget(B).draw");
        rt.register_class(ClassDef::new("Widget", 0));
        rt.register_category(CategoryDef::new("A", "Widget").with_method("draw", "v16@0:8", Imp::stub("Widget(A).draw")));
        rt.register_category(CategoryDef::new("B", "Widget").with_method("draw", "v16@0:8", later.clone()));

        let widget = rt.require_class("Widget").unwrap();
        assert_eq!(rt.lookup_implementation(&widget, rt.register_selector("draw")), Some(later));
    }

    #[test]
    fn test_category_class_methods_apply_to_metaclass() {
        let rt = Runtime::default();
        let shared = Imp::stub("Widget(Factory)+shared");
        let widget = rt.register_class(ClassDef::new("Widget", 0));
        rt.register_category(CategoryDef::new("Factory", "Widget").with_class_method("shared", "@16@0:8", shared.clone()));
        let sel = rt.register_selector("shared");

        assert_eq!(rt.lookup_implementation(&rt.metaclass_of(&widget).unwrap(), sel), Some(shared));
        assert_eq!(rt.lookup_implementation(&widget, sel), None);
    }

    #[test]
    fn test_category_override_propagates_explicitly() {
        let rt = Runtime::default();
        let (root_foo, _) = hierarchy(&rt);
        let foo = rt.register_selector("foo");
        let mid = rt.require_class("Mid").unwrap();
        let leaf = rt.require_class("Leaf").unwrap();
        assert_eq!(rt.lookup_implementation(&leaf, foo), Some(root_foo.clone()));
        assert_eq!(rt.lookup_implementation(&mid, foo), Some(root_foo.clone()));

        let patched = Imp::stub("Mid(Patch).foo");
        rt.register_category(CategoryDef::new("Patch", "Mid").with_method("foo", "v16@0:8", patched.clone()));

        // Nothing changes until a rebuild
        assert_eq!(rt.lookup_implementation(&mid, foo), Some(root_foo.clone()));
        assert_eq!(rt.lookup_implementation(&leaf, foo), Some(root_foo));

        rt.update_dispatch_table(&mid);
        assert_eq!(rt.lookup_implementation(&mid, foo), Some(patched.clone()));
        assert_eq!(rt.lookup_implementation(&leaf, foo), Some(patched));
    }

    #[test]
    fn test_subclass_rebuild_copies_stale_superclass_table() {
        let rt = Runtime::default();
        let (root_foo, _) = hierarchy(&rt);
        let foo = rt.register_selector("foo");
        let mid = rt.require_class("Mid").unwrap();
        let leaf = rt.require_class("Leaf").unwrap();
        assert!(rt.initialize_class(&leaf));

        let patched = Imp::stub("Mid(Patch).foo");
        rt.register_category(CategoryDef::new("Patch", "Mid").with_method("foo", "v16@0:8", patched.clone()));

        // Leaf inherits whatever Mid's table holds right now
        rt.update_dispatch_table(&leaf);
        assert_eq!(rt.lookup_implementation(&leaf, foo), Some(root_foo));

        rt.update_dispatch_table(&mid);
        assert_eq!(rt.lookup_implementation(&leaf, foo), Some(patched));
    }

    #[test]
    fn test_category_in_later_symbol_table_rebuilds_live_classes() {
        let rt = Runtime::default();
        let (_, _) = hierarchy(&rt);
        let leaf = rt.require_class("Leaf").unwrap();
        assert!(rt.initialize_class(&leaf));

        let patched = Imp::stub("Root(Patch).foo");
        rt.register_symbol_table(
            SymbolTable::new().with_category(CategoryDef::new("Patch", "Root").with_method("foo", "v16@0:8", patched.clone())),
        );

        assert_eq!(rt.lookup_implementation(&leaf, rt.register_selector("foo")), Some(patched));
    }
}

// ============================================================================
// Method Replacement
// ============================================================================

mod replacement {
    use super::*;

    #[test]
    fn test_replace_new_selector_then_again() {
        let rt = Runtime::default();
        let widget = rt.register_class(ClassDef::new("Widget", 0));
        let sel = rt.register_selector("shine");
        let first = Imp::stub("first");
        let second = Imp::stub("second");

        assert_eq!(rt.replace_method(&widget, sel, first.clone(), "v16@0:8"), None);
        assert_eq!(rt.lookup_implementation(&widget, sel), Some(first.clone()));
        assert_eq!(rt.copy_method_list(&widget).len(), 1);

        assert_eq!(rt.replace_method(&widget, sel, second.clone(), "v16@0:8"), Some(first));
        assert_eq!(rt.lookup_implementation(&widget, sel), Some(second));
        assert_eq!(rt.copy_method_list(&widget).len(), 1);
    }

    #[test]
    fn test_replace_on_initialized_class_reaches_subclasses() {
        let rt = Runtime::default();
        hierarchy(&rt);
        let foo = rt.register_selector("foo");
        let root = rt.require_class("Root").unwrap();
        let leaf = rt.require_class("Leaf").unwrap();
        assert!(rt.initialize_class(&leaf));

        let replacement = Imp::stub("Root.foo2");
        let previous = rt.replace_method(&root, foo, replacement.clone(), "v16@0:8");

        assert_eq!(previous.as_ref().and_then(Imp::symbol), Some("Root.foo"));
        assert_eq!(rt.lookup_implementation(&leaf, foo), Some(replacement));
    }

    #[test]
    fn test_replaced_method_becomes_newest_batch() {
        let rt = Runtime::default();
        let widget = rt.register_class(ClassDef::new("Widget", 0).with_method("draw", "v16@0:8", Imp::stub("Widget.draw")));
        let sel = rt.register_selector("shine");
        rt.replace_method(&widget, sel, Imp::stub("Widget.shine"), "c16@0:8");

        let list = rt.copy_method_list(&widget);
        assert_eq!(rt.method_name(list[0]), Some(sel));
        assert_eq!(rt.method_return_type(list[0]).unwrap(), "c");
        assert_eq!(rt.type_encoding(&widget, sel).as_deref(), Some("c16@0:8"));
    }
}
