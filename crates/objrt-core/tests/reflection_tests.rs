//! Integration tests for the reflection surface

use objrt_core::{
    ivar_offset, CategoryDef, ClassDef, EncodingError, Imp, IvarDef, Runtime, RuntimeError, SelectorTable,
    SymbolTable, TypeEncoding,
};
use std::sync::Arc;

fn shapes(rt: &Runtime) {
    rt.register_symbol_table(
        SymbolTable::new()
            .with_class(
                ClassDef::new("Shape", 8)
                    .with_ivar(IvarDef::new("isa", "#", 0))
                    .with_method("area", "d16@0:8", Imp::stub("Shape.area"))
                    .with_method("describe", "@16@0:8", Imp::stub("Shape.describe"))
                    .with_class_method("named:", "@24@0:8@16", Imp::stub("Shape+named")),
            )
            .with_class(
                ClassDef::new("Circle", 8)
                    .with_superclass("Shape")
                    .with_ivar(IvarDef::new("radius", "d", 0))
                    .with_method("area", "d16@0:8", Imp::stub("Circle.area"))
                    .with_method("scaleBy:", "v24@0:8d16", Imp::stub("Circle.scaleBy")),
            )
            .with_category(CategoryDef::new("Drawing", "Circle").with_method(
                "drawIn:at:",
                "v40@0:8@16{CGPoint=dd}24",
                Imp::stub("Circle(Drawing).drawIn"),
            )),
    );
}

// ============================================================================
// Class Queries
// ============================================================================

mod class_queries {
    use super::*;

    #[test]
    fn test_class_list_and_aliases() {
        let rt = Runtime::default();
        shapes(&rt);
        let circle = rt.require_class("Circle").unwrap();
        rt.register_alias(&circle, "Round").unwrap();

        assert_eq!(rt.lookup_class("Round"), Some(circle.clone()));
        let list = rt.class_list(usize::MAX);
        assert_eq!(list.total, 3);
        assert_eq!(list.classes.len(), 3);
        assert_eq!(rt.class_list(1).classes.len(), 1);
        assert_eq!(rt.class_list(1).total, 3);
    }

    #[test]
    fn test_alias_before_any_class() {
        let rt = Runtime::default();
        let other = Runtime::default();
        let foreign = other.register_class(ClassDef::new("Foreign", 0));

        assert!(matches!(
            rt.register_alias(&foreign, "Alias"),
            Err(RuntimeError::TableNotInitialized)
        ));
    }

    #[test]
    fn test_require_missing_class() {
        let rt = Runtime::default();
        shapes(&rt);
        let err = rt.require_class("Square").unwrap_err();
        assert_eq!(err.to_string(), "Class Square not found");
    }

    #[test]
    fn test_hierarchy_queries() {
        let rt = Runtime::default();
        shapes(&rt);
        let shape = rt.require_class("Shape").unwrap();
        let circle = rt.require_class("Circle").unwrap();

        assert_eq!(rt.superclass(&circle), Some(shape.clone()));
        assert!(rt.is_subclass_of(&circle, &shape));
        assert!(rt.is_subclass_of(&circle, &circle));
        assert!(!rt.is_subclass_of(&shape, &circle));
        assert!(rt.metaclass_of(&circle).unwrap().is_metaclass());
    }

    #[test]
    fn test_ivar_layout() {
        let rt = Runtime::default();
        shapes(&rt);
        let circle = rt.require_class("Circle").unwrap();

        let radius = rt.ivar(&circle, "radius").unwrap();
        assert_eq!(ivar_offset(&radius), 8);
        assert_eq!(radius.type_encoding(), "d");
        // Inherited ivars belong to the superclass
        assert!(rt.ivar(&circle, "isa").is_none());
        assert_eq!(rt.ivar_list(&circle).len(), 1);
    }
}

// ============================================================================
// Method Queries
// ============================================================================

mod method_queries {
    use super::*;

    #[test]
    fn test_method_lookup_and_origin() {
        let rt = Runtime::default();
        shapes(&rt);
        let circle = rt.require_class("Circle").unwrap();
        let area = rt.register_selector("area");
        let describe = rt.register_selector("describe");

        assert!(rt.method_is_from_class(&circle, area, "Circle"));
        assert!(rt.method_is_from_class(&circle, describe, "Shape"));

        let method = rt.method(&circle, describe).unwrap();
        assert_eq!(rt.method_name(method), Some(describe));
        assert_eq!(
            rt.method_implementation(method).as_ref().and_then(Imp::symbol),
            Some("Shape.describe")
        );
    }

    #[test]
    fn test_category_methods_are_not_own_methods() {
        let rt = Runtime::default();
        shapes(&rt);
        let circle = rt.require_class("Circle").unwrap();
        let draw = rt.register_selector("drawIn:at:");

        assert!(rt.responds_to(&circle, draw));
        assert!(rt.method(&circle, draw).is_none());
        assert_eq!(rt.copy_method_list(&circle).len(), 2);
        assert_eq!(
            rt.type_encoding(&circle, draw).as_deref(),
            Some("v40@0:8@16{CGPoint=dd}24")
        );
    }

    #[test]
    fn test_type_encoding_by_side() {
        let rt = Runtime::default();
        shapes(&rt);
        let shape = rt.require_class("Shape").unwrap();
        let named = rt.register_selector("named:");

        assert_eq!(rt.type_encoding(&shape, named), None);
        let meta = rt.metaclass_of(&shape).unwrap();
        assert_eq!(rt.type_encoding(&meta, named).as_deref(), Some("@24@0:8@16"));
    }

    #[test]
    fn test_method_list_is_caller_owned() {
        let rt = Runtime::default();
        shapes(&rt);
        let circle = rt.require_class("Circle").unwrap();

        let list = rt.copy_method_list(&circle);
        rt.teardown();
        let methods = list.into_vec();
        assert_eq!(methods.len(), 2);
        assert_eq!(rt.method_name(methods[0]), None);
    }

    #[test]
    fn test_argument_count_and_return_type() {
        let rt = Runtime::default();
        shapes(&rt);
        let circle = rt.require_class("Circle").unwrap();
        let scale = rt.method(&circle, rt.register_selector("scaleBy:")).unwrap();
        let area = rt.method(&circle, rt.register_selector("area")).unwrap();

        assert_eq!(rt.method_argument_count(scale).unwrap(), 3);
        assert_eq!(rt.method_return_type(scale).unwrap(), "v");
        assert_eq!(rt.method_argument_count(area).unwrap(), 2);
        assert_eq!(rt.method_return_type(area).unwrap(), "d");
    }
}

// ============================================================================
// Type Encodings
// ============================================================================

mod type_encodings {
    use super::*;

    #[test]
    fn test_aggregate_arguments() {
        let encoding = TypeEncoding::new("v40@0:8{CGPoint=dd}16[4i]32");
        let types: Vec<_> = encoding.iter().map(|arg| arg.unwrap().ty).collect();
        assert_eq!(types, vec!["v", "@", ":", "{CGPoint=dd}", "[4i]"]);
        assert_eq!(encoding.argument_count().unwrap(), 4);
    }

    #[test]
    fn test_malformed_encoding() {
        assert!(matches!(
            TypeEncoding::new("v16@0:").argument_count(),
            Err(EncodingError::MissingOffset { .. })
        ));
        assert!(matches!(
            TypeEncoding::new("{Point=dd").return_type(),
            Err(EncodingError::UnbalancedAggregate { .. })
        ));
    }

    #[test]
    fn test_malformed_method_encoding_surfaces_as_runtime_error() {
        let rt = Runtime::default();
        let widget = rt.register_class(ClassDef::new("Widget", 0).with_method("oops", "", Imp::stub("Widget.oops")));
        let method = rt.copy_method_list(&widget)[0];

        assert!(matches!(
            rt.method_return_type(method),
            Err(RuntimeError::Encoding(EncodingError::EmptyType { .. }))
        ));
    }
}

// ============================================================================
// Selector Registry
// ============================================================================

mod selectors {
    use super::*;

    #[test]
    fn test_shared_selector_registry() {
        let registry = Arc::new(SelectorTable::new());
        let a = Runtime::with_selectors(Default::default(), registry.clone());
        let b = Runtime::with_selectors(Default::default(), registry);

        let foo = a.register_selector("foo");
        assert_eq!(b.register_selector("foo"), foo);
        assert_eq!(b.selector_name(foo).as_deref(), Some("foo"));
    }
}
