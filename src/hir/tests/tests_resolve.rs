#![allow(clippy::unwrap_used)]

use smol_str::SmolStr;

use crate::hir::{
    BuiltinTag, ClassRegistry, CompileError, Function, InheritanceResolver, Tag, Variable,
};

fn class(registry: &mut ClassRegistry, name: &str, parent: Option<&str>) {
    let parents = parent.map(SmolStr::new).into_iter().collect();
    registry.register_class(name, parents, None).unwrap();
}

fn field_names(resolver: &InheritanceResolver<'_>, class: &str) -> Vec<String> {
    resolver
        .effective_fields(class)
        .unwrap()
        .iter()
        .map(|v| format!("{}:{}", v.name, v.ty))
        .collect()
}

fn method_owners(resolver: &InheritanceResolver<'_>, class: &str) -> Vec<String> {
    resolver
        .effective_methods(class)
        .unwrap()
        .iter()
        .map(|(name, f)| format!("{}.{}", f.owner, name))
        .collect()
}

/// Animal { health, speak() }, Dog : Animal { speak() }
fn animals() -> ClassRegistry {
    let mut registry = ClassRegistry::new();
    class(&mut registry, "Animal", None);
    class(&mut registry, "Dog", Some("Animal"));
    registry.add_variable("Animal", Variable::new("health", "int")).unwrap();
    registry.add_function("Animal", Function::new("speak")).unwrap();
    registry.add_function("Dog", Function::new("speak")).unwrap();
    registry
}

// =============================================================================
// PARENT RESOLUTION
// =============================================================================

#[test]
fn test_forward_declared_parent_resolves() {
    let mut registry = ClassRegistry::new();
    class(&mut registry, "Dog", Some("Animal"));
    class(&mut registry, "Animal", None);

    let resolver = InheritanceResolver::resolve(&registry).unwrap();
    let dog = resolver.id_of("Dog").unwrap();
    assert_eq!(resolver.parent_of(dog), Some(resolver.id_of("Animal").unwrap()));
}

#[test]
fn test_unresolved_parent() {
    let mut registry = ClassRegistry::new();
    class(&mut registry, "Dog", Some("Animal"));

    let result = InheritanceResolver::resolve(&registry);
    assert!(matches!(
        result,
        Err(CompileError::UnresolvedParent { ref class, ref parent, .. })
            if class == "Dog" && parent == "Animal"
    ));
}

#[test]
fn test_chain_resolves_without_cycle() {
    let mut registry = ClassRegistry::new();
    class(&mut registry, "A", None);
    class(&mut registry, "B", Some("A"));
    class(&mut registry, "C", Some("B"));

    let resolver = InheritanceResolver::resolve(&registry).unwrap();
    let lineage: Vec<_> = resolver
        .lineage(resolver.id_of("C").unwrap())
        .into_iter()
        .map(|id| resolver.class(id).name.clone())
        .collect();
    assert_eq!(lineage, vec!["A", "B", "C"]);
}

#[test]
fn test_cycle_detected() {
    let mut registry = ClassRegistry::new();
    class(&mut registry, "A", Some("C"));
    class(&mut registry, "B", Some("A"));
    class(&mut registry, "C", Some("B"));

    let Err(CompileError::CyclicInheritance { cycle, .. }) = InheritanceResolver::resolve(&registry)
    else {
        panic!("expected a cycle");
    };
    assert_eq!(cycle, vec!["A", "C", "B", "A"]);
}

#[test]
fn test_self_parent_is_a_cycle() {
    let mut registry = ClassRegistry::new();
    class(&mut registry, "Ouroboros", Some("Ouroboros"));

    let Err(CompileError::CyclicInheritance { cycle, .. }) = InheritanceResolver::resolve(&registry)
    else {
        panic!("expected a cycle");
    };
    assert_eq!(cycle, vec!["Ouroboros", "Ouroboros"]);
}

#[test]
fn test_cycle_reached_from_outside_reports_only_the_loop() {
    let mut registry = ClassRegistry::new();
    class(&mut registry, "Leaf", Some("X"));
    class(&mut registry, "X", Some("Y"));
    class(&mut registry, "Y", Some("X"));

    let Err(CompileError::CyclicInheritance { cycle, .. }) = InheritanceResolver::resolve(&registry)
    else {
        panic!("expected a cycle");
    };
    assert_eq!(cycle, vec!["X", "Y", "X"]);
}

#[test]
fn test_shared_ancestor_is_not_a_cycle() {
    let mut registry = ClassRegistry::new();
    class(&mut registry, "Base", None);
    class(&mut registry, "Left", Some("Base"));
    class(&mut registry, "Right", Some("Base"));
    class(&mut registry, "Leaf", Some("Left"));

    assert!(InheritanceResolver::resolve(&registry).is_ok());
}

// =============================================================================
// LAYOUT CONTAINMENT
// =============================================================================

fn layout_cycle(registry: &ClassRegistry) -> Vec<SmolStr> {
    match InheritanceResolver::resolve(registry) {
        Err(CompileError::RecursiveLayout { cycle, .. }) => cycle,
        other => panic!("expected a recursive layout, got {other:?}"),
    }
}

#[test]
fn test_class_containing_itself() {
    let mut registry = ClassRegistry::new();
    class(&mut registry, "Node", None);
    registry.add_variable("Node", Variable::new("next", "Node")).unwrap();
    registry.add_variable("Node", Variable::new("v", "int")).unwrap();

    assert_eq!(layout_cycle(&registry), vec!["Node", "Node"]);
}

#[test]
fn test_mutually_containing_classes() {
    let mut registry = ClassRegistry::new();
    class(&mut registry, "A", None);
    class(&mut registry, "B", None);
    registry.add_variable("A", Variable::new("b", "B")).unwrap();
    registry.add_variable("B", Variable::new("a", "A")).unwrap();

    assert_eq!(layout_cycle(&registry), vec!["A", "B", "A"]);
}

#[test]
fn test_inherited_field_of_subclass_type_is_recursive() {
    let mut registry = ClassRegistry::new();
    class(&mut registry, "Shape", None);
    class(&mut registry, "Square", Some("Shape"));
    registry.add_variable("Shape", Variable::new("twin", "Square")).unwrap();

    assert_eq!(layout_cycle(&registry), vec!["Square", "Square"]);
}

#[test]
fn test_nested_layouts_without_cycle() {
    let mut registry = ClassRegistry::new();
    class(&mut registry, "Vec", None);
    class(&mut registry, "Shape", None);
    class(&mut registry, "Square", Some("Shape"));
    registry.add_variable("Vec", Variable::new("x", "float")).unwrap();
    registry.add_variable("Shape", Variable::new("pos", "Vec")).unwrap();
    registry.add_variable("Square", Variable::new("base", "Shape")).unwrap();
    registry.add_variable("Square", Variable::new("corner", "Vec")).unwrap();

    assert!(InheritanceResolver::resolve(&registry).is_ok());
}

// =============================================================================
// FLATTENING
// =============================================================================

#[test]
fn test_root_class_effective_members_are_its_own() {
    let mut registry = ClassRegistry::new();
    class(&mut registry, "Car", None);
    registry.add_variable("Car", Variable::new("wheels", "int")).unwrap();
    registry.add_variable("Car", Variable::new("speed", "float")).unwrap();
    registry.add_function("Car", Function::new("drive")).unwrap();

    let resolver = InheritanceResolver::resolve(&registry).unwrap();
    let own = registry.lookup("Car").unwrap();

    let fields: Vec<_> = resolver.effective_fields("Car").unwrap().into_iter().cloned().collect();
    let own_fields: Vec<_> = own.variables.values().cloned().collect();
    assert_eq!(fields, own_fields);

    let methods: Vec<_> = resolver
        .effective_methods("Car")
        .unwrap()
        .values()
        .map(|f| (*f).clone())
        .collect();
    let own_methods: Vec<_> = own.functions.values().cloned().collect();
    assert_eq!(methods, own_methods);
}

#[test]
fn test_inherited_fields_come_first() {
    let mut registry = ClassRegistry::new();
    class(&mut registry, "A", None);
    class(&mut registry, "B", Some("A"));
    registry.add_variable("A", Variable::new("x", "int")).unwrap();
    registry.add_variable("A", Variable::new("y", "int")).unwrap();
    registry.add_variable("B", Variable::new("z", "int")).unwrap();

    let resolver = InheritanceResolver::resolve(&registry).unwrap();
    assert_eq!(field_names(&resolver, "B"), vec!["x:int", "y:int", "z:int"]);
    assert_eq!(field_names(&resolver, "A"), vec!["x:int", "y:int"]);
}

#[test]
fn test_shadowed_field_keeps_ancestor_position() {
    let mut registry = ClassRegistry::new();
    class(&mut registry, "A", None);
    class(&mut registry, "B", Some("A"));
    class(&mut registry, "C", Some("B"));
    registry.add_variable("A", Variable::new("x", "int")).unwrap();
    registry.add_variable("A", Variable::new("y", "int")).unwrap();
    registry.add_variable("B", Variable::new("w", "int")).unwrap();
    registry.add_variable("B", Variable::new("x", "float")).unwrap();
    registry.add_variable("C", Variable::new("y", "bool")).unwrap();

    let resolver = InheritanceResolver::resolve(&registry).unwrap();
    assert_eq!(field_names(&resolver, "B"), vec!["x:float", "y:int", "w:int"]);
    assert_eq!(field_names(&resolver, "C"), vec!["x:float", "y:bool", "w:int"]);
}

#[test]
fn test_override_replaces_inherited_method() {
    let registry = animals();
    let resolver = InheritanceResolver::resolve(&registry).unwrap();

    assert_eq!(method_owners(&resolver, "Animal"), vec!["Animal.speak"]);
    assert_eq!(method_owners(&resolver, "Dog"), vec!["Dog.speak"]);
    assert_eq!(field_names(&resolver, "Dog"), vec!["health:int"]);
}

#[test]
fn test_inherited_and_own_methods_in_root_to_leaf_order() {
    let mut registry = ClassRegistry::new();
    class(&mut registry, "Base", None);
    class(&mut registry, "Mid", Some("Base"));
    class(&mut registry, "Leaf", Some("Mid"));
    registry.add_function("Base", Function::new("a")).unwrap();
    registry.add_function("Base", Function::new("b")).unwrap();
    registry.add_function("Mid", Function::new("c")).unwrap();
    registry.add_function("Leaf", Function::new("a")).unwrap();
    registry.add_function("Leaf", Function::new("d")).unwrap();

    let resolver = InheritanceResolver::resolve(&registry).unwrap();
    assert_eq!(
        method_owners(&resolver, "Leaf"),
        vec!["Leaf.a", "Base.b", "Mid.c", "Leaf.d"]
    );
}

#[test]
fn test_member_lookup_finds_most_derived() {
    let registry = animals();
    let resolver = InheritanceResolver::resolve(&registry).unwrap();
    let dog = resolver.id_of("Dog").unwrap();

    assert_eq!(resolver.method(dog, "speak").unwrap().owner, "Dog");
    assert_eq!(resolver.field(dog, "health").unwrap().ty, "int");
    assert!(resolver.field(dog, "wings").is_none());
    assert!(resolver.method(dog, "fly").is_none());
}

#[test]
fn test_effective_members_of_unknown_class() {
    let registry = animals();
    let resolver = InheritanceResolver::resolve(&registry).unwrap();
    assert!(matches!(
        resolver.effective_fields("Cat"),
        Err(CompileError::UnknownClass(_))
    ));
    assert!(matches!(
        resolver.effective_methods("Cat"),
        Err(CompileError::UnknownClass(_))
    ));
}

#[test]
fn test_resolve_tag() {
    let registry = animals();
    let resolver = InheritanceResolver::resolve(&registry).unwrap();

    assert_eq!(resolver.resolve_tag("float"), Some(Tag::Builtin(BuiltinTag::Float)));
    assert_eq!(resolver.resolve_tag("char"), Some(Tag::Builtin(BuiltinTag::Int)));
    assert_eq!(
        resolver.resolve_tag("Dog"),
        Some(Tag::Class(resolver.id_of("Dog").unwrap()))
    );
    assert_eq!(resolver.resolve_tag("Cat"), None);
}
