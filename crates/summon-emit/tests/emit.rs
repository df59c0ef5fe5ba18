//! Emitted-source checks: each dependency kind produces the exact statement
//! shape, names stay fresh, and incomplete plans fail instead of emitting
//! invalid Java.

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use summon_emit::{emit, EmitError};
use summon_image::{
    ArrayType, ClassStub, ClassType, Image, MethodStub, PrimitiveType, Type, ACC_PUBLIC,
    ACC_STATIC,
};
use summon_plan::{Node, Plan, Solver, SolverOptions};

fn class(name: &str, methods: Vec<MethodStub>) -> ClassStub {
    ClassStub {
        ty: ClassType::new(name),
        access_flags: ACC_PUBLIC,
        superclass: Some(ClassType::new("java.lang.Object")),
        interfaces: Vec::new(),
        methods,
    }
}

fn ctor(declaring: &str, parameters: Vec<Type>) -> MethodStub {
    MethodStub {
        declaring: ClassType::new(declaring),
        name: "<init>".to_string(),
        access_flags: ACC_PUBLIC,
        parameters,
        return_type: None,
    }
}

fn plan_for(image: &Image, target: Node) -> Plan {
    let mut solver = Solver::new(
        image,
        SolverOptions::default(),
        Box::new(StdRng::seed_from_u64(7)),
    );
    solver.solve(&target).expect("fixture should be solvable")
}

#[test]
fn unit_has_the_fixed_package_and_entry_point() {
    let image = Image::new(vec![]);
    let source = emit(&plan_for(&image, Node::class("java.lang.Object"))).unwrap();

    assert!(source.starts_with("package org.example;\n"));
    assert!(source.contains("public final class Main {"));
    assert!(source.contains("public static void main(String[] args) {"));
    assert!(source.ends_with("}\n"));
}

#[test]
fn jdk_target_emits_a_no_arg_construction() {
    let image = Image::new(vec![]);
    let source = emit(&plan_for(&image, Node::class("java.lang.Object"))).unwrap();
    assert!(
        source.contains("java.lang.Object Object_var = new java.lang.Object();"),
        "{source}"
    );
}

#[test]
fn primitive_target_emits_a_literal_declaration() {
    let image = Image::new(vec![]);
    let source = emit(&plan_for(&image, Node::Primitive(PrimitiveType::Int))).unwrap();
    assert!(source.contains("int int_var = 0;"), "{source}");
}

#[test]
fn array_target_emits_an_empty_allocation() {
    let image = Image::new(vec![]);
    let source = emit(&plan_for(
        &image,
        Node::Array(ArrayType::new(Type::Primitive(PrimitiveType::Int), 1)),
    ))
    .unwrap();
    assert!(source.contains("int[] int_var = new int[0];"), "{source}");
}

#[test]
fn multi_dimension_arrays_allocate_the_first_dimension_only() {
    let image = Image::new(vec![]);
    let source = emit(&plan_for(
        &image,
        Node::Array(ArrayType::new(Type::class("java.lang.String"), 2)),
    ))
    .unwrap();
    assert!(
        source.contains("java.lang.String[][] String_var = new java.lang.String[0][];"),
        "{source}"
    );
}

#[test]
fn string_parameters_fall_back_to_a_literal() {
    let image = Image::new(vec![class(
        "com.example.Widget",
        vec![ctor("com.example.Widget", vec![Type::class("java.lang.String")])],
    )]);
    let source = emit(&plan_for(&image, Node::class("com.example.Widget"))).unwrap();
    assert!(
        source.contains("com.example.Widget Widget_var = new com.example.Widget(\"string\");"),
        "{source}"
    );
}

#[test]
fn upcast_declares_the_superclass_over_the_subclass_value() {
    let circle_ctor = ctor("com.example.Circle", vec![Type::Primitive(PrimitiveType::Int)]);
    let mut circle = class("com.example.Circle", vec![circle_ctor]);
    circle.superclass = Some(ClassType::new("com.example.Shape"));
    let image = Image::new(vec![class("com.example.Shape", vec![]), circle]);

    let source = emit(&plan_for(&image, Node::class("com.example.Shape"))).unwrap();
    assert!(source.contains("int int_var = 0;"), "{source}");
    assert!(
        source.contains("com.example.Circle Circle_var = new com.example.Circle(int_var);"),
        "{source}"
    );
    assert!(
        source.contains("com.example.Shape Shape_var = (com.example.Shape) Circle_var;"),
        "{source}"
    );
}

#[test]
fn static_factories_are_called_on_the_declaring_class() {
    let make = MethodStub {
        declaring: ClassType::new("com.example.Widget"),
        name: "make".to_string(),
        access_flags: ACC_PUBLIC | ACC_STATIC,
        parameters: vec![Type::Primitive(PrimitiveType::Boolean)],
        return_type: Some(Type::class("com.example.Widget")),
    };
    let image = Image::new(vec![class("com.example.Widget", vec![make])]);

    let source = emit(&plan_for(&image, Node::class("com.example.Widget"))).unwrap();
    assert!(source.contains("boolean boolean_var = true;"), "{source}");
    assert!(
        source.contains("com.example.Widget Widget_var = com.example.Widget.make(boolean_var);"),
        "{source}"
    );
}

#[test]
fn instance_factories_are_called_on_a_constructed_receiver() {
    let build = MethodStub {
        declaring: ClassType::new("com.example.Factory"),
        name: "build".to_string(),
        access_flags: ACC_PUBLIC,
        parameters: Vec::new(),
        return_type: Some(Type::class("com.example.Gadget")),
    };
    let image = Image::new(vec![
        class("com.example.Factory", vec![ctor("com.example.Factory", vec![]), build]),
        class("com.example.Gadget", vec![]),
    ]);

    let source = emit(&plan_for(&image, Node::class("com.example.Gadget"))).unwrap();
    assert!(
        source.contains("com.example.Factory Factory_var = new com.example.Factory();"),
        "{source}"
    );
    assert!(
        source.contains("com.example.Gadget Gadget_var = Factory_var.build();"),
        "{source}"
    );
}

#[test]
fn nested_class_names_use_dots_in_source_and_underscores_in_variables() {
    let image = Image::new(vec![class(
        "com.example.Outer$Inner",
        vec![ctor("com.example.Outer$Inner", vec![])],
    )]);
    let source = emit(&plan_for(&image, Node::class("com.example.Outer$Inner"))).unwrap();
    assert!(
        source.contains(
            "com.example.Outer.Inner Outer_Inner_var = new com.example.Outer.Inner();"
        ),
        "{source}"
    );
    // Comments are readable too: no `$` survives anywhere.
    assert!(!source.contains('$'), "{source}");
}

#[test]
fn colliding_simple_names_get_numeric_suffixes() {
    let part = ctor("b.Thing", vec![]);
    let whole = ctor("a.Thing", vec![Type::class("b.Thing")]);
    let image = Image::new(vec![class("a.Thing", vec![whole]), class("b.Thing", vec![part])]);

    let source = emit(&plan_for(&image, Node::class("a.Thing"))).unwrap();
    assert!(source.contains("b.Thing Thing_var = new b.Thing();"), "{source}");
    assert!(
        source.contains("a.Thing Thing_var1 = new a.Thing(Thing_var);"),
        "{source}"
    );
}

#[test]
fn every_step_is_preceded_by_a_comment() {
    let image = Image::new(vec![class(
        "com.example.Widget",
        vec![ctor("com.example.Widget", vec![])],
    )]);
    let source = emit(&plan_for(&image, Node::class("com.example.Widget"))).unwrap();
    assert!(
        source.contains("// call new com.example.Widget()"),
        "{source}"
    );
    assert!(
        source.contains("// com.example.Widget via new com.example.Widget()"),
        "{source}"
    );
}

#[test]
fn unrepresentable_parameter_fails_the_emission() {
    // java.util.List is neither constructed by the plan nor coverable by a
    // literal stand-in.
    let image = Image::new(vec![class(
        "com.example.Widget",
        vec![ctor("com.example.Widget", vec![Type::class("java.util.List")])],
    )]);
    let plan = plan_for(&image, Node::class("com.example.Widget"));
    match emit(&plan) {
        Err(EmitError::MissingValue(ty)) => assert_eq!(ty, "java.util.List"),
        other => panic!("expected MissingValue, got {other:?}"),
    }
}

#[test]
fn same_plan_emits_identical_source() {
    let image = Image::new(vec![class(
        "com.example.Widget",
        vec![ctor("com.example.Widget", vec![Type::Primitive(PrimitiveType::Long)])],
    )]);
    let plan = plan_for(&image, Node::class("com.example.Widget"));
    assert_eq!(emit(&plan).unwrap(), emit(&plan).unwrap());
}
