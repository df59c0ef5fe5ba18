//! Construction nodes, the dependencies that satisfy them, and finished
//! plans.
//!
//! A [`Node`] is anything a generated program can hold in a variable or
//! invoke to obtain one. A [`Dependency`] is one way to satisfy a node; it is
//! usable once every node in its [`Dependency::requirements`] has been
//! satisfied. Together they form an AND/OR graph: a node is satisfied by any
//! one of its dependencies, a dependency needs all of its requirements. The
//! graph may contain cycles; the search layer bounds its descent instead of
//! trying to detect them.
//!
//! Both types are plain values with structural identity, so the same class or
//! method reference always maps to the same node.

use std::fmt;

use serde::{Deserialize, Serialize};
use summon_image::{ArrayType, ClassType, MethodStub, PrimitiveType, Type};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Node {
    /// A value of a class type.
    Class(ClassType),
    /// A value of a primitive type.
    Primitive(PrimitiveType),
    /// A value of an array type.
    Array(ArrayType),
    /// The result of invoking a specific constructor.
    Constructor(MethodStub),
    /// The result of invoking a specific static method.
    StaticCall(MethodStub),
    /// The result of invoking a specific instance method.
    InstanceCall(MethodStub),
}

impl Node {
    pub fn class(binary_name: impl Into<String>) -> Self {
        Node::Class(ClassType::new(binary_name))
    }

    /// The method behind a call node, if this is one.
    pub fn method(&self) -> Option<&MethodStub> {
        match self {
            Node::Constructor(m) | Node::StaticCall(m) | Node::InstanceCall(m) => Some(m),
            _ => None,
        }
    }
}

fn write_parameter_list(f: &mut fmt::Formatter<'_>, parameters: &[Type]) -> fmt::Result {
    f.write_str("(")?;
    for (index, parameter) in parameters.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{parameter}")?;
    }
    f.write_str(")")
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Class(ct) => write!(f, "{ct}"),
            Node::Primitive(p) => write!(f, "{p}"),
            Node::Array(arr) => write!(f, "{arr}"),
            Node::Constructor(m) => {
                write!(f, "new {}", m.declaring)?;
                write_parameter_list(f, &m.parameters)
            }
            Node::StaticCall(m) => {
                write!(f, "{}.{}", m.declaring, m.name)?;
                write_parameter_list(f, &m.parameters)
            }
            Node::InstanceCall(m) => {
                write!(f, "{}#{}", m.declaring, m.name)?;
                write_parameter_list(f, &m.parameters)
            }
        }
    }
}

/// One way to satisfy a node.
///
/// Every variant records the node it satisfies (`of`); the cost model is a
/// fixed small integer per variant, favoring direct construction over
/// fallback strategies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dependency {
    /// Invoke the constructor or method behind `of`. `params` holds one node
    /// per declared parameter slot, aligned with the method descriptor.
    Call {
        of: Node,
        receiver: Option<Node>,
        params: Vec<Node>,
    },
    /// Realize a class value as the result of one of its constructors or
    /// producer methods.
    UseMethod { of: Node, method: Node },
    /// Treat a `java.*` class as constructible with its no-arg constructor.
    JdkInit { of: Node },
    /// Declare a superclass variable holding a constructed subclass.
    Upcast { of: Node, subclass: Node },
    /// A primitive literal.
    Primitive { of: Node },
    /// A zero-length array allocation.
    EmptyArray { of: Node },
}

impl Dependency {
    /// The node this dependency satisfies.
    pub fn of(&self) -> &Node {
        match self {
            Dependency::Call { of, .. }
            | Dependency::UseMethod { of, .. }
            | Dependency::JdkInit { of }
            | Dependency::Upcast { of, .. }
            | Dependency::Primitive { of }
            | Dependency::EmptyArray { of } => of,
        }
    }

    pub fn cost(&self) -> u32 {
        match self {
            Dependency::Call { .. } => 1,
            Dependency::UseMethod { .. } => 0,
            Dependency::JdkInit { .. } => 2,
            Dependency::Upcast { .. } => 0,
            Dependency::Primitive { .. } => 0,
            Dependency::EmptyArray { .. } => 3,
        }
    }

    /// The nodes that must be satisfied before this dependency applies.
    ///
    /// `java.*` class parameters are argument slots but not requirements:
    /// they are filled at emission time with an already-bound value or a
    /// literal stand-in, keeping plans from dragging in a platform-class
    /// construction step per `String` parameter.
    pub fn requirements(&self) -> Vec<Node> {
        match self {
            Dependency::Call {
                receiver, params, ..
            } => receiver
                .iter()
                .cloned()
                .chain(params.iter().filter(|p| !is_jdk_class(p)).cloned())
                .collect(),
            Dependency::UseMethod { method, .. } => vec![method.clone()],
            Dependency::Upcast { subclass, .. } => vec![subclass.clone()],
            Dependency::JdkInit { .. }
            | Dependency::Primitive { .. }
            | Dependency::EmptyArray { .. } => Vec::new(),
        }
    }
}

fn is_jdk_class(node: &Node) -> bool {
    matches!(node, Node::Class(ct) if ct.is_jdk())
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dependency::Call { of, .. } => write!(f, "call {of}"),
            Dependency::UseMethod { of, method } => write!(f, "{of} via {method}"),
            Dependency::JdkInit { of } => write!(f, "default-construct {of}"),
            Dependency::Upcast { of, subclass } => write!(f, "{of} upcast from {subclass}"),
            Dependency::Primitive { of } => write!(f, "literal {of}"),
            Dependency::EmptyArray { of } => write!(f, "empty array {of}"),
        }
    }
}

/// A linearized construction plan.
///
/// `creation_order[i]` is satisfied by `dependency_order[i]`, every
/// requirement of `dependency_order[i]` appears strictly earlier in
/// `creation_order`, no node appears twice, and the last node is the target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub target: Node,
    pub creation_order: Vec<Node>,
    pub dependency_order: Vec<Dependency>,
    pub cost: u32,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.creation_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creation_order.is_empty()
    }

    /// The `(node, dependency)` pairs in creation order.
    pub fn steps(&self) -> impl Iterator<Item = (&Node, &Dependency)> {
        self.creation_order.iter().zip(&self.dependency_order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use summon_image::ACC_PUBLIC;

    fn ctor(declaring: &str, parameters: Vec<Type>) -> MethodStub {
        MethodStub {
            declaring: ClassType::new(declaring),
            name: "<init>".to_string(),
            access_flags: ACC_PUBLIC,
            parameters,
            return_type: None,
        }
    }

    #[test]
    fn costs_follow_the_fixed_table() {
        let of = Node::class("com.example.Widget");
        assert_eq!(
            Dependency::Call {
                of: Node::Constructor(ctor("com.example.Widget", vec![])),
                receiver: None,
                params: vec![],
            }
            .cost(),
            1
        );
        assert_eq!(
            Dependency::UseMethod {
                of: of.clone(),
                method: Node::Constructor(ctor("com.example.Widget", vec![])),
            }
            .cost(),
            0
        );
        assert_eq!(Dependency::JdkInit { of: of.clone() }.cost(), 2);
        assert_eq!(
            Dependency::Upcast {
                of: of.clone(),
                subclass: Node::class("com.example.Sub"),
            }
            .cost(),
            0
        );
        assert_eq!(
            Dependency::Primitive {
                of: Node::Primitive(PrimitiveType::Int),
            }
            .cost(),
            0
        );
        assert_eq!(
            Dependency::EmptyArray {
                of: Node::Array(ArrayType::new(Type::Primitive(PrimitiveType::Int), 1)),
            }
            .cost(),
            3
        );
    }

    #[test]
    fn call_requirements_skip_jdk_class_params() {
        let method = ctor(
            "com.example.Widget",
            vec![
                Type::Primitive(PrimitiveType::Int),
                Type::class("java.lang.String"),
                Type::class("com.example.Part"),
            ],
        );
        let call = Dependency::Call {
            of: Node::Constructor(method),
            receiver: None,
            params: vec![
                Node::Primitive(PrimitiveType::Int),
                Node::class("java.lang.String"),
                Node::class("com.example.Part"),
            ],
        };
        assert_eq!(
            call.requirements(),
            vec![
                Node::Primitive(PrimitiveType::Int),
                Node::class("com.example.Part"),
            ]
        );
    }

    #[test]
    fn call_requirements_put_the_receiver_first() {
        let method = MethodStub {
            declaring: ClassType::new("com.example.Factory"),
            name: "build".to_string(),
            access_flags: ACC_PUBLIC,
            parameters: vec![Type::Primitive(PrimitiveType::Int)],
            return_type: Some(Type::class("com.example.Widget")),
        };
        let call = Dependency::Call {
            of: Node::InstanceCall(method),
            receiver: Some(Node::class("com.example.Factory")),
            params: vec![Node::Primitive(PrimitiveType::Int)],
        };
        assert_eq!(
            call.requirements(),
            vec![
                Node::class("com.example.Factory"),
                Node::Primitive(PrimitiveType::Int),
            ]
        );
    }

    #[test]
    fn display_is_readable() {
        let method = MethodStub {
            declaring: ClassType::new("com.example.Outer$Factory"),
            name: "build".to_string(),
            access_flags: ACC_PUBLIC,
            parameters: vec![Type::Primitive(PrimitiveType::Int)],
            return_type: Some(Type::class("com.example.Widget")),
        };
        assert_eq!(
            Node::InstanceCall(method.clone()).to_string(),
            "com.example.Outer$Factory#build(int)"
        );
        assert_eq!(
            Dependency::UseMethod {
                of: Node::class("com.example.Widget"),
                method: Node::InstanceCall(method),
            }
            .to_string(),
            "com.example.Widget via com.example.Outer$Factory#build(int)"
        );
    }
}
