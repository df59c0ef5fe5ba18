//! Dependency mining: the deterministic `Node -> [Dependency]` oracle.
//!
//! Construction starts from two indexes computed in one pass over the image:
//! direct subtypes, and "producer" methods keyed by the class they return.
//! Everything else is derived lazily per node. Unresolvable references are
//! skipped silently — a candidate that cannot be represented simply never
//! appears in the OR-list.

use std::collections::HashMap;

use summon_image::{ClassType, MethodStub, Type, View, CLASS_INITIALIZER_NAME};

use crate::node::{Dependency, Node};

pub struct Miner<'a, V: View> {
    view: &'a V,
    /// Direct subtypes, keyed by the binary name of the supertype.
    subclasses: HashMap<String, Vec<ClassType>>,
    /// Public methods returning a loaded class, keyed by that class's name.
    producers: HashMap<String, Vec<MethodStub>>,
}

impl<'a, V: View> Miner<'a, V> {
    /// Index the view. Only public classes contribute; the per-key orders
    /// follow the view's enumeration order.
    pub fn new(view: &'a V) -> Self {
        let mut subclasses: HashMap<String, Vec<ClassType>> = HashMap::new();
        let mut producers: HashMap<String, Vec<MethodStub>> = HashMap::new();

        for class in view.classes() {
            if !class.is_public() {
                continue;
            }

            for supertype in class.superclass.iter().chain(&class.interfaces) {
                subclasses
                    .entry(supertype.binary_name().to_string())
                    .or_default()
                    .push(class.ty.clone());
            }

            for method in &class.methods {
                if !method.is_public()
                    || method.is_constructor()
                    || method.name == CLASS_INITIALIZER_NAME
                {
                    continue;
                }
                let Some(Type::Class(returned)) = &method.return_type else {
                    continue;
                };
                if view.class(returned).is_none() {
                    continue;
                }
                producers
                    .entry(returned.binary_name().to_string())
                    .or_default()
                    .push(method.clone());
            }
        }

        tracing::debug!(
            supertypes = subclasses.len(),
            produced_classes = producers.len(),
            "indexed image"
        );
        Self {
            view,
            subclasses,
            producers,
        }
    }

    /// All ways to satisfy `node`, in a fixed order. An empty result means
    /// the node cannot be constructed from this image.
    pub fn dependencies(&self, node: &Node) -> Vec<Dependency> {
        match node {
            Node::Class(ct) => self.class_dependencies(node, ct),
            Node::Constructor(m) | Node::StaticCall(m) => self.call_dependency(node, m, None),
            Node::InstanceCall(m) => {
                if self.view.class(&m.declaring).is_none() {
                    return Vec::new();
                }
                self.call_dependency(node, m, Some(Node::Class(m.declaring.clone())))
            }
            Node::Primitive(_) => vec![Dependency::Primitive { of: node.clone() }],
            Node::Array(_) => vec![Dependency::EmptyArray { of: node.clone() }],
        }
    }

    fn class_dependencies(&self, node: &Node, ct: &ClassType) -> Vec<Dependency> {
        // The platform is a black box: a java.* class is assumed to have a
        // usable no-arg constructor and nothing else is mined for it.
        if ct.is_jdk() {
            return vec![Dependency::JdkInit { of: node.clone() }];
        }

        let Some(class) = self.view.class(ct) else {
            return Vec::new();
        };

        let mut dependencies = Vec::new();

        for method in &class.methods {
            if method.is_public() && method.is_constructor() {
                dependencies.push(Dependency::UseMethod {
                    of: node.clone(),
                    method: Node::Constructor(method.clone()),
                });
            }
        }

        for subclass in self
            .subclasses
            .get(ct.binary_name())
            .map(Vec::as_slice)
            .unwrap_or_default()
        {
            dependencies.push(Dependency::Upcast {
                of: node.clone(),
                subclass: Node::Class(subclass.clone()),
            });
        }

        for method in self
            .producers
            .get(ct.binary_name())
            .map(Vec::as_slice)
            .unwrap_or_default()
        {
            let call = if method.is_static() {
                Node::StaticCall(method.clone())
            } else {
                Node::InstanceCall(method.clone())
            };
            dependencies.push(Dependency::UseMethod {
                of: node.clone(),
                method: call,
            });
        }

        dependencies
    }

    /// The single `Call` candidate for a method node, or nothing when a
    /// parameter cannot be represented from this image.
    fn call_dependency(
        &self,
        node: &Node,
        method: &MethodStub,
        receiver: Option<Node>,
    ) -> Vec<Dependency> {
        let mut params = Vec::with_capacity(method.parameters.len());
        for parameter in &method.parameters {
            match parameter {
                Type::Primitive(p) => params.push(Node::Primitive(*p)),
                Type::Array(arr) => params.push(Node::Array(arr.clone())),
                Type::Class(ct) => {
                    // Platform classes stay argument slots (filled at
                    // emission); anything else must be loaded or the whole
                    // candidate is unusable.
                    if !ct.is_jdk() && self.view.class(ct).is_none() {
                        return Vec::new();
                    }
                    params.push(Node::Class(ct.clone()));
                }
            }
        }

        vec![Dependency::Call {
            of: node.clone(),
            receiver,
            params,
        }]
    }
}
