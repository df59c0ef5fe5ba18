//! Turns a construction plan into a compilable Java compilation unit.
//!
//! Emission walks the plan in creation order, declaring one local variable
//! per constructed value inside `org.example.Main#main`. A name table maps
//! plan nodes to the variables holding them; argument slots whose node was
//! never constructed fall back to literal stand-ins where one exists.
//! Emission is fully deterministic: the same plan always produces the same
//! source text.

use std::collections::{HashMap, HashSet};

use summon_image::{ArrayType, ClassType, MethodStub, PrimitiveType, Type};
use summon_plan::{Dependency, Node, Plan};
use thiserror::Error;

/// Package of the generated compilation unit.
pub const GENERATED_PACKAGE: &str = "org.example";
/// Class name of the generated compilation unit.
pub const GENERATED_CLASS: &str = "Main";

/// Emission failures are fatal to the whole emission: invalid Java is never
/// produced.
#[derive(Debug, Error)]
pub enum EmitError {
    /// An argument slot had neither a bound variable nor a literal stand-in.
    #[error("no value available for a parameter of type {0}")]
    MissingValue(String),
    /// A step referred to a node no earlier step bound to a variable.
    #[error("no variable bound for {0}")]
    MissingBinding(String),
    /// The plan paired a dependency with a node shape it cannot satisfy.
    #[error("malformed plan step: {0}")]
    MalformedStep(String),
    /// A producer method without a class return type slipped into a plan.
    #[error("method {0} does not return a class type")]
    NonClassReturn(String),
}

/// Render `plan` as a complete Java source file.
pub fn emit(plan: &Plan) -> Result<String, EmitError> {
    let mut emitter = Emitter::default();
    let mut body: Vec<(String, Option<String>)> = Vec::with_capacity(plan.len());
    for (_, dependency) in plan.steps() {
        let comment = dependency.to_string().replace('$', ".");
        let statement = emitter.statement(dependency)?;
        body.push((comment, statement));
    }

    let mut out = String::new();
    out.push_str("package ");
    out.push_str(GENERATED_PACKAGE);
    out.push_str(";\n\n");
    out.push_str("public final class ");
    out.push_str(GENERATED_CLASS);
    out.push_str(" {\n");
    out.push_str("  public static void main(String[] args) {\n");
    for (comment, statement) in body {
        out.push_str("    // ");
        out.push_str(&comment);
        out.push('\n');
        if let Some(statement) = statement {
            out.push_str("    ");
            out.push_str(&statement);
            out.push('\n');
        }
    }
    out.push_str("  }\n}\n");
    Ok(out)
}

#[derive(Default)]
struct Emitter {
    names: HashMap<Node, String>,
    used: HashSet<String>,
}

impl Emitter {
    /// The statement realizing one dependency, or `None` for pure rebindings.
    fn statement(&mut self, dependency: &Dependency) -> Result<Option<String>, EmitError> {
        match dependency {
            Dependency::Call {
                of,
                receiver,
                params,
            } => self.call_statement(of, receiver.as_ref(), params).map(Some),
            Dependency::UseMethod { of, method } => {
                let variable = self.require_bound(method)?.to_string();
                self.bind(of, variable);
                Ok(None)
            }
            Dependency::JdkInit { of } => {
                let Node::Class(ct) = of else {
                    return Err(malformed(dependency));
                };
                let ty = ct.source_name();
                let variable = self.fresh_name(ct.simple_name());
                let statement = format!("{ty} {variable} = new {ty}();");
                self.bind(of, variable);
                Ok(Some(statement))
            }
            Dependency::Upcast { of, subclass } => {
                let Node::Class(superclass) = of else {
                    return Err(malformed(dependency));
                };
                let ty = superclass.source_name();
                let source = self.require_bound(subclass)?.to_string();
                let variable = self.fresh_name(superclass.simple_name());
                let statement = format!("{ty} {variable} = ({ty}) {source};");
                self.bind(of, variable);
                Ok(Some(statement))
            }
            Dependency::Primitive { of } => {
                let Node::Primitive(p) = of else {
                    return Err(malformed(dependency));
                };
                let name = p.java_name();
                let variable = self.fresh_name(name);
                let statement = format!("{name} {variable} = {};", primitive_literal(*p));
                self.bind(of, variable);
                Ok(Some(statement))
            }
            Dependency::EmptyArray { of } => {
                let Node::Array(arr) = of else {
                    return Err(malformed(dependency));
                };
                let statement = self.array_statement(of, arr);
                Ok(Some(statement))
            }
        }
    }

    fn call_statement(
        &mut self,
        of: &Node,
        receiver: Option<&Node>,
        params: &[Node],
    ) -> Result<String, EmitError> {
        let Some(method) = of.method() else {
            return Err(EmitError::MalformedStep(of.to_string()));
        };
        let args = self.arguments(method, params)?.join(", ");

        let statement = match of {
            Node::Constructor(m) => {
                let ty = m.declaring.source_name();
                let variable = self.fresh_name(m.declaring.simple_name());
                let statement = format!("{ty} {variable} = new {ty}({args});");
                self.bind(of, variable);
                statement
            }
            Node::StaticCall(m) => {
                let returned = class_return(m)?;
                let ty = returned.source_name();
                let variable = self.fresh_name(returned.simple_name());
                let statement = format!(
                    "{ty} {variable} = {}.{}({args});",
                    m.declaring.source_name(),
                    m.name
                );
                self.bind(of, variable);
                statement
            }
            Node::InstanceCall(m) => {
                let target = receiver.ok_or_else(|| {
                    EmitError::MalformedStep(format!("instance call {of} without a receiver"))
                })?;
                let target = self.require_bound(target)?.to_string();
                let returned = class_return(m)?;
                let ty = returned.source_name();
                let variable = self.fresh_name(returned.simple_name());
                let statement = format!("{ty} {variable} = {target}.{}({args});", m.name);
                self.bind(of, variable);
                statement
            }
            _ => return Err(EmitError::MalformedStep(of.to_string())),
        };
        Ok(statement)
    }

    fn array_statement(&mut self, of: &Node, arr: &ArrayType) -> String {
        let element = arr.element.source_name();
        let dims = arr.dimensions as usize;
        let declared = format!("{element}{}", "[]".repeat(dims));
        // Only the first dimension is allocated; the rest stay unsized.
        let allocated = format!("new {element}[0]{}", "[]".repeat(dims - 1));
        let variable = self.fresh_name(element_simple_name(&arr.element));
        let statement = format!("{declared} {variable} = {allocated};");
        self.bind(of, variable);
        statement
    }

    /// One rendered argument per declared parameter slot: the bound variable
    /// for the slot's node when any step produced one, otherwise a literal
    /// stand-in, otherwise the emission fails.
    fn arguments(&self, method: &MethodStub, params: &[Node]) -> Result<Vec<String>, EmitError> {
        method
            .parameters
            .iter()
            .zip(params)
            .map(|(ty, node)| {
                if let Some(variable) = self.names.get(node) {
                    return Ok(variable.clone());
                }
                any_value(ty).ok_or_else(|| EmitError::MissingValue(ty.to_string()))
            })
            .collect()
    }

    /// A previously unused identifier derived from `hint`: `$` becomes `_`,
    /// `_var` is appended, and colliding names get an increasing suffix.
    fn fresh_name(&mut self, hint: &str) -> String {
        let mut base = hint.replace('$', "_");
        if base.is_empty() {
            base.push('v');
        }
        base.push_str("_var");
        if self.used.insert(base.clone()) {
            return base;
        }
        let mut suffix = 1u32;
        loop {
            let candidate = format!("{base}{suffix}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            suffix += 1;
        }
    }

    fn bind(&mut self, node: &Node, variable: String) {
        self.names.insert(node.clone(), variable);
    }

    fn require_bound(&self, node: &Node) -> Result<&str, EmitError> {
        self.names
            .get(node)
            .map(String::as_str)
            .ok_or_else(|| EmitError::MissingBinding(node.to_string()))
    }
}

fn malformed(dependency: &Dependency) -> EmitError {
    EmitError::MalformedStep(dependency.to_string())
}

fn class_return(method: &MethodStub) -> Result<&ClassType, EmitError> {
    match &method.return_type {
        Some(Type::Class(ct)) => Ok(ct),
        _ => Err(EmitError::NonClassReturn(format!(
            "{}.{}",
            method.declaring, method.name
        ))),
    }
}

fn element_simple_name(element: &Type) -> &str {
    match element {
        Type::Primitive(p) => p.java_name(),
        Type::Class(ct) => ct.simple_name(),
        // Array elements are normalized to non-array types.
        Type::Array(_) => "array",
    }
}

/// Literal stand-in for a value nothing in the plan produced.
fn any_value(ty: &Type) -> Option<String> {
    match ty {
        Type::Primitive(p) => Some(primitive_literal(*p).to_string()),
        Type::Class(ct) if ct.binary_name() == "java.lang.String" => {
            Some("\"string\"".to_string())
        }
        _ => None,
    }
}

fn primitive_literal(p: PrimitiveType) -> &'static str {
    match p {
        PrimitiveType::Boolean => "true",
        PrimitiveType::Char => "'?'",
        PrimitiveType::Float => "0f",
        PrimitiveType::Double => "0.0",
        PrimitiveType::Byte | PrimitiveType::Short | PrimitiveType::Int | PrimitiveType::Long => {
            "0"
        }
    }
}
