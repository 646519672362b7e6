//! Python structural extractor using tree-sitter
//!
//! Records every function (sync or async) and every method of a class,
//! recursing into nested classes. Functions nested inside a function are
//! not recorded; their branches count toward the enclosing method.

use crate::complexity::calculate_cyclomatic;
use crate::core::{MethodRecord, ModuleSnapshot};
use crate::errors::AuditError;
use std::path::Path;
use tracing::warn;
use tree_sitter::{Node, Parser};

/// Syntax node kinds the extractor dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    FunctionDef,
    ClassDef,
    Decorated,
    Other,
}

impl NodeKind {
    fn of(node: Node) -> Self {
        match node.kind() {
            // Older grammars emit a separate node for `async def`
            "function_definition" | "async_function_definition" => NodeKind::FunctionDef,
            "class_definition" => NodeKind::ClassDef,
            "decorated_definition" => NodeKind::Decorated,
            _ => NodeKind::Other,
        }
    }
}

/// Parse Python source and extract its method inventory
pub fn extract_source(source: &str, path: &Path) -> Result<ModuleSnapshot, AuditError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| AuditError::parse(path, 0, format!("Failed to load Python grammar: {}", e)))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| AuditError::parse(path, 0, "Parser produced no syntax tree"))?;

    let root = tree.root_node();
    if root.has_error() {
        let (line, message) = first_syntax_error(root);
        return Err(AuditError::parse(path, line, message));
    }

    let mut methods = Vec::new();
    let mut scope = Vec::new();
    visit(root, source.as_bytes(), &mut scope, &mut methods);

    let snapshot = ModuleSnapshot::new(path, methods);
    if !snapshot.collisions.is_empty() {
        warn!(
            "Duplicate qualified names in {}: {}",
            path.display(),
            snapshot.collisions.join(", ")
        );
    }
    Ok(snapshot)
}

fn visit(node: Node, source: &[u8], scope: &mut Vec<String>, out: &mut Vec<MethodRecord>) {
    match NodeKind::of(node) {
        NodeKind::FunctionDef => {
            if let Some(record) = function_record(node, source, scope) {
                out.push(record);
            }
        }
        NodeKind::ClassDef => {
            let Some(name) = node_name(node, source) else {
                return;
            };
            scope.push(name);
            if let Some(body) = node.child_by_field_name("body") {
                visit_children(body, source, scope, out);
            }
            scope.pop();
        }
        NodeKind::Decorated => {
            if let Some(definition) = node.child_by_field_name("definition") {
                visit(definition, source, scope, out);
            }
        }
        NodeKind::Other => visit_children(node, source, scope, out),
    }
}

fn visit_children(node: Node, source: &[u8], scope: &mut Vec<String>, out: &mut Vec<MethodRecord>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, source, scope, out);
    }
}

fn function_record(node: Node, source: &[u8], scope: &[String]) -> Option<MethodRecord> {
    let name = node_name(node, source)?;
    let qualified_name = if scope.is_empty() {
        name
    } else {
        format!("{}.{}", scope.join("."), name)
    };

    Some(MethodRecord::new(
        qualified_name,
        start_line(node),
        end_line(node),
        calculate_cyclomatic(node),
    ))
}

fn node_name(node: Node, source: &[u8]) -> Option<String> {
    node.child_by_field_name("name")
        .and_then(|n| n.utf8_text(source).ok())
        .map(str::to_string)
}

fn start_line(node: Node) -> usize {
    node.start_position().row + 1
}

fn end_line(node: Node) -> usize {
    let end = node.end_position();
    // A node ending at column 0 finished on the previous line
    if end.column == 0 && end.row > node.start_position().row {
        end.row
    } else {
        end.row + 1
    }
}

/// Locate the first error or missing node for the parse error report
fn first_syntax_error(node: Node) -> (usize, String) {
    if node.is_missing() {
        return (start_line(node), format!("missing {}", node.kind()));
    }
    if node.is_error() {
        return (start_line(node), "invalid syntax".to_string());
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            return first_syntax_error(child);
        }
    }
    (start_line(node), "invalid syntax".to_string())
}
