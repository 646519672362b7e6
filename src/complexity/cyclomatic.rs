use tree_sitter::Node;

/// Decision points that add one path each.
///
/// `elif_clause` counts because an `elif` is a nested `if`. Comprehension
/// clauses and conditional expressions are not decision statements here.
pub fn is_decision_point(kind: &str) -> bool {
    matches!(
        kind,
        "if_statement"
            | "elif_clause"
            | "for_statement"
            | "while_statement"
            | "except_clause"
            | "except_group_clause"
            | "with_statement"
            | "boolean_operator"
            | "case_clause"
    )
}

/// Count decision points under `node`, including inside nested function
/// definitions and lambdas, which are folded into the enclosing method.
pub fn count_decision_points(node: Node) -> u32 {
    let mut count = 0;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if is_decision_point(child.kind()) {
            count += 1;
        }
        count += count_decision_points(child);
    }
    count
}

/// Cyclomatic complexity of a function definition node: 1 + decision points
/// in its body. Decorators, parameters and default values are not counted.
pub fn calculate_cyclomatic(function: Node) -> u32 {
    let body = function.child_by_field_name("body").unwrap_or(function);
    1 + count_decision_points(body)
}
