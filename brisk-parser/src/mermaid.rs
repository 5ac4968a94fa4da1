//! Export of a syntax tree as a [Mermaid](https://mermaid.js.org) flowchart.

use crate::ast::Program;
use crate::dump::{Outline, TreeWriter};
use crate::visitor::Visitor;

struct Mermaid {
    out: String,
    /// Id of the next node.
    next_id: usize,
    /// Ids of the open nodes, innermost last.
    parents: Vec<usize>,
}

impl Mermaid {
    fn new() -> Self {
        Self {
            out: String::from("graph TD\n"),
            next_id: 0,
            parents: Vec::new(),
        }
    }
}

impl TreeWriter for Mermaid {
    fn open(&mut self, label: String) {
        let id = self.next_id;
        self.next_id += 1;

        self.out
            .push_str(&format!("    node{}[\"{}\"]\n", id, escape(&label)));
        if let Some(parent) = self.parents.last() {
            self.out
                .push_str(&format!("    node{} --> node{}\n", parent, id));
        }
        self.parents.push(id);
    }

    fn close(&mut self) {
        self.parents.pop();
    }
}

/// Replaces the characters that Mermaid would interpret inside a quoted label.
fn escape(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '"' => escaped.push_str("#quot;"),
            '<' => escaped.push_str("#lt;"),
            '>' => escaped.push_str("#gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Renders `program` as a top-down Mermaid graph. Node ids are numbered from `node0` in
/// depth-first order, so the same tree always gives the same text.
pub fn to_mermaid(program: &Program) -> String {
    let mut outline = Outline {
        writer: Mermaid::new(),
    };
    outline.visit_program(program);
    outline.writer.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use insta::assert_snapshot;

    #[test]
    fn test_to_mermaid() {
        let source = "function void main() { print(a < \"b\"); }".into();
        let result = parse(&source);
        assert_snapshot!(to_mermaid(&result.program), @r###"
        graph TD
            node0["Program"]
            node1["FunctionDecl: main"]
            node0 --> node1
            node2["Type: void"]
            node1 --> node2
            node3["PrintStmt"]
            node1 --> node3
            node4["BinaryExpr: #lt;"]
            node3 --> node4
            node5["Identifier: a"]
            node4 --> node5
            node6["LiteralExpr: string = b"]
            node4 --> node6
        "###);
    }

    #[test]
    fn test_export_is_repeatable() {
        let source = "integer x = 1; function void f() { x = x + 1; }".into();
        let result = parse(&source);
        let first = to_mermaid(&result.program);
        assert_eq!(first, to_mermaid(&result.program));
        assert!(first.starts_with("graph TD\n    node0[\"Program\"]\n"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a \"b\" <c>"), "a #quot;b#quot; #lt;c#gt;");
    }
}
