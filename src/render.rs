//! C# source rendering for class trees

use crate::ident::escape_string_literal;
use crate::tree::{ClassNode, Member};
use std::collections::BTreeSet;

/// First line of every generated file
pub const GENERATED_HEADER: &str = "// This file is auto-generated. Do not modify manually.";

/// One indentation level
pub const INDENT: &str = "    ";

/// A complete generated source file
#[derive(Debug, Clone)]
pub struct SourceFile<'a> {
    usings: BTreeSet<String>,
    root: &'a ClassNode,
}

impl<'a> SourceFile<'a> {
    pub fn new(root: &'a ClassNode) -> Self {
        Self {
            usings: BTreeSet::new(),
            root,
        }
    }

    /// Add a `using` directive; directives are emitted sorted and unique
    pub fn with_using(mut self, namespace: impl Into<String>) -> Self {
        self.usings.insert(namespace.into());
        self
    }

    /// Render the file text, ending with a newline
    pub fn render(&self) -> String {
        let mut out = String::new();

        if !self.usings.is_empty() {
            for ns in &self.usings {
                out.push_str(&format!("using {};\n", ns));
            }
            out.push('\n');
        }

        out.push_str(GENERATED_HEADER);
        out.push_str("\n\n");
        render_class(self.root, 0, &mut out);
        out
    }
}

/// Render one class and its nested classes at the given depth.
///
/// Members come first in declaration order, then children in name order,
/// with a single blank line between the two blocks when both exist.
pub fn render_class(node: &ClassNode, depth: usize, out: &mut String) {
    let pad = INDENT.repeat(depth);
    let inner = INDENT.repeat(depth + 1);

    out.push_str(&format!("{}public static class {}\n", pad, node.name()));
    out.push_str(&format!("{}{{\n", pad));

    for member in node.members() {
        match member {
            Member::Comment(text) => out.push_str(&format!("{}// {}\n", inner, text)),
            Member::Constant(c) => out.push_str(&format!(
                "{}public const string {} = \"{}\";\n",
                inner,
                c.name,
                escape_string_literal(&c.value)
            )),
        }
    }

    let mut children = node.children().peekable();
    if !node.members().is_empty() && children.peek().is_some() {
        out.push('\n');
    }
    for child in children {
        render_class(child, depth + 1, out);
    }

    out.push_str(&format!("{}}}\n", pad));
}
