//! tree-sitter front end: Python source to import statements.

use tree_sitter::{Node, Parser};

/// Where an import statement sits relative to module load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Placement {
    /// Executed unconditionally while the module loads.
    ModuleLevel,
    /// Under a branch, handler, loop or `with` block.
    Conditional,
    /// Inside a function or lambda body.
    Deferred,
}

/// Syntactic shape of an import statement, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportForm {
    /// `import a.b, c as d`
    Import { modules: Vec<String> },
    /// `from ..pkg import x, y` / `from pkg import *`
    From {
        /// Leading dots; 0 for absolute imports.
        level: usize,
        module: Option<String>,
        names: Vec<String>,
        wildcard: bool,
    },
}

/// One import statement found in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    /// 1-based.
    pub line: usize,
    pub placement: Placement,
    pub form: ImportForm,
}

/// The file has syntax errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxFailure {
    pub line: usize,
    pub message: String,
}

/// Reusable Python import parser. One per worker thread.
pub struct PythonImportParser {
    parser: Parser,
}

impl PythonImportParser {
    pub fn new() -> Result<Self, String> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| format!("Failed to set language: {e}"))?;
        Ok(Self { parser })
    }

    /// Collect every import statement, in source order.
    pub fn parse(&mut self, source: &str) -> Result<Vec<ImportStatement>, SyntaxFailure> {
        let tree = self.parser.parse(source, None).ok_or_else(|| SyntaxFailure {
            line: 1,
            message: "parser produced no syntax tree".to_string(),
        })?;
        let root = tree.root_node();

        if root.has_error() {
            let line = first_error(root).map_or(1, |n| n.start_position().row + 1);
            return Err(SyntaxFailure {
                line,
                message: "invalid syntax".to_string(),
            });
        }

        let bytes = source.as_bytes();
        let mut statements = Vec::new();
        let mut stack = vec![(root, Placement::ModuleLevel)];

        while let Some((node, placement)) = stack.pop() {
            match node.kind() {
                "import_statement" => {
                    if let Some(statement) = import_statement(node, bytes, placement) {
                        statements.push(statement);
                    }
                    continue;
                }
                "import_from_statement" => {
                    if let Some(statement) = from_statement(node, bytes, placement) {
                        statements.push(statement);
                    }
                    continue;
                }
                "future_import_statement" => continue,
                _ => {}
            }

            let inner = placement.max(scope_of(node.kind()));
            let mut cursor = node.walk();
            let children: Vec<Node> = node.named_children(&mut cursor).collect();
            // reversed so the stack pops in source order
            for child in children.into_iter().rev() {
                stack.push((child, inner));
            }
        }

        Ok(statements)
    }
}

/// Placement implied by entering a node of this kind.
fn scope_of(kind: &str) -> Placement {
    match kind {
        "function_definition" | "lambda" => Placement::Deferred,
        "if_statement" | "elif_clause" | "else_clause" | "try_statement" | "except_clause"
        | "except_group_clause" | "finally_clause" | "with_statement" | "for_statement"
        | "while_statement" | "match_statement" | "case_clause" => Placement::Conditional,
        _ => Placement::ModuleLevel,
    }
}

fn first_error(root: Node) -> Option<Node> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() {
            let mut cursor = node.walk();
            let children: Vec<Node> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }
    None
}

/// Dotted name text with any interior whitespace removed.
fn dotted(node: Node, source: &[u8]) -> Option<String> {
    let text = node.utf8_text(source).ok()?;
    let name: String = text.split_whitespace().collect();
    (!name.is_empty()).then_some(name)
}

/// Imported name of a `dotted_name` or `aliased_import` node.
fn imported_name(node: Node, source: &[u8]) -> Option<String> {
    match node.kind() {
        "aliased_import" => dotted(node.child_by_field_name("name")?, source),
        _ => dotted(node, source),
    }
}

fn import_statement(node: Node, source: &[u8], placement: Placement) -> Option<ImportStatement> {
    let mut cursor = node.walk();
    let modules: Vec<String> = node
        .children_by_field_name("name", &mut cursor)
        .filter_map(|child| imported_name(child, source))
        .collect();
    if modules.is_empty() {
        return None;
    }
    Some(ImportStatement {
        line: node.start_position().row + 1,
        placement,
        form: ImportForm::Import { modules },
    })
}

fn from_statement(node: Node, source: &[u8], placement: Placement) -> Option<ImportStatement> {
    let module_node = node.child_by_field_name("module_name")?;

    let (level, module) = if module_node.kind() == "relative_import" {
        let mut level = 0;
        let mut module = None;
        let mut cursor = module_node.walk();
        for child in module_node.children(&mut cursor) {
            match child.kind() {
                "import_prefix" => {
                    level = child
                        .utf8_text(source)
                        .map(|t| t.chars().filter(|c| *c == '.').count())
                        .unwrap_or(0);
                }
                "dotted_name" => module = dotted(child, source),
                _ => {}
            }
        }
        (level, module)
    } else {
        (0, dotted(module_node, source))
    };

    if level == 0 && module.as_deref() == Some("__future__") {
        return None;
    }

    let mut cursor = node.walk();
    let wildcard = node
        .named_children(&mut cursor)
        .any(|child| child.kind() == "wildcard_import");

    let mut cursor = node.walk();
    let names: Vec<String> = node
        .children_by_field_name("name", &mut cursor)
        .filter_map(|child| imported_name(child, source))
        .collect();

    Some(ImportStatement {
        line: node.start_position().row + 1,
        placement,
        form: ImportForm::From {
            level,
            module,
            names,
            wildcard,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Vec<ImportStatement> {
        PythonImportParser::new().unwrap().parse(source).unwrap()
    }

    #[test]
    fn plain_imports() {
        let statements = parse("import os\nimport pkg.sub as s, other\n");
        assert_eq!(statements.len(), 2);
        assert_eq!(
            statements[1].form,
            ImportForm::Import {
                modules: vec!["pkg.sub".to_string(), "other".to_string()]
            }
        );
        assert_eq!(statements[1].line, 2);
        assert_eq!(statements[1].placement, Placement::ModuleLevel);
    }

    #[test]
    fn from_imports_and_relative_levels() {
        let statements = parse("from ..core import a as b, c\nfrom . import sibling\nfrom pkg import *\n");
        assert_eq!(
            statements[0].form,
            ImportForm::From {
                level: 2,
                module: Some("core".to_string()),
                names: vec!["a".to_string(), "c".to_string()],
                wildcard: false,
            }
        );
        assert_eq!(
            statements[1].form,
            ImportForm::From {
                level: 1,
                module: None,
                names: vec!["sibling".to_string()],
                wildcard: false,
            }
        );
        assert!(matches!(
            &statements[2].form,
            ImportForm::From { level: 0, wildcard: true, .. }
        ));
    }

    #[test]
    fn placement_tracks_nesting() {
        let source = "\
import top
if DEBUG:
    import guarded
try:
    import fast
except ImportError:
    import slow
def handler():
    import lazy
    if x:
        import lazier
class Model:
    import in_class
    def method(self):
        import in_method
";
        let placements: Vec<(String, Placement)> = parse(source)
            .into_iter()
            .map(|s| match s.form {
                ImportForm::Import { modules } => (modules[0].clone(), s.placement),
                ImportForm::From { .. } => unreachable!(),
            })
            .collect();
        assert_eq!(
            placements,
            vec![
                ("top".to_string(), Placement::ModuleLevel),
                ("guarded".to_string(), Placement::Conditional),
                ("fast".to_string(), Placement::Conditional),
                ("slow".to_string(), Placement::Conditional),
                ("lazy".to_string(), Placement::Deferred),
                ("lazier".to_string(), Placement::Deferred),
                ("in_class".to_string(), Placement::ModuleLevel),
                ("in_method".to_string(), Placement::Deferred),
            ]
        );
    }

    #[test]
    fn future_imports_are_ignored() {
        assert!(parse("from __future__ import annotations\n").is_empty());
    }

    #[test]
    fn syntax_errors_fail_the_file() {
        let failure = PythonImportParser::new()
            .unwrap()
            .parse("import ok\ndef broken(:\n    pass\n")
            .unwrap_err();
        assert!((1..=2).contains(&failure.line));
    }
}
