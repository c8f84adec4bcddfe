//! Lexer, parser, and AST for `.graph` documents.
//!
//! This crate is dependency-free and knows nothing about rendering: it turns
//! text into a [`Document`] tree. Mapping nodes to drawing commands is the
//! job of whoever consumes it.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ast`] | `Document`, `Node`, `Prop`, `Value` |
//! | [`error`] | `ParseError` |
//! | [`lexer`] | `Lexer`, `Token` |
//! | [`parser`] | `parse_str` entry point |
//!
//! # Quick start
//!
//! ```rust
//! use graphsvg_markup::parse_str;
//!
//! let src = r#"
//!     graph view: -4, -4, 8, 8  size: 400, 400 {
//!         func `sin(x)` { stroke: #fe3  stroke-width: 4 }
//!         point 1, 2 { label: "A" }
//!     }
//! "#;
//!
//! let doc = parse_str(src).unwrap();
//! assert_eq!(doc.root.name, "graph");
//! assert_eq!(doc.root.children.len(), 2);
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{Document, Node, Prop, Value};
pub use error::ParseError;
pub use parser::parse_str;

#[cfg(test)]
mod parse_tests {
    use super::*;

    fn ok(src: &str) -> Document { parse_str(src).unwrap() }
    fn err(src: &str) -> ParseError { parse_str(src).unwrap_err() }

    #[test] fn empty_graph() { ok("graph { }"); }
    #[test] fn bare_graph() { ok("graph"); }

    #[test]
    fn header_props() {
        let doc = ok("graph view: -4, -4, 8, 8  size: 400, 300  grid: 1 { }");
        let view = doc.root.prop("view").unwrap();
        assert_eq!(view.numbers(), Some(vec![-4.0, -4.0, 8.0, 8.0]));
        assert_eq!(doc.root.prop("size").unwrap().numbers(), Some(vec![400.0, 300.0]));
        assert_eq!(doc.root.prop("grid").unwrap().single(), Some(&Value::Number(1.0)));
    }

    #[test]
    fn children_with_args_and_props() {
        let doc = ok(r##"graph {
            func `1.5 * sin(x * 2)` { stroke: "#fe3"  stroke-width: 8  blend: multiply }
            point 1, 2 { label: "A"  color: red }
            lineX 0.5
            lineY -1
        }"##);
        let kids = &doc.root.children;
        assert_eq!(kids.len(), 4);
        assert_eq!(kids[0].name, "func");
        assert_eq!(kids[0].args, vec![Value::Expr("1.5 * sin(x * 2)".into())]);
        assert_eq!(kids[0].prop("blend").unwrap().single(), Some(&Value::Ident("multiply".into())));
        assert_eq!(kids[1].args, vec![Value::Number(1.0), Value::Number(2.0)]);
        assert_eq!(kids[2].args, vec![Value::Number(0.5)]);
        assert_eq!(kids[3].args, vec![Value::Number(-1.0)]);
    }

    #[test]
    fn inline_props_belong_to_the_node() {
        let doc = ok("graph { lineX 1 stroke: red  lineY 2 }");
        let kids = &doc.root.children;
        assert_eq!(kids.len(), 2);
        assert_eq!(kids[0].prop("stroke").unwrap().single(), Some(&Value::Ident("red".into())));
        assert!(doc.root.props.is_empty());
    }

    #[test]
    fn multiline_string_argument() {
        let doc = ok("graph {\n  shader \"\n    @fragment\n    fn fs_main() {}\n  \" { layer: back }\n}");
        let shader = &doc.root.children[0];
        assert!(matches!(&shader.args[0], Value::Str(s) if s.contains("@fragment")));
        assert_eq!(shader.line, 2);
    }

    #[test]
    fn later_props_win() {
        let doc = ok("graph size: 1, 1 { size: 2, 2 }");
        assert_eq!(doc.root.prop("size").unwrap().numbers(), Some(vec![2.0, 2.0]));
    }

    #[test]
    fn value_display_is_attribute_text() {
        assert_eq!(Value::Number(8.0).to_string(), "8");
        assert_eq!(Value::Number(0.25).to_string(), "0.25");
        assert_eq!(Value::Color("#fe3".into()).to_string(), "#fe3");
    }

    #[test] fn block_comment() { ok("/* header */ graph { /* body */ grid: 1 /* tail */ }"); }
    #[test] fn line_comment() { ok("// top\ngraph {\n    // inside\n    lineX 0\n}"); }
    #[test] fn string_escape() { ok(r#"graph { point 0, 0 { label: "say \"hi\"" } }"#); }

    #[test] fn err_bad_color() { err("graph { lineX 0 { stroke: #xyz } }"); }
    #[test] fn err_unclosed_string() { err(r#"graph { point 0, 0 { label: "oops } }"#); }
    #[test] fn err_double_colon() { err("graph { grid: : 8 }"); }
    #[test] fn err_trailing_comma() { err("graph { point 1, }"); }

    #[test]
    fn err_unclosed_block_points_at_brace() {
        let e = err("graph {\n  lineX 0\n");
        assert_eq!((e.line, e.col), (1, 7));
        assert!(e.message.contains("unclosed"));
    }

    #[test]
    fn err_trailing_tokens() {
        let e = err("graph { } graph { }");
        assert!(e.message.contains("after the root node"));
    }
}
