//! Tree-sitter parser subsystem for the target language (Python).

pub mod extract;
pub mod types;

use mirage_core::errors::ParseError;
use tree_sitter::Parser;

pub use types::{
    AttributeAccess, BooleanOpInfo, CallSite, ClassInfo, CommentInfo, ConditionalInfo,
    DivisionSite, FunctionBody, FunctionInfo, ImportInfo, LiteralContext, LiteralInfo, NameRead,
    ParamInfo, ParseResult, ReturnInfo, SubscriptSite, SyntaxErrorInfo, ValueCategory,
};

/// Parse Python source into the canonical [`ParseResult`].
///
/// On syntax errors the first error is recorded, then the parse is retried
/// with the offending line stripped so the other detectors can still run;
/// if that fails, each line is tried once. Extraction always proceeds on
/// the best tree available — tree-sitter trees are themselves
/// error-tolerant.
pub fn parse_python(source: &str) -> Result<ParseResult, ParseError> {
    let tree = parse_tree(source)?;
    let root = tree.root_node();

    if !root.has_error() {
        let mut result = extract::extract(source, &tree);
        result.has_errors = false;
        return Ok(result);
    }

    let error = extract::first_error(source, &tree);
    let error_line = error.as_ref().map(|e| e.line).unwrap_or(1);

    // Recovery pass: strip the offending line first, then each line once.
    let lines: Vec<&str> = source.lines().collect();
    let mut candidates: Vec<u32> = Vec::with_capacity(lines.len() + 1);
    candidates.push(error_line);
    candidates.extend((1..=lines.len() as u32).filter(|l| *l != error_line));

    let mut recovered: Option<(ParseResult, u32)> = None;
    for strip in candidates {
        let stripped: String = lines
            .iter()
            .enumerate()
            .filter(|(i, _)| (*i as u32 + 1) != strip)
            .map(|(_, l)| *l)
            .collect::<Vec<_>>()
            .join("\n");
        let candidate_tree = parse_tree(&stripped)?;
        if !candidate_tree.root_node().has_error() {
            let result = extract::extract(&stripped, &candidate_tree);
            recovered = Some((result, strip));
            break;
        }
    }

    let mut result = match recovered {
        Some((result, strip)) => {
            let mut r = result;
            r.recovered = true;
            r.stripped_line = Some(strip);
            r
        }
        // No single-line strip helps; extract from the errored tree.
        None => extract::extract(source, &tree),
    };
    result.has_errors = true;
    result.error = error;
    Ok(result)
}

fn parse_tree(source: &str) -> Result<tree_sitter::Tree, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ParseError::GrammarUnavailable {
            message: e.to_string(),
        })?;
    parser.parse(source, None).ok_or(ParseError::NoTree)
}
