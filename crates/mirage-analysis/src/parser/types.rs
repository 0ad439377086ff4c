//! Canonical ParseResult and supporting types.
//!
//! This is the single source of truth for parse output. The static
//! detectors and the linguistic AST verifier all consume this struct;
//! nothing re-parses.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Flat extraction of everything the detectors need from one program.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseResult {
    pub has_errors: bool,
    /// First syntax error, when present.
    pub error: Option<SyntaxErrorInfo>,
    /// True when extraction ran on a re-parse with one line stripped.
    pub recovered: bool,
    pub stripped_line: Option<u32>,

    // Structural extraction
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    pub imports: Vec<ImportInfo>,
    /// Every name bound anywhere in the file (defs, params, assignments,
    /// loop targets, imports, comprehension vars, aliases).
    pub defined_names: FxHashSet<String>,

    // Reference extraction
    pub name_reads: Vec<NameRead>,
    pub attribute_accesses: Vec<AttributeAccess>,
    pub calls: Vec<CallSite>,
    pub subscripts: Vec<SubscriptSite>,

    // Expression shapes
    pub divisions: Vec<DivisionSite>,
    pub boolean_ops: Vec<BooleanOpInfo>,
    pub conditionals: Vec<ConditionalInfo>,
    pub returns: Vec<ReturnInfo>,

    // Literals
    pub string_literals: Vec<LiteralInfo>,
    pub numeric_literals: Vec<LiteralInfo>,
    pub sequence_literals: Vec<LiteralInfo>,

    // Misc
    pub comments: Vec<CommentInfo>,
    pub try_count: usize,
    /// Variables assigned a dictionary literal or `dict(...)` call.
    pub dict_vars: FxHashSet<String>,
    /// Line span of the `if __name__ == "__main__"` block, when present.
    pub main_block: Option<(u32, u32)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntaxErrorInfo {
    /// 1-based.
    pub line: u32,
    /// 0-based column, as reported by the parser.
    pub column: u32,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    /// 1-based line of the `def`.
    pub line: u32,
    pub end_line: u32,
    pub params: SmallVec<[ParamInfo; 4]>,
    pub body: FunctionBody,
    pub has_value_return: bool,
    pub is_method: bool,
    pub decorators: SmallVec<[String; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamInfo {
    pub name: String,
    pub has_default: bool,
}

/// Shape of a function body, for incomplete-generation detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionBody {
    Normal,
    /// Body is exactly `pass`.
    PassOnly,
    /// Body is exactly `...`.
    EllipsisOnly,
    /// Body is only a documentation string literal.
    DocstringOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    pub line: u32,
    pub methods: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportInfo {
    /// Module path as written (`os.path` for `import os.path`).
    pub module: String,
    /// The name the import binds locally.
    pub binds: String,
    pub line: u32,
}

/// An identifier read in expression context (never a write-site).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameRead {
    pub name: String,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeAccess {
    /// Receiver, when it is a bare identifier.
    pub object: String,
    pub attribute: String,
    pub line: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSite {
    /// Last path segment of the callee (`sqrt` for `math.sqrt`).
    pub callee: String,
    /// Receiver path, when the callee is an attribute (`math`).
    pub receiver: Option<String>,
    pub line: u32,
    /// String literal arguments, for static type-compatibility checks.
    pub string_args: SmallVec<[String; 2]>,
    pub arg_count: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptSite {
    /// Subscripted receiver, when it is a bare identifier.
    pub object: String,
    pub line: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivisionSite {
    pub numerator: String,
    pub denominator: String,
    pub line: u32,
    /// True for `//` floor division.
    pub floor: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BooleanOpInfo {
    pub left: String,
    /// "and" | "or".
    pub op: String,
    pub right: String,
    pub line: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionalInfo {
    pub line: u32,
    pub condition: String,
    /// Whitespace-normalized consequence block text.
    pub consequence: String,
    /// Whitespace-normalized `else` block text, when present and not an
    /// elif chain.
    pub alternative: Option<String>,
}

/// Value category of a returned expression — the wrong-return-shape signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueCategory {
    Scalar,
    Sequence,
    Mapping,
    NoneValue,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnInfo {
    pub line: u32,
    pub category: ValueCategory,
    /// Enclosing function, when any.
    pub function: Option<String>,
    /// Normalized text of the returned expression.
    pub expr: String,
}

/// Syntactic position of a literal, for bias verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralContext {
    Return,
    Comparison,
    Assignment,
    CallArgument,
    Subscript,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiteralInfo {
    /// String value (quotes stripped), numeric raw text, or normalized
    /// sequence text (`[1, 2, 3]`).
    pub value: String,
    pub line: u32,
    pub context: LiteralContext,
    /// Inside the `if __name__ == "__main__"` harness block.
    pub in_main_block: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentInfo {
    /// Text without the leading `#`.
    pub text: String,
    pub line: u32,
}
