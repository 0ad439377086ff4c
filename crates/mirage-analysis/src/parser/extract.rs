//! Single-pass extraction from a tree-sitter tree into [`ParseResult`].
//!
//! Write-sites (assignment targets, parameters, loop variables, imports,
//! comprehension variables, aliases) feed `defined_names`; identifiers
//! visited anywhere else are read-sites and feed `name_reads`. Definition
//! constructs consume their target subtrees so a write is never double
//! counted as a read.

use smallvec::SmallVec;
use tree_sitter::{Node, Tree};

use super::types::{
    AttributeAccess, BooleanOpInfo, CallSite, ClassInfo, CommentInfo, ConditionalInfo,
    DivisionSite, FunctionBody, FunctionInfo, ImportInfo, LiteralContext, LiteralInfo, NameRead,
    ParamInfo, ParseResult, ReturnInfo, SubscriptSite, SyntaxErrorInfo, ValueCategory,
};

/// Extract everything the detectors need in one traversal.
pub fn extract(source: &str, tree: &Tree) -> ParseResult {
    let mut ex = Extractor {
        src: source,
        out: ParseResult::default(),
        function_stack: Vec::new(),
        class_stack: Vec::new(),
        in_main_block: false,
        pending_decorators: Vec::new(),
    };
    ex.walk(tree.root_node(), LiteralContext::Other);
    ex.out
}

/// Locate the first error or missing node in the tree.
pub fn first_error(source: &str, tree: &Tree) -> Option<SyntaxErrorInfo> {
    find_error_node(tree.root_node()).map(|node| {
        let pos = node.start_position();
        let message = if node.is_missing() {
            format!("missing '{}'", node.kind())
        } else {
            let snippet = node
                .utf8_text(source.as_bytes())
                .unwrap_or("")
                .chars()
                .take(40)
                .collect::<String>();
            if snippet.trim().is_empty() {
                "invalid syntax".to_string()
            } else {
                format!("invalid syntax near '{}'", snippet.trim())
            }
        };
        SyntaxErrorInfo {
            line: pos.row as u32 + 1,
            column: pos.column as u32,
            message,
        }
    })
}

fn find_error_node(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    for child in children {
        if let Some(found) = find_error_node(child) {
            return Some(found);
        }
    }
    // The error is attributed to this node itself.
    Some(node)
}

struct Extractor<'a> {
    src: &'a str,
    out: ParseResult,
    function_stack: Vec<String>,
    /// Indices into `out.classes` for enclosing classes.
    class_stack: Vec<usize>,
    in_main_block: bool,
    pending_decorators: Vec<String>,
}

impl<'a> Extractor<'a> {
    fn text(&self, node: Node) -> &'a str {
        node.utf8_text(self.src.as_bytes()).unwrap_or("")
    }

    /// Whitespace-normalized node text.
    fn norm(&self, node: Node) -> String {
        self.text(node).split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn line(node: Node) -> u32 {
        node.start_position().row as u32 + 1
    }

    fn named_kids(node: Node) -> Vec<Node> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor).collect()
    }

    fn define(&mut self, name: &str) {
        if !name.is_empty() {
            self.out.defined_names.insert(name.to_string());
        }
    }

    /// Bind every identifier in an assignment-target subtree.
    fn collect_targets(&mut self, node: Node) {
        match node.kind() {
            "identifier" => {
                let name = self.text(node).to_string();
                self.define(&name);
            }
            "tuple_pattern" | "list_pattern" | "pattern_list" | "tuple" | "list" => {
                for child in Self::named_kids(node) {
                    self.collect_targets(child);
                }
            }
            // `d[k] = v` / `obj.attr = v`: the receiver is a read.
            "subscript" | "attribute" => self.walk(node, LiteralContext::Other),
            "typed_parameter" | "default_parameter" | "typed_default_parameter" => {
                for child in Self::named_kids(node) {
                    if child.kind() == "identifier" {
                        let name = self.text(child).to_string();
                        self.define(&name);
                        break;
                    }
                }
            }
            _ => {
                for child in Self::named_kids(node) {
                    self.collect_targets(child);
                }
            }
        }
    }

    fn walk(&mut self, node: Node, ctx: LiteralContext) {
        match node.kind() {
            "comment" => {
                let text = self.text(node).trim_start_matches('#').trim().to_string();
                self.out.comments.push(CommentInfo {
                    text,
                    line: Self::line(node),
                });
            }

            "decorated_definition" => {
                let mut decorators = Vec::new();
                for child in Self::named_kids(node) {
                    if child.kind() == "decorator" {
                        let raw = self.text(child).trim_start_matches('@');
                        let name = raw.split('(').next().unwrap_or(raw).trim().to_string();
                        decorators.push(name.clone());
                        // The decorator expression is a read.
                        for inner in Self::named_kids(child) {
                            self.walk(inner, LiteralContext::Other);
                        }
                    }
                }
                self.pending_decorators = decorators;
                if let Some(def) = node.child_by_field_name("definition") {
                    self.walk(def, LiteralContext::Other);
                }
                self.pending_decorators.clear();
            }

            "function_definition" => self.visit_function(node),
            "class_definition" => self.visit_class(node),

            "import_statement" => self.visit_import(node),
            "import_from_statement" => self.visit_import_from(node),

            "global_statement" | "nonlocal_statement" => {
                for child in Self::named_kids(node) {
                    if child.kind() == "identifier" {
                        let name = self.text(child).to_string();
                        self.define(&name);
                    }
                }
            }

            "assignment" => {
                if let Some(left) = node.child_by_field_name("left") {
                    if let Some(right) = node.child_by_field_name("right") {
                        if self.is_dict_producer(right) {
                            self.mark_dict_targets(left);
                        }
                    }
                    self.collect_targets(left);
                }
                if let Some(right) = node.child_by_field_name("right") {
                    self.walk(right, LiteralContext::Assignment);
                }
                if let Some(ty) = node.child_by_field_name("type") {
                    self.walk(ty, LiteralContext::Other);
                }
            }

            "augmented_assignment" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.collect_targets(left);
                }
                if let Some(right) = node.child_by_field_name("right") {
                    self.walk(right, LiteralContext::Assignment);
                }
            }

            "named_expression" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.collect_targets(name);
                }
                if let Some(value) = node.child_by_field_name("value") {
                    self.walk(value, ctx);
                }
            }

            "for_statement" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.collect_targets(left);
                }
                if let Some(right) = node.child_by_field_name("right") {
                    self.walk(right, LiteralContext::Other);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.walk(body, LiteralContext::Other);
                }
                if let Some(alt) = node.child_by_field_name("alternative") {
                    self.walk(alt, LiteralContext::Other);
                }
            }

            "for_in_clause" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.collect_targets(left);
                }
                if let Some(right) = node.child_by_field_name("right") {
                    self.walk(right, LiteralContext::Other);
                }
            }

            "as_pattern" => {
                let kids = Self::named_kids(node);
                if let Some(first) = kids.first() {
                    self.walk(*first, LiteralContext::Other);
                }
                if let Some(alias) = node.child_by_field_name("alias") {
                    self.collect_targets(alias);
                } else if kids.len() > 1 {
                    self.collect_targets(kids[1]);
                }
            }

            "except_clause" => {
                let mut seen_expr = false;
                for child in Self::named_kids(node) {
                    match child.kind() {
                        "block" => self.walk(child, LiteralContext::Other),
                        "identifier" if seen_expr => {
                            let name = self.text(child).to_string();
                            self.define(&name);
                        }
                        _ => {
                            self.walk(child, LiteralContext::Other);
                            seen_expr = true;
                        }
                    }
                }
            }

            "try_statement" => {
                self.out.try_count += 1;
                for child in Self::named_kids(node) {
                    self.walk(child, LiteralContext::Other);
                }
            }

            "lambda" => {
                if let Some(params) = node.child_by_field_name("parameters") {
                    self.collect_targets(params);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.walk(body, ctx);
                }
            }

            "if_statement" => self.visit_if(node),

            "return_statement" => {
                let expr = Self::named_kids(node).into_iter().next();
                let category = expr.map(|e| self.categorize(e)).unwrap_or(ValueCategory::NoneValue);
                self.out.returns.push(ReturnInfo {
                    line: Self::line(node),
                    category,
                    function: self.function_stack.last().cloned(),
                    expr: expr.map(|e| self.norm(e)).unwrap_or_default(),
                });
                if let Some(e) = expr {
                    self.walk(e, LiteralContext::Return);
                }
            }

            "binary_operator" => {
                let op = node
                    .child_by_field_name("operator")
                    .map(|o| self.text(o))
                    .unwrap_or("");
                if op == "/" || op == "//" {
                    let numerator = node
                        .child_by_field_name("left")
                        .map(|n| self.norm(n))
                        .unwrap_or_default();
                    let denominator = node
                        .child_by_field_name("right")
                        .map(|n| self.norm(n))
                        .unwrap_or_default();
                    self.out.divisions.push(DivisionSite {
                        numerator,
                        denominator,
                        line: Self::line(node),
                        floor: op == "//",
                    });
                }
                if let Some(left) = node.child_by_field_name("left") {
                    self.walk(left, ctx);
                }
                if let Some(right) = node.child_by_field_name("right") {
                    self.walk(right, ctx);
                }
            }

            "boolean_operator" => {
                let left = node.child_by_field_name("left");
                let right = node.child_by_field_name("right");
                let op = node
                    .child_by_field_name("operator")
                    .map(|o| self.text(o).to_string())
                    .unwrap_or_default();
                self.out.boolean_ops.push(BooleanOpInfo {
                    left: left.map(|n| self.norm(n)).unwrap_or_default(),
                    op,
                    right: right.map(|n| self.norm(n)).unwrap_or_default(),
                    line: Self::line(node),
                });
                if let Some(l) = left {
                    self.walk(l, ctx);
                }
                if let Some(r) = right {
                    self.walk(r, ctx);
                }
            }

            "comparison_operator" => {
                for child in Self::named_kids(node) {
                    self.walk(child, LiteralContext::Comparison);
                }
            }

            "call" => self.visit_call(node, ctx),

            "attribute" => {
                let object = node.child_by_field_name("object");
                let attribute = node.child_by_field_name("attribute");
                if let (Some(obj), Some(attr)) = (object, attribute) {
                    if obj.kind() == "identifier" {
                        self.out.attribute_accesses.push(AttributeAccess {
                            object: self.text(obj).to_string(),
                            attribute: self.text(attr).to_string(),
                            line: Self::line(node),
                        });
                    }
                    self.walk(obj, LiteralContext::Other);
                    // The attribute name itself is not a name read.
                }
            }

            "subscript" => {
                if let Some(value) = node.child_by_field_name("value") {
                    if value.kind() == "identifier" {
                        self.out.subscripts.push(SubscriptSite {
                            object: self.text(value).to_string(),
                            line: Self::line(node),
                        });
                    }
                    self.walk(value, LiteralContext::Other);
                }
                if let Some(index) = node.child_by_field_name("subscript") {
                    self.walk(index, LiteralContext::Subscript);
                }
            }

            "keyword_argument" => {
                if let Some(value) = node.child_by_field_name("value") {
                    self.walk(value, ctx);
                }
            }

            "identifier" => {
                let pos = node.start_position();
                self.out.name_reads.push(NameRead {
                    name: self.text(node).to_string(),
                    line: pos.row as u32 + 1,
                    column: pos.column as u32,
                });
            }

            "string" => {
                let value = string_value(self.text(node));
                self.out.string_literals.push(LiteralInfo {
                    value,
                    line: Self::line(node),
                    context: ctx,
                    in_main_block: self.in_main_block,
                });
            }

            "integer" | "float" => {
                self.out.numeric_literals.push(LiteralInfo {
                    value: self.text(node).to_string(),
                    line: Self::line(node),
                    context: ctx,
                    in_main_block: self.in_main_block,
                });
            }

            "list" | "tuple" | "set" => {
                self.out.sequence_literals.push(LiteralInfo {
                    value: self.norm(node),
                    line: Self::line(node),
                    context: ctx,
                    in_main_block: self.in_main_block,
                });
                for child in Self::named_kids(node) {
                    self.walk(child, ctx);
                }
            }

            _ => {
                let reset = matches!(node.kind(), "block" | "module")
                    || node.kind().ends_with("_statement");
                for child in Self::named_kids(node) {
                    let child_ctx = if reset { LiteralContext::Other } else { ctx };
                    self.walk(child, child_ctx);
                }
            }
        }
    }

    fn visit_function(&mut self, node: Node) {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        self.define(&name);

        let mut params: SmallVec<[ParamInfo; 4]> = SmallVec::new();
        if let Some(parameters) = node.child_by_field_name("parameters") {
            for p in Self::named_kids(parameters) {
                match p.kind() {
                    "identifier" => {
                        let pname = self.text(p).to_string();
                        self.define(&pname);
                        params.push(ParamInfo {
                            name: pname,
                            has_default: false,
                        });
                    }
                    "typed_parameter" | "list_splat_pattern" | "dictionary_splat_pattern" => {
                        if let Some(id) = Self::named_kids(p)
                            .into_iter()
                            .find(|c| c.kind() == "identifier")
                        {
                            let pname = self.text(id).to_string();
                            self.define(&pname);
                            params.push(ParamInfo {
                                name: pname,
                                has_default: false,
                            });
                        }
                    }
                    "default_parameter" | "typed_default_parameter" => {
                        if let Some(id) = p.child_by_field_name("name") {
                            let pname = self.text(id).to_string();
                            self.define(&pname);
                            params.push(ParamInfo {
                                name: pname,
                                has_default: true,
                            });
                        }
                        if let Some(value) = p.child_by_field_name("value") {
                            self.walk(value, LiteralContext::Other);
                        }
                    }
                    _ => {}
                }
            }
        }

        let body = node.child_by_field_name("body");
        let body_kind = body.map(|b| self.classify_body(b)).unwrap_or(FunctionBody::Normal);
        let has_value_return = body.map(|b| has_value_return(b)).unwrap_or(false);

        let info = FunctionInfo {
            name: name.clone(),
            line: Self::line(node),
            end_line: node.end_position().row as u32 + 1,
            params,
            body: body_kind,
            has_value_return,
            is_method: !self.class_stack.is_empty(),
            decorators: SmallVec::from_vec(self.pending_decorators.clone()),
        };
        if let Some(&class_idx) = self.class_stack.last() {
            self.out.classes[class_idx].methods.push(name.clone());
        }
        self.out.functions.push(info);

        self.function_stack.push(name);
        if let Some(b) = body {
            self.walk(b, LiteralContext::Other);
        }
        self.function_stack.pop();
    }

    fn classify_body(&self, body: Node) -> FunctionBody {
        let statements: Vec<Node> = Self::named_kids(body)
            .into_iter()
            .filter(|n| n.kind() != "comment")
            .collect();
        if statements.len() != 1 {
            return FunctionBody::Normal;
        }
        let only = statements[0];
        match only.kind() {
            "pass_statement" => FunctionBody::PassOnly,
            "expression_statement" => {
                let inner = Self::named_kids(only);
                match inner.first().map(|n| n.kind()) {
                    Some("ellipsis") => FunctionBody::EllipsisOnly,
                    Some("string") => FunctionBody::DocstringOnly,
                    _ => FunctionBody::Normal,
                }
            }
            _ => FunctionBody::Normal,
        }
    }

    fn visit_class(&mut self, node: Node) {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        self.define(&name);
        self.out.classes.push(ClassInfo {
            name,
            line: Self::line(node),
            methods: Vec::new(),
        });
        let class_idx = self.out.classes.len() - 1;

        if let Some(superclasses) = node.child_by_field_name("superclasses") {
            self.walk(superclasses, LiteralContext::Other);
        }
        self.class_stack.push(class_idx);
        if let Some(body) = node.child_by_field_name("body") {
            self.walk(body, LiteralContext::Other);
        }
        self.class_stack.pop();
    }

    fn visit_import(&mut self, node: Node) {
        for child in Self::named_kids(node) {
            match child.kind() {
                "dotted_name" => {
                    let module = self.text(child).to_string();
                    let binds = module.split('.').next().unwrap_or("").to_string();
                    self.define(&binds);
                    self.out.imports.push(ImportInfo {
                        module,
                        binds,
                        line: Self::line(node),
                    });
                }
                "aliased_import" => {
                    let module = child
                        .child_by_field_name("name")
                        .map(|n| self.text(n).to_string())
                        .unwrap_or_default();
                    let binds = child
                        .child_by_field_name("alias")
                        .map(|n| self.text(n).to_string())
                        .unwrap_or_default();
                    self.define(&binds);
                    self.out.imports.push(ImportInfo {
                        module,
                        binds,
                        line: Self::line(node),
                    });
                }
                _ => {}
            }
        }
    }

    fn visit_import_from(&mut self, node: Node) {
        let module = node
            .child_by_field_name("module_name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let mut cursor = node.walk();
        let names: Vec<Node> = node.children_by_field_name("name", &mut cursor).collect();
        if names.is_empty() {
            // `from x import *` — record the module itself.
            self.out.imports.push(ImportInfo {
                module: module.clone(),
                binds: String::new(),
                line: Self::line(node),
            });
            return;
        }
        for name_node in names {
            let (imported, binds) = match name_node.kind() {
                "aliased_import" => (
                    name_node
                        .child_by_field_name("name")
                        .map(|n| self.text(n).to_string())
                        .unwrap_or_default(),
                    name_node
                        .child_by_field_name("alias")
                        .map(|n| self.text(n).to_string())
                        .unwrap_or_default(),
                ),
                _ => {
                    let text = self.text(name_node).to_string();
                    let last = text.split('.').last().unwrap_or("").to_string();
                    (text, last)
                }
            };
            self.define(&binds);
            self.out.imports.push(ImportInfo {
                module: format!("{module}.{imported}"),
                binds,
                line: Self::line(node),
            });
        }
    }

    fn visit_if(&mut self, node: Node) {
        let condition = node.child_by_field_name("condition");
        let consequence = node.child_by_field_name("consequence");

        let condition_text = condition.map(|c| self.norm(c)).unwrap_or_default();
        let is_main_guard = self.function_stack.is_empty()
            && self.class_stack.is_empty()
            && condition_text.contains("__name__")
            && condition_text.contains("__main__");

        let mut else_block: Option<Node> = None;
        let mut has_elif = false;
        for child in Self::named_kids(node) {
            match child.kind() {
                "elif_clause" => has_elif = true,
                "else_clause" => {
                    else_block = Self::named_kids(child)
                        .into_iter()
                        .find(|n| n.kind() == "block");
                }
                _ => {}
            }
        }

        self.out.conditionals.push(ConditionalInfo {
            line: Self::line(node),
            condition: condition_text,
            consequence: consequence.map(|c| self.norm(c)).unwrap_or_default(),
            alternative: if has_elif {
                None
            } else {
                else_block.map(|b| self.norm(b))
            },
        });

        if let Some(c) = condition {
            self.walk(c, LiteralContext::Other);
        }
        if is_main_guard {
            self.out.main_block =
                Some((Self::line(node), node.end_position().row as u32 + 1));
            let was = self.in_main_block;
            self.in_main_block = true;
            if let Some(c) = consequence {
                self.walk(c, LiteralContext::Other);
            }
            self.in_main_block = was;
        } else if let Some(c) = consequence {
            self.walk(c, LiteralContext::Other);
        }
        for child in Self::named_kids(node) {
            if matches!(child.kind(), "elif_clause" | "else_clause") {
                self.walk(child, LiteralContext::Other);
            }
        }
    }

    fn visit_call(&mut self, node: Node, ctx: LiteralContext) {
        let function = node.child_by_field_name("function");
        let arguments = node.child_by_field_name("arguments");

        let (callee, receiver) = match function.map(|f| (f, f.kind())) {
            Some((f, "identifier")) => (self.text(f).to_string(), None),
            Some((f, "attribute")) => {
                let attr = f
                    .child_by_field_name("attribute")
                    .map(|a| self.text(a).to_string())
                    .unwrap_or_default();
                let recv = f.child_by_field_name("object").map(|o| self.norm(o));
                (attr, recv)
            }
            _ => (String::new(), None),
        };

        let mut string_args: SmallVec<[String; 2]> = SmallVec::new();
        let mut arg_count = 0u8;
        if let Some(args) = arguments {
            for arg in Self::named_kids(args) {
                if arg.kind() == "comment" {
                    continue;
                }
                arg_count = arg_count.saturating_add(1);
                if arg.kind() == "string" {
                    string_args.push(string_value(self.text(arg)));
                }
            }
        }

        if !callee.is_empty() {
            self.out.calls.push(CallSite {
                callee,
                receiver,
                line: Self::line(node),
                string_args,
                arg_count,
            });
        }

        if let Some(f) = function {
            self.walk(f, LiteralContext::Other);
        }
        if let Some(args) = arguments {
            for arg in Self::named_kids(args) {
                self.walk(arg, merge_call_ctx(ctx));
            }
        }
    }

    /// True for expressions that produce a dictionary: a dict literal, a
    /// dict comprehension, or a `dict(...)` call.
    fn is_dict_producer(&self, node: Node) -> bool {
        match node.kind() {
            "dictionary" | "dictionary_comprehension" => true,
            "call" => node
                .child_by_field_name("function")
                .map(|f| self.text(f) == "dict")
                .unwrap_or(false),
            _ => false,
        }
    }

    fn mark_dict_targets(&mut self, left: Node) {
        if left.kind() == "identifier" {
            let name = self.text(left).to_string();
            self.out.dict_vars.insert(name);
        }
    }

    fn categorize(&self, node: Node) -> ValueCategory {
        match node.kind() {
            "list" | "tuple" | "set" | "list_comprehension" | "set_comprehension"
            | "generator_expression" => ValueCategory::Sequence,
            "dictionary" | "dictionary_comprehension" => ValueCategory::Mapping,
            "none" => ValueCategory::NoneValue,
            "integer" | "float" | "string" | "true" | "false" | "unary_operator"
            | "binary_operator" | "comparison_operator" | "boolean_operator" => {
                ValueCategory::Scalar
            }
            "parenthesized_expression" => Self::named_kids(node)
                .first()
                .map(|n| self.categorize(*n))
                .unwrap_or(ValueCategory::Other),
            _ => ValueCategory::Other,
        }
    }
}

/// Keep the declared literal context when descending into call arguments:
/// a literal passed to a call inside a return is still return-positioned.
fn merge_call_ctx(ctx: LiteralContext) -> LiteralContext {
    match ctx {
        LiteralContext::Other => LiteralContext::CallArgument,
        keep => keep,
    }
}

fn has_value_return(body: Node) -> bool {
    if body.kind() == "return_statement" {
        return body.named_child_count() > 0;
    }
    let mut cursor = body.walk();
    let children: Vec<Node> = body.named_children(&mut cursor).collect();
    children.into_iter().any(has_value_return)
}

/// Strip string prefixes and quotes, keeping the raw inner text.
fn string_value(text: &str) -> String {
    let trimmed = text.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if trimmed.starts_with(quote) {
            let inner = &trimmed[quote.len()..];
            return inner.strip_suffix(quote).unwrap_or(inner).to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use crate::parser::parse_python;
    use crate::parser::types::{FunctionBody, LiteralContext, ValueCategory};

    #[test]
    fn reads_and_writes_are_separated() {
        let result = parse_python("total = 0\nfor item in items:\n    total += item\n").unwrap();
        assert!(result.defined_names.contains("total"));
        assert!(result.defined_names.contains("item"));
        let reads: Vec<&str> = result.name_reads.iter().map(|r| r.name.as_str()).collect();
        assert!(reads.contains(&"items"));
        assert!(!reads.contains(&"total") || reads.iter().filter(|n| **n == "total").count() <= 1);
    }

    #[test]
    fn attribute_object_is_a_read() {
        let result = parse_python("def f(n):\n    return calc.factorial(n)\n").unwrap();
        let reads: Vec<&str> = result.name_reads.iter().map(|r| r.name.as_str()).collect();
        assert!(reads.contains(&"calc"));
        assert_eq!(result.attribute_accesses.len(), 1);
        assert_eq!(result.attribute_accesses[0].object, "calc");
        assert_eq!(result.attribute_accesses[0].attribute, "factorial");
    }

    #[test]
    fn imports_bind_names() {
        let result =
            parse_python("import math\nimport numpy as np\nfrom os.path import join as j\n")
                .unwrap();
        assert!(result.defined_names.contains("math"));
        assert!(result.defined_names.contains("np"));
        assert!(result.defined_names.contains("j"));
        assert_eq!(result.imports.len(), 3);
    }

    #[test]
    fn pass_only_body_detected() {
        let result = parse_python("def todo():\n    pass\n").unwrap();
        assert_eq!(result.functions[0].body, FunctionBody::PassOnly);
    }

    #[test]
    fn docstring_only_body_detected() {
        let result = parse_python("def documented():\n    \"\"\"does things\"\"\"\n").unwrap();
        assert_eq!(result.functions[0].body, FunctionBody::DocstringOnly);
    }

    #[test]
    fn return_categories() {
        let result = parse_python(
            "def a():\n    return [1, 2]\n\ndef b():\n    return x + y\n\ndef c():\n    return None\n",
        )
        .unwrap();
        let categories: Vec<ValueCategory> = result.returns.iter().map(|r| r.category).collect();
        assert_eq!(
            categories,
            vec![ValueCategory::Sequence, ValueCategory::Scalar, ValueCategory::NoneValue]
        );
    }

    #[test]
    fn division_sites_recorded() {
        let result = parse_python("def divide(a, b):\n    return a / b\n").unwrap();
        assert_eq!(result.divisions.len(), 1);
        assert_eq!(result.divisions[0].denominator, "b");
        assert_eq!(result.divisions[0].line, 2);
        assert!(!result.divisions[0].floor);
    }

    #[test]
    fn main_block_literals_flagged() {
        let source = "def f(x):\n    return x\n\nif __name__ == \"__main__\":\n    f(42)\n";
        let result = parse_python(source).unwrap();
        assert!(result.main_block.is_some());
        let in_main: Vec<_> = result
            .numeric_literals
            .iter()
            .filter(|l| l.in_main_block)
            .collect();
        assert_eq!(in_main.len(), 1);
        assert_eq!(in_main[0].value, "42");
    }

    #[test]
    fn dict_vars_tracked() {
        let result = parse_python("item = {\"cost\": 3}\nprice = item.cost\n").unwrap();
        assert!(result.dict_vars.contains("item"));
    }

    #[test]
    fn return_literal_context() {
        let result = parse_python("def sort(x):\n    return [1, 2, 3]\n").unwrap();
        assert_eq!(result.sequence_literals.len(), 1);
        assert_eq!(result.sequence_literals[0].context, LiteralContext::Return);
        assert_eq!(result.sequence_literals[0].value, "[1, 2, 3]");
        // Constituents carry the same position.
        assert!(result
            .numeric_literals
            .iter()
            .all(|l| l.context == LiteralContext::Return));
    }

    #[test]
    fn identical_branches_normalized() {
        let source = "if flag:\n    y = compute()\nelse:\n    y = compute()\n";
        let result = parse_python(source).unwrap();
        assert_eq!(result.conditionals.len(), 1);
        let cond = &result.conditionals[0];
        assert_eq!(cond.alternative.as_deref(), Some(cond.consequence.as_str()));
    }
}
