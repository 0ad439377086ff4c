//! Instrumented harness builder.
//!
//! The harness executes the user program inside an isolated namespace so
//! no user-defined name can shadow its own bookkeeping; every harness
//! variable carries the `_mg_` prefix. After module execution it smoke
//! calls each top-level function once with representative arguments. It
//! catches the first uncaught exception and always prints exactly one JSON
//! object as its final stdout line — it must never crash the sandbox.

use mirage_analysis::parser::types::FunctionInfo;
use serde_json::{json, Value};

/// Parameter names that read as a sequence input.
const SEQUENCE_PARAMS: &[&str] = &[
    "nums", "numbers", "items", "values", "data", "lst", "arr", "list", "elements", "xs",
];
/// Parameter names that read as a divisor; exercised with zero.
const DIVISOR_PARAMS: &[&str] = &["b", "divisor", "denom", "denominator"];
/// Parameter names that read as text.
const TEXT_PARAMS: &[&str] = &["s", "text", "string", "word", "name", "msg"];

/// Pick a representative smoke argument for one parameter.
fn smoke_arg(param: &str) -> Value {
    let lower = param.to_lowercase();
    if SEQUENCE_PARAMS.contains(&lower.as_str()) {
        json!([1, 2, 3])
    } else if DIVISOR_PARAMS.contains(&lower.as_str()) {
        json!(0)
    } else if TEXT_PARAMS.contains(&lower.as_str()) {
        json!("sample")
    } else {
        json!(10)
    }
}

/// Build the smoke-call plan: each top-level function called once with
/// arguments for its non-default parameters.
pub fn call_plan(functions: &[FunctionInfo]) -> Vec<(String, Vec<Value>)> {
    functions
        .iter()
        .filter(|f| !f.is_method && !f.name.is_empty() && f.params.len() <= 3)
        .map(|f| {
            let args = f
                .params
                .iter()
                .take_while(|p| !p.has_default)
                .map(|p| smoke_arg(&p.name))
                .collect();
            (f.name.clone(), args)
        })
        .collect()
}

/// Render the full harness script around the user program.
pub fn build(code: &str, functions: &[FunctionInfo]) -> String {
    let code_literal = serde_json::to_string(code).expect("strings always encode");
    let plan = call_plan(functions);
    let plan_json = serde_json::to_string(&plan).expect("plan always encodes");
    let plan_literal = serde_json::to_string(&plan_json).expect("strings always encode");

    format!(
        r#"import json as _mg_json, traceback as _mg_traceback
_mg_code = {code_literal}
_mg_calls = _mg_json.loads({plan_literal})
_mg_result = {{"success": False, "output": "", "error": None, "error_type": None, "line": None}}
_mg_ns = {{}}
try:
    exec(compile(_mg_code, "<target>", "exec"), _mg_ns)
    for _mg_name, _mg_args in _mg_calls:
        _mg_fn = _mg_ns.get(_mg_name)
        if callable(_mg_fn):
            _mg_fn(*_mg_args)
    _mg_result["success"] = True
    _mg_result["output"] = "executed"
except BaseException as _mg_e:
    _mg_result["error_type"] = type(_mg_e).__name__
    _mg_result["error"] = str(_mg_e)
    for _mg_frame in _mg_traceback.extract_tb(_mg_e.__traceback__):
        if _mg_frame.filename == "<target>":
            _mg_result["line"] = _mg_frame.lineno
print(_mg_json.dumps(_mg_result))
"#
    )
}
