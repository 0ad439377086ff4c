//! Python name whitelists shared by the detectors.

use rustc_hash::FxHashSet;
use std::sync::OnceLock;

/// Built-in functions, constants, and dunder names that always resolve.
pub const BUILTINS: &[&str] = &[
    // Built-in functions
    "abs", "all", "any", "ascii", "bin", "bool", "bytearray", "bytes", "callable", "chr",
    "classmethod", "compile", "complex", "delattr", "dict", "dir", "divmod", "enumerate", "eval",
    "exec", "filter", "float", "format", "frozenset", "getattr", "globals", "hasattr", "hash",
    "help", "hex", "id", "input", "int", "isinstance", "issubclass", "iter", "len", "list",
    "locals", "map", "max", "memoryview", "min", "next", "object", "oct", "open", "ord", "pow",
    "print", "property", "range", "repr", "reversed", "round", "set", "setattr", "slice",
    "sorted", "staticmethod", "str", "sum", "super", "tuple", "type", "vars", "zip", "__import__",
    // Built-in exception types commonly referenced in except clauses
    "Exception", "ValueError", "TypeError", "KeyError", "IndexError", "AttributeError",
    "NameError", "ZeroDivisionError", "RuntimeError", "StopIteration", "NotImplementedError",
    "OSError", "IOError",
    // Built-in constants
    "False", "True", "None", "NotImplemented", "Ellipsis", "__debug__",
    // Dunder variables always available
    "__name__", "__main__", "__file__", "__doc__", "__package__", "__loader__", "__spec__",
    "__annotations__", "__builtins__", "__cached__", "__dict__", "__class__",
    // Conventional receivers inside class bodies
    "self", "cls",
];

/// Standard-library and ubiquitous third-party modules that code routinely
/// references without being hallucinations.
pub const COMMON_MODULES: &[&str] = &[
    "math", "os", "sys", "re", "json", "time", "datetime", "random", "collections", "itertools",
    "functools", "numpy", "pandas", "logging", "pathlib", "io", "typing", "copy", "pickle",
];

/// Combined whitelist as a set, built once.
pub fn whitelist() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        BUILTINS
            .iter()
            .chain(COMMON_MODULES.iter())
            .copied()
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitelist_covers_core_builtins() {
        let set = whitelist();
        for name in ["len", "print", "range", "None", "math", "self"] {
            assert!(set.contains(name), "{name} missing from whitelist");
        }
    }

    #[test]
    fn whitelist_has_expected_scale() {
        // The enumerated builtin whitelist is specified at roughly 60 names
        // plus constants and dunders.
        assert!(BUILTINS.len() >= 60);
    }
}
