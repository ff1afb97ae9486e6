/// A stable diagnostic identifier, e.g. `E1003` for an unterminated string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagnosticCode {
    pub number: u32,
    pub name: &'static str,
}

impl DiagnosticCode {
    pub const fn new(number: u32, name: &'static str) -> Self {
        Self { number, name }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "E{:04}[{}]", self.number, self.name)
    }
}

// Lex errors (spec.md §7: invalid hex, invalid exponent, unterminated
// string, unknown character).
pub const E_LEX_INVALID_HEX: DiagnosticCode = DiagnosticCode::new(1001, "invalid_hex");
pub const E_LEX_INVALID_EXPONENT: DiagnosticCode = DiagnosticCode::new(1002, "invalid_exponent");
pub const E_LEX_UNTERMINATED_STRING: DiagnosticCode = DiagnosticCode::new(1003, "unterminated_string");
pub const E_LEX_UNKNOWN_CHAR: DiagnosticCode = DiagnosticCode::new(1004, "unknown_char");

// Parse errors.
pub const E_PARSE_EXPECTED_TOKEN: DiagnosticCode = DiagnosticCode::new(2001, "expected_token");
pub const E_PARSE_UNEXPECTED_STMT: DiagnosticCode = DiagnosticCode::new(2002, "unexpected_statement");
pub const E_PARSE_DUPLICATE_DECL: DiagnosticCode = DiagnosticCode::new(2003, "duplicate_declaration");
pub const E_PARSE_MALFORMED_FN: DiagnosticCode = DiagnosticCode::new(2004, "malformed_function_header");

// Resolve (name resolution) errors.
pub const E_RESOLVE_UNKNOWN_IDENT: DiagnosticCode = DiagnosticCode::new(3001, "unknown_identifier");
pub const E_RESOLVE_DUPLICATE_IN_SCOPE: DiagnosticCode = DiagnosticCode::new(3002, "duplicate_in_scope");

// Capacity errors.
pub const E_CAPACITY_TOO_MANY_CONSTS: DiagnosticCode = DiagnosticCode::new(4001, "too_many_constants");
pub const E_CAPACITY_TOO_MANY_LOCALS: DiagnosticCode = DiagnosticCode::new(4002, "too_many_locals");
pub const E_CAPACITY_CODE_TOO_LARGE: DiagnosticCode = DiagnosticCode::new(4003, "code_too_large");

// Runtime errors (spec.md §7: argument/parameter/store/return type
// mismatch, reading an uninitialised local, integer division by zero,
// evaluation/call stack exhaustion).
pub const E_RUNTIME_TYPE_MISMATCH: DiagnosticCode = DiagnosticCode::new(5001, "type_mismatch");
pub const E_RUNTIME_UNINITIALISED: DiagnosticCode = DiagnosticCode::new(5002, "uninitialised_variable");
pub const E_RUNTIME_DIV_BY_ZERO: DiagnosticCode = DiagnosticCode::new(5003, "division_by_zero");
pub const E_RUNTIME_STACK_OVERFLOW: DiagnosticCode = DiagnosticCode::new(5004, "stack_overflow");

// Warnings.
pub const W_UNKNOWN_ESCAPE: DiagnosticCode = DiagnosticCode::new(9001, "unknown_escape");
