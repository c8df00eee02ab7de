use std::num::ParseIntError;

/// Parses a boolean using the permissive token set.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and `0`, `f`, `F`, `FALSE`,
/// `false`, `False`. Anything else, including mixed case like `tRuE`, is
/// rejected.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Parses a base-10 integer with an optional leading sign
pub fn parse_int(value: &str) -> Result<i64, ParseIntError> {
    value.parse()
}
