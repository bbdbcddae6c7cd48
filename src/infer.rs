//! Per-column scalar type inference.
//!
//! Given the raw string tokens observed for one column, [`infer_dtype`] decides
//! the narrowest dtype consistent with every token. Precedence is fixed:
//! int32 > float32 > boolean > string. A column containing any token that is
//! neither numeric nor boolean is entirely [`DType::Utf8`]; there is no
//! per-value mixed typing.

use crate::types::DType;

/// Decide the narrowest dtype consistent with every token in a column.
///
/// Empty (or whitespace-only) tokens are null placeholders: they never affect
/// the outcome. A column with no non-empty tokens falls back to
/// [`DType::Utf8`].
pub fn infer_dtype<'a, I>(tokens: I) -> DType
where
    I: IntoIterator<Item = &'a str>,
{
    let mut saw_value = false;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;

    for raw in tokens {
        let token = raw.trim();
        if token.is_empty() {
            continue;
        }
        saw_value = true;

        if all_int && !is_int_literal(token) {
            all_int = false;
        }
        if all_float && !is_float_literal(token) {
            all_float = false;
        }
        if all_bool && !is_bool_literal(token) {
            all_bool = false;
        }
        if !all_int && !all_float && !all_bool {
            return DType::Utf8;
        }
    }

    if !saw_value {
        return DType::Utf8;
    }
    if all_int {
        DType::Int32
    } else if all_float {
        DType::Float32
    } else if all_bool {
        DType::Bool
    } else {
        DType::Utf8
    }
}

fn is_int_literal(token: &str) -> bool {
    token.parse::<i32>().is_ok()
}

fn is_float_literal(token: &str) -> bool {
    // `f32::from_str` accepts spellings like "inf" and "NaN"; a numeric
    // literal must contain a digit.
    token.parse::<f32>().is_ok() && token.bytes().any(|b| b.is_ascii_digit())
}

fn is_bool_literal(token: &str) -> bool {
    token.eq_ignore_ascii_case("true") || token.eq_ignore_ascii_case("false")
}
