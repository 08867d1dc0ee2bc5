//! Scalar typing.
//!
//! Plain (unquoted) scalars are resolved with YAML 1.1 rules: the bool, null,
//! integer and float spellings below. Quoted and block scalars are strings unless
//! an explicit core tag (`!!int`, `!!bool`, ...) says otherwise.

use crate::node::Scalar;

/// Handle `yaml-rust2` reports for the `!!` shorthand.
const CORE_TAG_HANDLE: &str = "tag:yaml.org,2002:";

/// Resolve a plain scalar to its typed value.
pub(crate) fn resolve_plain(value: &str) -> Scalar {
    match value {
        "" | "~" | "null" | "Null" | "NULL" => return Scalar::Null,
        "y" | "Y" | "yes" | "Yes" | "YES" | "true" | "True" | "TRUE" | "on" | "On" | "ON" => {
            return Scalar::Bool(true);
        }
        "n" | "N" | "no" | "No" | "NO" | "false" | "False" | "FALSE" | "off" | "Off" | "OFF" => {
            return Scalar::Bool(false);
        }
        _ => {}
    }

    if let Some(x) = parse_special_float(value) {
        return Scalar::Float(x);
    }

    if !value.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '.')) {
        return Scalar::String(value.to_string());
    }

    let digits = value.replace('_', "");
    if let Some(i) = parse_int(&digits) {
        return Scalar::Int(i);
    }
    if is_float_syntax(&digits) {
        if let Ok(x) = digits.parse::<f64>() {
            return Scalar::Float(x);
        }
    }

    Scalar::String(value.to_string())
}

/// Resolve a scalar carrying an explicit tag.
///
/// Returns `None` for a core tag whose value does not fit it (`!!int abc`).
/// Unknown and application tags leave the scalar untyped, as a string.
pub(crate) fn resolve_tagged(handle: &str, suffix: &str, value: &str) -> Option<Scalar> {
    if handle != CORE_TAG_HANDLE && handle != "!!" {
        return Some(Scalar::String(value.to_string()));
    }
    match suffix {
        "str" => Some(Scalar::String(value.to_string())),
        "null" => matches!(value, "" | "~" | "null" | "Null" | "NULL").then_some(Scalar::Null),
        "bool" => match resolve_plain(value) {
            b @ Scalar::Bool(_) => Some(b),
            _ => None,
        },
        "int" => parse_int(&value.replace('_', "")).map(Scalar::Int),
        "float" => {
            let digits = value.replace('_', "");
            parse_special_float(value)
                .or_else(|| digits.parse::<f64>().ok())
                .map(Scalar::Float)
        }
        _ => Some(Scalar::String(value.to_string())),
    }
}

/// Integer spellings: decimal, `0x` hex, `0o`/leading-zero octal, `0b` binary,
/// each with an optional sign.
fn parse_int(s: &str) -> Option<i64> {
    let (negative, unsigned) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if unsigned.is_empty() {
        return None;
    }

    let (radix, body) = if let Some(hex) = unsigned.strip_prefix("0x") {
        (16, hex)
    } else if let Some(oct) = unsigned.strip_prefix("0o") {
        (8, oct)
    } else if let Some(bin) = unsigned.strip_prefix("0b") {
        (2, bin)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };

    if body.is_empty() || !body.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let magnitude = u64::from_str_radix(body, radix).ok()?;
    if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}

/// `[-+]?(\.[0-9]+|[0-9]+(\.[0-9]*)?)([eE][-+]?[0-9]+)?`
fn is_float_syntax(s: &str) -> bool {
    let s = s.strip_prefix(['-', '+']).unwrap_or(s);
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };

    let mantissa_ok = match mantissa.split_once('.') {
        Some(("", frac)) => !frac.is_empty() && frac.bytes().all(|b| b.is_ascii_digit()),
        Some((int, frac)) => {
            !int.is_empty()
                && int.bytes().all(|b| b.is_ascii_digit())
                && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => !mantissa.is_empty() && mantissa.bytes().all(|b| b.is_ascii_digit()),
    };

    let exponent_ok = match exponent {
        None => true,
        Some(exp) => {
            let digits = exp.strip_prefix(['-', '+']).unwrap_or(exp);
            !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
        }
    };

    mantissa_ok && exponent_ok
}

fn parse_special_float(s: &str) -> Option<f64> {
    match s {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => Some(f64::NAN),
        _ => None,
    }
}
