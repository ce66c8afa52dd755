//! The built-in function table.
//!
//! Built-ins shadow user functions of the same name. The pure string and
//! number helpers live here; `print` and the history trio need interpreter
//! state and are dispatched from the evaluator, which looks names up
//! through [`Builtin::lookup`].

use crate::value::Value;

/// A built-in callable by name from programs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    Print,
    Previous,
    Next,
    History,
    ToNumber,
    Lines,
    Trim,
    Split,
    CharAt,
    Slice,
    ReadFile,
    ReadLines,
    NumArray,
}

impl Builtin {
    /// Maps a call-site name to its built-in, if any.
    pub fn lookup(name: &str) -> Option<Builtin> {
        Some(match name {
            "print" => Builtin::Print,
            "previous" => Builtin::Previous,
            "next" => Builtin::Next,
            "history" => Builtin::History,
            "toNumber" | "parseInt" | "parseNumber" => Builtin::ToNumber,
            "lines" => Builtin::Lines,
            "trim" => Builtin::Trim,
            "split" => Builtin::Split,
            "charAt" => Builtin::CharAt,
            "slice" => Builtin::Slice,
            "readFile" => Builtin::ReadFile,
            "readLines" => Builtin::ReadLines,
            "numArray" => Builtin::NumArray,
            _ => return None,
        })
    }

    /// The name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::Previous => "previous",
            Builtin::Next => "next",
            Builtin::History => "history",
            Builtin::ToNumber => "toNumber",
            Builtin::Lines => "lines",
            Builtin::Trim => "trim",
            Builtin::Split => "split",
            Builtin::CharAt => "charAt",
            Builtin::Slice => "slice",
            Builtin::ReadFile => "readFile",
            Builtin::ReadLines => "readLines",
            Builtin::NumArray => "numArray",
        }
    }
}

/// Splits on `\r\n`, `\n` or `\r` and drops one trailing empty line.
pub fn split_lines(text: &str) -> Value {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut parts: Vec<&str> = normalized.split('\n').collect();
    if parts.last() == Some(&"") {
        parts.pop();
    }
    Value::array_from_vec(parts.into_iter().map(Value::string).collect())
}

/// Splits by separator; the empty separator yields single characters.
pub fn split_text(text: &str, separator: &str) -> Value {
    let parts: Vec<Value> = if separator.is_empty() {
        text.chars().map(|c| Value::string(c.to_string())).collect()
    } else {
        text.split(separator).map(Value::string).collect()
    };
    Value::array_from_vec(parts)
}

/// Single character at 0-based index `i`, or `Undefined` out of range.
pub fn char_at(text: &str, i: f64) -> Value {
    if i.is_nan() || i < 0.0 || i.fract() != 0.0 {
        return Value::Undefined;
    }
    match text.chars().nth(i as usize) {
        Some(c) => Value::string(c.to_string()),
        None => Value::Undefined,
    }
}

/// Substring from `start`; negative starts count back from the end.
pub fn slice_text(text: &str, start: f64) -> Value {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len() as f64;
    if start.is_nan() {
        return Value::Undefined;
    }
    let begin = if start < 0.0 {
        (len + start).max(0.0)
    } else {
        start
    };
    if begin >= len {
        return Value::string("");
    }
    Value::string(chars[begin as usize..].iter().collect::<String>())
}

/// An array of `size` copies of `init`, keys starting at -1.
pub fn num_array(init: &Value, size: usize) -> Value {
    Value::array_from_vec(vec![init.clone(); size])
}
