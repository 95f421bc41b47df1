//! The built-in function library.
//!
//! Functions take zero or more values and return a value or an error
//! message; the evaluator attaches the call position. Arity mismatches
//! are errors, and type mismatches name the offending kind. None of the
//! built-ins mutate their inputs: `set`, `append`, `merge` and friends
//! return copies.

use std::cell::RefCell;
use std::rc::Rc;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;

use crate::output;
use crate::scope::ScopeRef;
use crate::value::Value;

/// Registers the standard library into a scope's function registry.
pub fn register_builtins(scope: &ScopeRef) {
    let s = scope.borrow();

    // String functions
    s.set_function("upper", Rc::new(upper));
    s.set_function("lower", Rc::new(lower));
    s.set_function("trim", Rc::new(trim));
    s.set_function("quote", Rc::new(quote));
    s.set_function("nindent", Rc::new(nindent));
    s.set_function("contains", Rc::new(contains));
    s.set_function("trunc", Rc::new(trunc));
    s.set_function("trimSuffix", Rc::new(trim_suffix));
    s.set_function("trimPrefix", Rc::new(trim_prefix));
    s.set_function("replace", Rc::new(replace));
    s.set_function("printf", Rc::new(printf));
    s.set_function("split", Rc::new(split));
    s.set_function("join", Rc::new(join));
    s.set_function("hasPrefix", Rc::new(has_prefix));
    s.set_function("hasSuffix", Rc::new(has_suffix));
    s.set_function("repeat", Rc::new(repeat));

    // Conversion functions
    s.set_function("toString", Rc::new(to_string));
    s.set_function("toJson", Rc::new(to_json));

    // Utility functions
    s.set_function("default", Rc::new(default_fn));
    s.set_function("len", Rc::new(len));
    s.set_function("has", Rc::new(has));
    s.set_function("coalesce", Rc::new(coalesce));
    s.set_function("empty", Rc::new(empty));

    // Math functions
    s.set_function("round", Rc::new(round));
    s.set_function("floor", Rc::new(floor));
    s.set_function("ceil", Rc::new(ceil));

    // List functions
    s.set_function("first", Rc::new(first));
    s.set_function("last", Rc::new(last));
    s.set_function("initial", Rc::new(initial));
    s.set_function("rest", Rc::new(rest));
    s.set_function("append", Rc::new(append));
    s.set_function("prepend", Rc::new(prepend));
    s.set_function("concat", Rc::new(concat));
    s.set_function("reverse", Rc::new(reverse));
    s.set_function("uniq", Rc::new(uniq));

    // Object functions
    s.set_function("keys", Rc::new(keys));
    s.set_function("values", Rc::new(values));
    s.set_function("pick", Rc::new(pick));
    s.set_function("omit", Rc::new(omit));
    s.set_function("merge", Rc::new(merge));
    s.set_function("get", Rc::new(get));
    s.set_function("set", Rc::new(set));

    // Encoding functions
    s.set_function("b64enc", Rc::new(b64enc));
    s.set_function("b64dec", Rc::new(b64dec));
}

fn expect_args(name: &str, args: &[Value], n: usize) -> Result<(), String> {
    if args.len() != n {
        let plural = if n == 1 { "" } else { "s" };
        return Err(format!(
            "{} expects {} argument{}, got {}",
            name,
            n,
            plural,
            args.len()
        ));
    }
    Ok(())
}

fn as_array(name: &str, val: &Value) -> Result<Rc<RefCell<Vec<Value>>>, String> {
    match val {
        Value::Array(arr) => Ok(arr.clone()),
        other => Err(format!("{} expects an array, got {}", name, other.type_name())),
    }
}

fn as_object(
    name: &str,
    val: &Value,
) -> Result<Rc<RefCell<std::collections::HashMap<String, Value>>>, String> {
    match val {
        Value::Object(obj) => Ok(obj.clone()),
        other => Err(format!(
            "{} expects an object, got {}",
            name,
            other.type_name()
        )),
    }
}

// String functions

fn upper(args: &[Value]) -> Result<Value, String> {
    expect_args("upper", args, 1)?;
    Ok(Value::String(args[0].to_display()?.to_uppercase()))
}

fn lower(args: &[Value]) -> Result<Value, String> {
    expect_args("lower", args, 1)?;
    Ok(Value::String(args[0].to_display()?.to_lowercase()))
}

fn trim(args: &[Value]) -> Result<Value, String> {
    expect_args("trim", args, 1)?;
    Ok(Value::String(args[0].to_display()?.trim().to_string()))
}

/// `quote(v)` wraps the string form of `v` in double quotes with
/// JSON-compatible escaping, so the result unquotes with any JSON parser.
fn quote(args: &[Value]) -> Result<Value, String> {
    expect_args("quote", args, 1)?;
    let s = args[0].to_display()?;
    serde_json::to_string(&s)
        .map(Value::String)
        .map_err(|e| format!("quote: {}", e))
}

/// `nindent(s, n)` prefixes each non-empty line of `s` with `n` spaces.
fn nindent(args: &[Value]) -> Result<Value, String> {
    expect_args("nindent", args, 2)?;
    let s = args[0].to_display()?;
    let n = args[1].to_number()?;

    let indent = " ".repeat(n.max(0.0) as usize);
    let lines: Vec<String> = s
        .split('\n')
        .map(|line| {
            if line.is_empty() {
                line.to_string()
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect();

    Ok(Value::String(lines.join("\n")))
}

/// `contains(needle, haystack)` - pipe-friendly argument order:
/// `s | contains("x")` tests whether `s` contains `"x"`.
fn contains(args: &[Value]) -> Result<Value, String> {
    expect_args("contains", args, 2)?;
    let needle = args[0].to_display()?;
    let haystack = args[1].to_display()?;
    Ok(Value::Bool(haystack.contains(&needle)))
}

fn trunc(args: &[Value]) -> Result<Value, String> {
    expect_args("trunc", args, 2)?;
    let s = args[0].to_display()?;
    let max_len = args[1].to_number()?.max(0.0) as usize;

    if s.chars().count() <= max_len {
        return Ok(Value::String(s));
    }
    Ok(Value::String(s.chars().take(max_len).collect()))
}

fn trim_suffix(args: &[Value]) -> Result<Value, String> {
    expect_args("trimSuffix", args, 2)?;
    let s = args[0].to_display()?;
    let suffix = args[1].to_display()?;
    Ok(Value::String(
        s.strip_suffix(&suffix).unwrap_or(&s).to_string(),
    ))
}

fn trim_prefix(args: &[Value]) -> Result<Value, String> {
    expect_args("trimPrefix", args, 2)?;
    let s = args[0].to_display()?;
    let prefix = args[1].to_display()?;
    Ok(Value::String(
        s.strip_prefix(&prefix).unwrap_or(&s).to_string(),
    ))
}

/// `replace(s, old, new)` replaces all occurrences.
fn replace(args: &[Value]) -> Result<Value, String> {
    expect_args("replace", args, 3)?;
    let s = args[0].to_display()?;
    let old = args[1].to_display()?;
    let new = args[2].to_display()?;
    Ok(Value::String(s.replace(&old, &new)))
}

/// `printf(format, args...)` with the verbs `%s`, `%d`, `%f`, `%v`, `%q`,
/// and `%%`.
fn printf(args: &[Value]) -> Result<Value, String> {
    if args.is_empty() {
        return Err(format!("printf expects at least 1 argument, got {}", args.len()));
    }
    let format = args[0].to_display()?;
    Ok(Value::String(sprintf(&format, &args[1..])))
}

fn sprintf(format: &str, args: &[Value]) -> String {
    let mut out = String::new();
    let mut chars = format.chars().peekable();
    let mut next = 0usize;

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        match chars.peek().copied() {
            Some('%') => {
                out.push('%');
                chars.next();
            }
            Some(verb @ ('s' | 'v' | 'd' | 'f' | 'q')) => {
                chars.next();
                let Some(val) = args.get(next) else {
                    out.push_str("%!(MISSING)");
                    continue;
                };
                next += 1;
                match verb {
                    's' | 'v' => out.push_str(&val.to_string()),
                    'd' => {
                        let n = val.to_number().unwrap_or(0.0);
                        out.push_str(&(n as i64).to_string());
                    }
                    'f' => {
                        let n = val.to_number().unwrap_or(0.0);
                        out.push_str(&n.to_string());
                    }
                    'q' => {
                        let quoted =
                            serde_json::to_string(&val.to_string()).unwrap_or_default();
                        out.push_str(&quoted);
                    }
                    _ => {}
                }
            }
            _ => out.push('%'),
        }
    }

    out
}

fn split(args: &[Value]) -> Result<Value, String> {
    expect_args("split", args, 2)?;
    let sep = args[0].to_display()?;
    let s = args[1].to_display()?;

    let parts: Vec<Value> = if sep.is_empty() {
        s.chars().map(|c| Value::String(c.to_string())).collect()
    } else {
        s.split(&sep).map(Value::string).collect()
    };

    Ok(Value::array(parts))
}

fn join(args: &[Value]) -> Result<Value, String> {
    expect_args("join", args, 2)?;
    let sep = args[0].to_display()?;
    let arr = match &args[1] {
        Value::Array(arr) => arr.clone(),
        other => {
            return Err(format!(
                "join expects second argument to be an array, got {}",
                other.type_name()
            ))
        }
    };

    let parts: Vec<String> = arr
        .borrow()
        .iter()
        .map(|v| v.to_display().unwrap_or_default())
        .collect();

    Ok(Value::String(parts.join(&sep)))
}

fn has_prefix(args: &[Value]) -> Result<Value, String> {
    expect_args("hasPrefix", args, 2)?;
    let s = args[0].to_display()?;
    let prefix = args[1].to_display()?;
    Ok(Value::Bool(s.starts_with(&prefix)))
}

fn has_suffix(args: &[Value]) -> Result<Value, String> {
    expect_args("hasSuffix", args, 2)?;
    let s = args[0].to_display()?;
    let suffix = args[1].to_display()?;
    Ok(Value::Bool(s.ends_with(&suffix)))
}

/// `repeat(count, s)`
fn repeat(args: &[Value]) -> Result<Value, String> {
    expect_args("repeat", args, 2)?;
    let count = args[0].to_number()?.max(0.0) as usize;
    let s = args[1].to_display()?;
    Ok(Value::String(s.repeat(count)))
}

// Conversion functions

fn to_string(args: &[Value]) -> Result<Value, String> {
    expect_args("toString", args, 1)?;
    Ok(Value::String(args[0].to_display()?))
}

fn to_json(args: &[Value]) -> Result<Value, String> {
    expect_args("toJson", args, 1)?;
    Ok(Value::String(output::to_json(&args[0])))
}

// Utility functions

/// `default(def, v)` returns `def` when `v` is null or falsy, else `v`.
fn default_fn(args: &[Value]) -> Result<Value, String> {
    expect_args("default", args, 2)?;
    if !args[1].is_truthy() {
        return Ok(args[0].clone());
    }
    Ok(args[1].clone())
}

fn len(args: &[Value]) -> Result<Value, String> {
    expect_args("len", args, 1)?;
    match &args[0] {
        Value::String(s) => Ok(Value::Number(s.len() as f64)),
        Value::Array(arr) => Ok(Value::Number(arr.borrow().len() as f64)),
        Value::Object(obj) => Ok(Value::Number(obj.borrow().len() as f64)),
        other => Err(format!("len does not support {}", other.type_name())),
    }
}

/// `has(x, arr)` tests membership; containers match by identity.
fn has(args: &[Value]) -> Result<Value, String> {
    expect_args("has", args, 2)?;
    let arr = match &args[1] {
        Value::Array(arr) => arr.clone(),
        other => {
            return Err(format!(
                "has expects second argument to be an array, got {}",
                other.type_name()
            ))
        }
    };

    let exists = arr.borrow().iter().any(|el| *el == args[0]);
    Ok(Value::Bool(exists))
}

/// `coalesce(values...)` returns the first non-null truthy value, or the
/// last value when all are null or empty.
fn coalesce(args: &[Value]) -> Result<Value, String> {
    if args.is_empty() {
        return Err("coalesce expects at least 1 argument".to_string());
    }

    for arg in args {
        if !matches!(arg, Value::Null) && arg.is_truthy() {
            return Ok(arg.clone());
        }
    }

    Ok(args[args.len() - 1].clone())
}

fn empty(args: &[Value]) -> Result<Value, String> {
    expect_args("empty", args, 1)?;
    let result = match &args[0] {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(arr) => arr.borrow().is_empty(),
        Value::Object(obj) => obj.borrow().is_empty(),
        _ => false,
    };
    Ok(Value::Bool(result))
}

// Math functions

fn round(args: &[Value]) -> Result<Value, String> {
    expect_args("round", args, 1)?;
    Ok(Value::Number(args[0].to_number()?.round()))
}

fn floor(args: &[Value]) -> Result<Value, String> {
    expect_args("floor", args, 1)?;
    Ok(Value::Number(args[0].to_number()?.floor()))
}

fn ceil(args: &[Value]) -> Result<Value, String> {
    expect_args("ceil", args, 1)?;
    Ok(Value::Number(args[0].to_number()?.ceil()))
}

// List functions

fn first(args: &[Value]) -> Result<Value, String> {
    expect_args("first", args, 1)?;
    let arr = as_array("first", &args[0])?;
    let arr = arr.borrow();
    arr.first()
        .cloned()
        .ok_or_else(|| "first: array is empty".to_string())
}

fn last(args: &[Value]) -> Result<Value, String> {
    expect_args("last", args, 1)?;
    let arr = as_array("last", &args[0])?;
    let arr = arr.borrow();
    arr.last()
        .cloned()
        .ok_or_else(|| "last: array is empty".to_string())
}

/// `initial(arr)` - all elements but the last.
fn initial(args: &[Value]) -> Result<Value, String> {
    expect_args("initial", args, 1)?;
    let arr = as_array("initial", &args[0])?;
    let arr = arr.borrow();
    if arr.is_empty() {
        return Ok(Value::array(Vec::new()));
    }
    Ok(Value::array(arr[..arr.len() - 1].to_vec()))
}

/// `rest(arr)` - all elements but the first.
fn rest(args: &[Value]) -> Result<Value, String> {
    expect_args("rest", args, 1)?;
    let arr = as_array("rest", &args[0])?;
    let arr = arr.borrow();
    if arr.is_empty() {
        return Ok(Value::array(Vec::new()));
    }
    Ok(Value::array(arr[1..].to_vec()))
}

fn append(args: &[Value]) -> Result<Value, String> {
    if args.len() < 2 {
        return Err(format!("append expects at least 2 arguments, got {}", args.len()));
    }
    let arr = match &args[0] {
        Value::Array(arr) => arr.clone(),
        other => {
            return Err(format!(
                "append expects first argument to be an array, got {}",
                other.type_name()
            ))
        }
    };

    let mut result = arr.borrow().clone();
    result.extend(args[1..].iter().cloned());
    Ok(Value::array(result))
}

fn prepend(args: &[Value]) -> Result<Value, String> {
    if args.len() < 2 {
        return Err(format!("prepend expects at least 2 arguments, got {}", args.len()));
    }
    let arr = match &args[0] {
        Value::Array(arr) => arr.clone(),
        other => {
            return Err(format!(
                "prepend expects first argument to be an array, got {}",
                other.type_name()
            ))
        }
    };

    let mut result: Vec<Value> = args[1..].to_vec();
    result.extend(arr.borrow().iter().cloned());
    Ok(Value::array(result))
}

fn concat(args: &[Value]) -> Result<Value, String> {
    let mut result = Vec::new();
    for arg in args {
        let arr = match arg {
            Value::Array(arr) => arr.clone(),
            other => {
                return Err(format!(
                    "concat expects all arguments to be arrays, got {}",
                    other.type_name()
                ))
            }
        };
        result.extend(arr.borrow().iter().cloned());
    }
    Ok(Value::array(result))
}

fn reverse(args: &[Value]) -> Result<Value, String> {
    expect_args("reverse", args, 1)?;
    let arr = as_array("reverse", &args[0])?;
    let mut result = arr.borrow().clone();
    result.reverse();
    Ok(Value::array(result))
}

/// `uniq(arr)` removes duplicates, keyed by string representation.
fn uniq(args: &[Value]) -> Result<Value, String> {
    expect_args("uniq", args, 1)?;
    let arr = as_array("uniq", &args[0])?;

    let mut seen = std::collections::HashSet::new();
    let mut result = Vec::new();
    for val in arr.borrow().iter() {
        let key = val.to_display().unwrap_or_default();
        if seen.insert(key) {
            result.push(val.clone());
        }
    }

    Ok(Value::array(result))
}

// Object functions

fn keys(args: &[Value]) -> Result<Value, String> {
    expect_args("keys", args, 1)?;
    let obj = as_object("keys", &args[0])?;

    let mut names: Vec<String> = obj.borrow().keys().cloned().collect();
    names.sort();

    Ok(Value::array(names.into_iter().map(Value::String).collect()))
}

fn values(args: &[Value]) -> Result<Value, String> {
    expect_args("values", args, 1)?;
    let obj = as_object("values", &args[0])?;

    let mut fields: Vec<(String, Value)> = obj
        .borrow()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(Value::array(fields.into_iter().map(|(_, v)| v).collect()))
}

fn pick(args: &[Value]) -> Result<Value, String> {
    if args.len() < 2 {
        return Err(format!("pick expects at least 2 arguments, got {}", args.len()));
    }
    let obj = as_object("pick", &args[0])?;

    let result = Value::object();
    for key_arg in &args[1..] {
        let key = key_arg.to_display()?;
        if let Some(val) = obj.borrow().get(&key) {
            result.set_field(key, val.clone());
        }
    }

    Ok(result)
}

fn omit(args: &[Value]) -> Result<Value, String> {
    if args.len() < 2 {
        return Err(format!("omit expects at least 2 arguments, got {}", args.len()));
    }
    let obj = as_object("omit", &args[0])?;

    let mut omitted = std::collections::HashSet::new();
    for key_arg in &args[1..] {
        omitted.insert(key_arg.to_display()?);
    }

    let result = Value::object();
    for (key, val) in obj.borrow().iter() {
        if !omitted.contains(key) {
            result.set_field(key.clone(), val.clone());
        }
    }

    Ok(result)
}

/// `merge(objs...)` - later keys win. Returns a new object.
fn merge(args: &[Value]) -> Result<Value, String> {
    let result = Value::object();
    for arg in args {
        let obj = match arg {
            Value::Object(obj) => obj.clone(),
            other => {
                return Err(format!(
                    "merge expects all arguments to be objects, got {}",
                    other.type_name()
                ))
            }
        };
        for (key, val) in obj.borrow().iter() {
            result.set_field(key.clone(), val.clone());
        }
    }
    Ok(result)
}

fn get(args: &[Value]) -> Result<Value, String> {
    expect_args("get", args, 2)?;
    let obj = as_object("get", &args[0])?;
    let key = args[1].to_display()?;

    let value = obj.borrow().get(&key).cloned().unwrap_or(Value::Null);
    Ok(value)
}

/// `set(obj, key, val)` returns a copy with the field set; the original
/// object is untouched.
fn set(args: &[Value]) -> Result<Value, String> {
    expect_args("set", args, 3)?;
    let obj = as_object("set", &args[0])?;
    let key = args[1].to_display()?;

    let result = Value::object();
    for (k, v) in obj.borrow().iter() {
        result.set_field(k.clone(), v.clone());
    }
    result.set_field(key, args[2].clone());

    Ok(result)
}

// Encoding functions

fn b64enc(args: &[Value]) -> Result<Value, String> {
    expect_args("b64enc", args, 1)?;
    let s = args[0].to_display()?;
    Ok(Value::String(BASE64_STANDARD.encode(s.as_bytes())))
}

fn b64dec(args: &[Value]) -> Result<Value, String> {
    expect_args("b64dec", args, 1)?;
    let s = args[0].to_display()?;

    let decoded = BASE64_STANDARD
        .decode(s.as_bytes())
        .map_err(|e| format!("b64dec: {}", e))?;

    String::from_utf8(decoded)
        .map(Value::String)
        .map_err(|e| format!("b64dec: {}", e))
}
