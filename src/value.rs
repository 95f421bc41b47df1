use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A runtime value in the Thyme data model.
///
/// Six kinds: string, number (64-bit float), bool, null, array, object.
/// Arrays and objects are heap entities shared by handle: cloning a
/// `Value` clones the handle, not the contents, and two container values
/// are equal only if they are the same entity. Scalars compare by value.
///
/// # Examples
///
/// ```
/// use thyme_lang::Value;
///
/// let n = Value::Number(42.0);
/// let s = Value::string("hello");
///
/// let arr = Value::array(vec![n.clone(), s]);
/// let alias = arr.clone();
/// assert_eq!(arr, alias); // same entity
///
/// let other = Value::array(vec![n]);
/// assert_ne!(arr, other); // equal contents, different entity
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// The null value
    Null,

    /// A boolean
    Bool(bool),

    /// A number (64-bit float)
    Number(f64),

    /// A UTF-8 string
    String(String),

    /// An ordered sequence of values, shared by handle
    Array(Rc<RefCell<Vec<Value>>>),

    /// A keyed record, shared by handle
    Object(Rc<RefCell<HashMap<String, Value>>>),
}

impl Value {
    /// Builds a string value.
    pub fn string(s: impl Into<String>) -> Value {
        Value::String(s.into())
    }

    /// Builds an array value from its elements.
    pub fn array(elements: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    /// Builds an empty object value.
    pub fn object() -> Value {
        Value::Object(Rc::new(RefCell::new(HashMap::new())))
    }

    /// Builds an object value from key-value pairs.
    pub fn object_from(pairs: Vec<(String, Value)>) -> Value {
        Value::Object(Rc::new(RefCell::new(pairs.into_iter().collect())))
    }

    /// A human-readable name for this value's kind, used in error
    /// messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// The truthiness predicate used by `if`, `&&`, `||`, and `!`.
    ///
    /// Null, false, zero, the empty string, and empty containers are
    /// falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Array(arr) => !arr.borrow().is_empty(),
            Value::Object(obj) => !obj.borrow().is_empty(),
        }
    }

    /// Coerces a scalar to its string form. Containers do not coerce.
    pub fn to_display(&self) -> Result<String, String> {
        match self {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(format_number(*n)),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Null => Ok("null".to_string()),
            other => Err(format!("cannot convert {} to string", other.type_name())),
        }
    }

    /// Coerces a value to a number: numbers pass through, strings parse,
    /// booleans map to 0/1, null maps to 0. Containers do not coerce.
    pub fn to_number(&self) -> Result<f64, String> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::String(s) => s
                .parse::<f64>()
                .map_err(|_| format!("cannot convert string {:?} to number", s)),
            Value::Bool(true) => Ok(1.0),
            Value::Bool(false) => Ok(0.0),
            Value::Null => Ok(0.0),
            other => Err(format!("cannot convert {} to number", other.type_name())),
        }
    }

    /// Retrieves a field from an object value, if this is an object and
    /// the field exists.
    pub fn get_field(&self, key: &str) -> Option<Value> {
        match self {
            Value::Object(obj) => obj.borrow().get(key).cloned(),
            _ => None,
        }
    }

    /// Sets a field on an object value. No-op for other kinds.
    pub fn set_field(&self, key: impl Into<String>, val: Value) {
        if let Value::Object(obj) = self {
            obj.borrow_mut().insert(key.into(), val);
        }
    }
}

/// Value equality: scalars by value, containers by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => f.write_str(s),
            Value::Array(arr) => {
                let parts: Vec<String> =
                    arr.borrow().iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Value::Object(obj) => {
                let parts: Vec<String> = obj
                    .borrow()
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

/// Formats a number without a trailing `.0` for whole values.
pub fn format_number(n: f64) -> String {
    n.to_string()
}
