//! The tree-walking evaluator.
//!
//! Evaluation is context-directed: every statement executes against a
//! *collector* that decides where emitted values go. At the document root
//! values become whole documents, inside an array literal they become
//! elements, inside an object literal they become fields, and in value
//! position an `if`/`with`/`include` runs against a single-value
//! collector that must receive exactly one value.
//!
//! Control-flow statements (`if`, `for`, `with`) never produce a value of
//! their own; they emit their body into the *enclosing* collector.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use crate::ast::{BinOp, Document, Expr, Pos, Stmt, UnaryOp};
use crate::scope::{Scope, ScopeRef, Template};
use crate::value::Value;

/// An error raised during evaluation, positioned at the offending AST
/// node.
#[derive(Debug, Clone)]
pub struct EvalError {
    pub message: String,
    pub filename: String,
    pub line: usize,
    pub col: usize,
}

impl EvalError {
    fn at(pos: &Pos, message: impl Into<String>) -> EvalError {
        EvalError {
            message: message.into(),
            filename: pos.filename.clone(),
            line: pos.line,
            col: pos.col,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.filename.is_empty() {
            if self.line > 0 {
                let base = Path::new(&self.filename)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| self.filename.clone());
                return write!(f, "[{} {}:{}] {}", base, self.line, self.col, self.message);
            }
            return write!(f, "[{}] {}", self.filename, self.message);
        }
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

/// The contextual sink statements emit into.
#[derive(Clone)]
enum Collector {
    /// Root level: each emitted value is one output document
    Documents(Rc<RefCell<Vec<Value>>>),
    /// Inside an array literal: values append as elements
    Array(Rc<RefCell<Vec<Value>>>),
    /// Inside an object literal: only key-value and spread are accepted
    Object(Rc<RefCell<HashMap<String, Value>>>),
    /// Value position: exactly one value must be emitted
    Single(Rc<RefCell<Option<Value>>>),
}

/// The outcome of a statement: normal completion, or a `break`/`continue`
/// travelling up to the enclosing `for`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Normal,
    Break,
    Continue,
}

fn reject_loop_flow(flow: Flow, pos: &Pos) -> Result<(), EvalError> {
    match flow {
        Flow::Normal => Ok(()),
        Flow::Break => Err(EvalError::at(pos, "'break' outside of a loop")),
        Flow::Continue => Err(EvalError::at(pos, "'continue' outside of a loop")),
    }
}

/// Evaluates a parsed document against `scope` and returns an array value
/// whose elements are the produced output documents, in source order.
///
/// Definitions are registered as templates in the scope before the body
/// is walked, so a template may be included before its definition appears
/// in the source.
pub fn eval_document(doc: &Document, scope: &ScopeRef) -> Result<Value, EvalError> {
    let docs = Rc::new(RefCell::new(Vec::new()));
    let eval = Evaluator {
        scope: scope.clone(),
        coll: Collector::Documents(docs.clone()),
    };

    for def in &doc.definitions {
        let filename = def
            .body
            .first()
            .map(|s| s.pos().filename.clone())
            .unwrap_or_default();
        scope.borrow().define_template(Template {
            name: def.name.clone(),
            body: def.body.clone(),
            filename,
        });
    }

    for stmt in &doc.body {
        let flow = eval.eval_statement(stmt)?;
        reject_loop_flow(flow, stmt.pos())?;
    }

    Ok(Value::Array(docs))
}

struct Evaluator {
    scope: ScopeRef,
    coll: Collector,
}

impl Evaluator {
    fn sub(&self, scope: ScopeRef, coll: Collector) -> Evaluator {
        Evaluator { scope, coll }
    }

    fn eval_statement(&self, stmt: &Stmt) -> Result<Flow, EvalError> {
        match stmt {
            Stmt::Let { name, value, .. } => {
                let val = self.eval_value_statement(value)?;
                self.scope.borrow_mut().set(name.clone(), val);
                Ok(Flow::Normal)
            }
            Stmt::Assign { name, value, .. } => {
                // Assignment binds in the current scope, exactly like let
                let val = self.eval_value_statement(value)?;
                self.scope.borrow_mut().set(name.clone(), val);
                Ok(Flow::Normal)
            }
            Stmt::With {
                context,
                var_name,
                body,
                ..
            } => self.eval_with(context, var_name, body),
            Stmt::For {
                key_var,
                value_var,
                iterable,
                body,
                ..
            } => {
                self.eval_for(key_var, value_var, iterable, body)?;
                Ok(Flow::Normal)
            }
            Stmt::KeyValue { key, value, pos } => {
                self.eval_key_value(key, value, pos)?;
                Ok(Flow::Normal)
            }
            Stmt::Spread { operand, pos } => {
                self.eval_spread(operand, pos)?;
                Ok(Flow::Normal)
            }
            Stmt::If {
                condition,
                body,
                else_body,
                ..
            } => self.eval_if(condition, body, else_body),
            Stmt::Break { .. } => Ok(Flow::Break),
            Stmt::Continue { .. } => Ok(Flow::Continue),
            Stmt::Expr(Expr::Include { name, context, pos }) => {
                self.eval_include(name, context.as_deref(), pos)?;
                Ok(Flow::Normal)
            }
            Stmt::Expr(expr) => {
                let val = self.eval_expression(expr)?;
                // At the root a bare expression becomes a new document;
                // in an object body it has nowhere to go and is dropped
                if let Collector::Documents(docs) = &self.coll {
                    docs.borrow_mut().push(val);
                }
                Ok(Flow::Normal)
            }
        }
    }

    /// Emits one body item of an `if`/`for`/`with`/array/template into
    /// the current collector.
    fn collect_node(&self, node: &Stmt) -> Result<Flow, EvalError> {
        match node {
            Stmt::Expr(Expr::Include { name, context, pos }) => {
                // Include in a collection body emits directly, so a
                // template can produce several elements or documents
                self.eval_include(name, context.as_deref(), pos)?;
                Ok(Flow::Normal)
            }
            Stmt::Expr(expr) => {
                let val = self.eval_expression(expr)?;
                match &self.coll {
                    Collector::Array(arr) => arr.borrow_mut().push(val),
                    Collector::Documents(docs) => docs.borrow_mut().push(val),
                    Collector::Single(slot) => {
                        set_single(slot, val).map_err(|msg| EvalError::at(expr.pos(), msg))?
                    }
                    Collector::Object(_) => {
                        return Err(EvalError::at(expr.pos(), "unexpected value"))
                    }
                }
                Ok(Flow::Normal)
            }
            other => self.eval_statement(other),
        }
    }

    fn eval_key_value(&self, key: &str, value: &Stmt, pos: &Pos) -> Result<(), EvalError> {
        match &self.coll {
            Collector::Documents(docs) => {
                // A key-value at the root synthesizes (or reuses) a
                // trailing object document
                let obj = {
                    let docs_ref = docs.borrow();
                    match docs_ref.last() {
                        Some(Value::Object(o)) => Some(Value::Object(o.clone())),
                        _ => None,
                    }
                };
                let obj = match obj {
                    Some(obj) => obj,
                    None => {
                        let obj = Value::object();
                        docs.borrow_mut().push(obj.clone());
                        obj
                    }
                };

                let val = self.eval_value_statement(value)?;
                obj.set_field(key, val);
                Ok(())
            }
            Collector::Object(fields) => {
                let val = self.eval_value_statement(value)?;
                fields.borrow_mut().insert(key.to_string(), val);
                Ok(())
            }
            _ => Err(EvalError::at(pos, "key:value pair in non-object context")),
        }
    }

    /// Evaluates the right-hand side of a key-value, `let`, `spread`, or
    /// assignment. An `if` or `with` here runs against a single-value
    /// collector.
    fn eval_value_statement(&self, stmt: &Stmt) -> Result<Value, EvalError> {
        match stmt {
            Stmt::If {
                condition,
                body,
                else_body,
                pos,
            } => self.collect_single_value(pos, |sub| {
                sub.eval_if(condition, body, else_body).map(|_| ())
            }),
            Stmt::With {
                context,
                var_name,
                body,
                pos,
            } => self.collect_single_value(pos, |sub| {
                sub.eval_with(context, var_name, body).map(|_| ())
            }),
            Stmt::Expr(expr) => self.eval_expression(expr),
            other => Err(EvalError::at(
                other.pos(),
                "unexpected statement in value position",
            )),
        }
    }

    fn collect_single_value<F>(&self, pos: &Pos, f: F) -> Result<Value, EvalError>
    where
        F: FnOnce(&Evaluator) -> Result<(), EvalError>,
    {
        let slot = Rc::new(RefCell::new(None));
        let sub = self.sub(self.scope.clone(), Collector::Single(slot.clone()));

        f(&sub)?;

        let val = slot.borrow_mut().take();
        match val {
            Some(val) => Ok(val),
            None => Err(EvalError::at(pos, "expected value")),
        }
    }

    fn eval_if(
        &self,
        condition: &Expr,
        body: &[Stmt],
        else_body: &[Stmt],
    ) -> Result<Flow, EvalError> {
        let cond = self.eval_expression(condition)?;

        let branch = if cond.is_truthy() { body } else { else_body };

        for item in branch {
            match self.collect_node(item)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }

        Ok(Flow::Normal)
    }

    fn eval_with(&self, context: &Expr, var_name: &str, body: &[Stmt]) -> Result<Flow, EvalError> {
        let ctx = self.eval_expression(context)?;

        let scope = Scope::new(Some(self.scope.clone()));
        scope.borrow_mut().set(var_name, ctx);

        let sub = self.sub(scope, self.coll.clone());
        for item in body {
            match sub.collect_node(item)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }

        Ok(Flow::Normal)
    }

    fn eval_for(
        &self,
        key_var: &str,
        value_var: &str,
        iterable: &Expr,
        body: &[Stmt],
    ) -> Result<(), EvalError> {
        let iter_val = self.eval_expression(iterable)?;

        match &iter_val {
            Value::Array(arr) => {
                let elements = arr.borrow().clone();
                for (i, elem) in elements.into_iter().enumerate() {
                    let key = Value::Number(i as f64);
                    if self.eval_for_iteration(key_var, value_var, key, elem, body)? == Flow::Break
                    {
                        break;
                    }
                }
            }
            Value::Object(obj) => {
                let mut fields: Vec<(String, Value)> = obj
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                // Sorted keys keep rendered manifests reproducible
                fields.sort_by(|a, b| a.0.cmp(&b.0));
                for (key, val) in fields {
                    let key = Value::String(key);
                    if self.eval_for_iteration(key_var, value_var, key, val, body)? == Flow::Break {
                        break;
                    }
                }
            }
            other => {
                return Err(EvalError::at(
                    iterable.pos(),
                    format!("cannot iterate over {}", other.type_name()),
                ))
            }
        }

        Ok(())
    }

    fn eval_for_iteration(
        &self,
        key_var: &str,
        value_var: &str,
        key: Value,
        value: Value,
        body: &[Stmt],
    ) -> Result<Flow, EvalError> {
        let scope = Scope::new(Some(self.scope.clone()));
        {
            let mut s = scope.borrow_mut();
            if !key_var.is_empty() {
                s.set(key_var, key);
            }
            s.set(value_var, value);
        }

        let sub = self.sub(scope, self.coll.clone());
        for item in body {
            match sub.collect_node(item)? {
                Flow::Normal => {}
                Flow::Continue => return Ok(Flow::Normal),
                Flow::Break => return Ok(Flow::Break),
            }
        }

        Ok(Flow::Normal)
    }

    fn eval_spread(&self, operand: &Stmt, pos: &Pos) -> Result<(), EvalError> {
        let val = self.eval_value_statement(operand)?;

        match (&self.coll, &val) {
            (Collector::Array(coll), Value::Array(arr)) => {
                let items = arr.borrow().clone();
                coll.borrow_mut().extend(items);
                Ok(())
            }
            (Collector::Array(_), other) => Err(EvalError::at(
                pos,
                format!("cannot spread {} into array", other.type_name()),
            )),
            (Collector::Object(coll), Value::Object(obj)) => {
                let fields: Vec<(String, Value)> = obj
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                let mut target = coll.borrow_mut();
                for (k, v) in fields {
                    target.insert(k, v);
                }
                Ok(())
            }
            (Collector::Object(_), other) => Err(EvalError::at(
                pos,
                format!("cannot spread {} into object", other.type_name()),
            )),
            _ => Err(EvalError::at(pos, "cannot spread into this context")),
        }
    }

    fn eval_include(
        &self,
        name: &str,
        context: Option<&Expr>,
        pos: &Pos,
    ) -> Result<(), EvalError> {
        let tmpl = self
            .scope
            .borrow()
            .get_template(name)
            .ok_or_else(|| EvalError::at(pos, format!("undefined template: {}", name)))?;

        // Fresh locals, shared globals/functions/templates: template
        // locals stay inside, caller locals stay outside
        let tmpl_scope = Scope::linked(&self.scope);

        if let Some(ctx_expr) = context {
            let val = self.eval_expression(ctx_expr)?;
            let fields = match &val {
                Value::Object(obj) => obj
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect::<Vec<_>>(),
                _ => {
                    return Err(EvalError::at(
                        ctx_expr.pos(),
                        "template context must be an object",
                    ))
                }
            };
            let mut s = tmpl_scope.borrow_mut();
            for (k, v) in fields {
                s.set(k, v);
            }
        }

        let sub = self.sub(tmpl_scope, self.coll.clone());
        for node in &tmpl.body {
            if let Err(err) = sub.collect_node(node) {
                return Err(EvalError::at(pos, format!("include {:?}: {}", name, err)));
            }
        }

        Ok(())
    }

    fn eval_expression(&self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::String { value, .. } => Ok(Value::String(value.clone())),
            Expr::Number { value, .. } => Ok(Value::Number(*value)),
            Expr::Bool { value, .. } => Ok(Value::Bool(*value)),
            Expr::Null { .. } => Ok(Value::Null),
            Expr::Interpolated { parts, pos } => self.eval_interpolated(parts, pos),
            Expr::Identifier { name, pos } => self
                .scope
                .borrow()
                .get(name)
                .ok_or_else(|| EvalError::at(pos, format!("undefined variable: {}", name))),
            Expr::CurrentContext { .. } => Ok(self.eval_current_context()),
            Expr::Member {
                object,
                member,
                pos,
            } => self.eval_member(object, member, pos),
            Expr::Index { object, index, pos } => self.eval_index(object, index, pos),
            Expr::Binary {
                op,
                left,
                right,
                pos,
            } => self.eval_binary(*op, left, right, pos),
            Expr::Unary { op, operand, pos } => self.eval_unary(*op, operand, pos),
            Expr::Call {
                function,
                args,
                pos,
            } => self.eval_call(function, args, pos),
            Expr::Include { name, context, pos } => {
                // Include in expression position must produce exactly one
                // value
                self.collect_single_value(pos, |sub| {
                    sub.eval_include(name, context.as_deref(), pos)
                })
            }
            Expr::Object { body, pos } => self.eval_object_literal(body, pos),
            Expr::Array { body, pos } => self.eval_array_literal(body, pos),
        }
    }

    fn eval_array_literal(&self, body: &[Stmt], _pos: &Pos) -> Result<Value, EvalError> {
        let elements = Rc::new(RefCell::new(Vec::new()));
        let sub = self.sub(self.scope.clone(), Collector::Array(elements.clone()));

        for item in body {
            let flow = sub.collect_node(item)?;
            reject_loop_flow(flow, item.pos())?;
        }

        Ok(Value::Array(elements))
    }

    fn eval_object_literal(&self, body: &[Stmt], _pos: &Pos) -> Result<Value, EvalError> {
        let fields = Rc::new(RefCell::new(HashMap::new()));
        let sub = self.sub(self.scope.clone(), Collector::Object(fields.clone()));

        for item in body {
            let flow = sub.eval_statement(item)?;
            reject_loop_flow(flow, item.pos())?;
        }

        Ok(Value::Object(fields))
    }

    fn eval_member(&self, object: &Expr, member: &str, pos: &Pos) -> Result<Value, EvalError> {
        let obj_val = self.eval_expression(object)?;

        // Null propagates through member access, so absent config chains
        // read as null instead of erroring
        if let Value::Null = obj_val {
            return Ok(Value::Null);
        }

        match &obj_val {
            Value::Object(obj) => Ok(obj.borrow().get(member).cloned().unwrap_or(Value::Null)),
            other => Err(EvalError::at(
                pos,
                format!("cannot access member of {}", other.type_name()),
            )),
        }
    }

    fn eval_index(&self, object: &Expr, index: &Expr, pos: &Pos) -> Result<Value, EvalError> {
        let obj_val = self.eval_expression(object)?;
        let index_val = self.eval_expression(index)?;

        match &obj_val {
            Value::Array(arr) => {
                let num = match &index_val {
                    Value::Number(n) => *n,
                    other => {
                        return Err(EvalError::at(
                            pos,
                            format!("array index must be a number, got {}", other.type_name()),
                        ))
                    }
                };

                let arr = arr.borrow();
                let idx = num as i64;
                if idx < 0 || idx as usize >= arr.len() {
                    return Err(EvalError::at(
                        pos,
                        format!("array index out of bounds: {}", idx),
                    ));
                }

                Ok(arr[idx as usize].clone())
            }
            Value::Object(obj) => {
                let key = index_val
                    .to_display()
                    .map_err(|_| EvalError::at(pos, "object index must be a string"))?;

                match obj.borrow().get(&key) {
                    Some(val) => Ok(val.clone()),
                    None => Err(EvalError::at(pos, format!("undefined field: {}", key))),
                }
            }
            other => Err(EvalError::at(
                pos,
                format!("cannot index {}", other.type_name()),
            )),
        }
    }

    fn eval_binary(
        &self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        pos: &Pos,
    ) -> Result<Value, EvalError> {
        if op == BinOp::Pipe {
            return self.eval_pipe(left, right, pos);
        }

        let left_val = self.eval_expression(left)?;
        let right_val = self.eval_expression(right)?;

        apply_binop(op, &left_val, &right_val).map_err(|msg| EvalError::at(pos, msg))
    }

    fn eval_pipe(&self, left: &Expr, right: &Expr, pos: &Pos) -> Result<Value, EvalError> {
        let val = self.eval_expression(left)?;

        // The piped value becomes the last argument of the call
        match right {
            Expr::Identifier { name, pos: fn_pos } => self.call_function(fn_pos, name, vec![val]),
            Expr::Call {
                function, args, ..
            } => {
                let name = match function.as_ref() {
                    Expr::Identifier { name, .. } => name,
                    _ => {
                        return Err(EvalError::at(pos, "pipe right side must be a function name"))
                    }
                };

                let mut arg_vals = Vec::with_capacity(args.len() + 1);
                for arg in args {
                    arg_vals.push(self.eval_expression(arg)?);
                }
                arg_vals.push(val);

                self.call_function(function.pos(), name, arg_vals)
            }
            _ => Err(EvalError::at(pos, "invalid pipe right side")),
        }
    }

    fn call_function(&self, pos: &Pos, name: &str, args: Vec<Value>) -> Result<Value, EvalError> {
        let f = self
            .scope
            .borrow()
            .get_function(name)
            .ok_or_else(|| EvalError::at(pos, format!("undefined function: {}", name)))?;

        f(&args).map_err(|msg| EvalError::at(pos, msg))
    }

    fn eval_unary(&self, op: UnaryOp, operand: &Expr, pos: &Pos) -> Result<Value, EvalError> {
        let val = self.eval_expression(operand)?;

        match op {
            UnaryOp::Not => Ok(Value::Bool(!val.is_truthy())),
            UnaryOp::Neg => {
                let num = val
                    .to_number()
                    .map_err(|_| EvalError::at(pos, format!("cannot negate {}", val.type_name())))?;
                Ok(Value::Number(-num))
            }
        }
    }

    fn eval_call(&self, function: &Expr, args: &[Expr], pos: &Pos) -> Result<Value, EvalError> {
        let name = match function {
            Expr::Identifier { name, .. } => name,
            _ => return Err(EvalError::at(pos, "function must be an identifier")),
        };

        let mut arg_vals = Vec::with_capacity(args.len());
        for arg in args {
            arg_vals.push(self.eval_expression(arg)?);
        }

        self.call_function(pos, name, arg_vals)
    }

    fn eval_interpolated(&self, parts: &[Expr], pos: &Pos) -> Result<Value, EvalError> {
        let mut result = String::new();
        for part in parts {
            let val = self.eval_expression(part)?;
            let s = val.to_display().map_err(|msg| EvalError::at(pos, msg))?;
            result.push_str(&s);
        }
        Ok(Value::String(result))
    }

    /// The bare `.` yields a fresh object holding the host bindings
    /// (`Release`, `Chart`, `Values`) that exist in the current scope.
    fn eval_current_context(&self) -> Value {
        let ctx = Value::object();
        let scope = self.scope.borrow();
        for name in ["Release", "Chart", "Values"] {
            if let Some(val) = scope.get(name) {
                ctx.set_field(name, val);
            }
        }
        ctx
    }
}

fn set_single(slot: &Rc<RefCell<Option<Value>>>, val: Value) -> Result<(), String> {
    let mut slot = slot.borrow_mut();
    if slot.is_some() {
        return Err("unexpected value, expected only a single value".to_string());
    }
    *slot = Some(val);
    Ok(())
}

// Binary operations

fn apply_binop(op: BinOp, left: &Value, right: &Value) -> Result<Value, String> {
    match op {
        BinOp::Add => {
            // + concatenates when either side is a string
            if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
                let l = left.to_display()?;
                let r = right.to_display()?;
                return Ok(Value::String(l + &r));
            }
            let (l, r) = numeric_operands(left, right, || {
                format!(
                    "cannot add {} and {}",
                    left.type_name(),
                    right.type_name()
                )
            })?;
            Ok(Value::Number(l + r))
        }
        BinOp::Sub => {
            let (l, r) = numeric_operands(left, right, || {
                format!(
                    "cannot subtract {} from {}",
                    right.type_name(),
                    left.type_name()
                )
            })?;
            Ok(Value::Number(l - r))
        }
        BinOp::Mul => {
            let (l, r) = numeric_operands(left, right, || {
                format!(
                    "cannot multiply {} and {}",
                    left.type_name(),
                    right.type_name()
                )
            })?;
            Ok(Value::Number(l * r))
        }
        BinOp::Div => {
            let (l, r) = numeric_operands(left, right, || {
                format!(
                    "cannot divide {} by {}",
                    left.type_name(),
                    right.type_name()
                )
            })?;
            if r == 0.0 {
                return Err("division by zero".to_string());
            }
            Ok(Value::Number(l / r))
        }
        BinOp::Eq => Ok(Value::Bool(left == right)),
        BinOp::Neq => Ok(Value::Bool(left != right)),
        BinOp::Lt => compare(left, right).map(|(l, r)| Value::Bool(l < r)),
        BinOp::Lte => compare(left, right).map(|(l, r)| Value::Bool(l <= r)),
        BinOp::Gt => compare(left, right).map(|(l, r)| Value::Bool(l > r)),
        BinOp::Gte => compare(left, right).map(|(l, r)| Value::Bool(l >= r)),
        // Logical operators are truthiness-based and always evaluate
        // both operands
        BinOp::And => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
        BinOp::Or => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
        BinOp::Pipe => Err(format!("unknown operator: {}", op)),
    }
}

fn numeric_operands<F>(left: &Value, right: &Value, err: F) -> Result<(f64, f64), String>
where
    F: Fn() -> String,
{
    let l = left.to_number().map_err(|_| err())?;
    let r = right.to_number().map_err(|_| err())?;
    Ok((l, r))
}

fn compare(left: &Value, right: &Value) -> Result<(f64, f64), String> {
    numeric_operands(left, right, || {
        format!(
            "cannot compare {} and {}",
            left.type_name(),
            right.type_name()
        )
    })
}
