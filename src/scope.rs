use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::Stmt;
use crate::value::Value;

/// A built-in or host-registered function.
///
/// Functions receive evaluated arguments and return a value or a plain
/// error message; the evaluator attaches position information.
pub type Func = Rc<dyn Fn(&[Value]) -> Result<Value, String>>;

/// A shared handle to a scope.
pub type ScopeRef = Rc<RefCell<Scope>>;

/// A user-defined template registered by `define`.
#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    pub body: Vec<Stmt>,
    /// Source file the template was defined in
    pub filename: String,
}

/// The environment shared by every scope in one evaluation tree:
/// globals, the function registry, and the template registry.
///
/// Linking a scope means handing it this same environment. Variables are
/// *not* part of the environment; they follow the parent chain.
#[derive(Default)]
struct Env {
    globals: HashMap<String, Value>,
    funcs: HashMap<String, Func>,
    templates: HashMap<String, Rc<Template>>,
}

/// A lexical scope: local variables, an optional parent for variable
/// lookup, and the shared environment.
pub struct Scope {
    parent: Option<ScopeRef>,
    vars: HashMap<String, Value>,
    env: Rc<RefCell<Env>>,
}

impl Scope {
    /// Creates a scope. With a parent, the new scope shares the parent's
    /// environment and chains to it for variable lookup.
    pub fn new(parent: Option<ScopeRef>) -> ScopeRef {
        let env = match &parent {
            Some(p) => p.borrow().env.clone(),
            None => Rc::new(RefCell::new(Env::default())),
        };
        Rc::new(RefCell::new(Scope {
            parent,
            vars: HashMap::new(),
            env,
        }))
    }

    /// Creates a scope with no parent that shares `other`'s environment.
    ///
    /// This is the template-invocation scope: local variables do not leak
    /// in either direction, while globals, functions, and templates stay
    /// shared.
    pub fn linked(other: &ScopeRef) -> ScopeRef {
        Rc::new(RefCell::new(Scope {
            parent: None,
            vars: HashMap::new(),
            env: other.borrow().env.clone(),
        }))
    }

    /// Retrieves a variable from this scope or its parents, falling back
    /// to globals at the root of the chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(val) = self.vars.get(name) {
            return Some(val.clone());
        }
        if let Some(parent) = &self.parent {
            return parent.borrow().get(name);
        }
        self.env.borrow().globals.get(name).cloned()
    }

    /// Binds a variable in this scope.
    pub fn set(&mut self, name: impl Into<String>, val: Value) {
        self.vars.insert(name.into(), val);
    }

    /// Binds a global visible to every linked scope.
    pub fn set_global(&self, name: impl Into<String>, val: Value) {
        self.env.borrow_mut().globals.insert(name.into(), val);
    }

    pub fn get_function(&self, name: &str) -> Option<Func> {
        self.env.borrow().funcs.get(name).cloned()
    }

    pub fn set_function(&self, name: impl Into<String>, f: Func) {
        self.env.borrow_mut().funcs.insert(name.into(), f);
    }

    /// Registers a template under its name.
    pub fn define_template(&self, tmpl: Template) {
        self.env
            .borrow_mut()
            .templates
            .insert(tmpl.name.clone(), Rc::new(tmpl));
    }

    pub fn get_template(&self, name: &str) -> Option<Rc<Template>> {
        self.env.borrow().templates.get(name).cloned()
    }
}
