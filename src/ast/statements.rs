use crate::ast::{Expr, Pos};

/// A statement node.
///
/// Statements execute against the collector of the enclosing container:
/// at the document root they produce documents, inside an array literal
/// they append elements, inside an object literal they set fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// A bare expression in statement position
    Expr(Expr),

    /// A key-value pair (`replicas: 3`)
    ///
    /// The value may be an expression or an `if`/`with` block producing a
    /// single value.
    KeyValue {
        key: String,
        value: Box<Stmt>,
        pos: Pos,
    },

    /// A variable definition (`let name = value`)
    Let {
        name: String,
        value: Box<Stmt>,
        pos: Pos,
    },

    /// A variable reassignment (`name = value`)
    ///
    /// Binds in the current scope; outer bindings are shadowed, not
    /// updated.
    Assign {
        name: String,
        value: Box<Stmt>,
        pos: Pos,
    },

    /// A spread (`spread expr`) splicing a container of the same kind
    /// into the enclosing container
    Spread { operand: Box<Stmt>, pos: Pos },

    /// A conditional (`if cond do ... else ... end`)
    ///
    /// Emits the selected branch into the enclosing collector.
    If {
        condition: Expr,
        body: Vec<Stmt>,
        else_body: Vec<Stmt>,
        pos: Pos,
    },

    /// A loop (`for k, v in expr do ... end`)
    For {
        key_var: String,
        value_var: String,
        iterable: Expr,
        body: Vec<Stmt>,
        pos: Pos,
    },

    /// A context binding (`with expr as name do ... end`)
    With {
        context: Expr,
        var_name: String,
        body: Vec<Stmt>,
        pos: Pos,
    },

    /// `break` out of the enclosing `for`
    Break { pos: Pos },

    /// `continue` to the next iteration of the enclosing `for`
    Continue { pos: Pos },
}

impl Stmt {
    /// The source position of this node.
    pub fn pos(&self) -> &Pos {
        match self {
            Stmt::Expr(e) => e.pos(),
            Stmt::KeyValue { pos, .. }
            | Stmt::Let { pos, .. }
            | Stmt::Assign { pos, .. }
            | Stmt::Spread { pos, .. }
            | Stmt::If { pos, .. }
            | Stmt::For { pos, .. }
            | Stmt::With { pos, .. }
            | Stmt::Break { pos }
            | Stmt::Continue { pos } => pos,
        }
    }
}

/// A template definition (`define("name") do ... end`).
///
/// Definitions are collected separately from the document body and
/// registered by name before evaluation starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub name: String,
    pub body: Vec<Stmt>,
    pub pos: Pos,
}

/// The root of a parsed template: top-level statements in source order
/// plus the collected template definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub body: Vec<Stmt>,
    pub definitions: Vec<Definition>,
}
