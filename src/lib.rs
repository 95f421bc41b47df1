pub mod ast;
pub mod evaluator;
pub mod funcs;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod scope;
pub mod value;

pub use ast::{BinOp, Definition, Document, Expr, Pos, Stmt, Token, TokenKind, UnaryOp};
pub use evaluator::{eval_document, EvalError};
pub use funcs::register_builtins;
pub use lexer::Lexer;
pub use output::{to_json, to_json_pretty, to_yaml, to_yaml_stream};
pub use parser::{parse, ParseError, Parser};
pub use scope::{Func, Scope, ScopeRef, Template};
pub use value::Value;
