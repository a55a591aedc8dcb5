//! Syntax tree for generated cac programs
//!
//! Every node knows how to render itself. Rendering goes through [`SourceWriter`] so that statement terminators and
//! line breaks are decided in exactly one place.

use std::fmt;

use crate::writer::SourceWriter;

/// Identifier
pub type Ident = String;

// ============================================================================
// Types
// ============================================================================

/// Types that appear in generated signatures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Unit,
    /// `[Int, Int] -> Int`
    Function(Vec<Type>, Box<Type>),
}

impl Type {
    pub fn function(params: Vec<Type>, ret: Type) -> Self {
        Type::Function(params, Box::new(ret))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "Int"),
            Type::Unit => write!(f, "Unit"),
            Type::Function(params, ret) => {
                write!(f, "[")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p)?;
                }
                write!(f, "] -> {}", ret)
            }
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Mul,
}

impl BinaryOp {
    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add => 1,
            BinaryOp::Mul => 2,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Mul => write!(f, "*"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Int(i64),
    Var(Ident),
    /// `callee[arg, ...]`
    Call(Ident, Vec<Expr>),
    Binary(Box<Expr>, BinaryOp, Box<Expr>),
}

impl Expr {
    pub fn var(name: impl Into<Ident>) -> Self {
        Expr::Var(name.into())
    }

    pub fn call(callee: impl Into<Ident>, args: Vec<Expr>) -> Self {
        Expr::Call(callee.into(), args)
    }

    pub fn binary(lhs: Expr, op: BinaryOp, rhs: Expr) -> Self {
        Expr::Binary(Box::new(lhs), op, Box::new(rhs))
    }

    /// Left-associated `terms[0] + terms[1] + ...`. Returns `None` for an empty slice.
    pub fn sum(terms: impl IntoIterator<Item = Expr>) -> Option<Self> {
        terms
            .into_iter()
            .reduce(|acc, term| Expr::binary(acc, BinaryOp::Add, term))
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Binary(_, op, _) => op.precedence(),
            _ => u8::MAX,
        }
    }

    fn render(&self, out: &mut String) {
        match self {
            Expr::Int(value) => out.push_str(&value.to_string()),
            Expr::Var(name) => out.push_str(name),
            Expr::Call(callee, args) => {
                out.push_str(callee);
                out.push('[');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    arg.render(out);
                }
                out.push(']');
            }
            Expr::Binary(lhs, op, rhs) => {
                let prec = op.precedence();
                // Operators are left-associative: only a looser left operand or a non-tighter right operand needs
                // parentheses.
                render_operand(lhs, lhs.precedence() < prec, out);
                out.push(' ');
                out.push_str(&op.to_string());
                out.push(' ');
                render_operand(rhs, rhs.precedence() <= prec, out);
            }
        }
    }
}

fn render_operand(expr: &Expr, parens: bool, out: &mut String) {
    if parens {
        out.push('(');
        expr.render(out);
        out.push(')');
    } else {
        expr.render(out);
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(&mut out);
        f.write_str(&out)
    }
}

// ============================================================================
// Statements
// ============================================================================

/// A typed parameter of a `let`-bound function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: Ident,
    pub ty: Type,
}

impl Param {
    pub fn new(name: impl Into<Ident>, ty: Type) -> Self {
        Self { name: name.into(), ty }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `foreign name: [T, ...] -> R;`
    Foreign { name: Ident, params: Vec<Type>, ret: Type },
    /// `let name = [x: T, ...] -> R => body;`
    Let {
        name: Ident,
        params: Vec<Param>,
        ret: Type,
        body: Expr,
    },
    /// `expr;`
    Expr(Expr),
}

impl Stmt {
    pub fn foreign(name: impl Into<Ident>, params: Vec<Type>, ret: Type) -> Self {
        Stmt::Foreign {
            name: name.into(),
            params,
            ret,
        }
    }

    pub fn function(name: impl Into<Ident>, params: Vec<Param>, ret: Type, body: Expr) -> Self {
        Stmt::Let {
            name: name.into(),
            params,
            ret,
            body,
        }
    }

    fn write_to(&self, w: &mut SourceWriter) {
        match self {
            Stmt::Foreign { name, params, ret } => {
                w.write("foreign ");
                w.write(name);
                w.write(": ");
                w.write(&Type::function(params.clone(), ret.clone()).to_string());
            }
            Stmt::Let {
                name,
                params,
                ret,
                body,
            } => {
                w.write("let ");
                w.write(name);
                w.write(" = [");
                let params: Vec<String> = params.iter().map(|p| format!("{}: {}", p.name, p.ty)).collect();
                w.write(&params.join(", "));
                w.write("] -> ");
                w.write(&ret.to_string());
                w.write(" => ");
                w.write(&body.to_string());
            }
            Stmt::Expr(expr) => w.write(&expr.to_string()),
        }
        w.end_statement();
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = SourceWriter::new();
        self.write_to(&mut w);
        f.write_str(w.finish().trim_end_matches('\n'))
    }
}

// ============================================================================
// Programs
// ============================================================================

/// An ordered list of top-level statements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stmt: Stmt) {
        self.statements.push(stmt);
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Render the program, one statement per line.
    pub fn render(&self) -> String {
        let mut w = SourceWriter::new();
        for stmt in &self.statements {
            stmt.write_to(&mut w);
        }
        w.finish()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromIterator<Stmt> for Program {
    fn from_iter<I: IntoIterator<Item = Stmt>>(iter: I) -> Self {
        Self {
            statements: iter.into_iter().collect(),
        }
    }
}
