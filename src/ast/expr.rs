//! Expression AST nodes.
//!
//! Expressions are constructs that evaluate to a value: literals, variables,
//! arithmetic and logical operations, calls, member access and indexing,
//! array/associative-array literals and anonymous functions.
//!
//! # Expression Precedence
//!
//! From highest to lowest (as implemented in the parser):
//!
//! 1. Primary: literals, identifiers, parenthesized expressions, calls, `.`/`[]`/`@`
//! 2. Exponentiation: `^`
//! 3. Unary minus: `-x`
//! 4. Multiplicative: `*`, `/`, `\`, `MOD`
//! 5. Additive: `+`, `-`
//! 6. Shift: `<<`, `>>`
//! 7. Comparison: `=`, `<>`, `<`, `>`, `<=`, `>=`
//! 8. Logical NOT: `NOT`
//! 9. Logical AND: `AND`
//! 10. Logical OR: `OR`

use super::{FunctionDecl, Location, Span};

/// An expression with its source location.
#[derive(Debug, Clone)]
pub struct Expr {
    /// The kind of expression.
    pub kind: ExprKind,
    /// Byte range of this expression.
    pub span: Span,
    /// Line/column range of this expression.
    pub location: Location,
}

impl Expr {
    /// Creates a new expression with the given kind, span and location.
    pub fn new(kind: ExprKind, span: Span, location: Location) -> Self {
        Self {
            kind,
            span,
            location,
        }
    }
}

/// The different kinds of expressions in BrightScript.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Integer literal: `42`, `&hFF`, `10&`
    IntegerLiteral(i64),

    /// Floating-point literal: `3.14`, `1.5e10`, `2#`
    FloatLiteral(f64),

    /// String literal: `"Hello, World!"`
    StringLiteral(String),

    /// `true` / `false`
    BooleanLiteral(bool),

    /// `invalid`
    Invalid,

    /// Variable reference: `x`, `name$`, `m`
    Identifier(String),

    /// Binary operation: `left op right`
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// Unary operation: `-x`, `not flag`
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Parenthesized expression: `(expr)`
    Grouped(Box<Expr>),

    /// Call: `callee(arg1, arg2, ...)`
    Call { callee: Box<Expr>, args: Vec<Expr> },

    /// Member access: `object.name`
    Member { object: Box<Expr>, name: String },

    /// Indexing: `object[index]`
    Index { object: Box<Expr>, index: Box<Expr> },

    /// XML attribute access: `element@name`
    Attribute { object: Box<Expr>, name: String },

    /// Array literal: `[1, 2, 3]`
    ArrayLiteral(Vec<Expr>),

    /// Associative array literal: `{ key: value, "other": value }`
    AssocArrayLiteral(Vec<(String, Expr)>),

    /// Anonymous `function(...) ... end function` or `sub(...) ... end sub`
    Function(Box<FunctionDecl>),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    /// `^` - Exponentiation
    Power,
    /// `*` - Multiplication
    Multiply,
    /// `/` - Division
    Divide,
    /// `\` - Integer division
    IntDivide,
    /// `MOD` - Modulo (remainder)
    Modulo,
    /// `+` - Addition (also string concatenation)
    Add,
    /// `-` - Subtraction
    Subtract,
    /// `<<` - Left shift
    ShiftLeft,
    /// `>>` - Right shift
    ShiftRight,

    // Comparison
    /// `=` - Equality (assignment in statement context)
    Equal,
    /// `<>` - Not equal
    NotEqual,
    /// `<` - Less than
    LessThan,
    /// `<=` - Less than or equal
    LessEqual,
    /// `>` - Greater than
    GreaterThan,
    /// `>=` - Greater than or equal
    GreaterEqual,

    // Logical
    /// `AND` - Logical/bitwise AND
    And,
    /// `OR` - Logical/bitwise OR
    Or,
}

impl BinaryOp {
    /// Returns a string representation of the operator for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Power => "^",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::IntDivide => "\\",
            BinaryOp::Modulo => "mod",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
            BinaryOp::Equal => "=",
            BinaryOp::NotEqual => "<>",
            BinaryOp::LessThan => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-` - Numeric negation
    Negate,
    /// `NOT` - Logical/bitwise NOT
    Not,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "not",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Position;

    fn loc(start: usize, end: usize) -> Location {
        Location::new(Position::new(1, start), Position::new(1, end))
    }

    #[test]
    fn test_binary_op_as_str() {
        assert_eq!(BinaryOp::Add.as_str(), "+");
        assert_eq!(BinaryOp::Modulo.as_str(), "mod");
        assert_eq!(BinaryOp::NotEqual.as_str(), "<>");
        assert_eq!(UnaryOp::Not.as_str(), "not");
    }

    #[test]
    fn test_create_binary_expr() {
        let left = Box::new(Expr::new(
            ExprKind::IntegerLiteral(1),
            Span::new(0, 1),
            loc(0, 1),
        ));
        let right = Box::new(Expr::new(
            ExprKind::IntegerLiteral(2),
            Span::new(4, 5),
            loc(4, 5),
        ));
        let expr = Expr::new(
            ExprKind::Binary {
                left,
                op: BinaryOp::Add,
                right,
            },
            Span::new(0, 5),
            loc(0, 5),
        );
        assert!(matches!(
            expr.kind,
            ExprKind::Binary {
                op: BinaryOp::Add,
                ..
            }
        ));
    }
}
