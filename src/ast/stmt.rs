//! Statement AST nodes.
//!
//! Statements are constructs that perform actions. The set of statement kinds
//! is closed: consumers (such as the coverage classifier) match on
//! [`StatementKind`] exhaustively, so a new grammar construct cannot be
//! silently ignored.
//!
//! # Statement Categories
//!
//! - **Declarations**: `function`, `sub`, `dim`, `library`
//! - **Assignment**: `x = v`, `a.b = v`, `a[i] = v`, compound operators, `x++`
//! - **Control flow**: `if`/`else if`/`else`, `for`, `for each`, `while`,
//!   `exit`, `return`, `goto`, `end`, `stop`
//! - **Output**: `print` / `?`

use super::{Expr, Location, Span};

/// A statement with its source location.
#[derive(Debug, Clone)]
pub struct Statement {
    /// The kind of statement.
    pub kind: StatementKind,
    /// Byte range of this statement.
    pub span: Span,
    /// Line/column range of this statement.
    pub location: Location,
}

impl Statement {
    /// Creates a new statement with the given kind, span and location.
    pub fn new(kind: StatementKind, span: Span, location: Location) -> Self {
        Self {
            kind,
            span,
            location,
        }
    }
}

/// The different kinds of statements in BrightScript.
#[derive(Debug, Clone)]
pub enum StatementKind {
    /// `function name(params) [as type] ... end function` or the `sub` form.
    Function { name: String, func: FunctionDecl },

    /// Block: `if cond [then] ... [else if cond [then] ...] [else ...] end if`
    /// Single-line: `if cond then stmt [: stmt] [else stmt]`
    If {
        /// The condition to test.
        condition: Expr,
        /// Statements to execute if condition is true.
        then_branch: Vec<Statement>,
        /// `else if` / `elseif` clauses, in source order.
        else_ifs: Vec<ElseIfClause>,
        /// Statements to execute if every condition is false.
        else_branch: Option<Vec<Statement>>,
    },

    /// `for counter = start to end [step step] ... end for`
    For {
        /// Loop counter name.
        counter: String,
        /// Starting value.
        start: Expr,
        /// Ending value.
        end: Expr,
        /// Step value (defaults to 1 if not specified).
        step: Option<Expr>,
        /// Loop body.
        body: Vec<Statement>,
    },

    /// `for each item in target ... end for`
    ForEach {
        /// Loop item name.
        item: String,
        /// The enumerable being iterated.
        target: Expr,
        /// Loop body.
        body: Vec<Statement>,
    },

    /// `while condition ... end while`
    While {
        /// Loop condition.
        condition: Expr,
        /// Loop body.
        body: Vec<Statement>,
    },

    /// Expression used as a statement (a call): `doWork(1)`, `m.top.setFocus(true)`
    Expression(Expr),

    /// `name op value` where op is `=` or a compound operator.
    Assignment {
        name: String,
        operator: AssignOp,
        value: Expr,
    },

    /// `object.name op value`
    DottedSet {
        object: Expr,
        name: String,
        operator: AssignOp,
        value: Expr,
    },

    /// `object[index] op value`
    IndexedSet {
        object: Expr,
        index: Expr,
        operator: AssignOp,
        value: Expr,
    },

    /// `print expr1; expr2, expr3` (also `? ...`)
    Print {
        /// Values to print.
        values: Vec<PrintItem>,
    },

    /// `return [value]`
    Return { value: Option<Expr> },

    /// `target++` / `target--`
    Increment { target: Expr, decrement: bool },

    /// `dim name[d1, d2, ...]`
    Dim { name: String, dimensions: Vec<Expr> },

    /// `goto label`
    Goto { label: String },

    /// Label definition: `labelName:`
    Label { name: String },

    /// `exit for`, `exit while`
    Exit { exit_type: ExitType },

    /// `end` - end program execution
    End,

    /// `stop` - break into the debugger
    Stop,

    /// `library "path"`
    Library { path: String },

    // ==================== Conditional Compilation ====================
    /// `#if cond` ... `#else if cond` ... `#else` ... `#end if`
    ///
    /// Conditions are kept as written; every branch is parsed.
    ConditionalCompile {
        condition: String,
        then_branch: Vec<Statement>,
        else_ifs: Vec<(String, Vec<Statement>)>,
        else_branch: Option<Vec<Statement>>,
    },

    /// `#const NAME = value` or `#error message`
    Directive { name: String, args: String },
}

impl StatementKind {
    /// Short keyword-style name of the statement kind, for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            StatementKind::Function { func, .. } => match func.kind {
                FunctionKind::Function => "function",
                FunctionKind::Sub => "sub",
            },
            StatementKind::If { .. } => "if",
            StatementKind::For { .. } => "for",
            StatementKind::ForEach { .. } => "for each",
            StatementKind::While { .. } => "while",
            StatementKind::Expression(_) => "expression",
            StatementKind::Assignment { .. } => "assignment",
            StatementKind::DottedSet { .. } => "member assignment",
            StatementKind::IndexedSet { .. } => "indexed assignment",
            StatementKind::Print { .. } => "print",
            StatementKind::Return { .. } => "return",
            StatementKind::Increment { decrement: false, .. } => "increment",
            StatementKind::Increment { decrement: true, .. } => "decrement",
            StatementKind::Dim { .. } => "dim",
            StatementKind::Goto { .. } => "goto",
            StatementKind::Label { .. } => "label",
            StatementKind::Exit { .. } => "exit",
            StatementKind::End => "end",
            StatementKind::Stop => "stop",
            StatementKind::Library { .. } => "library",
            StatementKind::ConditionalCompile { .. } => "#if",
            StatementKind::Directive { .. } => "directive",
        }
    }
}

/// An `else if` clause of an if statement.
#[derive(Debug, Clone)]
pub struct ElseIfClause {
    /// The clause's condition.
    pub condition: Expr,
    /// Statements to execute if the condition is true.
    pub then_branch: Vec<Statement>,
    /// Location of the `else if` (or `elseif`) keyword tokens, when known.
    pub keyword_location: Option<Location>,
}

/// The shared shape of named declarations and anonymous function expressions.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    /// `function` or `sub`.
    pub kind: FunctionKind,
    /// Declared parameters.
    pub params: Vec<Parameter>,
    /// Declared return type (`as string`), if any.
    pub return_type: Option<String>,
    /// Function body.
    pub body: Vec<Statement>,
}

/// Whether a callable was declared with `function` or `sub`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Function,
    Sub,
}

/// Parameter definition: `name [= default] [as type]`.
#[derive(Debug, Clone)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Default value expression.
    pub default: Option<Expr>,
    /// Declared type name (if specified with AS).
    pub type_name: Option<String>,
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `+=`
    Add,
    /// `-=`
    Subtract,
    /// `*=`
    Multiply,
    /// `/=`
    Divide,
    /// `\=`
    IntDivide,
    /// `<<=`
    ShiftLeft,
    /// `>>=`
    ShiftRight,
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Subtract => "-=",
            AssignOp::Multiply => "*=",
            AssignOp::Divide => "/=",
            AssignOp::IntDivide => "\\=",
            AssignOp::ShiftLeft => "<<=",
            AssignOp::ShiftRight => ">>=",
        }
    }
}

/// An item in a PRINT statement.
#[derive(Debug, Clone)]
pub struct PrintItem {
    /// The expression to print.
    pub expr: Expr,
    /// The separator after this item (if any).
    pub separator: Option<PrintSeparator>,
}

/// Separator between PRINT items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintSeparator {
    /// `;` - Print next item immediately after
    Semicolon,
    /// `,` - Tab to next print zone
    Comma,
}

/// Exit statement type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitType {
    For,
    While,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Position;

    #[test]
    fn test_assign_op_as_str() {
        assert_eq!(AssignOp::Assign.as_str(), "=");
        assert_eq!(AssignOp::ShiftRight.as_str(), ">>=");
    }

    #[test]
    fn test_create_return_statement() {
        let location = Location::new(Position::new(1, 0), Position::new(1, 6));
        let stmt = Statement::new(
            StatementKind::Return { value: None },
            Span::new(0, 6),
            location,
        );
        assert!(matches!(stmt.kind, StatementKind::Return { value: None }));
        assert_eq!(stmt.location.start.line_index(), 0);
        assert_eq!(stmt.kind.name(), "return");
    }
}
