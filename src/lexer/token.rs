//! Token definitions for the BrightScript lexer.
//!
//! This module defines all tokens recognized by the lexer, including:
//! - Keywords (IF, THEN, FUNCTION, etc.)
//! - Operators (+, -, AND, OR, compound assignment, etc.)
//! - Literals (numbers, strings)
//! - Punctuation and delimiters
//!
//! ## Design Notes
//!
//! We use the `logos` crate for lexical analysis. Logos generates a fast,
//! table-driven lexer from token definitions using procedural macros.
//!
//! BrightScript is case-insensitive, so keywords are matched with
//! `ignore(ascii_case)`. Comments (`'` and `REM`) carry no meaning for
//! coverage and are skipped by the lexer itself.

use logos::Logos;
use std::fmt;

use crate::ast::Location;

/// A token with its location in the source code.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// Byte offset where this token starts in the source
    pub span: std::ops::Range<usize>,
    /// Line/column of the token's first and one-past-last byte
    pub location: Location,
    /// The original text of the token (useful for identifiers, literals)
    pub text: String,
}

impl Token {
    /// Create a new token with the given kind, span, location and text.
    pub fn new(
        kind: TokenKind,
        span: std::ops::Range<usize>,
        location: Location,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            span,
            location,
            text: text.into(),
        }
    }

    /// Returns true if this token can be used as a member or field name.
    ///
    /// BrightScript allows keywords after `.` and as associative-array keys
    /// (`node.id`, `m.top.next`, `{ end: 1 }`).
    pub fn is_word(&self) -> bool {
        self.text
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && self
                .text
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '%' | '!' | '#' | '&'))
    }
}

/// All possible token types in BrightScript.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")] // Skip horizontal whitespace (but not newlines!)
#[logos(skip r"'[^\n]*")] // Apostrophe comments
#[logos(skip r"(?i:REM)([ \t][^\n]*)?")] // REM comments
pub enum TokenKind {
    // ==================== Control Flow Keywords ====================
    /// IF keyword - begins conditional statement
    #[token("if", ignore(ascii_case))]
    If,

    /// THEN keyword - follows IF condition (optional in block form)
    #[token("then", ignore(ascii_case))]
    Then,

    /// ELSE keyword - alternative branch, or first half of `else if`
    #[token("else", ignore(ascii_case))]
    Else,

    /// ELSEIF keyword - chained conditional written as one word
    #[token("elseif", ignore(ascii_case))]
    ElseIf,

    /// END keyword - used with IF, FOR, WHILE, SUB, FUNCTION, or alone
    #[token("end", ignore(ascii_case))]
    End,

    /// ENDIF - single-word form of END IF
    #[token("endif", ignore(ascii_case))]
    EndIf,

    /// ENDFOR - single-word form of END FOR
    #[token("endfor", ignore(ascii_case))]
    EndFor,

    /// ENDWHILE - single-word form of END WHILE
    #[token("endwhile", ignore(ascii_case))]
    EndWhile,

    /// ENDSUB - single-word form of END SUB
    #[token("endsub", ignore(ascii_case))]
    EndSub,

    /// ENDFUNCTION - single-word form of END FUNCTION
    #[token("endfunction", ignore(ascii_case))]
    EndFunction,

    /// FOR keyword - begins counted or FOR EACH loop
    #[token("for", ignore(ascii_case))]
    For,

    /// TO keyword - FOR loop range
    #[token("to", ignore(ascii_case))]
    To,

    /// STEP keyword - FOR loop increment
    #[token("step", ignore(ascii_case))]
    Step,

    /// EACH keyword - FOR EACH loop
    #[token("each", ignore(ascii_case))]
    Each,

    /// IN keyword - FOR EACH target
    #[token("in", ignore(ascii_case))]
    In,

    /// NEXT keyword - closes a FOR loop
    #[token("next", ignore(ascii_case))]
    Next,

    /// WHILE keyword - begins WHILE loop
    #[token("while", ignore(ascii_case))]
    While,

    /// EXIT keyword - `exit for` / `exit while`
    #[token("exit", ignore(ascii_case))]
    Exit,

    /// EXITWHILE - single-word form of EXIT WHILE
    #[token("exitwhile", ignore(ascii_case))]
    ExitWhile,

    /// RETURN keyword
    #[token("return", ignore(ascii_case))]
    Return,

    /// GOTO keyword
    #[token("goto", ignore(ascii_case))]
    Goto,

    /// STOP keyword - break into the debugger
    #[token("stop", ignore(ascii_case))]
    Stop,

    // ==================== Declaration Keywords ====================
    /// FUNCTION keyword
    #[token("function", ignore(ascii_case))]
    Function,

    /// SUB keyword
    #[token("sub", ignore(ascii_case))]
    Sub,

    /// AS keyword - parameter/return type
    #[token("as", ignore(ascii_case))]
    As,

    /// DIM keyword - array declaration
    #[token("dim", ignore(ascii_case))]
    Dim,

    /// LIBRARY keyword - `library "v30/bslCore.brs"`
    #[token("library", ignore(ascii_case))]
    Library,

    // ==================== Output ====================
    /// PRINT statement
    #[token("print", ignore(ascii_case))]
    Print,

    /// `?` - PRINT shorthand
    #[token("?")]
    Question,

    // ==================== Literal Keywords ====================
    /// TRUE literal
    #[token("true", ignore(ascii_case))]
    True,

    /// FALSE literal
    #[token("false", ignore(ascii_case))]
    False,

    /// INVALID literal
    #[token("invalid", ignore(ascii_case))]
    Invalid,

    // ==================== Logical Operators ====================
    /// AND - logical/bitwise AND
    #[token("and", ignore(ascii_case))]
    And,

    /// OR - logical/bitwise OR
    #[token("or", ignore(ascii_case))]
    Or,

    /// NOT - logical/bitwise NOT
    #[token("not", ignore(ascii_case))]
    Not,

    /// MOD - modulo
    #[token("mod", ignore(ascii_case))]
    Mod,

    // ==================== Arithmetic Operators ====================
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    /// `\` - integer division
    #[token("\\")]
    Backslash,

    #[token("^")]
    Caret,

    #[token("<<")]
    ShiftLeft,

    #[token(">>")]
    ShiftRight,

    // ==================== Comparison / Assignment ====================
    /// `=` - equality in expressions, assignment in statements
    #[token("=")]
    Equals,

    #[token("<>")]
    NotEquals,

    #[token("<")]
    LessThan,

    #[token(">")]
    GreaterThan,

    #[token("<=")]
    LessEquals,

    #[token(">=")]
    GreaterEquals,

    #[token("+=")]
    PlusEquals,

    #[token("-=")]
    MinusEquals,

    #[token("*=")]
    StarEquals,

    #[token("/=")]
    SlashEquals,

    #[token("\\=")]
    BackslashEquals,

    #[token("<<=")]
    ShiftLeftEquals,

    #[token(">>=")]
    ShiftRightEquals,

    #[token("++")]
    PlusPlus,

    #[token("--")]
    MinusMinus,

    // ==================== Punctuation ====================
    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("[")]
    LeftBracket,

    #[token("]")]
    RightBracket,

    #[token("{")]
    LeftBrace,

    #[token("}")]
    RightBrace,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    /// `:` - statement separator, label terminator, associative-array key separator
    #[token(":")]
    Colon,

    #[token(".")]
    Dot,

    /// `@` - XML attribute access
    #[token("@")]
    At,

    // ==================== Literals ====================
    /// Integer literal, optionally `&`-suffixed (LongInteger)
    /// Examples: 123, 0, 9999999999&
    #[regex(r"[0-9]+&?", priority = 2)]
    IntegerLiteral,

    /// Hexadecimal literal
    /// Examples: &hFF, &HFF00&
    #[regex(r"&[Hh][0-9A-Fa-f]+&?")]
    HexLiteral,

    /// Floating point literal with optional `!` (Float) or `#` (Double) suffix
    /// Examples: 1.5, .5, 1.5e10, 3!, 2.5#
    #[regex(r"[0-9]*\.[0-9]+([Ee][+-]?[0-9]+)?[!#]?|[0-9]+[Ee][+-]?[0-9]+[!#]?|[0-9]+[!#]")]
    FloatLiteral,

    /// String literal, `""` is an escaped quote
    #[regex(r#""([^"\n]|"")*""#)]
    StringLiteral,

    /// String literal missing its closing quote
    #[regex(r#""([^"\n]|"")*"#)]
    UnterminatedString,

    // ==================== Identifiers ====================
    /// Identifier (variable, function, or label name)
    /// May end with type suffix ($, %, !, #, &)
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*[$%!#&]?")]
    Identifier,

    // ==================== Special Tokens ====================
    /// Newline - significant in BrightScript (ends statements)
    #[regex(r"\n")]
    Newline,

    // ==================== Conditional Compilation ====================
    /// A whole `#` directive line: `#if`, `#else if`, `#else`, `#end if`,
    /// `#const`, `#error`. The parser splits the text.
    #[regex(r"#[ \t]*[A-Za-z]+[^\n]*")]
    Directive,

    /// Input no other token matches. Never produced by logos directly;
    /// [`Lexer`](super::Lexer) maps lexing errors to it.
    Unknown,
}

impl TokenKind {
    /// Returns true if this token kind is an assignment operator.
    pub fn is_assignment_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Equals
                | TokenKind::PlusEquals
                | TokenKind::MinusEquals
                | TokenKind::StarEquals
                | TokenKind::SlashEquals
                | TokenKind::BackslashEquals
                | TokenKind::ShiftLeftEquals
                | TokenKind::ShiftRightEquals
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Keywords display as they are usually written
            TokenKind::If => write!(f, "if"),
            TokenKind::Then => write!(f, "then"),
            TokenKind::Else => write!(f, "else"),
            TokenKind::ElseIf => write!(f, "elseif"),
            TokenKind::End => write!(f, "end"),
            TokenKind::For => write!(f, "for"),
            TokenKind::While => write!(f, "while"),
            TokenKind::Function => write!(f, "function"),
            TokenKind::Sub => write!(f, "sub"),
            TokenKind::Print => write!(f, "print"),

            // Operators display as symbols
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Equals => write!(f, "="),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Newline => write!(f, "newline"),

            // Default: use debug representation
            _ => write!(f, "{:?}", self),
        }
    }
}
