use miette::Diagnostic;
use thiserror::Error;

/// Main error type for mapforge operations
#[derive(Error, Diagnostic, Debug)]
pub enum ForgeError {
    #[error("IO error: {0}")]
    #[diagnostic(code(mapforge::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(mapforge::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("expected token \"{expected}\", got \"{actual}\" on line {line}")]
    #[diagnostic(code(mapforge::lex))]
    TokenMismatch {
        expected: String,
        actual: String,
        line: u32,
    },

    #[error("end of input inside quoted token on line {line}")]
    #[diagnostic(code(mapforge::lex))]
    UnterminatedQuote { line: u32 },

    #[error("quote in the middle of a token on line {line}")]
    #[diagnostic(code(mapforge::lex))]
    QuoteInToken { line: u32 },

    #[error("unexpected character {ch:?} on line {line}")]
    #[diagnostic(code(mapforge::lex))]
    UnexpectedChar { ch: char, line: u32 },

    #[error("invalid number \"{value}\" on line {line}")]
    #[diagnostic(code(mapforge::parse))]
    InvalidNumber { value: String, line: u32 },

    #[error("unknown material \"{name}\"")]
    #[diagnostic(code(mapforge::export))]
    UnknownMaterial {
        name: String,
        #[help]
        help: Option<String>,
    },

    #[error("export error: {message}")]
    #[diagnostic(code(mapforge::export))]
    Export { message: String },
}

pub type Result<T> = std::result::Result<T, ForgeError>;
