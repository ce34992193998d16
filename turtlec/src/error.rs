use std::fmt;
use turtle_ast::Position;

/// Why a name or call was rejected, or why translation otherwise aborted.
/// Every variant corresponds to one of the fatal error kinds the translator
/// can raise; the first one encountered aborts the whole compilation.
#[derive(Clone, Debug, PartialEq)]
pub enum SemanticError {
    DuplicateGlobal(String),
    DuplicateLocal(String),
    DuplicateParameter(String),
    DuplicateFunction(String),
    Shadowing(String),
    UndefinedVariable(String),
    UndefinedFunction(String),
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    ReturnOutsideFunction,
    BufferOverflow,
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SemanticError::DuplicateGlobal(name) => {
                write!(f, "global variable \"{}\" is already declared", name)
            }
            SemanticError::DuplicateLocal(name) => write!(
                f,
                "\"{}\" is already declared in this scope",
                name
            ),
            SemanticError::DuplicateParameter(name) => {
                write!(f, "parameter \"{}\" is declared more than once", name)
            }
            SemanticError::DuplicateFunction(name) => {
                write!(f, "function \"{}\" is already declared", name)
            }
            SemanticError::Shadowing(name) => {
                write!(f, "\"{}\" shadows a global variable of the same name", name)
            }
            SemanticError::UndefinedVariable(name) => {
                write!(f, "undefined variable \"{}\"", name)
            }
            SemanticError::UndefinedFunction(name) => {
                write!(f, "undefined function \"{}\"", name)
            }
            SemanticError::ArityMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "\"{}\" takes {} argument(s), but {} were given",
                name, expected, found
            ),
            SemanticError::ReturnOutsideFunction => {
                write!(f, "\"return\" used outside of a function body")
            }
            SemanticError::BufferOverflow => {
                write!(f, "program exceeds the maximum of 65535 instructions")
            }
        }
    }
}

/// A `SemanticError` together with the source position it occurred at, if
/// any is known. Prints with a `file:line:` prefix the way the translator's
/// diagnostics are expected to.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub file: Option<String>,
    pub pos: Option<Position>,
    pub error: SemanticError,
}

impl Diagnostic {
    pub fn new(error: SemanticError, pos: Position) -> Diagnostic {
        Diagnostic {
            file: None,
            pos: Some(pos),
            error,
        }
    }

    pub fn without_position(error: SemanticError) -> Diagnostic {
        Diagnostic {
            file: None,
            pos: None,
            error,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Diagnostic {
        self.file = Some(file.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.file, &self.pos) {
            (Some(file), Some(pos)) => write!(f, "{}:{}: {}", file, pos.line, self.error),
            (None, Some(pos)) => write!(f, "{}: {}", pos.line, self.error),
            (_, None) => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for Diagnostic {}
