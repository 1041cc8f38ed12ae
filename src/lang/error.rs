use super::Column;

#[derive(Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    column: Column,
    message: String,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, ..$col:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_column($col)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, ..$col:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_column($col)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code,
            column: 0..0,
            message: String::new(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn column(&self) -> Column {
        self.column.clone()
    }

    pub fn in_column(self, column: &Column) -> Error {
        debug_assert_eq!(self.column, 0..0);
        Error {
            column: column.clone(),
            ..self
        }
    }

    pub fn message(self, message: &str) -> Error {
        Error {
            message: message.to_string(),
            ..self
        }
    }
}

/// Codes below 100 are syntax errors and are recovered at the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    UnknownOperator = 1,
    NeedParams = 2,
    ExtraParams = 3,
    NoModHere = 4,
    ManyPreSep = 5,
    NeedPreSep = 6,
    PlacePreSep = 7,
    ReadOnly = 8,
    NotDeferrable = 9,
    Overflow = 10,
    LineTooLong = 11,
    InvalidCharacter = 12,
    ScriptFull = 100,
    NoSuchLine = 101,
    NoSuchScript = 102,
    RecursionLimit = 110,
    DelayQueueFull = 111,
    StackFull = 112,
    UnknownVersion = 120,
    Corrupt = 121,
    InvalidSlot = 122,
    EmptySlot = 123,
    StorageFailure = 124,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use ErrorCode::*;
        let s = match self {
            UnknownOperator => "UNKNOWN OPERATOR",
            NeedParams => "NEED MORE PARAMETERS",
            ExtraParams => "EXTRA PARAMETERS",
            NoModHere => "MOD NOT ALLOWED HERE",
            ManyPreSep => "ONLY ONE PRE SEPARATOR",
            NeedPreSep => "MOD REQUIRES PRE SEPARATOR",
            PlacePreSep => "PRE SEPARATOR WITHOUT MOD",
            ReadOnly => "READ ONLY",
            NotDeferrable => "NOT DEFERRABLE",
            Overflow => "OVERFLOW",
            LineTooLong => "LINE TOO LONG",
            InvalidCharacter => "INVALID CHARACTER",
            ScriptFull => "SCRIPT FULL",
            NoSuchLine => "NO SUCH LINE",
            NoSuchScript => "NO SUCH SCRIPT",
            RecursionLimit => "RECURSION LIMIT",
            DelayQueueFull => "DELAY QUEUE FULL",
            StackFull => "STACK FULL",
            UnknownVersion => "UNKNOWN VERSION",
            Corrupt => "CORRUPT SCENE",
            InvalidSlot => "INVALID SLOT",
            EmptySlot => "EMPTY SLOT",
            StorageFailure => "STORAGE FAILURE",
        };
        write!(f, "{}", s)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut suffix = String::new();
        if (0..0) != self.column {
            suffix.push_str(&format!(" ({}..{})", self.column.start, self.column.end));
        }
        if !self.message.is_empty() {
            suffix.push_str(&format!("; {}", self.message));
        }
        if suffix.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} IN{}", self.code, suffix)
        }
    }
}

impl std::error::Error for Error {}
