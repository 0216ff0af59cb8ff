#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Keyword {
    Program,
    Var,
    Begin,
    End,
    Integer,
    Real,
    String,
    For,
    To,
    DownTo,
    Do,
    While,
    If,
    Then,
    Else,
    Read,
    ReadLn,
    Write,
    WriteLn,
    Break,
    Continue,
    Div,
    Mod,
    And,
    Or,
    Not,
}

impl Keyword {
    /// Keywords are case-insensitive.
    pub fn from_str(s: impl AsRef<str>) -> Option<Self> {
        match s.as_ref().to_ascii_lowercase().as_str() {
            "program" => Some(Self::Program),
            "var" => Some(Self::Var),
            "begin" => Some(Self::Begin),
            "end" => Some(Self::End),
            "integer" => Some(Self::Integer),
            "real" => Some(Self::Real),
            "string" => Some(Self::String),
            "for" => Some(Self::For),
            "to" => Some(Self::To),
            "downto" => Some(Self::DownTo),
            "do" => Some(Self::Do),
            "while" => Some(Self::While),
            "if" => Some(Self::If),
            "then" => Some(Self::Then),
            "else" => Some(Self::Else),
            "read" => Some(Self::Read),
            "readln" => Some(Self::ReadLn),
            "write" => Some(Self::Write),
            "writeln" => Some(Self::WriteLn),
            "break" => Some(Self::Break),
            "continue" => Some(Self::Continue),
            "div" => Some(Self::Div),
            "mod" => Some(Self::Mod),
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            "not" => Some(Self::Not),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Keyword::Program => "program",
            Keyword::Var => "var",
            Keyword::Begin => "begin",
            Keyword::End => "end",
            Keyword::Integer => "integer",
            Keyword::Real => "real",
            Keyword::String => "string",
            Keyword::For => "for",
            Keyword::To => "to",
            Keyword::DownTo => "downto",
            Keyword::Do => "do",
            Keyword::While => "while",
            Keyword::If => "if",
            Keyword::Then => "then",
            Keyword::Else => "else",
            Keyword::Read => "read",
            Keyword::ReadLn => "readln",
            Keyword::Write => "write",
            Keyword::WriteLn => "writeln",
            Keyword::Break => "break",
            Keyword::Continue => "continue",
            Keyword::Div => "div",
            Keyword::Mod => "mod",
            Keyword::And => "and",
            Keyword::Or => "or",
            Keyword::Not => "not",
        }
    }
}
