use std::fmt;

/// The mnemonic of an instruction, as it appears in listings.
///
/// Several [`Instruction`] variants share one opcode: every arithmetic,
/// relational and logical operation is an [`Instruction::Binary`], and both
/// I/O operations are `CALL`s.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Opcode {
    Att,
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
    Mod,
    Lt,
    Gt,
    Lte,
    Gte,
    Equals,
    And,
    Or,
    Not,
    If,
    Jump,
    Label,
    Call,
}

impl Opcode {
    pub fn from_str(s: impl AsRef<str>) -> Option<Self> {
        match s.as_ref() {
            "ATT" => Some(Self::Att),
            "ADD" => Some(Self::Add),
            "SUB" => Some(Self::Sub),
            "MUL" => Some(Self::Mul),
            "DIV" => Some(Self::Div),
            "INT_DIV" => Some(Self::IntDiv),
            "MOD" => Some(Self::Mod),
            "LT" => Some(Self::Lt),
            "GT" => Some(Self::Gt),
            "LTE" => Some(Self::Lte),
            "GTE" => Some(Self::Gte),
            "EQUALS" => Some(Self::Equals),
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "NOT" => Some(Self::Not),
            "IF" => Some(Self::If),
            "JUMP" => Some(Self::Jump),
            "LABEL" => Some(Self::Label),
            "CALL" => Some(Self::Call),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Opcode::Att => "ATT",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::IntDiv => "INT_DIV",
            Opcode::Mod => "MOD",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Lte => "LTE",
            Opcode::Gte => "GTE",
            Opcode::Equals => "EQUALS",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::If => "IF",
            Opcode::Jump => "JUMP",
            Opcode::Label => "LABEL",
            Opcode::Call => "CALL",
        }
    }

    /// Returns the binary operation this opcode stands for, if any.
    pub const fn as_binary_op(&self) -> Option<BinaryOp> {
        match self {
            Opcode::Add => Some(BinaryOp::Add),
            Opcode::Sub => Some(BinaryOp::Sub),
            Opcode::Mul => Some(BinaryOp::Mul),
            Opcode::Div => Some(BinaryOp::Div),
            Opcode::IntDiv => Some(BinaryOp::IntDiv),
            Opcode::Mod => Some(BinaryOp::Mod),
            Opcode::Lt => Some(BinaryOp::Lt),
            Opcode::Gt => Some(BinaryOp::Gt),
            Opcode::Lte => Some(BinaryOp::Lte),
            Opcode::Gte => Some(BinaryOp::Gte),
            Opcode::Equals => Some(BinaryOp::Equals),
            Opcode::And => Some(BinaryOp::And),
            Opcode::Or => Some(BinaryOp::Or),
            _ => None,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operations that take two operands and write one destination.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    /// Real division.
    Div,
    /// Floor division.
    IntDiv,
    Mod,
    Lt,
    Gt,
    Lte,
    Gte,
    Equals,
    And,
    Or,
}

impl From<BinaryOp> for Opcode {
    fn from(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Add => Opcode::Add,
            BinaryOp::Sub => Opcode::Sub,
            BinaryOp::Mul => Opcode::Mul,
            BinaryOp::Div => Opcode::Div,
            BinaryOp::IntDiv => Opcode::IntDiv,
            BinaryOp::Mod => Opcode::Mod,
            BinaryOp::Lt => Opcode::Lt,
            BinaryOp::Gt => Opcode::Gt,
            BinaryOp::Lte => Opcode::Lte,
            BinaryOp::Gte => Opcode::Gte,
            BinaryOp::Equals => Opcode::Equals,
            BinaryOp::And => Opcode::And,
            BinaryOp::Or => Opcode::Or,
        }
    }
}

/// A jump target. Labels are only meaningful within the
/// instruction list they were generated for.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Label(u32);

impl Label {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Parses the `L<n>` form produced by [`Display`](fmt::Display).
    pub fn from_str(s: impl AsRef<str>) -> Option<Self> {
        s.as_ref()
            .strip_prefix('L')
            .and_then(|id| id.parse().ok())
            .map(Self)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// The textual reference to a value: a literal (`42`, `0x1F`, `"hi"`),
/// a user variable or a compiler temporary. Operands are resolved
/// at runtime; see [`Value::resolve_literal`].
///
/// [`Value::resolve_literal`]: crate::value::Value::resolve_literal
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Operand(String);

impl Operand {
    /// The operand printed by `writeln` after its arguments.
    pub const NEWLINE: &'static str = "\\n";

    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn newline() -> Self {
        Self::new(Self::NEWLINE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Operand {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Operand {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    /// `dest ← src`
    Assign { dest: String, src: Operand },
    /// `dest ← lhs ⊕ rhs`
    Binary {
        op: BinaryOp,
        dest: String,
        lhs: Operand,
        rhs: Operand,
    },
    /// `dest ← !operand`, as 0 or 1.
    Not { dest: String, operand: Operand },
    /// Jumps to `on_true` if `cond` is truthy, `on_false` otherwise.
    If {
        cond: Operand,
        on_true: Label,
        on_false: Label,
    },
    /// Jumps unconditionally.
    Jump(Label),
    /// Marks a jump target. Does nothing when executed.
    Label(Label),
    /// Prints a value.
    Write(Operand),
    /// Reads a line of input into the named variable.
    Read(String),
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Assign { .. } => Opcode::Att,
            Instruction::Binary { op, .. } => Opcode::from(*op),
            Instruction::Not { .. } => Opcode::Not,
            Instruction::If { .. } => Opcode::If,
            Instruction::Jump(_) => Opcode::Jump,
            Instruction::Label(_) => Opcode::Label,
            Instruction::Write(_) | Instruction::Read(_) => Opcode::Call,
        }
    }
}
