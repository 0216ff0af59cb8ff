use std::io::{empty, Cursor, Empty};

use super::{VMError, VMStatus, VM};
use crate::{
    instructions::{BinaryOp, Instruction, Label, Operand},
    value::{Value, ValueKind},
};

/// Creates a VM that reads from `$input`
/// (or nothing) and writes into a `Vec<u8>`.
macro_rules! vm {
    ($instructions:expr) => {
        VM::new($instructions, empty(), Vec::new()).expect("Expected labels to resolve")
    };

    ($instructions:expr, $input:expr) => {
        VM::new($instructions, Cursor::new($input), Vec::new())
            .expect("Expected labels to resolve")
    };
}

fn assign(dest: &str, src: &str) -> Instruction {
    Instruction::Assign {
        dest: dest.into(),
        src: src.into(),
    }
}

fn binary(op: BinaryOp, dest: &str, lhs: &str, rhs: &str) -> Instruction {
    Instruction::Binary {
        op,
        dest: dest.into(),
        lhs: lhs.into(),
        rhs: rhs.into(),
    }
}

fn write(operand: &str) -> Instruction {
    Instruction::Write(operand.into())
}

fn value_of(vm: &VM<impl std::io::BufRead, Vec<u8>>, name: &str) -> Value {
    vm.variable(name)
        .unwrap_or_else(|| panic!("`{}` was never written", name))
        .value()
        .clone()
}

#[test]
fn empty_program_halts() {
    let mut vm: VM<Empty, Vec<u8>> = vm!(Vec::new());

    assert_eq!(vm.tick().unwrap(), VMStatus::Halted);
    assert_eq!(vm.run().unwrap(), "");
}

#[test]
fn assignment_and_write() {
    let mut vm = vm!(vec![assign("x", "5"), write("x")]);

    assert_eq!(vm.run().unwrap(), "5");
    assert_eq!(vm.into_writer(), b"5".to_vec());
}

#[test]
fn write_replaces_newline_escape() {
    let mut vm = vm!(vec![
        write("\"one\\ntwo\""),
        Instruction::Write(Operand::newline()),
    ]);

    assert_eq!(vm.run().unwrap(), "one\ntwo\n");
}

#[test]
fn arithmetic_keeps_integers() {
    let mut vm = vm!(vec![
        binary(BinaryOp::Add, "$t1", "1", "2"),
        binary(BinaryOp::Mul, "$t2", "$t1", "0x10"),
        binary(BinaryOp::Sub, "$t3", "$t2", "017"),
    ]);

    vm.run().unwrap();
    assert_eq!(value_of(&vm, "$t1"), Value::Integer(3));
    assert_eq!(value_of(&vm, "$t2"), Value::Integer(48));
    assert_eq!(value_of(&vm, "$t3"), Value::Integer(33));
}

#[test]
fn mixed_arithmetic_is_real() {
    let mut vm = vm!(vec![
        binary(BinaryOp::Add, "$t1", "1", "0.5"),
        binary(BinaryOp::Div, "$t2", "7", "2"),
        binary(BinaryOp::IntDiv, "$t3", "7", "2"),
        binary(BinaryOp::Mod, "$t4", "-7", "2"),
    ]);

    vm.run().unwrap();
    assert_eq!(value_of(&vm, "$t1"), Value::Real(1.5));
    assert_eq!(value_of(&vm, "$t2"), Value::Real(3.5));
    assert_eq!(value_of(&vm, "$t3"), Value::Integer(3));
    assert_eq!(value_of(&vm, "$t4"), Value::Integer(1));
}

#[test]
fn division_by_zero_yields_sentinels() {
    let mut vm = vm!(vec![
        binary(BinaryOp::Div, "a", "5", "0"),
        binary(BinaryOp::IntDiv, "b", "5", "0"),
        binary(BinaryOp::Mod, "c", "5", "0"),
        binary(BinaryOp::Div, "d", "2.5", "0.0"),
    ]);

    vm.run().expect("dividing by zero must not be an error");
    assert_eq!(value_of(&vm, "a"), Value::Real(0.0));
    assert_eq!(value_of(&vm, "b"), Value::Integer(0));
    assert_eq!(value_of(&vm, "c"), Value::Integer(0));
    assert_eq!(value_of(&vm, "d"), Value::Real(0.0));
}

#[test]
fn comparisons_and_logic_yield_zero_or_one() {
    let mut vm = vm!(vec![
        binary(BinaryOp::Lt, "lt", "1", "2"),
        binary(BinaryOp::Gte, "gte", "1", "2.5"),
        binary(BinaryOp::Equals, "eq", "2", "2.0"),
        binary(BinaryOp::Equals, "eq_str", "\"a\"", "\"a\""),
        binary(BinaryOp::And, "and", "lt", "\"\""),
        binary(BinaryOp::Or, "or", "0", "\"x\""),
        Instruction::Not {
            dest: "not".into(),
            operand: "0".into(),
        },
    ]);

    vm.run().unwrap();
    assert_eq!(value_of(&vm, "lt"), Value::Integer(1));
    assert_eq!(value_of(&vm, "gte"), Value::Integer(0));
    assert_eq!(value_of(&vm, "eq"), Value::Integer(1));
    assert_eq!(value_of(&vm, "eq_str"), Value::Integer(1));
    assert_eq!(value_of(&vm, "and"), Value::Integer(0));
    assert_eq!(value_of(&vm, "or"), Value::Integer(1));
    assert_eq!(value_of(&vm, "not"), Value::Integer(1));
}

#[test]
fn ordering_string_against_number_is_fatal() {
    let mut vm = vm!(vec![binary(BinaryOp::Lt, "$t1", "\"abc\"", "3")]);

    assert!(matches!(
        vm.run(),
        Err(VMError::WrongType {
            lhs: ValueKind::String,
            rhs: ValueKind::Integer,
            ..
        })
    ));
}

#[test]
fn if_takes_the_right_branch() {
    let (on_true, on_false, end) = (Label::new(1), Label::new(2), Label::new(3));
    let program = |cond: &str| {
        vec![
            Instruction::If {
                cond: cond.into(),
                on_true,
                on_false,
            },
            Instruction::Label(on_true),
            write("\"then\""),
            Instruction::Jump(end),
            Instruction::Label(on_false),
            write("\"else\""),
            Instruction::Label(end),
        ]
    };

    assert_eq!(vm!(program("1")).run().unwrap(), "then");
    assert_eq!(vm!(program("0")).run().unwrap(), "else");
}

#[test]
fn loop_counts_down() {
    let (start, body, end) = (Label::new(1), Label::new(2), Label::new(3));
    let mut vm = vm!(vec![
        assign("x", "3"),
        Instruction::Label(start),
        binary(BinaryOp::Gt, "$t1", "x", "0"),
        Instruction::If {
            cond: "$t1".into(),
            on_true: body,
            on_false: end,
        },
        Instruction::Label(body),
        write("x"),
        binary(BinaryOp::Sub, "$t2", "x", "1"),
        assign("x", "$t2"),
        Instruction::Jump(start),
        Instruction::Label(end),
    ]);

    assert_eq!(vm.run().unwrap(), "321");
}

#[test]
fn unresolved_label_is_fatal() {
    let mut vm = vm!(vec![Instruction::Jump(Label::new(42))]);

    assert!(matches!(vm.run(), Err(VMError::UnresolvedLabel(label)) if label == Label::new(42)));
}

#[test]
fn unresolved_branch_target_is_fatal() {
    let taken = Label::new(1);
    let missing = Label::new(9);

    let mut vm = vm!(vec![
        Instruction::If {
            cond: "0".into(),
            on_true: taken,
            on_false: missing,
        },
        Instruction::Label(taken),
    ]);

    assert!(matches!(vm.run(), Err(VMError::UnresolvedLabel(label)) if label == missing));
}

#[test]
fn duplicate_label_is_rejected_up_front() {
    let label = Label::new(1);
    let res = VM::new(
        vec![Instruction::Label(label), Instruction::Label(label)],
        empty(),
        Vec::new(),
    );

    assert!(matches!(
        res,
        Err(VMError::DuplicateLabel {
            first: 0,
            second: 1,
            ..
        })
    ));
}

#[test]
fn read_decodes_literals() {
    let mut vm = vm!(
        vec![
            Instruction::Read("hex".into()),
            Instruction::Read("octal".into()),
            Instruction::Read("real".into()),
            Instruction::Read("word".into()),
        ],
        "0x1A\n017\r\n3.5\nhello\n"
    );

    vm.run().unwrap();
    assert_eq!(value_of(&vm, "hex"), Value::Integer(26));
    assert_eq!(value_of(&vm, "octal"), Value::Integer(15));
    assert_eq!(value_of(&vm, "real"), Value::Real(3.5));
    assert_eq!(value_of(&vm, "word"), Value::String("hello".into()));
}

#[test]
fn read_ignores_surrounding_blanks() {
    let mut vm = vm!(
        vec![
            Instruction::Read("count".into()),
            Instruction::Read("ratio".into()),
            Instruction::Read("name".into()),
        ],
        " 5\n\t2.5  \n  two words \n"
    );

    vm.run().unwrap();
    assert_eq!(value_of(&vm, "count"), Value::Integer(5));
    assert_eq!(value_of(&vm, "ratio"), Value::Real(2.5));
    assert_eq!(value_of(&vm, "name"), Value::String("two words".into()));
}

#[test]
fn error_messages_name_the_types() {
    let mut vm = vm!(vec![assign("count", "1"), assign("count", "\"one\"")]);
    let err = vm.run().expect_err("Expected a failed write");
    assert_eq!(
        err.to_string(),
        "Can't write to `count`: can't store string value in integer variable"
    );

    let mut vm = vm!(vec![binary(BinaryOp::Sub, "$t1", "\"a\"", "1")]);
    let err = vm.run().expect_err("Expected a type error");
    assert_eq!(
        err.to_string(),
        "Tried to use SUB on operands of type string and integer"
    );
}

#[test]
fn read_past_end_of_input_is_fatal() {
    let mut vm = vm!(vec![Instruction::Read("x".into())], "");

    assert!(matches!(vm.run(), Err(VMError::EndOfInput)));
}

#[test]
fn string_into_integer_variable_is_fatal() {
    let mut vm = vm!(vec![Instruction::Read("n".into()), assign("n", "\"abc\"")], "4\n");

    match vm.run() {
        Err(VMError::IncompatibleWrite { name, source }) => {
            assert_eq!(name, "n");
            assert_eq!(source.expected, ValueKind::Integer);
        },

        other => panic!("expected an incompatible write, got {:?}", other),
    }
}

#[test]
fn integer_into_real_variable_widens() {
    let mut vm = vm!(vec![assign("r", "0.5"), assign("r", "2"), write("r")]);

    assert_eq!(vm.run().unwrap(), "2.0");
}

#[test]
fn unknown_names_resolve_to_their_own_text() {
    let mut vm = vm!(vec![write("nobody")]);

    assert_eq!(vm.run().unwrap(), "nobody");
}
