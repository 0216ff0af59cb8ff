//! Compiles and runs every `tests/golden/*.pas` program, feeding it the
//! matching `.input` file (if any) and comparing what it writes
//! against the `.out` file.

use pascalina_backend::compile_file;
use pascalina_vm::vm::VM;
use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};

fn golden_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("golden")
}

fn run_golden(path: &Path) -> Result<(), String> {
    let code = compile_file(path).map_err(|err| format!("{:#}", err))?;
    let input = fs::read_to_string(path.with_extension("input")).unwrap_or_default();
    let expected = fs::read_to_string(path.with_extension("out"))
        .map_err(|err| format!("missing expected output: {}", err))?;

    let mut vm = VM::new(code, Cursor::new(input.into_bytes()), Vec::new())
        .map_err(|err| err.to_string())?;
    let output = vm.run().map_err(|err| err.to_string())?;

    if output == expected {
        Ok(())
    } else {
        Err(format!(
            "output mismatch\n--- expected ---\n{}\n--- found ---\n{}",
            expected, output
        ))
    }
}

#[test]
fn golden_programs() {
    let mut programs = fs::read_dir(golden_dir())
        .expect("Expected the golden directory to exist")
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().map_or(false, |ext| ext == "pas"))
        .collect::<Vec<_>>();

    programs.sort();
    assert!(!programs.is_empty(), "no golden programs found");

    let failures = programs
        .iter()
        .filter_map(|path| {
            run_golden(path)
                .err()
                .map(|err| format!("{}: {}", path.display(), err))
        })
        .collect::<Vec<_>>();

    assert!(failures.is_empty(), "{}", failures.join("\n\n"));
}

#[test]
fn missing_files_are_reported() {
    let err = compile_file(golden_dir().join("does_not_exist.pas"))
        .expect_err("Expected an I/O error");

    assert!(err.to_string().starts_with("couldn't read"));
}
