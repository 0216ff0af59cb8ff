use anyhow::Context;
use pascalina_backend::{front_end, generate, DiagnosticsContext};
use pascalina_disassembler::{assemble, disassemble, write_listing};
use pascalina_log::*;
use pascalina_vm::{instructions::Instruction, vm::VM};
use pico_args::Arguments;
use rustc_version_runtime::version_meta;
use std::{env::current_exe, fs, io, path::Path, process::exit};

const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE_ERROR: i32 = 1;
const COMPILE_ERROR: i32 = 2;
const RUNTIME_ERROR: i32 = 3;

#[derive(Debug)]
struct Args {
    ast: bool,
    dump: bool,
    emit_ir: Option<String>,
    help: bool,
    ir: bool,
    no_run: bool,
    trace_execution: bool,
    verbose: bool,
    version: bool,
    source_file: Option<String>,
}

fn process_args() -> Result<Args, pico_args::Error> {
    let mut args = Arguments::from_env();

    Ok(Args {
        ast: args.contains(["-a", "--ast"]),
        dump: args.contains(["-d", "--dump"]),
        emit_ir: args.opt_value_from_str(["-o", "--emit-ir"])?,
        help: args.contains(["-h", "--help"]),
        ir: args.contains(["-i", "--ir"]),
        no_run: args.contains(["-n", "--no-run"]),
        trace_execution: args.contains(["-t", "--trace"]),
        verbose: args.contains(["-v", "--verbose"]),
        version: args.contains(["-V", "--version"]),
        source_file: args.free_from_str()?,
    })
}

fn usage() -> String {
    let filename = current_exe()
        .ok()
        .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| PACKAGE_NAME.to_owned());

    format!(
        concat!(
            "Usage: {} [options] file\n",
            "Options:\n",
            "   -a, --ast - print the syntax tree\n",
            "   -d, --dump - print the generated intermediate code\n",
            "   -h, --help - view help\n",
            "   -i, --ir - treat the input file as an intermediate code listing\n",
            "   -n, --no-run - stop after generating code\n",
            "   -o path, --emit-ir path - write the intermediate code listing to a file\n",
            "   -t, --trace - trace execution of the virtual machine\n",
            "   -v, --verbose - enable verbose output\n",
            "   -V, --version - show version\n",
        ),
        filename
    )
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("couldn't read {}", path.display()))
}

/// Loads a listing written by `--emit-ir`.
fn load_listing(path: &Path) -> Vec<Instruction> {
    let listing = read_file(path).unwrap_or_else(|err| {
        error!("{:#}", err);
        exit(USAGE_ERROR);
    });

    assemble(&listing).unwrap_or_else(|err| {
        error!("invalid listing {}: {}", path.display(), err);
        exit(COMPILE_ERROR);
    })
}

fn compile_source(path: &Path, print_ast: bool) -> Vec<Instruction> {
    let source = read_file(path).unwrap_or_else(|err| {
        error!("{:#}", err);
        exit(USAGE_ERROR);
    });

    let program = match front_end(&source) {
        Ok(res) => res,

        Err(err) => {
            let ctx = DiagnosticsContext::new(&source, Some(path.display().to_string()));
            err.report(&ctx);
            exit(COMPILE_ERROR);
        },
    };

    if print_ast {
        println!("{}", program);
    }

    generate(&program)
}

fn main() {
    let args = match process_args() {
        Ok(args) => args,

        Err(pico_args::Error::UnusedArgsLeft(args)) => {
            let s_if_plural = if args.len() == 1 { "" } else { "s" };

            error!("unknown argument{}: {}", s_if_plural, args.join(", "));

            eprintln!("{}", usage());
            exit(USAGE_ERROR);
        },

        Err(err) => {
            error!("{}", err);
            eprintln!("{}", usage());
            exit(USAGE_ERROR);
        },
    };

    if args.help {
        println!("{}", usage());
        return;
    } else if args.version || args.verbose {
        println!("{} {}", PACKAGE_NAME, VERSION);

        if args.verbose {
            println!("Compiled with {}", version_meta().short_version_string);
        }

        if args.version {
            return;
        }
    }

    let source_file = args.source_file.unwrap_or_else(|| {
        error!("no source file provided");
        eprintln!("{}", usage());
        exit(USAGE_ERROR);
    });
    let source_path = Path::new(&source_file);

    let instructions = if args.ir {
        if args.ast {
            warning!("`--ast` has no effect on a listing");
        }

        if args.verbose {
            info!("loading {}...", source_file);
        }

        load_listing(source_path)
    } else {
        if args.verbose {
            info!("compiling {}...", source_file);
        }

        compile_source(source_path, args.ast)
    };

    if args.dump {
        print!("{}", disassemble(&instructions));
    }

    if let Some(listing_path) = &args.emit_ir {
        if let Err(err) = write_listing(listing_path, &instructions) {
            error!("couldn't write {}: {}", listing_path, err);
            exit(USAGE_ERROR);
        }

        if args.verbose {
            info!("wrote {} instructions to {}", instructions.len(), listing_path);
        }
    }

    if args.no_run {
        return;
    }

    if args.verbose {
        info!("interpreting {}...", source_file);
    }

    let stdin = io::stdin();
    let res = VM::new(instructions, stdin.lock(), io::stdout()).and_then(|vm| {
        vm.trace_execution(args.trace_execution).run()
    });

    if let Err(err) = res {
        error!("vm error: {}", err);
        exit(RUNTIME_ERROR);
    }
}
