use std::{env, fs, io, process::ExitCode};

use rook::{Program, StderrTracer, StdInput, StdOutput};

fn main() -> ExitCode {
    let mut trace = false;
    let mut file_path = None;
    for arg in env::args().skip(1) {
        if arg == "--trace" {
            trace = true;
        } else if file_path.is_none() {
            file_path = Some(arg);
        } else {
            eprintln!("usage: rook [--trace] <program>");
            return ExitCode::FAILURE;
        }
    }
    let Some(file_path) = file_path else {
        eprintln!("usage: rook [--trace] <program>");
        return ExitCode::FAILURE;
    };

    let source = match read_file(&file_path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let program = match Program::compile(&source) {
        Ok(program) => program,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let result = if trace {
        program.run_traced(&mut StdInput, &mut StdOutput, &mut StderrTracer)
    } else {
        program.run_stdio()
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn read_file(path: &str) -> io::Result<String> {
    fs::read_to_string(path)
}
