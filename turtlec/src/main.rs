#[macro_use]
extern crate clap;

use clap::Arg;
use std::fs::File;
use std::io::prelude::*;
use std::io::{stdin, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use turtlec::Diagnostic;

#[derive(Debug)]
enum IOErrorContext {
    ReadInput,
    WriteOutput,
}

#[derive(Debug)]
enum Error {
    Parse(turtle_parser::Error),
    Semantic(Diagnostic),
    Io(std::io::Error, IOErrorContext, PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err, context, path) => write!(
                f,
                "{} file \"{}\" failed: {}",
                match context {
                    IOErrorContext::ReadInput => "Reading input",
                    IOErrorContext::WriteOutput => "Writing output",
                },
                path.display(),
                err
            ),
            Error::Parse(err) => write!(f, "{}", err),
            Error::Semantic(diag) => write!(f, "{}", diag),
        }
    }
}

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("INPUT")
                .help("Sets the input file(s) to use; reads standard input if none is given")
                .multiple(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("OUTPUT")
                .help("Sets the output file to write to; writes to standard output if not given"),
        )
        .arg(
            Arg::with_name("binary")
                .short("s")
                .long("binary")
                .help("Renders the instruction stream as decimal words instead of disassembly"),
        )
        .arg(
            Arg::with_name("debug")
                .short("d")
                .long("debug")
                .help("Includes buffer indices in disassembly even when writing to a file"),
        )
        .arg(
            Arg::with_name("strict")
                .long("strict")
                .help("Upgrades shadowing warnings to errors and pops the return slot of statement calls"),
        )
        .get_matches();

    let inputs: Vec<&str> = matches
        .values_of("INPUT")
        .map(|values| values.collect())
        .unwrap_or_default();
    let output = matches.value_of("output");
    let binary = matches.is_present("binary");
    let debug = matches.is_present("debug");
    let strict = matches.is_present("strict");

    if let Err(err) = run(&inputs, output, binary, debug, strict) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn run(
    inputs: &[&str],
    output: Option<&str>,
    binary: bool,
    debug: bool,
    strict: bool,
) -> Result<(), Error> {
    let output_path = output.map(PathBuf::from);
    let writes_to_stdout = output_path.is_none();
    let mut sink: Box<dyn Write> = match &output_path {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|err| {
            Error::Io(err, IOErrorContext::WriteOutput, path.clone())
        })?)),
        None => Box::new(BufWriter::new(std::io::stdout())),
    };

    if inputs.is_empty() {
        compile_one(None, &mut sink, binary, writes_to_stdout, debug, strict)?;
    } else {
        for input in inputs {
            compile_one(Some(input), &mut sink, binary, writes_to_stdout, debug, strict)?;
        }
    }

    Ok(())
}

fn compile_one(
    input: Option<&str>,
    sink: &mut dyn Write,
    binary: bool,
    writes_to_stdout: bool,
    debug: bool,
    strict: bool,
) -> Result<(), Error> {
    let source = read_source(input)?;
    let file_name = input.map(str::to_owned);

    let program = turtle_parser::parse(&source).map_err(Error::Parse)?;
    let (instructions, warnings) = turtlec::translate_program(&program, strict).map_err(|diag| {
        Error::Semantic(match &file_name {
            Some(name) => diag.with_file(name.clone()),
            None => diag,
        })
    })?;

    for warning in warnings {
        let warning = match &file_name {
            Some(name) => warning.with_file(name.clone()),
            None => warning,
        };
        eprintln!("warning: {}", warning);
    }

    // Disassembly includes the index prefix on stdout or with `-d`; binary
    // only on stdout, regardless of `-d` — preserved from the original
    // implementation's `gen_debug`/`translate_to_binary` asymmetry.
    let include_index = if binary { writes_to_stdout } else { writes_to_stdout || debug };

    render(&instructions, sink, binary, include_index)
        .map_err(|err| Error::Io(err, IOErrorContext::WriteOutput, PathBuf::new()))?;

    Ok(())
}

fn read_source(input: Option<&str>) -> Result<String, Error> {
    match input {
        Some(path_str) => {
            let path = Path::new(path_str);
            let file = File::open(path)
                .map_err(|err| Error::Io(err, IOErrorContext::ReadInput, path.to_owned()))?;
            let mut reader = BufReader::new(file);
            let mut source = String::new();
            reader
                .read_to_string(&mut source)
                .map_err(|err| Error::Io(err, IOErrorContext::ReadInput, path.to_owned()))?;
            Ok(source)
        }
        None => {
            let mut source = String::new();
            stdin()
                .read_to_string(&mut source)
                .map_err(|err| Error::Io(err, IOErrorContext::ReadInput, PathBuf::from("<stdin>")))?;
            Ok(source)
        }
    }
}

fn render(
    instructions: &[turtlevm::Instruction],
    sink: &mut dyn Write,
    binary: bool,
    include_index: bool,
) -> std::io::Result<()> {
    for (index, instr) in instructions.iter().enumerate() {
        if include_index {
            write!(sink, "{}  ", index)?;
        }

        if binary {
            writeln!(sink, "{}", turtlevm::encode_instruction(*instr))?;
        } else {
            writeln!(sink, "{}", turtlevm::disassemble_instruction(*instr))?;
        }
    }
    Ok(())
}
