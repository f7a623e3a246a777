mod command;
mod error;

use command::Command;
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{fs::File, io::{self, BufReader, IsTerminal, Read}};
use tracing_subscriber::{fmt, EnvFilter};

/// Initializes logging. The filter is read from `RUST_LOG`, and defaults to warnings only.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Parses and runs a single line, printing the result or the error.
fn execute_line(line: &str) {
    match Command::parse(line) {
        Ok(command) => println!("{}", command.run()),
        Err(err) => err.report_to_stderr(),
    }
}

/// Runs every non-empty line of the input. Lines starting with `//` are comments.
fn execute(input: &str) {
    input.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
        .for_each(execute_line);
}

/// Reads the whole file into a string.
fn read_file(filename: &str) -> io::Result<String> {
    let mut file = BufReader::new(File::open(filename)?);
    let mut input = String::new();
    file.read_to_string(&mut input)?;
    Ok(input)
}

fn main() {
    init_logging();

    let mut args = std::env::args();
    args.next();

    if let Some(filename) = args.next() {
        // run source file
        match read_file(&filename) {
            Ok(input) => execute(&input),
            Err(err) => eprintln!("error: could not read `{}`: {}", filename, err),
        }
    } else if !io::stdin().is_terminal() {
        // read source from stdin
        let mut input = String::new();
        match io::stdin().read_to_string(&mut input) {
            Ok(_) => execute(&input),
            Err(err) => eprintln!("error: could not read stdin: {}", err),
        }
    } else {
        // run the repl / interactive mode
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("error: {}", err);
                return;
            },
        };

        fn process_line(rl: &mut DefaultEditor) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;

            execute_line(&input);
            Ok(())
        }

        println!("type `help` for a list of commands");
        loop {
            if let Err(err) = process_line(&mut rl) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
    }
}
