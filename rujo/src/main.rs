use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{self, ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use console::style;
use env_logger::Env;
use rujo::{CcBuilder, Config, FsLoader, NativeBuilder, SourceLoader};
use rujo_parser::printer::print_program;
use rujo_source::Source;

#[derive(Parser, Debug)]
#[command(name = "rujo", version, about = "Compiles rujo programs to native executables through C")]
struct Cli {
    /// What to do with the program.
    #[arg(value_enum)]
    command: Mode,

    /// Source file to compile.
    file: PathBuf,

    /// Where to write the executable. Defaults to the source file name in the current directory.
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Also write the generated C code to PATH.
    #[arg(long, value_name = "PATH")]
    emit_c: Option<PathBuf>,

    /// Print the syntax tree to stdout.
    #[arg(long)]
    dump_ast: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Produce an executable.
    Build,
    /// Produce an executable in a temporary directory and run it.
    Run,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    env_logger::Builder::from_env(Env::default().filter_or("RUJO_LOG", "warn"))
        .format_timestamp(None)
        .init();

    match execute(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", style("error:").red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<ExitCode> {
    let content = FsLoader
        .load(&cli.file)
        .with_context(|| format!("failed to read `{}`", cli.file.display()))?;
    let source = Source::new(&content);

    let c_source = match generate(&source, cli.dump_ast) {
        Ok(c_source) => c_source,
        Err(err) => {
            for diagnostic in source.errors.diagnostics() {
                eprintln!("{}", style(diagnostic).red());
            }
            return Err(err.into());
        }
    };

    if let Some(path) = &cli.emit_c {
        fs::write(path, &c_source)
            .with_context(|| format!("failed to write C code to `{}`", path.display()))?;
    }

    let stem = cli
        .file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("main");
    let executable = format!("{}{}", stem, env::consts::EXE_SUFFIX);
    let builder = CcBuilder::new(Config::from_env());

    match cli.command {
        Mode::Build => {
            let output = cli.output.unwrap_or_else(|| PathBuf::from(executable));
            builder.build(&c_source, stem, &output)?;
            Ok(ExitCode::SUCCESS)
        }
        Mode::Run => {
            let dir = tempfile::tempdir().context("failed to create a temporary directory")?;
            let output = cli.output.unwrap_or_else(|| dir.path().join(executable));
            builder.build(&c_source, stem, &output)?;
            run(&output)
        }
    }
}

fn generate(source: &Source, dump_ast: bool) -> Result<String, rujo::CompileError> {
    let program = rujo::parse(source)?;
    if dump_ast {
        print!("{}", print_program(&program));
    }
    rujo::check(&program, source)?;
    Ok(rujo_codegen::generate(&program))
}

fn run(executable: &Path) -> Result<ExitCode> {
    // a bare file name would be looked up in PATH
    let executable = if executable.is_relative() {
        Path::new(".").join(executable)
    } else {
        executable.to_path_buf()
    };
    let status = process::Command::new(&executable)
        .status()
        .with_context(|| format!("failed to run `{}`", executable.display()))?;
    log::debug!("program exited with {}", status);

    Ok(match status.code() {
        Some(code) => ExitCode::from(code as u8),
        None => ExitCode::FAILURE,
    })
}
