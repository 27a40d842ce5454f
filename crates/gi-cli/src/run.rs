//! Pipeline orchestration: load source, parse, emit requested graphs,
//! lower, execute, flush output.

use std::fs;
use std::io::{self, Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use gi_compiler::{CodeBuf, compile, lower, parse, resolve_program};
use gi_core::{Context, dot};
use gi_vm::{Interp, NoopTracer, StepTracer, execute};

use crate::cli::Options;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot open {}: {}", .path.display(), .source)]
    Script {
        path: PathBuf,
        source: io::Error,
    },
    #[error("cannot write {}: {}", .path.display(), .source)]
    GraphOut {
        path: PathBuf,
        source: io::Error,
    },
}

/// Run the driver with the given options.
pub fn run(opts: &Options) -> Result<(), CliError> {
    let src = load_source(opts.script.as_deref())?;
    let out = eval_source(&src, opts)?;
    print!("{out}");
    let _ = io::stdout().flush();
    Ok(())
}

/// Compile and (unless suppressed) execute one source buffer, returning
/// the pending program output.
pub fn eval_source(src: &str, opts: &Options) -> Result<String, CliError> {
    let mut ctx = Context::new();
    let root = parse(&mut ctx, src);

    if opts.ast_file.is_some() || opts.ast_view {
        let text = dot::render_ast(&ctx, root);
        if let Some(path) = &opts.ast_file {
            write_graph(path, &text)?;
        }
        if opts.ast_view {
            view_graph(&text);
        }
    }

    let program = resolve_program(&ctx, root);
    lower(&mut ctx, program);

    if opts.cfg_file.is_some() || opts.cfg_view {
        let text = dot::render_cfg(&ctx, program);
        if let Some(path) = &opts.cfg_file {
            write_graph(path, &text)?;
        }
        if opts.cfg_view {
            view_graph(&text);
        }
    }

    if opts.jit {
        let mut buf = CodeBuf::new();
        match compile(&mut ctx, program, &mut buf) {
            Ok(()) => {
                let code = buf.finish();
                let mut out = String::new();
                if !opts.no_run {
                    execute(&code, &mut ctx, &mut out);
                }
                return Ok(out);
            }
            Err(err) => {
                eprintln!("compile error: {err}");
                return Ok(String::new());
            }
        }
    }

    let mut interp = Interp::new();
    if !opts.no_run {
        run_entry(&mut ctx, &mut interp, opts.trace);
    }
    Ok(interp.out)
}

fn run_entry(ctx: &mut Context, interp: &mut Interp, trace: bool) {
    if trace {
        let mut tracer = StepTracer::default();
        interp.run(ctx, &mut tracer);
    } else {
        let mut tracer = NoopTracer;
        interp.run(ctx, &mut tracer);
    }
}

/// Read the whole script, from a file or standard input. Invalid UTF-8
/// bytes are replaced rather than rejected.
fn load_source(script: Option<&Path>) -> Result<String, CliError> {
    let bytes = match script {
        Some(path) => fs::read(path).map_err(|source| CliError::Script {
            path: path.to_path_buf(),
            source,
        })?,
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .map_err(|source| CliError::Script {
                    path: PathBuf::from("-"),
                    source,
                })?;
            buf
        }
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write graph text to a file, or to stdout when the path is `-`.
fn write_graph(path: &Path, text: &str) -> Result<(), CliError> {
    if path.as_os_str() == "-" {
        print!("{text}");
        return Ok(());
    }
    fs::write(path, text).map_err(|source| CliError::GraphOut {
        path: path.to_path_buf(),
        source,
    })
}

/// Pipe graph text to an interactive `dotty` viewer. A missing viewer
/// is reported but does not stop execution.
fn view_graph(text: &str) {
    let child = Command::new("dotty")
        .arg("-")
        .stdin(Stdio::piped())
        .spawn();
    match child {
        Ok(mut child) => {
            if let Some(stdin) = child.stdin.as_mut() {
                let _ = stdin.write_all(text.as_bytes());
            }
            let _ = child.wait();
        }
        Err(err) => eprintln!("dotty: {err}"),
    }
}
