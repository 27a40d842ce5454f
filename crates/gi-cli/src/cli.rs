//! Command-line definition and option extraction.

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

const LANG_HELP: &str = "\
LANGUAGE
  Commands are read as lines of words separated by whitespace and
  operator character sequences, separated by newlines or ';' and
  grouped between braces into lists.

  OPERATORS
  Usual infix notation with C precedence rules; parentheses group
  expressions and make precedence explicit.
  + - * / %         arithmetic
  < <= > >= == !=   comparison
  ! && ||           logical
  = :=              assignment
  << >> & | ^ ~     binary
  ++ --             postfix step

  FLOW CONTROL
  if cond list1 [else list0]
        run cond; if it yields non zero run list1, otherwise list0.
  while cond list
        repeatedly run cond and list while cond yields non zero.
  for init; cond; post list
        run init, then repeatedly cond and list, running post after
        each iteration.

  BUILT-INS
  println arg ...
        print each argument followed by a newline.";

/// Build the root command. No subcommands: flags plus an optional
/// script file and its arguments.
pub fn build_cli() -> Command {
    Command::new("gi")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interpreter that executes commands read from a file or standard input")
        .after_help(LANG_HELP)
        .arg(
            Arg::new("ast_file")
                .short('A')
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Write the abstract syntax tree in dot(1) format to FILE, or stdout if FILE is -"),
        )
        .arg(
            Arg::new("ast_view")
                .short('a')
                .action(ArgAction::SetTrue)
                .help("Display the AST graph using dotty(1)"),
        )
        .arg(
            Arg::new("cfg_file")
                .short('C')
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Write the control flow graph in dot(1) format to FILE, or stdout if FILE is -"),
        )
        .arg(
            Arg::new("cfg_view")
                .short('c')
                .action(ArgAction::SetTrue)
                .help("Display the CFG graph using dotty(1)"),
        )
        .arg(
            Arg::new("no_run")
                .short('n')
                .action(ArgAction::SetTrue)
                .help("Compile only, do not run"),
        )
        .arg(
            Arg::new("parallel")
                .short('p')
                .action(ArgAction::SetTrue)
                .help("Enable parallel execution (reserved)"),
        )
        .arg(
            Arg::new("trace")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Trace each instruction during execution"),
        )
        .arg(
            Arg::new("jit")
                .short('x')
                .action(ArgAction::SetTrue)
                .help("Generate and execute machine code using the JIT backend"),
        )
        .arg(
            Arg::new("script")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Script file; standard input when omitted"),
        )
        .arg(
            Arg::new("args")
                .value_name("ARGS")
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .help("Arguments passed to the script"),
        )
}

/// Extracted command-line options.
#[derive(Debug, Default)]
pub struct Options {
    pub ast_file: Option<PathBuf>,
    pub ast_view: bool,
    pub cfg_file: Option<PathBuf>,
    pub cfg_view: bool,
    pub no_run: bool,
    pub parallel: bool,
    pub trace: bool,
    pub jit: bool,
    pub script: Option<PathBuf>,
    pub args: Vec<String>,
}

impl Options {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            ast_file: m.get_one::<PathBuf>("ast_file").cloned(),
            ast_view: m.get_flag("ast_view"),
            cfg_file: m.get_one::<PathBuf>("cfg_file").cloned(),
            cfg_view: m.get_flag("cfg_view"),
            no_run: m.get_flag("no_run"),
            parallel: m.get_flag("parallel"),
            trace: m.get_flag("trace"),
            jit: m.get_flag("jit"),
            script: m.get_one::<PathBuf>("script").cloned(),
            args: m
                .get_many::<String>("args")
                .map(|v| v.cloned().collect())
                .unwrap_or_default(),
        }
    }
}
