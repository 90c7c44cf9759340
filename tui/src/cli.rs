use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "shellchat", version, about = "Chat-style terminal for running commands")]
pub struct Cli {
    /// Directory to start the session in. Defaults to the home directory.
    #[arg(long = "cd", short = 'C', value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Shell used to run submitted command lines. Defaults to $SHELL.
    #[arg(long, value_name = "PROGRAM")]
    pub shell: Option<String>,

    /// Interpreter used for `python` expression submissions.
    #[arg(long, value_name = "PROGRAM")]
    pub python: Option<String>,
}
