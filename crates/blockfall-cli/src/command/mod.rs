use clap::{Parser, Subcommand};

use self::{actions::ActionsArg, run::RunArg};

mod actions;
mod run;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log engine diagnostics to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run an action script through the engine and print the final frame
    Run(#[clap(flatten)] RunArg),
    /// List the action names accepted in scripts
    Actions(#[clap(flatten)] ActionsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match args.mode {
        Mode::Run(arg) => run::run(&arg)?,
        Mode::Actions(arg) => actions::run(&arg)?,
    }
    Ok(())
}
