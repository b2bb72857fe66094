use std::io::Write as _;

use anyhow::Context as _;
use blockfall_engine::Action;

use crate::util::Output;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ActionsArg {}

pub(crate) fn run(_arg: &ActionsArg) -> anyhow::Result<()> {
    let mut output = Output::stdout();
    let width = Action::ALL
        .iter()
        .map(|action| action.as_str().len())
        .max()
        .unwrap_or(0);
    for action in Action::ALL {
        writeln!(output, "{:width$}  {}", action.as_str(), action.description())
            .context("Failed to write action list")?;
    }
    output.flush().context("Failed to flush output")?;
    Ok(())
}
