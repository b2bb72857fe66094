use std::{
    fmt::{self, Write as _},
    path::PathBuf,
    time::Duration,
};

use blockfall_engine::{
    EngineConfig, GameSession, PieceSeed, ScriptedGenerator, SessionEvent, SessionSnapshot,
};
use serde::Serialize;

use crate::{
    schema::script::{Script, Step},
    util::{self, Output},
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RunArg {
    /// Action script (JSON format)
    #[arg(long)]
    script: PathBuf,
    /// Engine configuration (JSON format); defaults apply to missing fields
    #[arg(long)]
    config: Option<PathBuf>,
    /// 7-bag seed as 32 hex characters; ignored when the script fixes the pieces
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Main board width, overriding the configuration
    #[arg(long)]
    width: Option<usize>,
    /// Main board height, overriding the configuration
    #[arg(long)]
    height: Option<usize>,
    /// Engine time step used while waiting, in milliseconds
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,
    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: OutputFormat,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RunReport {
    elapsed_ms: u64,
    events: Vec<SessionEvent>,
    snapshot: SessionSnapshot,
}

pub(crate) fn run(arg: &RunArg) -> anyhow::Result<()> {
    let RunArg {
        script,
        config,
        seed,
        width,
        height,
        tick_ms,
        format,
        output,
    } = arg;

    let mut config = match config {
        Some(path) => util::read_json_file::<EngineConfig, _>("config", path)?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = Some(*seed);
    }
    if let Some(width) = width {
        config.board_width = *width;
    }
    if let Some(height) = height {
        config.board_height = *height;
    }
    let script: Script = util::read_json_file("script", script)?;

    let mut session = match script.pieces {
        Some(pieces) => {
            GameSession::with_generator(config, Box::new(ScriptedGenerator::cycling(pieces)))?
        }
        None => GameSession::new(config)?,
    };
    log::info!("running {} script steps", script.steps.len());
    let report = run_script(&mut session, &script.steps, Duration::from_millis(*tick_ms))?;

    let mut output = Output::from_output_path(output.clone())?;
    match format {
        OutputFormat::Json => output.write_json(&report)?,
        OutputFormat::Text => output.write_text(&render_text(&report)?)?,
    }
    Ok(())
}

fn run_script(
    session: &mut GameSession,
    steps: &[Step],
    tick: Duration,
) -> anyhow::Result<RunReport> {
    let mut events = session.drain_events();
    let mut elapsed = Duration::ZERO;
    for step in steps {
        match *step {
            Step::Action { action } => session.apply_action(action)?,
            Step::Wait { wait_ms } => {
                let mut remaining = Duration::from_millis(wait_ms);
                while !remaining.is_zero() {
                    let dt = remaining.min(tick);
                    session.tick(dt)?;
                    remaining -= dt;
                }
                elapsed += Duration::from_millis(wait_ms);
            }
        }
        events.extend(session.drain_events());
    }
    Ok(RunReport {
        elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        events,
        snapshot: session.snapshot(),
    })
}

fn render_text(report: &RunReport) -> Result<String, fmt::Error> {
    let snapshot = &report.snapshot;
    let mut text = String::new();
    writeln!(text, "state: {:?}", snapshot.state)?;
    writeln!(text, "elapsed: {}ms", report.elapsed_ms)?;
    let held = snapshot
        .held
        .map_or_else(|| "-".to_owned(), |kind| kind.as_char().to_string());
    let used = if snapshot.can_hold { "" } else { " (used)" };
    writeln!(text, "hold: {held}{used}")?;
    let next = snapshot
        .next_pieces
        .iter()
        .map(|kind| kind.as_char())
        .collect::<String>();
    writeln!(text, "next: {next}")?;
    writeln!(text, "\n{}", snapshot.main)?;
    writeln!(text, "hold board:\n{}", snapshot.hold)?;
    writeln!(text, "next board:\n{}", snapshot.next)?;
    writeln!(text, "events:")?;
    for event in &report.events {
        writeln!(text, "  {}", describe(event))?;
    }
    Ok(text)
}

fn describe(event: &SessionEvent) -> String {
    match event {
        SessionEvent::Spawned { piece } => format!("spawned {piece}"),
        SessionEvent::Held { held, spawned } => {
            format!("held {}, spawned {}", held.as_char(), spawned.as_char())
        }
        SessionEvent::Locked { piece } => format!("locked {piece}"),
        SessionEvent::LinesCleared { rows } => format!("cleared rows {rows:?}"),
        SessionEvent::GameOver => "game over".to_owned(),
        SessionEvent::Paused => "paused".to_owned(),
        SessionEvent::Resumed => "resumed".to_owned(),
        SessionEvent::Reset => "reset".to_owned(),
    }
}
