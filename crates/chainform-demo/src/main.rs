#![forbid(unsafe_code)]

//! Headless walkthrough of a stacked login form.
//!
//! Builds one field per row, taps the first, then presses Enter in whichever
//! field holds focus until the last chain completes. Every backend op is
//! printed against simulated time.
//!
//! ```text
//! chainform-demo --fields 3 --frame-ms 16
//! chainform-demo --interrupt
//! RUST_LOG=chainform=debug chainform-demo --config chainform.toml
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chainform::prelude::*;
use chainform::{BackendOp, ConfigError, Point, Surface};
use clap::Parser;

/// First field tag on the login screen.
const FIRST_TAG: u32 = 10001;
const MAX_STEPS: usize = 10_000;

#[derive(Debug, Parser)]
#[command(
    name = "chainform-demo",
    about = "Play a chained login form headlessly and print what the backend was asked to do",
    version
)]
struct Cli {
    /// Number of stacked fields.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=32))]
    fields: u32,

    /// Simulated frame length in milliseconds.
    #[arg(long = "frame-ms", default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..=1000))]
    frame_ms: u64,

    /// Chain timing file (.toml or .json).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Steal focus from the first field while it is loading, then retry.
    #[arg(long)]
    interrupt: bool,
}

struct Session {
    program: FormProgram<HeadlessBackend>,
    frame: Duration,
    clock: Duration,
}

impl Session {
    fn new(form: Form, frame: Duration) -> Self {
        Self {
            program: FormProgram::new(form, HeadlessBackend::new()),
            frame,
            clock: Duration::ZERO,
        }
    }

    fn tap(&mut self, field: FieldId) {
        println!("{:>6}ms  user   tap {field}", self.clock.as_millis());
        self.program.backend_mut().tap(field);
        self.program.pump();
        self.flush();
    }

    fn enter(&mut self) {
        let Some(field) = self.program.backend().focused() else {
            println!("{:>6}ms  user   enter (nothing focused)", self.clock.as_millis());
            return;
        };
        println!("{:>6}ms  user   enter in {field}", self.clock.as_millis());
        self.program
            .backend_mut()
            .press_key(KeyEvent::new(KeyCode::Enter));
        self.program.pump();
        self.flush();
    }

    /// Step frames for at most `budget`, stopping early once nothing plays.
    fn wait(&mut self, budget: Duration) {
        let mut waited = Duration::ZERO;
        while waited < budget && !self.program.backend().is_quiescent() {
            self.program.advance(self.frame);
            self.clock += self.frame;
            waited += self.frame;
            self.flush();
        }
    }

    fn settle(&mut self) -> bool {
        for _ in 0..MAX_STEPS {
            if self.program.backend().is_quiescent() {
                return true;
            }
            self.wait(self.frame);
        }
        false
    }

    fn flush(&mut self) {
        let ms = self.clock.as_millis();
        for op in self.program.backend_mut().take_log() {
            println!("{ms:>6}ms  {}", describe(op));
        }
    }

    fn state_of(&self, field: FieldId) -> ChainState {
        self.program.state(field).unwrap_or(ChainState::Idle)
    }

    fn summary(&self) {
        println!();
        println!("field    state        handoffs  completed  dropped");
        for c in self.program.controllers() {
            println!(
                "{:<8} {:<12} {:>8}  {:>9}  {:>7}",
                c.id().to_string(),
                c.state().to_string(),
                c.handoffs(),
                c.chains_completed(),
                c.dropped_completions()
            );
        }
        let coordinator = self.program.coordinator();
        println!();
        println!(
            "overlay teardowns: {}, all-complete: {}, broadcasts: {}, messages: {}",
            coordinator.teardowns(),
            coordinator.completions(),
            self.program.bus().published_total(),
            self.program.processed()
        );
    }
}

fn describe(op: BackendOp) -> String {
    let place = |surface: Surface| match surface {
        Surface::Field(id) => id.to_string(),
        Surface::Overlay => "overlay".to_string(),
    };
    match op {
        BackendOp::Play { surface, kind, id } => {
            format!("play   {kind:?} on {} ({id})", place(surface))
        }
        BackendOp::Remove { surface, layer } => {
            format!("remove {layer:?} from {}", place(surface))
        }
        BackendOp::RequestFocus(field) => format!("focus  {field}"),
        BackendOp::ReleaseFocus => "focus  released".to_string(),
    }
}

fn load_config(path: &Path) -> Result<ChainConfig> {
    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => ChainConfig::from_json_file(path)?,
        Some("toml") => ChainConfig::from_toml_file(path)?,
        other => {
            return Err(Error::Config(ConfigError::Validation(vec![format!(
                "unsupported config extension {other:?}; expected .toml or .json"
            )])));
        }
    };
    tracing::info!(target: "chainform.demo", path = %path.display(), "loaded chain config");
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ChainConfig::default(),
    };
    let form = stacked_form(
        config,
        FIRST_TAG,
        cli.fields,
        Point::new(20.0, 120.0),
        280.0,
        30.0,
        30.0,
    )?;
    let ids: Vec<FieldId> = form.ids().collect();
    let Some(&first) = ids.first() else {
        return Ok(());
    };
    let mut session = Session::new(form, Duration::from_millis(cli.frame_ms));

    session.tap(first);
    session.settle();

    if cli.interrupt && ids.len() > 1 {
        session.enter();
        session.wait(config.circle.duration() / 2);
        session.tap(ids[ids.len() - 1]);
        println!(
            "{:>6}ms  -- {first} is {} after losing focus",
            session.clock.as_millis(),
            session.state_of(first)
        );
        session.settle();
        session.tap(first);
        session.settle();
    }

    for _ in &ids {
        session.enter();
        if !session.settle() {
            tracing::warn!(target: "chainform.demo", "form did not settle");
            break;
        }
    }

    session.summary();
    session.program.shutdown();
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("chainform=info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run(Cli::parse()) {
        eprintln!("{error}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["chainform-demo"]);
        assert_eq!(cli.fields, 3);
        assert_eq!(cli.frame_ms, 16);
        assert!(cli.config.is_none());
        assert!(!cli.interrupt);
    }

    #[test]
    fn cli_rejects_zero_fields() {
        assert!(Cli::try_parse_from(["chainform-demo", "--fields", "0"]).is_err());
    }

    #[test]
    fn unknown_config_extension_is_rejected() {
        let err = load_config(Path::new("chainform.yaml")).unwrap_err();
        assert!(err.to_string().contains("unsupported config extension"));
    }

    #[test]
    fn describe_names_surfaces() {
        assert_eq!(describe(BackendOp::ReleaseFocus), "focus  released");
        assert_eq!(
            describe(BackendOp::Remove {
                surface: Surface::Overlay,
                layer: chainform::Layer::Jump
            }),
            "remove Jump from overlay"
        );
    }

    #[test]
    fn walkthrough_completes_every_field() {
        let form = stacked_form(
            ChainConfig::default(),
            FIRST_TAG,
            3,
            Point::default(),
            200.0,
            30.0,
            30.0,
        )
        .unwrap();
        let ids: Vec<_> = form.ids().collect();
        let mut session = Session::new(form, Duration::from_millis(16));
        session.tap(ids[0]);
        assert!(session.settle());
        for _ in &ids {
            session.enter();
            assert!(session.settle());
        }
        assert_eq!(session.state_of(ids[2]), ChainState::Completed);
        assert_eq!(session.program.coordinator().completions(), 1);
        assert_eq!(session.program.bus().published_total(), 2);
    }
}
