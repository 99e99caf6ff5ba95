use std::fs::File;
use std::io::{Stdout, stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use flapsim::render::TermRenderer;
use flapsim::rng::{GapSource, SeededGaps, ThreadGaps};
use flapsim::{Event, GameState, LoopDriver, Simulation};

#[derive(Parser, Debug)]
#[command(name = "flapsim")]
#[command(about = "Flappy Bird in your terminal, on a fixed-timestep simulation")]
struct Args {
    /// Seed for the pipe gaps; the same seed always produces the same course
    #[arg(long)]
    seed: Option<u64>,

    /// Render frames per second (the simulation always runs at 60 steps/s)
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(10..=240))]
    fps: u32,

    /// Disable sound effects
    #[arg(long)]
    mute: bool,

    /// Write logs to this file (logging is off otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Stderr is the game screen, so logs only ever go to a file.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        // Leave the `log` facade without a logger; every macro is a no-op.
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .target(env_logger::Target::Pipe(Box::new(file)))
    .init();
    Ok(())
}

#[cfg(feature = "audio")]
struct Audio(Option<flapsim::sound::Sfx>);

#[cfg(feature = "audio")]
impl Audio {
    fn open(mute: bool) -> Self {
        if mute {
            return Self(None);
        }
        match flapsim::sound::Sfx::open() {
            Ok(sfx) => Self(Some(sfx)),
            Err(e) => {
                log::warn!("no audio output, continuing muted: {}", e);
                Self(None)
            }
        }
    }

    fn on_event(&self, event: &Event) {
        if let Some(sfx) = &self.0 {
            sfx.on_event(event);
        }
    }
}

#[cfg(not(feature = "audio"))]
struct Audio;

#[cfg(not(feature = "audio"))]
impl Audio {
    fn open(_mute: bool) -> Self {
        Self
    }

    fn on_event(&self, _event: &Event) {}
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let gaps: Box<dyn GapSource> = match args.seed {
        Some(seed) => {
            log::info!("pipe gaps seeded with {}", seed);
            Box::new(SeededGaps::new(seed))
        }
        None => Box::new(ThreadGaps),
    };
    let mut driver = LoopDriver::new(Simulation::new(gaps));
    let audio = Audio::open(args.mute);

    let (cols, rows) = terminal::size().context("failed to query terminal size")?;
    let mut term = TermRenderer::new(stdout(), cols, rows);
    term.enter().context("failed to set up the terminal")?;

    let result = run(&mut driver, &mut term, &audio, args.fps);

    // Always try to restore terminal state.
    if let Err(e) = term.exit() {
        eprintln!("failed to restore terminal: {}", e);
    }
    result?;

    println!("Highscore: {}", driver.sim().high_score());
    Ok(())
}

fn run<G: GapSource>(
    driver: &mut LoopDriver<G>,
    term: &mut TermRenderer<Stdout>,
    audio: &Audio,
    fps: u32,
) -> Result<()> {
    let frame_dur = Duration::from_secs(1) / fps;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                TermEvent::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => press(driver),
                    _ => {}
                },
                TermEvent::Resize(c, r) => term.resize(c, r),
                _ => {}
            }
        }

        let now = Instant::now();
        driver
            .tick(now - last, term)
            .context("failed to draw frame")?;
        last = now;

        for ev in driver.drain_events() {
            log::debug!("{:?}", ev);
            audio.on_event(&ev);
        }

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}

/// The single action button: start, restart or flap depending on state.
fn press<G: GapSource>(driver: &mut LoopDriver<G>) {
    match driver.sim().state() {
        GameState::Idle => {
            driver.begin();
        }
        GameState::Dead => {
            driver.revive();
        }
        GameState::Running => driver.flap(),
    }
}
