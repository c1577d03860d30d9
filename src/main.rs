//! A signal-driven animation engine with a terminal demo.
//!
//! Run the binary to launch the interactive demo.
//! Run `simulate <effect>` to drive one effect headlessly and print its
//! outputs, or `list` to see the registered effects.

use std::io::{self, stderr, Write};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use signal_anim::app::{
    event::{spawn_event_reader, AppEvent},
    handler, simulate,
    state::DemoState,
};
use signal_anim::config::{LeaveMode, Settings};
use signal_anim::core::mapper::Easing;
use signal_anim::core::registry::{Effect, EffectRegistry};
use signal_anim::ui::{
    layout::AppLayout,
    page::PageWidget,
    panels::{MeterWidget, TickerWidget, TiltCardWidget},
    popup::HelpPopup,
    spinner::ActivityIndicator,
    theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Signal-driven animation engine demo")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Write the effective settings to the config file and exit.
    #[arg(long = "write-config", global = true)]
    write_config: bool,

    /// Frame interval in milliseconds (overrides the config file).
    #[arg(long = "frame-ms", global = true)]
    frame_ms: Option<u64>,

    /// Value the number ticker counts up to.
    #[arg(long = "ticker-target", global = true)]
    ticker_target: Option<f64>,

    /// Ticker update interval in milliseconds; 0 updates every frame.
    #[arg(long = "ticker-interval-ms", global = true)]
    ticker_interval_ms: Option<u64>,

    /// Freeze the tilt card when the pointer leaves instead of re-centring.
    #[arg(long, global = true)]
    freeze_on_leave: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive terminal demo (the default).
    Run,
    /// Drive one effect on a simulated clock and print every output.
    Simulate {
        /// Effect name or alias (see `list`).
        effect: Effect,
        /// Number of frames to run.
        #[arg(long, default_value_t = 60)]
        frames: u32,
        /// Final scroll offset for scroll-driven effects.
        #[arg(long = "scroll-to", default_value_t = 200.0)]
        scroll_to: f64,
        /// Replace the effect's easing curve.
        #[arg(long, value_enum)]
        easing: Option<EasingArg>,
        /// Spring damping ratio (with `--easing spring`).
        #[arg(long, default_value_t = 0.5)]
        damping: f64,
        /// Spring natural frequency, radians per unit of progress.
        #[arg(long, default_value_t = 12.0)]
        frequency: f64,
    },
    /// Print the registered effects.
    List,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EasingArg {
    Linear,
    Quadratic,
    EaseOut,
    Smoothstep,
    Spring,
}

impl EasingArg {
    fn easing(self, damping_ratio: f64, frequency: f64) -> Easing {
        match self {
            EasingArg::Linear => Easing::Identity,
            EasingArg::Quadratic => Easing::Quadratic,
            EasingArg::EaseOut => Easing::EaseOutQuad,
            EasingArg::Smoothstep => Easing::Smoothstep,
            EasingArg::Spring => Easing::Spring {
                damping_ratio,
                frequency,
            },
        }
    }
}

impl Cli {
    /// Config file values with command-line overrides applied.
    fn settings(&self) -> Settings {
        let mut settings = Settings::load();
        if let Some(ms) = self.frame_ms {
            settings.frame_ms = ms.clamp(8, 250);
        }
        if let Some(target) = self.ticker_target.filter(|t| t.is_finite()) {
            settings.ticker_target = target;
        }
        if let Some(ms) = self.ticker_interval_ms {
            settings.ticker_interval_ms = ms.min(10_000);
        }
        if self.freeze_on_leave {
            settings.pointer_leave = LeaveMode::Freeze;
        }
        settings
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only prints when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();
    let settings = cli.settings();

    if cli.write_config {
        let path = settings.save()?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    match cli.command {
        Some(Command::List) => {
            let mut out = io::stdout().lock();
            for effect in EffectRegistry::builtin().iter() {
                writeln!(out, "{:<18} {}", effect.name(), effect.summary())?;
            }
            Ok(())
        }
        Some(Command::Simulate {
            effect,
            frames,
            scroll_to,
            easing,
            damping,
            frequency,
        }) => {
            let opts = simulate::SimOptions {
                effect,
                frame_interval: settings.frame_interval(),
                frames,
                scroll_to,
                easing: easing.map(|e| e.easing(damping, frequency)),
            };
            simulate::run(&opts, &settings.effect_params(), &mut io::stdout().lock())?;
            Ok(())
        }
        Some(Command::Run) | None => run_demo(settings).await,
    }
}

async fn run_demo(settings: Settings) -> Result<()> {
    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(
        stderr_handle,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut state = DemoState::new(settings, Rect::new(0, 0, size.width, size.height));
    let mut events = spawn_event_reader(state.settings.frame_interval());
    let result = event_loop(&mut terminal, &mut state, &mut events).await;
    state.shutdown();

    // ── teardown ──────────────────────────────────────────────
    // Restore the terminal even if the loop failed.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut DemoState,
    events: &mut tokio::sync::mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, state))?;

        let Some(event) = events.recv().await else {
            break;
        };
        apply(state, event);
        // Drain whatever else is queued so a burst of mouse moves costs one draw.
        while let Ok(event) = events.try_recv() {
            apply(state, event);
        }

        if state.should_quit {
            break;
        }
    }
    Ok(())
}

fn apply(state: &mut DemoState, event: AppEvent) {
    match event {
        AppEvent::Key(k) => handler::handle_key(state, k),
        AppEvent::Mouse(m) => handler::handle_mouse(state, m),
        AppEvent::Resize(w, h) => state.resize(w, h),
        AppEvent::FocusLost => state.pointer_leave(),
        AppEvent::Frame => state.on_frame(),
    }
}

fn draw(frame: &mut ratatui::Frame, state: &DemoState) {
    let layout = AppLayout::from_area(frame.area());

    let pane = |title: &'static str| {
        Block::default()
            .title(title)
            .title_style(Theme::title_style())
            .borders(Borders::ALL)
            .border_style(Theme::border_style())
    };

    frame.render_widget(
        PageWidget {
            page: state.page,
            scroll_y: state.scroll.position().round() as u16,
            beam: state.output(Effect::TimelineBeam),
            container: state.output(Effect::ContainerScroll),
            block: None,
        }
        .block(pane(" page ")),
        layout.page_area,
    );
    frame.render_widget(
        TickerWidget {
            output: state.output(Effect::NumberTicker),
            phase: state.phase(Effect::NumberTicker),
            block: pane(" number ticker "),
        },
        layout.ticker_area,
    );
    frame.render_widget(
        TiltCardWidget {
            tilt: state.output(Effect::TiltCard).and_then(|o| o.tilt),
            block: pane(" tilt card "),
        },
        layout.card_area,
    );
    frame.render_widget(
        MeterWidget {
            output: state.output(Effect::ProgressMeter),
            block: pane(" progress meter "),
        },
        layout.meter_area,
    );
    frame.render_widget(
        ActivityIndicator {
            visible: state.engine.wants_frames(),
            tick: state.frame_count,
        },
        layout.ticker_area,
    );

    let status = match (&state.status_message, state.last_diagnostic.borrow().clone()) {
        (Some(msg), _) => Paragraph::new(msg.clone()).style(Theme::status_bar_style()),
        (None, Some(diag)) => Paragraph::new(diag).style(Theme::warning_style()),
        (None, None) => Paragraph::new(Line::from(vec![
            Span::raw(" q quit · j/k scroll · r replay · +/- meter · l leave mode · ? help"),
            Span::raw(format!(
                "   {} bindings, {} listening",
                state.engine.binding_count(),
                state.engine.listener_count()
            )),
        ]))
        .style(Theme::status_bar_style()),
    };
    frame.render_widget(status, layout.status_area);

    if state.show_help {
        frame.render_widget(
            HelpPopup {
                leave_mode: state.settings.pointer_leave,
            },
            frame.area(),
        );
    }
}
