//! kiosk - Main Application Entry Point
//!
//! A borderless window holding one system web view. The tao event loop owns the
//! window and the page; commands typed on stdin or written to the optional named
//! pipe are read on background threads and posted to the loop as user events.

mod platform;
mod webview;
mod window;

use kiosk_core::config::USAGE;
use kiosk_core::{CliAction, KioskResult, LaunchConfig};
use kiosk_shell::{
    spawn_console_source, spawn_pipe_source, BrowserSession, Command, CommandSink, Dispatch,
    Dispatcher, InputKind, NamedPipe,
};
use std::path::Path;
use tao::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy},
};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use window::WindowSurface;

/// Shown when no startup URL is given
const INSTRUCTIONS_HTML: &str = include_str!("ui/instructions.html");

/// Events posted to the GUI thread
#[derive(Debug, Clone)]
enum UserEvent {
    Command { source: InputKind, command: Command },
}

/// Hands commands from an input thread to the event loop
struct ProxySink {
    proxy: EventLoopProxy<UserEvent>,
}

impl CommandSink for ProxySink {
    fn submit(&self, source: InputKind, command: Command) -> bool {
        self.proxy
            .send_event(UserEvent::Command { source, command })
            .is_ok()
    }
}

fn init_logging(debug: bool) {
    // Initialize logging with log compatibility
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to set log tracer: {}", e);
    }

    let level = if debug { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set subscriber: {}", e);
    }
}

/// Create the FIFO and start reading it. Any failure leaves the app running
/// without the pipe.
fn start_pipe_source(path: &Path, proxy: &EventLoopProxy<UserEvent>) -> Option<NamedPipe> {
    let pipe = match NamedPipe::create(path) {
        Ok(pipe) => pipe,
        Err(e) => {
            warn!("Named pipe disabled: {}", e);
            return None;
        }
    };
    platform::install_cleanup_handlers(pipe.path());

    let sink = ProxySink {
        proxy: proxy.clone(),
    };
    match spawn_pipe_source(pipe.path(), sink) {
        Ok(_) => Some(pipe),
        Err(e) => {
            warn!(path = %path.display(), "Failed to open named pipe: {}", e);
            None
        }
    }
}

fn run(config: LaunchConfig) -> KioskResult<()> {
    info!("Starting kiosk...");
    info!("WebView engine: {}", webview::engine_name());
    debug!(?config, "Launch configuration");

    // Create the event loop with custom user events
    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let frame = if config.maximized {
        window::screen_frame(&event_loop).unwrap_or_else(|| {
            warn!("No monitor found; keeping the configured frame");
            config.frame
        })
    } else {
        config.frame
    };

    let main_window = window::build_window(&event_loop, frame, config.always_on_top)?;
    let page = webview::build_webview(&main_window)?;
    info!("Window created successfully");

    let mut session = BrowserSession::new(
        WindowSurface::new(main_window, page),
        frame,
        config.always_on_top,
    );
    session.open_initial(config.url.as_deref(), INSTRUCTIONS_HTML);

    let pipe = config
        .fifo_path
        .as_deref()
        .and_then(|path| start_pipe_source(path, &proxy));
    let mut dispatcher = Dispatcher::new(session, pipe, config.debug);

    if config.console {
        let sink = ProxySink {
            proxy: proxy.clone(),
        };
        if let Err(e) = spawn_console_source(sink) {
            warn!("Console input disabled: {}", e);
        }
    }

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        let command = match event {
            Event::UserEvent(UserEvent::Command { source, command }) => {
                debug!(source = source.as_str(), ?command, "Dispatching command");
                command
            }
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => Command::Exit,
            Event::LoopDestroyed => {
                dispatcher.shutdown();
                return;
            }
            _ => return,
        };

        if dispatcher.dispatch(command) == Dispatch::Exit {
            *control_flow = ControlFlow::Exit;
        }
    })
}

fn main() {
    let parsed = match LaunchConfig::from_env() {
        CliAction::Help => {
            print!("{}", USAGE);
            return;
        }
        CliAction::Launch(parsed) => parsed,
    };

    for arg in &parsed.unknown {
        println!("Unknown option: {}", arg);
    }

    let config = parsed.config;
    if !config.debug {
        platform::silence_stderr();
    }
    init_logging(config.debug);

    if let Err(e) = run(config) {
        error!("Failed to start kiosk: {}", e);
        std::process::exit(1);
    }
}
