use std::io::{self, BufRead};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;

use anyhow::Context;
use clap::Parser;
use discuss::app::App;
use discuss::cli::Cli;
use discuss::providers::provider_for_options;
use discuss::runtime::{RuntimeController, UiEvent};
use discuss::tui::{ChatScreen, PaintMode};
use discuss_tui::logging::init_logging;
use discuss_tui::terminal::{stdout_is_terminal, terminal_size};
use discuss_tui::EnvConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut env_config = EnvConfig::from_env();
    env_config.force_narrow |= cli.narrow;
    init_logging(&env_config).context("failed to initialize logging")?;

    let provider = provider_for_options(&cli.provider_options())
        .context("failed to start the completion provider (use --provider mock to run offline)")?;
    let profile = provider.profile();
    tracing::info!(
        provider = %profile.provider_id,
        model = %profile.model_id,
        "discuss starting"
    );

    let (events, inbox) = mpsc::channel();
    let controller = RuntimeController::new(provider, events.clone());
    spawn_input_reader(events).context("failed to start the input reader")?;

    let interactive = stdout_is_terminal();
    let mode = if interactive {
        PaintMode::Repaint
    } else {
        PaintMode::Append
    };
    let mut screen = ChatScreen::new(profile, interactive && !env_config.no_color, mode);
    let mut app = App::new();
    let mut host = Arc::clone(&controller);

    if let Some(prompt) = cli.prompt.as_deref() {
        app.on_line(prompt, &mut host);
    }
    present(&mut screen, &app, &env_config, cli.width)?;

    // Once stdin is gone, quit as soon as no reply is outstanding.
    let mut input_closed = false;
    for event in inbox.iter() {
        match event {
            UiEvent::Line(line) => app.on_line(&line, &mut host),
            UiEvent::InputClosed => input_closed = true,
            UiEvent::Completion(event) => controller.apply_completion_event(&mut app, event),
        }

        if input_closed && !app.is_loading() && !app.should_exit {
            app.on_quit(&mut host);
        }

        if controller.take_render_request() {
            present(&mut screen, &app, &env_config, cli.width)?;
        }

        if app.should_exit || controller.stop_requested() {
            break;
        }
    }

    controller.shutdown();
    if interactive {
        println!();
    }
    tracing::info!("discuss exiting");
    Ok(())
}

fn present(
    screen: &mut ChatScreen,
    app: &App,
    config: &EnvConfig,
    width_override: Option<u16>,
) -> anyhow::Result<()> {
    let columns = usize::from(width_override.unwrap_or_else(|| terminal_size().0));
    let viewport = app.viewport(columns, config);
    let mut out = io::stdout().lock();
    screen
        .present(app, &mut out, columns, viewport)
        .context("failed to write to the terminal")
}

fn spawn_input_reader(events: Sender<UiEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("discuss-input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if events.send(UiEvent::Line(line)).is_err() {
                            return;
                        }
                    }
                    Err(error) => {
                        tracing::warn!(%error, "stdin read failed");
                        break;
                    }
                }
            }
            let _ = events.send(UiEvent::InputClosed);
        })?;
    Ok(())
}
