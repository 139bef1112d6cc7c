mod api;
mod app;
mod cli;
mod color;
mod data;
mod state;
mod ui;

use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

use app::DashboardApp;
use clap::Parser;
use cli::Cli;
use eframe::egui;
use state::AppState;

fn main() -> ExitCode {
    env_logger::init();
    let args = Cli::parse();

    // The table is loaded once and never changes; without it there is
    // nothing to show.
    let dataset = match data::loader::load_file(&args.data) {
        Ok(ds) => Arc::new(ds),
        Err(e) => {
            log::error!("Failed to load {}: {e:#}", args.data.display());
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if dataset.is_empty() {
        log::warn!("{} contains no launches; charts will be empty", args.data.display());
    }

    let api = api::spawn(args.api_addr(), Arc::clone(&dataset));

    if args.headless {
        return match api {
            Ok(handle) => server_exit_code(handle.join()),
            Err(e) => {
                log::error!("API unavailable: {e:#}");
                ExitCode::FAILURE
            }
        };
    }

    let mut state = AppState::new(dataset);
    state.status_message = Some(match &api {
        Ok(_) => format!("API on http://{}", args.api_addr()),
        Err(e) => {
            log::error!("API unavailable: {e:#}");
            format!("API unavailable: {e}")
        }
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 900.0])
            .with_min_inner_size([600.0, 500.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "SpaceX Launch Records Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Dashboard window failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Exit status of a headless run: success only when the server thread
/// neither panicked nor returned an error.
fn server_exit_code(joined: thread::Result<anyhow::Result<()>>) -> ExitCode {
    match joined {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(e)) => {
            log::error!("API server failed: {e:#}");
            ExitCode::FAILURE
        }
        Err(_) => {
            log::error!("API server thread panicked");
            ExitCode::FAILURE
        }
    }
}
