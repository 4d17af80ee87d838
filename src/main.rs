//! Wavecut - upload short recordings, trim them to a cut window, play the cut
//!
//! This is the main entry point for the Wavecut server and its offline tools.

mod audio;
mod cli;
mod editor;
mod error;
mod models;
mod server;
mod settings;
mod state;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use audio::{PlaybackController, Sound, WavFileSink, WavSound};
use clap::Parser;
use cli::Command;
use editor::EditSession;
use log::info;
use settings::Settings;
use state::Library;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments and initialize logging
    let args = cli::Args::parse();
    cli::init_logging(&args);

    let settings = Settings::resolve(args.root.clone())?;
    let library = Library::open(&settings).context("failed to open recording library")?;

    match args.command {
        Command::Serve { port } => serve(library, port).await,
        Command::List => list(&library),
        Command::Show {
            name,
            autocut,
            threshold,
            drag,
            save,
            width,
            height,
        } => {
            let recording = library.edit(&name)?;
            let sound = WavSound::decode(&recording.audio)
                .with_context(|| format!("failed to decode '{}'", recording.name))?;

            let mut session = EditSession::new(&recording.name, &sound, Some(recording.cut))
                .with_display(width, height);
            if autocut {
                session.autocut(threshold);
            }
            for gesture in drag.chunks_exact(2) {
                session.drag(gesture[0], gesture[1]);
            }

            let window = session.window();
            print!("{}", session.frame().to_text());
            println!(
                "{}: {:.3}s..{:.3}s ({:.3}s of {:.3}s)",
                session.name(),
                window.start,
                window.end,
                window.length(),
                sound.duration()
            );

            if save {
                library.save(&recording.name, &recording.audio, window)?;
                info!("Saved cut window for {}", recording.name);
            }
            Ok(())
        }
        Command::Export { name, output } => export(&library, &name, &output),
    }
}

async fn serve(library: Library, port: u16) -> anyhow::Result<()> {
    let listen = SocketAddr::from(([0, 0, 0, 0], port));
    let app = server::router(Arc::new(library));

    info!("Starting wavecut server on {}", listen);
    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("failed to bind {}", listen))?;
    axum::serve(listener, app.into_make_service())
        .await
        .context("server exited")?;
    Ok(())
}

fn list(library: &Library) -> anyhow::Result<()> {
    let mut entries = library.list()?;
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    for entry in entries {
        match entry.cut {
            Some(cut) => println!("{}\t{:.3}s..{:.3}s", entry.name, cut.start, cut.end),
            None => println!("{}\t(no cut)", entry.name),
        }
    }
    Ok(())
}

/// Play the stored cut window into a WAV file
fn export(library: &Library, name: &str, output: &Path) -> anyhow::Result<()> {
    let recording = library.edit(name)?;
    let sound = WavSound::decode(&recording.audio)
        .with_context(|| format!("failed to decode '{}'", recording.name))?;

    let mut player = PlaybackController::new(WavFileSink::new(output));
    player
        .toggle(&sound, recording.cut)
        .with_context(|| format!("failed to export '{}'", recording.name))?;
    // A file sink is done as soon as it has been written
    if player.is_playing() {
        player.finished();
    }

    println!(
        "{} -> {} ({} bytes)",
        recording.name,
        output.display(),
        player.sink().written()
    );
    Ok(())
}
