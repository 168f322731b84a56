//! yaterm entry point.

use clap::Parser;
use yaterm_core::{PortEnumerator, Session};
use yaterm_serial::{DevPorts, SerialTransport};
use yaterm_tui::{Args, Runtime, TomlSettings, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_path = args.log_file.clone().unwrap_or_else(logging::default_log_path);
    logging::init(&log_path, &args.log_level)?;

    // A broken settings file is left alone rather than overwritten on exit.
    let mut store = match args.settings.clone().or_else(TomlSettings::default_path) {
        Some(path) => TomlSettings::load(path).unwrap_or_else(|err| {
            tracing::warn!("Ignoring settings: {err}");
            TomlSettings::in_memory()
        }),
        None => TomlSettings::in_memory(),
    };

    let (transport, serial_rx) = SerialTransport::new();
    let mut session = Session::new(transport, args.session_config())?;
    session.restore_settings(&store);
    args.apply(&mut session)?;

    let ports = DevPorts::new();
    session.set_available_ports(ports.list_available_ports());
    if args.connect && let Err(err) = session.connect() {
        tracing::warn!("Initial connect failed: {err}");
    }

    let session = Runtime::new(session, serial_rx, ports)?.run().await?;

    session.save_settings(&mut store);
    store.save()?;
    Ok(())
}
