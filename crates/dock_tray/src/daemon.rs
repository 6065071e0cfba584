use std::ffi::OsStr;

use anyhow::{Context, Result};
use tray_host::{
    sni::{self, SniSource},
    xembed::X11Source,
    ContainerPreferences, ContainerSettings, EventSender, HostAdapter, OptionalSource, SourceKind, SystemTray, TrayConfig,
    TrayEvent, X11WindowClassLookup,
};

use crate::{
    paths::TrayPaths,
    widgets::{IconFactory, JsonLinesHost},
};

pub fn run(paths: TrayPaths) -> Result<()> {
    let config = TrayConfig::read_from_file(paths.get_config_file()).context("Failed to read config.json")?;
    log::debug!("Running with {:?} ({})", config, paths);

    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().context("Failed to initialize tokio runtime")?;
    rt.block_on(run_tray(config, paths))
}

async fn run_tray(config: TrayConfig, paths: TrayPaths) -> Result<()> {
    let (events, events_recv) = tray_host::event_channel();

    {
        let events = events.clone();
        simple_signal::set_handler(&[simple_signal::Signal::Int, simple_signal::Signal::Term], move |_| {
            log::info!("Shutting down dock-tray...");
            let _ = events.send(TrayEvent::Shutdown);
        });
    }

    let con = match zbus::Connection::session().await {
        Ok(con) => Some(con),
        Err(e) => {
            log::error!("Failed to connect to the session bus, no tray icons will be shown: {}", e);
            None
        }
    };

    let x11 = match (&con, config.x11) {
        (Some(con), true) => start_x11(con, &events).await,
        _ => OptionalSource::off(SourceKind::X11Window),
    };
    let sni = match (&con, config.sni) {
        (Some(con), true) => start_sni(con, &events).await,
        _ => OptionalSource::off(SourceKind::StatusNotifierItem),
    };

    {
        let paths = paths.clone();
        let events = events.clone();
        tokio::spawn(async move {
            if let Err(e) = watch_containers(paths, events).await {
                log::warn!("Not watching for container changes, they apply after a restart: {:?}", e);
            }
        });
    }

    let adapter = HostAdapter::new(JsonLinesHost::new(std::io::stdout()), load_containers(&paths));
    let mut tray = SystemTray::new(IconFactory::new(con), adapter, events, config.x11_settle_delay());
    tray.init();
    tray.run(&x11, &sni, events_recv).await;

    log::info!("System tray finished");
    Ok(())
}

async fn start_x11(con: &zbus::Connection, events: &EventSender) -> OptionalSource<X11Source> {
    let source = async {
        let source = X11Source::new(con).await?;
        source.manage().await?;
        tray_host::Result::Ok(source)
    };
    match source.await {
        Ok(source) => {
            let forwarder = source.clone();
            let events = events.clone();
            tokio::spawn(async move {
                if let Err(e) = forwarder.forward_changes(events).await {
                    log::error!("Stopped following the tray manager: {}", e);
                }
            });
            OptionalSource::on(source)
        }
        Err(e) => {
            log::warn!("XEmbed tray icons are unavailable: {}", e);
            OptionalSource::off(SourceKind::X11Window)
        }
    }
}

async fn start_sni(con: &zbus::Connection, events: &EventSender) -> OptionalSource<SniSource> {
    match sni::register_host(con).await {
        Ok((name, snw)) => {
            log::info!("Registered StatusNotifierHost {}", name);
            let source = SniSource::new(snw);
            let forwarder = source.clone();
            let events = events.clone();
            tokio::spawn(async move {
                if let Err(e) = forwarder.forward_changes(events).await {
                    log::error!("Stopped following the StatusNotifierWatcher: {}", e);
                }
            });
            OptionalSource::on(source)
        }
        Err(e) => {
            log::warn!("StatusNotifierItems are unavailable: {}", e);
            OptionalSource::off(SourceKind::StatusNotifierItem)
        }
    }
}

/// Container preferences backed by `containers.json`. Problems only cost the user their stored
/// choices, so they are logged rather than fatal.
pub fn load_containers(paths: &TrayPaths) -> ContainerPreferences {
    let settings = ContainerSettings::load(paths.get_containers_file()).unwrap_or_else(|e| {
        log::warn!("Ignoring stored container preferences: {}", e);
        ContainerSettings::in_memory()
    });
    match X11WindowClassLookup::connect() {
        Ok(lookup) => ContainerPreferences::new(settings, lookup),
        Err(e) => {
            log::warn!("Can't look up window classes, icons can't be moved to the container: {}", e);
            ContainerPreferences::new(settings, ())
        }
    }
}

/// Post [`TrayEvent::ContainersChanged`] whenever `containers.json` is written, so that
/// `dock-tray container --set` reaches the running tray.
async fn watch_containers(paths: TrayPaths, events: EventSender) -> Result<()> {
    use notify::{RecursiveMode, Watcher};

    let containers_file = paths.get_containers_file();
    let file_name = containers_file.file_name().context("containers file has no name")?.to_owned();
    std::fs::create_dir_all(paths.get_config_dir())
        .with_context(|| format!("Failed to create {}", paths.get_config_dir().display()))?;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| match res {
        Ok(event) if is_containers_change(&event, &file_name) => {
            let _ = tx.send(());
        }
        Ok(_) => {}
        Err(e) => log::error!("Encountered error while watching {}: {}", containers_file.display(), e),
    })?;
    watcher.watch(paths.get_config_dir(), RecursiveMode::NonRecursive)?;

    while rx.recv().await.is_some() {
        // a single save shows up as several events, and reading right away may see a half-written file
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        while rx.try_recv().is_ok() {}

        log::debug!("Container settings changed on disk");
        if events.send(TrayEvent::ContainersChanged).is_err() {
            break;
        }
    }
    Ok(())
}

fn is_containers_change(event: &notify::Event, file_name: &OsStr) -> bool {
    matches!(event.kind, notify::EventKind::Create(_) | notify::EventKind::Modify(_))
        && event.paths.iter().any(|path| path.file_name() == Some(file_name))
}
