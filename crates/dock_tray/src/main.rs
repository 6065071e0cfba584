use anyhow::{bail, Context, Result};
use clap::CommandFactory as _;
use paths::TrayPaths;
use tray_host::TrayKey;

mod daemon;
mod opts;
mod paths;
mod widgets;

fn main() {
    let opts: opts::Opt = opts::Opt::from_env();

    let log_level_filter = if opts.log_debug { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    if std::env::var("RUST_LOG").is_ok() {
        pretty_env_logger::init_timed();
    } else {
        pretty_env_logger::formatted_timed_builder()
            .filter(Some("dock_tray"), log_level_filter)
            .filter(Some("tray_host"), log_level_filter)
            .init();
    }

    if let opts::Action::ShellCompletions { shell } = opts.action {
        clap_complete::generate(shell, &mut opts::RawOpt::command(), "dock-tray", &mut std::io::stdout());
        return;
    }

    if let Err(err) = run(opts) {
        log::error!("{:?}", err);
        std::process::exit(1);
    }
}

fn run(opts: opts::Opt) -> Result<()> {
    let paths = opts
        .config_path
        .map(TrayPaths::from_config_dir)
        .unwrap_or_else(TrayPaths::default)
        .context("Failed to initialize dock-tray paths")?;

    match opts.action {
        opts::Action::ShellCompletions { .. } => unreachable!(),
        opts::Action::Run => daemon::run(paths),
        opts::Action::Container { key, set } => handle_container(&paths, &key, set),
    }
}

fn handle_container(paths: &TrayPaths, key: &str, set: Option<bool>) -> Result<()> {
    let key: TrayKey = key.parse()?;
    let mut containers = daemon::load_containers(paths);
    if !containers.allow_container(&key) {
        bail!("{} can't be moved to the container, only XEmbed icons can", key);
    }

    match set {
        None => println!("{}", containers.is_in_container(&key)),
        Some(in_container) => {
            if !containers.set_in_container(&key, in_container)? {
                bail!("Couldn't find the application of {}, is the window still around?", key);
            }
        }
    }
    Ok(())
}
