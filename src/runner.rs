use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use camino::Utf8PathBuf;
use devdata::config::{self, EngineConfig};
use devdata::engine::{self, Provisioned, RunReport};
use devdata::platform::{self, Outcome, PlatformOps};
use devdata::seed::{self, UserData};
use tracing::debug;

use crate::cli::{Cli, Command};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ConfigPathSource {
    Explicit,
    HomeDefault,
}

impl ConfigPathSource {
    fn as_str(&self) -> &'static str {
        match self {
            ConfigPathSource::Explicit => "explicit",
            ConfigPathSource::HomeDefault => "home-default",
        }
    }
}

#[derive(Clone, Debug)]
struct ResolvedConfigPath {
    path: Utf8PathBuf,
    source: ConfigPathSource,
}

pub fn run(cli: Cli) -> Result<()> {
    let platform = platform::detect();
    debug!(family = platform.family(), "selected platform strategy");

    match &cli.command {
        Some(Command::Roots) => handle_roots(&cli, platform.as_ref()),
        Some(Command::Userdata { dir }) => handle_userdata(dir, cli.json),
        None => handle_provision(&cli, platform.as_ref()),
    }
}

fn handle_provision(cli: &Cli, platform: &dyn PlatformOps) -> Result<()> {
    let config = build_config(cli)?;
    let report = engine::run(&config, platform)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match report {
        RunReport::Found { matches } => {
            println!("Found {} result(s):", matches.len());
            for path in matches {
                println!("{}", path.display());
            }
        }
        RunReport::Planned { base, path } => {
            println!("No existing folder found.");
            println!("Base directory: {}", base.display());
            println!("    (dry-run) would create {}", path.display());
        }
        RunReport::Created(created) => print_created(&created),
    }
    Ok(())
}

fn print_created(created: &Provisioned) {
    println!("No existing folder found. Created a new one.");
    println!("Base directory: {}", created.base.display());
    println!("Created: {}", created.created.display());
    if let Some(outcome) = &created.hide {
        println!("Hide {}: {}", outcome, created.path.display());
    }
    if let Some(outcome) = &created.permissions {
        println!("Owner-only permissions {}: {}", outcome, created.path.display());
    }
    if let Outcome::Failed(reason) = &created.marker {
        println!("Marker file not written: {}", reason);
    }
    println!("Final path: {}", created.path.display());
    print_user_data(&created.user_data);
}

fn print_user_data(data: &UserData) {
    if data.created {
        println!("Created {}", data.path.display());
    } else {
        println!("Read {}", data.path.display());
    }
    println!("File content:\n{}", data.content);
}

fn handle_roots(cli: &Cli, platform: &dyn PlatformOps) -> Result<()> {
    let roots: Vec<PathBuf> = if cli.roots.is_empty() {
        platform.search_roots().collect()
    } else {
        cli.roots.clone()
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&roots)?);
        return Ok(());
    }

    println!("Search roots ({}):", platform.family());
    for root in roots {
        println!("  - {}", root.display());
    }
    Ok(())
}

fn handle_userdata(dir: &Path, json: bool) -> Result<()> {
    let data = seed::read_or_create_user_data(dir)
        .with_context(|| format!("preparing user data in {}", dir.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        print_user_data(&data);
    }
    Ok(())
}

/// Defaults, then the config file, then command-line flags.
fn build_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = EngineConfig::default();

    if let Some(resolved) = resolve_config_path(cli)? {
        debug!(path = %resolved.path, source = resolved.source.as_str(), "loading config");
        let file = config::load_from_path(&resolved.path)?;
        config.apply_file(file);
    }

    if let Some(name) = &cli.name {
        config.target_name = name.clone();
    }
    if let Some(sub) = &cli.sub {
        config.subdirs = sub.clone();
    }
    if let Some(max) = cli.max_results {
        config.max_results = max;
    }
    if !cli.roots.is_empty() {
        config.search_roots = Some(cli.roots.clone());
    }
    if let Some(base) = &cli.base {
        config.base_dir = Some(base.clone());
    }
    config.hide |= cli.hide;
    config.prefer_app_data |= cli.use_appdata;
    config.owner_only |= cli.owner_only;
    config.dry_run = cli.dry_run;

    Ok(config)
}

/// An explicit `--config` must exist; the home default is optional.
fn resolve_config_path(cli: &Cli) -> Result<Option<ResolvedConfigPath>> {
    if let Some(path) = &cli.config {
        let path = Utf8PathBuf::from_path_buf(path.clone())
            .map_err(|_| anyhow!("config path must be valid UTF-8"))?;
        if !path.exists() {
            return Err(anyhow!("config file {} does not exist", path));
        }
        return Ok(Some(ResolvedConfigPath {
            path,
            source: ConfigPathSource::Explicit,
        }));
    }

    Ok(config::default_path()
        .filter(|path| path.exists())
        .map(|path| ResolvedConfigPath {
            path,
            source: ConfigPathSource::HomeDefault,
        }))
}
