//! Search first; on a miss, provision and seed a fresh directory chain.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::finder;
use crate::platform::{Outcome, PlatformOps};
use crate::provision::{chain_path, provision, resolve_base};
use crate::seed::{self, UserData};

/// What a run ended with.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunReport {
    /// Existing directories matched; nothing was created.
    Found { matches: Vec<PathBuf> },
    /// Dry run: nothing matched and nothing was created.
    Planned { base: PathBuf, path: PathBuf },
    Created(Provisioned),
}

/// A freshly provisioned directory and how each follow-up step went.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Provisioned {
    pub base: PathBuf,
    /// Path as created, before any hiding.
    pub created: PathBuf,
    /// Path after hiding; the marker and user data live here.
    pub path: PathBuf,
    pub hide: Option<Outcome>,
    pub permissions: Option<Outcome>,
    pub marker: Outcome,
    pub user_data: UserData,
}

pub fn run(config: &EngineConfig, platform: &dyn PlatformOps) -> Result<RunReport, EngineError> {
    config.validate()?;

    let roots: Box<dyn Iterator<Item = PathBuf>> = match &config.search_roots {
        Some(roots) => Box::new(roots.clone().into_iter()),
        None => platform.search_roots(),
    };
    let matches = finder::find(&config.target_name, roots, config.max_results);
    if !matches.is_empty() {
        info!(count = matches.len(), name = %config.target_name, "found existing directories");
        return Ok(RunReport::Found { matches });
    }

    info!(name = %config.target_name, "no existing directory found");
    let base = match &config.base_dir {
        Some(base) => base.clone(),
        None => resolve_base(platform, config.prefer_app_data),
    };
    debug!(base = %base.display(), family = platform.family(), "resolved base directory");

    if config.dry_run {
        let path = chain_path(&base, &config.target_name, &config.subdirs);
        return Ok(RunReport::Planned { base, path });
    }

    let created = provision(&base, &config.target_name, &config.subdirs)?;
    info!(path = %created.display(), "created directory chain");

    let mut path = created.clone();
    let hide = if config.hide {
        let hidden = platform.hide(&path);
        path = hidden.value;
        Some(hidden.outcome)
    } else {
        None
    };

    let permissions = config
        .owner_only
        .then(|| platform.restrict_to_owner(&path).outcome);

    let marker = seed::write_marker(&path).outcome;
    let user_data = seed::read_or_create_user_data(&path)?;

    Ok(RunReport::Created(Provisioned {
        base,
        created,
        path,
        hide,
        permissions,
        marker,
        user_data,
    }))
}
