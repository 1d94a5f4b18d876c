use std::path::Path;

use clap::ArgMatches;
use tracing::{error, info};

use crate::args::RunArgs;
use crate::error::{AppError, AppResult, ValidationError};
use crate::targets::TargetList;

/// Validated inputs of a local run.
pub(super) struct RunPlan {
    pub(super) args: RunArgs,
    pub(super) targets: TargetList,
}

pub(super) fn build_plan(mut args: RunArgs, matches: &ArgMatches) -> AppResult<RunPlan> {
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(&mut args, matches, &config)?;
    }
    let targets = resolve_targets(&args)?;
    Ok(RunPlan { args, targets })
}

/// `--url` entries come first, then the entries of `--urls-file`.
fn resolve_targets(args: &RunArgs) -> AppResult<TargetList> {
    let mut urls = args.urls.clone();
    if let Some(path) = args.urls_file.as_deref() {
        let from_file = TargetList::from_file(Path::new(path))?;
        info!("Loaded {} target URLs from {}", from_file.len(), path);
        urls.extend(from_file.iter().map(str::to_owned));
    }
    if urls.is_empty() {
        error!("Missing target URLs (set --url, --urls-file, or urls in config).");
        return Err(AppError::validation(ValidationError::MissingTargets));
    }
    Ok(TargetList::new(urls)?)
}

pub(super) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    let RunPlan { args, targets } = plan;
    crate::app::run_local(&args, targets).await.map(|_outcome| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, FromArgMatches};
    use tempfile::tempdir;

    fn parse_with_matches(cli: &[&str]) -> AppResult<(RunArgs, ArgMatches)> {
        let matches = RunArgs::command().try_get_matches_from(cli)?;
        let args = RunArgs::from_arg_matches(&matches)?;
        Ok((args, matches))
    }

    #[test]
    fn plan_merges_cli_urls_and_file() -> Result<(), String> {
        let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let path = dir.path().join("urls.csv");
        std::fs::write(
            &path,
            "url\nhttps://www.blazedemo.com\nhttps://www.splunk.com\n",
        )
        .map_err(|err| format!("write failed: {}", err))?;
        let path_arg = path.to_string_lossy().into_owned();

        let (args, matches) = parse_with_matches(&[
            "vuload",
            "-u",
            "https://www.blazedemo.com",
            "-f",
            path_arg.as_str(),
        ])
        .map_err(|err| err.to_string())?;
        let plan = build_plan(args, &matches).map_err(|err| err.to_string())?;

        let urls: Vec<&str> = plan.targets.iter().collect();
        if urls != ["https://www.blazedemo.com", "https://www.splunk.com"] {
            return Err(format!("Unexpected targets: {:?}", urls));
        }
        Ok(())
    }

    #[test]
    fn plan_uses_config_file_targets() -> Result<(), String> {
        let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let path = dir.path().join("run.toml");
        std::fs::write(&path, "urls = [\"http://config.test/a\"]\nvus = 4\n")
            .map_err(|err| format!("write failed: {}", err))?;
        let path_arg = path.to_string_lossy().into_owned();

        let (args, matches) = parse_with_matches(&["vuload", "--config", path_arg.as_str()])
            .map_err(|err| err.to_string())?;
        let plan = build_plan(args, &matches).map_err(|err| err.to_string())?;
        if plan.targets.as_slice() != ["http://config.test/a"] || plan.args.vus.get() != 4 {
            return Err("Config targets and vus should apply".to_owned());
        }
        Ok(())
    }

    #[test]
    fn plan_requires_targets() -> Result<(), String> {
        let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "vus = 2\n").map_err(|err| format!("write failed: {}", err))?;
        let path_arg = path.to_string_lossy().into_owned();

        let (args, matches) = parse_with_matches(&["vuload", "--config", path_arg.as_str()])
            .map_err(|err| err.to_string())?;
        match build_plan(args, &matches) {
            Err(AppError::Validation(ValidationError::MissingTargets)) => Ok(()),
            Err(err) => Err(format!("Unexpected error: {}", err)),
            Ok(_) => Err("Expected missing targets error".to_owned()),
        }
    }
}
