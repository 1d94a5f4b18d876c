mod plan;

use std::ffi::OsString;
use std::path::Path;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::{DEFAULT_CONFIG_FILES, RunArgs};
use crate::error::AppResult;
use plan::{build_plan, execute_plan};

pub(crate) fn run() -> AppResult<()> {
    let Some((args, matches)) = parse_args()? else {
        return Ok(());
    };

    crate::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args, &matches))
}

fn parse_args() -> AppResult<Option<(RunArgs, ArgMatches)>> {
    let mut cmd = RunArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = RunArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

/// A bare invocation prints help unless a default config file can drive the run.
fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(args: RunArgs, matches: &ArgMatches) -> AppResult<()> {
    let plan = build_plan(args, matches)?;
    execute_plan(plan).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_only_for_bare_invocations() -> Result<(), String> {
        let with_url: Vec<OsString> = ["vuload", "-u", "http://localhost"]
            .iter()
            .map(OsString::from)
            .collect();
        if should_show_help(&with_url) {
            return Err("Arguments should not trigger help".to_owned());
        }
        let bare = [OsString::from("vuload")];
        if should_show_help(&bare) == has_default_config() {
            return Err("Bare invocation shows help unless a config file exists".to_owned());
        }
        Ok(())
    }
}
