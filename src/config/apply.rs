use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveU64, PositiveUsize, RunArgs};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::{ConfigFile, DurationValue};

/// Applies configuration values to CLI arguments. Values given on the command
/// line win over the config file.
///
/// # Errors
///
/// Returns an error when config values are invalid.
pub fn apply_config(
    args: &mut RunArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "urls")
        && let Some(urls) = config.urls.clone()
    {
        args.urls = urls;
    }

    if !is_cli(matches, "urls_file")
        && let Some(path) = config.urls_file.clone()
    {
        args.urls_file = Some(path);
    }

    if !is_cli(matches, "vus")
        && let Some(vus) = config.vus
    {
        args.vus = ensure_positive_usize(vus, "vus")?;
    }

    if !is_cli(matches, "duration")
        && let Some(duration) = config.duration.as_ref()
    {
        args.duration = config_duration(duration, "duration")?;
    }

    if !is_cli(matches, "sleep")
        && let Some(sleep) = config.sleep.as_ref()
    {
        args.sleep = sleep.to_pause().map_err(|err| invalid_duration("sleep", err))?;
    }

    if !is_cli(matches, "iterations")
        && let Some(iterations) = config.iterations
    {
        args.iterations = Some(ensure_positive_u64(iterations, "iterations")?);
    }

    if !is_cli(matches, "ramp_up")
        && let Some(ramp_up) = config.ramp_up.as_ref()
    {
        args.ramp_up = Some(config_duration(ramp_up, "ramp_up")?);
    }

    if !is_cli(matches, "seed")
        && let Some(seed) = config.seed
    {
        args.seed = Some(seed);
    }

    if !is_cli(matches, "expected_status")
        && let Some(status) = config.expected_status
    {
        args.expected_status = status;
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = Some(config_duration(timeout, "timeout")?);
    }

    if !is_cli(matches, "redirect_limit")
        && let Some(redirect) = config.redirect
    {
        args.redirect_limit = redirect;
    }

    if !is_cli(matches, "insecure")
        && let Some(insecure) = config.insecure
    {
        args.insecure = insecure;
    }

    if !is_cli(matches, "export_csv")
        && let Some(path) = config.export_csv.clone()
    {
        args.export_csv = Some(path);
    }

    if !is_cli(matches, "export_json")
        && let Some(path) = config.export_json.clone()
    {
        args.export_json = Some(path);
    }

    if !is_cli(matches, "report")
        && let Some(path) = config.report.clone()
    {
        args.report = Some(path);
    }

    if !is_cli(matches, "metrics_max")
        && let Some(max) = config.metrics_max
    {
        args.metrics_max = ensure_positive_usize(max, "metrics_max")?;
    }

    if !is_cli(matches, "progress_interval")
        && let Some(interval) = config.progress_interval.as_ref()
    {
        args.progress_interval = config_duration(interval, "progress_interval")?;
    }

    if !is_cli(matches, "no_summary")
        && let Some(summary) = config.summary
    {
        args.no_summary = !summary;
    }

    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    if let Some(slo) = config.slo.as_ref() {
        if !is_cli(matches, "slo_p95_ms")
            && let Some(p95_ms) = slo.p95_ms
        {
            args.slo_p95_ms = ensure_positive_u64(p95_ms, "slo.p95_ms")?;
        }

        if !is_cli(matches, "slo_error_rate")
            && let Some(error_pct) = slo.error_pct.as_ref()
        {
            args.slo_error_rate = error_pct.to_basis_points().map_err(|err| {
                AppError::config(ConfigError::InvalidPercent {
                    field: "slo.error_pct".to_owned(),
                    source: err,
                })
            })?;
        }

        if !is_cli(matches, "enforce_slo")
            && let Some(enforce) = slo.enforce
        {
            args.enforce_slo = enforce;
        }
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn config_duration(value: &DurationValue, field: &str) -> AppResult<std::time::Duration> {
    value
        .to_duration()
        .map_err(|err| invalid_duration(field, err))
}

fn invalid_duration(field: &str, source: ValidationError) -> AppError {
    AppError::config(ConfigError::InvalidDuration {
        field: field.to_owned(),
        source,
    })
}

fn ensure_positive_u64(value: u64, field: &str) -> AppResult<PositiveU64> {
    PositiveU64::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn ensure_positive_usize(value: usize, field: &str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}
