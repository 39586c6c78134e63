// Copyright 2026 HyperDash Contributors
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use hyperdash_app::AppState;
use hyperdash_data::CrmFaker;
use runtime::LlmRuntime;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `hyperdash --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let llm_client = if config.llm_enabled() {
        Some(
            hyperdash_llm::Client::new(
                config.llm_base_url(),
                config.llm_model(),
                config.llm_api_key(),
                config.llm_timeout()?,
            )
            .with_context(|| {
                format!(
                    "invalid [llm] config in {}; fix base_url/model/timeout values",
                    options.config_path.display()
                )
            })?,
        )
    } else {
        None
    };

    if options.check_only {
        if let Some(client) = &llm_client {
            client.ping().with_context(|| {
                format!(
                    "LLM check failed for {}; fix [llm] in {} or set enabled = false",
                    client.base_url(),
                    options.config_path.display()
                )
            })?;
        }
        println!("ok");
        return Ok(());
    }

    let seed = options.seed.unwrap_or_else(|| config.seed());
    let workspace = CrmFaker::new(seed).workspace(config.counts());

    let mut state = AppState {
        route: config.default_route(),
        ..AppState::default()
    };

    let mut runtime = LlmRuntime::new(
        llm_client,
        config.llm_extra_context(),
        LlmRuntime::default_transcript_path()?,
    );
    hyperdash_tui::run_app(&mut state, &workspace, &mut runtime, config.page_size())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    seed: Option<u64>,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        seed: None,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--seed" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?;
                options.seed = Some(value.as_ref().parse().map_err(|_| {
                    anyhow::anyhow!("--seed requires a non-negative number, got {:?}", value.as_ref())
                })?);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("hyperdash");
    println!("  --config <path>          Use a specific config path");
    println!("  --seed <n>               Override the mock-data seed");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config and LLM reachability");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args};
    use anyhow::Result;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/hyperdash-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                seed: None,
                print_config_path: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_config_value() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));
    }

    #[test]
    fn parse_cli_args_parses_seed_override() -> Result<()> {
        let options = parse_cli_args(vec!["--seed", "99"], default_options_path())?;
        assert_eq!(options.seed, Some(99));
        Ok(())
    }

    #[test]
    fn parse_cli_args_rejects_non_numeric_seed() {
        let error = parse_cli_args(vec!["--seed", "lots"], default_options_path())
            .expect_err("non-numeric seed should fail");
        assert!(error.to_string().contains("non-negative number"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }
}
