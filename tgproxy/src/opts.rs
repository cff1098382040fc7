/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint, value_parser};
use clap_complete::Shell;

const ARG_CONFIG: &str = "config";
const ARG_CHECK: &str = "check";
const ARG_VERBOSE: &str = "verbose";
const ARG_VERSION: &str = "version";
const ARG_COMPLETION: &str = "completion";

#[derive(Debug, Default)]
pub struct ProcArgs {
    pub verbose_level: u8,
    /// only load and validate the config
    pub test_config: bool,
    /// load from environment variables and `.env` if not set
    pub config_file: Option<PathBuf>,
}

impl ProcArgs {
    fn from_matches(m: &ArgMatches) -> anyhow::Result<Self> {
        let config_file = m.get_one::<PathBuf>(ARG_CONFIG).cloned();
        if let Some(path) = &config_file
            && !path.is_file()
        {
            return Err(anyhow!("{} is not a regular file", path.display()));
        }
        Ok(ProcArgs {
            verbose_level: m.get_count(ARG_VERBOSE),
            test_config: m.get_flag(ARG_CHECK),
            config_file,
        })
    }
}

fn command() -> Command {
    let flag = |name: &'static str, short: char, help: &'static str| {
        Arg::new(name)
            .help(help)
            .short(short)
            .long(name)
            .action(ArgAction::SetTrue)
    };

    Command::new(crate::build::PKG_NAME)
        .about("Forward proxy for HTTP, HTTPS CONNECT and SOCKS5 with a shared trust cache")
        .disable_version_flag(true)
        .arg(
            Arg::new(ARG_CONFIG)
                .help("YAML config file, the environment is used when absent")
                .short('c')
                .long("config-file")
                .num_args(1)
                .value_name("FILE")
                .value_hint(ValueHint::FilePath)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(flag(ARG_CHECK, 't', "Check the config and exit").long("test-config"))
        .arg(
            Arg::new(ARG_VERBOSE)
                .help("Increase verbosity, can be repeated")
                .short('v')
                .long(ARG_VERBOSE)
                .action(ArgAction::Count),
        )
        .arg(flag(ARG_VERSION, 'V', "Print version and exit"))
        .arg(
            Arg::new(ARG_COMPLETION)
                .help("Print shell completion script and exit")
                .long(ARG_COMPLETION)
                .value_name("SHELL")
                .value_parser(value_parser!(Shell))
                .exclusive(true),
        )
}

/// Returns `None` if the process should exit after handling informational options
pub fn parse_clap() -> anyhow::Result<Option<ProcArgs>> {
    let matches = command().get_matches();

    if let Some(shell) = matches.get_one::<Shell>(ARG_COMPLETION) {
        let mut cmd = command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(None);
    }

    let args = ProcArgs::from_matches(&matches)?;
    if matches.get_flag(ARG_VERSION) {
        crate::build::print_version(args.verbose_level);
        return Ok(None);
    }
    Ok(Some(args))
}
