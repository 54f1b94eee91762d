//! `ecampus` command-line entry point

use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, Command};
use ecampus_cli::{check_application, check_schema, fetch_schema, init_tracing, read_input};
use ecampus_client::{ClientConfig, EnvOverrides};
use std::path::PathBuf;

fn cli() -> Command {
    Command::new("ecampus")
        .version(ecampus_cli::VERSION)
        .about("E-Campus admission form tools")
        .subcommand_required(true)
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print reports as JSON"),
        )
        .subcommand(
            Command::new("check-schema")
                .about("Validate a form structure JSON file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Form structure JSON"),
                ),
        )
        .subcommand(
            Command::new("check-application")
                .about("Validate a stored application against a form structure")
                .arg(
                    Arg::new("schema")
                        .long("schema")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Form structure JSON"),
                )
                .arg(
                    Arg::new("draft")
                        .long("draft")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Application draft JSON"),
                )
                .arg(
                    Arg::new("year")
                        .long("year")
                        .value_parser(value_parser!(i32))
                        .help("Upper bound for year of passing (defaults to this year)"),
                ),
        )
        .subcommand(
            Command::new("fetch-schema")
                .about("Fetch a course's form structure from the backend")
                .arg(
                    Arg::new("course-id")
                        .required(true)
                        .help("Course identifier"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("Client config TOML"),
                ),
        )
}

fn print_report<T: serde::Serialize + std::fmt::Display>(report: &T, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json-logs"));
    let json = matches.get_flag("json");

    match matches.subcommand() {
        Some(("check-schema", args)) => {
            let Some(path) = args.get_one::<PathBuf>("file") else {
                anyhow::bail!("missing form structure file");
            };
            let report = check_schema(&read_input(path)?)?;
            print_report(&report, json)?;
        }
        Some(("check-application", args)) => {
            let (Some(schema), Some(draft)) = (
                args.get_one::<PathBuf>("schema"),
                args.get_one::<PathBuf>("draft"),
            ) else {
                anyhow::bail!("both --schema and --draft are required");
            };
            let structure = serde_json::from_str(&read_input(schema)?)?;
            let year = args.get_one::<i32>("year").copied();
            let report = check_application(structure, &read_input(draft)?, year)?;
            print_report(&report, json)?;
            if !report.is_clean() {
                std::process::exit(1);
            }
        }
        Some(("fetch-schema", args)) => {
            let Some(course_id) = args.get_one::<String>("course-id") else {
                anyhow::bail!("missing course id");
            };
            let config = match args.get_one::<PathBuf>("config") {
                Some(path) => ClientConfig::load(path)?,
                None => ClientConfig::default(),
            };
            let structure = fetch_schema(config, &EnvOverrides::from_env(), course_id).await?;
            println!("{}", serde_json::to_string_pretty(&structure)?);
        }
        _ => {}
    }
    Ok(())
}
