use aspect_mirror::{api, writer::DEFAULT_WRITER_NAME, WriteOptions};
use clap::{
    crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, ArgMatches,
    Command,
};
use std::path::PathBuf;

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Config file, defaults to ./aspect-mirror.toml when present")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("write")
                .about("Mirrors the aspect directory into a destination directory")
                .arg(
                    Arg::new("destination")
                        .help("Directory the aspects are written into, created if missing")
                        .value_parser(clap::value_parser!(PathBuf))
                        .required(true),
                )
                .arg(
                    Arg::new("writer")
                        .short('w')
                        .long("writer")
                        .help("Name of the aspect writer to use")
                        .default_value(DEFAULT_WRITER_NAME),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help("Print the tree that would be written without writing it")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("list").about("List registered aspect writers"))
        .get_matches();

    init_logger(matches.get_flag("verbose"));

    let config = matches.get_one::<PathBuf>("config").cloned();

    match matches.subcommand() {
        Some(("write", args)) => handle_write(args, config),
        Some(("list", _)) => handle_list(config),
        _ => unreachable!(),
    }
}

fn init_logger(is_verbose: bool) {
    let default_level = if is_verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn handle_write(args: &ArgMatches, config: Option<PathBuf>) -> miette::Result<()> {
    let destination = args
        .get_one::<PathBuf>("destination")
        .expect("destination required");
    let writer = args
        .get_one::<String>("writer")
        .expect("writer has a default");

    let options = WriteOptions {
        config,
        writer: writer.clone(),
        destination: destination.clone(),
    };

    if args.get_flag("dry-run") {
        api::preview_aspects(&options)?;
    } else {
        let summary = api::write_aspects(&options)?;

        println!(
            "wrote {} files and {} directories to {}",
            summary.files,
            summary.directories,
            destination.display()
        );
    }

    Ok(())
}

fn handle_list(config: Option<PathBuf>) -> miette::Result<()> {
    for name in api::writer_names(config.as_deref())? {
        println!("{}", name);
    }

    Ok(())
}
