use clap::Parser;
use cli::{Args, Commands};
use list::{
    dump_table, list_conferences, list_events, list_locations, list_meeting_types, list_tags,
    show_conference, Listing, Repository,
};
use logging::setup_logging;
use secconf_config::{
    config::{generate_default_config, set_config_path, Config},
    path::resolve_path,
};
use tracing::debug;
use utils::COLOR;
use write::{create_row, update_row};

mod cli;
mod list;
mod logging;
mod utils;
mod write;

fn handle_cli() -> miette::Result<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        let mut color = COLOR.write().unwrap();
        *color = false;
    }

    if let Some(ref c) = args.config {
        set_config_path(resolve_path(c)?);
    }

    let json = args.json;
    let load_config = || -> miette::Result<Config> {
        let config = Config::new()?;
        debug!(backend = ?config.backend, "loaded configuration");
        Ok(config)
    };
    let reader = || -> miette::Result<Repository> {
        let config = load_config()?;
        Ok(Repository::reader(&config.get_backend()?, config.get_database())?)
    };

    match args.command {
        Commands::Deadlines { tags } => list_events(&mut reader()?, Listing::Deadlines, &tags, json)?,
        Commands::Upcoming { tags } => list_events(&mut reader()?, Listing::Upcoming, &tags, json)?,
        Commands::Recent { tags } => list_events(&mut reader()?, Listing::Recent, &tags, json)?,
        Commands::MostRecent => list_events(&mut reader()?, Listing::MostRecent, &[], json)?,
        Commands::Conference { key } => show_conference(&mut reader()?, &key, json)?,
        Commands::Conferences => list_conferences(&mut reader()?, json)?,
        Commands::Locations => list_locations(&mut reader()?, json)?,
        Commands::MeetingTypes => list_meeting_types(&mut reader()?, json)?,
        Commands::Tags => list_tags(&mut reader()?, json)?,
        Commands::Get { table } => dump_table(&mut reader()?, &table, json)?,
        Commands::Update { table, key, values } => {
            update_row(&load_config()?, &table, key, values)?;
        }
        Commands::Create { table, values } => create_row(&load_config()?, &table, values)?,
        Commands::DefConfig => {
            generate_default_config()?;
        }
    }

    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}
