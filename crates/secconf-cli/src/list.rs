use miette::{IntoDiagnostic, Result};
use nu_ansi_term::Color::{Blue, Cyan, Green, Yellow};
use secconf_db::{
    models::{ConferenceKey, Event},
    store::Store,
    ConferenceRepository, DbError,
};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{peaker::PriorityMax, themes::BorderCorrection, Panel, Style, Width},
};
use tracing::{debug, info};

use crate::utils::{or_dash, term_width, Colored};

pub type Repository = ConferenceRepository<Box<dyn Store>>;

/// Which event listing to show.
#[derive(Debug, Clone, Copy)]
pub enum Listing {
    Deadlines,
    Upcoming,
    Recent,
    MostRecent,
}

impl Listing {
    fn title(self) -> &'static str {
        match self {
            Listing::Deadlines => "Upcoming Deadlines",
            Listing::Upcoming => "Upcoming Events",
            Listing::Recent => "Recent Events",
            Listing::MostRecent => "Latest Events",
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
    Ok(())
}

fn print_table(builder: Builder, title: &str) {
    let table = builder
        .build()
        .with(Panel::header(title))
        .with(Style::rounded())
        .with(BorderCorrection {})
        .with(Width::wrap(term_width()).priority(PriorityMax::default()))
        .to_string();

    info!("\n{table}");
}

/// Maps tag names to ids, failing on the first unknown name.
pub fn resolve_tags(repo: &mut Repository, names: &[String]) -> Result<Vec<i64>> {
    if names.is_empty() {
        return Ok(vec![]);
    }

    let tags = repo.get_tags(Some(names), None)?;
    for name in names {
        if !tags.iter().any(|tag| &tag.name == name) {
            return Err(DbError::NotFound(format!("tag '{name}'")).into());
        }
    }

    debug!(?tags, "resolved tag filter");
    Ok(tags.into_iter().map(|tag| tag.id).collect())
}

pub fn list_events(repo: &mut Repository, listing: Listing, tags: &[String], json: bool) -> Result<()> {
    let tag_ids = resolve_tags(repo, tags)?;

    let events = match listing {
        Listing::Deadlines => repo.deadlines(&tag_ids)?,
        Listing::Upcoming => repo.upcoming(&tag_ids)?,
        Listing::Recent => repo.recent(&tag_ids)?,
        Listing::MostRecent => repo.most_recent()?,
    };

    if json {
        return print_json(&events);
    }

    if events.is_empty() {
        info!("No events found");
        return Ok(());
    }

    print_table(events_table(&events, listing), listing.title());
    Ok(())
}

fn events_table(events: &[Event], listing: Listing) -> Builder {
    let mut builder = Builder::new();

    if matches!(listing, Listing::Deadlines) {
        builder.push_record(["Conference", "Deadline", "Extended", "Posters", "Starts", "Location"]);
        for event in events {
            builder.push_record([
                Colored(Cyan, &event.abbreviation).to_string(),
                Colored(Yellow, or_dash(event.deadline)).to_string(),
                or_dash(event.extended_deadline),
                or_dash(event.poster_deadline),
                event.start_date.to_string(),
                event.place(),
            ]);
        }
    } else {
        builder.push_record(["Conference", "Starts", "Ends", "Location", "Proceedings"]);
        for event in events {
            builder.push_record([
                Colored(Cyan, &event.abbreviation).to_string(),
                Colored(Green, event.start_date).to_string(),
                or_dash(event.end_date),
                event.place(),
                or_dash(event.proceedings.as_deref()),
            ]);
        }
    }

    builder
}

pub fn show_conference(repo: &mut Repository, key: &str, json: bool) -> Result<()> {
    let details = repo.conference_events(&ConferenceKey::from(key))?;

    if json {
        return print_json(&details);
    }

    let conference = &details.conference;
    let mut builder = Builder::new();
    builder.push_record(["Name".to_string(), Colored(Cyan, &conference.name).to_string()]);
    builder.push_record(["Abbreviation".to_string(), conference.abbreviation.clone()]);
    if let Some(parent) = &details.parent {
        builder.push_record([
            "Part of".to_string(),
            format!("{} ({})", parent.name, parent.abbreviation),
        ]);
    }
    if let Some(description) = &conference.description {
        builder.push_record(["Description".to_string(), description.clone()]);
    }
    if let Some(url) = &conference.url {
        builder.push_record(["URL".to_string(), Colored(Blue, url).to_string()]);
    }
    if !details.tags.is_empty() {
        builder.push_record(["Tags".to_string(), details.tags.join(", ")]);
    }
    print_table(builder, &conference.abbreviation);

    if details.events.is_empty() {
        info!("No events recorded for {}", conference.abbreviation);
    } else {
        print_table(events_table(&details.events, Listing::Recent), "Events");
    }
    Ok(())
}

pub fn list_conferences(repo: &mut Repository, json: bool) -> Result<()> {
    let conferences = repo.conferences()?;
    if json {
        return print_json(&conferences);
    }

    let mut builder = Builder::new();
    builder.push_record(["Id", "Abbreviation", "Name"]);
    for conference in &conferences {
        builder.push_record([
            conference.id.to_string(),
            Colored(Cyan, &conference.abbreviation).to_string(),
            conference.name.clone(),
        ]);
    }
    print_table(builder, "Conferences");
    Ok(())
}

pub fn list_locations(repo: &mut Repository, json: bool) -> Result<()> {
    let locations = repo.locations()?;
    if json {
        return print_json(&locations);
    }

    let mut builder = Builder::new();
    builder.push_record(["Id", "Location", "Region", "Country"]);
    for location in &locations {
        builder.push_record([
            location.id.to_string(),
            location.name.clone(),
            or_dash(location.region.as_deref()),
            location.country.clone(),
        ]);
    }
    print_table(builder, "Locations");
    Ok(())
}

pub fn list_meeting_types(repo: &mut Repository, json: bool) -> Result<()> {
    let types = repo.meeting_types()?;
    if json {
        return print_json(&types);
    }

    let mut builder = Builder::new();
    builder.push_record(["Id", "Meeting type"]);
    for meeting_type in &types {
        builder.push_record([meeting_type.id.to_string(), meeting_type.name.clone()]);
    }
    print_table(builder, "Meeting Types");
    Ok(())
}

pub fn list_tags(repo: &mut Repository, json: bool) -> Result<()> {
    let tags = repo.get_tags(None, None)?;
    if json {
        return print_json(&tags);
    }

    let mut builder = Builder::new();
    builder.push_record(["Id", "Tag"]);
    for tag in &tags {
        builder.push_record([tag.id.to_string(), Colored(Green, &tag.name).to_string()]);
    }
    print_table(builder, "Tags");
    Ok(())
}

pub fn dump_table(repo: &mut Repository, table: &str, json: bool) -> Result<()> {
    let records = repo.get(table)?;
    if json {
        return print_json(&records);
    }

    let Some(first) = records.first() else {
        info!("{table} is empty");
        return Ok(());
    };

    let mut columns: Vec<&String> = first.fields().map(|(name, _)| name).collect();
    columns.sort();

    let mut builder = Builder::new();
    builder.push_record(columns.iter().map(|c| c.as_str()));
    for record in &records {
        builder.push_record(columns.iter().map(|column| {
            record
                .get(column)
                .map(|value| value.to_string())
                .unwrap_or_default()
        }));
    }
    print_table(builder, table);
    Ok(())
}
