use chrono::NaiveDate;
use serde::Serialize;

use crate::{error::Result, record::Record, traits::FromRecord};

/// One instance of a conference, as listed by the event projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub url: Option<String>,
    pub conference: i64,
    pub abbreviation: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub extended_deadline: Option<NaiveDate>,
    pub poster_deadline: Option<NaiveDate>,
    pub location: Option<String>,
    pub region: Option<String>,
    pub region_code: Option<String>,
    pub country: Option<String>,
    pub proceedings: Option<String>,
    #[serde(rename = "permanentURL")]
    pub permanent_url: Option<String>,
}

impl FromRecord for Event {
    fn from_record(record: &Record) -> Result<Self> {
        Ok(Event {
            url: record.opt_text("url")?,
            conference: record.integer("conference")?,
            abbreviation: record.text("abbreviation")?,
            name: record.text("name")?,
            start_date: record.date("startDate")?,
            end_date: record.opt_date("endDate")?,
            deadline: record.opt_date("deadline")?,
            extended_deadline: record.opt_date("extendedDeadline")?,
            poster_deadline: record.opt_date("posterDeadline")?,
            location: record.opt_text("location")?,
            region: record.opt_text("region")?,
            region_code: record.opt_text("regionCode")?,
            country: record.opt_text("country")?,
            proceedings: record.opt_text("proceedings")?,
            permanent_url: record.opt_text("permanentURL")?,
        })
    }
}

impl Event {
    /// Location, region and country, skipping whichever are unknown.
    pub fn place(&self) -> String {
        [&self.location, &self.region, &self.country]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
