//! Small lookup tables.

use serde::Serialize;

use crate::{error::Result, record::Record, traits::FromRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    #[serde(rename = "tag")]
    pub id: i64,
    pub name: String,
}

impl FromRecord for Tag {
    fn from_record(record: &Record) -> Result<Self> {
        Ok(Tag {
            id: record.integer("tag")?,
            name: record.text("name")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    #[serde(rename = "location")]
    pub id: i64,
    pub name: String,
    pub region: Option<String>,
    pub country: String,
}

impl FromRecord for Location {
    fn from_record(record: &Record) -> Result<Self> {
        Ok(Location {
            id: record.integer("location")?,
            name: record.text("name")?,
            region: record.opt_text("region")?,
            country: record.text("country")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingType {
    #[serde(rename = "meetingType")]
    pub id: i64,
    pub name: String,
}

impl FromRecord for MeetingType {
    fn from_record(record: &Record) -> Result<Self> {
        Ok(MeetingType {
            id: record.integer("meetingType")?,
            name: record.text("name")?,
        })
    }
}
