use std::fmt;

use serde::Serialize;

use crate::{
    error::Result, helpers::parse_tag_ids, models::Event, query::Filter, record::Record,
    traits::FromRecord,
};

/// A conference series, independent of any particular year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conference {
    #[serde(rename = "conference")]
    pub id: i64,
    pub parent: Option<i64>,
    pub name: String,
    pub abbreviation: String,
    pub description: Option<String>,
    pub url: Option<String>,
    /// Comma-joined tag ids, e.g. `"3,7,12"`.
    pub tags: Option<String>,
}

impl FromRecord for Conference {
    fn from_record(record: &Record) -> Result<Self> {
        Ok(Conference {
            id: record.integer("conference")?,
            parent: record.opt_integer("parent")?,
            name: record.text("name")?,
            abbreviation: record.text("abbreviation")?,
            description: record.opt_text("description")?,
            url: record.opt_text("url")?,
            tags: record.opt_text("tags")?,
        })
    }
}

impl Conference {
    pub fn tag_ids(&self) -> Vec<i64> {
        self.tags.as_deref().map(parse_tag_ids).unwrap_or_default()
    }
}

/// Identifies a conference by numeric id or by abbreviation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConferenceKey {
    Id(i64),
    Abbreviation(String),
}

impl ConferenceKey {
    pub fn filter(&self) -> Filter {
        match self {
            ConferenceKey::Id(id) => Filter::conference_id(*id),
            ConferenceKey::Abbreviation(abbreviation) => Filter::abbreviation(abbreviation),
        }
    }
}

/// Anything that reads as an integer is an id; the rest is an abbreviation.
impl From<&str> for ConferenceKey {
    fn from(key: &str) -> Self {
        match key.trim().parse() {
            Ok(id) => ConferenceKey::Id(id),
            Err(_) => ConferenceKey::Abbreviation(key.trim().to_string()),
        }
    }
}

impl fmt::Display for ConferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConferenceKey::Id(id) => write!(f, "conference {id}"),
            ConferenceKey::Abbreviation(abbreviation) => write!(f, "conference '{abbreviation}'"),
        }
    }
}

/// A conference with its parent resolved, its tags named and its events.
#[derive(Debug, Clone, Serialize)]
pub struct ConferenceDetails {
    pub conference: Conference,
    pub parent: Option<Conference>,
    pub tags: Vec<String>,
    /// Newest first.
    pub events: Vec<Event>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_str() {
        assert_eq!(ConferenceKey::from("42"), ConferenceKey::Id(42));
        assert_eq!(
            ConferenceKey::from(" CCS "),
            ConferenceKey::Abbreviation("CCS".into())
        );
        assert_eq!(
            ConferenceKey::from("S&P").to_string(),
            "conference 'S&P'"
        );
    }

    #[test]
    fn test_tag_ids() {
        let mut conference = Conference {
            id: 1,
            parent: None,
            name: "ACM Conference on Computer and Communications Security".into(),
            abbreviation: "CCS".into(),
            description: None,
            url: None,
            tags: Some("2,5,9".into()),
        };
        assert_eq!(conference.tag_ids(), vec![2, 5, 9]);

        conference.tags = None;
        assert!(conference.tag_ids().is_empty());
    }
}
