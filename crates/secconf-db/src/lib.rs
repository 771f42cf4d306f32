pub mod connection;
pub mod dialect;
pub mod error;
pub mod expr;
pub mod helpers;
pub mod models;
pub mod query;
pub mod record;
pub mod repository;
pub mod store;
#[cfg(test)]
pub mod test_utils;
pub mod traits;
pub mod value;

pub use error::DbError;
pub use query::*;
pub use repository::ConferenceRepository;
pub use traits::FromRecord;
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        connection::{Backend, Credentials},
        models::{ConferenceKey, Event},
        store::SqliteStore,
        test_utils::{listings_store, LISTINGS},
    };

    fn abbreviations(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.abbreviation.as_str()).collect()
    }

    #[test]
    fn test_upcoming_with_tag_matches_whole_tokens() {
        let mut store = listings_store();
        let query = SelectQuery::new().filter(Filter::upcoming() & Filter::tags([5]));

        let events: Vec<Event> = query.fetch(&mut store).unwrap();
        assert_eq!(abbreviations(&events), vec!["NDSS"]);
    }

    #[test]
    fn test_tag_boundaries() {
        let mut repo = ConferenceRepository::new(listings_store());

        // "1,12,3", "3,1,7" and "3,7,1" hold tag 1; "12,3,7" and "15,25" do not
        let events = repo.upcoming(&[1]).unwrap();
        assert_eq!(abbreviations(&events), vec!["USENIX", "WOOT", "PETS"]);
    }

    #[test]
    fn test_single_token_tag_list_matches() {
        let store = listings_store();
        store
            .connection()
            .execute("UPDATE Conferences SET tags = '5' WHERE abbreviation = 'FC'", [])
            .unwrap();

        let mut repo = ConferenceRepository::new(store);
        let events = repo.upcoming(&[5]).unwrap();
        assert_eq!(abbreviations(&events), vec!["NDSS", "FC"]);
    }

    #[test]
    fn test_upcoming_without_tags_lists_everything_ahead() {
        let mut repo = ConferenceRepository::new(listings_store());

        let events = repo.upcoming(&[]).unwrap();
        assert_eq!(
            abbreviations(&events),
            vec!["NDSS", "CCS", "USENIX", "WOOT", "PETS", "FC"]
        );
        assert_eq!(events[0].place(), "San Diego, California, US");
        assert_eq!(events[1].place(), "Berlin, DE");
        assert_eq!(events[1].country.as_deref(), Some("DE"));
    }

    #[test]
    fn test_recent_and_most_recent() {
        let mut repo = ConferenceRepository::new(listings_store());

        assert_eq!(abbreviations(&repo.recent(&[]).unwrap()), vec!["USENIX"]);
        assert!(repo.recent(&[5]).unwrap().is_empty());

        let latest = repo.most_recent().unwrap();
        assert_eq!(latest.len(), 6);
        assert!(latest.iter().all(|e| e.start_date > chrono::Utc::now().date_naive()));
    }

    #[test]
    fn test_deadlines_order_by_relevant_deadline() {
        let mut repo = ConferenceRepository::new(listings_store());

        let events = repo.deadlines(&[]).unwrap();
        assert_eq!(abbreviations(&events), vec!["NDSS", "CCS", "USENIX"]);

        let events = repo.deadlines(&[7]).unwrap();
        assert_eq!(abbreviations(&events), vec!["CCS"]);
    }

    #[test]
    fn test_catalogs() {
        let mut repo = ConferenceRepository::new(listings_store());

        let locations = repo.locations().unwrap();
        let names: Vec<_> = locations.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Berlin", "San Diego"]);
        assert_eq!(locations[1].region.as_deref(), Some("California"));
        assert_eq!(locations[1].country, "United States");

        let types = repo.meeting_types().unwrap();
        assert_eq!(types.len(), 2);

        let tags = repo
            .get_tags(Some(&["web".to_string(), "crypto".to_string()]), None)
            .unwrap();
        let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["crypto", "web"]);

        // ids win over names
        let tags = repo
            .get_tags(Some(&["web".to_string()]), Some(&[9]))
            .unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "hardware");

        assert_eq!(repo.get_tags(None, None).unwrap().len(), 7);
    }

    #[test]
    fn test_conferences() {
        let mut repo = ConferenceRepository::new(listings_store());

        let conferences = repo.conferences().unwrap();
        let abbreviations: Vec<_> = conferences.iter().map(|c| c.abbreviation.as_str()).collect();
        assert_eq!(
            abbreviations,
            vec!["CCS", "FC", "NDSS", "PETS", "USENIX", "WOOT"]
        );

        let ndss = repo.conference(&ConferenceKey::Id(1)).unwrap().unwrap();
        assert_eq!(ndss.abbreviation, "NDSS");
        assert_eq!(ndss.url.as_deref(), Some("https://www.ndss-symposium.org/"));

        let woot = repo.conference(&"WOOT".into()).unwrap().unwrap();
        assert_eq!(woot.parent, Some(3));

        assert!(repo.conference(&ConferenceKey::Id(99)).unwrap().is_none());
    }

    #[test]
    fn test_conference_events() {
        let mut repo = ConferenceRepository::new(listings_store());

        let details = repo.conference_events(&"WOOT".into()).unwrap();
        assert_eq!(details.conference.id, 4);
        assert_eq!(details.parent.unwrap().abbreviation, "USENIX");
        assert_eq!(details.tags, vec!["crypto", "privacy", "web"]);
        assert_eq!(details.events.len(), 1);

        let details = repo.conference_events(&ConferenceKey::Id(3)).unwrap();
        assert!(details.parent.is_none());
        assert_eq!(details.events.len(), 2);
        assert!(details.events[0].start_date > details.events[1].start_date);

        let err = repo.conference_events(&"SOUPS".into()).unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));
    }

    #[test]
    fn test_create_update_and_get() {
        let mut repo = ConferenceRepository::new(listings_store());

        let created = repo
            .create("Tags", [("tag", Value::Integer(20)), ("name", Value::from("forensics"))])
            .unwrap();
        assert_eq!(created, 1);

        let changed = repo
            .update("Tags", ("tag", 20), [("name", Value::from("digital forensics"))])
            .unwrap();
        assert_eq!(changed, 1);

        let rows = repo.get("Tags").unwrap();
        assert_eq!(rows.len(), 8);
        let row = rows
            .iter()
            .find(|r| r.integer("tag").unwrap() == 20)
            .unwrap();
        assert_eq!(row.text("name").unwrap(), "digital forensics");

        assert!(matches!(
            repo.get("Tags; DROP TABLE Tags"),
            Err(DbError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_default_reader_cannot_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.db");
        let store = SqliteStore::open(&path, false).unwrap();
        store.connection().execute_batch(LISTINGS).unwrap();
        drop(store);

        let backend = Backend::Sqlite {
            path,
        };
        let mut reader = ConferenceRepository::reader(&backend, "secconfdb").unwrap();
        assert_eq!(reader.upcoming(&[5]).unwrap().len(), 1);

        let err = reader
            .update("Tags", ("tag", 1), [("name", Value::from("cryptography"))])
            .unwrap_err();
        match err {
            DbError::Unauthorized { code, .. } => {
                assert_eq!(code, Some(rusqlite::ffi::SQLITE_READONLY));
            }
            other => panic!("expected unauthorized, got {other:?}"),
        }

        let mut writer = ConferenceRepository::writer(&backend, &Credentials::default()).unwrap();
        let changed = writer
            .update("Tags", ("tag", 1), [("name", Value::from("cryptography"))])
            .unwrap();
        assert_eq!(changed, 1);
    }
}
