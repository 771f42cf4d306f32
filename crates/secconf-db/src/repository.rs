//! The canned listings the web front end and CLI are built on.

use tracing::{debug, info};

use crate::{
    connection::{open_reader, open_writer, Backend, Credentials},
    error::{DbError, Result},
    expr::Col,
    models::{Conference, ConferenceDetails, ConferenceKey, Event, Location, MeetingType, Tag},
    query::{Filter, InsertQuery, Order, Projection, SelectQuery, Source, UpdateQuery},
    record::Record,
    store::Store,
    value::Value,
};

/// Conference listings over one store connection.
pub struct ConferenceRepository<S> {
    store: S,
}

impl ConferenceRepository<Box<dyn Store>> {
    /// Read access to `database` with the default credentials.
    pub fn reader(backend: &Backend, database: &str) -> Result<Self> {
        Ok(Self::new(open_reader(backend, database)?))
    }

    /// Write access with caller-supplied credentials.
    pub fn writer(backend: &Backend, credentials: &Credentials) -> Result<Self> {
        Ok(Self::new(open_writer(backend, credentials)?))
    }
}

impl<S: Store> ConferenceRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
        }
    }

    pub fn store(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Tags by id, or by name when no ids are given, ordered by name.
    /// With neither, every tag.
    pub fn get_tags(&mut self, names: Option<&[String]>, ids: Option<&[i64]>) -> Result<Vec<Tag>> {
        let filter = match (ids, names) {
            (Some(ids), _) => Filter::tag_ids(ids.iter().copied()),
            (None, Some(names)) => Filter::tag_names(names.iter().cloned()),
            (None, None) => Filter::none(),
        };

        SelectQuery::new()
            .select(Projection::tags())
            .from(Source::tags())
            .filter(filter)
            .order_by(Order::by(Col::new("name")))
            .fetch(&mut self.store)
    }

    /// Events with a deadline at most two weeks gone, soonest relevant deadline first.
    pub fn deadlines(&mut self, tags: &[i64]) -> Result<Vec<Event>> {
        SelectQuery::new()
            .filter(Filter::upcoming_deadlines() & Filter::tags(tags.iter().copied()))
            .order_by(Order::deadline())
            .fetch(&mut self.store)
    }

    pub fn upcoming(&mut self, tags: &[i64]) -> Result<Vec<Event>> {
        SelectQuery::new()
            .filter(Filter::upcoming() & Filter::tags(tags.iter().copied()))
            .order_by(Order::start_date(false))
            .fetch(&mut self.store)
    }

    /// Recently started events, latest first.
    pub fn recent(&mut self, tags: &[i64]) -> Result<Vec<Event>> {
        SelectQuery::new()
            .filter(Filter::recent() & Filter::tags(tags.iter().copied()))
            .order_by(Order::start_date(true))
            .fetch(&mut self.store)
    }

    pub fn locations(&mut self) -> Result<Vec<Location>> {
        SelectQuery::new()
            .select(Projection::locations())
            .from(Source::locations())
            .order_by(Order::locations())
            .fetch(&mut self.store)
    }

    pub fn meeting_types(&mut self) -> Result<Vec<MeetingType>> {
        SelectQuery::new()
            .select(Projection::meeting_types())
            .from(Source::meeting_types())
            .order_by(Order::none())
            .fetch(&mut self.store)
    }

    /// The latest instance of every conference.
    pub fn most_recent(&mut self) -> Result<Vec<Event>> {
        SelectQuery::new()
            .filter(Filter::most_recent_per_conference())
            .fetch(&mut self.store)
    }

    pub fn conferences(&mut self) -> Result<Vec<Conference>> {
        SelectQuery::new()
            .select(Projection::conference())
            .from(Source::conference())
            .order_by(Order::by(Col::new("abbreviation")))
            .fetch(&mut self.store)
    }

    pub fn conference(&mut self, key: &ConferenceKey) -> Result<Option<Conference>> {
        SelectQuery::new()
            .select(Projection::conference())
            .from(Source::conference())
            .filter(key.filter())
            .order_by(Order::none())
            .fetch_one(&mut self.store)
    }

    /// A conference with its parent and tag names resolved, and every
    /// instance of it, newest first.
    pub fn conference_events(&mut self, key: &ConferenceKey) -> Result<ConferenceDetails> {
        let conference = self
            .conference(key)?
            .ok_or_else(|| DbError::NotFound(key.to_string()))?;

        let parent = match conference.parent {
            Some(parent) => self.conference(&ConferenceKey::Id(parent))?,
            None => None,
        };

        let tag_ids = conference.tag_ids();
        let tags = if tag_ids.is_empty() {
            vec![]
        } else {
            self.get_tags(None, Some(&tag_ids))?
                .into_iter()
                .map(|tag| tag.name)
                .collect()
        };

        let events = SelectQuery::new()
            .filter(Filter::conference_id(conference.id))
            .order_by(Order::start_date(true))
            .fetch(&mut self.store)?;
        debug!(
            conference = conference.id,
            events = events.len(),
            "resolved conference details"
        );

        Ok(ConferenceDetails {
            conference,
            parent,
            tags,
            events,
        })
    }

    /// Sets `values` on the row of `table` whose `key.0` column equals `key.1`.
    pub fn update<K: AsRef<str>>(
        &mut self,
        table: &str,
        key: (&str, i64),
        values: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<u64> {
        let mut query = UpdateQuery::table(table)?.filter(Filter::key(key.0, key.1)?);
        for (column, value) in values {
            query = query.set(column.as_ref(), value)?;
        }

        let changed = query.execute(&mut self.store)?;
        info!(table, key = key.1, changed, "updated row");
        Ok(changed)
    }

    pub fn create<K: AsRef<str>>(
        &mut self,
        table: &str,
        values: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<u64> {
        let mut query = InsertQuery::table(table)?;
        for (column, value) in values {
            query = query.value(column.as_ref(), value)?;
        }

        let inserted = query.execute(&mut self.store)?;
        info!(table, inserted, "created row");
        Ok(inserted)
    }

    /// Every row of `table`, fields named after its columns.
    pub fn get(&mut self, table: &str) -> Result<Vec<Record>> {
        SelectQuery::new()
            .select(Projection::all())
            .from(Source::table(table)?)
            .order_by(Order::none())
            .execute(&mut self.store)
    }
}
