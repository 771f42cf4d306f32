use crate::store::SqliteStore;

/// Listings schema with dates relative to the day the tests run.
///
/// Tags on conferences: NDSS `2,5,9`, CCS `12,3,7`, USENIX `1,12,3`,
/// WOOT `3,1,7` (child of USENIX), PETS `3,7,1`, FC `15,25`.
pub const LISTINGS: &str = "
CREATE TABLE Countries (country INTEGER PRIMARY KEY, name TEXT NOT NULL, code TEXT NOT NULL);
CREATE TABLE Regions (
    region INTEGER PRIMARY KEY, name TEXT NOT NULL, code TEXT, country INTEGER NOT NULL
);
CREATE TABLE Locations (
    location INTEGER PRIMARY KEY, name TEXT NOT NULL, region INTEGER, country INTEGER
);
CREATE TABLE Tags (tag INTEGER PRIMARY KEY, name TEXT NOT NULL);
CREATE TABLE MeetingTypes (meetingType INTEGER PRIMARY KEY, name TEXT NOT NULL);
CREATE TABLE Conferences (
    conference INTEGER PRIMARY KEY,
    parent INTEGER,
    name TEXT NOT NULL,
    abbreviation TEXT NOT NULL,
    description TEXT,
    permanentURL TEXT,
    tags TEXT
);
CREATE TABLE ConferenceInstances (
    instance INTEGER PRIMARY KEY,
    conference INTEGER NOT NULL,
    url TEXT,
    startDate TEXT NOT NULL,
    endDate TEXT,
    deadline TEXT,
    extendedDeadline TEXT,
    posterDeadline TEXT,
    location INTEGER NOT NULL,
    proceedings TEXT
);

INSERT INTO Countries VALUES (1, 'United States', 'US'), (2, 'Germany', 'DE');
INSERT INTO Regions VALUES (1, 'California', 'CA', 1);
INSERT INTO Locations VALUES (1, 'San Diego', 1, NULL), (2, 'Berlin', NULL, 2);
INSERT INTO Tags VALUES
    (1, 'crypto'), (2, 'systems'), (3, 'web'), (5, 'network'),
    (7, 'privacy'), (9, 'hardware'), (12, 'ml');
INSERT INTO MeetingTypes VALUES (1, 'Conference'), (2, 'Workshop');
INSERT INTO Conferences VALUES
    (1, NULL, 'Network and Distributed System Security Symposium', 'NDSS', NULL, 'https://www.ndss-symposium.org/', '2,5,9'),
    (2, NULL, 'ACM Conference on Computer and Communications Security', 'CCS', NULL, NULL, '12,3,7'),
    (3, NULL, 'USENIX Security Symposium', 'USENIX', 'Systems security', NULL, '1,12,3'),
    (4, 3, 'Workshop on Offensive Technologies', 'WOOT', NULL, NULL, '3,1,7'),
    (5, NULL, 'Privacy Enhancing Technologies Symposium', 'PETS', NULL, NULL, '3,7,1'),
    (6, NULL, 'Financial Cryptography', 'FC', NULL, NULL, '15,25');
INSERT INTO ConferenceInstances
    (conference, startDate, endDate, deadline, extendedDeadline, posterDeadline, location, proceedings)
VALUES
    (1, date('now', '+30 days'), date('now', '+33 days'), date('now', '-3 days'), NULL, NULL, 1,
        'https://www.ndss-symposium.org/ndss-program/'),
    (1, date('now', '-300 days'), date('now', '-297 days'), date('now', '-400 days'), NULL, NULL, 1, NULL),
    (2, date('now', '+40 days'), date('now', '+44 days'), date('now', '-30 days'),
        date('now', '-20 days'), date('now', '+5 days'), 2, NULL),
    (3, date('now', '+60 days'), date('now', '+62 days'), date('now', '+10 days'), NULL, NULL, 1, NULL),
    (3, date('now', '-20 days'), date('now', '-18 days'), date('now', '-200 days'), NULL, NULL, 1, NULL),
    (4, date('now', '+61 days'), date('now', '+61 days'), NULL, NULL, NULL, 1, NULL),
    (5, date('now', '+90 days'), date('now', '+94 days'), NULL, NULL, NULL, 2, NULL),
    (6, date('now', '+100 days'), date('now', '+104 days'), date('now', '-100 days'), NULL, NULL, 2, NULL);
";

pub fn listings_store() -> SqliteStore {
    let store = SqliteStore::open_in_memory().unwrap();
    store.connection().execute_batch(LISTINGS).unwrap();
    store
}
