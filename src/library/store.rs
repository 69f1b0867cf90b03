use std::path::Path;
use log::warn;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row, params};
use crate::{Result, TrackMetadata};

/// Resolves the canonical record for a file name.
pub trait MetadataStore {
    /// `Ok(None)` when no track is stored under `file_name`.
    fn lookup(&self, file_name: &str) -> Result<Option<TrackMetadata>>;
}

/// Track lookup joining every table that contributes a tag.
///
/// `?1` is the bare file name, `?2` the same name escaped for LIKE and
/// prefixed with `%/`, so only the last path component can match.
const TRACK_LOOKUP: &str = "
SELECT
    ar.item_artist,
    al.album,
    ex.title,
    st.user_rating,
    i.disc_number,
    ex.disc_count,
    i.track_number,
    ex.track_count,
    g.genre,
    ex.grouping,
    ex.year,
    ly.lyrics,
    al.album_year,
    aar.album_artist,
    bl.path || '/' || ex.location,
    art.relative_path,
    c.composer
FROM item i
    LEFT JOIN item_extra    ex   ON ex.item_pid = i.item_pid
    LEFT JOIN item_artist   ar   ON ar.item_artist_pid = i.item_artist_pid
    LEFT JOIN album         al   ON al.album_pid = i.album_pid
    LEFT JOIN item_stats    st   ON st.item_pid = i.item_pid
    LEFT JOIN base_location bl   ON bl.base_location_id = i.base_location_id
    LEFT JOIN genre         g    ON g.genre_id = i.genre_id
    LEFT JOIN album_artist  aar  ON aar.album_artist_pid = al.album_artist_pid
    LEFT JOIN composer      c    ON c.composer_pid = i.composer_pid
    LEFT JOIN lyrics        ly   ON ly.item_pid = i.item_pid
    LEFT JOIN artwork_token artt ON artt.entity_pid = i.item_pid
    LEFT JOIN artwork       art  ON art.artwork_token = artt.artwork_token
WHERE i.item_pid IS NOT NULL
  AND (ex.location LIKE ?1 ESCAPE '\\' OR ex.location LIKE ?2 ESCAPE '\\')
ORDER BY i.item_pid
";

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Reads a column of any storage class as text, NULL as absent.
fn text_column(row: &Row, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(n) => Some(n.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    })
}

fn row_to_metadata(row: &Row) -> rusqlite::Result<TrackMetadata> {
    Ok(TrackMetadata {
        artist: text_column(row, 0)?,
        album: text_column(row, 1)?,
        title: text_column(row, 2)?,
        rating: text_column(row, 3)?,
        disc: text_column(row, 4)?,
        disc_count: text_column(row, 5)?,
        track: text_column(row, 6)?,
        track_count: text_column(row, 7)?,
        genre: text_column(row, 8)?,
        grouping: text_column(row, 9)?,
        year: text_column(row, 10)?,
        lyrics: text_column(row, 11)?,
        album_year: text_column(row, 12)?,
        album_artist: text_column(row, 13)?,
        location: text_column(row, 14)?,
        artwork: text_column(row, 15)?,
        composer: text_column(row, 16)?,
    })
}

/// Media library backup opened read-only for the whole run.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open_with_flags(path.as_ref(), OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        // Fails here rather than per file when the path is not a database
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |_| Ok(()))?;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl MetadataStore for SqliteStore {
    fn lookup(&self, file_name: &str) -> Result<Option<TrackMetadata>> {
        let escaped = escape_like(file_name);
        let mut stmt = self.conn.prepare_cached(TRACK_LOOKUP)?;
        let mut rows = stmt.query(params![escaped, format!("%/{escaped}")])?;

        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let record = row_to_metadata(row)?;

        let mut extra = 0usize;
        while rows.next()?.is_some() {
            extra += 1;
        }
        if extra > 0 {
            warn!(
                "{} tracks match '{}', using the one with the lowest item id ({})",
                extra + 1,
                file_name,
                record.location.as_deref().unwrap_or("unknown location")
            );
        }

        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE item (
                item_pid INTEGER PRIMARY KEY,
                item_artist_pid INTEGER,
                album_pid INTEGER,
                base_location_id INTEGER,
                genre_id INTEGER,
                composer_pid INTEGER,
                disc_number INTEGER,
                track_number INTEGER
            );
            CREATE TABLE item_extra (
                item_pid INTEGER PRIMARY KEY,
                title TEXT,
                disc_count INTEGER,
                track_count INTEGER,
                grouping TEXT,
                year INTEGER,
                location TEXT
            );
            CREATE TABLE item_artist (item_artist_pid INTEGER PRIMARY KEY, item_artist TEXT);
            CREATE TABLE album (
                album_pid INTEGER PRIMARY KEY,
                album TEXT,
                album_year INTEGER,
                album_artist_pid INTEGER
            );
            CREATE TABLE item_stats (item_pid INTEGER PRIMARY KEY, user_rating INTEGER);
            CREATE TABLE base_location (base_location_id INTEGER PRIMARY KEY, path TEXT);
            CREATE TABLE genre (genre_id INTEGER PRIMARY KEY, genre TEXT);
            CREATE TABLE album_artist (album_artist_pid INTEGER PRIMARY KEY, album_artist TEXT);
            CREATE TABLE composer (composer_pid INTEGER PRIMARY KEY, composer TEXT);
            CREATE TABLE lyrics (item_pid INTEGER PRIMARY KEY, lyrics TEXT);
            CREATE TABLE artwork_token (artwork_token TEXT, entity_pid INTEGER);
            CREATE TABLE artwork (artwork_token TEXT, relative_path TEXT);

            INSERT INTO base_location VALUES (1, 'iTunes_Control/Music');
            INSERT INTO base_location VALUES (2, 'Backup/Music');
            INSERT INTO item_artist VALUES (10, 'Band X');
            INSERT INTO album_artist VALUES (20, 'Band X & Friends');
            INSERT INTO album VALUES (30, 'First Light', 1999, 20);
            INSERT INTO genre VALUES (40, 'Shoegaze');
            INSERT INTO composer VALUES (50, 'J. Doe');

            -- Fully described track
            INSERT INTO item VALUES (1, 10, 30, 1, 40, 50, 1, 3);
            INSERT INTO item_extra VALUES (1, 'Track One', 2, 12, 'Side A', 1999, 'F01/song1.m4a');
            INSERT INTO item_stats VALUES (1, 80);
            INSERT INTO lyrics VALUES (1, 'la la la');
            INSERT INTO artwork_token VALUES ('tok1', 1);
            INSERT INTO artwork VALUES ('tok1', 'Artwork/ab/cd.jpg');

            -- Sparse track: only a title
            INSERT INTO item (item_pid) VALUES (2);
            INSERT INTO item_extra (item_pid, title, location) VALUES (2, 'Lonely', 'F02/song2.mp3');

            -- Same file name stored under two locations
            INSERT INTO item (item_pid, base_location_id) VALUES (4, 2);
            INSERT INTO item_extra (item_pid, title, location) VALUES (4, 'Later Copy', 'F09/dup.m4a');
            INSERT INTO item (item_pid, base_location_id) VALUES (3, 1);
            INSERT INTO item_extra (item_pid, title, location) VALUES (3, 'First Copy', 'F03/dup.m4a');

            -- Name that only matches as a directory prefix
            INSERT INTO item (item_pid) VALUES (5);
            INSERT INTO item_extra (item_pid, title, location) VALUES (5, 'Nested', 'song5.m4a/inner.m4a');
            ",
        )
        .unwrap();
        conn
    }

    fn store() -> SqliteStore {
        SqliteStore::from_connection(create_test_db())
    }

    #[test]
    fn test_lookup_full_record() {
        let record = store().lookup("song1.m4a").unwrap().unwrap();
        assert_eq!(
            record,
            TrackMetadata {
                artist: Some("Band X".into()),
                album: Some("First Light".into()),
                title: Some("Track One".into()),
                rating: Some("80".into()),
                disc: Some("1".into()),
                disc_count: Some("2".into()),
                track: Some("3".into()),
                track_count: Some("12".into()),
                genre: Some("Shoegaze".into()),
                grouping: Some("Side A".into()),
                year: Some("1999".into()),
                lyrics: Some("la la la".into()),
                album_year: Some("1999".into()),
                album_artist: Some("Band X & Friends".into()),
                location: Some("iTunes_Control/Music/F01/song1.m4a".into()),
                artwork: Some("Artwork/ab/cd.jpg".into()),
                composer: Some("J. Doe".into()),
            }
        );
    }

    #[test]
    fn test_lookup_null_columns_are_absent() {
        let record = store().lookup("song2.mp3").unwrap().unwrap();
        assert_eq!(record.title.as_deref(), Some("Lonely"));
        assert_eq!(record.artist, None);
        assert_eq!(record.rating, None);
        assert_eq!(record.artwork, None);
        // base_location is missing, so the concatenated path is NULL too
        assert_eq!(record.location, None);
    }

    #[test]
    fn test_lookup_no_match() {
        assert_eq!(store().lookup("missing.m4a").unwrap(), None);
    }

    #[test]
    fn test_lookup_does_not_match_directory_prefix() {
        assert_eq!(store().lookup("song5.m4a").unwrap(), None);
        let record = store().lookup("inner.m4a").unwrap().unwrap();
        assert_eq!(record.title.as_deref(), Some("Nested"));
    }

    #[test]
    fn test_lookup_wildcards_are_literal() {
        assert_eq!(store().lookup("song_.m4a").unwrap(), None);
        assert_eq!(store().lookup("%").unwrap(), None);
    }

    #[test]
    fn test_lookup_duplicates_take_lowest_item_id() {
        let record = store().lookup("dup.m4a").unwrap().unwrap();
        assert_eq!(record.title.as_deref(), Some("First Copy"));
    }

    #[test]
    fn test_lookup_reuses_statement() {
        let store = store();
        for _ in 0..3 {
            assert!(store.lookup("song1.m4a").unwrap().is_some());
        }
    }

    #[test]
    fn test_open_missing_database_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SqliteStore::open(dir.path().join("nope.sqlitedb")).is_err());
    }

    #[test]
    fn test_open_rejects_non_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.sqlitedb");
        std::fs::write(&path, "this is not sqlite, just some text long enough to fail").unwrap();
        assert!(SqliteStore::open(&path).is_err());
    }
}
