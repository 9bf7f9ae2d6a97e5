use super::{PersistenceError, PersistenceResult, PlannerStore};
use crate::entry::ScheduledEntry;
use crate::entry_validation::validate_entry;
use crate::error::{PlannerError, PlannerResult};
use crate::formats::{default_formats, normalize_format_name};
use chrono::NaiveDate;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use tracing::{debug, info};

const DATE_FORMAT: &str = "%Y-%m-%d";
const SEEDED_KEY: &str = "formats_seeded";

pub struct SqlitePlannerStore {
    connection: Mutex<Connection>,
}

impl SqlitePlannerStore {
    /// Open (or create) the database at `path`, seeding the default formats
    /// the first time.
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PlannerResult<Self> {
        Self::with_seed_formats(path, &default_formats())
    }

    pub fn with_seed_formats<P: AsRef<std::path::Path>>(
        path: P,
        seed_formats: &[String],
    ) -> PlannerResult<Self> {
        let connection = Connection::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "opened sqlite store");
        Self::from_connection(connection, seed_formats)
    }

    pub fn in_memory(seed_formats: &[String]) -> PlannerResult<Self> {
        Self::from_connection(Connection::open_in_memory()?, seed_formats)
    }

    fn from_connection(mut connection: Connection, seed_formats: &[String]) -> PlannerResult<Self> {
        Self::initialize_schema(&connection)?;
        Self::seed_formats(&mut connection, seed_formats)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS planner_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS formats (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            );
            CREATE TABLE IF NOT EXISTS entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                date TEXT NOT NULL,
                format TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS entries_by_date ON entries (date);
            CREATE INDEX IF NOT EXISTS entries_by_format ON entries (format);
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    // Seeding happens once per database, so emptying the catalog later does
    // not bring the defaults back.
    fn seed_formats(connection: &mut Connection, seed_formats: &[String]) -> PlannerResult<()> {
        let tx = connection.transaction()?;
        let seeded: Option<String> = tx
            .query_row(
                "SELECT value FROM planner_meta WHERE key = ?1",
                params![SEEDED_KEY],
                |row| row.get(0),
            )
            .optional()?;
        if seeded.is_none() {
            for name in seed_formats {
                let name = normalize_format_name(name)?;
                tx.execute("INSERT OR IGNORE INTO formats (name) VALUES (?1)", params![name])?;
            }
            tx.execute(
                "INSERT INTO planner_meta (key, value) VALUES (?1, '1')",
                params![SEEDED_KEY],
            )?;
            info!(count = seed_formats.len(), "seeded default formats");
        }
        tx.commit()?;
        Ok(())
    }

    fn format_exists(tx: &Transaction, name: &str) -> PersistenceResult<bool> {
        let found: Option<i64> = tx
            .query_row("SELECT id FROM formats WHERE name = ?1", params![name], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    fn parse_date(raw: &str) -> PersistenceResult<NaiveDate> {
        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map_err(|err| PersistenceError::InvalidData(format!("bad entry date '{raw}': {err}")))
    }
}

impl PlannerStore for SqlitePlannerStore {
    fn list_entries(&self) -> PlannerResult<Vec<ScheduledEntry>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare("SELECT id, title, date, format FROM entries ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, title, date, format) = row?;
            entries.push(ScheduledEntry {
                id: Some(id),
                title,
                date: Self::parse_date(&date)?,
                format,
            });
        }
        super::sort_for_listing(&mut entries);
        Ok(entries)
    }

    fn list_formats(&self) -> PlannerResult<Vec<String>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare("SELECT name FROM formats ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut formats = Vec::new();
        for name in rows {
            formats.push(name?);
        }
        Ok(formats)
    }

    fn insert_entries(&self, entries: &[ScheduledEntry]) -> PlannerResult<Vec<ScheduledEntry>> {
        for entry in entries {
            validate_entry(entry).map_err(|err| PlannerError::invalid(err.to_string()))?;
        }
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        let mut saved = Vec::with_capacity(entries.len());
        {
            let mut stmt =
                tx.prepare("INSERT INTO entries (title, date, format) VALUES (?1, ?2, ?3)")?;
            for entry in entries {
                let date = entry.date.format(DATE_FORMAT).to_string();
                let id = stmt.insert(params![entry.title, date, entry.format])?;
                saved.push(entry.clone().with_id(id));
            }
        }
        tx.commit()?;
        debug!(count = saved.len(), "inserted entries into sqlite store");
        Ok(saved)
    }

    fn delete_entry(&self, id: i64) -> PlannerResult<bool> {
        let conn = self.connection.lock();
        let removed = conn.execute("DELETE FROM entries WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    fn add_format(&self, name: &str) -> PlannerResult<()> {
        let name = normalize_format_name(name)?;
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        if Self::format_exists(&tx, &name)? {
            return Err(PlannerError::DuplicateFormat(name));
        }
        tx.execute("INSERT INTO formats (name) VALUES (?1)", params![name])?;
        tx.commit()?;
        Ok(())
    }

    fn rename_format(&self, old: &str, new: &str) -> PlannerResult<usize> {
        let new = normalize_format_name(new)?;
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        if !Self::format_exists(&tx, old)? {
            return Err(PlannerError::UnknownFormat(old.to_string()));
        }
        if old == new {
            return Ok(0);
        }
        if Self::format_exists(&tx, &new)? {
            return Err(PlannerError::DuplicateFormat(new));
        }
        tx.execute("UPDATE formats SET name = ?1 WHERE name = ?2", params![new, old])?;
        let moved = tx.execute("UPDATE entries SET format = ?1 WHERE format = ?2", params![new, old])?;
        tx.commit()?;
        debug!(old, new = %new, moved, "renamed format in sqlite store");
        Ok(moved)
    }

    fn remove_format(&self, name: &str) -> PlannerResult<()> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        if !Self::format_exists(&tx, name)? {
            return Err(PlannerError::UnknownFormat(name.to_string()));
        }
        let in_use: i64 = tx.query_row(
            "SELECT COUNT(*) FROM entries WHERE format = ?1",
            params![name],
            |row| row.get(0),
        )?;
        if in_use > 0 {
            return Err(PlannerError::FormatInUse {
                format: name.to_string(),
                entries: in_use as usize,
            });
        }
        tx.execute("DELETE FROM formats WHERE name = ?1", params![name])?;
        tx.commit()?;
        Ok(())
    }
}
