//! SQLite-backed spot catalog implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params, params_from_iter, Connection, OptionalExtension, TransactionBehavior};
use tracing::{debug, info};

use super::{Spot, SpotCatalog, SpotError, SpotFields, SpotPatch, WriteOutcome};

/// How long a writer waits for another connection's lock on the same file.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Ids per `DELETE ... IN (...)` statement, well below SQLite's variable limit.
const BATCH_DELETE_CHUNK: usize = 500;

const SELECT_COLUMNS: &str =
    "SELECT id, name, description, ticket, transport, recommend_count, image_url FROM spots";

const RANKING: &str = "ORDER BY recommend_count DESC, id ASC";

/// SQLite-backed spot catalog.
pub struct SqliteSpotCatalog {
    conn: Mutex<Connection>,
}

impl SqliteSpotCatalog {
    /// Open (or create) a file-backed catalog and make sure the table exists.
    ///
    /// The database runs in WAL mode with a busy timeout so several catalogs
    /// or processes can share the same file.
    pub fn new(path: &Path) -> Result<Self, SpotError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory catalog (useful for testing).
    pub fn in_memory() -> Result<Self, SpotError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), SpotError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS spots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                ticket TEXT NOT NULL DEFAULT '',
                transport TEXT NOT NULL DEFAULT '',
                recommend_count INTEGER NOT NULL DEFAULT 0,
                image_url TEXT NOT NULL DEFAULT ''
            );

            CREATE INDEX IF NOT EXISTS idx_spots_ranking ON spots(recommend_count DESC, id ASC);
            "#,
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SpotError> {
        self.conn
            .lock()
            .map_err(|_| SpotError::Storage("connection lock poisoned".to_string()))
    }

    fn seed_records() -> [SpotFields; 2] {
        [
            SpotFields::new("West Lake", "Famous scenic area in Hangzhou")
                .with_ticket("Free")
                .with_transport("Reachable by city bus"),
            SpotFields::new("Huangshan", "Famous mountain in China")
                .with_ticket("230 CNY")
                .with_transport("High-speed rail, then coach"),
        ]
    }

    fn insert(conn: &Connection, fields: &SpotFields) -> Result<i64, SpotError> {
        conn.execute(
            "INSERT INTO spots (name, description, ticket, transport, recommend_count, image_url) VALUES (?1, ?2, ?3, ?4, 0, ?5)",
            params![
                fields.name,
                fields.description,
                fields.ticket,
                fields.transport,
                fields.image_url,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn fetch(conn: &Connection, id: i64) -> Result<Option<Spot>, SpotError> {
        let spot = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                Self::row_to_spot,
            )
            .optional()?;
        Ok(spot)
    }

    fn row_to_spot(row: &rusqlite::Row) -> rusqlite::Result<Spot> {
        Ok(Spot {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            ticket: row.get(3)?,
            transport: row.get(4)?,
            recommend_count: row.get(5)?,
            image_url: row.get(6)?,
        })
    }
}

impl SpotCatalog for SqliteSpotCatalog {
    fn initialize(&self, seed_if_empty: bool) -> Result<usize, SpotError> {
        let mut conn = self.lock()?;
        Self::initialize_schema(&conn)?;

        if !seed_if_empty {
            return Ok(0);
        }

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let existing: i64 = tx.query_row("SELECT COUNT(*) FROM spots", [], |row| row.get(0))?;
        if existing > 0 {
            debug!(existing, "Catalog already populated, skipping seed");
            return Ok(0);
        }

        let seeds = Self::seed_records();
        for fields in &seeds {
            Self::insert(&tx, fields)?;
        }
        tx.commit()?;

        info!(seeded = seeds.len(), "Seeded empty spot catalog");
        Ok(seeds.len())
    }

    fn list(&self) -> Result<Vec<Spot>, SpotError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} {RANKING}"))?;
        let spots = stmt
            .query_map([], Self::row_to_spot)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(spots)
    }

    fn search(&self, query: &str) -> Result<Vec<Spot>, SpotError> {
        if query.is_empty() {
            return self.list();
        }

        // instr() is a plain case-sensitive substring test, so '%' and '_'
        // in the query match literally.
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE instr(name, ?1) > 0 OR instr(description, ?1) > 0 {RANKING}"
        ))?;
        let spots = stmt
            .query_map(params![query], Self::row_to_spot)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(spots)
    }

    fn get(&self, id: i64) -> Result<Option<Spot>, SpotError> {
        let conn = self.lock()?;
        Self::fetch(&conn, id)
    }

    fn count(&self) -> Result<i64, SpotError> {
        let conn = self.lock()?;
        let count = conn.query_row("SELECT COUNT(*) FROM spots", [], |row| row.get(0))?;
        Ok(count)
    }

    fn create(&self, fields: SpotFields) -> Result<Spot, SpotError> {
        let conn = self.lock()?;
        let id = Self::insert(&conn, &fields)?;

        Ok(Spot {
            id,
            name: fields.name,
            description: fields.description,
            ticket: fields.ticket,
            transport: fields.transport,
            recommend_count: 0,
            image_url: fields.image_url,
        })
    }

    fn recommend(&self, id: i64) -> Result<WriteOutcome, SpotError> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE spots SET recommend_count = recommend_count + 1 WHERE id = ?1",
            params![id],
        )?;

        Ok(if changed == 0 {
            WriteOutcome::Missing
        } else {
            WriteOutcome::Applied
        })
    }

    fn update(&self, id: i64, patch: SpotPatch) -> Result<Spot, SpotError> {
        let conn = self.lock()?;

        // NULL parameters keep the stored column through COALESCE.
        let changed = conn.execute(
            "UPDATE spots SET
                name = COALESCE(?1, name),
                description = COALESCE(?2, description),
                ticket = COALESCE(?3, ticket),
                transport = COALESCE(?4, transport),
                image_url = COALESCE(?5, image_url)
             WHERE id = ?6",
            params![
                patch.name,
                patch.description,
                patch.ticket,
                patch.transport,
                patch.image_url,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(SpotError::NotFound(id));
        }

        Self::fetch(&conn, id)?.ok_or(SpotError::NotFound(id))
    }

    fn delete(&self, id: i64) -> Result<WriteOutcome, SpotError> {
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM spots WHERE id = ?1", params![id])?;

        Ok(if changed == 0 {
            WriteOutcome::Missing
        } else {
            WriteOutcome::Applied
        })
    }

    fn batch_delete(&self, ids: &[i64]) -> Result<usize, SpotError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut removed = 0;
        for chunk in ids.chunks(BATCH_DELETE_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            removed += tx.execute(
                &format!("DELETE FROM spots WHERE id IN ({placeholders})"),
                params_from_iter(chunk.iter()),
            )?;
        }
        tx.commit()?;

        Ok(removed)
    }
}
