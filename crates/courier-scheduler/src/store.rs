use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::{
    db::init_db,
    error::{Result, SchedulerError},
    types::{decode_ts, encode_storable_ts, encode_ts, JobId, ScheduledJob},
};

const SELECT_COLUMNS: &str = "SELECT id, destination, body, scheduled_at, sent, created_at
     FROM scheduled_messages";

/// Raw row as read from SQLite, before timestamp decoding.
type RawRow = (JobId, String, String, String, bool, String);

/// Durable, append-and-mark-only queue of scheduled messages.
///
/// Cheap to clone: all clones share one connection behind a mutex, so the
/// HTTP handlers and the scheduler loop never write concurrently.
#[derive(Clone)]
pub struct JobStore {
    conn: Arc<Mutex<Connection>>,
}

impl JobStore {
    /// Wrap an open connection and make sure the schema exists.
    pub fn new(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Open (or create) the database file at `path` in WAL mode.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::new(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    /// Idempotently create the schema.
    pub fn initialize(&self) -> Result<()> {
        init_db(&*self.lock()?)
    }

    /// Append a new pending job and return its id.
    ///
    /// Fails with [`SchedulerError::InvalidTimestamp`] when `scheduled_at`
    /// lies outside UTC years 1..=9999.
    pub fn insert(
        &self,
        destination: &str,
        body: &str,
        scheduled_at: DateTime<Utc>,
    ) -> Result<JobId> {
        let at = encode_storable_ts(scheduled_at)?;
        let conn = self.lock()?;
        let now = encode_ts(Utc::now());
        conn.execute(
            "INSERT INTO scheduled_messages (destination, body, scheduled_at, sent, created_at)
             VALUES (?1, ?2, ?3, 0, ?4)",
            rusqlite::params![destination, body, at, now],
        )?;
        let id = conn.last_insert_rowid();
        info!(job_id = id, %destination, scheduled_at = %scheduled_at, "job queued");
        Ok(id)
    }

    /// All unsent jobs with `scheduled_at <= now`, earliest first.
    ///
    /// Read-only. Rows whose timestamps cannot be decoded are logged and
    /// skipped so that one bad row cannot stall the whole queue.
    pub fn list_due(&self, now: DateTime<Utc>) -> Result<Vec<ScheduledJob>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(&format!(
            "{SELECT_COLUMNS}
             WHERE sent = 0 AND scheduled_at <= ?1
             ORDER BY scheduled_at ASC, id ASC"
        ))?;
        let rows = stmt
            .query_map([encode_ts(now)], read_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(decode_rows(rows))
    }

    /// Flip `sent` to true. Returns whether this call performed the flip.
    ///
    /// The update is conditional on `sent = 0`, so repeating it (or racing
    /// it) is harmless; an unknown id is a no-op as well.
    pub fn mark_sent(&self, id: JobId) -> Result<bool> {
        let conn = self.lock()?;
        let n = conn.execute(
            "UPDATE scheduled_messages SET sent = 1 WHERE id = ?1 AND sent = 0",
            [id],
        )?;
        if n == 0 {
            debug!(job_id = id, "mark_sent: already sent or unknown");
        }
        Ok(n == 1)
    }

    /// Fetch a single job by id.
    pub fn get(&self, id: JobId) -> Result<Option<ScheduledJob>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
        let mut rows = stmt
            .query_map([id], read_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        match rows.pop() {
            Some(raw) => decode_row(raw).map(Some),
            None => Ok(None),
        }
    }

    /// Most recently created jobs first, sent ones included.
    pub fn list_recent(&self, limit: usize) -> Result<Vec<ScheduledJob>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare_cached(&format!("{SELECT_COLUMNS} ORDER BY id DESC LIMIT ?1"))?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map([limit], read_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(decode_rows(rows))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| SchedulerError::LockPoisoned)
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get(0)?, // id
        row.get(1)?, // destination
        row.get(2)?, // body
        row.get(3)?, // scheduled_at
        row.get(4)?, // sent
        row.get(5)?, // created_at
    ))
}

fn decode_row(raw: RawRow) -> Result<ScheduledJob> {
    let (id, destination, body, scheduled_at, sent, created_at) = raw;
    Ok(ScheduledJob {
        id,
        destination,
        body,
        scheduled_at: decode_ts(&scheduled_at)?,
        sent,
        created_at: decode_ts(&created_at)?,
    })
}

fn decode_rows(rows: Vec<RawRow>) -> Vec<ScheduledJob> {
    rows.into_iter()
        .filter_map(|raw| {
            let id = raw.0;
            match decode_row(raw) {
                Ok(job) => Some(job),
                Err(e) => {
                    warn!(job_id = id, "skipping undecodable row: {e}");
                    None
                }
            }
        })
        .collect()
}
