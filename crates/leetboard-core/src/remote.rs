//! Remote store adapter over embedded SQLite
//!
//! Presents per-user document collections (`problems`, `analyses`) the way a
//! cloud document store would: every record is owned by exactly one user and
//! every query is scoped `WHERE user_id = ?`. Records are stored as a JSON
//! blob plus a handful of searchable columns, so lookups and ordering never
//! decode payloads.
//!
//! Schema Version History:
//! - v1: Initial version
//! - v2: Analysis records carry the problem title

use crate::error::CoreError;
use crate::models::{AnalysisId, CachedAnalysis, Problem, ProblemId, UserId};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Current store schema version
///
/// Increment when the blob layout or searchable columns change. A mismatch on
/// open clears the `analyses` collection (rebuildable cache data) but never
/// touches `problems`, which are the user's records; the JSON blobs
/// tolerate added fields via serde defaults.
const STORE_VERSION: i32 = 2;

/// Database file name under the data directory
pub const STORE_FILE: &str = "leetboard.db";

/// Row counts per collection, for maintenance output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionCounts {
    pub problems: usize,
    pub analyses: usize,
}

/// SQLite-backed per-user document store (thread-safe)
pub struct RemoteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl RemoteStore {
    /// Create or open the store database under `data_dir`
    pub fn open(data_dir: &Path) -> Result<Self, CoreError> {
        std::fs::create_dir_all(data_dir).map_err(|source| CoreError::Io {
            path: data_dir.to_path_buf(),
            source,
        })?;

        let db_path = data_dir.join(STORE_FILE);
        let conn = Connection::open(&db_path).map_err(|source| CoreError::StoreOpen {
            path: db_path.clone(),
            source,
        })?;

        // WAL for concurrent readers (a second session may share this file)
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|source| CoreError::StoreOpen {
                path: db_path.clone(),
                source,
            })?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS store_metadata (
                key TEXT PRIMARY KEY,
                value INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS problems (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                leetcode_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                difficulty TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                data BLOB NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_problems_user ON problems(user_id);
            CREATE INDEX IF NOT EXISTS idx_problems_user_status ON problems(user_id, status);

            CREATE TABLE IF NOT EXISTS analyses (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                problem_id INTEGER NOT NULL,
                title_slug TEXT,
                version TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                data BLOB NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_analyses_lookup
                ON analyses(user_id, problem_id, version);
            "#,
        )
        .map_err(|source| CoreError::StoreOpen {
            path: db_path.clone(),
            source,
        })?;

        Self::check_version(&conn, &db_path)?;

        debug!(path = %db_path.display(), "Remote store opened");

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    /// Check schema version and clear rebuildable data on mismatch
    fn check_version(conn: &Connection, db_path: &Path) -> Result<(), CoreError> {
        let open_err = |source| CoreError::StoreOpen {
            path: db_path.to_path_buf(),
            source,
        };

        let stored: Option<i32> = conn
            .query_row(
                "SELECT value FROM store_metadata WHERE key = 'version'",
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(open_err)?;

        match stored {
            Some(v) if v != STORE_VERSION => {
                warn!(
                    stored = v,
                    current = STORE_VERSION,
                    "Store version mismatch, clearing cached analyses"
                );
                conn.execute("DELETE FROM analyses", []).map_err(open_err)?;
                conn.execute(
                    "INSERT OR REPLACE INTO store_metadata (key, value) VALUES ('version', ?)",
                    params![STORE_VERSION],
                )
                .map_err(open_err)?;
            }
            None => {
                conn.execute(
                    "INSERT INTO store_metadata (key, value) VALUES ('version', ?)",
                    params![STORE_VERSION],
                )
                .map_err(open_err)?;
                debug!("Store version initialized to {}", STORE_VERSION);
            }
            Some(_) => {}
        }

        Ok(())
    }

    /// Path to the backing database file (watched for external changes)
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    // ===================
    // Problems collection
    // ===================

    /// All problems owned by `user`, oldest first
    pub fn list_problems(&self, user: &UserId) -> Result<Vec<Problem>, CoreError> {
        let conn = self.conn.lock();

        let mut stmt = conn
            .prepare("SELECT data FROM problems WHERE user_id = ? ORDER BY created_at ASC")
            .map_err(|source| read_err("problems", source))?;

        let rows = stmt
            .query_map(params![user], |row| row.get::<_, Vec<u8>>(0))
            .map_err(|source| read_err("problems", source))?;

        let mut problems = Vec::new();
        for row in rows {
            let bytes = row.map_err(|source| read_err("problems", source))?;
            problems.push(decode::<Problem>("problem record", &bytes)?);
        }

        Ok(problems)
    }

    pub fn get_problem(
        &self,
        user: &UserId,
        id: &ProblemId,
    ) -> Result<Option<Problem>, CoreError> {
        let conn = self.conn.lock();

        let bytes: Option<Vec<u8>> = conn
            .query_row(
                "SELECT data FROM problems WHERE id = ? AND user_id = ?",
                params![id, user],
                |row| row.get(0),
            )
            .optional()
            .map_err(|source| read_err("problems", source))?;

        bytes
            .map(|b| decode::<Problem>("problem record", &b))
            .transpose()
    }

    /// Insert a problem, assigning a fresh id when the record has none.
    /// Returns the stored record including its id.
    pub fn insert_problem(&self, problem: &Problem) -> Result<Problem, CoreError> {
        let mut stored = problem.clone();
        if stored.id.is_empty() {
            stored.id = ProblemId::generate();
        }

        let data = encode("problem record", &stored)?;
        let conn = self.conn.lock();

        conn.execute(
            r#"
            INSERT INTO problems
                (id, user_id, leetcode_id, title, difficulty, status,
                 created_at, updated_at, data)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                stored.id,
                stored.user_id,
                stored.leetcode_id,
                stored.title,
                stored.difficulty.as_str(),
                stored.status.as_str(),
                stored.created_at.to_rfc3339(),
                stored.updated_at.to_rfc3339(),
                data,
            ],
        )
        .map_err(|source| write_err("problems", source))?;

        debug!(id = %stored.id, user = %stored.user_id, "Problem inserted");
        Ok(stored)
    }

    /// Replace an existing problem record, keeping searchable columns in sync
    pub fn update_problem(&self, problem: &Problem) -> Result<(), CoreError> {
        let data = encode("problem record", problem)?;
        let conn = self.conn.lock();

        let changed = conn
            .execute(
                r#"
                UPDATE problems
                SET leetcode_id = ?, title = ?, difficulty = ?, status = ?,
                    updated_at = ?, data = ?
                WHERE id = ? AND user_id = ?
                "#,
                params![
                    problem.leetcode_id,
                    problem.title,
                    problem.difficulty.as_str(),
                    problem.status.as_str(),
                    problem.updated_at.to_rfc3339(),
                    data,
                    problem.id,
                    problem.user_id,
                ],
            )
            .map_err(|source| write_err("problems", source))?;

        if changed == 0 {
            return Err(CoreError::ProblemNotFound {
                id: problem.id.to_string(),
            });
        }

        debug!(id = %problem.id, "Problem updated");
        Ok(())
    }

    /// Hard delete. Deleting an id that is already gone is not an error.
    pub fn delete_problem(&self, user: &UserId, id: &ProblemId) -> Result<(), CoreError> {
        let conn = self.conn.lock();

        let changed = conn
            .execute(
                "DELETE FROM problems WHERE id = ? AND user_id = ?",
                params![id, user],
            )
            .map_err(|source| write_err("problems", source))?;

        debug!(id = %id, deleted = changed > 0, "Problem delete");
        Ok(())
    }

    // ===================
    // Analyses collection
    // ===================

    /// Insert an analysis record, assigning a fresh id when the record has
    /// none. Always creates a new row; readers take the newest per version.
    pub fn insert_analysis(&self, analysis: &CachedAnalysis) -> Result<CachedAnalysis, CoreError> {
        let mut stored = analysis.clone();
        if stored.id.is_empty() {
            stored.id = AnalysisId::generate();
        }

        let data = encode("analysis record", &stored)?;
        let conn = self.conn.lock();

        conn.execute(
            r#"
            INSERT INTO analyses
                (id, user_id, problem_id, title_slug, version,
                 created_at, updated_at, data)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                stored.id,
                stored.user_id,
                stored.problem_id,
                stored.title_slug,
                stored.version,
                stored.created_at.to_rfc3339(),
                stored.updated_at.to_rfc3339(),
                data,
            ],
        )
        .map_err(|source| write_err("analyses", source))?;

        debug!(id = %stored.id, problem_id = stored.problem_id, "Analysis inserted");
        Ok(stored)
    }

    pub fn get_analysis(
        &self,
        user: &UserId,
        id: &AnalysisId,
    ) -> Result<Option<CachedAnalysis>, CoreError> {
        let conn = self.conn.lock();

        let bytes: Option<Vec<u8>> = conn
            .query_row(
                "SELECT data FROM analyses WHERE id = ? AND user_id = ?",
                params![id, user],
                |row| row.get(0),
            )
            .optional()
            .map_err(|source| read_err("analyses", source))?;

        bytes
            .map(|b| decode::<CachedAnalysis>("analysis record", &b))
            .transpose()
    }

    /// Newest analysis for a problem with an exact version match.
    ///
    /// Keyed on catalog id plus slug so manually tracked problems (catalog
    /// id 0) with different slugs stay distinct. The version filter lives in
    /// the query, so records from older prompt generations are invisible
    /// without being deleted.
    pub fn latest_analysis(
        &self,
        user: &UserId,
        problem_id: u32,
        title_slug: Option<&str>,
        version: &str,
    ) -> Result<Option<CachedAnalysis>, CoreError> {
        let conn = self.conn.lock();

        let bytes: Option<Vec<u8>> = conn
            .query_row(
                r#"
                SELECT data FROM analyses
                WHERE user_id = ? AND problem_id = ? AND title_slug IS ? AND version = ?
                ORDER BY updated_at DESC
                LIMIT 1
                "#,
                params![user, problem_id, title_slug, version],
                |row| row.get(0),
            )
            .optional()
            .map_err(|source| read_err("analyses", source))?;

        bytes
            .map(|b| decode::<CachedAnalysis>("analysis record", &b))
            .transpose()
    }

    /// Replace an existing analysis record in place
    pub fn update_analysis(&self, analysis: &CachedAnalysis) -> Result<(), CoreError> {
        let data = encode("analysis record", analysis)?;
        let conn = self.conn.lock();

        let changed = conn
            .execute(
                r#"
                UPDATE analyses
                SET title_slug = ?, version = ?, updated_at = ?, data = ?
                WHERE id = ? AND user_id = ?
                "#,
                params![
                    analysis.title_slug,
                    analysis.version,
                    analysis.updated_at.to_rfc3339(),
                    data,
                    analysis.id,
                    analysis.user_id,
                ],
            )
            .map_err(|source| write_err("analyses", source))?;

        if changed == 0 {
            return Err(CoreError::AnalysisNotFound {
                id: analysis.id.to_string(),
            });
        }

        debug!(id = %analysis.id, "Analysis updated");
        Ok(())
    }

    /// Delete every stored analysis for a problem, any version.
    /// Returns the number of rows removed.
    pub fn delete_analyses_for(
        &self,
        user: &UserId,
        problem_id: u32,
        title_slug: Option<&str>,
    ) -> Result<usize, CoreError> {
        let conn = self.conn.lock();

        let removed = conn
            .execute(
                "DELETE FROM analyses WHERE user_id = ? AND problem_id = ? AND title_slug IS ?",
                params![user, problem_id, title_slug],
            )
            .map_err(|source| write_err("analyses", source))?;

        debug!(problem_id, removed, "Analyses purged");
        Ok(removed)
    }

    // ===================
    // Maintenance
    // ===================

    /// Row counts for the user's collections
    pub fn collection_counts(&self, user: &UserId) -> Result<CollectionCounts, CoreError> {
        let conn = self.conn.lock();

        let problems: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM problems WHERE user_id = ?",
                params![user],
                |row| row.get(0),
            )
            .map_err(|source| read_err("problems", source))?;

        let analyses: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM analyses WHERE user_id = ?",
                params![user],
                |row| row.get(0),
            )
            .map_err(|source| read_err("analyses", source))?;

        Ok(CollectionCounts {
            problems: problems as usize,
            analyses: analyses as usize,
        })
    }
}

impl Drop for RemoteStore {
    fn drop(&mut self) {
        // Checkpoint so the WAL file doesn't grow unbounded across sessions
        let conn = self.conn.lock();
        if let Err(e) = conn.pragma_update(None, "wal_checkpoint", "TRUNCATE") {
            warn!("Failed to checkpoint WAL on RemoteStore drop: {}", e);
        }
    }
}

fn read_err(collection: &'static str, source: rusqlite::Error) -> CoreError {
    CoreError::RemoteRead { collection, source }
}

fn write_err(collection: &'static str, source: rusqlite::Error) -> CoreError {
    CoreError::RemoteWrite { collection, source }
}

fn encode<T: Serialize>(what: &'static str, value: &T) -> Result<Vec<u8>, CoreError> {
    serde_json::to_vec(value).map_err(|source| CoreError::Codec { what, source })
}

fn decode<T: DeserializeOwned>(what: &'static str, bytes: &[u8]) -> Result<T, CoreError> {
    serde_json::from_slice(bytes).map_err(|source| CoreError::Codec { what, source })
}
