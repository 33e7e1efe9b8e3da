use crate::domain::error::DomainError;
use crate::domain::ports::vector_store::{QueryMatch, VectorRecord, VectorStore};
use chrono::Utc;
use rusqlite::{params, Connection};
use serde_json::{Map, Value};
use std::sync::Mutex;

pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
    chunk_size: usize,
}

impl SqliteVectorStore {
    pub fn new(conn: Connection, chunk_size: usize) -> Self {
        Self {
            conn: Mutex::new(conn),
            chunk_size: chunk_size.max(1),
        }
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
        if a.len() != b.len() || a.is_empty() {
            return 0.0;
        }
        let mut dot = 0.0_f64;
        let mut norm_a = 0.0_f64;
        let mut norm_b = 0.0_f64;
        for (x, y) in a.iter().zip(b.iter()) {
            let x = *x as f64;
            let y = *y as f64;
            dot += x * y;
            norm_a += x * x;
            norm_b += y * y;
        }
        let denom = norm_a.sqrt() * norm_b.sqrt();
        if denom == 0.0 {
            0.0
        } else {
            dot / denom
        }
    }

    fn serialize_vector(v: &[f32]) -> Vec<u8> {
        v.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_vector(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    /// Exact-match metadata filter. For list-valued metadata fields the
    /// filter value must be a member of the list.
    fn matches_filter(metadata: &Value, filter: &Map<String, Value>) -> bool {
        filter.iter().all(|(key, expected)| {
            match metadata.get(key) {
                Some(Value::Array(items)) => items.contains(expected),
                Some(actual) => actual == expected,
                None => false,
            }
        })
    }

    fn upsert_row(
        conn: &Connection,
        namespace: &str,
        record: &VectorRecord,
    ) -> Result<(), rusqlite::Error> {
        let blob = Self::serialize_vector(&record.embedding);
        let metadata = serde_json::to_string(&record.metadata).unwrap_or_else(|_| "{}".into());
        conn.execute(
            "INSERT OR REPLACE INTO vectors (namespace, id, vector, metadata, text_excerpt, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                namespace,
                record.id,
                blob,
                metadata,
                record.text_excerpt,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

impl VectorStore for SqliteVectorStore {
    fn ping(&self) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'vectors'",
                [],
                |r| r.get(0),
            )
            .map_err(|e| DomainError::VectorStore(format!("ping failed: {e}")))?;
        if count == 0 {
            return Err(DomainError::VectorStore(
                "vectors table missing, migrations did not run".into(),
            ));
        }
        Ok(())
    }

    fn upsert(&self, namespace: &str, record: VectorRecord) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        Self::upsert_row(&conn, namespace, &record)
            .map_err(|e| DomainError::VectorStore(format!("Failed to store vector: {e}")))
    }

    fn upsert_batch(
        &self,
        namespace: &str,
        records: Vec<VectorRecord>,
    ) -> Result<usize, DomainError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut stored = 0usize;
        for (chunk_index, chunk) in records.chunks(self.chunk_size).enumerate() {
            let tx = conn.transaction().map_err(|e| DomainError::BatchChunkFailed {
                chunk: chunk_index,
                stored,
                message: e.to_string(),
            })?;
            for record in chunk {
                Self::upsert_row(&tx, namespace, record).map_err(|e| {
                    DomainError::BatchChunkFailed {
                        chunk: chunk_index,
                        stored,
                        message: e.to_string(),
                    }
                })?;
            }
            tx.commit().map_err(|e| DomainError::BatchChunkFailed {
                chunk: chunk_index,
                stored,
                message: e.to_string(),
            })?;
            stored += chunk.len();
        }
        Ok(stored)
    }

    fn query(
        &self,
        namespace: &str,
        embedding: &[f32],
        top_k: usize,
        filter: Option<&Map<String, Value>>,
    ) -> Result<Vec<QueryMatch>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut stmt = conn
            .prepare("SELECT id, vector, metadata, text_excerpt FROM vectors WHERE namespace = ?1")
            .map_err(|e| DomainError::VectorStore(e.to_string()))?;
        let rows = stmt
            .query_map(params![namespace], |row| {
                let id: String = row.get(0)?;
                let blob: Vec<u8> = row.get(1)?;
                let metadata: String = row.get(2)?;
                let excerpt: String = row.get(3)?;
                Ok((id, blob, metadata, excerpt))
            })
            .map_err(|e| DomainError::VectorStore(e.to_string()))?;

        let mut results: Vec<QueryMatch> = Vec::new();
        for row in rows.filter_map(|r| r.ok()) {
            let (id, blob, metadata_str, excerpt) = row;
            let mut metadata: Value =
                serde_json::from_str(&metadata_str).unwrap_or_else(|_| Value::Object(Map::new()));
            if let Some(f) = filter {
                if !Self::matches_filter(&metadata, f) {
                    continue;
                }
            }
            // Mirror the stored excerpt into the returned metadata so a
            // match is usable as prompt context without another lookup.
            if let Value::Object(map) = &mut metadata {
                map.entry("text".to_string())
                    .or_insert_with(|| Value::String(excerpt));
            }
            let stored = Self::deserialize_vector(&blob);
            let score = Self::cosine_similarity(embedding, &stored).clamp(0.0, 1.0);
            results.push(QueryMatch {
                id,
                score,
                metadata,
            });
        }

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);
        Ok(results)
    }

    fn delete_by_ids(&self, namespace: &str, ids: &[String]) -> Result<usize, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let placeholders: Vec<String> =
            (0..ids.len()).map(|i| format!("?{}", i + 2)).collect();
        let sql = format!(
            "DELETE FROM vectors WHERE namespace = ?1 AND id IN ({})",
            placeholders.join(", ")
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
        param_values.push(Box::new(namespace.to_string()));
        for id in ids {
            param_values.push(Box::new(id.clone()));
        }
        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let deleted = conn
            .execute(&sql, params_refs.as_slice())
            .map_err(|e| DomainError::VectorStore(format!("Failed to delete vectors: {e}")))?;
        Ok(deleted)
    }

    fn delete_namespace(&self, namespace: &str) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        conn.execute("DELETE FROM vectors WHERE namespace = ?1", params![namespace])
            .map_err(|e| DomainError::VectorStore(format!("Failed to clear namespace: {e}")))?;
        Ok(())
    }

    fn stored_dimension(&self) -> Result<Option<usize>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let blob: Option<Vec<u8>> = conn
            .query_row("SELECT vector FROM vectors LIMIT 1", [], |r| r.get(0))
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })
            .map_err(|e| DomainError::VectorStore(e.to_string()))?;
        Ok(blob.map(|b| b.len() / 4))
    }
}
