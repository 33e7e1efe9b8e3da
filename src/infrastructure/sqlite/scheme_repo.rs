use crate::domain::entities::scheme::Scheme;
use crate::domain::error::DomainError;
use crate::domain::ports::scheme_repository::SchemeRepository;
use crate::domain::values::farmer_profile::FarmerProfile;
use crate::domain::values::scheme_category::SchemeCategory;
use chrono::DateTime;
use rusqlite::{params, Connection};
use std::sync::Mutex;

const SELECT_COLS: &str = "id, name, description, category, benefit, eligibility, application, created_at";

pub struct SqliteSchemeRepo {
    conn: Mutex<Connection>,
}

impl SqliteSchemeRepo {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn row_to_scheme(row: &rusqlite::Row) -> Result<Scheme, rusqlite::Error> {
        let cat_str: String = row.get(3)?;
        let eligibility_str: String = row.get(5)?;
        let application_str: String = row.get(6)?;
        let created_str: String = row.get(7)?;

        Ok(Scheme {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            category: cat_str.parse().unwrap_or_else(|_| {
                tracing::warn!(category = %cat_str, "invalid scheme category, defaulting to subsidy");
                SchemeCategory::Subsidy
            }),
            benefit: row.get(4)?,
            eligibility: serde_json::from_str(&eligibility_str).unwrap_or_default(),
            application: serde_json::from_str(&application_str).unwrap_or_default(),
            created_at: DateTime::parse_from_rfc3339(&created_str)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .unwrap_or_else(|_| chrono::Utc::now()),
        })
    }
}

impl SchemeRepository for SqliteSchemeRepo {
    fn add(&self, scheme: &Scheme) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        conn.execute(
            "INSERT INTO schemes (id, name, description, category, benefit, eligibility, application, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                scheme.id,
                scheme.name,
                scheme.description,
                scheme.category.to_string(),
                scheme.benefit,
                serde_json::to_string(&scheme.eligibility).unwrap_or_default(),
                serde_json::to_string(&scheme.application).unwrap_or_default(),
                scheme.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| DomainError::Database(format!("Failed to add scheme: {e}")))?;
        Ok(())
    }

    fn get_by_id(&self, id: &str) -> Result<Option<Scheme>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let sql = format!("SELECT {SELECT_COLS} FROM schemes WHERE id = ?1");
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut rows = stmt
            .query_map(params![id], Self::row_to_scheme)
            .map_err(|e| DomainError::Database(e.to_string()))?;
        Ok(rows.next().and_then(|r| r.ok()))
    }

    fn all(&self, category: Option<SchemeCategory>) -> Result<Vec<Scheme>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let (sql, params): (String, Vec<Box<dyn rusqlite::types::ToSql>>) =
            if let Some(cat) = category {
                (
                    format!("SELECT {SELECT_COLS} FROM schemes WHERE category = ?1 ORDER BY created_at DESC"),
                    vec![Box::new(cat.to_string()) as Box<dyn rusqlite::types::ToSql>],
                )
            } else {
                (
                    format!("SELECT {SELECT_COLS} FROM schemes ORDER BY created_at DESC"),
                    vec![],
                )
            };
        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let schemes = stmt
            .query_map(params_refs.as_slice(), Self::row_to_scheme)
            .map_err(|e| DomainError::Database(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(schemes)
    }

    /// Eligibility lives in a JSON column, so range and membership
    /// predicates are evaluated in Rust over the full scan. Scheme counts
    /// are small; rowid order keeps results insertion-stable for the
    /// hybrid merge tie-break.
    fn find_candidates(&self, profile: &FarmerProfile) -> Result<Vec<Scheme>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let sql = format!("SELECT {SELECT_COLS} FROM schemes ORDER BY rowid");
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let schemes: Vec<Scheme> = stmt
            .query_map([], Self::row_to_scheme)
            .map_err(|e| DomainError::Database(e.to_string()))?
            .filter_map(|r| r.ok())
            .filter(|s| s.eligibility.admits(profile))
            .collect();
        Ok(schemes)
    }

    fn search(&self, keyword: &str) -> Result<Vec<Scheme>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let pattern = format!("%{keyword}%");
        let sql = format!(
            "SELECT {SELECT_COLS} FROM schemes
             WHERE name LIKE ?1 OR description LIKE ?1 OR eligibility LIKE ?1
             ORDER BY created_at DESC"
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let schemes = stmt
            .query_map(params![pattern], Self::row_to_scheme)
            .map_err(|e| DomainError::Database(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(schemes)
    }
}
