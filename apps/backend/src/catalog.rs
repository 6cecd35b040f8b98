//! Immutable, process-wide list of candidate records.
//!
//! Loading from the persistent store belongs to the embedding process; it
//! implements [`CatalogLoader`] and hands the result over once at startup.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::Record;
use crate::error::AppError;

/// Source of catalog records, implemented by the persistence layer.
#[async_trait]
pub trait CatalogLoader: Send + Sync {
    async fn load_all(&self) -> Result<Vec<Record>, AppError>;
}

#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    records: Arc<[Arc<Record>]>,
}

impl EntityCatalog {
    pub fn from_records(records: Vec<Record>) -> Self {
        let records: Arc<[Arc<Record>]> = records.into_iter().map(Arc::new).collect();
        if records.is_empty() {
            warn!("Entity catalog is empty; new sessions will fail until it is repopulated");
        } else {
            info!(records = records.len(), "Entity catalog loaded");
        }
        Self { records }
    }

    /// Decode a JSON array of seed documents.
    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        let records: Vec<Record> = serde_json::from_str(json)
            .map_err(|e| AppError::config(format!("invalid catalog document: {e}")))?;
        Ok(Self::from_records(records))
    }

    pub async fn load(loader: &dyn CatalogLoader) -> Result<Self, AppError> {
        let records = loader.load_all().await?;
        Ok(Self::from_records(records))
    }

    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedLoader(Vec<Record>);

    #[async_trait]
    impl CatalogLoader for FixedLoader {
        async fn load_all(&self) -> Result<Vec<Record>, AppError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_load_through_loader() {
        let loader = FixedLoader(vec![
            Record::new().with_field("CHARACTER", "Dracula"),
            Record::new().with_field("CHARACTER", "Annabelle"),
        ]);
        let catalog = EntityCatalog::load(&loader).await.unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_from_json_str() {
        let catalog = EntityCatalog::from_json_str(
            r#"[{"CHARACTER":"Pennywise","IS_HUMAN":"No"},{"CHARACTER":"Chucky"}]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.records()[0].display_name(), "Pennywise");
    }

    #[test]
    fn test_from_json_str_rejects_non_array() {
        let err = EntityCatalog::from_json_str(r#"{"CHARACTER":"x"}"#).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = EntityCatalog::from_records(Vec::new());
        assert!(catalog.is_empty());
    }
}
