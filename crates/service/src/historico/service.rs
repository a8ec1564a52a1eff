use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::{HistoricoInput, HistoricoRecord, Stats};
use super::repository::RecordStore;
use crate::errors::ServiceError;

/// Historico business service independent of web framework and backend.
#[derive(Clone)]
pub struct HistoricoService {
    store: Arc<dyn RecordStore>,
}

impl HistoricoService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self { Self { store } }

    pub fn backend(&self) -> &'static str { self.store.backend() }

    pub async fn ensure_schema(&self) -> Result<(), ServiceError> {
        self.store.ensure_schema().await
    }

    /// Validate and persist a new record.
    ///
    /// # Examples
    /// ```
    /// use service::historico::{HistoricoService, repository::mock::MockRecordStore};
    /// use service::historico::domain::HistoricoInput;
    /// use std::sync::Arc;
    /// let svc = HistoricoService::new(Arc::new(MockRecordStore::default()));
    /// let input = HistoricoInput { lingua: Some("pt".into()), data: Some("2024-01-01".into()), rank: None };
    /// let rec = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(rec.lingua, "pt");
    /// ```
    #[instrument(skip(self, input), fields(backend = self.store.backend()))]
    pub async fn create(&self, input: HistoricoInput) -> Result<HistoricoRecord, ServiceError> {
        let new = input.validate()?;
        let record = self.store.create(new).await?;
        info!(id = %record.id, lingua = %record.lingua, "historico_created");
        Ok(record)
    }

    pub async fn list(&self) -> Result<Vec<HistoricoRecord>, ServiceError> {
        self.store.list_all().await
    }

    pub async fn stats(&self) -> Result<Stats, ServiceError> {
        self.store.aggregate_stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::historico::repository::mock::MockRecordStore;

    fn input(lingua: Option<&str>, data: Option<&str>) -> HistoricoInput {
        HistoricoInput { lingua: lingua.map(Into::into), data: data.map(Into::into), rank: None }
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_store() {
        let store = Arc::new(MockRecordStore::default());
        let svc = HistoricoService::new(store.clone());
        let err = svc.create(input(None, Some("2024-01-01"))).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn stats_count_per_language() -> Result<(), ServiceError> {
        let svc = HistoricoService::new(Arc::new(MockRecordStore::default()));
        for lingua in ["pt", "pt", "en"] {
            svc.create(input(Some(lingua), Some("2024-01-01"))).await?;
        }
        let stats = svc.stats().await?;
        assert_eq!(stats.total, 3);
        assert_eq!(stats.por_lingua.get("pt"), Some(&2));
        assert_eq!(stats.por_lingua.get("en"), Some(&1));
        Ok(())
    }

    #[tokio::test]
    async fn storage_failure_propagates() {
        let store = Arc::new(MockRecordStore::default());
        let svc = HistoricoService::new(store.clone());
        store.set_failing(true);
        assert!(matches!(svc.list().await, Err(ServiceError::Storage(_))));
        assert!(matches!(svc.create(input(Some("pt"), Some("d"))).await, Err(ServiceError::Storage(_))));
        store.set_failing(false);
        assert!(svc.list().await.unwrap().is_empty());
    }
}
