use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;
use crate::historico::domain::{HistoricoRecord, NewHistorico, Stats};
use crate::historico::repository::RecordStore;

/// Relational store over the `historicos` table.
pub struct SeaOrmRecordStore {
    pub db: DatabaseConnection,
}

impl SeaOrmRecordStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl RecordStore for SeaOrmRecordStore {
    fn backend(&self) -> &'static str { "postgres" }

    async fn ensure_schema(&self) -> Result<(), ServiceError> {
        migration::Migrator::up(&self.db, None).await.map_err(ServiceError::storage)
    }

    async fn create(&self, input: NewHistorico) -> Result<HistoricoRecord, ServiceError> {
        let m = models::historico::create(&self.db, &input.lingua, &input.data, input.rank.as_deref()).await?;
        Ok(m.into())
    }

    async fn list_all(&self) -> Result<Vec<HistoricoRecord>, ServiceError> {
        let rows = models::historico::list_ordered(&self.db).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn aggregate_stats(&self) -> Result<Stats, ServiceError> {
        let rows = models::historico::count_by_lingua(&self.db).await?;
        // COUNT(*) is never negative
        Ok(Stats::from_counts(rows.into_iter().map(|r| (r.lingua, r.count.max(0) as u64))))
    }
}
