use async_trait::async_trait;

use super::domain::{HistoricoRecord, NewHistorico, Stats};
use crate::errors::ServiceError;

/// Persistence backend for historico records.
///
/// Implementations only ever receive validated input. Any backend failure is
/// reported as `ServiceError::Storage`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// Create the table or collection if missing. Safe to call repeatedly.
    async fn ensure_schema(&self) -> Result<(), ServiceError>;

    async fn create(&self, input: NewHistorico) -> Result<HistoricoRecord, ServiceError>;

    async fn list_all(&self) -> Result<Vec<HistoricoRecord>, ServiceError>;

    async fn aggregate_stats(&self) -> Result<Stats, ServiceError>;
}

/// Simple in-memory mock store for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use crate::historico::domain::RecordId;

    #[derive(Default)]
    pub struct MockRecordStore {
        records: Mutex<Vec<HistoricoRecord>>,
        failing: AtomicBool,
    }

    impl MockRecordStore {
        /// Make every subsequent call fail with a storage error (or recover).
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn len(&self) -> usize {
            self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
        }

        fn check(&self) -> Result<(), ServiceError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(ServiceError::Storage("mock store unavailable".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RecordStore for MockRecordStore {
        fn backend(&self) -> &'static str { "mock" }

        async fn ensure_schema(&self) -> Result<(), ServiceError> {
            self.check()
        }

        async fn create(&self, input: NewHistorico) -> Result<HistoricoRecord, ServiceError> {
            self.check()?;
            let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
            let record = HistoricoRecord {
                id: RecordId::Seq(records.len() as i64 + 1),
                lingua: input.lingua,
                data: input.data,
                rank: input.rank,
                timestamp: None,
            };
            records.push(record.clone());
            Ok(record)
        }

        async fn list_all(&self) -> Result<Vec<HistoricoRecord>, ServiceError> {
            self.check()?;
            Ok(self.records.lock().unwrap_or_else(|e| e.into_inner()).clone())
        }

        async fn aggregate_stats(&self) -> Result<Stats, ServiceError> {
            self.check()?;
            let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
            Ok(Stats::from_counts(records.iter().map(|r| (r.lingua.clone(), 1))))
        }
    }
}
