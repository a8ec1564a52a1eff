use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::historico::domain::{HistoricoRecord, NewHistorico, RecordId, Stats};
use crate::historico::repository::RecordStore;
use crate::storage::json_map_store::JsonMapStore;

/// Body of one document in the collection; the key is held by the map.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoricoDocument {
    pub lingua: String,
    pub data: String,
    pub rank: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Document store: one JSON file acting as the `historicos` collection.
pub struct DocumentRecordStore {
    collection: JsonMapStore<String, HistoricoDocument>,
}

impl DocumentRecordStore {
    /// Does not touch the disk; the file is created by `ensure_schema` or the first write.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { collection: JsonMapStore::new(path) }
    }

    fn to_record(id: String, doc: HistoricoDocument) -> HistoricoRecord {
        HistoricoRecord {
            id: RecordId::Key(id),
            lingua: doc.lingua,
            data: doc.data,
            rank: doc.rank,
            timestamp: Some(doc.timestamp),
        }
    }
}

#[async_trait::async_trait]
impl RecordStore for DocumentRecordStore {
    fn backend(&self) -> &'static str { "document" }

    async fn ensure_schema(&self) -> Result<(), ServiceError> {
        self.collection.ensure_file().await
    }

    async fn create(&self, input: NewHistorico) -> Result<HistoricoRecord, ServiceError> {
        let id = Uuid::new_v4().to_string();
        let doc = HistoricoDocument {
            lingua: input.lingua,
            data: input.data,
            rank: input.rank,
            timestamp: Utc::now(),
        };
        self.collection.insert(id.clone(), doc.clone()).await?;
        Ok(Self::to_record(id, doc))
    }

    /// Ordered by creation time, ties broken by key.
    async fn list_all(&self) -> Result<Vec<HistoricoRecord>, ServiceError> {
        let mut entries = self.collection.list().await?;
        entries.sort_by(|(ka, a), (kb, b)| a.timestamp.cmp(&b.timestamp).then_with(|| ka.cmp(kb)));
        Ok(entries.into_iter().map(|(id, doc)| Self::to_record(id, doc)).collect())
    }

    async fn aggregate_stats(&self) -> Result<Stats, ServiceError> {
        let entries = self.collection.list().await?;
        Ok(Stats::from_counts(entries.into_iter().map(|(_, doc)| (doc.lingua, 1))))
    }
}
