use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::ServiceError;

/// Message returned when `lingua` or `data` is missing.
pub const MISSING_FIELDS_MESSAGE: &str = "Informe lingua e data.";

/// Store-assigned identifier: a sequence number for the relational store,
/// an opaque key for the document store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Seq(i64),
    Key(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Seq(n) => write!(f, "{n}"),
            RecordId::Key(k) => f.write_str(k),
        }
    }
}

/// A stored historico entry as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricoRecord {
    pub id: RecordId,
    pub lingua: String,
    pub data: String,
    pub rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl From<models::historico::Model> for HistoricoRecord {
    fn from(m: models::historico::Model) -> Self {
        Self { id: RecordId::Seq(m.id.into()), lingua: m.lingua, data: m.data, rank: m.rank, timestamp: None }
    }
}

/// Raw create payload. Every field is optional at this point. Falsy values
/// (`null`, `false`, `0`, `""`) in `lingua`/`data` count as missing; any other
/// non-string value is kept as its JSON text.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HistoricoInput {
    #[serde(default, deserialize_with = "present_text")]
    pub lingua: Option<String>,
    #[serde(default, deserialize_with = "present_text")]
    pub data: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub rank: Option<String>,
}

/// Validated create payload handed to a `RecordStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistorico {
    pub lingua: String,
    pub data: String,
    pub rank: Option<String>,
}

impl HistoricoInput {
    /// Parse a request body. Anything but a JSON object is a validation error.
    pub fn from_json(body: Value) -> Result<Self, ServiceError> {
        if !body.is_object() {
            return Err(ServiceError::Validation(MISSING_FIELDS_MESSAGE.into()));
        }
        serde_json::from_value(body).map_err(|_| ServiceError::Validation(MISSING_FIELDS_MESSAGE.into()))
    }

    /// `lingua` and `data` must be present and non-empty.
    pub fn validate(self) -> Result<NewHistorico, ServiceError> {
        match (self.lingua, self.data) {
            (Some(lingua), Some(data)) if !lingua.is_empty() && !data.is_empty() => {
                Ok(NewHistorico { lingua, data, rank: self.rank })
            }
            _ => Err(ServiceError::Validation(MISSING_FIELDS_MESSAGE.into())),
        }
    }
}

fn is_falsy(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn text(v: Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn present_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(if is_falsy(&v) { None } else { text(v) })
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(Value::deserialize(deserializer)?))
}

/// Totals for `/estatisticas`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total: u64,
    #[serde(rename = "porLingua")]
    pub por_lingua: BTreeMap<String, u64>,
}

impl Stats {
    /// Build from per-language counts; `total` is their sum.
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut stats = Stats::default();
        for (lingua, n) in counts {
            *stats.por_lingua.entry(lingua.into()).or_default() += n;
            stats.total += n;
        }
        stats
    }
}
