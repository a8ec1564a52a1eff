pub mod document;
pub mod seaorm;

pub use document::DocumentRecordStore;
pub use seaorm::SeaOrmRecordStore;
