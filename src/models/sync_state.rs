use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Checkpoint describing the most recent successful sync.
///
/// Written last during the commit sequence, so its presence guarantees the
/// synced product and supplier documents are complete. Its presence is
/// also the read-policy switch: checkpoint present means every downstream
/// query reads the synced generation; absent means the seed generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    pub last_sync: DateTime<Utc>,
    pub sheet_url: String,
    pub products_count: usize,
    pub suppliers_count: usize,
}
