// Reconciliation service: the sheet-to-dashboard sync pipeline.
//
// Drives the lifecycle idle -> loading -> preview -> syncing -> synced,
// with `error` reachable from the two in-flight phases. Preview buffers
// live in memory only; nothing touches durable storage until `sync`, and
// the checkpoint is written last so readers can never observe a committed
// checkpoint over partially-written data.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{RowValidationError, SheetProduct, SheetSupplier, SyncState};
use crate::sheets::validate::{validate_product_rows, validate_supplier_rows};
use crate::sheets::{extract_sheet_id, SheetClient};
use crate::storage::{self, keys, KvStore};

pub mod backfill;
pub mod transform;

use backfill::SalesBackfill;

/// Tab indices within the source spreadsheet.
const PRODUCTS_GID: u32 = 0;
const SUPPLIERS_GID: u32 = 1;

/// Lifecycle phase of the sync pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SyncPhase {
    Idle,
    Loading,
    Preview,
    Syncing,
    Synced,
    Error,
}

/// In-memory buffers produced by `load_preview`, discarded on cancel.
#[derive(Clone, Debug, Default)]
pub struct PreviewData {
    pub sheet_url: String,
    pub products: Vec<SheetProduct>,
    pub suppliers: Vec<SheetSupplier>,
    pub product_errors: Vec<RowValidationError>,
    pub supplier_errors: Vec<RowValidationError>,
}

impl PreviewData {
    pub fn error_count(&self) -> usize {
        self.product_errors.len() + self.supplier_errors.len()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Sync gate: at least one valid product and zero errors of either
    /// kind. No partial sync of only the clean rows.
    pub fn can_sync(&self) -> bool {
        !self.products.is_empty() && !self.has_errors()
    }
}

/// Orchestrates preview, sync and restore against the injected adapter,
/// store, and backfill strategy.
pub struct SyncService {
    client: SheetClient,
    store: Arc<dyn KvStore>,
    events: EventSender,
    backfill: Box<dyn SalesBackfill>,
    phase: SyncPhase,
    preview: Option<PreviewData>,
    sync_state: Option<SyncState>,
    last_error: Option<String>,
}

impl SyncService {
    pub fn new(
        client: SheetClient,
        store: Arc<dyn KvStore>,
        events: EventSender,
        backfill: Box<dyn SalesBackfill>,
    ) -> Self {
        Self {
            client,
            store,
            events,
            backfill,
            phase: SyncPhase::Idle,
            preview: None,
            sync_state: None,
            last_error: None,
        }
    }

    /// Picks up a previously committed sync, if any: a readable checkpoint
    /// puts the service straight into `synced`.
    pub async fn resume(&mut self) -> Result<(), ServiceError> {
        if let Some(state) = storage::get_json::<SyncState>(self.store.as_ref(), keys::SYNC_STATE)
            .await?
        {
            self.sync_state = Some(state);
            self.phase = SyncPhase::Synced;
        }
        Ok(())
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn preview(&self) -> Option<&PreviewData> {
        self.preview.as_ref()
    }

    pub fn sync_state(&self) -> Option<&SyncState> {
        self.sync_state.as_ref()
    }

    /// User-facing message for the most recent failure, if the service is
    /// in the `error` phase.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Routes a failure to the `error` phase, capturing its user message.
    fn fail(&mut self, err: ServiceError) -> ServiceError {
        self.phase = SyncPhase::Error;
        self.last_error = Some(err.user_message());
        err
    }

    /// Fetches and validates both tabs, buffering the result for preview.
    ///
    /// The two tab fetches are independent reads and run concurrently;
    /// validation waits for both. A failing supplier tab is treated as an
    /// absent optional tab, but any product-tab failure aborts the load.
    #[instrument(skip(self))]
    pub async fn load_preview(&mut self, locator: &str) -> Result<(), ServiceError> {
        match self.phase {
            SyncPhase::Loading | SyncPhase::Syncing => {
                return Err(ServiceError::InvalidOperation(format!(
                    "cannot load a preview while {}",
                    self.phase
                )));
            }
            _ => {}
        }

        self.phase = SyncPhase::Loading;
        self.last_error = None;

        let sheet_id = match extract_sheet_id(locator) {
            Ok(id) => id,
            Err(err) => return Err(self.fail(err.into())),
        };

        let (product_fetch, supplier_fetch) = tokio::join!(
            self.client.fetch_tab(&sheet_id, PRODUCTS_GID),
            self.client.fetch_tab(&sheet_id, SUPPLIERS_GID),
        );

        let product_rows = match product_fetch {
            Ok(rows) => rows,
            Err(err) => return Err(self.fail(err.into())),
        };
        // The supplier tab is optional; a sheet without one shows up as a
        // fetch/parse failure here and reads as empty.
        let supplier_rows = supplier_fetch.unwrap_or_else(|err| {
            info!(error = %err, "supplier tab unavailable; continuing without it");
            Vec::new()
        });

        let (products, product_errors) = validate_product_rows(&product_rows);
        let (suppliers, supplier_errors) = validate_supplier_rows(&supplier_rows);

        info!(
            valid_products = products.len(),
            valid_suppliers = suppliers.len(),
            product_errors = product_errors.len(),
            supplier_errors = supplier_errors.len(),
            "sheet preview loaded"
        );

        let preview = PreviewData {
            sheet_url: locator.to_string(),
            products,
            suppliers,
            product_errors,
            supplier_errors,
        };

        let unusable = preview.products.is_empty() && !preview.product_errors.is_empty();
        self.preview = Some(preview);

        if unusable {
            return Err(self.fail(ServiceError::ValidationFailed(
                "no product rows passed validation; review the reported errors".into(),
            )));
        }

        self.phase = SyncPhase::Preview;
        Ok(())
    }

    /// Discards the preview buffers without touching storage.
    pub fn cancel(&mut self) -> Result<(), ServiceError> {
        if self.phase != SyncPhase::Preview {
            return Err(ServiceError::InvalidOperation(format!(
                "nothing to cancel in phase {}",
                self.phase
            )));
        }
        self.preview = None;
        self.phase = SyncPhase::Idle;
        Ok(())
    }

    /// Commits the preview: derives full entities and persists them plus
    /// the checkpoint, checkpoint last.
    ///
    /// Gate: at least one valid product row and zero accumulated errors
    /// across both row kinds. A gated rejection leaves the service in
    /// `preview` so the user can fix the sheet and reload; only storage
    /// failures move it to `error`.
    #[instrument(skip(self))]
    pub async fn sync(&mut self) -> Result<SyncState, ServiceError> {
        if self.phase != SyncPhase::Preview {
            return Err(ServiceError::InvalidOperation(format!(
                "sync is only available from preview (current phase: {})",
                self.phase
            )));
        }

        let preview = self
            .preview
            .clone()
            .ok_or_else(|| ServiceError::InternalError("preview phase without buffers".into()))?;

        if preview.products.is_empty() {
            return Err(ServiceError::InvalidOperation(
                "nothing to sync: no valid product rows".into(),
            ));
        }
        if preview.has_errors() {
            return Err(ServiceError::InvalidOperation(format!(
                "fix the {} validation error(s) before syncing",
                preview.error_count()
            )));
        }

        self.phase = SyncPhase::Syncing;

        let (products, suppliers) = transform::build_entities(
            &preview.products,
            &preview.suppliers,
            self.backfill.as_mut(),
        );

        let state = SyncState {
            last_sync: Utc::now(),
            sheet_url: preview.sheet_url.clone(),
            products_count: products.len(),
            suppliers_count: suppliers.len(),
        };

        // Data documents first, checkpoint last: the checkpoint is the
        // commit marker that makes this generation visible to readers.
        if let Err(err) =
            storage::set_json(self.store.as_ref(), keys::PRODUCTS, &products).await
        {
            return Err(self.fail(err.into()));
        }
        if let Err(err) =
            storage::set_json(self.store.as_ref(), keys::SUPPLIERS, &suppliers).await
        {
            return Err(self.fail(err.into()));
        }
        if let Err(err) = storage::set_json(self.store.as_ref(), keys::SYNC_STATE, &state).await {
            return Err(self.fail(err.into()));
        }

        info!(
            products = state.products_count,
            suppliers = state.suppliers_count,
            "sync committed"
        );
        self.events
            .send(Event::DatasetSynced {
                products_count: state.products_count,
                suppliers_count: state.suppliers_count,
            })
            .await;

        self.preview = None;
        self.sync_state = Some(state.clone());
        self.phase = SyncPhase::Synced;
        Ok(state)
    }

    /// Clears the synced generation, reverting all reads to seed data.
    ///
    /// The checkpoint is deleted first: once it is gone no reader selects
    /// the synced generation, so a crash between deletes leaves orphaned
    /// data documents but never a live checkpoint over missing data.
    #[instrument(skip(self))]
    pub async fn restore(&mut self) -> Result<(), ServiceError> {
        if self.phase != SyncPhase::Synced {
            return Err(ServiceError::InvalidOperation(format!(
                "nothing to restore in phase {}",
                self.phase
            )));
        }

        self.store.delete(keys::SYNC_STATE).await.map_err(|err| {
            warn!(error = %err, "failed to delete sync checkpoint");
            ServiceError::from(err)
        })?;
        self.store.delete(keys::PRODUCTS).await?;
        self.store.delete(keys::SUPPLIERS).await?;

        self.events.send(Event::DatasetRestored).await;

        self.preview = None;
        self.sync_state = None;
        self.last_error = None;
        self.phase = SyncPhase::Idle;
        info!("synced dataset cleared; reads fall back to seed data");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn force_preview(&mut self, preview: PreviewData) {
        self.preview = Some(preview);
        self.phase = SyncPhase::Preview;
    }
}
