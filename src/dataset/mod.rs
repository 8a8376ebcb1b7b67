// Active dataset: seed generation with a synced overlay.
//
// Two backing generations exist: the embedded seed corpus and, when a
// sync checkpoint is present, the synced documents in local storage. At
// most one generation is active per read; mixing is disallowed. Orders
// and alerts only exist in the seed corpus — a sheet sync replaces
// products and suppliers, never order history.

use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::{instrument, warn};

use crate::analytics::{self, derive};
use crate::errors::ServiceError;
use crate::models::{Alert, Order, Product, Supplier, SyncState};
use crate::storage::{self, keys, KvStore};

static SEED_PRODUCTS: &str = include_str!("../../data/seed/products.json");
static SEED_SUPPLIERS: &str = include_str!("../../data/seed/suppliers.json");
static SEED_ORDERS: &str = include_str!("../../data/seed/orders.json");
static SEED_ALERTS: &str = include_str!("../../data/seed/alerts.json");

/// Which generation a snapshot was read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Generation {
    Seed,
    Synced,
}

/// The embedded seed corpus, parsed once.
pub struct SeedData {
    pub products: Vec<Product>,
    pub suppliers: Vec<Supplier>,
    pub orders: Vec<Order>,
    pub alerts: Vec<Alert>,
}

/// Refreshes every derived product field and recomputes supplier rollup
/// views from the product set. Runs on every generation load so stored
/// documents can never serve stale derived state.
fn refresh_generation(products: &mut [Product], suppliers: &mut [Supplier]) {
    for product in products.iter_mut() {
        derive::refresh_product(product);
    }
    for supplier in suppliers.iter_mut() {
        let subset: Vec<Product> = products
            .iter()
            .filter(|p| p.supplier_name == supplier.name)
            .cloned()
            .collect();
        let stats = analytics::supplier_stats(&subset);
        supplier.total_products = stats.total_products as u32;
        supplier.total_stock = stats.total_stock as u32;
        supplier.total_valuation = stats.total_cost;
        supplier.total_sales_30d = stats.total_sales;
        supplier.avg_margin = stats.avg_margin;
    }
}

static SEED: Lazy<SeedData> = Lazy::new(|| {
    let mut products: Vec<Product> =
        serde_json::from_str(SEED_PRODUCTS).expect("embedded seed products are valid JSON");
    let mut suppliers: Vec<Supplier> =
        serde_json::from_str(SEED_SUPPLIERS).expect("embedded seed suppliers are valid JSON");
    let orders: Vec<Order> =
        serde_json::from_str(SEED_ORDERS).expect("embedded seed orders are valid JSON");
    let alerts: Vec<Alert> =
        serde_json::from_str(SEED_ALERTS).expect("embedded seed alerts are valid JSON");

    refresh_generation(&mut products, &mut suppliers);
    SeedData {
        products,
        suppliers,
        orders,
        alerts,
    }
});

/// Read-only access to the seed corpus.
pub fn seed() -> &'static SeedData {
    &SEED
}

/// A coherent, single-generation view of the active dataset. All read
/// accessors in `queries` operate on one of these; display surfaces never
/// touch storage keys directly.
#[derive(Clone, Debug)]
pub struct DataSnapshot {
    pub generation: Generation,
    pub sync_state: Option<SyncState>,
    pub products: Vec<Product>,
    pub suppliers: Vec<Supplier>,
    pub orders: Vec<Order>,
    pub alerts: Vec<Alert>,
}

/// Loads snapshots of the active dataset, applying the
/// synced-overrides-seed read policy.
#[derive(Clone)]
pub struct Dataset {
    store: Arc<dyn KvStore>,
}

impl Dataset {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Reads the active generation in its entirety.
    ///
    /// A present checkpoint selects the synced generation; if its data
    /// documents turn out to be missing or unreadable the whole read
    /// falls back to seed (never a mix of the two).
    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<DataSnapshot, ServiceError> {
        let sync_state =
            storage::get_json::<SyncState>(self.store.as_ref(), keys::SYNC_STATE).await?;

        if let Some(state) = sync_state {
            let products =
                storage::get_json::<Vec<Product>>(self.store.as_ref(), keys::PRODUCTS).await?;
            let suppliers =
                storage::get_json::<Vec<Supplier>>(self.store.as_ref(), keys::SUPPLIERS).await?;

            match (products, suppliers) {
                (Some(mut products), Some(mut suppliers)) => {
                    refresh_generation(&mut products, &mut suppliers);
                    return Ok(DataSnapshot {
                        generation: Generation::Synced,
                        sync_state: Some(state),
                        products,
                        suppliers,
                        orders: SEED.orders.clone(),
                        alerts: SEED.alerts.clone(),
                    });
                }
                _ => {
                    warn!("sync checkpoint present but synced documents unreadable; serving seed data");
                }
            }
        }

        Ok(self.seed_snapshot())
    }

    fn seed_snapshot(&self) -> DataSnapshot {
        DataSnapshot {
            generation: Generation::Seed,
            sync_state: None,
            products: SEED.products.clone(),
            suppliers: SEED.suppliers.clone(),
            orders: SEED.orders.clone(),
            alerts: SEED.alerts.clone(),
        }
    }
}
