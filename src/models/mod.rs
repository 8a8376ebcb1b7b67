// Domain entities for the dashboard core.
//
// Entities here are plain data; every derived field on `Product` is
// computed by `analytics::derive` at construction/load time so no call
// site carries its own copy of the formulas.

pub mod alert;
pub mod order;
pub mod product;
pub mod reporting;
pub mod sheet;
pub mod supplier;
pub mod sync_state;

pub use alert::{Alert, AlertSeverity, AlertType};
pub use order::{Order, OrderItem, OrderStatus};
pub use product::{LogisticType, Product, ProductStatus, StockStatus};
pub use reporting::{
    AbcClass, AbcSummary, CategoryBreakdown, DashboardKpis, ForecastPoint, InventoryValuation,
    ParetoItem, SalesByChannel, SalesTrendPoint, StockDistribution, StockoutRisk, SupplierStats,
};
pub use sheet::{RowValidationError, SheetProduct, SheetSupplier};
pub use supplier::Supplier;
pub use sync_state::SyncState;
