use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use retail_pulse::analytics::{forecast, pareto};
use retail_pulse::config::{self, AppConfig};
use retail_pulse::dataset::Dataset;
use retail_pulse::errors::ServiceError;
use retail_pulse::models::StockStatus;
use retail_pulse::sheets::SheetClient;
use retail_pulse::storage::FileStore;
use retail_pulse::sync::backfill::{SalesBackfill, SeededSalesBackfill};
use retail_pulse::sync::{SyncPhase, SyncService};
use retail_pulse::{alerts, events, queries};

#[derive(Parser)]
#[command(
    name = "retail-pulse",
    version,
    about = "Retail analytics core: sheet sync, derived metrics, dashboard reads"
)]
struct Cli {
    /// Emit machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spreadsheet synchronization lifecycle
    #[command(subcommand)]
    Sync(SyncCommand),
    /// Dashboard KPI headline row
    Kpis,
    /// Pareto ranking with ABC classes
    Pareto {
        /// Number of ranked products to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Project sales for the coming days
    Forecast,
    /// Active alerts, most severe first
    Alerts,
    /// Products in the critical or alert stock band
    Critical,
    /// Suppliers with their rollups
    Suppliers,
}

#[derive(Subcommand)]
enum SyncCommand {
    /// Fetch and validate a sheet without persisting anything
    Preview { url: Option<String> },
    /// Fetch, validate and commit in one step
    Run { url: Option<String> },
    /// Clear synced data, reverting reads to the seed dataset
    Restore,
    /// Show the current sync checkpoint
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let context = CliContext::initialize()?;

    match cli.command {
        Commands::Sync(command) => handle_sync_command(&context, command, cli.json).await?,
        Commands::Kpis => handle_kpis(&context, cli.json).await?,
        Commands::Pareto { limit } => handle_pareto(&context, limit, cli.json).await?,
        Commands::Forecast => handle_forecast(&context, cli.json).await?,
        Commands::Alerts => handle_alerts(&context, cli.json).await?,
        Commands::Critical => handle_critical(&context, cli.json).await?,
        Commands::Suppliers => handle_suppliers(&context, cli.json).await?,
    }

    Ok(())
}

struct CliContext {
    config: AppConfig,
    store: Arc<FileStore>,
    dataset: Dataset,
}

impl CliContext {
    fn initialize() -> Result<Self> {
        let config = config::load_config().context("failed to load configuration")?;
        config::init_tracing(&config.log_level, config.log_json);

        let store = Arc::new(FileStore::new(&config.data_dir));
        let dataset = Dataset::new(store.clone());
        Ok(Self {
            config,
            store,
            dataset,
        })
    }

    fn sync_service(&self) -> SyncService {
        let (sender, mut receiver) = events::channel(self.config.event_channel_capacity);
        // The CLI is its own only consumer; drain events for the log.
        tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                tracing::debug!(?event, "dataset event");
            }
        });

        let backfill: Box<dyn SalesBackfill> = match self.config.backfill_seed {
            Some(seed) => Box::new(SeededSalesBackfill::new(seed)),
            None => Box::new(SeededSalesBackfill::from_entropy()),
        };

        SyncService::new(SheetClient::new(), self.store.clone(), sender, backfill)
    }

    fn resolve_sheet_url(&self, url: Option<String>) -> Result<String> {
        url.or_else(|| self.config.sheet_url.clone())
            .context("no sheet URL given and none configured (set sheet_url or APP__SHEET_URL)")
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Surfaces a pipeline failure with its actionable message.
fn report_failure(err: ServiceError) -> anyhow::Error {
    anyhow::anyhow!("{}", err.user_message())
}

async fn handle_sync_command(context: &CliContext, command: SyncCommand, json: bool) -> Result<()> {
    match command {
        SyncCommand::Preview { url } => {
            let url = context.resolve_sheet_url(url)?;
            let mut service = context.sync_service();
            let result = service.load_preview(&url).await;
            print_preview(&service, json)?;
            result.map_err(report_failure)?;
            Ok(())
        }
        SyncCommand::Run { url } => {
            let url = context.resolve_sheet_url(url)?;
            let mut service = context.sync_service();
            let load = service.load_preview(&url).await;
            print_preview(&service, json)?;
            load.map_err(report_failure)?;

            let state = service.sync().await.map_err(report_failure)?;
            if json {
                print_json(&state)?;
            } else {
                println!(
                    "Synced {} products and {} suppliers at {}",
                    state.products_count, state.suppliers_count, state.last_sync
                );
            }
            Ok(())
        }
        SyncCommand::Restore => {
            let mut service = context.sync_service();
            service.resume().await.map_err(report_failure)?;
            if service.phase() != SyncPhase::Synced {
                bail!("no synced dataset to restore; the seed dataset is already active");
            }
            service.restore().await.map_err(report_failure)?;
            println!("Synced data cleared; the seed dataset is active again.");
            Ok(())
        }
        SyncCommand::Status => {
            let mut service = context.sync_service();
            service.resume().await.map_err(report_failure)?;
            match service.sync_state() {
                Some(state) if json => print_json(state)?,
                Some(state) => println!(
                    "Synced generation active: {} products, {} suppliers, last sync {} ({})",
                    state.products_count, state.suppliers_count, state.last_sync, state.sheet_url
                ),
                None => println!("Seed generation active (no sync checkpoint)."),
            }
            Ok(())
        }
    }
}

fn print_preview(service: &SyncService, json: bool) -> Result<()> {
    let Some(preview) = service.preview() else {
        return Ok(());
    };

    if json {
        return print_json(&json!({
            "valid_products": preview.products.len(),
            "valid_suppliers": preview.suppliers.len(),
            "product_errors": &preview.product_errors,
            "supplier_errors": &preview.supplier_errors,
            "can_sync": preview.can_sync(),
        }));
    }

    println!(
        "Preview: {} valid products, {} valid suppliers",
        preview.products.len(),
        preview.suppliers.len()
    );
    for err in preview
        .product_errors
        .iter()
        .chain(preview.supplier_errors.iter())
    {
        if err.is_structural() {
            println!("  [structural] {}", err.message);
        } else {
            println!("  row {:>4}  {:<14} {}", err.row, err.column, err.message);
        }
    }
    if preview.has_errors() {
        println!("Fix the errors above before syncing.");
    }
    Ok(())
}

async fn handle_kpis(context: &CliContext, json: bool) -> Result<()> {
    let snapshot = context.dataset.snapshot().await.map_err(report_failure)?;
    let kpis = queries::dashboard_kpis(&snapshot);

    if json {
        return print_json(&kpis);
    }
    println!("Generation:        {}", snapshot.generation);
    println!("Products:          {}", kpis.total_products);
    println!("Units in stock:    {}", kpis.total_stock);
    println!("Stock valuation:   {:.2}", kpis.stock_valuation);
    println!("Sales (30d):       {:.2}", kpis.sales_30d);
    println!("Paid orders (30d): {}", kpis.orders_30d);
    println!("Average ticket:    {:.2}", kpis.avg_ticket);
    println!("Average margin:    {:.1}%", kpis.avg_margin);
    println!("Critical products: {}", kpis.critical_products);
    println!("Open alerts:       {}", kpis.alerts_count);
    Ok(())
}

async fn handle_pareto(context: &CliContext, limit: usize, json: bool) -> Result<()> {
    let snapshot = context.dataset.snapshot().await.map_err(report_failure)?;
    let items = pareto::calculate_pareto(&snapshot.products);
    let summary = pareto::abc_summary(&items);

    if json {
        return print_json(&json!({
            "items": items.iter().take(limit).collect::<Vec<_>>(),
            "summary": summary,
        }));
    }

    println!(
        "{:<4} {:<12} {:<30} {:>12} {:>8} {:>8}  {}",
        "#", "SKU", "Title", "Sales", "Share", "Cum.", "Class"
    );
    for (rank, item) in items.iter().take(limit).enumerate() {
        println!(
            "{:<4} {:<12} {:<30} {:>12.2} {:>7.1}% {:>7.1}%  {}",
            rank + 1,
            item.product.sku,
            truncate(&item.product.title, 30),
            item.sales_amount,
            item.sales_percent,
            item.cumulative_percent,
            item.abc_class
        );
    }
    println!(
        "A: {} products / {:.1}% of sales | B: {} / {:.1}% | C: {} / {:.1}%",
        summary.a.count,
        summary.a.percent,
        summary.b.count,
        summary.b.percent,
        summary.c.count,
        summary.c.percent
    );
    Ok(())
}

async fn handle_forecast(context: &CliContext, json: bool) -> Result<()> {
    let snapshot = context.dataset.snapshot().await.map_err(report_failure)?;
    let history = queries::sales_trend(
        &snapshot.orders,
        queries::seed_trend_anchor(),
        context.config.trend_window_days,
    );
    let projection = forecast::forecast_sales(&history, context.config.forecast_horizon_days);

    let today = chrono::Utc::now().date_naive();
    let at_risk = queries::stockout_risk(&snapshot.products, context.config.lead_time_days, 14.0, today);

    if json {
        return print_json(&json!({
            "history": history,
            "forecast": projection,
            "stockout_risk": at_risk,
        }));
    }

    println!("History ({} days):", history.len());
    for point in &history {
        println!("  {}  {:>10.2}  ({} orders)", point.date, point.sales, point.orders);
    }
    println!("Forecast ({} days):", projection.len());
    for point in &projection {
        println!("  {}  {:>10.2}", point.date, point.forecast);
    }
    if !at_risk.is_empty() {
        println!("Stockout risk (next 14 days):");
        for risk in &at_risk {
            println!(
                "  {:<12} {:<30} stock {:>5}  runs out {}  reorder at {}{}",
                risk.product.sku,
                truncate(&risk.product.title, 30),
                risk.product.stock_total,
                risk.stockout_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "never".to_string()),
                risk.reorder_point,
                if risk.needs_reorder { "  <- reorder now" } else { "" }
            );
        }
    }
    Ok(())
}

async fn handle_alerts(context: &CliContext, json: bool) -> Result<()> {
    let snapshot = context.dataset.snapshot().await.map_err(report_failure)?;
    let active = alerts::active_alerts(&snapshot.alerts);

    if json {
        return print_json(&active);
    }
    if active.is_empty() {
        println!("No active alerts.");
        return Ok(());
    }
    for alert in &active {
        println!(
            "[{:<8}] {:<15} {}  {}",
            alert.severity.to_string(),
            alert.alert_type.to_string(),
            alert.product_title.as_deref().unwrap_or(&alert.product_id),
            alert.message
        );
    }
    Ok(())
}

async fn handle_critical(context: &CliContext, json: bool) -> Result<()> {
    let snapshot = context.dataset.snapshot().await.map_err(report_failure)?;
    let critical = queries::critical_products(&snapshot.products);

    if json {
        let rows: Vec<_> = critical
            .iter()
            .map(|(product, status)| {
                json!({
                    "sku": &product.sku,
                    "title": &product.title,
                    "stock_total": product.stock_total,
                    "days_of_stock": product.days_of_stock,
                    "status": status,
                })
            })
            .collect();
        return print_json(&rows);
    }

    if critical.is_empty() {
        println!("No products in the critical band.");
        return Ok(());
    }
    for (product, status) in &critical {
        let marker = if *status == StockStatus::Critical {
            "!!"
        } else {
            " !"
        };
        println!(
            "{} {:<12} {:<30} stock {:>5}  {:>6.1} days",
            marker,
            product.sku,
            truncate(&product.title, 30),
            product.stock_total,
            product.days_of_stock
        );
    }
    Ok(())
}

async fn handle_suppliers(context: &CliContext, json: bool) -> Result<()> {
    let snapshot = context.dataset.snapshot().await.map_err(report_failure)?;

    if json {
        return print_json(&snapshot.suppliers);
    }
    for supplier in &snapshot.suppliers {
        println!(
            "{:<20} {:>3} products, {:>6} units, valuation {:>12.2}, sales {:>12.2}, margin {:>5.1}%",
            supplier.name,
            supplier.total_products,
            supplier.total_stock,
            supplier.total_valuation,
            supplier.total_sales_30d,
            supplier.avg_margin
        );
    }
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
