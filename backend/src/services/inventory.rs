//! Inventory service: order intake, forecasts, anomaly runs and exports
//!
//! All mutable state lives in one `InventorySnapshot` behind a write lock.
//! Validation, stock deduction and the ledger append happen inside a single
//! critical section, so two concurrent orders can never both pass the stock
//! check against the same quantity. Readers clone the current `Arc` and work
//! on an immutable snapshot without holding the lock. Writes are copy-on-write:
//! the snapshot is only copied while a reader still holds the previous one.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use shared::{
    summarize_customers, validate_order, AnomalyModel, AnomalyOutcome, CustomerSummary,
    DetectionWindow, ForecastEngine, ForecastMode, InventoryLogRecord, Order, OrderLedger,
    OrderOutcome, OrderRequest, OrdersRecord, ProductCatalog, ProductForecast,
};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::{LogSink, RecordSink};

/// Longest trajectory the API will project
pub const MAX_HORIZON_DAYS: u32 = 3650;

/// Catalog and ledger as of one point in the order sequence
#[derive(Debug, Clone, Default, Serialize)]
pub struct InventorySnapshot {
    pub catalog: ProductCatalog,
    pub ledger: OrderLedger,
}

/// Inventory service owning the authoritative stock state
pub struct InventoryService {
    state: RwLock<Arc<InventorySnapshot>>,
    engine: ForecastEngine,
    default_mode: ForecastMode,
    model: Box<dyn AnomalyModel>,
    sink: Arc<dyn RecordSink>,
}

impl InventoryService {
    pub fn new(
        catalog: ProductCatalog,
        engine: ForecastEngine,
        default_mode: ForecastMode,
        model: Box<dyn AnomalyModel>,
    ) -> Self {
        Self {
            state: RwLock::new(Arc::new(InventorySnapshot {
                catalog,
                ledger: OrderLedger::new(),
            })),
            engine,
            default_mode,
            model,
            sink: Arc::new(LogSink),
        }
    }

    /// Build the service from configuration and an already loaded catalog
    pub fn from_config(config: &Config, catalog: ProductCatalog) -> Self {
        Self::new(
            catalog,
            ForecastEngine::new(config.forecast.engine_config()),
            config.forecast.mode,
            config.anomaly.build_model(),
        )
    }

    /// Replace the record sink
    pub fn with_sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Current catalog and ledger
    pub fn snapshot(&self) -> Arc<InventorySnapshot> {
        Arc::clone(&self.state.read())
    }

    pub fn default_mode(&self) -> ForecastMode {
        self.default_mode
    }

    pub fn anomaly_model_name(&self) -> &'static str {
        self.model.name()
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Validate and apply an order, timestamped on acceptance
    pub fn submit_order(&self, request: OrderRequest) -> OrderOutcome {
        self.submit_with(request, Utc::now)
    }

    /// Validate and apply an order with an explicit timestamp
    pub fn submit_order_at(&self, request: OrderRequest, ordered_at: DateTime<Utc>) -> OrderOutcome {
        self.submit_with(request, move || ordered_at)
    }

    fn submit_with(
        &self,
        request: OrderRequest,
        clock: impl FnOnce() -> DateTime<Utc>,
    ) -> OrderOutcome {
        let outcome = {
            let mut state = self.state.write();
            let checked = validate_order(&request, &state.catalog).and_then(|()| {
                state
                    .catalog
                    .with_deduction(&request.product_name, request.quantity)
                    .map_err(Into::into)
            });
            match checked {
                Ok(catalog) => {
                    let snapshot = Arc::make_mut(&mut *state);
                    snapshot.catalog = catalog;
                    let order = snapshot.ledger.append(&request, clock());
                    // Still under the lock, so the sink sees records in ledger order
                    self.sink.write(&order.export_records());
                    OrderOutcome::Accepted(order)
                }
                Err(reason) => OrderOutcome::Rejected(reason),
            }
        };

        match &outcome {
            OrderOutcome::Accepted(order) => {
                tracing::info!(
                    order_id = %order.id,
                    customer = %order.customer_name,
                    product = %order.product_name,
                    quantity = order.quantity,
                    "order accepted"
                );
            }
            OrderOutcome::Rejected(reason) => {
                tracing::warn!(
                    code = reason.code(),
                    product = %request.product_name,
                    quantity = request.quantity,
                    "order rejected: {}",
                    reason
                );
            }
        }
        outcome
    }

    pub fn get_catalog(&self) -> ProductCatalog {
        self.snapshot().catalog.clone()
    }

    pub fn list_orders(&self) -> Vec<Order> {
        self.snapshot().ledger.orders().to_vec()
    }

    // ========================================================================
    // Forecasts
    // ========================================================================

    /// Forecast one product as of today
    pub fn forecast(
        &self,
        product_name: &str,
        horizon_days: Option<u32>,
        mode: Option<ForecastMode>,
    ) -> AppResult<ProductForecast> {
        self.forecast_at(product_name, horizon_days, mode, Utc::now().date_naive())
    }

    /// Forecast one product as of a given date
    pub fn forecast_at(
        &self,
        product_name: &str,
        horizon_days: Option<u32>,
        mode: Option<ForecastMode>,
        as_of: NaiveDate,
    ) -> AppResult<ProductForecast> {
        check_horizon(horizon_days)?;
        let snapshot = self.snapshot();
        let product = snapshot
            .catalog
            .get(product_name)
            .ok_or_else(|| AppError::NotFound(format!("Product {}", product_name)))?;

        Ok(self.engine.forecast(
            mode.unwrap_or(self.default_mode),
            product,
            &snapshot.ledger,
            as_of,
            horizon_days,
        ))
    }

    /// Forecast every product in catalog order
    pub fn forecast_all_at(
        &self,
        horizon_days: Option<u32>,
        mode: Option<ForecastMode>,
        as_of: NaiveDate,
    ) -> AppResult<Vec<ProductForecast>> {
        check_horizon(horizon_days)?;
        let snapshot = self.snapshot();
        let mode = mode.unwrap_or(self.default_mode);
        Ok(snapshot
            .catalog
            .products()
            .iter()
            .map(|product| {
                self.engine
                    .forecast(mode, product, &snapshot.ledger, as_of, horizon_days)
            })
            .collect())
    }

    pub fn forecast_all(
        &self,
        horizon_days: Option<u32>,
        mode: Option<ForecastMode>,
    ) -> AppResult<Vec<ProductForecast>> {
        self.forecast_all_at(horizon_days, mode, Utc::now().date_naive())
    }

    // ========================================================================
    // Anomalies and reports
    // ========================================================================

    /// Run the configured anomaly model over a window of the ledger
    pub fn detect_anomalies(&self, window: DetectionWindow) -> AnomalyOutcome {
        let snapshot = self.snapshot();
        shared::detect_anomalies(self.model.as_ref(), &snapshot.ledger, window)
    }

    pub fn customer_summaries(&self) -> Vec<CustomerSummary> {
        let snapshot = self.snapshot();
        summarize_customers(&snapshot.ledger, &snapshot.catalog)
    }

    /// OUT movements for every accepted order, oldest first
    pub fn inventory_log(&self) -> Vec<InventoryLogRecord> {
        self.snapshot()
            .ledger
            .orders()
            .iter()
            .map(InventoryLogRecord::from)
            .collect()
    }

    /// Orders in their export shape, oldest first
    pub fn order_records(&self) -> Vec<OrdersRecord> {
        self.snapshot()
            .ledger
            .orders()
            .iter()
            .map(OrdersRecord::from)
            .collect()
    }

    /// Export records as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record).map_err(|e| {
                AppError::Internal(format!("CSV serialization error: {}", e))
            })?;
        }
        let csv_data = String::from_utf8(wtr.into_inner().map_err(|e| {
            AppError::Internal(format!("CSV writer error: {}", e))
        })?)
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}

fn check_horizon(horizon_days: Option<u32>) -> AppResult<()> {
    match horizon_days {
        Some(days) if days > MAX_HORIZON_DAYS => Err(AppError::Validation {
            field: "horizon_days".to_string(),
            message: format!("Horizon cannot exceed {} days", MAX_HORIZON_DAYS),
        }),
        _ => Ok(()),
    }
}
