//! Order placement: submits the grocery list to a delivery service on a
//! background task and reports progress over a watch channel.
//!
//! Status flow: `idle → placing → placed | failed | cancelled`. Dropping an
//! `OrderHandle` aborts the task.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::GroceryStore;
use crate::error::OrderError;

use super::aggregate::GroceryListEntry;
use super::pricing::{PriceEstimator, estimate_total_cost, order_total};

/// Order progress as seen by the grocery page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OrderStatus {
    Idle,
    Placing { store: String },
    Placed { confirmation: OrderConfirmation },
    Failed { reason: String },
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Placed { .. } | Self::Failed { .. } | Self::Cancelled
        )
    }

    pub fn is_placing(&self) -> bool {
        matches!(self, Self::Placing { .. })
    }
}

/// What gets sent to the delivery service.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    pub store: GroceryStore,
    pub entries: Vec<GroceryListEntry>,
    pub subtotal: Decimal,
    /// Subtotal plus delivery fee.
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: Uuid,
    pub store_id: String,
    pub store_name: String,
    pub item_count: usize,
    pub total: Decimal,
    pub placed_at: DateTime<Utc>,
}

/// External order-processing collaborator.
#[async_trait]
pub trait DeliveryService: Send + Sync {
    async fn submit(&self, request: &OrderRequest) -> Result<OrderConfirmation, OrderError>;
}

/// Stand-in delivery service: waits, then always accepts.
#[derive(Debug, Clone)]
pub struct SimulatedDelivery {
    delay: Duration,
}

impl SimulatedDelivery {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl DeliveryService for SimulatedDelivery {
    async fn submit(&self, request: &OrderRequest) -> Result<OrderConfirmation, OrderError> {
        tokio::time::sleep(self.delay).await;
        Ok(OrderConfirmation {
            order_id: Uuid::new_v4(),
            store_id: request.store.id.clone(),
            store_name: request.store.name.clone(),
            item_count: request.entries.len(),
            total: request.total,
            placed_at: Utc::now(),
        })
    }
}

/// Prices the list and starts delivery tasks.
pub struct OrderPlacer {
    delivery: Arc<dyn DeliveryService>,
    estimator: Arc<dyn PriceEstimator>,
}

impl OrderPlacer {
    pub fn new(delivery: Arc<dyn DeliveryService>, estimator: Arc<dyn PriceEstimator>) -> Self {
        Self {
            delivery,
            estimator,
        }
    }

    /// Start placing an order. Fails fast, before anything is spawned, when
    /// no store is chosen or the list is empty.
    pub fn place(
        &self,
        store: Option<GroceryStore>,
        entries: Vec<GroceryListEntry>,
    ) -> Result<OrderHandle, OrderError> {
        let store = store.ok_or(OrderError::NoStoreSelected)?;
        if entries.is_empty() {
            return Err(OrderError::EmptyGroceryList);
        }

        let subtotal = estimate_total_cost(&entries, self.estimator.as_ref());
        let total = order_total(subtotal, Some(&store));
        if subtotal < store.min_order {
            warn!(
                store = %store.name,
                %subtotal,
                min_order = %store.min_order,
                "Order is below the store minimum"
            );
        }

        info!(store = %store.name, items = entries.len(), %total, "Placing order");
        let (tx, rx) = watch::channel(OrderStatus::Placing {
            store: store.name.clone(),
        });
        let tx = Arc::new(tx);

        let request = OrderRequest {
            store,
            entries,
            subtotal,
            total,
        };
        let delivery = Arc::clone(&self.delivery);
        let task_tx = Arc::clone(&tx);
        let task = tokio::spawn(async move {
            let outcome = match delivery.submit(&request).await {
                Ok(confirmation) => {
                    info!(order_id = %confirmation.order_id, store = %confirmation.store_name, "Order placed");
                    OrderStatus::Placed { confirmation }
                }
                Err(e) => {
                    warn!(store = %request.store.name, error = %e, "Order failed");
                    OrderStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            finish(&task_tx, outcome);
        });

        Ok(OrderHandle {
            status: rx,
            tx,
            task,
        })
    }
}

/// Move out of `Placing` only; a cancel that already landed wins.
fn finish(tx: &watch::Sender<OrderStatus>, outcome: OrderStatus) -> bool {
    tx.send_if_modified(|status| {
        if status.is_placing() {
            *status = outcome;
            true
        } else {
            false
        }
    })
}

/// Cancellable handle to an in-flight order.
pub struct OrderHandle {
    status: watch::Receiver<OrderStatus>,
    tx: Arc<watch::Sender<OrderStatus>>,
    task: JoinHandle<()>,
}

impl OrderHandle {
    pub fn status(&self) -> OrderStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<OrderStatus> {
        self.status.clone()
    }

    /// Wait until the order reaches a terminal status.
    pub async fn wait(&self) -> OrderStatus {
        let mut rx = self.status.clone();
        let status = match rx.wait_for(OrderStatus::is_terminal).await {
            Ok(status) => status.clone(),
            Err(_) => self.status(),
        };
        status
    }

    /// Abort the delivery task. Returns whether the order was still placing.
    pub fn cancel(&self) -> bool {
        self.task.abort();
        let cancelled = finish(&self.tx, OrderStatus::Cancelled);
        if cancelled {
            info!("Order cancelled");
        }
        cancelled
    }
}

impl Drop for OrderHandle {
    fn drop(&mut self) {
        if !self.status.borrow().is_terminal() {
            self.task.abort();
        }
    }
}

/// Holds the single current order for the grocery page.
#[derive(Default)]
pub struct OrderTracker {
    current: Mutex<Option<OrderHandle>>,
}

impl OrderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new order unless one is still placing.
    pub async fn submit(
        &self,
        placer: &OrderPlacer,
        store: Option<GroceryStore>,
        entries: Vec<GroceryListEntry>,
    ) -> Result<OrderStatus, OrderError> {
        let mut current = self.current.lock().await;
        if current.as_ref().is_some_and(|h| h.status().is_placing()) {
            return Err(OrderError::AlreadyInProgress);
        }
        let handle = placer.place(store, entries)?;
        let status = handle.status();
        *current = Some(handle);
        Ok(status)
    }

    pub async fn status(&self) -> OrderStatus {
        self.current
            .lock()
            .await
            .as_ref()
            .map_or(OrderStatus::Idle, OrderHandle::status)
    }

    /// Cancel the current order. Returns whether anything was cancelled.
    pub async fn cancel(&self) -> bool {
        self.current
            .lock()
            .await
            .as_ref()
            .is_some_and(OrderHandle::cancel)
    }
}
