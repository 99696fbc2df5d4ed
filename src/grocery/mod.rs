//! Grocery pipeline: recipe selection, list aggregation, costing and
//! order placement.

pub mod aggregate;
pub mod checklist;
pub mod order;
pub mod pricing;
pub mod routes;
pub mod selection;

pub use aggregate::{GroceryListEntry, compute_grocery_list, group_by_initial};
pub use checklist::Checklist;
pub use order::{
    DeliveryService, OrderConfirmation, OrderHandle, OrderPlacer, OrderRequest, OrderStatus,
    OrderTracker, SimulatedDelivery,
};
pub use pricing::{
    FixedPriceEstimator, PriceEstimator, RandomPriceEstimator, estimate_total_cost, order_total,
};
pub use routes::{GroceryRouteState, grocery_routes};
pub use selection::{SelectedRecipeSet, SelectionManager};
