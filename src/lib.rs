//! # order-split
//!
//! Minimum-cost fulfillment of multi-item orders across vendors whose
//! inventories only partly overlap.
//!
//! Shipping is charged once per vendor used, not per item, so the cost of a
//! split cannot be computed item by item. The optimizer prices every subset
//! of the order against every vendor able to supply all of it, enumerates
//! every way of partitioning the order into such subsets, and keeps the
//! cheapest partition. A per-drug ranking grid shows how many items would
//! have to share a vendor's shipping before that vendor wins a drug.
//!
//! The number of partitions grows with the Bell numbers of the item count,
//! so orders are capped by [`Config::max_order_items`].

pub mod assignment;
pub mod config;
pub mod distance;
pub mod error;
pub mod options;
pub mod order;
pub mod partition;
pub mod ranking;
pub mod selector;
pub mod shipping;
pub mod subset;
pub mod utils;
pub mod vendor;

use crate::assignment::Assignment;
use crate::config::Config;
use crate::distance::DistanceService;
use crate::error::OrderError;
use crate::options::OrderOptions;
use crate::order::Order;
use crate::partition::{Partition, PartitionSearch};
use crate::ranking::VendorRankingGrid;
use crate::selector::select_best;
use crate::shipping::ShippingResolver;
use crate::subset::OrderCatalog;
use crate::utils::SearchStatistics;
use crate::vendor::Vendor;

use log::info;
use std::sync::Arc;
use std::time::Instant;

/// Everything produced while assigning one order.
#[derive(Debug, Clone)]
pub struct FulfillmentPlan {
    pub assignment: Assignment,
    /// The winning partition, if any partition was accepted
    pub partition: Option<Partition>,
    pub ranking: VendorRankingGrid,
    pub statistics: SearchStatistics,
}

/// Splits orders across vendors at minimum total cost.
pub struct FulfillmentOptimizer {
    config: Config,
    shipping: ShippingResolver,
}

impl FulfillmentOptimizer {
    /// Create an optimizer pricing shipping through `distance`.
    pub fn new(config: Config, distance: Arc<dyn DistanceService>) -> Self {
        let shipping = ShippingResolver::new(&config, distance);
        FulfillmentOptimizer { config, shipping }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn shipping(&self) -> &ShippingResolver {
        &self.shipping
    }

    /// Assign an order to vendors.
    ///
    /// Only malformed orders are errors. Items nobody stocks come back as
    /// unsourced entries of the assignment.
    pub async fn assign(&self, order: &Order, vendors: &[Vendor]) -> Result<Assignment, OrderError> {
        Ok(self.plan(order, vendors).await?.assignment)
    }

    /// Assign an order and keep the ranking grid and search statistics.
    pub async fn plan(&self, order: &Order, vendors: &[Vendor]) -> Result<FulfillmentPlan, OrderError> {
        order.validate(self.config.item_limit())?;
        let start_time = Instant::now();

        let catalog = OrderCatalog::new(order);

        // Vendors stocking none of the order can never appear in a split.
        let relevant: Vec<&Vendor> = vendors
            .iter()
            .filter(|vendor| {
                catalog
                    .items()
                    .iter()
                    .any(|item| vendor.is_drug_in_stock(&item.drug))
            })
            .collect();
        let quotes = self
            .shipping
            .quote_vendors(&relevant, &order.destination)
            .await;

        let options = OrderOptions::build(catalog, &relevant, &quotes);

        let mut ranking = VendorRankingGrid::from_options(&options);
        ranking.rank(options.catalog().len());

        let search = PartitionSearch::for_options(&options, self.config.prune_unsourceable);
        let candidate_subsets = search.candidate_count();
        let selection = select_best(search, &options);

        let statistics = SearchStatistics {
            items: options.catalog().len(),
            vendors_quoted: quotes.len(),
            fallback_quotes: quotes.iter().filter(|quote| quote.is_fallback()).count(),
            subsets: options.subset_count(),
            candidate_subsets,
            partitions_evaluated: selection.partitions_evaluated,
            partitions_rejected: selection.partitions_rejected,
            runtime: start_time.elapsed(),
        };

        info!(
            "order {}: {:.2} across {} vendor(s), {} unsourced, {} partitions in {:?}",
            order.order_number,
            selection.assignment.grand_total,
            selection.assignment.vendor_count(),
            selection.assignment.unsourced().count(),
            statistics.partitions_evaluated,
            statistics.runtime
        );

        Ok(FulfillmentPlan {
            assignment: selection.assignment,
            partition: selection.partition,
            ranking,
            statistics,
        })
    }
}
