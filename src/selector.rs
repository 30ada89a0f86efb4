//! Selection of the cheapest complete partition.

use crate::assignment::{Assignment, OrderCombo};
use crate::options::OrderOptions;
use crate::partition::Partition;
use crate::subset::SubsetKey;
use crate::utils::round_cents;
use log::{debug, warn};

/// Outcome of evaluating a stream of partitions.
#[derive(Debug, Clone)]
pub struct Selection {
    pub assignment: Assignment,
    /// The winning partition, `None` if no partition could be accepted
    pub partition: Option<Partition>,
    pub partitions_evaluated: usize,
    /// Partitions whose offers did not account for every order line
    pub partitions_rejected: usize,
}

/// Price one partition with the cheapest offer for each member subset.
///
/// Returns `None` if the offers do not account for every item of the order,
/// which happens when a multi-item subset resolves to the unsourceable
/// placeholder.
pub fn evaluate_partition(partition: &Partition, options: &OrderOptions) -> Option<Assignment> {
    let catalog = options.catalog();
    let orders: Vec<OrderCombo> = partition
        .subsets
        .iter()
        .map(|&key| options.best(key).clone())
        .collect();

    let item_count: usize = orders.iter().map(OrderCombo::item_count).sum();
    if item_count != catalog.len() {
        return None;
    }

    let grand_total = round_cents(orders.iter().map(|combo| combo.total).sum());
    Some(Assignment {
        order_number: catalog.order_number(),
        grand_total,
        orders,
    })
}

/// Pick the cheapest acceptable partition. Ties go to the first one seen.
///
/// If nothing is acceptable the assignment lists every item as
/// unsourceable with a grand total of zero.
pub fn select_best<I>(partitions: I, options: &OrderOptions) -> Selection
where
    I: IntoIterator<Item = Partition>,
{
    let mut best: Option<(Assignment, Partition)> = None;
    let mut evaluated = 0;
    let mut rejected = 0;

    for partition in partitions {
        evaluated += 1;
        let Some(candidate) = evaluate_partition(&partition, options) else {
            rejected += 1;
            continue;
        };

        let improves = best
            .as_ref()
            .map_or(true, |(current, _)| candidate.grand_total < current.grand_total);
        if improves {
            debug!(
                "new best partition at {:.2}: {:?}",
                candidate.grand_total,
                partition
                    .subsets
                    .iter()
                    .map(|&key| options.catalog().label(key))
                    .collect::<Vec<_>>()
            );
            best = Some((candidate, partition));
        }
    }

    match best {
        Some((assignment, partition)) => Selection {
            assignment,
            partition: Some(partition),
            partitions_evaluated: evaluated,
            partitions_rejected: rejected,
        },
        None => {
            warn!(
                "no complete partition for order {}; reporting every item as unsourced",
                options.catalog().order_number()
            );
            Selection {
                assignment: unsourced_assignment(options),
                partition: None,
                partitions_evaluated: evaluated,
                partitions_rejected: rejected,
            }
        }
    }
}

/// Assignment reporting total fulfillment failure.
pub fn unsourced_assignment(options: &OrderOptions) -> Assignment {
    let catalog = options.catalog();
    let orders = (0..catalog.len())
        .map(|index| {
            let key = SubsetKey::singleton(index);
            OrderCombo::unsourceable(key, catalog.label(key), catalog.order_number())
        })
        .collect();

    Assignment {
        order_number: catalog.order_number(),
        grand_total: 0.0,
        orders,
    }
}
