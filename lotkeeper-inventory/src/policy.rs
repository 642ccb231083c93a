use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::batch::InventoryBatch;
use crate::error::InventoryError;

pub const STANDARD: &str = "STANDARD";
pub const FIFO: &str = "FIFO";

/// Strategy deciding which batches are usable and in what order they are
/// consumed.
pub trait AllocationPolicy: Send + Sync + std::fmt::Debug {
    /// Policy identifier as stored on the product
    fn id(&self) -> &'static str;

    /// Filter out unusable batches and order the rest for consumption.
    /// The sort must be stable: batches that compare equal keep their
    /// input order, so selection is deterministic across runs.
    fn usable(&self, batches: Vec<InventoryBatch>, today: NaiveDate) -> Vec<InventoryBatch>;

    /// Walk the ordered usable list, accumulating batches until their
    /// combined quantity covers the requirement. The last batch is included
    /// whole even when it overshoots; the caller deducts partially from it.
    /// Never raises insufficiency; an exhausted list simply returns every
    /// batch walked.
    fn select(&self, ordered: &[InventoryBatch], required_quantity: i32) -> Vec<InventoryBatch> {
        let mut selected = Vec::new();
        let mut remaining = required_quantity;

        for batch in ordered {
            if remaining <= 0 {
                break;
            }
            if batch.quantity > 0 {
                selected.push(batch.clone());
                remaining -= batch.quantity;
                debug!(
                    batch_number = %batch.batch_number,
                    quantity = batch.quantity,
                    "selected batch"
                );
            }
        }

        selected
    }
}

/// Consumes soonest-expiring stock first and never touches expired batches.
#[derive(Debug)]
pub struct StandardPolicy;

impl AllocationPolicy for StandardPolicy {
    fn id(&self) -> &'static str {
        STANDARD
    }

    fn usable(&self, batches: Vec<InventoryBatch>, today: NaiveDate) -> Vec<InventoryBatch> {
        debug!(count = batches.len(), "standard: sorting batches by expiry date");

        let mut usable: Vec<InventoryBatch> = batches
            .into_iter()
            .filter(|b| b.is_available(today))
            .collect();

        // None sorts last: a batch with no expiry date is consumed after
        // every dated one.
        usable.sort_by(|a, b| match (a.expiry_date, b.expiry_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        usable
    }
}

/// First in, first out: oldest manufactured stock first, expiry ignored.
#[derive(Debug)]
pub struct FifoPolicy;

impl AllocationPolicy for FifoPolicy {
    fn id(&self) -> &'static str {
        FIFO
    }

    fn usable(&self, batches: Vec<InventoryBatch>, _today: NaiveDate) -> Vec<InventoryBatch> {
        debug!(count = batches.len(), "fifo: sorting batches by manufacturing date");

        let mut usable: Vec<InventoryBatch> = batches
            .into_iter()
            .filter(|b| b.status == lotkeeper_shared::models::BatchStatus::Active && b.quantity > 0)
            .collect();

        usable.sort_by(|a, b| {
            let by_manufacturing = match (a.manufacturing_date, b.manufacturing_date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            };
            by_manufacturing.then(a.created_at.cmp(&b.created_at))
        });

        usable
    }
}

/// Static policy lookup built once at startup. A product row naming an
/// unregistered policy is a configuration defect and fails the request.
pub struct PolicyRegistry {
    policies: HashMap<&'static str, Arc<dyn AllocationPolicy>>,
}

impl PolicyRegistry {
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            policies: HashMap::new(),
        };
        registry.register(Arc::new(StandardPolicy));
        registry.register(Arc::new(FifoPolicy));
        registry
    }

    pub fn register(&mut self, policy: Arc<dyn AllocationPolicy>) {
        self.policies.insert(policy.id(), policy);
    }

    pub fn resolve(&self, policy_id: &str) -> Result<Arc<dyn AllocationPolicy>, InventoryError> {
        self.policies
            .get(policy_id)
            .cloned()
            .ok_or_else(|| InventoryError::UnknownPolicy {
                policy: policy_id.to_string(),
                known: self.known(),
            })
    }

    pub fn known(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.policies.keys().map(|k| k.to_string()).collect();
        ids.sort();
        ids
    }
}
