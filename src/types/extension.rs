//! Edge payloads: the data an extension applies to a resource state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of the delivery universe. A state tracks one bit per delivery.
pub const N_DELIVERIES: usize = 32;

/// Index of a delivery obligation, always `< N_DELIVERIES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DeliveryIndex(u8);

impl DeliveryIndex {
    /// Create a delivery index, or `None` when out of the universe.
    pub fn new(index: usize) -> Option<Self> {
        if index < N_DELIVERIES {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Get the raw index.
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for DeliveryIndex {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value as usize)
            .ok_or_else(|| format!("delivery index {} out of range 0..{}", value, N_DELIVERIES))
    }
}

impl From<DeliveryIndex> for u8 {
    fn from(index: DeliveryIndex) -> Self {
        index.0
    }
}

impl fmt::Display for DeliveryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Data carried by an edge.
///
/// `earliest_time` is stored but not enforced by [`extend`](crate::extend);
/// only `latest_time` gates feasibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ExtensionData {
    /// Identifier of the extension. Generated instances use the global edge index.
    pub index: usize,
    /// Start of the time window.
    pub earliest_time: i32,
    /// End of the time window; a state later than this cannot traverse the edge.
    pub latest_time: i32,
    /// Cost added on traversal.
    pub cost_change: i32,
    /// Time added on traversal.
    pub time_change: i32,
    /// Energy added on traversal (negative when consumed).
    pub energy_change: i32,
    /// Delivery satisfied by this edge, if any.
    pub delivery_index: Option<DeliveryIndex>,
}

impl ExtensionData {
    /// Create a non-delivery extension.
    pub fn new(
        index: usize,
        earliest_time: i32,
        latest_time: i32,
        cost_change: i32,
        time_change: i32,
        energy_change: i32,
    ) -> Self {
        Self {
            index,
            earliest_time,
            latest_time,
            cost_change,
            time_change,
            energy_change,
            delivery_index: None,
        }
    }

    /// Mark this extension as satisfying a delivery.
    pub fn with_delivery(mut self, delivery: DeliveryIndex) -> Self {
        self.delivery_index = Some(delivery);
        self
    }

    /// Whether traversing this edge satisfies a delivery.
    pub fn is_delivery(&self) -> bool {
        self.delivery_index.is_some()
    }
}

impl fmt::Display for ExtensionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},tw:[{},{}],cost:{}\\nduration:{},energy:{}",
            self.index,
            self.earliest_time,
            self.latest_time,
            self.cost_change,
            self.time_change,
            self.energy_change
        )?;
        if let Some(delivery) = self.delivery_index {
            write!(f, "\\ndelivery:{}", delivery)?;
        }
        Ok(())
    }
}
