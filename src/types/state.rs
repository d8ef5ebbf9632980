//! Resource states, extension and domination.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::extension::{DeliveryIndex, ExtensionData, N_DELIVERIES};

/// Fixed-size set of completed deliveries, one bit per [`DeliveryIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliverySet(u32);

impl DeliverySet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build a set from a raw bit mask.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bit mask; bit `i` is set when delivery `i` is done.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether the delivery is in the set.
    pub fn contains(self, delivery: DeliveryIndex) -> bool {
        self.0 & (1 << delivery.get()) != 0
    }

    /// Add a delivery. Bits are never cleared.
    pub fn insert(&mut self, delivery: DeliveryIndex) {
        self.0 |= 1 << delivery.get();
    }

    /// Whether every delivery in `other` is also in `self`.
    pub fn is_superset(self, other: DeliverySet) -> bool {
        other.0 & !self.0 == 0
    }

    /// Number of completed deliveries.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether no delivery is done.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate completed deliveries in ascending order.
    pub fn iter(self) -> impl Iterator<Item = DeliveryIndex> {
        (0..N_DELIVERIES)
            .filter(move |i| self.0 & (1 << i) != 0)
            .filter_map(DeliveryIndex::new)
    }
}

impl FromIterator<DeliveryIndex> for DeliverySet {
    fn from_iter<I: IntoIterator<Item = DeliveryIndex>>(iter: I) -> Self {
        let mut set = Self::empty();
        for delivery in iter {
            set.insert(delivery);
        }
        set
    }
}

/// Cumulative resource consumption along a partial path.
///
/// Also known as a "resource container". `time` and `cost` never decrease
/// along a path; `energy` is never negative at a feasible state; delivery
/// bits are only ever set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct State {
    /// Accumulated cost.
    pub cost: i32,
    /// Elapsed time.
    pub time: i32,
    /// Remaining energy.
    pub energy: i32,
    /// Completed deliveries.
    pub delivered: DeliverySet,
}

impl State {
    /// Create a state with no deliveries.
    pub fn new(cost: i32, time: i32, energy: i32) -> Self {
        Self {
            cost,
            time,
            energy,
            delivered: DeliverySet::empty(),
        }
    }

    /// Replace the delivery set.
    pub fn with_delivered(mut self, delivered: DeliverySet) -> Self {
        self.delivered = delivered;
        self
    }

    /// Compare by elapsed time only.
    ///
    /// Time is non-decreasing along every edge, which makes it the sort key
    /// for label lists. This is deliberately not `PartialOrd`: two states
    /// with equal time compare `Equal` here while being different values.
    pub fn cmp_by_time(&self, other: &State) -> Ordering {
        self.time.cmp(&other.time)
    }

    /// Total order on every field, for canonical output ordering.
    pub fn canonical_key(&self) -> (i32, i32, i32, u32) {
        (self.cost, self.time, self.energy, self.delivered.bits())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cost={} time={} energy={} delivered={:#010x}",
            self.cost,
            self.time,
            self.energy,
            self.delivered.bits()
        )
    }
}

/// Extend `old_state` across an edge carrying `extension_data`.
///
/// Returns `None` when the edge's deadline has passed, the energy reserve
/// cannot cover the change, or the edge's delivery is already done.
/// `earliest_time` is not checked.
#[inline]
pub fn extend(old_state: &State, extension_data: &ExtensionData) -> Option<State> {
    if extension_data.latest_time < old_state.time {
        return None;
    }

    if i64::from(old_state.energy) < -i64::from(extension_data.energy_change) {
        return None;
    }

    if let Some(delivery) = extension_data.delivery_index {
        if old_state.delivered.contains(delivery) {
            return None;
        }
    }

    let mut new_state = *old_state;
    new_state.cost += extension_data.cost_change;
    new_state.time += extension_data.time_change;
    new_state.energy += extension_data.energy_change;
    if let Some(delivery) = extension_data.delivery_index {
        new_state.delivered.insert(delivery);
    }

    Some(new_state)
}

/// Whether `lhs` is at least as good as `rhs` on every criterion.
///
/// Reflexive: a state dominates an identical copy of itself.
#[inline]
pub fn is_dominate(lhs: &State, rhs: &State) -> bool {
    lhs.cost <= rhs.cost
        && lhs.time <= rhs.time
        && lhs.energy >= rhs.energy
        && lhs.delivered.is_superset(rhs.delivered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn delivery(i: usize) -> DeliveryIndex {
        DeliveryIndex::new(i).unwrap()
    }

    fn travel(latest_time: i32, energy_change: i32) -> ExtensionData {
        ExtensionData::new(0, 0, latest_time, 4, 2, energy_change)
    }

    #[test]
    fn test_state_equality() {
        let mut s1 = State::new(2, 3, 5);
        s1.delivered.insert(delivery(1));
        let mut s2 = State::new(2, 3, 5);
        s2.delivered.insert(delivery(1));
        assert_eq!(s1, s2);
        s2.delivered.insert(delivery(0));
        assert_ne!(s1, s2);
    }

    #[test]
    fn test_cmp_by_time_ignores_cost() {
        let s1 = State::new(2, 3, 5);
        let s2 = State::new(10, 3, 5);
        assert_eq!(s1.cmp_by_time(&s2), Ordering::Equal);
        assert_eq!(s2.cmp_by_time(&s1), Ordering::Equal);
        assert_ne!(s1, s2);
    }

    #[test]
    fn test_cmp_by_time_greater() {
        let s1 = State::new(2, 5, 5);
        let s2 = State::new(10, 3, 5);
        assert_eq!(s1.cmp_by_time(&s2), Ordering::Greater);
    }

    #[test]
    fn test_delivery_set_operations() {
        let set: DeliverySet = [delivery(0), delivery(3)].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(delivery(3)));
        assert!(!set.contains(delivery(2)));
        assert!(set.is_superset(DeliverySet::from_bits(0b1000)));
        assert!(!set.is_superset(DeliverySet::from_bits(0b0100)));
        assert!(set.is_superset(DeliverySet::empty()));
        assert_eq!(set.iter().map(DeliveryIndex::get).collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn test_extend_applies_deltas() {
        let old = State::new(1, 2, 10);
        let new = extend(&old, &travel(100, -3)).unwrap();
        assert_eq!(new, State::new(5, 4, 7));
    }

    #[test]
    fn test_extend_rejects_late_arrival() {
        let old = State::new(0, 11, 10);
        assert!(extend(&old, &travel(10, 0)).is_none());
        // Arriving exactly at the deadline is allowed.
        assert!(extend(&State::new(0, 10, 10), &travel(10, 0)).is_some());
    }

    #[test]
    fn test_extend_ignores_earliest_time() {
        let mut data = travel(100, 0);
        data.earliest_time = 50;
        assert!(extend(&State::new(0, 0, 0), &data).is_some());
    }

    #[test]
    fn test_extend_rejects_insufficient_energy() {
        assert!(extend(&State::new(0, 0, 2), &travel(100, -3)).is_none());
        let drained = extend(&State::new(0, 0, 3), &travel(100, -3)).unwrap();
        assert_eq!(drained.energy, 0);
    }

    #[test]
    fn test_extend_delivery_at_most_once() {
        let data = ExtensionData::new(0, 0, 100, 0, 0, 0).with_delivery(delivery(4));
        let once = extend(&State::default(), &data).unwrap();
        assert!(once.delivered.contains(delivery(4)));
        assert!(extend(&once, &data).is_none());
    }

    #[test]
    fn test_dominate_reflexive_and_strict() {
        let s = State::new(3, 3, 3);
        assert!(is_dominate(&s, &s));
        let worse = State::new(4, 3, 3);
        assert!(is_dominate(&s, &worse));
        assert!(!is_dominate(&worse, &s));
        let less_energy = State::new(3, 3, 2);
        assert!(is_dominate(&s, &less_energy));
        assert!(!is_dominate(&less_energy, &s));
    }

    #[test]
    fn test_dominate_requires_delivery_superset() {
        let plain = State::new(1, 1, 1);
        let delivered = plain.with_delivered(DeliverySet::from_bits(0b10));
        assert!(is_dominate(&delivered, &plain));
        assert!(!is_dominate(&plain, &delivered));
    }

    fn arb_state() -> impl Strategy<Value = State> {
        (-1000..1000i32, -1000..1000i32, -1000..1000i32, 0u32..16)
            .prop_map(|(c, t, e, bits)| {
                State::new(c, t, e).with_delivered(DeliverySet::from_bits(bits))
            })
    }

    fn arb_extension() -> impl Strategy<Value = ExtensionData> {
        (
            -1000..1000i32,
            -1000..1000i32,
            -1000..1000i32,
            -1000..1000i32,
            proptest::option::of(0..N_DELIVERIES),
        )
            .prop_map(|(latest, cost, time, energy, delivery)| ExtensionData {
                index: 0,
                earliest_time: 0,
                latest_time: latest,
                cost_change: cost,
                time_change: time,
                energy_change: energy,
                delivery_index: delivery.and_then(DeliveryIndex::new),
            })
    }

    proptest! {
        #[test]
        fn prop_extend_feasibility(s in arb_state(), e in arb_extension()) {
            let already_done = e.delivery_index.map_or(false, |d| s.delivered.contains(d));
            let feasible = e.latest_time >= s.time && s.energy >= -e.energy_change && !already_done;
            match extend(&s, &e) {
                Some(n) => {
                    prop_assert!(feasible);
                    prop_assert_eq!(n.cost, s.cost + e.cost_change);
                    prop_assert_eq!(n.time, s.time + e.time_change);
                    prop_assert_eq!(n.energy, s.energy + e.energy_change);
                    prop_assert!(n.delivered.is_superset(s.delivered));
                    if let Some(d) = e.delivery_index {
                        prop_assert!(n.delivered.contains(d));
                    }
                }
                None => prop_assert!(!feasible),
            }
        }

        #[test]
        fn prop_dominate_reflexive(s in arb_state()) {
            prop_assert!(is_dominate(&s, &s));
        }

        #[test]
        fn prop_dominate_transitive(a in arb_state(), b in arb_state(), c in arb_state()) {
            if is_dominate(&a, &b) && is_dominate(&b, &c) {
                prop_assert!(is_dominate(&a, &c));
            }
        }

        #[test]
        fn prop_mutual_domination_is_equality(a in arb_state(), b in arb_state()) {
            if is_dominate(&a, &b) && is_dominate(&b, &a) {
                prop_assert_eq!(a, b);
            }
        }
    }
}
