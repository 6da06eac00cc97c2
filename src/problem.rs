//! Input entities and the validated [`Problem`] aggregate.
//!
//! All inputs are labeled: trucks, depots, customers and products are named,
//! and the parameter maps (stock, demand, distances) are keyed on those
//! names. [`Problem::new`] checks every cross-reference and every sign
//! convention up front, so the formulation stages downstream operate on
//! dense, index-based data and cannot fail.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The type used for quantities (units of product, volume).
pub type Quantity = f64;
/// The type used for distance.
pub type Distance = f64;
/// The type used for cost.
pub type Cost = f64;

pub type TruckIndex = usize;
pub type DepotIndex = usize;
pub type CustomerIndex = usize;
pub type ProductIndex = usize;
/// Index into the combined location sequence: depots first, then customers.
pub type LocationIndex = usize;

/// A delivery vehicle, based at exactly one depot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Truck {
    name: String,
    /// Volume capacity of the truck.
    capacity: Quantity,
    /// Cost per distance unit traveled.
    cost_per_mile: Cost,
    /// Name of the home depot.
    base: String,
}

impl Truck {
    pub fn new(
        name: impl Into<String>,
        capacity: Quantity,
        cost_per_mile: Cost,
        base: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            capacity,
            cost_per_mile,
            base: base.into(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn capacity(&self) -> Quantity {
        self.capacity
    }

    pub fn cost_per_mile(&self) -> Cost {
        self.cost_per_mile
    }

    pub fn base(&self) -> &str {
        self.base.as_str()
    }
}

/// A depot holding on-hand stock per product. A depot is also a location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Depot {
    name: String,
    /// On-hand quantity per product name. Must mention every product.
    stock: HashMap<String, Quantity>,
}

impl Depot {
    pub fn new(name: impl Into<String>, stock: HashMap<String, Quantity>) -> Self {
        Self {
            name: name.into(),
            stock,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn stock(&self) -> &HashMap<String, Quantity> {
        &self.stock
    }
}

/// A customer with a per-product order. A customer is also a location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    name: String,
    /// Ordered quantity per product name. Must mention every product.
    demand: HashMap<String, Quantity>,
}

impl Customer {
    pub fn new(name: impl Into<String>, demand: HashMap<String, Quantity>) -> Self {
        Self {
            name: name.into(),
            demand,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn demand(&self) -> &HashMap<String, Quantity> {
        &self.demand
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    name: String,
    /// Volume of one unit, in the same unit as truck capacity.
    volume: Quantity,
}

impl Product {
    pub fn new(name: impl Into<String>, volume: Quantity) -> Self {
        Self {
            name: name.into(),
            volume,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn volume(&self) -> Quantity {
        self.volume
    }
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("duplicate name `{0}`")]
    DuplicateName(String),
    #[error("truck `{truck}` is based at unknown depot `{depot}`")]
    UnknownBase { truck: String, depot: String },
    #[error("depot `{depot}` lists stock for unknown product `{product}`")]
    UnknownStockProduct { depot: String, product: String },
    #[error("customer `{customer}` orders unknown product `{product}`")]
    UnknownDemandProduct { customer: String, product: String },
    #[error("depot `{depot}` has no stock entry for product `{product}`")]
    MissingStock { depot: String, product: String },
    #[error("customer `{customer}` has no demand entry for product `{product}`")]
    MissingDemand { customer: String, product: String },
    #[error("distance entry references unknown location `{0}`")]
    UnknownLocation(String),
    #[error("no distance entry for `{from}` -> `{to}`")]
    MissingDistance { from: String, to: String },
    #[error("self-distance of `{location}` must be zero, got {value}")]
    NonzeroSelfDistance { location: String, value: f64 },
    #[error("negative {kind} {value} for `{name}`")]
    Negative {
        kind: &'static str,
        name: String,
        value: f64,
    },
    #[error("big-M must be positive and finite, got {0}")]
    InvalidBigM(f64),
}

/// A validated problem instance.
///
/// Locations are indexed with depots first (`0..num_depots()`) followed by
/// customers (`num_depots()..num_locations()`). The distance matrix is dense
/// over that combined sequence; the self-distance diagonal is zero.
#[derive(Debug, Clone)]
pub struct Problem {
    trucks: Vec<Truck>,
    depots: Vec<Depot>,
    customers: Vec<Customer>,
    products: Vec<Product>,
    /// Home-depot index per truck.
    base: Vec<DepotIndex>,
    /// On-hand stock, depot-major.
    availability: Vec<Vec<Quantity>>,
    /// Ordered quantities, customer-major.
    demand: Vec<Vec<Quantity>>,
    /// Dense distance matrix over the combined location sequence.
    distances: Vec<Vec<Distance>>,
    /// The linking constant for the visit constraints.
    big_m: f64,
}

impl Problem {
    pub fn new(
        trucks: Vec<Truck>,
        depots: Vec<Depot>,
        customers: Vec<Customer>,
        products: Vec<Product>,
        distances: HashMap<(String, String), Distance>,
        big_m: f64,
    ) -> Result<Problem, ConfigurationError> {
        if !(big_m.is_finite() && big_m > 0.0) {
            return Err(ConfigurationError::InvalidBigM(big_m));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for name in trucks
            .iter()
            .map(Truck::name)
            .chain(depots.iter().map(Depot::name))
            .chain(customers.iter().map(Customer::name))
        {
            if !seen.insert(name) {
                return Err(ConfigurationError::DuplicateName(name.to_string()));
            }
        }
        let mut product_names: HashSet<&str> = HashSet::new();
        for product in &products {
            if !product_names.insert(product.name()) {
                return Err(ConfigurationError::DuplicateName(
                    product.name().to_string(),
                ));
            }
        }

        for product in &products {
            Self::non_negative("product volume", product.name(), product.volume())?;
        }

        let depot_index: HashMap<&str, DepotIndex> = depots
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name(), i))
            .collect();

        let mut base = Vec::with_capacity(trucks.len());
        for truck in &trucks {
            Self::non_negative("truck capacity", truck.name(), truck.capacity())?;
            Self::non_negative("cost per mile", truck.name(), truck.cost_per_mile())?;
            let depot = depot_index.get(truck.base()).copied().ok_or_else(|| {
                ConfigurationError::UnknownBase {
                    truck: truck.name().to_string(),
                    depot: truck.base().to_string(),
                }
            })?;
            base.push(depot);
        }

        // Stock and demand maps must cover the product set exactly: unknown
        // keys and absent products are both configuration errors.
        let availability = depots
            .iter()
            .map(|depot| {
                for product in depot.stock().keys() {
                    if !product_names.contains(product.as_str()) {
                        return Err(ConfigurationError::UnknownStockProduct {
                            depot: depot.name().to_string(),
                            product: product.clone(),
                        });
                    }
                }
                products
                    .iter()
                    .map(|product| {
                        let quantity = *depot.stock().get(product.name()).ok_or_else(|| {
                            ConfigurationError::MissingStock {
                                depot: depot.name().to_string(),
                                product: product.name().to_string(),
                            }
                        })?;
                        Self::non_negative("stock", depot.name(), quantity)?;
                        Ok(quantity)
                    })
                    .collect()
            })
            .collect::<Result<Vec<Vec<_>>, _>>()?;

        let demand = customers
            .iter()
            .map(|customer| {
                for product in customer.demand().keys() {
                    if !product_names.contains(product.as_str()) {
                        return Err(ConfigurationError::UnknownDemandProduct {
                            customer: customer.name().to_string(),
                            product: product.clone(),
                        });
                    }
                }
                products
                    .iter()
                    .map(|product| {
                        let quantity =
                            *customer.demand().get(product.name()).ok_or_else(|| {
                                ConfigurationError::MissingDemand {
                                    customer: customer.name().to_string(),
                                    product: product.name().to_string(),
                                }
                            })?;
                        Self::non_negative("demand", customer.name(), quantity)?;
                        Ok(quantity)
                    })
                    .collect()
            })
            .collect::<Result<Vec<Vec<_>>, _>>()?;

        let location_names: Vec<&str> = depots
            .iter()
            .map(Depot::name)
            .chain(customers.iter().map(Customer::name))
            .collect();
        let location_set: HashSet<&str> = location_names.iter().copied().collect();

        for (from, to) in distances.keys() {
            for name in [from, to] {
                if !location_set.contains(name.as_str()) {
                    return Err(ConfigurationError::UnknownLocation(name.clone()));
                }
            }
        }

        let mut matrix = vec![vec![0.0; location_names.len()]; location_names.len()];
        for (l1, from) in location_names.iter().enumerate() {
            for (l2, to) in location_names.iter().enumerate() {
                let entry = distances.get(&(from.to_string(), to.to_string())).copied();
                if l1 == l2 {
                    // A missing self-distance defaults to zero; a non-zero one
                    // would let the objective price degenerate self-loops.
                    if let Some(value) = entry {
                        if value != 0.0 {
                            return Err(ConfigurationError::NonzeroSelfDistance {
                                location: from.to_string(),
                                value,
                            });
                        }
                    }
                } else {
                    let value = entry.ok_or_else(|| ConfigurationError::MissingDistance {
                        from: from.to_string(),
                        to: to.to_string(),
                    })?;
                    Self::non_negative("distance", from, value)?;
                    matrix[l1][l2] = value;
                }
            }
        }

        Ok(Problem {
            trucks,
            depots,
            customers,
            products,
            base,
            availability,
            demand,
            distances: matrix,
            big_m,
        })
    }

    fn non_negative(kind: &'static str, name: &str, value: f64) -> Result<(), ConfigurationError> {
        if value < 0.0 || !value.is_finite() {
            return Err(ConfigurationError::Negative {
                kind,
                name: name.to_string(),
                value,
            });
        }
        Ok(())
    }

    pub fn trucks(&self) -> &[Truck] {
        &self.trucks
    }

    pub fn depots(&self) -> &[Depot] {
        &self.depots
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn num_locations(&self) -> usize {
        self.depots.len() + self.customers.len()
    }

    /// The home depot of a truck.
    pub fn base(&self, truck: TruckIndex) -> DepotIndex {
        self.base[truck]
    }

    /// On-hand stock of a product at a depot.
    pub fn availability(&self, depot: DepotIndex, product: ProductIndex) -> Quantity {
        self.availability[depot][product]
    }

    /// Ordered quantity of a product at a customer.
    pub fn demand(&self, customer: CustomerIndex, product: ProductIndex) -> Quantity {
        self.demand[customer][product]
    }

    /// Distance between two locations in the combined sequence.
    pub fn distance(&self, from: LocationIndex, to: LocationIndex) -> Distance {
        self.distances[from][to]
    }

    pub fn big_m(&self) -> f64 {
        self.big_m
    }

    /// The largest single-customer, single-product demand: the tightest
    /// generally safe value for the linking constant.
    pub fn suggested_big_m(&self) -> f64 {
        self.demand.iter().flatten().copied().fold(1.0, f64::max)
    }

    /// Name of a location in the combined sequence.
    pub fn location_name(&self, location: LocationIndex) -> &str {
        if location < self.depots.len() {
            self.depots[location].name()
        } else {
            self.customers[location - self.depots.len()].name()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn quantities(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries
            .iter()
            .map(|(name, qty)| (name.to_string(), *qty))
            .collect()
    }

    fn distances(entries: &[(&str, &str, f64)]) -> HashMap<(String, String), f64> {
        entries
            .iter()
            .map(|(from, to, d)| ((from.to_string(), to.to_string()), *d))
            .collect()
    }

    fn small_instance() -> Result<Problem, ConfigurationError> {
        Problem::new(
            vec![Truck::new("T1", 10.0, 1.0, "D1")],
            vec![Depot::new("D1", quantities(&[("P1", 10.0)]))],
            vec![Customer::new("C1", quantities(&[("P1", 5.0)]))],
            vec![Product::new("P1", 1.0)],
            distances(&[("D1", "C1", 3.0), ("C1", "D1", 3.0)]),
            1000.0,
        )
    }

    #[test]
    fn valid_instance_builds() {
        let problem = small_instance().unwrap();
        assert_eq!(problem.num_locations(), 2);
        assert_eq!(problem.base(0), 0);
        assert_eq!(problem.demand(0, 0), 5.0);
        assert_eq!(problem.availability(0, 0), 10.0);
        assert_eq!(problem.distance(0, 1), 3.0);
        assert_eq!(problem.distance(0, 0), 0.0);
        assert_eq!(problem.suggested_big_m(), 5.0);
    }

    #[test]
    fn unknown_base_is_rejected() {
        let result = Problem::new(
            vec![Truck::new("T1", 10.0, 1.0, "D9")],
            vec![Depot::new("D1", quantities(&[("P1", 10.0)]))],
            vec![],
            vec![Product::new("P1", 1.0)],
            distances(&[]),
            1000.0,
        );
        assert!(matches!(result, Err(ConfigurationError::UnknownBase { .. })));
    }

    #[test]
    fn unknown_product_in_demand_is_rejected() {
        let result = Problem::new(
            vec![],
            vec![Depot::new("D1", quantities(&[("P1", 10.0)]))],
            vec![Customer::new("C1", quantities(&[("P2", 5.0)]))],
            vec![Product::new("P1", 1.0)],
            distances(&[("D1", "C1", 3.0), ("C1", "D1", 3.0)]),
            1000.0,
        );
        assert!(matches!(
            result,
            Err(ConfigurationError::UnknownDemandProduct { .. })
        ));
    }

    #[test]
    fn missing_demand_entry_is_rejected() {
        let result = Problem::new(
            vec![],
            vec![Depot::new("D1", quantities(&[("P1", 10.0), ("P2", 1.0)]))],
            vec![Customer::new("C1", quantities(&[("P1", 5.0)]))],
            vec![Product::new("P1", 1.0), Product::new("P2", 1.0)],
            distances(&[("D1", "C1", 3.0), ("C1", "D1", 3.0)]),
            1000.0,
        );
        assert!(matches!(
            result,
            Err(ConfigurationError::MissingDemand { .. })
        ));
    }

    #[test]
    fn missing_distance_is_rejected() {
        let result = Problem::new(
            vec![],
            vec![Depot::new("D1", quantities(&[("P1", 10.0)]))],
            vec![Customer::new("C1", quantities(&[("P1", 5.0)]))],
            vec![Product::new("P1", 1.0)],
            distances(&[("D1", "C1", 3.0)]),
            1000.0,
        );
        assert!(matches!(
            result,
            Err(ConfigurationError::MissingDistance { .. })
        ));
    }

    #[test]
    fn nonzero_self_distance_is_rejected() {
        let result = Problem::new(
            vec![],
            vec![Depot::new("D1", quantities(&[("P1", 10.0)]))],
            vec![Customer::new("C1", quantities(&[("P1", 5.0)]))],
            vec![Product::new("P1", 1.0)],
            distances(&[("D1", "C1", 3.0), ("C1", "D1", 3.0), ("C1", "C1", 1.0)]),
            1000.0,
        );
        assert!(matches!(
            result,
            Err(ConfigurationError::NonzeroSelfDistance { .. })
        ));
    }

    #[test]
    fn negative_capacity_is_rejected() {
        let result = Problem::new(
            vec![Truck::new("T1", -1.0, 1.0, "D1")],
            vec![Depot::new("D1", quantities(&[("P1", 10.0)]))],
            vec![],
            vec![Product::new("P1", 1.0)],
            distances(&[]),
            1000.0,
        );
        assert!(matches!(result, Err(ConfigurationError::Negative { .. })));
    }

    #[test]
    fn duplicate_location_name_is_rejected() {
        let result = Problem::new(
            vec![],
            vec![Depot::new("X", quantities(&[("P1", 10.0)]))],
            vec![Customer::new("X", quantities(&[("P1", 5.0)]))],
            vec![Product::new("P1", 1.0)],
            distances(&[]),
            1000.0,
        );
        assert!(matches!(result, Err(ConfigurationError::DuplicateName(_))));
    }

    #[test]
    fn invalid_big_m_is_rejected() {
        let result = Problem::new(vec![], vec![], vec![], vec![], distances(&[]), 0.0);
        assert!(matches!(result, Err(ConfigurationError::InvalidBigM(_))));
    }

    #[test]
    fn entities_round_trip_through_json() {
        let truck = Truck::new("T1", 10.0, 1.5, "D1");
        let json = serde_json::to_string(&truck).unwrap();
        let back: Truck = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name(), "T1");
        assert_eq!(back.capacity(), 10.0);
        assert_eq!(back.base(), "D1");
    }
}
