use crate::problem::{
    CustomerIndex, DepotIndex, LocationIndex, Problem, ProductIndex, TruckIndex,
};

use itertools::iproduct;

/// Index sets of the formulation, derived from a validated [`Problem`].
#[derive(Debug)]
#[allow(non_snake_case)]
pub struct Sets {
    /// Set of trucks
    pub H: Vec<TruckIndex>,
    /// Set of depots
    pub I: Vec<DepotIndex>,
    /// Set of customers
    pub J: Vec<CustomerIndex>,
    /// Set of products
    pub K: Vec<ProductIndex>,
    /// Combined location sequence: depots first, then customers
    pub L: Vec<LocationIndex>,
}

#[allow(non_snake_case)]
impl Sets {
    pub fn new(problem: &Problem) -> Sets {
        let H = (0..problem.trucks().len()).collect();
        let I = (0..problem.depots().len()).collect();
        let J = (0..problem.customers().len()).collect();
        let K = (0..problem.products().len()).collect();
        let L = (0..problem.num_locations()).collect();

        Sets { H, I, J, K, L }
    }

    /// Location index of a depot.
    pub fn depot_loc(&self, depot: DepotIndex) -> LocationIndex {
        depot
    }

    /// Location index of a customer.
    pub fn customer_loc(&self, customer: CustomerIndex) -> LocationIndex {
        self.I.len() + customer
    }
}

/// Dense parameters of the formulation.
pub struct Parameters {
    /// On-hand stock of each product at each depot
    pub availability: Vec<Vec<f64>>,
    /// Unit volume per product
    pub volume: Vec<f64>,
    /// Volume capacity per truck
    pub truck_capacity: Vec<f64>,
    /// Ordered quantity of each product at each customer
    pub demand: Vec<Vec<f64>>,
    /// Cost per distance unit per truck
    pub cost_per_mile: Vec<f64>,
    /// Distance between each ordered pair of locations
    pub distance: Vec<Vec<f64>>,
    /// Home-depot indicator: 1.0 iff the truck is based at the depot
    pub home: Vec<Vec<f64>>,
    /// The linking constant for the visit constraints
    pub big_m: f64,
}

impl Parameters {
    pub fn new(problem: &Problem) -> Parameters {
        let availability = (0..problem.depots().len())
            .map(|i| {
                (0..problem.products().len())
                    .map(|k| problem.availability(i, k))
                    .collect()
            })
            .collect();
        let volume = problem.products().iter().map(|p| p.volume()).collect();
        let truck_capacity = problem.trucks().iter().map(|h| h.capacity()).collect();
        let demand = (0..problem.customers().len())
            .map(|j| {
                (0..problem.products().len())
                    .map(|k| problem.demand(j, k))
                    .collect()
            })
            .collect();
        let cost_per_mile = problem.trucks().iter().map(|h| h.cost_per_mile()).collect();
        let distance = (0..problem.num_locations())
            .map(|l1| {
                (0..problem.num_locations())
                    .map(|l2| problem.distance(l1, l2))
                    .collect()
            })
            .collect();
        let mut home = vec![vec![0.0; problem.depots().len()]; problem.trucks().len()];
        for (h, i) in iproduct!(0..problem.trucks().len(), 0..problem.depots().len()) {
            if problem.base(h) == i {
                home[h][i] = 1.0;
            }
        }

        Parameters {
            availability,
            volume,
            truck_capacity,
            demand,
            cost_per_mile,
            distance,
            home,
            big_m: problem.big_m(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Customer, Depot, Product, Truck};
    use std::collections::HashMap;

    fn two_depot_problem() -> Problem {
        let p1 = HashMap::from([("P1".to_string(), 4.0)]);
        let mut distances = HashMap::new();
        for from in ["D1", "D2", "C1"] {
            for to in ["D1", "D2", "C1"] {
                if from != to {
                    distances.insert((from.to_string(), to.to_string()), 1.0);
                }
            }
        }
        Problem::new(
            vec![
                Truck::new("T1", 10.0, 1.0, "D2"),
                Truck::new("T2", 10.0, 1.0, "D1"),
            ],
            vec![
                Depot::new("D1", p1.clone()),
                Depot::new("D2", p1.clone()),
            ],
            vec![Customer::new("C1", p1)],
            vec![Product::new("P1", 1.0)],
            distances,
            100.0,
        )
        .unwrap()
    }

    #[test]
    fn locations_are_depots_then_customers() {
        let problem = two_depot_problem();
        let sets = Sets::new(&problem);
        assert_eq!(sets.L.len(), 3);
        assert_eq!(sets.depot_loc(1), 1);
        assert_eq!(sets.customer_loc(0), 2);
        assert_eq!(problem.location_name(sets.customer_loc(0)), "C1");
    }

    #[test]
    fn home_indicator_selects_exactly_one_depot() {
        let problem = two_depot_problem();
        let parameters = Parameters::new(&problem);
        assert_eq!(parameters.home[0], vec![0.0, 1.0]);
        assert_eq!(parameters.home[1], vec![1.0, 0.0]);
        for row in &parameters.home {
            assert_eq!(row.iter().sum::<f64>(), 1.0);
        }
    }
}
