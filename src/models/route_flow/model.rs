use derive_more::Constructor;
use itertools::iproduct;
use log::info;

use crate::milp::{Constr, ExprSum, Model, ObjectiveSense, Var};
use crate::models::utils::AddVars;
use crate::problem::{CustomerIndex, LocationIndex, Problem, ProductIndex, TruckIndex};

use super::sets_and_parameters::{Parameters, Sets};
use super::subtour::{DfjEnumeration, SubtourElimination};

/// The two variable families of the formulation, addressable by index tuple.
///
/// After solving, a variable's value sits at `Var::index()` in the solver's
/// assignment vector.
#[derive(Constructor)]
pub struct Variables {
    /// u[h][j][k]: units of product k delivered to customer j by truck h
    u: Vec<Vec<Vec<Var>>>,
    /// x[h][l1][l2]: 1 if truck h travels directly from l1 to l2
    x: Vec<Vec<Vec<Var>>>,
}

impl Variables {
    pub fn delivery(&self, h: TruckIndex, j: CustomerIndex, k: ProductIndex) -> Var {
        self.u[h][j][k]
    }

    pub fn edge(&self, h: TruckIndex, from: LocationIndex, to: LocationIndex) -> Var {
        self.x[h][from][to]
    }
}

pub struct RouteFlowModel {}

#[allow(non_snake_case)]
impl RouteFlowModel {
    /// Build the full MILP over normalized sets and parameters.
    ///
    /// The subtour strategy decides which part of the DFJ family is
    /// materialized here; everything else is generated in full.
    pub fn build(
        sets: &Sets,
        parameters: &Parameters,
        subtour: &dyn SubtourElimination,
    ) -> (Model, Variables) {
        info!("Building route-flow model.");

        let mut model = Model::new("mdvrp");

        //*****************CREATE VARIABLES*****************//
        let trucks = sets.H.len();
        let depots = sets.I.len();
        let customers = sets.J.len();
        let products = sets.K.len();
        let locations = sets.L.len();

        // Units of product k delivered to customer j by truck h. Unbounded
        // above: truck capacity and the linking constraints bound it.
        let u: Vec<Vec<Vec<Var>>> = (trucks, customers, products).integer(&mut model, "u");
        // 1 if truck h travels directly from location l1 to l2
        let x: Vec<Vec<Vec<Var>>> = (trucks, locations, locations).binary(&mut model, "x");

        let vars = Variables::new(u, x);

        //*****************OBJECTIVE*****************//

        // total travel cost over every truck and ordered location pair
        let total_cost = iproduct!(&sets.H, &sets.L, &sets.L)
            .map(|(&h, &l1, &l2)| {
                parameters.cost_per_mile[h] * parameters.distance[l1][l2] * vars.edge(h, l1, l2)
            })
            .total();
        model.set_objective(total_cost, ObjectiveSense::Minimize);

        //*****************ADD CONSTRAINTS*****************//

        for &h in &sets.H {
            // volume loaded on the truck stays within its capacity
            let load = iproduct!(&sets.J, &sets.K)
                .map(|(&j, &k)| parameters.volume[k] * vars.delivery(h, j, k))
                .total();
            model.add_constr(Constr::le(
                format!("capacity_{}", h),
                load,
                parameters.truck_capacity[h],
            ));

            // every location the truck enters it also leaves
            for &l in &sets.L {
                let inbound = sets.L.iter().map(|&l2| vars.edge(h, l2, l)).total();
                let outbound = sets.L.iter().map(|&l2| vars.edge(h, l, l2)).total();
                model.add_constr(Constr::eq(
                    format!("flow_{}_{}", h, l),
                    inbound - outbound,
                    0.0,
                ));
            }

            // a truck only ever departs from its own home depot
            for &i in &sets.I {
                let departures = sets
                    .L
                    .iter()
                    .map(|&l| vars.edge(h, sets.depot_loc(i), l))
                    .total();
                model.add_constr(Constr::le(
                    format!("depot_origin_{}_{}", h, i),
                    departures,
                    parameters.home[h][i],
                ));
            }
        }

        // no circuit confined to a subset of customers
        subtour.attach(sets, &vars, &mut model);

        for &k in &sets.K {
            // no depot ships more of a product than it has on hand; only
            // trucks based at the depot draw on its stock
            for &i in &sets.I {
                let shipped = iproduct!(&sets.H, &sets.J)
                    .map(|(&h, &j)| parameters.home[h][i] * vars.delivery(h, j, k))
                    .total();
                model.add_constr(Constr::le(
                    format!("availability_{}_{}", i, k),
                    shipped,
                    parameters.availability[i][k],
                ));
            }

            for &j in &sets.J {
                // each customer receives exactly what they ordered
                let delivered = sets.H.iter().map(|&h| vars.delivery(h, j, k)).total();
                model.add_constr(Constr::eq(
                    format!("demand_{}_{}", j, k),
                    delivered,
                    parameters.demand[j][k],
                ));

                // a truck delivers nothing to a customer it never visits
                for &h in &sets.H {
                    let visits = sets
                        .L
                        .iter()
                        .map(|&l| vars.edge(h, l, sets.customer_loc(j)))
                        .total();
                    model.add_constr(Constr::le(
                        format!("linking_{}_{}_{}", h, j, k),
                        1.0 * vars.delivery(h, j, k) - parameters.big_m * visits,
                        0.0,
                    ));
                }
            }
        }

        info!(
            "Successfully built route-flow model: {} variables, {} constraints",
            model.num_vars(),
            model.constrs().len()
        );

        (model, vars)
    }

    /// Formulate a problem with the exact (fully enumerated) DFJ baseline.
    pub fn formulate(problem: &Problem) -> (Model, Variables) {
        Self::formulate_with(problem, &DfjEnumeration)
    }

    /// Formulate a problem with a chosen subtour-elimination strategy.
    pub fn formulate_with(
        problem: &Problem,
        subtour: &dyn SubtourElimination,
    ) -> (Model, Variables) {
        let sets = Sets::new(problem);
        let parameters = Parameters::new(problem);
        Self::build(&sets, &parameters, subtour)
    }
}
