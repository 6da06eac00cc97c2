//! Formulation of the multi-depot, multi-product vehicle routing problem as
//! a mixed-integer linear program.
//!
//! The crate builds the model; it does not solve it. A [`problem::Problem`]
//! validates the labeled inputs, [`models::RouteFlowModel`] turns it into a
//! [`milp::Model`] plus the [`models::Variables`] handles, and the resulting
//! artifact is handed to whatever external MILP solver the caller uses
//! (in memory, or serialized with [`milp::Model::write_lp`]).
//!
//! ```
//! use std::collections::HashMap;
//! use mdvrp::models::RouteFlowModel;
//! use mdvrp::problem::{Customer, Depot, Problem, Product, Truck};
//!
//! let problem = Problem::new(
//!     vec![Truck::new("T1", 10.0, 1.0, "D1")],
//!     vec![Depot::new("D1", HashMap::from([("P1".to_string(), 10.0)]))],
//!     vec![Customer::new("C1", HashMap::from([("P1".to_string(), 5.0)]))],
//!     vec![Product::new("P1", 1.0)],
//!     HashMap::from([
//!         (("D1".to_string(), "C1".to_string()), 3.0),
//!         (("C1".to_string(), "D1".to_string()), 3.0),
//!     ]),
//!     1000.0,
//! )?;
//!
//! let (model, _vars) = RouteFlowModel::formulate(&problem);
//! assert_eq!(model.num_vars(), 5);
//! # Ok::<(), mdvrp::problem::ConfigurationError>(())
//! ```

pub mod milp;
pub mod models;
pub mod problem;

pub use milp::Model;
pub use models::{RouteFlowModel, Variables};
pub use problem::{ConfigurationError, Customer, Depot, Problem, Product, Truck};
