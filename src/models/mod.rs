pub mod route_flow;
pub mod utils;

pub use route_flow::model::{RouteFlowModel, Variables};
