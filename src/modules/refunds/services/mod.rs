pub mod refund_planner;
pub mod refund_service;

pub use refund_planner::{RefundPlan, RefundPlanner};
pub use refund_service::RefundService;
