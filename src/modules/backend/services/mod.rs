pub mod backend_trait;
pub mod http_backend;
pub mod wire_mapper;

pub use backend_trait::{BillingBackend, TransportResult};
pub use http_backend::HttpBillingBackend;
pub use wire_mapper::WireMapper;
