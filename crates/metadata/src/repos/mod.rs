//! Repository traits for catalog operations.

pub mod products;
pub mod reviews;

pub use products::ProductRepo;
pub use reviews::ReviewRepo;
