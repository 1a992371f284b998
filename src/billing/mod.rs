pub mod grant;
pub mod plan;
pub mod tier;

pub use tier::{Entitlement, Tier};
