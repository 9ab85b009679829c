//! Database repository layer

pub mod category_repo;
pub mod product_repo;
pub mod quote_repo;
pub mod user_repo;

pub use category_repo::*;
pub use product_repo::*;
pub use quote_repo::*;
pub use user_repo::*;
