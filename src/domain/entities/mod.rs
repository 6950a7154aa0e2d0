pub mod column;
pub mod filter;
pub mod product;
pub mod selection;
pub mod sort;
