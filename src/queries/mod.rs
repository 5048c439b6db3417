//! Query modules for the sales dashboard.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection) and returns typed results.

pub mod sales;

pub use sales::{SalesFilter, SalesQuery};
