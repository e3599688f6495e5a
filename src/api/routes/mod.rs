//! API Routes
//!
//! Route handlers organized by functionality.

pub mod crypto;
pub mod fx;
pub mod health;
pub mod watchlist;
