//! # Repository Module
//!
//! Database access behind a small typed API.
//!
//! ```text
//! Caller
//!    │  db.orders().save(record)
//!    ▼
//! OrderHistoryRepository
//! ├── save(&self, record)
//! ├── list(&self)
//! ├── get_by_id(&self, id)
//! ├── delete(&self, id)
//! └── count(&self)
//!    │  SQL
//!    ▼
//! SQLite (order_history)
//! ```
//!
//! ## Available Repositories
//!
//! - [`order::OrderHistoryRepository`] - Finalized order history

pub mod order;
