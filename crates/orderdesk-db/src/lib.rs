//! # orderdesk-db: Order History Storage
//!
//! Persists finalized orders produced by `orderdesk-core` in SQLite,
//! using sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Order Data Flow                                  │
//! │                                                                         │
//! │  OrderSession::finalize() ──► NewOrderRecord                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   orderdesk-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌─────────────┐ │   │
//! │  │   │   Database    │    │    Repository      │  │ Migrations  │ │   │
//! │  │   │   (pool.rs)   │◄───│  (order.rs)        │  │ (embedded)  │ │   │
//! │  │   │  SqlitePool   │    │  OrderHistoryRepo  │  │ 001_*.sql   │ │   │
//! │  │   └───────────────┘    └────────────────────┘  └─────────────┘ │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (order_history table)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Order history repository
//!
//! ## Usage
//!
//! ```rust,ignore
//! use orderdesk_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("orders.db")).await?;
//!
//! let record = session.finalize()?;
//! let saved = db.orders().save(record).await?;
//! let recent = db.orders().list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::order::OrderHistoryRepository;
