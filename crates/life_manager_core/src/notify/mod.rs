//! In-process notification fan-out.
//!
//! # Responsibility
//! - Deliver events synchronously to attached subscribers.
//! - Keep an ordered history of published events for late readers.
//!
//! # Invariants
//! - A subscriber is attached at most once (pointer identity).
//! - Delivery order equals attachment order.

mod hub;

pub use hub::{NotificationCenter, NotificationHub, Subscriber};
