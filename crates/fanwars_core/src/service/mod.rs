//! Use-case services for the presentation layer.
//!
//! # Responsibility
//! - Compose war and comment repositories into screen-level use cases.
//! - Hold the in-memory thread view state a war detail screen works on.
//!
//! # Invariants
//! - Services never bypass repository validation or degrade policy.
//! - Services stay storage-agnostic (generic over `Store`).

pub mod thread;
pub mod war_service;
