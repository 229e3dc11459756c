//! Flutter-facing bindings for the Fan Wars core.

pub mod api;
