//! Memory Layer - In-Memory State Management
//!
//! 实现 InFlightPort，管理进行中的合成

mod inflight_registry;

pub use inflight_registry::InFlightRegistry;
