//! # disco-model
//!
//! Data model shared between the discovery service and its tests.
//!
//! Two halves:
//! - **Wire types** (`Task`, `Container`, `NetworkInterface`): what the
//!   orchestration API returns from a describe call. Every scalar attribute
//!   is optional; the API omits fields freely depending on launch type and
//!   task state.
//! - **Output types** (`ConfigItem`, `TargetLabels`): what gets published to
//!   the Prometheus file_sd discovery file. The label key set is fixed and
//!   part of the published format, so it is a struct rather than a map.

mod target;
mod task;

pub use target::{ConfigItem, TargetLabels};
pub use task::{Container, NetworkInterface, Task};
