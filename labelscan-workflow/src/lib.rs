//! # labelscan-workflow
//!
//! The scan-to-print workflow controller: one barcode-to-print cycle from
//! lookup through duplicate confirmation and auto-print countdown to print
//! dispatch.
//!
//! ## Scope
//!
//! This crate owns the workflow semantics only:
//! - `WorkflowMachine` - synchronous state machine, commands in, effects out
//! - `ScanWorkflow` - async driver that executes effects against the
//!   lookup/print collaborators and the timers
//! - `SettingsStore` - injected read-only settings collaborator
//!
//! Transport (HOW lookups and prints reach the server) lives in
//! labelscan-client; rendering lives in the station binary.
//!
//! ## Example
//!
//! ```ignore
//! use labelscan_workflow::{MemorySettings, ScanWorkflow};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! let settings = Arc::new(MemorySettings::new());
//! let shutdown = CancellationToken::new();
//! let (workflow, handle, mut events) =
//!     ScanWorkflow::new(Arc::new(lookup), Arc::new(printer), settings, shutdown.clone());
//! tokio::spawn(workflow.run());
//!
//! handle.lookup("4006381333931").await;
//! while let Some(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! ```

pub mod collab;
pub mod controller;
pub mod machine;
pub mod settings;

// Re-exports
pub use collab::{BarcodeLookup, PrintDispatch, TransportError};
pub use controller::{ScanWorkflow, WorkflowHandle};
pub use machine::{
    ActiveMatch, Effect, LookupOutcome, PrintOutcome, WorkflowEvent, WorkflowMachine,
    WorkflowState,
};
pub use settings::{JsonFileSettings, MemorySettings, SettingsError, SettingsStore, keys};
