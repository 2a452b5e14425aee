//! Service Layer
//!
//! Background work that runs off the UI thread and reports back through
//! `AppEvent`s.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  runtime (tokio)          │  host-publisher (std thread)     │
//! │  ┌─────────────────────┐  │  ┌────────────────────────────┐  │
//! │  │ Nt4Client session   │  │  │ HostPublisher (1 s loop)   │  │
//! │  │ + Supervisor        │  │  │                            │  │
//! │  └─────────────────────┘  │  └────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼ AppEvent (flume)
//! ┌─────────────────────────────────────────────────────────────┐
//! │            Workspace event pump -> State entities            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod host_publisher;
pub mod runtime;
pub mod supervisor;
