//! Booth-side client of the relay.
//!
//! Drives the capture -> transform -> result flow, talks to the relay over
//! HTTP and saves results to the on-device gallery.

pub mod booth;
pub mod capture;
pub mod client;
pub mod config;
pub mod flow;

pub use booth::{Booth, Notice};
pub use capture::{CaptureError, FileCapture};
pub use client::{ClientError, RelayClient, Transformer};
pub use config::BoothConfig;
pub use flow::{BoothFlow, FlowError, FlowState, Step};
