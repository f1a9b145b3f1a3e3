//! Per-handle serialization of asynchronous work.
//!
//! Browser-automation pages become unstable when multiple script evaluations
//! run against the same page concurrently, so all probe work targeting one
//! page is funneled through [`ExecQueue`], which runs it strictly one task
//! at a time, in submission order. Work against different pages is not
//! ordered and runs freely in parallel.

mod queue;

pub use queue::ExecQueue;
