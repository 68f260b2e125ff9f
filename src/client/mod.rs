// ABOUTME: Client module - tool execution over the gateway's HTTP API.
// ABOUTME: Splits wire types, outcome classification, transport, and the retry loop.

mod envelope;
mod executor;
mod outcome;
mod transport;

pub use envelope::*;
pub use executor::*;
pub use outcome::*;
pub use transport::*;



#[cfg(test)]
mod executor_test;
