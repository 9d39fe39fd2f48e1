//! End-to-end tests of the background validation flow.

mod helpers;
mod worker_flow_test;
