//! Test suites for the uaport gateway.

pub(crate) mod support;
