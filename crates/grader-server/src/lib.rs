//! Grader HTTP server library (router, handlers, error mapping, startup).

pub mod gateway;
pub mod startup;
