//! Random expense generation for stress tests, benchmarks and demos.

pub mod stress_test;
