//! Frozen JSON contract checks for the phishlens wire format.
//!
//! Schemas and fixtures live in the workspace `contracts/` directory; the
//! checks themselves are integration tests.
