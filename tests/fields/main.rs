//! List Field Tests
//!
//! Integration tests for the fieldtrail-fields crate:
//! - Whole-field assignment and the element transform
//! - Validation of length bounds and per-element descriptors
//! - In-place modification through the mutation handles
//! - History ledgers, including the sub-list cascade
//! - The frozen gate
//! - Property tests for ledger growth and per-call atomicity


mod assignment;
mod history;
mod modification;
