//! # Attack Simulations
//!
//! Adversarial packets injected straight into the receiving chain, skipping
//! any client-side validation an honest origin would perform.

pub mod identity;
