//! Kernel services.
//!
//! External collaborators consumed through narrow interfaces:
//! geocoding and bearer-token signing.

pub mod geocoder;
pub mod token;
