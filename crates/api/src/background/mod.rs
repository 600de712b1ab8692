//! Background tasks spawned by the server entrypoint.

pub mod hold_expiry;
