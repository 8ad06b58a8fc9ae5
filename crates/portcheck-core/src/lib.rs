//! Portcheck Core - port/adapter contract verification
//!
//! A *port* is a named list of operations an adapter must provide. An
//! *adapter* is any value that can answer "do you respond to this
//! operation?". The verifier compares the two and reports exactly which
//! operations are missing, in the order the port declares them.
//!
//! # Architecture
//!
//! ```text
//! port! { trait X }  ──┐
//!                      ├─→ Port / PortDefinition ─→ Verifier ─→ VerificationResult
//! JSON manifest ───────┘                              ↑
//!                          Adapter (adapter!, DynamicAdapter, AdapterManifest)
//! ```
//!
//! When an adapter's type statically implements the port trait the compiler
//! already guarantees conformance. The verifier is for adapters whose
//! surface is only known at runtime: plugins, scripted adapters, adapters
//! described by configuration.
//!
//! # Guarantees
//!
//! - **Deterministic**: same port and adapter always produce an equal result
//! - **Ordered**: missing operations follow declaration order
//! - **Scoped**: a port requires only what it declares, never inherited operations
//! - **Strict**: the abstract base [`AbstractPort`] is never a valid contract

pub mod adapter;
pub mod error;
pub mod manifest;
pub mod port;
pub mod verifier;

/// Version of the portcheck-core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use adapter::{Adapter, DynamicAdapter};
pub use error::{Error, Result};
pub use manifest::{port_from_json, AdapterManifest, PortManifest};
pub use port::{
    is_abstract, AbstractPort, OperationSpec, Port, PortDefinition, RequiredOperation,
    ABSTRACT_PORT_NAME,
};
pub use verifier::{
    ensure_implemented, verify, verify_all, verify_definition, VerificationResult, Verifier,
};

#[cfg(test)]
mod tests {
    use super::*;

    crate::port! {
        trait HealthPort {
            fn health(&self) -> bool;
        }
    }

    crate::port! {
        trait ReservationPort: HealthPort {
            fn list_reservations(&self) -> Vec<String>;
            fn find(&self, id: u64) -> Option<String>;
        }
    }

    struct InMemory;

    impl HealthPort for InMemory {
        fn health(&self) -> bool {
            true
        }
    }

    impl ReservationPort for InMemory {
        fn list_reservations(&self) -> Vec<String> {
            vec!["r-1".into()]
        }

        fn find(&self, id: u64) -> Option<String> {
            (id == 1).then(|| "r-1".into())
        }
    }

    crate::adapter!(InMemory => [health, list_reservations, find]);

    #[test]
    fn test_trait_implementor_passes_its_own_port() {
        let result = verify::<dyn ReservationPort, _>(&InMemory).unwrap();
        assert!(result.is_implemented());
        assert_eq!(InMemory.find(1).as_deref(), Some("r-1"));
    }

    #[test]
    fn test_manifest_adapter_missing_supertrait_operation_still_passes() {
        let adapter = AdapterManifest::new("no-health", ["list_reservations", "find"]);
        assert!(verify::<dyn ReservationPort, _>(&adapter)
            .unwrap()
            .is_implemented());
        assert!(!verify::<dyn HealthPort, _>(&adapter).unwrap().is_implemented());
    }

    #[test]
    fn test_version_is_core_package_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_determinism_100_iterations() {
        let def = PortDefinition::of::<dyn ReservationPort>().unwrap();
        let adapter = AdapterManifest::new("partial", ["find"]);
        let first = verify_definition(&def, &adapter).unwrap();
        for i in 0..100 {
            let result = verify_definition(&def, &adapter).unwrap();
            assert_eq!(first, result, "Non-determinism at iteration {}", i);
        }
    }
}
