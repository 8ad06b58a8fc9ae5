//! Contract verifier — checks that an adapter exposes every operation a port requires
//!
//! The verifier walks the port's required operations in declaration order and
//! asks the adapter whether it responds to each one. It accumulates every
//! missing operation rather than stopping at the first, so a single call gives
//! the complete picture.
//!
//! Missing operations are a normal result. The only error is verifying
//! against the abstract base contract, which is a programming mistake and
//! is returned without a partial result.

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::adapter::Adapter;
use crate::port::{abstract_base_error, is_abstract, Port, PortDefinition};
use crate::{Error, Result};

// ── Verification Result ───────────────────────────────────

/// Outcome of verifying one adapter against one port
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    port: String,
    implemented: bool,
    missing_operations: Vec<String>,
}

impl VerificationResult {
    fn from_missing(port: &str, missing_operations: Vec<String>) -> Self {
        Self {
            port: port.to_string(),
            implemented: missing_operations.is_empty(),
            missing_operations,
        }
    }

    /// Name of the port that was checked
    pub fn port(&self) -> &str {
        &self.port
    }

    /// True iff no required operation is missing
    pub fn is_implemented(&self) -> bool {
        self.implemented
    }

    /// Missing operations, in the port's declaration order
    pub fn missing_operations(&self) -> &[String] {
        &self.missing_operations
    }

    /// Convert a failed result into [`Error::NotImplemented`]
    pub fn into_result(self) -> Result<()> {
        if self.implemented {
            Ok(())
        } else {
            Err(Error::NotImplemented {
                port: self.port,
                missing: self.missing_operations,
            })
        }
    }
}

impl std::fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.implemented {
            write!(f, "{}: implemented", self.port)
        } else {
            write!(
                f,
                "{}: missing {}",
                self.port,
                self.missing_operations.join(", ")
            )
        }
    }
}

// ── Public API ────────────────────────────────────────────

/// Verify an adapter against a statically declared port.
///
/// ```
/// use portcheck_core::{adapter, port, verify};
///
/// port! {
///     trait MyPort {
///         fn foo(&self);
///         fn bar(&self);
///     }
/// }
///
/// struct IncompleteAdapter;
/// impl IncompleteAdapter {
///     fn foo(&self) {}
/// }
/// adapter!(IncompleteAdapter => [foo]);
///
/// let result = verify::<dyn MyPort, _>(&IncompleteAdapter).unwrap();
/// assert!(!result.is_implemented());
/// assert_eq!(result.missing_operations(), &["bar".to_string()]);
/// ```
///
/// # Errors
/// `InvalidDefinition` when `P` is [`AbstractPort`](crate::AbstractPort).
pub fn verify<P, A>(candidate: &A) -> Result<VerificationResult>
where
    P: Port + ?Sized,
    A: Adapter + ?Sized,
{
    if is_abstract::<P>() {
        warn!(adapter = candidate.adapter_name(), "verification against abstract base port");
        return Err(abstract_base_error());
    }
    Ok(check(
        P::NAME,
        P::OPERATIONS.iter().map(|op| op.name),
        candidate,
    ))
}

/// Verify an adapter against a runtime port definition.
///
/// # Errors
/// `InvalidDefinition` when `definition` is [`PortDefinition::abstract_base`].
pub fn verify_definition<A>(
    definition: &PortDefinition,
    candidate: &A,
) -> Result<VerificationResult>
where
    A: Adapter + ?Sized,
{
    if definition.is_abstract() {
        warn!(adapter = candidate.adapter_name(), "verification against abstract base port");
        return Err(abstract_base_error());
    }
    Ok(check(
        definition.name(),
        definition.required_operations(),
        candidate,
    ))
}

/// Startup form of [`verify`]: fails with `NotImplemented` when operations are missing.
pub fn ensure_implemented<P, A>(candidate: &A) -> Result<()>
where
    P: Port + ?Sized,
    A: Adapter + ?Sized,
{
    verify::<P, A>(candidate)?.into_result()
}

/// Object-safe verification seam, for code that holds ports chosen at runtime.
pub trait Verifier {
    fn port_name(&self) -> &str;

    fn verify(&self, candidate: &dyn Adapter) -> Result<VerificationResult>;
}

impl Verifier for PortDefinition {
    fn port_name(&self) -> &str {
        self.name()
    }

    fn verify(&self, candidate: &dyn Adapter) -> Result<VerificationResult> {
        verify_definition(self, candidate)
    }
}

/// Verify one adapter against several ports, stopping at the first invalid definition
pub fn verify_all<'a, I, A>(ports: I, candidate: &A) -> Result<Vec<VerificationResult>>
where
    I: IntoIterator<Item = &'a dyn Verifier>,
    A: Adapter,
{
    ports
        .into_iter()
        .map(|port| port.verify(candidate))
        .collect()
}

// ── Internals ─────────────────────────────────────────────

fn check<'a, A>(
    port: &str,
    required: impl Iterator<Item = &'a str>,
    candidate: &A,
) -> VerificationResult
where
    A: Adapter + ?Sized,
{
    let missing: Vec<String> = required
        .filter(|op| {
            let exposed = candidate.responds_to(op);
            if !exposed {
                trace!(port, operation = *op, "operation missing");
            }
            !exposed
        })
        .map(str::to_string)
        .collect();

    debug!(
        port,
        adapter = candidate.adapter_name(),
        missing = missing.len(),
        "verified adapter"
    );
    VerificationResult::from_missing(port, missing)
}
