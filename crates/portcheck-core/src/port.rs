//! Port definitions — the contracts adapters are checked against
//!
//! A port is a named, ordered list of operations. Ports are declared either
//! statically with the [`port!`](crate::port!) macro, which emits a Rust trait
//! and registers its methods as a [`Port`] implementation on `dyn Trait`, or
//! dynamically with [`PortDefinition::define`].
//!
//! # Scoping
//!
//! A port requires exactly the operations it declares itself. Operations of
//! supertraits (or of the ports listed in `extends`) are never part of the
//! required set.

use std::any::TypeId;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Name reserved for the abstract base contract
pub const ABSTRACT_PORT_NAME: &str = "Port";

// ── Static ports ──────────────────────────────────────────

/// An operation registered by a statically declared port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredOperation {
    pub name: &'static str,
    pub arity: usize,
}

impl RequiredOperation {
    pub const fn new(name: &'static str, arity: usize) -> Self {
        Self { name, arity }
    }
}

/// A contract declared at compile time.
///
/// Normally implemented by the [`port!`](crate::port!) macro on the trait
/// object type of the declared trait, so `dyn ReservationPort` is the handle
/// passed to [`verify`](crate::verifier::verify).
pub trait Port: 'static {
    /// Human-readable port name
    const NAME: &'static str;

    /// Operations declared directly by this port, in declaration order
    const OPERATIONS: &'static [RequiredOperation];

    /// Names of the ports this one extends (metadata only)
    const EXTENDS: &'static [&'static str] = &[];
}

/// The abstract base contract.
///
/// Uninhabited and declares no operations. It exists so that "a port" can be
/// named in generic code, but it is never a valid contract: verifying against
/// it fails with [`Error::InvalidDefinition`].
#[derive(Debug)]
pub enum AbstractPort {}

impl Port for AbstractPort {
    const NAME: &'static str = ABSTRACT_PORT_NAME;
    const OPERATIONS: &'static [RequiredOperation] = &[];
}

/// Returns true if `P` is the abstract base contract itself
pub fn is_abstract<P: Port + ?Sized>() -> bool {
    TypeId::of::<P>() == TypeId::of::<AbstractPort>()
}

// ── Runtime definitions ───────────────────────────────────

/// A single operation of a runtime port definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arity: Option<usize>,
}

impl OperationSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arity: None,
        }
    }

    pub fn with_arity(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity: Some(arity),
        }
    }
}

impl From<&str> for OperationSpec {
    fn from(name: &str) -> Self {
        OperationSpec::new(name)
    }
}

impl From<String> for OperationSpec {
    fn from(name: String) -> Self {
        OperationSpec::new(name)
    }
}

impl From<(&str, usize)> for OperationSpec {
    fn from((name, arity): (&str, usize)) -> Self {
        OperationSpec::with_arity(name, arity)
    }
}

impl From<&RequiredOperation> for OperationSpec {
    fn from(op: &RequiredOperation) -> Self {
        OperationSpec::with_arity(op.name, op.arity)
    }
}

impl fmt::Display for OperationSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.arity {
            Some(arity) => write!(f, "{}/{}", self.name, arity),
            None => write!(f, "{}", self.name),
        }
    }
}

/// An immutable port definition handle.
///
/// Built with [`PortDefinition::define`] for ports only known at runtime
/// (configuration, plugin manifests) or with [`PortDefinition::of`] from a
/// static [`Port`]. The only way to obtain the abstract base as a runtime
/// handle is [`PortDefinition::abstract_base`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortDefinition {
    name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    extends: Vec<String>,
    operations: Vec<OperationSpec>,
    #[serde(skip)]
    is_abstract: bool,
}

impl PortDefinition {
    /// Define a port from a name and its required operations.
    ///
    /// # Errors
    /// `InvalidDefinition` if the name is empty or is the reserved abstract
    /// base name, or if any operation name is empty, carries leading or
    /// trailing whitespace, or is duplicated.
    pub fn define<I>(name: impl Into<String>, operations: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<OperationSpec>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidDefinition(
                "port name must not be empty".to_string(),
            ));
        }
        if name == ABSTRACT_PORT_NAME {
            return Err(Error::InvalidDefinition(format!(
                "'{}' is the abstract base contract; define a specialization instead",
                ABSTRACT_PORT_NAME
            )));
        }

        let operations: Vec<OperationSpec> = operations.into_iter().map(Into::into).collect();
        let mut seen = BTreeSet::new();
        for op in &operations {
            if op.name.trim().is_empty() {
                return Err(Error::InvalidDefinition(format!(
                    "port '{}' declares an operation with an empty name",
                    name
                )));
            }
            if op.name.trim() != op.name {
                return Err(Error::InvalidDefinition(format!(
                    "port '{}' declares operation '{}' with surrounding whitespace",
                    name, op.name
                )));
            }
            if !seen.insert(op.name.as_str()) {
                return Err(Error::InvalidDefinition(format!(
                    "port '{}' declares operation '{}' more than once",
                    name, op.name
                )));
            }
        }

        Ok(Self {
            name,
            extends: Vec::new(),
            operations,
            is_abstract: false,
        })
    }

    /// Build the runtime handle of a statically declared port.
    ///
    /// # Errors
    /// `InvalidDefinition` when `P` is [`AbstractPort`].
    pub fn of<P: Port + ?Sized>() -> Result<Self> {
        if is_abstract::<P>() {
            return Err(abstract_base_error());
        }
        Ok(Self::define(P::NAME, P::OPERATIONS)?.extending(P::EXTENDS.iter().copied()))
    }

    /// The runtime sentinel for the abstract base contract
    pub fn abstract_base() -> Self {
        Self {
            name: ABSTRACT_PORT_NAME.to_string(),
            extends: Vec::new(),
            operations: Vec::new(),
            is_abstract: true,
        }
    }

    /// Record the ports this definition extends.
    ///
    /// Parents are metadata: their operations never join the required set.
    pub fn extending<I>(mut self, parents: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.extends = parents
            .into_iter()
            .map(Into::into)
            .filter(|p: &String| !p.trim().is_empty())
            .collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extends(&self) -> &[String] {
        &self.extends
    }

    pub fn operations(&self) -> &[OperationSpec] {
        &self.operations
    }

    /// Required operation names in declaration order
    pub fn required_operations(&self) -> impl Iterator<Item = &str> {
        self.operations.iter().map(|op| op.name.as_str())
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// SHA-256 fingerprint of the required set.
    ///
    /// Computed over `name` followed by each operation name, one per line, in
    /// declaration order. Arity and `extends` are not part of the fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.name.as_bytes());
        for op in &self.operations {
            hasher.update(b"\n");
            hasher.update(op.name.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}

impl fmt::Display for PortDefinition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.extends.is_empty() {
            write!(f, " : {}", self.extends.join(" + "))?;
        }
        write!(f, " [")?;
        for (i, op) in self.operations.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", op)?;
        }
        write!(f, "]")
    }
}

pub(crate) fn abstract_base_error() -> Error {
    Error::InvalidDefinition(format!(
        "verification must target a specialization of {}, not {} itself",
        ABSTRACT_PORT_NAME, ABSTRACT_PORT_NAME
    ))
}

// ── port! macro ───────────────────────────────────────────

/// Declare a port trait and register its operations.
///
/// Emits the trait unchanged and implements [`Port`] for `dyn Trait`,
/// listing the trait's own methods (name and argument count) in declaration
/// order. Supertraits are recorded in `EXTENDS` but their methods are not
/// required.
///
/// Methods take `&self`; the trait must be dyn-compatible.
///
/// ```
/// use portcheck_core::{port, Port};
///
/// port! {
///     pub trait HealthPort {
///         fn health(&self) -> bool;
///     }
/// }
///
/// port! {
///     pub trait ReservationPort: HealthPort {
///         fn list_reservations(&self) -> Vec<String>;
///         fn find(&self, id: u64) -> Option<String>;
///     }
/// }
///
/// assert_eq!(<dyn ReservationPort as Port>::NAME, "ReservationPort");
/// assert_eq!(<dyn ReservationPort as Port>::OPERATIONS.len(), 2);
/// assert_eq!(<dyn ReservationPort as Port>::EXTENDS, &["HealthPort"]);
/// ```
#[macro_export]
macro_rules! port {
    (
        $(#[$meta:meta])*
        $vis:vis trait $name:ident $(: $parent:ident $(+ $more:ident)*)? {
            $(
                $(#[$op_meta:meta])*
                fn $op:ident(&self $(, $arg:ident : $arg_ty:ty)*) $(-> $ret:ty)?;
            )*
        }
    ) => {
        $(#[$meta])*
        $vis trait $name $(: $parent $(+ $more)*)? {
            $(
                $(#[$op_meta])*
                fn $op(&self $(, $arg: $arg_ty)*) $(-> $ret)?;
            )*
        }

        impl $crate::Port for dyn $name {
            const NAME: &'static str = stringify!($name);
            const OPERATIONS: &'static [$crate::RequiredOperation] = &[
                $(
                    $crate::RequiredOperation::new(
                        stringify!($op),
                        $crate::__port_arity!($($arg)*),
                    ),
                )*
            ];
            const EXTENDS: &'static [&'static str] =
                &[$(stringify!($parent) $(, stringify!($more))*)?];
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __port_arity {
    () => { 0usize };
    ($head:ident $($tail:ident)*) => { 1usize + $crate::__port_arity!($($tail)*) };
}
