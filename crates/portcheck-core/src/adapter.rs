//! Adapters — candidates checked against ports
//!
//! The verifier never inspects a candidate's type. It asks one question,
//! [`Adapter::responds_to`], once per required operation.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use serde_json::Value;

use crate::{Error, Result};

/// Capability lookup on a candidate adapter.
pub trait Adapter {
    /// Whether the adapter exposes an invocable operation with this name.
    /// Arity and signature are not considered.
    fn responds_to(&self, operation: &str) -> bool;

    /// Name used in diagnostics
    fn adapter_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<A: Adapter + ?Sized> Adapter for &A {
    fn responds_to(&self, operation: &str) -> bool {
        (**self).responds_to(operation)
    }

    fn adapter_name(&self) -> &str {
        (**self).adapter_name()
    }
}

impl<A: Adapter + ?Sized> Adapter for Box<A> {
    fn responds_to(&self, operation: &str) -> bool {
        (**self).responds_to(operation)
    }

    fn adapter_name(&self) -> &str {
        (**self).adapter_name()
    }
}

impl<A: Adapter + ?Sized> Adapter for Rc<A> {
    fn responds_to(&self, operation: &str) -> bool {
        (**self).responds_to(operation)
    }

    fn adapter_name(&self) -> &str {
        (**self).adapter_name()
    }
}

impl<A: Adapter + ?Sized> Adapter for Arc<A> {
    fn responds_to(&self, operation: &str) -> bool {
        (**self).responds_to(operation)
    }

    fn adapter_name(&self) -> &str {
        (**self).adapter_name()
    }
}

// ── Dynamic adapters ──────────────────────────────────────

type Handler = Box<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// An adapter assembled at runtime from named handlers.
///
/// Used for plugin or scripting adapters whose operations are registered
/// by name rather than through a Rust trait impl.
pub struct DynamicAdapter {
    name: String,
    handlers: BTreeMap<String, Handler>,
}

impl DynamicAdapter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: BTreeMap::new(),
        }
    }

    /// Register (or replace) the handler for `operation`
    pub fn with_operation<F>(mut self, operation: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.handlers.insert(operation.into(), Box::new(handler));
        self
    }

    /// Invoke an exposed operation.
    ///
    /// # Errors
    /// `UnknownOperation` if no handler is registered under `operation`,
    /// otherwise whatever the handler returns.
    pub fn invoke(&self, operation: &str, args: Value) -> Result<Value> {
        let handler = self
            .handlers
            .get(operation)
            .ok_or_else(|| Error::UnknownOperation {
                adapter: self.name.clone(),
                operation: operation.to_string(),
            })?;
        handler(args)
    }

    /// Exposed operation names, sorted
    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

impl Adapter for DynamicAdapter {
    fn responds_to(&self, operation: &str) -> bool {
        self.handlers.contains_key(operation)
    }

    fn adapter_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for DynamicAdapter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DynamicAdapter")
            .field("name", &self.name)
            .field("operations", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ── adapter! macro ────────────────────────────────────────

/// Implement [`Adapter`] for a concrete type by listing the operations it
/// exposes.
///
/// Every listed name must resolve to a method callable as `<Type>::name`
/// at the call site, so the list cannot drift from the type.
///
/// ```
/// use portcheck_core::{adapter, Adapter};
///
/// struct Faker;
///
/// impl Faker {
///     fn list_reservations(&self) -> Vec<String> { Vec::new() }
/// }
///
/// adapter!(Faker => [list_reservations]);
///
/// assert!(Faker.responds_to("list_reservations"));
/// assert!(!Faker.responds_to("find"));
/// ```
#[macro_export]
macro_rules! adapter {
    ($ty:ty => [$($op:ident),* $(,)?]) => {
        impl $crate::Adapter for $ty {
            fn responds_to(&self, operation: &str) -> bool {
                const EXPOSED: &[&str] = &[$(stringify!($op)),*];
                EXPOSED.contains(&operation)
            }
        }

        const _: () = {
            #[allow(dead_code)]
            fn exposes() {
                $( let _ = <$ty>::$op; )*
            }
        };
    };
}
