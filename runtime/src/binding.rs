//! Live bindings from operation names to callables.
//!
//! The schema only knows names, argument names and docs. The binding table
//! is the other half: for each exposed operation, the declared parameter
//! kinds and a closure that performs the call.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use type2cli_core::OperationKind;

use crate::context::InvocationContext;
use crate::convert::{ArgValue, ParamSpec};
use crate::error::ExecError;
use crate::returns::Returns;

type InstanceFn<T> = dyn Fn(&mut T, CallArgs) -> Result<Returns, ExecError> + Send + Sync;
type ConstructorFn = dyn Fn(CallArgs) -> Result<Returns, ExecError> + Send + Sync;

/// The callable half of a binding.
pub enum Callable<T> {
    /// Invoked on a hydrated receiver.
    Instance(Arc<InstanceFn<T>>),
    /// Invoked without a receiver; produces a new value.
    Constructor(Arc<ConstructorFn>),
}

impl<T> Clone for Callable<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Instance(f) => Self::Instance(Arc::clone(f)),
            Self::Constructor(f) => Self::Constructor(Arc::clone(f)),
        }
    }
}

/// One operation's live binding.
///
/// # Examples
///
/// ```
/// use type2cli::{Binding, ParamSpec, Returns};
///
/// #[derive(Default)]
/// struct Counter { n: i64 }
///
/// let add = Binding::instance([ParamSpec::integer()], |c: &mut Counter, args| {
///     c.n += args.integer(0)?;
///     Ok(Returns::nothing())
/// });
/// assert_eq!(add.arity(), 1);
/// ```
pub struct Binding<T> {
    params: Vec<ParamSpec>,
    takes_context: bool,
    variadic: bool,
    callable: Callable<T>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            takes_context: self.takes_context,
            variadic: self.variadic,
            callable: self.callable.clone(),
        }
    }
}

impl<T> Binding<T> {
    pub fn instance<F>(params: impl IntoIterator<Item = ParamSpec>, f: F) -> Self
    where
        F: Fn(&mut T, CallArgs) -> Result<Returns, ExecError> + Send + Sync + 'static,
    {
        Self {
            params: params.into_iter().collect(),
            takes_context: false,
            variadic: false,
            callable: Callable::Instance(Arc::new(f)),
        }
    }

    pub fn constructor<F>(params: impl IntoIterator<Item = ParamSpec>, f: F) -> Self
    where
        F: Fn(CallArgs) -> Result<Returns, ExecError> + Send + Sync + 'static,
    {
        Self {
            params: params.into_iter().collect(),
            takes_context: false,
            variadic: false,
            callable: Callable::Constructor(Arc::new(f)),
        }
    }

    /// The operation's first parameter is the invocation context. It is
    /// injected by the executor and does not count towards the arity.
    pub fn with_context(mut self) -> Self {
        self.takes_context = true;
        self
    }

    /// The final parameter is a JSON array spread into the call's tail.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Number of user-supplied positional arguments.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn takes_context(&self) -> bool {
        self.takes_context
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn kind(&self) -> OperationKind {
        match self.callable {
            Callable::Instance(_) => OperationKind::Instance,
            Callable::Constructor(_) => OperationKind::Constructor,
        }
    }

    pub fn callable(&self) -> &Callable<T> {
        &self.callable
    }
}

/// Mapping from operation name to binding, owned by the application.
pub struct BindingTable<T> {
    bindings: BTreeMap<String, Binding<T>>,
}

impl<T> Default for BindingTable<T> {
    fn default() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }
}

impl<T> BindingTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding, replacing any previous one under `name`.
    pub fn bind(mut self, name: impl Into<String>, binding: Binding<T>) -> Self {
        self.insert(name, binding);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, binding: Binding<T>) -> Option<Binding<T>> {
        self.bindings.insert(name.into(), binding)
    }

    pub fn get(&self, name: &str) -> Option<&Binding<T>> {
        self.bindings.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Converted arguments for one call.
///
/// Accessors index positional arguments after context elision. Reading an
/// argument as the wrong kind is a defect in the binding, reported as
/// [`ExecError::Binding`].
#[derive(Debug, Clone)]
pub struct CallArgs {
    operation: String,
    context: Option<InvocationContext>,
    values: Vec<ArgValue>,
}

impl CallArgs {
    pub fn new(
        operation: impl Into<String>,
        context: Option<InvocationContext>,
        values: Vec<ArgValue>,
    ) -> Self {
        Self {
            operation: operation.into(),
            context,
            values,
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[ArgValue] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&ArgValue> {
        self.values.get(index)
    }

    /// The injected context; only present for context-taking bindings.
    pub fn context(&self) -> Result<&InvocationContext, ExecError> {
        self.context
            .as_ref()
            .ok_or_else(|| self.defect("no context was injected; bind with `with_context`"))
    }

    pub fn str(&self, index: usize) -> Result<&str, ExecError> {
        match self.at(index)? {
            ArgValue::String(s) => Ok(s),
            other => Err(self.mismatch(index, "string", other)),
        }
    }

    pub fn string(&self, index: usize) -> Result<String, ExecError> {
        self.str(index).map(str::to_string)
    }

    pub fn integer(&self, index: usize) -> Result<i64, ExecError> {
        match self.at(index)? {
            ArgValue::Integer(n) => Ok(*n),
            other => Err(self.mismatch(index, "integer", other)),
        }
    }

    pub fn boolean(&self, index: usize) -> Result<bool, ExecError> {
        match self.at(index)? {
            ArgValue::Boolean(b) => Ok(*b),
            other => Err(self.mismatch(index, "boolean", other)),
        }
    }

    pub fn bytes(&self, index: usize) -> Result<&[u8], ExecError> {
        match self.at(index)? {
            ArgValue::Bytes(b) => Ok(b),
            other => Err(self.mismatch(index, "bytes", other)),
        }
    }

    /// Decodes the argument at `index` into `V`.
    pub fn structured<V: DeserializeOwned>(&self, index: usize) -> Result<V, ExecError> {
        let value = self.at(index)?;
        serde_json::from_value(value.to_json())
            .map_err(|e| self.defect(format!("argument {index} does not decode: {e}")))
    }

    /// Decodes every argument from `start` on; the spread tail of a
    /// variadic call.
    pub fn rest<V: DeserializeOwned>(&self, start: usize) -> Result<Vec<V>, ExecError> {
        (start..self.values.len())
            .map(|index| self.structured(index))
            .collect()
    }

    fn at(&self, index: usize) -> Result<&ArgValue, ExecError> {
        self.values.get(index).ok_or_else(|| {
            self.defect(format!(
                "argument {index} requested but only {} supplied",
                self.values.len()
            ))
        })
    }

    fn mismatch(&self, index: usize, wanted: &str, found: &ArgValue) -> ExecError {
        self.defect(format!(
            "argument {index} read as {wanted} but declared {}",
            found.kind()
        ))
    }

    fn defect(&self, reason: impl Into<String>) -> ExecError {
        ExecError::Binding {
            operation: self.operation.clone(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: Vec<ArgValue>) -> CallArgs {
        CallArgs::new("op", None, values)
    }

    #[test]
    fn test_typed_accessors() {
        let call = args(vec![
            ArgValue::String("a".into()),
            ArgValue::Integer(3),
            ArgValue::Boolean(true),
            ArgValue::Bytes(b"xy".to_vec()),
            ArgValue::Structured(serde_json::json!([1, 2])),
        ]);
        assert_eq!(call.str(0).unwrap(), "a");
        assert_eq!(call.integer(1).unwrap(), 3);
        assert!(call.boolean(2).unwrap());
        assert_eq!(call.bytes(3).unwrap(), b"xy");
        assert_eq!(call.structured::<Vec<i64>>(4).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_wrong_kind_is_binding_defect() {
        let call = args(vec![ArgValue::Integer(3)]);
        let err = call.str(0).unwrap_err();
        assert!(err.is_defect());
        assert!(err.to_string().contains("read as string but declared integer"));
        assert!(call.integer(1).is_err());
        assert!(call.context().is_err());
    }

    #[test]
    fn test_rest_decodes_tail() {
        let call = args(vec![
            ArgValue::String("label".into()),
            ArgValue::Structured(serde_json::json!(4)),
            ArgValue::Structured(serde_json::json!(5)),
        ]);
        assert_eq!(call.rest::<i64>(1).unwrap(), vec![4, 5]);
        assert!(call.rest::<i64>(3).unwrap().is_empty());
    }

    #[test]
    fn test_table_replaces_by_name() {
        struct Unit;
        let table = BindingTable::<Unit>::new()
            .bind("a", Binding::instance([], |_, _| Ok(Returns::nothing())))
            .bind(
                "a",
                Binding::constructor([ParamSpec::string()], |_| Ok(Returns::nothing())),
            );
        assert_eq!(table.len(), 1);
        let binding = table.get("a").unwrap();
        assert_eq!(binding.kind(), OperationKind::Constructor);
        assert_eq!(binding.arity(), 1);
        assert!(!binding.takes_context());
    }
}
