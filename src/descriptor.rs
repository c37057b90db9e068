//! Resource type descriptors and the operations they expose

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::BoxedError;
use crate::value::{ParamKind, Value};

/// An intercepted call signature: operation name plus parameter type tags
///
/// # Examples
///
/// ```
/// use transpool::{ParamKind, Signature};
///
/// let sig = Signature::new("get", &[ParamKind::Str]);
/// assert_eq!(sig.name(), "get");
/// assert_eq!(sig.to_string(), "get(Str)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    name: String,
    params: Vec<ParamKind>,
}

impl Signature {
    pub fn new(name: impl Into<String>, params: &[ParamKind]) -> Self {
        Self {
            name: name.into(),
            params: params.to_vec(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ParamKind] {
        &self.params
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (idx, param) in self.params.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", param)?;
        }
        write!(f, ")")
    }
}

/// Result of executing a concrete operation
pub type OperationResult = Result<Value, BoxedError>;

/// A concrete operation on resource type `R`
pub struct Operation<R> {
    signature: Signature,
    body: Box<dyn Fn(&mut R, &[Value]) -> OperationResult + Send + Sync>,
}

impl<R> Operation<R> {
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Execute the operation against a borrowed instance
    pub fn invoke(&self, target: &mut R, args: &[Value]) -> OperationResult {
        (self.body)(target, args)
    }
}

impl<R> fmt::Debug for Operation<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Describes the operations of a resource type
///
/// The operation set is fixed once built; lookups are exact matches on
/// name and parameter tags.
///
/// # Examples
///
/// ```
/// use transpool::{ParamKind, TypeDescriptor, Value};
///
/// struct Conn;
///
/// let descriptor = TypeDescriptor::builder("Conn")
///     .operation("ping", &[], |_conn: &mut Conn, _args| Ok(Value::Str("pong".into())))
///     .build();
///
/// assert_eq!(descriptor.type_name(), "Conn");
/// assert!(descriptor.lookup("ping", &[]).is_some());
/// assert!(descriptor.lookup("ping", &[ParamKind::Int]).is_none());
/// ```
pub struct TypeDescriptor<R> {
    type_name: String,
    operations: HashMap<Signature, Arc<Operation<R>>>,
}

impl<R> TypeDescriptor<R> {
    /// Start building a descriptor for the named resource type
    pub fn builder(type_name: impl Into<String>) -> DescriptorBuilder<R> {
        DescriptorBuilder {
            type_name: type_name.into(),
            operations: HashMap::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Exact-match lookup by operation name and parameter tags
    pub fn lookup(&self, name: &str, params: &[ParamKind]) -> Option<Arc<Operation<R>>> {
        self.operations.get(&Signature::new(name, params)).cloned()
    }

    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }
}

impl<R> fmt::Debug for TypeDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field("operations", &self.operations.len())
            .finish()
    }
}

/// Builder for [`TypeDescriptor`]
pub struct DescriptorBuilder<R> {
    type_name: String,
    operations: HashMap<Signature, Arc<Operation<R>>>,
}

impl<R> DescriptorBuilder<R> {
    /// Register a concrete operation under `(name, params)`.
    ///
    /// Registering the same signature twice replaces the earlier operation.
    pub fn operation<F>(mut self, name: &str, params: &[ParamKind], body: F) -> Self
    where
        F: Fn(&mut R, &[Value]) -> OperationResult + Send + Sync + 'static,
    {
        let signature = Signature::new(name, params);
        self.operations.insert(
            signature.clone(),
            Arc::new(Operation {
                signature,
                body: Box::new(body),
            }),
        );
        self
    }

    pub fn build(self) -> Arc<TypeDescriptor<R>> {
        Arc::new(TypeDescriptor {
            type_name: self.type_name,
            operations: self.operations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Register {
        total: i64,
    }

    fn descriptor() -> Arc<TypeDescriptor<Register>> {
        TypeDescriptor::builder("Register")
            .operation("add", &[ParamKind::Int], |reg: &mut Register, args| {
                if let Value::Int(n) = &args[0] {
                    reg.total += n;
                }
                Ok(Value::Int(reg.total))
            })
            .operation("add", &[ParamKind::Float], |reg: &mut Register, args| {
                if let Value::Float(n) = &args[0] {
                    reg.total += *n as i64;
                }
                Ok(Value::Int(reg.total))
            })
            .operation("total", &[], |reg: &mut Register, _| Ok(Value::Int(reg.total)))
            .build()
    }

    #[test]
    fn test_lookup_exact_match() {
        let descriptor = descriptor();
        assert!(descriptor.lookup("total", &[]).is_some());
        assert!(descriptor.lookup("add", &[ParamKind::Int]).is_some());
        assert_eq!(descriptor.operation_count(), 3);
    }

    #[test]
    fn test_lookup_misses_on_name_and_arity() {
        let descriptor = descriptor();
        assert!(descriptor.lookup("subtract", &[ParamKind::Int]).is_none());
        assert!(descriptor.lookup("total", &[ParamKind::Int]).is_none());
        assert!(descriptor.lookup("add", &[]).is_none());
    }

    #[test]
    fn test_overloads_resolve_to_distinct_operations() {
        let descriptor = descriptor();
        let int_add = descriptor.lookup("add", &[ParamKind::Int]).unwrap();
        let float_add = descriptor.lookup("add", &[ParamKind::Float]).unwrap();
        assert_ne!(int_add.signature(), float_add.signature());
    }

    #[test]
    fn test_operation_mutates_target() {
        let descriptor = descriptor();
        let add = descriptor.lookup("add", &[ParamKind::Int]).unwrap();

        let mut reg = Register { total: 40 };
        let result = add.invoke(&mut reg, &[Value::Int(2)]).unwrap();
        assert_eq!(result, Value::Int(42));
        assert_eq!(reg.total, 42);
    }

    #[test]
    fn test_signature_display() {
        let sig = Signature::new("add", &[ParamKind::Int, ParamKind::Str]);
        assert_eq!(sig.to_string(), "add(Int, Str)");
    }
}
