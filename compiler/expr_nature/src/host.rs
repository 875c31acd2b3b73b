//! Host type capability.
//!
//! The embedding application describes its runtime types through
//! [`HostTypeInfo`]. A [`Nature`](crate::Nature) holds a [`HostType`] handle
//! and defers every detailed question to it, so nothing is enumerated until
//! the checker actually asks.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use crate::Kind;

/// Runtime type information supplied by the host.
///
/// Only `name`, `kind` and `assignable_to` are mandatory; the remaining
/// queries default to "not applicable" so simple hosts stay small.
///
/// # Methods and receivers
///
/// On concrete (non-interface) types, the function type returned for a
/// method includes the receiver as its first input. On interface types it
/// does not. [`Nature::method_by_name`](crate::Nature::method_by_name) relies
/// on this to decide whether the checker should discount one argument.
pub trait HostTypeInfo: fmt::Debug + Send + Sync {
    /// Display name. Two handles with the same name denote the same type.
    fn name(&self) -> String;

    fn kind(&self) -> Kind;

    /// Key type of a map.
    fn key(&self) -> Option<HostType> {
        None
    }

    /// Element type of a map, slice, array or pointer.
    fn elem(&self) -> Option<HostType> {
        None
    }

    /// Length of a fixed array.
    fn array_len(&self) -> usize {
        0
    }

    fn num_field(&self) -> usize {
        0
    }

    /// Field `index` of a record, in declaration order.
    fn field(&self, index: usize) -> Option<FieldInfo> {
        let _ = index;
        None
    }

    fn num_method(&self) -> usize {
        0
    }

    /// Method `index`, methods sorted by name.
    fn method(&self, index: usize) -> Option<MethodInfo> {
        let _ = index;
        None
    }

    fn method_by_name(&self, name: &str) -> Option<MethodInfo> {
        (0..self.num_method())
            .filter_map(|i| self.method(i))
            .find(|m| m.name == name)
    }

    fn num_in(&self) -> usize {
        0
    }

    fn input(&self, index: usize) -> Option<HostType> {
        let _ = index;
        None
    }

    fn num_out(&self) -> usize {
        0
    }

    fn output(&self, index: usize) -> Option<HostType> {
        let _ = index;
        None
    }

    /// True when the last input collects the remaining arguments.
    fn is_variadic(&self) -> bool {
        false
    }

    /// Whether a value of this type can be stored in a slot of `target`.
    fn assignable_to(&self, target: &dyn HostTypeInfo) -> bool;
}

/// Shared handle to a host type.
///
/// Cloning is a reference count bump. Equality and hashing go through the
/// display name, which [`HostTypeInfo::name`] guarantees to be unique.
#[derive(Clone)]
pub struct HostType(Arc<dyn HostTypeInfo>);

impl HostType {
    pub fn new(info: impl HostTypeInfo + 'static) -> Self {
        HostType(Arc::new(info))
    }

    pub fn from_arc(info: Arc<dyn HostTypeInfo>) -> Self {
        HostType(info)
    }

    /// Follow pointers until a non-pointer type is reached.
    #[must_use]
    pub fn deref_all(&self) -> HostType {
        let mut ty = self.clone();
        while ty.kind() == Kind::Pointer {
            match ty.elem() {
                Some(elem) => ty = elem,
                None => break,
            }
        }
        ty
    }

    pub fn is_assignable_to(&self, target: &HostType) -> bool {
        self.0.assignable_to(&*target.0)
    }
}

impl Deref for HostType {
    type Target = dyn HostTypeInfo;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl PartialEq for HostType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.name() == other.0.name()
    }
}

impl Eq for HostType {}

impl Hash for HostType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name().hash(state);
    }
}

impl fmt::Debug for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostType({})", self.0.name())
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name())
    }
}

/// A record field as seen by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    /// Name the field is exposed under in expressions, if it differs.
    pub alias: Option<String>,
    pub ty: HostType,
    /// Anonymous (embedded) field whose members are promoted.
    pub embedded: bool,
}

impl FieldInfo {
    /// Name used for lookups from expressions.
    pub fn lookup_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// A method as seen by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodInfo {
    pub name: String,
    /// Function type; includes the receiver unless the owner is an interface.
    pub ty: HostType,
    /// Position in the owner's method table.
    pub index: usize,
}

/// Canonical text of a function signature, e.g. `(int, ...string) bool`.
///
/// With `skip_receiver` the first input is left out, which lets a concrete
/// method be compared against an interface method.
pub fn signature(func: &dyn HostTypeInfo, skip_receiver: bool) -> String {
    let first = usize::from(skip_receiver);
    let count = func.num_in();
    let inputs: Vec<String> = (first..count)
        .filter_map(|i| {
            let ty = func.input(i)?;
            if func.is_variadic() && i + 1 == count {
                let elem = ty.elem().map_or_else(|| ty.name(), |e| e.name());
                Some(format!("...{elem}"))
            } else {
                Some(ty.name())
            }
        })
        .collect();
    let outputs: Vec<String> = (0..func.num_out())
        .filter_map(|i| func.output(i).map(|t| t.name()))
        .collect();

    let mut text = format!("({})", inputs.join(", "));
    match outputs.len() {
        0 => {}
        1 => {
            text.push(' ');
            text.push_str(&outputs[0]);
        }
        _ => {
            text.push_str(" (");
            text.push_str(&outputs.join(", "));
            text.push(')');
        }
    }
    text
}
