//! Table-driven host types.
//!
//! Hosts without native runtime type information register their types here
//! ahead of time. Every constructor returns a [`HostType`] handle; the
//! primitive and "any" handles are shared singletons.
//!
//! ```text
//! let user = schema::record("User")
//!     .field("Name", schema::string())
//!     .method("Greet", schema::func(vec![schema::string()], vec![schema::string()], false))
//!     .build();
//! let env = schema::record("Env").field("User", schema::pointer(user)).build();
//!
//! let list = schema::declare("List");
//! let this = list.ty();
//! let list = list.define(|r| r.field("Value", schema::int()).field("Next", schema::pointer(this)));
//! ```

use std::sync::{Arc, OnceLock, Weak};

use rustc_hash::FxHashMap;

use crate::host::signature;
use crate::{FieldInfo, HostType, HostTypeInfo, Kind, MethodInfo};

/// A host type described by a registered table entry.
#[derive(Debug)]
pub struct SchemaType {
    name: String,
    repr: Repr,
    /// Handle to ourselves, for binding method receivers.
    this: Weak<SchemaType>,
}

#[derive(Debug)]
enum Repr {
    Bool,
    Int,
    Float,
    String,
    Interface(MethodTable),
    /// Unset only while a forward-declared record awaits its definition.
    Struct(OnceLock<RecordBody>),
    Map {
        key: HostType,
        elem: HostType,
    },
    Slice {
        elem: HostType,
    },
    Array {
        len: usize,
        elem: HostType,
    },
    Pointer {
        elem: HostType,
    },
    Func {
        inputs: Vec<HostType>,
        outputs: Vec<HostType>,
        variadic: bool,
    },
}

#[derive(Debug, Default)]
struct RecordBody {
    fields: Vec<FieldInfo>,
    methods: MethodTable,
}

/// Receiver-free method signatures sorted by name.
#[derive(Debug, Default)]
struct MethodTable {
    entries: Vec<(String, HostType)>,
    by_name: FxHashMap<String, usize>,
}

impl MethodTable {
    fn new(mut entries: Vec<(String, HostType)>) -> Self {
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.dedup_by(|a, b| a.0 == b.0);
        let by_name = entries
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), i))
            .collect();
        MethodTable { entries, by_name }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, index: usize) -> Option<&(String, HostType)> {
        self.entries.get(index)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }
}

fn build(name: String, repr: Repr) -> HostType {
    let arc: Arc<SchemaType> = Arc::new_cyclic(|this| SchemaType {
        name,
        repr,
        this: this.clone(),
    });
    HostType::from_arc(arc)
}

fn cached(cell: &'static OnceLock<HostType>, init: impl FnOnce() -> HostType) -> HostType {
    cell.get_or_init(init).clone()
}

pub fn bool() -> HostType {
    static TYPE: OnceLock<HostType> = OnceLock::new();
    cached(&TYPE, || build("bool".into(), Repr::Bool))
}

pub fn int() -> HostType {
    static TYPE: OnceLock<HostType> = OnceLock::new();
    cached(&TYPE, || build("int".into(), Repr::Int))
}

pub fn float() -> HostType {
    static TYPE: OnceLock<HostType> = OnceLock::new();
    cached(&TYPE, || build("float".into(), Repr::Float))
}

pub fn string() -> HostType {
    static TYPE: OnceLock<HostType> = OnceLock::new();
    cached(&TYPE, || build("string".into(), Repr::String))
}

/// The empty interface. Every type is assignable to it.
pub fn any() -> HostType {
    static TYPE: OnceLock<HostType> = OnceLock::new();
    cached(&TYPE, || {
        build("any".into(), Repr::Interface(MethodTable::default()))
    })
}

/// `map[string]any`, the type of schema-less dictionaries.
pub fn any_map() -> HostType {
    static TYPE: OnceLock<HostType> = OnceLock::new();
    cached(&TYPE, || map(string(), any()))
}

/// `[]any`, the type of untyped array literals.
pub fn any_slice() -> HostType {
    static TYPE: OnceLock<HostType> = OnceLock::new();
    cached(&TYPE, || slice(any()))
}

pub fn map(key: HostType, elem: HostType) -> HostType {
    build(format!("map[{key}]{elem}"), Repr::Map { key, elem })
}

pub fn slice(elem: HostType) -> HostType {
    build(format!("[]{elem}"), Repr::Slice { elem })
}

pub fn array(len: usize, elem: HostType) -> HostType {
    build(format!("[{len}]{elem}"), Repr::Array { len, elem })
}

pub fn pointer(elem: HostType) -> HostType {
    build(format!("*{elem}"), Repr::Pointer { elem })
}

/// Function type. When `variadic` is set the last input must be a slice.
pub fn func(inputs: Vec<HostType>, outputs: Vec<HostType>, variadic: bool) -> HostType {
    let mut params: Vec<String> = inputs.iter().map(|t| t.name()).collect();
    if variadic {
        if let (Some(last), Some(ty)) = (params.last_mut(), inputs.last()) {
            if let Some(elem) = ty.elem() {
                *last = format!("...{elem}");
            }
        }
    }
    let mut name = format!("func({})", params.join(", "));
    match outputs.as_slice() {
        [] => {}
        [single] => {
            name.push(' ');
            name.push_str(&single.name());
        }
        many => {
            let names: Vec<String> = many.iter().map(|t| t.name()).collect();
            name.push_str(&format!(" ({})", names.join(", ")));
        }
    }
    build(
        name,
        Repr::Func {
            inputs,
            outputs,
            variadic,
        },
    )
}

pub fn record(name: impl Into<String>) -> RecordBuilder {
    RecordBuilder {
        name: name.into(),
        fields: Vec::new(),
        methods: Vec::new(),
    }
}

pub fn interface(name: impl Into<String>) -> InterfaceBuilder {
    InterfaceBuilder {
        name: name.into(),
        methods: Vec::new(),
    }
}

/// Forward-declare a record so its own fields can refer to it.
///
/// The handle from [`Declared::ty`] is the same type that
/// [`Declared::define`] returns. Until then it is a record with no members.
/// Self-referential records form a reference cycle and are never freed.
pub fn declare(name: impl Into<String>) -> Declared {
    let name = name.into();
    let arc: Arc<SchemaType> = Arc::new_cyclic(|this| SchemaType {
        name,
        repr: Repr::Struct(OnceLock::new()),
        this: this.clone(),
    });
    Declared { arc }
}

/// A record type whose members are not yet defined.
#[must_use]
pub struct Declared {
    arc: Arc<SchemaType>,
}

impl Declared {
    pub fn ty(&self) -> HostType {
        HostType::from_arc(self.arc.clone() as Arc<dyn HostTypeInfo>)
    }

    /// Fill in the members. The builder starts empty and carries the
    /// declared name.
    pub fn define(self, members: impl FnOnce(RecordBuilder) -> RecordBuilder) -> HostType {
        let builder = members(record(self.arc.name.clone()));
        if let Repr::Struct(body) = &self.arc.repr {
            // Only `define` sets the body, and it consumes the declaration.
            let _ = body.set(builder.into_body());
        }
        self.ty()
    }
}

/// Builder for a named record type.
#[must_use]
pub struct RecordBuilder {
    name: String,
    fields: Vec<FieldInfo>,
    methods: Vec<(String, HostType)>,
}

impl RecordBuilder {
    pub fn field(mut self, name: impl Into<String>, ty: HostType) -> Self {
        self.fields.push(FieldInfo {
            name: name.into(),
            alias: None,
            ty,
            embedded: false,
        });
        self
    }

    /// Field exposed to expressions under `alias`.
    pub fn field_as(
        mut self,
        name: impl Into<String>,
        alias: impl Into<String>,
        ty: HostType,
    ) -> Self {
        self.fields.push(FieldInfo {
            name: name.into(),
            alias: Some(alias.into()),
            ty,
            embedded: false,
        });
        self
    }

    /// Anonymous field. Its fields are promoted onto this record.
    pub fn embed(mut self, ty: HostType) -> Self {
        self.fields.push(FieldInfo {
            name: ty.deref_all().name(),
            alias: None,
            ty,
            embedded: true,
        });
        self
    }

    /// Method with a receiver-free function type.
    pub fn method(mut self, name: impl Into<String>, func: HostType) -> Self {
        self.methods.push((name.into(), func));
        self
    }

    fn into_body(self) -> RecordBody {
        RecordBody {
            fields: self.fields,
            methods: MethodTable::new(self.methods),
        }
    }

    pub fn build(self) -> HostType {
        let RecordBuilder {
            name,
            fields,
            methods,
        } = self;
        let body = RecordBody {
            fields,
            methods: MethodTable::new(methods),
        };
        build(name, Repr::Struct(OnceLock::from(body)))
    }
}

/// Builder for a named interface type.
#[must_use]
pub struct InterfaceBuilder {
    name: String,
    methods: Vec<(String, HostType)>,
}

impl InterfaceBuilder {
    pub fn method(mut self, name: impl Into<String>, func: HostType) -> Self {
        self.methods.push((name.into(), func));
        self
    }

    pub fn build(self) -> HostType {
        build(self.name, Repr::Interface(MethodTable::new(self.methods)))
    }
}

/// Prepend `receiver` to the inputs of `method`, dropping `skip` leading inputs first.
fn bind_receiver(receiver: HostType, method: &HostType, skip: usize) -> HostType {
    let mut inputs = Vec::with_capacity(method.num_in() + 1 - skip);
    inputs.push(receiver);
    inputs.extend((skip..method.num_in()).filter_map(|i| method.input(i)));
    let outputs = (0..method.num_out())
        .filter_map(|i| method.output(i))
        .collect();
    func(inputs, outputs, method.is_variadic())
}

impl SchemaType {
    fn handle(&self) -> Option<HostType> {
        self.this
            .upgrade()
            .map(|arc| HostType::from_arc(arc as Arc<dyn HostTypeInfo>))
    }

    fn record(&self) -> Option<&RecordBody> {
        static EMPTY: OnceLock<RecordBody> = OnceLock::new();
        match &self.repr {
            Repr::Struct(body) => {
                Some(body.get().unwrap_or_else(|| EMPTY.get_or_init(RecordBody::default)))
            }
            _ => None,
        }
    }

    fn methods(&self) -> Option<&MethodTable> {
        match &self.repr {
            Repr::Interface(methods) => Some(methods),
            _ => self.record().map(|body| &body.methods),
        }
    }

    /// Methods promoted through a pointer to a record.
    fn pointee_methods(&self) -> Option<&HostType> {
        match &self.repr {
            Repr::Pointer { elem } if elem.kind() == Kind::Struct => Some(elem),
            _ => None,
        }
    }
}

impl HostTypeInfo for SchemaType {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> Kind {
        match &self.repr {
            Repr::Bool => Kind::Bool,
            Repr::Int => Kind::Int,
            Repr::Float => Kind::Float,
            Repr::String => Kind::String,
            Repr::Interface(_) => Kind::Interface,
            Repr::Struct(_) => Kind::Struct,
            Repr::Map { .. } => Kind::Map,
            Repr::Slice { .. } => Kind::Slice,
            Repr::Array { .. } => Kind::Array,
            Repr::Pointer { .. } => Kind::Pointer,
            Repr::Func { .. } => Kind::Func,
        }
    }

    fn key(&self) -> Option<HostType> {
        match &self.repr {
            Repr::Map { key, .. } => Some(key.clone()),
            _ => None,
        }
    }

    fn elem(&self) -> Option<HostType> {
        match &self.repr {
            Repr::Map { elem, .. }
            | Repr::Slice { elem }
            | Repr::Array { elem, .. }
            | Repr::Pointer { elem } => Some(elem.clone()),
            _ => None,
        }
    }

    fn array_len(&self) -> usize {
        match &self.repr {
            Repr::Array { len, .. } => *len,
            _ => 0,
        }
    }

    fn num_field(&self) -> usize {
        self.record().map_or(0, |body| body.fields.len())
    }

    fn field(&self, index: usize) -> Option<FieldInfo> {
        self.record()?.fields.get(index).cloned()
    }

    fn num_method(&self) -> usize {
        match self.methods() {
            Some(methods) => methods.len(),
            None => self.pointee_methods().map_or(0, |elem| elem.num_method()),
        }
    }

    fn method(&self, index: usize) -> Option<MethodInfo> {
        match &self.repr {
            Repr::Interface(methods) => {
                let (name, ty) = methods.get(index)?;
                Some(MethodInfo {
                    name: name.clone(),
                    ty: ty.clone(),
                    index,
                })
            }
            Repr::Struct(_) => {
                let (name, ty) = self.methods()?.get(index)?;
                Some(MethodInfo {
                    name: name.clone(),
                    ty: bind_receiver(self.handle()?, ty, 0),
                    index,
                })
            }
            _ => {
                let bound = self.pointee_methods()?.method(index)?;
                Some(MethodInfo {
                    ty: bind_receiver(self.handle()?, &bound.ty, 1),
                    ..bound
                })
            }
        }
    }

    fn method_by_name(&self, name: &str) -> Option<MethodInfo> {
        let index = match self.methods() {
            Some(methods) => methods.position(name)?,
            None => self.pointee_methods()?.method_by_name(name)?.index,
        };
        self.method(index)
    }

    fn num_in(&self) -> usize {
        match &self.repr {
            Repr::Func { inputs, .. } => inputs.len(),
            _ => 0,
        }
    }

    fn input(&self, index: usize) -> Option<HostType> {
        match &self.repr {
            Repr::Func { inputs, .. } => inputs.get(index).cloned(),
            _ => None,
        }
    }

    fn num_out(&self) -> usize {
        match &self.repr {
            Repr::Func { outputs, .. } => outputs.len(),
            _ => 0,
        }
    }

    fn output(&self, index: usize) -> Option<HostType> {
        match &self.repr {
            Repr::Func { outputs, .. } => outputs.get(index).cloned(),
            _ => None,
        }
    }

    fn is_variadic(&self) -> bool {
        matches!(&self.repr, Repr::Func { variadic: true, .. })
    }

    fn assignable_to(&self, target: &dyn HostTypeInfo) -> bool {
        if self.name == target.name() {
            return true;
        }
        if target.kind() != Kind::Interface {
            return false;
        }
        // Interface satisfaction: every wanted method exists with the same
        // receiver-free signature.
        let skip_receiver = self.kind() != Kind::Interface;
        (0..target.num_method()).all(|i| {
            let Some(wanted) = target.method(i) else {
                return false;
            };
            self.method_by_name(&wanted.name).is_some_and(|have| {
                signature(&*have.ty, skip_receiver) == signature(&*wanted.ty, false)
            })
        })
    }
}
