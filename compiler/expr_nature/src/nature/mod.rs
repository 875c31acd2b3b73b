//! The Nature descriptor.
//!
//! A `Nature` pairs an optional host type handle with structural extras the
//! host type cannot express on its own: the element Nature of an untyped
//! array, the declared keys of a schema-less dictionary, a predicate's
//! result, and hints recorded when a member lookup resolved.
//!
//! Children are owned boxes, so cloning a `Nature` deep-copies it and two
//! trees never alias each other's descriptors. The host type handle itself
//! is immutable and shared.

use std::collections::BTreeMap;
use std::fmt;

use crate::fields::{fetch_field, struct_fields, FieldPath};
use crate::{schema, HostType, Kind, MethodInfo};

/// Structural type description of a value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Nature {
    /// Display name of `ty`, kept for debugging and transport snapshots.
    pub type_name: String,
    /// Name of the builtin function this value refers to, if any.
    pub func_name: Option<String>,
    /// Element Nature of an array; overrides the host element type.
    pub array_of: Option<Box<Nature>>,
    /// Result Nature of a predicate.
    pub predicate_out: Option<Box<Nature>>,
    /// Declared keys of a dictionary.
    pub fields: BTreeMap<String, Nature>,
    /// Nature of undeclared keys of an open dictionary.
    pub default_map_value: Option<Box<Nature>>,
    /// The dictionary's key set is closed and fully described by `fields`.
    pub strict: bool,
    /// The value is the universal nil.
    pub nil: bool,
    /// Resolved to a method bound to its receiver.
    pub method: bool,
    /// Index into the receiver's method table, valid when `method` is set.
    pub method_index: usize,
    /// Index path of the resolved field.
    pub field_index: FieldPath,
    /// Bound host type. `None` means unknown.
    pub ty: Option<HostType>,
}

impl Nature {
    /// The "unknown" sentinel: no host type, no structure.
    pub fn unknown() -> Self {
        Nature::default()
    }

    /// Nature bound to a host type.
    pub fn of(ty: HostType) -> Self {
        Nature {
            type_name: ty.name(),
            ty: Some(ty),
            ..Nature::default()
        }
    }

    /// The universal nil. Has no host type.
    pub fn nil() -> Self {
        Nature {
            nil: true,
            ..Nature::default()
        }
    }

    /// `[]any` whose elements are described by `elem`.
    pub fn array_of(elem: Nature) -> Self {
        Nature {
            array_of: Some(Box::new(elem)),
            ..Nature::of(schema::any_slice())
        }
    }

    fn of_opt(ty: Option<HostType>) -> Self {
        ty.map_or_else(Nature::unknown, Nature::of)
    }

    pub fn is_unknown(&self) -> bool {
        self.ty.is_none()
    }

    pub fn kind(&self) -> Kind {
        self.ty.as_ref().map_or(Kind::Invalid, |t| t.kind())
    }

    /// Same Nature with every pointer layer of the host type removed.
    #[must_use]
    pub fn deref(&self) -> Nature {
        let mut out = self.clone();
        if let Some(ty) = &self.ty {
            let inner = ty.deref_all();
            out.type_name = inner.name();
            out.ty = Some(inner);
        }
        out
    }

    /// Declared key type of a dictionary.
    pub fn key(&self) -> Nature {
        match (&self.ty, self.kind()) {
            (Some(ty), Kind::Map) => Nature::of_opt(ty.key()),
            _ => Nature::unknown(),
        }
    }

    /// Element Nature.
    ///
    /// Dictionaries prefer `default_map_value`, arrays prefer `array_of`,
    /// pointers unwrap one level.
    pub fn elem(&self) -> Nature {
        let Some(ty) = &self.ty else {
            return Nature::unknown();
        };
        match ty.kind() {
            Kind::Pointer => Nature::of_opt(ty.elem()),
            Kind::Map => match &self.default_map_value {
                Some(default) => (**default).clone(),
                None => Nature::of_opt(ty.elem()),
            },
            Kind::Array | Kind::Slice => match &self.array_of {
                Some(of) => (**of).clone(),
                None => Nature::of_opt(ty.elem()),
            },
            _ => Nature::unknown(),
        }
    }

    /// Whether a value of this Nature can be stored where `target` is expected.
    ///
    /// Nil goes into any interface. Otherwise the host decides; an unbound
    /// Nature is never assignable and never a valid target.
    pub fn assignable_to(&self, target: &Nature) -> bool {
        if self.nil && target.kind() == Kind::Interface {
            return true;
        }
        match (&self.ty, &target.ty) {
            (Some(from), Some(to)) => from.is_assignable_to(to),
            _ => false,
        }
    }

    /// Resolve a method through the host method table.
    ///
    /// On interfaces the result is not marked as a method: the function type
    /// has no receiver, and the index would differ between implementations.
    pub fn method_by_name(&self, name: &str) -> Option<Nature> {
        let ty = self.ty.as_ref()?;
        let MethodInfo { ty: func, index, .. } = ty.method_by_name(name)?;
        let mut nature = Nature::of(func);
        if ty.kind() != Kind::Interface {
            nature.method = true;
            nature.method_index = index;
        }
        Some(nature)
    }

    /// Resolve a record field, following embedded records.
    pub fn field_by_name(&self, name: &str) -> Option<Nature> {
        let ty = self.ty.as_ref()?;
        let (field, path) = fetch_field(ty, name)?;
        let mut nature = Nature::of(field.ty);
        nature.field_index = path;
        Some(nature)
    }

    pub fn num_in(&self) -> usize {
        self.ty.as_ref().map_or(0, |t| t.num_in())
    }

    pub fn input(&self, index: usize) -> Nature {
        Nature::of_opt(self.ty.as_ref().and_then(|t| t.input(index)))
    }

    pub fn num_out(&self) -> usize {
        self.ty.as_ref().map_or(0, |t| t.num_out())
    }

    pub fn output(&self, index: usize) -> Nature {
        Nature::of_opt(self.ty.as_ref().and_then(|t| t.output(index)))
    }

    pub fn is_variadic(&self) -> bool {
        self.ty.as_ref().is_some_and(|t| t.is_variadic())
    }

    /// A text-keyed dictionary of "any" values, eligible for the compiler's
    /// specialized accessor.
    pub fn is_fast_map(&self) -> bool {
        let Some(ty) = &self.ty else {
            return false;
        };
        ty.kind() == Kind::Map
            && ty.key().is_some_and(|k| k.kind() == Kind::String)
            && ty.elem().is_some_and(|e| e.kind() == Kind::Interface)
    }

    /// Member lookup: methods first, then record fields or dictionary keys.
    ///
    /// Dictionary keys come from `fields`, never from the host type. An
    /// undeclared key on an open dictionary resolves to
    /// `default_map_value` when one is set.
    pub fn get(&self, name: &str) -> Option<Nature> {
        let ty = self.ty.as_ref()?;

        if let Some(method) = self.method_by_name(name) {
            return Some(method);
        }

        let inner = ty.deref_all();
        let found = match inner.kind() {
            Kind::Struct => fetch_field(&inner, name).map(|(field, path)| {
                let mut nature = Nature::of(field.ty);
                nature.field_index = path;
                nature
            }),
            Kind::Map => self.fields.get(name).cloned().or_else(|| {
                if self.strict {
                    None
                } else {
                    self.default_map_value.as_deref().cloned()
                }
            }),
            _ => None,
        };
        if found.is_none() {
            tracing::trace!(name, ty = %ty, strict = self.strict, "member lookup missed");
        }
        found
    }

    /// Every member name with its Nature. Methods win name collisions.
    pub fn all(&self) -> BTreeMap<String, Nature> {
        let mut table = BTreeMap::new();
        let Some(ty) = &self.ty else {
            return table;
        };

        for i in 0..ty.num_method() {
            let Some(method) = ty.method(i) else { continue };
            let mut nature = Nature::of(method.ty);
            nature.method = true;
            nature.method_index = method.index;
            table.insert(method.name, nature);
        }

        let inner = ty.deref_all();
        let members = match inner.kind() {
            Kind::Struct => struct_fields(&inner),
            Kind::Map => self.fields.clone(),
            _ => BTreeMap::new(),
        };
        for (name, nature) in members {
            table.entry(name).or_insert(nature);
        }
        table
    }
}

impl fmt::Display for Nature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ty {
            Some(ty) => write!(f, "{ty}"),
            None if self.nil => f.write_str("nil"),
            None => f.write_str("unknown"),
        }
    }
}
