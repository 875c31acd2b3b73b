//! Record field resolution with embedded-field promotion.

use std::collections::BTreeMap;

use expr_stack::ensure_sufficient_stack;
use smallvec::SmallVec;

use crate::{FieldInfo, HostType, Kind, Nature};

/// Index path from a record to a (possibly promoted) field.
///
/// `[2, 0]` means: field 2 of the outer record (an embedded record), then
/// field 0 of that record.
pub type FieldPath = SmallVec<[usize; 4]>;

/// Strip at most one pointer level, as embedding through `*T` allows.
fn embedded_record(ty: &HostType) -> HostType {
    if ty.kind() == Kind::Pointer {
        if let Some(elem) = ty.elem() {
            return elem;
        }
    }
    ty.clone()
}

/// Find field `name` on record type `ty`.
///
/// Direct fields are searched first, then embedded records in declaration
/// order (depth first). Returns the field and its full index path.
pub fn fetch_field(ty: &HostType, name: &str) -> Option<(FieldInfo, FieldPath)> {
    let mut visiting = Vec::new();
    fetch_field_in(ty, name, &mut visiting)
}

fn fetch_field_in(
    ty: &HostType,
    name: &str,
    visiting: &mut Vec<String>,
) -> Option<(FieldInfo, FieldPath)> {
    if ty.kind() != Kind::Struct {
        return None;
    }

    for i in 0..ty.num_field() {
        let Some(field) = ty.field(i) else { continue };
        if field.lookup_name() == name {
            return Some((field, SmallVec::from_elem(i, 1)));
        }
    }

    // Self-embedding through a pointer would loop forever.
    let type_name = ty.name();
    if visiting.contains(&type_name) {
        return None;
    }
    visiting.push(type_name);

    let found = (0..ty.num_field()).find_map(|i| {
        let field = ty.field(i).filter(|f| f.embedded)?;
        let inner = embedded_record(&field.ty);
        let (found, rest) =
            ensure_sufficient_stack(|| fetch_field_in(&inner, name, visiting))?;
        let mut path = FieldPath::new();
        path.push(i);
        path.extend(rest);
        Some((found, path))
    });

    visiting.pop();
    found
}

/// All fields reachable on `ty`, promoted ones included.
///
/// Pointers are dereferenced first. A field declared directly on a record
/// shadows a promoted field of the same name.
pub fn struct_fields(ty: &HostType) -> BTreeMap<String, Nature> {
    let mut visiting = Vec::new();
    struct_fields_in(&ty.deref_all(), &mut visiting)
}

fn struct_fields_in(ty: &HostType, visiting: &mut Vec<String>) -> BTreeMap<String, Nature> {
    let mut table = BTreeMap::new();
    if ty.kind() != Kind::Struct || visiting.contains(&ty.name()) {
        return table;
    }
    visiting.push(ty.name());

    for i in 0..ty.num_field() {
        let Some(field) = ty.field(i) else { continue };
        if field.embedded {
            let inner = embedded_record(&field.ty).deref_all();
            let promoted = ensure_sufficient_stack(|| struct_fields_in(&inner, visiting));
            for (name, mut nature) in promoted {
                if table.contains_key(&name) {
                    continue;
                }
                nature.field_index.insert(0, i);
                table.insert(name, nature);
            }
        }
        let mut nature = Nature::of(field.ty.clone());
        nature.field_index = SmallVec::from_elem(i, 1);
        table.insert(field.lookup_name().to_string(), nature);
    }

    visiting.pop();
    table
}
