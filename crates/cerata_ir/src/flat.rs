//! Type flattening and weak equality.
//!
//! Flattening turns a nested type into an ordered list of [`FlatType`]
//! entries. The type itself comes first, then record fields in declaration
//! order, and for streams a `valid` leaf, a reversed `ready` leaf and the
//! element. Two types are weakly equal when their flattened lists agree in
//! length and, per position, in type kind and nesting level.

use crate::ids::TypeId;
use crate::types::{TypeDb, TypeKind};
use cerata_common::{Ident, Interner};

/// One entry of a flattened type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatType {
    /// The type at this position.
    pub ty: TypeId,
    /// Field and element names leading from the root to this entry.
    pub name_parts: Vec<Ident>,
    /// Nesting depth, 0 for the root.
    pub level: usize,
    /// Whether the direction is flipped relative to the root.
    pub reverse: bool,
}

impl FlatType {
    /// Joins `root` and the non-empty name parts with `sep`.
    pub fn name(&self, interner: &Interner, root: &str, sep: &str) -> String {
        interner.join(root, &self.name_parts, sep)
    }

    /// The last non-empty name part, if any.
    pub fn last_part(&self, interner: &Interner) -> Option<Ident> {
        self.name_parts
            .iter()
            .rev()
            .copied()
            .find(|p| !interner.resolve(*p).is_empty())
    }
}

/// Flattens `ty` in pre-order.
pub fn flatten(types: &TypeDb, ty: TypeId) -> Vec<FlatType> {
    let mut out = Vec::new();
    flatten_into(types, &mut out, ty, Vec::new(), 0, false);
    out
}

fn flatten_into(
    types: &TypeDb,
    out: &mut Vec<FlatType>,
    ty: TypeId,
    prefix: Vec<Ident>,
    level: usize,
    reverse: bool,
) {
    out.push(FlatType {
        ty,
        name_parts: prefix.clone(),
        level,
        reverse,
    });
    match &types.get(ty).kind {
        TypeKind::Record { fields } => {
            for field in fields {
                let mut parts = prefix.clone();
                parts.push(field.name);
                flatten_into(types, out, field.ty, parts, level + 1, reverse ^ field.reverse);
            }
        }
        TypeKind::Stream {
            element,
            element_name,
            ..
        } => {
            let (valid, ready) = (types.valid(), types.ready());
            let mut parts = prefix.clone();
            parts.push(types.get(valid).name);
            flatten_into(types, out, valid, parts, level + 1, reverse);

            let mut parts = prefix.clone();
            parts.push(types.get(ready).name);
            flatten_into(types, out, ready, parts, level + 1, !reverse);

            let mut parts = prefix;
            parts.push(*element_name);
            flatten_into(types, out, *element, parts, level + 1, reverse);
        }
        _ => {}
    }
}

/// Whether two types flatten to the same shape, ignoring names.
pub fn weakly_equal(types: &TypeDb, a: TypeId, b: TypeId) -> bool {
    if a == b {
        return true;
    }
    let (fa, fb) = (flatten(types, a), flatten(types, b));
    fa.len() == fb.len()
        && fa
            .iter()
            .zip(&fb)
            .all(|(x, y)| x.level == y.level && types.tag(x.ty) == types.tag(y.ty))
}

/// Renders a flattened list, one entry per line.
///
/// ```text
/// rec_a : record
///   q : vector
/// ```
pub fn flat_to_string(types: &TypeDb, interner: &Interner, flat: &[FlatType]) -> String {
    let mut out = String::new();
    for entry in flat {
        let ty = types.get(entry.ty);
        let name = if entry.level == 0 {
            interner.resolve(ty.name).to_string()
        } else {
            entry.name(interner, "", ":")
        };
        out.push_str(&"  ".repeat(entry.level));
        out.push_str(&name);
        out.push_str(" : ");
        out.push_str(&ty.kind.tag().to_string());
        if entry.level > 0 && !name.ends_with(interner.resolve(ty.name)) {
            out.push_str(&format!(" ({})", interner.resolve(ty.name)));
        }
        if entry.reverse {
            out.push_str(" [reverse]");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordField;

    fn record(db: &mut TypeDb, i: &Interner, name: &str, fields: &[(&str, TypeId)]) -> TypeId {
        let fields = fields
            .iter()
            .map(|(n, ty)| RecordField {
                name: i.get_or_intern(n),
                ty: *ty,
                reverse: false,
            })
            .collect();
        db.add(i.get_or_intern(name), TypeKind::Record { fields })
    }

    /// `outer { in: stream<elem { data, last }>, tag }`, built from scratch.
    fn nested(db: &mut TypeDb, i: &Interner, epc: u32) -> TypeId {
        let (bit, int) = (db.bit(), db.integer());
        let vec = db.add(i.get_or_intern("vec8"), TypeKind::Vector { width: None });
        let elem = record(db, i, "elem", &[("data", vec), ("last", bit)]);
        let s = db.add(
            i.get_or_intern("s"),
            TypeKind::Stream {
                element: elem,
                element_name: i.get_or_intern("elem"),
                epc,
            },
        );
        record(db, i, "outer", &[("in", s), ("tag", int)])
    }

    fn names(i: &Interner, flat: &[FlatType]) -> Vec<String> {
        flat.iter().map(|f| f.name(i, "x", "_")).collect()
    }

    #[test]
    fn primitive_flattens_to_itself() {
        let i = Interner::new();
        let db = TypeDb::new(&i);
        let flat = flatten(&db, db.bit());
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].ty, db.bit());
        assert_eq!(flat[0].level, 0);
        assert!(flat[0].name_parts.is_empty());
    }

    #[test]
    fn record_fields_in_order() {
        let i = Interner::new();
        let mut db = TypeDb::new(&i);
        let bit = db.bit();
        let inner = record(&mut db, &i, "inner", &[("c", bit)]);
        let outer = record(&mut db, &i, "outer", &[("a", bit), ("b", inner)]);
        let flat = flatten(&db, outer);
        assert_eq!(names(&i, &flat), vec!["x", "x_a", "x_b", "x_b_c"]);
        let levels: Vec<usize> = flat.iter().map(|f| f.level).collect();
        assert_eq!(levels, vec![0, 1, 1, 2]);
    }

    #[test]
    fn empty_record_has_only_root() {
        let i = Interner::new();
        let mut db = TypeDb::new(&i);
        let empty = record(&mut db, &i, "empty", &[]);
        assert_eq!(flatten(&db, empty).len(), 1);
    }

    #[test]
    fn stream_injects_handshake() {
        let i = Interner::new();
        let mut db = TypeDb::new(&i);
        let vec = db.add(i.get_or_intern("vec8"), TypeKind::Vector { width: None });
        let s = db.add(
            i.get_or_intern("s"),
            TypeKind::Stream {
                element: vec,
                element_name: i.get_or_intern("data"),
                epc: 1,
            },
        );
        let flat = flatten(&db, s);
        assert_eq!(names(&i, &flat), vec!["x", "x_valid", "x_ready", "x_data"]);
        assert!(!flat[1].reverse);
        assert!(flat[2].reverse);
        assert!(!flat[3].reverse);
    }

    #[test]
    fn reverse_field_flips_subtree() {
        let i = Interner::new();
        let mut db = TypeDb::new(&i);
        let s = db.add(
            i.get_or_intern("s"),
            TypeKind::Stream {
                element: db.bit(),
                element_name: i.empty(),
                epc: 1,
            },
        );
        let rec = db.add(
            i.get_or_intern("r"),
            TypeKind::Record {
                fields: vec![RecordField {
                    name: i.get_or_intern("back"),
                    ty: s,
                    reverse: true,
                }],
            },
        );
        let flat = flatten(&db, rec);
        // r, back, back_valid, back_ready, back (element, empty name)
        assert_eq!(flat.len(), 5);
        assert!(flat[1].reverse);
        assert!(flat[2].reverse);
        assert!(!flat[3].reverse);
        assert_eq!(flat[4].name(&i, "", "_"), "back");
    }

    #[test]
    fn flattening_is_deterministic() {
        let i = Interner::new();
        let mut db = TypeDb::new(&i);
        let (bit, int) = (db.bit(), db.integer());
        let rec = record(&mut db, &i, "r", &[("a", bit), ("b", int)]);
        assert_eq!(flatten(&db, rec), flatten(&db, rec));
    }

    #[test]
    fn weak_equality_ignores_names() {
        let i = Interner::new();
        let mut db = TypeDb::new(&i);
        let (bit, valid, ready, int) = (db.bit(), db.valid(), db.ready(), db.integer());
        let a = record(&mut db, &i, "a", &[("p", bit), ("q", bit)]);
        let b = record(&mut db, &i, "b", &[("x", valid), ("y", ready)]);
        let c = record(&mut db, &i, "c", &[("p", bit)]);
        let d = record(&mut db, &i, "d", &[("p", bit), ("q", int)]);
        assert!(weakly_equal(&db, a, a));
        assert!(weakly_equal(&db, a, b));
        assert!(!weakly_equal(&db, a, c));
        assert!(!weakly_equal(&db, a, d));
    }

    #[test]
    fn weak_equality_checks_levels() {
        let i = Interner::new();
        let mut db = TypeDb::new(&i);
        let inner = record(&mut db, &i, "inner", &[]);
        let a = record(&mut db, &i, "a", &[("r", inner), ("s", inner)]);
        let nested = record(&mut db, &i, "nested", &[("s", inner)]);
        let b = record(&mut db, &i, "b", &[("r", nested)]);
        assert_eq!(flatten(&db, a).len(), flatten(&db, b).len());
        assert!(!weakly_equal(&db, a, b));
    }

    #[test]
    fn render_flat_type() {
        let i = Interner::new();
        let mut db = TypeDb::new(&i);
        let bit = db.bit();
        let rec = record(&mut db, &i, "rec", &[("a", bit)]);
        let text = flat_to_string(&db, &i, &flatten(&db, rec));
        assert_eq!(text, "rec : record\n  a : bit (bit)\n");
    }

    #[test]
    fn rebuilt_nested_types_are_weakly_equal() {
        let i = Interner::new();
        let mut db = TypeDb::new(&i);
        let a = nested(&mut db, &i, 1);
        let b = nested(&mut db, &i, 1);
        assert_ne!(a, b);
        let (fa, fb) = (flatten(&db, a), flatten(&db, b));
        assert_eq!(fa.len(), 8);
        assert_eq!(names(&i, &fa), names(&i, &fb));
        assert!(weakly_equal(&db, a, b));
        assert!(weakly_equal(&db, b, a));
    }

    #[test]
    fn elements_per_cycle_keep_the_shape() {
        let i = Interner::new();
        let mut db = TypeDb::new(&i);
        let one = nested(&mut db, &i, 1);
        let four = nested(&mut db, &i, 4);
        assert_eq!(
            names(&i, &flatten(&db, one)),
            vec!["x", "x_in", "x_in_valid", "x_in_ready", "x_in_elem", "x_in_elem_data", "x_in_elem_last", "x_tag"]
        );
        assert_eq!(names(&i, &flatten(&db, one)), names(&i, &flatten(&db, four)));
        assert!(weakly_equal(&db, one, four));
    }
}
