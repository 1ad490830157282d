//! VHDL spellings of Cerata types and values.

use cerata_ir::{GraphError, LiteralValue, NodeId, NodeKind, Pool, TypeId, TypeKind};

/// The VHDL type of a leaf.
///
/// Clocks, resets and bits are `std_logic`; vectors are
/// `std_logic_vector(<W>-1 downto 0)`. Nested types have no VHDL spelling
/// and render as their name.
pub fn leaf_type(pool: &mut Pool, ty: TypeId) -> Result<String, GraphError> {
    let kind = pool.ty(ty).kind.clone();
    let out = match kind {
        TypeKind::Clock { .. } | TypeKind::Reset { .. } | TypeKind::Bit => "std_logic".to_string(),
        TypeKind::Vector { width: Some(width) } => {
            format!("std_logic_vector({}-1 downto 0)", pool.minimized_string(width)?)
        }
        TypeKind::Vector { width: None } => {
            return Err(GraphError::NoWidth {
                ty: pool.type_name(ty).to_string(),
                tag: kind.tag(),
            })
        }
        TypeKind::Integer if pool.type_name(ty) == "natural" => "natural".to_string(),
        TypeKind::Integer => "integer".to_string(),
        TypeKind::String => "string".to_string(),
        TypeKind::Boolean => "boolean".to_string(),
        TypeKind::Record { .. } | TypeKind::Stream { .. } => pool.type_name(ty).to_string(),
    };
    Ok(out)
}

/// The VHDL type of a leaf of an array with `size` elements.
///
/// One-bit leaves become `std_logic_vector(<N>-1 downto 0)`, vectors of
/// width W become `std_logic_vector(<N*W>-1 downto 0)`.
pub fn array_leaf_type(pool: &mut Pool, ty: TypeId, size: NodeId) -> Result<String, GraphError> {
    match pool.ty(ty).kind {
        TypeKind::Clock { .. } | TypeKind::Reset { .. } | TypeKind::Bit => Ok(format!(
            "std_logic_vector({}-1 downto 0)",
            pool.minimized_string(size)?
        )),
        TypeKind::Vector { .. } => {
            let width = pool.width(ty)?;
            let total = pool.mul(size, width);
            Ok(format!(
                "std_logic_vector({}-1 downto 0)",
                pool.minimized_string(total)?
            ))
        }
        _ => leaf_type(pool, ty),
    }
}

/// Whether leaves of this type are single `std_logic` wires.
pub fn is_single_bit(pool: &Pool, ty: TypeId) -> bool {
    matches!(
        pool.ty(ty).kind,
        TypeKind::Clock { .. } | TypeKind::Reset { .. } | TypeKind::Bit
    )
}

/// A node as a VHDL value: strings quoted, expressions minimized, other
/// nodes by name.
pub fn value_string(pool: &mut Pool, node: NodeId) -> Result<String, GraphError> {
    match &pool.node(node).kind {
        NodeKind::Literal(LiteralValue::Str(s)) => Ok(format!("\"{s}\"")),
        NodeKind::Literal(value) => Ok(value.to_string()),
        NodeKind::Expression { .. } => pool.minimized_string(node),
        _ => Ok(pool.node_name(node).to_string()),
    }
}

/// A literal assigned to a leaf of type `ty`.
///
/// Integers and booleans driving a bit become `'0'`/`'1'`, integers driving
/// a vector are converted with `to_unsigned`.
pub fn literal_for(pool: &mut Pool, literal: NodeId, ty: TypeId) -> Result<String, GraphError> {
    let value = pool.node(literal).literal().cloned();
    let kind = pool.ty(ty).kind.clone();
    match (value, kind) {
        (Some(LiteralValue::Int(v)), TypeKind::Clock { .. } | TypeKind::Reset { .. } | TypeKind::Bit) => {
            Ok(format!("'{}'", i64::from(v != 0)))
        }
        (Some(LiteralValue::Bool(b)), TypeKind::Clock { .. } | TypeKind::Reset { .. } | TypeKind::Bit) => {
            Ok(format!("'{}'", u8::from(b)))
        }
        (Some(LiteralValue::Int(v)), TypeKind::Vector { .. }) => {
            let width = pool.width(ty)?;
            Ok(format!(
                "std_logic_vector(to_unsigned({v}, {}))",
                pool.minimized_string(width)?
            ))
        }
        _ => value_string(pool, literal),
    }
}
