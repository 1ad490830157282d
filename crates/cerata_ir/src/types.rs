//! The nested hardware type system and its type database.
//!
//! Types are stored once in a [`TypeDb`] and referenced by [`TypeId`]. Unlike
//! plain HDL types, Cerata types nest: a [`TypeKind::Record`] groups named
//! fields and a [`TypeKind::Stream`] wraps an element type with valid/ready
//! handshake signals. Vector widths are graph nodes, so they can be literals,
//! parameters or expressions.

use crate::arena::Arena;
use crate::ids::{DomainId, NodeId, TypeId};
use crate::mapper::TypeMapper;
use cerata_common::{Ident, Interner};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The payload-less kind of a type, compared by weak equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    /// A clock signal.
    Clock,
    /// A reset signal.
    Reset,
    /// A single bit.
    Bit,
    /// A bit vector.
    Vector,
    /// An abstract integer.
    Integer,
    /// An abstract string.
    String,
    /// An abstract boolean.
    Boolean,
    /// A record of named fields.
    Record,
    /// A valid/ready stream.
    Stream,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypeTag::Clock => "clock",
            TypeTag::Reset => "reset",
            TypeTag::Bit => "bit",
            TypeTag::Vector => "vector",
            TypeTag::Integer => "integer",
            TypeTag::String => "string",
            TypeTag::Boolean => "boolean",
            TypeTag::Record => "record",
            TypeTag::Stream => "stream",
        };
        f.write_str(s)
    }
}

/// A named field of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordField {
    /// Field name.
    pub name: Ident,
    /// Field type.
    pub ty: TypeId,
    /// Flip the direction of this field relative to the record.
    pub reverse: bool,
}

/// The structure of a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    /// A clock in a clock domain.
    Clock {
        /// The clock domain.
        domain: DomainId,
    },
    /// A reset in a clock domain.
    Reset {
        /// The clock domain.
        domain: DomainId,
    },
    /// A single bit.
    Bit,
    /// A bit vector whose width is a node.
    Vector {
        /// Width node, if known.
        width: Option<NodeId>,
    },
    /// An abstract integer.
    Integer,
    /// An abstract string.
    String,
    /// An abstract boolean.
    Boolean,
    /// An ordered list of named fields.
    Record {
        /// Fields in declaration order.
        fields: Vec<RecordField>,
    },
    /// A stream of elements with a valid/ready handshake.
    Stream {
        /// Element type.
        element: TypeId,
        /// Element name, may be the empty identifier.
        element_name: Ident,
        /// Elements per cycle. Carried as metadata: flattening and widths
        /// treat the element as a single lane.
        epc: u32,
    },
}

impl TypeKind {
    /// The payload-less kind.
    pub fn tag(&self) -> TypeTag {
        match self {
            TypeKind::Clock { .. } => TypeTag::Clock,
            TypeKind::Reset { .. } => TypeTag::Reset,
            TypeKind::Bit => TypeTag::Bit,
            TypeKind::Vector { .. } => TypeTag::Vector,
            TypeKind::Integer => TypeTag::Integer,
            TypeKind::String => TypeTag::String,
            TypeKind::Boolean => TypeTag::Boolean,
            TypeKind::Record { .. } => TypeTag::Record,
            TypeKind::Stream { .. } => TypeTag::Stream,
        }
    }

    /// Records and streams contain other types.
    pub fn is_nested(&self) -> bool {
        matches!(self, TypeKind::Record { .. } | TypeKind::Stream { .. })
    }

    /// Types without a direct physical bit representation.
    pub fn is_abstract(&self) -> bool {
        matches!(
            self,
            TypeKind::Integer
                | TypeKind::String
                | TypeKind::Boolean
                | TypeKind::Record { .. }
                | TypeKind::Stream { .. }
        )
    }
}

/// A named type together with the mappers attached to it.
#[derive(Debug, Clone)]
pub struct Type {
    /// Type name.
    pub name: Ident,
    /// Structure.
    pub kind: TypeKind,
    pub(crate) mappers: Vec<TypeMapper>,
}

impl Type {
    /// Mappers from this type to other types.
    pub fn mappers(&self) -> &[TypeMapper] {
        &self.mappers
    }

    /// Shorthand for `self.kind.tag()`.
    pub fn tag(&self) -> TypeTag {
        self.kind.tag()
    }
}

#[derive(Debug, Clone, Copy)]
struct Builtins {
    bit: TypeId,
    valid: TypeId,
    ready: TypeId,
    integer: TypeId,
    natural: TypeId,
    string: TypeId,
    boolean: TypeId,
}

/// Storage for all types of a pool.
///
/// Every database starts with the built-in types `bit`, `valid`, `ready`,
/// `integer`, `natural`, `string` and `boolean`.
#[derive(Debug, Clone)]
pub struct TypeDb {
    types: Arena<TypeId, Type>,
    builtins: Builtins,
}

impl TypeDb {
    /// Creates a database holding only the built-in types.
    pub fn new(interner: &Interner) -> Self {
        let mut types = Arena::new();
        let mut builtin = |name: &str, kind: TypeKind| {
            types.alloc(Type {
                name: interner.get_or_intern(name),
                kind,
                mappers: Vec::new(),
            })
        };
        let builtins = Builtins {
            bit: builtin("bit", TypeKind::Bit),
            valid: builtin("valid", TypeKind::Bit),
            ready: builtin("ready", TypeKind::Bit),
            integer: builtin("integer", TypeKind::Integer),
            natural: builtin("natural", TypeKind::Integer),
            string: builtin("string", TypeKind::String),
            boolean: builtin("boolean", TypeKind::Boolean),
        };
        Self { types, builtins }
    }

    /// Adds a type. Names need not be unique.
    pub fn add(&mut self, name: Ident, kind: TypeKind) -> TypeId {
        self.types.alloc(Type {
            name,
            kind,
            mappers: Vec::new(),
        })
    }

    /// Returns a type.
    pub fn get(&self, id: TypeId) -> &Type {
        self.types.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: TypeId) -> &mut Type {
        self.types.get_mut(id)
    }

    /// The first type with the given name.
    pub fn find(&self, name: Ident) -> Option<TypeId> {
        self.types
            .iter()
            .find(|(_, ty)| ty.name == name)
            .map(|(id, _)| id)
    }

    /// Number of types, including built-ins.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always `false`; built-ins are present from the start.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates over all types in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &Type)> {
        self.types.iter()
    }

    /// Payload-less kind of a type.
    pub fn tag(&self, id: TypeId) -> TypeTag {
        self.get(id).kind.tag()
    }

    /// Whether the type is a record or stream.
    pub fn is_nested(&self, id: TypeId) -> bool {
        self.get(id).kind.is_nested()
    }

    /// Whether the type is abstract.
    pub fn is_abstract(&self, id: TypeId) -> bool {
        self.get(id).kind.is_abstract()
    }

    /// The built-in `bit` type.
    pub fn bit(&self) -> TypeId {
        self.builtins.bit
    }

    /// The built-in stream `valid` bit.
    pub fn valid(&self) -> TypeId {
        self.builtins.valid
    }

    /// The built-in stream `ready` bit.
    pub fn ready(&self) -> TypeId {
        self.builtins.ready
    }

    /// The built-in `integer` type.
    pub fn integer(&self) -> TypeId {
        self.builtins.integer
    }

    /// The built-in `natural` type.
    pub fn natural(&self) -> TypeId {
        self.builtins.natural
    }

    /// The built-in `string` type.
    pub fn string(&self) -> TypeId {
        self.builtins.string
    }

    /// The built-in `boolean` type.
    pub fn boolean(&self) -> TypeId {
        self.builtins.boolean
    }
}
