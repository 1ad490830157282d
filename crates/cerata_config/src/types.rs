//! Configuration types deserialized from `cerata.toml`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// The top-level design description parsed from `cerata.toml`.
#[derive(Debug, Deserialize)]
pub struct DesignConfig {
    /// Project metadata (name and top-level component).
    pub project: ProjectMeta,
    /// Where and what to generate.
    #[serde(default)]
    pub output: OutputConfig,
    /// Stream profiling settings.
    #[serde(default)]
    pub profile: ProfileConfig,
    /// Additional clock domains.
    #[serde(default)]
    pub domains: DomainConfig,
    /// Named type declarations.
    #[serde(default)]
    pub types: BTreeMap<String, TypeDecl>,
    /// Named component declarations.
    #[serde(default)]
    pub components: BTreeMap<String, ComponentDecl>,
    /// Explicit or implicit type mappers.
    #[serde(default)]
    pub mappers: Vec<MapperDecl>,
}

/// Project metadata required in every `cerata.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// Name of the top-level component.
    pub top: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

/// Output settings for `cerata generate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory, relative to the project directory.
    pub dir: String,
    /// Emit one `.vhd` file per component.
    pub vhdl: bool,
    /// Emit a Graphviz rendering of the top-level component.
    pub dot: bool,
    /// Comment text placed at the top of every generated file.
    pub header: Option<String>,
    /// Replace files that already exist.
    pub overwrite: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "out".to_string(),
            vhdl: true,
            dot: false,
            header: None,
            overwrite: true,
        }
    }
}

/// Stream profiling settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileConfig {
    /// Insert a profiler for every signal marked `profile = true`.
    #[serde(default)]
    pub enabled: bool,
}

/// Clock domains besides the implicit `default` domain.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DomainConfig {
    /// Domain names.
    #[serde(default)]
    pub names: Vec<String>,
}

/// A type declaration, discriminated by its `kind` key.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeDecl {
    /// A single bit.
    Bit,
    /// A clock in the given domain (`default` when omitted).
    Clock {
        /// Clock domain name.
        domain: Option<String>,
    },
    /// A reset in the given domain (`default` when omitted).
    Reset {
        /// Clock domain name.
        domain: Option<String>,
    },
    /// A bit vector.
    Vector {
        /// Literal width or the name of a parameter.
        width: WidthSpec,
    },
    /// An integer.
    Integer,
    /// A non-negative integer.
    Natural,
    /// A string.
    String,
    /// A boolean.
    Boolean,
    /// An ordered collection of named fields.
    Record {
        /// The fields in declaration order.
        #[serde(default)]
        fields: Vec<FieldDecl>,
    },
    /// A valid/ready stream of an element type.
    Stream {
        /// Element type name.
        element: String,
        /// Name of the element inside the stream, may be empty.
        #[serde(default)]
        element_name: String,
        /// Elements per cycle.
        #[serde(default = "default_epc")]
        epc: u32,
    },
}

fn default_epc() -> u32 {
    1
}

impl TypeDecl {
    /// Names of the types this declaration refers to.
    pub fn references(&self) -> Vec<&str> {
        match self {
            TypeDecl::Record { fields } => fields.iter().map(|f| f.ty.as_str()).collect(),
            TypeDecl::Stream { element, .. } => vec![element.as_str()],
            _ => Vec::new(),
        }
    }
}

/// A vector width or array size: an integer or a parameter name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WidthSpec {
    /// A literal value.
    Literal(i64),
    /// The name of a parameter of the enclosing component.
    Param(String),
}

impl fmt::Display for WidthSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidthSpec::Literal(v) => write!(f, "{v}"),
            WidthSpec::Param(name) => write!(f, "{name}"),
        }
    }
}

/// A record field.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDecl {
    /// Field name.
    pub name: String,
    /// Field type name.
    #[serde(rename = "type")]
    pub ty: String,
    /// Flip the direction of this field relative to the record.
    #[serde(default)]
    pub reverse: bool,
}

/// A component declaration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentDecl {
    /// Generic parameters.
    #[serde(default)]
    pub parameters: Vec<ParamDecl>,
    /// Ports. A port with a `size` becomes an array port.
    #[serde(default)]
    pub ports: Vec<PortDecl>,
    /// Internal signals.
    #[serde(default)]
    pub signals: Vec<SignalDecl>,
    /// Instances of other components.
    #[serde(default)]
    pub instances: Vec<InstanceDecl>,
    /// Connections between component-level nodes and instance ports.
    #[serde(default)]
    pub connections: Vec<ConnectionDecl>,
    /// Marks the component as hand-written and declared in a VHDL package.
    #[serde(default)]
    pub primitive: Option<PrimitiveDecl>,
}

/// A generic parameter.
#[derive(Debug, Clone, Deserialize)]
pub struct ParamDecl {
    /// Parameter name.
    pub name: String,
    /// Parameter type name.
    #[serde(rename = "type")]
    pub ty: String,
    /// Default value.
    #[serde(default)]
    pub default: Option<ValueSpec>,
}

/// A literal value in the description.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ValueSpec {
    /// An integer.
    Int(i64),
    /// A boolean.
    Bool(bool),
    /// A string.
    Str(String),
}

impl fmt::Display for ValueSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSpec::Int(v) => write!(f, "{v}"),
            ValueSpec::Bool(v) => write!(f, "{v}"),
            ValueSpec::Str(s) => write!(f, "\"{s}\""),
        }
    }
}

/// Port direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Input.
    In,
    /// Output.
    Out,
}

/// A port declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct PortDecl {
    /// Port name.
    pub name: String,
    /// Port type name.
    #[serde(rename = "type")]
    pub ty: String,
    /// Port direction.
    pub dir: Direction,
    /// Clock domain name (`default` when omitted).
    #[serde(default)]
    pub domain: Option<String>,
    /// Initial array size; present for array ports.
    #[serde(default)]
    pub size: Option<WidthSpec>,
}

/// A signal declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct SignalDecl {
    /// Signal name.
    pub name: String,
    /// Signal type name.
    #[serde(rename = "type")]
    pub ty: String,
    /// Clock domain name (`default` when omitted).
    #[serde(default)]
    pub domain: Option<String>,
    /// Initial array size; present for array signals.
    #[serde(default)]
    pub size: Option<WidthSpec>,
    /// Probe this stream signal with a stream profiler.
    #[serde(default)]
    pub profile: bool,
}

/// An instance of another component.
#[derive(Debug, Clone, Deserialize)]
pub struct InstanceDecl {
    /// Instance name, `<component>_inst` when omitted.
    #[serde(default)]
    pub name: Option<String>,
    /// Name of the instantiated component.
    pub component: String,
    /// Generic values by parameter name.
    #[serde(default)]
    pub generics: BTreeMap<String, ValueSpec>,
}

/// A connection `dst <= src`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionDecl {
    /// Driven endpoint.
    pub dst: String,
    /// Driving endpoint.
    pub src: String,
}

/// Library and package of a primitive component.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrimitiveDecl {
    /// VHDL library.
    pub library: String,
    /// VHDL package.
    pub package: String,
}

/// A type mapper between two declared types.
#[derive(Debug, Clone, Deserialize)]
pub struct MapperDecl {
    /// Source type name.
    pub from: String,
    /// Destination type name.
    pub to: String,
    /// `(row, column)` pairs into the flattened source and destination.
    #[serde(default)]
    pub pairs: Vec<[usize; 2]>,
    /// Derive the mapping heuristically instead of from `pairs`.
    #[serde(default)]
    pub implicit: bool,
}

/// A parsed connection endpoint: `node` or `instance.node`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint<'a> {
    /// Instance name, `None` for component-level nodes.
    pub instance: Option<&'a str>,
    /// Node name.
    pub node: &'a str,
}

impl<'a> Endpoint<'a> {
    /// Splits an endpoint string at its first `.`.
    pub fn parse(text: &'a str) -> Self {
        match text.split_once('.') {
            Some((instance, node)) => Endpoint {
                instance: Some(instance),
                node,
            },
            None => Endpoint {
                instance: None,
                node: text,
            },
        }
    }
}
