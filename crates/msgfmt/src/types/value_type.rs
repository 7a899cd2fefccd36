//! Runtime type descriptors and the hierarchy used for formatter resolution.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// The name of a runtime type, used as a formatter registration key.
///
/// Built-in value shapes have constants; host applications create their
/// own descriptors with [`ValueType::new`] and declare them in a
/// [`TypeHierarchy`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValueType(Cow<'static, str>);

impl ValueType {
    /// The universal root type. Every specificity chain ends here.
    pub const OBJECT: ValueType = ValueType(Cow::Borrowed("object"));
    pub const BOOL: ValueType = ValueType(Cow::Borrowed("bool"));
    pub const CHAR: ValueType = ValueType(Cow::Borrowed("char"));
    pub const STRING: ValueType = ValueType(Cow::Borrowed("string"));
    /// Capability shared by textual types.
    pub const TEXT: ValueType = ValueType(Cow::Borrowed("text"));
    pub const NUMBER: ValueType = ValueType(Cow::Borrowed("number"));
    pub const INTEGER: ValueType = ValueType(Cow::Borrowed("integer"));
    pub const FLOAT: ValueType = ValueType(Cow::Borrowed("float"));
    pub const LIST: ValueType = ValueType(Cow::Borrowed("list"));
    /// Capability shared by sequence types.
    pub const ITERABLE: ValueType = ValueType(Cow::Borrowed("iterable"));
    /// Primitive reported by [`Value::Integer`](crate::Value::Integer).
    pub const I64: ValueType = ValueType(Cow::Borrowed("i64"));
    /// Primitive reported by [`Value::Float`](crate::Value::Float).
    pub const F64: ValueType = ValueType(Cow::Borrowed("f64"));

    /// Create a descriptor for a host-defined type.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        ValueType(name.into())
    }

    /// The type name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default)]
struct TypeInfo {
    parent: Option<ValueType>,
    capabilities: Vec<ValueType>,
}

/// Declared relationships between value types.
///
/// Each type has an optional parent and an ordered list of capabilities
/// (capabilities may themselves extend other capabilities). Primitive
/// types may name a boxed counterpart that resolution retries under when
/// the primitive has no direct formatter mapping.
#[derive(Debug, Clone)]
pub struct TypeHierarchy {
    types: BTreeMap<ValueType, TypeInfo>,
    boxed: BTreeMap<ValueType, ValueType>,
}

impl Default for TypeHierarchy {
    fn default() -> Self {
        let mut hierarchy = TypeHierarchy::empty();
        hierarchy.declare_capability(ValueType::TEXT, &[]);
        hierarchy.declare_capability(ValueType::ITERABLE, &[]);
        hierarchy.declare_type(ValueType::BOOL, ValueType::OBJECT, &[]);
        hierarchy.declare_type(ValueType::CHAR, ValueType::OBJECT, &[]);
        hierarchy.declare_type(ValueType::STRING, ValueType::OBJECT, &[ValueType::TEXT]);
        hierarchy.declare_type(ValueType::NUMBER, ValueType::OBJECT, &[]);
        hierarchy.declare_type(ValueType::INTEGER, ValueType::NUMBER, &[]);
        hierarchy.declare_type(ValueType::FLOAT, ValueType::NUMBER, &[]);
        hierarchy.declare_type(ValueType::LIST, ValueType::OBJECT, &[ValueType::ITERABLE]);
        hierarchy.declare_type(ValueType::I64, ValueType::OBJECT, &[]);
        hierarchy.declare_type(ValueType::F64, ValueType::OBJECT, &[]);
        hierarchy.declare_boxed(ValueType::I64, ValueType::INTEGER);
        hierarchy.declare_boxed(ValueType::F64, ValueType::FLOAT);
        hierarchy
    }
}

impl TypeHierarchy {
    /// The built-in hierarchy for [`Value`](crate::Value) shapes.
    pub fn new() -> Self {
        Self::default()
    }

    /// A hierarchy containing only the root type.
    pub fn empty() -> Self {
        let mut types = BTreeMap::new();
        types.insert(ValueType::OBJECT, TypeInfo::default());
        TypeHierarchy {
            types,
            boxed: BTreeMap::new(),
        }
    }

    /// Declare (or redeclare) a concrete type with its parent and capabilities.
    pub fn declare_type(
        &mut self,
        value_type: ValueType,
        parent: ValueType,
        capabilities: &[ValueType],
    ) {
        self.types.insert(
            value_type,
            TypeInfo {
                parent: Some(parent),
                capabilities: capabilities.to_vec(),
            },
        );
    }

    /// Declare a capability, optionally extending other capabilities.
    pub fn declare_capability(&mut self, capability: ValueType, extends: &[ValueType]) {
        self.types.insert(
            capability,
            TypeInfo {
                parent: None,
                capabilities: extends.to_vec(),
            },
        );
    }

    /// Declare `boxed` as the fallback type for the primitive `primitive`.
    pub fn declare_boxed(&mut self, primitive: ValueType, boxed: ValueType) {
        self.boxed.insert(primitive, boxed);
    }

    /// The boxed counterpart of a primitive type, if one is declared.
    pub fn boxed(&self, primitive: &ValueType) -> Option<&ValueType> {
        self.boxed.get(primitive)
    }

    /// Whether the type has been declared.
    pub fn contains(&self, value_type: &ValueType) -> bool {
        self.types.contains_key(value_type)
    }

    /// Whether `value_type` is `ancestor` or reaches it through parents or
    /// capabilities.
    pub fn is_a(&self, value_type: &ValueType, ancestor: &ValueType) -> bool {
        self.specificity_chain(value_type).contains(ancestor)
    }

    /// The types to consult, most specific first, when resolving
    /// formatters for `value_type`.
    ///
    /// The chain lists the type, its capabilities (depth first, in
    /// declaration order), then repeats for each parent. It always ends
    /// with [`ValueType::OBJECT`]. Unknown types go straight to the root.
    pub fn specificity_chain(&self, value_type: &ValueType) -> Vec<ValueType> {
        let mut chain = Vec::new();
        let mut current = Some(value_type.clone());

        while let Some(ty) = current {
            if chain.contains(&ty) {
                break;
            }
            chain.push(ty.clone());
            let info = self.types.get(&ty);
            if let Some(info) = info {
                for capability in &info.capabilities {
                    self.collect_capabilities(capability, &mut chain);
                }
            }
            current = match info.and_then(|info| info.parent.clone()) {
                Some(parent) => Some(parent),
                None if ty != ValueType::OBJECT => Some(ValueType::OBJECT),
                None => None,
            };
        }

        if chain.last() != Some(&ValueType::OBJECT) {
            chain.retain(|ty| *ty != ValueType::OBJECT);
            chain.push(ValueType::OBJECT);
        }
        chain
    }

    fn collect_capabilities(&self, capability: &ValueType, chain: &mut Vec<ValueType>) {
        if chain.contains(capability) {
            return;
        }
        chain.push(capability.clone());
        if let Some(info) = self.types.get(capability) {
            for extended in &info.capabilities {
                self.collect_capabilities(extended, chain);
            }
        }
    }
}
