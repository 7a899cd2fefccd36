//! Formatter registration and type-based resolution.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::cache::BoundedLruCache;
use crate::formatter::{
    BoolFormatter, ClipFormatter, FormattableType, FormatterChain, ListFormatter, NumberFormatter,
    ParameterFormatter, StringFormatter,
};
use crate::message::ConfigError;
use crate::types::{TypeHierarchy, ValueType};

/// Number of resolved chains kept by default.
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

struct TypeMapping {
    formatter: Arc<dyn ParameterFormatter>,
    order: u8,
    /// Registration sequence; breaks ties between equal orders.
    sequence: u64,
}

#[derive(Clone)]
struct CachedChain {
    formatters: Arc<[Arc<dyn ParameterFormatter>]>,
    ends_with_default: bool,
}

struct ResolutionCache {
    /// Registry generation the cached chains were computed for.
    generation: u64,
    chains: BoundedLruCache<ValueType, CachedChain>,
}

/// A registry of formatters with a bounded resolution cache.
///
/// Registration requires `&mut self` and therefore happens before the
/// registry is shared. Resolution takes `&self`; the cache is guarded by a
/// mutex and stamped with the registry generation, which every
/// registration increments, so stale chains are never served.
///
/// # Example
///
/// ```
/// use msgfmt::{FormatterRegistry, ValueType};
///
/// let registry = FormatterRegistry::with_default_formatters();
/// let chain = registry.resolve(None, &ValueType::I64);
/// assert_eq!(chain.len(), 2);
/// assert!(chain.ends_with_default());
///
/// let named = registry.resolve(Some("clip"), &ValueType::STRING);
/// assert_eq!(named.formatters()[0].name(), Some("clip"));
/// ```
pub struct FormatterRegistry {
    named: BTreeMap<String, Arc<dyn ParameterFormatter>>,
    typed: BTreeMap<ValueType, TypeMapping>,
    hierarchy: TypeHierarchy,
    default_formatter: Arc<dyn ParameterFormatter>,
    sequence: u64,
    generation: u64,
    cache: Mutex<ResolutionCache>,
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::build(BoundedLruCache::clamped(DEFAULT_CACHE_CAPACITY))
    }
}

impl FormatterRegistry {
    /// A registry containing only the root formatter.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in formatter catalog.
    pub fn with_default_formatters() -> Self {
        let mut registry = Self::new();
        registry.register_default_formatters();
        registry
    }

    /// A registry containing only the root formatter, caching up to
    /// `capacity` resolved chains. The capacity must be at least 2.
    pub fn with_cache_capacity(capacity: usize) -> Result<Self, ConfigError> {
        Ok(Self::build(BoundedLruCache::new(capacity)?))
    }

    fn build(chains: BoundedLruCache<ValueType, CachedChain>) -> Self {
        let default_formatter: Arc<dyn ParameterFormatter> = Arc::new(StringFormatter);
        let mut registry = FormatterRegistry {
            named: BTreeMap::new(),
            typed: BTreeMap::new(),
            hierarchy: TypeHierarchy::default(),
            default_formatter: Arc::clone(&default_formatter),
            sequence: 0,
            generation: 0,
            cache: Mutex::new(ResolutionCache {
                generation: 0,
                chains,
            }),
        };
        for formattable in default_formatter.formattable_types() {
            registry.register_for_type(Arc::clone(&default_formatter), formattable);
        }
        registry
    }

    /// Register the built-in catalog: number, bool, list and clip.
    pub fn register_default_formatters(&mut self) {
        let formatters: [Arc<dyn ParameterFormatter>; 4] = [
            Arc::new(NumberFormatter),
            Arc::new(BoolFormatter),
            Arc::new(ListFormatter),
            Arc::new(ClipFormatter),
        ];
        for formatter in formatters {
            self.insert(formatter);
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register `formatter` under its name (if any) and every type it claims.
    pub fn register(&mut self, formatter: Arc<dyn ParameterFormatter>) -> Result<(), ConfigError> {
        if formatter.name().is_some_and(str::is_empty) {
            return Err(ConfigError::EmptyFormatterName);
        }
        self.insert(formatter);
        Ok(())
    }

    /// Register `formatter` under its name only.
    pub fn register_named(
        &mut self,
        formatter: Arc<dyn ParameterFormatter>,
    ) -> Result<(), ConfigError> {
        let Some(name) = non_empty_name(formatter.as_ref()) else {
            return Err(ConfigError::EmptyFormatterName);
        };
        self.insert_named(name, formatter);
        Ok(())
    }

    /// Register a formatter whose name, if any, is known to be non-empty.
    fn insert(&mut self, formatter: Arc<dyn ParameterFormatter>) {
        if let Some(name) = non_empty_name(formatter.as_ref()) {
            self.insert_named(name, Arc::clone(&formatter));
        }
        for formattable in formatter.formattable_types() {
            self.register_for_type(Arc::clone(&formatter), formattable);
        }
    }

    fn insert_named(&mut self, name: String, formatter: Arc<dyn ParameterFormatter>) {
        debug!(formatter = %name, "registered named formatter");
        self.named.insert(name, formatter);
        self.bump_generation();
    }

    /// Map `formattable.value_type` to `formatter`, replacing any previous
    /// mapping for that type.
    pub fn register_for_type(
        &mut self,
        formatter: Arc<dyn ParameterFormatter>,
        formattable: FormattableType,
    ) {
        self.sequence += 1;
        debug!(
            value_type = %formattable.value_type,
            order = formattable.order,
            "registered formatter for type"
        );
        self.typed.insert(
            formattable.value_type,
            TypeMapping {
                formatter,
                order: formattable.order,
                sequence: self.sequence,
            },
        );
        self.bump_generation();
    }

    /// Change the order of an existing type mapping.
    ///
    /// Returns `false` when no formatter is mapped to `value_type`.
    pub fn set_type_order(&mut self, value_type: &ValueType, order: u8) -> bool {
        let Some(mapping) = self.typed.get_mut(value_type) else {
            return false;
        };
        mapping.order = order;
        self.bump_generation();
        true
    }

    /// The type hierarchy used for resolution.
    pub fn hierarchy(&self) -> &TypeHierarchy {
        &self.hierarchy
    }

    /// Mutable access to the type hierarchy. Invalidates cached chains.
    pub fn hierarchy_mut(&mut self) -> &mut TypeHierarchy {
        self.bump_generation();
        &mut self.hierarchy
    }

    fn bump_generation(&mut self) {
        self.generation += 1;
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// The registration generation; increases with every registration.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The root formatter, mapped to [`ValueType::OBJECT`].
    pub fn default_formatter(&self) -> &Arc<dyn ParameterFormatter> {
        &self.default_formatter
    }

    /// The formatter registered under `name`.
    pub fn named(&self, name: &str) -> Option<&Arc<dyn ParameterFormatter>> {
        self.named.get(name)
    }

    /// The formatter mapped directly to `value_type`.
    pub fn formatter_for_type(&self, value_type: &ValueType) -> Option<&Arc<dyn ParameterFormatter>> {
        self.typed.get(value_type).map(|mapping| &mapping.formatter)
    }

    /// Types whose chains are currently cached, in key order.
    pub fn cached_types(&self) -> Vec<ValueType> {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if cache.generation != self.generation {
            return Vec::new();
        }
        cache.chains.keys().cloned().collect()
    }

    /// Resolve the formatter chain for a value of `value_type`.
    ///
    /// A registered `format` name whose formatter accepts the type yields a
    /// single-formatter chain. Otherwise the chain lists every formatter
    /// mapped along the type's specificity chain, ordered by mapping order
    /// and then registration sequence. Resolution always succeeds: the
    /// root formatter terminates every chain.
    pub fn resolve(&self, format: Option<&str>, value_type: &ValueType) -> FormatterChain {
        if let Some(formatter) = format.and_then(|name| self.named.get(name)) {
            if formatter.can_format(value_type, &self.hierarchy) {
                let ends_with_default = Arc::ptr_eq(formatter, &self.default_formatter);
                return FormatterChain::new(Arc::from([Arc::clone(formatter)]), ends_with_default);
            }
        }

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if cache.generation != self.generation {
            debug!(
                from = cache.generation,
                to = self.generation,
                "formatter cache invalidated"
            );
            cache.chains.clear();
            cache.generation = self.generation;
        }

        if let Some(cached) = cache.chains.get(value_type) {
            return FormatterChain::new(Arc::clone(&cached.formatters), cached.ends_with_default);
        }

        let resolved = self.compute_chain(value_type);
        debug!(value_type = %value_type, formatters = resolved.formatters.len(), "resolved formatter chain");
        let chain = FormatterChain::new(Arc::clone(&resolved.formatters), resolved.ends_with_default);
        cache.chains.put(value_type.clone(), resolved);
        chain
    }

    fn compute_chain(&self, value_type: &ValueType) -> CachedChain {
        let lookup_type = match self.hierarchy.boxed(value_type) {
            Some(boxed) if !self.typed.contains_key(value_type) => boxed,
            _ => value_type,
        };

        let mut mappings: Vec<&TypeMapping> = self
            .hierarchy
            .specificity_chain(lookup_type)
            .iter()
            .filter_map(|ty| self.typed.get(ty))
            .collect();
        mappings.sort_by_key(|mapping| (mapping.order, mapping.sequence));

        let mut formatters: Vec<Arc<dyn ParameterFormatter>> = Vec::with_capacity(mappings.len());
        for mapping in mappings {
            if !formatters
                .iter()
                .any(|known| Arc::ptr_eq(known, &mapping.formatter))
            {
                formatters.push(Arc::clone(&mapping.formatter));
            }
        }
        if formatters.is_empty() {
            formatters.push(Arc::clone(&self.default_formatter));
        }

        let ends_with_default = formatters
            .last()
            .is_some_and(|last| Arc::ptr_eq(last, &self.default_formatter));
        CachedChain {
            formatters: formatters.into(),
            ends_with_default,
        }
    }
}

fn non_empty_name(formatter: &dyn ParameterFormatter) -> Option<String> {
    formatter
        .name()
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field("named", &self.named.keys().collect::<Vec<_>>())
            .field("typed", &self.typed.keys().collect::<Vec<_>>())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
