//! `SerializerBuilder`: accumulates settings and collaborators.

use super::{
    AccessorStrategy, AnnotationReader, BuilderError, CamelCaseNamingStrategy,
    DeserializationContextFactory, DeserializationVisitorFactory, EventDispatcher, EventSubscriber,
    ExpressionEvaluator, HandlerRegistry, MetadataCache, MetadataDriverFactory, ObjectConstructor,
    PropertyNamingStrategy, SerializationContextFactory, SerializationVisitorFactory, Serializer,
    SubscribingHandler, TypeParser, event, handler, visitor,
};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Visitors keyed by format, in registration order.
pub(super) type Visitors<V> = Vec<(String, Arc<V>)>;

/// Builder for [`Serializer`].
///
/// Handlers, listeners and visitors fall back to defaults at [`build`] time
/// unless something configured them explicitly.
///
/// [`build`]: SerializerBuilder::build
#[derive(Default)]
pub struct SerializerBuilder {
    accessor_strategy: Option<Arc<dyn AccessorStrategy>>,
    expression_evaluator: Option<Arc<dyn ExpressionEvaluator>>,
    type_parser: Option<Arc<dyn TypeParser>>,
    annotation_reader: Option<Arc<dyn AnnotationReader>>,
    object_constructor: Option<Arc<dyn ObjectConstructor>>,
    property_naming_strategy: Option<Arc<dyn PropertyNamingStrategy>>,
    metadata_driver_factory: Option<Arc<dyn MetadataDriverFactory>>,
    serialization_context_factory: Option<Arc<dyn SerializationContextFactory>>,
    deserialization_context_factory: Option<Arc<dyn DeserializationContextFactory>>,
    metadata_cache: Option<Arc<dyn MetadataCache>>,

    debug: bool,
    cache_dir: Option<PathBuf>,
    include_interface_metadata: bool,
    metadata_dirs: Vec<(String, PathBuf)>,
    docblock_type_resolver: bool,

    handlers: HandlerRegistry,
    handlers_configured: bool,
    listeners: EventDispatcher,
    listeners_configured: bool,

    serialization_visitors: Visitors<dyn SerializationVisitorFactory>,
    serialization_visitors_added: bool,
    deserialization_visitors: Visitors<dyn DeserializationVisitorFactory>,
    deserialization_visitors_added: bool,
}

impl SerializerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Collaborators
    // ========================================================================

    pub fn set_accessor_strategy(&mut self, strategy: Arc<dyn AccessorStrategy>) -> &mut Self {
        self.accessor_strategy = Some(strategy);
        self
    }

    pub fn set_expression_evaluator(&mut self, evaluator: Arc<dyn ExpressionEvaluator>) -> &mut Self {
        self.expression_evaluator = Some(evaluator);
        self
    }

    pub fn set_type_parser(&mut self, parser: Arc<dyn TypeParser>) -> &mut Self {
        self.type_parser = Some(parser);
        self
    }

    pub fn set_annotation_reader(&mut self, reader: Arc<dyn AnnotationReader>) -> &mut Self {
        self.annotation_reader = Some(reader);
        self
    }

    pub fn set_object_constructor(&mut self, constructor: Arc<dyn ObjectConstructor>) -> &mut Self {
        self.object_constructor = Some(constructor);
        self
    }

    pub fn set_property_naming_strategy(
        &mut self,
        strategy: Arc<dyn PropertyNamingStrategy>,
    ) -> &mut Self {
        self.property_naming_strategy = Some(strategy);
        self
    }

    pub fn set_metadata_driver_factory(
        &mut self,
        factory: Arc<dyn MetadataDriverFactory>,
    ) -> &mut Self {
        self.metadata_driver_factory = Some(factory);
        self
    }

    pub fn set_serialization_context_factory(
        &mut self,
        factory: Arc<dyn SerializationContextFactory>,
    ) -> &mut Self {
        self.serialization_context_factory = Some(factory);
        self
    }

    pub fn set_deserialization_context_factory(
        &mut self,
        factory: Arc<dyn DeserializationContextFactory>,
    ) -> &mut Self {
        self.deserialization_context_factory = Some(factory);
        self
    }

    pub fn set_metadata_cache(&mut self, cache: Arc<dyn MetadataCache>) -> &mut Self {
        self.metadata_cache = Some(cache);
        self
    }

    // ========================================================================
    // Settings
    // ========================================================================

    pub fn set_debug(&mut self, debug: bool) -> &mut Self {
        self.debug = debug;
        self
    }

    /// Use `dir` for cached metadata, creating it when missing.
    pub fn set_cache_dir(&mut self, dir: impl AsRef<Path>) -> Result<&mut Self, BuilderError> {
        let dir = dir.as_ref();
        create_dir(dir)?;
        self.cache_dir = Some(dir.to_path_buf());
        Ok(self)
    }

    pub fn include_interface_metadata(&mut self, include: bool) -> &mut Self {
        self.include_interface_metadata = include;
        self
    }

    /// Replace the metadata directories. Every directory must exist.
    pub fn set_metadata_dirs<I, N, P>(&mut self, dirs: I) -> Result<&mut Self, BuilderError>
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: Into<PathBuf>,
    {
        let mut checked = Vec::new();
        for (namespace, path) in dirs {
            let (namespace, path) = (namespace.into(), path.into());
            if !path.is_dir() {
                return Err(BuilderError::MissingMetadataDir { namespace, path });
            }
            checked.push((namespace, path));
        }
        self.metadata_dirs = checked;
        Ok(self)
    }

    pub fn set_docblock_type_resolver(&mut self, enabled: bool) -> &mut Self {
        self.docblock_type_resolver = enabled;
        self
    }

    // ========================================================================
    // Handlers and listeners
    // ========================================================================

    /// Register handlers directly. Disables the default handlers.
    pub fn configure_handlers(&mut self, configure: impl FnOnce(&mut HandlerRegistry)) -> &mut Self {
        self.handlers_configured = true;
        configure(&mut self.handlers);
        self
    }

    pub fn add_default_handlers(&mut self) -> &mut Self {
        self.handlers_configured = true;
        for handler in handler::default_handlers() {
            self.handlers.register_subscribing_handler(handler);
        }
        self
    }

    /// Register event subscribers directly. Disables the default listeners.
    pub fn configure_listeners(&mut self, configure: impl FnOnce(&mut EventDispatcher)) -> &mut Self {
        self.listeners_configured = true;
        configure(&mut self.listeners);
        self
    }

    pub fn add_default_listeners(&mut self) -> &mut Self {
        self.listeners_configured = true;
        for listener in event::default_listeners() {
            self.listeners.add_subscriber(listener);
        }
        self
    }

    /// Shorthand for registering a single handler.
    pub fn add_handler(&mut self, handler: Arc<dyn SubscribingHandler>) -> &mut Self {
        self.configure_handlers(|registry| registry.register_subscribing_handler(handler))
    }

    /// Shorthand for registering a single subscriber.
    pub fn add_listener(&mut self, listener: Arc<dyn EventSubscriber>) -> &mut Self {
        self.configure_listeners(|dispatcher| dispatcher.add_subscriber(listener))
    }

    // ========================================================================
    // Visitors
    // ========================================================================

    /// Set the visitor for `format`, replacing any earlier one.
    pub fn set_serialization_visitor(
        &mut self,
        format: impl Into<String>,
        visitor: Arc<dyn SerializationVisitorFactory>,
    ) -> &mut Self {
        self.serialization_visitors_added = true;
        put_visitor(&mut self.serialization_visitors, format.into(), visitor);
        self
    }

    /// Set the visitor for `format`, replacing any earlier one.
    pub fn set_deserialization_visitor(
        &mut self,
        format: impl Into<String>,
        visitor: Arc<dyn DeserializationVisitorFactory>,
    ) -> &mut Self {
        self.deserialization_visitors_added = true;
        put_visitor(&mut self.deserialization_visitors, format.into(), visitor);
        self
    }

    pub fn add_default_serialization_visitors(&mut self) -> &mut Self {
        self.serialization_visitors_added = true;
        for (format, visitor) in visitor::default_serialization_visitors() {
            put_visitor(&mut self.serialization_visitors, format, visitor);
        }
        self
    }

    pub fn add_default_deserialization_visitors(&mut self) -> &mut Self {
        self.deserialization_visitors_added = true;
        for (format, visitor) in visitor::default_deserialization_visitors() {
            put_visitor(&mut self.deserialization_visitors, format, visitor);
        }
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Apply pending defaults and produce the serializer.
    ///
    /// With a cache directory, the `metadata` subdirectory is created here.
    pub fn build(mut self) -> Result<Serializer, BuilderError> {
        if !self.handlers_configured {
            self.add_default_handlers();
        }
        if !self.listeners_configured {
            self.add_default_listeners();
        }
        if !self.serialization_visitors_added {
            self.add_default_serialization_visitors();
        }
        if !self.deserialization_visitors_added {
            self.add_default_deserialization_visitors();
        }
        if let Some(dir) = &self.cache_dir {
            create_dir(&dir.join("metadata"))?;
        }

        let naming = self
            .property_naming_strategy
            .clone()
            .unwrap_or_else(|| Arc::new(CamelCaseNamingStrategy::default()));

        let settings = self.settings();
        crate::debug!(
            "build";
            "serializer with {} handlers, {} listeners",
            self.handlers.len(),
            self.listeners.len()
        );

        Ok(Serializer {
            naming,
            handlers: self.handlers,
            listeners: self.listeners,
            serialization_visitors: self.serialization_visitors,
            deserialization_visitors: self.deserialization_visitors,
            settings,
        })
    }

    fn settings(&self) -> super::Settings {
        super::Settings {
            accessor_strategy: self.accessor_strategy.clone(),
            expression_evaluator: self.expression_evaluator.clone(),
            type_parser: self.type_parser.clone(),
            annotation_reader: self.annotation_reader.clone(),
            object_constructor: self.object_constructor.clone(),
            property_naming_strategy: self.property_naming_strategy.clone(),
            metadata_driver_factory: self.metadata_driver_factory.clone(),
            serialization_context_factory: self.serialization_context_factory.clone(),
            deserialization_context_factory: self.deserialization_context_factory.clone(),
            metadata_cache: self.metadata_cache.clone(),
            debug: self.debug,
            cache_dir: self.cache_dir.clone(),
            include_interface_metadata: self.include_interface_metadata,
            metadata_dirs: self.metadata_dirs.clone(),
            docblock_type_resolver: self.docblock_type_resolver,
        }
    }
}

fn put_visitor<V: ?Sized>(visitors: &mut Visitors<V>, format: String, visitor: Arc<V>) {
    match visitors.iter_mut().find(|(known, _)| *known == format) {
        Some(slot) => slot.1 = visitor,
        None => visitors.push((format, visitor)),
    }
}

fn create_dir(dir: &Path) -> Result<(), BuilderError> {
    if dir.exists() {
        if dir.is_dir() {
            return Ok(());
        }
        return Err(BuilderError::NotADirectory(dir.to_path_buf()));
    }
    fs::create_dir_all(dir).map_err(|source| BuilderError::CacheDir {
        path: dir.to_path_buf(),
        source,
    })
}
