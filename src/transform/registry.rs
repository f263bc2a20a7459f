//! Explicit transformer registry.
//!
//! Maps a normalized name to a factory that builds a transformer instance
//! from an options value. Everything available at runtime was registered
//! here explicitly at startup; there is no implicit name-to-module
//! resolution.

use super::{CopyTransformer, IgnoreTransformer, TransformError, Transformer};
use heck::ToLowerCamelCase;
use std::collections::HashMap;

/// Builds a transformer instance from an optional options value.
pub type TransformerFactory =
    Box<dyn Fn(Option<&serde_json::Value>) -> Result<Box<dyn Transformer>, TransformError>>;

/// Registry of transformer factories keyed by lower-camel-cased name.
#[derive(Default)]
pub struct TransformerRegistry {
    factories: HashMap<String, TransformerFactory>,
}

impl TransformerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the built-in transformers.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("copy", Box::new(|_| Ok(Box::new(CopyTransformer::new()))));
        registry.register("ignore", Box::new(|_| Ok(Box::new(IgnoreTransformer::new()))));
        registry
    }

    /// Normalize a registration name to its lookup key.
    fn key(name: &str) -> String {
        name.to_lower_camel_case()
    }

    /// Register a factory under a normalized name. A later registration
    /// under the same name replaces the earlier one.
    pub fn register(&mut self, name: &str, factory: TransformerFactory) {
        self.factories.insert(Self::key(name), factory);
    }

    /// Whether a factory is registered under this name.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&Self::key(name))
    }

    /// Build a transformer instance by name.
    pub fn build(
        &self,
        name: &str,
        options: Option<&serde_json::Value>,
    ) -> Result<Box<dyn Transformer>, TransformError> {
        let key = Self::key(name);
        let factory = self.factories.get(&key).ok_or_else(|| {
            TransformError::Failed(format!("no transformer registered under '{}'", key))
        })?;
        factory(options)
    }

    /// Registered keys, unordered.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pipeline::FileRecord;
    use crate::io::FileIo;
    use crate::transform::PipelineOutput;

    struct Tagged(String);

    impl Transformer for Tagged {
        fn name(&self) -> &str {
            &self.0
        }
        fn apply(
            &self,
            _files: &[FileRecord],
            _io: &FileIo,
        ) -> Result<PipelineOutput, TransformError> {
            Ok(PipelineOutput::empty())
        }
    }

    #[test]
    fn test_builtins_present() {
        let registry = TransformerRegistry::with_builtins();
        assert!(registry.contains("copy"));
        assert!(registry.contains("ignore"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_name_normalized_to_lower_camel_case() {
        let mut registry = TransformerRegistry::new();
        registry.register("browser-sync", Box::new(|_| Ok(Box::new(Tagged("bs".into())))));

        assert!(registry.contains("browserSync"));
        assert!(registry.contains("browser_sync"));
        assert!(registry.build("browser-sync", None).is_ok());
    }

    #[test]
    fn test_unknown_name_fails() {
        let registry = TransformerRegistry::with_builtins();
        let err = registry.build("uglify", None).unwrap_err();
        assert!(err.to_string().contains("uglify"));
    }

    #[test]
    fn test_factory_receives_options() {
        let mut registry = TransformerRegistry::new();
        registry.register(
            "pick-name",
            Box::new(|opts| {
                let name = opts
                    .and_then(|v| v.get("name"))
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| TransformError::Failed("missing 'name' option".into()))?;
                Ok(Box::new(Tagged(name.to_string())) as Box<dyn Transformer>)
            }),
        );

        let opts = serde_json::json!({ "name": "custom" });
        let built = registry.build("pickName", Some(&opts)).unwrap();
        assert_eq!(built.name(), "custom");

        assert!(registry.build("pickName", None).is_err());
    }

    #[test]
    fn test_later_registration_wins() {
        let mut registry = TransformerRegistry::new();
        registry.register("t", Box::new(|_| Ok(Box::new(Tagged("first".into())))));
        registry.register("t", Box::new(|_| Ok(Box::new(Tagged("second".into())))));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.build("t", None).unwrap().name(), "second");
    }
}
