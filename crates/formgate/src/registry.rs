//! Registry of named forms
//!
//! Maps a form name to the factory that builds its schema and the handler
//! that receives it once valid. The registry is an owned value shared by
//! reference; the lock is only held for a lookup or an insert.

use crate::error::Result;
use crate::schema::check_schema;
use crate::submit::{BoxedSubmitHandler, SubmitHandler};
use crate::types::Form;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Side-effect-free factory for a form schema
pub type SchemaFn = Arc<dyn Fn() -> Form + Send + Sync>;

/// One registered form
pub struct FormEntry {
    schema: SchemaFn,
    submit: BoxedSubmitHandler,
}

impl FormEntry {
    /// Build a fresh copy of the schema
    pub fn schema(&self) -> Form {
        (self.schema)()
    }

    pub fn submit_handler(&self) -> &BoxedSubmitHandler {
        &self.submit
    }
}

/// Thread-safe map from form name to [`FormEntry`]
#[derive(Default)]
pub struct FormRegistry {
    entries: RwLock<HashMap<String, Arc<FormEntry>>>,
}

impl FormRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema factory and its submit handler.
    ///
    /// The factory is called once to read the form name and check the
    /// schema. A form registered under an existing name replaces it.
    pub fn add<S, H>(&self, schema: S, submit: H) -> Result<String>
    where
        S: Fn() -> Form + Send + Sync + 'static,
        H: SubmitHandler + 'static,
    {
        self.add_shared(Arc::new(schema), Arc::new(submit))
    }

    /// Register a fixed schema; every lookup returns a clone of it
    pub fn add_form<H>(&self, form: Form, submit: H) -> Result<String>
    where
        H: SubmitHandler + 'static,
    {
        self.add(move || form.clone(), submit)
    }

    /// Register with already shared factory and handler
    pub fn add_shared(&self, schema: SchemaFn, submit: BoxedSubmitHandler) -> Result<String> {
        let form = schema();
        check_schema(&form)?;

        let name = form.name.clone();
        let entry = Arc::new(FormEntry { schema, submit });

        let replaced = self.entries.write().insert(name.clone(), entry).is_some();
        if replaced {
            warn!(form = %name, "replaced previously registered form");
        } else {
            info!(form = %name, fields = form.fields.len(), "registered form");
        }

        Ok(name)
    }

    /// Look up a form entry
    pub fn entry(&self, name: &str) -> Option<Arc<FormEntry>> {
        self.entries.read().get(name).cloned()
    }

    /// Fresh schema for `name`, built outside the lock
    pub fn schema(&self, name: &str) -> Option<Form> {
        self.entry(name).map(|entry| entry.schema())
    }

    pub fn remove(&self, name: &str) -> bool {
        self.entries.write().remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl fmt::Debug for FormRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormRegistry")
            .field("forms", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormError;
    use crate::submit::EchoSubmitHandler;
    use crate::types::{Field, TextField};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn contact() -> Form {
        Form::new("contact").field(Field::text("email", TextField::new()))
    }

    #[test]
    fn test_add_and_lookup() {
        let registry = FormRegistry::new();
        let name = registry.add(contact, EchoSubmitHandler).unwrap();

        assert_eq!(name, "contact");
        assert!(registry.contains("contact"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.schema("contact"), Some(contact()));
        assert!(registry.schema("other").is_none());
    }

    #[test]
    fn test_schema_built_fresh_per_lookup() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let registry = FormRegistry::new();
        registry
            .add(
                move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    contact()
                },
                EchoSubmitHandler,
            )
            .unwrap();

        // One call at registration, one per lookup
        let mut first = registry.schema("contact").unwrap();
        first.valid = true;
        let second = registry.schema("contact").unwrap();
        assert!(!second.valid);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_replace_existing_name() {
        let registry = FormRegistry::new();
        registry.add(contact, EchoSubmitHandler).unwrap();
        registry
            .add_form(
                Form::new("contact").field(Field::text("phone", TextField::new())),
                EchoSubmitHandler,
            )
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.schema("contact").unwrap().fields[0].name, "phone");
    }

    #[test]
    fn test_invalid_schema_not_registered() {
        let registry = FormRegistry::new();
        let err = registry.add(Form::default, EchoSubmitHandler).unwrap_err();
        assert!(matches!(err, FormError::InvalidSchema(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_names_sorted_and_remove() {
        let registry = FormRegistry::new();
        registry.add_form(Form::new("zeta"), EchoSubmitHandler).unwrap();
        registry.add_form(Form::new("alpha"), EchoSubmitHandler).unwrap();
        assert_eq!(registry.names(), vec!["alpha", "zeta"]);

        assert!(registry.remove("alpha"));
        assert!(!registry.remove("alpha"));
        assert_eq!(registry.names(), vec!["zeta"]);
    }

    #[test]
    fn test_debug_lists_names() {
        let registry = FormRegistry::new();
        registry.add_form(Form::new("a"), EchoSubmitHandler).unwrap();
        assert_eq!(format!("{:?}", registry), "FormRegistry { forms: [\"a\"] }");
    }
}
