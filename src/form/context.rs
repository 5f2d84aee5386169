//! Collaborators shared by every field of a model

use std::rc::Rc;

use crate::config::FormConfig;
use crate::i18n::{
    CatalogLocalizer, CodeTranslator, ErrorTranslator, KeyLocalizer, Localizer,
    PropertyNames, RawPropertyNames,
};
use crate::schema::FormResult;

/// Localization, error translation and naming services for a form.
///
/// Cheap to clone.
#[derive(Clone)]
pub struct FormContext {
    pub localizer: Rc<dyn Localizer>,
    pub translator: Rc<dyn ErrorTranslator>,
    pub property_names: Rc<dyn PropertyNames>,
    pub generic_error_key: String,
    pub aggregate_separator: String,
}

impl Default for FormContext {
    fn default() -> Self {
        Self::with_localizer(Rc::new(KeyLocalizer), &FormConfig::default())
    }
}

impl FormContext {
    /// Wires the collaborators described by `config`
    pub fn from_config(config: &FormConfig) -> FormResult<Self> {
        let localizer: Rc<dyn Localizer> = match &config.messages {
            Some(path) => Rc::new(CatalogLocalizer::load(path)?),
            None => Rc::new(KeyLocalizer),
        };
        Ok(Self::with_localizer(localizer, config))
    }

    fn with_localizer(localizer: Rc<dyn Localizer>, config: &FormConfig) -> Self {
        let translator = CodeTranslator::new(Rc::clone(&localizer), &config.error_code_prefix);
        Self {
            localizer,
            translator: Rc::new(translator),
            property_names: Rc::new(RawPropertyNames),
            generic_error_key: config.generic_error_key.clone(),
            aggregate_separator: config.aggregate_separator.clone(),
        }
    }

    /// Replaces the localizer; an already-wired translator keeps its own
    pub fn localizer(mut self, localizer: Rc<dyn Localizer>) -> Self {
        self.localizer = localizer;
        self
    }

    pub fn translator(mut self, translator: Rc<dyn ErrorTranslator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn property_names(mut self, names: Rc<dyn PropertyNames>) -> Self {
        self.property_names = names;
        self
    }

    /// The generic error message for responses without structured errors
    pub fn generic_error(&self) -> String {
        self.localizer.get(&self.generic_error_key, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::keys;
    use std::collections::HashMap;

    #[test]
    fn test_default_context_echoes_keys() {
        let ctx = FormContext::default();
        assert_eq!(ctx.generic_error(), "[GENERICERRORMESSAGE]");
        assert_eq!(ctx.generic_error_key, keys::GENERIC_ERROR);
    }

    #[test]
    fn test_catalog_localizer_override() {
        let mut messages = HashMap::new();
        messages.insert("GenericErrorMessage".to_string(), "Try again".to_string());
        let ctx = FormContext::default().localizer(Rc::new(CatalogLocalizer::new(messages)));
        assert_eq!(ctx.generic_error(), "Try again");
    }
}
