//! Localization collaborators
//!
//! The form layer never builds display text itself. It asks a [`Localizer`]
//! for messages by key, an [`ErrorTranslator`] for server errors, and a
//! [`PropertyNames`] source for human-readable property names.

mod localizer;
mod translate;

use std::rc::Rc;

pub use localizer::{CatalogLocalizer, KeyLocalizer, Localizer, MessageParams};
pub use translate::{ApiErrorEntry, ApiResponse, CodeTranslator, ErrorAdapter, ErrorTranslator};

/// Message keys used by the form layer
pub mod keys {
    pub const REQUIRED_FIELD: &str = "Validation_NotEmpty_Required_Field";
    pub const NUMBER_RANGE_BETWEEN: &str = "Validation_Number_Range_Between";
    pub const NUMBER_RANGE_MIN: &str = "Validation_Number_Range_Min";
    pub const NUMBER_RANGE_MAX: &str = "Validation_Number_Range_Max";
    pub const NUMBER_SIZE_DIGITS: &str = "Validation_Number_Size_Digits";
    pub const STRING_SIZE_MAX: &str = "Validation_String_Size_Max";
    pub const ENUM_INVALID: &str = "Validation_Enum_Invalid";

    pub const REMAINING_CHARACTERS: &str = "RemainingCharactersText_New";
    pub const EXCEEDED_CHARACTERS: &str = "ExceededCharactersText_New";
    pub const REMAINING_CHARACTERS_AGGREGATE: &str = "RemainingCharactersText_Aggregate";

    pub const GENERIC_ERROR: &str = "GenericErrorMessage";
}

/// Human-readable property names
pub trait PropertyNames {
    fn display_name(&self, schema: &str, property: &str) -> String;
}

/// Uses the property key as its display name
#[derive(Debug, Clone, Copy, Default)]
pub struct RawPropertyNames;

impl PropertyNames for RawPropertyNames {
    fn display_name(&self, _schema: &str, property: &str) -> String {
        property.to_string()
    }
}

/// Looks property names up as `Property_<schema>_<property>`
pub struct LocalizedPropertyNames {
    localizer: Rc<dyn Localizer>,
}

impl LocalizedPropertyNames {
    pub fn new(localizer: Rc<dyn Localizer>) -> Self {
        Self { localizer }
    }
}

impl PropertyNames for LocalizedPropertyNames {
    fn display_name(&self, schema: &str, property: &str) -> String {
        let key = format!("Property_{}_{}", schema.replace(' ', ""), property);
        self.localizer.get(&key, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_raw_names() {
        assert_eq!(RawPropertyNames.display_name("mail", "subject"), "subject");
    }

    #[test]
    fn test_localized_names() {
        let mut messages = HashMap::new();
        messages.insert("Property_Mail_subject".to_string(), "Subject line".to_string());
        let names = LocalizedPropertyNames::new(Rc::new(CatalogLocalizer::new(messages)));

        assert_eq!(names.display_name("Mail", "subject"), "Subject line");
        assert_eq!(names.display_name("Mail", "preview"), "[PROPERTY_MAIL_PREVIEW]");
    }
}
