//! Field kinds and their validator composition
//!
//! Each kind declares its validator list as an ordered table of
//! `(enabled, validator)` steps, resolved once when the field is built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::{FieldError, FieldResult};
use super::options::FieldOptions;
use crate::validation::validators::{self as v, Validator};

/// Built-in address pattern for email fields
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Built-in pattern for URL fields
pub const URL_PATTERN: &str = r"(?i)^(https?|ftp)://[^\s/$.?#][^\s]*$";

/// Supported field kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Url,
    Number,
    Integer,
    AutoNumber,
    Boolean,
    Select,
    MultiSelect,
    Date,
    Time,
    DateTime,
    Related,
    RelatedList,
}

impl FieldKind {
    pub const ALL: [FieldKind; 14] = [
        FieldKind::Text,
        FieldKind::Email,
        FieldKind::Url,
        FieldKind::Number,
        FieldKind::Integer,
        FieldKind::AutoNumber,
        FieldKind::Boolean,
        FieldKind::Select,
        FieldKind::MultiSelect,
        FieldKind::Date,
        FieldKind::Time,
        FieldKind::DateTime,
        FieldKind::Related,
        FieldKind::RelatedList,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Url => "url",
            FieldKind::Number => "number",
            FieldKind::Integer => "integer",
            FieldKind::AutoNumber => "auto_number",
            FieldKind::Boolean => "boolean",
            FieldKind::Select => "select",
            FieldKind::MultiSelect => "multi_select",
            FieldKind::Date => "date",
            FieldKind::Time => "time",
            FieldKind::DateTime => "date_time",
            FieldKind::Related => "related",
            FieldKind::RelatedList => "related_list",
        }
    }

    /// Text-like kinds share the string validators
    pub fn is_text(&self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::Email | FieldKind::Url)
    }

    /// Kinds whose value is a list
    pub fn is_list(&self) -> bool {
        matches!(self, FieldKind::MultiSelect | FieldKind::RelatedList)
    }

    /// Kinds that link to another model
    pub fn is_related(&self) -> bool {
        matches!(self, FieldKind::Related | FieldKind::RelatedList)
    }

    /// Options this kind layers under the caller's
    pub(crate) fn default_options(&self) -> FieldOptions {
        match self {
            FieldKind::RelatedList => FieldOptions::new().required(false),
            _ => FieldOptions::new(),
        }
    }

    /// Built-in pattern used when no valid override is supplied
    pub(crate) fn default_pattern(&self) -> Option<&'static str> {
        match self {
            FieldKind::Email => Some(EMAIL_PATTERN),
            FieldKind::Url => Some(URL_PATTERN),
            _ => None,
        }
    }

    /// Checks kind-specific option invariants.
    pub(crate) fn check_options(&self, name: &str, options: &FieldOptions) -> FieldResult<()> {
        match self {
            FieldKind::Select | FieldKind::MultiSelect => {
                if options.selection.is_none() {
                    return Err(FieldError::InvalidSelection {
                        field: name.to_string(),
                    });
                }
            }
            FieldKind::Related | FieldKind::RelatedList => {
                if options.model.as_deref().map_or(true, str::is_empty) {
                    return Err(FieldError::InvalidRelatedModel {
                        field: name.to_string(),
                    });
                }
                if *self == FieldKind::RelatedList
                    && options.field.as_deref().map_or(true, str::is_empty)
                {
                    return Err(FieldError::InvalidBackReference {
                        field: name.to_string(),
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Ordered validator list for a field of this kind with resolved options.
    pub(crate) fn validators(&self, options: &FieldOptions, has_pattern: bool) -> Vec<Validator> {
        let required = options.is_required();
        let has_min = options.min_value.is_some();
        let has_max = options.max_value.is_some();

        let steps: Vec<(bool, Validator)> = match self {
            FieldKind::Text | FieldKind::Email | FieldKind::Url => vec![
                (required, v::REQUIRED),
                (true, v::STRING),
                (required, v::STRING_EMPTY),
                (options.min_length.is_some(), v::MIN_STRING_LENGTH),
                (options.max_length.is_some(), v::MAX_STRING_LENGTH),
                (has_pattern, v::REGEX),
            ],
            FieldKind::Number => vec![
                (required, v::REQUIRED),
                (true, v::NUMBER),
                (has_min, v::MIN_VALUE),
                (has_max, v::MAX_VALUE),
            ],
            FieldKind::Integer => vec![
                (required, v::REQUIRED),
                (true, v::NUMBER),
                (true, v::INTEGER),
                (has_min, v::MIN_VALUE),
                (has_max, v::MAX_VALUE),
            ],
            FieldKind::AutoNumber => vec![(true, v::NUMBER), (true, v::INTEGER)],
            FieldKind::Boolean => vec![(required, v::REQUIRED), (true, v::BOOLEAN)],
            FieldKind::Select => vec![
                (required, v::REQUIRED),
                (required, v::STRING_EMPTY),
                (true, v::SINGLE_SELECTION),
            ],
            FieldKind::MultiSelect => vec![
                (required, v::REQUIRED),
                (required, v::LIST_EMPTY),
                (true, v::MULTIPLE_SELECTION),
            ],
            FieldKind::Date => vec![(required, v::REQUIRED), (true, v::DATE)],
            FieldKind::Time => vec![(required, v::REQUIRED), (true, v::TIME)],
            FieldKind::DateTime => vec![(required, v::REQUIRED), (true, v::DATETIME)],
            FieldKind::Related => vec![
                (required, v::REQUIRED),
                (true, v::MODEL_CLASS),
                (true, v::MODEL_PRIMARY_KEY),
            ],
            FieldKind::RelatedList => vec![(required, v::REQUIRED), (true, v::MODEL_LIST_CLASS)],
        };

        steps
            .into_iter()
            .filter_map(|(enabled, validator)| enabled.then_some(validator))
            .collect()
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| FieldError::UnknownType(s.to_string()))
    }
}
