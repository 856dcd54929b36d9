//! Machine-readable codes carried by built-in validation errors

pub const REQUIRED: &str = "required";
pub const NOT_A_STRING: &str = "not_a_string";
pub const STRING_EMPTY: &str = "string_empty";
pub const MIN_STRING_LENGTH: &str = "min_string_length";
pub const MAX_STRING_LENGTH: &str = "max_string_length";
pub const NO_REGEX_MATCH: &str = "no_regex_match";
pub const NOT_A_NUMBER: &str = "not_a_number";
pub const NOT_AN_INTEGER: &str = "not_an_integer";
pub const MIN_VALUE: &str = "min_value";
pub const MAX_VALUE: &str = "max_value";
pub const NOT_A_BOOLEAN: &str = "not_a_boolean";
pub const NO_SELECTION_MATCH: &str = "no_selection_match";
pub const SELECTION_NOT_A_LIST: &str = "selection_not_a_list";
pub const LIST_EMPTY: &str = "list_empty";
pub const NOT_A_DATE: &str = "not_a_date";
pub const NOT_A_TIME: &str = "not_a_time";
pub const NOT_A_DATETIME: &str = "not_a_datetime";
pub const INVALID_MODEL_CLASS: &str = "invalid_model_class";
pub const MISSING_MODEL_PRIMARY_KEY: &str = "missing_model_primary_key";
pub const INVALID_MODEL_LIST_DATA: &str = "invalid_model_list_data";
pub const INVALID_MODEL_LIST_CLASS: &str = "invalid_model_list_class";
pub const EXTRA_FIELD: &str = "extra_field";
