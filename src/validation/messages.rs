//! Human-readable messages for built-in validation errors

pub fn required(label: &str) -> String {
    format!("{} is required", label)
}

pub fn not_a_string(label: &str) -> String {
    format!("{} should be a string", label)
}

pub fn string_empty(label: &str) -> String {
    format!("{} must not be empty", label)
}

pub fn min_string_length(label: &str, min: usize) -> String {
    format!("{} must be at least {} characters long", label, min)
}

pub fn max_string_length(label: &str, max: usize) -> String {
    format!("{} must be at most {} characters long", label, max)
}

pub fn no_regex_match(label: &str) -> String {
    format!("{} is not in the correct format", label)
}

pub fn not_a_number(label: &str) -> String {
    format!("{} should be a number", label)
}

pub fn not_an_integer(label: &str) -> String {
    format!("{} should be a whole number", label)
}

pub fn min_value(label: &str, min: f64) -> String {
    format!("{} must be at least {}", label, min)
}

pub fn max_value(label: &str, max: f64) -> String {
    format!("{} must be at most {}", label, max)
}

pub fn not_a_boolean(label: &str) -> String {
    format!("{} should be true or false", label)
}

pub fn no_selection_match(label: &str) -> String {
    format!("{} is not one of the allowed options", label)
}

pub fn selection_not_a_list(label: &str) -> String {
    format!("{} should be a list of options", label)
}

pub fn list_empty(label: &str) -> String {
    format!("{} must contain at least one item", label)
}

pub fn not_a_date(label: &str) -> String {
    format!("{} should be a date (YYYY-MM-DD)", label)
}

pub fn not_a_time(label: &str) -> String {
    format!("{} should be a time (HH:MM:SS)", label)
}

pub fn not_a_datetime(label: &str) -> String {
    format!("{} should be a date and time (YYYY-MM-DDTHH:MM:SS)", label)
}

pub fn invalid_model_class(label: &str, model: &str) -> String {
    format!("{} should be a {} record", label, model)
}

pub fn missing_model_primary_key(label: &str) -> String {
    format!("{} refers to a record with no primary key value", label)
}

pub fn invalid_model_list_data(label: &str) -> String {
    format!("{} should be a list of records", label)
}

pub fn invalid_model_list_class(label: &str, model: &str) -> String {
    format!("{} should only contain {} records", label, model)
}

pub fn extra_field(field_name: &str, model: &str) -> String {
    format!("Field '{}' does not exist in model {}", field_name, model)
}
