//! Arrow schema of the flattened table

use std::sync::{Arc, LazyLock};

use arrow::datatypes::{DataType, Field, Schema};

/// Nested sub-objects whose `available` count becomes a column, in column order
pub const COUNT_FIELDS: [&str; 4] = ["comics", "series", "stories", "events"];

/// Key read inside each counted sub-object
pub const COUNT_KEY: &str = "available";

/// Flattened record table: id, name, description, then one column per count field
pub fn flat() -> &'static Arc<Schema> {
    static SCHEMA: LazyLock<Arc<Schema>> = LazyLock::new(|| {
        let mut fields = vec![
            Field::new("id", DataType::Int64, true),
            Field::new("name", DataType::Utf8, true),
            Field::new("description", DataType::Utf8, false),
        ];
        fields.extend(
            COUNT_FIELDS
                .iter()
                .map(|name| Field::new(*name, DataType::Int64, true)),
        );
        Arc::new(Schema::new(fields))
    });
    &SCHEMA
}
