use schemars::schema_for;
use sqlbridge_core::{NativeTypeDescriptor, SqlTypeDescriptor};

fn main() {
    let native = schema_for!(NativeTypeDescriptor);
    let sql = schema_for!(SqlTypeDescriptor);
    let json = serde_json::to_string_pretty(&serde_json::json!({
        "native_type_descriptor": native,
        "sql_type_descriptor": sql,
    }))
    .expect("serialize json schema");
    println!("{json}");
}
