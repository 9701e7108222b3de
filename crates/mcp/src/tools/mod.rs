mod dispatch;
mod registry;

pub use dispatch::{DispatchError, Dispatcher};
pub use registry::{
    json_schema_any_object, json_schema_number, json_schema_object, json_schema_string,
    list_schemas, UnknownTool, VeilMailTool,
};
