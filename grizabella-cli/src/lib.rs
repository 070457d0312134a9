pub mod context;
pub mod handlers;
pub mod output;
pub mod utils;

pub use context::GrizabellaCliContext;
pub use output::{
    format_error, format_info, format_success, format_warning, output_error, print_embedding_definition,
    print_embedding_definition_list, print_object, print_object_list, print_object_type, print_object_type_list,
    print_query_result, print_relation, print_relation_list, print_relation_type, print_relation_type_list,
    print_similar, CliColors,
};
pub use utils::{coerce_properties, coerce_relation_properties, parse_direction, parse_filter, parse_operator, read_json_arg};
