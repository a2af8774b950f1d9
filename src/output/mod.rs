pub mod formatter;

pub use formatter::{
    format_final, format_percentage, format_policy_list, format_projection, format_required,
    format_result, format_tsv, should_use_colors,
};
