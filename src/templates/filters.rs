//! Custom MiniJinja filters for Go generation

use crate::util;
use minijinja::Environment;

/// Register all custom filters with the environment
pub fn register_filters(env: &mut Environment<'_>) {
    env.add_filter("snake_case", filter_snake_case);
    env.add_filter("kebab_case", filter_kebab_case);
}

// Filter wrappers that delegate to shared util functions
fn filter_snake_case(value: &str) -> String {
    util::to_snake_case(value)
}

fn filter_kebab_case(value: &str) -> String {
    util::to_kebab_case(value)
}
