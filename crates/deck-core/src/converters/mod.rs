//! Built-in game converters

pub mod mtg;

use crate::converter::Converter;

pub use mtg::MtgConverter;

/// Converters registered in the global engine, in registration order
pub fn builtin() -> Vec<Box<dyn Converter>> {
    vec![Box::new(MtgConverter)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryBuilder;

    #[test]
    fn test_builtin_table_has_no_duplicate_games() {
        let mut builder = RegistryBuilder::new();
        for converter in builtin() {
            let name = converter.name().to_string();
            assert!(
                builder.register_boxed(converter).is_ok(),
                "duplicate game claimed by '{}'",
                name
            );
        }
    }
}
