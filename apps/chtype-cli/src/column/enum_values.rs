//! Name/code table of an `Enum8` or `Enum16` column.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EnumConstantError {
    #[error("Duplicate enum name '{0}'")]
    DuplicateName(String),

    #[error("Duplicate enum value {0}")]
    DuplicateCode(i16),

    #[error("No enum constant named '{0}'")]
    UnknownName(String),

    #[error("No enum constant with value {0}")]
    UnknownCode(i16),
}

/// Bijective mapping between enum constant names and their codes.
///
/// Constants keep their declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumConstants {
    entries: Vec<(String, i16)>,
    by_name: HashMap<String, usize>,
    by_code: HashMap<i16, usize>,
}

impl EnumConstants {
    pub(crate) fn insert(&mut self, name: String, code: i16) -> Result<(), EnumConstantError> {
        if self.by_name.contains_key(&name) {
            return Err(EnumConstantError::DuplicateName(name));
        }
        if self.by_code.contains_key(&code) {
            return Err(EnumConstantError::DuplicateCode(code));
        }
        let index = self.entries.len();
        self.by_name.insert(name.clone(), index);
        self.by_code.insert(code, index);
        self.entries.push((name, code));
        Ok(())
    }

    /// Name of the constant with the given code.
    pub fn name(&self, code: i16) -> Result<&str, EnumConstantError> {
        self.by_code
            .get(&code)
            .map(|index| self.entries[*index].0.as_str())
            .ok_or(EnumConstantError::UnknownCode(code))
    }

    /// Code of the constant with the given name.
    pub fn value(&self, name: &str) -> Result<i16, EnumConstantError> {
        self.by_name
            .get(name)
            .map(|index| self.entries[*index].1)
            .ok_or_else(|| EnumConstantError::UnknownName(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i16)> {
        self.entries.iter().map(|(name, code)| (name.as_str(), *code))
    }

    /// Whether every code fits in a signed byte.
    pub fn fits_in_8_bits(&self) -> bool {
        self.entries
            .iter()
            .all(|(_, code)| i8::try_from(*code).is_ok())
    }
}

impl Serialize for EnumConstants {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Constant<'a> {
            name: &'a str,
            value: i16,
        }

        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for (name, value) in self.iter() {
            seq.serialize_element(&Constant { name, value })?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, i16)]) -> EnumConstants {
        let mut constants = EnumConstants::default();
        for (name, code) in pairs {
            constants.insert(name.to_string(), *code).unwrap();
        }
        constants
    }

    #[test]
    fn test_lookup_both_ways() {
        let constants = table(&[("Query'Start", 1), ("Query'Finish", 10)]);
        assert_eq!(constants.name(1).unwrap(), "Query'Start");
        assert_eq!(constants.name(10).unwrap(), "Query'Finish");
        assert_eq!(constants.value("Query'Start").unwrap(), 1);
        assert_eq!(constants.value("Query'Finish").unwrap(), 10);
        assert_eq!(constants.name(2), Err(EnumConstantError::UnknownCode(2)));
        assert_eq!(
            constants.value(""),
            Err(EnumConstantError::UnknownName(String::new()))
        );
    }

    #[test]
    fn test_rejects_duplicates() {
        let mut constants = table(&[("a", 1)]);
        assert_eq!(
            constants.insert("a".to_string(), 2),
            Err(EnumConstantError::DuplicateName("a".to_string()))
        );
        assert_eq!(
            constants.insert("b".to_string(), 1),
            Err(EnumConstantError::DuplicateCode(1))
        );
        assert_eq!(constants.len(), 1);
    }

    #[test]
    fn test_declaration_order_and_width() {
        let constants = table(&[("z", -128), ("a", 127)]);
        assert_eq!(constants.iter().collect::<Vec<_>>(), vec![("z", -128), ("a", 127)]);
        assert!(constants.fits_in_8_bits());
        assert!(!table(&[("big", 300)]).fits_in_8_bits());
    }

    #[test]
    fn test_serialize_as_list() {
        let constants = table(&[("red", 1), ("green", 2)]);
        assert_eq!(
            serde_json::to_string(&constants).unwrap(),
            r#"[{"name":"red","value":1},{"name":"green","value":2}]"#
        );
    }
}
