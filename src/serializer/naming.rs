//! Applying a [`PropertyNamingStrategy`] in both directions.
//!
//! On output every object key goes through `translate_name`. On input the
//! strategy cannot be inverted, so [`Renamed`] wraps the decoded value and
//! matches keys against the field names the target struct asks for: a key
//! equal to `translate_name(field)` is handed to serde as `field`.
//!
//! Only struct fields are matched on input. Keys of plain maps are renamed
//! on output but reach the target unchanged.

use super::PropertyNamingStrategy;
use serde::de::{
    Deserializer, IntoDeserializer, Visitor,
    value::{MapDeserializer, SeqDeserializer},
};
use serde_json::{Error, Map, Value};

/// Apply `naming` to every object key, recursively.
pub(super) fn rename_keys(value: Value, naming: &dyn PropertyNamingStrategy) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(name, value)| (naming.translate_name(&name), rename_keys(value, naming)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| rename_keys(item, naming))
                .collect(),
        ),
        other => other,
    }
}

/// Deserializer over a decoded value whose struct fields carry serialized
/// names.
pub(super) struct Renamed<'a> {
    value: Value,
    naming: &'a dyn PropertyNamingStrategy,
}

impl<'a> Renamed<'a> {
    pub(super) fn new(value: Value, naming: &'a dyn PropertyNamingStrategy) -> Self {
        Self { value, naming }
    }

    fn visit_object<'de, V: Visitor<'de>>(
        map: Map<String, Value>,
        naming: &'a dyn PropertyNamingStrategy,
        visitor: V,
    ) -> Result<V::Value, Error> {
        let entries = map.into_iter().map(|(key, value)| (key, Renamed { value, naming }));
        let mut access = MapDeserializer::<_, Error>::new(entries);
        let value = visitor.visit_map(&mut access)?;
        access.end()?;
        Ok(value)
    }

    fn visit_array<'de, V: Visitor<'de>>(
        items: Vec<Value>,
        naming: &'a dyn PropertyNamingStrategy,
        visitor: V,
    ) -> Result<V::Value, Error> {
        let items = items.into_iter().map(|value| Renamed { value, naming });
        let mut access = SeqDeserializer::<_, Error>::new(items);
        let value = visitor.visit_seq(&mut access)?;
        access.end()?;
        Ok(value)
    }
}

impl<'de, 'a> Deserializer<'de> for Renamed<'a> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.value {
            Value::Object(map) => Self::visit_object(map, self.naming, visitor),
            Value::Array(items) => Self::visit_array(items, self.naming, visitor),
            other => other.deserialize_any(visitor),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        let naming = self.naming;
        let map = match self.value {
            Value::Object(map) => map,
            other => return Renamed::new(other, naming).deserialize_any(visitor),
        };
        let renamed = map
            .into_iter()
            .map(|(key, value)| match property_name(naming, &key, fields) {
                Some(field) => (field.to_string(), value),
                None => (key, value),
            })
            .collect();
        Self::visit_object(renamed, naming, visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.value.deserialize_enum(name, variants, visitor)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map identifier
        ignored_any
    }
}

/// Field a serialized key stands for, if any.
fn property_name(
    naming: &dyn PropertyNamingStrategy,
    key: &str,
    fields: &'static [&'static str],
) -> Option<&'static str> {
    fields
        .iter()
        .copied()
        .find(|field| naming.translate_name(field) == key)
}

impl<'de, 'a> IntoDeserializer<'de, Error> for Renamed<'a> {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}
