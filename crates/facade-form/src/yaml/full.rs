//! Full YAML reading with scalars kept as written
//!
//! serde_yaml resolves plain scalars to numbers and booleans, so `65.70`
//! would come back as `65.7`. The text is read twice: once into
//! `serde_yaml::Value` for the tree shape, then again with that shape as a
//! seed so every scalar goes through `deserialize_str` and keeps its source
//! text. The result matches what the subset reader gives for the same text.

use crate::document::{Mapping, Value};
use serde::de::{DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use std::fmt;

pub fn parse_full_yaml(text: &str) -> Result<Value, serde_yaml::Error> {
    let shape: serde_yaml::Value = serde_yaml::from_str(text)?;
    if shape.is_null() {
        return Ok(Value::Null);
    }
    Shaped::entry(&shape).deserialize(serde_yaml::Deserializer::from_str(text))
}

/// Seed for one node, guided by its already-resolved shape.
struct Shaped<'s> {
    shape: &'s serde_yaml::Value,
    /// A bare `-` item is null, a bare `key:` value is the empty string
    in_sequence: bool,
}

impl<'s> Shaped<'s> {
    fn entry(shape: &'s serde_yaml::Value) -> Self {
        Self {
            shape,
            in_sequence: false,
        }
    }

    fn item(shape: &'s serde_yaml::Value) -> Self {
        Self {
            shape,
            in_sequence: true,
        }
    }
}

impl<'de, 's> DeserializeSeed<'de> for Shaped<'s> {
    type Value = Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        match self.shape {
            serde_yaml::Value::Null => {
                let raw = String::deserialize(deserializer)?;
                Ok(if raw.is_empty() && !self.in_sequence {
                    Value::String(raw)
                } else {
                    Value::Null
                })
            }
            serde_yaml::Value::Bool(_)
            | serde_yaml::Value::Number(_)
            | serde_yaml::Value::String(_) => String::deserialize(deserializer).map(Value::String),
            serde_yaml::Value::Sequence(items) => deserializer.deserialize_seq(SequenceShape(items)),
            serde_yaml::Value::Mapping(map) => deserializer.deserialize_map(MappingShape(map)),
            serde_yaml::Value::Tagged(_) => Value::deserialize(deserializer),
        }
    }
}

struct SequenceShape<'s>(&'s [serde_yaml::Value]);

impl<'de, 's> Visitor<'de> for SequenceShape<'s> {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a YAML sequence")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(self.0.len());
        for shape in self.0 {
            match seq.next_element_seed(Shaped::item(shape))? {
                Some(item) => items.push(item),
                None => return Ok(Value::Sequence(items)),
            }
        }
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }
}

struct MappingShape<'s>(&'s serde_yaml::Mapping);

impl<'de, 's> Visitor<'de> for MappingShape<'s> {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a YAML mapping")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut shapes = self.0.values();
        let mut map = Mapping::with_capacity(self.0.len());
        while let Some(key) = access.next_key::<String>()? {
            let value = match shapes.next() {
                Some(shape) => access.next_value_seed(Shaped::entry(shape))?,
                None => access.next_value::<Value>()?,
            };
            map.insert(key, value);
        }
        Ok(Value::Mapping(map))
    }
}
