//! Shape descriptors for route payloads
//!
//! A descriptor is built once per payload when a route is registered, by
//! walking the caller-supplied value's `Serialize` impl in field declaration
//! order. The serialized field name is the option key, so
//! `#[serde(rename = "option-1")]` controls the `-option-1` flag.
//!
//! Building never fails. Payloads that are not structs, and fields whose type
//! is not one of the [`SemanticType`]s, are recorded and reported the first
//! time the binder needs them.

use super::value::{Scalar, SemanticType};
use super::walker::{walk, Walked};
use crate::error::ParseError;
use serde::de::value::MapDeserializer;
use serde::de::{DeserializeOwned, IntoDeserializer, Visitor};
use serde::{Deserializer, Serialize};
use serde_json::Value;

/// How a field receives its raw token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Filled from `-<key> <value>`
    Named(String),
    /// Filled from the positional token at this index
    Positional(usize),
}

/// A single bindable field of a payload
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    name: String,
    kind: std::result::Result<SemanticType, String>,
    binding: Binding,
}

impl FieldSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// The field's semantic type, or an unsupported type error naming the field
    pub fn semantic_type(&self) -> std::result::Result<SemanticType, ParseError> {
        self.kind
            .clone()
            .map_err(|found| ParseError::unsupported_type(self.name.as_str(), found))
    }

    /// Coerce a raw token into this field's type
    pub fn coerce(&self, input: &str) -> std::result::Result<Scalar, ParseError> {
        self.semantic_type()?.coerce(input)
    }
}

/// Field layout of one payload type
#[derive(Debug, Clone)]
pub struct ShapeDescriptor {
    fields: Vec<FieldSpec>,
    template: std::result::Result<Template, ParseError>,
}

/// The described value, kept field by field for rebuilding
#[derive(Debug, Clone)]
enum Template {
    Unit,
    Fields(Vec<(String, Slot)>),
}

/// One field's value inside a [`PayloadBuilder`]
#[derive(Debug, Clone)]
enum Slot {
    /// A field the walker could not capture as a scalar
    Json(Value),
    Scalar(Scalar),
}

impl ShapeDescriptor {
    /// Describe an options payload; fields bind by their serialized name
    pub fn named<T: Serialize>(value: &T) -> Self {
        Self::build(value, |name, _| Binding::Named(name.to_string()))
    }

    /// Describe a positional payload; fields bind in declaration order
    pub fn positional<T: Serialize>(value: &T) -> Self {
        Self::build(value, |_, index| Binding::Positional(index))
    }

    fn build<T, F>(value: &T, binding: F) -> Self
    where
        T: Serialize,
        F: Fn(&str, usize) -> Binding,
    {
        let walked = match walk(value) {
            Ok(Walked::Fields(walked)) => walked,
            // Unit payloads such as `()` have no fields
            Ok(Walked::Unit) => {
                return Self {
                    fields: Vec::new(),
                    template: Ok(Template::Unit),
                }
            }
            Err(e) => return Self::invalid(e.to_string()),
        };

        // Only fields without a captured scalar need their JSON form
        let mut json = serde_json::Map::new();
        if walked.iter().any(|f| f.value.is_none()) {
            match serde_json::to_value(value) {
                Ok(Value::Object(map)) => json = map,
                Ok(_) => return Self::invalid("fields did not serialize to an object".to_string()),
                Err(e) => return Self::invalid(e.to_string()),
            }
        }

        let mut fields = Vec::with_capacity(walked.len());
        let mut slots = Vec::with_capacity(walked.len());
        for (index, field) in walked.into_iter().enumerate() {
            let slot = match field.value {
                Some(scalar) => Slot::Scalar(scalar),
                None => Slot::Json(json.remove(&field.name).unwrap_or(Value::Null)),
            };
            fields.push(FieldSpec {
                binding: binding(&field.name, index),
                kind: field.kind.map_err(str::to_string),
                name: field.name.clone(),
            });
            slots.push((field.name, slot));
        }

        Self {
            fields,
            template: Ok(Template::Fields(slots)),
        }
    }

    fn invalid(reason: String) -> Self {
        Self {
            fields: Vec::new(),
            template: Err(ParseError::shape(reason)),
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up the field bound to an option key
    pub fn field_by_key(&self, key: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|f| matches!(&f.binding, Binding::Named(k) if k == key))
    }

    /// Start filling a copy of the described value
    pub fn builder(&self) -> std::result::Result<PayloadBuilder, ParseError> {
        self.template
            .clone()
            .map(|template| PayloadBuilder { template })
    }
}

/// A described payload being filled field by field
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    template: Template,
}

impl PayloadBuilder {
    /// Coerce `input` into `field` and store it
    pub fn set(&mut self, field: &FieldSpec, input: &str) -> std::result::Result<(), ParseError> {
        let coerced = field.coerce(input)?;
        let slot = match &mut self.template {
            Template::Fields(slots) => slots
                .iter_mut()
                .find(|(name, _)| *name == field.name)
                .map(|(_, slot)| slot),
            Template::Unit => None,
        };
        match slot {
            Some(slot) => {
                *slot = Slot::Scalar(coerced);
                Ok(())
            }
            None => Err(ParseError::shape(format!(
                "no field '{}' on payload",
                field.name
            ))),
        }
    }

    /// Rebuild the typed payload from the filled values
    pub fn finish<T: DeserializeOwned>(self) -> std::result::Result<T, ParseError> {
        match self.template {
            Template::Unit => T::deserialize(Value::Null).map_err(ParseError::payload),
            Template::Fields(slots) => {
                let fields: MapDeserializer<'_, _, serde_json::Error> =
                    MapDeserializer::new(slots.into_iter());
                T::deserialize(fields).map_err(ParseError::payload)
            }
        }
    }
}

impl<'de> IntoDeserializer<'de, serde_json::Error> for Slot {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

macro_rules! forward_slot {
    ($($method:ident)*) => {$(
        fn $method<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, serde_json::Error> {
            match self {
                Slot::Json(value) => value.$method(visitor),
                Slot::Scalar(scalar) => scalar.visit(visitor),
            }
        }
    )*};
}

impl<'de> Deserializer<'de> for Slot {
    type Error = serde_json::Error;

    forward_slot! {
        deserialize_any deserialize_bool
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64 deserialize_i128
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64 deserialize_u128
        deserialize_f32 deserialize_f64 deserialize_char deserialize_str deserialize_string
        deserialize_bytes deserialize_byte_buf deserialize_unit deserialize_seq
        deserialize_map deserialize_identifier deserialize_ignored_any
    }

    fn deserialize_option<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> std::result::Result<V::Value, serde_json::Error> {
        match self {
            Slot::Json(value) => value.deserialize_option(visitor),
            scalar => visitor.visit_some(scalar),
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> std::result::Result<V::Value, serde_json::Error> {
        match self {
            Slot::Json(value) => value.deserialize_unit_struct(name, visitor),
            Slot::Scalar(scalar) => scalar.visit(visitor),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> std::result::Result<V::Value, serde_json::Error> {
        match self {
            Slot::Json(value) => value.deserialize_newtype_struct(name, visitor),
            scalar => visitor.visit_newtype_struct(scalar),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        len: usize,
        visitor: V,
    ) -> std::result::Result<V::Value, serde_json::Error> {
        match self {
            Slot::Json(value) => value.deserialize_tuple(len, visitor),
            Slot::Scalar(scalar) => scalar.visit(visitor),
        }
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        len: usize,
        visitor: V,
    ) -> std::result::Result<V::Value, serde_json::Error> {
        match self {
            Slot::Json(value) => value.deserialize_tuple_struct(name, len, visitor),
            Slot::Scalar(scalar) => scalar.visit(visitor),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> std::result::Result<V::Value, serde_json::Error> {
        match self {
            Slot::Json(value) => value.deserialize_struct(name, fields, visitor),
            Slot::Scalar(scalar) => scalar.visit(visitor),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> std::result::Result<V::Value, serde_json::Error> {
        match self {
            Slot::Json(value) => value.deserialize_enum(name, variants, visitor),
            Slot::Scalar(scalar) => scalar.visit(visitor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Options {
        #[serde(rename = "option-1")]
        option1: i64,
        #[serde(rename = "option-2")]
        option2: String,
        ratio: f64,
        flag: bool,
        invalid: Vec<i64>,
    }

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Args {
        arg1: String,
        arg2: i64,
    }

    #[test]
    fn test_named_descriptor() {
        let shape = ShapeDescriptor::named(&Options::default());
        assert_eq!(shape.len(), 5);

        let field = shape.field_by_key("option-1").unwrap();
        assert_eq!(field.name(), "option-1");
        assert_eq!(field.semantic_type(), Ok(SemanticType::Integer));
        assert_eq!(
            shape.field_by_key("ratio").unwrap().semantic_type(),
            Ok(SemanticType::Float)
        );
        assert_eq!(
            shape.field_by_key("flag").unwrap().semantic_type(),
            Ok(SemanticType::Boolean)
        );
        assert!(shape.field_by_key("option1").is_none());
    }

    #[test]
    fn test_positional_descriptor_keeps_declaration_order() {
        let shape = ShapeDescriptor::positional(&Args::default());
        let bindings: Vec<_> = shape.fields().iter().map(|f| f.binding().clone()).collect();
        assert_eq!(bindings, vec![Binding::Positional(0), Binding::Positional(1)]);
        assert_eq!(shape.fields()[0].name(), "arg1");
        assert_eq!(shape.fields()[1].name(), "arg2");
    }

    #[test]
    fn test_unsupported_field_is_lazy() {
        let shape = ShapeDescriptor::named(&Options::default());
        let field = shape.field_by_key("invalid").unwrap();
        let err = field.coerce("5").unwrap_err();
        assert_eq!(err, ParseError::unsupported_type("invalid", "array"));
    }

    #[test]
    fn test_unit_payload_has_no_fields() {
        let shape = ShapeDescriptor::positional(&());
        assert!(shape.is_empty());
        let built: std::result::Result<(), _> = shape.builder().unwrap().finish();
        assert!(built.is_ok());
    }

    #[test]
    fn test_non_struct_payload_fails_on_use() {
        let shape = ShapeDescriptor::positional(&42i64);
        assert!(shape.is_empty());
        assert_eq!(shape.builder().unwrap_err(), ParseError::shape("found int"));
    }

    #[test]
    fn test_builder_round_trip() {
        let shape = ShapeDescriptor::positional(&Args::default());
        let mut builder = shape.builder().unwrap();
        builder.set(&shape.fields()[0], "a").unwrap();
        builder.set(&shape.fields()[1], "3").unwrap();

        let args: Args = builder.finish().unwrap();
        assert_eq!(
            args,
            Args {
                arg1: "a".to_string(),
                arg2: 3
            }
        );
    }

    #[test]
    fn test_non_finite_default_survives_rebuild() {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        struct Limits {
            limit: f64,
            floor: f32,
            name: String,
        }

        let defaults = Limits {
            limit: f64::INFINITY,
            floor: f32::NEG_INFINITY,
            name: "x".to_string(),
        };
        let shape = ShapeDescriptor::named(&defaults);
        assert_eq!(
            shape.field_by_key("limit").unwrap().semantic_type(),
            Ok(SemanticType::Float)
        );

        let mut builder = shape.builder().unwrap();
        builder.set(shape.field_by_key("name").unwrap(), "y").unwrap();
        let rebuilt: Limits = builder.finish().unwrap();
        assert_eq!(
            rebuilt,
            Limits {
                name: "y".to_string(),
                ..defaults.clone()
            }
        );

        let mut builder = shape.builder().unwrap();
        builder.set(shape.field_by_key("limit").unwrap(), "5").unwrap();
        let rebuilt: Limits = builder.finish().unwrap();
        assert_eq!(rebuilt.limit, 5.0);
        assert_eq!(rebuilt.floor, f32::NEG_INFINITY);
    }

    #[test]
    fn test_newtype_field_binds_as_inner_type() {
        #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
        struct Meters(f64);

        #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
        struct Walk {
            distance: Meters,
        }

        let shape = ShapeDescriptor::positional(&Walk::default());
        assert_eq!(shape.fields()[0].semantic_type(), Ok(SemanticType::Float));
        let mut builder = shape.builder().unwrap();
        builder.set(&shape.fields()[0], "2.5").unwrap();
        let walk: Walk = builder.finish().unwrap();
        assert_eq!(walk, Walk { distance: Meters(2.5) });
    }

    #[test]
    fn test_unsupported_field_keeps_its_default() {
        let defaults = Options {
            invalid: vec![1, 2],
            ..Default::default()
        };
        let shape = ShapeDescriptor::named(&defaults);
        let mut builder = shape.builder().unwrap();
        builder.set(shape.field_by_key("flag").unwrap(), "true").unwrap();
        let rebuilt: Options = builder.finish().unwrap();
        assert_eq!(rebuilt.invalid, vec![1, 2]);
        assert!(rebuilt.flag);
    }

    #[test]
    fn test_out_of_range_value_fails_on_finish() {
        #[derive(Debug, Default, Serialize, Deserialize)]
        struct Small {
            byte: u8,
        }

        let shape = ShapeDescriptor::positional(&Small::default());
        let mut builder = shape.builder().unwrap();
        builder.set(&shape.fields()[0], "300").unwrap();
        let result: std::result::Result<Small, _> = builder.finish();
        assert!(matches!(result, Err(ParseError::Payload { .. })));
    }
}
