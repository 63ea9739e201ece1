//! Field discovery through serde's data model
//!
//! [`walk`] runs a payload's `Serialize` impl against a serializer that only
//! records what it is shown. A field's semantic type comes from the method
//! its impl calls (`serialize_f64` is a float whatever the value), and scalar
//! defaults are captured as they are, non-finite floats included.

use super::value::{Scalar, SemanticType};
use serde::ser::{self, Impossible, Serialize};
use std::fmt;
use thiserror::Error;

/// The payload is not a struct or unit
#[derive(Debug, Error)]
#[error("{0}")]
pub struct WalkError(String);

impl WalkError {
    fn found(kind: &str) -> Self {
        Self(format!("found {}", kind))
    }
}

impl ser::Error for WalkError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self(msg.to_string())
    }
}

/// Field layout found by [`walk`]
#[derive(Debug, Clone, PartialEq)]
pub enum Walked {
    /// `()` or a unit struct
    Unit,
    /// Named fields in serialization order
    Fields(Vec<WalkedField>),
}

/// One serialized field of a payload
#[derive(Debug, Clone, PartialEq)]
pub struct WalkedField {
    pub name: String,
    /// Semantic type, or the serde kind found instead
    pub kind: std::result::Result<SemanticType, &'static str>,
    /// The field's value, when it is a scalar that fits a [`Scalar`]
    pub value: Option<Scalar>,
}

/// Walk the serialized form of `value`
pub fn walk<T: Serialize + ?Sized>(value: &T) -> std::result::Result<Walked, WalkError> {
    value.serialize(PayloadWalker)
}

struct PayloadWalker;

macro_rules! reject {
    ($($method:ident($ty:ty) => $kind:literal),* $(,)?) => {$(
        fn $method(self, _: $ty) -> std::result::Result<Walked, WalkError> {
            Err(WalkError::found($kind))
        }
    )*};
}

impl ser::Serializer for PayloadWalker {
    type Ok = Walked;
    type Error = WalkError;
    type SerializeSeq = Impossible<Walked, WalkError>;
    type SerializeTuple = Impossible<Walked, WalkError>;
    type SerializeTupleStruct = Impossible<Walked, WalkError>;
    type SerializeTupleVariant = Impossible<Walked, WalkError>;
    type SerializeMap = Impossible<Walked, WalkError>;
    type SerializeStruct = FieldCollector;
    type SerializeStructVariant = Impossible<Walked, WalkError>;

    reject! {
        serialize_bool(bool) => "bool",
        serialize_i8(i8) => "int",
        serialize_i16(i16) => "int",
        serialize_i32(i32) => "int",
        serialize_i64(i64) => "int",
        serialize_i128(i128) => "int",
        serialize_u8(u8) => "int",
        serialize_u16(u16) => "int",
        serialize_u32(u32) => "int",
        serialize_u64(u64) => "int",
        serialize_u128(u128) => "int",
        serialize_f32(f32) => "float",
        serialize_f64(f64) => "float",
        serialize_char(char) => "string",
        serialize_str(&str) => "string",
        serialize_bytes(&[u8]) => "bytes",
    }

    fn serialize_none(self) -> std::result::Result<Walked, WalkError> {
        Err(WalkError::found("null"))
    }

    fn serialize_some<T>(self, _: &T) -> std::result::Result<Walked, WalkError>
    where
        T: ?Sized + Serialize,
    {
        Err(WalkError::found("option"))
    }

    fn serialize_unit(self) -> std::result::Result<Walked, WalkError> {
        Ok(Walked::Unit)
    }

    fn serialize_unit_struct(self, _: &'static str) -> std::result::Result<Walked, WalkError> {
        Ok(Walked::Unit)
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
    ) -> std::result::Result<Walked, WalkError> {
        Err(WalkError::found("enum"))
    }

    fn serialize_newtype_struct<T>(
        self,
        _: &'static str,
        value: &T,
    ) -> std::result::Result<Walked, WalkError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: &T,
    ) -> std::result::Result<Walked, WalkError>
    where
        T: ?Sized + Serialize,
    {
        Err(WalkError::found("enum"))
    }

    fn serialize_seq(
        self,
        _: Option<usize>,
    ) -> std::result::Result<Self::SerializeSeq, WalkError> {
        Err(WalkError::found("array"))
    }

    fn serialize_tuple(self, _: usize) -> std::result::Result<Self::SerializeTuple, WalkError> {
        Err(WalkError::found("array"))
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Self::SerializeTupleStruct, WalkError> {
        Err(WalkError::found("array"))
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Self::SerializeTupleVariant, WalkError> {
        Err(WalkError::found("enum"))
    }

    fn serialize_map(
        self,
        _: Option<usize>,
    ) -> std::result::Result<Self::SerializeMap, WalkError> {
        Err(WalkError::found("object"))
    }

    fn serialize_struct(
        self,
        _: &'static str,
        len: usize,
    ) -> std::result::Result<Self::SerializeStruct, WalkError> {
        Ok(FieldCollector {
            fields: Vec::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Self::SerializeStructVariant, WalkError> {
        Err(WalkError::found("enum"))
    }
}

struct FieldCollector {
    fields: Vec<WalkedField>,
}

impl ser::SerializeStruct for FieldCollector {
    type Ok = Walked;
    type Error = WalkError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> std::result::Result<(), WalkError>
    where
        T: ?Sized + Serialize,
    {
        let probe = value.serialize(FieldProbe)?;
        self.fields.push(WalkedField {
            name: key.to_string(),
            kind: probe.kind,
            value: probe.value,
        });
        Ok(())
    }

    fn end(self) -> std::result::Result<Walked, WalkError> {
        Ok(Walked::Fields(self.fields))
    }
}

/// What [`FieldProbe`] saw for one field
struct Probe {
    kind: std::result::Result<SemanticType, &'static str>,
    value: Option<Scalar>,
}

impl Probe {
    fn scalar(value: Scalar) -> Self {
        Self {
            kind: Ok(value.semantic_type()),
            value: Some(value),
        }
    }

    fn integer<I: TryInto<i64>>(value: I) -> Self {
        Self {
            kind: Ok(SemanticType::Integer),
            value: value.try_into().ok().map(Scalar::Integer),
        }
    }

    fn unsupported(kind: &'static str) -> Self {
        Self { kind: Err(kind), value: None }
    }
}

struct FieldProbe;

macro_rules! probe_integers {
    ($($method:ident($ty:ty)),* $(,)?) => {$(
        fn $method(self, v: $ty) -> std::result::Result<Probe, WalkError> {
            Ok(Probe::integer(v))
        }
    )*};
}

impl ser::Serializer for FieldProbe {
    type Ok = Probe;
    type Error = WalkError;
    type SerializeSeq = Unsupported;
    type SerializeTuple = Unsupported;
    type SerializeTupleStruct = Unsupported;
    type SerializeTupleVariant = Unsupported;
    type SerializeMap = Unsupported;
    type SerializeStruct = Unsupported;
    type SerializeStructVariant = Unsupported;

    probe_integers! {
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_i128(i128),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_u128(u128),
    }

    fn serialize_bool(self, v: bool) -> std::result::Result<Probe, WalkError> {
        Ok(Probe::scalar(Scalar::Boolean(v)))
    }

    fn serialize_f32(self, v: f32) -> std::result::Result<Probe, WalkError> {
        Ok(Probe::scalar(Scalar::Float(f64::from(v))))
    }

    fn serialize_f64(self, v: f64) -> std::result::Result<Probe, WalkError> {
        Ok(Probe::scalar(Scalar::Float(v)))
    }

    fn serialize_char(self, v: char) -> std::result::Result<Probe, WalkError> {
        Ok(Probe::scalar(Scalar::String(v.to_string())))
    }

    fn serialize_str(self, v: &str) -> std::result::Result<Probe, WalkError> {
        Ok(Probe::scalar(Scalar::String(v.to_string())))
    }

    fn serialize_bytes(self, _: &[u8]) -> std::result::Result<Probe, WalkError> {
        Ok(Probe::unsupported("bytes"))
    }

    fn serialize_none(self) -> std::result::Result<Probe, WalkError> {
        Ok(Probe::unsupported("null"))
    }

    fn serialize_some<T>(self, _: &T) -> std::result::Result<Probe, WalkError>
    where
        T: ?Sized + Serialize,
    {
        Ok(Probe::unsupported("option"))
    }

    fn serialize_unit(self) -> std::result::Result<Probe, WalkError> {
        Ok(Probe::unsupported("unit"))
    }

    fn serialize_unit_struct(self, _: &'static str) -> std::result::Result<Probe, WalkError> {
        Ok(Probe::unsupported("unit"))
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
    ) -> std::result::Result<Probe, WalkError> {
        Ok(Probe::unsupported("enum"))
    }

    fn serialize_newtype_struct<T>(
        self,
        _: &'static str,
        value: &T,
    ) -> std::result::Result<Probe, WalkError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: &T,
    ) -> std::result::Result<Probe, WalkError>
    where
        T: ?Sized + Serialize,
    {
        Ok(Probe::unsupported("enum"))
    }

    fn serialize_seq(self, _: Option<usize>) -> std::result::Result<Unsupported, WalkError> {
        Ok(Unsupported("array"))
    }

    fn serialize_tuple(self, _: usize) -> std::result::Result<Unsupported, WalkError> {
        Ok(Unsupported("array"))
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Unsupported, WalkError> {
        Ok(Unsupported("array"))
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Unsupported, WalkError> {
        Ok(Unsupported("enum"))
    }

    fn serialize_map(self, _: Option<usize>) -> std::result::Result<Unsupported, WalkError> {
        Ok(Unsupported("object"))
    }

    fn serialize_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Unsupported, WalkError> {
        Ok(Unsupported("object"))
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Unsupported, WalkError> {
        Ok(Unsupported("enum"))
    }
}

/// A compound field value; its contents are not inspected
struct Unsupported(&'static str);

impl Unsupported {
    fn done(self) -> std::result::Result<Probe, WalkError> {
        Ok(Probe::unsupported(self.0))
    }
}

impl ser::SerializeSeq for Unsupported {
    type Ok = Probe;
    type Error = WalkError;

    fn serialize_element<T>(&mut self, _: &T) -> std::result::Result<(), WalkError>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> std::result::Result<Probe, WalkError> {
        self.done()
    }
}

impl ser::SerializeTuple for Unsupported {
    type Ok = Probe;
    type Error = WalkError;

    fn serialize_element<T>(&mut self, _: &T) -> std::result::Result<(), WalkError>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> std::result::Result<Probe, WalkError> {
        self.done()
    }
}

impl ser::SerializeTupleStruct for Unsupported {
    type Ok = Probe;
    type Error = WalkError;

    fn serialize_field<T>(&mut self, _: &T) -> std::result::Result<(), WalkError>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> std::result::Result<Probe, WalkError> {
        self.done()
    }
}

impl ser::SerializeTupleVariant for Unsupported {
    type Ok = Probe;
    type Error = WalkError;

    fn serialize_field<T>(&mut self, _: &T) -> std::result::Result<(), WalkError>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> std::result::Result<Probe, WalkError> {
        self.done()
    }
}

impl ser::SerializeMap for Unsupported {
    type Ok = Probe;
    type Error = WalkError;

    fn serialize_key<T>(&mut self, _: &T) -> std::result::Result<(), WalkError>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn serialize_value<T>(&mut self, _: &T) -> std::result::Result<(), WalkError>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> std::result::Result<Probe, WalkError> {
        self.done()
    }
}

impl ser::SerializeStruct for Unsupported {
    type Ok = Probe;
    type Error = WalkError;

    fn serialize_field<T>(&mut self, _: &'static str, _: &T) -> std::result::Result<(), WalkError>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> std::result::Result<Probe, WalkError> {
        self.done()
    }
}

impl ser::SerializeStructVariant for Unsupported {
    type Ok = Probe;
    type Error = WalkError;

    fn serialize_field<T>(&mut self, _: &'static str, _: &T) -> std::result::Result<(), WalkError>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> std::result::Result<Probe, WalkError> {
        self.done()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Meters(f64);

    #[derive(Serialize)]
    struct Limits {
        #[serde(rename = "max")]
        limit: f64,
        name: String,
        retries: u8,
        verbose: bool,
        distance: Meters,
        tags: Vec<String>,
        extra: BTreeMap<String, i64>,
        fallback: Option<i64>,
    }

    fn limits() -> Limits {
        Limits {
            limit: f64::INFINITY,
            name: "x".to_string(),
            retries: 3,
            verbose: false,
            distance: Meters(1.5),
            tags: vec!["a".to_string()],
            extra: BTreeMap::new(),
            fallback: Some(1),
        }
    }

    fn kinds(walked: &Walked) -> Vec<(&str, std::result::Result<SemanticType, &'static str>)> {
        match walked {
            Walked::Fields(fields) => fields.iter().map(|f| (f.name.as_str(), f.kind)).collect(),
            Walked::Unit => Vec::new(),
        }
    }

    #[test]
    fn test_kind_follows_declared_type() {
        let walked = walk(&limits()).unwrap();
        assert_eq!(
            kinds(&walked),
            vec![
                ("max", Ok(SemanticType::Float)),
                ("name", Ok(SemanticType::String)),
                ("retries", Ok(SemanticType::Integer)),
                ("verbose", Ok(SemanticType::Boolean)),
                ("distance", Ok(SemanticType::Float)),
                ("tags", Err("array")),
                ("extra", Err("object")),
                ("fallback", Err("option")),
            ]
        );
    }

    #[test]
    fn test_non_finite_default_is_captured() {
        match walk(&limits()).unwrap() {
            Walked::Fields(fields) => {
                assert_eq!(fields[0].value, Some(Scalar::Float(f64::INFINITY)));
                assert_eq!(fields[2].value, Some(Scalar::Integer(3)));
                assert_eq!(fields[5].value, None);
            }
            Walked::Unit => panic!("expected fields"),
        }
    }

    #[test]
    fn test_integer_outside_i64_has_no_captured_value() {
        #[derive(Serialize)]
        struct Big {
            n: u64,
        }

        match walk(&Big { n: u64::MAX }).unwrap() {
            Walked::Fields(fields) => {
                assert_eq!(fields[0].kind, Ok(SemanticType::Integer));
                assert_eq!(fields[0].value, None);
            }
            Walked::Unit => panic!("expected fields"),
        }
    }

    #[test]
    fn test_unit_and_non_struct_payloads() {
        #[derive(Serialize)]
        struct Marker;

        assert_eq!(walk(&()).unwrap(), Walked::Unit);
        assert_eq!(walk(&Marker).unwrap(), Walked::Unit);
        assert_eq!(walk(&42i64).unwrap_err().to_string(), "found int");
        assert_eq!(walk(&vec![1, 2]).unwrap_err().to_string(), "found array");
    }
}
