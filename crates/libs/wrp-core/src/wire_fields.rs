//! Per-field msgpack helpers.
//!
//! [`MapWriter`] writes one named field at a time into a map whose entry
//! count was fixed up front. [`WireMap`] indexes the top-level map of a
//! parsed message and pulls typed fields out of it. Both sides apply the
//! same presence rules: required keys are always written and must always be
//! present, optional keys are written only when set and may be missing.

use std::collections::HashMap;
use std::io::{self, Write};

use rmp::encode;
use rmpv::Value;

use crate::constants::KEY_MSG_TYPE;
use crate::message::{MsgType, Nvp};
use crate::WrpError;

pub(crate) fn map_write_error(err: io::Error) -> WrpError {
    match err.kind() {
        io::ErrorKind::WriteZero => WrpError::MsgTooBig,
        io::ErrorKind::OutOfMemory => WrpError::OutOfMemory,
        _ => WrpError::OtherError,
    }
}

fn value_write_error(err: encode::ValueWriteError<io::Error>) -> WrpError {
    map_write_error(io::Error::from(err))
}

/// Map entry contributed by an optional scalar field.
pub(crate) fn opt_entry<T>(value: &Option<T>) -> u32 {
    u32::from(value.is_some())
}

/// Map entry contributed by an optional list field.
pub(crate) fn list_entry<T>(values: &[T]) -> u32 {
    u32::from(!values.is_empty())
}

pub(crate) struct MapWriter<'w, W: Write> {
    wr: &'w mut W,
}

impl<'w, W: Write> MapWriter<'w, W> {
    pub(crate) fn begin(wr: &'w mut W, entries: u32) -> Result<Self, WrpError> {
        encode::write_map_len(&mut *wr, entries).map_err(value_write_error)?;
        Ok(Self { wr })
    }

    fn key(&mut self, key: &str) -> Result<(), WrpError> {
        encode::write_str(self.wr, key).map_err(value_write_error)
    }

    pub(crate) fn msg_type(&mut self, msg_type: MsgType) -> Result<(), WrpError> {
        self.int(KEY_MSG_TYPE, i64::from(msg_type.as_u8()))
    }

    pub(crate) fn int(&mut self, key: &str, value: i64) -> Result<(), WrpError> {
        self.key(key)?;
        encode::write_sint(self.wr, value).map_err(value_write_error)?;
        Ok(())
    }

    pub(crate) fn str(&mut self, key: &str, value: &str) -> Result<(), WrpError> {
        self.key(key)?;
        encode::write_str(self.wr, value).map_err(value_write_error)
    }

    pub(crate) fn bin(&mut self, key: &str, value: &[u8]) -> Result<(), WrpError> {
        self.key(key)?;
        encode::write_bin(self.wr, value).map_err(value_write_error)
    }

    pub(crate) fn opt_int(&mut self, key: &str, value: Option<i32>) -> Result<(), WrpError> {
        match value {
            Some(value) => self.int(key, i64::from(value)),
            None => Ok(()),
        }
    }

    pub(crate) fn opt_str(&mut self, key: &str, value: Option<&str>) -> Result<(), WrpError> {
        match value {
            Some(value) => self.str(key, value),
            None => Ok(()),
        }
    }

    pub(crate) fn opt_bin(&mut self, key: &str, value: Option<&[u8]>) -> Result<(), WrpError> {
        match value {
            Some(value) => self.bin(key, value),
            None => Ok(()),
        }
    }

    pub(crate) fn str_list(&mut self, key: &str, values: &[String]) -> Result<(), WrpError> {
        if values.is_empty() {
            return Ok(());
        }
        self.key(key)?;
        encode::write_array_len(self.wr, wire_len(values.len())?).map_err(value_write_error)?;
        for value in values {
            encode::write_str(self.wr, value).map_err(value_write_error)?;
        }
        Ok(())
    }

    pub(crate) fn nvp_list(&mut self, key: &str, values: &[Nvp]) -> Result<(), WrpError> {
        if values.is_empty() {
            return Ok(());
        }
        self.key(key)?;
        encode::write_map_len(self.wr, wire_len(values.len())?).map_err(value_write_error)?;
        for nvp in values {
            encode::write_str(self.wr, &nvp.name).map_err(value_write_error)?;
            match &nvp.value {
                Some(value) => encode::write_str(self.wr, value).map_err(value_write_error)?,
                None => encode::write_nil(self.wr).map_err(map_write_error)?,
            }
        }
        Ok(())
    }
}

fn wire_len(len: usize) -> Result<u32, WrpError> {
    u32::try_from(len).map_err(|_| WrpError::MsgTooBig)
}

/// Index over the top-level map of a parsed message.
///
/// Building the index rejects duplicate string keys. Keys that are not
/// strings are skipped, as are keys no variant asks for.
pub(crate) struct WireMap<'v> {
    fields: HashMap<&'v str, &'v Value>,
}

impl<'v> WireMap<'v> {
    pub(crate) fn new(entries: &'v [(Value, Value)]) -> Result<Self, WrpError> {
        let mut fields = HashMap::with_capacity(entries.len());
        for (key, value) in entries {
            let Some(key) = key.as_str() else {
                continue;
            };
            if fields.insert(key, value).is_some() {
                log::debug!("duplicate key '{key}' in wrp message");
                return Err(WrpError::NotAWrpMessage);
            }
        }
        Ok(Self { fields })
    }

    fn required(&self, key: &str) -> Result<&'v Value, WrpError> {
        self.fields.get(key).copied().ok_or_else(|| {
            log::debug!("required key '{key}' missing");
            WrpError::NotAWrpMessage
        })
    }

    pub(crate) fn msg_type(&self) -> Result<MsgType, WrpError> {
        let raw = self.required(KEY_MSG_TYPE)?;
        let raw = raw.as_u64().and_then(|value| u8::try_from(value).ok()).ok_or_else(|| {
            log::debug!("msg_type is not a u8 integer: {raw}");
            WrpError::NotAWrpMessage
        })?;
        MsgType::try_from(raw).map_err(|err| {
            log::debug!("unknown msg_type {raw}");
            err
        })
    }

    pub(crate) fn required_int(&self, key: &str) -> Result<i32, WrpError> {
        as_i32(key, self.required(key)?)
    }

    pub(crate) fn optional_int(&self, key: &str) -> Result<Option<i32>, WrpError> {
        self.fields.get(key).map(|value| as_i32(key, value)).transpose()
    }

    pub(crate) fn required_str(&self, key: &str) -> Result<String, WrpError> {
        as_string(key, self.required(key)?)
    }

    pub(crate) fn optional_str(&self, key: &str) -> Result<Option<String>, WrpError> {
        self.fields.get(key).map(|value| as_string(key, value)).transpose()
    }

    pub(crate) fn required_bin(&self, key: &str) -> Result<Vec<u8>, WrpError> {
        as_bin(key, self.required(key)?)
    }

    pub(crate) fn optional_bin(&self, key: &str) -> Result<Option<Vec<u8>>, WrpError> {
        self.fields.get(key).map(|value| as_bin(key, value)).transpose()
    }

    pub(crate) fn str_list(&self, key: &str) -> Result<Vec<String>, WrpError> {
        let Some(value) = self.fields.get(key) else {
            return Ok(Vec::new());
        };
        let Value::Array(items) = value else {
            return Err(type_mismatch(key, "array", value));
        };
        items.iter().map(|item| as_string(key, item)).collect()
    }

    pub(crate) fn nvp_list(&self, key: &str) -> Result<Vec<Nvp>, WrpError> {
        let Some(value) = self.fields.get(key) else {
            return Ok(Vec::new());
        };
        let Value::Map(entries) = value else {
            return Err(type_mismatch(key, "map", value));
        };
        let mut nvps = Vec::with_capacity(entries.len());
        for (name, value) in entries {
            let name = name.as_str().ok_or_else(|| type_mismatch(key, "string key", name))?;
            nvps.push(Nvp { name: name.to_string(), value: nvp_value(key, value)? });
        }
        Ok(nvps)
    }
}

/// Metadata values are carried as strings. Scalars other than binary are
/// converted to their text form; nil marks an absent value.
fn nvp_value(key: &str, value: &Value) -> Result<Option<String>, WrpError> {
    match value {
        Value::Nil => Ok(None),
        Value::String(_) => as_string(key, value).map(Some),
        Value::Boolean(flag) => Ok(Some(flag.to_string())),
        Value::Integer(n) => n
            .as_i64()
            .map(|n| n.to_string())
            .or_else(|| n.as_u64().map(|n| n.to_string()))
            .map(Some)
            .ok_or_else(|| type_mismatch(key, "integer", value)),
        _ => Err(type_mismatch(key, "string, integer, boolean or nil", value)),
    }
}

fn as_i32(key: &str, value: &Value) -> Result<i32, WrpError> {
    let Value::Integer(n) = value else {
        return Err(type_mismatch(key, "integer", value));
    };
    n.as_i64().and_then(|n| i32::try_from(n).ok()).ok_or_else(|| {
        log::debug!("key '{key}' integer {n} is out of i32 range");
        WrpError::NotAWrpMessage
    })
}

fn as_string(key: &str, value: &Value) -> Result<String, WrpError> {
    match value {
        Value::String(text) => text.as_str().map(str::to_string).ok_or_else(|| {
            log::debug!("key '{key}' holds a string that is not valid utf-8");
            WrpError::NotAWrpMessage
        }),
        _ => Err(type_mismatch(key, "string", value)),
    }
}

fn as_bin(key: &str, value: &Value) -> Result<Vec<u8>, WrpError> {
    match value {
        Value::Binary(bytes) => Ok(bytes.clone()),
        _ => Err(type_mismatch(key, "binary", value)),
    }
}

fn type_mismatch(key: &str, expected: &str, found: &Value) -> WrpError {
    log::debug!("key '{key}' expected {expected}, found {found}");
    WrpError::NotAWrpMessage
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: Vec<(&str, Value)>) -> Vec<(Value, Value)> {
        pairs.into_iter().map(|(key, value)| (Value::from(key), value)).collect()
    }

    #[test]
    fn optional_fields_are_skipped_when_unset() {
        let mut buf = Vec::new();
        let mut map = MapWriter::begin(&mut buf, 0).expect("begin");
        map.opt_str("accept", None).expect("str");
        map.opt_int("rdr", None).expect("int");
        map.opt_bin("payload", None).expect("bin");
        map.str_list("headers", &[]).expect("list");
        map.nvp_list("metadata", &[]).expect("nvp");
        assert_eq!(buf, vec![0x80]);
    }

    #[test]
    fn required_string_placeholder_is_empty_str() {
        let mut buf = Vec::new();
        MapWriter::begin(&mut buf, 1).expect("begin").str("dest", "").expect("str");
        assert_eq!(buf, [&[0x81, 0xa4][..], b"dest", &[0xa0]].concat());
    }

    #[test]
    fn absent_metadata_value_is_written_as_nil() {
        let mut buf = Vec::new();
        MapWriter::begin(&mut buf, 1)
            .expect("begin")
            .nvp_list("metadata", &[Nvp::absent("k")])
            .expect("nvp");
        assert_eq!(buf, [&[0x81, 0xa8][..], b"metadata", &[0x81, 0xa1, b'k', 0xc0]].concat());
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let raw = entries(vec![("dest", Value::from("a")), ("dest", Value::from("b"))]);
        assert!(matches!(WireMap::new(&raw), Err(WrpError::NotAWrpMessage)));
    }

    #[test]
    fn non_string_keys_are_ignored() {
        let raw = vec![(Value::from(1), Value::from("x")), (Value::from("url"), Value::from("u"))];
        let map = WireMap::new(&raw).expect("index");
        assert_eq!(map.required_str("url"), Ok("u".to_string()));
    }

    #[test]
    fn missing_required_and_optional() {
        let raw = entries(vec![]);
        let map = WireMap::new(&raw).expect("index");
        assert_eq!(map.required_str("dest"), Err(WrpError::NotAWrpMessage));
        assert_eq!(map.optional_str("accept"), Ok(None));
        assert_eq!(map.optional_int("rdr"), Ok(None));
        assert_eq!(map.optional_bin("payload"), Ok(None));
        assert_eq!(map.str_list("headers"), Ok(Vec::new()));
        assert_eq!(map.nvp_list("metadata"), Ok(Vec::new()));
    }

    #[test]
    fn wrong_wire_types_fail() {
        let raw = entries(vec![
            ("dest", Value::from(5)),
            ("payload", Value::from("text")),
            ("status", Value::from("200")),
            ("accept", Value::Nil),
        ]);
        let map = WireMap::new(&raw).expect("index");
        assert_eq!(map.required_str("dest"), Err(WrpError::NotAWrpMessage));
        assert_eq!(map.required_bin("payload"), Err(WrpError::NotAWrpMessage));
        assert_eq!(map.required_int("status"), Err(WrpError::NotAWrpMessage));
        assert_eq!(map.optional_str("accept"), Err(WrpError::NotAWrpMessage));
    }

    #[test]
    fn integers_outside_i32_fail() {
        let raw = entries(vec![
            ("status", Value::from(i64::from(i32::MAX) + 1)),
            ("rdr", Value::from(i64::from(i32::MIN))),
        ]);
        let map = WireMap::new(&raw).expect("index");
        assert_eq!(map.required_int("status"), Err(WrpError::NotAWrpMessage));
        assert_eq!(map.optional_int("rdr"), Ok(Some(i32::MIN)));
    }

    #[test]
    fn metadata_values_are_coerced_to_strings() {
        let raw = entries(vec![(
            "metadata",
            Value::Map(vec![
                (Value::from("pos"), Value::from(12)),
                (Value::from("neg"), Value::from(-3)),
                (Value::from("flag"), Value::from(true)),
                (Value::from("empty"), Value::from("")),
                (Value::from("gone"), Value::Nil),
            ]),
        )]);
        let map = WireMap::new(&raw).expect("index");
        assert_eq!(
            map.nvp_list("metadata"),
            Ok(vec![
                Nvp::new("pos", "12"),
                Nvp::new("neg", "-3"),
                Nvp::new("flag", "true"),
                Nvp::new("empty", ""),
                Nvp::absent("gone"),
            ])
        );
    }

    #[test]
    fn metadata_rejects_binary_values_and_non_string_keys() {
        let binary = entries(vec![(
            "metadata",
            Value::Map(vec![(Value::from("blob"), Value::Binary(vec![1, 2]))]),
        )]);
        let map = WireMap::new(&binary).expect("index");
        assert_eq!(map.nvp_list("metadata"), Err(WrpError::NotAWrpMessage));

        let int_key =
            entries(vec![("metadata", Value::Map(vec![(Value::from(1), Value::from("v"))]))]);
        let map = WireMap::new(&int_key).expect("index");
        assert_eq!(map.nvp_list("metadata"), Err(WrpError::NotAWrpMessage));
    }

    #[test]
    fn string_lists_must_be_homogeneous() {
        let raw = entries(vec![(
            "headers",
            Value::Array(vec![Value::from("a"), Value::from(1), Value::from("c")]),
        )]);
        let map = WireMap::new(&raw).expect("index");
        assert_eq!(map.str_list("headers"), Err(WrpError::NotAWrpMessage));
    }

    #[test]
    fn msg_type_bounds() {
        for raw in [Value::from(258), Value::from(-3), Value::from("3")] {
            let bad = entries(vec![("msg_type", raw)]);
            let map = WireMap::new(&bad).expect("index");
            assert_eq!(map.msg_type(), Err(WrpError::NotAWrpMessage));
        }

        let ok = entries(vec![("msg_type", Value::from(9))]);
        assert_eq!(WireMap::new(&ok).expect("index").msg_type(), Ok(MsgType::SvcReg));
    }
}
