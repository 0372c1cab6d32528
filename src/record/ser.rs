use crate::record::{Fields, Throwable, Value};
use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut model = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            model.serialize_entry(key, value)?;
        }
        model.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Seq(items) => serializer.collect_seq(items),
            Value::Map(fields) => fields.serialize(serializer),
            Value::Time(timestamp) => serializer.serialize_str(&timestamp.to_rfc3339()),
            Value::Object { class, fields } => {
                let mut model = serializer.serialize_map(Some(1))?;
                model.serialize_entry(class, fields)?;
                model.end()
            }
            Value::Error(throwable) => throwable.serialize(serializer),
        }
    }
}

impl Serialize for Throwable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut model = serializer.serialize_struct("Throwable", 6)?;
        model.serialize_field("class", &self.kind)?;
        model.serialize_field("message", &self.message)?;
        model.serialize_field("code", &self.code)?;
        model.serialize_field("file", &format_args!("{}:{}", self.file, self.line))?;
        model.serialize_field("trace", &self.trace)?;
        model.serialize_field("previous", &self.previous)?;
        model.end()
    }
}
