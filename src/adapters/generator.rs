//! Generates structurally-matching payloads for a resolved type shape.

use crate::domain::{FieldDescriptor, FieldKind, TypeDescriptor};
use anyhow::Result;
use chrono::{Duration, Utc};
use fake::faker::address::en::{CityName, CountryName, PostCode, StreetName};
use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::lorem::en::{Sentence, Word};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::Rng;
use serde_json::{json, Map, Value};

/// Boundary to the payload generator; the engine treats a failure here as an
/// opaque error to wrap, with no retry.
pub trait GeneratePayload: Send + Sync {
    /// One object matching the descriptor's shape.
    fn generate(&self, descriptor: &TypeDescriptor) -> Result<Value>;

    /// A collection for an array route. Length varies call to call; list
    /// endpoints are supposed to look like changing collections.
    fn generate_many(&self, descriptor: &TypeDescriptor) -> Result<Value> {
        let count = rand::thread_rng().gen_range(2..=10);
        let items = (0..count)
            .map(|_| self.generate(descriptor))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Array(items))
    }
}

/// `fake`-backed generator. Field names steer which faker is used, so a
/// `User { email, city }` comes out looking like a user rather than lorem
/// soup.
pub struct FakeGenerator;

impl GeneratePayload for FakeGenerator {
    fn generate(&self, descriptor: &TypeDescriptor) -> Result<Value> {
        let mut object = Map::new();
        for field in &descriptor.fields {
            object.insert(field.name.clone(), field_value(field));
        }
        Ok(Value::Object(object))
    }
}

fn field_value(field: &FieldDescriptor) -> Value {
    if field.is_array {
        let count = rand::thread_rng().gen_range(1..=5);
        return Value::Array((0..count).map(|_| scalar_value(field)).collect());
    }
    scalar_value(field)
}

fn scalar_value(field: &FieldDescriptor) -> Value {
    match field.kind {
        FieldKind::String => string_value(&field.name),
        FieldKind::Number => number_value(&field.name),
        FieldKind::Boolean => json!(rand::thread_rng().gen_bool(0.5)),
        FieldKind::Date => {
            let days_back = rand::thread_rng().gen_range(0..365);
            json!((Utc::now() - Duration::days(days_back)).to_rfc3339())
        }
        FieldKind::Object => json!({}),
    }
}

fn string_value(name: &str) -> Value {
    let lower = name.to_ascii_lowercase();
    let value: String = if lower == "id" || lower.ends_with("id") || lower.ends_with("uuid") {
        uuid::Uuid::new_v4().to_string()
    } else if lower.contains("email") {
        SafeEmail().fake()
    } else if lower.contains("username") || lower.contains("login") {
        Username().fake()
    } else if lower.contains("firstname") || lower == "first" {
        FirstName().fake()
    } else if lower.contains("lastname") || lower.contains("surname") {
        LastName().fake()
    } else if lower.contains("name") {
        Name().fake()
    } else if lower.contains("phone") {
        PhoneNumber().fake()
    } else if lower.contains("city") {
        CityName().fake()
    } else if lower.contains("country") {
        CountryName().fake()
    } else if lower.contains("street") || lower.contains("address") {
        StreetName().fake()
    } else if lower.contains("zip") || lower.contains("postal") {
        PostCode().fake()
    } else if lower.contains("description") || lower.contains("bio") || lower.contains("summary") {
        Sentence(3..8).fake()
    } else {
        Word().fake()
    };
    json!(value)
}

fn number_value(name: &str) -> Value {
    let lower = name.to_ascii_lowercase();
    let mut rng = rand::thread_rng();
    if lower.contains("age") {
        json!(rng.gen_range(18..90))
    } else if lower.contains("year") {
        json!(rng.gen_range(1970..2027))
    } else if lower.contains("price") || lower.contains("amount") || lower.contains("total") {
        json!((rng.gen_range(1.0..1000.0_f64) * 100.0).round() / 100.0)
    } else if lower.contains("count") || lower.contains("quantity") {
        json!(rng.gen_range(0..100))
    } else {
        json!(rng.gen_range(1..10_000))
    }
}
