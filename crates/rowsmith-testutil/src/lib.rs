use chrono::NaiveDate;
use indexmap::IndexMap;
use rowsmith_core::schema::{Bound, FieldSpec, FieldType, Schema};
use rowsmith_core::{Dataset, Value};

/// A field with no constraints.
pub fn field(name: &str, field_type: FieldType) -> FieldSpec {
    FieldSpec::new(name, field_type)
}

/// An `int` field over `[min, max]`.
pub fn int_field(name: &str, min: i64, max: i64) -> FieldSpec {
    let mut f = FieldSpec::new(name, FieldType::Int);
    f.min = Some(Bound::Int(min));
    f.max = Some(Bound::Int(max));
    f
}

/// A `float` field over `[min, max]` rounded to `decimals`.
pub fn float_field(name: &str, min: f64, max: f64, decimals: u32) -> FieldSpec {
    let mut f = FieldSpec::new(name, FieldType::Float);
    f.min = Some(Bound::Float(min));
    f.max = Some(Bound::Float(max));
    f.decimals = Some(decimals);
    f
}

/// An `enum` field choosing among string options.
pub fn enum_field(name: &str, values: &[&str]) -> FieldSpec {
    let mut f = FieldSpec::new(name, FieldType::Enum);
    f.values = Some(values.iter().map(|v| serde_json_string(v)).collect());
    f
}

/// A `string` field of fixed length.
pub fn string_field(name: &str, length: usize) -> FieldSpec {
    let mut f = FieldSpec::new(name, FieldType::String);
    f.length = Some(length);
    f
}

fn serde_json_string(s: &str) -> serde_json::Value {
    serde_json::Value::String(s.to_string())
}

pub fn nullable(mut f: FieldSpec) -> FieldSpec {
    f.nullable = true;
    f
}

pub fn unique(mut f: FieldSpec) -> FieldSpec {
    f.unique = true;
    f
}

pub fn pk(mut f: FieldSpec) -> FieldSpec {
    f.pk = true;
    f
}

/// A device inventory table: string primary key, a unique 12-digit IMEI,
/// enums with repeated options, nullable free text, and datetimes.
pub fn device_schema() -> Schema {
    let mut schema = Schema::new(vec![
        enum_field("iddatabase", &["AGROVISIONCORP"]),
        enum_field("idempresa", &["001", "002"]),
        pk(string_field("iddevice", 10)),
        unique(int_field("imei", 100_000_000_000, 999_999_999_999)),
        int_field("numero", 1_000_000, 9_999_999),
        enum_field(
            "marca",
            &["SAMSUNG", "RENO", "PRO13", "MOTO", "OPPO", "RENO 7", "NOKIA", "S20+", "GX912"],
        ),
        string_field("modelo", 3),
        field("fechaactualizacion", FieldType::DateTime),
        enum_field("idestado", &["INO", "AC", "PER"]),
        nullable(string_field("observacion", 20)),
        int_field("activo", 1, 1),
        enum_field("idcategoria", &["CORP", "LAB", "CORP", "SPR"]),
        nullable(string_field("responsable", 30)),
        nullable(field("fechaultimaentrega", FieldType::DateTime)),
    ]);
    schema.table = Some("device".to_string());
    schema
}

/// One field of every built-in type.
pub fn all_types_schema() -> Schema {
    let mut email = field("email", FieldType::Email);
    email.unique = true;
    let mut phone = field("phone", FieldType::Phone);
    phone.format = Some("+1 (###) ###-####".to_string());
    let mut tenant = field("tenant", FieldType::Static);
    tenant.value = Some(serde_json_string("acme"));
    let mut born = field("born", FieldType::Date);
    born.start_year = Some(1950);
    born.end_year = Some(2005);

    let mut schema = Schema::new(vec![
        pk(field("id", FieldType::Uuid)),
        string_field("code", 6),
        int_field("age", 18, 90),
        float_field("balance", 0.0, 5000.0, 2),
        field("active", FieldType::Boolean),
        born,
        field("created_at", FieldType::DateTime),
        field("login_time", FieldType::Time),
        enum_field("status", &["active", "pending", "banned"]),
        email,
        phone,
        field("full_name", FieldType::Name),
        nullable(field("address", FieldType::Address)),
        field("last_ip", FieldType::Ip),
        tenant,
    ]);
    schema.table = Some("users".to_string());
    schema
}

/// A small hand-built dataset with values that stress escaping: quotes,
/// commas, backslashes, non-ASCII text, and nulls.
pub fn sample_dataset() -> Dataset {
    let day = NaiveDate::from_ymd_opt(2023, 7, 14).unwrap_or_default();
    let rows = vec![
        row(vec![
            ("id", Value::Int(1)),
            ("name", Value::owned("O'Brien, Pat".to_string())),
            ("score", Value::Float(12.5)),
            ("active", Value::Bool(true)),
            ("joined", Value::Date(day)),
            ("note", Value::Null),
        ]),
        row(vec![
            ("id", Value::Int(2)),
            ("name", Value::owned("Zoë \"Z\" Müller".to_string())),
            ("score", Value::Float(0.25)),
            ("active", Value::Bool(false)),
            ("joined", Value::Date(day)),
            ("note", Value::owned("C:\\temp\\notes".to_string())),
        ]),
        row(vec![
            ("id", Value::Int(3)),
            ("name", Value::owned("Lee".to_string())),
            ("score", Value::Float(100.0)),
            ("active", Value::Bool(true)),
            ("joined", Value::Date(day)),
            ("note", Value::owned("multi\nline".to_string())),
        ]),
    ];
    Dataset::new(rows)
}

fn row(pairs: Vec<(&str, Value)>) -> IndexMap<String, Value> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}
