use std::borrow::Cow;

use chrono::{Duration as ChronoDuration, NaiveTime};
use rand::Rng;

use crate::error::Result;
use crate::generate::corpus::TextCorpus;
use crate::generate::plan::{FieldStrategy, PhoneFormat, EMAIL_LOCAL_LENGTH};
use crate::generate::value::Value;

/// Wrap a dynamically generated String into a Value::String.
#[inline]
fn owned(s: String) -> Value {
    Value::String(Cow::Owned(s))
}

/// Generate one value for a field strategy.
///
/// Pure with respect to everything but the RNG: nullability and uniqueness
/// are applied by the row generator, not here. Only custom generators can
/// fail.
pub fn generate_value<R: Rng>(
    strategy: &FieldStrategy,
    rng: &mut R,
    corpus: &dyn TextCorpus,
) -> Result<Value> {
    let value = match strategy {
        FieldStrategy::Text { length, charset } => owned(
            (0..*length)
                .map(|_| charset[rng.random_range(0..charset.len())])
                .collect(),
        ),
        FieldStrategy::Int { min, max } => Value::Int(rng.random_range(*min..=*max)),
        FieldStrategy::Float {
            min_units,
            max_units,
            scale,
        } => {
            let units = rng.random_range(*min_units..=*max_units);
            Value::Float(units as f64 / scale)
        }
        FieldStrategy::Boolean => Value::Bool(rng.random_bool(0.5)),
        FieldStrategy::Date { start, end } => {
            let span = (*end - *start).num_days();
            Value::Date(*start + ChronoDuration::days(rng.random_range(0..=span)))
        }
        FieldStrategy::DateTime { start, end } => {
            let span = (*end - *start).num_seconds();
            Value::DateTime(*start + ChronoDuration::seconds(rng.random_range(0..=span)))
        }
        FieldStrategy::Time => {
            let hour = rng.random_range(0..24);
            let min = rng.random_range(0..60);
            let sec = rng.random_range(0..60);
            Value::Time(NaiveTime::from_hms_opt(hour, min, sec).unwrap_or_default())
        }
        FieldStrategy::Enum { values } => values[rng.random_range(0..values.len())].clone(),
        FieldStrategy::Email { domains } => {
            let local: String = (0..EMAIL_LOCAL_LENGTH)
                .map(|_| char::from(b'a' + rng.random_range(0..26u8)))
                .collect();
            let domain = &domains[rng.random_range(0..domains.len())];
            owned(format!("{}@{}", local, domain))
        }
        FieldStrategy::Phone(PhoneFormat::Digits(count)) => owned(
            (0..*count)
                .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
                .collect(),
        ),
        FieldStrategy::Phone(PhoneFormat::Pattern(pattern)) => owned(
            pattern
                .chars()
                .map(|c| match c {
                    '#' => char::from(b'0' + rng.random_range(0..10u8)),
                    other => other,
                })
                .collect(),
        ),
        FieldStrategy::Uuid => {
            // Drawn from the session RNG rather than the OS so seeded runs reproduce.
            let mut bytes = [0u8; 16];
            rng.fill(&mut bytes);
            Value::Uuid(uuid::Builder::from_random_bytes(bytes).into_uuid())
        }
        FieldStrategy::Name => owned(corpus.full_name(&mut *rng)),
        FieldStrategy::Address => owned(corpus.address(&mut *rng)),
        FieldStrategy::Ip => {
            let octets: [u8; 4] = rng.random();
            owned(format!(
                "{}.{}.{}.{}",
                octets[0], octets[1], octets[2], octets[3]
            ))
        }
        FieldStrategy::Static(value) => value.clone(),
        FieldStrategy::Custom { handle, spec, .. } => {
            return handle.generate(spec, &mut *rng);
        }
    };
    Ok(value)
}
