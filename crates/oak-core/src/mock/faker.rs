//! Random primitive values for mock synthesis.

use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::{Number, Value};

const WORDS: &[&str] = &[
    "alias", "amet", "aperiam", "beatae", "culpa", "dolor", "dolorem", "eius", "enim", "eos",
    "est", "fugiat", "ipsam", "ipsum", "labore", "lorem", "magnam", "minima", "modi", "nemo",
    "nihil", "odio", "omnis", "quia", "quos", "rerum", "sint", "sit", "totam", "velit",
];

const TLDS: &[&str] = &["com", "net", "org", "io", "dev"];

/// Upper bound for generated integers and floats.
const NUMBER_MAX: i64 = 99_999;

/// Generated dates fall between 2000-01-01 and 2030-01-01 (UTC).
const EPOCH_START: i64 = 946_684_800;
const EPOCH_END: i64 = 1_893_456_000;

pub fn word<R: Rng + ?Sized>(rng: &mut R) -> String {
    WORDS.choose(rng).copied().unwrap_or("lorem").to_string()
}

pub fn integer<R: Rng + ?Sized>(rng: &mut R) -> Value {
    Value::from(rng.gen_range(0..=NUMBER_MAX))
}

/// A float in `[0, 99999]` rounded to one decimal place.
pub fn float<R: Rng + ?Sized>(rng: &mut R) -> Value {
    let raw: f64 = rng.gen_range(0.0..=NUMBER_MAX as f64);
    let rounded = (raw * 10.0).round() / 10.0;
    Number::from_f64(rounded).map_or(Value::Null, Value::Number)
}

pub fn boolean<R: Rng + ?Sized>(rng: &mut R) -> Value {
    Value::Bool(rng.gen_bool(0.5))
}

pub fn uuid<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes[..]);
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string()
}

pub fn uri<R: Rng + ?Sized>(rng: &mut R) -> String {
    let tld = TLDS.choose(rng).copied().unwrap_or("com");
    format!("https://{}.{}/{}", word(rng), tld, word(rng))
}

pub fn email<R: Rng + ?Sized>(rng: &mut R) -> String {
    let tld = TLDS.choose(rng).copied().unwrap_or("com");
    format!("{}.{}@{}.{}", word(rng), word(rng), word(rng), tld)
}

/// A calendar date, `YYYY-MM-DD`.
pub fn date<R: Rng + ?Sized>(rng: &mut R) -> String {
    timestamp(rng)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "2000-01-01".to_string())
}

/// An RFC 3339 timestamp with millisecond precision, `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub fn date_time<R: Rng + ?Sized>(rng: &mut R) -> String {
    timestamp(rng)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| "2000-01-01T00:00:00.000Z".to_string())
}

pub fn ipv4<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut octets = [0u8; 4];
    rng.fill(&mut octets[..]);
    Ipv4Addr::from(octets).to_string()
}

pub fn ipv6<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut octets = [0u8; 16];
    rng.fill(&mut octets[..]);
    Ipv6Addr::from(octets).to_string()
}

/// A short binary literal such as `0b10110010`.
pub fn binary<R: Rng + ?Sized>(rng: &mut R) -> String {
    let bits: String = (0..8)
        .map(|_| if rng.gen_bool(0.5) { '1' } else { '0' })
        .collect();
    format!("0b{bits}")
}

fn timestamp<R: Rng + ?Sized>(rng: &mut R) -> Option<DateTime<Utc>> {
    let secs = rng.gen_range(EPOCH_START..EPOCH_END);
    let nanos: u32 = rng.gen_range(0..1000) * 1_000_000;
    DateTime::<Utc>::from_timestamp(secs, nanos)
}
