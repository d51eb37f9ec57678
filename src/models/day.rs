//! Day-of-week names
//!
//! Plans name days loosely ("Tue", "Tues", "Tuesday"); everything downstream
//! works with `chrono::Weekday` and writes the canonical full name.

use chrono::Weekday;

pub fn parse_day_name(text: &str) -> Option<Weekday> {
  let lower = text.trim().trim_end_matches('.').to_lowercase();
  let day = match lower.as_str() {
    "mon" | "monday" => Weekday::Mon,
    "tue" | "tues" | "tuesday" => Weekday::Tue,
    "wed" | "weds" | "wednesday" => Weekday::Wed,
    "thu" | "thur" | "thurs" | "thursday" => Weekday::Thu,
    "fri" | "friday" => Weekday::Fri,
    "sat" | "saturday" => Weekday::Sat,
    "sun" | "sunday" => Weekday::Sun,
    _ => return None,
  };
  Some(day)
}

pub fn full_day_name(day: Weekday) -> &'static str {
  match day {
    Weekday::Mon => "Monday",
    Weekday::Tue => "Tuesday",
    Weekday::Wed => "Wednesday",
    Weekday::Thu => "Thursday",
    Weekday::Fri => "Friday",
    Weekday::Sat => "Saturday",
    Weekday::Sun => "Sunday",
  }
}

/// Serde adapter for a single day written as its full name
pub mod name {
  use chrono::Weekday;
  use serde::{de::Error, Deserialize, Deserializer, Serializer};

  pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(super::full_day_name(*day))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
    let text = String::deserialize(deserializer)?;
    super::parse_day_name(&text).ok_or_else(|| D::Error::custom(format!("Unknown day: {}", text)))
  }
}

/// Serde adapter for a list of days written as full names
pub mod names {
  use chrono::Weekday;
  use serde::{de::Error, ser::SerializeSeq, Deserialize, Deserializer, Serializer};

  pub fn serialize<S: Serializer>(days: &[Weekday], serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(days.len()))?;
    for day in days {
      seq.serialize_element(super::full_day_name(*day))?;
    }
    seq.end()
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Weekday>, D::Error> {
    let texts = Vec::<String>::deserialize(deserializer)?;
    texts
      .iter()
      .map(|t| super::parse_day_name(t).ok_or_else(|| D::Error::custom(format!("Unknown day: {}", t))))
      .collect()
  }
}
