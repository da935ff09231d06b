//! Streaming extraction of attribute values from record files.
//!
//! A file holds one JSON array of record objects. The array is walked element
//! by element and only the selected field of each record is decoded; every
//! other field is skipped without being stored.

use crate::attribute::Attribute;
use crate::errors::ParseError;
use crate::tally::TallyTable;
use serde::Deserialize;
use serde::de::{
    self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Unexpected, Visitor,
};
use serde_json::Value;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Tally the selected attribute of every record read from `reader`.
///
/// Returns the number of records seen.
pub fn count_records<R: Read>(
    reader: R,
    attribute: Attribute,
    tally: &TallyTable,
) -> Result<u64, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_reader(reader);
    let records = (&mut de).deserialize_seq(Records { attribute, tally })?;
    de.end()?;
    Ok(records)
}

/// Tally the selected attribute of every record in the file at `path`.
pub fn count_file(
    path: &Path,
    attribute: Attribute,
    tally: &TallyTable,
) -> Result<u64, ParseError> {
    let to_error = |source: serde_json::Error| ParseError {
        path: path.to_owned(),
        source,
    };
    let file = File::open(path).map_err(|e| to_error(serde_json::Error::io(e)))?;
    count_records(BufReader::new(file), attribute, tally).map_err(to_error)
}

struct Records<'a> {
    attribute: Attribute,
    tally: &'a TallyTable,
}

impl<'de> Visitor<'de> for Records<'_> {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of records")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<u64, A::Error> {
        let record = Record {
            attribute: self.attribute,
            tally: self.tally,
        };
        let mut n = 0;
        while seq.next_element_seed(record)?.is_some() {
            n += 1;
        }
        Ok(n)
    }
}

#[derive(Clone, Copy)]
struct Record<'a> {
    attribute: Attribute,
    tally: &'a TallyTable,
}

impl<'de> DeserializeSeed<'de> for Record<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for Record<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a record object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        // A repeated key is counted every time it occurs.
        while let Some(selected) = map.next_key_seed(KeyMatches(self.attribute.key()))? {
            if !selected {
                map.next_value::<IgnoredAny>()?;
                continue;
            }
            let text = match self.attribute {
                Attribute::Developer => {
                    map.next_value::<Option<Developer>>()?.and_then(|d| d.name)
                }
                Attribute::YearReleased | Attribute::Genre => Some(map.next_value::<Text>()?.0),
            };
            if let Some(text) = text {
                self.tally.record(&text);
            }
        }
        Ok(())
    }
}

/// Decodes a field name into whether it equals the wanted one.
struct KeyMatches(&'static str);

impl<'de> DeserializeSeed<'de> for KeyMatches {
    type Value = bool;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<bool, D::Error> {
        deserializer.deserialize_str(self)
    }
}

impl<'de> Visitor<'de> for KeyMatches {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a field name")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
        Ok(v == self.0)
    }
}

/// Textual form of a scalar value.
///
/// Numbers keep the exact text they have in the input, so `2017.0` and
/// `2017` are different values.
struct Text(String);

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Text, D::Error> {
        let text = match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => "null".to_owned(),
            Value::Array(_) => return Err(not_scalar(Unexpected::Seq)),
            Value::Object(_) => return Err(not_scalar(Unexpected::Map)),
        };
        Ok(Text(text))
    }
}

fn not_scalar<E: de::Error>(unexp: Unexpected) -> E {
    E::invalid_type(unexp, &"a string, number, boolean or null")
}

/// The `developer` field: an object whose `name` is the tallied value.
///
/// A `null` developer is handled by the surrounding `Option`.
struct Developer {
    name: Option<String>,
}

impl<'de> Deserialize<'de> for Developer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Developer, D::Error> {
        deserializer.deserialize_map(DeveloperVisitor)
    }
}

struct DeveloperVisitor;

impl<'de> Visitor<'de> for DeveloperVisitor {
    type Value = Developer;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a developer object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Developer, A::Error> {
        let mut name = None;
        while let Some(is_name) = map.next_key_seed(KeyMatches("name"))? {
            if is_name {
                name = Some(map.next_value::<Text>()?.0);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(Developer { name })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const ZELDA: &str = r#"[
      {
        "title": "The Legend of Zelda: Breath of the Wild",
        "developer": { "name": "Nintendo EPD" },
        "yearReleased": 2017,
        "genre": "Action, Adventure"
      }
    ]"#;

    fn tally(json: &str, attribute: Attribute) -> TallyTable {
        let t = TallyTable::new();
        count_records(json.as_bytes(), attribute, &t).unwrap();
        t
    }

    #[test]
    fn genre_is_split() {
        let t = tally(ZELDA, Attribute::Genre);
        assert_eq!(t.sorted(), vec![("Action".to_owned(), 1), ("Adventure".to_owned(), 1)]);
    }

    #[test]
    fn developer_is_nested() {
        let t = tally(ZELDA, Attribute::Developer);
        assert_eq!(t.sorted(), vec![("Nintendo EPD".to_owned(), 1)]);
    }

    #[test]
    fn year_is_text() {
        let t = tally(ZELDA, Attribute::YearReleased);
        assert_eq!(t.sorted(), vec![("2017".to_owned(), 1)]);
    }

    #[test]
    fn record_count() {
        let t = TallyTable::new();
        let json = r#"[{"genre": "RPG"}, {"title": "x"}, {}]"#;
        assert_eq!(count_records(json.as_bytes(), Attribute::Genre, &t).unwrap(), 3);
        assert_eq!(t.sorted(), vec![("RPG".to_owned(), 1)]);
        assert_eq!(count_records("[]".as_bytes(), Attribute::Genre, &t).unwrap(), 0);
    }

    #[test]
    fn nested_fields_are_skipped() {
        let json = r#"[{"extra": {"genre": "Hidden", "list": [1, {"genre": "x"}]}, "genre": "Puzzle"}]"#;
        let t = tally(json, Attribute::Genre);
        assert_eq!(t.sorted(), vec![("Puzzle".to_owned(), 1)]);
    }

    #[test]
    fn repeated_key_counts_twice() {
        let json = r#"[{"genre": "Action", "genre": "Action, Racing"}]"#;
        let t = tally(json, Attribute::Genre);
        assert_eq!(t.count("Action"), 2);
        assert_eq!(t.count("Racing"), 1);
    }

    #[test]
    fn empty_value_is_counted() {
        let t = tally(r#"[{"genre": ""}]"#, Attribute::Genre);
        assert_eq!(t.sorted(), vec![("".to_owned(), 1)]);
    }

    #[test]
    fn developer_variants() {
        let json = r#"[
            {"developer": {"country": "JP", "name": "Capcom"}},
            {"developer": {"country": "US"}},
            {"developer": null},
            {"developer": {"name": "Bungie, Microsoft"}}
        ]"#;
        let t = tally(json, Attribute::Developer);
        assert_eq!(
            t.sorted(),
            vec![
                ("Bungie".to_owned(), 1),
                ("Capcom".to_owned(), 1),
                ("Microsoft".to_owned(), 1)
            ]
        );
    }

    #[test]
    fn scalar_variants() {
        let json = r#"[{"genre": true}, {"genre": null}, {"genre": 1.5}, {"genre": -3}]"#;
        let t = tally(json, Attribute::Genre);
        assert_eq!(t.count("true"), 1);
        assert_eq!(t.count("null"), 1);
        assert_eq!(t.count("1.5"), 1);
        assert_eq!(t.count("-3"), 1);
    }

    #[test]
    fn malformed_input() {
        let t = TallyTable::new();
        for json in [
            "[{]}",
            "",
            "{}",
            "[1, 2]",
            r#"[{"genre": "x"}"#,
            r#"[{"genre": ["a", "b"]}]"#,
            r#"[{"developer": "Capcom"}]"#,
            "[] []",
        ] {
            let attribute = if json.contains("developer") {
                Attribute::Developer
            } else {
                Attribute::Genre
            };
            assert!(
                count_records(json.as_bytes(), attribute, &t).is_err(),
                "accepted {json:?}"
            );
        }
    }

    #[test]
    fn numbers_keep_their_text() {
        let json = r#"[
            {"yearReleased": 2017.0},
            {"yearReleased": 1e3},
            {"yearReleased": 1.10},
            {"yearReleased": 123456789012345678901234},
            {"yearReleased": 2017}
        ]"#;
        let t = tally(json, Attribute::YearReleased);
        assert_eq!(
            t.sorted(),
            vec![
                ("1.10".to_owned(), 1),
                ("123456789012345678901234".to_owned(), 1),
                ("1e3".to_owned(), 1),
                ("2017".to_owned(), 1),
                ("2017.0".to_owned(), 1),
            ]
        );
    }

    #[test]
    fn developer_must_be_an_object() {
        let t = TallyTable::new();
        for json in [r#"[{"developer": 42}]"#, r#"[{"developer": ["Capcom"]}]"#] {
            assert!(count_records(json.as_bytes(), Attribute::Developer, &t).is_err());
        }
        assert!(t.is_empty());
    }

    #[test]
    fn missing_file() {
        let t = TallyTable::new();
        let e = count_file(Path::new("does/not/exist.json"), Attribute::Genre, &t).unwrap_err();
        assert_eq!(e.path, Path::new("does/not/exist.json"));
        assert!(e.source.is_io());
    }
}
