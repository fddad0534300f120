//! Puzzle records and the verdict write-back
//!
//! A record is one JSON file describing a single puzzle:
//!
//! ```json
//! {
//!   "original_metadata": { "correct_answer": "...", "answer_options": [...] },
//!   "detection": { "solution": "..." }
//! }
//! ```
//!
//! Records are kept as order-preserving JSON so that everything the evaluator
//! does not own round-trips unchanged. The only field it ever writes is
//! `detection["correct?"]`.

use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{CasefileError, Result};
use crate::parsing::{Verdict, extract_main_culprit_value};

const METADATA_KEY: &str = "original_metadata";
const DETECTION_KEY: &str = "detection";
const CORRECT_ANSWER_KEY: &str = "correct_answer";
const ANSWER_OPTIONS_KEY: &str = "answer_options";
const SOLUTION_KEY: &str = "solution";

/// Key under `detection` that receives the verdict.
pub const VERDICT_KEY: &str = "correct?";

/// Fields a record must provide before it can be judged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// `original_metadata.correct_answer`
    CorrectAnswer,
    /// `original_metadata.answer_options`
    AnswerOptions,
    /// The culprit statement inside `detection.solution`
    Prediction,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::CorrectAnswer => "correct_answer",
            Field::AnswerOptions => "answer_options",
            Field::Prediction => "MAIN CULPRIT(S)",
        })
    }
}

/// The suspect list as stored in the record
#[derive(Debug, Clone, PartialEq)]
pub enum Suspects {
    /// Free-form text, e.g. `"Mustard, Plum, Scarlett"`
    Text(String),
    /// A JSON list of names
    List(Vec<Value>),
}

impl Suspects {
    /// Read `answer_options`; `None` for any falsy value: null, `false`, zero,
    /// or an empty string, list, or object.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null | Value::Bool(false) => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(Suspects::Text(s.clone())),
            Value::Array(items) if items.is_empty() => None,
            Value::Array(items) => Some(Suspects::List(items.clone())),
            Value::Object(map) if map.is_empty() => None,
            other => Some(Suspects::Text(other.to_string())),
        }
    }
}

/// Renders the way it appears in the judge prompt: list items joined by `", "`.
impl fmt::Display for Suspects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suspects::Text(text) => f.write_str(text),
            Suspects::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match item {
                        Value::String(s) => f.write_str(s)?,
                        other => write!(f, "{other}")?,
                    }
                }
                Ok(())
            }
        }
    }
}

/// Everything the oracle needs to judge one record
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub suspects: Suspects,
    pub gold_answer: String,
    pub predicted_answer: String,
}

/// One puzzle record
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Wrap a parsed document. The top level must be a JSON object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(CasefileError::MalformedRecord(format!(
                "expected a JSON object at the top level, found {}",
                kind_of(&other)
            ))),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn section(&self, key: &str) -> Option<&Map<String, Value>> {
        self.fields.get(key).and_then(Value::as_object)
    }

    /// `original_metadata.correct_answer`, if it is a non-empty string
    pub fn gold_answer(&self) -> Option<&str> {
        self.section(METADATA_KEY)
            .and_then(|m| m.get(CORRECT_ANSWER_KEY))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// `original_metadata.answer_options`, if present and non-empty
    pub fn suspects(&self) -> Option<Suspects> {
        self.section(METADATA_KEY)
            .and_then(|m| m.get(ANSWER_OPTIONS_KEY))
            .and_then(Suspects::from_value)
    }

    /// Raw `detection.solution`
    pub fn solution(&self) -> Option<&Value> {
        self.section(DETECTION_KEY).and_then(|d| d.get(SOLUTION_KEY))
    }

    /// Culprit extracted from the solution text
    pub fn predicted_answer(&self) -> Option<String> {
        self.solution().and_then(extract_main_culprit_value)
    }

    /// Verdict already stored under `detection["correct?"]`
    pub fn verdict(&self) -> Option<Verdict> {
        self.section(DETECTION_KEY)
            .and_then(|d| d.get(VERDICT_KEY))
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }

    pub fn is_scored(&self) -> bool {
        self.section(DETECTION_KEY)
            .is_some_and(|d| d.contains_key(VERDICT_KEY))
    }

    /// Collect the oracle input, failing on the first missing field in the
    /// order gold answer, suspects, prediction.
    pub fn case(&self) -> Result<Case> {
        let gold_answer = self
            .gold_answer()
            .ok_or(CasefileError::MissingField(Field::CorrectAnswer))?
            .to_string();
        let suspects = self
            .suspects()
            .ok_or(CasefileError::MissingField(Field::AnswerOptions))?;
        let predicted_answer = self
            .predicted_answer()
            .ok_or(CasefileError::MissingField(Field::Prediction))?;

        Ok(Case {
            suspects,
            gold_answer,
            predicted_answer,
        })
    }
}

/// Store `verdict` under `detection["correct?"]`, replacing any earlier one.
///
/// Nothing else in the record changes. A missing or non-object `detection`
/// is replaced by an object holding only the verdict.
pub fn apply_verdict(mut record: Record, verdict: Verdict) -> Record {
    let detection = record
        .fields
        .entry(DETECTION_KEY)
        .or_insert_with(|| Value::Object(Map::new()));
    if !detection.is_object() {
        *detection = Value::Object(Map::new());
    }
    if let Value::Object(detection) = detection {
        detection.insert(
            VERDICT_KEY.to_string(),
            Value::String(verdict.as_str().to_string()),
        );
    }
    record
}

/// Read and parse a record file.
pub fn load_record(path: impl AsRef<Path>) -> Result<Record> {
    let raw = fs::read_to_string(path.as_ref())?;
    let value: Value = serde_json::from_str(&raw)?;
    Record::from_value(value)
}

/// Overwrite `path` with the full record: two-space indent, non-ASCII kept
/// literal, no trailing newline.
pub fn persist_record(path: impl AsRef<Path>, record: &Record) -> Result<()> {
    let json = serde_json::to_string_pretty(&record.fields)?;
    fs::write(path.as_ref(), json)?;
    Ok(())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> Value {
        json!({
            "puzzle_id": 17,
            "original_metadata": {
                "correct_answer": "Mrs. White",
                "answer_options": ["Mrs. White", "Colonel Mustard", "Miss Scarlett"]
            },
            "detection": {
                "model": "detective-7b",
                "solution": "Clues point one way.\n<MAIN CULPRIT(S)>Mrs. White</MAIN CULPRIT(S)>"
            }
        })
    }

    #[test]
    fn test_case_from_complete_record() {
        let record = Record::from_value(sample()).unwrap();
        let case = record.case().unwrap();
        assert_eq!(case.gold_answer, "Mrs. White");
        assert_eq!(case.predicted_answer, "Mrs. White");
        assert_eq!(
            case.suspects.to_string(),
            "Mrs. White, Colonel Mustard, Miss Scarlett"
        );
    }

    #[test]
    fn test_missing_fields_reported_in_order() {
        let mut value = sample();
        value["original_metadata"]["correct_answer"] = json!("");
        value["original_metadata"]["answer_options"] = json!([]);
        let record = Record::from_value(value).unwrap();
        assert!(matches!(
            record.case(),
            Err(CasefileError::MissingField(Field::CorrectAnswer))
        ));

        let mut value = sample();
        value["original_metadata"]
            .as_object_mut()
            .unwrap()
            .remove("answer_options");
        let record = Record::from_value(value).unwrap();
        assert!(matches!(
            record.case(),
            Err(CasefileError::MissingField(Field::AnswerOptions))
        ));

        let mut value = sample();
        value["detection"]["solution"] = json!("I have no idea who did it.");
        let record = Record::from_value(value).unwrap();
        assert!(matches!(
            record.case(),
            Err(CasefileError::MissingField(Field::Prediction))
        ));
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let record = Record::from_value(json!({})).unwrap();
        assert_eq!(record.gold_answer(), None);
        assert_eq!(record.suspects(), None);
        assert_eq!(record.solution(), None);
        assert!(!record.is_scored());
    }

    #[test]
    fn test_non_object_rejected() {
        let err = Record::from_value(json!(["not", "a", "record"])).unwrap_err();
        assert!(matches!(err, CasefileError::MalformedRecord(_)));
    }

    #[test]
    fn test_suspects_text_and_scalars() {
        assert_eq!(
            Suspects::from_value(&json!("Plum or Peacock")),
            Some(Suspects::Text("Plum or Peacock".to_string()))
        );
        assert_eq!(Suspects::from_value(&json!("")), None);
        assert_eq!(Suspects::from_value(&json!(null)), None);
        assert_eq!(Suspects::from_value(&json!({})), None);
        assert_eq!(
            Suspects::from_value(&json!(true)),
            Some(Suspects::Text("true".to_string()))
        );
        assert_eq!(
            Suspects::from_value(&json!(4)),
            Some(Suspects::Text("4".to_string()))
        );
        assert_eq!(
            Suspects::List(vec![json!("Plum"), json!(3)]).to_string(),
            "Plum, 3"
        );
    }

    #[test]
    fn test_falsy_suspects_are_missing() {
        for falsy in [json!(false), json!(0), serde_json::from_str("0.0").unwrap()] {
            assert_eq!(Suspects::from_value(&falsy), None, "{falsy} should count as missing");

            let mut value = sample();
            value["original_metadata"]["answer_options"] = falsy;
            let err = Record::from_value(value).unwrap().case().unwrap_err();
            assert!(matches!(err, CasefileError::MissingField(Field::AnswerOptions)));
        }
    }

    #[test]
    fn test_apply_verdict_touches_only_verdict() {
        let before = Record::from_value(sample()).unwrap();
        let after = apply_verdict(before.clone(), Verdict::Yes);

        assert_eq!(after.verdict(), Some(Verdict::Yes));
        assert_eq!(after.as_map()["original_metadata"], before.as_map()["original_metadata"]);
        assert_eq!(after.as_map()["puzzle_id"], before.as_map()["puzzle_id"]);

        let mut detection = after.as_map()["detection"].as_object().unwrap().clone();
        assert_eq!(detection.remove(VERDICT_KEY), Some(json!("Yes")));
        assert_eq!(&Value::Object(detection), &before.as_map()["detection"]);
    }

    #[test]
    fn test_apply_verdict_overwrites_previous() {
        let record = apply_verdict(Record::from_value(sample()).unwrap(), Verdict::Yes);
        let record = apply_verdict(record, Verdict::No);
        assert_eq!(record.verdict(), Some(Verdict::No));
        assert_eq!(
            record.as_map()["detection"].as_object().unwrap().len(),
            3
        );
    }

    #[test]
    fn test_persist_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("case.json");
        let parsed: Value =
            serde_json::from_str(r#"{"b": {"name": "Mme. Léa Dubois"}, "a": 1.50}"#).unwrap();
        let record = Record::from_value(parsed).unwrap();

        persist_record(&path, &record).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "{\n  \"b\": {\n    \"name\": \"Mme. Léa Dubois\"\n  },\n  \"a\": 1.50\n}"
        );
    }

    #[test]
    fn test_load_errors() {
        let dir = TempDir::new().unwrap();

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{\"detection\": ").unwrap();
        assert!(matches!(
            load_record(&broken),
            Err(CasefileError::Serialization(_))
        ));

        let scalar = dir.path().join("scalar.json");
        fs::write(&scalar, "\"just a string\"").unwrap();
        assert!(matches!(
            load_record(&scalar),
            Err(CasefileError::MalformedRecord(_))
        ));

        assert!(matches!(
            load_record(dir.path().join("missing.json")),
            Err(CasefileError::Io(_))
        ));
    }
}
