use std::collections::HashMap;
use std::fmt;

/// Decoded value of a single fragment key.
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl FragmentValue {
    /// Classifies a raw (still percent-encoded) value by its lexical form.
    ///
    /// Literals `null`, `true` and `false` win over everything else, then a
    /// well-formed finite decimal becomes a number, and anything left is
    /// percent-decoded text with `+` read as a space.
    pub fn classify(raw: &str) -> Self {
        match raw {
            "null" => FragmentValue::Null,
            "false" => FragmentValue::Bool(false),
            "true" => FragmentValue::Bool(true),
            _ => match parse_decimal(raw) {
                Some(number) => FragmentValue::Number(number),
                None => FragmentValue::String(decode_text(raw)),
            },
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FragmentValue::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FragmentValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FragmentValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FragmentValue::Null)
    }
}

impl fmt::Display for FragmentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentValue::Null => f.write_str("null"),
            FragmentValue::Bool(value) => write!(f, "{value}"),
            FragmentValue::Number(number) => f.write_str(&crate::view::format_number(*number)),
            FragmentValue::String(value) => {
                f.write_str(&urlencoding::encode(value).replace("%20", "+"))
            }
        }
    }
}

/// Key/value mapping decoded from one fragment. Later keys overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentParams {
    values: HashMap<String, FragmentValue>,
}

impl FragmentParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FragmentValue> {
        self.values.get(key)
    }

    /// Value of `key` if it decoded as a number; any other variant reads as absent.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(FragmentValue::as_number)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FragmentValue) {
        self.values.insert(key.into(), value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FragmentValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl FromIterator<(String, FragmentValue)> for FragmentParams {
    fn from_iter<I: IntoIterator<Item = (String, FragmentValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Parses `key=value` pairs separated by `;` or `&`.
///
/// Never fails: segments without a `key=value` shape are skipped, and so is
/// any pair whose key does not percent-decode to UTF-8.
pub fn parse(fragment: &str) -> FragmentParams {
    let mut params = FragmentParams::new();
    parse_into(fragment, &mut params);
    params
}

/// Same as [`parse`], merging into an existing mapping.
pub fn parse_into(fragment: &str, params: &mut FragmentParams) {
    for segment in fragment.split(['&', ';']) {
        // a key is one or more chars other than `=`; leading `=` never starts a pair
        let segment = segment.trim_start_matches('=');
        let Some((key, value)) = segment.split_once('=') else {
            continue;
        };
        let Ok(key) = urlencoding::decode(key) else {
            continue;
        };
        params.insert(key.into_owned(), FragmentValue::classify(value));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    MissingKey,
    MissingValue,
    NotANumber { value: String },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingKey => f.write_str("missing key"),
            RejectReason::MissingValue => f.write_str("missing value"),
            RejectReason::NotANumber { value } => write!(f, "'{value}' is not a finite number"),
        }
    }
}

impl std::error::Error for RejectReason {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedPair {
    pub part: String,
    pub reason: RejectReason,
}

impl fmt::Display for RejectedPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bad hash param '{}': {}", self.part, self.reason)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericParse {
    pub params: FragmentParams,
    pub rejected: Vec<RejectedPair>,
}

/// Strict variant for purely numeric fragments: `&` only, every value must be
/// a finite decimal. Offending pairs are logged and left out of the params.
pub fn parse_numeric(fragment: &str) -> NumericParse {
    let mut result = NumericParse::default();
    if fragment.is_empty() {
        return result;
    }
    for part in fragment.split('&') {
        let mut pieces = part.split('=');
        let key = pieces.next().unwrap_or("");
        let value = pieces.next();
        let reason = if key.is_empty() {
            Some(RejectReason::MissingKey)
        } else {
            match value {
                None => Some(RejectReason::MissingValue),
                Some(value) => match parse_decimal(value) {
                    Some(number) => {
                        result
                            .params
                            .insert(key.to_string(), FragmentValue::Number(number));
                        None
                    }
                    None => Some(RejectReason::NotANumber {
                        value: value.to_string(),
                    }),
                },
            }
        };
        if let Some(reason) = reason {
            let rejected = RejectedPair {
                part: part.to_string(),
                reason,
            };
            tracing::warn!("{rejected}");
            result.rejected.push(rejected);
        }
    }
    result
}

/// Finite decimal literal: optional sign, digits with an optional fraction
/// and exponent, surrounding whitespace allowed. Hex, `Infinity` and `NaN`
/// are not numbers here.
pub(crate) fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !trimmed
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
}

fn decode_text(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}
