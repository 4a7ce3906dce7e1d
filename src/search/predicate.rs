// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Predicate Model - field-level constraints
//!
//! A [`Predicate`] maps field names to [`PredicateValue`]s. Field order is
//! significant: both serializers emit clauses in insertion order, so the map
//! is an association list rather than a hash map.
//!
//! # Value Classification
//!
//! Raw JSON values are classified once, when they enter the model, by a fixed
//! sequence of type guards. The first guard that matches wins:
//!
//! ```text
//! {"type":"relative-date","num":2,"unit":"months"}  → RelativeDate
//! {"type":"date-range","from":1,"to":2} / {"from":1} → DateRange
//! {"any":[..],"all":..,"not":..}                     → Match
//! ["a","b"]                                          → List
//! "a" / 1 / true                                     → Scalar
//! anything else                                      → Raw (carried, never emitted)
//! ```

use std::fmt;

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Literal value: string, number or boolean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    /// Convert a JSON leaf into a scalar. Arrays, objects and null are rejected.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::String(s.clone())),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Self::Number(i64::from(value).into())
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

/// Structured match rules for one field
///
/// - `any`: at least one value must match (OR)
/// - `all`: every value must match (AND)
/// - `not`: none of the values may match
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MatchOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any: Option<Vec<Scalar>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all: Option<Vec<Scalar>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Vec<Scalar>>,
}

impl MatchOptions {
    /// Match options with only an `any` list
    pub fn any<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        Self {
            any: Some(values.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    pub fn with_all<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        self.all = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_not<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        self.not = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// True when no list carries a value
    pub fn is_empty(&self) -> bool {
        [&self.any, &self.all, &self.not]
            .iter()
            .all(|list| list.as_ref().map_or(true, Vec::is_empty))
    }

    /// Type guard: an object whose keys are all `any`/`all`/`not`.
    ///
    /// Bare scalars are coerced to one-element lists.
    fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let mut options = Self::default();
        for (key, entry) in obj {
            let list = scalar_or_list(entry)?;
            match key.as_str() {
                "any" => options.any = Some(list),
                "all" => options.all = Some(list),
                "not" => options.not = Some(list),
                _ => return None,
            }
        }
        Some(options)
    }
}

/// Absolute date range. Bounds are epoch millis or raw backend tokens.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DateRange {
    pub from: Option<Scalar>,
    pub to: Option<Scalar>,
}

impl DateRange {
    pub fn new(from: impl Into<Scalar>, to: impl Into<Scalar>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }

    /// Epoch-millis range
    pub fn millis(from: i64, to: i64) -> Self {
        Self::new(from, to)
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".into(), Value::String("date-range".into()));
        if let Some(from) = &self.from {
            obj.insert("from".into(), from.to_json());
        }
        if let Some(to) = &self.to {
            obj.insert("to".into(), to.to_json());
        }
        Value::Object(obj)
    }

    /// Type guard: `type:"date-range"` or a bare object of `from`/`to` bounds.
    fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let tagged = match obj.get("type") {
            Some(Value::String(t)) if t == "date-range" => true,
            Some(_) => return None,
            None => false,
        };
        if !tagged && !obj.contains_key("from") && !obj.contains_key("to") {
            return None;
        }
        let mut range = Self::default();
        for (key, entry) in obj {
            match key.as_str() {
                "type" => {}
                "from" => range.from = Some(Scalar::from_json(entry)?),
                "to" => range.to = Some(Scalar::from_json(entry)?),
                _ => return None,
            }
        }
        Some(range)
    }
}

/// Calendar unit for relative dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelativeUnit {
    #[serde(alias = "hour")]
    Hours,
    #[serde(alias = "day")]
    Days,
    #[serde(alias = "week")]
    Weeks,
    #[serde(alias = "month")]
    Months,
    #[serde(alias = "year")]
    Years,
}

impl RelativeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
        }
    }
}

/// "The last `num` `unit`s", resolved against the current time at expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeDate {
    pub num: u32,
    pub unit: RelativeUnit,
}

impl RelativeDate {
    pub fn new(num: u32, unit: RelativeUnit) -> Self {
        Self { num, unit }
    }

    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".into(), Value::String("relative-date".into()));
        obj.insert("num".into(), Value::Number(self.num.into()));
        obj.insert("unit".into(), Value::String(self.unit.as_str().into()));
        Value::Object(obj)
    }

    fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        match obj.get("type") {
            Some(Value::String(t)) if t == "relative-date" => {}
            _ => return None,
        }
        serde_json::from_value(value.clone()).ok()
    }
}

/// Value of one predicate field
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateValue {
    /// Shorthand for `{any: [scalar]}`
    Scalar(Scalar),
    /// Shorthand for `{any: [...]}`
    List(Vec<Scalar>),
    Match(MatchOptions),
    DateRange(DateRange),
    RelativeDate(RelativeDate),
    /// Unrecognized shape, carried untouched
    Raw(Value),
}

impl PredicateValue {
    /// Classify a JSON value. Guards run in a fixed order: relative date,
    /// date range, match options, list, scalar, then raw.
    pub fn from_json(value: Value) -> Self {
        if let Some(relative) = RelativeDate::from_json(&value) {
            return Self::RelativeDate(relative);
        }
        if let Some(range) = DateRange::from_json(&value) {
            return Self::DateRange(range);
        }
        if let Some(options) = MatchOptions::from_json(&value) {
            return Self::Match(options);
        }
        if let Value::Array(items) = &value {
            if let Some(list) = items.iter().map(Scalar::from_json).collect::<Option<Vec<_>>>() {
                return Self::List(list);
            }
        }
        if let Some(scalar) = Scalar::from_json(&value) {
            return Self::Scalar(scalar);
        }
        Self::Raw(value)
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Scalar(s) => s.to_json(),
            Self::List(items) => Value::Array(items.iter().map(Scalar::to_json).collect()),
            Self::Match(options) => serde_json::to_value(options).unwrap_or(Value::Null),
            Self::DateRange(range) => range.to_json(),
            Self::RelativeDate(relative) => relative.to_json(),
            Self::Raw(value) => value.clone(),
        }
    }
}

fn scalar_or_list(value: &Value) -> Option<Vec<Scalar>> {
    match value {
        Value::Array(items) => items.iter().map(Scalar::from_json).collect(),
        other => Scalar::from_json(other).map(|s| vec![s]),
    }
}

impl Serialize for PredicateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PredicateValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_json)
    }
}

macro_rules! scalar_predicate_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for PredicateValue {
                fn from(value: $ty) -> Self {
                    Self::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_predicate_value!(Scalar, &str, String, bool, i64, i32, u64);

impl<S: Into<Scalar>> From<Vec<S>> for PredicateValue {
    fn from(values: Vec<S>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<MatchOptions> for PredicateValue {
    fn from(value: MatchOptions) -> Self {
        Self::Match(value)
    }
}

impl From<DateRange> for PredicateValue {
    fn from(value: DateRange) -> Self {
        Self::DateRange(value)
    }
}

impl From<RelativeDate> for PredicateValue {
    fn from(value: RelativeDate) -> Self {
        Self::RelativeDate(value)
    }
}

/// Insertion-ordered field → value constraints
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Predicate {
    fields: Vec<(String, PredicateValue)>,
}

impl Predicate {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Builder form of [`Predicate::insert`]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<PredicateValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a field. An existing field keeps its position and returns the old value.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: impl Into<PredicateValue>,
    ) -> Option<PredicateValue> {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.fields.push((field, value));
                None
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&PredicateValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn remove(&mut self, field: &str) -> Option<PredicateValue> {
        let idx = self.fields.iter().position(|(name, _)| name == field)?;
        Some(self.fields.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PredicateValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<PredicateValue>> FromIterator<(K, V)> for Predicate {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut predicate = Self::new();
        for (field, value) in iter {
            predicate.insert(field, value);
        }
        predicate
    }
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, value) in &self.fields {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Predicate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // serde_json's preserve_order keeps document order in Map
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self {
            fields: raw
                .into_iter()
                .map(|(field, value)| (field, PredicateValue::from_json(value)))
                .collect(),
        })
    }
}
