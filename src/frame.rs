// Instance frames are typed slot-value graphs. The same representation is
// used for stored facts (assertions) and for search patterns (queries).

use std::fmt;
use std::ops;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::concept::ConceptId;
use crate::error::{Result, SubsumeError};

// ------------- Function -------------
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Function {
    Assertion,
    Query,
}

// ------------- Cardinality -------------
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cardinality {
    /// At most one value.
    Single,
    /// No two values of the same concept type.
    UniqueTypes,
    #[default]
    Repeatable,
}

// ------------- Range -------------
/// A closed integer interval. Numeric slot values are ranges; a plain number
/// is the point range `[v, v]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    min: i64,
    max: i64,
}

impl Range {
    pub fn new(min: i64, max: i64) -> Result<Self> {
        if min > max {
            return Err(SubsumeError::InvalidFrame(format!(
                "range minimum {min} exceeds maximum {max}"
            )));
        }
        Ok(Self { min, max })
    }
    pub fn exactly(value: i64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }
    pub fn at_least(min: i64) -> Self {
        Self { min, max: i64::MAX }
    }
    pub fn at_most(max: i64) -> Self {
        Self { min: i64::MIN, max }
    }
    pub fn min(&self) -> i64 {
        self.min
    }
    pub fn max(&self) -> i64 {
        self.max
    }
    pub fn is_point(&self) -> bool {
        self.min == self.max
    }
    pub fn contains_value(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }
    /// Interval containment, which is how one numeric value subsumes another.
    pub fn contains(&self, other: &Range) -> bool {
        self.min <= other.min && other.max <= self.max
    }
    pub fn overlaps(&self, other: &Range) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}
impl ops::Add for Range {
    type Output = Range;
    fn add(self, other: Range) -> Range {
        Range {
            min: self.min.saturating_add(other.min),
            max: self.max.saturating_add(other.max),
        }
    }
}
impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_point() {
            write!(f, "{}", self.min)
        } else {
            write!(f, "[{}, {}]", self.min, self.max)
        }
    }
}

// ------------- Value -------------
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Concept(ConceptId),
    Number(Range),
    Frame(Frame),
}

impl Value {
    pub fn as_frame(&self) -> Option<&Frame> {
        match self {
            Value::Frame(frame) => Some(frame),
            _ => None,
        }
    }
    pub fn as_number(&self) -> Option<Range> {
        match self {
            Value::Number(range) => Some(*range),
            _ => None,
        }
    }
    // the "type" a value counts as under UniqueTypes cardinality
    fn type_key(&self) -> Option<ConceptId> {
        match self {
            Value::Concept(concept) => Some(*concept),
            Value::Frame(frame) => Some(frame.concept()),
            Value::Number(_) => None,
        }
    }
}
impl From<Range> for Value {
    fn from(range: Range) -> Self {
        Value::Number(range)
    }
}
impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Range::exactly(value))
    }
}
impl From<Frame> for Value {
    fn from(frame: Frame) -> Self {
        Value::Frame(frame)
    }
}

// ------------- Slot -------------
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    name: String,
    cardinality: Cardinality,
    values: Vec<Value>,
}

impl Slot {
    pub fn new(name: &str, cardinality: Cardinality) -> Self {
        Self {
            name: name.to_owned(),
            cardinality,
            values: Vec::new(),
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    pub fn values_mut(&mut self) -> &mut [Value] {
        &mut self.values
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    pub fn push(&mut self, value: Value) -> Result<()> {
        match self.cardinality {
            Cardinality::Single if !self.values.is_empty() => {
                return Err(SubsumeError::Cardinality {
                    slot: self.name.clone(),
                    message: "single-valued slot already holds a value".into(),
                });
            }
            Cardinality::UniqueTypes => {
                let key = value.type_key();
                let taken = match key {
                    Some(_) => self.values.iter().any(|v| v.type_key() == key),
                    None => self.values.iter().any(|v| matches!(v, Value::Number(_))),
                };
                if taken {
                    return Err(SubsumeError::Cardinality {
                        slot: self.name.clone(),
                        message: "slot already holds a value of that type".into(),
                    });
                }
            }
            _ => (),
        }
        self.values.push(value);
        Ok(())
    }
    pub fn clear(&mut self) -> bool {
        let cleared = !self.values.is_empty();
        self.values.clear();
        cleared
    }
}

// ------------- SlotPath -------------
/// A dot-separated path of slot names, e.g. `booking.window`. Every segment
/// but the last descends into the first frame value of the named slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SlotPath {
    segments: Vec<String>,
}

impl SlotPath {
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
    pub fn last(&self) -> &str {
        // a path always has at least one segment
        self.segments.last().map(String::as_str).unwrap_or_default()
    }
}
impl FromStr for SlotPath {
    type Err = SubsumeError;
    fn from_str(s: &str) -> Result<Self> {
        let segments: Vec<String> = s.split('.').map(|seg| seg.trim().to_owned()).collect();
        if segments.iter().any(String::is_empty) {
            return Err(SubsumeError::Config(format!("malformed slot path `{s}`")));
        }
        Ok(Self { segments })
    }
}
impl fmt::Display for SlotPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

// ------------- Frame -------------
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    concept: ConceptId,
    function: Function,
    slots: Vec<Slot>,
}

impl Frame {
    pub fn new(concept: ConceptId, function: Function) -> Self {
        Self {
            concept,
            function,
            slots: Vec::new(),
        }
    }
    pub fn assertion(concept: ConceptId) -> Self {
        Self::new(concept, Function::Assertion)
    }
    pub fn query(concept: ConceptId) -> Self {
        Self::new(concept, Function::Query)
    }

    pub fn concept(&self) -> ConceptId {
        self.concept
    }
    pub fn function(&self) -> Function {
        self.function
    }
    pub fn is_query(&self) -> bool {
        self.function == Function::Query
    }
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Declares a slot with an explicit cardinality. Redeclaring keeps the
    /// values but changes nothing else.
    pub fn declare(mut self, name: &str, cardinality: Cardinality) -> Self {
        if self.slot(name).is_none() {
            self.slots.push(Slot::new(name, cardinality));
        }
        self
    }

    /// Adds a value, creating a repeatable slot if the slot is undeclared.
    pub fn add(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        match self.slot_mut(name) {
            Some(slot) => slot.push(value),
            None => {
                let mut slot = Slot::new(name, Cardinality::default());
                slot.push(value)?;
                self.slots.push(slot);
                Ok(())
            }
        }
    }
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
        self.add(name, value)?;
        Ok(self)
    }

    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.name == name)
    }
    pub fn slot_mut(&mut self, name: &str) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.name == name)
    }
    pub fn values(&self, name: &str) -> &[Value] {
        self.slot(name).map(Slot::values).unwrap_or(&[])
    }
    pub fn has_values(&self, name: &str) -> bool {
        !self.values(name).is_empty()
    }
    pub fn clear(&mut self, name: &str) -> bool {
        self.slot_mut(name).is_some_and(Slot::clear)
    }

    // ------------- path access -------------
    pub fn slot_at(&self, path: &SlotPath) -> Option<&Slot> {
        let (last, parents) = path.segments().split_last()?;
        let mut frame = self;
        for segment in parents {
            frame = frame.values(segment).iter().find_map(Value::as_frame)?;
        }
        frame.slot(last)
    }
    pub fn slot_at_mut(&mut self, path: &SlotPath) -> Option<&mut Slot> {
        let (last, parents) = path.segments().split_last()?;
        let mut frame = self;
        for segment in parents {
            frame = frame.slot_mut(segment)?.values.iter_mut().find_map(|v| match v {
                Value::Frame(inner) => Some(inner),
                _ => None,
            })?;
        }
        frame.slot_mut(last)
    }
    pub fn values_at(&self, path: &SlotPath) -> &[Value] {
        self.slot_at(path).map(Slot::values).unwrap_or(&[])
    }
    pub fn clear_at(&mut self, path: &SlotPath) -> bool {
        self.slot_at_mut(path).is_some_and(Slot::clear)
    }

    /// The frame held at `path`, if any. A value of another kind there breaks
    /// the contract of whoever configured the path.
    pub fn frame_at(&self, path: &SlotPath) -> Result<Option<&Frame>> {
        match self.values_at(path).first() {
            None => Ok(None),
            Some(Value::Frame(frame)) => Ok(Some(frame)),
            Some(_) => Err(SubsumeError::Invariant(format!(
                "slot `{path}` must hold a frame value"
            ))),
        }
    }
    /// The number held at `path`, if any.
    pub fn number_at(&self, path: &SlotPath) -> Result<Option<Range>> {
        match self.values_at(path).first() {
            None => Ok(None),
            Some(Value::Number(range)) => Ok(Some(*range)),
            Some(_) => Err(SubsumeError::Invariant(format!(
                "slot `{path}` must hold a numeric value"
            ))),
        }
    }

    /// A copy of this frame acting as a query.
    pub fn to_query(&self) -> Frame {
        Frame {
            function: Function::Query,
            ..self.clone()
        }
    }
    pub fn to_assertion(&self) -> Frame {
        Frame {
            function: Function::Assertion,
            ..self.clone()
        }
    }
}
