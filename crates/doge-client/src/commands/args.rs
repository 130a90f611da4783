//! Command parameters, bound argument values, and converters

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use doge_core::RoomMember;

use super::Context;
use crate::client::Client;
use crate::error::ClientResult;

/// A bound argument value
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Member(RoomMember),
}

impl ArgValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_member(&self) -> Option<&RoomMember> {
        match self {
            Self::Member(member) => Some(member),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(value) => f.write_str(value),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Member(member) => member.fmt(f),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Basic coercion target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicType {
    Str,
    Int,
    Float,
    Bool,
}

impl BasicType {
    /// Coerce a raw argument. Values that do not parse stay strings.
    pub fn coerce(self, raw: &str) -> ArgValue {
        let fallback = || ArgValue::Str(raw.to_string());
        match self {
            Self::Str => fallback(),
            // Integers go through a float parse so "2.6" rounds to 3
            Self::Int => raw
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map_or_else(fallback, |value| ArgValue::Int(value.round() as i64)),
            Self::Float => raw
                .parse::<f64>()
                .map_or_else(|_| fallback(), ArgValue::Float),
            Self::Bool => match raw.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => ArgValue::Bool(true),
                "false" | "0" | "no" | "off" => ArgValue::Bool(false),
                _ => fallback(),
            },
        }
    }
}

/// Custom async argument converter.
///
/// Converters run inline in the frame dispatcher, so they must not wait for
/// inbound events (`wait_for`, `fetch_user`).
#[async_trait]
pub trait Convert: Send + Sync {
    async fn convert(
        &self,
        client: &Client,
        ctx: &Context,
        param: &Param,
        raw: &str,
    ) -> ClientResult<ArgValue>;
}

/// Resolves a member of the current room by id, username, or display name
/// (`@mentions` accepted)
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberConverter;

#[async_trait]
impl Convert for MemberConverter {
    async fn convert(
        &self,
        client: &Client,
        _ctx: &Context,
        _param: &Param,
        raw: &str,
    ) -> ClientResult<ArgValue> {
        client.get_user(raw).map(ArgValue::Member)
    }
}

#[derive(Clone)]
pub enum Converter {
    Basic(BasicType),
    Custom(Arc<dyn Convert>),
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic(kind) => write!(f, "Basic({kind:?})"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Takes one raw argument
    Positional,
    /// Takes every remaining raw argument, joined by single spaces
    Rest,
}

/// A declared command parameter
#[derive(Debug, Clone)]
pub struct Param {
    name: String,
    kind: ParamKind,
    default: Option<ArgValue>,
    converter: Converter,
}

impl Param {
    /// A positional string parameter
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Positional,
            default: None,
            converter: Converter::Basic(BasicType::Str),
        }
    }

    /// A parameter collecting the rest of the arguments
    pub fn rest(name: impl Into<String>) -> Self {
        Self {
            kind: ParamKind::Rest,
            ..Self::new(name)
        }
    }

    pub fn int(self) -> Self {
        self.converter(Converter::Basic(BasicType::Int))
    }

    pub fn float(self) -> Self {
        self.converter(Converter::Basic(BasicType::Float))
    }

    pub fn boolean(self) -> Self {
        self.converter(Converter::Basic(BasicType::Bool))
    }

    pub fn member(self) -> Self {
        self.converter(Converter::Custom(Arc::new(MemberConverter)))
    }

    pub fn converter(mut self, converter: Converter) -> Self {
        self.converter = converter;
        self
    }

    /// Value used when the invocation supplies too few arguments
    pub fn default(mut self, value: impl Into<ArgValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    pub fn default_value(&self) -> Option<&ArgValue> {
        self.default.as_ref()
    }

    pub(crate) fn converter_ref(&self) -> &Converter {
        &self.converter
    }
}

/// Arguments bound for one invocation, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: Vec<(String, ArgValue)>,
}

impl Args {
    pub(crate) fn push(&mut self, name: &str, value: ArgValue) {
        self.values.push((name.to_string(), value));
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ArgValue::as_str)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ArgValue::as_int)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ArgValue::as_float)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ArgValue::as_bool)
    }

    pub fn member(&self, name: &str) -> Option<&RoomMember> {
        self.get(name).and_then(ArgValue::as_member)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
