//! Format-neutral records of a parsed REXS document
//!
//! Format adapters fill these with borrowed views into their own parse tree.
//! Ids stay strings here; JSON numeric ids are written in decimal.

use crate::decoder::NodeView;
use rexs_database::ValueType;
use rexs_model::Value;

/// One `<attribute>` / attribute object of a document
pub trait AttributeSource {
    type Node: NodeView;

    fn id(&self) -> &str;

    /// Declared unit, `None` when the document omits it
    fn unit(&self) -> Option<&str>;

    /// Node holding the value for `value_type`, `None` when there is no value
    fn value_node(&self, value_type: ValueType) -> Option<Self::Node>;

    /// Decode a custom attribute without database guidance
    fn decode_custom(&self) -> Option<(ValueType, Value)>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInfo {
    pub application_id: String,
    pub application_version: String,
    pub date: String,
    pub version: String,
    pub language: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RawComponent<A> {
    pub id: String,
    pub component_type: String,
    pub name: String,
    pub attributes: Vec<A>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReference {
    pub id: String,
    pub role: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRelation {
    pub id: Option<String>,
    pub relation_type: String,
    pub order: Option<u32>,
    pub references: Vec<RawReference>,
}

impl RawRelation {
    /// Label used in diagnostics
    #[must_use]
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("?")
    }
}

/// Load attributes of one base component
#[derive(Debug, Clone)]
pub struct RawLoadComponent<A> {
    pub id: String,
    pub attributes: Vec<A>,
}

#[derive(Debug, Clone)]
pub struct RawLoadCase<A> {
    pub id: String,
    pub components: Vec<RawLoadComponent<A>>,
}

#[derive(Debug, Clone)]
pub struct RawLoadSpectrum<A> {
    pub id: Option<String>,
    pub load_cases: Vec<RawLoadCase<A>>,
    pub accumulation: Option<Vec<RawLoadComponent<A>>>,
}

/// A whole document after structural validation
#[derive(Debug, Clone)]
pub struct RawModel<A> {
    pub info: RawInfo,
    pub components: Vec<RawComponent<A>>,
    pub relations: Vec<RawRelation>,
    pub load_spectrum: Option<RawLoadSpectrum<A>>,
}
