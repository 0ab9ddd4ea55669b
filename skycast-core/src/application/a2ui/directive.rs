//! Typed A2UI directives.
//!
//! These mirror the embedded JSON schema. A batch that passes the schema always
//! deserializes into these types, and serializing them again yields a document
//! the schema accepts.

use serde::{Deserialize, Serialize};

/// One structured UI message. Exactly one action is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Directive {
    BeginRendering(BeginRendering),
    SurfaceUpdate(SurfaceUpdate),
    DataModelUpdate(DataModelUpdate),
    DeleteSurface(DeleteSurface),
}

impl Directive {
    pub fn surface_id(&self) -> &str {
        match self {
            Directive::BeginRendering(inner) => &inner.surface_id,
            Directive::SurfaceUpdate(inner) => &inner.surface_id,
            Directive::DataModelUpdate(inner) => &inner.surface_id,
            Directive::DeleteSurface(inner) => &inner.surface_id,
        }
    }

    pub fn action_name(&self) -> &'static str {
        match self {
            Directive::BeginRendering(_) => "beginRendering",
            Directive::SurfaceUpdate(_) => "surfaceUpdate",
            Directive::DataModelUpdate(_) => "dataModelUpdate",
            Directive::DeleteSurface(_) => "deleteSurface",
        }
    }
}

/// Ordered directives. Order is application order on the client.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectiveBatch(pub Vec<Directive>);

impl DirectiveBatch {
    pub fn new(directives: Vec<Directive>) -> Self {
        Self(directives)
    }

    pub fn directives(&self) -> &[Directive] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every component declared by the batch's surface updates, in order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.0.iter().flat_map(|directive| match directive {
            Directive::SurfaceUpdate(update) => update.components.as_slice(),
            _ => &[],
        })
    }
}

impl IntoIterator for DirectiveBatch {
    type Item = Directive;
    type IntoIter = std::vec::IntoIter<Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginRendering {
    pub surface_id: String,
    pub root: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Styles>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Styles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceUpdate {
    pub surface_id: String,
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModelUpdate {
    pub surface_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub contents: Vec<DataEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSurface {
    pub surface_id: String,
}

/// A keyed value in a surface data model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataEntry {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_number: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_boolean: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_map: Option<Vec<DataEntry>>,
}

impl DataEntry {
    fn keyed(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value_string: None,
            value_number: None,
            value_boolean: None,
            value_map: None,
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            value_string: Some(value.into()),
            ..Self::keyed(key)
        }
    }

    pub fn number(key: impl Into<String>, value: f64) -> Self {
        Self {
            value_number: Some(value),
            ..Self::keyed(key)
        }
    }

    pub fn boolean(key: impl Into<String>, value: bool) -> Self {
        Self {
            value_boolean: Some(value),
            ..Self::keyed(key)
        }
    }

    pub fn map(key: impl Into<String>, entries: Vec<DataEntry>) -> Self {
        Self {
            value_map: Some(entries),
            ..Self::keyed(key)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub component: ComponentKind,
}

impl Component {
    pub fn new(id: impl Into<String>, component: ComponentKind) -> Self {
        Self {
            id: id.into(),
            weight: None,
            component,
        }
    }
}

/// The closed set of component kinds a client knows how to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentKind {
    Text(Text),
    Image(Image),
    Icon(Icon),
    Video(Video),
    AudioPlayer(AudioPlayer),
    Row(Flex),
    Column(Flex),
    List(List),
    Card(Card),
    Tabs(Tabs),
    Divider(Divider),
    Modal(Modal),
    Button(Button),
    CheckBox(CheckBox),
    TextField(TextField),
    DateTimeInput(DateTimeInput),
    MultipleChoice(MultipleChoice),
    Slider(Slider),
}

impl ComponentKind {
    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Text(_) => "Text",
            ComponentKind::Image(_) => "Image",
            ComponentKind::Icon(_) => "Icon",
            ComponentKind::Video(_) => "Video",
            ComponentKind::AudioPlayer(_) => "AudioPlayer",
            ComponentKind::Row(_) => "Row",
            ComponentKind::Column(_) => "Column",
            ComponentKind::List(_) => "List",
            ComponentKind::Card(_) => "Card",
            ComponentKind::Tabs(_) => "Tabs",
            ComponentKind::Divider(_) => "Divider",
            ComponentKind::Modal(_) => "Modal",
            ComponentKind::Button(_) => "Button",
            ComponentKind::CheckBox(_) => "CheckBox",
            ComponentKind::TextField(_) => "TextField",
            ComponentKind::DateTimeInput(_) => "DateTimeInput",
            ComponentKind::MultipleChoice(_) => "MultipleChoice",
            ComponentKind::Slider(_) => "Slider",
        }
    }
}

/// A literal value or a path into the surface data model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueRef {
    LiteralString(String),
    LiteralNumber(f64),
    LiteralBoolean(bool),
    LiteralArray(Vec<String>),
    Path(String),
}

impl ValueRef {
    pub fn string(value: impl Into<String>) -> Self {
        ValueRef::LiteralString(value.into())
    }

    pub fn path(path: impl Into<String>) -> Self {
        ValueRef::Path(path.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub text: ValueRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_hint: Option<TextUsage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextUsage {
    H1,
    H2,
    H3,
    H4,
    H5,
    Caption,
    Body,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub url: ValueRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<ImageFit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_hint: Option<ImageUsage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageFit {
    Contain,
    Cover,
    Fill,
    None,
    ScaleDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageUsage {
    Icon,
    Avatar,
    SmallFeature,
    MediumFeature,
    LargeFeature,
    Header,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icon {
    pub name: ValueRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub url: ValueRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioPlayer {
    pub url: ValueRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<ValueRef>,
}

/// Row and Column share their layout fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flex {
    pub children: Children,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Distribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

impl Flex {
    pub fn of(children: &[&str]) -> Self {
        Self {
            children: Children::explicit(children),
            distribution: None,
            alignment: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Children {
    ExplicitList(Vec<String>),
    Template(Template),
}

impl Children {
    pub fn explicit(ids: &[&str]) -> Self {
        Children::ExplicitList(ids.iter().map(|id| id.to_string()).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub component_id: String,
    pub data_binding: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Distribution {
    Start,
    Center,
    End,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    Start,
    Center,
    End,
    Stretch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub children: Children,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub child: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tabs {
    pub tab_items: Vec<TabItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabItem {
    pub title: ValueRef,
    pub child: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Divider {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<Axis>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modal {
    pub entry_point_child: String,
    pub content_child: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub child: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<ContextBinding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextBinding {
    pub key: String,
    pub value: ValueRef,
}

impl ContextBinding {
    pub fn new(key: impl Into<String>, value: ValueRef) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckBox {
    pub label: ValueRef,
    pub value: ValueRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextField {
    pub label: ValueRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<ValueRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_field_type: Option<TextFieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_regexp: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextFieldType {
    Date,
    LongText,
    Number,
    ShortText,
    Obscured,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeInput {
    pub value: ValueRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_date: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_time: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoice {
    pub selections: ValueRef,
    pub options: Vec<ChoiceOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_allowed_selections: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: ValueRef,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slider {
    pub value: ValueRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
}
