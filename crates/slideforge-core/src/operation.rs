//! Declarative slide-editing operations.
//!
//! On the wire an operation is a JSON object with exactly one key naming the
//! request, e.g. `{"createShape": {...}}`. Requests this crate does not know
//! about deserialize to [`Operation::Unsupported`] so that a newer store can
//! hand us a list without breaking the frame.

use crate::error::OperationError;
use crate::units::{Dimension, Unit};
use peniko::Color;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Smallest width/height (in points) an element is drawn with when its size
/// is missing or not positive.
pub const MIN_ELEMENT_SIZE_PT: f64 = 1.0;

/// Kind of element an operation produces on the slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Rectangle,
    RoundRectangle,
    Ellipse,
    Triangle,
    RightArrow,
    TextBox,
    Line,
    Arrow,
    Image,
}

impl ElementKind {
    /// Parse a `shapeType` tag. Unknown tags yield `None`.
    pub fn from_shape_type(tag: &str) -> Option<Self> {
        match tag {
            "RECTANGLE" => Some(ElementKind::Rectangle),
            "ROUND_RECTANGLE" => Some(ElementKind::RoundRectangle),
            "ELLIPSE" => Some(ElementKind::Ellipse),
            "TRIANGLE" => Some(ElementKind::Triangle),
            "RIGHT_ARROW" => Some(ElementKind::RightArrow),
            "TEXT_BOX" => Some(ElementKind::TextBox),
            "LINE" => Some(ElementKind::Line),
            _ => None,
        }
    }

    /// Display name, used for placeholders and logs.
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Rectangle => "Rectangle",
            ElementKind::RoundRectangle => "Round rectangle",
            ElementKind::Ellipse => "Ellipse",
            ElementKind::Triangle => "Triangle",
            ElementKind::RightArrow => "Right arrow",
            ElementKind::TextBox => "Text box",
            ElementKind::Line => "Line",
            ElementKind::Arrow => "Arrow",
            ElementKind::Image => "Image",
        }
    }
}

/// Width and height of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementSize {
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
}

/// Placement of an element on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AffineTransform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub unit: Unit,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            unit: Unit::Emu,
        }
    }
}

/// Geometry shared by every create-like operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementProperties {
    pub page_object_id: String,
    pub size: Option<ElementSize>,
    pub transform: Option<AffineTransform>,
}

impl ElementProperties {
    /// Translation in points. Missing or non-finite values become zero.
    pub fn translate_points(&self) -> (f64, f64) {
        let t = self.transform.unwrap_or_default();
        let finite_or_zero = |v: f64| if v.is_finite() { v } else { 0.0 };
        (
            finite_or_zero(t.unit.to_points(t.translate_x)),
            finite_or_zero(t.unit.to_points(t.translate_y)),
        )
    }

    /// Unscaled size in points, never smaller than [`MIN_ELEMENT_SIZE_PT`].
    pub fn size_points(&self) -> (f64, f64) {
        let (w, h) = self.extent_points();
        (w.max(MIN_ELEMENT_SIZE_PT), h.max(MIN_ELEMENT_SIZE_PT))
    }

    /// Declared size in points with zero kept, so a line can be flat along
    /// one axis. Missing, negative or non-finite values fall back to
    /// [`MIN_ELEMENT_SIZE_PT`].
    pub fn extent_points(&self) -> (f64, f64) {
        let size = self.size.unwrap_or_default();
        let extent = |d: Option<Dimension>| {
            d.map(Dimension::to_points)
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(MIN_ELEMENT_SIZE_PT)
        };
        (extent(size.width), extent(size.height))
    }

    /// Scale factors. Missing or non-finite values become one.
    pub fn scale(&self) -> (f64, f64) {
        let t = self.transform.unwrap_or_default();
        let finite_or_one = |v: f64| if v.is_finite() { v } else { 1.0 };
        (finite_or_one(t.scale_x), finite_or_one(t.scale_y))
    }
}

/// RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RgbColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl RgbColor {
    pub fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Convert to a renderer color with the given alpha.
    pub fn to_color(self, alpha: f32) -> Color {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color::from_rgba8(
            channel(self.red),
            channel(self.green),
            channel(self.blue),
            channel(alpha),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpaqueColor {
    pub rgb_color: Option<RgbColor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolidFill {
    pub color: OpaqueColor,
    pub alpha: Option<f32>,
}

impl SolidFill {
    pub fn rgb(color: RgbColor) -> Self {
        Self {
            color: OpaqueColor {
                rgb_color: Some(color),
            },
            alpha: None,
        }
    }

    pub fn to_color(&self) -> Option<Color> {
        self.color
            .rgb_color
            .map(|rgb| rgb.to_color(self.alpha.unwrap_or(1.0)))
    }
}

/// Background or outline paint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fill {
    pub solid_fill: Option<SolidFill>,
}

impl Fill {
    pub fn solid(color: RgbColor) -> Self {
        Self {
            solid_fill: Some(SolidFill::rgb(color)),
        }
    }

    pub fn color(&self) -> Option<Color> {
        self.solid_fill.as_ref().and_then(SolidFill::to_color)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Outline {
    pub outline_fill: Option<Fill>,
    pub weight: Option<Dimension>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapeProperties {
    pub shape_background_fill: Option<Fill>,
    pub outline: Option<Outline>,
}

impl ShapeProperties {
    pub fn fill_color(&self) -> Option<Color> {
        self.shape_background_fill.as_ref().and_then(Fill::color)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineProperties {
    pub line_fill: Option<Fill>,
    pub weight: Option<Dimension>,
    pub end_arrow: Option<ArrowStyle>,
}

/// Arrow head style at the end of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArrowStyle {
    #[default]
    None,
    FillArrow,
    StealthArrow,
    OpenArrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    pub font_size: Option<Dimension>,
    pub foreground_color: Option<RgbColor>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateShape {
    pub object_id: String,
    pub shape_type: String,
    pub element_properties: ElementProperties,
    pub shape_properties: Option<ShapeProperties>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTextBox {
    pub object_id: String,
    pub element_properties: ElementProperties,
    pub text: String,
    pub style: Option<TextStyle>,
    pub shape_properties: Option<ShapeProperties>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateImage {
    pub object_id: String,
    pub url: String,
    pub element_properties: ElementProperties,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateLine {
    pub object_id: String,
    pub line_category: Option<String>,
    pub element_properties: ElementProperties,
    pub line_properties: Option<LineProperties>,
}

impl CreateLine {
    /// Lines with an end arrow render as arrows.
    pub fn kind(&self) -> ElementKind {
        match self.line_properties.and_then(|p| p.end_arrow) {
            Some(ArrowStyle::None) | None => ElementKind::Line,
            Some(_) => ElementKind::Arrow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateTransform {
    pub object_id: String,
    pub transform: AffineTransform,
    pub apply_mode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsertText {
    pub object_id: String,
    pub text: String,
    pub insertion_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteObject {
    pub object_id: String,
}

/// One declarative edit instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    CreateShape(CreateShape),
    CreateTextBox(CreateTextBox),
    CreateImage(CreateImage),
    CreateLine(CreateLine),
    UpdateTransform(UpdateTransform),
    InsertText(InsertText),
    Delete(DeleteObject),
    /// A request this crate does not recognise. Never drawn; the payload is
    /// kept so the list serializes back unchanged.
    Unsupported { kind: String, payload: Value },
}

impl Operation {
    /// Wire tag of this operation.
    pub fn tag(&self) -> &str {
        match self {
            Operation::CreateShape(_) => "createShape",
            Operation::CreateTextBox(_) => "createTextBox",
            Operation::CreateImage(_) => "createImage",
            Operation::CreateLine(_) => "createLine",
            Operation::UpdateTransform(_) => "updateTransform",
            Operation::InsertText(_) => "insertText",
            Operation::Delete(_) => "delete",
            Operation::Unsupported { kind, .. } => kind,
        }
    }

    /// Target object id, if the operation has one.
    pub fn object_id(&self) -> Option<&str> {
        match self {
            Operation::CreateShape(op) => Some(&op.object_id),
            Operation::CreateTextBox(op) => Some(&op.object_id),
            Operation::CreateImage(op) => Some(&op.object_id),
            Operation::CreateLine(op) => Some(&op.object_id),
            Operation::UpdateTransform(op) => Some(&op.object_id),
            Operation::InsertText(op) => Some(&op.object_id),
            Operation::Delete(op) => Some(&op.object_id),
            Operation::Unsupported { .. } => None,
        }
    }

    /// Element properties of create-like operations.
    pub fn element_properties(&self) -> Option<&ElementProperties> {
        match self {
            Operation::CreateShape(op) => Some(&op.element_properties),
            Operation::CreateTextBox(op) => Some(&op.element_properties),
            Operation::CreateImage(op) => Some(&op.element_properties),
            Operation::CreateLine(op) => Some(&op.element_properties),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = serde_json::Map::<String, Value>::deserialize(deserializer)?;
        let mut entries = map.into_iter();
        let Some((kind, payload)) = entries.next() else {
            return Err(D::Error::custom("operation object has no request key"));
        };
        if entries.next().is_some() {
            return Err(D::Error::custom(
                "operation object must have exactly one request key",
            ));
        }

        fn payload_of<T: serde::de::DeserializeOwned, E: serde::de::Error>(
            payload: Value,
        ) -> Result<T, E> {
            serde_json::from_value(payload).map_err(E::custom)
        }

        Ok(match kind.as_str() {
            "createShape" => Operation::CreateShape(payload_of::<_, D::Error>(payload)?),
            "createTextBox" => Operation::CreateTextBox(payload_of::<_, D::Error>(payload)?),
            "createImage" => Operation::CreateImage(payload_of::<_, D::Error>(payload)?),
            "createLine" => Operation::CreateLine(payload_of::<_, D::Error>(payload)?),
            "updateTransform" | "updatePageElementTransform" => {
                Operation::UpdateTransform(payload_of::<_, D::Error>(payload)?)
            }
            "insertText" => Operation::InsertText(payload_of::<_, D::Error>(payload)?),
            "delete" | "deleteObject" => Operation::Delete(payload_of::<_, D::Error>(payload)?),
            _ => Operation::Unsupported { kind, payload },
        })
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Operation::CreateShape(op) => map.serialize_entry(self.tag(), op)?,
            Operation::CreateTextBox(op) => map.serialize_entry(self.tag(), op)?,
            Operation::CreateImage(op) => map.serialize_entry(self.tag(), op)?,
            Operation::CreateLine(op) => map.serialize_entry(self.tag(), op)?,
            Operation::UpdateTransform(op) => map.serialize_entry(self.tag(), op)?,
            Operation::InsertText(op) => map.serialize_entry(self.tag(), op)?,
            Operation::Delete(op) => map.serialize_entry(self.tag(), op)?,
            Operation::Unsupported { kind, payload } => map.serialize_entry(kind, payload)?,
        }
        map.end()
    }
}

/// Parse a JSON array of operations.
pub fn parse_operations(json: &str) -> Result<Vec<Operation>, OperationError> {
    serde_json::from_str(json).map_err(OperationError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_shape() {
        let json = r#"[{"createShape": {
            "objectId": "box1",
            "shapeType": "RECTANGLE",
            "elementProperties": {
                "pageObjectId": "p1",
                "size": {
                    "width": {"magnitude": 3000000, "unit": "EMU"},
                    "height": {"magnitude": 100, "unit": "PT"}
                },
                "transform": {
                    "scaleX": 1, "scaleY": 1, "translateX": 127000, "translateY": 0, "unit": "EMU"
                }
            }
        }}]"#;
        let ops = parse_operations(json).unwrap();
        assert_eq!(ops.len(), 1);
        let Operation::CreateShape(shape) = &ops[0] else {
            panic!("expected createShape, got {:?}", ops[0]);
        };
        assert_eq!(shape.object_id, "box1");
        assert_eq!(shape.shape_type, "RECTANGLE");
        assert_eq!(shape.element_properties.translate_points(), (10.0, 0.0));
        let (w, h) = shape.element_properties.size_points();
        assert!((w - 3_000_000.0 / 12_700.0).abs() < 1e-9);
        assert_eq!(h, 100.0);
    }

    #[test]
    fn test_unknown_request_is_unsupported() {
        let ops = parse_operations(r#"[{"createTable": {"rows": 3}}]"#).unwrap();
        assert_eq!(
            ops[0],
            Operation::Unsupported {
                kind: "createTable".to_string(),
                payload: serde_json::json!({"rows": 3}),
            }
        );
        assert_eq!(ops[0].object_id(), None);
    }

    #[test]
    fn test_unsupported_payload_written_back() {
        let json = r#"[{"createTable": {"objectId": "t1", "rows": 3, "columns": [1, 2]}}]"#;
        let ops = parse_operations(json).unwrap();
        assert_eq!(
            serde_json::to_value(&ops).unwrap(),
            serde_json::from_str::<Value>(json).unwrap()
        );
    }

    #[test]
    fn test_multiple_keys_rejected() {
        let err = parse_operations(r#"[{"createShape": {}, "delete": {}}]"#);
        assert!(err.is_err());
        let err = parse_operations(r#"[{}]"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_missing_geometry_defaults() {
        let ops = parse_operations(r#"[{"createImage": {"objectId": "img"}}]"#).unwrap();
        let props = ops[0].element_properties().unwrap();
        assert_eq!(props.translate_points(), (0.0, 0.0));
        assert_eq!(props.size_points(), (MIN_ELEMENT_SIZE_PT, MIN_ELEMENT_SIZE_PT));
        assert_eq!(props.scale(), (1.0, 1.0));
    }

    #[test]
    fn test_non_finite_geometry_defaults() {
        let props = ElementProperties {
            page_object_id: String::new(),
            size: Some(ElementSize {
                width: Some(Dimension::pt(f64::NAN)),
                height: Some(Dimension::pt(-5.0)),
            }),
            transform: Some(AffineTransform {
                scale_x: f64::INFINITY,
                translate_x: f64::NAN,
                ..AffineTransform::default()
            }),
        };
        assert_eq!(props.size_points(), (MIN_ELEMENT_SIZE_PT, MIN_ELEMENT_SIZE_PT));
        assert_eq!(props.extent_points(), (MIN_ELEMENT_SIZE_PT, MIN_ELEMENT_SIZE_PT));
        assert_eq!(props.translate_points(), (0.0, 0.0));
        assert_eq!(props.scale(), (1.0, 1.0));
    }

    #[test]
    fn test_zero_extent_kept() {
        let props = ElementProperties {
            size: Some(ElementSize {
                width: Some(Dimension::pt(120.0)),
                height: Some(Dimension::pt(0.0)),
            }),
            ..ElementProperties::default()
        };
        assert_eq!(props.extent_points(), (120.0, 0.0));
        assert_eq!(props.size_points(), (120.0, MIN_ELEMENT_SIZE_PT));
    }

    #[test]
    fn test_line_kind_from_end_arrow() {
        let ops = parse_operations(
            r#"[
                {"createLine": {"objectId": "l1"}},
                {"createLine": {"objectId": "l2", "lineProperties": {"endArrow": "FILL_ARROW"}}}
            ]"#,
        )
        .unwrap();
        let kinds: Vec<_> = ops
            .iter()
            .map(|op| match op {
                Operation::CreateLine(line) => line.kind(),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(kinds, vec![ElementKind::Line, ElementKind::Arrow]);
    }

    #[test]
    fn test_serialize_keeps_wire_tag() {
        let op = Operation::Delete(DeleteObject {
            object_id: "gone".to_string(),
        });
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["delete"]["objectId"], "gone");
        let back: Operation = serde_json::from_value(json).unwrap();
        assert_eq!(back, op);
    }

    #[test]
    fn test_fill_color() {
        let fill = Fill::solid(RgbColor::new(1.0, 0.0, 0.5));
        let rgba = fill.color().unwrap().to_rgba8();
        assert_eq!((rgba.r, rgba.g, rgba.b, rgba.a), (255, 0, 128, 255));
        assert!(Fill::default().color().is_none());
    }

    #[test]
    fn test_shape_type_tags() {
        assert_eq!(ElementKind::from_shape_type("ELLIPSE"), Some(ElementKind::Ellipse));
        assert_eq!(ElementKind::from_shape_type("CLOUD"), None);
    }
}
