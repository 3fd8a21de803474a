//! Stored presentation layout: step records in creation order plus an
//! optional explicit route of record indices.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::PresentationConfig;
use crate::error::{PresentationError, Result};
use crate::presentation::Presentation;
use crate::types::{BackgroundSpec, ContentRef, ImageRef, RgbHex, StepDescriptor, StepId, StepInput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationDocument {
    #[serde(default)]
    pub views: Vec<ViewRecord>,
    /// Indices into `views`; when absent the route follows `views` order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_port_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_port_height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_zoom_amount: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRecord {
    pub positioning: Positioning,
    #[serde(default)]
    pub background_group: BackgroundGroup,
    #[serde(default)]
    pub ordering: Ordering,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionRecord>,
}

/// Geometry fields are required: a missing coordinate is an error, not zero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Positioning {
    #[serde(default = "default_true")]
    pub center_text: bool,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotate_x: f32,
    pub rotate_y: f32,
    pub rotate_z: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_rotation: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundGroup {
    #[serde(default = "default_true")]
    pub transparent_background: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<RgbHex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<ImageRef>,
    #[serde(default = "default_background_width")]
    pub background_width: f32,
    #[serde(default = "default_background_height")]
    pub background_height: f32,
}

impl Default for BackgroundGroup {
    fn default() -> Self {
        Self::from(&BackgroundSpec::default())
    }
}

impl From<&BackgroundSpec> for BackgroundGroup {
    fn from(spec: &BackgroundSpec) -> Self {
        Self {
            transparent_background: spec.transparent,
            background_color: spec.color.clone(),
            background_image: spec.image.clone(),
            background_width: spec.width,
            background_height: spec.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ordering {
    #[serde(default = "default_true")]
    pub include_in_path: bool,
}

impl Default for Ordering {
    fn default() -> Self {
        Self {
            include_in_path: true,
        }
    }
}

/// Embedded content; an action without a library means "no content"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,
    #[serde(default)]
    pub params: serde_json::Value,
}

fn default_true() -> bool {
    true
}

fn default_background_width() -> f32 {
    BackgroundSpec::default().width
}

fn default_background_height() -> f32 {
    BackgroundSpec::default().height
}

impl ViewRecord {
    pub fn to_input(&self) -> StepInput {
        let p = &self.positioning;
        let bg = &self.background_group;
        StepInput {
            position: Vec3::new(p.x, p.y, p.z),
            rotation: Vec3::new(p.rotate_x, p.rotate_y, p.rotate_z),
            absolute_rotation: p.absolute_rotation,
            scale: p.scale,
            center_text: p.center_text,
            background: BackgroundSpec {
                transparent: bg.transparent_background,
                color: bg.background_color.clone(),
                image: bg.background_image.clone(),
                width: bg.background_width,
                height: bg.background_height,
            },
            action: self.action.as_ref().and_then(|action| {
                action.library.clone().map(|library| ContentRef {
                    library,
                    params: action.params.clone(),
                })
            }),
            include_in_path: self.ordering.include_in_path,
        }
    }

    pub fn from_step(step: &StepDescriptor) -> Self {
        Self {
            positioning: Positioning {
                center_text: step.center_text,
                x: step.position.x,
                y: step.position.y,
                z: step.position.z,
                rotate_x: step.rotation.x,
                rotate_y: step.rotation.y,
                rotate_z: step.rotation.z,
                absolute_rotation: step.absolute_rotation,
                scale: step.scale,
            },
            background_group: BackgroundGroup::from(&step.background),
            ordering: Ordering {
                include_in_path: step.include_in_path,
            },
            action: step.action.as_ref().map(|content| ActionRecord {
                library: Some(content.library.clone()),
                params: content.params.clone(),
            }),
        }
    }
}

impl PresentationDocument {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Snapshot a presentation; the route is written explicitly
    pub fn from_presentation(presentation: &Presentation) -> Self {
        let order: Vec<StepId> = presentation.steps().map(|step| step.id).collect();
        let route = presentation
            .route()
            .iter()
            .filter_map(|id| order.iter().position(|candidate| candidate == id))
            .collect();
        let config = presentation.config();
        Self {
            views: presentation.steps().map(ViewRecord::from_step).collect(),
            route: Some(route),
            view_port_width: Some(config.viewport_default_width),
            view_port_height: Some(config.viewport_default_height),
            key_zoom_amount: Some(config.key_zoom_amount),
        }
    }

    /// Overlay the document's viewport and zoom settings on `base`
    pub fn config(&self, base: &PresentationConfig) -> PresentationConfig {
        let mut config = base.clone();
        if let Some(width) = self.view_port_width {
            config.viewport_default_width = width;
        }
        if let Some(height) = self.view_port_height {
            config.viewport_default_height = height;
        }
        if let Some(amount) = self.key_zoom_amount {
            config.key_zoom_amount = amount;
        }
        config
    }

    /// Create every step in `presentation`, returning ids in record order.
    ///
    /// With an explicit route, route membership comes from the route list
    /// and each record's `includeInPath` is ignored.
    pub fn populate(&self, presentation: &mut Presentation) -> Result<Vec<StepId>> {
        if let Some(route) = &self.route {
            if let Some(&bad) = route.iter().find(|&&index| index >= self.views.len()) {
                return Err(PresentationError::UnknownRouteEntry(bad));
            }
        }

        // Check every record before creating any step so a bad one leaves nothing behind
        let inputs = self
            .views
            .iter()
            .map(|view| -> Result<StepInput> {
                let mut input = view.to_input();
                if self.route.is_some() {
                    input.include_in_path = false;
                }
                input.validate()?;
                Ok(input)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut ids = Vec::with_capacity(inputs.len());
        for input in inputs {
            ids.push(presentation.create_step(input)?);
        }

        if let Some(route) = &self.route {
            let mut previous = None;
            for &index in route {
                let id = ids[index];
                if presentation.add_to_route(id, previous)? {
                    previous = Some(id);
                }
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECK: &str = r#"{
        "views": [
            { "positioning": { "x": 0, "y": 0, "z": 0, "rotateX": 0, "rotateY": 0, "rotateZ": 0 } },
            {
                "positioning": { "centerText": false, "x": 800, "y": 0, "z": -200, "rotateX": 0, "rotateY": 30, "rotateZ": 0 },
                "backgroundGroup": { "transparentBackground": false, "backgroundColor": "336699", "backgroundWidth": 640, "backgroundHeight": 360 },
                "action": { "library": "H5P.AdvancedText 1.1", "params": { "text": "<p>hi</p>" } }
            },
            {
                "positioning": { "x": 1600, "y": 0, "z": 0, "rotateX": 0, "rotateY": 0, "rotateZ": 90 },
                "ordering": { "includeInPath": false },
                "action": {}
            }
        ],
        "viewPortWidth": 800,
        "keyZoomAmount": 25
    }"#;

    #[test]
    fn parses_view_records() {
        let doc = PresentationDocument::from_json(DECK).unwrap();
        let second = doc.views[1].to_input();
        assert!(!second.center_text);
        assert_eq!(second.background.color.as_ref().unwrap().as_str(), "#336699");
        assert_eq!(second.action.unwrap().library, "H5P.AdvancedText 1.1");
        assert!(doc.views[2].to_input().action.is_none());
    }

    #[test]
    fn missing_coordinate_is_an_error() {
        let raw = r#"{ "views": [ { "positioning": { "x": 0, "y": 0, "rotateX": 0, "rotateY": 0, "rotateZ": 0 } } ] }"#;
        assert!(matches!(
            PresentationDocument::from_json(raw),
            Err(PresentationError::Document(_))
        ));
    }

    #[test]
    fn document_settings_override_config() {
        let doc = PresentationDocument::from_json(DECK).unwrap();
        let config = doc.config(&PresentationConfig::default());
        assert_eq!(config.viewport_default_width, 800.0);
        assert_eq!(config.viewport_default_height, 360.0);
        assert_eq!(config.key_zoom_amount, 25.0);
    }

    #[test]
    fn implicit_route_follows_record_order() {
        let doc = PresentationDocument::from_json(DECK).unwrap();
        let mut presentation = Presentation::new(PresentationConfig::default()).unwrap();
        let ids = doc.populate(&mut presentation).unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(presentation.route(), &[ids[0], ids[1]]);
    }

    #[test]
    fn explicit_route_wins() {
        let mut doc = PresentationDocument::from_json(DECK).unwrap();
        doc.route = Some(vec![2, 0, 2]);
        let mut presentation = Presentation::new(PresentationConfig::default()).unwrap();
        let ids = doc.populate(&mut presentation).unwrap();
        assert_eq!(presentation.route(), &[ids[2], ids[0]]);
        assert!(presentation.get_step(ids[2]).unwrap().include_in_path);
        assert!(!presentation.get_step(ids[1]).unwrap().include_in_path);
    }

    #[test]
    fn out_of_range_route_entry_is_rejected() {
        let mut doc = PresentationDocument::from_json(DECK).unwrap();
        doc.route = Some(vec![0, 9]);
        let mut presentation = Presentation::new(PresentationConfig::default()).unwrap();
        assert!(matches!(
            doc.populate(&mut presentation),
            Err(PresentationError::UnknownRouteEntry(9))
        ));
        assert_eq!(presentation.step_count(), 0);
    }

    #[test]
    fn invalid_record_leaves_presentation_empty() {
        let raw = r#"{
            "views": [
                { "positioning": { "x": 0, "y": 0, "z": 0, "rotateX": 0, "rotateY": 0, "rotateZ": 0 } },
                { "positioning": { "x": 800, "y": 0, "z": 0, "rotateX": 0, "rotateY": 0, "rotateZ": 0, "scale": 0 } }
            ]
        }"#;
        let doc = PresentationDocument::from_json(raw).unwrap();
        let mut presentation = Presentation::new(PresentationConfig::default()).unwrap();

        assert!(matches!(
            doc.populate(&mut presentation),
            Err(PresentationError::InvalidGeometry { field: "scale", .. })
        ));
        assert_eq!(presentation.step_count(), 0);
        assert!(presentation.route().is_empty());
    }

    #[test]
    fn snapshot_reloads_to_same_route() {
        let mut doc = PresentationDocument::from_json(DECK).unwrap();
        doc.route = Some(vec![1, 0]);
        let mut source = Presentation::new(PresentationConfig::default()).unwrap();
        doc.populate(&mut source).unwrap();

        let saved = PresentationDocument::from_presentation(&source).to_json().unwrap();
        let mut reloaded = Presentation::new(PresentationConfig::default()).unwrap();
        PresentationDocument::from_json(&saved)
            .unwrap()
            .populate(&mut reloaded)
            .unwrap();

        assert_eq!(reloaded.route(), source.route());
        assert_eq!(reloaded.step_count(), 3);
    }
}
