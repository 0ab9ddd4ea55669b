//! The confirmation surface the router renders after the gatherer resolved a
//! location. It is built here, never by the model.

use crate::a2ui::directive::{Alignment, Distribution};
use crate::a2ui::{
    Action, BeginRendering, Button, CheckBox, Component, ComponentKind, ContextBinding, DataEntry,
    DataModelUpdate, Directive, DirectiveBatch, Flex, SurfaceUpdate, Text, TextUsage, ValueRef,
};
use crate::domain::a2a::Part;
use skycast_session::ConfirmationRequest;

pub const CONFIRMATION_SURFACE_ID: &str = "weather-confirmation";

pub const CONFIRM_ACTION: &str = "confirmWeather";
pub const REJECT_ACTION: &str = "rejectWeather";

pub const FORECAST_SELECTED_PATH: &str = "/form/forecastSelected";
pub const ALERTS_SELECTED_PATH: &str = "/form/alertsSelected";

/// Text shown above the confirmation surface.
pub fn confirmation_prompt(request: &ConfirmationRequest) -> String {
    format!(
        "What information would you like to get for {}?",
        request.display_name
    )
}

/// Prompt text followed by one part per directive.
pub fn confirmation_parts(request: &ConfirmationRequest) -> Vec<Part> {
    let mut parts = vec![Part::text(confirmation_prompt(request))];
    parts.extend(Part::directives(confirmation_surface(request).directives()));
    parts
}

pub fn confirmation_surface(request: &ConfirmationRequest) -> DirectiveBatch {
    let state_code = request.state_code.clone().unwrap_or_default();

    let components = vec![
        Component::new(
            "root",
            ComponentKind::Column(Flex {
                distribution: Some(Distribution::Start),
                alignment: Some(Alignment::Start),
                ..Flex::of(&["title", "forecastCheck", "alertsCheck", "buttonRow"])
            }),
        ),
        Component::new(
            "title",
            ComponentKind::Text(Text {
                text: ValueRef::string("Select Weather Actions"),
                usage_hint: Some(TextUsage::H2),
            }),
        ),
        Component::new(
            "forecastCheck",
            ComponentKind::CheckBox(CheckBox {
                label: ValueRef::string("Get current forecast"),
                value: ValueRef::path(FORECAST_SELECTED_PATH),
            }),
        ),
        Component::new(
            "alertsCheck",
            ComponentKind::CheckBox(CheckBox {
                label: ValueRef::string("Check weather alerts"),
                value: ValueRef::path(ALERTS_SELECTED_PATH),
            }),
        ),
        Component::new(
            "buttonRow",
            ComponentKind::Row(Flex {
                distribution: Some(Distribution::SpaceEvenly),
                alignment: Some(Alignment::Center),
                ..Flex::of(&["rejectBtn", "confirmBtn"])
            }),
        ),
        Component::new(
            "rejectBtn",
            ComponentKind::Button(Button {
                child: "rejectText".into(),
                primary: Some(false),
                action: Action {
                    name: REJECT_ACTION.into(),
                    context: vec![ContextBinding::new(
                        "confirmed",
                        ValueRef::string("rejected"),
                    )],
                },
            }),
        ),
        label("rejectText", "Reject"),
        Component::new(
            "confirmBtn",
            ComponentKind::Button(Button {
                child: "confirmText".into(),
                primary: Some(true),
                action: Action {
                    name: CONFIRM_ACTION.into(),
                    context: vec![
                        ContextBinding::new("confirmed", ValueRef::string("confirmed")),
                        ContextBinding::new("location", ValueRef::string(&request.location)),
                        ContextBinding::new("latitude", ValueRef::LiteralNumber(request.latitude)),
                        ContextBinding::new(
                            "longitude",
                            ValueRef::LiteralNumber(request.longitude),
                        ),
                        ContextBinding::new(
                            "display_name",
                            ValueRef::string(&request.display_name),
                        ),
                        ContextBinding::new("state_code", ValueRef::string(&state_code)),
                        ContextBinding::new(
                            "forecastSelected",
                            ValueRef::path(FORECAST_SELECTED_PATH),
                        ),
                        ContextBinding::new("alertsSelected", ValueRef::path(ALERTS_SELECTED_PATH)),
                    ],
                },
            }),
        ),
        label("confirmText", "Confirm"),
    ];

    DirectiveBatch::new(vec![
        Directive::BeginRendering(BeginRendering {
            surface_id: CONFIRMATION_SURFACE_ID.into(),
            root: "root".into(),
            styles: None,
        }),
        Directive::SurfaceUpdate(SurfaceUpdate {
            surface_id: CONFIRMATION_SURFACE_ID.into(),
            components,
        }),
        Directive::DataModelUpdate(DataModelUpdate {
            surface_id: CONFIRMATION_SURFACE_ID.into(),
            path: Some("/".into()),
            contents: vec![
                DataEntry::string("display_name", &request.display_name),
                DataEntry::string("location", &request.location),
                DataEntry::number("latitude", request.latitude),
                DataEntry::number("longitude", request.longitude),
                DataEntry::string("state_code", state_code),
                DataEntry::map(
                    "form",
                    vec![
                        DataEntry::boolean("forecastSelected", true),
                        DataEntry::boolean("alertsSelected", false),
                    ],
                ),
            ],
        }),
    ])
}

fn label(id: &str, text: &str) -> Component {
    Component::new(
        id,
        ComponentKind::Text(Text {
            text: ValueRef::string(text),
            usage_hint: None,
        }),
    )
}
