//! Google Chat card model and the mapping from a validation result onto it.
//!
//! Building is a pure function of the request, the run context and the
//! asset set. Nothing here touches the network or the environment.

use serde::Serialize;

use crate::config::Assets;
use crate::context::RunContext;
use crate::input::NotificationRequest;

pub const SUCCESS_COLOR: &str = "#34A853";
pub const FAILURE_COLOR: &str = "#EA4335";
pub const CANCELLED_COLOR: &str = "#FBBC05";

/// Chat clients cut header titles around this length, so longer names are
/// repeated in the body.
pub const NAME_WIDGET_MIN_CHARS: usize = 45;

pub const CODE_STANDARDIZATION_TEXT: &str =
    "Code standardization results will be reported here.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub header: CardHeader,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardHeader {
    pub title: String,
    pub subtitle: String,
    pub image_url: String,
    pub image_type: ImageType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageType {
    Circle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncollapsible_widgets_count: Option<u32>,
    pub widgets: Vec<Widget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Widget {
    DecoratedText(DecoratedText),
    TextParagraph(TextParagraph),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecoratedText {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_label: Option<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap_text: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_icon: Option<Icon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<Button>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextParagraph {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Icon {
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub text: String,
    pub on_click: OnClick,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnClick {
    pub open_link: OpenLink,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenLink {
    pub url: String,
}

impl Button {
    pub fn link(text: &str, url: impl Into<String>) -> Self {
        Button {
            text: text.to_string(),
            on_click: OnClick {
                open_link: OpenLink { url: url.into() },
            },
        }
    }
}

impl Icon {
    fn new(url: &str) -> Self {
        Icon {
            icon_url: url.to_string(),
        }
    }
}

/// How a validation status is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
    Cancelled,
}

impl Status {
    /// Case-insensitive; everything that is neither success nor failure is
    /// shown as cancelled.
    pub fn from_raw(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "success" => Status::Success,
            "failure" => Status::Failure,
            _ => Status::Cancelled,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Status::Success => SUCCESS_COLOR,
            Status::Failure => FAILURE_COLOR,
            Status::Cancelled => CANCELLED_COLOR,
        }
    }

    fn icon(self, assets: &Assets) -> &str {
        match self {
            Status::Success => &assets.success_icon,
            Status::Failure => &assets.failure_icon,
            Status::Cancelled => &assets.cancelled_icon,
        }
    }
}

/// Label shown for a raw status. Only the first character is upper-cased;
/// the cancelled bucket always reads "Cancelled".
pub fn status_label(raw: &str) -> String {
    match Status::from_raw(raw) {
        Status::Cancelled => "Cancelled".to_string(),
        Status::Success | Status::Failure => capitalize_first(raw),
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Label shown for a raw event name.
///
/// Unrecognized events read "Workflow Dispatch" here while their links are
/// built as pushes (see [`crate::context::EventKind::from_name`]).
pub fn event_label(event_name: &str) -> &'static str {
    match event_name.to_lowercase().as_str() {
        "pull_request" => "Pull Request",
        "push" => "Push",
        _ => "Workflow Dispatch",
    }
}

// Follows the label, not the link fallback.
fn event_icon<'a>(event_name: &str, assets: &'a Assets) -> &'a str {
    match event_name.to_lowercase().as_str() {
        "pull_request" => &assets.pull_request_icon,
        "push" => &assets.push_icon,
        _ => &assets.workflow_dispatch_icon,
    }
}

pub fn build_card(req: &NotificationRequest, ctx: &RunContext, assets: &Assets) -> Card {
    Card {
        header: CardHeader {
            title: req.name.clone(),
            subtitle: format!("{}/{}", ctx.owner, ctx.repo),
            image_url: assets.github_mark.clone(),
            image_type: ImageType::Circle,
        },
        sections: vec![
            run_section(req, ctx, assets),
            code_standardization_section(),
            summary_section(req),
        ],
    }
}

fn run_section(req: &NotificationRequest, ctx: &RunContext, assets: &Assets) -> Section {
    let status = Status::from_raw(&req.validation_status);
    let mut widgets = vec![
        Widget::DecoratedText(DecoratedText {
            top_label: Some("Status".into()),
            text: format!(
                "<font color=\"{}\"><b>{}</b></font>",
                status.color(),
                status_label(&req.validation_status)
            ),
            bottom_label: Some(ctx.workflow.clone()),
            start_icon: Some(Icon::new(status.icon(assets))),
            button: Some(Button::link("Open Checks", ctx.checks_url())),
            ..Default::default()
        }),
        Widget::DecoratedText(DecoratedText {
            top_label: Some("Event".into()),
            text: event_label(&ctx.event_name).to_string(),
            start_icon: Some(Icon::new(event_icon(&ctx.event_name, assets))),
            button: Some(Button::link("Open", ctx.event_url())),
            ..Default::default()
        }),
        Widget::DecoratedText(DecoratedText {
            top_label: Some("Ref".into()),
            text: ctx.git_ref.clone(),
            ..Default::default()
        }),
        Widget::DecoratedText(DecoratedText {
            top_label: Some("Actor".into()),
            text: ctx.actor.clone(),
            ..Default::default()
        }),
    ];

    if req.name.chars().count() >= NAME_WIDGET_MIN_CHARS {
        widgets.push(Widget::DecoratedText(DecoratedText {
            top_label: Some("Name".into()),
            text: req.name.clone(),
            wrap_text: Some(true),
            ..Default::default()
        }));
    }

    Section {
        header: None,
        collapsible: None,
        uncollapsible_widgets_count: None,
        widgets,
    }
}

fn code_standardization_section() -> Section {
    Section {
        header: Some("Code Standardization".into()),
        collapsible: None,
        uncollapsible_widgets_count: None,
        widgets: vec![Widget::TextParagraph(TextParagraph {
            text: CODE_STANDARDIZATION_TEXT.into(),
        })],
    }
}

fn summary_section(req: &NotificationRequest) -> Section {
    Section {
        header: Some("Summary".into()),
        collapsible: Some(true),
        uncollapsible_widgets_count: Some(1),
        widgets: vec![
            Widget::DecoratedText(DecoratedText {
                top_label: Some("Validation".into()),
                text: req.validation_id.clone(),
                button: Some(Button::link("Open Details", req.validation_url.clone())),
                ..Default::default()
            }),
            Widget::TextParagraph(TextParagraph {
                text: req.validation_details.clone(),
            }),
        ],
    }
}
