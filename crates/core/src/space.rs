//! Space-dialect notifications.
//!
//! Targets a caller-supplied webhook URL with no auth header. The wire
//! document is `text` plus a `cards` array whose first element carries a
//! `header` and a list of widget `sections`. Success is HTTP 200.
//!
//! A few builder states have no place on this wire and are carried as
//! staging fields (`message_format`, `notify`, `card_format`): they are
//! tracked for validation and the deferred send-time transforms, and never
//! serialized.

use serde::{Deserialize, Serialize};

use crate::lozenge;
use crate::notification::Notification;
use crate::validate;

/// Marker token that alerts every member of the space when it appears in
/// the message text.
const NOTIFY_ALL_MARKER: &str = "<users/all>";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Request document for the space dialect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpaceMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Staged for validation; this wire has no format field.
    #[serde(default, skip_serializing)]
    pub message_format: Option<String>,
    /// Staged; applied as the [`NOTIFY_ALL_MARKER`] text prefix at send
    /// time and stripped from the outgoing body.
    #[serde(default, skip_serializing)]
    pub notify: bool,
    /// Staged; this wire has no card density field.
    #[serde(default, skip_serializing)]
    pub card_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<SpaceCard>>,
}

/// A card: header plus widget sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpaceCard {
    pub header: CardHeader,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardHeader {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_style: Option<String>,
}

/// One rendering block inside a card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub widgets: Vec<Widget>,
}

/// A single rendering element inside a section.
///
/// Serialized forms: `{"textParagraph": {...}}`, `{"keyValue": {...}}`,
/// or, for the attribute batch flushed at send time, a nested array of
/// widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Widget {
    TextParagraph {
        #[serde(rename = "textParagraph")]
        text_paragraph: TextParagraph,
    },
    KeyValue {
        #[serde(rename = "keyValue")]
        key_value: KeyValue,
    },
    Batch(Vec<Widget>),
}

impl Widget {
    fn text_paragraph(text: &str) -> Self {
        Self::TextParagraph {
            text_paragraph: TextParagraph {
                text: text.to_string(),
            },
        }
    }

    fn key_value(key_value: KeyValue) -> Self {
        Self::KeyValue { key_value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextParagraph {
    pub text: String,
}

/// Labeled content row, optionally iconed and clickable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_label: Option<String>,
    pub content: String,
    /// The wire expects the string `"true"`, not a boolean.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_multiline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_click: Option<OnClick>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnClick {
    pub open_link: OpenLink,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenLink {
    pub url: String,
}

impl OnClick {
    fn to(url: &str) -> Self {
        Self {
            open_link: OpenLink {
                url: url.to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Fluent builder for space-dialect notifications.
///
/// Setters never validate; constraint checking is deferred to
/// [`send`](Notification::send). Queued attributes are flushed as one
/// batch section at send time, in insertion order, with their content
/// lozenge-colored.
#[derive(Debug, Clone)]
pub struct SpaceNotification {
    endpoint: String,
    document: SpaceMessage,
    is_card: bool,
    pending_attributes: Vec<Widget>,
}

impl SpaceNotification {
    /// Create a builder targeting a caller-supplied webhook URL.
    pub fn new(webhook_url: &str) -> Self {
        Self {
            endpoint: webhook_url.to_string(),
            document: SpaceMessage::default(),
            is_card: false,
            pending_attributes: Vec::new(),
        }
    }

    /// Primary message text.
    pub fn set_body(&mut self, text: &str) -> &mut Self {
        self.document.text = Some(text.to_string());
        self
    }

    /// Switch the message body to plain-text format.
    ///
    /// Unlike the room dialect, a started card is left untouched: this wire
    /// renders text and cards independently.
    pub fn set_text_format(&mut self) -> &mut Self {
        self.document.message_format = Some("text".into());
        self
    }

    /// Alert every member of the space. Applied at send time by prefixing
    /// the message text with the alert marker; the flag itself never
    /// reaches the wire.
    pub fn enable_notify_all(&mut self) -> &mut Self {
        self.document.notify = true;
        self
    }

    /// Begin card mode with a header title and optional subtitle.
    ///
    /// Calling this again updates the same header in place rather than
    /// creating a second card.
    pub fn start_card(&mut self, title: &str, subtitle: Option<&str>) -> &mut Self {
        let cards = self
            .document
            .cards
            .get_or_insert_with(|| vec![SpaceCard::default()]);
        let header = &mut cards[0].header;
        header.title = Some(title.to_string());
        if let Some(subtitle) = subtitle {
            header.subtitle = Some(subtitle.to_string());
        }
        self.is_card = true;
        self
    }

    fn card_mut(&mut self) -> &mut SpaceCard {
        self.document
            .cards
            .as_mut()
            .and_then(|cards| cards.first_mut())
            .expect("no card started; call start_card first")
    }

    /// Header image for the card.
    ///
    /// # Panics
    ///
    /// Like every card sub-setter, panics if no card has been started.
    /// That is a programming error, not a validation failure.
    pub fn set_thumbnail(&mut self, url: &str) -> &mut Self {
        let header = &mut self.card_mut().header;
        header.image_url = Some(url.to_string());
        header.image_style = Some("IMAGE".into());
        self
    }

    /// Accepted for parity with the room dialect; this wire has no retina
    /// variant or dimension fields, so only the base `url` is used.
    pub fn set_thumbnail_details(
        &mut self,
        url: &str,
        _retina_url: &str,
        _width: u32,
        _height: u32,
    ) -> &mut Self {
        self.set_thumbnail(url)
    }

    /// Append a one-line activity section. Each call adds a new section;
    /// this wire has no single-activity limit.
    pub fn add_activity_line(&mut self, html: &str) -> &mut Self {
        let widget = Widget::text_paragraph(html);
        self.push_section(widget)
    }

    /// Activity line with an icon, rendered as a multiline content row.
    pub fn add_activity_line_with_icon(&mut self, html: &str, icon_url: &str) -> &mut Self {
        let widget = Widget::key_value(KeyValue {
            content: html.to_string(),
            content_multiline: Some("true".into()),
            icon_url: Some(icon_url.to_string()),
            ..Default::default()
        });
        self.push_section(widget)
    }

    /// Accepted for parity with the room dialect; the retina variant is
    /// unused on this wire.
    pub fn add_activity_line_with_icon_details(
        &mut self,
        html: &str,
        icon_url: &str,
        _retina_icon_url: &str,
    ) -> &mut Self {
        self.add_activity_line_with_icon(html, icon_url)
    }

    /// Card display density: `compact` or `medium`. Tracked for validation
    /// only; this wire has no density field and the value is stripped from
    /// the outgoing body.
    pub fn set_card_layout(&mut self, format: &str) -> &mut Self {
        self.document.card_format = Some(format.to_string());
        self
    }

    /// Click-through link rendered as its own section.
    pub fn set_card_link_url(&mut self, url: &str) -> &mut Self {
        let widget = Widget::key_value(KeyValue {
            content: url.to_string(),
            on_click: Some(OnClick::to(url)),
            ..Default::default()
        });
        self.push_section(widget)
    }

    /// Descriptive body block rendered as a text section. The `format`
    /// argument exists for parity with the room dialect; this wire renders
    /// a single paragraph form.
    pub fn set_card_description(&mut self, description: &str, _format: &str) -> &mut Self {
        let widget = Widget::text_paragraph(description);
        self.push_section(widget)
    }

    /// Card-level icon, shown as the header avatar.
    pub fn set_card_icon(&mut self, icon_url: &str) -> &mut Self {
        let header = &mut self.card_mut().header;
        header.image_url = Some(icon_url.to_string());
        header.image_style = Some("AVATAR".into());
        self
    }

    /// Accepted for parity with the room dialect; the retina variant is
    /// unused on this wire.
    pub fn set_card_icon_details(&mut self, icon_url: &str, _retina_icon_url: &str) -> &mut Self {
        self.set_card_icon(icon_url)
    }

    fn push_section(&mut self, widget: Widget) -> &mut Self {
        self.card_mut().sections.push(Section {
            widgets: vec![widget],
        });
        self
    }

    /// Queue a styled key/value attribute.
    pub fn add_attribute(&mut self, label: &str, content: &str, style: &str) -> &mut Self {
        self.push_attribute(label, content, style, None, None)
    }

    /// Queue an attribute whose row opens `url` when clicked.
    pub fn add_attribute_with_url(
        &mut self,
        label: &str,
        content: &str,
        style: &str,
        url: &str,
    ) -> &mut Self {
        self.push_attribute(label, content, style, None, Some(url))
    }

    /// Queue an attribute with an icon. Icon values containing `//` are
    /// treated as absolute icon URLs; anything else is a symbolic icon
    /// identifier.
    pub fn add_attribute_with_icon(
        &mut self,
        label: &str,
        content: &str,
        style: &str,
        icon: &str,
    ) -> &mut Self {
        self.push_attribute(label, content, style, Some(icon), None)
    }

    /// Queue an attribute with both an icon and a click-through URL.
    pub fn add_attribute_with_icon_and_url(
        &mut self,
        label: &str,
        content: &str,
        style: &str,
        icon: &str,
        url: &str,
    ) -> &mut Self {
        self.push_attribute(label, content, style, Some(icon), Some(url))
    }

    fn push_attribute(
        &mut self,
        label: &str,
        content: &str,
        style: &str,
        icon: Option<&str>,
        url: Option<&str>,
    ) -> &mut Self {
        let mut key_value = KeyValue {
            top_label: Some(label.to_string()),
            content: lozenge::styled_content(content, style),
            ..Default::default()
        };
        if let Some(icon) = icon {
            if icon.contains("//") {
                key_value.icon_url = Some(icon.to_string());
            } else {
                key_value.icon = Some(icon.to_string());
            }
        }
        if let Some(url) = url {
            key_value.on_click = Some(OnClick::to(url));
        }
        self.pending_attributes.push(Widget::key_value(key_value));
        self
    }
}

#[async_trait::async_trait]
impl Notification for SpaceNotification {
    type Document = SpaceMessage;

    const SUCCESS_STATUS: u16 = 200;
    const SUCCESS_MESSAGE: &'static str = "successfully posted to space";

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn document(&self) -> &SpaceMessage {
        &self.document
    }

    fn validate(&self) -> Vec<String> {
        validate::space_violations(&self.document, self.is_card)
    }

    fn finalize(&self) -> SpaceMessage {
        let mut doc = self.document.clone();

        if self.is_card && !self.pending_attributes.is_empty() {
            if let Some(card) = doc.cards.as_mut().and_then(|cards| cards.first_mut()) {
                card.sections.push(Section {
                    widgets: vec![Widget::Batch(self.pending_attributes.clone())],
                });
            }
        }

        if doc.notify {
            doc.text = Some(match doc.text.take() {
                Some(text) => format!("{NOTIFY_ALL_MARKER} {text}"),
                None => NOTIFY_ALL_MARKER.to_string(),
            });
            doc.notify = false;
        }

        doc
    }
}
