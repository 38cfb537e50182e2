//! Room-dialect notifications.
//!
//! Targets the room notification API at
//! `{domain}/v2/room/{room_id}/notification` with a bearer token. The wire
//! document is flat (`from`, `message_format`, `color`, `notify`,
//! `message`, `attach_to`) with an optional nested `card`. Success is
//! HTTP 204.

use serde::{Deserialize, Serialize};

use crate::notification::Notification;
use crate::validate;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Flat request document for the room dialect.
///
/// `message_format`, `color`, and `notify` carry API defaults and are
/// always serialized; everything else is omitted until set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub message_format: String,
    pub color: String,
    pub notify: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attach_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<RoomCard>,
}

impl Default for RoomMessage {
    fn default() -> Self {
        Self {
            from: None,
            message_format: "html".into(),
            color: "yellow".into(),
            notify: false,
            message: None,
            attach_to: None,
            card: None,
        }
    }
}

/// Nested card structure.
///
/// The header fields (`id`, `style`, `title`) are options so the validator
/// can observe their absence; [`RoomNotification::start_card`] always sets
/// all three.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomCard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<CardDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<Activity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
}

/// Descriptive body block on a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDescription {
    pub value: String,
    pub format: String,
}

/// Card thumbnail, optionally with a retina variant and dimensions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url2x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// One-line activity summary on a card. The room API renders a single
/// activity entry per card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
}

/// Icon reference with an optional retina variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icon {
    pub url: String,
    #[serde(rename = "url@2x", skip_serializing_if = "Option::is_none")]
    pub url2x: Option<String>,
}

impl Icon {
    fn new(url: &str, url2x: Option<&str>) -> Self {
        Self {
            url: url.to_string(),
            url2x: url2x.map(str::to_string),
        }
    }
}

/// A key/value attribute row on a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub label: String,
    pub value: AttributeValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub label: String,
    pub style: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Fluent builder for room-dialect notifications.
///
/// Setters never validate; constraint checking is deferred to
/// [`send`](Notification::send) so calls can arrive in any order. Queued
/// attributes are merged into the card at send time, in insertion order.
#[derive(Debug, Clone)]
pub struct RoomNotification {
    endpoint: String,
    auth_token: String,
    document: RoomMessage,
    is_card: bool,
    pending_attributes: Vec<Attribute>,
}

impl RoomNotification {
    /// Create a builder targeting `{domain}/v2/room/{room_id}/notification`.
    pub fn new(domain: &str, room_id: &str, auth_token: &str) -> Self {
        Self {
            endpoint: format!(
                "{}/v2/room/{}/notification",
                domain.trim_end_matches('/'),
                room_id
            ),
            auth_token: auth_token.to_string(),
            document: RoomMessage::default(),
            is_card: false,
            pending_attributes: Vec::new(),
        }
    }

    /// Label shown in addition to the sender's name.
    pub fn set_sender(&mut self, name: &str) -> &mut Self {
        self.document.from = Some(name.to_string());
        self
    }

    /// Switch the message body to plain-text format.
    ///
    /// Cards on this wire are rendered from HTML, so text format and cards
    /// are mutually exclusive: any card started earlier is discarded and
    /// the builder drops back to basic mode.
    pub fn set_text_format(&mut self) -> &mut Self {
        self.document.message_format = "text".into();
        self.document.card = None;
        self.pending_attributes.clear();
        self.is_card = false;
        self
    }

    /// Background color tag for the message.
    pub fn set_color(&mut self, color: &str) -> &mut Self {
        self.document.color = color.to_string();
        self
    }

    /// Alert every member of the room.
    pub fn enable_notify_all(&mut self) -> &mut Self {
        self.document.notify = true;
        self
    }

    /// Primary message body.
    pub fn set_body(&mut self, message: &str) -> &mut Self {
        self.document.message = Some(message.to_string());
        self
    }

    /// Attach the notification to an earlier message by its id.
    pub fn set_attach_to(&mut self, message_id: &str) -> &mut Self {
        self.document.attach_to = Some(message_id.to_string());
        self
    }

    /// Begin card mode, setting the mandatory card header fields.
    ///
    /// Calling this again updates the same header in place rather than
    /// creating a second card.
    pub fn start_card(&mut self, id: &str, style: &str, title: &str) -> &mut Self {
        let card = self.document.card.get_or_insert_with(RoomCard::default);
        card.id = Some(id.to_string());
        card.style = Some(style.to_string());
        card.title = Some(title.to_string());
        self.is_card = true;
        self
    }

    fn card_mut(&mut self) -> &mut RoomCard {
        self.document
            .card
            .as_mut()
            .expect("no card started; call start_card first")
    }

    /// Thumbnail shown beside the card header.
    ///
    /// # Panics
    ///
    /// Like every card sub-setter, panics if no card has been started.
    /// That is a programming error, not a validation failure.
    pub fn set_thumbnail(&mut self, url: &str) -> &mut Self {
        self.card_mut().thumbnail = Some(Thumbnail {
            url: Some(url.to_string()),
            ..Default::default()
        });
        self
    }

    /// Thumbnail with a retina variant and explicit dimensions.
    pub fn set_thumbnail_details(
        &mut self,
        url: &str,
        retina_url: &str,
        width: u32,
        height: u32,
    ) -> &mut Self {
        self.card_mut().thumbnail = Some(Thumbnail {
            url: Some(url.to_string()),
            url2x: Some(retina_url.to_string()),
            width: Some(width),
            height: Some(height),
        });
        self
    }

    /// One-line summary of the action that happened. The room API shows a
    /// single activity entry, so a second call replaces the first.
    pub fn add_activity_line(&mut self, html: &str) -> &mut Self {
        self.card_mut().activity = Some(Activity {
            html: Some(html.to_string()),
            icon: None,
        });
        self
    }

    /// Activity line with an icon.
    pub fn add_activity_line_with_icon(&mut self, html: &str, icon_url: &str) -> &mut Self {
        self.card_mut().activity = Some(Activity {
            html: Some(html.to_string()),
            icon: Some(Icon::new(icon_url, None)),
        });
        self
    }

    /// Activity line with an icon and its retina variant.
    pub fn add_activity_line_with_icon_details(
        &mut self,
        html: &str,
        icon_url: &str,
        retina_icon_url: &str,
    ) -> &mut Self {
        self.card_mut().activity = Some(Activity {
            html: Some(html.to_string()),
            icon: Some(Icon::new(icon_url, Some(retina_icon_url))),
        });
        self
    }

    /// Card display density: `compact` or `medium`.
    pub fn set_card_layout(&mut self, format: &str) -> &mut Self {
        self.card_mut().format = Some(format.to_string());
        self
    }

    /// URL opened when the card is clicked.
    pub fn set_card_link_url(&mut self, url: &str) -> &mut Self {
        self.card_mut().url = Some(url.to_string());
        self
    }

    /// Descriptive body block in the given format (`html` or `text`).
    pub fn set_card_description(&mut self, description: &str, format: &str) -> &mut Self {
        self.card_mut().description = Some(CardDescription {
            value: description.to_string(),
            format: format.to_string(),
        });
        self
    }

    /// Card-level icon.
    pub fn set_card_icon(&mut self, icon_url: &str) -> &mut Self {
        self.card_mut().icon = Some(Icon::new(icon_url, None));
        self
    }

    /// Card-level icon with its retina variant.
    pub fn set_card_icon_details(&mut self, icon_url: &str, retina_icon_url: &str) -> &mut Self {
        self.card_mut().icon = Some(Icon::new(icon_url, Some(retina_icon_url)));
        self
    }

    /// Queue a styled key/value attribute.
    pub fn add_attribute(&mut self, label: &str, content: &str, style: &str) -> &mut Self {
        self.push_attribute(label, content, style, None, None)
    }

    /// Queue an attribute whose label opens `url` when clicked.
    pub fn add_attribute_with_url(
        &mut self,
        label: &str,
        content: &str,
        style: &str,
        url: &str,
    ) -> &mut Self {
        self.push_attribute(label, content, style, Some(url), None)
    }

    /// Queue an attribute with an icon.
    pub fn add_attribute_with_icon(
        &mut self,
        label: &str,
        content: &str,
        style: &str,
        icon_url: &str,
    ) -> &mut Self {
        self.push_attribute(label, content, style, None, Some(icon_url))
    }

    /// Queue an attribute with both an icon and a click-through URL.
    pub fn add_attribute_with_icon_and_url(
        &mut self,
        label: &str,
        content: &str,
        style: &str,
        icon_url: &str,
        url: &str,
    ) -> &mut Self {
        self.push_attribute(label, content, style, Some(url), Some(icon_url))
    }

    fn push_attribute(
        &mut self,
        label: &str,
        content: &str,
        style: &str,
        url: Option<&str>,
        icon: Option<&str>,
    ) -> &mut Self {
        self.pending_attributes.push(Attribute {
            label: label.to_string(),
            value: AttributeValue {
                label: content.to_string(),
                style: style.to_string(),
                url: url.map(str::to_string),
                icon: icon.map(str::to_string),
            },
        });
        self
    }
}

#[async_trait::async_trait]
impl Notification for RoomNotification {
    type Document = RoomMessage;

    const SUCCESS_STATUS: u16 = 204;
    const SUCCESS_MESSAGE: &'static str = "successfully posted to room";

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn auth_token(&self) -> Option<&str> {
        Some(&self.auth_token)
    }

    fn document(&self) -> &RoomMessage {
        &self.document
    }

    fn validate(&self) -> Vec<String> {
        validate::room_violations(&self.document, self.is_card)
    }

    fn finalize(&self) -> RoomMessage {
        let mut doc = self.document.clone();
        if self.is_card && !self.pending_attributes.is_empty() {
            if let Some(card) = doc.card.as_mut() {
                card.attributes.extend(self.pending_attributes.iter().cloned());
            }
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn builder() -> RoomNotification {
        RoomNotification::new("https://chat.example.com", "1", "abcd1234")
    }

    #[test]
    fn test_endpoint_shape() {
        let n = builder();
        assert_eq!(
            n.endpoint(),
            "https://chat.example.com/v2/room/1/notification"
        );
    }

    #[test]
    fn test_initial_document_defaults() {
        let n = builder();
        assert_eq!(
            serde_json::to_value(n.document()).unwrap(),
            json!({
                "message_format": "html",
                "color": "yellow",
                "notify": false
            })
        );
    }

    #[test]
    fn test_custom_basic_message() {
        let mut n = builder();
        n.set_sender("from")
            .set_text_format()
            .set_color("green")
            .enable_notify_all()
            .set_body("message");
        assert_eq!(
            serde_json::to_value(n.document()).unwrap(),
            json!({
                "from": "from",
                "message_format": "text",
                "color": "green",
                "notify": true,
                "message": "message"
            })
        );
    }

    #[test]
    fn test_basic_card() {
        let mut n = builder();
        n.set_body("message").start_card("1", "file", "title");
        assert_eq!(
            serde_json::to_value(n.document()).unwrap(),
            json!({
                "message_format": "html",
                "color": "yellow",
                "notify": false,
                "message": "message",
                "card": {
                    "id": "1",
                    "style": "file",
                    "title": "title"
                }
            })
        );
    }

    #[test]
    fn test_start_card_twice_updates_header_in_place() {
        let mut n = builder();
        n.start_card("1", "file", "title")
            .set_card_link_url("https://example.com");
        n.start_card("2", "link", "renamed");

        let card = n.document().card.as_ref().unwrap();
        assert_eq!(card.id.as_deref(), Some("2"));
        assert_eq!(card.style.as_deref(), Some("link"));
        assert_eq!(card.title.as_deref(), Some("renamed"));
        // Non-header fields survive the header update.
        assert_eq!(card.url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_card_with_thumbnail_details() {
        let mut n = builder();
        n.start_card("1", "file", "title")
            .set_thumbnail_details("url", "url2x", 100, 200);
        assert_eq!(
            serde_json::to_value(n.document()).unwrap(),
            json!({
                "message_format": "html",
                "color": "yellow",
                "notify": false,
                "card": {
                    "id": "1",
                    "style": "file",
                    "title": "title",
                    "thumbnail": {
                        "url": "url",
                        "url2x": "url2x",
                        "width": 100,
                        "height": 200
                    }
                }
            })
        );
    }

    #[test]
    fn test_activity_with_retina_icon_wire_names() {
        let mut n = builder();
        n.start_card("1", "file", "title")
            .add_activity_line_with_icon_details("html", "iconUrl", "icon2xUrl");
        assert_eq!(
            serde_json::to_value(&n.document().card).unwrap(),
            json!({
                "id": "1",
                "style": "file",
                "title": "title",
                "activity": {
                    "html": "html",
                    "icon": {
                        "url": "iconUrl",
                        "url@2x": "icon2xUrl"
                    }
                }
            })
        );
    }

    #[test]
    fn test_second_activity_replaces_first() {
        let mut n = builder();
        n.start_card("1", "file", "title")
            .add_activity_line("first")
            .add_activity_line("second");
        let activity = n.document().card.as_ref().unwrap().activity.as_ref().unwrap();
        assert_eq!(activity.html.as_deref(), Some("second"));
    }

    #[test]
    fn test_text_format_discards_card() {
        let mut n = builder();
        n.set_body("message")
            .start_card("1", "file", "title")
            .add_attribute("k", "v", "lozenge");
        n.set_text_format();

        assert!(n.document().card.is_none());
        let finalized = n.finalize();
        assert!(finalized.card.is_none());
        assert_eq!(n.validate(), Vec::<String>::new());
    }

    #[test]
    fn test_attributes_queue_until_finalize() {
        let mut n = builder();
        n.start_card("1", "file", "title")
            .add_attribute("first", "a", "lozenge-success")
            .add_attribute_with_url("second", "b", "lozenge-error", "https://example.com/b")
            .add_attribute_with_icon_and_url(
                "third",
                "c",
                "lozenge",
                "https://example.com/i.png",
                "https://example.com/c",
            );

        // Not merged yet: the snapshot document carries no attributes.
        assert!(n.document().card.as_ref().unwrap().attributes.is_empty());

        let finalized = n.finalize();
        let attributes = &finalized.card.as_ref().unwrap().attributes;
        assert_eq!(attributes.len(), 3);
        assert_eq!(attributes[0].label, "first");
        assert_eq!(attributes[1].label, "second");
        assert_eq!(attributes[2].label, "third");
        assert_eq!(
            attributes[1].value.url.as_deref(),
            Some("https://example.com/b")
        );
        assert_eq!(
            attributes[2].value.icon.as_deref(),
            Some("https://example.com/i.png")
        );

        // Finalize snapshots; the builder queue is untouched.
        assert!(n.document().card.as_ref().unwrap().attributes.is_empty());
    }

    #[test]
    fn test_attribute_wire_shape() {
        let mut n = builder();
        n.start_card("1", "file", "title")
            .add_attribute("status", "deployed", "lozenge-success");
        let finalized = n.finalize();
        assert_eq!(
            serde_json::to_value(&finalized.card.as_ref().unwrap().attributes).unwrap(),
            json!([{
                "label": "status",
                "value": {
                    "label": "deployed",
                    "style": "lozenge-success"
                }
            }])
        );
    }

    #[test]
    fn test_card_round_trip_has_no_extraneous_keys() {
        let mut n = builder();
        n.start_card("1", "application", "title")
            .set_thumbnail("https://example.com/t.png")
            .add_activity_line("did a thing")
            .set_card_link_url("https://example.com")
            .add_attribute("k", "v", "lozenge");

        assert_eq!(
            serde_json::to_value(n.finalize()).unwrap(),
            json!({
                "message_format": "html",
                "color": "yellow",
                "notify": false,
                "card": {
                    "id": "1",
                    "style": "application",
                    "title": "title",
                    "url": "https://example.com",
                    "thumbnail": { "url": "https://example.com/t.png" },
                    "activity": { "html": "did a thing" },
                    "attributes": [{
                        "label": "k",
                        "value": { "label": "v", "style": "lozenge" }
                    }]
                }
            })
        );
    }

    #[test]
    #[should_panic(expected = "no card started")]
    fn test_thumbnail_before_card_is_a_precondition_violation() {
        builder().set_thumbnail("https://example.com/t.png");
    }

    #[test]
    fn test_validate_reports_bad_color() {
        let mut n = builder();
        n.set_body("message").set_color("mauve");
        assert_eq!(
            n.validate(),
            vec!["color must be one of: yellow, green, red, purple, gray, random."]
        );
    }
}
