//! Deferred field validation for notification documents.
//!
//! Checks run in a fixed order and never short-circuit: every violated
//! constraint contributes exactly one message, so a caller can fix the whole
//! document in one pass. Validity is an empty violation list.
//!
//! The allowed value sets and length ceilings below mirror the documented
//! constraints of the two target APIs.

use crate::room::RoomMessage;
use crate::space::SpaceMessage;

/// Allowed message body formats.
pub const MESSAGE_FORMATS: &[&str] = &["html", "text"];

/// Allowed message background colors (room dialect).
pub const COLORS: &[&str] = &["yellow", "green", "red", "purple", "gray", "random"];

/// Allowed card styles (room dialect).
pub const CARD_STYLES: &[&str] = &["file", "image", "application", "link", "media"];

/// Allowed card display densities.
pub const CARD_FORMATS: &[&str] = &["compact", "medium"];

/// Ceiling on the sender label.
pub const MAX_FROM_LEN: usize = 64;

/// Ceiling on the attach-to message id.
pub const MAX_ATTACH_TO_LEN: usize = 36;

/// Ceiling on the message body.
pub const MAX_BODY_LEN: usize = 10_000;

/// Ceiling on the card title.
pub const MAX_CARD_TITLE_LEN: usize = 500;

// ---------------------------------------------------------------------------
// Check accumulator
// ---------------------------------------------------------------------------

/// Accumulates violation messages across an ordered sequence of field
/// checks. Absent optional fields are always legal; presence triggers the
/// format and length checks.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no check has fired.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// All violations collected so far, in check order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    /// Flag `field` when a present value exceeds `max` characters.
    pub fn check_max_len(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(v) = value {
            if v.chars().count() > max {
                self.errors
                    .push(format!("{field} must be between 0 and {max} characters."));
            }
        }
    }

    /// Flag `field` when a present value is not one of `allowed`.
    pub fn check_one_of(&mut self, field: &str, value: Option<&str>, allowed: &[&str]) {
        if let Some(v) = value {
            if !allowed.contains(&v) {
                self.errors
                    .push(format!("{field} must be one of: {}.", allowed.join(", ")));
            }
        }
    }

    /// Flag `field` as missing unless `present`.
    pub fn check_required(&mut self, field: &str, present: bool) {
        if !present {
            self.errors.push(format!("{field} is a required property."));
        }
    }

    /// Body is the one field that is both required and length-limited.
    fn check_body(&mut self, body: Option<&str>) {
        match body {
            Some(b) => self.check_max_len("body", Some(b), MAX_BODY_LEN),
            None => self.check_required("body", false),
        }
    }
}

// ---------------------------------------------------------------------------
// Dialect drivers
// ---------------------------------------------------------------------------

/// Run the ordered room-dialect checks. Card mode replaces, not extends,
/// the basic checks.
pub fn room_violations(doc: &RoomMessage, card_mode: bool) -> Vec<String> {
    let mut v = Validator::new();

    if card_mode {
        if let Some(card) = &doc.card {
            match card.style.as_deref() {
                Some(style) => v.check_one_of("card.style", Some(style), CARD_STYLES),
                None => v.check_required("card.style", false),
            }
            v.check_one_of("card.format", card.format.as_deref(), CARD_FORMATS);
            match card.title.as_deref() {
                Some(title) => v.check_max_len("card.title", Some(title), MAX_CARD_TITLE_LEN),
                None => v.check_required("card.title", false),
            }
            if let Some(thumbnail) = &card.thumbnail {
                v.check_required("card.thumbnail.url", thumbnail.url.is_some());
            }
            if let Some(activity) = &card.activity {
                v.check_required("card.activity.html", activity.html.is_some());
            }
            v.check_required("card.id", card.id.is_some());
        }
    } else {
        v.check_max_len("from", doc.from.as_deref(), MAX_FROM_LEN);
        v.check_one_of("message_format", Some(&doc.message_format), MESSAGE_FORMATS);
        v.check_one_of("color", Some(&doc.color), COLORS);
        v.check_max_len("attach_to", doc.attach_to.as_deref(), MAX_ATTACH_TO_LEN);
        v.check_body(doc.message.as_deref());
    }

    v.into_errors()
}

/// Run the ordered space-dialect checks. The space wire has no card id or
/// style; its card checks cover the staged display format and the header
/// title.
pub fn space_violations(doc: &SpaceMessage, card_mode: bool) -> Vec<String> {
    let mut v = Validator::new();

    if card_mode {
        v.check_one_of("card.format", doc.card_format.as_deref(), CARD_FORMATS);
        let title = doc
            .cards
            .as_deref()
            .and_then(|cards| cards.first())
            .and_then(|card| card.header.title.as_deref());
        match title {
            Some(title) => v.check_max_len("card.title", Some(title), MAX_CARD_TITLE_LEN),
            None => v.check_required("card.title", false),
        }
    } else {
        v.check_one_of("message_format", doc.message_format.as_deref(), MESSAGE_FORMATS);
        v.check_body(doc.text.as_deref());
    }

    v.into_errors()
}
