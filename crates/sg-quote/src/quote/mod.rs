//! Quote request formatting and dispatch.
//!
//! A request flows method check → configuration check → validation →
//! rendering → dispatch. [`router::quote_router`] is the HTTP surface and
//! [`service::QuoteService`] carries the rest.

pub mod address;
pub mod domain;
pub mod mailer;
pub mod maps;
pub mod normalize;
pub mod render;
pub mod router;
pub mod service;

pub use address::{format_address_line, resolve_display_address, PLACEHOLDER};
pub use domain::{Address, Coordinate, Geo, QuoteSubmission};
pub use mailer::{MailError, Mailer, OutboundEmail, SendGridMailer};
pub use maps::{delivery_map_link, maps_link_from_address, maps_link_from_geo, pickup_map_link};
pub use normalize::{
    normalize_postal_code, resolve_delivery_postal_code, resolve_geo, resolve_pickup_postal_code,
    validate, ValidatedQuote,
};
pub use render::{
    build_html, build_plain_text, build_subject, escape_html, render, HtmlStyle, MapLinks,
    RenderOptions, RenderedNotification,
};
pub use router::{quote_router, QUOTE_PATH};
pub use service::{parse_submission, QuoteError, QuoteReceipt, QuoteService, RequestOrigin};
