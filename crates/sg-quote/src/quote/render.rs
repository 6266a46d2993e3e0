use serde::Serialize;

use super::address::PLACEHOLDER;
use super::domain::Geo;
use super::maps::{delivery_map_link, pickup_map_link};
use super::normalize::ValidatedQuote;

const BRAND: &str = "SG Transportes";
const PRIMARY: &str = "#0d6efd";
const DELIVERY_ACCENT: &str = "#0ea5e9";

/// Visual treatment of the HTML body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HtmlStyle {
    /// Branded card layout with header bar, logo and footer.
    #[default]
    Branded,
    /// Bare headings and tables.
    Plain,
}

impl HtmlStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "branded" | "rich" => Some(Self::Branded),
            "plain" | "simple" => Some(Self::Plain),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub style: HtmlStyle,
    /// Image shown in the branded header; the brand name is used without one.
    pub logo_src: Option<String>,
    /// Year printed in the copyright footer.
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedNotification {
    pub subject: String,
    pub plain_text_body: String,
    pub html_body: String,
}

/// Map links derived for one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapLinks {
    pub pickup: String,
    pub delivery: Option<String>,
}

impl MapLinks {
    pub fn for_quote(quote: &ValidatedQuote) -> Self {
        let submission = &quote.submission;
        Self {
            pickup: pickup_map_link(
                &submission.pickup,
                &quote.pickup_postal_code,
                quote.geo.as_ref(),
            ),
            delivery: delivery_map_link(
                &submission.delivery,
                &quote.delivery_postal_code,
                &quote.delivery_display,
            ),
        }
    }
}

pub fn render(quote: &ValidatedQuote, options: &RenderOptions) -> RenderedNotification {
    let links = MapLinks::for_quote(quote);
    RenderedNotification {
        subject: build_subject(quote),
        plain_text_body: build_plain_text(quote, &links),
        html_body: build_html(quote, &links, options),
    }
}

pub fn build_subject(quote: &ValidatedQuote) -> String {
    let mut subject = format!(
        "Nova cotação — {} — {}",
        quote.requester_name, quote.pickup_postal_code
    );
    if let Some(delivery) = quote.delivery_postal_code() {
        subject.push_str(" ➜ ");
        subject.push_str(delivery);
    }
    if let Some(code) = quote.code() {
        subject.push_str(&format!(" [{code}]"));
    }
    subject
}

pub fn build_plain_text(quote: &ValidatedQuote, links: &MapLinks) -> String {
    let submission = &quote.submission;
    let geo = quote
        .geo
        .as_ref()
        .map(|geo| geo_summary(geo, " ", |value| value.to_string()))
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let delivery_map = links
        .delivery
        .as_ref()
        .map(|link| format!("Mapa: {link}\n"))
        .unwrap_or_default();

    let text = format!(
        "Nova solicitação de cotação ({BRAND})\n\
         \n\
         Código: {code}\n\
         \n\
         [Solicitante]\n\
         Nome: {name}\n\
         E-mail: {email}\n\
         Telefone: {phone}\n\
         \n\
         [Retirada]\n\
         CEP: {pickup_cep}\n\
         Endereço: {pickup_address}\n\
         Localização consentida: {consent}\n\
         Geo: {geo}\n\
         Mapa: {pickup_map}\n\
         \n\
         [Entrega]\n\
         CEP: {delivery_cep}\n\
         Endereço: {delivery_address}\n\
         {delivery_map}\
         \n\
         [Detalhes]\n\
         {details}\n",
        code = or_placeholder(quote.code()),
        name = quote.requester_name,
        email = quote.requester_email,
        phone = or_placeholder(submission.requester_phone.as_deref()),
        pickup_cep = quote.pickup_postal_code,
        pickup_address = quote.pickup_display,
        consent = if submission.location_consent_given { "Sim" } else { "Não" },
        pickup_map = links.pickup,
        delivery_cep = or_placeholder(quote.delivery_postal_code()),
        delivery_address = quote.delivery_display,
        details = or_placeholder(submission.details.as_deref()),
    );

    text.trim().to_string()
}

pub fn build_html(quote: &ValidatedQuote, links: &MapLinks, options: &RenderOptions) -> String {
    let fields = HtmlFields::new(quote, links);
    match options.style {
        HtmlStyle::Branded => branded_html(&fields, options),
        HtmlStyle::Plain => plain_html(&fields),
    }
}

/// Escapes text for element content and double-quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn or_placeholder(value: Option<&str>) -> &str {
    value.unwrap_or(PLACEHOLDER)
}

fn geo_summary(geo: &Geo, separator: &str, encode: impl Fn(&str) -> String) -> String {
    format!(
        "lat={lat}{separator}lng={lng}{separator}(±{accuracy}m)",
        lat = encode(&geo.lat.to_string()),
        lng = encode(&geo.lng.to_string()),
        accuracy = geo.accuracy_whole_meters(),
    )
}

/// Every value already escaped for embedding in markup.
struct HtmlFields {
    code: String,
    name: String,
    email: String,
    phone: String,
    pickup_cep: String,
    pickup_address: String,
    geo: String,
    pickup_map: String,
    delivery_cep: String,
    delivery_address: String,
    delivery_map: Option<String>,
    details: String,
}

impl HtmlFields {
    fn new(quote: &ValidatedQuote, links: &MapLinks) -> Self {
        let submission = &quote.submission;
        Self {
            code: escape_html(or_placeholder(quote.code())),
            name: escape_html(&quote.requester_name),
            email: escape_html(&quote.requester_email),
            phone: escape_html(or_placeholder(submission.requester_phone.as_deref())),
            pickup_cep: escape_html(&quote.pickup_postal_code),
            pickup_address: escape_html(&quote.pickup_display),
            geo: quote
                .geo
                .as_ref()
                .map(|geo| geo_summary(geo, " &nbsp; ", escape_html))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            pickup_map: escape_html(&links.pickup),
            delivery_cep: escape_html(or_placeholder(quote.delivery_postal_code())),
            delivery_address: escape_html(&quote.delivery_display),
            delivery_map: links.delivery.as_deref().map(escape_html),
            details: escape_html(or_placeholder(submission.details.as_deref())),
        }
    }
}

const SECTION_LABEL: &str = "margin:22px 0 8px;font-size:13px;color:#6b7280;text-transform:uppercase;letter-spacing:.5px;";
const TABLE: &str = "border:1px solid #eee;border-radius:8px;";
const LABEL_CELL: &str = "padding:10px 12px;width:160px;background:#fafafa;color:#475467;font-size:13px;";
const VALUE_CELL: &str = "padding:10px 12px;font-size:14px;color:#111;";

fn branded_rows(rows: &[(&str, &str)]) -> String {
    let mut table = format!(
        "<table role=\"presentation\" cellpadding=\"0\" cellspacing=\"0\" width=\"100%\" style=\"{TABLE}\">\n"
    );
    for (label, value) in rows {
        table.push_str(&format!(
            "  <tr>\n    <td style=\"{LABEL_CELL}\">{label}</td>\n    <td style=\"{VALUE_CELL}\">{value}</td>\n  </tr>\n"
        ));
    }
    table.push_str("</table>\n");
    table
}

fn map_button(href: &str, label: &str, color: &str) -> String {
    format!(
        "<div style=\"margin:10px 0 0;\">\n  <a href=\"{href}\" target=\"_blank\" style=\"display:inline-block;background:{color};color:#fff;text-decoration:none;padding:10px 14px;border-radius:6px;font-weight:700;font-size:14px;\">{label}</a>\n</div>\n"
    )
}

fn branded_html(fields: &HtmlFields, options: &RenderOptions) -> String {
    let logo = match &options.logo_src {
        Some(src) => format!(
            "<img src=\"{src}\" width=\"36\" height=\"36\" alt=\"{BRAND}\" style=\"display:inline-block;border:0;vertical-align:middle;border-radius:6px;background:#ffffff;padding:4px;\">",
            src = escape_html(src)
        ),
        None => format!("<span style=\"display:inline-block;font-weight:700;\">{BRAND}</span>"),
    };

    let email_link = format!(
        "<a href=\"mailto:{email}\" style=\"color:{PRIMARY};text-decoration:none;\">{email}</a>",
        email = fields.email
    );
    let requester = branded_rows(&[
        ("Nome", fields.name.as_str()),
        ("E-mail", email_link.as_str()),
        ("Telefone", fields.phone.as_str()),
    ]);
    let pickup = branded_rows(&[
        ("CEP", fields.pickup_cep.as_str()),
        ("Endereço", fields.pickup_address.as_str()),
        ("Localização", fields.geo.as_str()),
    ]);
    let delivery = branded_rows(&[
        ("CEP", fields.delivery_cep.as_str()),
        ("Endereço", fields.delivery_address.as_str()),
    ]);
    let pickup_button = map_button(&fields.pickup_map, "Abrir retirada no mapa", PRIMARY);
    let delivery_button = fields
        .delivery_map
        .as_deref()
        .map(|href| map_button(href, "Abrir entrega no mapa", DELIVERY_ACCENT))
        .unwrap_or_default();

    format!(
        r#"<div style="display:none;max-height:0;overflow:hidden;opacity:0;color:transparent;">Nova cotação — {BRAND}. Código: {code}.</div>
<table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="background:#f6f9fc;padding:24px 0;">
<tr><td align="center">
<table role="presentation" width="600" cellpadding="0" cellspacing="0" style="background:#ffffff;border:1px solid #eaeaea;border-radius:12px;overflow:hidden;font-family:Arial,Helvetica,sans-serif;color:#111;">
<tr><td style="background:{PRIMARY};padding:18px 24px;color:#ffffff;">
<table width="100%" role="presentation" cellpadding="0" cellspacing="0"><tr>
<td style="vertical-align:middle;">{logo}<span style="font-size:18px;font-weight:700;vertical-align:middle;margin-left:10px;display:inline-block;">{BRAND}</span></td>
<td align="right" style="vertical-align:middle;"><span style="display:inline-block;background:rgba(255,255,255,.18);padding:6px 10px;border-radius:999px;font-size:12px;">Nova cotação</span></td>
</tr></table>
</td></tr>
<tr><td style="padding:24px;">
<div style="margin:0 0 14px;font-size:13px;color:#6b7280;text-transform:uppercase;letter-spacing:.5px;">Código da cotação</div>
<div style="background:#f3f6ff;border:1px dashed {PRIMARY};padding:12px 16px;border-radius:8px;font-family:Consolas,Menlo,monospace;font-size:18px;font-weight:700;color:#101828;display:inline-block;">{code}</div>
<div style="{SECTION_LABEL}">Solicitante</div>
{requester}<div style="{SECTION_LABEL}">Retirada (origem)</div>
{pickup}{pickup_button}<div style="{SECTION_LABEL}">Entrega (destino)</div>
{delivery}{delivery_button}<div style="{SECTION_LABEL}">Detalhes</div>
<div style="background:#f8fafc;border:1px solid #eee;border-radius:8px;padding:12px 14px;font-size:14px;white-space:pre-wrap;">{details}</div>
<div style="margin-top:18px;font-size:12px;color:#6b7280;">Envie este código de cotação ao anunciante: <strong>{code}</strong>.</div>
</td></tr>
<tr><td style="background:#fafafa;border-top:1px solid #eee;padding:14px 24px;color:#6b7280;font-size:12px;">
Este e-mail foi gerado por um endpoint protegido. Dados utilizados exclusivamente para cotação (LGPD).<br/>
© {year} {BRAND}. Todos os direitos reservados.
</td></tr>
</table>
</td></tr>
</table>
"#,
        code = fields.code,
        details = fields.details,
        year = options.year,
    )
}

fn plain_rows(rows: &[(&str, &str)]) -> String {
    let mut table = String::from("<table cellpadding=\"4\">\n");
    for (label, value) in rows {
        table.push_str(&format!("  <tr><td><b>{label}</b></td><td>{value}</td></tr>\n"));
    }
    table.push_str("</table>\n");
    table
}

fn plain_html(fields: &HtmlFields) -> String {
    let mut html = format!(
        "<h2>Nova solicitação de cotação ({BRAND})</h2>\n<p><b>Código:</b> {}</p>\n",
        fields.code
    );

    html.push_str("<h3>Solicitante</h3>\n");
    html.push_str(&plain_rows(&[
        ("Nome", fields.name.as_str()),
        ("E-mail", fields.email.as_str()),
        ("Telefone", fields.phone.as_str()),
    ]));

    html.push_str("<h3>Retirada</h3>\n");
    html.push_str(&plain_rows(&[
        ("CEP", fields.pickup_cep.as_str()),
        ("Endereço", fields.pickup_address.as_str()),
        ("Geo", fields.geo.as_str()),
    ]));
    html.push_str(&format!(
        "<p><a href=\"{}\" target=\"_blank\">Abrir retirada no mapa</a></p>\n",
        fields.pickup_map
    ));

    html.push_str("<h3>Entrega</h3>\n");
    html.push_str(&plain_rows(&[
        ("CEP", fields.delivery_cep.as_str()),
        ("Endereço", fields.delivery_address.as_str()),
    ]));
    if let Some(href) = &fields.delivery_map {
        html.push_str(&format!(
            "<p><a href=\"{href}\" target=\"_blank\">Abrir entrega no mapa</a></p>\n"
        ));
    }

    html.push_str(&format!(
        "<h3>Detalhes</h3>\n<pre style=\"white-space:pre-wrap;font-family:inherit;\">{}</pre>\n",
        fields.details
    ));
    html
}
