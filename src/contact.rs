//! Contact form: compose a web-mail draft from the form fields.
//!
//! There is no backend. Submitting builds the message text, points the
//! visitor at a pre-filled compose URL, then tries to put the same text on
//! the clipboard so it can be pasted if the draft loses it. The clipboard
//! result only changes the notice; the compose URL is produced either way.
//!
//! ```text
//! 【IGU 聯絡表單】
//! 稱呼：{name}
//! Email：{email}
//! 類型：{type}
//!
//! 內容：
//! {message}
//! ```

use crate::clipboard::Clipboard;
use crate::config::ContactConfig;
use crate::dom::{NodeId, Page};
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("invalid compose URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Raw form values. Empty strings are replaced with placeholders when
/// composing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    pub subject: String,
    pub body: String,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactNotice {
    /// Body is on the clipboard.
    Copied(String),
    /// Clipboard write failed; the visitor has to copy by hand.
    ManualCopy(String),
}

impl ContactNotice {
    pub fn text(&self) -> &str {
        match self {
            ContactNotice::Copied(t) | ContactNotice::ManualCopy(t) => t,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub message: ComposedMessage,
    pub notice: ContactNotice,
}

fn or_blank<'a>(value: &'a str, blank: &'a str) -> &'a str {
    if value.is_empty() { blank } else { value }
}

pub fn compose_body(fields: &ContactFields, config: &ContactConfig) -> String {
    let name = or_blank(&fields.name, &config.blank);
    let email = or_blank(&fields.email, &config.blank);
    let kind = or_blank(&fields.kind, &config.default_type);
    let message = or_blank(&fields.message, &config.blank);
    format!(
        "{}\n稱呼：{name}\nEmail：{email}\n類型：{kind}\n\n內容：\n{message}\n",
        config.heading
    )
}

pub fn compose_subject(fields: &ContactFields, config: &ContactConfig) -> String {
    let name = or_blank(&fields.name, &config.blank);
    let kind = or_blank(&fields.kind, &config.default_type);
    format!("[{}] {kind} - {name}", config.subject_prefix)
}

pub fn compose(fields: &ContactFields, config: &ContactConfig) -> Result<ComposedMessage, ContactError> {
    let subject = compose_subject(fields, config);
    let body = compose_body(fields, config);
    let url = Url::parse_with_params(
        &config.compose_url,
        &[
            ("view", "cm"),
            ("fs", "1"),
            ("to", config.recipient.as_str()),
            ("su", subject.as_str()),
            ("body", body.as_str()),
        ],
    )?;
    Ok(ComposedMessage { subject, body, url })
}

/// Compose, then try the clipboard.
pub fn submit(
    fields: &ContactFields,
    config: &ContactConfig,
    clipboard: &mut dyn Clipboard,
) -> Result<Submission, ContactError> {
    let message = compose(fields, config)?;
    let notice = match clipboard.write_text(&message.body) {
        Ok(()) => ContactNotice::Copied(config.copied_notice.clone()),
        Err(e) => {
            tracing::warn!(error = %e, "contact body not copied");
            ContactNotice::ManualCopy(config.manual_copy_notice.clone())
        }
    };
    tracing::debug!(url = %message.url, "contact draft composed");
    Ok(Submission { message, notice })
}

/// The `#contactForm` element and its field inputs.
#[derive(Debug, Clone)]
pub struct ContactForm {
    form: NodeId,
    name: Option<NodeId>,
    email: Option<NodeId>,
    kind: Option<NodeId>,
    message: Option<NodeId>,
}

impl ContactForm {
    pub fn init(page: &Page) -> Option<Self> {
        let form = page.by_id("contactForm")?;
        Some(Self {
            form,
            name: page.by_id("name"),
            email: page.by_id("email"),
            kind: page.by_id("type"),
            message: page.by_id("message"),
        })
    }

    pub fn form(&self) -> NodeId {
        self.form
    }

    /// Current field values; a field missing from the page reads as empty.
    pub fn fields(&self, page: &Page) -> ContactFields {
        let value = |node: Option<NodeId>| {
            node.map(|n| {
                let el = page.get(n);
                el.attr("value").map(String::from).unwrap_or_else(|| el.text.clone())
            })
            .unwrap_or_default()
        };
        ContactFields {
            name: value(self.name),
            email: value(self.email),
            kind: value(self.kind),
            message: value(self.message),
        }
    }

    pub fn submit(
        &self,
        page: &Page,
        config: &ContactConfig,
        clipboard: &mut dyn Clipboard,
    ) -> Result<Submission, ContactError> {
        submit(&self.fields(page), config, clipboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::dom::Element;

    fn fields() -> ContactFields {
        ContactFields {
            name: "Mio".into(),
            email: "mio@example.com".into(),
            kind: "委託".into(),
            message: "Hello & thanks".into(),
        }
    }

    #[test]
    fn body_layout() {
        let body = compose_body(&fields(), &ContactConfig::default());
        assert_eq!(
            body,
            "【IGU 聯絡表單】\n稱呼：Mio\nEmail：mio@example.com\n類型：委託\n\n內容：\nHello & thanks\n"
        );
    }

    #[test]
    fn blank_fields_get_placeholders() {
        let config = ContactConfig::default();
        let body = compose_body(&ContactFields::default(), &config);
        assert!(body.contains("稱呼：（未填）"));
        assert!(body.contains("類型：一般問題"));
        assert!(body.ends_with("內容：\n（未填）\n"));
        assert_eq!(
            compose_subject(&ContactFields::default(), &config),
            "[IGU 委託/詢問] 一般問題 - （未填）"
        );
    }

    #[test]
    fn url_carries_encoded_params() {
        let msg = compose(&fields(), &ContactConfig::default()).unwrap();
        assert_eq!(msg.url.host_str(), Some("mail.google.com"));
        let params: Vec<(String, String)> = msg
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(params[0], ("view".into(), "cm".into()));
        assert_eq!(params[1], ("fs".into(), "1".into()));
        assert_eq!(params[2], ("to".into(), "hello@example.com".into()));
        assert_eq!(params[3].1, "[IGU 委託/詢問] 委託 - Mio");
        assert_eq!(params[4].1, msg.body);
        assert!(!msg.url.as_str().contains("Hello & thanks"));
    }

    #[test]
    fn submit_reports_clipboard_outcome() {
        let config = ContactConfig::default();
        let mut clip = MemoryClipboard::new();
        let ok = submit(&fields(), &config, &mut clip).unwrap();
        assert_eq!(ok.notice, ContactNotice::Copied(config.copied_notice.clone()));
        assert_eq!(clip.contents(), Some(ok.message.body.as_str()));

        let mut denied = MemoryClipboard::denied();
        let manual = submit(&fields(), &config, &mut denied).unwrap();
        assert_eq!(manual.notice.text(), config.manual_copy_notice);
        assert_eq!(manual.message, ok.message);
    }

    #[test]
    fn bad_compose_url_is_an_error() {
        let config = ContactConfig {
            compose_url: "not a url".into(),
            ..ContactConfig::default()
        };
        assert!(compose(&fields(), &config).is_err());
    }

    #[test]
    fn form_reads_page_fields() {
        let mut page = Page::new();
        let body = page.body();
        let form = page.append(body, Element::new("form").with_id("contactForm"));
        page.append(form, Element::new("input").with_id("name").with_attr("value", "Mio"));
        page.append(form, Element::new("textarea").with_id("message").with_text("hi"));
        let contact = ContactForm::init(&page).unwrap();
        let f = contact.fields(&page);
        assert_eq!(f.name, "Mio");
        assert_eq!(f.message, "hi");
        assert_eq!(f.email, "");
    }
}
