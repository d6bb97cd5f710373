//! CardDAV directory source.
//!
//! Issues a single `REPORT` addressbook-query with basic auth and pulls the
//! raw vCard texts out of the multistatus `address-data` elements.

use crate::domain::ports::CardSource;
use crate::utils::error::{PhonebookError, Result};
use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use tracing::{debug, info};

const ADDRESSBOOK_QUERY: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<D:addressbook-query xmlns:D="DAV:">
    <D:prop>
        <D:getetag/>
        <D:address-data/>
    </D:prop>
</D:addressbook-query>"#;

#[derive(Debug, Clone, Default)]
pub struct CardDavConfig {
    /// Server query URL including the addressbook path.
    pub server_url: String,
    pub user: String,
    pub password: String,
}

pub struct CardDavSource {
    client: Client,
    config: CardDavConfig,
}

impl CardDavSource {
    pub fn new(config: CardDavConfig) -> Result<Self> {
        let client = Client::builder().build().map_err(|e| PhonebookError::Config {
            message: e.to_string(),
        })?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl CardSource for CardDavSource {
    async fn fetch_cards(&self) -> Result<Vec<String>> {
        debug!("query dav server {}", self.config.server_url);

        let response = self
            .client
            .request(
                reqwest::Method::from_bytes(b"REPORT").expect("static method"),
                &self.config.server_url,
            )
            .basic_auth(&self.config.user, Some(&self.config.password))
            .header("Content-Type", "application/xml; charset=utf-8")
            .header("Depth", "1")
            .body(ADDRESSBOOK_QUERY)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PhonebookError::source_error(
                "CardDAV request failed",
                response.status().to_string(),
            ));
        }

        let text = response.text().await?;
        let cards = parse_multistatus(&text)?;
        info!("fetched {} cards", cards.len());
        Ok(cards)
    }
}

/// Collect the text content of every `address-data` element. Namespace
/// prefixes vary between servers, so elements are matched by local name.
fn parse_multistatus(response: &str) -> Result<Vec<String>> {
    let mut cards = Vec::new();
    let mut reader = Reader::from_str(response);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut in_address_data = false;
    let mut current = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"address-data" => {
                in_address_data = true;
                current.clear();
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"address-data" => {
                in_address_data = false;
                if !current.trim().is_empty() {
                    cards.push(current.clone());
                }
            }
            Ok(Event::Text(ref e)) if in_address_data => {
                current.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(PhonebookError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(cards)
}
