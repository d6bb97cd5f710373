//! Exchange Web Services directory source.
//!
//! POSTs a SOAP `FindItem` request against the well-known contacts folder
//! (shallow traversal, contacts view a-z, all properties) and extracts the
//! contact items with their phone number dictionaries.

use crate::domain::model::{RawContact, RawPhoneEntry};
use crate::domain::ports::ContactSource;
use crate::utils::error::{PhonebookError, Result};
use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct EwsConfig {
    /// Exchange host name; the endpoint is `https://<host>/EWS/Exchange.asmx`.
    /// A host carrying an explicit scheme is used as the base URL instead.
    pub host: String,
    pub user: String,
    pub password: String,
    /// Schema version announced in the SOAP header.
    pub version: String,
    /// Skip TLS certificate validation.
    pub insecure: bool,
}

pub struct EwsSource {
    client: Client,
    config: EwsConfig,
}

impl EwsSource {
    pub fn new(config: EwsConfig) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(|e| PhonebookError::Config {
                message: e.to_string(),
            })?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        if self.config.host.contains("://") {
            format!("{}/EWS/Exchange.asmx", self.config.host.trim_end_matches('/'))
        } else {
            format!("https://{}/EWS/Exchange.asmx", self.config.host)
        }
    }

    fn find_item_request(&self) -> String {
        let version = if self.config.version.is_empty() {
            "Exchange2007"
        } else {
            &self.config.version
        };

        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"
               xmlns:t="http://schemas.microsoft.com/exchange/services/2006/types"
               xmlns:m="http://schemas.microsoft.com/exchange/services/2006/messages">
  <soap:Header>
    <t:RequestServerVersion Version="{version}"/>
  </soap:Header>
  <soap:Body>
    <m:FindItem Traversal="Shallow">
      <m:ItemShape>
        <t:BaseShape>AllProperties</t:BaseShape>
      </m:ItemShape>
      <m:ContactsView InitialName="a" FinalName="z"/>
      <m:ParentFolderIds>
        <t:DistinguishedFolderId Id="contacts"/>
      </m:ParentFolderIds>
    </m:FindItem>
  </soap:Body>
</soap:Envelope>"#
        )
    }
}

#[async_trait]
impl ContactSource for EwsSource {
    async fn fetch(&self) -> Result<Vec<RawContact>> {
        let endpoint = self.endpoint();
        debug!("query ews server {endpoint}");

        let response = self
            .client
            .post(&endpoint)
            .basic_auth(&self.config.user, Some(&self.config.password))
            .header("Content-Type", "text/xml; charset=utf-8")
            .body(self.find_item_request())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PhonebookError::source_error(
                "EWS request failed",
                response.status().to_string(),
            ));
        }

        let text = response.text().await?;
        let contacts = parse_find_item_response(&text)?;
        info!("fetched {} contacts", contacts.len());
        Ok(contacts)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TextField {
    DisplayName,
    Surname,
    GivenName,
    Notes,
    EntryValue,
    ResponseCode,
    MessageText,
}

/// Walk the FindItem response and collect contact items. A response message
/// whose `ResponseClass` is not `Success` aborts with the server's code and
/// message text.
fn parse_find_item_response(response: &str) -> Result<Vec<RawContact>> {
    let mut reader = Reader::from_str(response);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut contacts = Vec::new();
    let mut current: Option<RawContact> = None;
    let mut field: Option<TextField> = None;
    let mut in_phone_numbers = false;
    let mut entry: Option<RawPhoneEntry> = None;
    let mut failed = false;
    let mut response_code = String::new();
    let mut message_text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"FindItemResponseMessage" => {
                    let class = e
                        .try_get_attribute("ResponseClass")
                        .map_err(|e| PhonebookError::Xml(e.into()))?
                        .map(|attr| attr.unescape_value().unwrap_or_default().to_string())
                        .unwrap_or_default();
                    failed = class != "Success";
                }
                b"ResponseCode" if failed => field = Some(TextField::ResponseCode),
                b"MessageText" if failed => field = Some(TextField::MessageText),
                b"Contact" => current = Some(RawContact::default()),
                b"DisplayName" if current.is_some() => field = Some(TextField::DisplayName),
                b"Surname" if current.is_some() => field = Some(TextField::Surname),
                b"GivenName" if current.is_some() => field = Some(TextField::GivenName),
                b"Notes" if current.is_some() => field = Some(TextField::Notes),
                b"PhoneNumbers" if current.is_some() => in_phone_numbers = true,
                b"Entry" if in_phone_numbers => {
                    let label = e
                        .try_get_attribute("Key")
                        .map_err(|e| PhonebookError::Xml(e.into()))?
                        .map(|attr| attr.unescape_value().unwrap_or_default().to_string())
                        .unwrap_or_default();
                    entry = Some(RawPhoneEntry::new("", label));
                    field = Some(TextField::EntryValue);
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default();
                match field {
                    Some(TextField::ResponseCode) => response_code.push_str(&text),
                    Some(TextField::MessageText) => message_text.push_str(&text),
                    Some(TextField::EntryValue) => {
                        if let Some(entry) = entry.as_mut() {
                            entry.raw_value.push_str(&text);
                        }
                    }
                    Some(target) => {
                        if let Some(contact) = current.as_mut() {
                            let slot = match target {
                                TextField::DisplayName => &mut contact.display_name,
                                TextField::Surname => &mut contact.surname,
                                TextField::GivenName => &mut contact.given_name,
                                TextField::Notes => &mut contact.notes,
                                _ => unreachable!("handled above"),
                            };
                            slot.push_str(&text);
                        }
                    }
                    None => {}
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"FindItemResponseMessage" if failed => {
                    return Err(PhonebookError::source_error(
                        response_code.trim(),
                        message_text.trim(),
                    ));
                }
                b"Contact" => {
                    if let Some(contact) = current.take() {
                        contacts.push(contact);
                    }
                }
                b"PhoneNumbers" => in_phone_numbers = false,
                b"Entry" => {
                    if let (Some(done), Some(contact)) = (entry.take(), current.as_mut()) {
                        contact.phone_entries.push(done);
                    }
                    field = None;
                }
                b"DisplayName" | b"Surname" | b"GivenName" | b"Notes" | b"ResponseCode"
                | b"MessageText" => field = None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(PhonebookError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(contacts)
}
