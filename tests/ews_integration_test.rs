use httpmock::prelude::*;
use phonebook_cli::adapters::ews::{EwsConfig, EwsSource};
use phonebook_cli::app::commands::from_ews;
use phonebook_cli::domain::ports::ContactSource;
use phonebook_cli::normalize::phone::DEFAULT_REGION;

const FIND_ITEM_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Body>
    <m:FindItemResponse xmlns:m="http://schemas.microsoft.com/exchange/services/2006/messages"
                        xmlns:t="http://schemas.microsoft.com/exchange/services/2006/types">
      <m:ResponseMessages>
        <m:FindItemResponseMessage ResponseClass="Success">
          <m:ResponseCode>NoError</m:ResponseCode>
          <m:RootFolder TotalItemsInView="1" IncludesLastItemInRange="true">
            <t:Items>
              <t:Contact>
                <t:DisplayName>John Doe</t:DisplayName>
                <t:GivenName>John</t:GivenName>
                <t:Surname>Doe</t:Surname>
                <t:PhoneNumbers>
                  <t:Entry Key="HomePhone">0123456789</t:Entry>
                  <t:Entry Key="MobilePhone">0151234567</t:Entry>
                </t:PhoneNumbers>
              </t:Contact>
            </t:Items>
          </m:RootFolder>
        </m:FindItemResponseMessage>
      </m:ResponseMessages>
    </m:FindItemResponse>
  </s:Body>
</s:Envelope>"#;

fn source_for(server: &MockServer) -> EwsSource {
    EwsSource::new(EwsConfig {
        host: server.base_url(),
        user: "alice".into(),
        password: "secret".into(),
        version: "Exchange2007".into(),
        insecure: false,
    })
    .unwrap()
}

#[tokio::test]
async fn exports_the_contacts_folder_as_vcards() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/EWS/Exchange.asmx")
            .body_contains("FindItem");
        then.status(200)
            .header("Content-Type", "text/xml; charset=utf-8")
            .body(FIND_ITEM_RESPONSE);
    });

    let source = source_for(&server);
    let mut out = Vec::new();
    from_ews::run(&source, DEFAULT_REGION, &mut out).await.unwrap();

    mock.assert();
    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("FN:John Doe"));
    assert!(output.contains("N:Doe;John;;;"));
    assert!(output.contains("TEL;TYPE=home:+49123456789"));
    assert!(output.contains("TEL;TYPE=cell:+49151234567"));
}

#[tokio::test]
async fn server_error_response_aborts_the_export() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/EWS/Exchange.asmx");
        then.status(200)
            .header("Content-Type", "text/xml; charset=utf-8")
            .body(
                r#"<Envelope><Body><FindItemResponse><ResponseMessages>
                     <FindItemResponseMessage ResponseClass="Error">
                       <MessageText>Access is denied.</MessageText>
                       <ResponseCode>ErrorAccessDenied</ResponseCode>
                     </FindItemResponseMessage>
                   </ResponseMessages></FindItemResponse></Body></Envelope>"#,
            );
    });

    let source = source_for(&server);
    let err = source.fetch().await.unwrap_err();
    assert!(err.to_string().contains("ErrorAccessDenied"));
    assert_eq!(err.exit_code(), 1);
}
