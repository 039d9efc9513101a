// fetch() based collaborators for the contact form. Every request is bounded
// by a timeout that aborts it through an AbortController.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Headers, Request, RequestInit, Response, Window};

use crate::dom::Timeout;
use crate::error::{describe, SiteError};
use crate::form::{GeoInfo, IpApiResponse, Location, LocationLookup, Webhook};

#[derive(Clone)]
pub struct Fetcher {
    window: Window,
    timeout_ms: u32,
}

impl Fetcher {
    pub fn new(window: Window, timeout_ms: u32) -> Fetcher {
        Fetcher { window, timeout_ms }
    }

    pub async fn fetch(&self, url: &str, init: RequestInit) -> Result<Response, SiteError> {
        let controller = AbortController::new()?;
        let signal = controller.signal();
        init.set_signal(Some(&signal));
        let request = Request::new_with_str_and_init(url, &init)?;

        let timer = Timeout::schedule(&self.window, self.timeout_ms, move || controller.abort())?;
        let result = JsFuture::from(self.window.fetch_with_request(&request)).await;
        timer.cancel();

        let value = result.map_err(|err| {
            if signal.aborted() {
                SiteError::Timeout(self.timeout_ms)
            } else {
                SiteError::Network(describe(&err))
            }
        })?;
        value
            .dyn_into::<Response>()
            .map_err(|_| SiteError::Js("fetch did not resolve to a Response".into()))
    }

    pub async fn text(&self, response: &Response) -> Result<String, SiteError> {
        let text = JsFuture::from(response.text()?).await?;
        text.as_string()
            .ok_or_else(|| SiteError::Js("response body is not text".into()))
    }
}

pub struct IpApiLookup {
    fetcher: Fetcher,
    url: &'static str,
}

impl IpApiLookup {
    pub fn new(fetcher: Fetcher, url: &'static str) -> IpApiLookup {
        IpApiLookup { fetcher, url }
    }
}

impl LocationLookup for IpApiLookup {
    async fn lookup(&self) -> Result<Location, SiteError> {
        let init = RequestInit::new();
        init.set_method("GET");
        let response = self.fetcher.fetch(self.url, init).await?;
        if !response.ok() {
            return Err(SiteError::Http(response.status()));
        }
        let body = self.fetcher.text(&response).await?;
        let raw: IpApiResponse = serde_json::from_str(&body)?;
        Ok(Location::Known(GeoInfo::from(raw)))
    }
}

pub struct WebhookClient {
    fetcher: Fetcher,
    url: &'static str,
}

impl WebhookClient {
    pub fn new(fetcher: Fetcher, url: &'static str) -> WebhookClient {
        WebhookClient { fetcher, url }
    }
}

impl Webhook for WebhookClient {
    async fn post(&self, body: String) -> Result<u16, SiteError> {
        let headers = Headers::new()?;
        headers.set("Content-Type", "application/json")?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(&body));

        let response = self.fetcher.fetch(self.url, init).await?;
        Ok(response.status())
    }
}
