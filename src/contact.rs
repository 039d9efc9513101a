// Browser side of the contact form: the DOM view and the submit listener.

use std::rc::Rc;

use web_sys::{Document, HtmlButtonElement, HtmlElement, HtmlInputElement, Window};

use crate::config::{Selectors, SiteConfig};
use crate::dom;
use crate::error::SiteError;
use crate::form::{ClientContext, FormView, Submitter};
use crate::net::{Fetcher, IpApiLookup, WebhookClient};

pub struct DomFormView {
    window: Window,
    document: Document,
    email_input: HtmlInputElement,
    submit_button: HtmlButtonElement,
    success_message: Option<HtmlElement>,
}

impl DomFormView {
    /// Finds the email input and submit button inside `form`. The success
    /// message is optional and looked up page wide.
    pub fn new(
        window: &Window,
        document: &Document,
        form: &HtmlElement,
        selectors: &Selectors,
    ) -> Result<DomFormView, SiteError> {
        Ok(DomFormView {
            window: window.clone(),
            document: document.clone(),
            email_input: dom::require_as(form, selectors.email_input)?,
            submit_button: dom::require_as(form, selectors.submit_button)?,
            success_message: dom::query(document, selectors.success_message)?,
        })
    }

    fn set_success_display(message: &HtmlElement, display: &str) {
        if let Err(err) = dom::set_style(message, "display", display) {
            log::warn!("success message: {}", err);
        }
    }
}

impl FormView for DomFormView {
    fn email(&self) -> String {
        self.email_input.value()
    }

    fn client_context(&self) -> ClientContext {
        ClientContext {
            timestamp: String::from(js_sys::Date::new_0().to_iso_string()),
            user_agent: self.window.navigator().user_agent().unwrap_or_default(),
            referrer: self.document.referrer(),
            url: self.window.location().href().unwrap_or_default(),
        }
    }

    fn alert(&self, message: &str) {
        if let Err(err) = self.window.alert_with_message(message) {
            log::warn!("alert failed: {:?}", err);
        }
    }

    fn set_submit(&self, enabled: bool, label: &str) {
        self.submit_button.set_text_content(Some(label));
        self.submit_button.set_disabled(!enabled);
    }

    fn clear_email(&self) {
        self.email_input.set_value("");
    }

    fn show_success(&self) {
        if let Some(message) = &self.success_message {
            DomFormView::set_success_display(message, "block");
        }
    }

    fn hide_success_after(&self, delay_ms: u32) {
        let message = match &self.success_message {
            Some(message) => message.clone(),
            None => return,
        };
        let scheduled = dom::set_timeout(&self.window, delay_ms, move || {
            DomFormView::set_success_display(&message, "none");
        });
        if let Err(err) = scheduled {
            log::warn!("could not schedule success hide: {}", err);
        }
    }
}

pub type ContactSubmitter = Submitter<IpApiLookup, WebhookClient, DomFormView>;

pub fn install(window: &Window, document: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    let selectors = &config.selectors;
    let form = match dom::query(document, selectors.contact_form)? {
        Some(form) => form,
        None => {
            log::warn!("no {} on page", selectors.contact_form);
            return Ok(());
        }
    };

    let view = DomFormView::new(window, document, &form, selectors)?;
    let fetcher = Fetcher::new(window.clone(), config.form.request_timeout_ms);
    let submitter: Rc<ContactSubmitter> = Rc::new(Submitter::new(
        IpApiLookup::new(fetcher.clone(), config.form.geolocation_url),
        WebhookClient::new(fetcher, config.form.webhook_url),
        view,
        config.form.clone(),
    ));

    dom::listen(&form, "submit", move |event| {
        event.prevent_default();
        let submitter = submitter.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = submitter.submit().await;
            log::info!("contact form: {:?}", outcome);
        });
    })
}
