// Every tunable of the page in one place. Nothing is loaded at runtime; the
// defaults below are what the site ships with.

use crate::counter::CounterTiming;
use crate::particle::Attraction;

#[derive(Clone, Debug)]
pub struct Selectors {
    pub header: &'static str,
    pub hero: &'static str,
    pub nav_links: &'static str,
    pub sections: &'static str,
    pub anchors: &'static str,
    pub nav_container: &'static str,
    pub nav_menu: &'static str,
    pub contact_form: &'static str,
    pub email_input: &'static str,
    pub submit_button: &'static str,
    pub success_message: &'static str,
    pub stats_grid: &'static str,
    pub counters: &'static str,
    pub scroll_reveal: &'static str,
    pub observed_reveal: &'static str,
}

impl Default for Selectors {
    fn default() -> Self {
        Selectors {
            header: ".header",
            hero: ".hero",
            nav_links: ".nav-link",
            sections: "section[id]",
            anchors: "a[href^=\"#\"]",
            nav_container: ".nav-container",
            nav_menu: ".nav-menu",
            contact_form: ".contact-form",
            email_input: ".email-input",
            submit_button: ".submit-btn",
            success_message: ".success-message",
            stats_grid: ".stats-grid",
            counters: "[data-count]",
            scroll_reveal: ".feature, .news-item",
            observed_reveal: ".feature, .news-item, .solution-type, .showcase-item",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeroMotion {
    pub fade_distance: f64,
    // Vertical translation per pixel scrolled
    pub parallax: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RevealSettings {
    pub scroll_offset: f64,
    pub threshold: f64,
    pub root_margin: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormSettings {
    pub geolocation_url: &'static str,
    pub webhook_url: &'static str,
    pub email_key: &'static str,
    pub request_timeout_ms: u32,
    pub success_hide_ms: u32,
    pub idle_label: &'static str,
    pub busy_label: &'static str,
    pub invalid_email_alert: &'static str,
    pub failure_alert: &'static str,
}

impl Default for FormSettings {
    fn default() -> Self {
        FormSettings {
            geolocation_url: "https://ipapi.co/json/",
            webhook_url: "https://n8n.edbmotte.com/webhook/14760557-5bcd-4cfe-8cdc-5d107bae4062",
            email_key: "x9Jt4Qb7L2vFp0MzWcR1nKd8HsE3yUgT",
            request_timeout_ms: 10_000,
            success_hide_ms: 3_000,
            idle_label: "Notify me",
            busy_label: "Submitting...",
            invalid_email_alert: "Please enter a valid email address",
            failure_alert: "There was an error submitting your email. Please try again.",
        }
    }
}

#[derive(Clone, Debug)]
pub struct SiteConfig {
    pub particle_count: usize,
    pub attraction: Attraction,
    pub glow_blur: f64,
    pub header_threshold: f64,
    pub hero: HeroMotion,
    pub nav_band: f64,
    pub reveal: RevealSettings,
    pub counter: CounterTiming,
    pub counter_trigger: f64,
    pub highlight_fade_ms: u32,
    pub form: FormSettings,
    pub selectors: Selectors,
    // Wraps each background frame in console.time/timeEnd; on in debug builds
    pub debug_timing: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            particle_count: 50,
            attraction: Attraction::default(),
            glow_blur: 10.0,
            header_threshold: 100.0,
            hero: HeroMotion {
                fade_distance: 500.0,
                parallax: 0.5,
            },
            nav_band: 100.0,
            reveal: RevealSettings {
                scroll_offset: 150.0,
                threshold: 0.1,
                root_margin: "0px 0px -50px 0px",
            },
            counter: CounterTiming::default(),
            counter_trigger: 0.5,
            highlight_fade_ms: 500,
            form: FormSettings::default(),
            selectors: Selectors::default(),
            debug_timing: cfg!(debug_assertions),
        }
    }
}
