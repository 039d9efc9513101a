// Scroll reactors for the header, the hero and the navigation highlight.
// The decisions are plain functions of the scroll offset and element boxes;
// `install` wires them to a single scroll listener.

use web_sys::{Document, HtmlElement, Window};

use crate::config::{HeroMotion, SiteConfig};
use crate::dom;
use crate::error::SiteError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HeaderStyle {
    pub background: &'static str,
    pub box_shadow: &'static str,
    pub border_bottom: &'static str,
}

impl HeaderStyle {
    pub const RESTING: HeaderStyle = HeaderStyle {
        background: "rgba(255, 255, 255, 0.95)",
        box_shadow: "0 2px 10px rgba(0, 0, 0, 0.1)",
        border_bottom: "1px solid rgba(0, 0, 0, 0.08)",
    };
    pub const SCROLLED: HeaderStyle = HeaderStyle {
        background: "rgba(255, 255, 255, 0.98)",
        box_shadow: "0 4px 20px rgba(0, 0, 0, 0.15)",
        border_bottom: "1px solid rgba(0, 0, 0, 0.1)",
    };

    pub fn for_scroll(scroll_y: f64, threshold: f64) -> HeaderStyle {
        if scroll_y > threshold {
            HeaderStyle::SCROLLED
        } else {
            HeaderStyle::RESTING
        }
    }

    pub fn apply(&self, header: &HtmlElement) -> Result<(), SiteError> {
        dom::set_style(header, "background", self.background)?;
        dom::set_style(header, "box-shadow", self.box_shadow)?;
        dom::set_style(header, "border-bottom", self.border_bottom)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeroStyle {
    pub opacity: f64,
    pub translate_y: f64,
}

impl HeroStyle {
    // Fade and parallax used to be two listeners both writing the transform;
    // the parallax write came last, so its factor is the one applied.
    pub fn for_scroll(scroll_y: f64, motion: &HeroMotion) -> HeroStyle {
        let opacity = if motion.fade_distance > 0.0 {
            (1.0 - scroll_y / motion.fade_distance).max(0.0)
        } else {
            0.0
        };
        HeroStyle {
            opacity: opacity.min(1.0),
            translate_y: scroll_y * motion.parallax,
        }
    }

    pub fn transform(&self) -> String {
        format!("translateY({}px)", self.translate_y)
    }

    pub fn apply(&self, hero: &HtmlElement) -> Result<(), SiteError> {
        dom::set_style(hero, "opacity", &self.opacity.to_string())?;
        dom::set_style(hero, "transform", &self.transform())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectionBox {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

/// The section whose box spans the line `band` pixels below the viewport top.
/// Later sections win ties, matching document order.
pub fn active_section(sections: &[SectionBox], band: f64) -> Option<&str> {
    sections
        .iter()
        .filter(|s| s.top <= band && s.top + s.height > band)
        .last()
        .map(|s| s.id.as_str())
}

// With no active section only a bare "#" link counts as current
pub fn is_current_link(href: Option<&str>, current: Option<&str>) -> bool {
    match href {
        Some(href) => href.strip_prefix('#') == Some(current.unwrap_or("")),
        None => false,
    }
}

struct NavTracker {
    sections: Vec<HtmlElement>,
    links: Vec<HtmlElement>,
    band: f64,
}

impl NavTracker {
    fn update(&self) -> Result<(), SiteError> {
        let boxes: Vec<SectionBox> = self
            .sections
            .iter()
            .filter_map(|section| {
                let id = section.get_attribute("id")?;
                Some(SectionBox {
                    id,
                    top: section.get_bounding_client_rect().top(),
                    height: section.client_height() as f64,
                })
            })
            .collect();
        let current = active_section(&boxes, self.band);

        for link in &self.links {
            let classes = link.class_list();
            classes.remove_1("active")?;
            if is_current_link(link.get_attribute("href").as_deref(), current) {
                classes.add_1("active")?;
            }
        }
        Ok(())
    }
}

struct ScrollReactors {
    window: Window,
    header: Option<HtmlElement>,
    hero: Option<HtmlElement>,
    nav: NavTracker,
    header_threshold: f64,
    hero_motion: HeroMotion,
}

impl ScrollReactors {
    fn on_scroll(&self) -> Result<(), SiteError> {
        let scroll_y = self.window.scroll_y()?;
        if let Some(header) = &self.header {
            HeaderStyle::for_scroll(scroll_y, self.header_threshold).apply(header)?;
        }
        if let Some(hero) = &self.hero {
            HeroStyle::for_scroll(scroll_y, &self.hero_motion).apply(hero)?;
        }
        self.nav.update()
    }
}

pub fn install(window: &Window, document: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    let selectors = &config.selectors;
    let reactors = ScrollReactors {
        window: window.clone(),
        header: dom::query(document, selectors.header)?,
        hero: dom::query(document, selectors.hero)?,
        nav: NavTracker {
            sections: dom::query_all(document, selectors.sections)?,
            links: dom::query_all(document, selectors.nav_links)?,
            band: config.nav_band,
        },
        header_threshold: config.header_threshold,
        hero_motion: config.hero,
    };
    if reactors.header.is_none() {
        log::warn!("no {} on page, header styling disabled", selectors.header);
    }

    dom::listen(window, "scroll", move |_| {
        if let Err(err) = reactors.on_scroll() {
            log::warn!("scroll reactor: {}", err);
        }
    })
}
