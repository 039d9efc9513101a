// Statistics counters: each `[data-count]` element counts up from zero to its
// target with a cubic ease-out, staggered by index, once the stats grid is
// half visible.

use web_sys::{Document, HtmlElement, Window};

use crate::animation::{AnimationLoop, Frame};
use crate::config::SiteConfig;
use crate::dom::{self, ObserverOptions};
use crate::error::SiteError;

// The one target shown as a percentage with two decimals
const PERCENT_TARGET: f64 = 99.99;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CounterTiming {
    pub duration_ms: f64,
    pub stagger_ms: f64,
}

impl Default for CounterTiming {
    fn default() -> Self {
        CounterTiming {
            duration_ms: 2500.0,
            stagger_ms: 200.0,
        }
    }
}

pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CounterFrame {
    pub value: f64,
    pub finished: bool,
}

impl CounterTiming {
    /// Value of counter `index` `elapsed_ms` after the shared start, or `None`
    /// while its stagger delay has not passed yet.
    pub fn frame(&self, target: f64, index: usize, elapsed_ms: f64) -> Option<CounterFrame> {
        let elapsed = elapsed_ms - index as f64 * self.stagger_ms;
        if elapsed < 0.0 {
            return None;
        }
        let progress = if self.duration_ms > 0.0 {
            (elapsed / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        };
        Some(CounterFrame {
            value: target * ease_out_cubic(progress),
            finished: progress >= 1.0,
        })
    }
}

pub fn format_counter(target: f64, value: f64) -> String {
    if target == PERCENT_TARGET {
        format!("{:.2}", value)
    } else {
        format!("{}", value.floor() as i64)
    }
}

/// Reads the longest numeric prefix of `raw` the way the page's markup expects
/// (`"10+"` is 10, `"24/7"` is 24). Leading whitespace is skipped.
pub fn parse_count(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_end = int_end;
    if bytes.get(int_end) == Some(&b'.') {
        let frac_end = digits_from(int_end + 1);
        if frac_end > int_end + 1 || int_end > end {
            mantissa_end = frac_end;
        }
    }
    if mantissa_end == end {
        return None;
    }

    end = mantissa_end;
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    text[..end].parse::<f64>().ok()
}

const HIGHLIGHT_FLASH: &str = "0 0 30px rgba(0, 255, 255, 0.8)";
const HIGHLIGHT_REST: &str = "0 0 20px rgba(0, 255, 255, 0.3)";

/// Completion glow: bright at once, dimmed after `fade_ms`.
pub fn highlight(window: &Window, counter: &HtmlElement, fade_ms: u32) -> Result<(), SiteError> {
    counter.class_list().add_1("animated")?;
    dom::set_style(counter, "text-shadow", HIGHLIGHT_FLASH)?;
    let counter = counter.clone();
    dom::set_timeout(window, fade_ms, move || {
        if let Err(err) = dom::set_style(&counter, "text-shadow", HIGHLIGHT_REST) {
            log::warn!("counter highlight: {}", err);
        }
    })?;
    Ok(())
}

/// Starts one animation loop per counter, all measured from the same start.
pub fn animate_counters(
    window: &Window,
    counters: Vec<HtmlElement>,
    timing: CounterTiming,
    fade_ms: u32,
) -> Result<(), SiteError> {
    let start = window
        .performance()
        .ok_or_else(|| SiteError::Js("performance unavailable".into()))?
        .now();

    for (index, counter) in counters.into_iter().enumerate() {
        let target = match counter
            .get_attribute("data-count")
            .and_then(|raw| parse_count(&raw))
        {
            Some(target) => target,
            None => {
                log::warn!("counter {} has no numeric data-count", index);
                continue;
            }
        };

        let frame_window = window.clone();
        AnimationLoop::start(window, move |now| {
            let frame = match timing.frame(target, index, now - start) {
                Some(frame) => frame,
                None => return Frame::Continue,
            };
            counter.set_text_content(Some(&format_counter(target, frame.value)));
            if !frame.finished {
                return Frame::Continue;
            }
            if let Err(err) = highlight(&frame_window, &counter, fade_ms) {
                log::warn!("counter highlight: {}", err);
            }
            Frame::Done
        })?;
    }
    Ok(())
}

/// Fires the counters the first time the stats grid is visible enough, then
/// stops watching it.
pub fn install(window: &Window, document: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    let grid = match dom::query(document, config.selectors.stats_grid)? {
        Some(grid) => grid,
        None => return Ok(()),
    };

    let window = window.clone();
    let document = document.clone();
    let selector = config.selectors.counters;
    let timing = config.counter;
    let fade_ms = config.highlight_fade_ms;
    dom::observe_visibility(
        &[grid],
        ObserverOptions {
            threshold: config.counter_trigger,
            root_margin: "0px",
        },
        move |target, observer| {
            observer.unobserve(target);
            let started = dom::query_all(&document, selector)
                .and_then(|counters| animate_counters(&window, counters, timing, fade_ms));
            if let Err(err) = started {
                log::error!("counters: {}", err);
            }
        },
    )?;
    Ok(())
}
