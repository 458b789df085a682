use std::rc::Rc;

use chrono::Utc;

use log::debug;
use web_sys::{Document, Element};
use yew::prelude::*;
use yew_hooks::use_interval;

use crate::config::TypewriterConfig;
use crate::dom;
use crate::error::Result;

/// Reveals a string one character at a time. Once complete it stays complete.
#[derive(Clone, Debug, PartialEq)]
pub struct Typewriter {
    chars: Vec<char>,
    revealed: usize,
    start_delay_ms: u32,
    interval_ms: u32,
}

pub enum TypewriterAction {
    Elapsed(u32),
}

impl Typewriter {
    pub fn new(text: &str, start_delay_ms: u32, interval_ms: u32) -> Self {
        Self {
            chars: text.chars().collect(),
            revealed: 0,
            start_delay_ms,
            interval_ms,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.revealed >= self.chars.len()
    }

    /// Catches the reveal up to `elapsed_ms` after mount. The first
    /// character lands one interval after the start delay. Never goes back.
    pub fn on_elapsed(&mut self, elapsed_ms: u32) -> bool {
        if elapsed_ms < self.start_delay_ms || self.interval_ms == 0 {
            return false;
        }
        let ticks = ((elapsed_ms - self.start_delay_ms) / self.interval_ms) as usize;
        let target = ticks.min(self.chars.len());
        if target > self.revealed {
            self.revealed = target;
            true
        } else {
            false
        }
    }

    pub fn visible_text(&self) -> String {
        self.chars[..self.revealed].iter().collect()
    }
}

impl Reducible for Typewriter {
    type Action = TypewriterAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            TypewriterAction::Elapsed(elapsed_ms) => {
                let mut next = (*self).clone();
                if next.on_elapsed(elapsed_ms) {
                    Rc::new(next)
                } else {
                    self
                }
            }
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct TypewriterProps {
    pub text: String,
    pub start_delay_ms: u32,
    pub interval_ms: u32,
}

#[function_component(TypewriterText)]
pub fn typewriter_text(props: &TypewriterProps) -> Html {
    let state = {
        let text = props.text.clone();
        let (delay, interval) = (props.start_delay_ms, props.interval_ms);
        use_reducer(move || Typewriter::new(&text, delay, interval))
    };
    let mounted_at = use_state(Utc::now);

    {
        let tick = state.clone();
        let mounted_at = *mounted_at;
        use_interval(
            move || {
                let elapsed = (Utc::now() - mounted_at).num_milliseconds().clamp(0, u32::MAX as i64);
                tick.dispatch(TypewriterAction::Elapsed(elapsed as u32));
            },
            if state.is_complete() { 0 } else { props.interval_ms },
        );
    }

    html! {
        <span class="typewriter-text">{ state.visible_text() }</span>
    }
}

pub fn mount(document: &Document, config: &TypewriterConfig) -> Result<()> {
    let targets = dom::query_all::<Element>(document, &config.selector);
    debug!("typewriter targets: {}", targets.len());

    for target in targets {
        let text = target.text_content().unwrap_or_default();
        target.set_text_content(None);
        yew::Renderer::<TypewriterText>::with_root_and_props(
            target,
            TypewriterProps {
                text,
                start_delay_ms: config.start_delay_ms,
                interval_ms: config.interval_ms,
            },
        )
        .render();
    }
    Ok(())
}
